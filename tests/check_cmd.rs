use assert_cmd::Command;
use predicates::prelude::*;

fn cargo_bin() -> Command { Command::cargo_bin("bfc").unwrap() }

#[test]
fn valid_program_prints_ok() {
    cargo_bin()
        .args(["check", "+[->+<]"])
        .assert()
        .success()
        .stdout("ok\n");
}

#[test]
fn invalid_program_shows_caret_under_source() {
    cargo_bin()
        .args(["check", "ab ] cd"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Parse error: unmatched bracket ']'"))
        .stderr(predicate::str::contains("  ab ] cd\n     ^"));
}

#[test]
fn check_does_not_run_the_program() {
    // Would read stdin and loop forever if executed.
    cargo_bin()
        .args(["check", ",+[]"])
        .assert()
        .success()
        .stdout("ok\n");
}

#[test]
fn ir_lists_instructions() {
    cargo_bin()
        .args(["ir", "++[-]"])
        .assert()
        .success()
        .stdout("0     + 2\n1     [ 3\n2     - 1\n3     ] 1\n");
}
