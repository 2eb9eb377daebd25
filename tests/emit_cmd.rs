use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn cargo_bin() -> Command { Command::cargo_bin("bfc").unwrap() }

fn source_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write source");
    path
}

#[test]
fn emit_writes_c_next_to_source() {
    let dir = tempfile::tempdir().expect("tempdir");
    let src = source_file(&dir, "three.bf", "+++.");

    cargo_bin()
        .arg("emit").arg(&src)
        .assert()
        .success()
        .stdout(predicate::str::contains("written successfully"));

    let generated = fs::read_to_string(dir.path().join("three.c")).expect("generated file");
    assert!(generated.contains("byte tape[30000] = {0};"));
    assert!(generated.contains("    tape[index] += 3;\n    putchar(tape[index]);\n"));
}

#[test]
fn emit_rust_to_stdout() {
    let dir = tempfile::tempdir().expect("tempdir");
    let src = source_file(&dir, "loop.bf", "+[-]");

    cargo_bin()
        .args(["emit", "--target", "rust", "--stdout"]).arg(&src)
        .assert()
        .success()
        .stdout(predicate::str::contains("fn main() {")
            .and(predicate::str::contains("    while tape[index] != 0 {\n        tape[index] = tape[index].wrapping_sub(1);\n    }\n")));

    assert!(!dir.path().join("loop.rs").exists());
}

#[test]
fn emit_honors_output_and_indent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let src = source_file(&dir, "in.bf", "[>]");
    let out = dir.path().join("custom.c");

    cargo_bin()
        .args(["emit", "--indent", "2", "--output"]).arg(&out).arg(&src)
        .assert()
        .success();

    let generated = fs::read_to_string(&out).expect("generated file");
    assert!(generated.contains("  while (tape[index]) {\n    index++;\n  }\n"));
}

#[test]
fn emit_refuses_unbalanced_source() {
    let dir = tempfile::tempdir().expect("tempdir");
    let src = source_file(&dir, "bad.bf", "[[.]");

    cargo_bin()
        .arg("emit").arg(&src)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unmatched bracket '['"));

    assert!(!dir.path().join("bad.c").exists());
}

#[test]
fn emit_rejects_empty_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let src = source_file(&dir, "empty.bf", "");

    cargo_bin()
        .arg("emit").arg(&src)
        .assert()
        .failure()
        .stderr(predicate::str::contains("file is empty"));
}
