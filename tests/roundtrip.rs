// Coalesced IR on the engine must behave exactly like stepping the source one
// command at a time.

use bfc::{compile, Engine};
use std::collections::HashMap;

/// One primitive step per command character, no coalescing.
fn step_by_step(code: &str, input: &[u8], tape_len: usize) -> Vec<u8> {
    let cmds: Vec<u8> = code.bytes().filter(|b| b"+-<>.,[]".contains(b)).collect();

    let mut jumps = HashMap::new();
    let mut stack = Vec::new();
    for (i, &c) in cmds.iter().enumerate() {
        match c {
            b'[' => stack.push(i),
            b']' => {
                let open = stack.pop().expect("balanced");
                jumps.insert(open, i);
                jumps.insert(i, open);
            }
            _ => {}
        }
    }

    let mut tape = vec![0u8; tape_len];
    let (mut ip, mut ptr) = (0usize, 0usize);
    let mut input = input.iter();
    let mut out = Vec::new();
    while ip < cmds.len() {
        match cmds[ip] {
            b'+' => tape[ptr] = tape[ptr].wrapping_add(1),
            b'-' => tape[ptr] = tape[ptr].wrapping_sub(1),
            b'>' => ptr += 1,
            b'<' => ptr -= 1,
            b'.' => out.push(tape[ptr]),
            b',' => tape[ptr] = input.next().copied().unwrap_or(0),
            b'[' if tape[ptr] == 0 => ip = jumps[&ip],
            b']' if tape[ptr] != 0 => ip = jumps[&ip],
            _ => {}
        }
        ip += 1;
    }
    out
}

fn engine_output(code: &str, input: &[u8]) -> Vec<u8> {
    let program = compile(code.as_bytes()).expect("valid program");
    let mut out = Vec::new();
    Engine::new().run(&program, input, &mut out).expect("program should run");
    out
}

fn assert_same(code: &str, input: &[u8]) {
    assert_eq!(
        engine_output(code, input),
        step_by_step(code, input, bfc::TAPE_SIZE),
        "diverged on {code:?}"
    );
}

#[test]
fn hello_world() {
    let code = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";
    assert_same(code, b"");
    assert_eq!(engine_output(code, b""), b"Hello World!\n");
}

#[test]
fn echo_and_reverse() {
    assert_same(",[.,]", b"some input bytes");
    assert_same(">,[>,]<[.<]", b"reverse me");
}

#[test]
fn wrapping_and_repeated_io() {
    assert_same(&format!("{}...{}..", "+".repeat(300), "-".repeat(600)), b"");
    assert_same(",,,.", b"xyz");
    assert_same(",,,,.", b"xy");
}

#[test]
fn nested_loops_and_moves() {
    // Multiply 6 by 7 into the third cell, then print every cell.
    assert_same("++++++[>+++++++[>+<-]<-]>>.<.<.", b"");
    assert_same("+++[>++[>+++[>+<-]<-]<-]>>>.", b"");
}

#[test]
fn adjacent_loops_and_skipped_bodies() {
    assert_same("[.][.]+[-][.]+.", b"");
    assert_same("+[[-]+>+<[-]]>.", b"");
}
