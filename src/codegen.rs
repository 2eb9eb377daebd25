//! Source-to-source back end: renders a [`Program`] as C or Rust.
//!
//! Each IR instruction maps to statements with the same semantics the
//! [`Engine`](crate::Engine) gives it. Loop depth drives indentation:
//! a loop-open indents the lines after it, a loop-close outdents itself.
//! No validation happens here; the IR is trusted.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::engine::TAPE_SIZE;
use crate::ir::{Op, Program};

/// Spaces per nesting level unless configured otherwise.
pub const DEFAULT_INDENT: usize = 4;

/// A target language.
pub trait Target {
    /// File extension for generated files, without the dot.
    fn extension(&self) -> &'static str;

    /// Everything before the first statement: tape, data pointer, and the
    /// opening of the entry point. Statements follow at depth 1.
    fn prologue(&self, tape_size: usize, indent: &str) -> String;

    /// Everything after the last statement.
    fn epilogue(&self, indent: &str) -> String;

    /// One statement for `op`. For I/O `count` is always 1; the generator
    /// repeats the statement instead.
    fn statement(&self, op: Op, count: usize) -> String;
}

/// C, as produced by the historical `bf-to-c` tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct CTarget;

impl Target for CTarget {
    fn extension(&self) -> &'static str {
        "c"
    }

    fn prologue(&self, tape_size: usize, indent: &str) -> String {
        format!(
            "// <Autogenerated>\n\
             #include <stdio.h>\n\
             \n\
             typedef unsigned char byte;\n\
             \n\
             byte tape[{tape_size}] = {{0}};\n\
             \n\
             static byte read_byte(void)\n\
             {{\n\
             {indent}int c = getchar();\n\
             {indent}return c == EOF ? 0 : (byte)c;\n\
             }}\n\
             \n\
             int main(void)\n\
             {{\n\
             {indent}int index = 0;\n\
             {indent}// START\n"
        )
    }

    fn epilogue(&self, indent: &str) -> String {
        format!("{indent}// END\n{indent}return 0;\n}}\n")
    }

    fn statement(&self, op: Op, count: usize) -> String {
        match (op, count) {
            (Op::Add, 1) => "tape[index]++;".to_string(),
            (Op::Add, n) => format!("tape[index] += {n};"),
            (Op::Sub, 1) => "tape[index]--;".to_string(),
            (Op::Sub, n) => format!("tape[index] -= {n};"),
            (Op::Right, 1) => "index++;".to_string(),
            (Op::Right, n) => format!("index += {n};"),
            (Op::Left, 1) => "index--;".to_string(),
            (Op::Left, n) => format!("index -= {n};"),
            (Op::Output, _) => "putchar(tape[index]);".to_string(),
            (Op::Input, _) => "tape[index] = read_byte();".to_string(),
            (Op::LoopOpen, _) => "while (tape[index]) {".to_string(),
            (Op::LoopClose, _) => "}".to_string(),
        }
    }
}

/// Rust. There is no `++`, so a count of 1 uses the same form as larger
/// counts; cell arithmetic goes through `wrapping_*` to keep u8 wraparound.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustTarget;

impl Target for RustTarget {
    fn extension(&self) -> &'static str {
        "rs"
    }

    fn prologue(&self, tape_size: usize, indent: &str) -> String {
        format!(
            "// <Autogenerated>\n\
             use std::io::{{Read, Write}};\n\
             \n\
             fn read_byte(input: &mut impl Read) -> u8 {{\n\
             {indent}let mut buf = [0u8; 1];\n\
             {indent}match input.read(&mut buf) {{\n\
             {indent}{indent}Ok(1) => buf[0],\n\
             {indent}{indent}_ => 0,\n\
             {indent}}}\n\
             }}\n\
             \n\
             fn main() {{\n\
             {indent}let mut tape = vec![0u8; {tape_size}];\n\
             {indent}let mut index: usize = 0;\n\
             {indent}let mut stdin = std::io::stdin().lock();\n\
             {indent}let mut stdout = std::io::stdout().lock();\n\
             {indent}// START\n"
        )
    }

    fn epilogue(&self, indent: &str) -> String {
        format!("{indent}// END\n{indent}let _ = stdout.flush();\n}}\n")
    }

    fn statement(&self, op: Op, count: usize) -> String {
        let wrapped = count % 256;
        match op {
            Op::Add => format!("tape[index] = tape[index].wrapping_add({wrapped});"),
            Op::Sub => format!("tape[index] = tape[index].wrapping_sub({wrapped});"),
            Op::Right => format!("index += {count};"),
            Op::Left => format!("index -= {count};"),
            Op::Output => "let _ = stdout.write_all(&[tape[index]]);".to_string(),
            Op::Input => {
                "let _ = stdout.flush(); tape[index] = read_byte(&mut stdin);".to_string()
            }
            Op::LoopOpen => "while tape[index] != 0 {".to_string(),
            Op::LoopClose => "}".to_string(),
        }
    }
}

/// Selectable target, for the command line and the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    #[default]
    C,
    Rust,
}

impl TargetKind {
    pub fn target(self) -> Box<dyn Target> {
        match self {
            TargetKind::C => Box::new(CTarget),
            TargetKind::Rust => Box::new(RustTarget),
        }
    }
}

/// Renders programs for one target.
pub struct CodeGenerator {
    target: Box<dyn Target>,
    indent: usize,
}

impl CodeGenerator {
    pub fn new<T: Target + 'static>(target: T) -> Self {
        Self {
            target: Box::new(target),
            indent: DEFAULT_INDENT,
        }
    }

    pub fn for_kind(kind: TargetKind) -> Self {
        Self {
            target: kind.target(),
            indent: DEFAULT_INDENT,
        }
    }

    /// Spaces per nesting level.
    pub fn with_indent(mut self, width: usize) -> Self {
        self.indent = width;
        self
    }

    /// A complete translation unit.
    pub fn generate(&self, program: &Program) -> String {
        let unit = " ".repeat(self.indent);
        let mut out = self.target.prologue(TAPE_SIZE, &unit);
        out.push_str(&self.statements(program));
        out.push_str(&self.target.epilogue(&unit));
        tracing::debug!(instructions = program.len(), bytes = out.len(), "generated source");
        out
    }

    /// Only the statements, indented for the body of the entry point.
    pub fn statements(&self, program: &Program) -> String {
        let mut out = String::new();
        let mut depth: usize = 1;

        for instr in program {
            match instr.op {
                Op::LoopOpen => {
                    self.line(&mut out, depth, instr.op, 1);
                    depth += 1;
                }
                Op::LoopClose => {
                    depth = depth.saturating_sub(1);
                    self.line(&mut out, depth, instr.op, 1);
                }
                Op::Output | Op::Input => {
                    for _ in 0..instr.operand {
                        self.line(&mut out, depth, instr.op, 1);
                    }
                }
                _ => self.line(&mut out, depth, instr.op, instr.operand),
            }
        }

        out
    }

    fn line(&self, out: &mut String, depth: usize, op: Op, count: usize) {
        out.push_str(&" ".repeat(self.indent * depth));
        out.push_str(&self.target.statement(op, count));
        out.push('\n');
    }
}

/// Output file for `source`: the same path with the target's extension.
/// A source that already carries that extension gets it appended instead,
/// so the input is never overwritten.
pub fn output_path(source: &Path, kind: TargetKind) -> PathBuf {
    let ext = kind.target().extension();
    if source.extension().is_some_and(|e| e == ext) {
        let mut name = source.as_os_str().to_owned();
        name.push(".");
        name.push(ext);
        PathBuf::from(name)
    } else {
        source.with_extension(ext)
    }
}
