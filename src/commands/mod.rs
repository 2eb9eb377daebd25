//! Subcommand entry points. Each returns the process exit code.

pub mod check;
pub mod emit;
pub mod ir;
pub mod repl;
pub mod run;

use std::fs;
use std::io::{self, Write};

use crate::cli_util::print_syntax_error;
use crate::ir::Program;

/// Load program text from `--file` or the concatenated positional parts.
/// `Err` carries the exit code after the problem has been reported.
pub(crate) fn load_source(program: &str, file: Option<&str>, code: &[String]) -> Result<Vec<u8>, i32> {
    match file {
        Some(path) => fs::read(path).map_err(|e| {
            eprintln!("{program}: failed to read code file {path}: {e}");
            let _ = io::stderr().flush();
            1
        }),
        None => Ok(code.join("").into_bytes()),
    }
}

/// Compile `source`, printing a caret diagnostic on a syntax error.
pub(crate) fn compile_or_report(program: Option<&str>, source: &[u8]) -> Option<Program> {
    match crate::compile(source) {
        Ok(p) => Some(p),
        Err(crate::CompileError::Syntax(err)) => {
            print_syntax_error(program, &String::from_utf8_lossy(source), &err);
            None
        }
    }
}
