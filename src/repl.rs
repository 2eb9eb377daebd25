use std::io::{self, BufRead, Write};

use crate::cli_util;
use crate::engine::Engine;

/// Line-oriented read-eval-print loop.
///
/// Each non-empty line is compiled and run on a fresh engine. Program
/// output goes to `output`, followed by a newline so the next prompt starts
/// at column 0. Errors go to stderr. `,` reads from the same `input` the
/// lines come from.
///
/// When `prompt` is set, a numbered `[n] $ ` prompt is written to stderr
/// before each line. When `once` is set, the loop ends after the first
/// executed line.
pub fn repl_loop<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: bool,
    once: bool,
) -> io::Result<()> {
    let mut line_no: usize = 1;

    loop {
        if prompt {
            eprint!("[{line_no}] $ ");
            io::stderr().flush()?;
        }

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // EOF. End the session cleanly to avoid hanging when stdin is closed
            if prompt {
                eprintln!();
            }
            return Ok(());
        }
        line_no += 1;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue; // Ignore empty submissions
        }

        execute_line(trimmed, input, output)?;

        if once {
            return Ok(());
        }
    }
}

/// Compile and run one submission.
/// - Program output goes to `output`.
/// - Errors are printed concisely to stderr.
/// - A newline is always written after execution (success or error).
fn execute_line<R: BufRead, W: Write>(source: &str, input: &mut R, output: &mut W) -> io::Result<()> {
    match crate::compile(source.as_bytes()) {
        Ok(program) => {
            let mut engine = Engine::new();
            if let Err(err) = engine.run(&program, &mut *input, &mut *output) {
                cli_util::print_engine_error(None, &err);
            }
        }
        Err(crate::CompileError::Syntax(err)) => {
            cli_util::print_syntax_error(None, source, &err);
        }
    }
    writeln!(output)?;
    output.flush()
}
