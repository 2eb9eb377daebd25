//! A Brainfuck front end with two back ends.
//!
//! Source text goes through three stages before either back end sees it:
//!
//! - [`lexer::filter`] keeps only the eight commands `+ - > < . , [ ]`;
//!   everything else is commentary.
//! - [`validate::validate`] checks bracket balance and reports the first
//!   offending bracket by token index.
//! - [`ir::build`] produces a run-length encoded [`Program`] where loop
//!   instructions carry the index of their partner.
//!
//! The resulting [`Program`] can be executed by the [`Engine`] (30,000 `u8`
//! cells, wrapping arithmetic, 0 on end-of-input, strict pointer bounds) or
//! rendered as C or Rust by the [`CodeGenerator`].
//!
//! Quick start:
//!
//! ```no_run
//! use bfc::{compile, CodeGenerator, Engine, TargetKind};
//!
//! // Classic "Hello World!" in Brainfuck
//! let code = "++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>.";
//! let program = compile(code.as_bytes()).expect("brackets should balance");
//!
//! let mut engine = Engine::new();
//! engine.run(&program, std::io::stdin().lock(), std::io::stdout().lock()).expect("program should run");
//!
//! let c_source = CodeGenerator::for_kind(TargetKind::C).generate(&program);
//! println!("{c_source}");
//! ```

pub mod cli_util;
pub mod codegen;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod ir;
pub mod lexer;
pub mod repl;
pub mod validate;

pub use codegen::{CTarget, CodeGenerator, RustTarget, Target, TargetKind};
pub use engine::{Engine, StepControl, TAPE_SIZE};
pub use error::{CompileError, EngineError, SyntaxError, UnmatchedBracketKind};
pub use ir::{Instruction, Op, Program};
pub use lexer::{Token, TokenStream};

/// Filter, validate, and build in one step.
///
/// A syntax error stops here, before any IR exists.
pub fn compile(source: &[u8]) -> Result<Program, CompileError> {
    let tokens = lexer::filter(source);
    validate::validate(tokens.tokens())?;
    let program = ir::build(tokens.tokens());
    tracing::debug!(
        source_len = source.len(),
        tokens = tokens.len(),
        instructions = program.len(),
        "compiled"
    );
    Ok(program)
}
