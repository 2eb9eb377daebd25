//! Error types shared by the front end and the execution engine.

use std::fmt;

use crate::ir::Op;

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmatchedBracketKind {
    Open,
    Close,
}

impl fmt::Display for UnmatchedBracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmatchedBracketKind::Open => write!(f, "'['"),
            UnmatchedBracketKind::Close => write!(f, "']'"),
        }
    }
}

/// A structurally invalid bracket in the token stream.
///
/// `position` is an index into the filtered token stream, not the raw source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Unmatched bracket {kind} at token {position}")]
pub struct SyntaxError {
    pub position: usize,
    pub kind: UnmatchedBracketKind,
}

/// Errors from the composed front end.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// Errors that terminate a run of the execution engine.
///
/// Output written before the error stays written.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The data pointer would have left the tape.
    #[error("Pointer out of bounds at instruction {ip} (ptr={ptr}, op='{op}')")]
    TapeBounds { ip: usize, ptr: usize, op: Op },

    /// Reading input or writing output failed.
    #[error("I/O error at instruction {ip}: {source}")]
    Io {
        ip: usize,
        #[source]
        source: std::io::Error,
    },

    /// Execution aborted due to step limit.
    #[error("Execution aborted: step limit exceeded ({limit})")]
    StepLimitExceeded { limit: usize },
}
