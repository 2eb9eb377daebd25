use std::io::{self, Write};

use crate::error::{EngineError, SyntaxError};
use crate::lexer::TokenStream;

/// Pretty-print a syntax error with caret positioning under the raw source.
/// If `program` is `Some("bfc")`, prefix messages with "bfc: ...".
pub fn print_syntax_error(program: Option<&str>, source: &str, err: &SyntaxError) {
    let msg = prefix_program(program, &format!("Parse error: unmatched bracket {}", err.kind));
    let tokens = crate::lexer::filter(source.as_bytes());
    print_error_with_context(&msg, source, err.position, byte_offset(&tokens, err.position));
}

/// Pretty-print a runtime error. Positions in [`EngineError`] are IR indices,
/// which do not map back to the source, so only the message is shown.
pub fn print_engine_error(program: Option<&str>, err: &EngineError) {
    let msg = match err {
        EngineError::TapeBounds { ip, ptr, op } => {
            format!("Runtime error: pointer out of bounds at instruction {ip} (ptr={ptr}, op={op})")
        }
        EngineError::Io { ip, source } => format!("I/O error at instruction {ip}: {source}"),
        EngineError::StepLimitExceeded { limit } => {
            format!("Execution aborted: step limit exceeded ({limit})")
        }
    };
    eprintln!("{}", prefix_program(program, &msg));
    let _ = io::stderr().flush();
}

fn prefix_program(program: Option<&str>, msg: &str) -> String {
    match program {
        Some(p) => format!("{p}: {msg}"),
        None => msg.to_string(),
    }
}

fn byte_offset(tokens: &TokenStream, position: usize) -> usize {
    tokens.source_offset(position).unwrap_or(0)
}

/// Print a concise error with token index and a caret context window under
/// the raw source line, working with UTF-8 by slicing on char boundaries.
pub fn print_error_with_context(prefix: &str, source: &str, position: usize, offset: usize) {
    eprintln!("{prefix} at token {position}");
    for line in context_lines(source, offset) {
        eprintln!("  {line}");
    }
    let _ = io::stderr().flush();
}

/// The source window around byte `offset` and a caret line under it.
pub fn context_lines(source: &str, offset: usize) -> [String; 2] {
    // Show a short window around the position for context
    const WINDOW_CHARS: usize = 32;

    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line_end = source[offset..].find('\n').map_or(source.len(), |i| offset + i);
    let line = &source[line_start..line_end];

    let pos = char_index(line, offset - line_start);
    let total_chars = line.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    let window: String = line
        .chars()
        .skip(start_char)
        .take(end_char - start_char)
        .map(|c| if c == '\t' { ' ' } else { c })
        .collect();

    // Caret under the exact position
    let caret = format!("{}^", " ".repeat(pos - start_char));
    [window, caret]
}

/// Convert a byte index into a char index in the given UTF-8 string.
fn char_index(s: &str, byte_idx: usize) -> usize {
    s.char_indices().take_while(|(i, _)| *i < byte_idx).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_points_at_offset() {
        let [window, caret] = context_lines("++]--", 2);
        assert_eq!(window, "++]--");
        assert_eq!(caret, "  ^");
    }

    #[test]
    fn context_is_limited_to_the_offending_line() {
        let source = "+++\nab [ cd\n---";
        let [window, caret] = context_lines(source, 7);
        assert_eq!(window, "ab [ cd");
        assert_eq!(caret, "   ^");
    }

    #[test]
    fn long_lines_are_windowed() {
        let source = format!("{}]{}", "+".repeat(100), "-".repeat(100));
        let [window, caret] = context_lines(&source, 100);
        assert_eq!(window.chars().count(), 65);
        assert_eq!(caret.len(), 33);
    }

    #[test]
    fn multibyte_characters_count_as_one_column() {
        let source = "é→[";
        let offset = source.find('[').unwrap();
        let [_, caret] = context_lines(source, offset);
        assert_eq!(caret, "  ^");
    }
}
