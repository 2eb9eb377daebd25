//! Bracket validation over a token stream.

use crate::error::{SyntaxError, UnmatchedBracketKind};
use crate::lexer::Token;

/// Check that every `[` has a matching `]`.
///
/// Reports only the first offending bracket:
/// - a `]` with nothing open fails at its own index, as soon as it is seen;
/// - if opens remain at the end, the outermost one is reported, since any
///   later pending opens are nested inside it.
pub fn validate(tokens: &[Token]) -> Result<(), SyntaxError> {
    let mut stack: Vec<usize> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LoopOpen => stack.push(i),
            Token::LoopClose => {
                if stack.pop().is_none() {
                    return Err(SyntaxError {
                        position: i,
                        kind: UnmatchedBracketKind::Close,
                    });
                }
            }
            _ => {}
        }
    }

    if let Some(&outermost) = stack.first() {
        return Err(SyntaxError {
            position: outermost,
            kind: UnmatchedBracketKind::Open,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::filter;

    fn check(code: &str) -> Result<(), SyntaxError> {
        validate(filter(code.as_bytes()).tokens())
    }

    fn is_balanced(code: &str) -> bool {
        let mut depth: i64 = 0;
        for c in code.chars() {
            match c {
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth < 0 {
                        return false;
                    }
                }
                _ => {}
            }
        }
        depth == 0
    }

    #[test]
    fn balanced_programs_are_valid() {
        for code in ["", "+", "[]", "[[]]", "[][]", "+[>[-]<-]."] {
            assert!(check(code).is_ok(), "{code:?} should be valid");
        }
    }

    #[test]
    fn stray_close_reports_its_own_index() {
        let err = check("+]").unwrap_err();
        assert_eq!(err.position, 1);
        assert_eq!(err.kind, UnmatchedBracketKind::Close);

        // The close fails as soon as it is seen, even with opens after it.
        let err = check("[]][").unwrap_err();
        assert_eq!(err.position, 2);
        assert_eq!(err.kind, UnmatchedBracketKind::Close);
    }

    #[test]
    fn unmatched_open_reports_outermost_open() {
        let err = check("[[.]").unwrap_err();
        assert_eq!(err.position, 0);
        assert_eq!(err.kind, UnmatchedBracketKind::Open);

        let err = check("[][[").unwrap_err();
        assert_eq!(err.position, 2);
        assert_eq!(err.kind, UnmatchedBracketKind::Open);
    }

    #[test]
    fn positions_are_token_indices_not_source_offsets() {
        let err = check("comment + ]").unwrap_err();
        assert_eq!(err.position, 1);
    }

    #[test]
    fn agrees_with_balanced_parenthesis_check() {
        // Every bracket string up to length 8.
        for len in 0..=8u32 {
            for bits in 0..(1u32 << len) {
                let code: String = (0..len)
                    .map(|i| if bits & (1 << i) == 0 { '[' } else { ']' })
                    .collect();
                assert_eq!(check(&code).is_ok(), is_balanced(&code), "{code}");
            }
        }
    }
}
