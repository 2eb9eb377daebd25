//! Lexical filter: raw source bytes to a dense token stream.
//!
//! Only the eight command characters `+ - > < . , [ ]` are kept. Everything
//! else, including whitespace and newlines, is commentary and is dropped
//! without error.

/// One command symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Add,
    Sub,
    Right,
    Left,
    Output,
    Input,
    LoopOpen,
    LoopClose,
}

impl Token {
    /// Map a source byte to its command, if it is one.
    pub fn from_byte(b: u8) -> Option<Self> {
        Some(match b {
            b'+' => Token::Add,
            b'-' => Token::Sub,
            b'>' => Token::Right,
            b'<' => Token::Left,
            b'.' => Token::Output,
            b',' => Token::Input,
            b'[' => Token::LoopOpen,
            b']' => Token::LoopClose,
            _ => return None,
        })
    }

    pub fn as_char(self) -> char {
        match self {
            Token::Add => '+',
            Token::Sub => '-',
            Token::Right => '>',
            Token::Left => '<',
            Token::Output => '.',
            Token::Input => ',',
            Token::LoopOpen => '[',
            Token::LoopClose => ']',
        }
    }
}

/// Filtered tokens in source order, each paired with its byte offset in the
/// raw source so diagnostics can point back into the original text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
    offsets: Vec<usize>,
}

impl TokenStream {
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Byte offset in the raw source of the token at `position`.
    pub fn source_offset(&self, position: usize) -> Option<usize> {
        self.offsets.get(position).copied()
    }

    /// The tokens rendered back as command characters.
    pub fn to_code(&self) -> String {
        self.tokens.iter().map(|t| t.as_char()).collect()
    }
}

/// Strip everything outside the command alphabet. Never fails.
pub fn filter(source: &[u8]) -> TokenStream {
    let mut stream = TokenStream::default();
    for (offset, &b) in source.iter().enumerate() {
        if let Some(token) = Token::from_byte(b) {
            stream.tokens.push(token);
            stream.offsets.push(offset);
        }
    }
    tracing::trace!(source_len = source.len(), tokens = stream.len(), "filtered source");
    stream
}
