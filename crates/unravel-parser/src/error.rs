use thiserror::Error;

/// Errors produced while scanning or parsing. Positions are byte offsets.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected token `{found}` at {pos}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        pos: usize,
    },

    #[error("unexpected character `{ch}` at {pos}")]
    UnexpectedCharacter { ch: char, pos: usize },

    #[error("unterminated string literal starting at {pos}")]
    UnterminatedString { pos: usize },

    #[error("unterminated comment starting at {pos}")]
    UnterminatedComment { pos: usize },

    #[error("invalid number literal `{text}` at {pos}")]
    InvalidNumber { text: String, pos: usize },

    #[error("invalid assignment target at {pos}")]
    InvalidAssignmentTarget { pos: usize },

    #[error("unsupported syntax: {construct} at {pos}")]
    Unsupported { construct: &'static str, pos: usize },

    #[error("unexpected end of input at {pos}")]
    UnexpectedEnd { pos: usize },

    #[error("maximum nesting depth exceeded at {pos}")]
    TooDeep { pos: usize },
}

impl ParseError {
    /// Byte offset the error refers to.
    pub fn pos(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { pos, .. }
            | ParseError::UnexpectedCharacter { pos, .. }
            | ParseError::UnterminatedString { pos }
            | ParseError::UnterminatedComment { pos }
            | ParseError::InvalidNumber { pos, .. }
            | ParseError::InvalidAssignmentTarget { pos }
            | ParseError::Unsupported { pos, .. }
            | ParseError::UnexpectedEnd { pos }
            | ParseError::TooDeep { pos } => *pos,
        }
    }
}
