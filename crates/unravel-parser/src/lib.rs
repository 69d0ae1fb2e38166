//! Parser for the JavaScript subset the unravel transforms operate on.
//!
//! - `scanner` - tokens, comments and literal decoding
//! - `parser` - recursive-descent `ParserState` producing a `Program`
//! - `error` - `ParseError`
//!
//! Regular expressions, template literals, optional chaining, `super` and
//! BigInt literals are rejected with `ParseError::Unsupported`.

pub mod error;
pub use error::ParseError;

pub mod scanner;
pub use scanner::{ScannerState, Token, TokenKind};

pub mod parser;
pub use parser::{ParsedProgram, ParserState, parse};
