//! Scanner: turns source text into tokens.
//!
//! Keywords are scanned as `Identifier` tokens; the parser decides from
//! context whether a word is a keyword. String tokens carry their cooked
//! value, numeric tokens their `f64` value.

use crate::error::ParseError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    EndOfFile,
    Identifier,
    StringLiteral,
    NumericLiteral,
    Punctuator,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text for identifiers and punctuators, cooked value for strings.
    pub text: String,
    /// Value of a numeric literal; 0 otherwise.
    pub value: f64,
    pub pos: usize,
    pub end: usize,
    /// A line terminator appeared between the previous token and this one.
    pub newline_before: bool,
}

impl Token {
    #[inline]
    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punctuator && self.text == punct
    }

    #[inline]
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == word
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfFile
    }
}

/// Punctuators, longest first so the first prefix match wins.
const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "**", "<<", ">>", "{", "}", "(", ")", "[", "]", ";", ",", "<", ">", "+", "-",
    "*", "/", "%", "&", "|", "^", "!", "~", "?", ":", "=", ".",
];

#[inline]
fn is_identifier_start(ch: char) -> bool {
    ch == '$' || ch == '_' || ch.is_alphabetic()
}

#[inline]
fn is_identifier_part(ch: char) -> bool {
    ch == '$' || ch == '_' || ch.is_alphanumeric() || ch == '\u{200c}' || ch == '\u{200d}'
}

#[inline]
fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[derive(Clone, Debug)]
pub struct ScannerState<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> ScannerState<'a> {
    pub fn new(source: &'a str) -> Self {
        ScannerState { source, pos: 0 }
    }

    /// Current byte offset.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn source_text(&self) -> &'a str {
        self.source
    }

    #[inline]
    fn peek_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    #[inline]
    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(offset)
    }

    #[inline]
    fn bump(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Skip whitespace and comments. Returns whether a line terminator was
    /// crossed.
    fn skip_trivia(&mut self) -> Result<bool, ParseError> {
        let mut newline = false;
        if self.pos == 0 && self.source.starts_with("#!") {
            while let Some(ch) = self.peek_char() {
                if is_line_terminator(ch) {
                    break;
                }
                self.bump();
            }
        }
        while let Some(ch) = self.peek_char() {
            if is_line_terminator(ch) {
                newline = true;
                self.bump();
            } else if ch.is_whitespace() || ch == '\u{feff}' {
                self.bump();
            } else if ch == '/' && self.peek_char_at(1) == Some('/') {
                while let Some(ch) = self.peek_char() {
                    if is_line_terminator(ch) {
                        break;
                    }
                    self.bump();
                }
            } else if ch == '/' && self.peek_char_at(1) == Some('*') {
                let start = self.pos;
                self.pos += 2;
                match self.source[self.pos..].find("*/") {
                    Some(offset) => {
                        let comment = &self.source[self.pos..self.pos + offset];
                        if comment.chars().any(is_line_terminator) {
                            newline = true;
                        }
                        self.pos += offset + 2;
                    }
                    None => return Err(ParseError::UnterminatedComment { pos: start }),
                }
            } else {
                break;
            }
        }
        Ok(newline)
    }

    /// Scan the next token.
    pub fn scan(&mut self) -> Result<Token, ParseError> {
        let newline_before = self.skip_trivia()?;
        let pos = self.pos;
        let Some(ch) = self.peek_char() else {
            return Ok(Token {
                kind: TokenKind::EndOfFile,
                text: String::new(),
                value: 0.0,
                pos,
                end: pos,
                newline_before,
            });
        };

        let (kind, text, value) = if is_identifier_start(ch) {
            (TokenKind::Identifier, self.scan_identifier(), 0.0)
        } else if ch == '\\' {
            return Err(ParseError::Unsupported {
                construct: "unicode escape in identifier",
                pos,
            });
        } else if ch.is_ascii_digit()
            || (ch == '.' && self.peek_char_at(1).is_some_and(|c| c.is_ascii_digit()))
        {
            let value = self.scan_number()?;
            (TokenKind::NumericLiteral, self.source[pos..self.pos].to_string(), value)
        } else if ch == '"' || ch == '\'' {
            (TokenKind::StringLiteral, self.scan_string(ch)?, 0.0)
        } else if ch == '`' {
            return Err(ParseError::Unsupported {
                construct: "template literal",
                pos,
            });
        } else {
            (TokenKind::Punctuator, self.scan_punctuator()?, 0.0)
        };

        Ok(Token {
            kind,
            text,
            value,
            pos,
            end: self.pos,
            newline_before,
        })
    }

    fn scan_identifier(&mut self) -> String {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if !is_identifier_part(ch) {
                break;
            }
            self.bump();
        }
        self.source[start..self.pos].to_string()
    }

    fn scan_number(&mut self) -> Result<f64, ParseError> {
        let start = self.pos;
        let invalid = |scanner: &Self| ParseError::InvalidNumber {
            text: scanner.source[start..scanner.pos].to_string(),
            pos: start,
        };

        let radix = match (self.peek_char(), self.peek_char_at(1)) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('o' | 'O')) => Some(8),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        };

        let value = if let Some(radix) = radix {
            self.pos += 2;
            let digits_start = self.pos;
            while self.peek_char().is_some_and(|c| c.is_digit(radix) || c == '_') {
                self.bump();
            }
            let digits: String = self.source[digits_start..self.pos]
                .chars()
                .filter(|&c| c != '_')
                .collect();
            if digits.is_empty() {
                return Err(invalid(self));
            }
            // Parse digit by digit so values above u64 stay approximately right.
            digits.chars().fold(0.0, |acc, c| {
                acc * f64::from(radix) + f64::from(c.to_digit(radix).unwrap_or(0))
            })
        } else {
            while self.peek_char().is_some_and(|c| c.is_ascii_digit() || c == '_') {
                self.bump();
            }
            if self.peek_char() == Some('.') {
                self.bump();
                while self.peek_char().is_some_and(|c| c.is_ascii_digit() || c == '_') {
                    self.bump();
                }
            }
            if matches!(self.peek_char(), Some('e' | 'E')) {
                self.bump();
                if matches!(self.peek_char(), Some('+' | '-')) {
                    self.bump();
                }
                if !self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                    return Err(invalid(self));
                }
                while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                    self.bump();
                }
            }
            let text: String = self.source[start..self.pos]
                .chars()
                .filter(|&c| c != '_')
                .collect();
            text.parse::<f64>().map_err(|_| invalid(self))?
        };

        match self.peek_char() {
            Some('n') => Err(ParseError::Unsupported {
                construct: "BigInt literal",
                pos: start,
            }),
            Some(ch) if is_identifier_start(ch) => {
                self.bump();
                Err(invalid(self))
            }
            _ => Ok(value),
        }
    }

    fn scan_string(&mut self, quote: char) -> Result<String, ParseError> {
        let start = self.pos;
        self.bump();
        let mut value = String::new();
        loop {
            let Some(ch) = self.bump() else {
                return Err(ParseError::UnterminatedString { pos: start });
            };
            if ch == quote {
                return Ok(value);
            }
            if is_line_terminator(ch) && ch != '\u{2028}' && ch != '\u{2029}' {
                return Err(ParseError::UnterminatedString { pos: start });
            }
            if ch != '\\' {
                value.push(ch);
                continue;
            }
            let Some(escaped) = self.bump() else {
                return Err(ParseError::UnterminatedString { pos: start });
            };
            match escaped {
                'n' => value.push('\n'),
                'r' => value.push('\r'),
                't' => value.push('\t'),
                'b' => value.push('\u{8}'),
                'f' => value.push('\u{c}'),
                'v' => value.push('\u{b}'),
                '0' if !self.peek_char().is_some_and(|c| c.is_ascii_digit()) => value.push('\0'),
                'x' => {
                    let code = self.scan_hex_digits(2, start)?;
                    value.push(char::from_u32(code).unwrap_or('\u{fffd}'));
                }
                'u' => {
                    let code = self.scan_unicode_escape(start)?;
                    // Lone surrogates cannot be held in a Rust string.
                    if (0xd800..0xdc00).contains(&code) && self.source[self.pos..].starts_with("\\u")
                    {
                        let save = self.pos;
                        self.pos += 2;
                        let low = self.scan_unicode_escape(start)?;
                        if (0xdc00..0xe000).contains(&low) {
                            let combined = 0x10000 + ((code - 0xd800) << 10) + (low - 0xdc00);
                            value.push(char::from_u32(combined).unwrap_or('\u{fffd}'));
                            continue;
                        }
                        self.pos = save;
                    }
                    value.push(char::from_u32(code).unwrap_or('\u{fffd}'));
                }
                '\r' => {
                    if self.peek_char() == Some('\n') {
                        self.bump();
                    }
                }
                '\n' | '\u{2028}' | '\u{2029}' => {}
                other => value.push(other),
            }
        }
    }

    fn scan_hex_digits(&mut self, count: usize, string_start: usize) -> Result<u32, ParseError> {
        let mut code = 0;
        for _ in 0..count {
            let digit = self
                .peek_char()
                .and_then(|c| c.to_digit(16))
                .ok_or(ParseError::UnterminatedString { pos: string_start })?;
            self.bump();
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn scan_unicode_escape(&mut self, string_start: usize) -> Result<u32, ParseError> {
        if self.peek_char() == Some('{') {
            self.bump();
            let mut code: u32 = 0;
            while let Some(digit) = self.peek_char().and_then(|c| c.to_digit(16)) {
                self.bump();
                code = code.saturating_mul(16).saturating_add(digit);
            }
            if self.bump() != Some('}') {
                return Err(ParseError::UnterminatedString { pos: string_start });
            }
            Ok(code)
        } else {
            self.scan_hex_digits(4, string_start)
        }
    }

    fn scan_punctuator(&mut self) -> Result<String, ParseError> {
        let pos = self.pos;
        let rest = &self.source[pos..];
        for punct in PUNCTUATORS {
            if rest.starts_with(punct) {
                // `a?.5:b` is a conditional, not optional chaining.
                if *punct == "?."
                    && rest[2..].chars().next().is_some_and(|c| c.is_ascii_digit())
                {
                    continue;
                }
                self.pos += punct.len();
                return Ok((*punct).to_string());
            }
        }
        let ch = self.peek_char().unwrap_or('\0');
        Err(ParseError::UnexpectedCharacter { ch, pos })
    }
}

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod tests;
