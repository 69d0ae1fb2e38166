//! Identifier validity and sanitizing.

/// Words that cannot name a binding in strict-mode module code.
const RESERVED_WORDS: &[&str] = &[
    // Keywords
    "break", "case", "catch", "continue", "debugger", "default", "do", "else", "finally", "for",
    "function", "if", "return", "switch", "throw", "try", "var", "const", "while", "with", "new",
    "this", "super", "class", "extends", "export", "import", "null", "true", "false", "in",
    "instanceof", "typeof", "void", "delete",
    // Reserved
    "enum", "await",
    // Strict-mode reserved
    "implements", "interface", "let", "package", "private", "protected", "public", "static",
    "yield",
    // Strict-mode binding restrictions
    "eval", "arguments",
];

pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

fn is_identifier_start(ch: char) -> bool {
    ch == '$' || ch == '_' || ch.is_alphabetic()
}

fn is_identifier_part(ch: char) -> bool {
    is_identifier_start(ch) || ch.is_alphanumeric() || ch == '\u{200c}' || ch == '\u{200d}'
}

/// Non-empty, well-formed and not reserved.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    is_identifier_start(first) && chars.all(is_identifier_part) && !is_reserved_word(name)
}

/// Turn arbitrary text into a usable identifier.
///
/// Characters outside `[A-Za-z0-9$_]` become word breaks, leading digits and
/// breaks are dropped, the letter after a break is uppercased
/// (`"foo-bar baz"` becomes `fooBarBaz`), and reserved words get a `_`
/// prefix. Empty input yields `_`.
pub fn to_identifier(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_break = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() || ch == '$' || ch == '_' {
            if out.is_empty() && ch.is_ascii_digit() {
                continue;
            }
            if at_break && !out.is_empty() {
                out.push(ch.to_ascii_uppercase());
            } else {
                out.push(ch);
            }
            at_break = false;
        } else {
            at_break = true;
        }
    }
    if !is_valid_identifier(&out) {
        out.insert(0, '_');
    }
    out
}

#[cfg(test)]
#[path = "tests/identifiers_tests.rs"]
mod tests;
