//! Centralized limits and thresholds.
//!
//! Obfuscated bundles routinely nest thousands of levels deep (string
//! concatenation chains, nested IIFEs). Recursive walks over the tree are
//! bounded by these constants instead of relying on the native stack.

/// Maximum depth for recursive AST traversal in transforms.
///
/// Subtrees deeper than this are left untouched and reported as a warning.
pub const MAX_AST_DEPTH: u32 = 1_000;

/// Maximum depth for parser recursion (nested expressions and statements).
pub const MAX_PARSER_DEPTH: u32 = 1_000;

/// Maximum number of candidates `generate_unique_name` tries before giving up
/// and falling back to a counter-only suffix search.
pub const MAX_UNIQUE_NAME_ATTEMPTS: u32 = 100_000;

/// Maximum characters of a string literal that contribute to a derived name.
pub const MAX_LITERAL_NAME_CHARS: usize = 20;
