//! Transform options.

use serde::{Deserialize, Serialize};

use crate::limits::MAX_AST_DEPTH;

/// Canonical name given to a wrapped string array accessor.
pub const DEFAULT_STRING_ARRAY_NAME: &str = "__STRING_ARRAY__";

/// Options shared by every transform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformOptions {
    /// Name the wrapped string array accessor is renamed to.
    pub string_array_name: String,
    /// Traversal depth bound; deeper subtrees are skipped.
    pub max_ast_depth: u32,
}

impl Default for TransformOptions {
    fn default() -> Self {
        TransformOptions {
            string_array_name: DEFAULT_STRING_ARRAY_NAME.to_string(),
            max_ast_depth: MAX_AST_DEPTH,
        }
    }
}

impl TransformOptions {
    /// Parse options from JSON. Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
#[path = "tests/options_tests.rs"]
mod tests;
