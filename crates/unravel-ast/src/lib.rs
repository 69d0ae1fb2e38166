//! Syntax tree for the unravel deobfuscator.
//!
//! Nodes live in a `NodeArena` and refer to each other through `NodeIndex`
//! handles. Every node records its parent so rewrites can splice, replace and
//! remove subtrees without re-walking the tree:
//!
//! - `base` - `NodeIndex`
//! - `node` - the closed set of `NodeKind` variants and their child slots
//! - `node_arena` - allocation, access, mutation, structural equality, cloning
//! - `builders` - terse constructors for synthesized nodes and tests
//! - `printer` - JavaScript text emission

pub mod base;
pub use base::NodeIndex;

pub mod node;
pub use node::{ArrowData, ClassData, FunctionData, MethodKind, NodeKind, VarKind};

pub mod node_arena;
pub use node_arena::{Node, NodeArena};

pub mod builders;

pub mod printer;
pub use printer::{Printer, format_number, quote_string};
