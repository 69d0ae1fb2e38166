//! Tree pattern matching for the unravel transforms.
//!
//! Patterns are plain values (`Pattern`, `ListPattern`, `StrPattern`,
//! `NumPattern`) interpreted against a `NodeArena`. A `Matcher` runs one
//! top-level attempt at a time; named captures populated during the attempt
//! live in a `Captures` table that is reset at the start of every attempt and
//! rolled back when an alternative or list quantifier fails.
//!
//! Backreferences (`FromCapture`) compare nodes by structural equality and
//! strings/numbers by value, never by node identity.

pub mod captures;
pub use captures::{Capture, CaptureKey, Captures};

pub mod pattern;
pub use pattern::{ListItem, ListPattern, Matcher, NumPattern, Pattern, StrPattern};

pub mod patterns;
pub use patterns::{
    const_member_expression, declaration_or_assignment, infinite_loop, true_literal,
    undefined_literal,
};
