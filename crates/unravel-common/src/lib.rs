//! Common types and utilities for the unravel deobfuscator.
//!
//! This crate provides foundational types used across all unravel crates:
//! - Diagnostic reporting (`Diagnostic`, `DiagnosticSink` and its sinks)
//! - Traversal limits
//! - Transform options (`TransformOptions`)

// Injectable diagnostic sinks (no global logging state in the core)
pub mod diagnostics;
pub use diagnostics::{
    CollectingSink, Diagnostic, DiagnosticCategory, DiagnosticSink, NoopSink, TracingSink,
};

// Centralized limits and thresholds
pub mod limits;

// Serde-backed options
pub mod options;
pub use options::TransformOptions;
