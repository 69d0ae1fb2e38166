//! Diagnostic reporting for transforms.
//!
//! Transforms never log through global state directly. They report to a
//! `DiagnosticSink` handed to them by the caller; the default sink drops
//! everything, `TracingSink` forwards to `tracing`, and `CollectingSink`
//! keeps diagnostics around for inspection in tests.

use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    /// Name of the transform (or component) that produced the diagnostic.
    pub source: &'static str,
    pub message_text: String,
}

impl Diagnostic {
    pub fn info(source: &'static str, message: impl Into<String>) -> Self {
        Self {
            category: DiagnosticCategory::Info,
            source,
            message_text: message.into(),
        }
    }

    pub fn warning(source: &'static str, message: impl Into<String>) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            source,
            message_text: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.category {
            DiagnosticCategory::Info => "info",
            DiagnosticCategory::Warning => "warning",
        };
        write!(f, "{tag}[{}]: {}", self.source, self.message_text)
    }
}

/// Receiver for diagnostics emitted while a transform runs.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Drops every diagnostic.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

/// Forwards diagnostics to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.category {
            DiagnosticCategory::Info => {
                tracing::debug!(source = diagnostic.source, "{}", diagnostic.message_text);
            }
            DiagnosticCategory::Warning => {
                tracing::warn!(source = diagnostic.source, "{}", diagnostic.message_text);
            }
        }
    }
}

/// Stores every diagnostic in order.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> + '_ {
        self.diagnostics.iter().map(|d| d.message_text.as_str())
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.category == DiagnosticCategory::Warning)
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
#[path = "tests/diagnostics_tests.rs"]
mod tests;
