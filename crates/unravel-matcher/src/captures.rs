//! Capture table for a single match attempt.

use unravel_ast::NodeIndex;

pub type CaptureKey = &'static str;

#[derive(Clone, Debug, PartialEq)]
pub enum Capture {
    Node(NodeIndex),
    Str(String),
    Number(f64),
    List(Vec<NodeIndex>),
}

/// Named slots filled during one match attempt.
///
/// Entries are kept in insertion order so a failed alternative can be undone
/// by truncating back to a checkpoint. When a key is captured more than once
/// the latest entry wins.
#[derive(Clone, Debug, Default)]
pub struct Captures {
    entries: Vec<(CaptureKey, Capture)>,
}

impl Captures {
    pub fn new() -> Self {
        Captures::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub(crate) fn checkpoint(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn rollback(&mut self, checkpoint: usize) {
        self.entries.truncate(checkpoint);
    }

    pub(crate) fn insert(&mut self, key: CaptureKey, value: Capture) {
        self.entries.push((key, value));
    }

    pub fn get(&self, key: &str) -> Option<&Capture> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| value)
    }

    /// Captured node. A captured absent slot reads as `None`.
    pub fn node(&self, key: &str) -> Option<NodeIndex> {
        match self.get(key) {
            Some(Capture::Node(node)) if node.is_some() => Some(*node),
            _ => None,
        }
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(Capture::Str(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.get(key) {
            Some(Capture::Number(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn list(&self, key: &str) -> Option<&[NodeIndex]> {
        match self.get(key) {
            Some(Capture::List(nodes)) => Some(nodes.as_slice()),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/captures_tests.rs"]
mod tests;
