//! Transform contract and traversal driver.
//!
//! A transform sees the tree through `enter` (pre-order) and `exit`
//! (post-order) callbacks. Callbacks may rewrite the tree freely: the driver
//! re-reads a node's children after `enter` and skips any child that an
//! earlier callback detached.

use bitflags::bitflags;
use smallvec::SmallVec;
use tracing::debug;
use unravel_ast::{NodeIndex, NodeKind};
use unravel_common::{Diagnostic, DiagnosticSink, TransformOptions};
use unravel_matcher::Captures;

use crate::program::Program;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    /// Safety classification of a transform.
    pub struct TransformTags: u8 {
        /// Preserves program behavior.
        const SAFE = 1 << 0;
        /// May change behavior in edge cases.
        const UNSAFE = 1 << 1;
    }
}

pub trait Transform {
    fn name(&self) -> &'static str;

    fn tags(&self) -> TransformTags {
        TransformTags::SAFE
    }

    /// The binder must be current before the walk starts.
    fn requires_scope(&self) -> bool {
        false
    }

    /// Rewrites keep the binder index current. When `false`, any change
    /// marks the index stale.
    fn maintains_scope(&self) -> bool {
        true
    }

    /// Whether `enter`/`exit` run for nodes of this kind.
    fn visits(&self, _kind: &NodeKind) -> bool {
        true
    }

    fn enter(&mut self, _cx: &mut TransformContext<'_>, _node: NodeIndex) {}

    fn exit(&mut self, _cx: &mut TransformContext<'_>, _node: NodeIndex) {}
}

/// State handed to transform callbacks.
pub struct TransformContext<'a> {
    pub program: &'a mut Program,
    sink: &'a mut dyn DiagnosticSink,
    source: &'static str,
    changes: usize,
    stopped: bool,
}

impl<'a> TransformContext<'a> {
    pub fn new(
        program: &'a mut Program,
        sink: &'a mut dyn DiagnosticSink,
        source: &'static str,
    ) -> Self {
        TransformContext {
            program,
            sink,
            source,
            changes: 0,
            stopped: false,
        }
    }

    pub fn options(&self) -> &TransformOptions {
        &self.program.options
    }

    pub fn changes(&self) -> usize {
        self.changes
    }

    pub fn add_changes(&mut self, count: usize) {
        self.changes += count;
    }

    /// End the walk after the current callback returns.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.sink.report(Diagnostic::info(self.source, message));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.sink.report(Diagnostic::warning(self.source, message));
    }
}

/// Outcome of one `apply_transform` run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransformState {
    pub name: &'static str,
    pub changes: usize,
}

/// Run `transform` over the whole program.
#[tracing::instrument(level = "debug", skip_all, fields(transform = transform.name()))]
pub fn apply_transform<T: Transform + ?Sized>(
    program: &mut Program,
    transform: &mut T,
    sink: &mut dyn DiagnosticSink,
) -> TransformState {
    if transform.requires_scope() {
        program.ensure_scope();
    }
    let name = transform.name();
    let maintains_scope = transform.maintains_scope();
    let root = program.root;

    let mut cx = TransformContext::new(program, sink, name);
    walk(&mut cx, transform, root, 0);
    let changes = cx.changes;

    if changes > 0 && !maintains_scope {
        program.scope_stale = true;
    }
    debug!(changes, "transform finished");
    TransformState { name, changes }
}

fn walk<T: Transform + ?Sized>(
    cx: &mut TransformContext<'_>,
    transform: &mut T,
    node: NodeIndex,
    depth: u32,
) {
    if cx.stopped {
        return;
    }
    let max_depth = cx.program.options.max_ast_depth;
    if depth >= max_depth {
        let kind = cx.program.arena.kind(node).kind_name();
        cx.warning(format!("skipped {kind} nested deeper than {max_depth} levels"));
        return;
    }

    let parent = cx.program.arena.parent(node);
    if transform.visits(cx.program.arena.kind(node)) {
        transform.enter(cx, node);
        if cx.stopped {
            return;
        }
    }
    if cx.program.arena.parent(node) != parent {
        return;
    }

    let children: SmallVec<[NodeIndex; 4]> = cx.program.arena.children(node);
    for child in children {
        if cx.stopped {
            return;
        }
        if cx.program.arena.parent(child) != node {
            continue;
        }
        walk(cx, transform, child, depth + 1);
    }

    if !cx.stopped && transform.visits(cx.program.arena.kind(node)) {
        transform.exit(cx, node);
    }
}

// =============================================================================
// Capture accessors
// =============================================================================

// A capture missing after a successful match means the pattern and the
// rewrite disagree. Development builds fail loudly; release builds skip the
// rewrite.

pub(crate) fn expect_node(captures: &Captures, key: &str) -> Option<NodeIndex> {
    let node = captures.node(key);
    debug_assert!(node.is_some(), "capture `{key}` missing after a successful match");
    node
}

pub(crate) fn expect_string<'c>(captures: &'c Captures, key: &str) -> Option<&'c str> {
    let value = captures.string(key);
    debug_assert!(value.is_some(), "capture `{key}` missing after a successful match");
    value
}

pub(crate) fn expect_list<'c>(captures: &'c Captures, key: &str) -> Option<&'c [NodeIndex]> {
    let list = captures.list(key);
    debug_assert!(list.is_some(), "capture `{key}` missing after a successful match");
    list
}

#[cfg(test)]
#[path = "tests/transform_tests.rs"]
mod tests;
