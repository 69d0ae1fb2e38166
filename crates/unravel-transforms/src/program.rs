//! A tree plus the scope index the passes share.

use unravel_ast::{NodeArena, NodeIndex, Printer};
use unravel_binder::BinderState;
use unravel_common::TransformOptions;

pub struct Program {
    pub arena: NodeArena,
    pub root: NodeIndex,
    pub binder: BinderState,
    pub options: TransformOptions,
    /// The binder no longer reflects the tree and must be rebuilt before a
    /// scope-dependent pass runs.
    pub scope_stale: bool,
}

impl Program {
    /// Wrap a parsed tree and bind it.
    pub fn new(arena: NodeArena, root: NodeIndex) -> Self {
        Program::with_options(arena, root, TransformOptions::default())
    }

    pub fn with_options(arena: NodeArena, root: NodeIndex, options: TransformOptions) -> Self {
        let binder = BinderState::bind(&arena, root);
        Program {
            arena,
            root,
            binder,
            options,
            scope_stale: false,
        }
    }

    /// Rebuild the scope index if a pass left it stale.
    pub fn ensure_scope(&mut self) {
        if self.scope_stale {
            self.binder.bind_program(&self.arena, self.root);
            self.scope_stale = false;
        }
    }

    pub fn print(&self) -> String {
        Printer::print(&self.arena, self.root)
    }
}
