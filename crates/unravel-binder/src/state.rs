//! Binder state: scope and binding tables plus queries.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;
use unravel_ast::{NodeArena, NodeIndex};

use crate::binding::{Binding, BindingId, Reference};
use crate::scope::{Scope, ScopeId, ScopeKind};

/// Identifier reference waiting for the resolve phase.
#[derive(Clone, Debug)]
pub(crate) struct PendingReference {
    pub name: String,
    pub scope: ScopeId,
    pub reference: Reference,
    /// `reference.node` is the identifier itself (not an export node).
    pub is_identifier: bool,
}

#[derive(Clone, Debug, Default)]
pub struct BinderState {
    pub(crate) scopes: Vec<Scope>,
    pub(crate) bindings: Vec<Binding>,
    /// Scope-opening node -> scope.
    pub(crate) node_scopes: FxHashMap<NodeIndex, ScopeId>,
    /// Declaring or referencing identifier -> binding.
    pub(crate) identifier_bindings: FxHashMap<NodeIndex, BindingId>,
    /// Unresolved identifier -> name.
    pub(crate) unresolved: FxHashMap<NodeIndex, String>,
    /// Name -> number of unresolved references.
    pub(crate) globals: FxHashMap<String, u32>,
    /// Names handed out by `generate_unique_name`.
    pub(crate) generated_names: FxHashSet<String>,
    pub(crate) pending: Vec<PendingReference>,
}

impl BinderState {
    pub fn new() -> Self {
        BinderState::default()
    }

    /// Build the index for the program rooted at `root`.
    pub fn bind(arena: &NodeArena, root: NodeIndex) -> Self {
        let mut binder = BinderState::new();
        binder.bind_program(arena, root);
        binder
    }

    /// Rebuild the index from scratch. Generated names are kept so later
    /// `generate_unique_name` calls never reuse them.
    #[tracing::instrument(level = "debug", skip_all, fields(root = root.0))]
    pub fn bind_program(&mut self, arena: &NodeArena, root: NodeIndex) {
        self.scopes.clear();
        self.bindings.clear();
        self.node_scopes.clear();
        self.identifier_bindings.clear();
        self.unresolved.clear();
        self.globals.clear();
        self.pending.clear();

        let program = self.enter_scope(ScopeKind::Program, root, None);
        self.declare_phase(arena, root, program);
        self.resolve_phase();

        debug!(
            scopes = self.scopes.len(),
            bindings = self.bindings.len(),
            globals = self.globals.len(),
            "program bound"
        );
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn program_scope(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0 as usize)
    }

    /// Scope opened by `node`, if any.
    pub fn scope_for_node(&self, node: NodeIndex) -> Option<ScopeId> {
        self.node_scopes.get(&node).copied()
    }

    /// Innermost scope containing `node` (the scope `node` opens counts).
    pub fn scope_of(&self, arena: &NodeArena, node: NodeIndex) -> ScopeId {
        std::iter::once(node)
            .chain(arena.ancestors(node))
            .find_map(|n| self.scope_for_node(n))
            .unwrap_or(self.program_scope())
    }

    /// Resolve `name` from `scope` outwards.
    pub fn get_binding(&self, scope: ScopeId, name: &str) -> Option<BindingId> {
        self.scope_chain(scope)
            .find_map(|id| self.scope(id).and_then(|s| s.own_binding(name)))
    }

    /// Binding declared or referenced by an identifier node.
    pub fn binding_of(&self, node: NodeIndex) -> Option<BindingId> {
        self.identifier_bindings.get(&node).copied()
    }

    pub fn binding(&self, id: BindingId) -> Option<&Binding> {
        self.bindings
            .get(id.0 as usize)
            .filter(|binding| !binding.removed)
    }

    /// Live bindings in declaration order.
    pub fn bindings(&self) -> impl Iterator<Item = (BindingId, &Binding)> + '_ {
        self.bindings
            .iter()
            .enumerate()
            .filter(|(_, binding)| !binding.removed)
            .map(|(i, binding)| (BindingId(i as u32), binding))
    }

    pub fn binding_count(&self) -> usize {
        self.bindings().count()
    }

    /// `name` is referenced somewhere without a declaration.
    pub fn has_global(&self, name: &str) -> bool {
        self.globals.get(name).is_some_and(|&count| count > 0)
    }

    /// `scope` and its ancestors, innermost first.
    pub fn scope_chain(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), |id| {
            self.scopes.get(id.0 as usize).and_then(|s| s.parent)
        })
    }

    /// Nearest scope `var` declarations in `scope` hoist to.
    pub fn var_scope(&self, scope: ScopeId) -> ScopeId {
        self.scope_chain(scope)
            .find(|&id| self.scope(id).is_some_and(|s| s.kind.is_var_scope()))
            .unwrap_or(self.program_scope())
    }

    /// Some scope strictly inside `scope` declares `name`.
    pub fn descendant_declares(&self, scope: ScopeId, name: &str) -> bool {
        let mut stack: Vec<ScopeId> = self
            .scope(scope)
            .map(|s| s.children.clone())
            .unwrap_or_default();
        while let Some(id) = stack.pop() {
            let Some(child) = self.scope(id) else {
                continue;
            };
            if child.bindings.contains_key(name) {
                return true;
            }
            stack.extend(child.children.iter().copied());
        }
        false
    }

    // =========================================================================
    // Construction helpers
    // =========================================================================

    pub(crate) fn enter_scope(
        &mut self,
        kind: ScopeKind,
        node: NodeIndex,
        parent: Option<ScopeId>,
    ) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(kind, node, parent));
        if let Some(parent) = parent {
            self.scopes[parent.0 as usize].children.push(id);
        }
        self.node_scopes.insert(node, id);
        id
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
