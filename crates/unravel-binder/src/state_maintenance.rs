//! Incremental index maintenance for tree rewrites.

use rustc_hash::FxHashSet;
use tracing::trace;
use unravel_ast::{NodeArena, NodeIndex, NodeKind};

use crate::binding::BindingId;
use crate::scope::ScopeId;
use crate::state::BinderState;

impl BinderState {
    /// Drop every index entry for the subtree rooted at `root`, which has
    /// been (or is about to be) removed from the tree. Bindings whose only
    /// declarations lie in the subtree are removed.
    pub fn forget_subtree(&mut self, arena: &NodeArena, root: NodeIndex) {
        let nodes = arena.descendants(root);
        let removed: FxHashSet<NodeIndex> = nodes.iter().copied().collect();
        let mut touched: Vec<BindingId> = Vec::new();
        let mut has_export = false;

        for &node in &nodes {
            if let Some(id) = self.identifier_bindings.remove(&node) {
                touched.push(id);
            }
            if let Some(name) = self.unresolved.remove(&node) {
                self.release_global(&name);
            }
            if let Some(scope) = self.node_scopes.remove(&node) {
                self.unlink_scope(scope);
            }
            has_export |= matches!(
                arena.kind(node),
                NodeKind::ExportNamedDeclaration { .. } | NodeKind::ExportDefaultDeclaration { .. }
            );
        }
        if has_export {
            touched.extend(
                self.bindings()
                    .filter(|(_, b)| b.references.iter().any(|r| removed.contains(&r.node)))
                    .map(|(id, _)| id),
            );
        }
        touched.sort_unstable();
        touched.dedup();

        for id in touched {
            let binding = &mut self.bindings[id.0 as usize];
            binding.references.retain(|r| !removed.contains(&r.node));
            binding.declarations.retain(|d| !removed.contains(d));
            if binding.declarations.is_empty() && !binding.removed {
                self.remove_binding(id);
            }
        }
        trace!(root = root.0, nodes = nodes.len(), "subtree forgotten");
    }

    /// Register declarations and references of a subtree just inserted
    /// into the tree.
    pub fn bind_subtree(&mut self, arena: &NodeArena, root: NodeIndex) {
        let parent = arena.parent(root);
        let scope = if parent.is_some() {
            self.scope_of(arena, parent)
        } else {
            self.program_scope()
        };
        self.declare_phase(arena, root, scope);
        self.resolve_phase();
        trace!(root = root.0, scope = scope.0, "subtree bound");
    }

    /// Remove a binding from its scope. Its remaining identifier references
    /// become globals.
    pub fn remove_binding(&mut self, id: BindingId) {
        let Some(binding) = self.bindings.get_mut(id.0 as usize) else {
            return;
        };
        if binding.removed {
            return;
        }
        binding.removed = true;
        let name = binding.name.clone();
        let scope = binding.scope;
        let declarations = std::mem::take(&mut binding.declarations);
        let references = std::mem::take(&mut binding.references);

        if let Some(table) = self
            .scopes
            .get_mut(scope.0 as usize)
            .map(|s| &mut s.bindings)
            && table.get(name.as_str()) == Some(&id)
        {
            table.shift_remove(name.as_str());
        }
        for declaration in declarations {
            self.identifier_bindings.remove(&declaration);
        }
        for reference in references {
            if self.identifier_bindings.remove(&reference.node).is_some() {
                self.unresolved.insert(reference.node, name.clone());
                *self.globals.entry(name.clone()).or_default() += 1;
            }
        }
        trace!(%name, "binding removed");
    }

    /// Move every binding and nested scope of `child` into `parent`, used
    /// when the statements of `child`'s node are hoisted into `parent`.
    /// A binding whose name already exists in `parent` is merged into it.
    pub fn merge_scope_into(&mut self, child: ScopeId, parent: ScopeId) {
        if child == parent || self.scope(child).is_none() || self.scope(parent).is_none() {
            return;
        }
        let bindings = std::mem::take(&mut self.scopes[child.0 as usize].bindings);
        for (name, id) in bindings {
            match self.scopes[parent.0 as usize].own_binding(&name) {
                Some(existing) if existing != id => self.merge_binding(id, existing),
                _ => {
                    self.scopes[parent.0 as usize].bindings.insert(name, id);
                    self.bindings[id.0 as usize].scope = parent;
                }
            }
        }

        let grandchildren = std::mem::take(&mut self.scopes[child.0 as usize].children);
        for &grandchild in &grandchildren {
            self.scopes[grandchild.0 as usize].parent = Some(parent);
        }
        self.scopes[parent.0 as usize].children.extend(grandchildren);

        self.unlink_scope(child);
        let node = self.scopes[child.0 as usize].node;
        if self.node_scopes.get(&node) == Some(&child) {
            self.node_scopes.remove(&node);
        }
        trace!(child = child.0, parent = parent.0, "scope merged");
    }

    fn merge_binding(&mut self, from: BindingId, into: BindingId) {
        let source = &mut self.bindings[from.0 as usize];
        source.removed = true;
        let declarations = std::mem::take(&mut source.declarations);
        let references = std::mem::take(&mut source.references);
        for &node in declarations.iter().chain(references.iter().map(|r| &r.node)) {
            if self.identifier_bindings.get(&node) == Some(&from) {
                self.identifier_bindings.insert(node, into);
            }
        }
        let target = &mut self.bindings[into.0 as usize];
        target.declarations.extend(declarations);
        target.references.extend(references);
    }

    /// Detach `scope` from its parent's child list.
    fn unlink_scope(&mut self, scope: ScopeId) {
        let Some(parent) = self.scope(scope).and_then(|s| s.parent) else {
            return;
        };
        self.scopes[parent.0 as usize]
            .children
            .retain(|&child| child != scope);
    }

    fn release_global(&mut self, name: &str) {
        if let Some(count) = self.globals.get_mut(name) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.globals.remove(name);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/maintenance_tests.rs"]
mod tests;
