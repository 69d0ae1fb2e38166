//! Renaming and fresh-name generation.

use tracing::{debug, warn};
use unravel_ast::{NodeArena, NodeIndex, NodeKind};
use unravel_common::limits::MAX_UNIQUE_NAME_ATTEMPTS;

use crate::binding::BindingId;
use crate::identifiers::to_identifier;
use crate::scope::ScopeId;
use crate::state::BinderState;

impl BinderState {
    /// Rename `id` at every declaration and identifier reference site.
    ///
    /// Shorthand object properties on a renamed site are expanded so the
    /// property key keeps its old name (`{a}` becomes `{a: b}`). No collision
    /// check is made; callers pick `new_name` with `generate_unique_name`.
    /// Returns the number of identifier sites rewritten.
    #[tracing::instrument(level = "trace", skip(self, arena))]
    pub fn rename_fast(&mut self, arena: &mut NodeArena, id: BindingId, new_name: &str) -> usize {
        let Some(binding) = self.binding(id) else {
            return 0;
        };
        if binding.name == new_name {
            return 0;
        }
        let old_name = binding.name.clone();
        let scope = binding.scope;
        let sites: Vec<NodeIndex> = binding
            .declarations
            .iter()
            .copied()
            .chain(binding.references.iter().map(|r| r.node))
            .filter(|&node| arena.name(node) == Some(old_name.as_str()))
            .collect();

        for &site in &sites {
            expand_shorthand(arena, site);
            arena.set_name(site, new_name);
        }

        let table = &mut self.scopes[scope.0 as usize].bindings;
        if table.get(old_name.as_str()) == Some(&id) {
            table.shift_remove(old_name.as_str());
        }
        if let Some(previous) = table.insert(new_name.to_string(), id)
            && previous != id
        {
            warn!(%old_name, %new_name, "rename shadows an existing binding in the same scope");
        }
        self.bindings[id.0 as usize].name = new_name.to_string();

        debug!(%old_name, %new_name, sites = sites.len(), "binding renamed");
        sites.len()
    }

    /// A valid identifier derived from `base` that no binding visible from
    /// `scope`, no binding declared inside `scope`, no global and no earlier
    /// generated name uses. The first candidate is `base` itself, then
    /// `base2`, `base3`, ...
    pub fn generate_unique_name(&mut self, scope: ScopeId, base: &str) -> String {
        let mut attempt: u32 = 1;
        loop {
            let candidate = if attempt > 1 {
                to_identifier(&format!("{base}{attempt}"))
            } else {
                to_identifier(base)
            };
            if !self.name_in_use(scope, &candidate) || attempt >= MAX_UNIQUE_NAME_ATTEMPTS {
                if attempt >= MAX_UNIQUE_NAME_ATTEMPTS {
                    warn!(base, attempt, "unique name search exhausted");
                }
                self.generated_names.insert(candidate.clone());
                return candidate;
            }
            attempt += 1;
        }
    }

    pub fn is_generated_name(&self, name: &str) -> bool {
        self.generated_names.contains(name)
    }

    fn name_in_use(&self, scope: ScopeId, name: &str) -> bool {
        self.get_binding(scope, name).is_some()
            || self.descendant_declares(scope, name)
            || self.has_global(name)
            || self.generated_names.contains(name)
    }
}

/// Turn a shorthand property around `ident` into a keyed one, so renaming
/// `ident` leaves the key alone.
fn expand_shorthand(arena: &mut NodeArena, ident: NodeIndex) {
    let mut value = ident;
    let mut parent = arena.parent(ident);
    if let Some(NodeKind::AssignmentPattern { left, .. }) = arena.get(parent).map(|n| &n.kind)
        && *left == ident
    {
        value = parent;
        parent = arena.parent(parent);
    }
    let is_shorthand_value = matches!(
        arena.get(parent).map(|n| &n.kind),
        Some(NodeKind::ObjectProperty { value: v, shorthand: true, .. }) if *v == value
    );
    if is_shorthand_value
        && let NodeKind::ObjectProperty { shorthand, .. } = arena.kind_mut(parent)
    {
        *shorthand = false;
    }
}

#[cfg(test)]
#[path = "tests/rename_tests.rs"]
mod tests;
