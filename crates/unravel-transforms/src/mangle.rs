//! Identifier mangling.
//!
//! Minified and obfuscated names carry no meaning, so bindings are renamed
//! after the role of their declaration: `C` for classes, `f` for functions,
//! `p` for parameters, `e` for catch parameters and `v` plus a hint from the
//! initializer for variables. Stable mode folds reference counts and the
//! enclosing functions into the name so unrelated edits elsewhere in a
//! program do not shift it.

use rustc_hash::FxHashSet;
use tracing::trace;
use unravel_ast::{NodeIndex, NodeKind};
use unravel_binder::BindingId;

use crate::naming::{enclosing_name, role_name, title_case};
use crate::transform::{Transform, TransformContext};

/// What to do with a binding, decided from its current name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MangleMode {
    Skip,
    Rename,
    /// Rename with shape-derived suffixes.
    Stable,
}

pub struct Mangle<F = fn(&str) -> MangleMode> {
    filter: F,
    renamed: FxHashSet<BindingId>,
}

impl Mangle {
    /// Rename every binding.
    pub fn all() -> Self {
        Mangle::new(rename_all as fn(&str) -> MangleMode)
    }

    /// Rename every binding in stable mode.
    pub fn stable() -> Self {
        Mangle::new(rename_all_stable as fn(&str) -> MangleMode)
    }
}

fn rename_all(_name: &str) -> MangleMode {
    MangleMode::Rename
}

fn rename_all_stable(_name: &str) -> MangleMode {
    MangleMode::Stable
}

impl<F: Fn(&str) -> MangleMode> Mangle<F> {
    pub fn new(filter: F) -> Self {
        Mangle {
            filter,
            renamed: FxHashSet::default(),
        }
    }

    fn mangle(&mut self, cx: &mut TransformContext<'_>, ident: NodeIndex) {
        let program = &mut *cx.program;
        let Some(id) = program.binder.binding_of(ident) else {
            return;
        };
        if self.renamed.contains(&id) {
            return;
        }
        let Some(binding) = program.binder.binding(id) else {
            return;
        };
        if binding.identifier() != ident || binding.is_exported() {
            return;
        }
        if matches!(
            program.arena.get(program.arena.parent(ident)).map(|n| &n.kind),
            Some(NodeKind::ImportSpecifier { .. } | NodeKind::ObjectProperty { .. })
        ) {
            return;
        }
        let stable = match (self.filter)(&binding.name) {
            MangleMode::Skip => return,
            MangleMode::Rename => false,
            MangleMode::Stable => true,
        };
        let Some(mut base) = role_name(&program.arena, ident, stable) else {
            return;
        };
        if stable {
            base.push_str(&format!("_{}_", binding.reference_count()));
            for ancestor in program.arena.ancestors(ident) {
                if let Some(name) = enclosing_name(&program.arena, ancestor, stable) {
                    base.push_str(&title_case(&name));
                }
            }
        }
        let scope = binding.scope;
        self.renamed.insert(id);

        let new_name = program.binder.generate_unique_name(scope, &base);
        let sites = program
            .binder
            .rename_fast(&mut program.arena, id, &new_name);
        trace!(%new_name, sites, "binding mangled");
        cx.add_changes(sites);
    }
}

impl<F: Fn(&str) -> MangleMode> Transform for Mangle<F> {
    fn name(&self) -> &'static str {
        "mangle"
    }

    fn requires_scope(&self) -> bool {
        true
    }

    fn visits(&self, kind: &NodeKind) -> bool {
        matches!(kind, NodeKind::Identifier { .. })
    }

    fn exit(&mut self, cx: &mut TransformContext<'_>, node: NodeIndex) {
        self.mangle(cx, node);
    }
}

#[cfg(test)]
#[path = "tests/mangle_tests.rs"]
mod tests;
