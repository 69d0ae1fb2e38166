//! Declare phase (scopes and declarations) and resolve phase (references).

use tracing::trace;
use unravel_ast::{NodeArena, NodeIndex, NodeKind, VarKind};

use crate::binding::{Binding, BindingId, BindingKind, Reference, ReferenceKind};
use crate::scope::{ScopeId, ScopeKind};
use crate::state::{BinderState, PendingReference};

impl BinderState {
    // =========================================================================
    // Declare phase
    // =========================================================================

    /// Walk `idx`, opening scopes and declaring bindings. References are
    /// queued for `resolve_phase` so hoisted declarations are visible to
    /// earlier uses.
    pub(crate) fn declare_phase(&mut self, arena: &NodeArena, idx: NodeIndex, scope: ScopeId) {
        let Some(node) = arena.get(idx) else {
            return;
        };
        match &node.kind {
            NodeKind::Identifier { name } => {
                self.queue_reference(name, idx, scope, ReferenceKind::Read, true);
            }
            NodeKind::Program { body } => {
                for &stmt in body {
                    self.declare_phase(arena, stmt, scope);
                }
            }
            NodeKind::BlockStatement { body } => {
                let inner = self.enter_scope(ScopeKind::Block, idx, Some(scope));
                for &stmt in body {
                    self.declare_phase(arena, stmt, inner);
                }
            }
            NodeKind::VariableDeclaration { kind, declarations } => {
                let binding_kind = match kind {
                    VarKind::Var => BindingKind::Var,
                    VarKind::Let => BindingKind::Let,
                    VarKind::Const => BindingKind::Const,
                };
                let target = if kind.is_lexical() {
                    scope
                } else {
                    self.var_scope(scope)
                };
                for &declarator in declarations {
                    if let NodeKind::VariableDeclarator { id, init } = arena.kind(declarator) {
                        self.declare_pattern(arena, *id, binding_kind, target, scope);
                        if let Some(init) = init {
                            self.declare_phase(arena, *init, scope);
                        }
                    }
                }
            }
            NodeKind::FunctionDeclaration(func) => {
                if let Some(id) = func.id {
                    self.declare_identifier(arena, id, BindingKind::Function, scope);
                }
                let inner = self.enter_scope(ScopeKind::Function, idx, Some(scope));
                self.declare_function_parts(arena, &func.params, func.body, inner);
            }
            NodeKind::FunctionExpression(func) => {
                let inner = self.enter_scope(ScopeKind::Function, idx, Some(scope));
                if let Some(id) = func.id {
                    self.declare_identifier(arena, id, BindingKind::Function, inner);
                }
                self.declare_function_parts(arena, &func.params, func.body, inner);
            }
            NodeKind::ArrowFunctionExpression(arrow) => {
                let inner = self.enter_scope(ScopeKind::Function, idx, Some(scope));
                self.declare_function_parts(arena, &arrow.params, arrow.body, inner);
            }
            NodeKind::ClassDeclaration(class) => {
                if let Some(id) = class.id {
                    self.declare_identifier(arena, id, BindingKind::Class, scope);
                }
                if let Some(super_class) = class.super_class {
                    self.declare_phase(arena, super_class, scope);
                }
                let inner = self.enter_scope(ScopeKind::Class, idx, Some(scope));
                for &member in &class.body {
                    self.declare_phase(arena, member, inner);
                }
            }
            NodeKind::ClassExpression(class) => {
                if let Some(super_class) = class.super_class {
                    self.declare_phase(arena, super_class, scope);
                }
                let inner = self.enter_scope(ScopeKind::Class, idx, Some(scope));
                if let Some(id) = class.id {
                    self.declare_identifier(arena, id, BindingKind::Class, inner);
                }
                for &member in &class.body {
                    self.declare_phase(arena, member, inner);
                }
            }
            NodeKind::ClassMethod {
                key,
                computed,
                value,
                ..
            }
            | NodeKind::ObjectMethod {
                key,
                computed,
                value,
                ..
            } => {
                if *computed {
                    self.declare_phase(arena, *key, scope);
                }
                self.declare_phase(arena, *value, scope);
            }
            NodeKind::ClassProperty {
                key,
                value,
                computed,
                ..
            } => {
                if *computed {
                    self.declare_phase(arena, *key, scope);
                }
                if let Some(value) = value {
                    self.declare_phase(arena, *value, scope);
                }
            }
            NodeKind::ObjectProperty {
                key,
                value,
                computed,
                ..
            } => {
                if *computed {
                    self.declare_phase(arena, *key, scope);
                }
                self.declare_phase(arena, *value, scope);
            }
            NodeKind::MemberExpression {
                object,
                property,
                computed,
            } => {
                self.declare_phase(arena, *object, scope);
                if *computed {
                    self.declare_phase(arena, *property, scope);
                }
            }
            NodeKind::AssignmentExpression {
                operator,
                left,
                right,
            } => {
                let kind = if operator == "=" {
                    ReferenceKind::Write
                } else {
                    ReferenceKind::ReadWrite
                };
                self.assign_pattern(arena, *left, kind, scope);
                self.declare_phase(arena, *right, scope);
            }
            NodeKind::UpdateExpression { argument, .. } => {
                self.assign_pattern(arena, *argument, ReferenceKind::ReadWrite, scope);
            }
            NodeKind::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                let inner = self.enter_scope(ScopeKind::For, idx, Some(scope));
                for part in [init, test, update].into_iter().flatten() {
                    self.declare_phase(arena, *part, inner);
                }
                self.declare_phase(arena, *body, inner);
            }
            NodeKind::ForInStatement { left, right, body }
            | NodeKind::ForOfStatement { left, right, body } => {
                let inner = self.enter_scope(ScopeKind::For, idx, Some(scope));
                if matches!(arena.kind(*left), NodeKind::VariableDeclaration { .. }) {
                    self.declare_phase(arena, *left, inner);
                } else {
                    self.assign_pattern(arena, *left, ReferenceKind::Write, inner);
                }
                self.declare_phase(arena, *right, inner);
                self.declare_phase(arena, *body, inner);
            }
            NodeKind::SwitchStatement {
                discriminant,
                cases,
            } => {
                self.declare_phase(arena, *discriminant, scope);
                let inner = self.enter_scope(ScopeKind::Switch, idx, Some(scope));
                for &case in cases {
                    self.declare_phase(arena, case, inner);
                }
            }
            NodeKind::CatchClause { param, body } => {
                let inner = self.enter_scope(ScopeKind::Catch, idx, Some(scope));
                if let Some(param) = param {
                    self.declare_pattern(arena, *param, BindingKind::Catch, inner, inner);
                }
                self.declare_statements(arena, *body, inner);
            }
            NodeKind::ImportDeclaration { specifiers, .. } => {
                for &specifier in specifiers {
                    match arena.kind(specifier) {
                        NodeKind::ImportSpecifier { local, .. }
                        | NodeKind::ImportDefaultSpecifier { local }
                        | NodeKind::ImportNamespaceSpecifier { local } => {
                            self.declare_identifier(arena, *local, BindingKind::Import, scope);
                        }
                        _ => {}
                    }
                }
            }
            NodeKind::ExportNamedDeclaration {
                declaration,
                specifiers,
                source,
            } => {
                if let Some(declaration) = declaration {
                    self.declare_phase(arena, *declaration, scope);
                    self.queue_export_of(arena, idx, *declaration, scope);
                }
                if source.is_none() {
                    for &specifier in specifiers {
                        if let NodeKind::ExportSpecifier { local, .. } = arena.kind(specifier)
                            && let Some(name) = arena.name(*local)
                        {
                            self.queue_reference(name, *local, scope, ReferenceKind::Export, true);
                        }
                    }
                }
            }
            NodeKind::ExportDefaultDeclaration { declaration } => {
                self.declare_phase(arena, *declaration, scope);
                if matches!(
                    arena.kind(*declaration),
                    NodeKind::FunctionDeclaration(_) | NodeKind::ClassDeclaration(_)
                ) {
                    self.queue_export_of(arena, idx, *declaration, scope);
                }
            }
            _ => {
                for child in arena.children(idx) {
                    self.declare_phase(arena, child, scope);
                }
            }
        }
    }

    /// Parameters and body of a function whose scope is `scope`. A block body
    /// shares the function scope.
    fn declare_function_parts(
        &mut self,
        arena: &NodeArena,
        params: &[NodeIndex],
        body: NodeIndex,
        scope: ScopeId,
    ) {
        for &param in params {
            self.declare_pattern(arena, param, BindingKind::Param, scope, scope);
        }
        self.declare_statements(arena, body, scope);
    }

    /// Visit a block's statements in `scope` without opening a block scope.
    fn declare_statements(&mut self, arena: &NodeArena, body: NodeIndex, scope: ScopeId) {
        match arena.get(body).map(|node| &node.kind) {
            Some(NodeKind::BlockStatement { body: statements }) => {
                for &stmt in statements {
                    self.declare_phase(arena, stmt, scope);
                }
            }
            Some(_) => self.declare_phase(arena, body, scope),
            None => {}
        }
    }

    /// Declare every identifier bound by `pattern` in `target`. Default
    /// values and computed keys are evaluated in `scope`.
    fn declare_pattern(
        &mut self,
        arena: &NodeArena,
        pattern: NodeIndex,
        kind: BindingKind,
        target: ScopeId,
        scope: ScopeId,
    ) {
        let Some(node) = arena.get(pattern) else {
            return;
        };
        match &node.kind {
            NodeKind::Identifier { .. } => {
                self.declare_identifier(arena, pattern, kind, target);
            }
            NodeKind::ArrayPattern { elements } => {
                for element in elements.iter().flatten() {
                    self.declare_pattern(arena, *element, kind, target, scope);
                }
            }
            NodeKind::ObjectPattern { properties } => {
                for &property in properties {
                    match arena.kind(property) {
                        NodeKind::ObjectProperty {
                            key,
                            value,
                            computed,
                            ..
                        } => {
                            if *computed {
                                self.declare_phase(arena, *key, scope);
                            }
                            self.declare_pattern(arena, *value, kind, target, scope);
                        }
                        NodeKind::RestElement { argument } => {
                            self.declare_pattern(arena, *argument, kind, target, scope);
                        }
                        _ => {}
                    }
                }
            }
            NodeKind::AssignmentPattern { left, right } => {
                self.declare_pattern(arena, *left, kind, target, scope);
                self.declare_phase(arena, *right, scope);
            }
            NodeKind::RestElement { argument } => {
                self.declare_pattern(arena, *argument, kind, target, scope);
            }
            _ => self.declare_phase(arena, pattern, scope),
        }
    }

    /// Queue references for the identifiers an assignment target writes.
    fn assign_pattern(
        &mut self,
        arena: &NodeArena,
        pattern: NodeIndex,
        kind: ReferenceKind,
        scope: ScopeId,
    ) {
        let Some(node) = arena.get(pattern) else {
            return;
        };
        match &node.kind {
            NodeKind::Identifier { name } => {
                self.queue_reference(name, pattern, scope, kind, true);
            }
            NodeKind::ArrayPattern { elements } => {
                for element in elements.iter().flatten() {
                    self.assign_pattern(arena, *element, kind, scope);
                }
            }
            NodeKind::ObjectPattern { properties } => {
                for &property in properties {
                    match arena.kind(property) {
                        NodeKind::ObjectProperty {
                            key,
                            value,
                            computed,
                            ..
                        } => {
                            if *computed {
                                self.declare_phase(arena, *key, scope);
                            }
                            self.assign_pattern(arena, *value, kind, scope);
                        }
                        NodeKind::RestElement { argument } => {
                            self.assign_pattern(arena, *argument, kind, scope);
                        }
                        _ => {}
                    }
                }
            }
            NodeKind::AssignmentPattern { left, right } => {
                self.assign_pattern(arena, *left, kind, scope);
                self.declare_phase(arena, *right, scope);
            }
            NodeKind::RestElement { argument } => {
                self.assign_pattern(arena, *argument, kind, scope);
            }
            _ => self.declare_phase(arena, pattern, scope),
        }
    }

    /// Declare the identifier `ident` in `scope`, merging with an existing
    /// binding of the same name (`var` redeclaration).
    pub(crate) fn declare_identifier(
        &mut self,
        arena: &NodeArena,
        ident: NodeIndex,
        kind: BindingKind,
        scope: ScopeId,
    ) -> Option<BindingId> {
        let name = arena.name(ident)?;
        let existing = self.scope(scope).and_then(|s| s.own_binding(name));
        let id = match existing {
            Some(id) => {
                let binding = &mut self.bindings[id.0 as usize];
                if !binding.declarations.contains(&ident) {
                    binding.declarations.push(ident);
                }
                id
            }
            None => {
                let id = BindingId(self.bindings.len() as u32);
                self.bindings.push(Binding::new(name, scope, kind, ident));
                self.scopes[scope.0 as usize]
                    .bindings
                    .insert(name.to_string(), id);
                id
            }
        };
        self.identifier_bindings.insert(ident, id);
        Some(id)
    }

    fn queue_reference(
        &mut self,
        name: &str,
        node: NodeIndex,
        scope: ScopeId,
        kind: ReferenceKind,
        is_identifier: bool,
    ) {
        self.pending.push(PendingReference {
            name: name.to_string(),
            scope,
            reference: Reference { node, kind },
            is_identifier,
        });
    }

    /// Queue an export reference (`export_node`) for every binding
    /// `declaration` introduces.
    fn queue_export_of(
        &mut self,
        arena: &NodeArena,
        export_node: NodeIndex,
        declaration: NodeIndex,
        scope: ScopeId,
    ) {
        let mut names = Vec::new();
        match arena.kind(declaration) {
            NodeKind::FunctionDeclaration(func) => names.extend(func.id),
            NodeKind::ClassDeclaration(class) => names.extend(class.id),
            NodeKind::VariableDeclaration { declarations, .. } => {
                for &declarator in declarations {
                    if let NodeKind::VariableDeclarator { id, .. } = arena.kind(declarator) {
                        collect_pattern_identifiers(arena, *id, &mut names);
                    }
                }
            }
            _ => {}
        }
        for ident in names {
            if let Some(name) = arena.name(ident) {
                self.queue_reference(name, export_node, scope, ReferenceKind::Export, false);
            }
        }
    }

    // =========================================================================
    // Resolve phase
    // =========================================================================

    /// Attach every queued reference to the binding it resolves to, or record
    /// it as a global.
    pub(crate) fn resolve_phase(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for item in pending {
            match self.get_binding(item.scope, &item.name) {
                Some(id) => {
                    self.bindings[id.0 as usize].references.push(item.reference);
                    if item.is_identifier {
                        self.identifier_bindings.insert(item.reference.node, id);
                    }
                }
                None => {
                    trace!(name = %item.name, "unresolved reference");
                    if item.is_identifier {
                        self.unresolved.insert(item.reference.node, item.name.clone());
                    }
                    *self.globals.entry(item.name).or_default() += 1;
                }
            }
        }
    }
}

/// Identifiers bound by a declaration pattern, in source order.
pub(crate) fn collect_pattern_identifiers(
    arena: &NodeArena,
    pattern: NodeIndex,
    out: &mut Vec<NodeIndex>,
) {
    let Some(node) = arena.get(pattern) else {
        return;
    };
    match &node.kind {
        NodeKind::Identifier { .. } => out.push(pattern),
        NodeKind::ArrayPattern { elements } => {
            for element in elements.iter().flatten() {
                collect_pattern_identifiers(arena, *element, out);
            }
        }
        NodeKind::ObjectPattern { properties } => {
            for &property in properties {
                match arena.kind(property) {
                    NodeKind::ObjectProperty { value, .. } => {
                        collect_pattern_identifiers(arena, *value, out);
                    }
                    NodeKind::RestElement { argument } => {
                        collect_pattern_identifiers(arena, *argument, out);
                    }
                    _ => {}
                }
            }
        }
        NodeKind::AssignmentPattern { left, .. } => collect_pattern_identifiers(arena, *left, out),
        NodeKind::RestElement { argument } => collect_pattern_identifiers(arena, *argument, out),
        _ => {}
    }
}
