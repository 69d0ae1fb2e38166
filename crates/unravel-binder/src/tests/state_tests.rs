//! Declaration and reference resolution.

use super::*;
use crate::binding::{BindingKind, ReferenceKind};
use unravel_ast::NodeKind;
use unravel_parser::parse;

struct Bound {
    arena: NodeArena,
    root: NodeIndex,
    binder: BinderState,
}

fn bind_source(source: &str) -> Bound {
    let parsed = parse(source).unwrap_or_else(|err| panic!("parse failed for {source:?}: {err}"));
    let binder = BinderState::bind(&parsed.arena, parsed.root);
    Bound {
        arena: parsed.arena,
        root: parsed.root,
        binder,
    }
}

fn bindings_named<'a>(binder: &'a BinderState, name: &str) -> Vec<&'a Binding> {
    binder
        .bindings()
        .filter(|(_, b)| b.name == name)
        .map(|(_, b)| b)
        .collect()
}

fn only_binding<'a>(binder: &'a BinderState, name: &str) -> &'a Binding {
    let found = bindings_named(binder, name);
    assert_eq!(found.len(), 1, "expected exactly one binding named {name}");
    found[0]
}

#[test]
fn test_var_hoists_to_function_scope() {
    let bound = bind_source("function f() { if (x) { var a = 1; } return a; }");
    let a = only_binding(&bound.binder, "a");
    let scope = bound.binder.scope(a.scope).unwrap();
    assert_eq!(scope.kind, ScopeKind::Function);
    assert_eq!(a.kind, BindingKind::Var);
    assert!(a.is_referenced());
    assert!(!a.is_written());
}

#[test]
fn test_let_is_block_scoped() {
    let bound = bind_source("let a = 1; { let a = 2; a; a; } a;");
    let found = bindings_named(&bound.binder, "a");
    assert_eq!(found.len(), 2);
    let outer = found
        .iter()
        .find(|b| b.scope == bound.binder.program_scope())
        .unwrap();
    let inner = found
        .iter()
        .find(|b| b.scope != bound.binder.program_scope())
        .unwrap();
    assert_eq!(outer.reference_count(), 1);
    assert_eq!(inner.reference_count(), 2);
}

#[test]
fn test_reference_kinds() {
    let bound = bind_source("var a = 0; a = 1; a += 2; a++; f(a);");
    let a = only_binding(&bound.binder, "a");
    let kinds: Vec<ReferenceKind> = a.references.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ReferenceKind::Write,
            ReferenceKind::ReadWrite,
            ReferenceKind::ReadWrite,
            ReferenceKind::Read,
        ]
    );
    assert!(a.is_written());
    assert_eq!(a.reference_count(), 3);
}

#[test]
fn test_for_in_left_is_write() {
    let bound = bind_source("var k; for (k in o) {} for (var j of o) {}");
    assert!(only_binding(&bound.binder, "k").is_written());
    assert!(!only_binding(&bound.binder, "j").is_written());
}

#[test]
fn test_var_redeclaration_merges() {
    let bound = bind_source("var a = 1; var a = 2;");
    let a = only_binding(&bound.binder, "a");
    assert_eq!(a.declarations.len(), 2);
    assert!(a.is_written());
}

#[test]
fn test_unresolved_names_are_globals() {
    let bound = bind_source("console.log(x);");
    assert!(bound.binder.has_global("console"));
    assert!(bound.binder.has_global("x"));
    assert!(!bound.binder.has_global("log"));
    assert_eq!(bound.binder.binding_count(), 0);
}

#[test]
fn test_exports_are_references() {
    let bound = bind_source(
        "export const a = 1; export function b() {} const c = 2; export { c }; const d = 3;",
    );
    let binder = &bound.binder;
    for name in ["a", "b", "c"] {
        assert!(only_binding(binder, name).is_exported(), "{name} should be exported");
    }
    assert!(!only_binding(binder, "d").is_exported());

    let a = only_binding(binder, "a");
    assert!(matches!(
        bound.arena.kind(a.references[0].node),
        NodeKind::ExportNamedDeclaration { .. }
    ));
    let c = only_binding(binder, "c");
    assert_eq!(bound.arena.name(c.references[0].node), Some("c"));
}

#[test]
fn test_import_specifiers_declare_locals() {
    let bound = bind_source("import d, { x as y } from 'm'; y(d);");
    let y = only_binding(&bound.binder, "y");
    assert_eq!(y.kind, BindingKind::Import);
    assert!(y.is_referenced());
    assert!(bindings_named(&bound.binder, "x").is_empty());
    assert!(!bound.binder.has_global("x"));
}

#[test]
fn test_named_function_expression_scope() {
    let bound = bind_source("var g = function h() { h(); }; h;");
    let h = only_binding(&bound.binder, "h");
    assert_eq!(
        bound.binder.scope(h.scope).map(|s| s.kind),
        Some(ScopeKind::Function)
    );
    assert_eq!(h.reference_count(), 1);
    assert!(bound.binder.has_global("h"));
}

#[test]
fn test_catch_and_patterns() {
    let bound = bind_source("try {} catch (e) { e; } const { a, b: c, ...rest } = o; const [x, , y = a] = o;");
    let binder = &bound.binder;
    assert_eq!(only_binding(binder, "e").kind, BindingKind::Catch);
    for name in ["a", "c", "rest", "x", "y"] {
        assert_eq!(only_binding(binder, name).kind, BindingKind::Const);
    }
    assert!(bindings_named(binder, "b").is_empty());
    assert_eq!(only_binding(binder, "a").reference_count(), 1);
}

#[test]
fn test_shorthand_property_reads_binding() {
    let bound = bind_source("var a; ({ a });");
    assert_eq!(only_binding(&bound.binder, "a").reference_count(), 1);
}

#[test]
fn test_binding_of_and_scope_of() {
    let bound = bind_source("function f(p) { { let q = p; } }");
    let binder = &bound.binder;
    let q = only_binding(binder, "q");
    let p = only_binding(binder, "p");
    assert_eq!(p.kind, BindingKind::Param);

    let q_ident = q.identifier();
    let q_id = binder.binding_of(q_ident).unwrap();
    assert_eq!(binder.binding(q_id).map(|b| b.name.as_str()), Some("q"));

    let scope = binder.scope_of(&bound.arena, q_ident);
    assert_eq!(scope, q.scope);
    assert_eq!(binder.scope(scope).map(|s| s.kind), Some(ScopeKind::Block));
    assert_eq!(binder.get_binding(scope, "p"), binder.binding_of(p.identifier()));
    assert_eq!(binder.get_binding(binder.program_scope(), "q"), None);
    assert!(bound.arena.is_attached(q_ident, bound.root));
}

#[test]
fn test_rebinding_keeps_generated_names() {
    let parsed = parse("var a;").unwrap();
    let mut binder = BinderState::bind(&parsed.arena, parsed.root);
    let name = binder.generate_unique_name(binder.program_scope(), "a");
    assert_eq!(name, "a2");
    binder.bind_program(&parsed.arena, parsed.root);
    assert!(binder.is_generated_name("a2"));
}
