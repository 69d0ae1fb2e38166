use super::*;
use unravel_parser::parse;

fn name_of(expression: &str, stable: bool) -> Option<String> {
    let parsed = parse(&format!("var v = {expression};")).unwrap();
    let arena = &parsed.arena;
    let decl = arena.statements(parsed.root).unwrap()[0];
    let NodeKind::VariableDeclaration { declarations, .. } = arena.kind(decl) else {
        panic!("expected a declaration");
    };
    let NodeKind::VariableDeclarator { init: Some(init), .. } = arena.kind(declarations[0]) else {
        panic!("expected an initializer");
    };
    expression_name(arena, *init, stable)
}

#[test]
fn test_title_case() {
    assert_eq!(title_case("hello world"), "HelloWorld");
    assert_eq!(title_case("a b\tc"), "ABC");
    assert_eq!(title_case("foo-bar"), "Foobar");
    assert_eq!(title_case("Already Upper"), "AlreadyUpper");
    assert_eq!(title_case("$x_1!"), "$x_1");
    assert_eq!(title_case("f_1_2"), "F_1_2");
    assert_eq!(title_case("héllo wörld"), "HlloWrld");
    assert_eq!(title_case(""), "");
}

#[test]
fn test_expression_names() {
    assert_eq!(name_of("foo", false).as_deref(), Some("foo"));
    assert_eq!(name_of("make(1)", false).as_deref(), Some("make"));
    assert_eq!(name_of("factory()()", false).as_deref(), Some("factory"));
    assert_eq!(name_of("this", false).as_deref(), Some("this"));
    assert_eq!(name_of("42", false).as_deref(), Some("LN42"));
    assert_eq!(name_of("1.5", false).as_deref(), Some("LN1.5"));
    assert_eq!(name_of("1e21", false).as_deref(), Some("LN1e+21"));
    assert_eq!(name_of("'hello world'", false).as_deref(), Some("LSHelloWorld"));
    assert_eq!(name_of("true", false).as_deref(), Some("Ltrue"));
    assert_eq!(name_of("class {}", false).as_deref(), Some("C"));
    assert_eq!(name_of("class Named {}", false).as_deref(), Some("Named"));
}

#[test]
fn test_string_names_are_truncated() {
    assert_eq!(
        name_of("'the quick brown fox jumps over'", false).as_deref(),
        Some("LSTheQuickBrownFoxJump")
    );
}

#[test]
fn test_shape_suffixes_only_when_stable() {
    assert_eq!(name_of("function () { a(); b(); }", false).as_deref(), Some("f"));
    assert_eq!(name_of("function () { a(); b(); }", true).as_deref(), Some("f_0_2"));
    assert_eq!(name_of("function named(x) {}", true).as_deref(), Some("f_1_0"));
    assert_eq!(name_of("(a, b) => a", true).as_deref(), Some("f_2_1"));
    assert_eq!(name_of("() => { a(); b(); c(); }", true).as_deref(), Some("f_0_3"));
    assert_eq!(name_of("{ a: 1, b: 2 }", false).as_deref(), Some("O"));
    assert_eq!(name_of("{ a: 1, b: 2 }", true).as_deref(), Some("O_2"));
    assert_eq!(name_of("[1, 2, 3]", false).as_deref(), Some("A"));
    assert_eq!(name_of("[1, 2, 3]", true).as_deref(), Some("A_3"));
}

#[test]
fn test_unnamed_expressions() {
    assert_eq!(name_of("a + b", false), None);
    assert_eq!(name_of("a.b", false), None);
    assert_eq!(name_of("null", false), None);
    assert_eq!(name_of("new Foo()", false), None);
    assert_eq!(expression_name(&NodeArena::new(), NodeIndex::NONE, true), None);
}

fn role_of(source: &str, name: &str, stable: bool) -> Option<String> {
    let parsed = parse(source).unwrap();
    let arena = &parsed.arena;
    let ident = arena
        .descendants(parsed.root)
        .into_iter()
        .find(|&n| arena.name(n) == Some(name))
        .unwrap_or_else(|| panic!("no identifier {name}"));
    role_name(arena, ident, stable)
}

#[test]
fn test_role_names() {
    assert_eq!(role_of("class K { a() {} b() {} }", "K", true).as_deref(), Some("C_2"));
    assert_eq!(role_of("class K {}", "K", false).as_deref(), Some("C"));
    assert_eq!(role_of("function g(a, b) {}", "g", true).as_deref(), Some("f_2"));
    assert_eq!(role_of("function g(a, b) {}", "b", true).as_deref(), Some("p"));
    assert_eq!(role_of("function g(a = 1) {}", "a", false).as_deref(), Some("p"));
    assert_eq!(role_of("var fs = require('fs');", "fs", false).as_deref(), Some("fs"));
    assert_eq!(role_of("var x = 'some text';", "x", false).as_deref(), Some("vLSSomeText"));
    assert_eq!(role_of("var x = 5;", "x", false).as_deref(), Some("vLN5"));
    assert_eq!(role_of("var x = 1e21;", "x", false).as_deref(), Some("vLN1e21"));
    assert_eq!(role_of("var x = a + b;", "x", false).as_deref(), Some("v"));
    assert_eq!(role_of("var x;", "x", false).as_deref(), Some("v"));
    assert_eq!(role_of("var x = () => 1;", "x", true).as_deref(), Some("vF_0_1"));
    assert_eq!(role_of("try {} catch (err) {}", "err", false).as_deref(), Some("e"));
    assert_eq!(role_of("var [first] = list;", "first", false).as_deref(), Some("v"));
    assert_eq!(role_of("var { key } = obj;", "key", false), None);
    assert_eq!(role_of("function g(...rest) {}", "rest", false), None);
}

#[test]
fn test_enclosing_names() {
    let parsed = parse("var o = { m() {} }; var g = function (a) { return a; };").unwrap();
    let arena = &parsed.arena;
    let functions: Vec<NodeIndex> = arena
        .descendants(parsed.root)
        .into_iter()
        .filter(|&n| matches!(arena.kind(n), NodeKind::FunctionExpression(_)))
        .collect();
    assert_eq!(functions.len(), 2);
    // Object methods contribute nothing; plain function expressions do.
    assert_eq!(enclosing_name(arena, functions[0], true), None);
    assert_eq!(enclosing_name(arena, functions[1], true).as_deref(), Some("f_1_1"));
    assert_eq!(enclosing_name(arena, parsed.root, true), None);
}
