//! Parser tests: parse, print and compare normalized output.

use super::*;
use unravel_ast::Printer;

fn roundtrip(source: &str) -> String {
    let parsed = parse(source).unwrap_or_else(|err| panic!("parse failed for {source:?}: {err}"));
    Printer::print(&parsed.arena, parsed.root)
}

fn parse_err(source: &str) -> ParseError {
    match parse(source) {
        Ok(_) => panic!("expected a parse error for {source:?}"),
        Err(err) => err,
    }
}

#[test]
fn test_variable_declarations() {
    assert_eq!(roundtrip("var a = 1, b;"), "var a = 1, b;");
    assert_eq!(roundtrip("let x = 'y'"), "let x = \"y\";");
    assert_eq!(
        roundtrip("const {a, b: [c, d = 1], ...e} = obj;"),
        "const { a, b: [c, d = 1], ...e } = obj;"
    );
}

#[test]
fn test_automatic_semicolons() {
    assert_eq!(roundtrip("a = 1\nb = 2"), "a = 1;\nb = 2;");
    assert_eq!(roundtrip("function f() { return }"), "function f() {\n    return;\n}");
    assert!(matches!(
        parse_err("a = 1 b = 2"),
        ParseError::UnexpectedToken { .. }
    ));
}

#[test]
fn test_functions() {
    assert_eq!(
        roundtrip("function f(a, b = 2, ...rest) { return a + b; }"),
        "function f(a, b = 2, ...rest) {\n    return a + b;\n}"
    );
    assert_eq!(roundtrip("x = function () {};"), "x = function () {};");
    assert_eq!(roundtrip("x = function named() {};"), "x = function named() {};");
    assert_eq!(roundtrip("async function* g() {}"), "async function* g() {}");
}

#[test]
fn test_arrow_functions() {
    assert_eq!(roundtrip("f = x => x * 2;"), "f = (x) => x * 2;");
    assert_eq!(roundtrip("f = (a, b) => { return a; };"), "f = (a, b) => {\n    return a;\n};");
    assert_eq!(roundtrip("f = () => ({});"), "f = () => ({});");
    assert_eq!(roundtrip("f = async x => await x;"), "f = async (x) => await x;");

    let parsed = parse("f = ([a], {b}) => a;").expect("parse");
    let arrow = parsed
        .arena
        .descendants(parsed.root)
        .into_iter()
        .find(|&n| matches!(parsed.arena.kind(n), NodeKind::ArrowFunctionExpression(_)))
        .expect("arrow");
    let params = parsed.arena.kind(arrow).params().expect("params");
    assert!(matches!(parsed.arena.kind(params[0]), NodeKind::ArrayPattern { .. }));
    assert!(matches!(parsed.arena.kind(params[1]), NodeKind::ObjectPattern { .. }));
}

#[test]
fn test_precedence_is_preserved() {
    assert_eq!(roundtrip("(a + b) * c;"), "(a + b) * c;");
    assert_eq!(roundtrip("a + b * c;"), "a + b * c;");
    assert_eq!(roundtrip("a ? b : c ? d : e;"), "a ? b : c ? d : e;");
    assert_eq!(roundtrip("(a, b);"), "a, b;");
    assert_eq!(roundtrip("a ** b ** c;"), "a ** b ** c;");
    assert_eq!(roundtrip("a || b && c;"), "a || b && c;");
    assert_eq!(roundtrip("!(a && b);"), "!(a && b);");
    assert_eq!(roundtrip("x = !0, y = !![];"), "x = !0, y = !![];");
    assert_eq!(roundtrip("void 0;"), "void 0;");
}

#[test]
fn test_member_call_new() {
    assert_eq!(roundtrip("a.b[c](d, ...e);"), "a.b[c](d, ...e);");
    assert_eq!(roundtrip("new Foo(1).bar;"), "new Foo(1).bar;");
    assert_eq!(roundtrip("new Foo;"), "new Foo();");
    assert_eq!(roundtrip("x.if = x.class;"), "x.if = x.class;");
    assert_eq!(roundtrip("\"a|b\".split(\"|\");"), "\"a|b\".split(\"|\");");
}

#[test]
fn test_update_expressions() {
    assert_eq!(roundtrip("a[i++];"), "a[i++];");
    assert_eq!(roundtrip("--x;"), "--x;");
    assert!(matches!(
        parse_err("1++;"),
        ParseError::InvalidAssignmentTarget { .. }
    ));
}

#[test]
fn test_literals() {
    assert_eq!(roundtrip("x = [1, , 2, ,];"), "x = [1, , 2, ,];");
    assert_eq!(roundtrip("x = {\"a\": 1, b, [c]: 2, d() {}};"), "x = { \"a\": 1, b, [c]: 2, d() {} };");
    assert_eq!(roundtrip("x = {get a() { return 1; }, set a(v) {}};"), "x = { get a() {\n    return 1;\n}, set a(v) {} };");
    assert_eq!(roundtrip("x = null, y = this, z = true;"), "x = null, y = this, z = true;");
    assert_eq!(roundtrip("x = 0x10;"), "x = 16;");
}

#[test]
fn test_control_flow_statements() {
    assert_eq!(
        roundtrip("for (var i = 0; i < n; i++) x();"),
        "for (var i = 0; i < n; i++) x();"
    );
    assert_eq!(roundtrip("for (;;) {}"), "for (;;) {}");
    assert_eq!(roundtrip("for (const k in obj) {}"), "for (const k in obj) {}");
    assert_eq!(roundtrip("for ([a, b] of pairs) {}"), "for ([a, b] of pairs) {}");
    assert_eq!(roundtrip("while (true) break;"), "while (true) break;");
    assert_eq!(roundtrip("do x(); while (y)"), "do x(); while (y);");
    assert_eq!(
        roundtrip("if (a) b(); else { c(); }"),
        "if (a) b();\nelse {\n    c();\n}"
    );
    assert_eq!(
        roundtrip("outer: for (;;) { continue outer; }"),
        "outer: for (;;) {\n    continue outer;\n}"
    );
}

#[test]
fn test_switch_statement() {
    assert_eq!(
        roundtrip("switch (x) { case '0': a(); continue; case '1': b(); default: c(); }"),
        "switch (x) {\n    case \"0\":\n        a();\n        continue;\n    case \"1\":\n        b();\n    default:\n        c();\n}"
    );
}

#[test]
fn test_try_statement() {
    assert_eq!(
        roundtrip("try { a(); } catch (e) { b(e); } finally { c(); }"),
        "try {\n    a();\n} catch (e) {\n    b(e);\n} finally {\n    c();\n}"
    );
    assert_eq!(roundtrip("try {} catch {}"), "try {} catch {}");
    assert!(matches!(parse_err("try {}"), ParseError::UnexpectedToken { .. }));
}

#[test]
fn test_classes() {
    assert_eq!(
        roundtrip("class A extends B { constructor(x) { this.x = x; } static get y() { return 1; } z = 2; }"),
        "class A extends B {\n    constructor(x) {\n        this.x = x;\n    }\n    static get y() {\n        return 1;\n    }\n    z = 2;\n}"
    );
    let parsed = parse("class A { constructor() {} get() {} }").expect("parse");
    let kinds: Vec<MethodKind> = parsed
        .arena
        .descendants(parsed.root)
        .into_iter()
        .filter_map(|n| match parsed.arena.kind(n) {
            NodeKind::ClassMethod { kind, .. } => Some(*kind),
            _ => None,
        })
        .collect();
    assert_eq!(kinds, vec![MethodKind::Constructor, MethodKind::Method]);
}

#[test]
fn test_modules() {
    assert_eq!(
        roundtrip("import a, { b as c, d } from 'm';"),
        "import a, { b as c, d } from \"m\";"
    );
    assert_eq!(roundtrip("import * as ns from 'm';"), "import * as ns from \"m\";");
    assert_eq!(roundtrip("import 'side-effect';"), "import \"side-effect\";");
    assert_eq!(roundtrip("export { x as y, z };"), "export { x as y, z };");
    assert_eq!(roundtrip("export const a = 1;"), "export const a = 1;");
    assert_eq!(roundtrip("export default function () {}"), "export default function () {}");
    assert_eq!(roundtrip("export default a + b;"), "export default a + b;");
}

#[test]
fn test_unsupported_syntax() {
    assert!(matches!(parse_err("x = /re/;"), ParseError::Unsupported { .. }));
    assert!(matches!(parse_err("a?.b;"), ParseError::Unsupported { .. }));
    assert!(matches!(parse_err("export * from 'm';"), ParseError::Unsupported { .. }));
}

#[test]
fn test_error_positions() {
    let err = parse_err("var 1 = 2;");
    assert_eq!(err.pos(), 4);
    assert!(err.to_string().contains("expected identifier"));
    assert_eq!(parse_err("f(").pos(), 2);
    assert!(matches!(parse_err("f("), ParseError::UnexpectedEnd { .. }));
}

#[test]
fn test_deep_nesting_is_an_error() {
    // Debug-build frames are large; give the recursion room to reach the limit.
    let handle = std::thread::Builder::new()
        .stack_size(256 * 1024 * 1024)
        .spawn(|| {
            let source = format!("{}x{};", "(".repeat(2_000), ")".repeat(2_000));
            parse_err(&source)
        })
        .expect("spawn parser thread");
    let err = handle.join().expect("parser thread panicked");
    assert!(matches!(err, ParseError::TooDeep { .. }));
}

#[test]
fn test_parents_are_set() {
    let parsed = parse("function f(a) { return a.b; }").expect("parse");
    for node in parsed.arena.descendants(parsed.root) {
        for child in parsed.arena.children(node) {
            assert_eq!(parsed.arena.parent(child), node);
        }
    }
}
