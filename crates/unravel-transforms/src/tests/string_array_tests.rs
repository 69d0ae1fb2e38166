use super::*;
use unravel_common::{CollectingSink, NoopSink, TransformOptions};
use unravel_parser::parse;

fn program(source: &str) -> Program {
    let parsed = parse(source).unwrap();
    Program::new(parsed.arena, parsed.root)
}

fn resolve(source: &str) -> (String, Option<StringArray>) {
    let mut program = program(source);
    let found = find_string_array(&mut program, &mut NoopSink);
    (program.print(), found)
}

fn assert_unchanged(source: &str) {
    let expected = program(source).print();
    let mut program = program(source);
    let state = apply_transform(&mut program, &mut StringArrayTransform::new(), &mut NoopSink);
    assert_eq!(state.changes, 0, "unexpected rewrite of:\n{source}");
    assert_eq!(program.print(), expected);
}

// =============================================================================
// Plain arrays
// =============================================================================

#[test]
fn test_inlines_plain_array() {
    let mut program = program(r#"var arr = ["a", "b", "c"]; log(arr[0], arr[1]);"#);
    let state = apply_transform(&mut program, &mut StringArrayTransform::new(), &mut NoopSink);

    assert_eq!(program.print(), "log(\"a\", \"b\");");
    assert_eq!(state.changes, 3);
    assert!(program.binder.bindings().all(|(_, b)| b.name != "arr"));
}

#[test]
fn test_plain_array_is_not_reported_as_wrapped() {
    let (output, found) = resolve(r#"const words = ["x"]; say(words[0]);"#);
    assert_eq!(output, "say(\"x\");");
    assert_eq!(found, None);
}

#[test]
fn test_repeated_index_yields_distinct_nodes() {
    let mut program = program(r#"var arr = ["x"]; f(arr[0], arr[0]);"#);
    apply_transform(&mut program, &mut StringArrayTransform::new(), &mut NoopSink);
    assert_eq!(program.print(), "f(\"x\", \"x\");");

    let stmt = program.arena.statements(program.root).unwrap()[0];
    let NodeKind::ExpressionStatement { expression } = program.arena.kind(stmt) else {
        panic!("expected an expression statement");
    };
    let NodeKind::CallExpression { arguments, .. } = program.arena.kind(*expression) else {
        panic!("expected a call");
    };
    assert_ne!(arguments[0], arguments[1]);
    assert_eq!(program.arena.parent(arguments[0]), *expression);
}

#[test]
fn test_holes_and_undefined_entries() {
    let (output, _) = resolve(r#"var arr = ["a", , undefined, void 0]; f(arr[1], arr[2], arr[3]);"#);
    assert_eq!(output, "f(void 0, undefined, void 0);");
}

#[test]
fn test_split_array_entries() {
    let (output, _) = resolve(r#"var parts = "a,b,c".split(","); f(parts[2] + parts[0]);"#);
    assert_eq!(output, "f(\"c\" + \"a\");");

    let (output, _) = resolve(r#"var chars = "xyz".split(""); f(chars[1]);"#);
    assert_eq!(output, "f(\"y\");");
}

#[test]
fn test_inlines_inside_functions() {
    let (output, _) = resolve(
        r#"
        function greet(name) {
            var t = ["Hello, ", "!"];
            return t[0] + name + t[1];
        }
        "#,
    );
    assert_eq!(
        output,
        "function greet(name) {\n    return \"Hello, \" + name + \"!\";\n}"
    );
}

#[test]
fn test_skips_written_arrays() {
    assert_unchanged(r#"var arr = ["a"]; arr[0] = "b"; log(arr[0]);"#);
    assert_unchanged(r#"var arr = ["a"]; arr = []; log(arr[0]);"#);
    assert_unchanged(r#"var arr = ["a"]; arr[0]++; log(arr[0]);"#);
    assert_unchanged(r#"var arr = ["a"]; delete arr[0]; log(arr[0]);"#);
    assert_unchanged(r#"var arr = ["a"]; var arr; log(arr[0]);"#);
}

#[test]
fn test_skips_non_constant_access() {
    assert_unchanged(r#"var arr = ["a", "b"]; log(arr[i]);"#);
    assert_unchanged(r#"var arr = ["a", "b"]; log(arr[2]);"#);
    assert_unchanged(r#"var arr = ["a", "b"]; log(arr[-1]);"#);
    assert_unchanged(r#"var arr = ["a", "b"]; log(arr[0.5]);"#);
    assert_unchanged(r#"var arr = ["a", "b"]; log(arr.length);"#);
    assert_unchanged(r#"var arr = ["a", "b"]; log(arr);"#);
}

#[test]
fn test_skips_unreferenced_and_mixed_arrays() {
    assert_unchanged(r#"var arr = ["a", "b"];"#);
    assert_unchanged(r#"var arr = ["a", 1]; log(arr[0]);"#);
    assert_unchanged(r#"var arr = ["a"], other = 1; log(arr[0]);"#);
    assert_unchanged(r#"export var arr = ["a"]; log(arr[0]);"#);
}

// =============================================================================
// Wrapped arrays
// =============================================================================

const WRAPPED_SPLIT: &str = r#"
function _0x1() {
    var arr = "x,y,z".split(",");
    _0x1 = function () {
        return arr;
    };
    return _0x1();
}
log(_0x1()[0], _0x1()[2]);
"#;

#[test]
fn test_wrapped_split_accessor() {
    let mut program = program(WRAPPED_SPLIT);
    let mut sink = CollectingSink::new();
    let mut transform = StringArrayTransform::new();
    let state = apply_transform(&mut program, &mut transform, &mut sink);
    let found = transform.into_result().expect("wrapped array");

    assert_eq!(found.length, 3);
    assert_eq!(found.name, "__STRING_ARRAY__");
    assert_eq!(found.original_name, "_0x1");
    // `return _0x1()` and the two call sites; the self-reassignment is a write.
    assert_eq!(found.references.len(), 3);
    for &reference in &found.references {
        assert_eq!(program.arena.name(reference), Some("__STRING_ARRAY__"));
        assert!(matches!(
            program.arena.kind(program.arena.parent(reference)),
            NodeKind::CallExpression { .. }
        ));
    }
    assert_eq!(state.changes, 4);

    let output = program.print();
    assert!(!output.contains("_0x1"));
    assert!(output.contains("log(__STRING_ARRAY__()[0], __STRING_ARRAY__()[2]);"));
    // The array inside the accessor is returned whole and stays.
    assert!(output.contains("var arr = \"x,y,z\".split(\",\");"));
    assert_eq!(
        sink.messages().collect::<Vec<_>>(),
        ["string array _0x1, length 3"]
    );
}

#[test]
fn test_wrapped_inline_reassignment() {
    let (output, found) = resolve(
        r#"
        function a(b, c) {
            var d = ["p", "q", , undefined];
            return (a = function (e, f) { return d; })();
        }
        a()[1];
        "#,
    );
    let found = found.expect("wrapped array");
    assert_eq!(found.length, 4);
    assert_eq!(found.original_name, "a");
    assert!(output.contains("function __STRING_ARRAY__(b, c)"));
    assert!(output.ends_with("__STRING_ARRAY__()[1];"));
}

#[test]
fn test_wrapped_name_comes_from_options() {
    let parsed = parse(WRAPPED_SPLIT).unwrap();
    let options = TransformOptions {
        string_array_name: "strings".to_string(),
        ..TransformOptions::default()
    };
    let mut program = Program::with_options(parsed.arena, parsed.root, options);
    let found = find_string_array(&mut program, &mut NoopSink).expect("wrapped array");
    assert_eq!(found.name, "strings");
    assert!(program.print().contains("log(strings()[0], strings()[2]);"));
}

#[test]
fn test_only_first_wrapped_array_is_resolved() {
    let second = WRAPPED_SPLIT.replace("_0x1", "_0x2");
    let (output, found) = resolve(&format!("{WRAPPED_SPLIT}\n{second}"));
    assert_eq!(found.expect("wrapped array").original_name, "_0x1");
    assert!(output.contains("_0x2"));
}

#[test]
fn test_wrapped_requires_matching_backreferences() {
    // The reassignment targets a different function.
    let (_, found) = resolve(&WRAPPED_SPLIT.replace("    _0x1 = function", "    other = function"));
    assert_eq!(found, None);
    // The getter returns something other than the array.
    let (_, found) = resolve(&WRAPPED_SPLIT.replace("return arr;", "return other;"));
    assert_eq!(found, None);
}

#[test]
fn test_wrapped_resolution_is_idempotent() {
    let mut program = program(WRAPPED_SPLIT);
    find_string_array(&mut program, &mut NoopSink);
    let once = program.print();
    let mut transform = StringArrayTransform::new();
    let state = apply_transform(&mut program, &mut transform, &mut NoopSink);
    assert_eq!(state.changes, 0);
    assert_eq!(program.print(), once);
    assert_eq!(transform.result().map(|found| found.length), Some(3));
}

#[test]
fn test_js_split() {
    assert_eq!(js_split("a,b", ","), ["a", "b"]);
    assert_eq!(js_split("abc", ""), ["a", "b", "c"]);
    assert_eq!(js_split("", ","), [""]);
    assert!(js_split("", "").is_empty());
    assert_eq!(js_split("a||b", "||"), ["a", "b"]);
}
