//! End-to-end tests for the deobfuscation passes.
//!
//! Each test parses JavaScript text through the facade, runs one or more
//! passes and compares the printed result.

use unravel::{
    CollectingSink, ControlFlowSwitch, Mangle, NoopSink, Program, StringArrayTransform,
    TracingSink, TransformOptions, apply_transform, find_string_array, parse_program,
    parse_program_with_options,
};

fn parse(source: &str) -> Program {
    parse_program(source).expect("source should parse")
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_dispatcher_scenario() {
    let mut program = parse(
        r#"
        var seq = "2|0|1".split("|");
        var idx = 0;
        while (true) {
            switch (seq[idx++]) {
                case "0":
                    A();
                    continue;
                case "1":
                    B();
                    continue;
                case "2":
                    C();
                    continue;
            }
            break;
        }
        "#,
    );
    let state = apply_transform(&mut program, &mut ControlFlowSwitch::new(), &mut TracingSink);
    assert_eq!(state.name, "control-flow-switch");
    assert!(state.changes > 0);
    assert_eq!(program.print(), "C();\nA();\nB();");
}

#[test]
fn test_plain_array_scenario() {
    let mut program = parse(r#"var arr = ["a", "b", "c"]; out(arr[0]); out(arr[1]);"#);
    let state = apply_transform(&mut program, &mut StringArrayTransform::new(), &mut NoopSink);
    assert_eq!(state.name, "string-array");
    assert_eq!(program.print(), "out(\"a\");\nout(\"b\");");
}

#[test]
fn test_wrapped_array_scenario() {
    let mut program = parse(
        r#"
        function _0x4e2c() {
            var _0x5a = "x,y,z".split(",");
            _0x4e2c = function () {
                return _0x5a;
            };
            return _0x4e2c();
        }
        function _0x1b(i) {
            return _0x4e2c()[i];
        }
        console.log(_0x1b(0), _0x4e2c()[1]);
        "#,
    );
    let mut sink = CollectingSink::new();
    let found = find_string_array(&mut program, &mut sink).expect("wrapped array");

    assert_eq!(found.length, 3);
    assert_eq!(found.original_name, "_0x4e2c");
    assert_eq!(found.references.len(), 3);
    for &reference in &found.references {
        assert_eq!(program.arena.name(reference), Some("__STRING_ARRAY__"));
    }
    assert!(!program.print().contains("_0x4e2c"));
    assert_eq!(sink.diagnostics.len(), 1);
}

// =============================================================================
// Passes together
// =============================================================================

const OBFUSCATED: &str = r#"
function _0x3f1a() {
    var _0xa = ["log", "hello"];
    var _0xs = "1|0".split("|");
    var _0xi = 0;
    while (true) {
        switch (_0xs[_0xi++]) {
            case "0":
                console[_0xa[0]](_0xa[1]);
                continue;
            case "1":
                var _0xm = 2;
                continue;
        }
        break;
    }
}
"#;

#[test]
fn test_passes_compose() {
    let mut program = parse(OBFUSCATED);
    apply_transform(&mut program, &mut ControlFlowSwitch::new(), &mut NoopSink);
    assert_eq!(
        program.print(),
        "function _0x3f1a() {\n    var _0xa = [\"log\", \"hello\"];\n    var _0xm = 2;\n    console[_0xa[0]](_0xa[1]);\n}"
    );

    apply_transform(&mut program, &mut StringArrayTransform::new(), &mut NoopSink);
    assert_eq!(
        program.print(),
        "function _0x3f1a() {\n    var _0xm = 2;\n    console[\"log\"](\"hello\");\n}"
    );

    apply_transform(&mut program, &mut Mangle::all(), &mut NoopSink);
    assert_eq!(
        program.print(),
        "function f() {\n    var vLN2 = 2;\n    console[\"log\"](\"hello\");\n}"
    );
    assert!(!program.scope_stale);
}

#[test]
fn test_each_pass_reaches_a_fixed_point() {
    let mut program = parse(OBFUSCATED);
    apply_transform(&mut program, &mut ControlFlowSwitch::new(), &mut NoopSink);
    apply_transform(&mut program, &mut StringArrayTransform::new(), &mut NoopSink);
    let settled = program.print();

    let again = apply_transform(&mut program, &mut ControlFlowSwitch::new(), &mut NoopSink);
    assert_eq!(again.changes, 0);
    let again = apply_transform(&mut program, &mut StringArrayTransform::new(), &mut NoopSink);
    assert_eq!(again.changes, 0);
    assert_eq!(program.print(), settled);
}

// =============================================================================
// Facade
// =============================================================================

#[test]
fn test_parse_errors_are_returned() {
    assert!(parse_program("var = ;").is_err());
    assert!(parse_program("function (").is_err());
}

#[test]
fn test_options_from_json() {
    let options = TransformOptions::from_json(r#"{"stringArrayName": "STRINGS"}"#)
        .expect("valid options");
    assert_eq!(options.max_ast_depth, TransformOptions::default().max_ast_depth);

    let mut program = parse_program_with_options(
        r#"
        function a() {
            var b = ["p", "q"];
            a = function () { return b; };
            return a();
        }
        use(a()[1]);
        "#,
        options,
    )
    .expect("source should parse");
    let found = find_string_array(&mut program, &mut NoopSink).expect("wrapped array");
    assert_eq!(found.name, "STRINGS");
    assert!(program.print().ends_with("use(STRINGS()[1]);"));
}
