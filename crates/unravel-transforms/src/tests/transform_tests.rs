//! Traversal driver tests.

use super::*;
use unravel_common::{CollectingSink, NoopSink};
use unravel_parser::parse;

fn program(source: &str) -> Program {
    let parsed = parse(source).unwrap();
    Program::new(parsed.arena, parsed.root)
}

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
    stop_at: Option<&'static str>,
}

impl Transform for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn enter(&mut self, cx: &mut TransformContext<'_>, node: NodeIndex) {
        let kind = cx.program.arena.kind(node).kind_name();
        self.events.push(format!("enter {kind}"));
        if self.stop_at == Some(kind) {
            cx.stop();
        }
    }

    fn exit(&mut self, cx: &mut TransformContext<'_>, node: NodeIndex) {
        let kind = cx.program.arena.kind(node).kind_name();
        self.events.push(format!("exit {kind}"));
    }
}

#[test]
fn test_enter_pre_order_exit_post_order() {
    let mut program = program("a;");
    let mut recorder = Recorder::default();
    let state = apply_transform(&mut program, &mut recorder, &mut NoopSink);

    assert_eq!(
        recorder.events,
        [
            "enter Program",
            "enter ExpressionStatement",
            "enter Identifier",
            "exit Identifier",
            "exit ExpressionStatement",
            "exit Program",
        ]
    );
    assert_eq!(state.name, "recorder");
    assert_eq!(state.changes, 0);
}

#[test]
fn test_stop_ends_the_walk() {
    let mut program = program("a; b;");
    let mut recorder = Recorder {
        stop_at: Some("Identifier"),
        ..Recorder::default()
    };
    apply_transform(&mut program, &mut recorder, &mut NoopSink);

    assert_eq!(
        recorder.events,
        ["enter Program", "enter ExpressionStatement", "enter Identifier"]
    );
}

#[test]
fn test_visits_filters_callbacks() {
    struct Identifiers(Vec<String>);
    impl Transform for Identifiers {
        fn name(&self) -> &'static str {
            "identifiers"
        }
        fn visits(&self, kind: &NodeKind) -> bool {
            matches!(kind, NodeKind::Identifier { .. })
        }
        fn enter(&mut self, cx: &mut TransformContext<'_>, node: NodeIndex) {
            self.0.extend(cx.program.arena.name(node).map(str::to_string));
        }
    }

    let mut program = program("f(a, b.c);");
    let mut transform = Identifiers(Vec::new());
    apply_transform(&mut program, &mut transform, &mut NoopSink);
    assert_eq!(transform.0, ["f", "a", "b", "c"]);
}

/// Removes every expression statement on entry.
struct DropStatements {
    entered_identifiers: usize,
}

impl Transform for DropStatements {
    fn name(&self) -> &'static str {
        "drop-statements"
    }

    fn maintains_scope(&self) -> bool {
        false
    }

    fn enter(&mut self, cx: &mut TransformContext<'_>, node: NodeIndex) {
        match cx.program.arena.kind(node) {
            NodeKind::ExpressionStatement { .. } => {
                if cx.program.arena.remove_statement(node) {
                    cx.add_changes(1);
                }
            }
            NodeKind::Identifier { .. } => self.entered_identifiers += 1,
            _ => {}
        }
    }
}

#[test]
fn test_detached_nodes_are_not_descended() {
    let mut program = program("a; b; var c = d;");
    let mut transform = DropStatements {
        entered_identifiers: 0,
    };
    let state = apply_transform(&mut program, &mut transform, &mut NoopSink);

    assert_eq!(state.changes, 2);
    assert_eq!(program.print(), "var c = d;");
    // Only `c` and `d` remain to be visited.
    assert_eq!(transform.entered_identifiers, 2);
}

#[test]
fn test_changes_without_maintenance_mark_scope_stale() {
    let mut program = program("a; var b = 1;");
    let mut transform = DropStatements {
        entered_identifiers: 0,
    };
    apply_transform(&mut program, &mut transform, &mut NoopSink);
    assert!(program.scope_stale);

    program.ensure_scope();
    assert!(!program.scope_stale);
    assert!(!program.binder.has_global("a"));
}

#[test]
fn test_unchanged_program_keeps_scope_fresh() {
    let mut program = program("var b = 1;");
    let mut transform = DropStatements {
        entered_identifiers: 0,
    };
    let state = apply_transform(&mut program, &mut transform, &mut NoopSink);
    assert_eq!(state.changes, 0);
    assert!(!program.scope_stale);
}

#[test]
fn test_depth_limit_skips_with_warning() {
    let parsed = parse("x = a + (b + c);").unwrap();
    let options = TransformOptions {
        max_ast_depth: 4,
        ..TransformOptions::default()
    };
    let mut program = Program::with_options(parsed.arena, parsed.root, options);
    let mut recorder = Recorder::default();
    let mut sink = CollectingSink::new();
    apply_transform(&mut program, &mut recorder, &mut sink);

    // Program, statement and assignment sit above the limit; `x` and the
    // outer sum sit at depth 3; the operands of the sum are skipped.
    let entered = |kind: &str| {
        recorder
            .events
            .iter()
            .filter(|e| e.strip_prefix("enter ") == Some(kind))
            .count()
    };
    assert_eq!(entered("BinaryExpression"), 1);
    assert_eq!(entered("Identifier"), 1);
    assert_eq!(sink.diagnostics.len(), 2);
    assert!(sink.has_warnings());
    assert!(
        sink.messages()
            .all(|message| message.contains("nested deeper than 4 levels"))
    );
    assert!(sink.diagnostics.iter().all(|d| d.source == "recorder"));
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let handle = std::thread::Builder::new()
        .stack_size(256 * 1024 * 1024)
        .spawn(|| {
            let mut arena = unravel_ast::NodeArena::new();
            let mut expr = arena.number(1.0);
            for _ in 0..3_000 {
                let one = arena.number(1.0);
                expr = arena.binary(expr, "+", one);
            }
            let stmt = arena.expr_stmt(expr);
            let root = arena.program(vec![stmt]);
            let mut program = Program::new(arena, root);
            let mut sink = CollectingSink::new();
            apply_transform(&mut program, &mut Recorder::default(), &mut sink);
            sink.has_warnings()
        })
        .unwrap();
    assert!(handle.join().unwrap());
}

#[test]
fn test_default_tags_are_safe() {
    let recorder = Recorder::default();
    assert_eq!(recorder.tags(), TransformTags::SAFE);
    assert!(!recorder.tags().contains(TransformTags::UNSAFE));
}
