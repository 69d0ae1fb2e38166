//! Pattern interpretation against parsed trees.

use super::*;
use unravel_parser::parse;

/// Parse `source` and return the arena with its first top-level statement.
fn first_statement(source: &str) -> (NodeArena, NodeIndex) {
    let parsed = parse(source).unwrap_or_else(|err| panic!("parse failed for {source:?}: {err}"));
    let stmt = parsed.arena.statements(parsed.root).unwrap()[0];
    (parsed.arena, stmt)
}

fn expression_of(arena: &NodeArena, stmt: NodeIndex) -> NodeIndex {
    match arena.kind(stmt) {
        NodeKind::ExpressionStatement { expression } => *expression,
        other => panic!("expected an expression statement, got {}", other.kind_name()),
    }
}

#[test]
fn test_identifier_capture() {
    let (arena, stmt) = first_statement("foo;");
    let matcher = Matcher::new(
        "ident",
        Pattern::expression_statement(Pattern::Identifier(StrPattern::capture("name"))),
    );
    let mut captures = Captures::new();
    assert!(matcher.matches(&arena, stmt, &mut captures));
    assert_eq!(captures.string("name"), Some("foo"));
}

#[test]
fn test_backreference_compares_names() {
    let matcher = Matcher::new(
        "self-assign",
        Pattern::expression_statement(Pattern::assignment(
            "=",
            Pattern::Identifier(StrPattern::capture("name")),
            Pattern::Identifier(StrPattern::FromCapture("name")),
        )),
    );
    let mut captures = Captures::new();

    let (arena, stmt) = first_statement("a = a;");
    assert!(matcher.matches(&arena, stmt, &mut captures));

    let (arena, stmt) = first_statement("a = b;");
    assert!(!matcher.matches(&arena, stmt, &mut captures));
}

#[test]
fn test_node_backreference_is_structural() {
    let matcher = Matcher::new(
        "same-operands",
        Pattern::expression_statement(Pattern::call(
            Pattern::Any,
            ListPattern::exact([
                Pattern::capture("first", Pattern::Any),
                Pattern::from_capture("first"),
            ]),
        )),
    );
    let mut captures = Captures::new();

    let (arena, stmt) = first_statement("f(a.b[0], a.b[0]);");
    assert!(matcher.matches(&arena, stmt, &mut captures));

    let (arena, stmt) = first_statement("f(a.b[0], a.b[1]);");
    assert!(!matcher.matches(&arena, stmt, &mut captures));
}

#[test]
fn test_failed_alternative_rolls_back_captures() {
    let matcher = Matcher::new(
        "alternatives",
        Pattern::expression_statement(Pattern::or([
            Pattern::call(
                Pattern::capture("callee", Pattern::Any),
                ListPattern::exact([Pattern::any_string()]),
            ),
            Pattern::call(Pattern::Any, ListPattern::Any),
        ])),
    );
    let (arena, stmt) = first_statement("f(1);");
    let mut captures = Captures::new();
    assert!(matcher.matches(&arena, stmt, &mut captures));
    assert!(captures.get("callee").is_none());
}

#[test]
fn test_each_attempt_starts_clean() {
    let matcher = Matcher::new(
        "number",
        Pattern::expression_statement(Pattern::capture(
            "value",
            Pattern::number(NumPattern::Any),
        )),
    );
    let mut captures = Captures::new();
    let (arena, stmt) = first_statement("1;");
    assert!(matcher.matches(&arena, stmt, &mut captures));
    assert!(captures.node("value").is_some());

    let (arena, stmt) = first_statement("x;");
    assert!(!matcher.matches(&arena, stmt, &mut captures));
    assert!(captures.is_empty());
}

#[test]
fn test_optional_slots_match_absent() {
    let (arena, stmt) = first_statement("for (;;) {}");
    let mut captures = Captures::new();

    let empty_for = Matcher::new(
        "empty-for",
        Pattern::for_statement(
            Pattern::Absent,
            Pattern::Absent,
            Pattern::Absent,
            Pattern::block(ListPattern::empty()),
        ),
    );
    assert!(empty_for.matches(&arena, stmt, &mut captures));

    let any_for = Matcher::new(
        "any-for",
        Pattern::for_statement(Pattern::Any, Pattern::Any, Pattern::Any, Pattern::Any),
    );
    assert!(any_for.matches(&arena, stmt, &mut captures));

    let tested_for = Matcher::new(
        "tested-for",
        Pattern::for_statement(
            Pattern::Any,
            Pattern::any_identifier(),
            Pattern::Any,
            Pattern::Any,
        ),
    );
    assert!(!tested_for.matches(&arena, stmt, &mut captures));
}

#[test]
fn test_array_holes_are_absent() {
    let (arena, stmt) = first_statement("[1, , 2];");
    let expr = expression_of(&arena, stmt);
    let mut captures = Captures::new();
    let pattern = Pattern::ArrayExpression(ListPattern::exact([
        Pattern::number(NumPattern::Any),
        Pattern::Absent,
        Pattern::number(NumPattern::Any),
    ]));
    assert!(Matcher::new("holes", pattern).matches(&arena, expr, &mut captures));
}

#[test]
fn test_array_of_requires_every_element() {
    let mut captures = Captures::new();
    let strings = Matcher::new(
        "strings",
        Pattern::ArrayExpression(ListPattern::array_of(Pattern::any_string())),
    );

    let (arena, stmt) = first_statement("['a', 'b'];");
    assert!(strings.matches(&arena, expression_of(&arena, stmt), &mut captures));

    let (arena, stmt) = first_statement("[];");
    assert!(strings.matches(&arena, expression_of(&arena, stmt), &mut captures));

    let (arena, stmt) = first_statement("['a', 1];");
    assert!(!strings.matches(&arena, expression_of(&arena, stmt), &mut captures));
}

#[test]
fn test_any_list_backtracks() {
    let (arena, stmt) = first_statement("{ a(); b(); return x; }");
    let mut captures = Captures::new();
    let pattern = Pattern::block(ListPattern::any_list([
        ListItem::ZeroOrMore,
        ListItem::One(Pattern::return_statement(Pattern::capture(
            "result",
            Pattern::any_identifier(),
        ))),
    ]));
    assert!(Matcher::new("tail-return", pattern).matches(&arena, stmt, &mut captures));
    assert_eq!(
        captures.node("result").and_then(|node| arena.name(node)),
        Some("x")
    );

    let leading = Pattern::block(ListPattern::any_list([
        ListItem::One(Pattern::return_statement(Pattern::Any)),
        ListItem::ZeroOrMore,
    ]));
    assert!(!Matcher::new("head-return", leading).matches(&arena, stmt, &mut captures));
}

#[test]
fn test_list_capture() {
    let (arena, stmt) = first_statement("f(1, 2, 3);");
    let mut captures = Captures::new();
    let pattern = Pattern::expression_statement(Pattern::call(
        Pattern::identifier("f"),
        ListPattern::capture("args", ListPattern::Any),
    ));
    assert!(Matcher::new("args", pattern).matches(&arena, stmt, &mut captures));
    assert_eq!(captures.list("args").map(<[NodeIndex]>::len), Some(3));
}

#[test]
fn test_update_and_member_flags() {
    let mut captures = Captures::new();
    let (arena, stmt) = first_statement("a[i++];");
    let pattern = Pattern::expression_statement(Pattern::member(
        Pattern::identifier("a"),
        Pattern::postfix_update("++", Pattern::identifier("i")),
        true,
    ));
    assert!(Matcher::new("indexed", pattern.clone()).matches(&arena, stmt, &mut captures));

    let (arena, stmt) = first_statement("a[++i];");
    assert!(!Matcher::new("indexed", pattern.clone()).matches(&arena, stmt, &mut captures));

    let (arena, stmt) = first_statement("a.i;");
    assert!(!Matcher::new("indexed", pattern).matches(&arena, stmt, &mut captures));
}

#[test]
fn test_predicate_and_numeric_predicate() {
    let mut captures = Captures::new();
    let (arena, stmt) = first_statement("x[3];");
    let pattern = Pattern::expression_statement(Pattern::member(
        Pattern::predicate(|arena, node| arena.name(node).is_some_and(|name| name.len() == 1)),
        Pattern::number(NumPattern::predicate(|value| value < 5.0)),
        true,
    ));
    assert!(Matcher::new("small-index", pattern).matches(&arena, stmt, &mut captures));
}

#[test]
fn test_labelled_break_is_not_plain_break() {
    let parsed = parse("outer: while (x) { break outer; }").unwrap();
    let arena = &parsed.arena;
    let mut captures = Captures::new();
    let brk = arena
        .descendants(parsed.root)
        .into_iter()
        .find(|&node| matches!(arena.kind(node), NodeKind::BreakStatement { .. }))
        .unwrap();
    assert!(!Matcher::new("break", Pattern::Break).matches(arena, brk, &mut captures));
}

#[test]
fn test_statement_list_matches_program_and_block() {
    let pattern = Pattern::statement_list(ListPattern::any_list([
        ListItem::ZeroOrMore,
        ListItem::One(Pattern::capture(
            "call",
            Pattern::expression_statement(Pattern::call(Pattern::identifier("b"), ListPattern::Any)),
        )),
        ListItem::ZeroOrMore,
    ]));
    let matcher = Matcher::new("contains-b-call", pattern);
    let mut captures = Captures::new();

    let parsed = parse("a(); b(); c();").unwrap();
    assert!(matcher.matches(&parsed.arena, parsed.root, &mut captures));
    assert_eq!(
        captures.node("call"),
        Some(parsed.arena.statements(parsed.root).unwrap()[1])
    );

    let (arena, block) = first_statement("{ b(); }");
    assert!(matcher.matches(&arena, block, &mut captures));

    let (arena, block) = first_statement("{ a(); }");
    assert!(!matcher.matches(&arena, block, &mut captures));
}
