use super::*;
use unravel_parser::parse;

fn eval_source(expression: &str) -> Option<f64> {
    let parsed = parse(&format!("x = {expression};")).unwrap();
    let arena = &parsed.arena;
    let stmt = arena.statements(parsed.root).unwrap()[0];
    let NodeKind::ExpressionStatement { expression } = arena.kind(stmt) else {
        panic!("expected an expression statement");
    };
    let NodeKind::AssignmentExpression { right, .. } = arena.kind(*expression) else {
        panic!("expected an assignment");
    };
    eval_number(arena, *right)
}

#[test]
fn test_literals() {
    assert_eq!(eval_source("0"), Some(0.0));
    assert_eq!(eval_source("0x1f"), Some(31.0));
    assert_eq!(eval_source("true"), Some(1.0));
    assert_eq!(eval_source("false"), Some(0.0));
}

#[test]
fn test_obfuscated_zero() {
    assert_eq!(eval_source("-0x1a70 + 0x93d + 0x275 * 0x7"), Some(0.0));
    assert_eq!(eval_source("+!![] - 1"), None);
    assert_eq!(eval_source("!0 - 1"), Some(0.0));
    assert_eq!(eval_source("(2 - 1) * 0"), Some(0.0));
}

#[test]
fn test_unary_operators() {
    assert_eq!(eval_source("-5"), Some(-5.0));
    assert_eq!(eval_source("+true"), Some(1.0));
    assert_eq!(eval_source("!1"), Some(0.0));
    assert_eq!(eval_source("~0"), Some(-1.0));
    assert_eq!(eval_source("~4294967296"), Some(-1.0));
}

#[test]
fn test_binary_operators() {
    assert_eq!(eval_source("7 % 4"), Some(3.0));
    assert_eq!(eval_source("1 / 4"), Some(0.25));
    assert!(eval_source("0 / 0").is_some_and(f64::is_nan));
}

#[test]
fn test_unknown_values() {
    assert_eq!(eval_source("a"), None);
    assert_eq!(eval_source("1 + a"), None);
    assert_eq!(eval_source("'0'"), None);
    assert_eq!(eval_source("1 << 2"), None);
    assert_eq!(eval_source("typeof 1"), None);
    assert_eq!(eval_number(&NodeArena::new(), NodeIndex::NONE), None);
}
