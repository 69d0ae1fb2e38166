//! Static evaluation of small numeric expressions.
//!
//! Obfuscators write constants as arithmetic over hex literals
//! (`-0x1a70 + 0x93d + 0x275 * 0x7`). Only literals, unary `+ - ! ~` and
//! binary `+ - * / %` over numbers are folded; anything else is unknown.

use unravel_ast::{NodeArena, NodeIndex, NodeKind};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Value {
    Number(f64),
    Bool(bool),
}

impl Value {
    fn to_number(self) -> f64 {
        match self {
            Value::Number(n) => n,
            Value::Bool(b) => f64::from(u8::from(b)),
        }
    }

    fn truthy(self) -> bool {
        match self {
            Value::Number(n) => n != 0.0 && !n.is_nan(),
            Value::Bool(b) => b,
        }
    }
}

/// Numeric value of `node`, if it folds to one.
pub fn eval_number(arena: &NodeArena, node: NodeIndex) -> Option<f64> {
    eval(arena, node, 0).map(Value::to_number)
}

const MAX_EVAL_DEPTH: u32 = 64;

fn eval(arena: &NodeArena, node: NodeIndex, depth: u32) -> Option<Value> {
    if depth > MAX_EVAL_DEPTH {
        return None;
    }
    match &arena.get(node)?.kind {
        NodeKind::NumericLiteral { value } => Some(Value::Number(*value)),
        NodeKind::BooleanLiteral { value } => Some(Value::Bool(*value)),
        NodeKind::UnaryExpression { operator, argument } => {
            let arg = eval(arena, *argument, depth + 1)?;
            match operator.as_str() {
                "+" => Some(Value::Number(arg.to_number())),
                "-" => Some(Value::Number(-arg.to_number())),
                "!" => Some(Value::Bool(!arg.truthy())),
                "~" => Some(Value::Number(f64::from(!to_int32(arg.to_number())))),
                _ => None,
            }
        }
        NodeKind::BinaryExpression {
            operator,
            left,
            right,
        } => {
            let l = eval(arena, *left, depth + 1)?;
            let r = eval(arena, *right, depth + 1)?;
            let (l, r) = (l.to_number(), r.to_number());
            let value = match operator.as_str() {
                "+" => l + r,
                "-" => l - r,
                "*" => l * r,
                "/" => l / r,
                "%" => l % r,
                _ => return None,
            };
            Some(Value::Number(value))
        }
        _ => None,
    }
}

/// ECMAScript ToInt32.
fn to_int32(n: f64) -> i32 {
    if !n.is_finite() {
        return 0;
    }
    let wrapped = n.trunc().rem_euclid(4_294_967_296.0);
    if wrapped >= 2_147_483_648.0 {
        (wrapped - 4_294_967_296.0) as i32
    } else {
        wrapped as i32
    }
}

#[cfg(test)]
#[path = "tests/const_eval_tests.rs"]
mod tests;
