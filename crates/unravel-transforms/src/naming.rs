//! Name inference from syntactic shape.
//!
//! Every function here is pure over the tree: the same shape always yields
//! the same name, which is what makes stable mangling reproducible across
//! builds of one program.

use unravel_ast::{NodeArena, NodeIndex, NodeKind, format_number};
use unravel_common::limits::MAX_LITERAL_NAME_CHARS;

/// Uppercase an ASCII lowercase letter at the start of `text` or after
/// whitespace, then drop every character outside `[A-Za-z0-9$_]`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_boundary = true;
    for ch in text.chars() {
        let upper = at_boundary && ch.is_ascii_lowercase();
        at_boundary = ch.is_whitespace();
        let ch = if upper { ch.to_ascii_uppercase() } else { ch };
        if ch.is_ascii_alphanumeric() || ch == '$' || ch == '_' {
            out.push(ch);
        }
    }
    out
}

/// Short name describing the value `node` produces, if its kind has one.
///
/// With `stable` set, shape counts (parameters, body statements, properties,
/// elements) are appended so structurally different values get different
/// names.
pub fn expression_name(arena: &NodeArena, node: NodeIndex, stable: bool) -> Option<String> {
    expression_name_at(arena, node, stable, 0)
}

const MAX_CALLEE_DEPTH: u32 = 64;

fn expression_name_at(arena: &NodeArena, node: NodeIndex, stable: bool, depth: u32) -> Option<String> {
    if depth > MAX_CALLEE_DEPTH {
        return None;
    }
    let name = match &arena.get(node)?.kind {
        NodeKind::Identifier { name } => name.clone(),
        NodeKind::FunctionExpression(func) => {
            let mut name = String::from("f");
            if stable {
                let statements = arena.statements(func.body).map_or(0, <[NodeIndex]>::len);
                name.push_str(&format!("_{}_{statements}", func.params.len()));
            }
            name
        }
        NodeKind::ArrowFunctionExpression(arrow) => {
            let mut name = String::from("f");
            if stable {
                let statements = if arrow.expression_body {
                    1
                } else {
                    arena.statements(arrow.body).map_or(0, <[NodeIndex]>::len)
                };
                name.push_str(&format!("_{}_{statements}", arrow.params.len()));
            }
            name
        }
        NodeKind::ClassExpression(class) => class
            .id
            .and_then(|id| arena.name(id))
            .unwrap_or("C")
            .to_string(),
        NodeKind::CallExpression { callee, .. } => {
            return expression_name_at(arena, *callee, stable, depth + 1);
        }
        NodeKind::ThisExpression => "this".to_string(),
        NodeKind::NumericLiteral { value } => format!("LN{}", format_number(*value)),
        NodeKind::StringLiteral { value } => {
            let cased: String = title_case(value)
                .chars()
                .take(MAX_LITERAL_NAME_CHARS)
                .collect();
            format!("LS{cased}")
        }
        NodeKind::ObjectExpression { properties } => {
            if stable {
                format!("O_{}", properties.len())
            } else {
                "O".to_string()
            }
        }
        NodeKind::ArrayExpression { elements } => {
            if stable {
                format!("A_{}", elements.len())
            } else {
                "A".to_string()
            }
        }
        NodeKind::BooleanLiteral { value } => format!("L{value}"),
        _ => return None,
    };
    Some(name)
}

/// Base name for the binding declared by `ident`, from the role the
/// identifier plays in its parent. `None` leaves the binding alone.
pub fn role_name(arena: &NodeArena, ident: NodeIndex, stable: bool) -> Option<String> {
    let parent = arena.parent(ident);
    let parent_kind = arena.get(parent).map(|n| &n.kind)?;
    match parent_kind {
        NodeKind::ClassDeclaration(class) | NodeKind::ClassExpression(class)
            if class.id == Some(ident) =>
        {
            Some(with_count("C", class.body.len(), stable))
        }
        NodeKind::FunctionDeclaration(func) | NodeKind::FunctionExpression(func)
            if func.id == Some(ident) =>
        {
            Some(with_count("f", func.params.len(), stable))
        }
        _ if is_param(arena, ident) => Some("p".to_string()),
        NodeKind::VariableDeclarator { id, init } if *id == ident => {
            let init = init.unwrap_or(NodeIndex::NONE);
            if let Some(path) = require_path(arena, init) {
                return Some(path.to_string());
            }
            let suffix = expression_name(arena, init, stable).unwrap_or_default();
            Some(format!("v{}", title_case(&suffix)))
        }
        NodeKind::CatchClause { .. } => Some("e".to_string()),
        NodeKind::ArrayPattern { .. } => Some("v".to_string()),
        _ => None,
    }
}

/// Name of a function or class that encloses another binding, used for the
/// stable suffix. Declarations and methods have none.
pub fn enclosing_name(arena: &NodeArena, node: NodeIndex, stable: bool) -> Option<String> {
    let kind = arena.get(node).map(|n| &n.kind)?;
    if !kind.is_function() && !kind.is_class() {
        return None;
    }
    if matches!(
        arena.get(arena.parent(node)).map(|n| &n.kind),
        Some(NodeKind::ClassMethod { .. } | NodeKind::ObjectMethod { .. })
    ) {
        return None;
    }
    expression_name(arena, node, stable)
}

fn with_count(base: &str, count: usize, stable: bool) -> String {
    if stable {
        format!("{base}_{count}")
    } else {
        base.to_string()
    }
}

/// A parameter, directly or as the target of a default value.
fn is_param(arena: &NodeArena, ident: NodeIndex) -> bool {
    let in_params = |holder: NodeIndex, item: NodeIndex| {
        arena
            .get(holder)
            .and_then(|n| n.kind.params())
            .is_some_and(|params| params.contains(&item))
    };
    let parent = arena.parent(ident);
    if in_params(parent, ident) {
        return true;
    }
    matches!(
        arena.get(parent).map(|n| &n.kind),
        Some(NodeKind::AssignmentPattern { left, .. }) if *left == ident
    ) && in_params(arena.parent(parent), parent)
}

/// The module path of `require("<path>")`.
fn require_path(arena: &NodeArena, init: NodeIndex) -> Option<&str> {
    let NodeKind::CallExpression { callee, arguments } = &arena.get(init)?.kind else {
        return None;
    };
    if arena.name(*callee) != Some("require") || arguments.len() != 1 {
        return None;
    }
    arena.string_value(arguments[0])
}

#[cfg(test)]
#[path = "tests/naming_tests.rs"]
mod tests;
