//! Shared patterns for shapes that obfuscators emit in several spellings.

use crate::pattern::{ListPattern, NumPattern, Pattern};

/// `var name = value;` (any declaration kind, one declarator) or the
/// expression statement `name = value;`.
pub fn declaration_or_assignment(name: Pattern, value: Pattern) -> Pattern {
    Pattern::or([
        Pattern::variable_declaration(
            None,
            ListPattern::exact([Pattern::variable_declarator(name.clone(), value.clone())]),
        ),
        Pattern::expression_statement(Pattern::assignment("=", name, value)),
    ])
}

/// `object.property` or `object["property"]`.
pub fn const_member_expression(object: Pattern, property: &str) -> Pattern {
    Pattern::or([
        Pattern::member(object.clone(), Pattern::identifier(property), false),
        Pattern::member(object, Pattern::string(property), true),
    ])
}

/// `true`, `!0` or `!![]`.
pub fn true_literal() -> Pattern {
    Pattern::or([
        Pattern::BooleanLiteral(Some(true)),
        Pattern::unary("!", Pattern::number(NumPattern::Exact(0.0))),
        Pattern::unary(
            "!",
            Pattern::unary("!", Pattern::ArrayExpression(ListPattern::empty())),
        ),
    ])
}

/// `undefined` or `void 0`.
pub fn undefined_literal() -> Pattern {
    Pattern::or([
        Pattern::identifier("undefined"),
        Pattern::unary("void", Pattern::number(NumPattern::Exact(0.0))),
    ])
}

/// `for (;;) body`, `for (; true;) body` or `while (true) body`.
///
/// The `for` forms require empty init and update clauses.
pub fn infinite_loop(body: Pattern) -> Pattern {
    Pattern::or([
        Pattern::for_statement(
            Pattern::Absent,
            Pattern::or([Pattern::Absent, true_literal()]),
            Pattern::Absent,
            body.clone(),
        ),
        Pattern::while_statement(true_literal(), body),
    ])
}

#[cfg(test)]
#[path = "tests/patterns_tests.rs"]
mod tests;
