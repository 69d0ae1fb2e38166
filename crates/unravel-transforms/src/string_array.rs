//! String array resolution.
//!
//! Obfuscators move string literals into an array and replace each use with
//! an indexed read. Two forms are handled:
//!
//! - the wrapped form, an accessor function that returns the array and
//!   reassigns itself so later calls skip the initialisation. It is renamed
//!   to a canonical name so later passes can find its callers;
//! - the plain form, `var arr = ["a", "b"]` read only through constant
//!   indices. Each read is replaced by the literal and the array is removed.

use tracing::debug;
use unravel_ast::{NodeArena, NodeIndex, NodeKind};
use unravel_binder::{BindingId, ReferenceKind};
use unravel_common::DiagnosticSink;
use unravel_matcher::{
    Captures, ListPattern, Matcher, Pattern, StrPattern, const_member_expression,
    declaration_or_assignment, undefined_literal,
};

use crate::program::Program;
use crate::transform::{Transform, TransformContext, apply_transform, expect_node, expect_string};

/// The wrapped string array found in a program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringArray {
    /// The accessor function declaration.
    pub declaration: NodeIndex,
    /// Reading references to the accessor: call sites and the accessor's
    /// own `return F()`. The self-reassignment is a write and is left out.
    pub references: Vec<NodeIndex>,
    /// Canonical name the accessor now carries.
    pub name: String,
    pub original_name: String,
    /// Number of decoded entries.
    pub length: usize,
}

pub struct StringArrayTransform {
    wrapped: Matcher,
    plain: Matcher,
    captures: Captures,
    result: Option<StringArray>,
}

impl Default for StringArrayTransform {
    fn default() -> Self {
        StringArrayTransform::new()
    }
}

impl StringArrayTransform {
    pub fn new() -> Self {
        StringArrayTransform {
            wrapped: Matcher::new("string-array-wrapped", wrapped_accessor_pattern()),
            plain: Matcher::new("string-array-plain", plain_array_pattern()),
            captures: Captures::new(),
            result: None,
        }
    }

    /// The wrapped array found by the last run, if any.
    pub fn result(&self) -> Option<&StringArray> {
        self.result.as_ref()
    }

    pub fn into_result(self) -> Option<StringArray> {
        self.result
    }

    fn resolve_wrapped(&mut self, cx: &mut TransformContext<'_>, node: NodeIndex) {
        if !self.wrapped.matches(&cx.program.arena, node, &mut self.captures) {
            return;
        }
        let (Some(name_id), Some(original_name), Some(array)) = (
            expect_node(&self.captures, "name_id"),
            expect_string(&self.captures, "name"),
            expect_node(&self.captures, "array"),
        ) else {
            return;
        };
        let original_name = original_name.to_string();
        let Some(entries) = ArrayEntries::decode(&cx.program.arena, array) else {
            return;
        };
        let Some(binding) = cx.program.binder.binding_of(name_id) else {
            return;
        };

        let canonical = cx.options().string_array_name.clone();
        let program = &mut *cx.program;
        let renamed = program
            .binder
            .rename_fast(&mut program.arena, binding, &canonical);
        let Some(resolved) = program.binder.binding(binding) else {
            return;
        };
        let references: Vec<NodeIndex> = resolved
            .references
            .iter()
            .filter(|r| r.kind == ReferenceKind::Read)
            .map(|r| r.node)
            .collect();
        let declarations = resolved.declarations.len();

        let length = entries.len();
        debug!(name = %original_name, length, "string array found");
        cx.info(format!("string array {original_name}, length {length}"));
        cx.add_changes(renamed.saturating_sub(declarations));
        self.result = Some(StringArray {
            declaration: node,
            references,
            name: canonical,
            original_name,
            length,
        });
    }

    fn inline_plain(&mut self, cx: &mut TransformContext<'_>, node: NodeIndex) {
        if !self.plain.matches(&cx.program.arena, node, &mut self.captures) {
            return;
        }
        let (Some(array_id), Some(array)) = (
            expect_node(&self.captures, "array_id"),
            expect_node(&self.captures, "array"),
        ) else {
            return;
        };
        let program = &mut *cx.program;
        if program
            .arena
            .statements(program.arena.parent(node))
            .is_none()
        {
            return;
        }
        let Some(entries) = ArrayEntries::decode(&program.arena, array) else {
            return;
        };
        let Some(binding) = program.binder.binding_of(array_id) else {
            return;
        };
        let Some(sites) = constant_reads(program, binding, entries.len()) else {
            return;
        };

        for &(member, index) in &sites {
            let value = entries.materialize(&mut program.arena, index);
            program.binder.forget_subtree(&program.arena, member);
            if program.arena.replace_node(member, value) {
                program.binder.bind_subtree(&program.arena, value);
            }
        }
        program.binder.forget_subtree(&program.arena, node);
        program.arena.remove_statement(node);
        program.binder.remove_binding(binding);

        debug!(
            name = program.arena.name(array_id).unwrap_or_default(),
            references = sites.len(),
            "plain string array inlined"
        );
        cx.add_changes(sites.len() + 1);
    }
}

impl Transform for StringArrayTransform {
    fn name(&self) -> &'static str {
        "string-array"
    }

    fn requires_scope(&self) -> bool {
        true
    }

    fn visits(&self, kind: &NodeKind) -> bool {
        matches!(
            kind,
            NodeKind::FunctionDeclaration(_) | NodeKind::VariableDeclaration { .. }
        )
    }

    fn enter(&mut self, cx: &mut TransformContext<'_>, node: NodeIndex) {
        match cx.program.arena.kind(node) {
            NodeKind::FunctionDeclaration(_) if self.result.is_none() => {
                self.resolve_wrapped(cx, node);
            }
            NodeKind::VariableDeclaration { .. } => self.inline_plain(cx, node),
            _ => {}
        }
    }
}

/// Resolve string arrays in `program`: inline every plain array and rename
/// the first wrapped accessor. Returns the wrapped array, if one was found.
pub fn find_string_array(
    program: &mut Program,
    sink: &mut dyn DiagnosticSink,
) -> Option<StringArray> {
    let mut transform = StringArrayTransform::new();
    apply_transform(program, &mut transform, sink);
    transform.into_result()
}

// =============================================================================
// Array entries
// =============================================================================

/// Decoded contents of a string array literal.
enum ArrayEntries {
    /// Element slots of an array literal; `None` for holes.
    Literal(Vec<Option<NodeIndex>>),
    /// Pieces of `"<s>".split("<d>")`.
    Split(Vec<String>),
}

impl ArrayEntries {
    fn decode(arena: &NodeArena, array: NodeIndex) -> Option<ArrayEntries> {
        match &arena.get(array)?.kind {
            NodeKind::ArrayExpression { elements } => Some(ArrayEntries::Literal(elements.clone())),
            NodeKind::CallExpression { callee, arguments } => {
                let NodeKind::MemberExpression { object, .. } = arena.kind(*callee) else {
                    return None;
                };
                let text = arena.string_value(*object)?;
                let separator = arena.string_value(*arguments.first()?)?;
                Some(ArrayEntries::Split(js_split(text, separator)))
            }
            _ => None,
        }
    }

    fn len(&self) -> usize {
        match self {
            ArrayEntries::Literal(elements) => elements.len(),
            ArrayEntries::Split(pieces) => pieces.len(),
        }
    }

    /// A fresh node for entry `index`. Holes read as `void 0`.
    fn materialize(&self, arena: &mut NodeArena, index: usize) -> NodeIndex {
        match self {
            ArrayEntries::Literal(elements) => match elements.get(index).copied().flatten() {
                Some(element) => arena.clone_subtree(element),
                None => arena.void_0(),
            },
            ArrayEntries::Split(pieces) => match pieces.get(index) {
                Some(piece) => arena.string(piece.as_str()),
                None => arena.void_0(),
            },
        }
    }
}

/// `String.prototype.split` with a string separator. An empty separator
/// splits into characters (Unicode scalar values rather than UTF-16 units).
pub fn js_split(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        text.chars().map(String::from).collect()
    } else {
        text.split(separator).map(str::to_string).collect()
    }
}

/// Every reference of `binding` as `(member expression, index)`, or `None`
/// when the binding is written or some reference is not a constant,
/// in-bounds, read-only indexed access.
fn constant_reads(
    program: &Program,
    binding: BindingId,
    length: usize,
) -> Option<Vec<(NodeIndex, usize)>> {
    let arena = &program.arena;
    let binding = program.binder.binding(binding)?;
    if binding.is_written() || !binding.is_referenced() {
        return None;
    }
    binding
        .references
        .iter()
        .map(|reference| {
            if reference.kind != ReferenceKind::Read {
                return None;
            }
            let member = arena.parent(reference.node);
            let NodeKind::MemberExpression {
                object,
                property,
                computed: true,
            } = arena.get(member).map(|n| &n.kind)?
            else {
                return None;
            };
            if *object != reference.node || is_write_target(arena, member) {
                return None;
            }
            let index = arena.number_value(*property)?;
            if index < 0.0 || index.fract() != 0.0 || index >= length as f64 {
                return None;
            }
            Some((member, index as usize))
        })
        .collect()
}

/// `node` is assigned, updated, deleted or destructured into.
fn is_write_target(arena: &NodeArena, node: NodeIndex) -> bool {
    let parent = arena.parent(node);
    match arena.get(parent).map(|n| &n.kind) {
        Some(NodeKind::AssignmentExpression { left, .. })
        | Some(NodeKind::AssignmentPattern { left, .. })
        | Some(NodeKind::ForInStatement { left, .. })
        | Some(NodeKind::ForOfStatement { left, .. }) => *left == node,
        Some(NodeKind::UpdateExpression { .. })
        | Some(NodeKind::ArrayPattern { .. })
        | Some(NodeKind::RestElement { .. }) => true,
        Some(NodeKind::UnaryExpression { operator, .. }) => operator == "delete",
        Some(NodeKind::ObjectProperty { value, .. }) => {
            *value == node
                && matches!(
                    arena.get(arena.parent(parent)).map(|n| &n.kind),
                    Some(NodeKind::ObjectPattern { .. })
                )
        }
        _ => false,
    }
}

// =============================================================================
// Patterns
// =============================================================================

/// String entries and gaps, or `"<s>".split("<d>")`.
fn array_pattern() -> Pattern {
    Pattern::or([
        Pattern::ArrayExpression(ListPattern::array_of(Pattern::or([
            Pattern::any_string(),
            undefined_literal(),
            Pattern::Absent,
        ]))),
        Pattern::call(
            const_member_expression(Pattern::any_string(), "split"),
            ListPattern::exact([Pattern::any_string()]),
        ),
    ])
}

/// ```js
/// function name() {
///     var arr = [...];
///     return (name = function () { return arr; })();
/// }
/// ```
///
/// or the same with the reassignment and the call as two statements.
fn wrapped_accessor_pattern() -> Pattern {
    let array_decl = || {
        declaration_or_assignment(
            Pattern::capture("array_id", Pattern::any_identifier()),
            Pattern::capture("array", array_pattern()),
        )
    };
    let getter = || {
        Pattern::function_expression(
            Pattern::Any,
            ListPattern::Any,
            Pattern::block(ListPattern::exact([Pattern::return_statement(
                Pattern::from_capture("array_id"),
            )])),
        )
    };
    let reassign = || {
        Pattern::assignment(
            "=",
            Pattern::identifier(StrPattern::FromCapture("name")),
            getter(),
        )
    };

    let inline_call = Pattern::block(ListPattern::exact([
        array_decl(),
        Pattern::return_statement(Pattern::call(reassign(), ListPattern::empty())),
    ]));
    let separate_call = Pattern::block(ListPattern::exact([
        array_decl(),
        Pattern::expression_statement(reassign()),
        Pattern::return_statement(Pattern::call(
            Pattern::identifier(StrPattern::FromCapture("name")),
            ListPattern::empty(),
        )),
    ]));

    Pattern::function_declaration(
        Pattern::capture("name_id", Pattern::identifier(StrPattern::capture("name"))),
        ListPattern::Any,
        Pattern::or([inline_call, separate_call]),
    )
}

/// `var arr = [...];` with a single declarator.
fn plain_array_pattern() -> Pattern {
    Pattern::variable_declaration(
        None,
        ListPattern::exact([Pattern::variable_declarator(
            Pattern::capture("array_id", Pattern::any_identifier()),
            Pattern::capture("array", array_pattern()),
        )]),
    )
}

#[cfg(test)]
#[path = "tests/string_array_tests.rs"]
mod tests;
