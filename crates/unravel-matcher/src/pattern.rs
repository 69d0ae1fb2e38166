//! Pattern values and their interpretation.

use std::rc::Rc;

use smallvec::SmallVec;
use tracing::trace;
use unravel_ast::{NodeArena, NodeIndex, NodeKind, VarKind};

use crate::captures::{Capture, CaptureKey, Captures};

#[cold]
fn missing_capture(key: CaptureKey) -> bool {
    if cfg!(debug_assertions) {
        panic!("backreference to capture `{key}` before it was populated");
    }
    false
}

// =============================================================================
// Scalar patterns
// =============================================================================

/// Pattern over a string payload (identifier name, string literal value).
#[derive(Clone)]
pub enum StrPattern {
    Any,
    Exact(String),
    Predicate(Rc<dyn Fn(&str) -> bool>),
    Capture(CaptureKey, Box<StrPattern>),
    FromCapture(CaptureKey),
}

impl StrPattern {
    pub fn exact(value: impl Into<String>) -> Self {
        StrPattern::Exact(value.into())
    }

    pub fn predicate(f: impl Fn(&str) -> bool + 'static) -> Self {
        StrPattern::Predicate(Rc::new(f))
    }

    pub fn capture(key: CaptureKey) -> Self {
        StrPattern::Capture(key, Box::new(StrPattern::Any))
    }

    pub fn capture_with(key: CaptureKey, inner: StrPattern) -> Self {
        StrPattern::Capture(key, Box::new(inner))
    }

    fn match_str(&self, value: &str, captures: &mut Captures) -> bool {
        match self {
            StrPattern::Any => true,
            StrPattern::Exact(expected) => expected == value,
            StrPattern::Predicate(f) => f(value),
            StrPattern::Capture(key, inner) => {
                if inner.match_str(value, captures) {
                    captures.insert(*key, Capture::Str(value.to_string()));
                    true
                } else {
                    false
                }
            }
            StrPattern::FromCapture(key) => match captures.get(key) {
                Some(Capture::Str(captured)) => captured == value,
                _ => missing_capture(*key),
            },
        }
    }
}

impl From<&str> for StrPattern {
    fn from(value: &str) -> Self {
        StrPattern::exact(value)
    }
}

/// Pattern over a numeric literal value.
#[derive(Clone)]
pub enum NumPattern {
    Any,
    Exact(f64),
    Predicate(Rc<dyn Fn(f64) -> bool>),
    Capture(CaptureKey, Box<NumPattern>),
    FromCapture(CaptureKey),
}

impl NumPattern {
    pub fn predicate(f: impl Fn(f64) -> bool + 'static) -> Self {
        NumPattern::Predicate(Rc::new(f))
    }

    fn match_num(&self, value: f64, captures: &mut Captures) -> bool {
        match self {
            NumPattern::Any => true,
            NumPattern::Exact(expected) => *expected == value,
            NumPattern::Predicate(f) => f(value),
            NumPattern::Capture(key, inner) => {
                if inner.match_num(value, captures) {
                    captures.insert(*key, Capture::Number(value));
                    true
                } else {
                    false
                }
            }
            NumPattern::FromCapture(key) => match captures.get(key) {
                Some(Capture::Number(captured)) => *captured == value,
                _ => missing_capture(*key),
            },
        }
    }
}

// =============================================================================
// Node patterns
// =============================================================================

/// Pattern over a single node slot.
///
/// Optional child slots and array holes are matched as `NodeIndex::NONE`:
/// only `Any`, `Absent` and captures/alternations of them accept an empty
/// slot.
#[derive(Clone)]
pub enum Pattern {
    Any,
    /// Empty optional slot or array hole.
    Absent,
    Capture(CaptureKey, Box<Pattern>),
    FromCapture(CaptureKey),
    Or(Vec<Pattern>),
    Predicate(Rc<dyn Fn(&NodeArena, NodeIndex) -> bool>),

    Identifier(StrPattern),
    StringLiteral(StrPattern),
    NumericLiteral(NumPattern),
    /// `None` accepts either value.
    BooleanLiteral(Option<bool>),
    ArrayExpression(ListPattern),
    Unary {
        operator: &'static str,
        argument: Box<Pattern>,
    },
    Update {
        operator: &'static str,
        /// `None` accepts prefix and postfix forms.
        prefix: Option<bool>,
        argument: Box<Pattern>,
    },
    Assignment {
        operator: &'static str,
        left: Box<Pattern>,
        right: Box<Pattern>,
    },
    Call {
        callee: Box<Pattern>,
        arguments: ListPattern,
    },
    Member {
        object: Box<Pattern>,
        property: Box<Pattern>,
        computed: Option<bool>,
    },
    FunctionExpression {
        id: Box<Pattern>,
        params: ListPattern,
        body: Box<Pattern>,
    },

    VariableDeclaration {
        kind: Option<VarKind>,
        declarations: ListPattern,
    },
    VariableDeclarator {
        id: Box<Pattern>,
        init: Box<Pattern>,
    },
    FunctionDeclaration {
        id: Box<Pattern>,
        params: ListPattern,
        body: Box<Pattern>,
    },
    Block(ListPattern),
    /// Top-level statement list.
    Program(ListPattern),
    ExpressionStatement(Box<Pattern>),
    Return(Box<Pattern>),
    Switch {
        discriminant: Box<Pattern>,
        cases: ListPattern,
    },
    SwitchCase {
        test: Box<Pattern>,
        consequent: ListPattern,
    },
    /// Unlabelled `break`.
    Break,
    /// Unlabelled `continue`.
    Continue,
    For {
        init: Box<Pattern>,
        test: Box<Pattern>,
        update: Box<Pattern>,
        body: Box<Pattern>,
    },
    While {
        test: Box<Pattern>,
        body: Box<Pattern>,
    },
}

impl Pattern {
    // -------------------------------------------------------------------------
    // Constructors
    // -------------------------------------------------------------------------

    pub fn capture(key: CaptureKey, inner: Pattern) -> Self {
        Pattern::Capture(key, Box::new(inner))
    }

    pub fn from_capture(key: CaptureKey) -> Self {
        Pattern::FromCapture(key)
    }

    pub fn or(alternatives: impl IntoIterator<Item = Pattern>) -> Self {
        Pattern::Or(alternatives.into_iter().collect())
    }

    pub fn predicate(f: impl Fn(&NodeArena, NodeIndex) -> bool + 'static) -> Self {
        Pattern::Predicate(Rc::new(f))
    }

    pub fn identifier(name: impl Into<StrPattern>) -> Self {
        Pattern::Identifier(name.into())
    }

    pub fn any_identifier() -> Self {
        Pattern::Identifier(StrPattern::Any)
    }

    pub fn string(value: impl Into<StrPattern>) -> Self {
        Pattern::StringLiteral(value.into())
    }

    pub fn any_string() -> Self {
        Pattern::StringLiteral(StrPattern::Any)
    }

    pub fn number(value: NumPattern) -> Self {
        Pattern::NumericLiteral(value)
    }

    pub fn unary(operator: &'static str, argument: Pattern) -> Self {
        Pattern::Unary {
            operator,
            argument: Box::new(argument),
        }
    }

    pub fn postfix_update(operator: &'static str, argument: Pattern) -> Self {
        Pattern::Update {
            operator,
            prefix: Some(false),
            argument: Box::new(argument),
        }
    }

    pub fn assignment(operator: &'static str, left: Pattern, right: Pattern) -> Self {
        Pattern::Assignment {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn call(callee: Pattern, arguments: ListPattern) -> Self {
        Pattern::Call {
            callee: Box::new(callee),
            arguments,
        }
    }

    pub fn member(object: Pattern, property: Pattern, computed: bool) -> Self {
        Pattern::Member {
            object: Box::new(object),
            property: Box::new(property),
            computed: Some(computed),
        }
    }

    pub fn function_expression(id: Pattern, params: ListPattern, body: Pattern) -> Self {
        Pattern::FunctionExpression {
            id: Box::new(id),
            params,
            body: Box::new(body),
        }
    }

    pub fn function_declaration(id: Pattern, params: ListPattern, body: Pattern) -> Self {
        Pattern::FunctionDeclaration {
            id: Box::new(id),
            params,
            body: Box::new(body),
        }
    }

    pub fn variable_declaration(kind: Option<VarKind>, declarations: ListPattern) -> Self {
        Pattern::VariableDeclaration { kind, declarations }
    }

    pub fn variable_declarator(id: Pattern, init: Pattern) -> Self {
        Pattern::VariableDeclarator {
            id: Box::new(id),
            init: Box::new(init),
        }
    }

    pub fn block(body: ListPattern) -> Self {
        Pattern::Block(body)
    }

    /// A block or program whose statements match `body`.
    pub fn statement_list(body: ListPattern) -> Self {
        Pattern::or([Pattern::Block(body.clone()), Pattern::Program(body)])
    }

    pub fn expression_statement(expression: Pattern) -> Self {
        Pattern::ExpressionStatement(Box::new(expression))
    }

    pub fn return_statement(argument: Pattern) -> Self {
        Pattern::Return(Box::new(argument))
    }

    pub fn switch_statement(discriminant: Pattern, cases: ListPattern) -> Self {
        Pattern::Switch {
            discriminant: Box::new(discriminant),
            cases,
        }
    }

    pub fn switch_case(test: Pattern, consequent: ListPattern) -> Self {
        Pattern::SwitchCase {
            test: Box::new(test),
            consequent,
        }
    }

    pub fn for_statement(init: Pattern, test: Pattern, update: Pattern, body: Pattern) -> Self {
        Pattern::For {
            init: Box::new(init),
            test: Box::new(test),
            update: Box::new(update),
            body: Box::new(body),
        }
    }

    pub fn while_statement(test: Pattern, body: Pattern) -> Self {
        Pattern::While {
            test: Box::new(test),
            body: Box::new(body),
        }
    }

    // -------------------------------------------------------------------------
    // Matching
    // -------------------------------------------------------------------------

    /// Match within the current attempt: earlier captures stay visible for
    /// backreferences, and captures made by a failed match are rolled back.
    pub fn matches_within(&self, arena: &NodeArena, node: NodeIndex, captures: &mut Captures) -> bool {
        let checkpoint = captures.checkpoint();
        if self.match_node(arena, node, captures) {
            return true;
        }
        captures.rollback(checkpoint);
        false
    }

    fn match_node(&self, arena: &NodeArena, node: NodeIndex, captures: &mut Captures) -> bool {
        match self {
            Pattern::Any => true,
            Pattern::Absent => node.is_none(),
            Pattern::Capture(key, inner) => {
                if inner.matches_within(arena, node, captures) {
                    captures.insert(*key, Capture::Node(node));
                    true
                } else {
                    false
                }
            }
            Pattern::FromCapture(key) => match captures.get(key) {
                Some(Capture::Node(captured)) => {
                    if captured.is_none() || node.is_none() {
                        captured.is_none() && node.is_none()
                    } else {
                        arena.structurally_equal(*captured, node)
                    }
                }
                Some(Capture::Str(value)) => {
                    arena.name(node) == Some(value.as_str())
                        || arena.string_value(node) == Some(value.as_str())
                }
                Some(Capture::Number(value)) => arena.number_value(node) == Some(*value),
                Some(Capture::List(_)) | None => missing_capture(*key),
            },
            Pattern::Or(alternatives) => alternatives
                .iter()
                .any(|alternative| alternative.matches_within(arena, node, captures)),
            Pattern::Predicate(f) => node.is_some() && f(arena, node),
            _ => match arena.get(node) {
                Some(n) => self.match_kind(arena, &n.kind, captures),
                None => false,
            },
        }
    }

    fn match_kind(&self, arena: &NodeArena, kind: &NodeKind, captures: &mut Captures) -> bool {
        let opt = |slot: &Option<NodeIndex>| slot.unwrap_or(NodeIndex::NONE);
        match (self, kind) {
            (Pattern::Identifier(p), NodeKind::Identifier { name }) => p.match_str(name, captures),
            (Pattern::StringLiteral(p), NodeKind::StringLiteral { value }) => {
                p.match_str(value, captures)
            }
            (Pattern::NumericLiteral(p), NodeKind::NumericLiteral { value }) => {
                p.match_num(*value, captures)
            }
            (Pattern::BooleanLiteral(expected), NodeKind::BooleanLiteral { value }) => {
                expected.is_none_or(|expected| expected == *value)
            }
            (Pattern::ArrayExpression(p), NodeKind::ArrayExpression { elements }) => {
                let slots: SmallVec<[NodeIndex; 16]> = elements.iter().map(opt).collect();
                p.match_list(arena, &slots, captures)
            }
            (
                Pattern::Unary { operator, argument },
                NodeKind::UnaryExpression {
                    operator: actual,
                    argument: arg,
                },
            ) => operator == actual && argument.match_node(arena, *arg, captures),
            (
                Pattern::Update {
                    operator,
                    prefix,
                    argument,
                },
                NodeKind::UpdateExpression {
                    operator: actual,
                    prefix: actual_prefix,
                    argument: arg,
                },
            ) => {
                operator == actual
                    && prefix.is_none_or(|prefix| prefix == *actual_prefix)
                    && argument.match_node(arena, *arg, captures)
            }
            (
                Pattern::Assignment {
                    operator,
                    left,
                    right,
                },
                NodeKind::AssignmentExpression {
                    operator: actual,
                    left: l,
                    right: r,
                },
            ) => {
                operator == actual
                    && left.match_node(arena, *l, captures)
                    && right.match_node(arena, *r, captures)
            }
            (
                Pattern::Call { callee, arguments },
                NodeKind::CallExpression {
                    callee: c,
                    arguments: args,
                },
            ) => callee.match_node(arena, *c, captures) && arguments.match_list(arena, args, captures),
            (
                Pattern::Member {
                    object,
                    property,
                    computed,
                },
                NodeKind::MemberExpression {
                    object: o,
                    property: p,
                    computed: c,
                },
            ) => {
                computed.is_none_or(|computed| computed == *c)
                    && object.match_node(arena, *o, captures)
                    && property.match_node(arena, *p, captures)
            }
            (
                Pattern::FunctionExpression { id, params, body },
                NodeKind::FunctionExpression(func),
            )
            | (
                Pattern::FunctionDeclaration { id, params, body },
                NodeKind::FunctionDeclaration(func),
            ) => {
                id.match_node(arena, opt(&func.id), captures)
                    && params.match_list(arena, &func.params, captures)
                    && body.match_node(arena, func.body, captures)
            }
            (
                Pattern::VariableDeclaration { kind, declarations },
                NodeKind::VariableDeclaration {
                    kind: actual,
                    declarations: decls,
                },
            ) => {
                kind.is_none_or(|kind| kind == *actual)
                    && declarations.match_list(arena, decls, captures)
            }
            (
                Pattern::VariableDeclarator { id, init },
                NodeKind::VariableDeclarator { id: i, init: value },
            ) => id.match_node(arena, *i, captures) && init.match_node(arena, opt(value), captures),
            (Pattern::Block(p), NodeKind::BlockStatement { body })
            | (Pattern::Program(p), NodeKind::Program { body }) => {
                p.match_list(arena, body, captures)
            }
            (Pattern::ExpressionStatement(p), NodeKind::ExpressionStatement { expression }) => {
                p.match_node(arena, *expression, captures)
            }
            (Pattern::Return(p), NodeKind::ReturnStatement { argument }) => {
                p.match_node(arena, opt(argument), captures)
            }
            (
                Pattern::Switch {
                    discriminant,
                    cases,
                },
                NodeKind::SwitchStatement {
                    discriminant: d,
                    cases: c,
                },
            ) => discriminant.match_node(arena, *d, captures) && cases.match_list(arena, c, captures),
            (
                Pattern::SwitchCase { test, consequent },
                NodeKind::SwitchCase {
                    test: t,
                    consequent: c,
                },
            ) => test.match_node(arena, opt(t), captures) && consequent.match_list(arena, c, captures),
            (Pattern::Break, NodeKind::BreakStatement { label }) => label.is_none(),
            (Pattern::Continue, NodeKind::ContinueStatement { label }) => label.is_none(),
            (
                Pattern::For {
                    init,
                    test,
                    update,
                    body,
                },
                NodeKind::ForStatement {
                    init: i,
                    test: t,
                    update: u,
                    body: b,
                },
            ) => {
                init.match_node(arena, opt(i), captures)
                    && test.match_node(arena, opt(t), captures)
                    && update.match_node(arena, opt(u), captures)
                    && body.match_node(arena, *b, captures)
            }
            (Pattern::While { test, body }, NodeKind::WhileStatement { test: t, body: b }) => {
                test.match_node(arena, *t, captures) && body.match_node(arena, *b, captures)
            }
            _ => false,
        }
    }
}

// =============================================================================
// List patterns
// =============================================================================

/// Item of an `AnyList` sequence.
#[derive(Clone)]
pub enum ListItem {
    One(Pattern),
    /// Any number of siblings, tried shortest first.
    ZeroOrMore,
}

/// Pattern over a list of sibling slots (statements, arguments, elements).
#[derive(Clone)]
pub enum ListPattern {
    Any,
    /// Exactly these items, in order.
    Exact(Vec<Pattern>),
    /// Every item matches the pattern (the empty list included).
    ArrayOf(Box<Pattern>),
    /// A sequence of single items and wildcards, matched with backtracking.
    AnyList(Vec<ListItem>),
    Capture(CaptureKey, Box<ListPattern>),
}

impl ListPattern {
    pub fn exact(items: impl IntoIterator<Item = Pattern>) -> Self {
        ListPattern::Exact(items.into_iter().collect())
    }

    pub fn empty() -> Self {
        ListPattern::Exact(Vec::new())
    }

    pub fn array_of(item: Pattern) -> Self {
        ListPattern::ArrayOf(Box::new(item))
    }

    pub fn any_list(items: impl IntoIterator<Item = ListItem>) -> Self {
        ListPattern::AnyList(items.into_iter().collect())
    }

    pub fn capture(key: CaptureKey, inner: ListPattern) -> Self {
        ListPattern::Capture(key, Box::new(inner))
    }

    fn match_list(&self, arena: &NodeArena, nodes: &[NodeIndex], captures: &mut Captures) -> bool {
        match self {
            ListPattern::Any => true,
            ListPattern::Exact(patterns) => {
                patterns.len() == nodes.len()
                    && patterns
                        .iter()
                        .zip(nodes)
                        .all(|(pattern, &node)| pattern.match_node(arena, node, captures))
            }
            ListPattern::ArrayOf(pattern) => nodes
                .iter()
                .all(|&node| pattern.match_node(arena, node, captures)),
            ListPattern::AnyList(items) => Self::match_items(items, arena, nodes, captures),
            ListPattern::Capture(key, inner) => {
                let checkpoint = captures.checkpoint();
                if inner.match_list(arena, nodes, captures) {
                    captures.insert(*key, Capture::List(nodes.to_vec()));
                    true
                } else {
                    captures.rollback(checkpoint);
                    false
                }
            }
        }
    }

    fn match_items(
        items: &[ListItem],
        arena: &NodeArena,
        nodes: &[NodeIndex],
        captures: &mut Captures,
    ) -> bool {
        let Some((first, rest)) = items.split_first() else {
            return nodes.is_empty();
        };
        match first {
            ListItem::One(pattern) => {
                let Some((&node, tail)) = nodes.split_first() else {
                    return false;
                };
                let checkpoint = captures.checkpoint();
                if pattern.match_node(arena, node, captures)
                    && Self::match_items(rest, arena, tail, captures)
                {
                    return true;
                }
                captures.rollback(checkpoint);
                false
            }
            ListItem::ZeroOrMore => (0..=nodes.len()).any(|skip| {
                let checkpoint = captures.checkpoint();
                if Self::match_items(rest, arena, &nodes[skip..], captures) {
                    return true;
                }
                captures.rollback(checkpoint);
                false
            }),
        }
    }
}

// =============================================================================
// Matcher
// =============================================================================

/// Entry point for top-level match attempts.
#[derive(Clone)]
pub struct Matcher {
    name: &'static str,
    pattern: Pattern,
}

impl Matcher {
    pub fn new(name: &'static str, pattern: Pattern) -> Self {
        Matcher { name, pattern }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Start a fresh attempt on `node`. Captures from earlier attempts are
    /// discarded first; on success the table holds this attempt's captures.
    pub fn matches(&self, arena: &NodeArena, node: NodeIndex, captures: &mut Captures) -> bool {
        captures.clear();
        let matched = self.pattern.match_node(arena, node, captures);
        if matched {
            trace!(matcher = self.name, ?node, "pattern matched");
        }
        matched
    }
}

#[cfg(test)]
#[path = "tests/pattern_tests.rs"]
mod tests;
