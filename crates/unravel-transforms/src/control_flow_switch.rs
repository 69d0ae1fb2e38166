//! Control-flow flattening reversal.
//!
//! Obfuscators flatten a block into a dispatcher loop that replays the
//! original statements in the order given by a sequence string:
//!
//! ```js
//! var seq = "2|0|1".split("|"), i = 0;   // two statements in practice
//! while (true) {
//!     switch (seq[i++]) {
//!         case "0": A; continue;
//!         case "1": B; continue;
//!         case "2": C; continue;
//!     }
//!     break;
//! }
//! ```
//!
//! The pass replaces the three statements with `C; A; B;`.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;
use unravel_ast::{NodeArena, NodeIndex, NodeKind, VarKind};
use unravel_matcher::{
    Captures, ListItem, ListPattern, Matcher, Pattern, StrPattern, const_member_expression,
    declaration_or_assignment, infinite_loop,
};

use crate::const_eval::eval_number;
use crate::transform::{Transform, TransformContext, expect_list, expect_node, expect_string};

pub struct ControlFlowSwitch {
    matcher: Matcher,
    captures: Captures,
}

impl Default for ControlFlowSwitch {
    fn default() -> Self {
        ControlFlowSwitch::new()
    }
}

impl ControlFlowSwitch {
    pub fn new() -> Self {
        ControlFlowSwitch {
            matcher: Matcher::new("control-flow-switch", dispatcher_pattern()),
            captures: Captures::new(),
        }
    }

    /// Flatten the first dispatcher in `owner`. Returns `false` when nothing
    /// matched or a secondary check failed.
    fn flatten(&mut self, cx: &mut TransformContext<'_>, owner: NodeIndex) -> bool {
        if !self
            .matcher
            .matches(&cx.program.arena, owner, &mut self.captures)
        {
            return false;
        }
        let Some(dispatcher) = Dispatcher::from_captures(&self.captures) else {
            return false;
        };
        if !dispatcher.is_consistent(cx) || !dispatcher.preserves_behavior(cx, owner) {
            return false;
        }
        let Some(position) = cx
            .program
            .arena
            .statements(owner)
            .and_then(|list| list.iter().position(|&s| s == dispatcher.sequence_decl))
        else {
            return false;
        };

        let program = &mut *cx.program;
        let owner_scope = program.binder.scope_of(&program.arena, owner);
        if let Some(switch_scope) = program.binder.scope_for_node(dispatcher.switch) {
            program.binder.merge_scope_into(switch_scope, owner_scope);
        }

        let (bodies, mut unused) = collect_case_bodies(&mut program.arena, &dispatcher.cases);

        let mut emitted = Vec::new();
        let mut clones = Vec::new();
        let mut replayed: FxHashMap<&str, bool> = FxHashMap::default();
        for token in dispatcher.sequence.split('|') {
            let Some(body) = bodies.get(token) else {
                continue;
            };
            let seen = replayed.entry(token).or_insert(false);
            if *seen {
                for &stmt in body {
                    let copy = program.arena.clone_subtree(stmt);
                    clones.push(copy);
                    emitted.push(copy);
                }
            } else {
                *seen = true;
                emitted.extend(body.iter().copied());
            }
        }
        for (label, body) in &bodies {
            if !replayed.contains_key(label.as_str()) {
                unused.extend(body.iter().copied());
            }
        }

        for stmt in unused {
            program.binder.forget_subtree(&program.arena, stmt);
        }
        for stmt in [
            dispatcher.sequence_decl,
            dispatcher.iterator_decl,
            dispatcher.dispatch_loop,
        ] {
            program.binder.forget_subtree(&program.arena, stmt);
        }

        let count = emitted.len();
        program.arena.splice_statements(owner, position, 3, emitted);
        for copy in clones {
            program.binder.bind_subtree(&program.arena, copy);
        }

        debug!(
            sequence = %dispatcher.sequence,
            statements = count,
            "control flow dispatcher flattened"
        );
        cx.add_changes(count + 3);
        true
    }
}

impl Transform for ControlFlowSwitch {
    fn name(&self) -> &'static str {
        "control-flow-switch"
    }

    fn requires_scope(&self) -> bool {
        true
    }

    fn visits(&self, kind: &NodeKind) -> bool {
        matches!(kind, NodeKind::BlockStatement { .. } | NodeKind::Program { .. })
    }

    fn exit(&mut self, cx: &mut TransformContext<'_>, node: NodeIndex) {
        while self.flatten(cx, node) {}
    }
}

/// Captured pieces of one dispatcher construct.
struct Dispatcher {
    sequence: String,
    sequence_decl: NodeIndex,
    sequence_id: NodeIndex,
    sequence_ref: NodeIndex,
    iterator_decl: NodeIndex,
    iterator_id: NodeIndex,
    iterator_ref: NodeIndex,
    iterator_init: NodeIndex,
    dispatch_loop: NodeIndex,
    switch: NodeIndex,
    cases: Vec<NodeIndex>,
}

impl Dispatcher {
    fn from_captures(captures: &Captures) -> Option<Dispatcher> {
        Some(Dispatcher {
            sequence: expect_string(captures, "sequence_string")?.to_string(),
            sequence_decl: expect_node(captures, "sequence_decl")?,
            sequence_id: expect_node(captures, "sequence_id")?,
            sequence_ref: expect_node(captures, "sequence_ref")?,
            iterator_decl: expect_node(captures, "iterator_decl")?,
            iterator_id: expect_node(captures, "iterator_id")?,
            iterator_ref: expect_node(captures, "iterator_ref")?,
            // An absent initializer is captured as NONE.
            iterator_init: captures.node("iterator_init").unwrap_or(NodeIndex::NONE),
            dispatch_loop: expect_node(captures, "loop")?,
            switch: expect_node(captures, "switch")?,
            cases: expect_list(captures, "cases")?.to_vec(),
        })
    }

    /// The iterator starts at zero and both discriminant identifiers resolve
    /// to the bindings the two leading statements set up.
    fn is_consistent(&self, cx: &TransformContext<'_>) -> bool {
        if eval_number(&cx.program.arena, self.iterator_init) != Some(0.0) {
            return false;
        }
        let binder = &cx.program.binder;
        binder.binding_of(self.sequence_id) == binder.binding_of(self.sequence_ref)
            && binder.binding_of(self.iterator_id) == binder.binding_of(self.iterator_ref)
    }

    /// Straight-line replay runs every executed case body exactly as the loop
    /// did. That fails when a body jumps out of the dispatcher early, falls
    /// through into the next case, or declares a lexical binding that would
    /// be replayed twice or would clash with a name `owner` already sees.
    fn preserves_behavior(&self, cx: &TransformContext<'_>, owner: NodeIndex) -> bool {
        let arena = &cx.program.arena;
        let tokens: Vec<&str> = self.sequence.split('|').collect();
        let mut runs: FxHashMap<&str, usize> = FxHashMap::default();
        for &token in &tokens {
            *runs.entry(token).or_default() += 1;
        }

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for (position, &case) in self.cases.iter().enumerate() {
            let label = match arena.kind(case) {
                NodeKind::SwitchCase { test: Some(test), .. } => arena.string_value(*test),
                _ => None,
            };
            // Later duplicates only run by falling through, which the check
            // on the preceding case rules out.
            let Some(label) = label.filter(|label| seen.insert(*label)) else {
                continue;
            };
            let Some(&count) = runs.get(label) else {
                continue;
            };
            let mut body = arena.statements(case).unwrap_or_default();
            let ends_with_continue = body.last().is_some_and(|&last| {
                matches!(arena.kind(last), NodeKind::ContinueStatement { label: None })
            });
            if ends_with_continue {
                body = &body[..body.len() - 1];
            }

            if body.iter().any(|&stmt| jumps_to_dispatcher(arena, stmt)) {
                return false;
            }
            // A body that completes normally falls into the next case, or
            // leaves the switch and hits the loop's `break`. Only the last
            // case run as the last token behaves the same flattened.
            if !ends_with_continue && !ends_abruptly(arena, body.last().copied()) {
                let last_case = position + 1 == self.cases.len();
                if !last_case || count != 1 || tokens.last() != Some(&label) {
                    return false;
                }
            }
            if count > 1 && body.iter().any(|&stmt| is_lexical_declaration(arena, stmt)) {
                return false;
            }
        }

        let binder = &cx.program.binder;
        let Some(switch_scope) = binder.scope_for_node(self.switch).and_then(|id| binder.scope(id))
        else {
            return true;
        };
        let owner_scope = binder.scope_of(arena, owner);
        switch_scope.bindings.keys().all(|name| {
            binder.get_binding(owner_scope, name).is_none() && !binder.has_global(name)
        })
    }
}

/// An unlabelled `break` or `continue` inside `stmt` that leaves the case
/// body for the dispatcher switch or loop. Jumps caught by a nested loop or
/// switch, and anything inside nested functions or classes, do not count.
fn jumps_to_dispatcher(arena: &NodeArena, stmt: NodeIndex) -> bool {
    let mut stack = vec![(stmt, false, false)];
    while let Some((node, in_loop, in_switch)) = stack.pop() {
        let Some(kind) = arena.get(node).map(|n| &n.kind) else {
            continue;
        };
        match kind {
            NodeKind::BreakStatement { label: None } if !in_loop && !in_switch => return true,
            NodeKind::ContinueStatement { label: None } if !in_loop => return true,
            _ if kind.is_function() || kind.is_class() => continue,
            _ => {}
        }
        let in_loop = in_loop
            || matches!(
                kind,
                NodeKind::ForStatement { .. }
                    | NodeKind::ForInStatement { .. }
                    | NodeKind::ForOfStatement { .. }
                    | NodeKind::WhileStatement { .. }
                    | NodeKind::DoWhileStatement { .. }
            );
        let in_switch = in_switch || matches!(kind, NodeKind::SwitchStatement { .. });
        stack.extend(
            arena
                .children(node)
                .into_iter()
                .map(|child| (child, in_loop, in_switch)),
        );
    }
    false
}

/// The case body cannot complete normally through its last statement.
fn ends_abruptly(arena: &NodeArena, last: Option<NodeIndex>) -> bool {
    last.is_some_and(|stmt| {
        matches!(
            arena.kind(stmt),
            NodeKind::ReturnStatement { .. }
                | NodeKind::ThrowStatement { .. }
                | NodeKind::BreakStatement { label: Some(_) }
                | NodeKind::ContinueStatement { label: Some(_) }
        )
    })
}

/// Declares a binding scoped to the enclosing block.
fn is_lexical_declaration(arena: &NodeArena, stmt: NodeIndex) -> bool {
    matches!(
        arena.kind(stmt),
        NodeKind::VariableDeclaration {
            kind: VarKind::Let | VarKind::Const,
            ..
        } | NodeKind::ClassDeclaration(_)
            | NodeKind::FunctionDeclaration(_)
    )
}

/// Take the statements out of every case. The first case with a given label
/// owns it; bodies of later duplicates are returned as unused. A trailing
/// unlabelled `continue` is dropped.
fn collect_case_bodies(
    arena: &mut NodeArena,
    cases: &[NodeIndex],
) -> (FxHashMap<String, Vec<NodeIndex>>, Vec<NodeIndex>) {
    let mut bodies: FxHashMap<String, Vec<NodeIndex>> = FxHashMap::default();
    let mut unused = Vec::new();
    for &case in cases {
        let label = match arena.kind(case) {
            NodeKind::SwitchCase { test: Some(test), .. } => arena.string_value(*test),
            _ => None,
        };
        let Some(label) = label.map(str::to_string) else {
            continue;
        };
        let mut body = arena.take_statements(case);
        if let Some(&last) = body.last()
            && matches!(arena.kind(last), NodeKind::ContinueStatement { label: None })
        {
            body.pop();
            unused.push(last);
        }
        if bodies.contains_key(&label) {
            unused.extend(body);
        } else {
            bodies.insert(label, body);
        }
    }
    (bodies, unused)
}

fn is_case_label(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn is_sequence_string(text: &str) -> bool {
    text.split('|').all(is_case_label)
}

/// `seq = "<digits|...>".split("|")`, `iter = <init>` and the dispatcher
/// loop, as three consecutive statements of a block or program.
fn dispatcher_pattern() -> Pattern {
    let sequence_decl = declaration_or_assignment(
        Pattern::capture(
            "sequence_id",
            Pattern::identifier(StrPattern::capture("sequence")),
        ),
        Pattern::call(
            const_member_expression(
                Pattern::string(StrPattern::capture_with(
                    "sequence_string",
                    StrPattern::predicate(is_sequence_string),
                )),
                "split",
            ),
            ListPattern::exact([Pattern::string("|")]),
        ),
    );
    let iterator_decl = declaration_or_assignment(
        Pattern::capture(
            "iterator_id",
            Pattern::identifier(StrPattern::capture("iterator")),
        ),
        Pattern::capture("iterator_init", Pattern::Any),
    );
    let discriminant = Pattern::member(
        Pattern::capture(
            "sequence_ref",
            Pattern::identifier(StrPattern::FromCapture("sequence")),
        ),
        Pattern::postfix_update(
            "++",
            Pattern::capture(
                "iterator_ref",
                Pattern::identifier(StrPattern::FromCapture("iterator")),
            ),
        ),
        true,
    );
    let cases = ListPattern::capture(
        "cases",
        ListPattern::array_of(Pattern::switch_case(
            Pattern::string(StrPattern::predicate(is_case_label)),
            ListPattern::Any,
        )),
    );
    let dispatch_loop = infinite_loop(Pattern::block(ListPattern::exact([
        Pattern::capture("switch", Pattern::switch_statement(discriminant, cases)),
        Pattern::Break,
    ])));

    Pattern::statement_list(ListPattern::any_list([
        ListItem::ZeroOrMore,
        ListItem::One(Pattern::capture("sequence_decl", sequence_decl)),
        ListItem::One(Pattern::capture("iterator_decl", iterator_decl)),
        ListItem::One(Pattern::capture("loop", dispatch_loop)),
        ListItem::ZeroOrMore,
    ]))
}

#[cfg(test)]
#[path = "tests/control_flow_switch_tests.rs"]
mod tests;
