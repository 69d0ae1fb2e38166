//! JavaScript printer for arena nodes.
//!
//! Emits four-space indented, semicolon-terminated JavaScript with
//! double-quoted strings. Parentheses are inserted from operator precedence
//! only, so the output of a parse/print round trip is normalized rather than
//! byte-identical to the input.

use crate::base::NodeIndex;
use crate::node::{ArrowData, ClassData, FunctionData, MethodKind, NodeKind};
use crate::node_arena::NodeArena;

/// Operator precedence levels, loosest first.
mod prec {
    pub const SEQUENCE: u8 = 1;
    pub const ASSIGN: u8 = 2;
    pub const CONDITIONAL: u8 = 3;
    pub const LOGICAL_OR: u8 = 4;
    pub const LOGICAL_AND: u8 = 5;
    pub const BIT_OR: u8 = 6;
    pub const BIT_XOR: u8 = 7;
    pub const BIT_AND: u8 = 8;
    pub const EQUALITY: u8 = 9;
    pub const RELATIONAL: u8 = 10;
    pub const SHIFT: u8 = 11;
    pub const ADDITIVE: u8 = 12;
    pub const MULTIPLICATIVE: u8 = 13;
    pub const EXPONENT: u8 = 14;
    pub const UNARY: u8 = 15;
    pub const POSTFIX: u8 = 16;
    pub const CALL: u8 = 17;
    pub const PRIMARY: u8 = 18;
}

fn binary_precedence(operator: &str) -> u8 {
    match operator {
        "??" | "||" => prec::LOGICAL_OR,
        "&&" => prec::LOGICAL_AND,
        "|" => prec::BIT_OR,
        "^" => prec::BIT_XOR,
        "&" => prec::BIT_AND,
        "==" | "!=" | "===" | "!==" => prec::EQUALITY,
        "<" | ">" | "<=" | ">=" | "in" | "instanceof" => prec::RELATIONAL,
        "<<" | ">>" | ">>>" => prec::SHIFT,
        "+" | "-" => prec::ADDITIVE,
        "*" | "/" | "%" => prec::MULTIPLICATIVE,
        "**" => prec::EXPONENT,
        _ => prec::RELATIONAL,
    }
}

fn precedence(kind: &NodeKind) -> u8 {
    match kind {
        NodeKind::SequenceExpression { .. } => prec::SEQUENCE,
        NodeKind::AssignmentExpression { .. }
        | NodeKind::ArrowFunctionExpression(_)
        | NodeKind::YieldExpression { .. } => prec::ASSIGN,
        NodeKind::ConditionalExpression { .. } => prec::CONDITIONAL,
        NodeKind::BinaryExpression { operator, .. }
        | NodeKind::LogicalExpression { operator, .. } => binary_precedence(operator),
        NodeKind::UnaryExpression { .. } | NodeKind::AwaitExpression { .. } => prec::UNARY,
        NodeKind::UpdateExpression { prefix: true, .. } => prec::UNARY,
        NodeKind::UpdateExpression { prefix: false, .. } => prec::POSTFIX,
        NodeKind::CallExpression { .. }
        | NodeKind::NewExpression { .. }
        | NodeKind::MemberExpression { .. } => prec::CALL,
        _ => prec::PRIMARY,
    }
}

/// Format a number the way JavaScript's `Number.prototype.toString` does:
/// shortest round-trip digits, exponent form below 1e-6 and from 1e21 up.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let formatted = format!("{value:e}");
        return match formatted.split_once('e') {
            Some((digits, exponent)) if !exponent.starts_with('-') => {
                format!("{digits}e+{exponent}")
            }
            _ => formatted,
        };
    }
    if value.fract() == 0.0 {
        return format!("{value:.0}");
    }
    format!("{value}")
}

/// Double-quoted JavaScript string literal.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

pub struct Printer<'a> {
    arena: &'a NodeArena,
    output: String,
    indent_level: usize,
}

impl<'a> Printer<'a> {
    pub fn new(arena: &'a NodeArena) -> Self {
        Printer {
            arena,
            output: String::new(),
            indent_level: 0,
        }
    }

    /// Print any node (program, statement or expression) to a string.
    pub fn print(arena: &NodeArena, node: NodeIndex) -> String {
        let mut printer = Printer::new(arena);
        printer.emit(node);
        printer.finish()
    }

    pub fn finish(self) -> String {
        self.output
    }

    pub fn emit(&mut self, node: NodeIndex) {
        if Self::is_statement(self.arena.kind(node)) {
            self.emit_statement(node);
        } else {
            self.emit_expression(node, prec::SEQUENCE);
        }
    }

    fn is_statement(kind: &NodeKind) -> bool {
        matches!(
            kind,
            NodeKind::Program { .. }
                | NodeKind::ExpressionStatement { .. }
                | NodeKind::BlockStatement { .. }
                | NodeKind::EmptyStatement
                | NodeKind::VariableDeclaration { .. }
                | NodeKind::FunctionDeclaration(_)
                | NodeKind::ClassDeclaration(_)
                | NodeKind::ReturnStatement { .. }
                | NodeKind::IfStatement { .. }
                | NodeKind::ForStatement { .. }
                | NodeKind::ForInStatement { .. }
                | NodeKind::ForOfStatement { .. }
                | NodeKind::WhileStatement { .. }
                | NodeKind::DoWhileStatement { .. }
                | NodeKind::SwitchStatement { .. }
                | NodeKind::BreakStatement { .. }
                | NodeKind::ContinueStatement { .. }
                | NodeKind::ThrowStatement { .. }
                | NodeKind::TryStatement { .. }
                | NodeKind::LabeledStatement { .. }
                | NodeKind::ImportDeclaration { .. }
                | NodeKind::ExportNamedDeclaration { .. }
                | NodeKind::ExportDefaultDeclaration { .. }
        )
    }

    // =========================================================================
    // Output helpers
    // =========================================================================

    fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn newline(&mut self) {
        self.output.push('\n');
        for _ in 0..self.indent_level {
            self.output.push_str("    ");
        }
    }

    fn emit_comma_list(&mut self, items: &[NodeIndex]) {
        for (i, &item) in items.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_expression(item, prec::ASSIGN);
        }
    }

    fn emit_elements(&mut self, elements: &[Option<NodeIndex>]) {
        self.write("[");
        for (i, element) in elements.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            if let Some(element) = element {
                self.emit_expression(*element, prec::ASSIGN);
            }
        }
        if matches!(elements.last(), Some(None)) {
            self.write(",");
        }
        self.write("]");
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn emit_statement_list(&mut self, statements: &[NodeIndex]) {
        for &stmt in statements {
            self.newline();
            self.emit_statement(stmt);
        }
    }

    fn emit_block(&mut self, statements: &[NodeIndex]) {
        if statements.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.indent_level += 1;
        self.emit_statement_list(statements);
        self.indent_level -= 1;
        self.newline();
        self.write("}");
    }

    /// Body of `if`/loops: blocks stay on the header line, other statements
    /// follow after a space.
    fn emit_body(&mut self, body: NodeIndex) {
        let arena = self.arena;
        match arena.kind(body) {
            NodeKind::EmptyStatement => self.write(";"),
            _ => {
                self.write(" ");
                self.emit_statement(body);
            }
        }
    }

    fn emit_statement(&mut self, idx: NodeIndex) {
        let arena = self.arena;
        match arena.kind(idx) {
            NodeKind::Program { body } => {
                for (i, &stmt) in body.iter().enumerate() {
                    if i > 0 {
                        self.newline();
                    }
                    self.emit_statement(stmt);
                }
            }
            NodeKind::ExpressionStatement { expression } => {
                if self.starts_with(*expression, |kind| {
                    matches!(
                        kind,
                        NodeKind::FunctionExpression(_)
                            | NodeKind::ClassExpression(_)
                            | NodeKind::ObjectExpression { .. }
                            | NodeKind::ObjectPattern { .. }
                    )
                }) {
                    self.write("(");
                    self.emit_expression(*expression, prec::SEQUENCE);
                    self.write(")");
                } else {
                    self.emit_expression(*expression, prec::SEQUENCE);
                }
                self.write(";");
            }
            NodeKind::BlockStatement { body } => self.emit_block(body),
            NodeKind::EmptyStatement => self.write(";"),
            NodeKind::VariableDeclaration { .. } => {
                self.emit_variable_declaration(idx);
                self.write(";");
            }
            NodeKind::FunctionDeclaration(func) => self.emit_function(func),
            NodeKind::ClassDeclaration(class) => self.emit_class(class),
            NodeKind::ReturnStatement { argument } => {
                self.write("return");
                if let Some(argument) = argument {
                    self.write(" ");
                    self.emit_expression(*argument, prec::SEQUENCE);
                }
                self.write(";");
            }
            NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                self.write("if (");
                self.emit_expression(*test, prec::SEQUENCE);
                self.write(")");
                // `if (a) if (b) x; else y;` would rebind the else.
                let dangling = alternate.is_some()
                    && matches!(
                        arena.kind(*consequent),
                        NodeKind::IfStatement {
                            alternate: None,
                            ..
                        }
                    );
                if dangling {
                    self.write(" ");
                    self.emit_block(&[*consequent]);
                } else {
                    self.emit_body(*consequent);
                }
                if let Some(alternate) = alternate {
                    if matches!(arena.kind(*consequent), NodeKind::BlockStatement { .. }) || dangling
                    {
                        self.write(" else");
                    } else {
                        self.newline();
                        self.write("else");
                    }
                    self.emit_body(*alternate);
                }
            }
            NodeKind::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                self.write("for (");
                if let Some(init) = init {
                    self.emit_for_head(*init);
                }
                self.write(";");
                if let Some(test) = test {
                    self.write(" ");
                    self.emit_expression(*test, prec::SEQUENCE);
                }
                self.write(";");
                if let Some(update) = update {
                    self.write(" ");
                    self.emit_expression(*update, prec::SEQUENCE);
                }
                self.write(")");
                self.emit_body(*body);
            }
            NodeKind::ForInStatement { left, right, body }
            | NodeKind::ForOfStatement { left, right, body } => {
                let keyword = if matches!(arena.kind(idx), NodeKind::ForInStatement { .. }) {
                    " in "
                } else {
                    " of "
                };
                self.write("for (");
                self.emit_for_head(*left);
                self.write(keyword);
                self.emit_expression(*right, prec::ASSIGN);
                self.write(")");
                self.emit_body(*body);
            }
            NodeKind::WhileStatement { test, body } => {
                self.write("while (");
                self.emit_expression(*test, prec::SEQUENCE);
                self.write(")");
                self.emit_body(*body);
            }
            NodeKind::DoWhileStatement { body, test } => {
                self.write("do");
                self.emit_body(*body);
                self.write(" while (");
                self.emit_expression(*test, prec::SEQUENCE);
                self.write(");");
            }
            NodeKind::SwitchStatement {
                discriminant,
                cases,
            } => {
                self.write("switch (");
                self.emit_expression(*discriminant, prec::SEQUENCE);
                self.write(") {");
                self.indent_level += 1;
                for &case in cases {
                    self.newline();
                    self.emit_switch_case(case);
                }
                self.indent_level -= 1;
                self.newline();
                self.write("}");
            }
            NodeKind::SwitchCase { .. } => self.emit_switch_case(idx),
            NodeKind::BreakStatement { label } => {
                self.write("break");
                if let Some(label) = label {
                    self.write(" ");
                    self.write(label);
                }
                self.write(";");
            }
            NodeKind::ContinueStatement { label } => {
                self.write("continue");
                if let Some(label) = label {
                    self.write(" ");
                    self.write(label);
                }
                self.write(";");
            }
            NodeKind::ThrowStatement { argument } => {
                self.write("throw ");
                self.emit_expression(*argument, prec::SEQUENCE);
                self.write(";");
            }
            NodeKind::TryStatement {
                block,
                handler,
                finalizer,
            } => {
                self.write("try ");
                self.emit_statement(*block);
                if let Some(handler) = handler {
                    self.write(" ");
                    self.emit_statement(*handler);
                }
                if let Some(finalizer) = finalizer {
                    self.write(" finally ");
                    self.emit_statement(*finalizer);
                }
            }
            NodeKind::CatchClause { param, body } => {
                self.write("catch ");
                if let Some(param) = param {
                    self.write("(");
                    self.emit_expression(*param, prec::ASSIGN);
                    self.write(") ");
                }
                self.emit_statement(*body);
            }
            NodeKind::LabeledStatement { label, body } => {
                self.write(label);
                self.write(":");
                self.emit_body(*body);
            }
            NodeKind::ImportDeclaration { specifiers, source } => {
                self.emit_import(specifiers, source);
            }
            NodeKind::ExportNamedDeclaration {
                declaration,
                specifiers,
                source,
            } => {
                self.write("export ");
                if let Some(declaration) = declaration {
                    self.emit_statement(*declaration);
                } else {
                    self.write("{");
                    for (i, &specifier) in specifiers.iter().enumerate() {
                        self.write(if i == 0 { " " } else { ", " });
                        self.emit_expression(specifier, prec::ASSIGN);
                    }
                    self.write(if specifiers.is_empty() { "}" } else { " }" });
                    if let Some(source) = source {
                        self.write(" from ");
                        self.write(&quote_string(source));
                    }
                    self.write(";");
                }
            }
            NodeKind::ExportDefaultDeclaration { declaration } => {
                self.write("export default ");
                if Self::is_statement(arena.kind(*declaration)) {
                    self.emit_statement(*declaration);
                } else {
                    self.emit_expression(*declaration, prec::ASSIGN);
                    self.write(";");
                }
            }
            _ => {
                // Expression in statement position without a wrapper.
                self.emit_expression(idx, prec::SEQUENCE);
            }
        }
    }

    fn emit_switch_case(&mut self, idx: NodeIndex) {
        let arena = self.arena;
        let NodeKind::SwitchCase { test, consequent } = arena.kind(idx) else {
            return;
        };
        match test {
            Some(test) => {
                self.write("case ");
                self.emit_expression(*test, prec::SEQUENCE);
                self.write(":");
            }
            None => self.write("default:"),
        }
        self.indent_level += 1;
        self.emit_statement_list(consequent);
        self.indent_level -= 1;
    }

    fn emit_for_head(&mut self, node: NodeIndex) {
        if matches!(self.arena.kind(node), NodeKind::VariableDeclaration { .. }) {
            self.emit_variable_declaration(node);
        } else {
            self.emit_expression(node, prec::SEQUENCE);
        }
    }

    fn emit_variable_declaration(&mut self, idx: NodeIndex) {
        let arena = self.arena;
        let NodeKind::VariableDeclaration { kind, declarations } = arena.kind(idx) else {
            return;
        };
        self.write(kind.as_str());
        self.write(" ");
        for (i, &declarator) in declarations.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            if let NodeKind::VariableDeclarator { id, init } = arena.kind(declarator) {
                self.emit_expression(*id, prec::ASSIGN);
                if let Some(init) = init {
                    self.write(" = ");
                    self.emit_expression(*init, prec::ASSIGN);
                }
            }
        }
    }

    fn emit_import(&mut self, specifiers: &[NodeIndex], source: &str) {
        let arena = self.arena;
        self.write("import ");
        let mut named = Vec::new();
        let mut wrote_clause = false;
        for &specifier in specifiers {
            match arena.kind(specifier) {
                NodeKind::ImportDefaultSpecifier { local } => {
                    self.emit_expression(*local, prec::ASSIGN);
                    wrote_clause = true;
                }
                NodeKind::ImportNamespaceSpecifier { local } => {
                    if wrote_clause {
                        self.write(", ");
                    }
                    self.write("* as ");
                    self.emit_expression(*local, prec::ASSIGN);
                    wrote_clause = true;
                }
                _ => named.push(specifier),
            }
        }
        if !named.is_empty() {
            if wrote_clause {
                self.write(", ");
            }
            self.write("{ ");
            for (i, &specifier) in named.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.emit_expression(specifier, prec::ASSIGN);
            }
            self.write(" }");
            wrote_clause = true;
        }
        if wrote_clause {
            self.write(" from ");
        }
        self.write(&quote_string(source));
        self.write(";");
    }

    // =========================================================================
    // Functions and classes
    // =========================================================================

    fn emit_params(&mut self, params: &[NodeIndex]) {
        self.write("(");
        self.emit_comma_list(params);
        self.write(")");
    }

    fn emit_function(&mut self, func: &FunctionData) {
        if func.is_async {
            self.write("async ");
        }
        self.write("function");
        if func.is_generator {
            self.write("*");
        }
        match func.id {
            Some(id) => {
                self.write(" ");
                self.emit_expression(id, prec::PRIMARY);
            }
            None => self.write(" "),
        }
        self.emit_params(&func.params);
        self.write(" ");
        self.emit_statement(func.body);
    }

    fn emit_arrow(&mut self, arrow: &ArrowData) {
        if arrow.is_async {
            self.write("async ");
        }
        self.emit_params(&arrow.params);
        self.write(" => ");
        if arrow.expression_body {
            if self.starts_with(arrow.body, |kind| {
                matches!(kind, NodeKind::ObjectExpression { .. })
            }) {
                self.write("(");
                self.emit_expression(arrow.body, prec::ASSIGN);
                self.write(")");
            } else {
                self.emit_expression(arrow.body, prec::ASSIGN);
            }
        } else {
            self.emit_statement(arrow.body);
        }
    }

    fn emit_class(&mut self, class: &ClassData) {
        self.write("class");
        if let Some(id) = class.id {
            self.write(" ");
            self.emit_expression(id, prec::PRIMARY);
        }
        if let Some(super_class) = class.super_class {
            self.write(" extends ");
            self.emit_expression(super_class, prec::CALL);
        }
        if class.body.is_empty() {
            self.write(" {}");
            return;
        }
        self.write(" {");
        self.indent_level += 1;
        for &member in &class.body {
            self.newline();
            self.emit_class_member(member);
        }
        self.indent_level -= 1;
        self.newline();
        self.write("}");
    }

    fn emit_class_member(&mut self, member: NodeIndex) {
        let arena = self.arena;
        match arena.kind(member) {
            NodeKind::ClassMethod {
                kind,
                key,
                computed,
                is_static,
                value,
            } => {
                if *is_static {
                    self.write("static ");
                }
                self.emit_method(*kind, *key, *computed, *value);
            }
            NodeKind::ClassProperty {
                key,
                value,
                computed,
                is_static,
            } => {
                if *is_static {
                    self.write("static ");
                }
                self.emit_property_key(*key, *computed);
                if let Some(value) = value {
                    self.write(" = ");
                    self.emit_expression(*value, prec::ASSIGN);
                }
                self.write(";");
            }
            _ => self.emit(member),
        }
    }

    fn emit_method(&mut self, kind: MethodKind, key: NodeIndex, computed: bool, value: NodeIndex) {
        let arena = self.arena;
        let NodeKind::FunctionExpression(func) = arena.kind(value) else {
            return;
        };
        if func.is_async {
            self.write("async ");
        }
        match kind {
            MethodKind::Get => self.write("get "),
            MethodKind::Set => self.write("set "),
            MethodKind::Method | MethodKind::Constructor => {}
        }
        if func.is_generator {
            self.write("*");
        }
        self.emit_property_key(key, computed);
        self.emit_params(&func.params);
        self.write(" ");
        self.emit_statement(func.body);
    }

    fn emit_property_key(&mut self, key: NodeIndex, computed: bool) {
        if computed {
            self.write("[");
            self.emit_expression(key, prec::ASSIGN);
            self.write("]");
        } else {
            self.emit_expression(key, prec::PRIMARY);
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Whether the leftmost token of `idx` comes from a node matching `pred`.
    fn starts_with(&self, idx: NodeIndex, pred: impl Fn(&NodeKind) -> bool) -> bool {
        let mut current = idx;
        loop {
            let kind = self.arena.kind(current);
            if pred(kind) {
                return true;
            }
            current = match kind {
                NodeKind::CallExpression { callee, .. } => *callee,
                NodeKind::MemberExpression { object, .. } => *object,
                NodeKind::BinaryExpression { left, .. }
                | NodeKind::LogicalExpression { left, .. }
                | NodeKind::AssignmentExpression { left, .. } => *left,
                NodeKind::ConditionalExpression { test, .. } => *test,
                NodeKind::UpdateExpression {
                    prefix: false,
                    argument,
                    ..
                } => *argument,
                NodeKind::SequenceExpression { expressions } => match expressions.first() {
                    Some(first) => *first,
                    None => return false,
                },
                _ => return false,
            };
        }
    }

    fn emit_expression(&mut self, idx: NodeIndex, min_precedence: u8) {
        let arena = self.arena;
        let kind = arena.kind(idx);
        if precedence(kind) < min_precedence {
            self.write("(");
            self.emit_expression_inner(idx);
            self.write(")");
        } else {
            self.emit_expression_inner(idx);
        }
    }

    fn emit_expression_inner(&mut self, idx: NodeIndex) {
        let arena = self.arena;
        match arena.kind(idx) {
            NodeKind::Identifier { name } => self.write(name),
            NodeKind::StringLiteral { value } => self.write(&quote_string(value)),
            NodeKind::NumericLiteral { value } => self.write(&format_number(*value)),
            NodeKind::BooleanLiteral { value } => self.write(if *value { "true" } else { "false" }),
            NodeKind::NullLiteral => self.write("null"),
            NodeKind::ThisExpression => self.write("this"),
            NodeKind::ArrayExpression { elements } | NodeKind::ArrayPattern { elements } => {
                self.emit_elements(elements);
            }
            NodeKind::ObjectExpression { properties } | NodeKind::ObjectPattern { properties } => {
                if properties.is_empty() {
                    self.write("{}");
                } else {
                    self.write("{ ");
                    self.emit_comma_list(properties);
                    self.write(" }");
                }
            }
            NodeKind::ObjectProperty {
                key,
                value,
                computed,
                shorthand,
            } => {
                if *shorthand {
                    self.emit_expression(*value, prec::ASSIGN);
                } else {
                    self.emit_property_key(*key, *computed);
                    self.write(": ");
                    self.emit_expression(*value, prec::ASSIGN);
                }
            }
            NodeKind::ObjectMethod {
                kind,
                key,
                computed,
                value,
            } => self.emit_method(*kind, *key, *computed, *value),
            NodeKind::SpreadElement { argument } | NodeKind::RestElement { argument } => {
                self.write("...");
                self.emit_expression(*argument, prec::ASSIGN);
            }
            NodeKind::FunctionExpression(func) => self.emit_function(func),
            NodeKind::ArrowFunctionExpression(arrow) => self.emit_arrow(arrow),
            NodeKind::ClassExpression(class) => self.emit_class(class),
            NodeKind::UnaryExpression { operator, argument } => {
                self.write(operator);
                let needs_space = operator.chars().all(|c| c.is_ascii_alphabetic())
                    || match arena.kind(*argument) {
                        NodeKind::UnaryExpression { operator: inner, .. }
                        | NodeKind::UpdateExpression {
                            operator: inner,
                            prefix: true,
                            ..
                        } => {
                            (operator == "-" || operator == "+")
                                && inner.starts_with(operator.as_str())
                        }
                        _ => false,
                    };
                if needs_space {
                    self.write(" ");
                }
                self.emit_expression(*argument, prec::UNARY);
            }
            NodeKind::UpdateExpression {
                operator,
                prefix,
                argument,
            } => {
                if *prefix {
                    self.write(operator);
                    self.emit_expression(*argument, prec::UNARY);
                } else {
                    self.emit_expression(*argument, prec::POSTFIX);
                    self.write(operator);
                }
            }
            NodeKind::BinaryExpression {
                operator,
                left,
                right,
            }
            | NodeKind::LogicalExpression {
                operator,
                left,
                right,
            } => {
                let level = binary_precedence(operator);
                let (left_min, right_min) = if operator == "**" {
                    (level + 1, level)
                } else {
                    (level, level + 1)
                };
                self.emit_expression(*left, left_min);
                self.write(" ");
                self.write(operator);
                self.write(" ");
                self.emit_expression(*right, right_min);
            }
            NodeKind::AssignmentExpression {
                operator,
                left,
                right,
            } => {
                self.emit_expression(*left, prec::CALL);
                self.write(" ");
                self.write(operator);
                self.write(" ");
                self.emit_expression(*right, prec::ASSIGN);
            }
            NodeKind::AssignmentPattern { left, right } => {
                self.emit_expression(*left, prec::CALL);
                self.write(" = ");
                self.emit_expression(*right, prec::ASSIGN);
            }
            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                self.emit_expression(*test, prec::LOGICAL_OR);
                self.write(" ? ");
                self.emit_expression(*consequent, prec::ASSIGN);
                self.write(" : ");
                self.emit_expression(*alternate, prec::ASSIGN);
            }
            NodeKind::CallExpression { callee, arguments } => {
                self.emit_expression(*callee, prec::CALL);
                self.write("(");
                self.emit_comma_list(arguments);
                self.write(")");
            }
            NodeKind::NewExpression { callee, arguments } => {
                self.write("new ");
                if self.starts_with(*callee, |kind| matches!(kind, NodeKind::CallExpression { .. })) {
                    self.write("(");
                    self.emit_expression(*callee, prec::SEQUENCE);
                    self.write(")");
                } else {
                    self.emit_expression(*callee, prec::CALL);
                }
                self.write("(");
                self.emit_comma_list(arguments);
                self.write(")");
            }
            NodeKind::MemberExpression {
                object,
                property,
                computed,
            } => {
                if matches!(arena.kind(*object), NodeKind::NumericLiteral { .. }) {
                    self.write("(");
                    self.emit_expression(*object, prec::SEQUENCE);
                    self.write(")");
                } else {
                    self.emit_expression(*object, prec::CALL);
                }
                if *computed {
                    self.write("[");
                    self.emit_expression(*property, prec::SEQUENCE);
                    self.write("]");
                } else {
                    self.write(".");
                    self.emit_expression(*property, prec::PRIMARY);
                }
            }
            NodeKind::SequenceExpression { expressions } => {
                for (i, &expression) in expressions.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_expression(expression, prec::ASSIGN);
                }
            }
            NodeKind::AwaitExpression { argument } => {
                self.write("await ");
                self.emit_expression(*argument, prec::UNARY);
            }
            NodeKind::YieldExpression { argument, delegate } => {
                self.write("yield");
                if *delegate {
                    self.write("*");
                }
                if let Some(argument) = argument {
                    self.write(" ");
                    self.emit_expression(*argument, prec::ASSIGN);
                }
            }
            NodeKind::ImportSpecifier { imported, local } => {
                self.emit_expression(*imported, prec::PRIMARY);
                if arena.name(*imported) != arena.name(*local) {
                    self.write(" as ");
                    self.emit_expression(*local, prec::PRIMARY);
                }
            }
            NodeKind::ImportDefaultSpecifier { local }
            | NodeKind::ImportNamespaceSpecifier { local } => {
                self.emit_expression(*local, prec::PRIMARY);
            }
            NodeKind::ExportSpecifier { local, exported } => {
                self.emit_expression(*local, prec::PRIMARY);
                if arena.name(*local) != arena.name(*exported) {
                    self.write(" as ");
                    self.emit_expression(*exported, prec::PRIMARY);
                }
            }
            NodeKind::VariableDeclarator { id, init } => {
                self.emit_expression(*id, prec::ASSIGN);
                if let Some(init) = init {
                    self.write(" = ");
                    self.emit_expression(*init, prec::ASSIGN);
                }
            }
            NodeKind::ClassMethod { .. } | NodeKind::ClassProperty { .. } => {
                self.emit_class_member(idx);
            }
            _ => self.emit_statement(idx),
        }
    }
}

#[cfg(test)]
#[path = "tests/printer_tests.rs"]
mod tests;
