//! Node kinds.
//!
//! `NodeKind` is a closed enumeration of the ESTree-shaped constructs the
//! deobfuscation passes understand. Child slots hold `NodeIndex` handles;
//! literal payloads are stored inline. Array elements use `None` for holes
//! (`[a, , b]`).

use smallvec::SmallVec;

use crate::base::NodeIndex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }

    /// `let` and `const` are scoped to their block.
    pub const fn is_lexical(self) -> bool {
        !matches!(self, VarKind::Var)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MethodKind {
    Method,
    Get,
    Set,
    Constructor,
}

/// Shared payload of function declarations and function expressions.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionData {
    pub id: Option<NodeIndex>,
    pub params: Vec<NodeIndex>,
    /// Always a `BlockStatement`.
    pub body: NodeIndex,
    pub is_async: bool,
    pub is_generator: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArrowData {
    pub params: Vec<NodeIndex>,
    /// A `BlockStatement`, or an expression when `expression_body` is set.
    pub body: NodeIndex,
    pub expression_body: bool,
    pub is_async: bool,
}

/// Shared payload of class declarations and class expressions.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassData {
    pub id: Option<NodeIndex>,
    pub super_class: Option<NodeIndex>,
    /// `ClassMethod` and `ClassProperty` members.
    pub body: Vec<NodeIndex>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Program {
        body: Vec<NodeIndex>,
    },

    // =========================================================================
    // Statements
    // =========================================================================
    ExpressionStatement {
        expression: NodeIndex,
    },
    BlockStatement {
        body: Vec<NodeIndex>,
    },
    EmptyStatement,
    VariableDeclaration {
        kind: VarKind,
        declarations: Vec<NodeIndex>,
    },
    VariableDeclarator {
        id: NodeIndex,
        init: Option<NodeIndex>,
    },
    FunctionDeclaration(FunctionData),
    ClassDeclaration(ClassData),
    ReturnStatement {
        argument: Option<NodeIndex>,
    },
    IfStatement {
        test: NodeIndex,
        consequent: NodeIndex,
        alternate: Option<NodeIndex>,
    },
    ForStatement {
        init: Option<NodeIndex>,
        test: Option<NodeIndex>,
        update: Option<NodeIndex>,
        body: NodeIndex,
    },
    ForInStatement {
        left: NodeIndex,
        right: NodeIndex,
        body: NodeIndex,
    },
    ForOfStatement {
        left: NodeIndex,
        right: NodeIndex,
        body: NodeIndex,
    },
    WhileStatement {
        test: NodeIndex,
        body: NodeIndex,
    },
    DoWhileStatement {
        body: NodeIndex,
        test: NodeIndex,
    },
    SwitchStatement {
        discriminant: NodeIndex,
        cases: Vec<NodeIndex>,
    },
    SwitchCase {
        /// `None` for `default:`
        test: Option<NodeIndex>,
        consequent: Vec<NodeIndex>,
    },
    BreakStatement {
        label: Option<String>,
    },
    ContinueStatement {
        label: Option<String>,
    },
    ThrowStatement {
        argument: NodeIndex,
    },
    TryStatement {
        block: NodeIndex,
        handler: Option<NodeIndex>,
        finalizer: Option<NodeIndex>,
    },
    CatchClause {
        param: Option<NodeIndex>,
        body: NodeIndex,
    },
    LabeledStatement {
        label: String,
        body: NodeIndex,
    },

    // =========================================================================
    // Modules
    // =========================================================================
    ImportDeclaration {
        specifiers: Vec<NodeIndex>,
        source: String,
    },
    /// `import { imported as local } from "..."`
    ImportSpecifier {
        imported: NodeIndex,
        local: NodeIndex,
    },
    ImportDefaultSpecifier {
        local: NodeIndex,
    },
    ImportNamespaceSpecifier {
        local: NodeIndex,
    },
    ExportNamedDeclaration {
        declaration: Option<NodeIndex>,
        specifiers: Vec<NodeIndex>,
        source: Option<String>,
    },
    /// `export { local as exported }`
    ExportSpecifier {
        local: NodeIndex,
        exported: NodeIndex,
    },
    ExportDefaultDeclaration {
        declaration: NodeIndex,
    },

    // =========================================================================
    // Expressions
    // =========================================================================
    Identifier {
        name: String,
    },
    StringLiteral {
        value: String,
    },
    NumericLiteral {
        value: f64,
    },
    BooleanLiteral {
        value: bool,
    },
    NullLiteral,
    ThisExpression,
    ArrayExpression {
        elements: Vec<Option<NodeIndex>>,
    },
    ObjectExpression {
        properties: Vec<NodeIndex>,
    },
    /// Object literal or object pattern property. In a shorthand property
    /// `key` and `value` are distinct identifier nodes with the same name.
    ObjectProperty {
        key: NodeIndex,
        value: NodeIndex,
        computed: bool,
        shorthand: bool,
    },
    /// `{ key() {} }`, `{ get key() {} }`; `value` is a `FunctionExpression`.
    ObjectMethod {
        kind: MethodKind,
        key: NodeIndex,
        computed: bool,
        value: NodeIndex,
    },
    SpreadElement {
        argument: NodeIndex,
    },
    FunctionExpression(FunctionData),
    ArrowFunctionExpression(ArrowData),
    ClassExpression(ClassData),
    /// Class method; `value` is a `FunctionExpression`.
    ClassMethod {
        kind: MethodKind,
        key: NodeIndex,
        computed: bool,
        is_static: bool,
        value: NodeIndex,
    },
    ClassProperty {
        key: NodeIndex,
        value: Option<NodeIndex>,
        computed: bool,
        is_static: bool,
    },
    UnaryExpression {
        operator: String,
        argument: NodeIndex,
    },
    UpdateExpression {
        operator: String,
        prefix: bool,
        argument: NodeIndex,
    },
    BinaryExpression {
        operator: String,
        left: NodeIndex,
        right: NodeIndex,
    },
    LogicalExpression {
        operator: String,
        left: NodeIndex,
        right: NodeIndex,
    },
    AssignmentExpression {
        operator: String,
        left: NodeIndex,
        right: NodeIndex,
    },
    ConditionalExpression {
        test: NodeIndex,
        consequent: NodeIndex,
        alternate: NodeIndex,
    },
    CallExpression {
        callee: NodeIndex,
        arguments: Vec<NodeIndex>,
    },
    NewExpression {
        callee: NodeIndex,
        arguments: Vec<NodeIndex>,
    },
    MemberExpression {
        object: NodeIndex,
        property: NodeIndex,
        computed: bool,
    },
    SequenceExpression {
        expressions: Vec<NodeIndex>,
    },
    AwaitExpression {
        argument: NodeIndex,
    },
    YieldExpression {
        argument: Option<NodeIndex>,
        delegate: bool,
    },

    // =========================================================================
    // Patterns
    // =========================================================================
    ArrayPattern {
        elements: Vec<Option<NodeIndex>>,
    },
    /// `ObjectProperty` (value is the target pattern) and `RestElement` entries.
    ObjectPattern {
        properties: Vec<NodeIndex>,
    },
    AssignmentPattern {
        left: NodeIndex,
        right: NodeIndex,
    },
    RestElement {
        argument: NodeIndex,
    },
}

impl NodeKind {
    /// ESTree name of the variant, for diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            NodeKind::Program { .. } => "Program",
            NodeKind::ExpressionStatement { .. } => "ExpressionStatement",
            NodeKind::BlockStatement { .. } => "BlockStatement",
            NodeKind::EmptyStatement => "EmptyStatement",
            NodeKind::VariableDeclaration { .. } => "VariableDeclaration",
            NodeKind::VariableDeclarator { .. } => "VariableDeclarator",
            NodeKind::FunctionDeclaration(_) => "FunctionDeclaration",
            NodeKind::ClassDeclaration(_) => "ClassDeclaration",
            NodeKind::ReturnStatement { .. } => "ReturnStatement",
            NodeKind::IfStatement { .. } => "IfStatement",
            NodeKind::ForStatement { .. } => "ForStatement",
            NodeKind::ForInStatement { .. } => "ForInStatement",
            NodeKind::ForOfStatement { .. } => "ForOfStatement",
            NodeKind::WhileStatement { .. } => "WhileStatement",
            NodeKind::DoWhileStatement { .. } => "DoWhileStatement",
            NodeKind::SwitchStatement { .. } => "SwitchStatement",
            NodeKind::SwitchCase { .. } => "SwitchCase",
            NodeKind::BreakStatement { .. } => "BreakStatement",
            NodeKind::ContinueStatement { .. } => "ContinueStatement",
            NodeKind::ThrowStatement { .. } => "ThrowStatement",
            NodeKind::TryStatement { .. } => "TryStatement",
            NodeKind::CatchClause { .. } => "CatchClause",
            NodeKind::LabeledStatement { .. } => "LabeledStatement",
            NodeKind::ImportDeclaration { .. } => "ImportDeclaration",
            NodeKind::ImportSpecifier { .. } => "ImportSpecifier",
            NodeKind::ImportDefaultSpecifier { .. } => "ImportDefaultSpecifier",
            NodeKind::ImportNamespaceSpecifier { .. } => "ImportNamespaceSpecifier",
            NodeKind::ExportNamedDeclaration { .. } => "ExportNamedDeclaration",
            NodeKind::ExportSpecifier { .. } => "ExportSpecifier",
            NodeKind::ExportDefaultDeclaration { .. } => "ExportDefaultDeclaration",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::StringLiteral { .. } => "StringLiteral",
            NodeKind::NumericLiteral { .. } => "NumericLiteral",
            NodeKind::BooleanLiteral { .. } => "BooleanLiteral",
            NodeKind::NullLiteral => "NullLiteral",
            NodeKind::ThisExpression => "ThisExpression",
            NodeKind::ArrayExpression { .. } => "ArrayExpression",
            NodeKind::ObjectExpression { .. } => "ObjectExpression",
            NodeKind::ObjectProperty { .. } => "ObjectProperty",
            NodeKind::ObjectMethod { .. } => "ObjectMethod",
            NodeKind::SpreadElement { .. } => "SpreadElement",
            NodeKind::FunctionExpression(_) => "FunctionExpression",
            NodeKind::ArrowFunctionExpression(_) => "ArrowFunctionExpression",
            NodeKind::ClassExpression(_) => "ClassExpression",
            NodeKind::ClassMethod { .. } => "ClassMethod",
            NodeKind::ClassProperty { .. } => "ClassProperty",
            NodeKind::UnaryExpression { .. } => "UnaryExpression",
            NodeKind::UpdateExpression { .. } => "UpdateExpression",
            NodeKind::BinaryExpression { .. } => "BinaryExpression",
            NodeKind::LogicalExpression { .. } => "LogicalExpression",
            NodeKind::AssignmentExpression { .. } => "AssignmentExpression",
            NodeKind::ConditionalExpression { .. } => "ConditionalExpression",
            NodeKind::CallExpression { .. } => "CallExpression",
            NodeKind::NewExpression { .. } => "NewExpression",
            NodeKind::MemberExpression { .. } => "MemberExpression",
            NodeKind::SequenceExpression { .. } => "SequenceExpression",
            NodeKind::AwaitExpression { .. } => "AwaitExpression",
            NodeKind::YieldExpression { .. } => "YieldExpression",
            NodeKind::ArrayPattern { .. } => "ArrayPattern",
            NodeKind::ObjectPattern { .. } => "ObjectPattern",
            NodeKind::AssignmentPattern { .. } => "AssignmentPattern",
            NodeKind::RestElement { .. } => "RestElement",
        }
    }

    #[inline]
    pub const fn is_function(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDeclaration(_)
                | NodeKind::FunctionExpression(_)
                | NodeKind::ArrowFunctionExpression(_)
        )
    }

    #[inline]
    pub const fn is_class(&self) -> bool {
        matches!(self, NodeKind::ClassDeclaration(_) | NodeKind::ClassExpression(_))
    }

    /// Function parameters, for any function-like kind.
    pub fn params(&self) -> Option<&[NodeIndex]> {
        match self {
            NodeKind::FunctionDeclaration(func) | NodeKind::FunctionExpression(func) => {
                Some(&func.params)
            }
            NodeKind::ArrowFunctionExpression(arrow) => Some(&arrow.params),
            _ => None,
        }
    }

    /// Calls `f` for every child in source order.
    pub fn visit_children(&self, mut f: impl FnMut(NodeIndex)) {
        match self {
            NodeKind::Program { body } | NodeKind::BlockStatement { body } => {
                body.iter().copied().for_each(f);
            }
            NodeKind::ExpressionStatement { expression } => f(*expression),
            NodeKind::VariableDeclaration { declarations, .. } => {
                declarations.iter().copied().for_each(f);
            }
            NodeKind::VariableDeclarator { id, init } => {
                f(*id);
                if let Some(init) = init {
                    f(*init);
                }
            }
            NodeKind::FunctionDeclaration(func) | NodeKind::FunctionExpression(func) => {
                if let Some(id) = func.id {
                    f(id);
                }
                func.params.iter().copied().for_each(&mut f);
                f(func.body);
            }
            NodeKind::ArrowFunctionExpression(arrow) => {
                arrow.params.iter().copied().for_each(&mut f);
                f(arrow.body);
            }
            NodeKind::ClassDeclaration(class) | NodeKind::ClassExpression(class) => {
                if let Some(id) = class.id {
                    f(id);
                }
                if let Some(super_class) = class.super_class {
                    f(super_class);
                }
                class.body.iter().copied().for_each(f);
            }
            NodeKind::ReturnStatement { argument } => {
                if let Some(argument) = argument {
                    f(*argument);
                }
            }
            NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                f(*test);
                f(*consequent);
                if let Some(alternate) = alternate {
                    f(*alternate);
                }
            }
            NodeKind::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                for slot in [init, test, update].into_iter().flatten() {
                    f(*slot);
                }
                f(*body);
            }
            NodeKind::ForInStatement { left, right, body }
            | NodeKind::ForOfStatement { left, right, body } => {
                f(*left);
                f(*right);
                f(*body);
            }
            NodeKind::WhileStatement { test, body } => {
                f(*test);
                f(*body);
            }
            NodeKind::DoWhileStatement { body, test } => {
                f(*body);
                f(*test);
            }
            NodeKind::SwitchStatement {
                discriminant,
                cases,
            } => {
                f(*discriminant);
                cases.iter().copied().for_each(f);
            }
            NodeKind::SwitchCase { test, consequent } => {
                if let Some(test) = test {
                    f(*test);
                }
                consequent.iter().copied().for_each(f);
            }
            NodeKind::ThrowStatement { argument } => f(*argument),
            NodeKind::TryStatement {
                block,
                handler,
                finalizer,
            } => {
                f(*block);
                if let Some(handler) = handler {
                    f(*handler);
                }
                if let Some(finalizer) = finalizer {
                    f(*finalizer);
                }
            }
            NodeKind::CatchClause { param, body } => {
                if let Some(param) = param {
                    f(*param);
                }
                f(*body);
            }
            NodeKind::LabeledStatement { body, .. } => f(*body),
            NodeKind::ImportDeclaration { specifiers, .. } => {
                specifiers.iter().copied().for_each(f);
            }
            NodeKind::ImportSpecifier { imported, local } => {
                f(*imported);
                f(*local);
            }
            NodeKind::ImportDefaultSpecifier { local }
            | NodeKind::ImportNamespaceSpecifier { local } => f(*local),
            NodeKind::ExportNamedDeclaration {
                declaration,
                specifiers,
                ..
            } => {
                if let Some(declaration) = declaration {
                    f(*declaration);
                }
                specifiers.iter().copied().for_each(f);
            }
            NodeKind::ExportSpecifier { local, exported } => {
                f(*local);
                f(*exported);
            }
            NodeKind::ExportDefaultDeclaration { declaration } => f(*declaration),
            NodeKind::ArrayExpression { elements } | NodeKind::ArrayPattern { elements } => {
                elements.iter().flatten().copied().for_each(f);
            }
            NodeKind::ObjectExpression { properties } | NodeKind::ObjectPattern { properties } => {
                properties.iter().copied().for_each(f);
            }
            NodeKind::ObjectProperty { key, value, .. } => {
                f(*key);
                f(*value);
            }
            NodeKind::ObjectMethod { key, value, .. } | NodeKind::ClassMethod { key, value, .. } => {
                f(*key);
                f(*value);
            }
            NodeKind::ClassProperty { key, value, .. } => {
                f(*key);
                if let Some(value) = value {
                    f(*value);
                }
            }
            NodeKind::SpreadElement { argument }
            | NodeKind::RestElement { argument }
            | NodeKind::AwaitExpression { argument }
            | NodeKind::UnaryExpression { argument, .. }
            | NodeKind::UpdateExpression { argument, .. } => f(*argument),
            NodeKind::YieldExpression { argument, .. } => {
                if let Some(argument) = argument {
                    f(*argument);
                }
            }
            NodeKind::BinaryExpression { left, right, .. }
            | NodeKind::LogicalExpression { left, right, .. }
            | NodeKind::AssignmentExpression { left, right, .. }
            | NodeKind::AssignmentPattern { left, right } => {
                f(*left);
                f(*right);
            }
            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                f(*test);
                f(*consequent);
                f(*alternate);
            }
            NodeKind::CallExpression { callee, arguments }
            | NodeKind::NewExpression { callee, arguments } => {
                f(*callee);
                arguments.iter().copied().for_each(f);
            }
            NodeKind::MemberExpression {
                object, property, ..
            } => {
                f(*object);
                f(*property);
            }
            NodeKind::SequenceExpression { expressions } => {
                expressions.iter().copied().for_each(f);
            }
            NodeKind::EmptyStatement
            | NodeKind::BreakStatement { .. }
            | NodeKind::ContinueStatement { .. }
            | NodeKind::Identifier { .. }
            | NodeKind::StringLiteral { .. }
            | NodeKind::NumericLiteral { .. }
            | NodeKind::BooleanLiteral { .. }
            | NodeKind::NullLiteral
            | NodeKind::ThisExpression => {}
        }
    }

    /// Calls `f` with a mutable reference to every child slot, in source order.
    pub fn visit_children_mut(&mut self, mut f: impl FnMut(&mut NodeIndex)) {
        match self {
            NodeKind::Program { body } | NodeKind::BlockStatement { body } => {
                body.iter_mut().for_each(f);
            }
            NodeKind::ExpressionStatement { expression } => f(expression),
            NodeKind::VariableDeclaration { declarations, .. } => {
                declarations.iter_mut().for_each(f);
            }
            NodeKind::VariableDeclarator { id, init } => {
                f(id);
                if let Some(init) = init {
                    f(init);
                }
            }
            NodeKind::FunctionDeclaration(func) | NodeKind::FunctionExpression(func) => {
                if let Some(id) = &mut func.id {
                    f(id);
                }
                func.params.iter_mut().for_each(&mut f);
                f(&mut func.body);
            }
            NodeKind::ArrowFunctionExpression(arrow) => {
                arrow.params.iter_mut().for_each(&mut f);
                f(&mut arrow.body);
            }
            NodeKind::ClassDeclaration(class) | NodeKind::ClassExpression(class) => {
                if let Some(id) = &mut class.id {
                    f(id);
                }
                if let Some(super_class) = &mut class.super_class {
                    f(super_class);
                }
                class.body.iter_mut().for_each(f);
            }
            NodeKind::ReturnStatement { argument } => {
                if let Some(argument) = argument {
                    f(argument);
                }
            }
            NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                f(test);
                f(consequent);
                if let Some(alternate) = alternate {
                    f(alternate);
                }
            }
            NodeKind::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                for slot in [init, test, update].into_iter().flatten() {
                    f(slot);
                }
                f(body);
            }
            NodeKind::ForInStatement { left, right, body }
            | NodeKind::ForOfStatement { left, right, body } => {
                f(left);
                f(right);
                f(body);
            }
            NodeKind::WhileStatement { test, body } => {
                f(test);
                f(body);
            }
            NodeKind::DoWhileStatement { body, test } => {
                f(body);
                f(test);
            }
            NodeKind::SwitchStatement {
                discriminant,
                cases,
            } => {
                f(discriminant);
                cases.iter_mut().for_each(f);
            }
            NodeKind::SwitchCase { test, consequent } => {
                if let Some(test) = test {
                    f(test);
                }
                consequent.iter_mut().for_each(f);
            }
            NodeKind::ThrowStatement { argument } => f(argument),
            NodeKind::TryStatement {
                block,
                handler,
                finalizer,
            } => {
                f(block);
                if let Some(handler) = handler {
                    f(handler);
                }
                if let Some(finalizer) = finalizer {
                    f(finalizer);
                }
            }
            NodeKind::CatchClause { param, body } => {
                if let Some(param) = param {
                    f(param);
                }
                f(body);
            }
            NodeKind::LabeledStatement { body, .. } => f(body),
            NodeKind::ImportDeclaration { specifiers, .. } => {
                specifiers.iter_mut().for_each(f);
            }
            NodeKind::ImportSpecifier { imported, local } => {
                f(imported);
                f(local);
            }
            NodeKind::ImportDefaultSpecifier { local }
            | NodeKind::ImportNamespaceSpecifier { local } => f(local),
            NodeKind::ExportNamedDeclaration {
                declaration,
                specifiers,
                ..
            } => {
                if let Some(declaration) = declaration {
                    f(declaration);
                }
                specifiers.iter_mut().for_each(f);
            }
            NodeKind::ExportSpecifier { local, exported } => {
                f(local);
                f(exported);
            }
            NodeKind::ExportDefaultDeclaration { declaration } => f(declaration),
            NodeKind::ArrayExpression { elements } | NodeKind::ArrayPattern { elements } => {
                elements.iter_mut().flatten().for_each(f);
            }
            NodeKind::ObjectExpression { properties } | NodeKind::ObjectPattern { properties } => {
                properties.iter_mut().for_each(f);
            }
            NodeKind::ObjectProperty { key, value, .. } => {
                f(key);
                f(value);
            }
            NodeKind::ObjectMethod { key, value, .. } | NodeKind::ClassMethod { key, value, .. } => {
                f(key);
                f(value);
            }
            NodeKind::ClassProperty { key, value, .. } => {
                f(key);
                if let Some(value) = value {
                    f(value);
                }
            }
            NodeKind::SpreadElement { argument }
            | NodeKind::RestElement { argument }
            | NodeKind::AwaitExpression { argument }
            | NodeKind::UnaryExpression { argument, .. }
            | NodeKind::UpdateExpression { argument, .. } => f(argument),
            NodeKind::YieldExpression { argument, .. } => {
                if let Some(argument) = argument {
                    f(argument);
                }
            }
            NodeKind::BinaryExpression { left, right, .. }
            | NodeKind::LogicalExpression { left, right, .. }
            | NodeKind::AssignmentExpression { left, right, .. }
            | NodeKind::AssignmentPattern { left, right } => {
                f(left);
                f(right);
            }
            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                f(test);
                f(consequent);
                f(alternate);
            }
            NodeKind::CallExpression { callee, arguments }
            | NodeKind::NewExpression { callee, arguments } => {
                f(callee);
                arguments.iter_mut().for_each(f);
            }
            NodeKind::MemberExpression {
                object, property, ..
            } => {
                f(object);
                f(property);
            }
            NodeKind::SequenceExpression { expressions } => {
                expressions.iter_mut().for_each(f);
            }
            NodeKind::EmptyStatement
            | NodeKind::BreakStatement { .. }
            | NodeKind::ContinueStatement { .. }
            | NodeKind::Identifier { .. }
            | NodeKind::StringLiteral { .. }
            | NodeKind::NumericLiteral { .. }
            | NodeKind::BooleanLiteral { .. }
            | NodeKind::NullLiteral
            | NodeKind::ThisExpression => {}
        }
    }

    /// Children in source order.
    pub fn children(&self) -> SmallVec<[NodeIndex; 4]> {
        let mut out = SmallVec::new();
        self.visit_children(|child| out.push(child));
        out
    }

    /// A copy of this kind with every child slot set to `NodeIndex::NONE`.
    ///
    /// Two nodes have the same shape when their kinds and payloads agree and
    /// they have the same child slots populated.
    pub fn shape(&self) -> NodeKind {
        let mut shape = self.clone();
        shape.visit_children_mut(|child| *child = NodeIndex::NONE);
        shape
    }

    /// Replace the child slot holding `old` with `new`. Returns whether a
    /// slot was found.
    pub fn replace_child(&mut self, old: NodeIndex, new: NodeIndex) -> bool {
        let mut replaced = false;
        self.visit_children_mut(|child| {
            if !replaced && *child == old {
                *child = new;
                replaced = true;
            }
        });
        replaced
    }
}
