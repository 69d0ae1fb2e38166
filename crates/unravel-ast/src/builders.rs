//! Builder helpers for node construction.
//!
//! Transforms use these to synthesize replacement nodes; tests use them to
//! assemble trees without going through the parser.

use crate::base::NodeIndex;
use crate::node::{ArrowData, FunctionData, NodeKind, VarKind};
use crate::node_arena::NodeArena;

impl NodeArena {
    /// Create an identifier node
    pub fn id(&mut self, name: impl Into<String>) -> NodeIndex {
        self.alloc(NodeKind::Identifier { name: name.into() })
    }

    /// Create a string literal
    pub fn string(&mut self, value: impl Into<String>) -> NodeIndex {
        self.alloc(NodeKind::StringLiteral {
            value: value.into(),
        })
    }

    /// Create a numeric literal
    pub fn number(&mut self, value: f64) -> NodeIndex {
        self.alloc(NodeKind::NumericLiteral { value })
    }

    pub fn boolean(&mut self, value: bool) -> NodeIndex {
        self.alloc(NodeKind::BooleanLiteral { value })
    }

    pub fn this(&mut self) -> NodeIndex {
        self.alloc(NodeKind::ThisExpression)
    }

    /// Create `void 0`
    pub fn void_0(&mut self) -> NodeIndex {
        let zero = self.number(0.0);
        self.unary("void", zero)
    }

    /// Create an array literal without holes
    pub fn array(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.alloc(NodeKind::ArrayExpression {
            elements: elements.into_iter().map(Some).collect(),
        })
    }

    pub fn object(&mut self, properties: Vec<NodeIndex>) -> NodeIndex {
        self.alloc(NodeKind::ObjectExpression { properties })
    }

    /// Create a `key: value` property with an identifier key
    pub fn property(&mut self, key: impl Into<String>, value: NodeIndex) -> NodeIndex {
        let key = self.id(key);
        self.alloc(NodeKind::ObjectProperty {
            key,
            value,
            computed: false,
            shorthand: false,
        })
    }

    /// Create a call expression
    pub fn call(&mut self, callee: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.alloc(NodeKind::CallExpression { callee, arguments })
    }

    /// Create a property access: `object.property`
    pub fn prop(&mut self, object: NodeIndex, property: impl Into<String>) -> NodeIndex {
        let property = self.id(property);
        self.alloc(NodeKind::MemberExpression {
            object,
            property,
            computed: false,
        })
    }

    /// Create an element access: `object[index]`
    pub fn elem(&mut self, object: NodeIndex, index: NodeIndex) -> NodeIndex {
        self.alloc(NodeKind::MemberExpression {
            object,
            property: index,
            computed: true,
        })
    }

    pub fn binary(&mut self, left: NodeIndex, op: &str, right: NodeIndex) -> NodeIndex {
        self.alloc(NodeKind::BinaryExpression {
            operator: op.to_string(),
            left,
            right,
        })
    }

    pub fn unary(&mut self, op: &str, argument: NodeIndex) -> NodeIndex {
        self.alloc(NodeKind::UnaryExpression {
            operator: op.to_string(),
            argument,
        })
    }

    /// Create a postfix update: `argument++`
    pub fn postfix(&mut self, argument: NodeIndex, op: &str) -> NodeIndex {
        self.alloc(NodeKind::UpdateExpression {
            operator: op.to_string(),
            prefix: false,
            argument,
        })
    }

    /// Create an assignment expression: `target = value`
    pub fn assign(&mut self, target: NodeIndex, value: NodeIndex) -> NodeIndex {
        self.alloc(NodeKind::AssignmentExpression {
            operator: "=".to_string(),
            left: target,
            right: value,
        })
    }

    /// Create an expression statement
    pub fn expr_stmt(&mut self, expression: NodeIndex) -> NodeIndex {
        self.alloc(NodeKind::ExpressionStatement { expression })
    }

    /// Create a block
    pub fn block(&mut self, body: Vec<NodeIndex>) -> NodeIndex {
        self.alloc(NodeKind::BlockStatement { body })
    }

    pub fn program(&mut self, body: Vec<NodeIndex>) -> NodeIndex {
        self.alloc(NodeKind::Program { body })
    }

    /// Create a single-declarator declaration: `kind name = init;`
    pub fn var_decl(
        &mut self,
        kind: VarKind,
        name: impl Into<String>,
        init: Option<NodeIndex>,
    ) -> NodeIndex {
        let id = self.id(name);
        let declarator = self.alloc(NodeKind::VariableDeclarator { id, init });
        self.alloc(NodeKind::VariableDeclaration {
            kind,
            declarations: vec![declarator],
        })
    }

    /// Create a return statement
    pub fn ret(&mut self, argument: Option<NodeIndex>) -> NodeIndex {
        self.alloc(NodeKind::ReturnStatement { argument })
    }

    /// Create a function declaration with identifier parameters
    pub fn func_decl(
        &mut self,
        name: impl Into<String>,
        params: &[&str],
        body: Vec<NodeIndex>,
    ) -> NodeIndex {
        let data = self.function_data(Some(name.into()), params, body);
        self.alloc(NodeKind::FunctionDeclaration(data))
    }

    /// Create a function expression with identifier parameters
    pub fn func_expr(&mut self, name: Option<String>, params: &[&str], body: Vec<NodeIndex>) -> NodeIndex {
        let data = self.function_data(name, params, body);
        self.alloc(NodeKind::FunctionExpression(data))
    }

    /// Create an arrow function with an expression body
    pub fn arrow_expr(&mut self, params: &[&str], body: NodeIndex) -> NodeIndex {
        let params = params.iter().map(|p| self.id(*p)).collect();
        self.alloc(NodeKind::ArrowFunctionExpression(ArrowData {
            params,
            body,
            expression_body: true,
            is_async: false,
        }))
    }

    fn function_data(
        &mut self,
        name: Option<String>,
        params: &[&str],
        body: Vec<NodeIndex>,
    ) -> FunctionData {
        let id = name.map(|name| self.id(name));
        let params = params.iter().map(|p| self.id(*p)).collect();
        let body = self.block(body);
        FunctionData {
            id,
            params,
            body,
            is_async: false,
            is_generator: false,
        }
    }

    pub fn switch_stmt(&mut self, discriminant: NodeIndex, cases: Vec<NodeIndex>) -> NodeIndex {
        self.alloc(NodeKind::SwitchStatement {
            discriminant,
            cases,
        })
    }

    pub fn switch_case(&mut self, test: Option<NodeIndex>, consequent: Vec<NodeIndex>) -> NodeIndex {
        self.alloc(NodeKind::SwitchCase { test, consequent })
    }

    pub fn while_stmt(&mut self, test: NodeIndex, body: NodeIndex) -> NodeIndex {
        self.alloc(NodeKind::WhileStatement { test, body })
    }

    pub fn break_stmt(&mut self) -> NodeIndex {
        self.alloc(NodeKind::BreakStatement { label: None })
    }

    pub fn continue_stmt(&mut self) -> NodeIndex {
        self.alloc(NodeKind::ContinueStatement { label: None })
    }
}

#[cfg(test)]
#[path = "tests/builders_tests.rs"]
mod tests;
