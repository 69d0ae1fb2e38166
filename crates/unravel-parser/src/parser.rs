//! Parser state - statement, declaration and expression parsing.
//!
//! A recursive-descent parser over `ScannerState` that allocates directly
//! into a `NodeArena`. Parenthesized expressions do not produce a node; the
//! printer re-derives parentheses from precedence.

use tracing::debug;
use unravel_ast::{
    ArrowData, ClassData, FunctionData, MethodKind, NodeArena, NodeIndex, NodeKind, VarKind,
};
use unravel_common::limits::MAX_PARSER_DEPTH;

use crate::error::ParseError;
use crate::scanner::{ScannerState, Token, TokenKind};

pub const CONTEXT_FLAG_NO_IN: u8 = 1 << 0;
pub const CONTEXT_FLAG_ASYNC: u8 = 1 << 1;
pub const CONTEXT_FLAG_GENERATOR: u8 = 1 << 2;

type ParseResult<T> = Result<T, ParseError>;

/// Words that can never be used as binding or reference identifiers.
fn is_reserved_word(word: &str) -> bool {
    matches!(
        word,
        "break"
            | "case"
            | "catch"
            | "class"
            | "const"
            | "continue"
            | "debugger"
            | "default"
            | "delete"
            | "do"
            | "else"
            | "enum"
            | "export"
            | "extends"
            | "false"
            | "finally"
            | "for"
            | "function"
            | "if"
            | "import"
            | "in"
            | "instanceof"
            | "new"
            | "null"
            | "return"
            | "super"
            | "switch"
            | "this"
            | "throw"
            | "true"
            | "try"
            | "typeof"
            | "var"
            | "void"
            | "while"
            | "with"
    )
}

fn is_assignment_operator(op: &str) -> bool {
    matches!(
        op,
        "=" | "+="
            | "-="
            | "*="
            | "/="
            | "%="
            | "**="
            | "<<="
            | ">>="
            | ">>>="
            | "&="
            | "|="
            | "^="
            | "&&="
            | "||="
            | "??="
    )
}

fn binary_precedence(op: &str) -> Option<u8> {
    Some(match op {
        "??" | "||" => 4,
        "&&" => 5,
        "|" => 6,
        "^" => 7,
        "&" => 8,
        "==" | "!=" | "===" | "!==" => 9,
        "<" | ">" | "<=" | ">=" | "instanceof" | "in" => 10,
        "<<" | ">>" | ">>>" => 11,
        "+" | "-" => 12,
        "*" | "/" | "%" => 13,
        "**" => 14,
        _ => return None,
    })
}

/// A parsed program: the arena and its `Program` root.
#[derive(Debug)]
pub struct ParsedProgram {
    pub arena: NodeArena,
    pub root: NodeIndex,
}

/// Parse `source` as a script or module.
pub fn parse(source: &str) -> Result<ParsedProgram, ParseError> {
    let mut parser = ParserState::new(source);
    let root = parser.parse_program()?;
    Ok(ParsedProgram {
        arena: parser.into_arena(),
        root,
    })
}

pub struct ParserState<'a> {
    scanner: ScannerState<'a>,
    token: Token,
    arena: NodeArena,
    context_flags: u8,
    recursion_depth: u32,
}

impl<'a> ParserState<'a> {
    pub fn new(source: &'a str) -> Self {
        ParserState {
            scanner: ScannerState::new(source),
            token: Token {
                kind: TokenKind::EndOfFile,
                text: String::new(),
                value: 0.0,
                pos: 0,
                end: 0,
                newline_before: false,
            },
            arena: NodeArena::with_capacity(source.len() / 4),
            context_flags: 0,
            recursion_depth: 0,
        }
    }

    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    fn next_token(&mut self) -> ParseResult<()> {
        self.token = self.scanner.scan()?;
        Ok(())
    }

    /// The token after the current one.
    fn peek(&self) -> Option<Token> {
        self.scanner.clone().scan().ok()
    }

    fn peek_is_punct(&self, punct: &str) -> bool {
        self.peek().is_some_and(|t| t.is_punct(punct))
    }

    #[inline]
    fn is_punct(&self, punct: &str) -> bool {
        self.token.is_punct(punct)
    }

    #[inline]
    fn is_word(&self, word: &str) -> bool {
        self.token.is_word(word)
    }

    fn has_flag(&self, flag: u8) -> bool {
        self.context_flags & flag != 0
    }

    fn eat_punct(&mut self, punct: &str) -> ParseResult<bool> {
        if self.is_punct(punct) {
            self.next_token()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn eat_word(&mut self, word: &str) -> ParseResult<bool> {
        if self.is_word(word) {
            self.next_token()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn expect_punct(&mut self, punct: &str) -> ParseResult<()> {
        if self.eat_punct(punct)? {
            return Ok(());
        }
        Err(self.unexpected(&format!("`{punct}`")))
    }

    fn expect_word(&mut self, word: &str) -> ParseResult<()> {
        if self.eat_word(word)? {
            return Ok(());
        }
        Err(self.unexpected(&format!("`{word}`")))
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.token.kind {
            TokenKind::EndOfFile => ParseError::UnexpectedEnd {
                pos: self.token.pos,
            },
            TokenKind::StringLiteral => ParseError::UnexpectedToken {
                found: format!("\"{}\"", self.token.text),
                expected: expected.to_string(),
                pos: self.token.pos,
            },
            _ => ParseError::UnexpectedToken {
                found: self.token.text.clone(),
                expected: expected.to_string(),
                pos: self.token.pos,
            },
        }
    }

    /// Automatic semicolon insertion: a `;`, or a `}`, end of input or line
    /// break before the next token.
    fn consume_semicolon(&mut self) -> ParseResult<()> {
        if self.eat_punct(";")? {
            return Ok(());
        }
        if self.is_punct("}") || self.token.is_eof() || self.token.newline_before {
            return Ok(());
        }
        Err(self.unexpected("`;`"))
    }

    /// Run `f` one recursion level deeper.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.recursion_depth >= MAX_PARSER_DEPTH {
            return Err(ParseError::TooDeep {
                pos: self.token.pos,
            });
        }
        self.recursion_depth += 1;
        let result = f(self);
        self.recursion_depth -= 1;
        result
    }

    /// Run `f` with the context flags replaced by `flags`.
    fn with_context<T>(
        &mut self,
        flags: u8,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let saved = self.context_flags;
        self.context_flags = flags;
        let result = f(self);
        self.context_flags = saved;
        result
    }

    fn without_no_in<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let flags = self.context_flags & !CONTEXT_FLAG_NO_IN;
        self.with_context(flags, f)
    }

    fn function_flags(is_async: bool, is_generator: bool) -> u8 {
        let mut flags = 0;
        if is_async {
            flags |= CONTEXT_FLAG_ASYNC;
        }
        if is_generator {
            flags |= CONTEXT_FLAG_GENERATOR;
        }
        flags
    }

    // =========================================================================
    // Identifiers
    // =========================================================================

    fn parse_binding_identifier(&mut self) -> ParseResult<NodeIndex> {
        if self.token.kind != TokenKind::Identifier || is_reserved_word(&self.token.text) {
            return Err(self.unexpected("identifier"));
        }
        let name = std::mem::take(&mut self.token.text);
        self.next_token()?;
        Ok(self.arena.id(name))
    }

    /// Any word, keywords included (property names, import/export names).
    fn parse_identifier_name(&mut self) -> ParseResult<NodeIndex> {
        if self.token.kind != TokenKind::Identifier {
            return Err(self.unexpected("identifier"));
        }
        let name = std::mem::take(&mut self.token.text);
        self.next_token()?;
        Ok(self.arena.id(name))
    }

    // =========================================================================
    // Program and statements
    // =========================================================================

    /// Parse the whole source as a `Program`.
    pub fn parse_program(&mut self) -> ParseResult<NodeIndex> {
        self.next_token()?;
        let mut body = Vec::new();
        while !self.token.is_eof() {
            body.push(self.parse_statement()?);
        }
        let root = self.arena.program(body);
        debug!(nodes = self.arena.len(), "parsed program");
        Ok(root)
    }

    fn parse_statement(&mut self) -> ParseResult<NodeIndex> {
        self.nested(Self::parse_statement_inner)
    }

    fn parse_statement_inner(&mut self) -> ParseResult<NodeIndex> {
        match self.token.kind {
            TokenKind::Punctuator if self.is_punct("{") => return self.parse_block_statement(),
            TokenKind::Punctuator if self.is_punct(";") => {
                self.next_token()?;
                return Ok(self.arena.alloc(NodeKind::EmptyStatement));
            }
            TokenKind::Identifier => {}
            _ => return self.parse_expression_statement(),
        }

        let word = self.token.text.clone();
        match word.as_str() {
            "var" | "const" => {
                let kind = if word == "var" {
                    VarKind::Var
                } else {
                    VarKind::Const
                };
                let decl = self.parse_variable_declaration(kind)?;
                self.consume_semicolon()?;
                Ok(decl)
            }
            "let" if self.let_starts_declaration() => {
                let decl = self.parse_variable_declaration(VarKind::Let)?;
                self.consume_semicolon()?;
                Ok(decl)
            }
            "function" => self.parse_function_declaration(true),
            "async" if self.async_function_ahead() => self.parse_function_declaration(true),
            "class" => self.parse_class_declaration(true),
            "if" => self.parse_if_statement(),
            "for" => self.parse_for_statement(),
            "while" => {
                self.next_token()?;
                self.expect_punct("(")?;
                let test = self.parse_expression()?;
                self.expect_punct(")")?;
                let body = self.parse_statement()?;
                Ok(self.arena.while_stmt(test, body))
            }
            "do" => {
                self.next_token()?;
                let body = self.parse_statement()?;
                self.expect_word("while")?;
                self.expect_punct("(")?;
                let test = self.parse_expression()?;
                self.expect_punct(")")?;
                self.eat_punct(";")?;
                Ok(self.arena.alloc(NodeKind::DoWhileStatement { body, test }))
            }
            "switch" => self.parse_switch_statement(),
            "break" | "continue" => {
                self.next_token()?;
                let label = if self.token.kind == TokenKind::Identifier
                    && !self.token.newline_before
                    && !is_reserved_word(&self.token.text)
                {
                    let label = std::mem::take(&mut self.token.text);
                    self.next_token()?;
                    Some(label)
                } else {
                    None
                };
                self.consume_semicolon()?;
                Ok(if word == "break" {
                    self.arena.alloc(NodeKind::BreakStatement { label })
                } else {
                    self.arena.alloc(NodeKind::ContinueStatement { label })
                })
            }
            "return" => {
                self.next_token()?;
                let argument = if self.is_punct(";")
                    || self.is_punct("}")
                    || self.token.is_eof()
                    || self.token.newline_before
                {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.consume_semicolon()?;
                Ok(self.arena.ret(argument))
            }
            "throw" => {
                self.next_token()?;
                if self.token.newline_before {
                    return Err(self.unexpected("expression on the same line as `throw`"));
                }
                let argument = self.parse_expression()?;
                self.consume_semicolon()?;
                Ok(self.arena.alloc(NodeKind::ThrowStatement { argument }))
            }
            "try" => self.parse_try_statement(),
            "import" if !self.peek_is_punct("(") && !self.peek_is_punct(".") => {
                self.parse_import_declaration()
            }
            "export" => self.parse_export_declaration(),
            "debugger" => Err(ParseError::Unsupported {
                construct: "debugger statement",
                pos: self.token.pos,
            }),
            "with" => Err(ParseError::Unsupported {
                construct: "with statement",
                pos: self.token.pos,
            }),
            _ if !is_reserved_word(&word) && self.peek_is_punct(":") => {
                self.next_token()?;
                self.next_token()?;
                let body = self.parse_statement()?;
                Ok(self.arena.alloc(NodeKind::LabeledStatement { label: word, body }))
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn let_starts_declaration(&self) -> bool {
        self.peek().is_some_and(|t| {
            t.is_punct("[")
                || t.is_punct("{")
                || (t.kind == TokenKind::Identifier && !is_reserved_word(&t.text))
        })
    }

    fn async_function_ahead(&self) -> bool {
        self.peek()
            .is_some_and(|t| t.is_word("function") && !t.newline_before)
    }

    fn parse_expression_statement(&mut self) -> ParseResult<NodeIndex> {
        let expression = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(self.arena.expr_stmt(expression))
    }

    pub fn parse_block_statement(&mut self) -> ParseResult<NodeIndex> {
        self.expect_punct("{")?;
        let mut body = Vec::new();
        while !self.is_punct("}") {
            if self.token.is_eof() {
                return Err(self.unexpected("`}`"));
            }
            body.push(self.parse_statement()?);
        }
        self.next_token()?;
        Ok(self.arena.block(body))
    }

    fn parse_variable_declaration(&mut self, kind: VarKind) -> ParseResult<NodeIndex> {
        self.next_token()?;
        let mut declarations = Vec::new();
        loop {
            let id = self.parse_binding_target()?;
            let init = if self.eat_punct("=")? {
                Some(self.parse_assignment()?)
            } else {
                None
            };
            declarations.push(self.arena.alloc(NodeKind::VariableDeclarator { id, init }));
            if !self.eat_punct(",")? {
                break;
            }
        }
        Ok(self.arena.alloc(NodeKind::VariableDeclaration {
            kind,
            declarations,
        }))
    }

    fn parse_if_statement(&mut self) -> ParseResult<NodeIndex> {
        self.next_token()?;
        self.expect_punct("(")?;
        let test = self.parse_expression()?;
        self.expect_punct(")")?;
        let consequent = self.parse_statement()?;
        let alternate = if self.eat_word("else")? {
            Some(self.parse_statement()?)
        } else {
            None
        };
        Ok(self.arena.alloc(NodeKind::IfStatement {
            test,
            consequent,
            alternate,
        }))
    }

    fn parse_for_statement(&mut self) -> ParseResult<NodeIndex> {
        self.next_token()?;
        if self.is_word("await") {
            return Err(ParseError::Unsupported {
                construct: "for await",
                pos: self.token.pos,
            });
        }
        self.expect_punct("(")?;

        let init_pos = self.token.pos;
        let flags = self.context_flags | CONTEXT_FLAG_NO_IN;
        let init = if self.is_punct(";") {
            None
        } else if self.is_word("var") || self.is_word("const") {
            let kind = if self.is_word("var") {
                VarKind::Var
            } else {
                VarKind::Const
            };
            Some(self.with_context(flags, |p| p.parse_variable_declaration(kind))?)
        } else if self.is_word("let") && self.let_starts_declaration() {
            Some(self.with_context(flags, |p| p.parse_variable_declaration(VarKind::Let))?)
        } else {
            Some(self.with_context(flags, Self::parse_expression)?)
        };

        if let Some(left) = init {
            if self.is_word("of") || self.is_word("in") {
                let is_of = self.is_word("of");
                match self.arena.kind(left) {
                    NodeKind::VariableDeclaration { declarations, .. } => {
                        let single_uninitialized = declarations.len() == 1
                            && matches!(
                                self.arena.kind(declarations[0]),
                                NodeKind::VariableDeclarator { init: None, .. }
                            );
                        if !single_uninitialized {
                            return Err(ParseError::InvalidAssignmentTarget { pos: init_pos });
                        }
                    }
                    _ => self.to_assignment_target(left, init_pos)?,
                }
                self.next_token()?;
                let right = if is_of {
                    self.parse_assignment()?
                } else {
                    self.parse_expression()?
                };
                self.expect_punct(")")?;
                let body = self.parse_statement()?;
                return Ok(if is_of {
                    self.arena.alloc(NodeKind::ForOfStatement { left, right, body })
                } else {
                    self.arena.alloc(NodeKind::ForInStatement { left, right, body })
                });
            }
        }

        self.expect_punct(";")?;
        let test = if self.is_punct(";") {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_punct(";")?;
        let update = if self.is_punct(")") {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_punct(")")?;
        let body = self.parse_statement()?;
        Ok(self.arena.alloc(NodeKind::ForStatement {
            init,
            test,
            update,
            body,
        }))
    }

    fn parse_switch_statement(&mut self) -> ParseResult<NodeIndex> {
        self.next_token()?;
        self.expect_punct("(")?;
        let discriminant = self.parse_expression()?;
        self.expect_punct(")")?;
        self.expect_punct("{")?;
        let mut cases = Vec::new();
        while !self.eat_punct("}")? {
            let test = if self.eat_word("case")? {
                Some(self.parse_expression()?)
            } else if self.eat_word("default")? {
                None
            } else {
                return Err(self.unexpected("`case` or `default`"));
            };
            self.expect_punct(":")?;
            let mut consequent = Vec::new();
            while !self.is_word("case") && !self.is_word("default") && !self.is_punct("}") {
                if self.token.is_eof() {
                    return Err(self.unexpected("`}`"));
                }
                consequent.push(self.parse_statement()?);
            }
            cases.push(self.arena.switch_case(test, consequent));
        }
        Ok(self.arena.switch_stmt(discriminant, cases))
    }

    fn parse_try_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token.pos;
        self.next_token()?;
        let block = self.parse_block_statement()?;
        let handler = if self.eat_word("catch")? {
            let param = if self.eat_punct("(")? {
                let param = self.parse_binding_target()?;
                self.expect_punct(")")?;
                Some(param)
            } else {
                None
            };
            let body = self.parse_block_statement()?;
            Some(self.arena.alloc(NodeKind::CatchClause { param, body }))
        } else {
            None
        };
        let finalizer = if self.eat_word("finally")? {
            Some(self.parse_block_statement()?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(ParseError::UnexpectedToken {
                found: self.token.text.clone(),
                expected: "`catch` or `finally`".to_string(),
                pos,
            });
        }
        Ok(self.arena.alloc(NodeKind::TryStatement {
            block,
            handler,
            finalizer,
        }))
    }

    // =========================================================================
    // Functions and classes
    // =========================================================================

    fn parse_function_declaration(&mut self, require_name: bool) -> ParseResult<NodeIndex> {
        let data = self.parse_function(require_name)?;
        Ok(self.arena.alloc(NodeKind::FunctionDeclaration(data)))
    }

    fn parse_function(&mut self, require_name: bool) -> ParseResult<FunctionData> {
        let is_async = self.eat_word("async")?;
        self.expect_word("function")?;
        let is_generator = self.eat_punct("*")?;
        let id = if self.token.kind == TokenKind::Identifier {
            Some(self.parse_binding_identifier()?)
        } else if require_name {
            return Err(self.unexpected("function name"));
        } else {
            None
        };
        let flags = Self::function_flags(is_async, is_generator);
        let (params, body) = self.with_context(flags, |p| {
            let params = p.parse_parameters()?;
            let body = p.parse_block_statement()?;
            Ok((params, body))
        })?;
        Ok(FunctionData {
            id,
            params,
            body,
            is_async,
            is_generator,
        })
    }

    /// `( a, b = 1, [c], ...rest )`
    fn parse_parameters(&mut self) -> ParseResult<Vec<NodeIndex>> {
        self.expect_punct("(")?;
        let mut params = Vec::new();
        while !self.eat_punct(")")? {
            if self.eat_punct("...")? {
                let argument = self.parse_binding_target()?;
                params.push(self.arena.alloc(NodeKind::RestElement { argument }));
            } else {
                params.push(self.parse_binding_element()?);
            }
            if !self.is_punct(")") {
                self.expect_punct(",")?;
            }
        }
        Ok(params)
    }

    fn parse_binding_target(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token.pos;
        if self.is_punct("[") {
            let array = self.parse_array_literal()?;
            self.to_assignment_target(array, pos)?;
            return Ok(array);
        }
        if self.is_punct("{") {
            let object = self.parse_object_literal()?;
            self.to_assignment_target(object, pos)?;
            return Ok(object);
        }
        self.parse_binding_identifier()
    }

    fn parse_binding_element(&mut self) -> ParseResult<NodeIndex> {
        let left = self.parse_binding_target()?;
        if self.eat_punct("=")? {
            let right = self.parse_assignment()?;
            return Ok(self.arena.alloc(NodeKind::AssignmentPattern { left, right }));
        }
        Ok(left)
    }

    fn parse_class_declaration(&mut self, require_name: bool) -> ParseResult<NodeIndex> {
        let data = self.parse_class(require_name)?;
        Ok(self.arena.alloc(NodeKind::ClassDeclaration(data)))
    }

    fn parse_class(&mut self, require_name: bool) -> ParseResult<ClassData> {
        self.expect_word("class")?;
        let id = if self.token.kind == TokenKind::Identifier && !self.is_word("extends") {
            Some(self.parse_binding_identifier()?)
        } else if require_name {
            return Err(self.unexpected("class name"));
        } else {
            None
        };
        let super_class = if self.eat_word("extends")? {
            Some(self.parse_lhs_expression()?)
        } else {
            None
        };
        self.expect_punct("{")?;
        let mut body = Vec::new();
        while !self.eat_punct("}")? {
            if self.eat_punct(";")? {
                continue;
            }
            body.push(self.parse_class_member()?);
        }
        Ok(ClassData {
            id,
            super_class,
            body,
        })
    }

    /// Whether the current word is a modifier (`static`, `async`, `get`,
    /// `set`) rather than a member name.
    fn modifier_applies(&self) -> bool {
        self.peek().is_some_and(|t| {
            !t.is_eof()
                && !t.newline_before
                && !["(", "=", ";", "}", ":", ","]
                    .iter()
                    .any(|punct| t.is_punct(punct))
        })
    }

    fn parse_method_modifiers(&mut self) -> ParseResult<(MethodKind, bool, bool)> {
        let mut kind = MethodKind::Method;
        let mut is_async = false;
        let mut is_generator = false;
        if self.is_word("async") && self.modifier_applies() {
            self.next_token()?;
            is_async = true;
        }
        if self.eat_punct("*")? {
            is_generator = true;
        }
        if !is_async && !is_generator && (self.is_word("get") || self.is_word("set")) {
            if self.modifier_applies() {
                kind = if self.is_word("get") {
                    MethodKind::Get
                } else {
                    MethodKind::Set
                };
                self.next_token()?;
            }
        }
        Ok((kind, is_async, is_generator))
    }

    fn parse_class_member(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token.pos;
        let is_static = if self.is_word("static") && self.modifier_applies() {
            self.next_token()?;
            true
        } else {
            false
        };
        let (mut kind, is_async, is_generator) = self.parse_method_modifiers()?;
        let (key, computed) = self.parse_property_key()?;

        if self.is_punct("(") {
            if kind == MethodKind::Method
                && !computed
                && !is_static
                && self.arena.name(key) == Some("constructor")
            {
                kind = MethodKind::Constructor;
            }
            let value = self.parse_method_function(is_async, is_generator)?;
            return Ok(self.arena.alloc(NodeKind::ClassMethod {
                kind,
                key,
                computed,
                is_static,
                value,
            }));
        }

        if kind != MethodKind::Method || is_async || is_generator {
            return Err(ParseError::UnexpectedToken {
                found: self.token.text.clone(),
                expected: "`(`".to_string(),
                pos,
            });
        }
        let value = if self.eat_punct("=")? {
            Some(self.parse_assignment()?)
        } else {
            None
        };
        self.consume_semicolon()?;
        Ok(self.arena.alloc(NodeKind::ClassProperty {
            key,
            value,
            computed,
            is_static,
        }))
    }

    fn parse_property_key(&mut self) -> ParseResult<(NodeIndex, bool)> {
        match self.token.kind {
            TokenKind::Punctuator if self.is_punct("[") => {
                self.next_token()?;
                let key = self.without_no_in(Self::parse_assignment)?;
                self.expect_punct("]")?;
                Ok((key, true))
            }
            TokenKind::StringLiteral => {
                let value = std::mem::take(&mut self.token.text);
                self.next_token()?;
                Ok((self.arena.string(value), false))
            }
            TokenKind::NumericLiteral => {
                let value = self.token.value;
                self.next_token()?;
                Ok((self.arena.number(value), false))
            }
            TokenKind::Identifier => Ok((self.parse_identifier_name()?, false)),
            _ => Err(self.unexpected("property name")),
        }
    }

    fn parse_method_function(&mut self, is_async: bool, is_generator: bool) -> ParseResult<NodeIndex> {
        let flags = Self::function_flags(is_async, is_generator);
        let (params, body) = self.with_context(flags, |p| {
            let params = p.parse_parameters()?;
            let body = p.parse_block_statement()?;
            Ok((params, body))
        })?;
        Ok(self.arena.alloc(NodeKind::FunctionExpression(FunctionData {
            id: None,
            params,
            body,
            is_async,
            is_generator,
        })))
    }

    // =========================================================================
    // Modules
    // =========================================================================

    fn parse_module_source(&mut self) -> ParseResult<String> {
        if self.token.kind != TokenKind::StringLiteral {
            return Err(self.unexpected("module specifier"));
        }
        let source = std::mem::take(&mut self.token.text);
        self.next_token()?;
        Ok(source)
    }

    fn parse_import_declaration(&mut self) -> ParseResult<NodeIndex> {
        self.next_token()?;
        let mut specifiers = Vec::new();

        if self.token.kind == TokenKind::StringLiteral {
            let source = self.parse_module_source()?;
            self.consume_semicolon()?;
            return Ok(self.arena.alloc(NodeKind::ImportDeclaration { specifiers, source }));
        }

        let mut expect_more = true;
        if self.token.kind == TokenKind::Identifier {
            let local = self.parse_binding_identifier()?;
            specifiers.push(self.arena.alloc(NodeKind::ImportDefaultSpecifier { local }));
            expect_more = self.eat_punct(",")?;
        }
        if expect_more {
            if self.eat_punct("*")? {
                self.expect_word("as")?;
                let local = self.parse_binding_identifier()?;
                specifiers.push(self.arena.alloc(NodeKind::ImportNamespaceSpecifier { local }));
            } else {
                self.expect_punct("{")?;
                while !self.eat_punct("}")? {
                    let imported_name = self.token.text.clone();
                    let imported = self.parse_identifier_name()?;
                    let local = if self.eat_word("as")? {
                        self.parse_binding_identifier()?
                    } else if is_reserved_word(&imported_name) {
                        return Err(self.unexpected("`as`"));
                    } else {
                        self.arena.id(imported_name)
                    };
                    specifiers.push(self.arena.alloc(NodeKind::ImportSpecifier { imported, local }));
                    if !self.is_punct("}") {
                        self.expect_punct(",")?;
                    }
                }
            }
        }
        self.expect_word("from")?;
        let source = self.parse_module_source()?;
        self.consume_semicolon()?;
        Ok(self.arena.alloc(NodeKind::ImportDeclaration { specifiers, source }))
    }

    fn parse_export_declaration(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token.pos;
        self.next_token()?;

        if self.eat_word("default")? {
            let declaration = if self.is_word("function")
                || (self.is_word("async") && self.async_function_ahead())
            {
                self.parse_function_declaration(false)?
            } else if self.is_word("class") {
                self.parse_class_declaration(false)?
            } else {
                let expression = self.parse_assignment()?;
                self.consume_semicolon()?;
                expression
            };
            return Ok(self
                .arena
                .alloc(NodeKind::ExportDefaultDeclaration { declaration }));
        }

        if self.is_punct("*") {
            return Err(ParseError::Unsupported {
                construct: "export * declaration",
                pos,
            });
        }

        if self.eat_punct("{")? {
            let mut specifiers = Vec::new();
            while !self.eat_punct("}")? {
                let local_name = self.token.text.clone();
                let local = self.parse_identifier_name()?;
                let exported = if self.eat_word("as")? {
                    self.parse_identifier_name()?
                } else {
                    self.arena.id(local_name)
                };
                specifiers.push(self.arena.alloc(NodeKind::ExportSpecifier { local, exported }));
                if !self.is_punct("}") {
                    self.expect_punct(",")?;
                }
            }
            let source = if self.eat_word("from")? {
                Some(self.parse_module_source()?)
            } else {
                None
            };
            self.consume_semicolon()?;
            return Ok(self.arena.alloc(NodeKind::ExportNamedDeclaration {
                declaration: None,
                specifiers,
                source,
            }));
        }

        let declaration = if self.is_word("var") || self.is_word("const") || self.is_word("let") {
            let kind = match self.token.text.as_str() {
                "var" => VarKind::Var,
                "let" => VarKind::Let,
                _ => VarKind::Const,
            };
            let decl = self.parse_variable_declaration(kind)?;
            self.consume_semicolon()?;
            decl
        } else if self.is_word("function") || self.is_word("async") {
            self.parse_function_declaration(true)?
        } else if self.is_word("class") {
            self.parse_class_declaration(true)?
        } else {
            return Err(self.unexpected("declaration"));
        };
        Ok(self.arena.alloc(NodeKind::ExportNamedDeclaration {
            declaration: Some(declaration),
            specifiers: Vec::new(),
            source: None,
        }))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Comma expression.
    pub fn parse_expression(&mut self) -> ParseResult<NodeIndex> {
        let first = self.parse_assignment()?;
        if !self.is_punct(",") {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.eat_punct(",")? {
            expressions.push(self.parse_assignment()?);
        }
        Ok(self.arena.alloc(NodeKind::SequenceExpression { expressions }))
    }

    fn parse_assignment(&mut self) -> ParseResult<NodeIndex> {
        self.nested(Self::parse_assignment_inner)
    }

    fn parse_assignment_inner(&mut self) -> ParseResult<NodeIndex> {
        if self.arrow_ahead() {
            return self.parse_arrow_function();
        }
        if self.is_word("yield") && self.has_flag(CONTEXT_FLAG_GENERATOR) {
            return self.parse_yield();
        }

        let pos = self.token.pos;
        let left = self.parse_conditional()?;
        if self.token.kind != TokenKind::Punctuator || !is_assignment_operator(&self.token.text) {
            return Ok(left);
        }
        let operator = self.token.text.clone();
        if operator == "=" {
            self.to_assignment_target(left, pos)?;
        } else if !self.is_simple_target(left) {
            return Err(ParseError::InvalidAssignmentTarget { pos });
        }
        self.next_token()?;
        let right = self.parse_assignment()?;
        Ok(self.arena.alloc(NodeKind::AssignmentExpression {
            operator,
            left,
            right,
        }))
    }

    /// Scan ahead for `x =>`, `(...) =>`, `async x =>` or `async (...) =>`.
    fn arrow_ahead(&self) -> bool {
        let mut scanner = self.scanner.clone();
        let mut first = self.token.clone();
        if first.is_word("async") {
            match scanner.scan() {
                Ok(next)
                    if !next.newline_before
                        && (next.kind == TokenKind::Identifier || next.is_punct("(")) =>
                {
                    first = next;
                }
                _ => return false,
            }
        }
        if first.kind == TokenKind::Identifier {
            return !is_reserved_word(&first.text)
                && matches!(scanner.scan(), Ok(t) if t.is_punct("=>") && !t.newline_before);
        }
        if !first.is_punct("(") {
            return false;
        }
        let mut depth = 1usize;
        while depth > 0 {
            match scanner.scan() {
                Ok(t) if t.is_eof() => return false,
                Ok(t) if t.is_punct("(") || t.is_punct("[") || t.is_punct("{") => depth += 1,
                Ok(t) if t.is_punct(")") || t.is_punct("]") || t.is_punct("}") => depth -= 1,
                Ok(_) => {}
                Err(_) => return false,
            }
        }
        matches!(scanner.scan(), Ok(t) if t.is_punct("=>") && !t.newline_before)
    }

    fn parse_arrow_function(&mut self) -> ParseResult<NodeIndex> {
        let is_async = self.is_word("async") && !self.peek_is_punct("=>");
        if is_async {
            self.next_token()?;
        }
        let flags = Self::function_flags(is_async, false);
        let (params, body, expression_body) = self.with_context(flags, |p| {
            let params = if p.is_punct("(") {
                p.parse_parameters()?
            } else {
                vec![p.parse_binding_identifier()?]
            };
            p.expect_punct("=>")?;
            if p.is_punct("{") {
                Ok((params, p.parse_block_statement()?, false))
            } else {
                Ok((params, p.parse_assignment()?, true))
            }
        })?;
        Ok(self.arena.alloc(NodeKind::ArrowFunctionExpression(ArrowData {
            params,
            body,
            expression_body,
            is_async,
        })))
    }

    fn parse_yield(&mut self) -> ParseResult<NodeIndex> {
        self.next_token()?;
        let delegate = !self.token.newline_before && self.eat_punct("*")?;
        let ends_expression = self.token.newline_before
            || self.token.is_eof()
            || [")", "]", "}", ",", ";", ":"]
                .iter()
                .any(|punct| self.is_punct(punct));
        let argument = if ends_expression && !delegate {
            None
        } else {
            Some(self.parse_assignment()?)
        };
        Ok(self
            .arena
            .alloc(NodeKind::YieldExpression { argument, delegate }))
    }

    fn parse_conditional(&mut self) -> ParseResult<NodeIndex> {
        let test = self.parse_binary(0)?;
        if !self.eat_punct("?")? {
            return Ok(test);
        }
        let consequent = self.without_no_in(Self::parse_assignment)?;
        self.expect_punct(":")?;
        let alternate = self.parse_assignment()?;
        Ok(self.arena.alloc(NodeKind::ConditionalExpression {
            test,
            consequent,
            alternate,
        }))
    }

    fn current_binary_precedence(&self) -> Option<u8> {
        match self.token.kind {
            TokenKind::Punctuator => binary_precedence(&self.token.text),
            TokenKind::Identifier if self.is_word("instanceof") => Some(10),
            TokenKind::Identifier if self.is_word("in") && !self.has_flag(CONTEXT_FLAG_NO_IN) => {
                Some(10)
            }
            _ => None,
        }
    }

    /// Precedence climbing over binary and logical operators.
    fn parse_binary(&mut self, min_precedence: u8) -> ParseResult<NodeIndex> {
        let mut left = self.parse_unary()?;
        while let Some(precedence) = self.current_binary_precedence() {
            if precedence < min_precedence {
                break;
            }
            let operator = self.token.text.clone();
            self.next_token()?;
            let right = if operator == "**" {
                self.parse_binary(precedence)?
            } else {
                self.parse_binary(precedence + 1)?
            };
            left = if matches!(operator.as_str(), "&&" | "||" | "??") {
                self.arena.alloc(NodeKind::LogicalExpression {
                    operator,
                    left,
                    right,
                })
            } else {
                self.arena.binary(left, &operator, right)
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<NodeIndex> {
        self.nested(Self::parse_unary_inner)
    }

    fn parse_unary_inner(&mut self) -> ParseResult<NodeIndex> {
        let is_unary_punct = self.token.kind == TokenKind::Punctuator
            && matches!(self.token.text.as_str(), "!" | "~" | "+" | "-");
        let is_unary_word = self.token.kind == TokenKind::Identifier
            && matches!(self.token.text.as_str(), "typeof" | "void" | "delete");
        if is_unary_punct || is_unary_word {
            let operator = self.token.text.clone();
            self.next_token()?;
            let argument = self.parse_unary()?;
            return Ok(self.arena.unary(&operator, argument));
        }

        if self.is_punct("++") || self.is_punct("--") {
            let pos = self.token.pos;
            let operator = self.token.text.clone();
            self.next_token()?;
            let argument = self.parse_unary()?;
            if !self.is_simple_target(argument) {
                return Err(ParseError::InvalidAssignmentTarget { pos });
            }
            return Ok(self.arena.alloc(NodeKind::UpdateExpression {
                operator,
                prefix: true,
                argument,
            }));
        }

        if self.is_word("await") && self.has_flag(CONTEXT_FLAG_ASYNC) {
            self.next_token()?;
            let argument = self.parse_unary()?;
            return Ok(self.arena.alloc(NodeKind::AwaitExpression { argument }));
        }

        let pos = self.token.pos;
        let expression = self.parse_lhs_expression()?;
        if (self.is_punct("++") || self.is_punct("--")) && !self.token.newline_before {
            if !self.is_simple_target(expression) {
                return Err(ParseError::InvalidAssignmentTarget { pos });
            }
            let operator = self.token.text.clone();
            self.next_token()?;
            return Ok(self.arena.postfix(expression, &operator));
        }
        Ok(expression)
    }

    /// Member access, calls and `new`.
    fn parse_lhs_expression(&mut self) -> ParseResult<NodeIndex> {
        let expression = if self.is_word("new") {
            self.parse_new_expression()?
        } else {
            self.parse_primary()?
        };
        self.parse_member_tail(expression, true)
    }

    fn parse_new_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token.pos;
        self.next_token()?;
        if self.is_punct(".") {
            return Err(ParseError::Unsupported {
                construct: "new.target",
                pos,
            });
        }
        let callee = if self.is_word("new") {
            self.parse_new_expression()?
        } else {
            self.parse_primary()?
        };
        let callee = self.parse_member_tail(callee, false)?;
        let arguments = if self.is_punct("(") {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        Ok(self.arena.alloc(NodeKind::NewExpression { callee, arguments }))
    }

    fn parse_member_tail(&mut self, mut expression: NodeIndex, allow_call: bool) -> ParseResult<NodeIndex> {
        loop {
            if self.eat_punct(".")? {
                let property = self.parse_identifier_name()?;
                expression = self.arena.alloc(NodeKind::MemberExpression {
                    object: expression,
                    property,
                    computed: false,
                });
            } else if self.is_punct("[") {
                self.next_token()?;
                let property = self.without_no_in(Self::parse_expression)?;
                self.expect_punct("]")?;
                expression = self.arena.elem(expression, property);
            } else if allow_call && self.is_punct("(") {
                let arguments = self.parse_arguments()?;
                expression = self.arena.call(expression, arguments);
            } else if self.is_punct("?.") {
                return Err(ParseError::Unsupported {
                    construct: "optional chaining",
                    pos: self.token.pos,
                });
            } else {
                return Ok(expression);
            }
        }
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<NodeIndex>> {
        self.expect_punct("(")?;
        self.without_no_in(|p| {
            let mut arguments = Vec::new();
            while !p.eat_punct(")")? {
                if p.eat_punct("...")? {
                    let argument = p.parse_assignment()?;
                    arguments.push(p.arena.alloc(NodeKind::SpreadElement { argument }));
                } else {
                    arguments.push(p.parse_assignment()?);
                }
                if !p.is_punct(")") {
                    p.expect_punct(",")?;
                }
            }
            Ok(arguments)
        })
    }

    fn parse_primary(&mut self) -> ParseResult<NodeIndex> {
        match self.token.kind {
            TokenKind::NumericLiteral => {
                let value = self.token.value;
                self.next_token()?;
                Ok(self.arena.number(value))
            }
            TokenKind::StringLiteral => {
                let value = std::mem::take(&mut self.token.text);
                self.next_token()?;
                Ok(self.arena.string(value))
            }
            TokenKind::Identifier => self.parse_word_primary(),
            TokenKind::Punctuator => match self.token.text.as_str() {
                "(" => {
                    self.next_token()?;
                    let expression = self.without_no_in(Self::parse_expression)?;
                    self.expect_punct(")")?;
                    Ok(expression)
                }
                "[" => self.parse_array_literal(),
                "{" => self.parse_object_literal(),
                "/" | "/=" => Err(ParseError::Unsupported {
                    construct: "regular expression literal",
                    pos: self.token.pos,
                }),
                _ => Err(self.unexpected("expression")),
            },
            TokenKind::EndOfFile => Err(self.unexpected("expression")),
        }
    }

    fn parse_word_primary(&mut self) -> ParseResult<NodeIndex> {
        match self.token.text.as_str() {
            "this" => {
                self.next_token()?;
                Ok(self.arena.this())
            }
            "null" => {
                self.next_token()?;
                Ok(self.arena.alloc(NodeKind::NullLiteral))
            }
            "true" | "false" => {
                let value = self.is_word("true");
                self.next_token()?;
                Ok(self.arena.boolean(value))
            }
            "function" => {
                let data = self.parse_function(false)?;
                Ok(self.arena.alloc(NodeKind::FunctionExpression(data)))
            }
            "async" if self.async_function_ahead() => {
                let data = self.parse_function(false)?;
                Ok(self.arena.alloc(NodeKind::FunctionExpression(data)))
            }
            "class" => {
                let data = self.parse_class(false)?;
                Ok(self.arena.alloc(NodeKind::ClassExpression(data)))
            }
            "super" => Err(ParseError::Unsupported {
                construct: "super",
                pos: self.token.pos,
            }),
            _ => self.parse_binding_identifier(),
        }
    }

    fn parse_array_literal(&mut self) -> ParseResult<NodeIndex> {
        self.expect_punct("[")?;
        self.without_no_in(|p| {
            let mut elements = Vec::new();
            loop {
                if p.eat_punct("]")? {
                    break;
                }
                if p.eat_punct(",")? {
                    elements.push(None);
                    continue;
                }
                let element = if p.eat_punct("...")? {
                    let argument = p.parse_assignment()?;
                    p.arena.alloc(NodeKind::SpreadElement { argument })
                } else {
                    p.parse_assignment()?
                };
                elements.push(Some(element));
                if !p.is_punct("]") {
                    p.expect_punct(",")?;
                }
            }
            Ok(p.arena.alloc(NodeKind::ArrayExpression { elements }))
        })
    }

    fn parse_object_literal(&mut self) -> ParseResult<NodeIndex> {
        self.expect_punct("{")?;
        self.without_no_in(|p| {
            let mut properties = Vec::new();
            while !p.eat_punct("}")? {
                properties.push(p.parse_object_member()?);
                if !p.is_punct("}") {
                    p.expect_punct(",")?;
                }
            }
            Ok(p.arena.object(properties))
        })
    }

    fn parse_object_member(&mut self) -> ParseResult<NodeIndex> {
        if self.eat_punct("...")? {
            let argument = self.parse_assignment()?;
            return Ok(self.arena.alloc(NodeKind::SpreadElement { argument }));
        }

        let (kind, is_async, is_generator) = self.parse_method_modifiers()?;
        let key_is_word = self.token.kind == TokenKind::Identifier;
        let key_name = self.token.text.clone();
        let (key, computed) = self.parse_property_key()?;

        if self.is_punct("(") {
            let value = self.parse_method_function(is_async, is_generator)?;
            return Ok(self.arena.alloc(NodeKind::ObjectMethod {
                kind,
                key,
                computed,
                value,
            }));
        }
        if kind != MethodKind::Method || is_async || is_generator {
            return Err(self.unexpected("`(`"));
        }

        if self.eat_punct(":")? {
            let value = self.parse_assignment()?;
            return Ok(self.arena.alloc(NodeKind::ObjectProperty {
                key,
                value,
                computed,
                shorthand: false,
            }));
        }

        if !key_is_word || computed || is_reserved_word(&key_name) {
            return Err(self.unexpected("`:`"));
        }
        let mut value = self.arena.id(key_name);
        if self.eat_punct("=")? {
            let right = self.parse_assignment()?;
            value = self.arena.alloc(NodeKind::AssignmentPattern { left: value, right });
        }
        Ok(self.arena.alloc(NodeKind::ObjectProperty {
            key,
            value,
            computed: false,
            shorthand: true,
        }))
    }

    // =========================================================================
    // Assignment targets
    // =========================================================================

    fn is_simple_target(&self, node: NodeIndex) -> bool {
        matches!(
            self.arena.kind(node),
            NodeKind::Identifier { .. } | NodeKind::MemberExpression { .. }
        )
    }

    /// Reinterpret an expression as a destructuring target, rewriting array
    /// and object literals into patterns in place.
    fn to_assignment_target(&mut self, node: NodeIndex, pos: usize) -> ParseResult<()> {
        let kind = self.arena.kind(node).clone();
        match kind {
            NodeKind::Identifier { .. }
            | NodeKind::MemberExpression { .. }
            | NodeKind::ArrayPattern { .. }
            | NodeKind::ObjectPattern { .. }
            | NodeKind::AssignmentPattern { .. }
            | NodeKind::RestElement { .. } => Ok(()),
            NodeKind::ArrayExpression { elements } => {
                for element in elements.iter().flatten() {
                    self.to_rest_or_target(*element, pos)?;
                }
                *self.arena.kind_mut(node) = NodeKind::ArrayPattern { elements };
                Ok(())
            }
            NodeKind::ObjectExpression { properties } => {
                for &property in &properties {
                    match self.arena.kind(property).clone() {
                        NodeKind::ObjectProperty { value, .. } => {
                            self.to_assignment_target(value, pos)?;
                        }
                        NodeKind::SpreadElement { .. } => self.to_rest_or_target(property, pos)?,
                        _ => return Err(ParseError::InvalidAssignmentTarget { pos }),
                    }
                }
                *self.arena.kind_mut(node) = NodeKind::ObjectPattern { properties };
                Ok(())
            }
            NodeKind::AssignmentExpression {
                operator,
                left,
                right,
            } if operator == "=" => {
                self.to_assignment_target(left, pos)?;
                *self.arena.kind_mut(node) = NodeKind::AssignmentPattern { left, right };
                Ok(())
            }
            _ => Err(ParseError::InvalidAssignmentTarget { pos }),
        }
    }

    fn to_rest_or_target(&mut self, node: NodeIndex, pos: usize) -> ParseResult<()> {
        if let NodeKind::SpreadElement { argument } = *self.arena.kind(node) {
            self.to_assignment_target(argument, pos)?;
            *self.arena.kind_mut(node) = NodeKind::RestElement { argument };
            return Ok(());
        }
        self.to_assignment_target(node, pos)
    }
}

#[cfg(test)]
#[path = "tests/parser_tests.rs"]
mod tests;
