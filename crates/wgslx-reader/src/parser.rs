//! Recursive-descent parser for WGSL.
//!
//! Consumes the token stream produced by the [`lexer`](crate::lexer) after
//! template-list discovery and builds a [`Program`]. Every name is interned
//! into the program's symbol table and every expression is given a fresh
//! [`NodeId`].

use wgslx_ast::{
    Alias, Attribute, BinaryOp, Block, CaseClause, CaseSelector, Declaration, Diagnostic,
    DiagnosticControl, DiagnosticRule, Directives, Else, Enable, Expr, ExprKind, ForStatement,
    Function, Ident, IfStatement, Literal, LoopStatement, NodeIds, Parameter, Program, Requires,
    Severity, ShaderStage, Statement, Struct, StructMember, SwitchStatement, SymbolTable, UnaryOp,
    Variable, VariableKind, WhileStatement,
};

use crate::token::{Token, TokenKind, is_keyword};

type ParseResult<T> = Result<T, Diagnostic>;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    symbols: SymbolTable,
    ids: NodeIds,
}

impl Parser {
    /// Creates a parser over a discovered token stream ending in `Eof`.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            symbols: SymbolTable::new(),
            ids: NodeIds::new(),
        }
    }

    pub fn parse_program(mut self) -> ParseResult<Program> {
        let directives = self.parse_directives()?;
        let mut declarations = Vec::new();
        while !self.at(&TokenKind::Eof) {
            if self.eat(&TokenKind::Semicolon) {
                continue;
            }
            declarations.push(self.parse_declaration()?);
        }
        Ok(Program {
            symbols: self.symbols,
            directives,
            declarations,
        })
    }

    // -----------------------------------------------------------------------
    // Token helpers
    // -----------------------------------------------------------------------

    fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> &Token {
        let index = (self.pos + n).min(self.tokens.len().saturating_sub(1));
        &self.tokens[index]
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.peek().kind.is_ident(keyword)
    }

    fn bump(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.at_keyword(keyword) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> Diagnostic {
        Diagnostic::error(message, Some(self.peek().span))
    }

    fn expect(&mut self, kind: &TokenKind) -> ParseResult<()> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error(format!(
                "expected {}, found {}",
                kind.describe(),
                self.peek().kind.describe()
            )))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> ParseResult<()> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.error(format!(
                "expected '{keyword}', found {}",
                self.peek().kind.describe()
            )))
        }
    }

    /// Consumes a non-keyword identifier and returns its spelling.
    fn expect_name(&mut self) -> ParseResult<String> {
        match &self.peek().kind {
            TokenKind::Ident(name) if !is_keyword(name) => {
                let name = name.clone();
                self.bump();
                Ok(name)
            }
            TokenKind::Ident(name) => {
                Err(self.error(format!("'{name}' is a reserved keyword")))
            }
            other => Err(self.error(format!("expected identifier, found {}", other.describe()))),
        }
    }

    fn expect_symbol(&mut self) -> ParseResult<wgslx_ast::Symbol> {
        let name = self.expect_name()?;
        Ok(self.symbols.intern(&name))
    }

    fn expr(&mut self, kind: ExprKind) -> Expr {
        Expr::new(self.ids.next(), kind)
    }

    // -----------------------------------------------------------------------
    // Directives
    // -----------------------------------------------------------------------

    fn parse_directives(&mut self) -> ParseResult<Directives> {
        let mut directives = Directives::default();
        loop {
            if self.eat_keyword("enable") {
                let extensions = self.parse_name_list()?;
                directives.enables.push(Enable { extensions });
            } else if self.eat_keyword("requires") {
                let features = self.parse_name_list()?;
                directives.requires.push(Requires { features });
            } else if self.at_keyword("diagnostic") {
                self.bump();
                let control = self.parse_diagnostic_control()?;
                self.expect(&TokenKind::Semicolon)?;
                directives.diagnostics.push(control);
            } else {
                return Ok(directives);
            }
        }
    }

    /// `a, b, c;` with an optional trailing comma.
    fn parse_name_list(&mut self) -> ParseResult<Vec<String>> {
        let mut names = vec![self.expect_name()?];
        while self.eat(&TokenKind::Comma) {
            if self.at(&TokenKind::Semicolon) {
                break;
            }
            names.push(self.expect_name()?);
        }
        self.expect(&TokenKind::Semicolon)?;
        Ok(names)
    }

    /// `(severity, rule)` or `(severity, category.rule)`.
    fn parse_diagnostic_control(&mut self) -> ParseResult<DiagnosticControl> {
        self.expect(&TokenKind::LParen)?;
        let severity_name = self.expect_name()?;
        let severity = Severity::from_name(&severity_name)
            .ok_or_else(|| self.error(format!("invalid diagnostic severity '{severity_name}'")))?;
        self.expect(&TokenKind::Comma)?;
        let first = self.expect_symbol()?;
        let rule = if self.eat(&TokenKind::Period) {
            let name = self.expect_symbol()?;
            DiagnosticRule {
                category: Some(first),
                name,
            }
        } else {
            DiagnosticRule {
                category: None,
                name: first,
            }
        };
        self.eat(&TokenKind::Comma);
        self.expect(&TokenKind::RParen)?;
        Ok(DiagnosticControl { severity, rule })
    }

    // -----------------------------------------------------------------------
    // Attributes
    // -----------------------------------------------------------------------

    fn parse_attributes(&mut self) -> ParseResult<Vec<Attribute>> {
        let mut attributes = Vec::new();
        while self.eat(&TokenKind::At) {
            attributes.push(self.parse_attribute()?);
        }
        Ok(attributes)
    }

    fn parse_attribute(&mut self) -> ParseResult<Attribute> {
        let name = match &self.peek().kind {
            TokenKind::Ident(name) => name.clone(),
            other => {
                return Err(self.error(format!(
                    "expected attribute name, found {}",
                    other.describe()
                )));
            }
        };
        self.bump();
        let attr = match name.as_str() {
            "align" => Attribute::Align(self.parse_attribute_expr()?),
            "binding" => Attribute::Binding(self.parse_attribute_expr()?),
            "blend_src" => Attribute::BlendSrc(self.parse_attribute_expr()?),
            "group" => Attribute::Group(self.parse_attribute_expr()?),
            "id" => Attribute::Id(self.parse_attribute_expr()?),
            "location" => Attribute::Location(self.parse_attribute_expr()?),
            "offset" => Attribute::Offset(self.parse_attribute_expr()?),
            "size" => Attribute::Size(self.parse_attribute_expr()?),
            "builtin" => {
                self.expect(&TokenKind::LParen)?;
                let value = self.expect_name()?;
                self.eat(&TokenKind::Comma);
                self.expect(&TokenKind::RParen)?;
                Attribute::Builtin(value)
            }
            "interpolate" => {
                self.expect(&TokenKind::LParen)?;
                let kind = self.expect_name()?;
                let mut sampling = None;
                if self.eat(&TokenKind::Comma) && !self.at(&TokenKind::RParen) {
                    sampling = Some(self.expect_name()?);
                    self.eat(&TokenKind::Comma);
                }
                self.expect(&TokenKind::RParen)?;
                Attribute::Interpolate { kind, sampling }
            }
            "diagnostic" => Attribute::Diagnostic(self.parse_diagnostic_control()?),
            "workgroup_size" => {
                self.expect(&TokenKind::LParen)?;
                let x = self.parse_expression()?;
                let mut rest = Vec::new();
                while self.eat(&TokenKind::Comma) {
                    if self.at(&TokenKind::RParen) {
                        break;
                    }
                    if rest.len() == 2 {
                        return Err(self.error("workgroup_size takes at most 3 arguments"));
                    }
                    rest.push(self.parse_expression()?);
                }
                self.expect(&TokenKind::RParen)?;
                let mut rest = rest.into_iter();
                Attribute::WorkgroupSize {
                    x,
                    y: rest.next(),
                    z: rest.next(),
                }
            }
            "invariant" => Attribute::Invariant,
            "must_use" => Attribute::MustUse,
            "vertex" => Attribute::Stage(ShaderStage::Vertex),
            "fragment" => Attribute::Stage(ShaderStage::Fragment),
            "compute" => Attribute::Stage(ShaderStage::Compute),
            other => return Err(self.error(format!("unknown attribute '{other}'"))),
        };
        Ok(attr)
    }

    /// `(expr)` with an optional trailing comma.
    fn parse_attribute_expr(&mut self) -> ParseResult<Expr> {
        self.expect(&TokenKind::LParen)?;
        let expr = self.parse_expression()?;
        self.eat(&TokenKind::Comma);
        self.expect(&TokenKind::RParen)?;
        Ok(expr)
    }

    // -----------------------------------------------------------------------
    // Declarations
    // -----------------------------------------------------------------------

    fn parse_declaration(&mut self) -> ParseResult<Declaration> {
        let attributes = self.parse_attributes()?;
        if self.at_keyword("fn") {
            return Ok(Declaration::Function(self.parse_function(attributes)?));
        }
        if self.at_keyword("var") || self.at_keyword("const") || self.at_keyword("override") {
            let var = self.parse_variable(attributes)?;
            self.expect(&TokenKind::Semicolon)?;
            return Ok(Declaration::Variable(var));
        }
        if self.at_keyword("let") {
            return Err(self.error("module-scope 'let' is invalid, use 'const'"));
        }
        if !attributes.is_empty() {
            return Err(self.error(format!(
                "unexpected attributes before {}",
                self.peek().kind.describe()
            )));
        }
        if self.eat_keyword("struct") {
            return Ok(Declaration::Struct(self.parse_struct()?));
        }
        if self.eat_keyword("alias") {
            let name = self.expect_symbol()?;
            self.expect(&TokenKind::Equal)?;
            let ty = self.parse_type()?;
            self.expect(&TokenKind::Semicolon)?;
            return Ok(Declaration::Alias(Alias { name, ty }));
        }
        if self.eat_keyword("const_assert") {
            let expr = self.parse_expression()?;
            self.expect(&TokenKind::Semicolon)?;
            return Ok(Declaration::ConstAssert(expr));
        }
        if matches!(self.peek().kind, TokenKind::Ident(ref name) if name == "enable" || name == "requires" || name == "diagnostic")
        {
            return Err(self.error("directives must come before any declaration"));
        }
        Err(self.error(format!(
            "expected declaration, found {}",
            self.peek().kind.describe()
        )))
    }

    fn parse_function(&mut self, attributes: Vec<Attribute>) -> ParseResult<Function> {
        self.expect_keyword("fn")?;
        let name = self.expect_symbol()?;
        self.expect(&TokenKind::LParen)?;
        let mut parameters = Vec::new();
        while !self.at(&TokenKind::RParen) {
            let attributes = self.parse_attributes()?;
            let name = self.expect_symbol()?;
            self.expect(&TokenKind::Colon)?;
            let ty = self.parse_type()?;
            parameters.push(Parameter {
                attributes,
                name,
                ty,
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;

        let mut return_attributes = Vec::new();
        let mut return_type = None;
        if self.eat(&TokenKind::Arrow) {
            return_attributes = self.parse_attributes()?;
            return_type = Some(self.parse_type()?);
        }
        let body = self.parse_compound()?;
        Ok(Function {
            attributes,
            name,
            parameters,
            return_attributes,
            return_type,
            body,
        })
    }

    /// `var`, `let`, `const` or `override`, without the terminating `;`.
    fn parse_variable(&mut self, attributes: Vec<Attribute>) -> ParseResult<Variable> {
        let kind = if self.eat_keyword("var") {
            let mut address_space = None;
            let mut access_mode = None;
            if self.eat(&TokenKind::TemplateStart) {
                let mut args = self.parse_template_args()?.into_iter();
                address_space = args.next();
                access_mode = args.next();
                if args.next().is_some() {
                    return Err(self.error("'var' takes at most 2 template arguments"));
                }
            }
            VariableKind::Var {
                address_space,
                access_mode,
            }
        } else if self.eat_keyword("let") {
            VariableKind::Let
        } else if self.eat_keyword("const") {
            VariableKind::Const
        } else {
            self.expect_keyword("override")?;
            VariableKind::Override
        };

        let name = self.expect_symbol()?;
        let ty = if self.eat(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let initializer = if self.eat(&TokenKind::Equal) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        match kind {
            VariableKind::Let | VariableKind::Const if initializer.is_none() => {
                return Err(self.error(format!(
                    "'{}' declaration requires an initializer",
                    kind.keyword()
                )));
            }
            VariableKind::Var { .. } | VariableKind::Override
                if ty.is_none() && initializer.is_none() =>
            {
                return Err(self.error(format!(
                    "'{}' declaration requires a type or an initializer",
                    kind.keyword()
                )));
            }
            _ => {}
        }
        Ok(Variable {
            attributes,
            kind,
            name,
            ty,
            initializer,
        })
    }

    fn parse_struct(&mut self) -> ParseResult<Struct> {
        let name = self.expect_symbol()?;
        self.expect(&TokenKind::LBrace)?;
        let mut members = Vec::new();
        while !self.at(&TokenKind::RBrace) {
            let attributes = self.parse_attributes()?;
            let member_name = self.expect_symbol()?;
            self.expect(&TokenKind::Colon)?;
            let ty = self.parse_type()?;
            members.push(StructMember {
                id: self.ids.next(),
                attributes,
                name: member_name,
                ty,
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        if members.is_empty() {
            return Err(self.error("structures must have at least one member"));
        }
        Ok(Struct { name, members })
    }

    /// A type specifier: an identifier with an optional template list.
    fn parse_type(&mut self) -> ParseResult<Expr> {
        let ident = self.parse_ident()?;
        Ok(self.expr(ExprKind::Ident(ident)))
    }

    fn parse_ident(&mut self) -> ParseResult<Ident> {
        let symbol = self.expect_symbol()?;
        let template_args = if self.eat(&TokenKind::TemplateStart) {
            self.parse_template_args()?
        } else {
            Vec::new()
        };
        Ok(Ident {
            symbol,
            template_args,
        })
    }

    /// Arguments after a template start, up to and including the template end.
    fn parse_template_args(&mut self) -> ParseResult<Vec<Expr>> {
        let mut args = Vec::new();
        while !self.at(&TokenKind::TemplateEnd) {
            args.push(self.parse_expression()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::TemplateEnd)?;
        if args.is_empty() {
            return Err(self.error("empty template argument list"));
        }
        Ok(args)
    }

    // -----------------------------------------------------------------------
    // Statements
    // -----------------------------------------------------------------------

    fn parse_compound(&mut self) -> ParseResult<Block> {
        let attributes = self.parse_attributes()?;
        self.parse_block_with(attributes)
    }

    fn parse_block_with(&mut self, attributes: Vec<Attribute>) -> ParseResult<Block> {
        self.expect(&TokenKind::LBrace)?;
        let mut statements = Vec::new();
        while !self.at(&TokenKind::RBrace) {
            if self.at(&TokenKind::Eof) {
                return Err(self.error("expected '}', found end of file"));
            }
            if let Some(stmt) = self.parse_statement()? {
                statements.push(stmt);
            }
        }
        self.bump();
        Ok(Block {
            attributes,
            statements,
        })
    }

    /// Parses one statement; empty statements (`;`) yield `None`.
    fn parse_statement(&mut self) -> ParseResult<Option<Statement>> {
        if self.eat(&TokenKind::Semicolon) {
            return Ok(None);
        }
        let attributes = self.parse_attributes()?;
        if self.at(&TokenKind::LBrace) {
            return Ok(Some(Statement::Block(self.parse_block_with(attributes)?)));
        }
        if self.eat_keyword("if") {
            return Ok(Some(Statement::If(self.parse_if(attributes)?)));
        }
        if self.eat_keyword("switch") {
            return Ok(Some(self.parse_switch(attributes)?));
        }
        if self.eat_keyword("loop") {
            return Ok(Some(self.parse_loop(attributes)?));
        }
        if self.eat_keyword("for") {
            return Ok(Some(self.parse_for(attributes)?));
        }
        if self.eat_keyword("while") {
            let condition = self.parse_expression()?;
            let body = self.parse_compound()?;
            return Ok(Some(Statement::While(WhileStatement {
                attributes,
                condition,
                body,
            })));
        }
        if !attributes.is_empty() {
            return Err(self.error(format!(
                "unexpected attributes before {}",
                self.peek().kind.describe()
            )));
        }

        let stmt = if self.eat_keyword("return") {
            let value = if self.at(&TokenKind::Semicolon) {
                None
            } else {
                Some(self.parse_expression()?)
            };
            Statement::Return(value)
        } else if self.eat_keyword("break") {
            if self.eat_keyword("if") {
                Statement::BreakIf(self.parse_expression()?)
            } else {
                Statement::Break
            }
        } else if self.eat_keyword("continue") {
            Statement::Continue
        } else if self.eat_keyword("discard") {
            Statement::Discard
        } else if self.eat_keyword("const_assert") {
            Statement::ConstAssert(self.parse_expression()?)
        } else {
            self.parse_simple_statement()?
        };
        self.expect(&TokenKind::Semicolon)?;
        Ok(Some(stmt))
    }

    /// Declarations, assignments, increments and call statements: the forms
    /// allowed in a `for` header. No terminating `;`.
    fn parse_simple_statement(&mut self) -> ParseResult<Statement> {
        if self.at_keyword("var") || self.at_keyword("let") || self.at_keyword("const") {
            return Ok(Statement::Declaration(self.parse_variable(Vec::new())?));
        }
        if self.at(&TokenKind::Underscore) {
            let id = self.ids.next();
            self.bump();
            self.expect(&TokenKind::Equal)?;
            let rhs = self.parse_expression()?;
            return Ok(Statement::Assign {
                lhs: Expr::new(id, ExprKind::Phony),
                rhs,
            });
        }

        let lhs = self.parse_unary()?;
        if self.eat(&TokenKind::Equal) {
            let rhs = self.parse_expression()?;
            return Ok(Statement::Assign { lhs, rhs });
        }
        if let Some(op) = compound_assign_op(&self.peek().kind) {
            self.bump();
            let rhs = self.parse_expression()?;
            return Ok(Statement::CompoundAssign { lhs, op, rhs });
        }
        if self.eat(&TokenKind::PlusPlus) {
            return Ok(Statement::Increment(lhs));
        }
        if self.eat(&TokenKind::MinusMinus) {
            return Ok(Statement::Decrement(lhs));
        }
        if matches!(lhs.kind, ExprKind::Call { .. }) {
            return Ok(Statement::Call(lhs));
        }
        Err(self.error(format!(
            "expected assignment or function call, found {}",
            self.peek().kind.describe()
        )))
    }

    fn parse_if(&mut self, attributes: Vec<Attribute>) -> ParseResult<IfStatement> {
        let condition = self.parse_expression()?;
        let accept = self.parse_compound()?;
        let reject = if self.eat_keyword("else") {
            if self.eat_keyword("if") {
                Some(Else::If(Box::new(self.parse_if(Vec::new())?)))
            } else {
                Some(Else::Block(self.parse_compound()?))
            }
        } else {
            None
        };
        Ok(IfStatement {
            attributes,
            condition,
            accept,
            reject,
        })
    }

    fn parse_switch(&mut self, attributes: Vec<Attribute>) -> ParseResult<Statement> {
        let selector = self.parse_expression()?;
        let body_attributes = self.parse_attributes()?;
        self.expect(&TokenKind::LBrace)?;
        let mut clauses = Vec::new();
        while !self.eat(&TokenKind::RBrace) {
            let selectors = if self.eat_keyword("default") {
                vec![CaseSelector::Default]
            } else {
                self.expect_keyword("case")?;
                let mut selectors = Vec::new();
                loop {
                    if self.eat_keyword("default") {
                        selectors.push(CaseSelector::Default);
                    } else {
                        selectors.push(CaseSelector::Expr(self.parse_expression()?));
                    }
                    if !self.eat(&TokenKind::Comma)
                        || self.at(&TokenKind::Colon)
                        || self.at(&TokenKind::LBrace)
                        || self.at(&TokenKind::At)
                    {
                        break;
                    }
                }
                selectors
            };
            self.eat(&TokenKind::Colon);
            let body = self.parse_compound()?;
            clauses.push(CaseClause { selectors, body });
        }
        Ok(Statement::Switch(SwitchStatement {
            attributes,
            selector,
            body_attributes,
            clauses,
        }))
    }

    fn parse_loop(&mut self, attributes: Vec<Attribute>) -> ParseResult<Statement> {
        let body_attributes = self.parse_attributes()?;
        self.expect(&TokenKind::LBrace)?;
        let mut statements = Vec::new();
        let mut continuing = None;
        while !self.eat(&TokenKind::RBrace) {
            if self.at(&TokenKind::Eof) {
                return Err(self.error("expected '}', found end of file"));
            }
            if self.eat_keyword("continuing") {
                continuing = Some(self.parse_compound()?);
                self.expect(&TokenKind::RBrace)?;
                break;
            }
            if let Some(stmt) = self.parse_statement()? {
                statements.push(stmt);
            }
        }
        Ok(Statement::Loop(LoopStatement {
            attributes,
            body: Block {
                attributes: body_attributes,
                statements,
            },
            continuing,
        }))
    }

    fn parse_for(&mut self, attributes: Vec<Attribute>) -> ParseResult<Statement> {
        self.expect(&TokenKind::LParen)?;
        let initializer = if self.at(&TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_simple_statement()?))
        };
        self.expect(&TokenKind::Semicolon)?;
        let condition = if self.at(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::Semicolon)?;
        let update = if self.at(&TokenKind::RParen) {
            None
        } else {
            let stmt = self.parse_simple_statement()?;
            if matches!(stmt, Statement::Declaration(_)) {
                return Err(self.error("a for-loop update cannot declare a variable"));
            }
            Some(Box::new(stmt))
        };
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_compound()?;
        Ok(Statement::For(ForStatement {
            attributes,
            initializer,
            condition,
            update,
            body,
        }))
    }

    // -----------------------------------------------------------------------
    // Expressions
    // -----------------------------------------------------------------------

    pub(crate) fn parse_expression(&mut self) -> ParseResult<Expr> {
        let first = self.parse_unary()?;
        if let Some(op) = bitwise_op(&self.peek().kind) {
            let mut lhs = first;
            while self.at_binary(op) {
                self.bump();
                let rhs = self.parse_unary()?;
                lhs = self.binary(op, lhs, rhs);
            }
            return self.finish_chain(lhs);
        }

        let mut lhs = self.parse_relational_rest(first)?;
        for op in [BinaryOp::LogicalAnd, BinaryOp::LogicalOr] {
            if self.at_binary(op) {
                while self.at_binary(op) {
                    self.bump();
                    let operand = self.parse_unary()?;
                    let rhs = self.parse_relational_rest(operand)?;
                    lhs = self.binary(op, lhs, rhs);
                }
                return self.finish_chain(lhs);
            }
        }
        Ok(lhs)
    }

    fn at_binary(&self, op: BinaryOp) -> bool {
        let kind = &self.peek().kind;
        match op {
            BinaryOp::LogicalAnd => kind == &TokenKind::AndAnd,
            BinaryOp::LogicalOr => kind == &TokenKind::OrOr,
            _ => bitwise_op(kind) == Some(op),
        }
    }

    /// Rejects an operator that would mix with the chain just parsed.
    fn finish_chain(&self, expr: Expr) -> ParseResult<Expr> {
        let kind = &self.peek().kind;
        if bitwise_op(kind).is_some()
            || matches!(kind, TokenKind::AndAnd | TokenKind::OrOr)
            || relational_op(kind).is_some()
            || shift_op(kind).is_some()
            || additive_op(kind).is_some()
            || multiplicative_op(kind).is_some()
        {
            return Err(self.error(format!(
                "mixing {} with other operators requires parentheses",
                kind.describe()
            )));
        }
        Ok(expr)
    }

    fn parse_relational_rest(&mut self, first: Expr) -> ParseResult<Expr> {
        let lhs = self.parse_shift_rest(first)?;
        if let Some(op) = relational_op(&self.peek().kind) {
            self.bump();
            let operand = self.parse_unary()?;
            let rhs = self.parse_shift_rest(operand)?;
            return Ok(self.binary(op, lhs, rhs));
        }
        Ok(lhs)
    }

    fn parse_shift_rest(&mut self, first: Expr) -> ParseResult<Expr> {
        if let Some(op) = shift_op(&self.peek().kind) {
            self.bump();
            let rhs = self.parse_unary()?;
            return Ok(self.binary(op, first, rhs));
        }
        let mut lhs = self.parse_multiplicative_rest(first)?;
        while let Some(op) = additive_op(&self.peek().kind) {
            self.bump();
            let operand = self.parse_unary()?;
            let rhs = self.parse_multiplicative_rest(operand)?;
            lhs = self.binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_multiplicative_rest(&mut self, first: Expr) -> ParseResult<Expr> {
        let mut lhs = first;
        while let Some(op) = multiplicative_op(&self.peek().kind) {
            self.bump();
            let rhs = self.parse_unary()?;
            lhs = self.binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn binary(&mut self, op: BinaryOp, left: Expr, right: Expr) -> Expr {
        self.expr(ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = match self.peek().kind {
            TokenKind::Minus => Some(UnaryOp::Negate),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::Complement),
            TokenKind::Star => Some(UnaryOp::Indirection),
            TokenKind::And => Some(UnaryOp::AddressOf),
            _ => None,
        };
        match op {
            Some(op) => {
                self.bump();
                let operand = self.parse_unary()?;
                Ok(self.expr(ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                }))
            }
            None => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat(&TokenKind::LBracket) {
                let index = self.parse_expression()?;
                self.expect(&TokenKind::RBracket)?;
                expr = self.expr(ExprKind::Index {
                    base: Box::new(expr),
                    index: Box::new(index),
                });
            } else if self.eat(&TokenKind::Period) {
                let member = Ident::new(self.expect_symbol()?);
                expr = self.expr(ExprKind::Member {
                    base: Box::new(expr),
                    member,
                });
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        match self.peek().kind.clone() {
            TokenKind::Int { value, suffix } => {
                self.bump();
                Ok(self.expr(ExprKind::Literal(Literal::Int { value, suffix })))
            }
            TokenKind::Float { value, suffix } => {
                self.bump();
                Ok(self.expr(ExprKind::Literal(Literal::Float { value, suffix })))
            }
            TokenKind::LParen => {
                self.bump();
                let expr = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Ident(name) if name == "true" || name == "false" => {
                self.bump();
                Ok(self.expr(ExprKind::Literal(Literal::Bool(name == "true"))))
            }
            TokenKind::Ident(_) => {
                let target = self.parse_ident()?;
                if self.eat(&TokenKind::LParen) {
                    let mut arguments = Vec::new();
                    while !self.at(&TokenKind::RParen) {
                        arguments.push(self.parse_expression()?);
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                    self.expect(&TokenKind::RParen)?;
                    Ok(self.expr(ExprKind::Call { target, arguments }))
                } else {
                    Ok(self.expr(ExprKind::Ident(target)))
                }
            }
            other => Err(self.error(format!("expected expression, found {}", other.describe()))),
        }
    }
}

fn bitwise_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::And => Some(BinaryOp::And),
        TokenKind::Or => Some(BinaryOp::InclusiveOr),
        TokenKind::Xor => Some(BinaryOp::ExclusiveOr),
        _ => None,
    }
}

fn relational_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Less => Some(BinaryOp::Less),
        TokenKind::LessEqual => Some(BinaryOp::LessEqual),
        TokenKind::Greater => Some(BinaryOp::Greater),
        TokenKind::GreaterEqual => Some(BinaryOp::GreaterEqual),
        TokenKind::EqualEqual => Some(BinaryOp::Equal),
        TokenKind::NotEqual => Some(BinaryOp::NotEqual),
        _ => None,
    }
}

fn shift_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::ShiftLeft => Some(BinaryOp::ShiftLeft),
        TokenKind::ShiftRight => Some(BinaryOp::ShiftRight),
        _ => None,
    }
}

fn additive_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Subtract),
        _ => None,
    }
}

fn multiplicative_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Star => Some(BinaryOp::Multiply),
        TokenKind::Slash => Some(BinaryOp::Divide),
        TokenKind::Percent => Some(BinaryOp::Modulo),
        _ => None,
    }
}

fn compound_assign_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::PlusEqual => Some(BinaryOp::Add),
        TokenKind::MinusEqual => Some(BinaryOp::Subtract),
        TokenKind::StarEqual => Some(BinaryOp::Multiply),
        TokenKind::SlashEqual => Some(BinaryOp::Divide),
        TokenKind::PercentEqual => Some(BinaryOp::Modulo),
        TokenKind::AndEqual => Some(BinaryOp::And),
        TokenKind::OrEqual => Some(BinaryOp::InclusiveOr),
        TokenKind::XorEqual => Some(BinaryOp::ExclusiveOr),
        TokenKind::ShiftLeftEqual => Some(BinaryOp::ShiftLeft),
        TokenKind::ShiftRightEqual => Some(BinaryOp::ShiftRight),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::template::discover_templates;

    fn parse(src: &str) -> ParseResult<Program> {
        let mut tokens = tokenize(src)?;
        discover_templates(&mut tokens);
        Parser::new(tokens).parse_program()
    }

    fn parse_ok(src: &str) -> Program {
        parse(src).unwrap_or_else(|err| panic!("parse failed: {err}"))
    }

    fn single_function(program: &Program) -> &Function {
        match &program.declarations[..] {
            [Declaration::Function(f)] => f,
            other => panic!("expected one function, got {other:?}"),
        }
    }

    #[test]
    fn parses_function_signature() {
        let program = parse_ok("fn average(a: f32, b: f32) -> f32 { return (a + b) / 2; }");
        let f = single_function(&program);
        assert_eq!(program.name(f.name), "average");
        assert_eq!(f.parameters.len(), 2);
        assert!(f.return_type.is_some());
        assert!(!f.is_entry_point());
        match &f.body.statements[0] {
            Statement::Return(Some(expr)) => match &expr.kind {
                ExprKind::Binary { op, left, .. } => {
                    assert_eq!(*op, BinaryOp::Divide);
                    assert!(matches!(
                        left.kind,
                        ExprKind::Binary {
                            op: BinaryOp::Add,
                            ..
                        }
                    ));
                }
                other => panic!("unexpected expression {other:?}"),
            },
            other => panic!("unexpected statement {other:?}"),
        }
    }

    #[test]
    fn parses_entry_point_attributes() {
        let program = parse_ok(
            "@vertex fn vs() -> @builtin(position) vec4<f32> { return vec4f(0.0); }",
        );
        let f = single_function(&program);
        assert!(f.is_entry_point());
        assert_eq!(f.return_attributes, vec![Attribute::Builtin("position".into())]);
        let ty = f.return_type.as_ref().and_then(Expr::as_ident).expect("return type");
        assert_eq!(program.name(ty.symbol), "vec4");
        assert_eq!(ty.template_args.len(), 1);
    }

    #[test]
    fn parses_directives() {
        let program = parse_ok(
            "enable f16, dual_source_blending;\nenable clip_distances,;\nrequires pointer_composite_access;\ndiagnostic(off, chromium.unreachable_code);",
        );
        let directives = &program.directives;
        assert_eq!(directives.enables.len(), 2);
        assert_eq!(directives.enables[1].extensions, vec!["clip_distances".to_owned()]);
        assert_eq!(directives.requires.len(), 1);
        let control = directives.diagnostics[0];
        assert_eq!(control.severity, Severity::Off);
        assert_eq!(program.name(control.rule.name), "unreachable_code");
        assert!(control.rule.category.is_some());
    }

    #[test]
    fn multiplication_binds_tighter() {
        let program = parse_ok("const x = 1 + 2 * 3;");
        let Declaration::Variable(var) = &program.declarations[0] else {
            panic!("expected a const");
        };
        match &var.initializer.as_ref().expect("initializer").kind {
            ExprKind::Binary { op, right, .. } => {
                assert_eq!(*op, BinaryOp::Add);
                assert!(matches!(
                    right.kind,
                    ExprKind::Binary {
                        op: BinaryOp::Multiply,
                        ..
                    }
                ));
            }
            other => panic!("unexpected expression {other:?}"),
        }
    }

    #[test]
    fn rejects_mixed_bitwise_operators() {
        assert!(parse("const x = 1 & 2 | 3;").is_err());
        assert!(parse("const x = (1 & 2) | 3;").is_ok());
        assert!(parse("const x = true && false || true;").is_err());
    }

    #[test]
    fn parses_statements() {
        let program = parse_ok(
            "fn f() {
                var i = 0;
                for (var j = 0; j < 4; j++) { i += j; }
                while i > 0 { i--; }
                loop { if i == 2 { break; } else if i == 3 { continue; } else { i = 1; } continuing { break if i > 5; } }
                switch i { case 1, 2: { } default { } }
                _ = i;
                let p = &i;
                *p = 3;
            }",
        );
        let f = single_function(&program);
        let stmts = &f.body.statements;
        assert_eq!(stmts.len(), 8);
        assert!(matches!(stmts[1], Statement::For(_)));
        assert!(matches!(stmts[2], Statement::While(_)));
        match &stmts[3] {
            Statement::Loop(lp) => {
                let continuing = lp.continuing.as_ref().expect("continuing block");
                assert!(matches!(continuing.statements[0], Statement::BreakIf(_)));
            }
            other => panic!("unexpected statement {other:?}"),
        }
        match &stmts[4] {
            Statement::Switch(switch) => assert_eq!(switch.clauses.len(), 2),
            other => panic!("unexpected statement {other:?}"),
        }
        assert!(matches!(
            &stmts[5],
            Statement::Assign { lhs, .. } if lhs.kind == ExprKind::Phony
        ));
    }

    #[test]
    fn parses_struct_and_templates() {
        let program = parse_ok(
            "struct S { @size(16) a: f32, b: array<vec4<f32>, 4>, }
             @group(0) @binding(0) var<storage, read_write> buf: array<S>;",
        );
        match &program.declarations[0] {
            Declaration::Struct(s) => {
                assert_eq!(s.members.len(), 2);
                assert_ne!(s.members[0].id, s.members[1].id);
            }
            other => panic!("unexpected declaration {other:?}"),
        }
        match &program.declarations[1] {
            Declaration::Variable(var) => match &var.kind {
                VariableKind::Var {
                    address_space: Some(space),
                    access_mode: Some(_),
                } => {
                    let space = space.as_ident().expect("address space");
                    assert_eq!(program.name(space.symbol), "storage");
                }
                other => panic!("unexpected kind {other:?}"),
            },
            other => panic!("unexpected declaration {other:?}"),
        }
    }

    #[test]
    fn reports_missing_semicolon() {
        let err = parse("fn f() -> f32 { return 1.0 }").expect_err("should fail");
        assert_eq!(err.message, "expected ';', found '}'");
        let span = err.span.expect("span");
        assert_eq!((span.line, span.col), (1, 28));
    }

    #[test]
    fn rejects_module_scope_let() {
        let err = parse("let x = 1;").expect_err("should fail");
        assert!(err.message.contains("module-scope 'let'"));
    }

    #[test]
    fn rejects_keyword_as_name() {
        let err = parse("fn loop() {}").expect_err("should fail");
        assert_eq!(err.message, "'loop' is a reserved keyword");
    }
}
