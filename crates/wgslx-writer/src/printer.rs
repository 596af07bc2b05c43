//! The compact printer.
//!
//! Output is built token by token. A space is inserted only where two
//! adjacent tokens would otherwise read back as one (`let x`, `a- -b`,
//! `a/ *p`, `vec4<f32> =`).

use std::collections::{BTreeSet, HashSet};

use wgslx_ast::visit::{Visitor, walk_program};
use wgslx_ast::{
    Attribute, BinaryOp, Block, CallTarget, CaseSelector, Declaration, DiagnosticControl, Else,
    Expr, ExprKind, Function, Ident, IdentKind, IfStatement, Literal, NodeId, Program,
    ResolvedProgram, Scalar, Sem, Statement, Struct, Symbol, Type, Variable, VariableKind,
};

use crate::Options;
use crate::aliases::short_alias;
use crate::literals::{float_literal, int_literal};
use crate::precedence::{OperatorGroup, Position, requires_parens};

/// Builtin constructors whose component type is inferred from the
/// arguments when written without a template list.
const INFERRED_CONSTRUCTORS: &[&str] = &[
    "array", "mat2x2", "mat2x3", "mat2x4", "mat3x2", "mat3x3", "mat3x4", "mat4x2", "mat4x3",
    "mat4x4", "vec2", "vec3", "vec4",
];

pub(crate) struct Printer<'a> {
    program: &'a Program,
    sem: &'a Sem,
    options: &'a Options,
    /// Names declared anywhere in the program. A short type alias is not
    /// used when the program declares a name spelled like it.
    declared: HashSet<&'a str>,
    /// Scalar returned by the function being printed.
    return_scalar: Option<Scalar>,
    out: String,
}

impl<'a> Printer<'a> {
    pub(crate) fn new(resolved: &'a ResolvedProgram, options: &'a Options) -> Self {
        let mut names = DeclaredNames {
            program: &resolved.program,
            names: HashSet::new(),
        };
        walk_program(&mut names, &resolved.program);
        Self {
            program: &resolved.program,
            sem: &resolved.sem,
            options,
            declared: names.names,
            return_scalar: None,
            out: String::new(),
        }
    }

    pub(crate) fn print(mut self) -> String {
        self.directives();
        let program = self.program;
        for decl in &program.declarations {
            match decl {
                Declaration::Function(func) => self.function(func),
                Declaration::Variable(var) => {
                    self.variable(var);
                    self.token(";");
                }
                Declaration::Struct(s) => self.structure(s),
                Declaration::Alias(alias) => {
                    self.token("alias");
                    self.token(self.name(alias.name));
                    self.token("=");
                    self.type_expr(&alias.ty);
                    self.token(";");
                }
                Declaration::ConstAssert(cond) => {
                    self.token("const_assert");
                    self.value(cond, None);
                    self.token(";");
                }
            }
        }
        self.out
    }

    fn name(&self, symbol: Symbol) -> &'a str {
        self.program.name(symbol)
    }

    fn token(&mut self, text: &str) {
        if let (Some(prev), Some(next)) = (self.out.chars().next_back(), text.chars().next()) {
            if fuses(prev, next) {
                self.out.push(' ');
            }
        }
        self.out.push_str(text);
    }

    fn directives(&mut self) {
        let program = self.program;
        let directives = &program.directives;
        let extensions: BTreeSet<&str> = directives
            .enables
            .iter()
            .flat_map(|enable| enable.extensions.iter().map(String::as_str))
            .collect();
        let features: BTreeSet<&str> = directives
            .requires
            .iter()
            .flat_map(|requires| requires.features.iter().map(String::as_str))
            .collect();
        if !extensions.is_empty() {
            self.token("enable");
            self.token(&Vec::from_iter(extensions).join(","));
            self.token(";");
        }
        if !features.is_empty() {
            self.token("requires");
            self.token(&Vec::from_iter(features).join(","));
            self.token(";");
        }
        for control in &directives.diagnostics {
            self.token("diagnostic");
            self.diagnostic_control(control);
            self.token(";");
        }
    }

    fn diagnostic_control(&mut self, control: &DiagnosticControl) {
        let rule = match control.rule.category {
            Some(category) => format!("{}.{}", self.name(category), self.name(control.rule.name)),
            None => self.name(control.rule.name).to_owned(),
        };
        self.token(&format!("({},{rule})", control.severity.name()));
    }

    fn attributes(&mut self, attributes: &[Attribute]) {
        for attr in attributes {
            self.token(&format!("@{}", attr.name()));
            match attr {
                Attribute::Builtin(name) => self.token(&format!("({name})")),
                Attribute::Diagnostic(control) => self.diagnostic_control(control),
                Attribute::Interpolate { kind, sampling } => match sampling {
                    Some(sampling) => self.token(&format!("({kind},{sampling})")),
                    None => self.token(&format!("({kind})")),
                },
                Attribute::Invariant | Attribute::MustUse | Attribute::Stage(_) => {}
                other => {
                    self.token("(");
                    self.arguments(other.expressions(), None);
                    self.token(")");
                }
            }
        }
    }

    fn structure(&mut self, s: &Struct) {
        self.token("struct");
        self.token(self.name(s.name));
        self.token("{");

        let mut taken: HashSet<String> = s
            .members
            .iter()
            .map(|member| self.name(member.name).to_owned())
            .collect();
        // A u32 filler must not raise the alignment of a struct made of
        // 2-byte aligned members, nor start at an offset it can't occupy.
        let struct_align = s
            .members
            .iter()
            .filter_map(|member| self.sem.layout(member.id))
            .map(|layout| layout.align)
            .max()
            .unwrap_or(1);
        let mut padding_index = 0;
        let mut offset = 0u32;
        for (index, member) in s.members.iter().enumerate() {
            if index > 0 {
                self.token(",");
            }
            // Explicit offsets are not printed; a padding member in front
            // reproduces the gap they leave.
            if let Some(layout) = self.sem.layout(member.id) {
                offset = offset.next_multiple_of(layout.align.max(1));
                let padding = layout.offset.saturating_sub(offset);
                if padding > 0 {
                    let name = loop {
                        let candidate = format!("padding_{padding_index}");
                        padding_index += 1;
                        if taken.insert(candidate.clone()) {
                            break candidate;
                        }
                    };
                    let filler = if struct_align >= 4 && offset % 4 == 0 && padding % 4 == 0 {
                        "u32"
                    } else {
                        "f16"
                    };
                    self.token(&format!("@size({padding})"));
                    self.token(&name);
                    self.token(":");
                    self.token(filler);
                    self.token(",");
                    offset += padding;
                }
                offset += layout.size;
            }
            let attributes: Vec<Attribute> = member
                .attributes
                .iter()
                .filter(|attr| !matches!(attr, Attribute::Offset(_)))
                .cloned()
                .collect();
            self.attributes(&attributes);
            self.token(self.name(member.name));
            self.token(":");
            self.type_expr(&member.ty);
        }
        self.token("}");
    }

    fn function(&mut self, func: &Function) {
        self.attributes(&func.attributes);
        self.token("fn");
        self.token(self.name(func.name));
        self.token("(");
        for (index, param) in func.parameters.iter().enumerate() {
            if index > 0 {
                self.token(",");
            }
            self.attributes(&param.attributes);
            self.token(self.name(param.name));
            self.token(":");
            self.type_expr(&param.ty);
        }
        self.token(")");
        if let Some(ty) = &func.return_type {
            self.token("->");
            self.attributes(&func.return_attributes);
            self.type_expr(ty);
        }
        self.return_scalar = func
            .return_type
            .as_ref()
            .and_then(|ty| self.sem.type_of(ty.id))
            .and_then(Type::scalar);
        self.block(&func.body);
        self.return_scalar = None;
    }

    /// A variable declaration without its `;`.
    fn variable(&mut self, var: &Variable) {
        self.attributes(&var.attributes);
        self.token(var.kind.keyword());
        if let VariableKind::Var {
            address_space,
            access_mode,
        } = &var.kind
        {
            if address_space.is_some() || access_mode.is_some() {
                self.token("<");
                self.arguments(address_space.iter().chain(access_mode), None);
                self.token(">");
            }
        }
        self.token(self.name(var.name));
        if let Some(ty) = &var.ty {
            self.token(":");
            self.type_expr(ty);
        }
        if let Some(init) = &var.initializer {
            let expected = var
                .ty
                .as_ref()
                .and_then(|ty| self.sem.type_of(ty.id))
                .and_then(Type::scalar);
            self.token("=");
            self.value(init, expected);
        }
    }

    fn block(&mut self, block: &Block) {
        self.attributes(&block.attributes);
        self.token("{");
        for stmt in &block.statements {
            self.statement(stmt);
        }
        self.token("}");
    }

    fn statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Block(block) => self.block(block),
            Statement::If(if_stmt) => self.if_statement(if_stmt),
            Statement::Switch(switch) => {
                self.attributes(&switch.attributes);
                self.token("switch");
                self.value(&switch.selector, None);
                self.attributes(&switch.body_attributes);
                self.token("{");
                for clause in &switch.clauses {
                    if let [CaseSelector::Default] = clause.selectors.as_slice() {
                        self.token("default");
                    } else {
                        self.token("case");
                        for (index, selector) in clause.selectors.iter().enumerate() {
                            if index > 0 {
                                self.token(",");
                            }
                            match selector {
                                CaseSelector::Default => self.token("default"),
                                CaseSelector::Expr(e) => self.value(e, None),
                            }
                        }
                    }
                    self.block(&clause.body);
                }
                self.token("}");
            }
            Statement::Loop(lp) => {
                self.attributes(&lp.attributes);
                self.token("loop");
                self.attributes(&lp.body.attributes);
                self.token("{");
                for stmt in &lp.body.statements {
                    self.statement(stmt);
                }
                if let Some(continuing) = &lp.continuing {
                    if !continuing.statements.is_empty() {
                        self.token("continuing");
                        self.block(continuing);
                    }
                }
                self.token("}");
            }
            Statement::For(for_stmt) => {
                self.attributes(&for_stmt.attributes);
                self.token("for");
                self.token("(");
                if let Some(init) = &for_stmt.initializer {
                    self.simple_statement(init);
                }
                self.token(";");
                if let Some(cond) = &for_stmt.condition {
                    self.value(cond, None);
                }
                self.token(";");
                if let Some(update) = &for_stmt.update {
                    self.simple_statement(update);
                }
                self.token(")");
                self.block(&for_stmt.body);
            }
            Statement::While(while_stmt) => {
                self.attributes(&while_stmt.attributes);
                self.token("while");
                self.value(&while_stmt.condition, None);
                self.block(&while_stmt.body);
            }
            other => {
                self.simple_statement(other);
                self.token(";");
            }
        }
    }

    /// A statement that ends with `;`, without the `;`.
    fn simple_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Assign { lhs, rhs } => {
                self.value(lhs, None);
                self.token("=");
                self.value(rhs, self.store_scalar(lhs));
            }
            Statement::CompoundAssign { lhs, op, rhs } => {
                self.value(lhs, None);
                self.token(&format!("{}=", op.token()));
                self.value(rhs, self.store_scalar(lhs));
            }
            Statement::Increment(e) => {
                self.value(e, None);
                self.token("++");
            }
            Statement::Decrement(e) => {
                self.value(e, None);
                self.token("--");
            }
            Statement::Break => self.token("break"),
            Statement::BreakIf(cond) => {
                self.token("break");
                self.token("if");
                self.value(cond, None);
            }
            Statement::Continue => self.token("continue"),
            Statement::Discard => self.token("discard"),
            Statement::Return(value) => {
                self.token("return");
                if let Some(value) = value {
                    self.value(value, self.return_scalar);
                }
            }
            Statement::Call(call) => self.value(call, None),
            Statement::Declaration(var) => self.variable(var),
            Statement::ConstAssert(cond) => {
                self.token("const_assert");
                self.value(cond, None);
            }
            Statement::Block(_)
            | Statement::If(_)
            | Statement::Switch(_)
            | Statement::Loop(_)
            | Statement::For(_)
            | Statement::While(_) => self.statement(stmt),
        }
    }

    fn if_statement(&mut self, stmt: &IfStatement) {
        self.attributes(&stmt.attributes);
        self.token("if");
        self.value(&stmt.condition, None);
        self.block(&stmt.accept);
        match &stmt.reject {
            Some(Else::If(nested)) => {
                self.token("else");
                self.if_statement(nested);
            }
            Some(Else::Block(block)) => {
                self.token("else");
                self.block(block);
            }
            None => {}
        }
    }

    fn type_expr(&mut self, ty: &Expr) {
        self.expr(ty, Position::Left, OperatorGroup::None);
    }

    /// An expression at the top of an expression tree.
    ///
    /// `expected` is the concrete scalar the context forces on the value;
    /// a literal of exactly that type is printed without its suffix.
    fn value(&mut self, expr: &Expr, expected: Option<Scalar>) {
        self.operand(expr, Position::Left, OperatorGroup::None, expected);
    }

    fn operand(
        &mut self,
        expr: &Expr,
        position: Position,
        parent: OperatorGroup,
        expected: Option<Scalar>,
    ) {
        match &expr.kind {
            ExprKind::Literal(lit) => {
                let redundant = !self.options.keep_literal_suffix
                    && lit.has_suffix()
                    && expected == Some(lit.scalar());
                self.literal(lit, !redundant);
            }
            _ => self.expr(expr, position, parent),
        }
    }

    /// Comma-separated arguments.
    fn arguments<'e>(
        &mut self,
        args: impl IntoIterator<Item = &'e Expr>,
        expected: Option<Scalar>,
    ) {
        let args: Vec<&Expr> = args.into_iter().collect();
        for (index, arg) in args.iter().enumerate() {
            if index > 0 {
                self.token(",");
            }
            // `f(a<b,c>d)` would read as a template list.
            let guard = index + 1 < args.len() && has_bare_less(arg);
            if guard {
                self.token("(");
            }
            self.value(arg, expected);
            if guard {
                self.token(")");
            }
        }
    }

    fn expr(&mut self, expr: &Expr, position: Position, parent: OperatorGroup) {
        match &expr.kind {
            ExprKind::Literal(lit) => self.literal(lit, true),
            ExprKind::Phony => self.token("_"),
            ExprKind::Ident(ident) => self.ident(ident),
            ExprKind::Call { target, arguments } => {
                self.ident(target);
                let expected = self.constructed_scalar(expr.id, target);
                self.token("(");
                self.arguments(arguments, expected);
                self.token(")");
            }
            ExprKind::Index { base, index } => {
                self.accessor_base(base);
                self.token("[");
                self.value(index, index.as_literal().map(Literal::scalar));
                self.token("]");
            }
            ExprKind::Member { base, member } => {
                self.accessor_base(base);
                self.token(".");
                self.token(self.name(member.symbol));
            }
            ExprKind::Unary { op, operand } => {
                let parens = requires_parens(OperatorGroup::Unary, position, parent);
                if parens {
                    self.token("(");
                }
                self.token(op.token());
                self.expr(operand, Position::Right, OperatorGroup::Unary);
                if parens {
                    self.token(")");
                }
            }
            ExprKind::Binary { op, left, right } => self.binary(*op, left, right, position, parent),
        }
    }

    fn binary(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        position: Position,
        parent: OperatorGroup,
    ) {
        let group = OperatorGroup::of(op);
        let parens = requires_parens(group, position, parent);
        // The left operand of a shift decides the result type, so its
        // literal keeps the suffix.
        let left_expected = if op.is_shift() {
            None
        } else {
            self.anchor(right)
        };
        let right_expected = self.anchor(left);
        if parens {
            self.token("(");
        }
        self.operand(left, Position::Left, group, left_expected);
        self.token(op.token());
        // `a<b>>c` reads as the template list `a<b>` followed by `>c`.
        let closes_template = op == BinaryOp::Less
            && matches!(
                right.kind,
                ExprKind::Binary {
                    op: BinaryOp::ShiftRight,
                    ..
                }
            );
        if closes_template {
            self.token("(");
            self.operand(right, Position::Right, OperatorGroup::None, right_expected);
            self.token(")");
        } else {
            self.operand(right, Position::Right, group, right_expected);
        }
        if parens {
            self.token(")");
        }
    }

    /// The base of an index or member access, parenthesized unless it is
    /// itself a primary expression.
    fn accessor_base(&mut self, base: &Expr) {
        match base.kind {
            ExprKind::Ident(_)
            | ExprKind::Call { .. }
            | ExprKind::Index { .. }
            | ExprKind::Member { .. } => self.expr(base, Position::Left, OperatorGroup::Primary),
            _ => {
                self.token("(");
                self.expr(base, Position::Left, OperatorGroup::None);
                self.token(")");
            }
        }
    }

    fn ident(&mut self, ident: &Ident) {
        let name = self.name(ident.symbol);
        if let [arg] = ident.template_args.as_slice() {
            if let Some(short) = self.short_type(name, arg) {
                self.token(short);
                return;
            }
        }
        self.token(name);
        if ident.is_templated() {
            self.token("<");
            self.arguments(&ident.template_args, None);
            self.token(">");
        }
    }

    fn short_type(&self, name: &str, arg: &Expr) -> Option<&'static str> {
        if !self.options.use_type_alias {
            return None;
        }
        let scalar = arg.as_ident().filter(|ident| !ident.is_templated())?;
        if self.sem.ident(arg.id) != Some(IdentKind::Type { builtin: true }) {
            return None;
        }
        short_alias(name, self.name(scalar.symbol)).filter(|alias| !self.declared.contains(*alias))
    }

    fn literal(&mut self, lit: &Literal, with_suffix: bool) {
        let text = match *lit {
            Literal::Bool(b) => b.to_string(),
            Literal::Int { value, suffix } => int_literal(value, suffix, with_suffix),
            Literal::Float { value, suffix } => {
                float_literal(value, suffix, self.options.precise_float, with_suffix)
            }
        };
        self.token(&text);
    }

    /// Concrete scalar of a non-literal expression, which a literal
    /// combined with it may take over.
    fn anchor(&self, expr: &Expr) -> Option<Scalar> {
        if expr.as_literal().is_some() {
            return None;
        }
        self.sem
            .type_of(expr.id)
            .and_then(|ty| ty.store_type().scalar())
            .filter(|scalar| !scalar.is_abstract())
    }

    fn store_scalar(&self, lhs: &Expr) -> Option<Scalar> {
        self.sem
            .type_of(lhs.id)
            .and_then(|ty| ty.store_type().scalar())
    }

    /// Component scalar of an explicitly typed builtin constructor.
    fn constructed_scalar(&self, id: NodeId, target: &Ident) -> Option<Scalar> {
        match self.sem.call(id)? {
            CallTarget::ValueConstructor | CallTarget::ValueConversion => {}
            _ => return None,
        }
        let inferred = !target.is_templated()
            && INFERRED_CONSTRUCTORS.contains(&self.name(target.symbol));
        if inferred {
            return None;
        }
        self.sem.type_of(id).and_then(element_scalar)
    }
}

fn element_scalar(ty: &Type) -> Option<Scalar> {
    match ty {
        Type::Array { base, .. } => element_scalar(base),
        other => other.scalar(),
    }
}

/// Whether printing `next` right after `prev` would merge them into a
/// different token.
fn fuses(prev: char, next: char) -> bool {
    let word = |c: char| c.is_alphanumeric() || c == '_';
    (word(prev) && word(next))
        || matches!(
            (prev, next),
            ('-', '-')
                | ('+', '+')
                | ('&', '&')
                | ('/', '*')
                | ('/', '/')
                | ('>', '=')
                | ('<', '<')
                | ('<', '=')
                | ('=', '=')
        )
}

/// Whether an expression contains a `<` that is not enclosed in brackets.
fn has_bare_less(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Binary { op, left, right } => {
            *op == BinaryOp::Less || has_bare_less(left) || has_bare_less(right)
        }
        ExprKind::Unary { operand, .. } => has_bare_less(operand),
        ExprKind::Index { base, .. } | ExprKind::Member { base, .. } => has_bare_less(base),
        ExprKind::Literal(_) | ExprKind::Ident(_) | ExprKind::Call { .. } | ExprKind::Phony => {
            false
        }
    }
}

struct DeclaredNames<'a> {
    program: &'a Program,
    names: HashSet<&'a str>,
}

impl Visitor for DeclaredNames<'_> {
    fn visit_declared_name(&mut self, name: Symbol) {
        self.names.insert(self.program.name(name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fusing_tokens() {
        assert!(fuses('n', 'x'));
        assert!(fuses('2', 'u'));
        assert!(fuses('-', '-'));
        assert!(fuses('/', '*'));
        assert!(fuses('>', '='));
        assert!(!fuses(')', 'x'));
        assert!(!fuses('=', '-'));
        assert!(!fuses('>', '>'));
    }
}
