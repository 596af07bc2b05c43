//! Read-only traversal of a [`Program`].
//!
//! A [`Visitor`] overrides only the hooks it cares about; every default
//! method delegates to the matching `walk_*` function, which recurses into
//! the children in textual order.

use crate::attr::{Attribute, DiagnosticRule};
use crate::decl::{Declaration, Function, Variable, VariableKind};
use crate::expr::{Expr, ExprKind, Ident, NodeId};
use crate::stmt::{Block, CaseSelector, Else, IfStatement, Statement};
use crate::symbol::Symbol;
use crate::Program;

/// Where a referencing identifier occurs. The id is that of the enclosing
/// expression, which is the key of its semantic annotation.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum IdentSite {
    /// An identifier expression (value, type or enumerant).
    Expression(NodeId),
    /// The target of a call expression.
    CallTarget(NodeId),
    /// The member name of a member-access expression.
    Member(NodeId),
}

pub trait Visitor {
    fn visit_declaration(&mut self, decl: &Declaration) {
        walk_declaration(self, decl);
    }

    fn visit_attribute(&mut self, attr: &Attribute) {
        walk_attribute(self, attr);
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        walk_statement(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    /// A referencing identifier.
    fn visit_ident(&mut self, ident: &Ident, _site: IdentSite) {
        walk_ident(self, ident);
    }

    /// A name introduced by a declaration, parameter or struct member.
    fn visit_declared_name(&mut self, _name: Symbol) {}

    fn visit_diagnostic_rule(&mut self, _rule: &DiagnosticRule) {}
}

pub fn walk_program<V: Visitor + ?Sized>(v: &mut V, program: &Program) {
    for control in &program.directives.diagnostics {
        v.visit_diagnostic_rule(&control.rule);
    }
    for decl in &program.declarations {
        v.visit_declaration(decl);
    }
}

pub fn walk_declaration<V: Visitor + ?Sized>(v: &mut V, decl: &Declaration) {
    match decl {
        Declaration::Function(func) => walk_function(v, func),
        Declaration::Variable(var) => walk_variable(v, var),
        Declaration::Struct(s) => {
            v.visit_declared_name(s.name);
            for member in &s.members {
                for attr in &member.attributes {
                    v.visit_attribute(attr);
                }
                v.visit_declared_name(member.name);
                v.visit_expr(&member.ty);
            }
        }
        Declaration::Alias(alias) => {
            v.visit_declared_name(alias.name);
            v.visit_expr(&alias.ty);
        }
        Declaration::ConstAssert(expr) => v.visit_expr(expr),
    }
}

pub fn walk_function<V: Visitor + ?Sized>(v: &mut V, func: &Function) {
    for attr in &func.attributes {
        v.visit_attribute(attr);
    }
    v.visit_declared_name(func.name);
    for param in &func.parameters {
        for attr in &param.attributes {
            v.visit_attribute(attr);
        }
        v.visit_declared_name(param.name);
        v.visit_expr(&param.ty);
    }
    for attr in &func.return_attributes {
        v.visit_attribute(attr);
    }
    if let Some(ty) = &func.return_type {
        v.visit_expr(ty);
    }
    walk_block(v, &func.body);
}

pub fn walk_variable<V: Visitor + ?Sized>(v: &mut V, var: &Variable) {
    for attr in &var.attributes {
        v.visit_attribute(attr);
    }
    if let VariableKind::Var {
        address_space,
        access_mode,
    } = &var.kind
    {
        for expr in address_space.iter().chain(access_mode.iter()) {
            v.visit_expr(expr);
        }
    }
    v.visit_declared_name(var.name);
    if let Some(ty) = &var.ty {
        v.visit_expr(ty);
    }
    if let Some(init) = &var.initializer {
        v.visit_expr(init);
    }
}

pub fn walk_attribute<V: Visitor + ?Sized>(v: &mut V, attr: &Attribute) {
    if let Attribute::Diagnostic(control) = attr {
        v.visit_diagnostic_rule(&control.rule);
    }
    for expr in attr.expressions() {
        v.visit_expr(expr);
    }
}

pub fn walk_block<V: Visitor + ?Sized>(v: &mut V, block: &Block) {
    for attr in &block.attributes {
        v.visit_attribute(attr);
    }
    for stmt in &block.statements {
        v.visit_statement(stmt);
    }
}

fn walk_if<V: Visitor + ?Sized>(v: &mut V, stmt: &IfStatement) {
    for attr in &stmt.attributes {
        v.visit_attribute(attr);
    }
    v.visit_expr(&stmt.condition);
    walk_block(v, &stmt.accept);
    match &stmt.reject {
        Some(Else::If(nested)) => walk_if(v, nested),
        Some(Else::Block(block)) => walk_block(v, block),
        None => {}
    }
}

pub fn walk_statement<V: Visitor + ?Sized>(v: &mut V, stmt: &Statement) {
    match stmt {
        Statement::Block(block) => walk_block(v, block),
        Statement::Assign { lhs, rhs } | Statement::CompoundAssign { lhs, rhs, .. } => {
            v.visit_expr(lhs);
            v.visit_expr(rhs);
        }
        Statement::Increment(expr)
        | Statement::Decrement(expr)
        | Statement::BreakIf(expr)
        | Statement::Call(expr)
        | Statement::ConstAssert(expr)
        | Statement::Return(Some(expr)) => v.visit_expr(expr),
        Statement::If(if_stmt) => walk_if(v, if_stmt),
        Statement::Switch(switch) => {
            for attr in &switch.attributes {
                v.visit_attribute(attr);
            }
            v.visit_expr(&switch.selector);
            for attr in &switch.body_attributes {
                v.visit_attribute(attr);
            }
            for clause in &switch.clauses {
                for selector in &clause.selectors {
                    if let CaseSelector::Expr(expr) = selector {
                        v.visit_expr(expr);
                    }
                }
                walk_block(v, &clause.body);
            }
        }
        Statement::Loop(lp) => {
            for attr in &lp.attributes {
                v.visit_attribute(attr);
            }
            walk_block(v, &lp.body);
            if let Some(continuing) = &lp.continuing {
                walk_block(v, continuing);
            }
        }
        Statement::For(for_stmt) => {
            for attr in &for_stmt.attributes {
                v.visit_attribute(attr);
            }
            if let Some(init) = &for_stmt.initializer {
                v.visit_statement(init);
            }
            if let Some(cond) = &for_stmt.condition {
                v.visit_expr(cond);
            }
            if let Some(update) = &for_stmt.update {
                v.visit_statement(update);
            }
            walk_block(v, &for_stmt.body);
        }
        Statement::While(while_stmt) => {
            for attr in &while_stmt.attributes {
                v.visit_attribute(attr);
            }
            v.visit_expr(&while_stmt.condition);
            walk_block(v, &while_stmt.body);
        }
        Statement::Declaration(var) => walk_variable(v, var),
        Statement::Break | Statement::Continue | Statement::Discard | Statement::Return(None) => {}
    }
}

pub fn walk_expr<V: Visitor + ?Sized>(v: &mut V, expr: &Expr) {
    match &expr.kind {
        ExprKind::Literal(_) | ExprKind::Phony => {}
        ExprKind::Ident(ident) => v.visit_ident(ident, IdentSite::Expression(expr.id)),
        ExprKind::Call { target, arguments } => {
            v.visit_ident(target, IdentSite::CallTarget(expr.id));
            for arg in arguments {
                v.visit_expr(arg);
            }
        }
        ExprKind::Index { base, index } => {
            v.visit_expr(base);
            v.visit_expr(index);
        }
        ExprKind::Member { base, member } => {
            v.visit_expr(base);
            v.visit_ident(member, IdentSite::Member(expr.id));
        }
        ExprKind::Unary { operand, .. } => v.visit_expr(operand),
        ExprKind::Binary { left, right, .. } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
    }
}

pub fn walk_ident<V: Visitor + ?Sized>(v: &mut V, ident: &Ident) {
    for arg in &ident.template_args {
        v.visit_expr(arg);
    }
}
