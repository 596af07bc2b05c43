//! Structural rebuilding of a [`Program`].
//!
//! A [`Fold`] reads a tree by reference and returns a brand-new tree. The
//! default methods copy every node unchanged; an implementation overrides
//! the hooks for the nodes it substitutes. Node ids are carried over so the
//! new tree can be re-resolved under the same keys.

use crate::attr::{Attribute, DiagnosticRule};
use crate::decl::{
    Alias, Declaration, Function, Parameter, Struct, StructMember, Variable, VariableKind,
};
use crate::expr::{Expr, ExprKind, Ident};
use crate::stmt::{
    Block, CaseClause, CaseSelector, Else, ForStatement, IfStatement, LoopStatement, Statement,
    SwitchStatement, WhileStatement,
};
use crate::symbol::Symbol;
use crate::visit::IdentSite;
use crate::Program;

pub trait Fold {
    fn fold_declaration(&mut self, decl: &Declaration) -> Declaration {
        fold_declaration(self, decl)
    }

    fn fold_statement(&mut self, stmt: &Statement) -> Statement {
        fold_statement(self, stmt)
    }

    fn fold_expr(&mut self, expr: &Expr) -> Expr {
        fold_expr(self, expr)
    }

    fn fold_attribute(&mut self, attr: &Attribute) -> Attribute {
        fold_attribute(self, attr)
    }

    /// A referencing identifier; the default keeps the symbol.
    fn fold_ident(&mut self, ident: &Ident, _site: IdentSite) -> Ident {
        fold_template_args(self, ident, ident.symbol)
    }

    /// A name introduced by a declaration, parameter or struct member.
    fn fold_declared_name(&mut self, name: Symbol) -> Symbol {
        name
    }

    fn fold_diagnostic_rule(&mut self, rule: &DiagnosticRule) -> DiagnosticRule {
        *rule
    }
}

/// Rebuilds a whole program. The symbol table is copied as is; a fold that
/// introduces names replaces it afterwards.
pub fn fold_program<F: Fold + ?Sized>(f: &mut F, program: &Program) -> Program {
    let mut directives = program.directives.clone();
    for control in &mut directives.diagnostics {
        control.rule = f.fold_diagnostic_rule(&control.rule);
    }
    Program {
        symbols: program.symbols.clone(),
        directives,
        declarations: program
            .declarations
            .iter()
            .map(|decl| f.fold_declaration(decl))
            .collect(),
    }
}

/// Keeps `ident`'s template arguments (folded) under a possibly new symbol.
pub fn fold_template_args<F: Fold + ?Sized>(f: &mut F, ident: &Ident, symbol: Symbol) -> Ident {
    Ident {
        symbol,
        template_args: ident
            .template_args
            .iter()
            .map(|arg| f.fold_expr(arg))
            .collect(),
    }
}

fn fold_attributes<F: Fold + ?Sized>(f: &mut F, attrs: &[Attribute]) -> Vec<Attribute> {
    attrs.iter().map(|attr| f.fold_attribute(attr)).collect()
}

fn fold_opt_expr<F: Fold + ?Sized>(f: &mut F, expr: &Option<Expr>) -> Option<Expr> {
    expr.as_ref().map(|e| f.fold_expr(e))
}

pub fn fold_declaration<F: Fold + ?Sized>(f: &mut F, decl: &Declaration) -> Declaration {
    match decl {
        Declaration::Function(func) => Declaration::Function(fold_function(f, func)),
        Declaration::Variable(var) => Declaration::Variable(fold_variable(f, var)),
        Declaration::Struct(s) => {
            let name = f.fold_declared_name(s.name);
            let members = s
                .members
                .iter()
                .map(|member| {
                    let attributes = fold_attributes(f, &member.attributes);
                    let name = f.fold_declared_name(member.name);
                    StructMember {
                        id: member.id,
                        attributes,
                        name,
                        ty: f.fold_expr(&member.ty),
                    }
                })
                .collect();
            Declaration::Struct(Struct { name, members })
        }
        Declaration::Alias(alias) => {
            let name = f.fold_declared_name(alias.name);
            Declaration::Alias(Alias {
                name,
                ty: f.fold_expr(&alias.ty),
            })
        }
        Declaration::ConstAssert(expr) => Declaration::ConstAssert(f.fold_expr(expr)),
    }
}

pub fn fold_function<F: Fold + ?Sized>(f: &mut F, func: &Function) -> Function {
    let attributes = fold_attributes(f, &func.attributes);
    let name = f.fold_declared_name(func.name);
    let parameters = func
        .parameters
        .iter()
        .map(|param| {
            let attributes = fold_attributes(f, &param.attributes);
            let name = f.fold_declared_name(param.name);
            Parameter {
                attributes,
                name,
                ty: f.fold_expr(&param.ty),
            }
        })
        .collect();
    let return_attributes = fold_attributes(f, &func.return_attributes);
    let return_type = fold_opt_expr(f, &func.return_type);
    Function {
        attributes,
        name,
        parameters,
        return_attributes,
        return_type,
        body: fold_block(f, &func.body),
    }
}

pub fn fold_variable<F: Fold + ?Sized>(f: &mut F, var: &Variable) -> Variable {
    let attributes = fold_attributes(f, &var.attributes);
    let kind = match &var.kind {
        VariableKind::Var {
            address_space,
            access_mode,
        } => {
            let address_space = fold_opt_expr(f, address_space);
            let access_mode = fold_opt_expr(f, access_mode);
            VariableKind::Var {
                address_space,
                access_mode,
            }
        }
        other => other.clone(),
    };
    let name = f.fold_declared_name(var.name);
    let ty = fold_opt_expr(f, &var.ty);
    Variable {
        attributes,
        kind,
        name,
        ty,
        initializer: fold_opt_expr(f, &var.initializer),
    }
}

pub fn fold_attribute<F: Fold + ?Sized>(f: &mut F, attr: &Attribute) -> Attribute {
    match attr {
        Attribute::Align(e) => Attribute::Align(f.fold_expr(e)),
        Attribute::Binding(e) => Attribute::Binding(f.fold_expr(e)),
        Attribute::BlendSrc(e) => Attribute::BlendSrc(f.fold_expr(e)),
        Attribute::Group(e) => Attribute::Group(f.fold_expr(e)),
        Attribute::Id(e) => Attribute::Id(f.fold_expr(e)),
        Attribute::Location(e) => Attribute::Location(f.fold_expr(e)),
        Attribute::Offset(e) => Attribute::Offset(f.fold_expr(e)),
        Attribute::Size(e) => Attribute::Size(f.fold_expr(e)),
        Attribute::WorkgroupSize { x, y, z } => {
            let x = f.fold_expr(x);
            let y = fold_opt_expr(f, y);
            let z = fold_opt_expr(f, z);
            Attribute::WorkgroupSize { x, y, z }
        }
        Attribute::Diagnostic(control) => {
            let mut control = *control;
            control.rule = f.fold_diagnostic_rule(&control.rule);
            Attribute::Diagnostic(control)
        }
        Attribute::Builtin(_)
        | Attribute::Interpolate { .. }
        | Attribute::Invariant
        | Attribute::MustUse
        | Attribute::Stage(_) => attr.clone(),
    }
}

pub fn fold_block<F: Fold + ?Sized>(f: &mut F, block: &Block) -> Block {
    let attributes = fold_attributes(f, &block.attributes);
    Block {
        attributes,
        statements: block
            .statements
            .iter()
            .map(|stmt| f.fold_statement(stmt))
            .collect(),
    }
}

fn fold_if<F: Fold + ?Sized>(f: &mut F, stmt: &IfStatement) -> IfStatement {
    let attributes = fold_attributes(f, &stmt.attributes);
    let condition = f.fold_expr(&stmt.condition);
    let accept = fold_block(f, &stmt.accept);
    let reject = match &stmt.reject {
        Some(Else::If(nested)) => Some(Else::If(Box::new(fold_if(f, nested)))),
        Some(Else::Block(block)) => Some(Else::Block(fold_block(f, block))),
        None => None,
    };
    IfStatement {
        attributes,
        condition,
        accept,
        reject,
    }
}

pub fn fold_statement<F: Fold + ?Sized>(f: &mut F, stmt: &Statement) -> Statement {
    match stmt {
        Statement::Block(block) => Statement::Block(fold_block(f, block)),
        Statement::Assign { lhs, rhs } => {
            let lhs = f.fold_expr(lhs);
            Statement::Assign {
                lhs,
                rhs: f.fold_expr(rhs),
            }
        }
        Statement::CompoundAssign { lhs, op, rhs } => {
            let lhs = f.fold_expr(lhs);
            Statement::CompoundAssign {
                lhs,
                op: *op,
                rhs: f.fold_expr(rhs),
            }
        }
        Statement::Increment(e) => Statement::Increment(f.fold_expr(e)),
        Statement::Decrement(e) => Statement::Decrement(f.fold_expr(e)),
        Statement::If(if_stmt) => Statement::If(fold_if(f, if_stmt)),
        Statement::Switch(switch) => {
            let attributes = fold_attributes(f, &switch.attributes);
            let selector = f.fold_expr(&switch.selector);
            let body_attributes = fold_attributes(f, &switch.body_attributes);
            let clauses = switch
                .clauses
                .iter()
                .map(|clause| {
                    let selectors = clause
                        .selectors
                        .iter()
                        .map(|sel| match sel {
                            CaseSelector::Default => CaseSelector::Default,
                            CaseSelector::Expr(e) => CaseSelector::Expr(f.fold_expr(e)),
                        })
                        .collect();
                    CaseClause {
                        selectors,
                        body: fold_block(f, &clause.body),
                    }
                })
                .collect();
            Statement::Switch(SwitchStatement {
                attributes,
                selector,
                body_attributes,
                clauses,
            })
        }
        Statement::Loop(lp) => {
            let attributes = fold_attributes(f, &lp.attributes);
            let body = fold_block(f, &lp.body);
            Statement::Loop(LoopStatement {
                attributes,
                body,
                continuing: lp.continuing.as_ref().map(|c| fold_block(f, c)),
            })
        }
        Statement::For(for_stmt) => {
            let attributes = fold_attributes(f, &for_stmt.attributes);
            let initializer = for_stmt
                .initializer
                .as_ref()
                .map(|s| Box::new(f.fold_statement(s)));
            let condition = fold_opt_expr(f, &for_stmt.condition);
            let update = for_stmt
                .update
                .as_ref()
                .map(|s| Box::new(f.fold_statement(s)));
            Statement::For(ForStatement {
                attributes,
                initializer,
                condition,
                update,
                body: fold_block(f, &for_stmt.body),
            })
        }
        Statement::While(while_stmt) => {
            let attributes = fold_attributes(f, &while_stmt.attributes);
            let condition = f.fold_expr(&while_stmt.condition);
            Statement::While(WhileStatement {
                attributes,
                condition,
                body: fold_block(f, &while_stmt.body),
            })
        }
        Statement::BreakIf(e) => Statement::BreakIf(f.fold_expr(e)),
        Statement::Return(e) => Statement::Return(fold_opt_expr(f, e)),
        Statement::Call(e) => Statement::Call(f.fold_expr(e)),
        Statement::Declaration(var) => Statement::Declaration(fold_variable(f, var)),
        Statement::ConstAssert(e) => Statement::ConstAssert(f.fold_expr(e)),
        Statement::Break => Statement::Break,
        Statement::Continue => Statement::Continue,
        Statement::Discard => Statement::Discard,
    }
}

pub fn fold_expr<F: Fold + ?Sized>(f: &mut F, expr: &Expr) -> Expr {
    let kind = match &expr.kind {
        ExprKind::Literal(lit) => ExprKind::Literal(*lit),
        ExprKind::Phony => ExprKind::Phony,
        ExprKind::Ident(ident) => ExprKind::Ident(f.fold_ident(ident, IdentSite::Expression(expr.id))),
        ExprKind::Call { target, arguments } => {
            let target = f.fold_ident(target, IdentSite::CallTarget(expr.id));
            ExprKind::Call {
                target,
                arguments: arguments.iter().map(|a| f.fold_expr(a)).collect(),
            }
        }
        ExprKind::Index { base, index } => {
            let base = Box::new(f.fold_expr(base));
            ExprKind::Index {
                base,
                index: Box::new(f.fold_expr(index)),
            }
        }
        ExprKind::Member { base, member } => {
            let base = Box::new(f.fold_expr(base));
            ExprKind::Member {
                base,
                member: f.fold_ident(member, IdentSite::Member(expr.id)),
            }
        }
        ExprKind::Unary { op, operand } => ExprKind::Unary {
            op: *op,
            operand: Box::new(f.fold_expr(operand)),
        },
        ExprKind::Binary { op, left, right } => {
            let left = Box::new(f.fold_expr(left));
            ExprKind::Binary {
                op: *op,
                left,
                right: Box::new(f.fold_expr(right)),
            }
        }
    };
    Expr { id: expr.id, kind }
}
