//! Human-readable reference printer.
//!
//! Unlike the compact writer, this output spells every node exactly as it
//! is stored: names are not changed, every nested operand is parenthesized
//! and literals keep their suffix and full precision. Two trees print the
//! same text exactly when they are structurally equal.

use std::fmt::Write;

use crate::attr::{Attribute, DiagnosticControl};
use crate::decl::{Declaration, Function, Variable, VariableKind};
use crate::expr::{Expr, ExprKind, FloatSuffix, Ident, IntSuffix, Literal};
use crate::stmt::{Block, CaseSelector, Else, IfStatement, Statement};
use crate::symbol::Symbol;
use crate::Program;

/// Dumps a program in a readable, fully parenthesized form.
pub fn dump_program(program: &Program) -> String {
    let mut d = Dumper {
        program,
        out: String::new(),
        indent: 0,
    };
    d.program();
    d.out
}

/// Formats a literal with its suffix and full precision.
pub fn format_literal(literal: &Literal) -> String {
    match *literal {
        Literal::Bool(b) => b.to_string(),
        Literal::Int { value, suffix } => {
            let suffix = match suffix {
                IntSuffix::None => "",
                IntSuffix::I => "i",
                IntSuffix::U => "u",
            };
            format!("{value}{suffix}")
        }
        Literal::Float { value, suffix } => {
            let suffix = match suffix {
                FloatSuffix::None => "",
                FloatSuffix::F => "f",
                FloatSuffix::H => "h",
            };
            format!("{value:?}{suffix}")
        }
    }
}

struct Dumper<'a> {
    program: &'a Program,
    out: String,
    indent: usize,
}

impl<'a> Dumper<'a> {
    fn name(&self, symbol: Symbol) -> &'a str {
        self.program.symbols.try_name(symbol).unwrap_or("<?>")
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn program(&mut self) {
        let program = self.program;
        let directives = &program.directives;
        for enable in &directives.enables {
            let text = format!("enable {};", enable.extensions.join(", "));
            self.line(&text);
        }
        for requires in &directives.requires {
            let text = format!("requires {};", requires.features.join(", "));
            self.line(&text);
        }
        for control in &directives.diagnostics {
            let text = format!("diagnostic{};", self.control(control));
            self.line(&text);
        }
        for decl in &program.declarations {
            self.declaration(decl);
        }
    }

    fn control(&self, control: &DiagnosticControl) -> String {
        let rule = match control.rule.category {
            Some(category) => format!("{}.{}", self.name(category), self.name(control.rule.name)),
            None => self.name(control.rule.name).to_owned(),
        };
        format!("({}, {rule})", control.severity)
    }

    fn attributes(&self, attrs: &[Attribute]) -> String {
        let mut text = String::new();
        for attr in attrs {
            let args = match attr {
                Attribute::Builtin(name) => format!("({name})"),
                Attribute::Diagnostic(control) => self.control(control),
                Attribute::Interpolate { kind, sampling } => match sampling {
                    Some(sampling) => format!("({kind}, {sampling})"),
                    None => format!("({kind})"),
                },
                Attribute::Invariant | Attribute::MustUse | Attribute::Stage(_) => String::new(),
                other => {
                    let args: Vec<_> = other.expressions().iter().map(|e| self.expr(e)).collect();
                    format!("({})", args.join(", "))
                }
            };
            let _ = write!(text, "@{}{args} ", attr.name());
        }
        text
    }

    fn declaration(&mut self, decl: &Declaration) {
        match decl {
            Declaration::Function(func) => self.function(func),
            Declaration::Variable(var) => {
                let text = format!("{};", self.variable(var));
                self.line(&text);
            }
            Declaration::Struct(s) => {
                let text = format!("struct {} {{", self.name(s.name));
                self.line(&text);
                self.indent += 1;
                for member in &s.members {
                    let text = format!(
                        "{}{}: {},",
                        self.attributes(&member.attributes),
                        self.name(member.name),
                        self.expr(&member.ty)
                    );
                    self.line(&text);
                }
                self.indent -= 1;
                self.line("}");
            }
            Declaration::Alias(alias) => {
                let text = format!("alias {} = {};", self.name(alias.name), self.expr(&alias.ty));
                self.line(&text);
            }
            Declaration::ConstAssert(expr) => {
                let text = format!("const_assert {};", self.expr(expr));
                self.line(&text);
            }
        }
    }

    fn function(&mut self, func: &Function) {
        let params: Vec<_> = func
            .parameters
            .iter()
            .map(|p| {
                format!(
                    "{}{}: {}",
                    self.attributes(&p.attributes),
                    self.name(p.name),
                    self.expr(&p.ty)
                )
            })
            .collect();
        let mut header = format!(
            "{}fn {}({})",
            self.attributes(&func.attributes),
            self.name(func.name),
            params.join(", ")
        );
        if let Some(ty) = &func.return_type {
            let _ = write!(
                header,
                " -> {}{}",
                self.attributes(&func.return_attributes),
                self.expr(ty)
            );
        }
        self.block(&header, &func.body);
    }

    fn variable(&self, var: &Variable) -> String {
        let mut text = self.attributes(&var.attributes);
        text.push_str(var.kind.keyword());
        if let VariableKind::Var {
            address_space,
            access_mode,
        } = &var.kind
        {
            let args: Vec<_> = address_space
                .iter()
                .chain(access_mode.iter())
                .map(|e| self.expr(e))
                .collect();
            if !args.is_empty() {
                let _ = write!(text, "<{}>", args.join(", "));
            }
        }
        let _ = write!(text, " {}", self.name(var.name));
        if let Some(ty) = &var.ty {
            let _ = write!(text, ": {}", self.expr(ty));
        }
        if let Some(init) = &var.initializer {
            let _ = write!(text, " = {}", self.expr(init));
        }
        text
    }

    /// Prints `header {`, the block's statements, then `}`.
    fn block(&mut self, header: &str, block: &Block) {
        let attrs = self.attributes(&block.attributes);
        let text = if header.is_empty() {
            format!("{attrs}{{")
        } else {
            format!("{header} {attrs}{{")
        };
        self.line(&text);
        self.indent += 1;
        for stmt in &block.statements {
            self.statement(stmt);
        }
        self.indent -= 1;
        self.line("}");
    }

    fn if_statement(&mut self, prefix: &str, stmt: &IfStatement) {
        let header = format!(
            "{prefix}{}if {}",
            self.attributes(&stmt.attributes),
            self.expr(&stmt.condition)
        );
        self.block(&header, &stmt.accept);
        match &stmt.reject {
            Some(Else::If(nested)) => self.if_statement("else ", nested),
            Some(Else::Block(block)) => self.block("else", block),
            None => {}
        }
    }

    /// A statement that fits on one line, without its terminating `;`.
    fn simple(&self, stmt: &Statement) -> String {
        match stmt {
            Statement::Assign { lhs, rhs } => format!("{} = {}", self.expr(lhs), self.expr(rhs)),
            Statement::CompoundAssign { lhs, op, rhs } => {
                format!("{} {}= {}", self.expr(lhs), op.token(), self.expr(rhs))
            }
            Statement::Increment(e) => format!("{}++", self.expr(e)),
            Statement::Decrement(e) => format!("{}--", self.expr(e)),
            Statement::Break => "break".to_owned(),
            Statement::BreakIf(e) => format!("break if {}", self.expr(e)),
            Statement::Continue => "continue".to_owned(),
            Statement::Discard => "discard".to_owned(),
            Statement::Return(None) => "return".to_owned(),
            Statement::Return(Some(e)) => format!("return {}", self.expr(e)),
            Statement::Call(e) => self.expr(e),
            Statement::Declaration(var) => self.variable(var),
            Statement::ConstAssert(e) => format!("const_assert {}", self.expr(e)),
            _ => String::from("<compound>"),
        }
    }

    fn statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Block(block) => self.block("", block),
            Statement::If(if_stmt) => self.if_statement("", if_stmt),
            Statement::Switch(switch) => {
                let header = format!(
                    "{}switch {} {}{{",
                    self.attributes(&switch.attributes),
                    self.expr(&switch.selector),
                    self.attributes(&switch.body_attributes)
                );
                self.line(&header);
                self.indent += 1;
                for clause in &switch.clauses {
                    let selectors: Vec<_> = clause
                        .selectors
                        .iter()
                        .map(|s| match s {
                            CaseSelector::Default => "default".to_owned(),
                            CaseSelector::Expr(e) => self.expr(e),
                        })
                        .collect();
                    let header = format!("case {}:", selectors.join(", "));
                    self.block(&header, &clause.body);
                }
                self.indent -= 1;
                self.line("}");
            }
            Statement::Loop(lp) => {
                let header = format!("{}loop", self.attributes(&lp.attributes));
                let text = format!("{header} {}{{", self.attributes(&lp.body.attributes));
                self.line(&text);
                self.indent += 1;
                for stmt in &lp.body.statements {
                    self.statement(stmt);
                }
                if let Some(continuing) = &lp.continuing {
                    self.block("continuing", continuing);
                }
                self.indent -= 1;
                self.line("}");
            }
            Statement::For(for_stmt) => {
                let init = for_stmt
                    .initializer
                    .as_deref()
                    .map(|s| self.simple(s))
                    .unwrap_or_default();
                let cond = for_stmt
                    .condition
                    .as_ref()
                    .map(|e| self.expr(e))
                    .unwrap_or_default();
                let update = for_stmt
                    .update
                    .as_deref()
                    .map(|s| self.simple(s))
                    .unwrap_or_default();
                let header = format!(
                    "{}for ({init}; {cond}; {update})",
                    self.attributes(&for_stmt.attributes)
                );
                self.block(&header, &for_stmt.body);
            }
            Statement::While(while_stmt) => {
                let header = format!(
                    "{}while {}",
                    self.attributes(&while_stmt.attributes),
                    self.expr(&while_stmt.condition)
                );
                self.block(&header, &while_stmt.body);
            }
            other => {
                let text = format!("{};", self.simple(other));
                self.line(&text);
            }
        }
    }

    fn ident(&self, ident: &Ident) -> String {
        let mut text = self.name(ident.symbol).to_owned();
        if ident.is_templated() {
            let args: Vec<_> = ident.template_args.iter().map(|a| self.expr(a)).collect();
            let _ = write!(text, "<{}>", args.join(", "));
        }
        text
    }

    fn expr(&self, expr: &Expr) -> String {
        match &expr.kind {
            ExprKind::Literal(lit) => format_literal(lit),
            ExprKind::Phony => "_".to_owned(),
            ExprKind::Ident(ident) => self.ident(ident),
            ExprKind::Call { target, arguments } => {
                let args: Vec<_> = arguments.iter().map(|a| self.expr(a)).collect();
                format!("{}({})", self.ident(target), args.join(", "))
            }
            ExprKind::Index { base, index } => {
                format!("{}[{}]", self.operand(base), self.expr(index))
            }
            ExprKind::Member { base, member } => {
                format!("{}.{}", self.operand(base), self.ident(member))
            }
            ExprKind::Unary { op, operand } => format!("{}{}", op.token(), self.operand(operand)),
            ExprKind::Binary { op, left, right } => format!(
                "{} {} {}",
                self.operand(left),
                op.token(),
                self.operand(right)
            ),
        }
    }

    /// A nested operand: parenthesized unless it is a primary expression.
    fn operand(&self, expr: &Expr) -> String {
        match expr.kind {
            ExprKind::Unary { .. } | ExprKind::Binary { .. } => format!("({})", self.expr(expr)),
            _ => self.expr(expr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::Directives;
    use crate::expr::{BinaryOp, NodeIds};
    use crate::symbol::SymbolTable;

    #[test]
    fn dump_const_with_nested_operators() {
        let mut symbols = SymbolTable::new();
        let mut ids = NodeIds::new();
        let name = symbols.intern("k");
        let lit = |ids: &mut NodeIds, value| {
            Expr::new(
                ids.next(),
                ExprKind::Literal(Literal::Int {
                    value,
                    suffix: IntSuffix::U,
                }),
            )
        };
        let sum = Expr::new(
            ids.next(),
            ExprKind::Binary {
                op: BinaryOp::Add,
                left: Box::new(lit(&mut ids, 1)),
                right: Box::new(lit(&mut ids, 2)),
            },
        );
        let product = Expr::new(
            ids.next(),
            ExprKind::Binary {
                op: BinaryOp::Multiply,
                left: Box::new(sum),
                right: Box::new(lit(&mut ids, 3)),
            },
        );
        let program = Program {
            symbols,
            directives: Directives::default(),
            declarations: vec![Declaration::Variable(Variable {
                attributes: Vec::new(),
                kind: VariableKind::Const,
                name,
                ty: None,
                initializer: Some(product),
            })],
        };
        assert_eq!(dump_program(&program), "const k = (1u + 2u) * 3u;\n");
    }

    #[test]
    fn float_literals_keep_precision() {
        let lit = Literal::Float {
            value: 0.1,
            suffix: FloatSuffix::F,
        };
        assert_eq!(format_literal(&lit), "0.1f");
        let lit = Literal::Float {
            value: 2.0,
            suffix: FloatSuffix::None,
        };
        assert_eq!(format_literal(&lit), "2.0");
    }
}
