//! Syntax tree and semantic annotations for WGSL programs.
//!
//! A [`Program`] is the tree of directives and declarations produced by a
//! front end. Once resolved it is paired with a [`Sem`] side table in a
//! [`ResolvedProgram`]. Transforms never mutate a program in place: they
//! build a new one (see [`fold`]) and hand it back to the [`FrontEnd`] to
//! be resolved again.

mod attr;
mod decl;
mod diagnostic;
mod display;
mod expr;
pub mod fold;
pub mod names;
mod sem;
mod stmt;
mod symbol;
mod types;
pub mod visit;

pub use attr::{Attribute, DiagnosticControl, DiagnosticRule, Severity, ShaderStage, stage_of};
pub use decl::{
    Alias, Declaration, Directives, Enable, Function, Parameter, Requires, Struct, StructMember,
    Variable, VariableKind,
};
pub use diagnostic::{Diagnostic, Diagnostics, Level, Span};
pub use display::{dump_program, format_literal};
pub use expr::{
    BinaryOp, Expr, ExprKind, FloatSuffix, Ident, IntSuffix, Literal, NodeId, NodeIds, UnaryOp,
};
pub use sem::{CallTarget, IdentKind, MemberAccess, MemberLayout, Sem};
pub use stmt::{
    Block, CaseClause, CaseSelector, Else, ForStatement, IfStatement, LoopStatement, Statement,
    SwitchStatement, WhileStatement,
};
pub use symbol::{Symbol, SymbolTable};
pub use types::{
    ArraySize, BuiltinStruct, Bytes, Scalar, ScalarKind, Type, TypeDisplay, VectorSize,
};

/// A parsed WGSL program.
#[derive(Clone, Debug, Default)]
pub struct Program {
    /// Every name spelled in the program.
    pub symbols: SymbolTable,
    pub directives: Directives,
    /// Top-level declarations in source order.
    pub declarations: Vec<Declaration>,
}

impl Program {
    /// Iterates over the entry-point functions.
    pub fn entry_points(&self) -> impl Iterator<Item = &Function> {
        self.declarations.iter().filter_map(|decl| match decl {
            Declaration::Function(f) if f.is_entry_point() => Some(f),
            _ => None,
        })
    }

    /// Spelling of a symbol of this program.
    pub fn name(&self, symbol: Symbol) -> &str {
        &self.symbols[symbol]
    }
}

/// A program together with its semantic annotations.
#[derive(Clone, Debug)]
pub struct ResolvedProgram {
    pub program: Program,
    pub sem: Sem,
    /// Warnings reported while resolving. Never contains errors.
    pub warnings: Diagnostics,
}

/// Parses and resolves WGSL programs.
pub trait FrontEnd {
    /// Parses and resolves source text.
    fn parse(&self, source: &str) -> Result<ResolvedProgram, Diagnostics>;

    /// Resolves an already built tree, such as one produced by a transform.
    fn resolve(&self, program: Program) -> Result<ResolvedProgram, Diagnostics>;
}
