//! Statements.

use crate::attr::Attribute;
use crate::decl::Variable;
use crate::expr::{BinaryOp, Expr};

/// A brace-delimited statement sequence, with the attributes written
/// right before its `{`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Block {
    pub attributes: Vec<Attribute>,
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self {
            attributes: Vec::new(),
            statements,
        }
    }
}

/// The closed set of statement forms.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Block(Block),
    /// `lhs = rhs;`, including the phony `_ = rhs;`.
    Assign { lhs: Expr, rhs: Expr },
    /// `lhs op= rhs;`
    CompoundAssign { lhs: Expr, op: BinaryOp, rhs: Expr },
    Increment(Expr),
    Decrement(Expr),
    If(IfStatement),
    Switch(SwitchStatement),
    Loop(LoopStatement),
    For(ForStatement),
    While(WhileStatement),
    Break,
    /// `break if cond;`, only valid as the last statement of `continuing`.
    BreakIf(Expr),
    Continue,
    Discard,
    Return(Option<Expr>),
    /// A call evaluated for its side effects.
    Call(Expr),
    /// A `var`, `let` or `const` declared in a function.
    Declaration(Variable),
    ConstAssert(Expr),
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfStatement {
    pub attributes: Vec<Attribute>,
    pub condition: Expr,
    pub accept: Block,
    pub reject: Option<Else>,
}

/// The `else` part of an [`IfStatement`].
#[derive(Clone, Debug, PartialEq)]
pub enum Else {
    If(Box<IfStatement>),
    Block(Block),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SwitchStatement {
    pub attributes: Vec<Attribute>,
    pub selector: Expr,
    /// Attributes between the selector and the `{` of the clause list.
    pub body_attributes: Vec<Attribute>,
    pub clauses: Vec<CaseClause>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CaseClause {
    pub selectors: Vec<CaseSelector>,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CaseSelector {
    Default,
    Expr(Expr),
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoopStatement {
    pub attributes: Vec<Attribute>,
    pub body: Block,
    pub continuing: Option<Block>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ForStatement {
    pub attributes: Vec<Attribute>,
    pub initializer: Option<Box<Statement>>,
    pub condition: Option<Expr>,
    pub update: Option<Box<Statement>>,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhileStatement {
    pub attributes: Vec<Attribute>,
    pub condition: Expr,
    pub body: Block,
}
