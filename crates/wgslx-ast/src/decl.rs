//! Module-scope declarations and directives.

use crate::attr::{Attribute, DiagnosticControl, ShaderStage, stage_of};
use crate::expr::{Expr, NodeId};
use crate::stmt::Block;
use crate::symbol::Symbol;

/// `enable a, b;`
#[derive(Clone, Debug, PartialEq)]
pub struct Enable {
    pub extensions: Vec<String>,
}

/// `requires a, b;`
#[derive(Clone, Debug, PartialEq)]
pub struct Requires {
    pub features: Vec<String>,
}

/// A top-level declaration. Struct and alias declarations are the two
/// kinds of type declaration.
#[derive(Clone, Debug, PartialEq)]
pub enum Declaration {
    Function(Function),
    /// Module-scope `var`, `const` or `override`.
    Variable(Variable),
    Struct(Struct),
    Alias(Alias),
    ConstAssert(Expr),
}

impl Declaration {
    /// The declared name, if the declaration introduces one.
    pub fn name(&self) -> Option<Symbol> {
        match self {
            Declaration::Function(f) => Some(f.name),
            Declaration::Variable(v) => Some(v.name),
            Declaration::Struct(s) => Some(s.name),
            Declaration::Alias(a) => Some(a.name),
            Declaration::ConstAssert(_) => None,
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(self, Declaration::Struct(_) | Declaration::Alias(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub attributes: Vec<Attribute>,
    pub name: Symbol,
    pub parameters: Vec<Parameter>,
    pub return_attributes: Vec<Attribute>,
    pub return_type: Option<Expr>,
    pub body: Block,
}

impl Function {
    /// The pipeline stage, if this function is an entry point.
    pub fn stage(&self) -> Option<ShaderStage> {
        stage_of(&self.attributes)
    }

    pub fn is_entry_point(&self) -> bool {
        self.stage().is_some()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub attributes: Vec<Attribute>,
    pub name: Symbol,
    pub ty: Expr,
}

/// How a [`Variable`] was declared.
#[derive(Clone, Debug, PartialEq)]
pub enum VariableKind {
    /// `var<address_space, access_mode>`; both template arguments are optional.
    Var {
        address_space: Option<Expr>,
        access_mode: Option<Expr>,
    },
    Let,
    Const,
    Override,
}

impl VariableKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            VariableKind::Var { .. } => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
            VariableKind::Override => "override",
        }
    }
}

/// A variable, value or constant declaration at module or function scope.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub attributes: Vec<Attribute>,
    pub kind: VariableKind,
    pub name: Symbol,
    pub ty: Option<Expr>,
    pub initializer: Option<Expr>,
}

impl Variable {
    pub fn is_const(&self) -> bool {
        matches!(self.kind, VariableKind::Const)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Struct {
    pub name: Symbol,
    pub members: Vec<StructMember>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StructMember {
    /// Key of the member's resolved layout.
    pub id: NodeId,
    pub attributes: Vec<Attribute>,
    pub name: Symbol,
    pub ty: Expr,
}

/// `alias name = ty;`
#[derive(Clone, Debug, PartialEq)]
pub struct Alias {
    pub name: Symbol,
    pub ty: Expr,
}

/// Global directives, in source order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Directives {
    pub enables: Vec<Enable>,
    pub requires: Vec<Requires>,
    pub diagnostics: Vec<DiagnosticControl>,
}
