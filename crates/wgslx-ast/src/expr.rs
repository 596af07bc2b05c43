//! Expressions and identifier references.

use crate::symbol::Symbol;
use crate::types::Scalar;

/// Identity of a syntax node. Semantic annotations are keyed by it.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct NodeId(pub u32);

/// Hands out fresh [`NodeId`]s while a tree is being built.
#[derive(Clone, Debug, Default)]
pub struct NodeIds {
    next: u32,
}

impl NodeIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next unused id.
    pub fn next(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

/// A reference to a name, optionally followed by a template argument list
/// (`vec4<f32>`, `array<S, 4>`, `ptr<function, i32>`).
#[derive(Clone, Debug, PartialEq)]
pub struct Ident {
    pub symbol: Symbol,
    pub template_args: Vec<Expr>,
}

impl Ident {
    /// Creates an identifier without template arguments.
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            template_args: Vec::new(),
        }
    }

    pub fn is_templated(&self) -> bool {
        !self.template_args.is_empty()
    }
}

/// Suffix of an integer literal.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum IntSuffix {
    None,
    /// `i`: i32.
    I,
    /// `u`: u32.
    U,
}

/// Suffix of a floating-point literal.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum FloatSuffix {
    None,
    /// `f`: f32.
    F,
    /// `h`: f16.
    H,
}

/// A literal value. Numeric literals are never negative; negation is a
/// [`UnaryOp::Negate`] expression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int { value: i64, suffix: IntSuffix },
    /// `f` literals hold a value already rounded to f32.
    Float { value: f64, suffix: FloatSuffix },
}

impl Literal {
    /// The scalar type the literal denotes before any conversion.
    pub fn scalar(&self) -> Scalar {
        match *self {
            Literal::Bool(_) => Scalar::BOOL,
            Literal::Int { suffix, .. } => match suffix {
                IntSuffix::None => Scalar::ABSTRACT_INT,
                IntSuffix::I => Scalar::I32,
                IntSuffix::U => Scalar::U32,
            },
            Literal::Float { suffix, .. } => match suffix {
                FloatSuffix::None => Scalar::ABSTRACT_FLOAT,
                FloatSuffix::F => Scalar::F32,
                FloatSuffix::H => Scalar::F16,
            },
        }
    }

    /// Returns `true` if the literal carries an explicit type suffix.
    pub fn has_suffix(&self) -> bool {
        match *self {
            Literal::Bool(_) => false,
            Literal::Int { suffix, .. } => suffix != IntSuffix::None,
            Literal::Float { suffix, .. } => suffix != FloatSuffix::None,
        }
    }
}

/// Binary operators.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    /// Bitwise `&`.
    And,
    /// Bitwise `^`.
    ExclusiveOr,
    /// Bitwise `|`.
    InclusiveOr,
    LogicalAnd,
    LogicalOr,
    ShiftLeft,
    ShiftRight,
}

impl BinaryOp {
    /// Source spelling of the operator.
    pub fn token(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::And => "&",
            BinaryOp::ExclusiveOr => "^",
            BinaryOp::InclusiveOr => "|",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LogicalOr => "||",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::Less
                | BinaryOp::LessEqual
                | BinaryOp::Greater
                | BinaryOp::GreaterEqual
        )
    }

    pub fn is_shift(self) -> bool {
        matches!(self, BinaryOp::ShiftLeft | BinaryOp::ShiftRight)
    }
}

/// Unary operators.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum UnaryOp {
    /// `-e`
    Negate,
    /// `!e`
    Not,
    /// `~e`
    Complement,
    /// `&e`
    AddressOf,
    /// `*e`
    Indirection,
}

impl UnaryOp {
    pub fn token(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "!",
            UnaryOp::Complement => "~",
            UnaryOp::AddressOf => "&",
            UnaryOp::Indirection => "*",
        }
    }
}

/// An expression node.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
}

/// The closed set of expression forms.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    /// A value, type or enumerant reference.
    Ident(Ident),
    /// Function call, value constructor or conversion.
    Call { target: Ident, arguments: Vec<Expr> },
    Index { base: Box<Expr>, index: Box<Expr> },
    /// Struct field or vector swizzle.
    Member { base: Box<Expr>, member: Ident },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// The `_` on the left of a phony assignment.
    Phony,
}

impl Expr {
    pub fn new(id: NodeId, kind: ExprKind) -> Self {
        Self { id, kind }
    }

    /// Returns the identifier if this is a bare identifier expression.
    pub fn as_ident(&self) -> Option<&Ident> {
        match &self.kind {
            ExprKind::Ident(ident) => Some(ident),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match &self.kind {
            ExprKind::Literal(literal) => Some(literal),
            _ => None,
        }
    }
}
