//! Resolved (semantic) types.

use std::fmt;

use crate::symbol::{Symbol, SymbolTable};

/// Width of a scalar type in bytes.
pub type Bytes = u8;

/// The kind of a scalar type.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum ScalarKind {
    /// Boolean.
    Bool,
    /// Signed integer.
    Sint,
    /// Unsigned integer.
    Uint,
    /// Floating point.
    Float,
    /// Type of an unsuffixed integer literal.
    AbstractInt,
    /// Type of an unsuffixed float literal.
    AbstractFloat,
}

/// A scalar type: kind + byte width.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Scalar {
    pub kind: ScalarKind,
    pub width: Bytes,
}

impl Scalar {
    pub const BOOL: Self = Self {
        kind: ScalarKind::Bool,
        width: 1,
    };
    pub const I32: Self = Self {
        kind: ScalarKind::Sint,
        width: 4,
    };
    pub const U32: Self = Self {
        kind: ScalarKind::Uint,
        width: 4,
    };
    pub const F16: Self = Self {
        kind: ScalarKind::Float,
        width: 2,
    };
    pub const F32: Self = Self {
        kind: ScalarKind::Float,
        width: 4,
    };
    pub const ABSTRACT_INT: Self = Self {
        kind: ScalarKind::AbstractInt,
        width: 8,
    };
    pub const ABSTRACT_FLOAT: Self = Self {
        kind: ScalarKind::AbstractFloat,
        width: 8,
    };

    /// Looks up a scalar by its WGSL type name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(Self::BOOL),
            "i32" => Some(Self::I32),
            "u32" => Some(Self::U32),
            "f32" => Some(Self::F32),
            "f16" => Some(Self::F16),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match (self.kind, self.width) {
            (ScalarKind::Bool, _) => "bool",
            (ScalarKind::Sint, _) => "i32",
            (ScalarKind::Uint, _) => "u32",
            (ScalarKind::Float, 2) => "f16",
            (ScalarKind::Float, _) => "f32",
            (ScalarKind::AbstractInt, _) => "abstract-int",
            (ScalarKind::AbstractFloat, _) => "abstract-float",
        }
    }

    pub fn is_abstract(self) -> bool {
        matches!(
            self.kind,
            ScalarKind::AbstractInt | ScalarKind::AbstractFloat
        )
    }

    /// The type an abstract scalar takes when nothing else constrains it.
    pub fn concretize(self) -> Self {
        match self.kind {
            ScalarKind::AbstractInt => Self::I32,
            ScalarKind::AbstractFloat => Self::F32,
            _ => self,
        }
    }
}

/// Number of components in a vector.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum VectorSize {
    /// 2 components.
    Bi = 2,
    /// 3 components.
    Tri = 3,
    /// 4 components.
    Quad = 4,
}

impl VectorSize {
    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            2 => Some(VectorSize::Bi),
            3 => Some(VectorSize::Tri),
            4 => Some(VectorSize::Quad),
            _ => None,
        }
    }

    pub fn count(self) -> u32 {
        self as u32
    }
}

/// Size of an array.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum ArraySize {
    /// Fixed-size array.
    Constant(u32),
    /// Runtime-sized, or sized by an override expression.
    Dynamic,
}

/// Result structures returned by builtin functions.
#[derive(Clone, Debug, PartialEq)]
pub enum BuiltinStruct {
    /// `frexp`: members `fract` and `exp`.
    Frexp(Box<Type>),
    /// `modf`: members `fract` and `whole`.
    Modf(Box<Type>),
    /// `atomicCompareExchangeWeak`: members `old_value` and `exchanged`.
    AtomicCompareExchange(Scalar),
}

impl BuiltinStruct {
    /// Type of the named member, if it exists.
    pub fn member(&self, name: &str) -> Option<Type> {
        match (self, name) {
            (BuiltinStruct::Frexp(arg), "fract") => Some((**arg).clone()),
            (BuiltinStruct::Frexp(arg), "exp") => Some(arg.with_scalar(Scalar::I32)),
            (BuiltinStruct::Modf(arg), "fract" | "whole") => Some((**arg).clone()),
            (BuiltinStruct::AtomicCompareExchange(scalar), "old_value") => {
                Some(Type::Scalar(*scalar))
            }
            (BuiltinStruct::AtomicCompareExchange(_), "exchanged") => {
                Some(Type::Scalar(Scalar::BOOL))
            }
            _ => None,
        }
    }
}

/// The resolved type of an expression or declaration.
#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    /// A single scalar value.
    Scalar(Scalar),
    /// A vector of scalars.
    Vector { size: VectorSize, scalar: Scalar },
    /// A matrix of column vectors.
    Matrix {
        columns: VectorSize,
        rows: VectorSize,
        scalar: Scalar,
    },
    /// An atomic scalar.
    Atomic(Scalar),
    /// A fixed-size or runtime-sized array.
    Array { base: Box<Type>, size: ArraySize },
    /// A user-declared structure.
    Struct(Symbol),
    /// A structure predeclared by the language.
    BuiltinStruct(BuiltinStruct),
    /// A pointer (or reference) to a value.
    Pointer(Box<Type>),
    Sampler { comparison: bool },
    /// Any texture type; `sampled` is the scalar of a texel and
    /// `dimensions` the number of coordinates addressing one layer.
    Texture {
        depth: bool,
        dimensions: u8,
        sampled: Scalar,
    },
    /// The result of a call to a function without a return type.
    Void,
}

impl Type {
    /// The scalar, or the component scalar of a vector, matrix or atomic.
    pub fn scalar(&self) -> Option<Scalar> {
        match self {
            Type::Scalar(s) | Type::Atomic(s) => Some(*s),
            Type::Vector { scalar, .. } | Type::Matrix { scalar, .. } => Some(*scalar),
            _ => None,
        }
    }

    /// Replaces the component scalar of a scalar or vector type.
    pub fn with_scalar(&self, scalar: Scalar) -> Type {
        match self {
            Type::Vector { size, .. } => Type::Vector {
                size: *size,
                scalar,
            },
            _ => Type::Scalar(scalar),
        }
    }

    /// The type a pointer points at, or the type itself. Member and index
    /// accesses look through one pointer (`p.field`, `p[i]`).
    pub fn store_type(&self) -> &Type {
        match self {
            Type::Pointer(base) => base,
            other => other,
        }
    }

    /// Formats the type with struct names spelled out from `symbols`.
    pub fn display<'a>(&'a self, symbols: &'a SymbolTable) -> TypeDisplay<'a> {
        TypeDisplay { ty: self, symbols }
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, Type::Vector { .. })
    }
}

/// [`Type`] paired with the symbol table that names its structs.
pub struct TypeDisplay<'a> {
    ty: &'a Type,
    symbols: &'a SymbolTable,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_type(self.ty, Some(self.symbols), f)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_type(self, None, f)
    }
}

fn write_type(
    ty: &Type,
    symbols: Option<&SymbolTable>,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    let nested = |ty: &Type, f: &mut fmt::Formatter<'_>| write_type(ty, symbols, f);
    match ty {
        Type::Scalar(s) => f.write_str(s.name()),
        Type::Vector { size, scalar } => write!(f, "vec{}<{}>", size.count(), scalar.name()),
        Type::Matrix {
            columns,
            rows,
            scalar,
        } => write!(
            f,
            "mat{}x{}<{}>",
            columns.count(),
            rows.count(),
            scalar.name()
        ),
        Type::Atomic(s) => write!(f, "atomic<{}>", s.name()),
        Type::Array { base, size } => match size {
            ArraySize::Constant(n) => {
                f.write_str("array<")?;
                nested(base, f)?;
                write!(f, ", {n}>")
            }
            ArraySize::Dynamic => {
                f.write_str("array<")?;
                nested(base, f)?;
                f.write_str(">")
            }
        },
        Type::Struct(symbol) => match symbols.and_then(|table| table.try_name(*symbol)) {
            Some(name) => f.write_str(name),
            None => write!(f, "struct {symbol:?}"),
        },
        Type::BuiltinStruct(b) => match b {
            BuiltinStruct::Frexp(t) => {
                f.write_str("__frexp_result<")?;
                nested(t, f)?;
                f.write_str(">")
            }
            BuiltinStruct::Modf(t) => {
                f.write_str("__modf_result<")?;
                nested(t, f)?;
                f.write_str(">")
            }
            BuiltinStruct::AtomicCompareExchange(s) => {
                write!(f, "__atomic_compare_exchange_result<{}>", s.name())
            }
        },
        Type::Pointer(base) => {
            f.write_str("ptr<")?;
            nested(base, f)?;
            f.write_str(">")
        }
        Type::Sampler { comparison: false } => f.write_str("sampler"),
        Type::Sampler { comparison: true } => f.write_str("sampler_comparison"),
        Type::Texture {
            depth: true,
            dimensions,
            ..
        } => write!(f, "texture_depth_{dimensions}d"),
        Type::Texture {
            dimensions,
            sampled,
            ..
        } => write!(f, "texture_{dimensions}d<{}>", sampled.name()),
        Type::Void => f.write_str("void"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_names() {
        assert_eq!(Scalar::from_name("f16"), Some(Scalar::F16));
        assert_eq!(Scalar::F16.name(), "f16");
        assert_eq!(Scalar::from_name("f64"), None);
        assert_eq!(Scalar::ABSTRACT_INT.concretize(), Scalar::I32);
        assert!(Scalar::ABSTRACT_FLOAT.is_abstract());
    }

    #[test]
    fn builtin_struct_members() {
        let vec = Type::Vector {
            size: VectorSize::Tri,
            scalar: Scalar::F32,
        };
        let frexp = BuiltinStruct::Frexp(Box::new(vec.clone()));
        assert_eq!(frexp.member("fract"), Some(vec));
        assert_eq!(
            frexp.member("exp"),
            Some(Type::Vector {
                size: VectorSize::Tri,
                scalar: Scalar::I32,
            })
        );
        assert_eq!(frexp.member("whole"), None);
    }

    #[test]
    fn display_types() {
        let ty = Type::Array {
            base: Box::new(Type::Vector {
                size: VectorSize::Quad,
                scalar: Scalar::F32,
            }),
            size: ArraySize::Constant(4),
        };
        assert_eq!(ty.to_string(), "array<vec4<f32>, 4>");
        assert_eq!(Type::Pointer(Box::new(ty.clone())).store_type(), &ty);
    }

    #[test]
    fn store_type_looks_through_one_pointer() {
        let inner = Type::Pointer(Box::new(Type::Scalar(Scalar::I32)));
        let outer = Type::Pointer(Box::new(inner.clone()));
        assert_eq!(outer.store_type(), &inner);
        assert_eq!(inner.store_type(), &Type::Scalar(Scalar::I32));
    }

    #[test]
    fn display_struct_names() {
        let mut symbols = SymbolTable::new();
        let light = symbols.intern("Light");
        let ty = Type::Pointer(Box::new(Type::Array {
            base: Box::new(Type::Struct(light)),
            size: ArraySize::Dynamic,
        }));
        assert_eq!(ty.display(&symbols).to_string(), "ptr<array<Light>>");
        assert_eq!(Type::Struct(light).to_string(), "struct $0");
    }
}
