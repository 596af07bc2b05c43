//! Constant integer evaluation and host-shareable memory layout.

use std::collections::HashMap;

use wgslx_ast::{
    ArraySize, BinaryOp, Declaration, Expr, ExprKind, Literal, MemberLayout, Program, Scalar,
    Symbol, Type, UnaryOp,
};

/// Nesting bound for constants defined in terms of other constants.
const MAX_EVAL_DEPTH: usize = 64;

/// Evaluates integer expressions made of literals, module-scope constants
/// and arithmetic. Used for attribute arguments and array counts.
pub(crate) struct ConstEval<'a> {
    pub program: &'a Program,
    pub globals: &'a HashMap<Symbol, usize>,
}

impl ConstEval<'_> {
    pub fn int(&self, expr: &Expr) -> Option<i64> {
        self.eval(expr, 0)
    }

    fn eval(&self, expr: &Expr, depth: usize) -> Option<i64> {
        if depth > MAX_EVAL_DEPTH {
            return None;
        }
        match &expr.kind {
            ExprKind::Literal(Literal::Int { value, .. }) => Some(*value),
            ExprKind::Ident(ident) if !ident.is_templated() => {
                let index = *self.globals.get(&ident.symbol)?;
                match &self.program.declarations[index] {
                    Declaration::Variable(var) if var.is_const() => {
                        self.eval(var.initializer.as_ref()?, depth + 1)
                    }
                    _ => None,
                }
            }
            ExprKind::Unary { op, operand } => {
                let value = self.eval(operand, depth + 1)?;
                match op {
                    UnaryOp::Negate => value.checked_neg(),
                    UnaryOp::Complement => Some(!value),
                    _ => None,
                }
            }
            ExprKind::Binary { op, left, right } => {
                let l = self.eval(left, depth + 1)?;
                let r = self.eval(right, depth + 1)?;
                match op {
                    BinaryOp::Add => l.checked_add(r),
                    BinaryOp::Subtract => l.checked_sub(r),
                    BinaryOp::Multiply => l.checked_mul(r),
                    BinaryOp::Divide => l.checked_div(r),
                    BinaryOp::Modulo => l.checked_rem(r),
                    BinaryOp::And => Some(l & r),
                    BinaryOp::InclusiveOr => Some(l | r),
                    BinaryOp::ExclusiveOr => Some(l ^ r),
                    BinaryOp::ShiftLeft => u32::try_from(r).ok().and_then(|r| l.checked_shl(r)),
                    BinaryOp::ShiftRight => u32::try_from(r).ok().and_then(|r| l.checked_shr(r)),
                    _ => None,
                }
            }
            ExprKind::Call { target, arguments } if !target.is_templated() => {
                match (self.program.name(target.symbol), &arguments[..]) {
                    ("i32" | "u32", [arg]) => self.eval(arg, depth + 1),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// Alignment and size of a structure, once all its members are placed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct StructSize {
    pub align: u32,
    pub size: u32,
}

pub(crate) fn round_up(align: u32, value: u32) -> u32 {
    if align == 0 {
        value
    } else {
        value.div_ceil(align).saturating_mul(align)
    }
}

fn scalar_layout(scalar: Scalar) -> (u32, u32) {
    if scalar == Scalar::F16 { (2, 2) } else { (4, 4) }
}

/// `(align, size)` of a type in host-shareable memory.
pub(crate) fn type_layout(ty: &Type, structs: &HashMap<Symbol, StructSize>) -> (u32, u32) {
    match ty {
        Type::Scalar(s) | Type::Atomic(s) => scalar_layout(*s),
        Type::Vector { size, scalar } => {
            let (_, width) = scalar_layout(*scalar);
            let count = size.count();
            let align = if count == 2 { 2 * width } else { 4 * width };
            (align, count * width)
        }
        Type::Matrix {
            columns,
            rows,
            scalar,
        } => {
            let column = Type::Vector {
                size: *rows,
                scalar: *scalar,
            };
            let (align, size) = type_layout(&column, structs);
            (align, columns.count() * round_up(align, size))
        }
        Type::Array { base, size } => {
            let (align, elem_size) = type_layout(base, structs);
            let stride = round_up(align, elem_size);
            let count = match size {
                ArraySize::Constant(n) => *n,
                ArraySize::Dynamic => 1,
            };
            (align, stride.saturating_mul(count))
        }
        Type::Struct(name) => structs
            .get(name)
            .map_or((4, 4), |s| (s.align, s.size)),
        _ => (4, 4),
    }
}

/// Places struct members one after another.
pub(crate) struct StructLayout {
    end: u32,
    align: u32,
}

impl StructLayout {
    pub fn new() -> Self {
        Self { end: 0, align: 1 }
    }

    /// Places the next member. `offset` is an explicitly requested offset.
    pub fn place(&mut self, align: u32, size: u32, offset: Option<u32>) -> MemberLayout {
        let offset = offset.unwrap_or_else(|| round_up(align, self.end));
        self.end = offset.saturating_add(size);
        self.align = self.align.max(align);
        MemberLayout {
            offset,
            align,
            size,
        }
    }

    /// The end of the last member placed so far.
    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn finish(&self) -> StructSize {
        StructSize {
            align: self.align,
            size: round_up(self.align, self.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgslx_ast::VectorSize;

    fn vec(size: VectorSize) -> Type {
        Type::Vector {
            size,
            scalar: Scalar::F32,
        }
    }

    #[test]
    fn vector_and_matrix_layouts() {
        let structs = HashMap::new();
        assert_eq!(type_layout(&vec(VectorSize::Bi), &structs), (8, 8));
        assert_eq!(type_layout(&vec(VectorSize::Tri), &structs), (16, 12));
        let mat3 = Type::Matrix {
            columns: VectorSize::Tri,
            rows: VectorSize::Tri,
            scalar: Scalar::F32,
        };
        assert_eq!(type_layout(&mat3, &structs), (16, 48));
        let arr = Type::Array {
            base: Box::new(vec(VectorSize::Tri)),
            size: ArraySize::Constant(2),
        };
        assert_eq!(type_layout(&arr, &structs), (16, 32));
    }

    #[test]
    fn places_members_sequentially() {
        let mut layout = StructLayout::new();
        let a = layout.place(4, 4, None);
        let b = layout.place(8, 8, None);
        let c = layout.place(16, 12, None);
        assert_eq!((a.offset, b.offset, c.offset), (0, 8, 16));
        assert_eq!(layout.finish(), StructSize { align: 16, size: 32 });
    }

    #[test]
    fn explicit_offset_overrides() {
        let mut layout = StructLayout::new();
        layout.place(4, 4, None);
        let b = layout.place(4, 4, Some(16));
        assert_eq!(b.offset, 16);
        assert_eq!(layout.end(), 20);
        assert_eq!(layout.finish().size, 20);
    }

    #[test]
    fn round_up_values() {
        assert_eq!(round_up(16, 4), 16);
        assert_eq!(round_up(4, 8), 8);
        assert_eq!(round_up(8, 0), 0);
    }
}
