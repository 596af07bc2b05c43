//! Operator grouping and parenthesization.

use wgslx_ast::BinaryOp;

/// Precedence class of an operator, from tightest to loosest binding.
///
/// `None` marks the top of an expression (directly under a statement, an
/// argument list or an index), where no parentheses are ever needed.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum OperatorGroup {
    None,
    Primary,
    Unary,
    Multiplicative,
    Additive,
    Shift,
    Relational,
    BinaryAnd,
    BinaryXor,
    BinaryOr,
    ShortCircuitAnd,
    ShortCircuitOr,
}

impl OperatorGroup {
    pub fn of(op: BinaryOp) -> Self {
        match op {
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => {
                OperatorGroup::Multiplicative
            }
            BinaryOp::Add | BinaryOp::Subtract => OperatorGroup::Additive,
            BinaryOp::ShiftLeft | BinaryOp::ShiftRight => OperatorGroup::Shift,
            BinaryOp::Equal
            | BinaryOp::NotEqual
            | BinaryOp::Less
            | BinaryOp::LessEqual
            | BinaryOp::Greater
            | BinaryOp::GreaterEqual => OperatorGroup::Relational,
            BinaryOp::And => OperatorGroup::BinaryAnd,
            BinaryOp::ExclusiveOr => OperatorGroup::BinaryXor,
            BinaryOp::InclusiveOr => OperatorGroup::BinaryOr,
            BinaryOp::LogicalAnd => OperatorGroup::ShortCircuitAnd,
            BinaryOp::LogicalOr => OperatorGroup::ShortCircuitOr,
        }
    }

    /// Operators that may not be mixed with a different operator of the set
    /// without parentheses.
    fn is_non_mixable(self) -> bool {
        matches!(
            self,
            OperatorGroup::BinaryAnd
                | OperatorGroup::BinaryXor
                | OperatorGroup::BinaryOr
                | OperatorGroup::ShortCircuitAnd
                | OperatorGroup::ShortCircuitOr
        )
    }

    /// Operators whose operands are unary expressions in the grammar.
    fn binds_unary_operands(self) -> bool {
        matches!(
            self,
            OperatorGroup::Shift
                | OperatorGroup::BinaryAnd
                | OperatorGroup::BinaryXor
                | OperatorGroup::BinaryOr
        )
    }

    /// Operators whose operands are relational expressions in the grammar.
    fn binds_relational_operands(self) -> bool {
        matches!(
            self,
            OperatorGroup::ShortCircuitAnd | OperatorGroup::ShortCircuitOr
        )
    }
}

/// Side of the parent operator an operand is printed on. Unary operands
/// are on the right.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Position {
    Left,
    Right,
}

/// Whether an operand of group `group`, printed at `position` under an
/// operator of group `parent`, must be parenthesized.
pub fn requires_parens(group: OperatorGroup, position: Position, parent: OperatorGroup) -> bool {
    if parent == OperatorGroup::None {
        return false;
    }
    if group.is_non_mixable() && parent.is_non_mixable() {
        // Differing operators must be grouped; equal ones are grouped too,
        // whatever their associativity.
        return true;
    }
    if matches!(group, OperatorGroup::Shift | OperatorGroup::Relational) && group == parent {
        return true;
    }
    if parent.binds_unary_operands() && group > OperatorGroup::Unary {
        return true;
    }
    if parent.binds_relational_operands() && group > OperatorGroup::Relational {
        return true;
    }
    match (position, parent) {
        (Position::Left, OperatorGroup::Unary) => group >= parent,
        (Position::Left, _) => group > parent,
        (Position::Right, OperatorGroup::Unary) => group > parent,
        (Position::Right, _) => group >= parent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::OperatorGroup::{
        Additive, BinaryAnd, BinaryOr, BinaryXor, Multiplicative, Relational, Shift,
        ShortCircuitAnd, ShortCircuitOr, Unary,
    };

    #[test]
    fn top_level_is_never_parenthesized() {
        for group in [Unary, Additive, Relational, ShortCircuitOr] {
            assert!(!requires_parens(group, Position::Left, OperatorGroup::None));
            assert!(!requires_parens(group, Position::Right, OperatorGroup::None));
        }
    }

    #[test]
    fn left_associative_arithmetic() {
        // a - b - c
        assert!(!requires_parens(Additive, Position::Left, Additive));
        // a - (b - c)
        assert!(requires_parens(Additive, Position::Right, Additive));
        // a * b + c, a + b * c
        assert!(!requires_parens(Multiplicative, Position::Left, Additive));
        assert!(!requires_parens(Multiplicative, Position::Right, Additive));
        // (a + b) * c
        assert!(requires_parens(Additive, Position::Left, Multiplicative));
    }

    #[test]
    fn logical_and_bitwise_operators_are_grouped() {
        // a && (b || c)
        assert!(requires_parens(ShortCircuitOr, Position::Right, ShortCircuitAnd));
        // (a && b) && c
        assert!(requires_parens(ShortCircuitAnd, Position::Left, ShortCircuitAnd));
        // (a & b) | c
        assert!(requires_parens(BinaryAnd, Position::Left, BinaryOr));
        // a < b && c < d
        assert!(!requires_parens(Relational, Position::Left, ShortCircuitAnd));
        assert!(!requires_parens(Relational, Position::Right, ShortCircuitOr));
    }

    #[test]
    fn non_associative_operators() {
        assert!(requires_parens(Relational, Position::Left, Relational));
        assert!(requires_parens(Shift, Position::Left, Shift));
        // a + b < c
        assert!(!requires_parens(Additive, Position::Left, Relational));
        // (a < b) + c
        assert!(requires_parens(Relational, Position::Left, Additive));
    }

    #[test]
    fn bitwise_and_shift_operands_are_unary() {
        // a & (b + c), a << (b * c)
        assert!(requires_parens(Additive, Position::Right, BinaryAnd));
        assert!(requires_parens(Multiplicative, Position::Right, Shift));
        assert!(requires_parens(Relational, Position::Left, BinaryXor));
        // -a << b
        assert!(!requires_parens(Unary, Position::Left, Shift));
        // a << b + c is read as (a << b) + c
        assert!(requires_parens(Shift, Position::Left, Additive));
    }

    #[test]
    fn unary_operands() {
        // -(a + b)
        assert!(requires_parens(Additive, Position::Right, Unary));
        // - -a
        assert!(!requires_parens(Unary, Position::Right, Unary));
        // a * -b
        assert!(!requires_parens(Unary, Position::Right, Multiplicative));
    }

    #[test]
    fn operator_groups() {
        assert_eq!(OperatorGroup::of(BinaryOp::Modulo), Multiplicative);
        assert_eq!(OperatorGroup::of(BinaryOp::GreaterEqual), Relational);
        assert_eq!(OperatorGroup::of(BinaryOp::ExclusiveOr), BinaryXor);
        assert_eq!(OperatorGroup::of(BinaryOp::LogicalOr), ShortCircuitOr);
    }
}
