//! Semantic annotations produced by a front end.
//!
//! Every table is keyed by the [`NodeId`] of the annotated node. The
//! tables are read-only once resolution has finished.

use std::collections::HashMap;

use crate::expr::NodeId;
use crate::types::Type;

/// What an identifier expression resolved to.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum IdentKind {
    /// A variable, parameter, value or constant.
    Value,
    /// A type name; `builtin` is false for user structs and aliases.
    Type { builtin: bool },
    /// A predeclared enumerant such as `storage` or `read_write`.
    BuiltinEnumerant,
}

/// What the target of a call expression resolved to.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum CallTarget {
    BuiltinFunction,
    /// Construction of a builtin type (`vec4f(1)`, `array<i32, 2>(a, b)`).
    ValueConstructor,
    /// Conversion of a single value to a builtin scalar or vector type (`f32(i)`).
    ValueConversion,
    UserFunction,
    /// Construction of a user struct or of a type behind a user alias.
    UserTypeConstructor,
}

impl CallTarget {
    /// Returns `true` if the target names a builtin function or builtin type.
    pub fn is_builtin(self) -> bool {
        matches!(
            self,
            CallTarget::BuiltinFunction | CallTarget::ValueConstructor | CallTarget::ValueConversion
        )
    }
}

/// What a member access denotes.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum MemberAccess {
    Swizzle,
    /// A structure field; `builtin_struct` is true for result structures
    /// predeclared by the language.
    Field { builtin_struct: bool },
}

/// Resolved byte layout of a struct member.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct MemberLayout {
    pub offset: u32,
    pub align: u32,
    pub size: u32,
}

#[derive(Clone, Debug, Default)]
pub struct Sem {
    types: HashMap<NodeId, Type>,
    idents: HashMap<NodeId, IdentKind>,
    calls: HashMap<NodeId, CallTarget>,
    members: HashMap<NodeId, MemberAccess>,
    layouts: HashMap<NodeId, MemberLayout>,
}

impl Sem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_type(&mut self, id: NodeId, ty: Type) {
        self.types.insert(id, ty);
    }

    /// Resolved type of an expression, including type expressions.
    pub fn type_of(&self, id: NodeId) -> Option<&Type> {
        self.types.get(&id)
    }

    pub fn set_ident(&mut self, id: NodeId, kind: IdentKind) {
        self.idents.insert(id, kind);
    }

    pub fn ident(&self, id: NodeId) -> Option<IdentKind> {
        self.idents.get(&id).copied()
    }

    pub fn set_call(&mut self, id: NodeId, target: CallTarget) {
        self.calls.insert(id, target);
    }

    pub fn call(&self, id: NodeId) -> Option<CallTarget> {
        self.calls.get(&id).copied()
    }

    pub fn set_member(&mut self, id: NodeId, access: MemberAccess) {
        self.members.insert(id, access);
    }

    pub fn member(&self, id: NodeId) -> Option<MemberAccess> {
        self.members.get(&id).copied()
    }

    pub fn set_layout(&mut self, id: NodeId, layout: MemberLayout) {
        self.layouts.insert(id, layout);
    }

    /// Layout of a struct member, keyed by the member's id.
    pub fn layout(&self, id: NodeId) -> Option<MemberLayout> {
        self.layouts.get(&id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Scalar;

    #[test]
    fn records_annotations() {
        let mut sem = Sem::new();
        sem.set_type(NodeId(3), Type::Scalar(Scalar::F32));
        sem.set_call(NodeId(4), CallTarget::ValueConversion);
        sem.set_member(NodeId(5), MemberAccess::Swizzle);
        assert_eq!(sem.type_of(NodeId(3)), Some(&Type::Scalar(Scalar::F32)));
        assert!(sem.call(NodeId(4)).is_some_and(CallTarget::is_builtin));
        assert_eq!(sem.member(NodeId(5)), Some(MemberAccess::Swizzle));
        assert_eq!(sem.ident(NodeId(3)), None);
        assert_eq!(sem.layout(NodeId(9)), None);
    }
}
