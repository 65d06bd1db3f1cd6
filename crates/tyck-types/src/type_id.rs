//! Type identifiers and the fixed ids of intrinsic types.

/// Interned type identifier.
///
/// Ids are assigned in allocation order. The intrinsic types are allocated
/// first by [`crate::TypeInterner::new`], so their ids are constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const ANY: TypeId = TypeId(0);
    /// Implicit `any` of an evolving declaration; non-inferrable.
    pub const AUTO: TypeId = TypeId(1);
    /// Permissive placeholder produced by permissive instantiation.
    pub const WILDCARD: TypeId = TypeId(2);
    /// `any` produced by an error.
    pub const ERROR: TypeId = TypeId(3);
    pub const NON_INFERRABLE_ANY: TypeId = TypeId(4);
    pub const UNKNOWN: TypeId = TypeId(5);
    pub const UNDEFINED: TypeId = TypeId(6);
    pub const UNDEFINED_WIDENING: TypeId = TypeId(7);
    /// `undefined` from an optional property or tuple element.
    pub const MISSING: TypeId = TypeId(8);
    pub const NULL: TypeId = TypeId(9);
    pub const NULL_WIDENING: TypeId = TypeId(10);
    pub const STRING: TypeId = TypeId(11);
    pub const NUMBER: TypeId = TypeId(12);
    pub const BIGINT: TypeId = TypeId(13);
    /// Fresh `false`.
    pub const FALSE: TypeId = TypeId(14);
    pub const REGULAR_FALSE: TypeId = TypeId(15);
    /// Fresh `true`.
    pub const TRUE: TypeId = TypeId(16);
    pub const REGULAR_TRUE: TypeId = TypeId(17);
    /// `false | true`
    pub const BOOLEAN: TypeId = TypeId(18);
    pub const SYMBOL: TypeId = TypeId(19);
    pub const VOID: TypeId = TypeId(20);
    pub const NEVER: TypeId = TypeId(21);
    /// Never that suppresses inference.
    pub const SILENT_NEVER: TypeId = TypeId(22);
    pub const IMPLICIT_NEVER: TypeId = TypeId(23);
    pub const UNREACHABLE_NEVER: TypeId = TypeId(24);
    /// `object`
    pub const NON_PRIMITIVE: TypeId = TypeId(25);
    /// `{}` with no symbol.
    pub const EMPTY_OBJECT: TypeId = TypeId(26);
    /// `{}` written as a type literal.
    pub const EMPTY_TYPE_LITERAL: TypeId = TypeId(27);
    /// Non-inferrable function placeholder.
    pub const ANY_FUNCTION: TypeId = TypeId(28);
    /// Sentinel for "type parameter has no constraint".
    pub const NO_CONSTRAINT: TypeId = TypeId(29);
    /// Sentinel for "type parameter constraint is circular".
    pub const CIRCULAR_CONSTRAINT: TypeId = TypeId(30);
    /// Marker type parameters used to measure variance.
    pub const MARKER_SUPER: TypeId = TypeId(31);
    pub const MARKER_SUB: TypeId = TypeId(32);
    pub const MARKER_OTHER: TypeId = TypeId(33);

    /// First id available for non-intrinsic types.
    pub const FIRST_USER: u32 = 34;

    #[inline]
    pub const fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_USER
    }

    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 == Self::ERROR.0
    }

    /// `any` in any of its flavours.
    #[inline]
    pub const fn is_any(self) -> bool {
        matches!(self.0, 0..=4)
    }

    #[inline]
    pub const fn is_never(self) -> bool {
        matches!(self.0, 21..=24)
    }
}
