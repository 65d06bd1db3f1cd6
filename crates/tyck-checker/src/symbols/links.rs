//! Per-symbol and per-node side tables filled in lazily by the checker.

use std::rc::Rc;

use bitflags::bitflags;
use rustc_hash::{FxHashMap, FxHashSet};
use tyck_binder::{SymbolId, SymbolTable};
use tyck_types::{SignatureId, TypeId, TypeMapper, VarianceFlags};

bitflags! {
    /// Flags on transient symbols describing how they were produced.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CheckFlags: u32 {
        /// Property of an instantiated type; type comes from `target` + `mapper`.
        const INSTANTIATED = 1 << 0;
        /// Property of a union or intersection type.
        const SYNTHETIC_PROPERTY = 1 << 1;
        const SYNTHETIC_METHOD = 1 << 2;
        const READONLY = 1 << 3;
        /// Synthetic union property missing from some constituents.
        const PARTIAL = 1 << 4;
        const HAS_NON_UNIFORM_TYPE = 1 << 5;
        const HAS_LITERAL_PART = 1 << 6;
        /// Property of a mapped type.
        const MAPPED = 1 << 7;
        /// Property of a reverse mapped type.
        const REVERSE_MAPPED = 1 << 8;
        const OPTIONAL_PARAMETER = 1 << 9;
        const REST_PARAMETER = 1 << 10;
        /// Merged clone of a bound symbol.
        const MERGED = 1 << 11;
        const STRIP_OPTIONAL = 1 << 12;

        const SYNTHETIC = Self::SYNTHETIC_PROPERTY.bits() | Self::SYNTHETIC_METHOD.bits();
    }
}

/// Lazily computed facts about a symbol.
#[derive(Clone, Debug, Default)]
pub struct SymbolLinks {
    pub check_flags: CheckFlags,

    // --- Aliases ---
    pub alias_target: Option<SymbolId>,

    // --- Instantiated and synthetic symbols ---
    /// Symbol this one was instantiated from.
    pub target: Option<SymbolId>,
    pub mapper: Option<Rc<TypeMapper>>,
    /// Union or intersection that produced a synthetic property.
    pub containing_type: Option<TypeId>,
    /// Mapped type that produced a mapped property.
    pub mapped_type: Option<TypeId>,
    /// Key type of a mapped property.
    pub key_type: Option<TypeId>,
    /// Literal type naming a mapped property; differs from `key_type` under
    /// an `as` clause.
    pub name_type: Option<TypeId>,
    /// `(property type, mapped type, constraint type)` of a reverse mapped
    /// property.
    pub reverse_mapped: Option<(TypeId, TypeId, TypeId)>,

    // --- Types ---
    pub type_: Option<TypeId>,
    pub write_type: Option<TypeId>,
    pub declared_type: Option<TypeId>,

    // --- Type aliases ---
    /// Outer and local type parameters of a generic type alias.
    pub type_parameters: Option<Vec<TypeId>>,
    /// Instantiations of a generic alias keyed by argument list id.
    pub instantiations: Option<FxHashMap<String, TypeId>>,
    pub variances: Option<Vec<VarianceFlags>>,

    // --- Modules ---
    pub resolved_exports: Option<Rc<SymbolTable>>,
    /// Export names reachable only through `export type *`.
    pub type_only_exports: Option<Rc<FxHashSet<String>>>,
    /// Enum member value computed while resolving the declared enum type.
    pub enum_member_value: Option<TypeId>,
}

bitflags! {
    /// Per-node check state.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct NodeCheckFlags: u8 {
        const TYPE_CHECKED = 1 << 0;
        /// Contextual parameter types were assigned from a contextual
        /// signature.
        const CONTEXT_CHECKED = 1 << 1;
    }
}

/// Lazily computed facts about a node.
#[derive(Clone, Debug, Default)]
pub struct NodeLinks {
    pub flags: NodeCheckFlags,
    /// Type of a type node, or the cached type of an expression.
    pub resolved_type: Option<TypeId>,
    pub resolved_symbol: Option<SymbolId>,
    /// Signature declared by a function-like node, or the signature chosen
    /// for a call.
    pub resolved_signature: Option<SignatureId>,
    /// Outer type parameters an anonymous type or mapped type may reference.
    pub outer_type_parameters: Option<Rc<Vec<TypeId>>>,
}
