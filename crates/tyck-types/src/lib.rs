//! Interned type universe for the tyck type checker.
//!
//! Types are immutable nodes addressed by [`TypeId`]. The [`TypeInterner`]
//! owns them together with per-shape structural caches, so that two requests
//! for the same union, intersection, literal, tuple target or indexed access
//! return the same id. Semantic normalization (reduction, distribution,
//! tuple normalization) lives in the checker; this crate only allocates and
//! keys.

pub mod type_id;
pub use type_id::TypeId;

pub mod flags;
pub use flags::{
    AccessFlags, ElementFlags, IndexFlags, ObjectFlags, SignatureFlags, TypeFlags, VarianceFlags,
};

pub mod types;
pub use types::*;

pub mod signature;
pub use signature::{IndexInfo, Signature, SignatureId, SignatureKind};

pub mod mapper;
pub use mapper::{DeferredTarget, InferenceContextId, MapperFunction, TypeMapper};

pub mod type_list_id;
pub use type_list_id::{get_type_list_id, get_union_id};

pub mod interner;
pub use interner::{TypeInterner, UnionReduction};
