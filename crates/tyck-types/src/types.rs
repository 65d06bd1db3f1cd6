//! Type nodes and their per-kind payloads.
//!
//! A [`Type`] is a flag-tagged header plus a [`TypeData`] payload. Payloads
//! are immutable after construction except for the lazily computed slots
//! (resolved members, base types, constraints, type arguments) that the
//! checker fills in exactly once.

use std::rc::Rc;

use tyck_binder::{NodeIndex, SymbolId, SymbolTable};

use crate::flags::{AccessFlags, ElementFlags, IndexFlags, ObjectFlags, TypeFlags, VarianceFlags};
use crate::mapper::TypeMapper;
use crate::signature::{IndexInfo, SignatureId};
use crate::type_id::TypeId;

/// Alias annotation carried by a type for display and alias-keyed identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeAlias {
    pub symbol: SymbolId,
    pub type_arguments: Vec<TypeId>,
}

/// An interned type.
#[derive(Clone, Debug)]
pub struct Type {
    pub id: TypeId,
    pub flags: TypeFlags,
    pub object_flags: ObjectFlags,
    /// Owning symbol, or `SymbolId::NONE`.
    pub symbol: SymbolId,
    pub alias: Option<TypeAlias>,
    pub data: TypeData,
}

impl Type {
    #[inline]
    pub fn is(&self, flags: TypeFlags) -> bool {
        self.flags.intersects(flags)
    }

    #[inline]
    pub fn has_object_flags(&self, flags: ObjectFlags) -> bool {
        self.object_flags.intersects(flags)
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match &self.data {
            TypeData::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ObjectType> {
        match &mut self.data {
            TypeData::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceType> {
        match &self.data {
            TypeData::Object(ObjectType {
                kind: ObjectKind::Interface(i),
                ..
            }) => Some(i),
            _ => None,
        }
    }

    pub fn as_interface_mut(&mut self) -> Option<&mut InterfaceType> {
        match &mut self.data {
            TypeData::Object(ObjectType {
                kind: ObjectKind::Interface(i),
                ..
            }) => Some(i),
            _ => None,
        }
    }

    pub fn as_type_parameter(&self) -> Option<&TypeParameterType> {
        match &self.data {
            TypeData::TypeParameter(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_type_parameter_mut(&mut self) -> Option<&mut TypeParameterType> {
        match &mut self.data {
            TypeData::TypeParameter(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&LiteralType> {
        match &self.data {
            TypeData::Literal(l) => Some(l),
            _ => None,
        }
    }

    /// Constituents of a union or intersection; empty otherwise.
    pub fn constituents(&self) -> &[TypeId] {
        match &self.data {
            TypeData::Union(u) => &u.types,
            TypeData::Intersection(i) => &i.types,
            _ => &[],
        }
    }

    /// Tuple shape of a tuple target.
    pub fn tuple_info(&self) -> Option<&TupleInfo> {
        self.as_interface().and_then(|i| i.tuple.as_ref())
    }

    /// Already resolved structured members, for object, union and
    /// intersection types.
    pub fn resolved_members(&self) -> Option<&Rc<StructuredMembers>> {
        match &self.data {
            TypeData::Object(o) => o.members.as_ref(),
            TypeData::Union(u) => u.members.as_ref(),
            TypeData::Intersection(i) => i.members.as_ref(),
            _ => None,
        }
    }
}

// =============================================================================
// Payloads
// =============================================================================

#[derive(Clone, Debug)]
pub enum TypeData {
    Intrinsic(IntrinsicType),
    Literal(LiteralType),
    UniqueSymbol(UniqueSymbolType),
    TypeParameter(TypeParameterType),
    Object(ObjectType),
    Union(UnionType),
    Intersection(IntersectionType),
    Index(IndexType),
    IndexedAccess(IndexedAccessType),
    TemplateLiteral(TemplateLiteralType),
}

#[derive(Clone, Debug)]
pub struct IntrinsicType {
    pub name: &'static str,
}

/// Arbitrary precision integer kept as its decimal digits.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PseudoBigInt {
    pub negative: bool,
    pub base10_value: String,
}

impl std::fmt::Display for PseudoBigInt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.negative && self.base10_value != "0" {
            write!(f, "-{}n", self.base10_value)
        } else {
            write!(f, "{}n", self.base10_value)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    BigInt(PseudoBigInt),
    Boolean(bool),
}

/// A literal type. Fresh and regular variants come in pairs.
#[derive(Clone, Debug)]
pub struct LiteralType {
    pub value: LiteralValue,
    /// Fresh variant, allocated on first request.
    pub fresh_type: Option<TypeId>,
    pub regular_type: TypeId,
}

#[derive(Clone, Debug)]
pub struct UniqueSymbolType {
    pub escaped_name: String,
}

#[derive(Clone, Debug, Default)]
pub struct TypeParameterType {
    /// `None` until resolved; [`TypeId::NO_CONSTRAINT`] when there is none and
    /// [`TypeId::CIRCULAR_CONSTRAINT`] when the constraint is circular.
    pub constraint: Option<TypeId>,
    /// `None` until resolved; [`TypeId::NO_CONSTRAINT`] when there is none.
    pub default: Option<TypeId>,
    /// Original type parameter of a cloned (freshened) parameter.
    pub target: Option<TypeId>,
    /// Mapper applied to the target's constraint for cloned parameters.
    pub mapper: Option<Rc<TypeMapper>>,
    pub is_this_type: bool,
}

#[derive(Clone, Debug)]
pub struct ObjectType {
    pub kind: ObjectKind,
    /// Set once `ObjectFlags::MEMBERS_RESOLVED` is set.
    pub members: Option<Rc<StructuredMembers>>,
}

#[derive(Clone, Debug)]
pub enum ObjectKind {
    /// Declared class or interface type, also used for tuple targets.
    Interface(Box<InterfaceType>),
    Reference(TypeReference),
    Anonymous(AnonymousType),
    Mapped(Box<MappedType>),
    ReverseMapped(ReverseMappedType),
}

/// Members, signatures and index infos of a structured type.
#[derive(Clone, Debug, Default)]
pub struct StructuredMembers {
    pub members: SymbolTable,
    pub properties: Vec<SymbolId>,
    pub call_signatures: Vec<SignatureId>,
    pub construct_signatures: Vec<SignatureId>,
    pub index_infos: Vec<IndexInfo>,
}

impl StructuredMembers {
    pub fn empty() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
            && self.call_signatures.is_empty()
            && self.construct_signatures.is_empty()
            && self.index_infos.is_empty()
    }
}

/// Declared class, interface or tuple target type.
#[derive(Clone, Debug, Default)]
pub struct InterfaceType {
    /// Outer and local type parameters, outer first.
    pub type_parameters: Vec<TypeId>,
    pub outer_type_parameters: Vec<TypeId>,
    pub local_type_parameters: Vec<TypeId>,
    pub this_type: Option<TypeId>,
    pub resolved_base_constructor_type: Option<TypeId>,
    pub resolved_base_types: Option<Rc<Vec<TypeId>>>,
    /// Members declared directly by the type, without inherited ones.
    pub declared_members: Option<Rc<StructuredMembers>>,
    pub tuple: Option<TupleInfo>,
    pub variances: Option<Vec<VarianceFlags>>,
}

#[derive(Clone, Debug, Default)]
pub struct TupleInfo {
    pub element_flags: Vec<ElementFlags>,
    /// Label declarations, when every element is labeled.
    pub labeled_declarations: Option<Vec<NodeIndex>>,
    pub min_length: usize,
    pub fixed_length: usize,
    pub has_rest_element: bool,
    pub combined_flags: ElementFlags,
    pub readonly: bool,
}

/// Instantiation of a generic class, interface or tuple target.
#[derive(Clone, Debug)]
pub struct TypeReference {
    pub target: TypeId,
    /// `None` for a deferred reference until its arguments are resolved.
    pub resolved_type_arguments: Option<Vec<TypeId>>,
    /// Array or tuple type node of a deferred reference.
    pub node: NodeIndex,
    pub mapper: Option<Rc<TypeMapper>>,
}

#[derive(Clone, Debug, Default)]
pub struct AnonymousType {
    /// Uninstantiated type this type was instantiated from.
    pub target: Option<TypeId>,
    pub mapper: Option<Rc<TypeMapper>>,
}

/// `{ readonly [P in K as N]?: T }`
#[derive(Clone, Debug, Default)]
pub struct MappedType {
    pub declaration: NodeIndex,
    pub type_parameter: Option<TypeId>,
    pub constraint_type: Option<TypeId>,
    /// `Some(None)` once resolved without an `as` clause.
    pub name_type: Option<Option<TypeId>>,
    pub template_type: Option<TypeId>,
    pub modifiers_type: Option<TypeId>,
    pub mapper: Option<Rc<TypeMapper>>,
    pub target: Option<TypeId>,
}

/// Object type inferred backwards through a homomorphic mapped type.
#[derive(Clone, Debug)]
pub struct ReverseMappedType {
    pub source: TypeId,
    pub mapped_type: TypeId,
    pub constraint_type: TypeId,
}

#[derive(Clone, Debug)]
pub struct UnionType {
    pub types: Vec<TypeId>,
    /// Denormalized form kept for display.
    pub origin: Option<TypeId>,
    pub members: Option<Rc<StructuredMembers>>,
}

#[derive(Clone, Debug)]
pub struct IntersectionType {
    pub types: Vec<TypeId>,
    pub members: Option<Rc<StructuredMembers>>,
}

/// `keyof T` for a generic `T`.
#[derive(Clone, Debug)]
pub struct IndexType {
    pub target: TypeId,
    pub index_flags: IndexFlags,
}

/// `T[K]` whose resolution was deferred.
#[derive(Clone, Debug)]
pub struct IndexedAccessType {
    pub object_type: TypeId,
    pub index_type: TypeId,
    pub access_flags: AccessFlags,
}

/// `` `a${T}b` `` with `texts.len() == types.len() + 1`.
#[derive(Clone, Debug)]
pub struct TemplateLiteralType {
    pub texts: Vec<String>,
    pub types: Vec<TypeId>,
}
