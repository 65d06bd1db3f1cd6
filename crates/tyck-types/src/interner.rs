//! Type interning.
//!
//! The `TypeInterner` owns every type and signature allocated by one checker
//! and the per-shape caches that make structurally equal requests return the
//! same [`TypeId`]. Each cache is keyed by the ids of the inputs, so lookups
//! never compare type contents.
//!
//! The interner is deliberately not `Sync`: a checker shard owns its interner
//! and ids are meaningless outside of it.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::trace;
use tyck_binder::{NodeIndex, SymbolId};

use crate::flags::{AccessFlags, ElementFlags, IndexFlags, ObjectFlags, TypeFlags};
use crate::mapper::TypeMapper;
use crate::signature::{Signature, SignatureId};
use crate::type_id::TypeId;
use crate::type_list_id::{
    UnionOriginKey, get_alias_id, get_type_list_id, get_union_id, push_id,
};
use crate::types::*;

/// Reduction applied while building a union.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum UnionReduction {
    None,
    #[default]
    Literal,
    Subtype,
}

#[derive(Debug)]
pub struct TypeInterner {
    types: Vec<Type>,
    signatures: Vec<Signature>,

    string_literals: FxHashMap<String, TypeId>,
    number_literals: FxHashMap<u64, TypeId>,
    bigint_literals: FxHashMap<PseudoBigInt, TypeId>,
    enum_literals: FxHashMap<String, TypeId>,
    unique_symbols: FxHashMap<SymbolId, TypeId>,
    union_types: FxHashMap<String, TypeId>,
    union_of_unions: FxHashMap<(TypeId, TypeId, UnionReduction, String), TypeId>,
    intersection_types: FxHashMap<String, TypeId>,
    index_types: FxHashMap<(TypeId, bool), TypeId>,
    indexed_access_types: FxHashMap<String, TypeId>,
    tuple_targets: FxHashMap<String, TypeId>,
    template_literal_types: FxHashMap<String, TypeId>,
    /// `(target, argument list id)` to reference or instantiation.
    instantiations: FxHashMap<(TypeId, String), TypeId>,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    /// Create an interner with every intrinsic type allocated at its fixed id.
    pub fn new() -> Self {
        let mut interner = Self {
            types: Vec::with_capacity(1024),
            signatures: Vec::new(),
            string_literals: FxHashMap::default(),
            number_literals: FxHashMap::default(),
            bigint_literals: FxHashMap::default(),
            enum_literals: FxHashMap::default(),
            unique_symbols: FxHashMap::default(),
            union_types: FxHashMap::default(),
            union_of_unions: FxHashMap::default(),
            intersection_types: FxHashMap::default(),
            index_types: FxHashMap::default(),
            indexed_access_types: FxHashMap::default(),
            tuple_targets: FxHashMap::default(),
            template_literal_types: FxHashMap::default(),
            instantiations: FxHashMap::default(),
        };
        interner.init_intrinsics();
        interner
    }

    fn intrinsic(&mut self, expected: TypeId, flags: TypeFlags, object_flags: ObjectFlags, name: &'static str) {
        let id = self.alloc(flags, object_flags, SymbolId::NONE, TypeData::Intrinsic(IntrinsicType { name }));
        debug_assert_eq!(id, expected);
    }

    fn boolean_literal(&mut self, expected: TypeId, value: bool, fresh: TypeId, regular: TypeId) {
        let id = self.alloc(
            TypeFlags::BOOLEAN_LITERAL,
            ObjectFlags::empty(),
            SymbolId::NONE,
            TypeData::Literal(LiteralType {
                value: LiteralValue::Boolean(value),
                fresh_type: Some(fresh),
                regular_type: regular,
            }),
        );
        debug_assert_eq!(id, expected);
    }

    fn empty_object(&mut self, expected: TypeId, object_flags: ObjectFlags) {
        let id = self.alloc(
            TypeFlags::OBJECT,
            ObjectFlags::ANONYMOUS | ObjectFlags::MEMBERS_RESOLVED | object_flags,
            SymbolId::NONE,
            TypeData::Object(ObjectType {
                kind: ObjectKind::Anonymous(AnonymousType::default()),
                members: Some(StructuredMembers::empty()),
            }),
        );
        debug_assert_eq!(id, expected);
    }

    fn marker(&mut self, expected: TypeId, constraint: TypeId) {
        let id = self.alloc(
            TypeFlags::TYPE_PARAMETER,
            ObjectFlags::empty(),
            SymbolId::NONE,
            TypeData::TypeParameter(TypeParameterType {
                constraint: Some(constraint),
                default: Some(TypeId::NO_CONSTRAINT),
                ..TypeParameterType::default()
            }),
        );
        debug_assert_eq!(id, expected);
    }

    fn init_intrinsics(&mut self) {
        let none = ObjectFlags::empty();
        let non_inferrable = ObjectFlags::NON_INFERRABLE_TYPE;
        let widening = ObjectFlags::CONTAINS_WIDENING_TYPE;
        self.intrinsic(TypeId::ANY, TypeFlags::ANY, none, "any");
        self.intrinsic(TypeId::AUTO, TypeFlags::ANY, non_inferrable, "any");
        self.intrinsic(TypeId::WILDCARD, TypeFlags::ANY, none, "any");
        self.intrinsic(TypeId::ERROR, TypeFlags::ANY, none, "error");
        self.intrinsic(TypeId::NON_INFERRABLE_ANY, TypeFlags::ANY, non_inferrable, "any");
        self.intrinsic(TypeId::UNKNOWN, TypeFlags::UNKNOWN, none, "unknown");
        self.intrinsic(TypeId::UNDEFINED, TypeFlags::UNDEFINED, none, "undefined");
        self.intrinsic(TypeId::UNDEFINED_WIDENING, TypeFlags::UNDEFINED, widening, "undefined");
        self.intrinsic(TypeId::MISSING, TypeFlags::UNDEFINED, none, "undefined");
        self.intrinsic(TypeId::NULL, TypeFlags::NULL, none, "null");
        self.intrinsic(TypeId::NULL_WIDENING, TypeFlags::NULL, widening, "null");
        self.intrinsic(TypeId::STRING, TypeFlags::STRING, none, "string");
        self.intrinsic(TypeId::NUMBER, TypeFlags::NUMBER, none, "number");
        self.intrinsic(TypeId::BIGINT, TypeFlags::BIG_INT, none, "bigint");
        self.boolean_literal(TypeId::FALSE, false, TypeId::FALSE, TypeId::REGULAR_FALSE);
        self.boolean_literal(TypeId::REGULAR_FALSE, false, TypeId::FALSE, TypeId::REGULAR_FALSE);
        self.boolean_literal(TypeId::TRUE, true, TypeId::TRUE, TypeId::REGULAR_TRUE);
        self.boolean_literal(TypeId::REGULAR_TRUE, true, TypeId::TRUE, TypeId::REGULAR_TRUE);
        let boolean = self.union_from_sorted_list(
            vec![TypeId::REGULAR_FALSE, TypeId::REGULAR_TRUE],
            ObjectFlags::empty(),
            None,
            None,
        );
        debug_assert_eq!(boolean, TypeId::BOOLEAN);
        self.intrinsic(TypeId::SYMBOL, TypeFlags::ES_SYMBOL, none, "symbol");
        self.intrinsic(TypeId::VOID, TypeFlags::VOID, none, "void");
        self.intrinsic(TypeId::NEVER, TypeFlags::NEVER, none, "never");
        self.intrinsic(TypeId::SILENT_NEVER, TypeFlags::NEVER, non_inferrable, "never");
        self.intrinsic(TypeId::IMPLICIT_NEVER, TypeFlags::NEVER, none, "never");
        self.intrinsic(TypeId::UNREACHABLE_NEVER, TypeFlags::NEVER, none, "never");
        self.intrinsic(TypeId::NON_PRIMITIVE, TypeFlags::NON_PRIMITIVE, none, "object");
        self.empty_object(TypeId::EMPTY_OBJECT, none);
        self.empty_object(TypeId::EMPTY_TYPE_LITERAL, none);
        self.empty_object(TypeId::ANY_FUNCTION, non_inferrable);
        self.empty_object(TypeId::NO_CONSTRAINT, none);
        self.empty_object(TypeId::CIRCULAR_CONSTRAINT, none);
        self.marker(TypeId::MARKER_SUPER, TypeId::NO_CONSTRAINT);
        self.marker(TypeId::MARKER_SUB, TypeId::MARKER_SUPER);
        self.marker(TypeId::MARKER_OTHER, TypeId::NO_CONSTRAINT);
        debug_assert_eq!(self.types.len() as u32, TypeId::FIRST_USER);
    }

    // =========================================================================
    // Storage
    // =========================================================================

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Type by id. Ids are only produced by this interner.
    #[inline]
    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: TypeId) -> &mut Type {
        &mut self.types[id.0 as usize]
    }

    #[inline]
    pub fn flags(&self, id: TypeId) -> TypeFlags {
        self.get(id).flags
    }

    /// Object flags of types that carry them; empty for the rest.
    #[inline]
    pub fn object_flags(&self, id: TypeId) -> ObjectFlags {
        let t = self.get(id);
        if t.flags.intersects(TypeFlags::OBJECT_FLAGS_TYPE) {
            t.object_flags
        } else {
            ObjectFlags::empty()
        }
    }

    #[inline]
    pub fn symbol(&self, id: TypeId) -> SymbolId {
        self.get(id).symbol
    }

    pub fn alloc(&mut self, flags: TypeFlags, object_flags: ObjectFlags, symbol: SymbolId, data: TypeData) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(Type {
            id,
            flags,
            object_flags,
            symbol,
            alias: None,
            data,
        });
        id
    }

    pub fn alloc_with_alias(
        &mut self,
        flags: TypeFlags,
        object_flags: ObjectFlags,
        symbol: SymbolId,
        alias: Option<TypeAlias>,
        data: TypeData,
    ) -> TypeId {
        let id = self.alloc(flags, object_flags, symbol, data);
        self.types[id.0 as usize].alias = alias;
        id
    }

    #[inline]
    pub fn signature(&self, id: SignatureId) -> &Signature {
        &self.signatures[id.0 as usize]
    }

    #[inline]
    pub fn signature_mut(&mut self, id: SignatureId) -> &mut Signature {
        &mut self.signatures[id.0 as usize]
    }

    pub fn alloc_signature(&mut self, declaration: NodeIndex) -> SignatureId {
        let id = SignatureId(self.signatures.len() as u32);
        self.signatures.push(Signature::new(id, declaration));
        id
    }

    /// Copy of `source` under a new id, without its caches.
    pub fn clone_signature(&mut self, source: SignatureId) -> SignatureId {
        let id = SignatureId(self.signatures.len() as u32);
        let mut sig = self.signature(source).clone();
        sig.id = id;
        sig.erased_signature = None;
        sig.instantiations.clear();
        self.signatures.push(sig);
        id
    }

    /// Union of the propagating object flags of `types`, skipping types whose
    /// flags intersect `exclude`.
    pub fn propagating_flags_of_types(&self, types: &[TypeId], exclude: TypeFlags) -> ObjectFlags {
        let mut result = ObjectFlags::empty();
        for &t in types {
            if !self.flags(t).intersects(exclude) {
                result |= self.object_flags(t);
            }
        }
        result & ObjectFlags::PROPAGATING_FLAGS
    }

    // =========================================================================
    // Literals
    // =========================================================================

    fn literal(&mut self, flags: TypeFlags, symbol: SymbolId, value: LiteralValue) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.alloc(
            flags,
            ObjectFlags::empty(),
            symbol,
            TypeData::Literal(LiteralType {
                value,
                fresh_type: None,
                regular_type: id,
            }),
        )
    }

    /// Regular string literal type.
    pub fn string_literal(&mut self, value: &str) -> TypeId {
        if let Some(&id) = self.string_literals.get(value) {
            return id;
        }
        let id = self.literal(
            TypeFlags::STRING_LITERAL,
            SymbolId::NONE,
            LiteralValue::String(value.to_string()),
        );
        self.string_literals.insert(value.to_string(), id);
        id
    }

    /// Regular number literal type. `-0` and `0` share a type.
    pub fn number_literal(&mut self, value: f64) -> TypeId {
        let key = if value == 0.0 {
            0f64.to_bits()
        } else if value.is_nan() {
            f64::NAN.to_bits()
        } else {
            value.to_bits()
        };
        if let Some(&id) = self.number_literals.get(&key) {
            return id;
        }
        let normalized = f64::from_bits(key);
        let id = self.literal(TypeFlags::NUMBER_LITERAL, SymbolId::NONE, LiteralValue::Number(normalized));
        self.number_literals.insert(key, id);
        id
    }

    pub fn bigint_literal(&mut self, value: PseudoBigInt) -> TypeId {
        if let Some(&id) = self.bigint_literals.get(&value) {
            return id;
        }
        let id = self.literal(TypeFlags::BIG_INT_LITERAL, SymbolId::NONE, LiteralValue::BigInt(value.clone()));
        self.bigint_literals.insert(value, id);
        id
    }

    /// Literal type of an enum member, keyed by the enum and the value.
    pub fn enum_literal(&mut self, value: LiteralValue, enum_symbol: SymbolId, member_symbol: SymbolId) -> TypeId {
        let mut key = String::new();
        push_id(&mut key, enum_symbol.0);
        let flags = match &value {
            LiteralValue::String(s) => {
                key.push('@');
                key.push_str(s);
                TypeFlags::ENUM_LITERAL | TypeFlags::STRING_LITERAL
            }
            LiteralValue::Number(n) => {
                key.push('#');
                key.push_str(&tyck_binder::format_number(*n));
                TypeFlags::ENUM_LITERAL | TypeFlags::NUMBER_LITERAL
            }
            _ => TypeFlags::ENUM_LITERAL,
        };
        if let Some(&id) = self.enum_literals.get(&key) {
            return id;
        }
        let id = self.literal(flags, member_symbol, value);
        self.enum_literals.insert(key, id);
        id
    }

    /// Fresh variant of a literal type; other types map to themselves.
    pub fn fresh_type_of(&mut self, id: TypeId) -> TypeId {
        let t = self.get(id);
        if !t.flags.intersects(TypeFlags::FRESHABLE) {
            return id;
        }
        let Some(lit) = t.as_literal() else {
            return id;
        };
        if let Some(fresh) = lit.fresh_type {
            return fresh;
        }
        let (flags, symbol, value, regular) = (t.flags, t.symbol, lit.value.clone(), lit.regular_type);
        let fresh = self.alloc(
            flags,
            ObjectFlags::empty(),
            symbol,
            TypeData::Literal(LiteralType {
                value,
                fresh_type: None,
                regular_type: regular,
            }),
        );
        if let TypeData::Literal(l) = &mut self.get_mut(fresh).data {
            l.fresh_type = Some(fresh);
        }
        if let TypeData::Literal(l) = &mut self.get_mut(regular).data {
            l.fresh_type = Some(fresh);
        }
        fresh
    }

    /// Regular variant of a literal type; other types map to themselves.
    pub fn regular_type_of(&self, id: TypeId) -> TypeId {
        match self.get(id).as_literal() {
            Some(lit) => lit.regular_type,
            None => id,
        }
    }

    #[inline]
    pub fn is_fresh_literal(&self, id: TypeId) -> bool {
        self.get(id)
            .as_literal()
            .is_some_and(|lit| lit.regular_type != id)
    }

    pub fn unique_symbol(&mut self, symbol: SymbolId, escaped_name: &str) -> TypeId {
        if let Some(&id) = self.unique_symbols.get(&symbol) {
            return id;
        }
        let id = self.alloc(
            TypeFlags::UNIQUE_ES_SYMBOL,
            ObjectFlags::empty(),
            symbol,
            TypeData::UniqueSymbol(UniqueSymbolType {
                escaped_name: escaped_name.to_string(),
            }),
        );
        self.unique_symbols.insert(symbol, id);
        id
    }

    // =========================================================================
    // Unions and intersections
    // =========================================================================

    fn origin_key(&self, origin: TypeId) -> UnionOriginKey<'_> {
        let t = self.get(origin);
        match &t.data {
            TypeData::Union(u) => UnionOriginKey::Union(&u.types),
            TypeData::Intersection(i) => UnionOriginKey::Intersection(&i.types),
            TypeData::Index(index) => UnionOriginKey::Index(index.target),
            _ => UnionOriginKey::Index(origin),
        }
    }

    /// Union of already sorted, deduplicated and reduced constituents.
    pub fn union_from_sorted_list(
        &mut self,
        types: Vec<TypeId>,
        precomputed_object_flags: ObjectFlags,
        alias: Option<TypeAlias>,
        origin: Option<TypeId>,
    ) -> TypeId {
        match types.len() {
            0 => return TypeId::NEVER,
            1 => return types[0],
            _ => {}
        }
        let key = get_union_id(&types, origin.map(|o| self.origin_key(o)), alias.as_ref());
        if let Some(&id) = self.union_types.get(&key) {
            return id;
        }
        let mut flags = TypeFlags::UNION;
        if types.len() == 2
            && self.flags(types[0]).contains(TypeFlags::BOOLEAN_LITERAL)
            && self.flags(types[1]).contains(TypeFlags::BOOLEAN_LITERAL)
        {
            flags |= TypeFlags::BOOLEAN;
        }
        let object_flags =
            precomputed_object_flags | self.propagating_flags_of_types(&types, TypeFlags::NULLABLE);
        let id = self.alloc_with_alias(
            flags,
            object_flags,
            SymbolId::NONE,
            alias,
            TypeData::Union(UnionType {
                types,
                origin,
                members: None,
            }),
        );
        trace!(id = id.0, key = key.as_str(), "new union");
        self.union_types.insert(key, id);
        id
    }

    pub fn lookup_union_of_unions(
        &self,
        a: TypeId,
        b: TypeId,
        reduction: UnionReduction,
        alias: Option<&TypeAlias>,
    ) -> Option<TypeId> {
        let key = (a.min(b), a.max(b), reduction, get_alias_id(alias));
        self.union_of_unions.get(&key).copied()
    }

    pub fn store_union_of_unions(
        &mut self,
        a: TypeId,
        b: TypeId,
        reduction: UnionReduction,
        alias: Option<&TypeAlias>,
        result: TypeId,
    ) {
        let key = (a.min(b), a.max(b), reduction, get_alias_id(alias));
        self.union_of_unions.insert(key, result);
    }

    /// Intersection of already flattened and reduced constituents, order
    /// preserved.
    pub fn intersection_from_list(
        &mut self,
        types: Vec<TypeId>,
        object_flags: ObjectFlags,
        alias: Option<TypeAlias>,
    ) -> TypeId {
        let mut key = get_type_list_id(&types);
        if object_flags.contains(ObjectFlags::IS_CONSTRAINED_TYPE_VARIABLE) {
            key.push('*');
        } else {
            key.push_str(&get_alias_id(alias.as_ref()));
        }
        if let Some(&id) = self.intersection_types.get(&key) {
            return id;
        }
        let object_flags = object_flags | self.propagating_flags_of_types(&types, TypeFlags::NULLABLE);
        let id = self.alloc_with_alias(
            TypeFlags::INTERSECTION,
            object_flags,
            SymbolId::NONE,
            alias,
            TypeData::Intersection(IntersectionType { types, members: None }),
        );
        self.intersection_types.insert(key, id);
        id
    }

    // =========================================================================
    // Index, indexed access and template literal types
    // =========================================================================

    /// Deferred `keyof target`.
    pub fn index_type(&mut self, target: TypeId, index_flags: IndexFlags) -> TypeId {
        let strings_only = index_flags.contains(IndexFlags::STRINGS_ONLY);
        if let Some(&id) = self.index_types.get(&(target, strings_only)) {
            return id;
        }
        let stored = if strings_only {
            IndexFlags::STRINGS_ONLY
        } else {
            IndexFlags::empty()
        };
        let id = self.alloc(
            TypeFlags::INDEX,
            ObjectFlags::empty(),
            SymbolId::NONE,
            TypeData::Index(IndexType {
                target,
                index_flags: stored,
            }),
        );
        self.index_types.insert((target, strings_only), id);
        id
    }

    /// Deferred `object[index]`, keyed by both ids, the persistent access
    /// flags and the alias.
    pub fn indexed_access(
        &mut self,
        object_type: TypeId,
        index_type: TypeId,
        access_flags: AccessFlags,
        alias: Option<TypeAlias>,
    ) -> TypeId {
        let persistent = access_flags & AccessFlags::PERSISTENT;
        let mut key = String::new();
        push_id(&mut key, object_type.0);
        key.push(',');
        push_id(&mut key, index_type.0);
        key.push(',');
        push_id(&mut key, u32::from(persistent.bits()));
        key.push_str(&get_alias_id(alias.as_ref()));
        if let Some(&id) = self.indexed_access_types.get(&key) {
            return id;
        }
        let id = self.alloc_with_alias(
            TypeFlags::INDEXED_ACCESS,
            ObjectFlags::empty(),
            SymbolId::NONE,
            alias,
            TypeData::IndexedAccess(IndexedAccessType {
                object_type,
                index_type,
                access_flags: persistent,
            }),
        );
        self.indexed_access_types.insert(key, id);
        id
    }

    /// Template literal type with `texts.len() == types.len() + 1`.
    pub fn template_literal(&mut self, texts: Vec<String>, types: Vec<TypeId>) -> TypeId {
        let lengths: Vec<String> = texts.iter().map(|t| t.len().to_string()).collect();
        let key = format!("{}|{}|{}", get_type_list_id(&types), lengths.join(","), texts.concat());
        if let Some(&id) = self.template_literal_types.get(&key) {
            return id;
        }
        let id = self.alloc(
            TypeFlags::TEMPLATE_LITERAL,
            ObjectFlags::empty(),
            SymbolId::NONE,
            TypeData::TemplateLiteral(TemplateLiteralType { texts, types }),
        );
        self.template_literal_types.insert(key, id);
        id
    }

    // =========================================================================
    // Object types
    // =========================================================================

    pub fn create_type_parameter(&mut self, symbol: SymbolId) -> TypeId {
        self.alloc(
            TypeFlags::TYPE_PARAMETER,
            ObjectFlags::empty(),
            symbol,
            TypeData::TypeParameter(TypeParameterType::default()),
        )
    }

    /// Anonymous object type; `members` marks it resolved.
    pub fn create_anonymous_type(
        &mut self,
        symbol: SymbolId,
        members: Option<Rc<StructuredMembers>>,
        object_flags: ObjectFlags,
    ) -> TypeId {
        let mut flags = ObjectFlags::ANONYMOUS | object_flags;
        if members.is_some() {
            flags |= ObjectFlags::MEMBERS_RESOLVED;
        }
        self.alloc(
            TypeFlags::OBJECT,
            flags,
            symbol,
            TypeData::Object(ObjectType {
                kind: ObjectKind::Anonymous(AnonymousType::default()),
                members,
            }),
        )
    }

    /// Reference to a generic `target` with resolved type arguments, cached
    /// per target and argument list.
    pub fn create_type_reference(&mut self, target: TypeId, type_arguments: Vec<TypeId>) -> TypeId {
        let key = get_type_list_id(&type_arguments);
        if let Some(&id) = self.instantiations.get(&(target, key.clone())) {
            return id;
        }
        let object_flags =
            ObjectFlags::REFERENCE | self.propagating_flags_of_types(&type_arguments, TypeFlags::empty());
        let symbol = self.symbol(target);
        let id = self.alloc(
            TypeFlags::OBJECT,
            object_flags,
            symbol,
            TypeData::Object(ObjectType {
                kind: ObjectKind::Reference(TypeReference {
                    target,
                    resolved_type_arguments: Some(type_arguments),
                    node: NodeIndex::NONE,
                    mapper: None,
                }),
                members: None,
            }),
        );
        self.instantiations.insert((target, key), id);
        id
    }

    /// Reference whose type arguments are resolved from `node` on demand.
    pub fn create_deferred_type_reference(
        &mut self,
        target: TypeId,
        node: NodeIndex,
        mapper: Option<Rc<TypeMapper>>,
        alias: Option<TypeAlias>,
    ) -> TypeId {
        let symbol = self.symbol(target);
        self.alloc_with_alias(
            TypeFlags::OBJECT,
            ObjectFlags::REFERENCE,
            symbol,
            alias,
            TypeData::Object(ObjectType {
                kind: ObjectKind::Reference(TypeReference {
                    target,
                    resolved_type_arguments: None,
                    node,
                    mapper,
                }),
                members: None,
            }),
        )
    }

    /// Cached instantiation of `target` for an argument key.
    pub fn lookup_instantiation(&self, target: TypeId, key: &str) -> Option<TypeId> {
        self.instantiations.get(&(target, key.to_string())).copied()
    }

    pub fn store_instantiation(&mut self, target: TypeId, key: String, result: TypeId) {
        self.instantiations.insert((target, key), result);
    }

    /// Key of a tuple target: one character per element kind, readonly and
    /// label declarations.
    pub fn tuple_target_key(element_flags: &[ElementFlags], readonly: bool, labels: Option<&[NodeIndex]>) -> String {
        let mut key: String = element_flags
            .iter()
            .map(|f| {
                if f.contains(ElementFlags::REQUIRED) {
                    '#'
                } else if f.contains(ElementFlags::OPTIONAL) {
                    '?'
                } else if f.contains(ElementFlags::REST) {
                    '.'
                } else {
                    '*'
                }
            })
            .collect();
        if readonly {
            key.push('R');
        }
        if let Some(labels) = labels {
            for label in labels {
                key.push(',');
                if label.is_some() {
                    push_id(&mut key, label.0);
                } else {
                    key.push('_');
                }
            }
        }
        key
    }

    pub fn lookup_tuple_target(&self, key: &str) -> Option<TypeId> {
        self.tuple_targets.get(key).copied()
    }

    pub fn store_tuple_target(&mut self, key: String, target: TypeId) {
        self.tuple_targets.insert(key, target);
    }

    /// Cache key of an intersection of `types`, shared by every way an
    /// intersection is built.
    pub fn intersection_key(types: &[TypeId], alias: Option<&TypeAlias>) -> String {
        let mut key = get_type_list_id(types);
        key.push_str(&get_alias_id(alias));
        key
    }

    pub fn lookup_intersection(&self, key: &str) -> Option<TypeId> {
        self.intersection_types.get(key).copied()
    }

    pub fn store_intersection(&mut self, key: String, t: TypeId) {
        self.intersection_types.insert(key, t);
    }
}

#[cfg(test)]
#[path = "tests/interner_tests.rs"]
mod tests;
