//! Union construction and reduction.
//!
//! Constituents are flattened and kept sorted by id, so equal unions share a
//! cache key. The `includes` flags gathered while flattening decide which
//! reductions run: `any`/`unknown` dominance, literal absorption by base
//! primitives, template literal matching, constrained type variables and,
//! on request, subtype reduction.

use tracing::{debug, trace};
use tyck_common::diagnostics::diagnostic_codes;
use tyck_common::limits::MAX_SUBTYPE_REDUCTION_CHECKS;
use tyck_types::{
    ObjectFlags, TypeAlias, TypeData, TypeFlags, TypeId, UnionReduction, UnionType, get_type_list_id,
};

use crate::relation::RelationKind;
use crate::state::CheckerState;

impl<'a> CheckerState<'a> {
    /// Union with literal reduction.
    pub fn get_union_type(&mut self, types: &[TypeId]) -> TypeId {
        self.get_union_type_ex(types, UnionReduction::Literal, None, None)
    }

    pub fn get_union_type_ex(
        &mut self,
        types: &[TypeId],
        reduction: UnionReduction,
        alias: Option<TypeAlias>,
        origin: Option<TypeId>,
    ) -> TypeId {
        match types {
            [] => return TypeId::NEVER,
            [single] => return *single,
            _ => {}
        }
        if let [a, b] = *types
            && origin.is_none()
            && (self.type_flags(a).contains(TypeFlags::UNION) || self.type_flags(b).contains(TypeFlags::UNION))
        {
            if let Some(cached) = self.ctx.types.lookup_union_of_unions(a, b, reduction, alias.as_ref()) {
                return cached;
            }
            let result = self.get_union_type_worker(types, reduction, alias.clone(), None);
            self.ctx
                .types
                .store_union_of_unions(a, b, reduction, alias.as_ref(), result);
            return result;
        }
        self.get_union_type_worker(types, reduction, alias, origin)
    }

    fn get_union_type_worker(
        &mut self,
        types: &[TypeId],
        reduction: UnionReduction,
        alias: Option<TypeAlias>,
        mut origin: Option<TypeId>,
    ) -> TypeId {
        let mut type_set: Vec<TypeId> = Vec::with_capacity(types.len());
        let includes = self.add_types_to_union(&mut type_set, TypeFlags::empty(), types);

        if reduction != UnionReduction::None {
            if includes.intersects(TypeFlags::ANY_OR_UNKNOWN) {
                return if includes.contains(TypeFlags::ANY) {
                    if includes.contains(TypeFlags::INCLUDES_WILDCARD) {
                        TypeId::WILDCARD
                    } else if includes.contains(TypeFlags::INCLUDES_ERROR) {
                        TypeId::ERROR
                    } else {
                        TypeId::ANY
                    }
                } else {
                    TypeId::UNKNOWN
                };
            }
            if includes.contains(TypeFlags::UNDEFINED)
                && type_set.contains(&TypeId::MISSING)
                && (type_set.contains(&TypeId::UNDEFINED) || type_set.contains(&TypeId::UNDEFINED_WIDENING))
            {
                type_set.retain(|&t| t != TypeId::MISSING);
            }
            if includes.intersects(
                TypeFlags::ENUM
                    | TypeFlags::LITERAL
                    | TypeFlags::UNIQUE_ES_SYMBOL
                    | TypeFlags::TEMPLATE_LITERAL
                    | TypeFlags::STRING_MAPPING,
            ) || includes.contains(TypeFlags::VOID | TypeFlags::UNDEFINED)
            {
                self.remove_redundant_literal_types(&mut type_set, includes, reduction == UnionReduction::Subtype);
            }
            if includes.contains(TypeFlags::STRING_LITERAL | TypeFlags::TEMPLATE_LITERAL) {
                self.remove_string_literals_matched_by_template_literals(&mut type_set);
            }
            if includes.contains(TypeFlags::INCLUDES_CONSTRAINED_TYPE_VARIABLE) {
                self.remove_constrained_type_variables(&mut type_set);
            }
            if reduction == UnionReduction::Subtype {
                match self.remove_subtypes(type_set, includes.contains(TypeFlags::OBJECT)) {
                    Some(reduced) => type_set = reduced,
                    None => return TypeId::ERROR,
                }
            }
            if type_set.is_empty() {
                let non_widening = includes.contains(TypeFlags::INCLUDES_NON_WIDENING_TYPE);
                return if includes.contains(TypeFlags::NULL) {
                    if non_widening { TypeId::NULL } else { TypeId::NULL_WIDENING }
                } else if includes.contains(TypeFlags::UNDEFINED) {
                    if non_widening {
                        TypeId::UNDEFINED
                    } else {
                        TypeId::UNDEFINED_WIDENING
                    }
                } else {
                    TypeId::NEVER
                };
            }
        }

        if origin.is_none() && includes.contains(TypeFlags::UNION) {
            let mut named_unions: Vec<TypeId> = Vec::new();
            self.add_named_unions(&mut named_unions, types);
            let mut reduced: Vec<TypeId> = type_set
                .iter()
                .copied()
                .filter(|t| {
                    !named_unions
                        .iter()
                        .any(|&u| self.ty(u).constituents().binary_search(t).is_ok())
                })
                .collect();
            if alias.is_none() && named_unions.len() == 1 && reduced.is_empty() {
                return named_unions[0];
            }
            let named_count: usize = named_unions.iter().map(|&u| self.ty(u).constituents().len()).sum();
            if named_count + reduced.len() == type_set.len() {
                for &named in &named_unions {
                    insert_type(&mut reduced, named);
                }
                origin = Some(self.create_origin_union(reduced));
            }
        }

        let mut object_flags = ObjectFlags::empty();
        if !includes.intersects(TypeFlags::NOT_PRIMITIVE_UNION) {
            object_flags |= ObjectFlags::PRIMITIVE_UNION;
        }
        if includes.contains(TypeFlags::INTERSECTION) {
            object_flags |= ObjectFlags::CONTAINS_INTERSECTIONS;
        }
        trace!(count = type_set.len(), ?reduction, "union built");
        self.ctx
            .types
            .union_from_sorted_list(type_set, object_flags, alias, origin)
    }

    fn add_types_to_union(&mut self, type_set: &mut Vec<TypeId>, mut includes: TypeFlags, types: &[TypeId]) -> TypeFlags {
        let mut last: Option<TypeId> = None;
        for &t in types {
            if last != Some(t) {
                includes = self.add_type_to_union(type_set, includes, t);
                last = Some(t);
            }
        }
        includes
    }

    fn add_type_to_union(&mut self, type_set: &mut Vec<TypeId>, mut includes: TypeFlags, t: TypeId) -> TypeFlags {
        let flags = self.type_flags(t);
        if flags.contains(TypeFlags::UNION) {
            if self.is_named_union_type(t) {
                includes |= TypeFlags::UNION;
            }
            let constituents = self.ty(t).constituents().to_vec();
            return self.add_types_to_union(type_set, includes, &constituents);
        }
        if flags.contains(TypeFlags::NEVER) {
            return includes;
        }
        includes |= flags & TypeFlags::INCLUDES_MASK;
        if flags.intersects(TypeFlags::INSTANTIABLE) {
            includes |= TypeFlags::INCLUDES_INSTANTIABLE;
        }
        if flags.contains(TypeFlags::INTERSECTION)
            && self.object_flags(t).contains(ObjectFlags::IS_CONSTRAINED_TYPE_VARIABLE)
        {
            includes |= TypeFlags::INCLUDES_CONSTRAINED_TYPE_VARIABLE;
        }
        if t == TypeId::WILDCARD {
            includes |= TypeFlags::INCLUDES_WILDCARD;
        }
        if t.is_error() {
            includes |= TypeFlags::INCLUDES_ERROR;
        }
        if !self.ctx.strict_null_checks() && flags.intersects(TypeFlags::NULLABLE) {
            if !self.object_flags(t).contains(ObjectFlags::CONTAINS_WIDENING_TYPE) {
                includes |= TypeFlags::INCLUDES_NON_WIDENING_TYPE;
            }
            return includes;
        }
        let t = match t {
            TypeId::UNDEFINED_WIDENING => TypeId::UNDEFINED,
            TypeId::NULL_WIDENING => TypeId::NULL,
            other => other,
        };
        insert_type(type_set, t);
        includes
    }

    /// Union with an alias or a denormalized origin.
    pub(crate) fn is_named_union_type(&self, t: TypeId) -> bool {
        let ty = self.ty(t);
        matches!(&ty.data, TypeData::Union(u) if ty.alias.is_some() || u.origin.is_some())
    }

    fn add_named_unions(&self, named: &mut Vec<TypeId>, types: &[TypeId]) {
        for &t in types {
            if !self.type_flags(t).contains(TypeFlags::UNION) {
                continue;
            }
            if self.is_named_union_type(t) {
                if !named.contains(&t) {
                    named.push(t);
                }
                continue;
            }
            let nested = self.ty(t).constituents().to_vec();
            self.add_named_unions(named, &nested);
        }
    }

    /// Uninterned union kept only as the display form of another union.
    fn create_origin_union(&mut self, types: Vec<TypeId>) -> TypeId {
        self.ctx.types.alloc(
            TypeFlags::UNION,
            ObjectFlags::empty(),
            tyck_binder::SymbolId::NONE,
            TypeData::Union(UnionType {
                types,
                origin: None,
                members: None,
            }),
        )
    }

    fn remove_redundant_literal_types(&self, types: &mut Vec<TypeId>, includes: TypeFlags, reduce_void_undefined: bool) {
        let snapshot = types.clone();
        types.retain(|&t| {
            let flags = self.type_flags(t);
            let remove = (flags.intersects(TypeFlags::STRING_LITERAL | TypeFlags::TEMPLATE_LITERAL | TypeFlags::STRING_MAPPING)
                && includes.contains(TypeFlags::STRING))
                || (flags.contains(TypeFlags::NUMBER_LITERAL) && includes.contains(TypeFlags::NUMBER))
                || (flags.contains(TypeFlags::BIG_INT_LITERAL) && includes.contains(TypeFlags::BIG_INT))
                || (flags.contains(TypeFlags::UNIQUE_ES_SYMBOL) && includes.contains(TypeFlags::ES_SYMBOL))
                || (reduce_void_undefined && flags.contains(TypeFlags::UNDEFINED) && includes.contains(TypeFlags::VOID))
                || (self.ctx.types.is_fresh_literal(t)
                    && snapshot.binary_search(&self.ctx.types.regular_type_of(t)).is_ok());
            !remove
        });
    }

    fn remove_string_literals_matched_by_template_literals(&self, types: &mut Vec<TypeId>) {
        let templates: Vec<TypeId> = types
            .iter()
            .copied()
            .filter(|&t| self.type_flags(t).contains(TypeFlags::TEMPLATE_LITERAL))
            .collect();
        types.retain(|&t| {
            let Some(text) = self.string_literal_value(t) else {
                return true;
            };
            !templates
                .iter()
                .any(|&template| self.is_string_matched_by_template_literal(&text, template))
        });
    }

    /// Replace `T & P1 | T & P2 | ...` by `T` when the primitives cover the
    /// constraint of `T`.
    fn remove_constrained_type_variables(&mut self, types: &mut Vec<TypeId>) {
        let mut type_variables: Vec<TypeId> = Vec::new();
        for &t in types.iter() {
            if let Some((variable, _)) = self.split_constrained_type_variable(t)
                && !type_variables.contains(&variable)
            {
                type_variables.push(variable);
            }
        }
        for variable in type_variables {
            let mut primitives: Vec<TypeId> = Vec::new();
            for &t in types.iter() {
                if let Some((v, primitive)) = self.split_constrained_type_variable(t)
                    && v == variable
                {
                    insert_type(&mut primitives, primitive);
                }
            }
            let Some(constraint) = self.get_base_constraint_of_type(variable) else {
                continue;
            };
            let constraint_types = self.union_constituents(constraint);
            if constraint_types.iter().all(|t| primitives.binary_search(t).is_ok()) {
                let kept: Vec<TypeId> = types
                    .iter()
                    .copied()
                    .filter(|&t| match self.split_constrained_type_variable(t) {
                        Some((v, primitive)) => !(v == variable && primitives.binary_search(&primitive).is_ok()),
                        None => true,
                    })
                    .collect();
                *types = kept;
                insert_type(types, variable);
            }
        }
    }

    fn split_constrained_type_variable(&self, t: TypeId) -> Option<(TypeId, TypeId)> {
        if !self.object_flags(t).contains(ObjectFlags::IS_CONSTRAINED_TYPE_VARIABLE) {
            return None;
        }
        let &[first, second] = self.ty(t).constituents() else {
            return None;
        };
        if self.type_flags(first).intersects(TypeFlags::TYPE_VARIABLE) {
            Some((first, second))
        } else {
            Some((second, first))
        }
    }

    /// Drop constituents that are strict subtypes of another constituent.
    /// Gives up with a 2590 diagnostic when the estimated number of
    /// comparisons passes the limit.
    fn remove_subtypes(&mut self, mut types: Vec<TypeId>, has_object_types: bool) -> Option<Vec<TypeId>> {
        if types.len() < 2 {
            return Some(types);
        }
        let key = get_type_list_id(&types);
        if let Some(cached) = self.ctx.subtype_reduction_cache.get(&key) {
            return Some(cached.clone());
        }
        let has_empty_object = has_object_types
            && types.clone().into_iter().any(|t| {
                self.type_flags(t).contains(TypeFlags::OBJECT)
                    && !self.is_generic_mapped_type(t)
                    && self.resolve_structured_type_members(t).is_empty()
            });
        let len = types.len();
        let mut count: u64 = 0;
        let mut i = len;
        while i > 0 {
            i -= 1;
            let source = types[i];
            if !has_empty_object && !self.type_flags(source).intersects(TypeFlags::STRUCTURED_OR_INSTANTIABLE) {
                continue;
            }
            for j in 0..types.len() {
                let target = types[j];
                if source == target {
                    continue;
                }
                if count == 100_000 {
                    let estimated = count / (len - i) as u64 * len as u64;
                    if estimated > MAX_SUBTYPE_REDUCTION_CHECKS {
                        debug!(estimated, "subtype reduction abandoned");
                        self.error_at_current_node(diagnostic_codes::UNION_TYPE_TOO_COMPLEX, &[]);
                        return None;
                    }
                }
                count += 1;
                if self.is_type_related_to(source, target, RelationKind::StrictSubtype)
                    && (!self.object_flags(self.get_target_type(source)).contains(ObjectFlags::CLASS)
                        || !self.object_flags(self.get_target_type(target)).contains(ObjectFlags::CLASS)
                        || self.is_type_derived_from(source, target))
                {
                    types.remove(i);
                    break;
                }
            }
        }
        self.ctx.subtype_reduction_cache.insert(key, types.clone());
        Some(types)
    }

    /// Constituents of a union, or the type itself.
    pub(crate) fn union_constituents(&self, t: TypeId) -> Vec<TypeId> {
        if self.type_flags(t).contains(TypeFlags::UNION) {
            self.ty(t).constituents().to_vec()
        } else {
            vec![t]
        }
    }

    /// Map every constituent of a union; other types are mapped directly.
    /// `never` maps to itself.
    pub(crate) fn map_type(&mut self, t: TypeId, mut f: impl FnMut(&mut Self, TypeId) -> Option<TypeId>) -> TypeId {
        let flags = self.type_flags(t);
        if flags.contains(TypeFlags::NEVER) {
            return t;
        }
        if !flags.contains(TypeFlags::UNION) {
            return f(self, t).unwrap_or(TypeId::NEVER);
        }
        let constituents = self.ty(t).constituents().to_vec();
        let mut mapped = Vec::with_capacity(constituents.len());
        let mut changed = false;
        for c in constituents {
            match f(self, c) {
                Some(m) => {
                    changed |= m != c;
                    mapped.push(m);
                }
                None => changed = true,
            }
        }
        if changed { self.get_union_type(&mapped) } else { t }
    }

    /// Remove constituents for which `keep` is false.
    pub(crate) fn filter_type(&mut self, t: TypeId, mut keep: impl FnMut(&mut Self, TypeId) -> bool) -> TypeId {
        if !self.type_flags(t).contains(TypeFlags::UNION) {
            return if keep(self, t) { t } else { TypeId::NEVER };
        }
        let constituents = self.ty(t).constituents().to_vec();
        let kept: Vec<TypeId> = constituents.iter().copied().filter(|&c| keep(self, c)).collect();
        if kept.len() == constituents.len() {
            return t;
        }
        self.ctx
            .types
            .union_from_sorted_list(kept, ObjectFlags::empty(), None, None)
    }

    /// Add `undefined` to a type under strict null checks.
    pub(crate) fn get_optional_type(&mut self, t: TypeId, is_property: bool) -> TypeId {
        if !self.ctx.strict_null_checks() {
            return t;
        }
        let missing = if is_property { TypeId::MISSING } else { TypeId::UNDEFINED };
        if t == missing || self.union_constituents(t).contains(&missing) {
            return t;
        }
        self.get_union_type(&[t, missing])
    }

    /// Remove `undefined` (and the missing type) from a type.
    pub(crate) fn remove_missing_or_undefined_type(&mut self, t: TypeId) -> TypeId {
        self.filter_type(t, |s, c| !s.type_flags(c).contains(TypeFlags::UNDEFINED))
    }

    pub(crate) fn get_non_nullable_type(&mut self, t: TypeId) -> TypeId {
        if !self.ctx.strict_null_checks() {
            return t;
        }
        self.filter_type(t, |s, c| !s.type_flags(c).intersects(TypeFlags::NULLABLE))
    }
}

/// Sorted insert that keeps `types` free of duplicates.
pub(crate) fn insert_type(types: &mut Vec<TypeId>, t: TypeId) {
    if let Err(index) = types.binary_search(&t) {
        types.insert(index, t);
    }
}

#[cfg(test)]
#[path = "../tests/union_tests.rs"]
mod tests;
