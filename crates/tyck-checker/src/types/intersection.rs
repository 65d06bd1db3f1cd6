//! Intersection construction: flattening, annihilation to `never`,
//! supertype removal and distribution over union constituents.

use tracing::{debug, trace};
use tyck_binder::symbol_flags;
use tyck_common::diagnostics::diagnostic_codes;
use tyck_common::limits::{INTERSECTION_BISECT_THRESHOLD, MAX_CROSS_PRODUCT_SIZE};
use tyck_types::{
    IntersectionType, ObjectFlags, TypeAlias, TypeData, TypeFlags, TypeId, TypeInterner, UnionReduction,
};

use crate::state::CheckerState;
use crate::types::union::insert_type;

/// Members that can never be `null` or `undefined`.
const DEFINITELY_NON_NULLABLE: TypeFlags = TypeFlags::STRING_LIKE
    .union(TypeFlags::NUMBER_LIKE)
    .union(TypeFlags::BIG_INT_LIKE)
    .union(TypeFlags::BOOLEAN_LIKE)
    .union(TypeFlags::ENUM_LIKE)
    .union(TypeFlags::ES_SYMBOL_LIKE)
    .union(TypeFlags::OBJECT)
    .union(TypeFlags::NON_PRIMITIVE);

impl<'a> CheckerState<'a> {
    pub fn get_intersection_type(&mut self, types: &[TypeId]) -> TypeId {
        self.get_intersection_type_ex(types, None)
    }

    pub fn get_intersection_type_ex(&mut self, types: &[TypeId], alias: Option<TypeAlias>) -> TypeId {
        let mut type_set: Vec<TypeId> = Vec::with_capacity(types.len());
        let includes = self.add_types_to_intersection(&mut type_set, TypeFlags::empty(), types);

        if includes.contains(TypeFlags::NEVER) {
            return if type_set.contains(&TypeId::SILENT_NEVER) {
                TypeId::SILENT_NEVER
            } else {
                TypeId::NEVER
            };
        }
        if self.intersection_includes_disjoint_domains(includes) {
            return TypeId::NEVER;
        }
        if includes.contains(TypeFlags::ANY) {
            return if includes.contains(TypeFlags::INCLUDES_WILDCARD) {
                TypeId::WILDCARD
            } else if includes.contains(TypeFlags::INCLUDES_ERROR) {
                TypeId::ERROR
            } else {
                TypeId::ANY
            };
        }
        if !self.ctx.strict_null_checks() && includes.intersects(TypeFlags::NULLABLE) {
            return if includes.contains(TypeFlags::INCLUDES_EMPTY_OBJECT) {
                TypeId::NEVER
            } else if includes.contains(TypeFlags::UNDEFINED) {
                TypeId::UNDEFINED
            } else {
                TypeId::NULL
            };
        }
        if (includes.contains(TypeFlags::STRING)
            && includes.intersects(TypeFlags::STRING_LITERAL | TypeFlags::TEMPLATE_LITERAL | TypeFlags::STRING_MAPPING))
            || includes.contains(TypeFlags::NUMBER | TypeFlags::NUMBER_LITERAL)
            || includes.contains(TypeFlags::BIG_INT | TypeFlags::BIG_INT_LITERAL)
            || includes.contains(TypeFlags::ES_SYMBOL | TypeFlags::UNIQUE_ES_SYMBOL)
            || includes.contains(TypeFlags::VOID | TypeFlags::UNDEFINED)
            || (includes.contains(TypeFlags::INCLUDES_EMPTY_OBJECT) && includes.intersects(DEFINITELY_NON_NULLABLE))
        {
            self.remove_redundant_supertypes(&mut type_set, includes);
        }
        if includes.contains(TypeFlags::INCLUDES_MISSING_TYPE)
            && let Some(slot) = type_set.iter_mut().find(|t| **t == TypeId::UNDEFINED)
        {
            *slot = TypeId::MISSING;
        }
        match type_set.len() {
            0 => return TypeId::UNKNOWN,
            1 => return type_set[0],
            _ => {}
        }

        let mut object_flags = ObjectFlags::empty();
        if type_set.len() == 2 {
            match self.reduce_constrained_type_variable(&type_set, includes) {
                ConstrainedReduction::Variable(variable) => return variable,
                ConstrainedReduction::Never => return TypeId::NEVER,
                ConstrainedReduction::Constrained => object_flags |= ObjectFlags::IS_CONSTRAINED_TYPE_VARIABLE,
                ConstrainedReduction::None => {}
            }
        }

        if !includes.contains(TypeFlags::UNION) {
            return self.ctx.types.intersection_from_list(type_set, object_flags, alias);
        }
        let key = TypeInterner::intersection_key(&type_set, alias.as_ref());
        if let Some(cached) = self.ctx.types.lookup_intersection(&key) {
            return cached;
        }
        if self.intersect_unions_of_primitive_types(&mut type_set) {
            let result = self.get_intersection_type_ex(&type_set, alias);
            self.ctx.types.store_intersection(key, result);
            return result;
        }
        if type_set.len() >= INTERSECTION_BISECT_THRESHOLD {
            let middle = type_set.len() / 2;
            let left = self.get_intersection_type(&type_set[..middle]);
            let right = self.get_intersection_type(&type_set[middle..]);
            let result = self.get_intersection_type_ex(&[left, right], alias);
            self.ctx.types.store_intersection(key, result);
            return result;
        }
        if !self.check_cross_product_union(&type_set) {
            return TypeId::ERROR;
        }
        let constituents = self.get_cross_product_intersections(&type_set);
        let constituent_count = |s: &Self, list: &[TypeId]| -> usize {
            list.iter()
                .map(|&t| {
                    if s.type_flags(t).intersects(TypeFlags::UNION_OR_INTERSECTION) {
                        s.ty(t).constituents().len()
                    } else {
                        1
                    }
                })
                .sum()
        };
        let origin = if constituents
            .iter()
            .any(|&t| self.type_flags(t).contains(TypeFlags::INTERSECTION))
            && constituent_count(self, &constituents) > constituent_count(self, &type_set)
        {
            Some(self.create_origin_intersection(type_set))
        } else {
            None
        };
        let result = self.get_union_type_ex(&constituents, UnionReduction::Literal, alias, origin);
        trace!(key = %key, result = result.0, "distributed intersection");
        self.ctx.types.store_intersection(key, result);
        result
    }

    fn add_types_to_intersection(&mut self, type_set: &mut Vec<TypeId>, mut includes: TypeFlags, types: &[TypeId]) -> TypeFlags {
        for &t in types {
            includes = self.add_type_to_intersection(type_set, includes, t);
        }
        includes
    }

    fn add_type_to_intersection(&mut self, type_set: &mut Vec<TypeId>, mut includes: TypeFlags, t: TypeId) -> TypeFlags {
        let flags = self.type_flags(t);
        if flags.contains(TypeFlags::INTERSECTION) {
            let constituents = self.ty(t).constituents().to_vec();
            return self.add_types_to_intersection(type_set, includes, &constituents);
        }
        if self.is_empty_anonymous_object_type(t) {
            if !includes.contains(TypeFlags::INCLUDES_EMPTY_OBJECT) {
                includes |= TypeFlags::INCLUDES_EMPTY_OBJECT;
                type_set.push(t);
            }
            return includes;
        }
        let mut t = t;
        if flags.intersects(TypeFlags::ANY_OR_UNKNOWN) {
            if t == TypeId::WILDCARD {
                includes |= TypeFlags::INCLUDES_WILDCARD;
            }
            if t.is_error() {
                includes |= TypeFlags::INCLUDES_ERROR;
            }
        } else if self.ctx.strict_null_checks() || !flags.intersects(TypeFlags::NULLABLE) {
            if t == TypeId::MISSING {
                includes |= TypeFlags::INCLUDES_MISSING_TYPE;
                t = TypeId::UNDEFINED;
            }
            if !type_set.contains(&t) {
                // Two distinct unit types never overlap.
                if flags.intersects(TypeFlags::UNIT) && includes.intersects(TypeFlags::UNIT) {
                    includes |= TypeFlags::NON_PRIMITIVE;
                }
                type_set.push(t);
            }
        }
        includes | (flags & TypeFlags::INCLUDES_MASK)
    }

    fn intersection_includes_disjoint_domains(&self, includes: TypeFlags) -> bool {
        let domains = TypeFlags::DISJOINT_DOMAINS;
        let conflicts = |family: TypeFlags| includes.intersects(family) && includes.intersects(domains - family);
        (self.ctx.strict_null_checks()
            && includes.intersects(TypeFlags::NULLABLE)
            && includes.intersects(TypeFlags::OBJECT | TypeFlags::NON_PRIMITIVE | TypeFlags::INCLUDES_EMPTY_OBJECT))
            || conflicts(TypeFlags::NON_PRIMITIVE)
            || conflicts(TypeFlags::STRING_LIKE)
            || conflicts(TypeFlags::NUMBER_LIKE)
            || conflicts(TypeFlags::BIG_INT_LIKE)
            || conflicts(TypeFlags::ES_SYMBOL_LIKE)
            || conflicts(TypeFlags::VOID_LIKE)
    }

    fn remove_redundant_supertypes(&self, types: &mut Vec<TypeId>, includes: TypeFlags) {
        types.retain(|&t| {
            let flags = self.type_flags(t);
            let remove = (flags.contains(TypeFlags::STRING)
                && includes.intersects(TypeFlags::STRING_LITERAL | TypeFlags::TEMPLATE_LITERAL | TypeFlags::STRING_MAPPING))
                || (flags.contains(TypeFlags::NUMBER) && includes.contains(TypeFlags::NUMBER_LITERAL))
                || (flags.contains(TypeFlags::BIG_INT) && includes.contains(TypeFlags::BIG_INT_LITERAL))
                || (flags.contains(TypeFlags::ES_SYMBOL) && includes.contains(TypeFlags::UNIQUE_ES_SYMBOL))
                || (flags.contains(TypeFlags::VOID) && includes.contains(TypeFlags::UNDEFINED))
                || (self.is_empty_anonymous_object_type(t) && includes.intersects(DEFINITELY_NON_NULLABLE));
            !remove
        });
    }

    /// `{}` written as a type literal, or an anonymous type with no members.
    pub(crate) fn is_empty_anonymous_object_type(&self, t: TypeId) -> bool {
        if !self.object_flags(t).contains(ObjectFlags::ANONYMOUS) {
            return false;
        }
        if let Some(members) = self.ty(t).resolved_members() {
            return members.is_empty();
        }
        let symbol = self.ty(t).symbol;
        symbol.is_some()
            && self.symbol_flags_raw(symbol) & symbol_flags::TYPE_LITERAL != 0
            && self.symbol(symbol).members.as_ref().is_none_or(|m| m.is_empty())
    }

    /// `T & P` where `T` is a type variable whose constraint is made of
    /// primitives.
    fn reduce_constrained_type_variable(&mut self, type_set: &[TypeId], includes: TypeFlags) -> ConstrainedReduction {
        let variable_index = if self.type_flags(type_set[0]).intersects(TypeFlags::TYPE_VARIABLE) { 0 } else { 1 };
        let variable = type_set[variable_index];
        let primitive = type_set[1 - variable_index];
        if !self.type_flags(variable).intersects(TypeFlags::TYPE_VARIABLE) {
            return ConstrainedReduction::None;
        }
        let primitive_flags = self.type_flags(primitive);
        let primitive_like = primitive_flags.intersects(TypeFlags::PRIMITIVE | TypeFlags::NON_PRIMITIVE)
            && !primitive_flags.intersects(TypeFlags::TEMPLATE_LITERAL | TypeFlags::STRING_MAPPING);
        if !primitive_like && !includes.contains(TypeFlags::INCLUDES_EMPTY_OBJECT) {
            return ConstrainedReduction::None;
        }
        let Some(constraint) = self.get_base_constraint_of_type(variable) else {
            return ConstrainedReduction::None;
        };
        let constraint_types = self.union_constituents(constraint);
        let all_primitive = constraint_types.iter().all(|&c| {
            self.type_flags(c).intersects(TypeFlags::PRIMITIVE | TypeFlags::NON_PRIMITIVE)
                || self.is_empty_anonymous_object_type(c)
        });
        if !all_primitive {
            return ConstrainedReduction::None;
        }
        if self.is_type_strict_subtype_of(constraint, primitive) {
            return ConstrainedReduction::Variable(variable);
        }
        let some_constituent_fits = self.type_flags(constraint).contains(TypeFlags::UNION)
            && constraint_types
                .iter()
                .any(|&c| self.is_type_strict_subtype_of(c, primitive));
        if !some_constituent_fits && !self.is_type_strict_subtype_of(primitive, constraint) {
            return ConstrainedReduction::Never;
        }
        ConstrainedReduction::Constrained
    }

    /// Intersect unions of primitive unit types constituent-wise and replace
    /// them by the single union of the common members.
    fn intersect_unions_of_primitive_types(&mut self, types: &mut Vec<TypeId>) -> bool {
        let union_positions: Vec<usize> = types
            .iter()
            .enumerate()
            .filter(|&(_, &t)| self.object_flags(t).contains(ObjectFlags::PRIMITIVE_UNION))
            .map(|(i, _)| i)
            .collect();
        if union_positions.len() < 2 {
            return false;
        }
        let unions: Vec<Vec<TypeId>> = union_positions
            .iter()
            .map(|&i| self.ty(types[i]).constituents().to_vec())
            .collect();
        let mut checked: Vec<TypeId> = Vec::new();
        for &t in &unions[0] {
            if unions[1..].iter().all(|u| self.union_contains(u, t)) {
                insert_type(&mut checked, t);
            }
        }
        let first = union_positions[0];
        for &position in union_positions[1..].iter().rev() {
            types.remove(position);
        }
        types[first] = if checked.is_empty() {
            TypeId::NEVER
        } else {
            self.get_union_type_ex(&checked, UnionReduction::None, None, None)
        };
        trace!(kept = checked.len(), "intersected primitive unions");
        true
    }

    fn union_contains(&self, union: &[TypeId], t: TypeId) -> bool {
        if union.contains(&t) {
            return true;
        }
        match t {
            TypeId::MISSING => return union.contains(&TypeId::UNDEFINED),
            TypeId::UNDEFINED => return union.contains(&TypeId::MISSING),
            _ => {}
        }
        let flags = self.type_flags(t);
        let primitive = if flags.contains(TypeFlags::STRING_LITERAL) {
            TypeId::STRING
        } else if flags.intersects(TypeFlags::ENUM | TypeFlags::NUMBER_LITERAL) {
            TypeId::NUMBER
        } else if flags.contains(TypeFlags::BIG_INT_LITERAL) {
            TypeId::BIGINT
        } else if flags.contains(TypeFlags::UNIQUE_ES_SYMBOL) {
            TypeId::SYMBOL
        } else {
            return false;
        };
        union.contains(&primitive)
    }

    fn cross_product_union_size(&self, types: &[TypeId]) -> usize {
        types.iter().fold(1usize, |size, &t| {
            if self.type_flags(t).contains(TypeFlags::UNION) {
                size.saturating_mul(self.ty(t).constituents().len())
            } else if self.type_flags(t).contains(TypeFlags::NEVER) {
                0
            } else {
                size
            }
        })
    }

    fn check_cross_product_union(&mut self, types: &[TypeId]) -> bool {
        let size = self.cross_product_union_size(types);
        if size >= MAX_CROSS_PRODUCT_SIZE {
            debug!(size, "cross product too large");
            self.error_at_current_node(diagnostic_codes::UNION_TYPE_TOO_COMPLEX, &[]);
            return false;
        }
        true
    }

    fn get_cross_product_intersections(&mut self, types: &[TypeId]) -> Vec<TypeId> {
        let count = self.cross_product_union_size(types);
        let mut intersections = Vec::with_capacity(count);
        for i in 0..count {
            let mut constituents = types.to_vec();
            let mut n = i;
            for j in (0..types.len()).rev() {
                if self.type_flags(types[j]).contains(TypeFlags::UNION) {
                    let source = self.ty(types[j]).constituents();
                    constituents[j] = source[n % source.len()];
                    n /= source.len();
                }
            }
            let t = self.get_intersection_type(&constituents);
            if !self.type_flags(t).contains(TypeFlags::NEVER) {
                intersections.push(t);
            }
        }
        intersections
    }

    fn create_origin_intersection(&mut self, types: Vec<TypeId>) -> TypeId {
        self.ctx.types.alloc(
            TypeFlags::INTERSECTION,
            ObjectFlags::empty(),
            tyck_binder::SymbolId::NONE,
            TypeData::Intersection(IntersectionType { types, members: None }),
        )
    }
}

enum ConstrainedReduction {
    None,
    /// The constraint already implies the primitive.
    Variable(TypeId),
    Never,
    Constrained,
}

#[cfg(test)]
#[path = "../tests/intersection_tests.rs"]
mod tests;
