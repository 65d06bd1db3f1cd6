//! `keyof T`, `T[K]` and template literal types.
//!
//! Indexed access is deferred while the index is generic, or while the
//! object is generic and the access is not a fixed tuple position. Eager
//! accesses resolve a literal index to the exact property, a tuple
//! position to its element and anything else through the applicable index
//! info.

use tracing::trace;
use tyck_binder::{NodeIndex, NodeKind};
use tyck_common::diagnostics::diagnostic_codes;
use tyck_types::{
    AccessFlags, ElementFlags, IndexFlags, ObjectFlags, TypeAlias, TypeData, TypeFlags, TypeId,
};

use crate::state::CheckerState;

impl<'a> CheckerState<'a> {
    // =========================================================================
    // keyof
    // =========================================================================

    /// `keyof t`.
    pub fn get_index_type(&mut self, t: TypeId, index_flags: IndexFlags) -> TypeId {
        let flags = self.type_flags(t);
        if flags.contains(TypeFlags::UNION) {
            let types = self.ty(t).constituents().to_vec();
            let keys: Vec<TypeId> = types.into_iter().map(|c| self.get_index_type(c, index_flags)).collect();
            return self.get_intersection_type(&keys);
        }
        if flags.contains(TypeFlags::INTERSECTION) {
            let types = self.ty(t).constituents().to_vec();
            let keys: Vec<TypeId> = types.into_iter().map(|c| self.get_index_type(c, index_flags)).collect();
            return self.get_union_type(&keys);
        }
        if self.should_defer_index_type(t) {
            return self.ctx.types.index_type(t, index_flags);
        }
        if self.object_flags(t).contains(ObjectFlags::MAPPED) {
            return self.get_index_type_for_mapped_type(t);
        }
        if flags.contains(TypeFlags::UNKNOWN) {
            return TypeId::NEVER;
        }
        if flags.intersects(TypeFlags::ANY | TypeFlags::NEVER) {
            return self.string_number_symbol_type();
        }
        let no_index_signatures = index_flags.contains(IndexFlags::NO_INDEX_SIGNATURES);
        if let Some(&cached) = self.ctx.index_types.get(&(t, no_index_signatures)) {
            return cached;
        }
        let result = self.get_literal_type_from_properties(t, no_index_signatures);
        self.ctx.index_types.insert((t, no_index_signatures), result);
        result
    }

    fn should_defer_index_type(&mut self, t: TypeId) -> bool {
        self.type_flags(t).intersects(TypeFlags::INSTANTIABLE_NON_PRIMITIVE)
            || self.is_generic_tuple_type(t)
            || self.is_generic_mapped_type(t)
    }

    /// Keys of a resolved mapped type: its constraint, remapped through an
    /// `as` clause when present.
    fn get_index_type_for_mapped_type(&mut self, t: TypeId) -> TypeId {
        let constraint = self.get_constraint_type_from_mapped_type(t);
        let Some(name_type) = self.get_name_type_from_mapped_type(t) else {
            return constraint;
        };
        let parameter = self.get_type_parameter_from_mapped_type(t);
        let mut keys = Vec::new();
        for key in self.union_constituents(constraint) {
            let mapper = Self::append_type_mapping(None, parameter, key);
            keys.push(self.instantiate_type(name_type, &mapper));
        }
        self.get_union_type(&keys)
    }

    /// Literal names of every property plus the index-signature key types.
    fn get_literal_type_from_properties(&mut self, t: TypeId, no_index_signatures: bool) -> TypeId {
        let apparent = self.get_apparent_type(t);
        let mut keys: Vec<TypeId> = self
            .get_properties_of_type(apparent)
            .into_iter()
            .map(|p| self.get_literal_type_from_property(p, TypeFlags::STRING_OR_NUMBER_LITERAL_OR_UNIQUE))
            .collect();
        if !no_index_signatures {
            for info in self.get_index_infos_of_type(apparent) {
                keys.push(if info.key_type == TypeId::STRING {
                    self.get_union_type(&[TypeId::STRING, TypeId::NUMBER])
                } else {
                    info.key_type
                });
            }
        }
        self.get_union_type(&keys)
    }

    // =========================================================================
    // Template literals
    // =========================================================================

    /// `` `a${T}b` ``, folding literal holes into the text and distributing
    /// over union holes.
    pub(crate) fn get_template_literal_type(&mut self, texts: &[String], types: &[TypeId]) -> TypeId {
        if types.iter().any(|&t| self.type_flags(t).contains(TypeFlags::NEVER)) {
            return TypeId::NEVER;
        }
        if let Some(union_index) = types
            .iter()
            .position(|&t| self.type_flags(t).contains(TypeFlags::UNION))
        {
            let distributed = types[union_index];
            return self.map_type(distributed, |s, c| {
                let mut replaced = types.to_vec();
                replaced[union_index] = c;
                Some(s.get_template_literal_type(texts, &replaced))
            });
        }
        if types.contains(&TypeId::WILDCARD) {
            return TypeId::WILDCARD;
        }
        let mut new_texts: Vec<String> = Vec::with_capacity(texts.len());
        let mut new_types: Vec<TypeId> = Vec::with_capacity(types.len());
        let mut text = texts.first().cloned().unwrap_or_default();
        for (i, &hole) in types.iter().enumerate() {
            if let Some(literal_text) = self.template_text_of_literal(hole) {
                text.push_str(&literal_text);
            } else if let TypeData::TemplateLiteral(inner) = self.ty(hole).data.clone() {
                text.push_str(&inner.texts[0]);
                for (j, &inner_type) in inner.types.iter().enumerate() {
                    new_texts.push(std::mem::take(&mut text));
                    new_types.push(inner_type);
                    text = inner.texts[j + 1].clone();
                }
            } else if hole.is_error() || self.type_flags(hole).contains(TypeFlags::ANY) {
                return TypeId::STRING;
            } else {
                new_texts.push(std::mem::take(&mut text));
                new_types.push(hole);
            }
            text.push_str(&texts[i + 1]);
        }
        new_texts.push(text);
        if new_types.is_empty() {
            return self.ctx.types.string_literal(&new_texts[0]);
        }
        if new_types == [TypeId::STRING] && new_texts.iter().all(String::is_empty) {
            return TypeId::STRING;
        }
        self.ctx.types.template_literal(new_texts, new_types)
    }

    // =========================================================================
    // Indexed access
    // =========================================================================

    /// `object[index]`. Unresolvable accesses yield the error type when an
    /// access node is given and `unknown` otherwise.
    pub fn get_indexed_access_type(
        &mut self,
        object: TypeId,
        index: TypeId,
        access_flags: AccessFlags,
        access_node: NodeIndex,
        alias: Option<TypeAlias>,
    ) -> TypeId {
        self.get_indexed_access_type_worker(object, index, access_flags, access_node, alias)
            .unwrap_or(if access_node.is_some() {
                TypeId::ERROR
            } else {
                TypeId::UNKNOWN
            })
    }

    /// `object[index]` without error reporting; `None` when the access is
    /// invalid.
    pub(crate) fn get_indexed_access_type_or_undefined(
        &mut self,
        object: TypeId,
        index: TypeId,
        access_flags: AccessFlags,
    ) -> Option<TypeId> {
        self.get_indexed_access_type_worker(object, index, access_flags, NodeIndex::NONE, None)
    }

    fn get_indexed_access_type_worker(
        &mut self,
        object: TypeId,
        index: TypeId,
        mut access_flags: AccessFlags,
        access_node: NodeIndex,
        alias: Option<TypeAlias>,
    ) -> Option<TypeId> {
        if object == TypeId::WILDCARD || index == TypeId::WILDCARD {
            return Some(TypeId::WILDCARD);
        }
        let in_type_node = matches!(self.ctx.arena.kind(access_node), Some(NodeKind::IndexedAccessType(_)));
        if !in_type_node && access_node.is_some() {
            access_flags |= AccessFlags::EXPRESSION_POSITION;
        }
        if self.should_defer_indexed_access(object, index, access_node.is_some() && !in_type_node) {
            if self.type_flags(object).intersects(TypeFlags::ANY_OR_UNKNOWN) {
                return Some(object);
            }
            let persistent = access_flags & AccessFlags::PERSISTENT;
            trace!(object = object.0, index = index.0, "deferred indexed access");
            return Some(self.ctx.types.indexed_access(object, index, persistent, alias));
        }
        let apparent = self.get_reduced_apparent_type(object);
        let index_flags = self.type_flags(index);
        if index_flags.contains(TypeFlags::UNION) && !index_flags.contains(TypeFlags::BOOLEAN) {
            let mut results = Vec::new();
            for constituent in self.union_constituents(index) {
                let property = self.get_property_type_for_index_type(
                    object,
                    apparent,
                    constituent,
                    index,
                    access_node,
                    access_flags,
                )?;
                results.push(property);
            }
            return Some(if access_flags.contains(AccessFlags::WRITING) {
                self.get_intersection_type_ex(&results, alias)
            } else {
                self.get_union_type_ex(&results, tyck_types::UnionReduction::Literal, alias, None)
            });
        }
        self.get_property_type_for_index_type(
            object,
            apparent,
            index,
            index,
            access_node,
            access_flags | AccessFlags::CACHE_SYMBOL,
        )
    }

    fn should_defer_indexed_access(&mut self, object: TypeId, index: TypeId, in_expression: bool) -> bool {
        if self.is_generic_index_type(index) {
            return true;
        }
        if in_expression {
            return self.is_generic_tuple_type(object) && !self.is_fixed_tuple_position(object, index);
        }
        self.is_generic_object_type(object)
            && !(self.is_tuple_type(object) && self.is_fixed_tuple_position(object, index))
    }

    /// Numeric literal index below the tuple's fixed element count.
    fn is_fixed_tuple_position(&self, tuple: TypeId, index: TypeId) -> bool {
        let Some(info) = self.tuple_target_info(tuple) else {
            return false;
        };
        let fixed = Self::get_start_element_count(&info, ElementFlags::FIXED);
        self.index_type_less_than(index, fixed)
    }

    fn index_type_less_than(&self, index: TypeId, limit: usize) -> bool {
        self.union_constituents(index).iter().all(|&t| {
            self.get_property_name_from_type(t)
                .and_then(|name| name.parse::<f64>().ok())
                .is_some_and(|n| n >= 0.0 && n.fract() == 0.0 && (n as usize) < limit)
        })
    }

    /// Apparent type with never-reducing intersections collapsed.
    pub(crate) fn get_reduced_apparent_type(&mut self, t: TypeId) -> TypeId {
        let reduced = self.get_reduced_type(t);
        let apparent = self.get_apparent_type(reduced);
        self.get_reduced_type(apparent)
    }

    fn get_property_type_for_index_type(
        &mut self,
        original_object: TypeId,
        object: TypeId,
        index: TypeId,
        full_index: TypeId,
        access_node: NodeIndex,
        access_flags: AccessFlags,
    ) -> Option<TypeId> {
        let is_expression = access_flags.contains(AccessFlags::EXPRESSION_POSITION);
        let index_node = self.index_node_of(access_node);
        if self.is_type_usable_as_property_name(index) {
            let name = self.get_property_name_from_type(index)?;
            if let Some(property) = self.get_property_of_type(object, &name) {
                if access_flags.contains(AccessFlags::CACHE_SYMBOL) && access_node.is_some() {
                    self.node_links(access_node).resolved_symbol = Some(property);
                }
                let property_type = if access_flags.contains(AccessFlags::WRITING) {
                    self.get_write_type_of_symbol(property)
                } else {
                    self.get_type_of_symbol(property)
                };
                return Some(property_type);
            }
            let is_numeric_name = name.parse::<f64>().is_ok_and(|n| n.is_finite());
            if is_numeric_name && self.every_type(object, |s, t| s.is_tuple_type(t)) {
                let position: f64 = name.parse().unwrap_or(-1.0);
                let has_no_rest = self.every_type(object, |s, t| {
                    s.tuple_target_info(t).is_some_and(|info| !info.has_rest_element)
                });
                if access_node.is_some() && has_no_rest && !access_flags.contains(AccessFlags::NO_TUPLE_BOUNDS_CHECK) {
                    if self.is_tuple_type(object) {
                        let object_str = self.type_to_string(object);
                        let arity = self.get_element_types(object).len().to_string();
                        self.error(
                            index_node,
                            diagnostic_codes::TUPLE_INDEX_OUT_OF_BOUNDS,
                            &[&object_str, &arity, &name],
                        );
                    } else {
                        self.report_nonexistent_property(index_node, &name, object);
                    }
                }
                if position >= 0.0 {
                    let include = access_flags
                        .contains(AccessFlags::INCLUDE_UNDEFINED)
                        .then_some(TypeId::MISSING);
                    return Some(self.get_tuple_element_type_out_of_start_count(object, position as usize, include));
                }
            }
        }
        if !self.type_flags(index).intersects(TypeFlags::NULLABLE)
            && self.is_type_assignable_to_kind(
                index,
                TypeFlags::STRING_LIKE | TypeFlags::NUMBER_LIKE | TypeFlags::ES_SYMBOL_LIKE,
            )
        {
            if self.type_flags(object).intersects(TypeFlags::ANY | TypeFlags::NEVER) {
                return Some(object);
            }
            let info = self
                .get_applicable_index_info(object, index)
                .or_else(|| self.get_index_info_of_type(object, TypeId::STRING));
            if let Some(info) = info {
                if access_flags.contains(AccessFlags::NO_INDEX_SIGNATURES) && info.key_type != TypeId::NUMBER {
                    if access_node.is_some() {
                        let index_str = self.type_to_string(full_index);
                        let object_str = self.type_to_string(original_object);
                        self.error(
                            index_node,
                            diagnostic_codes::TYPE_CANNOT_BE_USED_TO_INDEX_TYPE,
                            &[&index_str, &object_str],
                        );
                    }
                    return None;
                }
                if access_node.is_some()
                    && info.key_type == TypeId::STRING
                    && !self.is_type_assignable_to_kind(index, TypeFlags::STRING_LIKE | TypeFlags::NUMBER_LIKE)
                {
                    let index_str = self.type_to_string(index);
                    self.error(
                        index_node,
                        diagnostic_codes::TYPE_CANNOT_BE_USED_AS_INDEX_TYPE,
                        &[&index_str],
                    );
                    return Some(info.value_type);
                }
                let include_undefined = access_flags.contains(AccessFlags::INCLUDE_UNDEFINED)
                    || (self.ctx.options.no_unchecked_indexed_access
                        && is_expression
                        && !access_flags.contains(AccessFlags::WRITING));
                return Some(if include_undefined {
                    self.get_union_type(&[info.value_type, TypeId::MISSING])
                } else {
                    info.value_type
                });
            }
            if self.type_flags(index).contains(TypeFlags::NEVER) {
                return Some(TypeId::NEVER);
            }
            if self.type_flags(object).contains(TypeFlags::ANY) {
                return Some(TypeId::ANY);
            }
            if is_expression && !access_flags.contains(AccessFlags::SUPPRESS_NO_IMPLICIT_ANY_ERROR) {
                if self.is_type_usable_as_property_name(index) {
                    if let Some(name) = self.get_property_name_from_type(index) {
                        self.report_nonexistent_property(index_node, &name, original_object);
                    }
                    return None;
                }
                if self.ctx.options.no_implicit_any {
                    self.report_implicit_any_element_access(access_node, full_index, original_object);
                }
                return Some(TypeId::ANY);
            }
        }
        if self.type_flags(index).contains(TypeFlags::NEVER) {
            return Some(TypeId::NEVER);
        }
        if access_node.is_some() && !is_expression {
            if let Some(name) = self.get_property_name_from_type(index) {
                self.report_nonexistent_property(index_node, &name, original_object);
            } else {
                let index_str = self.type_to_string(full_index);
                let object_str = self.type_to_string(original_object);
                self.error(
                    index_node,
                    diagnostic_codes::TYPE_CANNOT_BE_USED_TO_INDEX_TYPE,
                    &[&index_str, &object_str],
                );
            }
        } else if access_node.is_some() && !index.is_error() {
            let index_str = self.type_to_string(index);
            self.error(
                index_node,
                diagnostic_codes::TYPE_CANNOT_BE_USED_AS_INDEX_TYPE,
                &[&index_str],
            );
        }
        if self.type_flags(index).intersects(TypeFlags::ANY_OR_UNKNOWN) {
            return Some(index);
        }
        None
    }

    /// Node an indexing error points at: the index expression or index
    /// type node when there is one.
    fn index_node_of(&self, access_node: NodeIndex) -> NodeIndex {
        match self.ctx.arena.kind(access_node) {
            Some(NodeKind::ElementAccessExpression(access)) => access.name_or_argument,
            Some(NodeKind::PropertyAccessExpression(access)) => access.name_or_argument,
            Some(NodeKind::IndexedAccessType(access)) => access.index_type,
            _ => access_node,
        }
    }

    /// Element of a tuple at a position past the fixed start: the rest
    /// element type, or `undefined` when the tuple has no rest element.
    fn get_tuple_element_type_out_of_start_count(
        &mut self,
        t: TypeId,
        position: usize,
        undefined_or_missing: Option<TypeId>,
    ) -> TypeId {
        self.map_type(t, |s, tuple| {
            let Some(info) = s.tuple_target_info(tuple) else {
                return Some(TypeId::UNDEFINED);
            };
            let Some(rest) = s.get_rest_type_of_tuple_type(tuple) else {
                return Some(TypeId::UNDEFINED);
            };
            match undefined_or_missing {
                Some(extra) if position >= info.fixed_length => Some(s.get_union_type(&[rest, extra])),
                _ => Some(rest),
            }
        })
    }

    /// Union of the rest and trailing elements of a tuple.
    pub(crate) fn get_rest_type_of_tuple_type(&mut self, tuple: TypeId) -> Option<TypeId> {
        let info = self.tuple_target_info(tuple)?;
        let start = Self::get_start_element_count(&info, ElementFlags::NON_REST);
        self.get_element_type_of_slice_of_tuple_type(tuple, start, 0)
    }

    pub(crate) fn every_type(&self, t: TypeId, mut f: impl FnMut(&Self, TypeId) -> bool) -> bool {
        self.union_constituents(t).into_iter().all(|c| f(self, c))
    }
}

#[cfg(test)]
#[path = "../tests/indexed_access_tests.rs"]
mod tests;
