//! Tuple targets and tuple normalization.
//!
//! A tuple type is a reference to a tuple target, one target per element
//! flag layout. Normalization spreads variadic elements of concrete tuples,
//! promotes optionals that precede a required element and folds everything
//! between the first rest and the last optional or rest element into a
//! single rest element.

use std::rc::Rc;

use tracing::trace;
use tyck_binder::{NodeIndex, SymbolId, symbol_flags};
use tyck_common::diagnostics::diagnostic_codes;
use tyck_common::limits::MAX_TUPLE_ELEMENTS;
use tyck_types::{
    AccessFlags, ElementFlags, InterfaceType, ObjectFlags, ObjectKind, ObjectType, StructuredMembers,
    TupleInfo, TypeData, TypeFlags, TypeId, TypeInterner, get_type_list_id,
};

use crate::state::CheckerState;
use crate::symbols::links::CheckFlags;

/// Elements accumulated while normalizing a tuple.
#[derive(Default)]
struct ExpandedTuple {
    types: Vec<TypeId>,
    flags: Vec<ElementFlags>,
    labels: Vec<NodeIndex>,
    last_required: Option<usize>,
    first_rest: Option<usize>,
    last_optional_or_rest: Option<usize>,
}

impl ExpandedTuple {
    fn len(&self) -> usize {
        self.flags.len()
    }
}

impl<'a> CheckerState<'a> {
    /// Target for an element flag layout. A lone rest element is an array.
    pub(crate) fn get_tuple_target_type(
        &mut self,
        element_flags: &[ElementFlags],
        readonly: bool,
        labels: &[NodeIndex],
    ) -> TypeId {
        if let [only] = element_flags
            && only.contains(ElementFlags::REST)
        {
            return self.get_global_array_target(readonly);
        }
        let labeled = !labels.is_empty() && labels.iter().all(|l| l.is_some());
        let label_key = labeled.then_some(labels);
        let key = TypeInterner::tuple_target_key(element_flags, readonly, label_key);
        if let Some(target) = self.ctx.types.lookup_tuple_target(&key) {
            return target;
        }
        let target = self.create_tuple_target_type(element_flags, readonly, label_key.map(<[NodeIndex]>::to_vec));
        self.ctx.types.store_tuple_target(key, target);
        target
    }

    fn create_tuple_target_type(
        &mut self,
        element_flags: &[ElementFlags],
        readonly: bool,
        labels: Option<Vec<NodeIndex>>,
    ) -> TypeId {
        let arity = element_flags.len();
        let min_length = element_flags
            .iter()
            .filter(|f| f.intersects(ElementFlags::REQUIRED | ElementFlags::VARIADIC))
            .count();
        let readonly_flag = if readonly { CheckFlags::READONLY } else { CheckFlags::empty() };

        let mut type_parameters = Vec::with_capacity(arity);
        let mut members = StructuredMembers::default();
        let mut combined = ElementFlags::empty();
        for (i, &flags) in element_flags.iter().enumerate() {
            let parameter = self.ctx.types.create_type_parameter(SymbolId::NONE);
            type_parameters.push(parameter);
            combined |= flags;
            if combined.intersects(ElementFlags::VARIABLE) {
                continue;
            }
            let mut property_flags = symbol_flags::PROPERTY;
            if flags.contains(ElementFlags::OPTIONAL) {
                property_flags |= symbol_flags::OPTIONAL;
            }
            let name = i.to_string();
            let property = self.create_symbol(property_flags, &name, readonly_flag);
            if let Some(label) = labels.as_ref().and_then(|l| l.get(i).copied())
                && let Some(symbol) = self.transient_symbol_mut(property)
            {
                symbol.declarations.push(label);
            }
            self.links(property).type_ = Some(parameter);
            members.members.insert(name, property);
            members.properties.push(property);
        }
        let fixed_length = members.properties.len();

        let length = self.create_symbol(symbol_flags::PROPERTY, "length", readonly_flag);
        let length_type = if combined.intersects(ElementFlags::VARIABLE) {
            TypeId::NUMBER
        } else {
            let lengths: Vec<TypeId> = (min_length..=arity)
                .map(|n| self.ctx.types.number_literal(n as f64))
                .collect();
            self.get_union_type(&lengths)
        };
        self.links(length).type_ = Some(length_type);
        members.members.insert("length".to_string(), length);
        members.properties.push(length);

        let target = self.ctx.types.alloc(
            TypeFlags::OBJECT,
            ObjectFlags::TUPLE | ObjectFlags::REFERENCE,
            SymbolId::NONE,
            TypeData::Object(ObjectType {
                kind: ObjectKind::Interface(Box::new(InterfaceType {
                    type_parameters: type_parameters.clone(),
                    local_type_parameters: type_parameters.clone(),
                    declared_members: Some(Rc::new(members)),
                    tuple: Some(TupleInfo {
                        element_flags: element_flags.to_vec(),
                        labeled_declarations: labels,
                        min_length,
                        fixed_length,
                        has_rest_element: combined.intersects(ElementFlags::VARIABLE),
                        combined_flags: combined,
                        readonly,
                    }),
                    ..InterfaceType::default()
                })),
                members: None,
            }),
        );
        let this_type = self.ctx.types.create_type_parameter(SymbolId::NONE);
        if let Some(parameter) = self.ctx.types.get_mut(this_type).as_type_parameter_mut() {
            parameter.is_this_type = true;
            parameter.constraint = Some(target);
        }
        if let Some(iface) = self.ctx.types.get_mut(target).as_interface_mut() {
            iface.this_type = Some(this_type);
        }
        self.ctx
            .types
            .store_instantiation(target, get_type_list_id(&type_parameters), target);
        trace!(target = target.0, arity, readonly, "tuple target");
        target
    }

    /// Tuple from element types and flags, normalized.
    pub fn create_tuple_type(
        &mut self,
        element_types: &[TypeId],
        element_flags: Option<&[ElementFlags]>,
        readonly: bool,
        labels: &[NodeIndex],
    ) -> TypeId {
        let required;
        let flags = match element_flags {
            Some(flags) => flags,
            None => {
                required = vec![ElementFlags::REQUIRED; element_types.len()];
                &required
            }
        };
        let target = self.get_tuple_target_type(flags, readonly, labels);
        if self.ty(target).tuple_info().is_none() {
            // A lone rest element became an array.
            return self.ctx.types.create_type_reference(target, element_types.to_vec());
        }
        if element_types.is_empty() {
            return target;
        }
        self.create_normalized_tuple_type(target, element_types)
    }

    /// Reference to a generic target; tuple targets are normalized.
    pub(crate) fn create_normalized_type_reference(&mut self, target: TypeId, type_arguments: Vec<TypeId>) -> TypeId {
        if self.ty(target).tuple_info().is_some() {
            self.create_normalized_tuple_type(target, &type_arguments)
        } else {
            self.ctx.types.create_type_reference(target, type_arguments)
        }
    }

    pub(crate) fn create_normalized_tuple_type(&mut self, target: TypeId, element_types: &[TypeId]) -> TypeId {
        let Some(info) = self.ty(target).tuple_info().cloned() else {
            return self.ctx.types.create_type_reference(target, element_types.to_vec());
        };
        if !info.combined_flags.intersects(ElementFlags::NON_REQUIRED) {
            return self.ctx.types.create_type_reference(target, element_types.to_vec());
        }
        if info.combined_flags.contains(ElementFlags::VARIADIC) {
            let union_index = element_types.iter().enumerate().position(|(i, &t)| {
                info.element_flags[i].contains(ElementFlags::VARIADIC)
                    && self.type_flags(t).intersects(TypeFlags::NEVER | TypeFlags::UNION)
            });
            if let Some(index) = union_index {
                let checked: Vec<TypeId> = element_types
                    .iter()
                    .enumerate()
                    .map(|(i, &t)| {
                        if info.element_flags[i].contains(ElementFlags::VARIADIC) { t } else { TypeId::UNKNOWN }
                    })
                    .collect();
                if !self.check_cross_product_union_of(&checked) {
                    return TypeId::ERROR;
                }
                let elements = element_types.to_vec();
                return self.map_type(element_types[index], |s, t| {
                    let mut replaced = elements.clone();
                    replaced[index] = t;
                    Some(s.create_normalized_tuple_type(target, &replaced))
                });
            }
        }

        let mut expanded = ExpandedTuple::default();
        let label_of = |i: usize| {
            info.labeled_declarations
                .as_ref()
                .and_then(|l| l.get(i).copied())
                .unwrap_or(NodeIndex::NONE)
        };
        for (i, &t) in element_types.iter().enumerate() {
            let flags = info.element_flags.get(i).copied().unwrap_or(ElementFlags::REQUIRED);
            if !flags.contains(ElementFlags::VARIADIC) {
                self.add_tuple_element(&mut expanded, t, flags, label_of(i));
                continue;
            }
            let t_flags = self.type_flags(t);
            if t_flags.contains(TypeFlags::ANY) {
                self.add_tuple_element(&mut expanded, t, ElementFlags::REST, label_of(i));
            } else if t_flags.intersects(TypeFlags::INSTANTIABLE_NON_PRIMITIVE) || self.is_generic_mapped_type(t) {
                self.add_tuple_element(&mut expanded, t, ElementFlags::VARIADIC, label_of(i));
            } else if self.is_tuple_type(t) {
                let elements = self.get_element_types(t);
                if elements.len() + expanded.len() >= MAX_TUPLE_ELEMENTS {
                    self.error_at_current_node(diagnostic_codes::TUPLE_TYPE_TOO_LARGE, &[]);
                    return TypeId::ERROR;
                }
                let inner_target = self.get_target_type(t);
                let inner = self.ty(inner_target).tuple_info().cloned().unwrap_or_default();
                for (n, element) in elements.into_iter().enumerate() {
                    let label = inner
                        .labeled_declarations
                        .as_ref()
                        .and_then(|l| l.get(n).copied())
                        .unwrap_or(NodeIndex::NONE);
                    let element_flags = inner.element_flags.get(n).copied().unwrap_or(ElementFlags::REQUIRED);
                    self.add_tuple_element(&mut expanded, element, element_flags, label);
                }
            } else {
                let element = self.array_like_element_type(t).unwrap_or(TypeId::ERROR);
                self.add_tuple_element(&mut expanded, element, ElementFlags::REST, label_of(i));
            }
        }

        if let Some(last_required) = expanded.last_required {
            for flags in &mut expanded.flags[..last_required] {
                if flags.contains(ElementFlags::OPTIONAL) {
                    *flags = ElementFlags::REQUIRED;
                }
            }
        }
        if let (Some(first_rest), Some(last)) = (expanded.first_rest, expanded.last_optional_or_rest)
            && first_rest < last
        {
            let run: Vec<TypeId> = (first_rest..=last)
                .map(|i| {
                    if expanded.flags[i].contains(ElementFlags::VARIADIC) {
                        self.get_indexed_access_type(expanded.types[i], TypeId::NUMBER, AccessFlags::empty(), NodeIndex::NONE, None)
                    } else {
                        expanded.types[i]
                    }
                })
                .collect();
            expanded.types[first_rest] = self.get_union_type(&run);
            expanded.types.drain(first_rest + 1..=last);
            expanded.flags.drain(first_rest + 1..=last);
            expanded.labels.drain(first_rest + 1..=last);
        }

        let normalized_target = self.get_tuple_target_type(&expanded.flags, info.readonly, &expanded.labels);
        if expanded.flags.is_empty() {
            return normalized_target;
        }
        self.ctx
            .types
            .create_type_reference(normalized_target, expanded.types)
    }

    fn add_tuple_element(&mut self, expanded: &mut ExpandedTuple, t: TypeId, flags: ElementFlags, label: NodeIndex) {
        let index = expanded.len();
        if flags.contains(ElementFlags::REQUIRED) {
            expanded.last_required = Some(index);
        }
        if flags.contains(ElementFlags::REST) && expanded.first_rest.is_none() {
            expanded.first_rest = Some(index);
        }
        if flags.intersects(ElementFlags::OPTIONAL | ElementFlags::REST) {
            expanded.last_optional_or_rest = Some(index);
        }
        let t = if flags.contains(ElementFlags::OPTIONAL) {
            self.get_optional_type(t, true)
        } else {
            t
        };
        expanded.types.push(t);
        expanded.flags.push(flags);
        expanded.labels.push(label);
    }

    fn check_cross_product_union_of(&mut self, types: &[TypeId]) -> bool {
        let size = types.iter().fold(1usize, |size, &t| {
            if self.type_flags(t).contains(TypeFlags::UNION) {
                size.saturating_mul(self.ty(t).constituents().len())
            } else {
                size
            }
        });
        if size >= tyck_common::limits::MAX_CROSS_PRODUCT_SIZE {
            self.error_at_current_node(diagnostic_codes::UNION_TYPE_TOO_COMPLEX, &[]);
            return false;
        }
        true
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Element types of a tuple, without a `this` argument.
    pub(crate) fn get_element_types(&mut self, tuple: TypeId) -> Vec<TypeId> {
        let target = self.get_target_type(tuple);
        let arity = self.target_type_parameters(target).len();
        let mut args = self.get_type_arguments(tuple);
        args.truncate(arity);
        args
    }

    pub(crate) fn tuple_target_info(&self, tuple: TypeId) -> Option<TupleInfo> {
        let target = self.get_target_type(tuple);
        self.ty(target).tuple_info().cloned()
    }

    /// Element type for arrays and tuples.
    pub(crate) fn array_like_element_type(&mut self, t: TypeId) -> Option<TypeId> {
        if let Some(element) = self.array_element_type(t) {
            return Some(element);
        }
        if self.is_tuple_type(t) {
            let elements = self.get_element_types(t);
            return Some(self.get_union_type(&elements));
        }
        None
    }

    pub(crate) fn is_array_like_type(&mut self, t: TypeId) -> bool {
        self.is_array_or_tuple_type(t)
    }

    /// Union of the element types from `index` to the end, without the last
    /// `end_skip` elements. Variadic elements contribute their element
    /// type.
    pub(crate) fn get_element_type_of_slice_of_tuple_type(
        &mut self,
        tuple: TypeId,
        index: usize,
        end_skip: usize,
    ) -> Option<TypeId> {
        let info = self.tuple_target_info(tuple)?;
        let elements = self.get_element_types(tuple);
        let end = elements.len().checked_sub(end_skip)?;
        if index >= end {
            return None;
        }
        let mut types = Vec::with_capacity(end - index);
        for i in index..end {
            let t = elements[i];
            types.push(if info.element_flags[i].contains(ElementFlags::VARIADIC) {
                self.get_indexed_access_type(t, TypeId::NUMBER, AccessFlags::empty(), NodeIndex::NONE, None)
            } else {
                t
            });
        }
        Some(self.get_union_type(&types))
    }

    /// Tuple of the elements from `index` to the end minus `end_skip`.
    pub(crate) fn slice_tuple_type(&mut self, tuple: TypeId, index: usize, end_skip: usize) -> TypeId {
        let Some(info) = self.tuple_target_info(tuple) else {
            return TypeId::ERROR;
        };
        let elements = self.get_element_types(tuple);
        let end = elements.len().saturating_sub(end_skip).max(index);
        let labels: Vec<NodeIndex> = info
            .labeled_declarations
            .as_ref()
            .map(|l| l[index..end].to_vec())
            .unwrap_or_default();
        self.create_tuple_type(
            &elements[index..end],
            Some(&info.element_flags[index..end]),
            info.readonly,
            &labels,
        )
    }

    /// Number of leading elements with the given flags.
    pub(crate) fn get_start_element_count(info: &TupleInfo, flags: ElementFlags) -> usize {
        info.element_flags
            .iter()
            .position(|f| !f.intersects(flags))
            .unwrap_or(info.element_flags.len())
    }

    /// Number of trailing elements with the given flags.
    pub(crate) fn get_end_element_count(info: &TupleInfo, flags: ElementFlags) -> usize {
        info.element_flags.iter().rev().take_while(|f| f.intersects(flags)).count()
    }
}

#[cfg(test)]
#[path = "../tests/tuple_tests.rs"]
mod tests;
