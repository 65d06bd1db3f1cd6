//! Mapped types: `{ readonly [P in K as N]?: T }`.
//!
//! A mapped type is created once per declaration node and instantiated
//! like an anonymous type. Homomorphic mapped types (`K = keyof T` for a
//! type variable `T`) distribute over unions and map arrays and tuples
//! element-wise. Members are resolved from the lower bound of the key type:
//! literal keys become properties, `string`, `number` and pattern keys
//! become index infos.

use std::rc::Rc;

use bitflags::bitflags;
use tracing::trace;
use tyck_binder::{MappedModifier, NodeIndex, NodeKind, SymbolTable, TypeOperatorKind, symbol_flags};
use tyck_common::diagnostics::diagnostic_codes;
use tyck_types::{
    ElementFlags, IndexInfo, MappedType, ObjectFlags, ObjectKind, ObjectType, StructuredMembers,
    TypeAlias, TypeData, TypeFlags, TypeId, TypeMapper, UnionReduction,
};

use crate::context::{ResolutionProperty, ResolutionTarget};
use crate::state::CheckerState;
use crate::symbols::links::CheckFlags;

bitflags! {
    /// `+readonly`, `-readonly`, `+?` and `-?` on a mapped type.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub(crate) struct MappedTypeModifiers: u8 {
        const INCLUDE_READONLY = 1 << 0;
        const EXCLUDE_READONLY = 1 << 1;
        const INCLUDE_OPTIONAL = 1 << 2;
        const EXCLUDE_OPTIONAL = 1 << 3;
    }
}

impl<'a> CheckerState<'a> {
    fn mapped_data(&self, t: TypeId) -> Option<&MappedType> {
        match &self.ty(t).as_object()?.kind {
            ObjectKind::Mapped(mapped) => Some(mapped),
            _ => None,
        }
    }

    fn mapped_data_mut(&mut self, t: TypeId) -> Option<&mut MappedType> {
        match &mut self.ctx.types.get_mut(t).as_object_mut()?.kind {
            ObjectKind::Mapped(mapped) => Some(mapped),
            _ => None,
        }
    }

    fn mapped_declaration(&self, t: TypeId) -> NodeIndex {
        self.mapped_data(t).map_or(NodeIndex::NONE, |m| m.declaration)
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Mapped type declared by a `MappedType` node, shared by every use of
    /// the node.
    pub(crate) fn get_type_from_mapped_type_node(&mut self, node: NodeIndex) -> TypeId {
        if let Some(resolved) = self.node_links_ref(node).and_then(|l| l.resolved_type) {
            return resolved;
        }
        let symbol = self.get_symbol_of_node(node).unwrap_or(tyck_binder::SymbolId::NONE);
        let alias = self.get_alias_for_type_node(node);
        let t = self.ctx.types.alloc_with_alias(
            TypeFlags::OBJECT,
            ObjectFlags::MAPPED,
            symbol,
            alias,
            TypeData::Object(ObjectType {
                kind: ObjectKind::Mapped(Box::new(MappedType {
                    declaration: node,
                    ..MappedType::default()
                })),
                members: None,
            }),
        );
        self.node_links(node).resolved_type = Some(t);
        // Surfaces circular constraints through aliases eagerly.
        self.get_constraint_type_from_mapped_type(t);
        t
    }

    // =========================================================================
    // Components
    // =========================================================================

    pub(crate) fn get_mapped_type_modifiers(&self, t: TypeId) -> MappedTypeModifiers {
        let Some(node) = self.ctx.arena.get_mapped_type(self.mapped_declaration(t)) else {
            return MappedTypeModifiers::empty();
        };
        let mut modifiers = MappedTypeModifiers::empty();
        match node.readonly_token {
            Some(MappedModifier::Add) => modifiers |= MappedTypeModifiers::INCLUDE_READONLY,
            Some(MappedModifier::Remove) => modifiers |= MappedTypeModifiers::EXCLUDE_READONLY,
            None => {}
        }
        match node.question_token {
            Some(MappedModifier::Add) => modifiers |= MappedTypeModifiers::INCLUDE_OPTIONAL,
            Some(MappedModifier::Remove) => modifiers |= MappedTypeModifiers::EXCLUDE_OPTIONAL,
            None => {}
        }
        modifiers
    }

    /// `-1` for `-?`, `1` for `+?`, `0` otherwise.
    pub(crate) fn get_mapped_type_optionality(&self, t: TypeId) -> i8 {
        let modifiers = self.get_mapped_type_modifiers(t);
        if modifiers.contains(MappedTypeModifiers::EXCLUDE_OPTIONAL) {
            -1
        } else if modifiers.contains(MappedTypeModifiers::INCLUDE_OPTIONAL) {
            1
        } else {
            0
        }
    }

    pub(crate) fn get_type_parameter_from_mapped_type(&mut self, t: TypeId) -> TypeId {
        if let Some(parameter) = self.mapped_data(t).and_then(|m| m.type_parameter) {
            return parameter;
        }
        let declaration = self.mapped_declaration(t);
        let parameter_node = self
            .ctx
            .arena
            .get_mapped_type(declaration)
            .map_or(NodeIndex::NONE, |m| m.type_parameter);
        let parameter = match self.get_symbol_of_node(parameter_node) {
            Some(symbol) => self.get_declared_type_of_type_parameter(symbol),
            None => TypeId::ERROR,
        };
        if let Some(mapped) = self.mapped_data_mut(t) {
            mapped.type_parameter = Some(parameter);
        }
        parameter
    }

    /// `K` of `[P in K]`, or the error type when the constraint is circular.
    pub(crate) fn get_constraint_type_from_mapped_type(&mut self, t: TypeId) -> TypeId {
        if let Some(constraint) = self.mapped_data(t).and_then(|m| m.constraint_type) {
            return constraint;
        }
        let parameter = self.get_type_parameter_from_mapped_type(t);
        let constraint = self
            .get_constraint_of_type_parameter(parameter)
            .unwrap_or(TypeId::ERROR);
        if let Some(mapped) = self.mapped_data_mut(t) {
            mapped.constraint_type = Some(constraint);
        }
        constraint
    }

    /// `N` of an `as N` clause.
    pub(crate) fn get_name_type_from_mapped_type(&mut self, t: TypeId) -> Option<TypeId> {
        if let Some(name_type) = self.mapped_data(t).and_then(|m| m.name_type) {
            return name_type;
        }
        let declaration = self.mapped_declaration(t);
        let node = self
            .ctx
            .arena
            .get_mapped_type(declaration)
            .map_or(NodeIndex::NONE, |m| m.name_type);
        let name_type = if node.is_some() {
            let declared = self.get_type_from_type_node(node);
            let mapper = self.mapped_data(t).and_then(|m| m.mapper.clone());
            Some(self.instantiate_type_opt(declared, mapper.as_ref()))
        } else {
            None
        };
        if let Some(mapped) = self.mapped_data_mut(t) {
            mapped.name_type = Some(name_type);
        }
        name_type
    }

    /// Template `T`, including `undefined` for `+?` modifiers.
    pub(crate) fn get_template_type_from_mapped_type(&mut self, t: TypeId) -> TypeId {
        if let Some(template) = self.mapped_data(t).and_then(|m| m.template_type) {
            return template;
        }
        let declaration = self.mapped_declaration(t);
        let node = self
            .ctx
            .arena
            .get_mapped_type(declaration)
            .map_or(NodeIndex::NONE, |m| m.type_node);
        let template = if node.is_some() {
            let mut declared = self.get_type_from_type_node(node);
            if self
                .get_mapped_type_modifiers(t)
                .contains(MappedTypeModifiers::INCLUDE_OPTIONAL)
            {
                declared = self.get_optional_type(declared, true);
            }
            let mapper = self.mapped_data(t).and_then(|m| m.mapper.clone());
            self.instantiate_type_opt(declared, mapper.as_ref())
        } else {
            TypeId::ERROR
        };
        if let Some(mapped) = self.mapped_data_mut(t) {
            mapped.template_type = Some(template);
        }
        template
    }

    fn mapped_constraint_declaration(&self, t: TypeId) -> NodeIndex {
        let declaration = self.mapped_declaration(t);
        self.ctx
            .arena
            .get_mapped_type(declaration)
            .and_then(|m| self.ctx.arena.get_type_parameter(m.type_parameter))
            .map_or(NodeIndex::NONE, |p| p.constraint)
    }

    /// `[P in keyof X]` written literally.
    pub(crate) fn is_mapped_type_with_keyof_constraint_declaration(&self, t: TypeId) -> bool {
        matches!(
            self.ctx.arena.kind(self.mapped_constraint_declaration(t)),
            Some(NodeKind::TypeOperator(op)) if op.operator == TypeOperatorKind::Keyof
        )
    }

    /// Type whose property modifiers a homomorphic mapped type preserves.
    pub(crate) fn get_modifiers_type_from_mapped_type(&mut self, t: TypeId) -> TypeId {
        if let Some(modifiers) = self.mapped_data(t).and_then(|m| m.modifiers_type) {
            return modifiers;
        }
        let mapper = self.mapped_data(t).and_then(|m| m.mapper.clone());
        let modifiers = if self.is_mapped_type_with_keyof_constraint_declaration(t) {
            let operand = match self.ctx.arena.kind(self.mapped_constraint_declaration(t)) {
                Some(NodeKind::TypeOperator(op)) => op.type_node,
                _ => NodeIndex::NONE,
            };
            let declared = self.get_type_from_type_node(operand);
            self.instantiate_type_opt(declared, mapper.as_ref())
        } else {
            let declared = self.get_type_from_mapped_type_node(self.mapped_declaration(t));
            let constraint = self.get_constraint_type_from_mapped_type(declared);
            let extended = if self.type_flags(constraint).contains(TypeFlags::TYPE_PARAMETER) {
                self.get_constraint_of_type_parameter(constraint)
            } else {
                Some(constraint)
            };
            match extended.map(|e| self.ty(e).data.clone()) {
                Some(TypeData::Index(index)) => self.instantiate_type_opt(index.target, mapper.as_ref()),
                _ => TypeId::UNKNOWN,
            }
        };
        if let Some(mapped) = self.mapped_data_mut(t) {
            mapped.modifiers_type = Some(modifiers);
        }
        modifiers
    }

    /// Mapped type whose keys are not known until instantiation.
    pub(crate) fn is_generic_mapped_type(&mut self, t: TypeId) -> bool {
        if !self.object_flags(t).contains(ObjectFlags::MAPPED) {
            return false;
        }
        let constraint = self.get_constraint_type_from_mapped_type(t);
        if self.is_generic_index_type(constraint) {
            return true;
        }
        if let Some(name_type) = self.get_name_type_from_mapped_type(t) {
            let parameter = self.get_type_parameter_from_mapped_type(t);
            let mapper = Rc::new(TypeMapper::Simple {
                source: parameter,
                target: constraint,
            });
            let instantiated = self.instantiate_type(name_type, &mapper);
            return self.is_generic_index_type(instantiated);
        }
        false
    }

    /// `T` of a homomorphic `{ [P in keyof T]: X }`.
    pub(crate) fn get_homomorphic_type_variable(&mut self, t: TypeId) -> Option<TypeId> {
        let constraint = self.get_constraint_type_from_mapped_type(t);
        let TypeData::Index(index) = &self.ty(constraint).data else {
            return None;
        };
        let variable = index.target;
        self.type_flags(variable)
            .contains(TypeFlags::TYPE_PARAMETER)
            .then_some(variable)
    }

    fn get_modified_readonly_state(state: bool, modifiers: MappedTypeModifiers) -> bool {
        if modifiers.contains(MappedTypeModifiers::INCLUDE_READONLY) {
            true
        } else if modifiers.contains(MappedTypeModifiers::EXCLUDE_READONLY) {
            false
        } else {
            state
        }
    }

    // =========================================================================
    // Instantiation
    // =========================================================================

    pub(crate) fn instantiate_mapped_type(
        &mut self,
        target: TypeId,
        mapper: &Rc<TypeMapper>,
        alias: Option<TypeAlias>,
    ) -> TypeId {
        if let Some(variable) = self.get_homomorphic_type_variable(target) {
            let mapped_variable = self.instantiate_type(variable, mapper);
            if mapped_variable != variable {
                let reduced = self.get_reduced_type(mapped_variable);
                let constituents = self.union_constituents(reduced);
                let mapped: Vec<TypeId> = constituents
                    .into_iter()
                    .map(|c| self.instantiate_mapped_constituent(target, variable, mapper, c))
                    .collect();
                return if self.type_flags(reduced).contains(TypeFlags::UNION) {
                    self.get_union_type_ex(&mapped, UnionReduction::Literal, alias, None)
                } else {
                    mapped[0]
                };
            }
        }
        let constraint = self.get_constraint_type_from_mapped_type(target);
        if self.instantiate_type(constraint, mapper) == TypeId::WILDCARD {
            return TypeId::WILDCARD;
        }
        self.instantiate_anonymous_type(target, mapper, alias)
    }

    fn instantiate_mapped_constituent(
        &mut self,
        target: TypeId,
        variable: TypeId,
        mapper: &Rc<TypeMapper>,
        t: TypeId,
    ) -> TypeId {
        let flags = self.type_flags(t);
        if !flags.intersects(
            TypeFlags::ANY_OR_UNKNOWN
                | TypeFlags::INSTANTIABLE_NON_PRIMITIVE
                | TypeFlags::OBJECT
                | TypeFlags::INTERSECTION,
        ) || t == TypeId::WILDCARD
            || t.is_error()
        {
            return t;
        }
        let has_name_type = self
            .ctx
            .arena
            .get_mapped_type(self.mapped_declaration(target))
            .is_some_and(|m| m.name_type.is_some());
        if !has_name_type {
            if self.is_array_type(t) {
                let array_mapper = Self::prepend_type_mapping(variable, t, Some(mapper.clone()));
                return self.instantiate_mapped_array_type(t, target, &array_mapper);
            }
            if self.is_tuple_type(t) {
                return self.instantiate_mapped_tuple_type(t, target, variable, mapper);
            }
            if flags.contains(TypeFlags::INTERSECTION) {
                let types = self.ty(t).constituents().to_vec();
                if types.iter().all(|&c| self.is_array_or_tuple_type(c)) {
                    let mapped: Vec<TypeId> = types
                        .into_iter()
                        .map(|c| self.instantiate_mapped_constituent(target, variable, mapper, c))
                        .collect();
                    return self.get_intersection_type(&mapped);
                }
            }
        }
        let constituent_mapper = Self::prepend_type_mapping(variable, t, Some(mapper.clone()));
        self.instantiate_anonymous_type(target, &constituent_mapper, None)
    }

    fn instantiate_mapped_array_type(&mut self, array: TypeId, mapped: TypeId, mapper: &Rc<TypeMapper>) -> TypeId {
        let element = self.instantiate_mapped_type_template(mapped, TypeId::NUMBER, true, mapper);
        if element.is_error() {
            return TypeId::ERROR;
        }
        let readonly = Self::get_modified_readonly_state(
            self.is_readonly_array_type(array),
            self.get_mapped_type_modifiers(mapped),
        );
        self.create_array_type(element, readonly)
    }

    fn instantiate_mapped_tuple_type(
        &mut self,
        tuple: TypeId,
        mapped: TypeId,
        variable: TypeId,
        mapper: &Rc<TypeMapper>,
    ) -> TypeId {
        let Some(info) = self.tuple_target_info(tuple) else {
            return TypeId::ERROR;
        };
        let fixed_mapper = if info.fixed_length > 0 {
            Self::prepend_type_mapping(variable, tuple, Some(mapper.clone()))
        } else {
            mapper.clone()
        };
        let elements = self.get_element_types(tuple);
        let mut new_elements = Vec::with_capacity(elements.len());
        for (i, &element) in elements.iter().enumerate() {
            let flags = info.element_flags[i];
            let new_element = if i < info.fixed_length {
                let key = self.ctx.types.string_literal(&i.to_string());
                self.instantiate_mapped_type_template(
                    mapped,
                    key,
                    flags.contains(ElementFlags::OPTIONAL),
                    &fixed_mapper,
                )
            } else if flags.contains(ElementFlags::VARIADIC) {
                let element_mapper = Self::prepend_type_mapping(variable, element, Some(mapper.clone()));
                self.instantiate_type(mapped, &element_mapper)
            } else {
                let array = self.create_array_type(element, false);
                let element_mapper = Self::prepend_type_mapping(variable, array, Some(mapper.clone()));
                let instantiated = self.instantiate_type(mapped, &element_mapper);
                self.array_element_type(instantiated).unwrap_or(TypeId::UNKNOWN)
            };
            new_elements.push(new_element);
        }
        if new_elements.iter().any(|t| t.is_error()) {
            return TypeId::ERROR;
        }
        let modifiers = self.get_mapped_type_modifiers(mapped);
        let new_flags: Vec<ElementFlags> = info
            .element_flags
            .iter()
            .map(|&f| {
                if modifiers.contains(MappedTypeModifiers::INCLUDE_OPTIONAL) && f.contains(ElementFlags::REQUIRED) {
                    ElementFlags::OPTIONAL
                } else if modifiers.contains(MappedTypeModifiers::EXCLUDE_OPTIONAL)
                    && f.contains(ElementFlags::OPTIONAL)
                {
                    ElementFlags::REQUIRED
                } else {
                    f
                }
            })
            .collect();
        let readonly = Self::get_modified_readonly_state(info.readonly, modifiers);
        let labels = info.labeled_declarations.clone().unwrap_or_default();
        self.create_tuple_type(&new_elements, Some(&new_flags), readonly, &labels)
    }

    /// Template instantiated for one key.
    fn instantiate_mapped_type_template(
        &mut self,
        mapped: TypeId,
        key: TypeId,
        is_optional: bool,
        mapper: &Rc<TypeMapper>,
    ) -> TypeId {
        let parameter = self.get_type_parameter_from_mapped_type(mapped);
        let template_mapper = Self::append_type_mapping(Some(mapper.clone()), parameter, key);
        let template_source = self.mapped_data(mapped).and_then(|m| m.target).unwrap_or(mapped);
        let template = self.get_template_type_from_mapped_type(template_source);
        let property = self.instantiate_type(template, &template_mapper);
        let modifiers = self.get_mapped_type_modifiers(mapped);
        if self.ctx.strict_null_checks()
            && modifiers.contains(MappedTypeModifiers::INCLUDE_OPTIONAL)
            && !self.maybe_type_of_kind(property, TypeFlags::UNDEFINED | TypeFlags::VOID)
        {
            return self.get_optional_type(property, true);
        }
        if self.ctx.strict_null_checks() && modifiers.contains(MappedTypeModifiers::EXCLUDE_OPTIONAL) && is_optional {
            return self.remove_missing_or_undefined_type(property);
        }
        property
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// Properties and index infos of a non-generic mapped type.
    pub(crate) fn resolve_mapped_type_members(&mut self, t: TypeId) -> Rc<StructuredMembers> {
        let parameter = self.get_type_parameter_from_mapped_type(t);
        let constraint = self.get_constraint_type_from_mapped_type(t);
        let source = self.mapped_data(t).and_then(|m| m.target).unwrap_or(t);
        let name_type = self.get_name_type_from_mapped_type(source);
        let template = self.get_template_type_from_mapped_type(source);
        let modifiers_type = self.get_modifiers_type_from_mapped_type(t);
        let modifiers_type = self.get_apparent_type(modifiers_type);
        let template_modifiers = self.get_mapped_type_modifiers(t);
        let mapper = self.mapped_data(t).and_then(|m| m.mapper.clone());

        let mut builder = MappedMembersBuilder {
            mapped: t,
            parameter,
            name_type,
            template,
            modifiers_type,
            template_modifiers,
            mapper,
            link_declarations: name_type.is_none(),
            members: SymbolTable::default(),
            index_infos: Vec::new(),
        };
        let keys = if self.is_mapped_type_with_keyof_constraint_declaration(t) {
            self.mapped_property_key_types(modifiers_type)
        } else {
            let lower = self.get_lower_bound_of_key_type(constraint);
            self.union_constituents(lower)
        };
        for key in keys {
            builder.add_member_for_key_type(self, key);
        }
        trace!(
            mapped = t.0,
            properties = builder.members.len(),
            index_infos = builder.index_infos.len(),
            "mapped type members"
        );
        let properties = builder.members.values().copied().collect();
        Rc::new(StructuredMembers {
            members: builder.members,
            properties,
            call_signatures: Vec::new(),
            construct_signatures: Vec::new(),
            index_infos: builder.index_infos,
        })
    }

    /// Key of every property plus every index-signature key of `t`.
    fn mapped_property_key_types(&mut self, t: TypeId) -> Vec<TypeId> {
        let mut keys: Vec<TypeId> = self
            .get_properties_of_type(t)
            .into_iter()
            .map(|p| self.get_literal_type_from_property(p, TypeFlags::STRING_OR_NUMBER_LITERAL_OR_UNIQUE))
            .collect();
        if self.type_flags(t).contains(TypeFlags::ANY) {
            keys.push(TypeId::STRING);
        } else {
            keys.extend(self.get_index_infos_of_type(t).into_iter().map(|info| info.key_type));
        }
        keys
    }

    fn get_lower_bound_of_key_type(&mut self, t: TypeId) -> TypeId {
        let flags = self.type_flags(t);
        if let TypeData::Index(index) = &self.ty(t).data {
            let target = index.target;
            let apparent = self.get_apparent_type(target);
            return self.get_index_type(apparent, tyck_types::IndexFlags::empty());
        }
        if flags.contains(TypeFlags::UNION) {
            return self.map_type(t, |s, c| Some(s.get_lower_bound_of_key_type(c)));
        }
        if flags.contains(TypeFlags::INTERSECTION) {
            let types = self.ty(t).constituents().to_vec();
            if types.len() == 2
                && self
                    .type_flags(types[0])
                    .intersects(TypeFlags::STRING | TypeFlags::NUMBER | TypeFlags::BIG_INT)
                && types[1] == TypeId::EMPTY_TYPE_LITERAL
            {
                return t;
            }
            let lowered: Vec<TypeId> = types.into_iter().map(|c| self.get_lower_bound_of_key_type(c)).collect();
            return self.get_intersection_type(&lowered);
        }
        t
    }

    /// Key types that make an index signature.
    pub(crate) fn is_valid_index_key_type(&mut self, t: TypeId) -> bool {
        let flags = self.type_flags(t);
        if flags.intersects(TypeFlags::STRING | TypeFlags::NUMBER | TypeFlags::ES_SYMBOL | TypeFlags::TEMPLATE_LITERAL) {
            return true;
        }
        if flags.contains(TypeFlags::INTERSECTION) && !self.is_generic_type(t) {
            let types = self.ty(t).constituents().to_vec();
            return types.into_iter().any(|c| self.is_valid_index_key_type(c));
        }
        false
    }

    /// Type of a property produced by a mapped type.
    pub(crate) fn get_type_of_mapped_symbol(&mut self, symbol: tyck_binder::SymbolId) -> TypeId {
        if let Some(t) = self.links_ref(symbol).and_then(|l| l.type_) {
            return t;
        }
        let (mapped, key) = match self.links_ref(symbol) {
            Some(links) => (
                links.mapped_type.unwrap_or(TypeId::ERROR),
                links.key_type.unwrap_or(TypeId::ERROR),
            ),
            None => return TypeId::ERROR,
        };
        if !self.push_type_resolution(ResolutionTarget::Symbol(symbol), ResolutionProperty::Type) {
            return TypeId::ERROR;
        }
        let source = self.mapped_data(mapped).and_then(|m| m.target).unwrap_or(mapped);
        let template = self.get_template_type_from_mapped_type(source);
        let parameter = self.get_type_parameter_from_mapped_type(mapped);
        let mapped_mapper = self.mapped_data(mapped).and_then(|m| m.mapper.clone());
        let mapper = Self::append_type_mapping(mapped_mapper, parameter, key);
        let property = self.instantiate_type(template, &mapper);
        let is_optional = self.symbol_flags_raw(symbol) & symbol_flags::OPTIONAL != 0;
        let mut t = if self.ctx.strict_null_checks()
            && is_optional
            && !self.maybe_type_of_kind(property, TypeFlags::UNDEFINED | TypeFlags::VOID)
        {
            self.get_optional_type(property, true)
        } else if self.check_flags(symbol).contains(CheckFlags::STRIP_OPTIONAL) {
            self.remove_missing_or_undefined_type(property)
        } else {
            property
        };
        if !self.pop_type_resolution() {
            let name = self.symbol_to_string(symbol);
            let mapped_text = self.type_to_string(mapped);
            self.error_at_current_node(
                diagnostic_codes::TYPE_OF_PROPERTY_CIRCULARLY_REFERENCES_ITSELF_IN_MAPPED_TYPE,
                &[&name, &mapped_text],
            );
            t = TypeId::ERROR;
        }
        self.links(symbol).type_ = Some(t);
        t
    }
}

/// Accumulates the members of one mapped type.
struct MappedMembersBuilder {
    mapped: TypeId,
    parameter: TypeId,
    name_type: Option<TypeId>,
    template: TypeId,
    modifiers_type: TypeId,
    template_modifiers: MappedTypeModifiers,
    mapper: Option<Rc<TypeMapper>>,
    /// Properties share declarations with the modifiers type unless keys
    /// are remapped.
    link_declarations: bool,
    members: SymbolTable,
    index_infos: Vec<IndexInfo>,
}

impl MappedMembersBuilder {
    fn add_member_for_key_type(&mut self, state: &mut CheckerState<'_>, key: TypeId) {
        let property_name_type = match self.name_type {
            Some(name_type) => {
                let mapper = CheckerState::append_type_mapping(self.mapper.clone(), self.parameter, key);
                state.instantiate_type(name_type, &mapper)
            }
            None => key,
        };
        for name_type in state.union_constituents(property_name_type) {
            self.add_member(state, key, name_type);
        }
    }

    fn add_member(&mut self, state: &mut CheckerState<'_>, key: TypeId, name_type: TypeId) {
        if state.is_type_usable_as_property_name(name_type) {
            let Some(name) = state.get_property_name_from_type(name_type) else {
                return;
            };
            if let Some(&existing) = self.members.get(&name) {
                let (old_name, old_key) = state
                    .links_ref(existing)
                    .map_or((name_type, key), |l| (l.name_type.unwrap_or(name_type), l.key_type.unwrap_or(key)));
                let merged_name = state.get_union_type(&[old_name, name_type]);
                let merged_key = state.get_union_type(&[old_key, key]);
                let links = state.links(existing);
                links.name_type = Some(merged_name);
                links.key_type = Some(merged_key);
                return;
            }
            let modifiers_property = if state.is_type_usable_as_property_name(key) {
                state
                    .get_property_name_from_type(key)
                    .and_then(|key_name| state.get_property_of_type(self.modifiers_type, &key_name))
            } else {
                None
            };
            let modifiers_optional =
                modifiers_property.is_some_and(|p| state.symbol_flags_raw(p) & symbol_flags::OPTIONAL != 0);
            let is_optional = self.template_modifiers.contains(MappedTypeModifiers::INCLUDE_OPTIONAL)
                || (!self.template_modifiers.contains(MappedTypeModifiers::EXCLUDE_OPTIONAL) && modifiers_optional);
            let is_readonly = self.template_modifiers.contains(MappedTypeModifiers::INCLUDE_READONLY)
                || (!self.template_modifiers.contains(MappedTypeModifiers::EXCLUDE_READONLY)
                    && modifiers_property.is_some_and(|p| state.is_readonly_symbol(p)));
            let strip_optional = state.ctx.strict_null_checks() && !is_optional && modifiers_optional;

            let mut check_flags = CheckFlags::MAPPED;
            if is_readonly {
                check_flags |= CheckFlags::READONLY;
            }
            if strip_optional {
                check_flags |= CheckFlags::STRIP_OPTIONAL;
            }
            let mut flags = symbol_flags::PROPERTY;
            if is_optional {
                flags |= symbol_flags::OPTIONAL;
            }
            let property = state.create_symbol(flags, &name, check_flags);
            if let Some(origin) = modifiers_property
                && self.link_declarations
            {
                let declarations = state.symbol_declarations(origin);
                if let Some(created) = state.transient_symbol_mut(property) {
                    created.declarations = declarations;
                }
            }
            let links = state.links(property);
            links.mapped_type = Some(self.mapped);
            links.name_type = Some(name_type);
            links.key_type = Some(key);
            self.members.insert(name, property);
            return;
        }
        let name_flags = state.type_flags(name_type);
        if state.is_valid_index_key_type(name_type) || name_flags.intersects(TypeFlags::ANY | TypeFlags::ENUM) {
            let index_key = if name_flags.intersects(TypeFlags::ANY | TypeFlags::STRING) {
                TypeId::STRING
            } else if name_flags.intersects(TypeFlags::NUMBER | TypeFlags::ENUM) {
                TypeId::NUMBER
            } else {
                name_type
            };
            let mapper = CheckerState::append_type_mapping(self.mapper.clone(), self.parameter, key);
            let value = state.instantiate_type(self.template, &mapper);
            let modifiers_info = state.get_applicable_index_info(self.modifiers_type, name_type);
            let is_readonly = self.template_modifiers.contains(MappedTypeModifiers::INCLUDE_READONLY)
                || (!self.template_modifiers.contains(MappedTypeModifiers::EXCLUDE_READONLY)
                    && modifiers_info.is_some_and(|info| info.is_readonly));
            match self.index_infos.iter_mut().find(|info| info.key_type == index_key) {
                Some(existing) => {
                    existing.value_type = state.get_union_type(&[existing.value_type, value]);
                    existing.is_readonly &= is_readonly;
                }
                None => self.index_infos.push(IndexInfo::new(index_key, value, is_readonly)),
            }
        }
    }
}
