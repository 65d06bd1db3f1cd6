//! Structural member resolution.
//!
//! `resolve_structured_type_members` computes the properties, signatures and
//! index infos of an object, union or intersection type exactly once and
//! stores them on the type (`ObjectFlags::MEMBERS_RESOLVED`). The property
//! queries used everywhere else (`get_properties_of_type`,
//! `get_property_of_type`, `get_signatures_of_type`, ...) go through the
//! apparent type and then through the resolved members.

use std::rc::Rc;

use tracing::trace;
use tyck_binder::{SymbolId, SymbolTable, internal_names, node_flags, symbol_flags};
use tyck_types::{
    IndexInfo, ObjectFlags, ObjectKind, SignatureId, SignatureKind, StructuredMembers, TypeData, TypeFlags,
    TypeId, TypeMapper, UnionReduction,
};

use crate::state::CheckerState;
use crate::symbols::links::CheckFlags;

impl<'a> CheckerState<'a> {
    /// Members of a structured type; empty for everything else.
    pub(crate) fn resolve_structured_type_members(&mut self, t: TypeId) -> Rc<StructuredMembers> {
        if let Some(members) = self.ty(t).resolved_members() {
            return members.clone();
        }
        let flags = self.type_flags(t);
        if !flags.intersects(TypeFlags::STRUCTURED_TYPE) {
            return StructuredMembers::empty();
        }
        if !self.ctx.resolving_members.insert(t) {
            trace!(t = t.0, "member resolution re-entered");
            return StructuredMembers::empty();
        }
        let members = if flags.contains(TypeFlags::OBJECT) {
            let kind = self.ty(t).as_object().map(|o| o.kind.clone());
            match kind {
                Some(ObjectKind::Interface(_) | ObjectKind::Reference(_)) => self.resolve_type_reference_members(t),
                Some(ObjectKind::Anonymous(anonymous)) => match (anonymous.target, anonymous.mapper) {
                    (Some(target), Some(mapper)) => self.resolve_instantiated_anonymous_members(target, &mapper),
                    _ => self.resolve_anonymous_type_members(t),
                },
                Some(ObjectKind::Mapped(_)) => self.resolve_mapped_type_members(t),
                Some(ObjectKind::ReverseMapped(_)) => self.resolve_reverse_mapped_type_members(t),
                None => StructuredMembers::empty(),
            }
        } else if flags.contains(TypeFlags::UNION) {
            self.resolve_union_type_members(t)
        } else {
            self.resolve_intersection_type_members(t)
        };
        self.ctx.resolving_members.remove(&t);
        let ty = self.ctx.types.get_mut(t);
        match &mut ty.data {
            TypeData::Object(object) => {
                object.members = Some(members.clone());
                ty.object_flags |= ObjectFlags::MEMBERS_RESOLVED;
            }
            TypeData::Union(union) => union.members = Some(members.clone()),
            TypeData::Intersection(intersection) => intersection.members = Some(members.clone()),
            _ => {}
        }
        members
    }

    // =========================================================================
    // Classes, interfaces and references
    // =========================================================================

    /// Members declared directly by a class, interface or tuple target, with
    /// no base types. Cached on the target.
    pub(crate) fn resolve_declared_members(&mut self, target: TypeId) -> Rc<StructuredMembers> {
        if let Some(declared) = self.ty(target).as_interface().and_then(|i| i.declared_members.clone()) {
            return declared;
        }
        let symbol = self.ty(target).symbol;
        let table = self.members_of_symbol(symbol);
        let mut declared = StructuredMembers::default();
        for (name, &member) in &table {
            if self.is_named_member(name, member) {
                declared.members.insert(name.clone(), member);
                declared.properties.push(member);
            }
        }
        declared.call_signatures = self.get_signatures_of_member(&table, internal_names::CALL);
        declared.construct_signatures = self.get_signatures_of_member(&table, internal_names::NEW);
        declared.index_infos = self.get_index_infos_of_member(&table);
        let declared = Rc::new(declared);
        if let Some(iface) = self.ctx.types.get_mut(target).as_interface_mut() {
            iface.declared_members = Some(declared.clone());
        }
        declared
    }

    /// Declared targets and references both resolve as a reference whose
    /// arguments are padded with the reference itself as `this`.
    fn resolve_type_reference_members(&mut self, t: TypeId) -> Rc<StructuredMembers> {
        let target = self.get_target_type(t);
        let mut type_parameters = self.target_type_parameters(target);
        let mut type_arguments = self.get_type_arguments(t);
        if let Some(this_type) = self.get_this_type_of_target(target) {
            type_parameters.push(this_type);
            if type_arguments.len() < type_parameters.len() {
                type_arguments.push(t);
            }
        }
        self.resolve_object_type_members(target, &type_parameters, &type_arguments)
    }

    fn resolve_object_type_members(
        &mut self,
        source: TypeId,
        type_parameters: &[TypeId],
        type_arguments: &[TypeId],
    ) -> Rc<StructuredMembers> {
        let declared = self.resolve_declared_members(source);
        let (mut members, mapper) = if type_parameters == type_arguments {
            ((*declared).clone(), None)
        } else {
            let mapper = TypeMapper::from_lists(type_parameters.to_vec(), Some(type_arguments.to_vec()));
            (self.instantiate_members(&declared, &mapper), Some(mapper))
        };
        let base_types = self.get_base_types(source);
        if base_types.is_empty() {
            return Rc::new(members);
        }
        let this_argument = type_arguments.last().copied();
        for &base in base_types.iter() {
            let instantiated = self.instantiate_type_opt(base, mapper.as_ref());
            let base_with_this = self.get_type_with_this_argument(instantiated, this_argument);
            if self.type_flags(base_with_this).contains(TypeFlags::ANY) {
                add_index_info(&mut members.index_infos, IndexInfo::new(TypeId::STRING, TypeId::ANY, false));
                continue;
            }
            for property in self.get_properties_of_type(base_with_this) {
                let name = self.symbol_name(property);
                if !members.members.contains_key(&name) {
                    members.members.insert(name, property);
                    members.properties.push(property);
                }
            }
            members
                .call_signatures
                .extend(self.get_signatures_of_type(base_with_this, SignatureKind::Call));
            members
                .construct_signatures
                .extend(self.get_signatures_of_type(base_with_this, SignatureKind::Construct));
            for info in self.get_index_infos_of_type(base_with_this) {
                add_index_info(&mut members.index_infos, info);
            }
        }
        Rc::new(members)
    }

    /// Reference to the same target with `this_argument` (or the target's
    /// own `this` type) appended to its arguments.
    pub(crate) fn get_type_with_this_argument(&mut self, t: TypeId, this_argument: Option<TypeId>) -> TypeId {
        if self.object_flags(t).contains(ObjectFlags::REFERENCE) {
            let target = self.get_target_type(t);
            let Some(this_type) = self.get_this_type_of_target(target) else {
                return t;
            };
            let arguments = self.get_type_arguments(t);
            if arguments.len() != self.target_type_parameters(target).len() {
                return t;
            }
            let mut padded = arguments;
            padded.push(this_argument.unwrap_or(this_type));
            return self.ctx.types.create_type_reference(target, padded);
        }
        if self.type_flags(t).contains(TypeFlags::INTERSECTION) {
            let types: Vec<TypeId> = self
                .ty(t)
                .constituents()
                .to_vec()
                .into_iter()
                .map(|c| self.get_type_with_this_argument(c, this_argument))
                .collect();
            return self.get_intersection_type(&types);
        }
        t
    }

    fn instantiate_members(&mut self, source: &StructuredMembers, mapper: &Rc<TypeMapper>) -> StructuredMembers {
        let mut result = StructuredMembers::default();
        for &property in &source.properties {
            let instantiated = self.instantiate_symbol(property, mapper);
            result.members.insert(self.symbol_name(property), instantiated);
            result.properties.push(instantiated);
        }
        result.call_signatures = source
            .call_signatures
            .iter()
            .map(|&s| self.instantiate_signature(s, mapper, false))
            .collect();
        result.construct_signatures = source
            .construct_signatures
            .iter()
            .map(|&s| self.instantiate_signature(s, mapper, false))
            .collect();
        result.index_infos = source
            .index_infos
            .iter()
            .map(|info| self.instantiate_index_info(info, mapper))
            .collect();
        result
    }

    pub(crate) fn instantiate_index_info(&mut self, info: &IndexInfo, mapper: &Rc<TypeMapper>) -> IndexInfo {
        IndexInfo {
            value_type: self.instantiate_type(info.value_type, mapper),
            ..info.clone()
        }
    }

    // =========================================================================
    // Anonymous types
    // =========================================================================

    fn resolve_instantiated_anonymous_members(
        &mut self,
        target: TypeId,
        mapper: &Rc<TypeMapper>,
    ) -> Rc<StructuredMembers> {
        let source = self.resolve_structured_type_members(target);
        Rc::new(self.instantiate_members(&source, mapper))
    }

    fn resolve_anonymous_type_members(&mut self, t: TypeId) -> Rc<StructuredMembers> {
        let symbol = self.ty(t).symbol;
        if symbol.is_none() {
            return StructuredMembers::empty();
        }
        let flags = self.symbol_flags_raw(symbol);
        let mut result = StructuredMembers::default();
        if flags & (symbol_flags::TYPE_LITERAL | symbol_flags::OBJECT_LITERAL) != 0 {
            let table = self.members_of_symbol(symbol);
            for (name, &member) in &table {
                if self.is_named_member(name, member) {
                    result.members.insert(name.clone(), member);
                    result.properties.push(member);
                }
            }
            result.call_signatures = self.get_signatures_of_member(&table, internal_names::CALL);
            result.construct_signatures = self.get_signatures_of_member(&table, internal_names::NEW);
            result.index_infos = self.get_index_infos_of_member(&table);
            return Rc::new(result);
        }

        if flags & (symbol_flags::CLASS | symbol_flags::ENUM | symbol_flags::VALUE_MODULE) != 0 {
            let exports = self.get_exports_of_symbol(symbol);
            for (name, &member) in exports.iter() {
                if self.is_named_member(name, member) {
                    result.members.insert(name.clone(), member);
                    result.properties.push(member);
                }
            }
        }
        if flags & (symbol_flags::FUNCTION | symbol_flags::METHOD) != 0 {
            result.call_signatures = self.get_signatures_of_symbol(symbol);
        }
        if flags & symbol_flags::CLASS != 0 {
            let class_type = self.get_declared_type_of_symbol(symbol);
            let base_constructor = self.get_base_constructor_type_of_class(class_type);
            let base_flags = self.type_flags(base_constructor);
            if base_flags.intersects(TypeFlags::OBJECT | TypeFlags::INTERSECTION | TypeFlags::TYPE_VARIABLE) {
                for property in self.get_properties_of_type(base_constructor) {
                    let name = self.symbol_name(property);
                    if !result.members.contains_key(&name) {
                        result.members.insert(name, property);
                        result.properties.push(property);
                    }
                }
            } else if base_flags.contains(TypeFlags::ANY) {
                result.index_infos.push(IndexInfo::new(TypeId::STRING, TypeId::ANY, false));
            }
            result.construct_signatures = self.get_construct_signatures_of_class(symbol, class_type);
        }
        if flags & symbol_flags::ENUM != 0 && !self.is_string_enum(symbol) {
            result.index_infos.push(IndexInfo::new(TypeId::NUMBER, TypeId::STRING, true));
        }
        Rc::new(result)
    }

    /// Member table of a symbol, following merges.
    fn members_of_symbol(&self, symbol: SymbolId) -> SymbolTable {
        if symbol.is_none() {
            return SymbolTable::default();
        }
        let symbol = self.get_merged_symbol(symbol);
        self.symbol(symbol).members.clone().unwrap_or_default()
    }

    /// Whether a table entry surfaces as a property.
    fn is_named_member(&mut self, name: &str, member: SymbolId) -> bool {
        !internal_names::is_reserved_member_name(name) && self.symbol_is_value(member)
    }

    fn get_signatures_of_member(&mut self, table: &SymbolTable, name: &str) -> Vec<SignatureId> {
        match table.get(name) {
            Some(&member) => self.get_signatures_of_symbol(member),
            None => Vec::new(),
        }
    }

    /// Index infos declared by the `__index` member of a table.
    fn get_index_infos_of_member(&mut self, table: &SymbolTable) -> Vec<IndexInfo> {
        let Some(&index_symbol) = table.get(internal_names::INDEX) else {
            return Vec::new();
        };
        let mut infos: Vec<IndexInfo> = Vec::new();
        for declaration in self.symbol_declarations(index_symbol) {
            let Some(tyck_binder::NodeKind::IndexSignature(data)) = self.ctx.arena.kind(declaration) else {
                continue;
            };
            let (parameter, annotation) = (data.parameter, data.type_annotation);
            let key_node = self.ctx.arena.type_annotation_of(parameter);
            let key_type = self.get_type_from_type_node(key_node);
            let value_type = if annotation.is_some() {
                self.get_type_from_type_node(annotation)
            } else {
                TypeId::ANY
            };
            let is_readonly = self.ctx.arena.has_flag(declaration, node_flags::READONLY);
            for key in self.union_constituents(key_type) {
                if !self.is_valid_index_key_type(key) {
                    continue;
                }
                let mut info = IndexInfo::new(key, value_type, is_readonly);
                info.declaration = declaration;
                add_index_info(&mut infos, info);
            }
        }
        infos
    }

    // =========================================================================
    // Unions and intersections
    // =========================================================================

    fn resolve_union_type_members(&mut self, t: TypeId) -> Rc<StructuredMembers> {
        let types = self.ty(t).constituents().to_vec();
        let mut result = StructuredMembers::default();
        if let Some(&first) = types.first() {
            let first_apparent = self.get_apparent_type(first);
            for property in self.get_properties_of_type(first_apparent) {
                let name = self.symbol_name(property);
                if let Some(synthetic) = self.get_property_of_union_or_intersection_type(t, &name) {
                    result.members.insert(name, synthetic);
                    result.properties.push(synthetic);
                }
            }
        }
        result.call_signatures = self.get_union_signatures(&types, SignatureKind::Call);
        result.construct_signatures = self.get_union_signatures(&types, SignatureKind::Construct);
        result.index_infos = self.get_union_index_infos(&types);
        Rc::new(result)
    }

    /// Index infos present, by key type, in every constituent.
    fn get_union_index_infos(&mut self, types: &[TypeId]) -> Vec<IndexInfo> {
        let Some(&first) = types.first() else {
            return Vec::new();
        };
        let mut result = Vec::new();
        for info in self.get_index_infos_of_type(first) {
            let mut values = vec![info.value_type];
            let mut is_readonly = info.is_readonly;
            let mut in_all = true;
            for &other in &types[1..] {
                match self.get_index_info_of_type(other, info.key_type) {
                    Some(found) => {
                        values.push(found.value_type);
                        is_readonly |= found.is_readonly;
                    }
                    None => {
                        in_all = false;
                        break;
                    }
                }
            }
            if in_all {
                let value_type = self.get_union_type(&values);
                result.push(IndexInfo::new(info.key_type, value_type, is_readonly));
            }
        }
        result
    }

    fn resolve_intersection_type_members(&mut self, t: TypeId) -> Rc<StructuredMembers> {
        let types = self.ty(t).constituents().to_vec();
        let mut result = StructuredMembers::default();
        let mut names: Vec<String> = Vec::new();
        for &constituent in &types {
            let apparent = self.get_apparent_type(constituent);
            for property in self.get_properties_of_type(apparent) {
                let name = self.symbol_name(property);
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        for name in names {
            if let Some(property) = self.get_property_of_union_or_intersection_type(t, &name) {
                result.members.insert(name, property);
                result.properties.push(property);
            }
        }
        for &constituent in &types {
            result
                .call_signatures
                .extend(self.get_signatures_of_type(constituent, SignatureKind::Call));
            result
                .construct_signatures
                .extend(self.get_signatures_of_type(constituent, SignatureKind::Construct));
            for info in self.get_index_infos_of_type(constituent) {
                match result.index_infos.iter().position(|i| i.key_type == info.key_type) {
                    Some(position) => {
                        let existing = result.index_infos[position].clone();
                        let value_type = self.get_intersection_type(&[existing.value_type, info.value_type]);
                        result.index_infos[position] = IndexInfo::new(
                            info.key_type,
                            value_type,
                            existing.is_readonly && info.is_readonly,
                        );
                    }
                    None => result.index_infos.push(info),
                }
            }
        }
        Rc::new(result)
    }

    /// Property of a union or intersection, excluding union properties
    /// missing from some constituent.
    pub(crate) fn get_property_of_union_or_intersection_type(&mut self, t: TypeId, name: &str) -> Option<SymbolId> {
        let property = self.get_union_or_intersection_property(t, name)?;
        if self.check_flags(property).contains(CheckFlags::PARTIAL) {
            return None;
        }
        Some(property)
    }

    /// Cached synthetic property for `name`, possibly partial.
    fn get_union_or_intersection_property(&mut self, t: TypeId, name: &str) -> Option<SymbolId> {
        let key = (t, name.to_string());
        if let Some(&cached) = self.ctx.synthetic_properties.get(&key) {
            return cached;
        }
        let property = self.create_union_or_intersection_property(t, name);
        self.ctx.synthetic_properties.insert(key, property);
        property
    }

    fn create_union_or_intersection_property(&mut self, containing: TypeId, name: &str) -> Option<SymbolId> {
        let is_union = self.type_flags(containing).contains(TypeFlags::UNION);
        let types = self.ty(containing).constituents().to_vec();
        let mut single: Option<SymbolId> = None;
        let mut properties: Vec<SymbolId> = Vec::new();
        let mut index_types: Vec<TypeId> = Vec::new();
        let mut check_flags = if is_union { CheckFlags::empty() } else { CheckFlags::READONLY };
        let mut optional: Option<bool> = None;

        for constituent in types {
            let apparent = self.get_apparent_type(constituent);
            if apparent.is_error() || self.type_flags(apparent).contains(TypeFlags::NEVER) {
                continue;
            }
            if let Some(property) = self.get_property_of_type(apparent, name) {
                let property_optional = self.symbol_flags_raw(property) & symbol_flags::OPTIONAL != 0;
                optional = Some(match optional {
                    None => property_optional,
                    Some(previous) if is_union => previous || property_optional,
                    Some(previous) => previous && property_optional,
                });
                if single.is_none() {
                    single = Some(property);
                }
                if !properties.contains(&property) {
                    properties.push(property);
                }
                let readonly = self.is_readonly_symbol(property);
                if is_union && readonly {
                    check_flags |= CheckFlags::READONLY;
                } else if !is_union && !readonly {
                    check_flags -= CheckFlags::READONLY;
                }
            } else if is_union {
                let index_info = self.get_applicable_index_info_for_name(apparent, name);
                if let Some(info) = index_info {
                    if info.is_readonly {
                        check_flags |= CheckFlags::READONLY;
                    }
                    let value = if self.is_tuple_type(apparent) {
                        self.get_rest_type_of_tuple_type(apparent).unwrap_or(TypeId::UNDEFINED)
                    } else {
                        info.value_type
                    };
                    index_types.push(value);
                } else if self.object_flags(apparent).contains(ObjectFlags::OBJECT_LITERAL) {
                    index_types.push(TypeId::UNDEFINED);
                } else {
                    check_flags |= CheckFlags::PARTIAL;
                }
            }
        }
        let single = single?;
        if properties.len() == 1 && index_types.is_empty() && !check_flags.contains(CheckFlags::PARTIAL) {
            return Some(single);
        }

        let mut property_types: Vec<TypeId> = Vec::with_capacity(properties.len() + index_types.len());
        let mut first_type: Option<TypeId> = None;
        let mut declarations = Vec::new();
        for &property in &properties {
            let property_type = self.get_type_of_symbol(property);
            match first_type {
                None => first_type = Some(property_type),
                Some(first) if first != property_type => check_flags |= CheckFlags::HAS_NON_UNIFORM_TYPE,
                Some(_) => {}
            }
            if self.is_literal_type(property_type) || self.is_unit_type(property_type) {
                check_flags |= CheckFlags::HAS_LITERAL_PART;
            }
            declarations.extend(self.symbol_declarations(property));
            property_types.push(property_type);
        }
        property_types.extend(index_types);
        let result_type = if is_union {
            self.get_union_type(&property_types)
        } else {
            self.get_intersection_type(&property_types)
        };

        let mut flags = symbol_flags::PROPERTY;
        if optional == Some(true) {
            flags |= symbol_flags::OPTIONAL;
        }
        let result = self.create_symbol(flags, name, CheckFlags::SYNTHETIC_PROPERTY | check_flags);
        if let Some(created) = self.transient_symbol_mut(result) {
            created.value_declaration = declarations.first().copied().unwrap_or(tyck_binder::NodeIndex::NONE);
            created.declarations = declarations;
        }
        let links = self.links(result);
        links.containing_type = Some(containing);
        links.type_ = Some(result_type);
        trace!(containing = containing.0, name, ty = result_type.0, "synthetic property");
        Some(result)
    }

    // =========================================================================
    // Apparent and reduced types
    // =========================================================================

    /// Type whose members a value of type `t` exposes.
    pub(crate) fn get_apparent_type(&mut self, t: TypeId) -> TypeId {
        let t = if self.type_flags(t).intersects(TypeFlags::INSTANTIABLE) {
            self.get_base_constraint_of_type(t).unwrap_or(TypeId::UNKNOWN)
        } else {
            t
        };
        let flags = self.type_flags(t);
        let global = if flags.intersects(TypeFlags::STRING_LIKE) {
            Some("String")
        } else if flags.intersects(TypeFlags::NUMBER_LIKE) {
            Some("Number")
        } else if flags.intersects(TypeFlags::BIG_INT_LIKE) {
            Some("BigInt")
        } else if flags.intersects(TypeFlags::BOOLEAN_LIKE) {
            Some("Boolean")
        } else if flags.intersects(TypeFlags::ES_SYMBOL_LIKE) {
            Some("Symbol")
        } else {
            None
        };
        if let Some(name) = global {
            return self.get_global_type(name).unwrap_or(t);
        }
        if flags.contains(TypeFlags::NON_PRIMITIVE) {
            return TypeId::EMPTY_OBJECT;
        }
        if flags.contains(TypeFlags::INDEX) {
            return self.string_number_symbol_type();
        }
        if flags.contains(TypeFlags::UNKNOWN) && !self.ctx.strict_null_checks() {
            return TypeId::EMPTY_OBJECT;
        }
        t
    }

    /// `t` with never-reducing intersections replaced by `never`.
    pub(crate) fn get_reduced_type(&mut self, t: TypeId) -> TypeId {
        let flags = self.type_flags(t);
        if flags.contains(TypeFlags::UNION) && self.object_flags(t).contains(ObjectFlags::CONTAINS_INTERSECTIONS) {
            if let Some(&cached) = self.ctx.reduced_types.get(&t) {
                return cached;
            }
            let types = self.ty(t).constituents().to_vec();
            let reduced: Vec<TypeId> = types.iter().map(|&c| self.get_reduced_type(c)).collect();
            let result = if reduced == types {
                t
            } else {
                self.get_union_type_ex(&reduced, UnionReduction::Literal, None, None)
            };
            self.ctx.reduced_types.insert(t, result);
            return result;
        }
        if flags.contains(TypeFlags::INTERSECTION) {
            let object_flags = self.object_flags(t);
            if !object_flags.contains(ObjectFlags::IS_NEVER_INTERSECTION_COMPUTED) {
                let properties = self.resolve_structured_type_members(t).properties.clone();
                let is_never = properties.into_iter().any(|p| self.is_never_reduced_property(p));
                let ty = self.ctx.types.get_mut(t);
                ty.object_flags |= ObjectFlags::IS_NEVER_INTERSECTION_COMPUTED;
                if is_never {
                    ty.object_flags |= ObjectFlags::IS_NEVER_INTERSECTION;
                }
            }
            if self.object_flags(t).contains(ObjectFlags::IS_NEVER_INTERSECTION) {
                return TypeId::NEVER;
            }
        }
        t
    }

    /// A required discriminant whose literal parts conflict.
    fn is_never_reduced_property(&mut self, property: SymbolId) -> bool {
        let discriminant = CheckFlags::HAS_NON_UNIFORM_TYPE | CheckFlags::HAS_LITERAL_PART;
        self.symbol_flags_raw(property) & symbol_flags::OPTIONAL == 0
            && self.check_flags(property).contains(discriminant)
            && self.get_type_of_symbol(property) == TypeId::NEVER
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get_properties_of_type(&mut self, t: TypeId) -> Vec<SymbolId> {
        let t = self.get_reduced_apparent_type(t);
        self.resolve_structured_type_members(t).properties.clone()
    }

    /// Property named `name`, falling back to the members of the global
    /// `Function` (for callable types) and `Object` interfaces.
    pub fn get_property_of_type(&mut self, t: TypeId, name: &str) -> Option<SymbolId> {
        let t = self.get_reduced_apparent_type(t);
        let flags = self.type_flags(t);
        if flags.intersects(TypeFlags::UNION_OR_INTERSECTION) {
            return self.get_property_of_union_or_intersection_type(t, name);
        }
        if !flags.contains(TypeFlags::OBJECT) {
            return None;
        }
        let members = self.resolve_structured_type_members(t);
        if let Some(&property) = members.members.get(name) {
            return Some(property);
        }
        let is_callable = !members.call_signatures.is_empty() || !members.construct_signatures.is_empty();
        if is_callable
            && let Some(function_type) = self.get_global_type("Function")
            && function_type != t
            && let Some(&property) = self.resolve_structured_type_members(function_type).members.get(name)
        {
            return Some(property);
        }
        let object_type = self.get_global_type("Object")?;
        if object_type == t {
            return None;
        }
        self.resolve_structured_type_members(object_type).members.get(name).copied()
    }

    pub fn get_signatures_of_type(&mut self, t: TypeId, kind: SignatureKind) -> Vec<SignatureId> {
        let t = self.get_reduced_apparent_type(t);
        let members = self.resolve_structured_type_members(t);
        match kind {
            SignatureKind::Call => members.call_signatures.clone(),
            SignatureKind::Construct => members.construct_signatures.clone(),
        }
    }

    pub fn get_index_infos_of_type(&mut self, t: TypeId) -> Vec<IndexInfo> {
        let t = self.get_reduced_apparent_type(t);
        self.resolve_structured_type_members(t).index_infos.clone()
    }

    /// Index info declared for exactly `key_type`.
    pub(crate) fn get_index_info_of_type(&mut self, t: TypeId, key_type: TypeId) -> Option<IndexInfo> {
        self.get_index_infos_of_type(t)
            .into_iter()
            .find(|info| info.key_type == key_type)
    }

    /// Index info that applies to a key: the infos whose key type accepts
    /// it, combined, or else the string info when the key is numeric-like.
    pub(crate) fn get_applicable_index_info(&mut self, t: TypeId, key_type: TypeId) -> Option<IndexInfo> {
        let infos = self.get_index_infos_of_type(t);
        let mut string_info = None;
        let mut applicable: Vec<IndexInfo> = Vec::new();
        for info in infos {
            if info.key_type == TypeId::STRING {
                string_info = Some(info);
            } else if self.is_applicable_index_type(key_type, info.key_type) {
                applicable.push(info);
            }
        }
        match applicable.len() {
            0 => string_info.filter(|_| self.is_applicable_index_type(key_type, TypeId::STRING)),
            1 => applicable.pop(),
            _ => {
                let values: Vec<TypeId> = applicable.iter().map(|i| i.value_type).collect();
                let value_type = self.get_intersection_type(&values);
                let is_readonly = applicable.iter().all(|i| i.is_readonly);
                Some(IndexInfo::new(TypeId::UNKNOWN, value_type, is_readonly))
            }
        }
    }

    pub(crate) fn get_applicable_index_info_for_name(&mut self, t: TypeId, name: &str) -> Option<IndexInfo> {
        let key = if is_numeric_literal_name(name) {
            name.parse::<f64>().map_or(TypeId::STRING, |n| self.ctx.types.number_literal(n))
        } else {
            self.ctx.types.string_literal(name)
        };
        self.get_applicable_index_info(t, key)
    }

    pub(crate) fn is_applicable_index_type(&mut self, source: TypeId, target: TypeId) -> bool {
        if self.is_type_assignable_to(source, target) {
            return true;
        }
        if target == TypeId::STRING {
            return self.is_type_assignable_to(source, TypeId::NUMBER);
        }
        target == TypeId::NUMBER
            && self
                .string_literal_value(source)
                .is_some_and(|value| is_numeric_literal_name(&value))
    }

    pub(crate) fn is_readonly_symbol(&self, symbol: SymbolId) -> bool {
        if self.check_flags(symbol).contains(CheckFlags::READONLY) {
            return true;
        }
        let flags = self.symbol_flags_raw(symbol);
        if flags & symbol_flags::ENUM_MEMBER != 0 {
            return true;
        }
        self.symbol(symbol).declarations.iter().any(|&d| {
            let declaration_flags = self.ctx.arena.flags(d);
            declaration_flags & node_flags::READONLY != 0
                || (flags & symbol_flags::VARIABLE != 0 && declaration_flags & node_flags::CONST != 0)
        })
    }
}

fn add_index_info(infos: &mut Vec<IndexInfo>, info: IndexInfo) {
    if !infos.iter().any(|existing| existing.key_type == info.key_type) {
        infos.push(info);
    }
}

/// Names that round-trip through number formatting, such as `"0"` or `"1.5"`.
pub(crate) fn is_numeric_literal_name(name: &str) -> bool {
    name.parse::<f64>()
        .is_ok_and(|value| tyck_binder::format_number(value) == name)
}
