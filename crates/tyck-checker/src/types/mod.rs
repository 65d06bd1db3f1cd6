//! Type construction and resolution.
//!
//! The interner in `tyck-types` only allocates and keys types. Everything
//! that needs symbols, declarations or the resolution stack (declared types,
//! lowering of type nodes, member resolution, instantiation, normalization,
//! indexed access) lives here as `CheckerState` methods, one concern per
//! submodule.

mod bases;
mod constraints;
mod declared;
mod indexed_access;
mod instantiate;
mod intersection;
mod literals;
mod mapped;
mod members;
mod signatures;
mod symbol_types;
mod tuples;
mod type_nodes;
mod union;

pub(crate) use mapped::MappedTypeModifiers;
pub(crate) use members::is_numeric_literal_name;
pub(crate) use type_nodes::parse_pseudo_big_int;

use std::rc::Rc;

use tracing::trace;
use tyck_binder::{NodeIndex, NodeKind, SymbolId, symbol_flags};
use tyck_common::diagnostics::diagnostic_codes;
use tyck_types::{
    IndexInfo, InterfaceType, ObjectFlags, ObjectKind, ObjectType, StructuredMembers, TypeData,
    TypeFlags, TypeId, TypeReference, get_type_list_id,
};

use crate::context::{ResolutionProperty, ResolutionTarget};
use crate::state::CheckerState;
use crate::symbols::links::CheckFlags;

/// See [`CheckerState::get_recursion_identity`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum RecursionIdentity {
    Symbol(SymbolId),
    Node(NodeIndex),
    Type(TypeId),
}

impl<'a> CheckerState<'a> {
    // =========================================================================
    // References
    // =========================================================================

    /// Payload of a type reference.
    pub(crate) fn reference_data(&self, t: TypeId) -> Option<&TypeReference> {
        match &self.ty(t).as_object()?.kind {
            ObjectKind::Reference(r) => Some(r),
            _ => None,
        }
    }

    /// Type arguments of a reference, or the type parameters of a generic
    /// declared type. Deferred references resolve their arguments from the
    /// array or tuple node on first request.
    pub(crate) fn get_type_arguments(&mut self, t: TypeId) -> Vec<TypeId> {
        if let Some(iface) = self.ty(t).as_interface() {
            return iface.type_parameters.clone();
        }
        let Some(reference) = self.reference_data(t) else {
            return Vec::new();
        };
        if let Some(args) = &reference.resolved_type_arguments {
            return args.clone();
        }
        let (target, node, mapper) = (reference.target, reference.node, reference.mapper.clone());
        let arity = self
            .ty(target)
            .as_interface()
            .map_or(0, |i| i.type_parameters.len());
        if !self.push_type_resolution(ResolutionTarget::Type(t), ResolutionProperty::ResolvedTypeArguments) {
            return vec![TypeId::ERROR; arity];
        }
        let element_nodes: Vec<NodeIndex> = match self.ctx.arena.kind(node) {
            Some(NodeKind::ArrayType(array)) => vec![array.element_type],
            Some(NodeKind::TupleType(tuple)) => tuple.elements.clone(),
            _ => Vec::new(),
        };
        let mut args: Vec<TypeId> = element_nodes
            .iter()
            .map(|&element| self.get_type_from_tuple_element_node(element))
            .collect();
        if self.pop_type_resolution() {
            if let Some(mapper) = mapper {
                args = self.instantiate_types(&args, &mapper);
            }
        } else {
            let is_tuple = self.ty(target).tuple_info().is_some();
            if is_tuple {
                self.error(node, diagnostic_codes::TUPLE_TYPE_ARGUMENTS_CIRCULARLY_REFERENCE_THEMSELVES, &[]);
            } else {
                let name = self.symbol_to_string(self.ty(target).symbol);
                self.error(
                    node,
                    diagnostic_codes::TYPE_ARGUMENTS_CIRCULARLY_REFERENCE_THEMSELVES,
                    &[&name],
                );
            }
            args = vec![TypeId::ERROR; arity.max(element_nodes.len())];
        }
        trace!(reference = t.0, count = args.len(), "deferred type arguments resolved");
        if let Some(ObjectType {
            kind: ObjectKind::Reference(reference),
            ..
        }) = self.ctx.types.get_mut(t).as_object_mut()
            && reference.resolved_type_arguments.is_none()
        {
            reference.resolved_type_arguments = Some(args.clone());
        }
        args
    }

    /// Generic target of a reference; the type itself otherwise.
    pub(crate) fn get_target_type(&self, t: TypeId) -> TypeId {
        self.reference_data(t).map_or(t, |r| r.target)
    }

    /// Type parameters of a class, interface or tuple target, without the
    /// `this` type.
    pub(crate) fn target_type_parameters(&self, target: TypeId) -> Vec<TypeId> {
        self.ty(target)
            .as_interface()
            .map(|i| i.type_parameters.clone())
            .unwrap_or_default()
    }

    pub(crate) fn is_tuple_type(&self, t: TypeId) -> bool {
        self.reference_data(t)
            .is_some_and(|r| self.ty(r.target).tuple_info().is_some())
    }

    pub(crate) fn is_array_type(&self, t: TypeId) -> bool {
        let Some(reference) = self.reference_data(t) else {
            return false;
        };
        self.ctx
            .array_targets
            .is_some_and(|(array, readonly)| reference.target == array || reference.target == readonly)
            || self.is_global_array_target(reference.target)
    }

    pub(crate) fn is_readonly_array_type(&self, t: TypeId) -> bool {
        let Some(reference) = self.reference_data(t) else {
            return false;
        };
        self.ctx.array_targets.is_some_and(|(_, readonly)| reference.target == readonly)
            || self
                .ctx
                .global_types
                .get("ReadonlyArray")
                .copied()
                .flatten()
                == Some(reference.target)
    }

    pub(crate) fn is_global_array_target(&self, target: TypeId) -> bool {
        ["Array", "ReadonlyArray"]
            .iter()
            .any(|name| self.ctx.global_types.get(name).copied().flatten() == Some(target))
    }

    pub(crate) fn is_array_or_tuple_type(&self, t: TypeId) -> bool {
        self.is_array_type(t) || self.is_tuple_type(t)
    }

    // =========================================================================
    // Globals
    // =========================================================================

    /// Declared type of a global class or interface.
    pub(crate) fn get_global_type(&mut self, name: &'static str) -> Option<TypeId> {
        if let Some(&cached) = self.ctx.global_types.get(name) {
            return cached;
        }
        let found = self
            .get_global_symbol(name, symbol_flags::CLASS | symbol_flags::INTERFACE)
            .map(|symbol| self.get_declared_type_of_symbol(symbol))
            .filter(|&t| self.type_flags(t).contains(TypeFlags::OBJECT));
        self.ctx.global_types.insert(name, found);
        found
    }

    /// `Array<T>` or `ReadonlyArray<T>` target: the declared global when the
    /// program has one with a single type parameter, a synthesized one
    /// otherwise.
    pub(crate) fn get_global_array_target(&mut self, readonly: bool) -> TypeId {
        let name = if readonly { "ReadonlyArray" } else { "Array" };
        if let Some(declared) = self.get_global_type(name)
            && self.target_type_parameters(declared).len() == 1
        {
            return declared;
        }
        if let Some((array, readonly_array)) = self.ctx.array_targets {
            return if readonly { readonly_array } else { array };
        }
        let array = self.synthesize_array_target("Array", false);
        let readonly_array = self.synthesize_array_target("ReadonlyArray", true);
        self.ctx.array_targets = Some((array, readonly_array));
        if readonly { readonly_array } else { array }
    }

    fn synthesize_array_target(&mut self, name: &str, readonly: bool) -> TypeId {
        let symbol = self.create_symbol(symbol_flags::INTERFACE, name, CheckFlags::empty());
        let parameter_symbol = self.create_symbol(symbol_flags::TYPE_PARAMETER, "T", CheckFlags::empty());
        let parameter = self.ctx.types.create_type_parameter(parameter_symbol);
        self.links(parameter_symbol).declared_type = Some(parameter);

        let mut length_flags = CheckFlags::empty();
        if readonly {
            length_flags |= CheckFlags::READONLY;
        }
        let length = self.create_symbol(symbol_flags::PROPERTY, "length", length_flags);
        self.links(length).type_ = Some(TypeId::NUMBER);
        let mut members = StructuredMembers::default();
        members.members.insert("length".to_string(), length);
        members.properties.push(length);
        members.index_infos.push(IndexInfo::new(TypeId::NUMBER, parameter, readonly));

        let target = self.ctx.types.alloc(
            TypeFlags::OBJECT,
            ObjectFlags::INTERFACE | ObjectFlags::REFERENCE,
            symbol,
            TypeData::Object(ObjectType {
                kind: ObjectKind::Interface(Box::new(InterfaceType {
                    type_parameters: vec![parameter],
                    local_type_parameters: vec![parameter],
                    declared_members: Some(Rc::new(members)),
                    resolved_base_types: Some(Rc::new(Vec::new())),
                    ..InterfaceType::default()
                })),
                members: None,
            }),
        );
        self.ctx
            .types
            .store_instantiation(target, get_type_list_id(&[parameter]), target);
        self.links(symbol).declared_type = Some(target);
        trace!(name, target = target.0, "synthesized array target");
        target
    }

    pub(crate) fn create_array_type(&mut self, element: TypeId, readonly: bool) -> TypeId {
        let target = self.get_global_array_target(readonly);
        self.ctx.types.create_type_reference(target, vec![element])
    }

    /// Element type of an array type, `None` for anything else.
    pub(crate) fn array_element_type(&mut self, t: TypeId) -> Option<TypeId> {
        if !self.is_array_type(t) {
            return None;
        }
        self.get_type_arguments(t).first().copied()
    }

    // =========================================================================
    // Genericity
    // =========================================================================

    /// Whether instantiating `t` could change it. Memoized for object,
    /// union and intersection types.
    pub(crate) fn could_contain_type_variables(&mut self, t: TypeId) -> bool {
        let flags = self.type_flags(t);
        if flags.intersects(TypeFlags::INSTANTIABLE_NON_PRIMITIVE | TypeFlags::INDEX) {
            return true;
        }
        if t.is_intrinsic() {
            return false;
        }
        let object_flags = self.object_flags(t);
        if object_flags.contains(ObjectFlags::COULD_CONTAIN_TYPE_VARIABLES_COMPUTED) {
            return object_flags.contains(ObjectFlags::COULD_CONTAIN_TYPE_VARIABLES);
        }
        let alias_args = self
            .ty(t)
            .alias
            .as_ref()
            .map(|a| a.type_arguments.clone())
            .unwrap_or_default();
        let mut result = alias_args.iter().any(|&a| self.could_contain_type_variables(a));
        if !result {
            result = match self.ty(t).data.clone() {
                TypeData::TemplateLiteral(template) => {
                    template.types.iter().any(|&s| self.could_contain_type_variables(s))
                }
                TypeData::Union(u) => u.types.iter().any(|&s| self.could_contain_type_variables(s)),
                TypeData::Intersection(i) => i.types.iter().any(|&s| self.could_contain_type_variables(s)),
                TypeData::Object(object) => match object.kind {
                    ObjectKind::Interface(iface) => !iface.type_parameters.is_empty(),
                    ObjectKind::Reference(reference) => match reference.resolved_type_arguments {
                        Some(args) => args.iter().any(|&a| self.could_contain_type_variables(a)),
                        None => {
                            reference.mapper.is_some()
                                || !self.get_outer_type_parameters(reference.node).is_empty()
                        }
                    },
                    ObjectKind::Anonymous(anonymous) => {
                        anonymous.target.is_some() || self.anonymous_type_could_be_generic(t)
                    }
                    ObjectKind::Mapped(_) => true,
                    ObjectKind::ReverseMapped(reverse) => self.could_contain_type_variables(reverse.source),
                },
                _ => false,
            };
        }
        if flags.intersects(TypeFlags::OBJECT_FLAGS_TYPE) {
            let ty = self.ctx.types.get_mut(t);
            ty.object_flags |= ObjectFlags::COULD_CONTAIN_TYPE_VARIABLES_COMPUTED;
            if result {
                ty.object_flags |= ObjectFlags::COULD_CONTAIN_TYPE_VARIABLES;
            }
        }
        result
    }

    /// Anonymous types of functions, classes and literals may mention type
    /// parameters of enclosing declarations or their own.
    fn anonymous_type_could_be_generic(&mut self, t: TypeId) -> bool {
        let symbol = self.ty(t).symbol;
        if symbol.is_none() {
            return false;
        }
        let flags = self.symbol_flags_raw(symbol);
        if flags
            & (symbol_flags::FUNCTION
                | symbol_flags::METHOD
                | symbol_flags::CLASS
                | symbol_flags::TYPE_LITERAL
                | symbol_flags::OBJECT_LITERAL)
            == 0
        {
            return false;
        }
        self.symbol_declarations(symbol).into_iter().any(|declaration| {
            !self.ctx.arena.type_parameters_of(declaration).is_empty()
                || !self.get_outer_type_parameters(declaration).is_empty()
        })
    }

    /// `T`, `T[K]`, generic mapped types and unions or intersections that
    /// contain one.
    pub(crate) fn is_generic_object_type(&mut self, t: TypeId) -> bool {
        let flags = self.type_flags(t);
        if flags.intersects(TypeFlags::INSTANTIABLE_NON_PRIMITIVE) {
            return true;
        }
        if flags.intersects(TypeFlags::UNION_OR_INTERSECTION) {
            let types = self.ty(t).constituents().to_vec();
            return types.into_iter().any(|c| self.is_generic_object_type(c));
        }
        if self.is_generic_mapped_type(t) {
            return true;
        }
        self.is_generic_tuple_type(t)
    }

    /// Index types whose value is unknown until instantiation.
    pub(crate) fn is_generic_index_type(&mut self, t: TypeId) -> bool {
        let flags = self.type_flags(t);
        if flags.intersects(TypeFlags::INSTANTIABLE_NON_PRIMITIVE | TypeFlags::INDEX) {
            return true;
        }
        match self.ty(t).data.clone() {
            TypeData::TemplateLiteral(template) => {
                template.types.iter().any(|&s| self.is_generic_index_type(s))
            }
            TypeData::Union(u) => u.types.iter().any(|&s| self.is_generic_index_type(s)),
            TypeData::Intersection(i) => i.types.iter().any(|&s| self.is_generic_index_type(s)),
            _ => false,
        }
    }

    pub(crate) fn is_generic_type(&mut self, t: TypeId) -> bool {
        self.is_generic_object_type(t) || self.is_generic_index_type(t)
    }

    /// Identity shared by all instantiations of one generic declaration,
    /// used to detect infinitely expanding recursion.
    pub(crate) fn get_recursion_identity(&self, t: TypeId) -> RecursionIdentity {
        let flags = self.type_flags(t);
        if flags.contains(TypeFlags::OBJECT) && !self.is_object_or_array_literal_type(t) {
            if let Some(reference) = self.reference_data(t)
                && reference.node.is_some()
            {
                return RecursionIdentity::Node(reference.node);
            }
            let symbol = self.ty(t).symbol;
            if symbol.is_some()
                && !(self.object_flags(t).contains(ObjectFlags::ANONYMOUS)
                    && self.symbol_flags_raw(symbol) & symbol_flags::CLASS != 0)
            {
                return RecursionIdentity::Symbol(symbol);
            }
            if self.is_tuple_type(t) {
                return RecursionIdentity::Type(self.get_target_type(t));
            }
        }
        if flags.contains(TypeFlags::TYPE_PARAMETER) && self.ty(t).symbol.is_some() {
            return RecursionIdentity::Symbol(self.ty(t).symbol);
        }
        if flags.contains(TypeFlags::INDEXED_ACCESS) {
            let mut current = t;
            while let TypeData::IndexedAccess(access) = &self.ty(current).data {
                current = access.object_type;
            }
            return RecursionIdentity::Type(current);
        }
        RecursionIdentity::Type(t)
    }

    /// Object literals, type literals, enums and namespaces have an implied
    /// index signature; class instances and interfaces do not.
    pub(crate) fn is_object_type_with_inferable_index(&self, t: TypeId) -> bool {
        if self.type_flags(t).contains(TypeFlags::INTERSECTION) {
            return self
                .ty(t)
                .constituents()
                .iter()
                .all(|&c| self.is_object_type_with_inferable_index(c));
        }
        let symbol = self.ty(t).symbol;
        symbol.is_some()
            && self.symbol_flags_raw(symbol)
                & (symbol_flags::OBJECT_LITERAL | symbol_flags::TYPE_LITERAL | symbol_flags::ENUM | symbol_flags::VALUE_MODULE)
                != 0
            && self.symbol_flags_raw(symbol) & symbol_flags::CLASS == 0
    }

    /// Tuple with a variadic element.
    pub(crate) fn is_generic_tuple_type(&self, t: TypeId) -> bool {
        let Some(reference) = self.reference_data(t) else {
            return false;
        };
        self.ty(reference.target)
            .tuple_info()
            .is_some_and(|info| info.combined_flags.contains(tyck_types::ElementFlags::VARIADIC))
    }

    // =========================================================================
    // Shapes
    // =========================================================================

    /// Object type with no properties, signatures or index infos.
    pub(crate) fn is_empty_object_type(&mut self, t: TypeId) -> bool {
        let flags = self.type_flags(t);
        if flags.contains(TypeFlags::OBJECT) {
            if self.is_generic_mapped_type(t) {
                return false;
            }
            return self.resolve_structured_type_members(t).is_empty();
        }
        if flags.contains(TypeFlags::NON_PRIMITIVE) {
            return true;
        }
        if flags.contains(TypeFlags::INTERSECTION) {
            let types = self.ty(t).constituents().to_vec();
            return types.into_iter().all(|c| self.is_empty_object_type(c));
        }
        false
    }

    /// Object or array literal type that has not been widened yet.
    pub(crate) fn is_object_or_array_literal_type(&self, t: TypeId) -> bool {
        self.object_flags(t)
            .intersects(ObjectFlags::OBJECT_LITERAL | ObjectFlags::ARRAY_LITERAL)
    }

    /// Whether `t` or one of its union or intersection constituents has any
    /// of `kind`.
    pub(crate) fn maybe_type_of_kind(&self, t: TypeId, kind: TypeFlags) -> bool {
        let flags = self.type_flags(t);
        if flags.intersects(kind) {
            return true;
        }
        if flags.intersects(TypeFlags::UNION_OR_INTERSECTION) {
            return self
                .ty(t)
                .constituents()
                .iter()
                .any(|&c| self.maybe_type_of_kind(c, kind));
        }
        false
    }

    /// Whether every value of `t` has one of the primitive `kind`s, looking
    /// through constraints of type variables.
    pub(crate) fn is_type_assignable_to_kind(&mut self, t: TypeId, kind: TypeFlags) -> bool {
        let flags = self.type_flags(t);
        if flags.intersects(kind) {
            return true;
        }
        if flags.contains(TypeFlags::UNION) {
            let types = self.ty(t).constituents().to_vec();
            return types.into_iter().all(|c| self.is_type_assignable_to_kind(c, kind));
        }
        if flags.contains(TypeFlags::INTERSECTION) {
            let types = self.ty(t).constituents().to_vec();
            return types.into_iter().any(|c| self.is_type_assignable_to_kind(c, kind));
        }
        if flags.intersects(TypeFlags::INSTANTIABLE) {
            return match self.get_base_constraint_of_type(t) {
                Some(constraint) if constraint != t => self.is_type_assignable_to_kind(constraint, kind),
                _ => false,
            };
        }
        false
    }

    /// `unknown`, or `{}`-like types that accept every non-nullable value.
    pub(crate) fn is_unknown_like(&mut self, t: TypeId) -> bool {
        t == TypeId::UNKNOWN || (!self.ctx.strict_null_checks() && self.is_empty_object_type(t))
    }
}
