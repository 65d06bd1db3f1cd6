//! Type instantiation: applying a [`TypeMapper`] to a type.
//!
//! Instantiation short-circuits on types that cannot contain type
//! variables. Object types with free type parameters are instantiated once
//! per distinct argument list and cached on their target. Depth and total
//! count are capped; exceeding either reports 2589 and yields the error
//! type.

use std::rc::Rc;

use tracing::{debug, trace};
use tyck_binder::{NodeIndex, NodeKind, SymbolId, symbol_flags};
use tyck_common::diagnostics::diagnostic_codes;
use tyck_common::limits::{MAX_INSTANTIATION_COUNT, MAX_INSTANTIATION_DEPTH};
use tyck_types::{
    AnonymousType, MapperFunction, ObjectFlags, ObjectKind, ObjectType, TypeAlias, TypeData,
    TypeFlags, TypeId, TypeMapper, UnionReduction, VarianceFlags, get_type_list_id,
};

use crate::state::CheckerState;
use crate::symbols::links::CheckFlags;

/// Stack kept free before recursing into an instantiation.
const STACK_RED_ZONE: usize = 32 * 1024;
/// Stack segment allocated when the red zone is reached.
const STACK_GROWTH: usize = 2 * 1024 * 1024;

impl<'a> CheckerState<'a> {
    pub fn instantiate_type(&mut self, t: TypeId, mapper: &Rc<TypeMapper>) -> TypeId {
        self.instantiate_type_with_alias(t, mapper, None)
    }

    pub(crate) fn instantiate_type_opt(&mut self, t: TypeId, mapper: Option<&Rc<TypeMapper>>) -> TypeId {
        match mapper {
            Some(mapper) => self.instantiate_type(t, mapper),
            None => t,
        }
    }

    pub fn instantiate_types(&mut self, types: &[TypeId], mapper: &Rc<TypeMapper>) -> Vec<TypeId> {
        types.iter().map(|&t| self.instantiate_type(t, mapper)).collect()
    }

    /// Instantiate `t`, giving the result `alias` when one is supplied.
    pub(crate) fn instantiate_type_with_alias(
        &mut self,
        t: TypeId,
        mapper: &Rc<TypeMapper>,
        alias: Option<TypeAlias>,
    ) -> TypeId {
        if !self.could_contain_type_variables(t) {
            return t;
        }
        if self.ctx.instantiation_depth >= MAX_INSTANTIATION_DEPTH
            || self.ctx.instantiation_count >= MAX_INSTANTIATION_COUNT
        {
            debug!(
                depth = self.ctx.instantiation_depth,
                count = self.ctx.instantiation_count,
                "instantiation limit reached"
            );
            self.error_at_current_node(diagnostic_codes::TYPE_INSTANTIATION_EXCESSIVELY_DEEP, &[]);
            return TypeId::ERROR;
        }
        self.ctx.instantiation_count += 1;
        self.ctx.instantiation_depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            self.instantiate_type_worker(t, mapper, alias)
        });
        self.ctx.instantiation_depth -= 1;
        result
    }

    fn instantiate_type_worker(&mut self, t: TypeId, mapper: &Rc<TypeMapper>, alias: Option<TypeAlias>) -> TypeId {
        let flags = self.type_flags(t);
        if flags.contains(TypeFlags::TYPE_PARAMETER) {
            return self.get_mapped_type(t, mapper);
        }
        if flags.contains(TypeFlags::OBJECT) {
            let object_flags = self.object_flags(t);
            if !object_flags.intersects(ObjectFlags::REFERENCE | ObjectFlags::ANONYMOUS | ObjectFlags::MAPPED) {
                return t;
            }
            let is_deferred = self.reference_data(t).is_some_and(|r| r.node.is_some());
            if object_flags.contains(ObjectFlags::REFERENCE) && !is_deferred {
                let args = self.get_type_arguments(t);
                let new_args = self.instantiate_types(&args, mapper);
                if new_args == args {
                    return t;
                }
                let target = self.get_target_type(t);
                return self.create_normalized_type_reference(target, new_args);
            }
            if object_flags.contains(ObjectFlags::REVERSE_MAPPED) {
                return self.instantiate_reverse_mapped_type(t, mapper);
            }
            return self.get_object_type_instantiation(t, mapper, alias);
        }
        if flags.intersects(TypeFlags::UNION_OR_INTERSECTION) {
            let (types, origin_is_intersection) = match &self.ty(t).data {
                TypeData::Union(u) => match u.origin {
                    Some(origin) if self.type_flags(origin).intersects(TypeFlags::UNION_OR_INTERSECTION) => (
                        self.ty(origin).constituents().to_vec(),
                        self.type_flags(origin).contains(TypeFlags::INTERSECTION),
                    ),
                    _ => (u.types.clone(), false),
                },
                TypeData::Intersection(i) => (i.types.clone(), false),
                _ => return t,
            };
            let new_types = self.instantiate_types(&types, mapper);
            let own_alias = self.ty(t).alias.clone();
            if new_types == types && alias.as_ref().map(|a| a.symbol) == own_alias.as_ref().map(|a| a.symbol) {
                return t;
            }
            let new_alias = match alias {
                Some(alias) => Some(alias),
                None => own_alias.map(|a| TypeAlias {
                    symbol: a.symbol,
                    type_arguments: self.instantiate_types(&a.type_arguments, mapper),
                }),
            };
            return if flags.contains(TypeFlags::INTERSECTION) || origin_is_intersection {
                self.get_intersection_type_ex(&new_types, new_alias)
            } else {
                self.get_union_type_ex(&new_types, UnionReduction::Literal, new_alias, None)
            };
        }
        match self.ty(t).data.clone() {
            TypeData::Index(index) => {
                let target = self.instantiate_type(index.target, mapper);
                self.get_index_type(target, index.index_flags)
            }
            TypeData::TemplateLiteral(template) => {
                let types = self.instantiate_types(&template.types, mapper);
                self.get_template_literal_type(&template.texts, &types)
            }
            TypeData::IndexedAccess(access) => {
                let new_alias = match alias {
                    Some(alias) => Some(alias),
                    None => self.ty(t).alias.clone().map(|a| TypeAlias {
                        symbol: a.symbol,
                        type_arguments: self.instantiate_types(&a.type_arguments, mapper),
                    }),
                };
                let object = self.instantiate_type(access.object_type, mapper);
                let index = self.instantiate_type(access.index_type, mapper);
                self.get_indexed_access_type(object, index, access.access_flags, NodeIndex::NONE, new_alias)
            }
            _ => t,
        }
    }

    // =========================================================================
    // Mapper application
    // =========================================================================

    /// Apply a mapper to a single type variable.
    pub(crate) fn get_mapped_type(&mut self, t: TypeId, mapper: &Rc<TypeMapper>) -> TypeId {
        if let Some(mapped) = mapper.map_simple(t) {
            return mapped;
        }
        match mapper.as_ref() {
            TypeMapper::Deferred { sources, targets } => match sources.iter().position(|&s| s == t) {
                Some(i) => self.resolve_deferred_target(targets[i]),
                None => t,
            },
            TypeMapper::Function(function) => self.apply_mapper_function(*function, t),
            TypeMapper::Inference { context, fixing } => self.map_inference_type(*context, *fixing, t),
            TypeMapper::Merged { mapper1, mapper2 } => {
                let t1 = self.get_mapped_type(t, mapper1);
                self.get_mapped_type(t1, mapper2)
            }
            TypeMapper::Composite { mapper1, mapper2 } => {
                let t1 = self.get_mapped_type(t, mapper1);
                if t1 != t {
                    self.instantiate_type(t1, mapper2)
                } else {
                    self.get_mapped_type(t1, mapper2)
                }
            }
            _ => t,
        }
    }

    fn apply_mapper_function(&mut self, function: MapperFunction, t: TypeId) -> TypeId {
        match function {
            MapperFunction::Permissive => {
                if self.type_flags(t).contains(TypeFlags::TYPE_PARAMETER) {
                    TypeId::WILDCARD
                } else {
                    t
                }
            }
            MapperFunction::Restrictive => {
                if self.type_flags(t).contains(TypeFlags::TYPE_PARAMETER) {
                    self.get_restrictive_type_parameter(t)
                } else {
                    t
                }
            }
            MapperFunction::Unmeasurable | MapperFunction::Unreliable => {
                let is_marker = matches!(t, TypeId::MARKER_SUPER | TypeId::MARKER_SUB | TypeId::MARKER_OTHER);
                if is_marker && let Some(marks) = self.ctx.variance_marks.as_mut() {
                    *marks |= if function == MapperFunction::Unmeasurable {
                        VarianceFlags::UNMEASURABLE
                    } else {
                        VarianceFlags::UNRELIABLE
                    };
                }
                t
            }
        }
    }

    /// Unconstrained clone used by the restrictive mapper.
    fn get_restrictive_type_parameter(&mut self, parameter: TypeId) -> TypeId {
        let constraint = self.ty(parameter).as_type_parameter().and_then(|p| p.constraint);
        let unconstrained = match constraint {
            Some(c) => c == TypeId::NO_CONSTRAINT,
            None => {
                let declaration = self.type_parameter_declaration(parameter);
                self.ctx
                    .arena
                    .get_type_parameter(declaration)
                    .is_none_or(|d| d.constraint.is_none())
            }
        };
        if unconstrained {
            return parameter;
        }
        if let Some(&restrictive) = self.ctx.restrictive_type_parameters.get(&parameter) {
            return restrictive;
        }
        let symbol = self.ty(parameter).symbol;
        let restrictive = self.ctx.types.create_type_parameter(symbol);
        if let Some(data) = self.ctx.types.get_mut(restrictive).as_type_parameter_mut() {
            data.constraint = Some(TypeId::NO_CONSTRAINT);
        }
        self.ctx.restrictive_type_parameters.insert(parameter, restrictive);
        restrictive
    }

    /// Type parameters replaced by the wildcard type.
    pub(crate) fn get_permissive_instantiation(&mut self, t: TypeId) -> TypeId {
        if self.type_flags(t).intersects(TypeFlags::PRIMITIVE | TypeFlags::ANY_OR_UNKNOWN | TypeFlags::NEVER) {
            return t;
        }
        let mapper = self.ctx.permissive_mapper.clone();
        self.instantiate_type(t, &mapper)
    }

    /// Constrained type parameters replaced by unconstrained clones.
    pub(crate) fn get_restrictive_instantiation(&mut self, t: TypeId) -> TypeId {
        if self.type_flags(t).intersects(TypeFlags::PRIMITIVE | TypeFlags::ANY_OR_UNKNOWN | TypeFlags::NEVER) {
            return t;
        }
        let mapper = self.ctx.restrictive_mapper.clone();
        self.instantiate_type(t, &mapper)
    }

    /// `source -> target` applied before `mapper`.
    pub(crate) fn prepend_type_mapping(
        source: TypeId,
        target: TypeId,
        mapper: Option<Rc<TypeMapper>>,
    ) -> Rc<TypeMapper> {
        let unary = Rc::new(TypeMapper::Simple { source, target });
        TypeMapper::merge(Some(unary.clone()), mapper).unwrap_or(unary)
    }

    /// `source -> target` applied after `mapper`.
    pub(crate) fn append_type_mapping(
        mapper: Option<Rc<TypeMapper>>,
        source: TypeId,
        target: TypeId,
    ) -> Rc<TypeMapper> {
        let unary = Rc::new(TypeMapper::Simple { source, target });
        TypeMapper::merge(mapper, Some(unary.clone())).unwrap_or(unary)
    }

    /// Fresh type parameter standing in for `parameter`; its constraint is
    /// the original's, instantiated by the clone's mapper.
    pub(crate) fn clone_type_parameter(&mut self, parameter: TypeId) -> TypeId {
        let symbol = self.ty(parameter).symbol;
        let clone = self.ctx.types.create_type_parameter(symbol);
        if let Some(data) = self.ctx.types.get_mut(clone).as_type_parameter_mut() {
            data.target = Some(parameter);
        }
        clone
    }

    // =========================================================================
    // Symbols
    // =========================================================================

    /// Instantiated view of a member symbol. Its type is computed lazily
    /// from the target's type and the mapper.
    pub(crate) fn instantiate_symbol(&mut self, symbol: SymbolId, mapper: &Rc<TypeMapper>) -> SymbolId {
        if let Some(t) = self.links_ref(symbol).and_then(|l| l.type_)
            && !self.could_contain_type_variables(t)
        {
            return symbol;
        }
        let (mut target, mut mapper) = (symbol, mapper.clone());
        if self.check_flags(symbol).contains(CheckFlags::INSTANTIATED) {
            let links = self.links(symbol).clone();
            if let Some(original) = links.target {
                target = original;
                mapper = TypeMapper::combine(links.mapper, Some(mapper.clone())).unwrap_or(mapper);
            }
        }
        let source = self.symbol(target).clone();
        let inherited = self.check_flags(target)
            & (CheckFlags::READONLY | CheckFlags::OPTIONAL_PARAMETER | CheckFlags::REST_PARAMETER);
        let result = self.create_symbol(source.flags, &source.escaped_name, CheckFlags::INSTANTIATED | inherited);
        if let Some(created) = self.transient_symbol_mut(result) {
            created.declarations = source.declarations;
            created.value_declaration = source.value_declaration;
            created.parent = source.parent;
        }
        let links = self.links(result);
        links.target = Some(target);
        links.mapper = Some(mapper);
        result
    }

    // =========================================================================
    // Object types
    // =========================================================================

    /// Declaration and uninstantiated target of an anonymous, mapped or
    /// deferred reference type.
    fn instantiation_source(&self, t: TypeId) -> Option<(NodeIndex, TypeId)> {
        let object = self.ty(t).as_object()?;
        match &object.kind {
            ObjectKind::Reference(reference) => {
                let target = self
                    .node_links_ref(reference.node)
                    .and_then(|l| l.resolved_type)
                    .unwrap_or(t);
                Some((reference.node, target))
            }
            ObjectKind::Mapped(mapped) => Some((mapped.declaration, mapped.target.unwrap_or(t))),
            ObjectKind::Anonymous(anonymous) => {
                let symbol = self.ty(t).symbol;
                if symbol.is_none() {
                    return None;
                }
                let declaration = self.symbol(symbol).first_declaration();
                if declaration.is_none() {
                    return None;
                }
                Some((declaration, anonymous.target.unwrap_or(t)))
            }
            _ => None,
        }
    }

    fn object_mapper(&self, t: TypeId) -> Option<Rc<TypeMapper>> {
        match &self.ty(t).as_object()?.kind {
            ObjectKind::Reference(r) => r.mapper.clone(),
            ObjectKind::Anonymous(a) => a.mapper.clone(),
            ObjectKind::Mapped(m) => m.mapper.clone(),
            _ => None,
        }
    }

    pub(crate) fn get_object_type_instantiation(
        &mut self,
        t: TypeId,
        mapper: &Rc<TypeMapper>,
        alias: Option<TypeAlias>,
    ) -> TypeId {
        let Some((declaration, target)) = self.instantiation_source(t) else {
            return t;
        };
        let type_parameters = self.get_instantiation_type_parameters(t, declaration, target);
        if type_parameters.is_empty() {
            return t;
        }
        let combined = TypeMapper::combine(self.object_mapper(t), Some(mapper.clone())).unwrap_or_else(|| mapper.clone());
        let type_arguments: Vec<TypeId> = type_parameters
            .iter()
            .map(|&p| self.get_mapped_type(p, &combined))
            .collect();
        let new_alias = match alias {
            Some(alias) => Some(alias),
            None => self.ty(t).alias.clone().map(|a| TypeAlias {
                symbol: a.symbol,
                type_arguments: self.instantiate_types(&a.type_arguments, mapper),
            }),
        };
        let mut key = get_type_list_id(&type_arguments);
        if let Some(alias) = &new_alias {
            key.push('@');
            key.push_str(&alias.symbol.0.to_string());
            if !alias.type_arguments.is_empty() {
                key.push(':');
                key.push_str(&get_type_list_id(&alias.type_arguments));
            }
        }
        let identity_key = get_type_list_id(&type_parameters);
        if self.ctx.types.lookup_instantiation(target, &identity_key).is_none() && self.ty(target).alias.is_none() {
            self.ctx.types.store_instantiation(target, identity_key, target);
        }
        if let Some(cached) = self.ctx.types.lookup_instantiation(target, &key) {
            return cached;
        }
        let new_mapper = TypeMapper::from_lists(type_parameters.to_vec(), Some(type_arguments.clone()));
        let target_flags = self.object_flags(target);
        let result = if target_flags.contains(ObjectFlags::REFERENCE) {
            let (reference_target, node) = match self.reference_data(t) {
                Some(r) => (r.target, r.node),
                None => return t,
            };
            self.ctx
                .types
                .create_deferred_type_reference(reference_target, node, Some(new_mapper), new_alias)
        } else if target_flags.contains(ObjectFlags::MAPPED) {
            self.instantiate_mapped_type(target, &new_mapper, new_alias)
        } else {
            self.instantiate_anonymous_type(target, &new_mapper, new_alias)
        };
        self.ctx.types.store_instantiation(target, key, result);
        let result_flags = self.object_flags(result);
        if self.type_flags(result).intersects(TypeFlags::OBJECT_FLAGS_TYPE)
            && !result_flags.contains(ObjectFlags::COULD_CONTAIN_TYPE_VARIABLES_COMPUTED)
        {
            let could_contain = type_arguments.iter().any(|&a| self.could_contain_type_variables(a));
            let ty = self.ctx.types.get_mut(result);
            if result_flags.intersects(ObjectFlags::MAPPED | ObjectFlags::ANONYMOUS | ObjectFlags::REFERENCE) {
                ty.object_flags |= ObjectFlags::COULD_CONTAIN_TYPE_VARIABLES_COMPUTED;
                if could_contain {
                    ty.object_flags |= ObjectFlags::COULD_CONTAIN_TYPE_VARIABLES;
                }
            } else if !could_contain {
                ty.object_flags |= ObjectFlags::COULD_CONTAIN_TYPE_VARIABLES_COMPUTED;
            }
        }
        trace!(source = t.0, result = result.0, "object type instantiated");
        result
    }

    /// Outer type parameters an object type may reference, narrowed for
    /// type literals and deferred references to those that appear in the
    /// declaration. Cached on the declaration.
    fn get_instantiation_type_parameters(&mut self, t: TypeId, declaration: NodeIndex, target: TypeId) -> Rc<Vec<TypeId>> {
        if let Some(cached) = self.ctx.instantiation_parameters.get(&declaration) {
            return cached.clone();
        }
        let mut parameters = self.get_outer_type_parameters(declaration).to_vec();
        let mut host = self.ctx.arena.parent(declaration);
        while host.is_some() {
            if matches!(
                self.ctx.arena.kind(host),
                Some(NodeKind::ClassDeclaration(_) | NodeKind::InterfaceDeclaration(_))
            ) && let Some(this_type) = self
                .get_symbol_of_node(host)
                .map(|s| self.get_declared_type_of_symbol(s))
                .and_then(|d| self.ty(d).as_interface().and_then(|i| i.this_type))
            {
                parameters.push(this_type);
            }
            host = self.ctx.arena.parent(host);
        }
        let symbol = self.ty(target).symbol;
        let narrow = (self.object_flags(target).contains(ObjectFlags::REFERENCE)
            || (symbol.is_some()
                && self.symbol_flags_raw(symbol) & (symbol_flags::METHOD | symbol_flags::TYPE_LITERAL) != 0))
            && self.ty(target).alias.as_ref().is_none_or(|a| a.type_arguments.is_empty());
        if narrow {
            let declarations = if self.object_flags(t).contains(ObjectFlags::REFERENCE) {
                vec![declaration]
            } else {
                self.symbol_declarations(symbol)
            };
            parameters.retain(|&p| {
                declarations
                    .iter()
                    .any(|&d| self.is_type_parameter_possibly_referenced(p, d))
            });
        }
        let parameters = Rc::new(parameters);
        self.ctx.instantiation_parameters.insert(declaration, parameters.clone());
        parameters
    }

    /// Conservative scan for a reference to `parameter` inside `node`.
    fn is_type_parameter_possibly_referenced(&self, parameter: TypeId, node: NodeIndex) -> bool {
        let symbol = self.ty(parameter).symbol;
        let is_this_type = self.ty(parameter).as_type_parameter().is_some_and(|p| p.is_this_type);
        if symbol.is_none() || self.symbol(symbol).declarations.len() != 1 {
            return true;
        }
        let name = self.symbol(symbol).escaped_name.clone();
        let arena = self.ctx.arena;
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            match arena.kind(current) {
                Some(NodeKind::ThisType) if is_this_type => return true,
                Some(NodeKind::TypeReference(reference)) if !is_this_type => {
                    let first = leftmost_identifier(arena, reference.type_name);
                    if arena.identifier_text(first) == Some(name.as_str()) {
                        return true;
                    }
                }
                Some(NodeKind::TypeQuery(_)) => return true,
                Some(kind) if kind.as_function_like().is_some_and(|f| !f.body.is_none()) => return true,
                _ => {}
            }
            stack.extend(arena.children(current));
        }
        false
    }

    /// Anonymous or mapped type sharing `target`'s declaration with
    /// `mapper` applied lazily to its members.
    pub(crate) fn instantiate_anonymous_type(
        &mut self,
        target: TypeId,
        mapper: &Rc<TypeMapper>,
        alias: Option<TypeAlias>,
    ) -> TypeId {
        let source = self.ty(target).clone();
        let mut object_flags = (source.object_flags
            - ObjectFlags::COULD_CONTAIN_TYPE_VARIABLES
            - ObjectFlags::COULD_CONTAIN_TYPE_VARIABLES_COMPUTED
            - ObjectFlags::MEMBERS_RESOLVED)
            | ObjectFlags::INSTANTIATED;
        let new_alias = match alias {
            Some(alias) => Some(alias),
            None => source.alias.clone().map(|a| TypeAlias {
                symbol: a.symbol,
                type_arguments: self.instantiate_types(&a.type_arguments, mapper),
            }),
        };
        if let Some(alias) = &new_alias {
            object_flags |= self
                .ctx
                .types
                .propagating_flags_of_types(&alias.type_arguments, TypeFlags::empty());
        }
        let kind = match source.as_object().map(|o| o.kind.clone()) {
            Some(ObjectKind::Mapped(mapped)) => {
                let original = self.get_type_parameter_from_mapped_type(target);
                let fresh = self.clone_type_parameter(original);
                let combined = Self::prepend_type_mapping(original, fresh, Some(mapper.clone()));
                if let Some(data) = self.ctx.types.get_mut(fresh).as_type_parameter_mut() {
                    data.mapper = Some(combined.clone());
                }
                ObjectKind::Mapped(Box::new(tyck_types::MappedType {
                    declaration: mapped.declaration,
                    type_parameter: Some(fresh),
                    mapper: Some(combined),
                    target: Some(target),
                    ..tyck_types::MappedType::default()
                }))
            }
            _ => ObjectKind::Anonymous(AnonymousType {
                target: Some(target),
                mapper: Some(mapper.clone()),
            }),
        };
        self.ctx.types.alloc_with_alias(
            TypeFlags::OBJECT,
            object_flags,
            source.symbol,
            new_alias,
            TypeData::Object(ObjectType { kind, members: None }),
        )
    }

    /// Reverse mapped types are re-inferred from their instantiated source.
    fn instantiate_reverse_mapped_type(&mut self, t: TypeId, mapper: &Rc<TypeMapper>) -> TypeId {
        let Some(ObjectKind::ReverseMapped(reverse)) = self.ty(t).as_object().map(|o| o.kind.clone()) else {
            return t;
        };
        let mapped = self.instantiate_type(reverse.mapped_type, mapper);
        if !self.object_flags(mapped).contains(ObjectFlags::MAPPED) {
            return t;
        }
        let constraint = self.instantiate_type(reverse.constraint_type, mapper);
        if !self.type_flags(constraint).contains(TypeFlags::INDEX) {
            return t;
        }
        let source = self.instantiate_type(reverse.source, mapper);
        self.infer_type_for_homomorphic_mapped_type(source, mapped, constraint)
            .unwrap_or(t)
    }

    /// Mapper over `parameters` that sends each to `any`.
    pub(crate) fn create_any_mapper(parameters: &[TypeId]) -> Rc<TypeMapper> {
        TypeMapper::from_lists(parameters.to_vec(), None)
    }

}

fn leftmost_identifier(arena: &tyck_binder::NodeArena, mut name: NodeIndex) -> NodeIndex {
    while let Some(NodeKind::QualifiedName(q)) = arena.kind(name) {
        name = q.left;
    }
    name
}

#[cfg(test)]
#[path = "../tests/instantiate_tests.rs"]
mod tests;
