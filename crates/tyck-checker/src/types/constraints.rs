//! Constraints and defaults of type parameters, and base constraints of
//! instantiable types.

use tracing::trace;
use tyck_binder::{NodeIndex, NodeKind};
use tyck_common::diagnostics::diagnostic_codes;
use tyck_types::{ElementFlags, TypeData, TypeFlags, TypeId};

use super::RecursionIdentity;
use crate::context::{ResolutionProperty, ResolutionTarget};
use crate::state::CheckerState;

/// Nesting of base constraint computations before identities are checked.
const BASE_CONSTRAINT_SHALLOW_DEPTH: usize = 10;
/// Hard cap on base constraint nesting.
const BASE_CONSTRAINT_MAX_DEPTH: usize = 50;

impl<'a> CheckerState<'a> {
    // =========================================================================
    // Type parameters
    // =========================================================================

    /// `TypeParameter` node declaring a type parameter type.
    pub(crate) fn type_parameter_declaration(&self, parameter: TypeId) -> NodeIndex {
        let symbol = self.ty(parameter).symbol;
        if symbol.is_none() {
            return NodeIndex::NONE;
        }
        self.symbol(symbol)
            .declarations
            .iter()
            .copied()
            .find(|&d| matches!(self.ctx.arena.kind(d), Some(NodeKind::TypeParameter(_))))
            .unwrap_or(NodeIndex::NONE)
    }

    fn constraint_declaration(&self, parameter: TypeId) -> NodeIndex {
        let declaration = self.type_parameter_declaration(parameter);
        self.ctx
            .arena
            .get_type_parameter(declaration)
            .map_or(NodeIndex::NONE, |d| d.constraint)
    }

    /// Declared constraint, `None` when there is none or it is circular.
    pub fn get_constraint_of_type_parameter(&mut self, parameter: TypeId) -> Option<TypeId> {
        if self.has_non_circular_base_constraint(parameter) {
            self.get_constraint_from_type_parameter(parameter)
        } else {
            None
        }
    }

    /// Declared constraint without the circularity check.
    pub(crate) fn get_constraint_from_type_parameter(&mut self, parameter: TypeId) -> Option<TypeId> {
        let Some(data) = self.ty(parameter).as_type_parameter() else {
            return None;
        };
        if let Some(constraint) = data.constraint {
            return (constraint != TypeId::NO_CONSTRAINT).then_some(constraint);
        }
        let (target, mapper) = (data.target, data.mapper.clone());
        let constraint = if let Some(target) = target {
            match (self.get_constraint_of_type_parameter(target), mapper) {
                (Some(c), Some(mapper)) => self.instantiate_type(c, &mapper),
                (Some(c), None) => c,
                (None, _) => TypeId::NO_CONSTRAINT,
            }
        } else {
            let node = self.constraint_declaration(parameter);
            if node.is_none() {
                TypeId::NO_CONSTRAINT
            } else {
                let mut constraint = self.get_type_from_type_node(node);
                if self.type_flags(constraint).contains(TypeFlags::ANY) && !constraint.is_error() {
                    let declaration = self.type_parameter_declaration(parameter);
                    let in_mapped_type = matches!(
                        self.ctx.arena.kind(self.ctx.arena.parent(declaration)),
                        Some(NodeKind::MappedType(_))
                    );
                    constraint = if in_mapped_type {
                        self.string_number_symbol_type()
                    } else {
                        TypeId::UNKNOWN
                    };
                }
                constraint
            }
        };
        if let Some(data) = self.ctx.types.get_mut(parameter).as_type_parameter_mut()
            && data.constraint.is_none()
        {
            data.constraint = Some(constraint);
        }
        (constraint != TypeId::NO_CONSTRAINT).then_some(constraint)
    }

    /// Declared default, instantiated for cloned parameters.
    pub fn get_default_from_type_parameter(&mut self, parameter: TypeId) -> Option<TypeId> {
        let Some(data) = self.ty(parameter).as_type_parameter() else {
            return None;
        };
        if let Some(default) = data.default {
            return (default != TypeId::NO_CONSTRAINT && default != TypeId::CIRCULAR_CONSTRAINT).then_some(default);
        }
        let (target, mapper) = (data.target, data.mapper.clone());
        if !self.push_type_resolution(ResolutionTarget::Type(parameter), ResolutionProperty::DefaultType) {
            return None;
        }
        let default = if let Some(target) = target {
            match (self.get_default_from_type_parameter(target), mapper) {
                (Some(d), Some(mapper)) => self.instantiate_type(d, &mapper),
                (Some(d), None) => d,
                (None, _) => TypeId::NO_CONSTRAINT,
            }
        } else {
            let declaration = self.type_parameter_declaration(parameter);
            let node = self
                .ctx
                .arena
                .get_type_parameter(declaration)
                .map_or(NodeIndex::NONE, |d| d.default);
            if node.is_none() {
                TypeId::NO_CONSTRAINT
            } else {
                self.get_type_from_type_node(node)
            }
        };
        let default = if self.pop_type_resolution() {
            default
        } else {
            TypeId::CIRCULAR_CONSTRAINT
        };
        if let Some(data) = self.ctx.types.get_mut(parameter).as_type_parameter_mut() {
            data.default = Some(default);
        }
        (default != TypeId::NO_CONSTRAINT && default != TypeId::CIRCULAR_CONSTRAINT).then_some(default)
    }

    pub(crate) fn has_type_parameter_default(&self, parameter: TypeId) -> bool {
        let declaration = self.type_parameter_declaration(parameter);
        self.ctx
            .arena
            .get_type_parameter(declaration)
            .is_some_and(|d| d.default.is_some())
    }

    /// Number of leading type parameters without a default.
    pub(crate) fn get_min_type_argument_count(&self, parameters: &[TypeId]) -> usize {
        parameters
            .iter()
            .rposition(|&p| !self.has_type_parameter_default(p))
            .map_or(0, |i| i + 1)
    }

    /// Pad explicit type arguments with defaults, instantiated left to
    /// right, or with `unknown` for parameters without one.
    pub(crate) fn fill_missing_type_arguments(
        &mut self,
        type_arguments: &[TypeId],
        parameters: &[TypeId],
        min_argument_count: usize,
    ) -> Vec<TypeId> {
        let count = type_arguments.len();
        if parameters.is_empty() || count < min_argument_count || count >= parameters.len() {
            return type_arguments.to_vec();
        }
        let mut result = type_arguments.to_vec();
        result.resize(parameters.len(), TypeId::UNKNOWN);
        for i in count..parameters.len() {
            let default = self.get_default_from_type_parameter(parameters[i]);
            result[i] = match default {
                Some(default) => {
                    let mapper = tyck_types::TypeMapper::from_lists(parameters.to_vec(), Some(result.clone()));
                    self.instantiate_type(default, &mapper)
                }
                None => TypeId::UNKNOWN,
            };
        }
        result
    }

    // =========================================================================
    // Base constraints
    // =========================================================================

    /// `string | number | symbol`, the constraint of `keyof T`.
    pub(crate) fn string_number_symbol_type(&mut self) -> TypeId {
        self.get_union_type(&[TypeId::STRING, TypeId::NUMBER, TypeId::SYMBOL])
    }

    /// Constraint of any type that has one.
    pub fn get_constraint_of_type(&mut self, t: TypeId) -> Option<TypeId> {
        let flags = self.type_flags(t);
        if flags.contains(TypeFlags::TYPE_PARAMETER) {
            self.get_constraint_of_type_parameter(t)
        } else if flags.contains(TypeFlags::INDEXED_ACCESS) {
            self.get_constraint_of_indexed_access(t)
        } else {
            self.get_base_constraint_of_type(t)
        }
    }

    pub(crate) fn get_constraint_of_indexed_access(&mut self, t: TypeId) -> Option<TypeId> {
        if !self.has_non_circular_base_constraint(t) {
            return None;
        }
        let TypeData::IndexedAccess(access) = self.ty(t).data.clone() else {
            return None;
        };
        if let Some(index_constraint) = self.get_constraint_of_type(access.index_type)
            && index_constraint != access.index_type
            && let Some(result) =
                self.get_indexed_access_type_or_undefined(access.object_type, index_constraint, access.access_flags)
        {
            return Some(result);
        }
        let object_constraint = self.get_constraint_of_type(access.object_type)?;
        if object_constraint == access.object_type {
            return None;
        }
        self.get_indexed_access_type_or_undefined(object_constraint, access.index_type, access.access_flags)
    }

    /// Most specific non-generic type every instantiation of `t` is
    /// assignable to. `None` when unconstrained or circular.
    pub fn get_base_constraint_of_type(&mut self, t: TypeId) -> Option<TypeId> {
        let flags = self.type_flags(t);
        if flags.intersects(
            TypeFlags::INSTANTIABLE_NON_PRIMITIVE
                | TypeFlags::UNION_OR_INTERSECTION
                | TypeFlags::TEMPLATE_LITERAL
                | TypeFlags::STRING_MAPPING,
        ) || self.is_generic_tuple_type(t)
        {
            let constraint = self.get_resolved_base_constraint(t);
            return (constraint != TypeId::NO_CONSTRAINT && constraint != TypeId::CIRCULAR_CONSTRAINT)
                .then_some(constraint);
        }
        flags
            .contains(TypeFlags::INDEX)
            .then(|| self.string_number_symbol_type())
    }

    pub(crate) fn has_non_circular_base_constraint(&mut self, t: TypeId) -> bool {
        self.get_resolved_base_constraint(t) != TypeId::CIRCULAR_CONSTRAINT
    }

    /// Memoized base constraint, [`TypeId::NO_CONSTRAINT`] or
    /// [`TypeId::CIRCULAR_CONSTRAINT`].
    pub(crate) fn get_resolved_base_constraint(&mut self, t: TypeId) -> TypeId {
        let mut stack = Vec::new();
        self.get_immediate_base_constraint(t, &mut stack)
    }

    fn get_immediate_base_constraint(&mut self, t: TypeId, stack: &mut Vec<RecursionIdentity>) -> TypeId {
        if let Some(&cached) = self.ctx.resolved_base_constraints.get(&t) {
            return cached;
        }
        if !self.push_type_resolution(ResolutionTarget::Type(t), ResolutionProperty::ImmediateBaseConstraint) {
            return TypeId::CIRCULAR_CONSTRAINT;
        }
        let identity = self.get_recursion_identity(t);
        let mut result = None;
        if stack.len() < BASE_CONSTRAINT_SHALLOW_DEPTH
            || (stack.len() < BASE_CONSTRAINT_MAX_DEPTH && !stack.contains(&identity))
        {
            stack.push(identity);
            result = self.compute_base_constraint(t, stack);
            stack.pop();
        }
        if !self.pop_type_resolution() {
            if self.type_flags(t).contains(TypeFlags::TYPE_PARAMETER) {
                let node = self.constraint_declaration(t);
                if node.is_some() {
                    let name = self.symbol_to_string(self.ty(t).symbol);
                    self.error(node, diagnostic_codes::TYPE_PARAMETER_HAS_CIRCULAR_CONSTRAINT, &[&name]);
                }
            }
            trace!(t = t.0, "circular base constraint");
            result = Some(TypeId::CIRCULAR_CONSTRAINT);
        }
        let result = result.unwrap_or(TypeId::NO_CONSTRAINT);
        *self.ctx.resolved_base_constraints.entry(t).or_insert(result)
    }

    fn get_base_constraint(&mut self, t: TypeId, stack: &mut Vec<RecursionIdentity>) -> Option<TypeId> {
        let constraint = self.get_immediate_base_constraint(t, stack);
        (constraint != TypeId::NO_CONSTRAINT && constraint != TypeId::CIRCULAR_CONSTRAINT).then_some(constraint)
    }

    fn compute_base_constraint(&mut self, t: TypeId, stack: &mut Vec<RecursionIdentity>) -> Option<TypeId> {
        let flags = self.type_flags(t);
        if flags.contains(TypeFlags::TYPE_PARAMETER) {
            let constraint = self.get_constraint_from_type_parameter(t)?;
            let is_this_type = self.ty(t).as_type_parameter().is_some_and(|p| p.is_this_type);
            return if is_this_type {
                Some(constraint)
            } else {
                self.get_base_constraint(constraint, stack)
            };
        }
        if flags.intersects(TypeFlags::UNION_OR_INTERSECTION) {
            let types = self.ty(t).constituents().to_vec();
            let mut base_types = Vec::with_capacity(types.len());
            let mut different = false;
            for &member in &types {
                match self.get_base_constraint(member, stack) {
                    Some(base) => {
                        if base != member {
                            different = true;
                        }
                        base_types.push(base);
                    }
                    None => different = true,
                }
            }
            if !different {
                return Some(t);
            }
            if flags.contains(TypeFlags::UNION) && base_types.len() == types.len() {
                return Some(self.get_union_type(&base_types));
            }
            if flags.contains(TypeFlags::INTERSECTION) && !base_types.is_empty() {
                return Some(self.get_intersection_type(&base_types));
            }
            return None;
        }
        if flags.contains(TypeFlags::INDEX) {
            return Some(self.string_number_symbol_type());
        }
        if flags.contains(TypeFlags::TEMPLATE_LITERAL) {
            return Some(TypeId::STRING);
        }
        if flags.contains(TypeFlags::INDEXED_ACCESS) {
            let TypeData::IndexedAccess(access) = self.ty(t).data.clone() else {
                return None;
            };
            let base_object = self.get_base_constraint(access.object_type, stack)?;
            let base_index = self.get_base_constraint(access.index_type, stack)?;
            let base = self.get_indexed_access_type_or_undefined(base_object, base_index, access.access_flags)?;
            return self.get_base_constraint(base, stack);
        }
        if self.is_generic_tuple_type(t) {
            let info = self.tuple_target_info(t)?;
            let elements = self.get_element_types(t);
            let mut changed = Vec::with_capacity(elements.len());
            for (i, &element) in elements.iter().enumerate() {
                let variadic_parameter = self.type_flags(element).contains(TypeFlags::TYPE_PARAMETER)
                    && info.element_flags[i].contains(ElementFlags::VARIADIC);
                let constraint = if variadic_parameter {
                    self.get_base_constraint(element, stack).unwrap_or(element)
                } else {
                    element
                };
                let concrete = constraint != element
                    && self
                        .union_constituents(constraint)
                        .into_iter()
                        .all(|c| self.is_array_or_tuple_type(c) && !self.is_generic_tuple_type(c));
                changed.push(if concrete { constraint } else { element });
            }
            let labels = info.labeled_declarations.clone().unwrap_or_default();
            return Some(self.create_tuple_type(&changed, Some(&info.element_flags), info.readonly, &labels));
        }
        Some(t)
    }
}
