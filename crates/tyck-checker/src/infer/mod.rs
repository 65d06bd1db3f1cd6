//! Generic inference.
//!
//! An inference episode owns one [`InferenceContext`]: an [`InferenceInfo`]
//! per type parameter being inferred. Candidates are collected by walking a
//! source type against a target type (`infer_from`), then resolved into one
//! inferred type per parameter on demand (`get_inferred_type`).
//!
//! Contexts live in `CheckerContext::inference_contexts` and are addressed
//! by [`InferenceContextId`], so mappers can refer to them without
//! borrowing.

mod infer_from;
mod reverse_mapped;

use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;
use tracing::{debug, trace};
use tyck_types::{
    DeferredTarget, InferenceContextId, SignatureId, TypeFlags, TypeId, TypeMapper, UnionReduction,
};

use crate::state::CheckerState;

pub(crate) use infer_from::Inferrer;

bitflags! {
    /// Priority of an inference. Lower values take precedence, so a
    /// candidate found at a lower priority discards the existing ones.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct InferencePriority: i32 {
        /// Inferred to a naked type variable inside a union or
        /// intersection.
        const NAKED_TYPE_VARIABLE = 1 << 0;
        const SPECULATIVE_TUPLE = 1 << 1;
        const SUBSTITUTE_SOURCE = 1 << 2;
        /// Reverse inference through `{ [P in keyof T]: X }`.
        const HOMOMORPHIC_MAPPED_TYPE = 1 << 3;
        const PARTIAL_HOMOMORPHIC_MAPPED_TYPE = 1 << 4;
        /// Inferred to the constraint `K` of `{ [P in K]: X }`.
        const MAPPED_TYPE_CONSTRAINT = 1 << 5;
        const CONTRAVARIANT_CONDITIONAL = 1 << 6;
        /// Inferred from the contextual type of a call's return.
        const RETURN_TYPE = 1 << 7;
        const LITERAL_KEYOF = 1 << 8;
        const NO_CONSTRAINTS = 1 << 9;
        const ALWAYS_STRICT = 1 << 10;
        const MAX_VALUE = 1 << 11;

        const PRIORITY_IMPLIES_COMBINATION = Self::RETURN_TYPE.bits()
            | Self::MAPPED_TYPE_CONSTRAINT.bits()
            | Self::LITERAL_KEYOF.bits();
        /// Recorded for a source/target pair while it is being visited.
        const CIRCULARITY = -1;
    }
}

impl InferencePriority {
    /// The higher-precedence (numerically lower) of two priorities.
    #[must_use]
    pub fn min(self, other: InferencePriority) -> InferencePriority {
        if other.bits() < self.bits() { other } else { self }
    }

    pub fn takes_precedence_over(self, other: InferencePriority) -> bool {
        self.bits() < other.bits()
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct InferenceFlags: u8 {
        /// Parameters without candidates infer `silentNever`.
        const NO_DEFAULT = 1 << 0;
        /// Parameters without candidates or default infer `any` instead of
        /// `unknown`.
        const ANY_DEFAULT = 1 << 1;
    }
}

/// Candidates collected for one type parameter.
#[derive(Clone, Debug)]
pub struct InferenceInfo {
    pub type_parameter: TypeId,
    pub candidates: Vec<TypeId>,
    pub contra_candidates: Vec<TypeId>,
    pub inferred_type: Option<TypeId>,
    /// Priority of the current candidates; `None` until the first one.
    pub priority: Option<InferencePriority>,
    /// Every candidate so far was inferred directly to the parameter.
    pub top_level: bool,
    pub is_fixed: bool,
}

impl InferenceInfo {
    pub fn new(type_parameter: TypeId) -> Self {
        Self {
            type_parameter,
            candidates: Vec::new(),
            contra_candidates: Vec::new(),
            inferred_type: None,
            priority: None,
            top_level: true,
            is_fixed: false,
        }
    }

    fn has_candidates(&self) -> bool {
        !self.candidates.is_empty() || !self.contra_candidates.is_empty()
    }
}

/// One inference episode.
#[derive(Clone, Debug)]
pub struct InferenceContext {
    pub id: InferenceContextId,
    pub infos: Vec<InferenceInfo>,
    /// Signature whose type parameters are inferred, when there is one.
    pub signature: Option<SignatureId>,
    pub flags: InferenceFlags,
    /// Fixes a parameter the first time it is mapped.
    pub mapper: Rc<TypeMapper>,
    /// Maps to the current inferences without fixing.
    pub non_fixing_mapper: Rc<TypeMapper>,
    /// Inferences made from the contextual return type, used to
    /// instantiate the contextual types of arguments.
    pub return_mapper: Option<Rc<TypeMapper>>,
}

/// Why an inferred type was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InferenceError {
    /// The inferred type is not assignable to the instantiated constraint.
    ConstraintViolation { inferred: TypeId, constraint: TypeId },
}

impl fmt::Display for InferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceError::ConstraintViolation { inferred, constraint } => write!(
                f,
                "inferred type {} violates constraint {}",
                inferred.0, constraint.0
            ),
        }
    }
}

impl std::error::Error for InferenceError {}

impl<'a> CheckerState<'a> {
    // =========================================================================
    // Contexts
    // =========================================================================

    pub(crate) fn create_inference_context(
        &mut self,
        type_parameters: &[TypeId],
        signature: Option<SignatureId>,
        flags: InferenceFlags,
    ) -> InferenceContextId {
        let id = InferenceContextId(self.ctx.inference_contexts.len() as u32);
        let infos = type_parameters.iter().map(|&p| InferenceInfo::new(p)).collect();
        self.ctx.inference_contexts.push(InferenceContext {
            id,
            infos,
            signature,
            flags,
            mapper: Rc::new(TypeMapper::Inference {
                context: id,
                fixing: true,
            }),
            non_fixing_mapper: Rc::new(TypeMapper::Inference {
                context: id,
                fixing: false,
            }),
            return_mapper: None,
        });
        trace!(context = id.0, parameters = type_parameters.len(), "inference context created");
        id
    }

    pub(crate) fn inference_context(&self, id: InferenceContextId) -> &InferenceContext {
        &self.ctx.inference_contexts[id.0 as usize]
    }

    pub(crate) fn inference_context_mut(&mut self, id: InferenceContextId) -> &mut InferenceContext {
        &mut self.ctx.inference_contexts[id.0 as usize]
    }

    /// Index of the info inferring `t`, when `t` is one of the context's
    /// type variables.
    pub(crate) fn get_inference_info_for_type(&self, context: InferenceContextId, t: TypeId) -> Option<usize> {
        if !self.type_flags(t).intersects(TypeFlags::TYPE_VARIABLE) {
            return None;
        }
        self.inference_context(context)
            .infos
            .iter()
            .position(|info| info.type_parameter == t)
    }

    pub(crate) fn clear_cached_inferences(&mut self, context: InferenceContextId) {
        for info in &mut self.inference_context_mut(context).infos {
            if !info.is_fixed {
                info.inferred_type = None;
            }
        }
    }

    /// Infer from `source` to `target` into `context`.
    pub(crate) fn infer_types(
        &mut self,
        context: InferenceContextId,
        source: TypeId,
        target: TypeId,
        priority: InferencePriority,
    ) {
        stacker::maybe_grow(64 * 1024, 1024 * 1024, || {
            Inferrer::new(self, context, target, priority).infer_from_types(source, target);
        });
    }

    // =========================================================================
    // Mappers
    // =========================================================================

    /// Apply an inference mapper to `t`. The fixing mapper fixes the
    /// parameter it maps.
    pub(crate) fn map_inference_type(&mut self, context: InferenceContextId, fixing: bool, t: TypeId) -> TypeId {
        let Some(index) = self
            .inference_context(context)
            .infos
            .iter()
            .position(|info| info.type_parameter == t)
        else {
            return t;
        };
        if fixing && !self.inference_context(context).infos[index].is_fixed {
            self.clear_cached_inferences(context);
            self.inference_context_mut(context).infos[index].is_fixed = true;
        }
        self.get_inferred_type(context, index)
    }

    pub(crate) fn resolve_deferred_target(&mut self, target: DeferredTarget) -> TypeId {
        match target {
            DeferredTarget::InferredType { context, index } => self.get_inferred_type(context, index),
        }
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    pub(crate) fn get_inferred_types(&mut self, context: InferenceContextId) -> Vec<TypeId> {
        (0..self.inference_context(context).infos.len())
            .map(|index| self.get_inferred_type(context, index))
            .collect()
    }

    /// Resolve the candidates of one parameter, memoized until new
    /// candidates arrive.
    pub(crate) fn get_inferred_type(&mut self, context: InferenceContextId, index: usize) -> TypeId {
        let info = self.inference_context(context).infos[index].clone();
        if let Some(inferred) = info.inferred_type {
            return inferred;
        }
        let signature = self.inference_context(context).signature;
        let covariant = (!info.candidates.is_empty()).then(|| self.get_covariant_inference(&info, signature));
        let contravariant = (!info.contra_candidates.is_empty()).then(|| self.get_contravariant_inference(&info));
        let (inferred, fallback) = match (covariant, contravariant) {
            (Some(co), Some(contra)) => {
                if self.prefer_covariant_type(co, &info) {
                    (co, Some(contra))
                } else {
                    (contra, Some(co))
                }
            }
            (Some(co), None) => (co, None),
            (None, Some(contra)) => (contra, None),
            (None, None) => (self.get_default_inference(context, index, &info), None),
        };
        // Stored before the constraint check so that a constraint mentioning
        // the parameter sees the candidate.
        self.inference_context_mut(context).infos[index].inferred_type = Some(inferred);

        let inferred = match self.check_inferred_type(context, info.type_parameter, inferred) {
            Ok(()) => inferred,
            Err(InferenceError::ConstraintViolation { constraint, .. }) => {
                debug!(
                    parameter = info.type_parameter.0,
                    inferred = inferred.0,
                    constraint = constraint.0,
                    "inference violates constraint"
                );
                match fallback {
                    Some(fallback) if self.is_type_assignable_to(fallback, constraint) => fallback,
                    _ => constraint,
                }
            }
        };
        self.inference_context_mut(context).infos[index].inferred_type = Some(inferred);
        trace!(context = context.0, index, inferred = inferred.0, "inferred type");
        inferred
    }

    fn prefer_covariant_type(&mut self, covariant: TypeId, info: &InferenceInfo) -> bool {
        if covariant.is_never() || covariant.is_any() {
            return false;
        }
        info.contra_candidates
            .iter()
            .any(|&candidate| self.is_type_assignable_to(covariant, candidate))
    }

    fn check_inferred_type(
        &mut self,
        context: InferenceContextId,
        type_parameter: TypeId,
        inferred: TypeId,
    ) -> Result<(), InferenceError> {
        let Some(constraint) = self.get_constraint_of_type_parameter(type_parameter) else {
            return Ok(());
        };
        let mapper = self.inference_context(context).non_fixing_mapper.clone();
        let constraint = self.instantiate_type(constraint, &mapper);
        let target = self.get_type_with_this_argument(constraint, Some(inferred));
        if self.is_type_assignable_to(inferred, target) {
            Ok(())
        } else {
            Err(InferenceError::ConstraintViolation { inferred, constraint })
        }
    }

    fn get_default_inference(&mut self, context: InferenceContextId, index: usize, info: &InferenceInfo) -> TypeId {
        let flags = self.inference_context(context).flags;
        if flags.contains(InferenceFlags::NO_DEFAULT) {
            return TypeId::SILENT_NEVER;
        }
        if let Some(default) = self.get_default_from_type_parameter(info.type_parameter) {
            // Parameters from this one onwards are not inferred yet; they
            // read as `unknown` inside the default.
            let later: Vec<TypeId> = self.inference_context(context).infos[index..]
                .iter()
                .map(|i| i.type_parameter)
                .collect();
            let backreference = Rc::new(TypeMapper::Array {
                targets: Some(vec![TypeId::UNKNOWN; later.len()]),
                sources: later,
            });
            let mapper = Rc::new(TypeMapper::Merged {
                mapper1: backreference,
                mapper2: self.inference_context(context).non_fixing_mapper.clone(),
            });
            return self.instantiate_type(default, &mapper);
        }
        if flags.contains(InferenceFlags::ANY_DEFAULT) {
            TypeId::ANY
        } else {
            TypeId::UNKNOWN
        }
    }

    /// Union of the candidates. Literals are widened unless the parameter
    /// has a primitive constraint or appears at the top level of the
    /// return type.
    fn get_covariant_inference(&mut self, info: &InferenceInfo, signature: Option<SignatureId>) -> TypeId {
        let candidates = self.union_object_and_array_literal_candidates(&info.candidates);
        let primitive_constraint = self.has_primitive_constraint(info.type_parameter);
        let widen_literals = !primitive_constraint
            && info.top_level
            && (info.is_fixed
                || !signature.is_some_and(|s| self.is_type_parameter_at_top_level_in_return_type(s, info.type_parameter)));
        let base: Vec<TypeId> = if primitive_constraint {
            candidates
                .iter()
                .map(|&c| self.get_regular_type_of_literal_type(c))
                .collect()
        } else if widen_literals {
            candidates
                .iter()
                .map(|&c| self.get_widened_literal_type(c))
                .collect()
        } else {
            candidates
        };
        let priority = info.priority.unwrap_or(InferencePriority::empty());
        let unwidened = if priority.intersects(InferencePriority::PRIORITY_IMPLIES_COMBINATION) {
            self.get_union_type_ex(&base, UnionReduction::Literal, None, None)
        } else {
            self.get_union_type_ex(&base, UnionReduction::Subtype, None, None)
        };
        self.get_widened_type(unwidened)
    }

    /// Intersection when the priority implies combination, otherwise the
    /// candidate that is a subtype of the others.
    fn get_contravariant_inference(&mut self, info: &InferenceInfo) -> TypeId {
        let priority = info.priority.unwrap_or(InferencePriority::empty());
        if priority.intersects(InferencePriority::PRIORITY_IMPLIES_COMBINATION) {
            return self.get_intersection_type(&info.contra_candidates);
        }
        self.get_common_subtype(&info.contra_candidates)
    }

    fn get_common_subtype(&mut self, types: &[TypeId]) -> TypeId {
        let Some((&first, rest)) = types.split_first() else {
            return TypeId::NEVER;
        };
        rest.iter().fold(first, |result, &t| {
            if self.is_type_subtype_of(t, result) { t } else { result }
        })
    }

    /// Several object or array literal candidates combine into one
    /// subtype-reduced union.
    fn union_object_and_array_literal_candidates(&mut self, candidates: &[TypeId]) -> Vec<TypeId> {
        let (literals, mut others): (Vec<TypeId>, Vec<TypeId>) = candidates
            .iter()
            .partition(|&&c| self.is_object_or_array_literal_type(c));
        if literals.len() <= 1 {
            return candidates.to_vec();
        }
        let literals = self.get_union_type_ex(&literals, UnionReduction::Subtype, None, None);
        others.push(literals);
        others
    }

    fn has_primitive_constraint(&mut self, type_parameter: TypeId) -> bool {
        self.get_constraint_of_type_parameter(type_parameter).is_some_and(|constraint| {
            self.maybe_type_of_kind(
                constraint,
                TypeFlags::PRIMITIVE | TypeFlags::INDEX | TypeFlags::TEMPLATE_LITERAL | TypeFlags::STRING_MAPPING,
            )
        })
    }

    pub(crate) fn is_type_parameter_at_top_level(&self, t: TypeId, type_parameter: TypeId) -> bool {
        t == type_parameter
            || (self.type_flags(t).intersects(TypeFlags::UNION_OR_INTERSECTION)
                && self
                    .ty(t)
                    .constituents()
                    .iter()
                    .any(|&c| self.is_type_parameter_at_top_level(c, type_parameter)))
    }

    fn is_type_parameter_at_top_level_in_return_type(&mut self, signature: SignatureId, type_parameter: TypeId) -> bool {
        let return_type = self.get_return_type_of_signature(signature);
        self.is_type_parameter_at_top_level(return_type, type_parameter)
    }

    /// Candidates of a single-parameter inference, combined without
    /// widening or defaults. `None` when nothing was inferred.
    pub(crate) fn get_type_from_inference(&mut self, info: &InferenceInfo) -> Option<TypeId> {
        if !info.has_candidates() {
            return None;
        }
        if !info.candidates.is_empty() {
            return Some(self.get_union_type_ex(&info.candidates, UnionReduction::Subtype, None, None));
        }
        Some(self.get_intersection_type(&info.contra_candidates))
    }
}

#[cfg(test)]
#[path = "../tests/infer_tests.rs"]
mod tests;
