//! Candidate collection: walks a source type against a target type and
//! records a candidate wherever the target is one of the context's type
//! variables.

use bitflags::bitflags;
use rustc_hash::FxHashMap;
use tyck_common::limits::MAX_INFERENCE_NESTING;
use tyck_types::{
    ElementFlags, IndexFlags, InferenceContextId, ObjectFlags, SignatureId, SignatureKind, TypeData, TypeFlags,
    TypeId, VarianceFlags,
};

use super::InferencePriority;
use crate::state::CheckerState;
use crate::types::RecursionIdentity;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    struct ExpandingFlags: u8 {
        const SOURCE = 1 << 0;
        const TARGET = 1 << 1;
        const BOTH = Self::SOURCE.bits() | Self::TARGET.bits();
    }
}

#[derive(Clone, Copy)]
enum Matching {
    /// Identical, or a literal matched by its primitive.
    Identical,
    /// Objects with the same symbol, or types with the same alias.
    Closely,
}

/// State of one `infer_types` walk.
pub(crate) struct Inferrer<'s, 'a> {
    state: &'s mut CheckerState<'a>,
    context: InferenceContextId,
    /// Target the walk started from; decides `top_level`.
    original_target: TypeId,
    priority: InferencePriority,
    contravariant: bool,
    bivariant: bool,
    /// Inferred in place of the source while set (`any` propagation).
    propagation_type: Option<TypeId>,
    /// Highest precedence reached by an inference in the current branch.
    inference_priority: InferencePriority,
    expanding: ExpandingFlags,
    visited: FxHashMap<(TypeId, TypeId), InferencePriority>,
    source_stack: Vec<RecursionIdentity>,
    target_stack: Vec<RecursionIdentity>,
}

impl<'s, 'a> Inferrer<'s, 'a> {
    pub(crate) fn new(
        state: &'s mut CheckerState<'a>,
        context: InferenceContextId,
        original_target: TypeId,
        priority: InferencePriority,
    ) -> Self {
        Self {
            state,
            context,
            original_target,
            priority,
            contravariant: false,
            bivariant: false,
            propagation_type: None,
            inference_priority: InferencePriority::MAX_VALUE,
            expanding: ExpandingFlags::empty(),
            visited: FxHashMap::default(),
            source_stack: Vec::new(),
            target_stack: Vec::new(),
        }
    }

    pub(crate) fn infer_from_types(&mut self, mut source: TypeId, mut target: TypeId) {
        if !self.state.could_contain_type_variables(target) || target == TypeId::SILENT_NEVER {
            return;
        }
        if source == TypeId::WILDCARD || (source.is_any() && self.propagation_type.is_none()) {
            // Every type variable reachable in the target receives the
            // source.
            let saved = self.propagation_type.replace(source);
            self.infer_from_types(target, target);
            self.propagation_type = saved;
            return;
        }
        if let (Some(source_alias), Some(target_alias)) = (self.state.ty(source).alias.clone(), self.state.ty(target).alias.clone())
            && source_alias.symbol == target_alias.symbol
            && !source_alias.type_arguments.is_empty()
        {
            let symbol = source_alias.symbol;
            let parameters = self.state.get_type_alias_type_parameters(symbol);
            let min = self.state.get_min_type_argument_count(&parameters);
            let source_arguments = self.state.fill_missing_type_arguments(&source_alias.type_arguments, &parameters, min);
            let target_arguments = self.state.fill_missing_type_arguments(&target_alias.type_arguments, &parameters, min);
            let variances = self.state.get_alias_variances(symbol);
            self.infer_from_type_arguments(&source_arguments, &target_arguments, &variances);
            return;
        }
        if source == target && self.state.type_flags(source).intersects(TypeFlags::UNION_OR_INTERSECTION) {
            for t in self.state.ty(source).constituents().to_vec() {
                self.infer_from_types(t, t);
            }
            return;
        }

        let target_flags = self.state.type_flags(target);
        if target_flags.contains(TypeFlags::UNION) {
            let sources = self.state.union_constituents(source);
            let targets = self.state.ty(target).constituents().to_vec();
            let (sources, targets) = self.infer_from_matching_types(sources, targets, Matching::Identical);
            let (sources, targets) = self.infer_from_matching_types(sources, targets, Matching::Closely);
            if targets.is_empty() {
                return;
            }
            target = self.state.get_union_type(&targets);
            if sources.is_empty() {
                // Everything matched; what remains only sees the source
                // through naked type variables.
                self.infer_with_priority(source, target, InferencePriority::NAKED_TYPE_VARIABLE);
                return;
            }
            source = self.state.get_union_type(&sources);
        } else if target_flags.contains(TypeFlags::INTERSECTION) && !self.all_non_generic_objects(target) {
            if !self.state.type_flags(source).contains(TypeFlags::UNION) {
                let sources = if self.state.type_flags(source).contains(TypeFlags::INTERSECTION) {
                    self.state.ty(source).constituents().to_vec()
                } else {
                    vec![source]
                };
                let targets = self.state.ty(target).constituents().to_vec();
                let (sources, targets) = self.infer_from_matching_types(sources, targets, Matching::Identical);
                if sources.is_empty() || targets.is_empty() {
                    return;
                }
                source = self.state.get_intersection_type(&sources);
                target = self.state.get_intersection_type(&targets);
            }
        }

        let source_flags = self.state.type_flags(source);
        let target_flags = self.state.type_flags(target);
        if target_flags.intersects(TypeFlags::TYPE_VARIABLE) {
            if source == TypeId::NON_INFERRABLE_ANY
                || self.state.object_flags(source).contains(ObjectFlags::NON_INFERRABLE_TYPE)
            {
                return;
            }
            if let Some(index) = self.state.get_inference_info_for_type(self.context, target) {
                self.record_candidate(index, source, target);
                self.inference_priority = self.inference_priority.min(self.priority);
                return;
            }
        }

        if let Some((source_target, _)) = self.same_reference_targets(source, target) {
            let source_arguments = self.state.get_type_arguments(source);
            let target_arguments = self.state.get_type_arguments(target);
            let variances = self.state.get_variances(source_target);
            self.infer_from_type_arguments(&source_arguments, &target_arguments, &variances);
        } else if source_flags.contains(TypeFlags::INDEX) && target_flags.contains(TypeFlags::INDEX) {
            let (TypeData::Index(s), TypeData::Index(t)) = (&self.state.ty(source).data, &self.state.ty(target).data)
            else {
                return;
            };
            let (s, t) = (s.target, t.target);
            self.infer_from_contravariant_types(s, t);
        } else if source_flags.contains(TypeFlags::INDEXED_ACCESS) && target_flags.contains(TypeFlags::INDEXED_ACCESS) {
            let (TypeData::IndexedAccess(s), TypeData::IndexedAccess(t)) =
                (&self.state.ty(source).data, &self.state.ty(target).data)
            else {
                return;
            };
            let (s_object, s_index, t_object, t_index) = (s.object_type, s.index_type, t.object_type, t.index_type);
            self.infer_from_types(s_object, t_object);
            self.infer_from_types(s_index, t_index);
        } else if target_flags.intersects(TypeFlags::UNION_OR_INTERSECTION) {
            let targets = self.state.ty(target).constituents().to_vec();
            self.infer_to_multiple_types(source, &targets, target_flags);
        } else if source_flags.contains(TypeFlags::UNION) {
            for s in self.state.ty(source).constituents().to_vec() {
                self.infer_from_types(s, target);
            }
        } else {
            let mut source = self.state.get_reduced_type(source);
            let source_flags = self.state.type_flags(source);
            if !(self.priority.contains(InferencePriority::NO_CONSTRAINTS)
                && source_flags.intersects(TypeFlags::INTERSECTION | TypeFlags::INSTANTIABLE))
            {
                let apparent = self.state.get_apparent_type(source);
                if apparent != source
                    && !self
                        .state
                        .type_flags(apparent)
                        .intersects(TypeFlags::OBJECT | TypeFlags::INTERSECTION)
                {
                    self.infer_from_types(apparent, target);
                    return;
                }
                source = apparent;
            }
            if self
                .state
                .type_flags(source)
                .intersects(TypeFlags::OBJECT | TypeFlags::INTERSECTION)
            {
                self.invoke_once(source, target, Self::infer_from_object_types);
            }
        }
    }

    fn all_non_generic_objects(&mut self, intersection: TypeId) -> bool {
        let types = self.state.ty(intersection).constituents().to_vec();
        types.into_iter().all(|t| {
            self.state.type_flags(t).contains(TypeFlags::OBJECT) && !self.state.is_generic_object_type(t)
        })
    }

    /// References to the same generic target, or two array references.
    /// Deferred references are excluded.
    fn same_reference_targets(&self, source: TypeId, target: TypeId) -> Option<(TypeId, TypeId)> {
        let source_ref = self.state.reference_data(source)?;
        let target_ref = self.state.reference_data(target)?;
        if source_ref.node.is_some() && target_ref.node.is_some() {
            return None;
        }
        let same = source_ref.target == target_ref.target
            || (self.state.is_array_type(source) && self.state.is_array_type(target));
        same.then_some((source_ref.target, target_ref.target))
    }

    fn record_candidate(&mut self, index: usize, source: TypeId, target: TypeId) {
        let candidate = self.propagation_type.unwrap_or(source);
        let priority = self.priority;
        let contravariant = self.contravariant && !self.bivariant;
        let is_type_parameter = self.state.type_flags(target).contains(TypeFlags::TYPE_PARAMETER);
        let at_top_level = self.state.is_type_parameter_at_top_level(self.original_target, target);

        let info = &mut self.state.inference_context_mut(self.context).infos[index];
        if info.is_fixed {
            return;
        }
        let mut changed = false;
        if info.priority.is_none_or(|current| priority.takes_precedence_over(current)) {
            info.candidates.clear();
            info.contra_candidates.clear();
            info.top_level = true;
            info.priority = Some(priority);
            changed = true;
        }
        if info.priority == Some(priority) {
            let list = if contravariant {
                &mut info.contra_candidates
            } else {
                &mut info.candidates
            };
            if !list.contains(&candidate) {
                list.push(candidate);
                changed = true;
            }
        }
        if !priority.contains(InferencePriority::RETURN_TYPE) && is_type_parameter && info.top_level && !at_top_level {
            info.top_level = false;
            changed = true;
        }
        if changed {
            self.state.clear_cached_inferences(self.context);
        }
    }

    fn infer_with_priority(&mut self, source: TypeId, target: TypeId, priority: InferencePriority) {
        let saved = self.priority;
        self.priority |= priority;
        self.infer_from_types(source, target);
        self.priority = saved;
    }

    fn infer_from_contravariant_types(&mut self, source: TypeId, target: TypeId) {
        self.contravariant = !self.contravariant;
        self.infer_from_types(source, target);
        self.contravariant = !self.contravariant;
    }

    fn infer_from_contravariant_types_if_strict(&mut self, source: TypeId, target: TypeId) {
        if self.state.ctx.options.strict_function_types || self.priority.contains(InferencePriority::ALWAYS_STRICT) {
            self.infer_from_contravariant_types(source, target);
        } else {
            self.infer_from_types(source, target);
        }
    }

    fn infer_from_type_arguments(&mut self, sources: &[TypeId], targets: &[TypeId], variances: &[VarianceFlags]) {
        for (i, (&s, &t)) in sources.iter().zip(targets).enumerate() {
            let contravariant = variances
                .get(i)
                .is_some_and(|v| v.variance() == VarianceFlags::CONTRAVARIANT);
            if contravariant {
                self.infer_from_contravariant_types(s, t);
            } else {
                self.infer_from_types(s, t);
            }
        }
    }

    /// Infer between matching source and target constituents, returning
    /// the ones left unmatched.
    fn infer_from_matching_types(
        &mut self,
        sources: Vec<TypeId>,
        targets: Vec<TypeId>,
        matching: Matching,
    ) -> (Vec<TypeId>, Vec<TypeId>) {
        let mut matched_sources = Vec::new();
        let mut matched_targets = Vec::new();
        for &t in &targets {
            for &s in &sources {
                if self.types_match(matching, s, t) {
                    self.infer_from_types(s, t);
                    if !matched_sources.contains(&s) {
                        matched_sources.push(s);
                    }
                    if !matched_targets.contains(&t) {
                        matched_targets.push(t);
                    }
                }
            }
        }
        let sources = sources.into_iter().filter(|s| !matched_sources.contains(s)).collect();
        let targets = targets.into_iter().filter(|t| !matched_targets.contains(t)).collect();
        (sources, targets)
    }

    fn types_match(&mut self, matching: Matching, source: TypeId, target: TypeId) -> bool {
        match matching {
            Matching::Identical => {
                if target == TypeId::MISSING {
                    return source == target;
                }
                let (s, t) = (self.state.type_flags(source), self.state.type_flags(target));
                self.state.is_type_identical_to(source, target)
                    || (t.contains(TypeFlags::STRING) && s.contains(TypeFlags::STRING_LITERAL))
                    || (t.contains(TypeFlags::NUMBER) && s.contains(TypeFlags::NUMBER_LITERAL))
            }
            Matching::Closely => {
                let (s, t) = (self.state.ty(source), self.state.ty(target));
                (s.flags.contains(TypeFlags::OBJECT)
                    && t.flags.contains(TypeFlags::OBJECT)
                    && s.symbol.is_some()
                    && s.symbol == t.symbol)
                    || s.alias
                        .as_ref()
                        .is_some_and(|a| !a.type_arguments.is_empty() && t.alias.as_ref().is_some_and(|b| b.symbol == a.symbol))
            }
        }
    }

    fn infer_to_multiple_types(&mut self, source: TypeId, targets: &[TypeId], target_flags: TypeFlags) {
        let mut type_variable_count = 0;
        if target_flags.contains(TypeFlags::UNION) {
            let mut naked_type_variable = None;
            let sources = self.state.union_constituents(source);
            let mut matched = vec![false; sources.len()];
            let mut circularity = false;
            // Infer to each non-variable target first; a source that
            // produced an inference at the current priority is matched.
            for &t in targets {
                if self.state.get_inference_info_for_type(self.context, t).is_some() {
                    naked_type_variable = Some(t);
                    type_variable_count += 1;
                    continue;
                }
                for (i, &s) in sources.iter().enumerate() {
                    let saved = std::mem::replace(&mut self.inference_priority, InferencePriority::MAX_VALUE);
                    self.infer_from_types(s, t);
                    if self.inference_priority == self.priority {
                        matched[i] = true;
                    }
                    circularity |= self.inference_priority == InferencePriority::CIRCULARITY;
                    self.inference_priority = self.inference_priority.min(saved);
                }
            }
            if type_variable_count == 1
                && !circularity
                && let Some(variable) = naked_type_variable
            {
                let unmatched: Vec<TypeId> = sources
                    .iter()
                    .zip(&matched)
                    .filter(|&(_, &m)| !m)
                    .map(|(&s, _)| s)
                    .collect();
                if !unmatched.is_empty() {
                    let unmatched = self.state.get_union_type(&unmatched);
                    self.infer_from_types(unmatched, variable);
                    return;
                }
            }
        } else {
            for &t in targets {
                if self.state.get_inference_info_for_type(self.context, t).is_some() {
                    type_variable_count += 1;
                } else {
                    self.infer_from_types(source, t);
                }
            }
        }
        let infer_naked = if target_flags.contains(TypeFlags::INTERSECTION) {
            type_variable_count == 1
        } else {
            type_variable_count > 0
        };
        if infer_naked {
            for &t in targets {
                if self.state.get_inference_info_for_type(self.context, t).is_some() {
                    self.infer_with_priority(source, t, InferencePriority::NAKED_TYPE_VARIABLE);
                }
            }
        }
    }

    /// Run `action` once per source/target pair, recording `CIRCULARITY`
    /// while the pair is in progress and aborting expanding branches.
    fn invoke_once(&mut self, source: TypeId, target: TypeId, action: fn(&mut Self, TypeId, TypeId)) {
        let key = (source, target);
        if let Some(&status) = self.visited.get(&key) {
            self.inference_priority = self.inference_priority.min(status);
            return;
        }
        self.visited.insert(key, InferencePriority::CIRCULARITY);
        let saved_priority = std::mem::replace(&mut self.inference_priority, InferencePriority::MAX_VALUE);
        let saved_expanding = self.expanding;

        let source_identity = self.state.get_recursion_identity(source);
        let target_identity = self.state.get_recursion_identity(target);
        self.source_stack.push(source_identity);
        self.target_stack.push(target_identity);
        if self.source_stack.iter().filter(|&&i| i == source_identity).count() >= MAX_INFERENCE_NESTING {
            self.expanding |= ExpandingFlags::SOURCE;
        }
        if self.target_stack.iter().filter(|&&i| i == target_identity).count() >= MAX_INFERENCE_NESTING {
            self.expanding |= ExpandingFlags::TARGET;
        }
        if self.expanding != ExpandingFlags::BOTH {
            action(self, source, target);
        } else {
            self.inference_priority = InferencePriority::CIRCULARITY;
        }
        self.source_stack.pop();
        self.target_stack.pop();
        self.expanding = saved_expanding;

        self.visited.insert(key, self.inference_priority);
        self.inference_priority = self.inference_priority.min(saved_priority);
    }

    // =========================================================================
    // Object types
    // =========================================================================

    fn infer_from_object_types(&mut self, source: TypeId, target: TypeId) {
        if let Some((source_target, _)) = self.same_reference_targets(source, target) {
            let source_arguments = self.state.get_type_arguments(source);
            let target_arguments = self.state.get_type_arguments(target);
            let variances = self.state.get_variances(source_target);
            self.infer_from_type_arguments(&source_arguments, &target_arguments, &variances);
            return;
        }
        if self.state.is_generic_mapped_type(source) && self.state.is_generic_mapped_type(target) {
            let source_constraint = self.state.get_constraint_type_from_mapped_type(source);
            let target_constraint = self.state.get_constraint_type_from_mapped_type(target);
            self.infer_from_types(source_constraint, target_constraint);
            let source_template = self.state.get_template_type_from_mapped_type(source);
            let target_template = self.state.get_template_type_from_mapped_type(target);
            let saved = self.priority;
            if self.state.get_mapped_type_optionality(source) != self.state.get_mapped_type_optionality(target) {
                self.priority |= InferencePriority::PARTIAL_HOMOMORPHIC_MAPPED_TYPE;
            }
            self.infer_from_types(source_template, target_template);
            self.priority = saved;
        }
        if self.state.object_flags(target).contains(ObjectFlags::MAPPED)
            && self.state.get_name_type_from_mapped_type(target).is_none()
        {
            let constraint = self.state.get_constraint_type_from_mapped_type(target);
            if self.infer_to_mapped_type(source, target, constraint) {
                return;
            }
        }
        if self.types_definitely_unrelated(source, target) {
            return;
        }
        if self.state.is_array_or_tuple_type(source) {
            if self.state.is_tuple_type(target) {
                self.infer_to_tuple_type(source, target);
                return;
            }
            if self.state.is_array_type(target) {
                self.infer_from_index_types(source, target);
                return;
            }
        }
        self.infer_from_properties(source, target);
        self.infer_from_signatures(source, target, SignatureKind::Call);
        self.infer_from_signatures(source, target, SignatureKind::Construct);
        self.infer_from_index_types(source, target);
    }

    fn infer_to_tuple_type(&mut self, source: TypeId, target: TypeId) {
        let Some(target_info) = self.state.tuple_target_info(target) else {
            return;
        };
        let source_info = self.state.tuple_target_info(source);
        let source_elements = self.state.get_type_arguments(source);
        let target_elements = self.state.get_element_types(target);
        let source_arity = source_elements.len();
        let target_arity = target_elements.len();

        if let Some(source_info) = &source_info
            && source_arity == target_arity
            && source_info
                .element_flags
                .iter()
                .zip(&target_info.element_flags)
                .all(|(s, t)| s.intersects(ElementFlags::VARIABLE) == t.intersects(ElementFlags::VARIABLE))
        {
            for (&s, &t) in source_elements.iter().zip(&target_elements) {
                self.infer_from_types(s, t);
            }
            return;
        }

        let start_length = source_info
            .as_ref()
            .map_or(0, |s| s.fixed_length.min(target_info.fixed_length));
        let end_length = match &source_info {
            Some(s) if target_info.has_rest_element => CheckerState::get_end_element_count(s, ElementFlags::FIXED)
                .min(CheckerState::get_end_element_count(&target_info, ElementFlags::FIXED)),
            _ => 0,
        };
        for i in 0..start_length.min(target_arity) {
            self.infer_from_types(source_elements[i], target_elements[i]);
        }
        let source_is_single_rest = source_info.as_ref().is_none_or(|s| {
            source_arity.saturating_sub(start_length + end_length) == 1
                && s.element_flags
                    .get(start_length)
                    .is_some_and(|f| f.contains(ElementFlags::REST))
        });
        if source_is_single_rest {
            // An array source, or a tuple whose middle is one rest element.
            let Some(&rest) = source_elements.get(start_length) else {
                return;
            };
            for i in start_length..target_arity.saturating_sub(end_length) {
                let element = if target_info.element_flags[i].contains(ElementFlags::VARIADIC) {
                    self.state.create_array_type(rest, false)
                } else {
                    rest
                };
                self.infer_from_types(element, target_elements[i]);
            }
        } else {
            let middle_length = target_arity.saturating_sub(start_length + end_length);
            if middle_length == 1 && target_info.element_flags[start_length].contains(ElementFlags::VARIADIC) {
                let ends_in_optional = target_info
                    .element_flags
                    .last()
                    .is_some_and(|f| f.contains(ElementFlags::OPTIONAL));
                let slice = self.state.slice_tuple_type(source, start_length, end_length);
                let priority = if ends_in_optional {
                    InferencePriority::SPECULATIVE_TUPLE
                } else {
                    InferencePriority::empty()
                };
                self.infer_with_priority(slice, target_elements[start_length], priority);
            } else if middle_length == 1 && target_info.element_flags[start_length].contains(ElementFlags::REST) {
                if let Some(rest) = self
                    .state
                    .get_element_type_of_slice_of_tuple_type(source, start_length, end_length)
                {
                    self.infer_from_types(rest, target_elements[start_length]);
                }
            }
        }
        for i in 0..end_length {
            self.infer_from_types(source_elements[source_arity - i - 1], target_elements[target_arity - i - 1]);
        }
    }

    /// `keyof T` constraints infer a reverse mapped type for `T`; a naked
    /// constraint `K` receives the source's keys.
    fn infer_to_mapped_type(&mut self, source: TypeId, target: TypeId, constraint: TypeId) -> bool {
        let constraint_flags = self.state.type_flags(constraint);
        if constraint_flags.intersects(TypeFlags::UNION_OR_INTERSECTION) {
            let mut result = false;
            for c in self.state.ty(constraint).constituents().to_vec() {
                result |= self.infer_to_mapped_type(source, target, c);
            }
            return result;
        }
        if constraint_flags.contains(TypeFlags::INDEX) {
            let TypeData::Index(index) = &self.state.ty(constraint).data else {
                return false;
            };
            let operand = index.target;
            if let Some(info_index) = self.state.get_inference_info_for_type(self.context, operand)
                && !self.state.inference_context(self.context).infos[info_index].is_fixed
                && let Some(inferred) = self.state.infer_type_for_homomorphic_mapped_type(source, target, constraint)
            {
                let priority = if self.state.object_flags(source).contains(ObjectFlags::NON_INFERRABLE_TYPE) {
                    InferencePriority::PARTIAL_HOMOMORPHIC_MAPPED_TYPE
                } else {
                    InferencePriority::HOMOMORPHIC_MAPPED_TYPE
                };
                self.infer_with_priority(inferred, operand, priority);
            }
            return true;
        }
        if constraint_flags.contains(TypeFlags::TYPE_PARAMETER) {
            let keys = self.state.get_index_type(source, IndexFlags::empty());
            self.infer_with_priority(keys, constraint, InferencePriority::MAPPED_TYPE_CONSTRAINT);
            let mut property_types: Vec<TypeId> = Vec::new();
            for property in self.state.get_properties_of_type(source) {
                property_types.push(self.state.get_type_of_symbol(property));
            }
            for info in self.state.get_index_infos_of_type(source) {
                property_types.push(info.value_type);
            }
            let source_values = self.state.get_union_type(&property_types);
            let template = self.state.get_template_type_from_mapped_type(target);
            self.infer_from_types(source_values, template);
            return true;
        }
        false
    }

    /// Each side misses a required property of the other, or the tuple
    /// shapes can never line up.
    fn types_definitely_unrelated(&mut self, source: TypeId, target: TypeId) -> bool {
        if let (Some(s), Some(t)) = (self.state.tuple_target_info(source), self.state.tuple_target_info(target)) {
            return (!t.combined_flags.contains(ElementFlags::VARIADIC) && t.min_length > s.min_length)
                || (!t.has_rest_element && (s.has_rest_element || t.fixed_length < s.fixed_length));
        }
        self.has_unmatched_property(source, target) && self.has_unmatched_property(target, source)
    }

    fn has_unmatched_property(&mut self, source: TypeId, target: TypeId) -> bool {
        for property in self.state.get_properties_of_type(target) {
            if self.state.symbol_flags_raw(property) & tyck_binder::symbol_flags::OPTIONAL != 0 {
                continue;
            }
            let name = self.state.symbol_name(property);
            if self.state.get_property_of_type(source, &name).is_none() {
                return true;
            }
        }
        false
    }

    fn infer_from_properties(&mut self, source: TypeId, target: TypeId) {
        for target_property in self.state.get_properties_of_type(target) {
            let name = self.state.symbol_name(target_property);
            let Some(source_property) = self.state.get_property_of_type(source, &name) else {
                continue;
            };
            let source_type = self.state.get_type_of_symbol(source_property);
            let source_type = self.remove_missing_type(source_type, source_property);
            let target_type = self.state.get_type_of_symbol(target_property);
            let target_type = self.remove_missing_type(target_type, target_property);
            self.infer_from_types(source_type, target_type);
        }
    }

    fn remove_missing_type(&mut self, t: TypeId, property: tyck_binder::SymbolId) -> TypeId {
        if self.state.symbol_flags_raw(property) & tyck_binder::symbol_flags::OPTIONAL == 0 {
            return t;
        }
        self.state.filter_type(t, |_, c| c != TypeId::MISSING)
    }

    fn infer_from_signatures(&mut self, source: TypeId, target: TypeId, kind: SignatureKind) {
        let source_signatures = self.state.get_signatures_of_type(source, kind);
        let target_signatures = self.state.get_signatures_of_type(target, kind);
        let source_len = source_signatures.len();
        let target_len = target_signatures.len();
        let len = source_len.min(target_len);
        for i in 0..len {
            let source_signature = self.state.get_base_signature(source_signatures[source_len - len + i]);
            let target_signature = self.state.get_erased_signature(target_signatures[target_len - len + i]);
            self.infer_from_signature(source_signature, target_signature);
        }
    }

    fn infer_from_signature(&mut self, source: SignatureId, target: SignatureId) {
        let saved = self.bivariant;
        self.bivariant = self.bivariant || self.state.is_method_signature(target);
        self.apply_to_parameter_types(source, target);
        self.bivariant = saved;
        let source_return = self.state.get_return_type_of_signature(source);
        let target_return = self.state.get_return_type_of_signature(target);
        self.infer_from_types(source_return, target_return);
    }

    fn apply_to_parameter_types(&mut self, source: SignatureId, target: SignatureId) {
        let source_has_rest = self.state.ctx.types.signature(source).has_rest_parameter();
        let target_rest = self.state.get_rest_type_of_signature(target);
        let source_non_rest = self.state.ctx.types.signature(source).parameters.len() - usize::from(source_has_rest);
        let target_non_rest =
            self.state.ctx.types.signature(target).parameters.len() - usize::from(target_rest.is_some());
        let count = if source_has_rest {
            target_non_rest
        } else {
            source_non_rest.min(target_non_rest)
        };
        for position in 0..count {
            let (Some(s), Some(t)) = (
                self.state.get_type_at_position(source, position),
                self.state.get_type_at_position(target, position),
            ) else {
                break;
            };
            self.infer_from_contravariant_types_if_strict(s, t);
        }
        if let Some(target_rest) = target_rest {
            let source_rest = self.state.get_rest_type_at_position(source, count);
            self.infer_from_contravariant_types_if_strict(source_rest, target_rest);
        }
    }

    fn infer_from_index_types(&mut self, source: TypeId, target: TypeId) {
        let priority = if self.state.object_flags(source).contains(ObjectFlags::MAPPED)
            && self.state.object_flags(target).contains(ObjectFlags::MAPPED)
        {
            InferencePriority::HOMOMORPHIC_MAPPED_TYPE
        } else {
            InferencePriority::empty()
        };
        let target_infos = self.state.get_index_infos_of_type(target);
        if self.state.is_object_type_with_inferable_index(source) {
            for target_info in &target_infos {
                let mut property_types = Vec::new();
                for property in self.state.get_properties_of_type(source) {
                    let name = self.state.symbol_name(property);
                    let name_type = self.state.ctx.types.string_literal(&name);
                    if !self.state.is_applicable_index_type(name_type, target_info.key_type) {
                        continue;
                    }
                    let t = self.state.get_type_of_symbol(property);
                    property_types.push(if self.state.symbol_flags_raw(property) & tyck_binder::symbol_flags::OPTIONAL != 0 {
                        self.state.remove_missing_or_undefined_type(t)
                    } else {
                        t
                    });
                }
                for info in self.state.get_index_infos_of_type(source) {
                    if self.state.is_applicable_index_type(info.key_type, target_info.key_type) {
                        property_types.push(info.value_type);
                    }
                }
                if !property_types.is_empty() {
                    let union = self.state.get_union_type(&property_types);
                    self.infer_with_priority(union, target_info.value_type, priority);
                }
            }
        }
        for target_info in target_infos {
            if let Some(source_info) = self.state.get_applicable_index_info(source, target_info.key_type) {
                self.infer_with_priority(source_info.value_type, target_info.value_type, priority);
            }
        }
    }
}

impl<'a> CheckerState<'a> {
    /// Generic signature with its type parameters replaced by their
    /// constraints.
    pub(crate) fn get_base_signature(&mut self, signature: SignatureId) -> SignatureId {
        let parameters = self.ctx.types.signature(signature).type_parameters.clone();
        if parameters.is_empty() {
            return signature;
        }
        let constraints: Vec<TypeId> = parameters
            .iter()
            .map(|&p| self.get_constraint_of_type_parameter(p).unwrap_or(TypeId::UNKNOWN))
            .collect();
        let mapper = tyck_types::TypeMapper::from_lists(parameters, Some(constraints));
        self.instantiate_signature(signature, &mapper, true)
    }

    /// Parameters from `position` onwards as one rest type: the declared
    /// rest type when it starts there, otherwise a tuple.
    pub(crate) fn get_rest_type_at_position(&mut self, signature: SignatureId, position: usize) -> TypeId {
        let s = self.ctx.types.signature(signature);
        let has_rest = s.has_rest_parameter();
        let min_argument_count = s.min_argument_count;
        let non_rest = s.parameters.len() - usize::from(has_rest);
        if has_rest && position == non_rest {
            return self.get_rest_type_of_signature(signature).unwrap_or(TypeId::ANY);
        }
        let mut types = Vec::new();
        let mut flags = Vec::new();
        for i in position..non_rest {
            types.push(self.get_type_at_position(signature, i).unwrap_or(TypeId::ANY));
            flags.push(if i < min_argument_count {
                ElementFlags::REQUIRED
            } else {
                ElementFlags::OPTIONAL
            });
        }
        if has_rest && let Some(rest) = self.get_rest_type_of_signature(signature) {
            types.push(rest);
            flags.push(ElementFlags::VARIADIC);
        }
        self.create_tuple_type(&types, Some(&flags), false, &[])
    }
}
