//! Structural type relations: identity, subtype, strict subtype,
//! assignability and comparability.
//!
//! Every query goes through a [`RelationChecker`], which owns the recursion
//! guard and the identity stacks for one top-level comparison. Results are
//! cached per relation in the checker context. A comparison that reaches a
//! pair already being compared assumes the relation holds; such
//! provisional results are only cached once the outermost comparison
//! finishes.

mod structural;
mod variance;

use rustc_hash::FxHashMap;
use tracing::trace;
use tyck_types::{ObjectFlags, TypeFlags, TypeId};

use crate::recursion::{RecursionGuard, RecursionProfile};
use crate::state::CheckerState;
use crate::types::RecursionIdentity;

/// Outcome of a relation check. `Maybe` is a provisional success that
/// depends on an assumption made for a pair still being compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Ternary {
    False,
    Unknown,
    Maybe,
    True,
}

impl Ternary {
    #[inline]
    pub fn is_true(self) -> bool {
        matches!(self, Ternary::Maybe | Ternary::True)
    }

    #[inline]
    pub fn and(self, other: Ternary) -> Ternary {
        self.min(other)
    }

    #[inline]
    pub fn from_bool(value: bool) -> Ternary {
        if value { Ternary::True } else { Ternary::False }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Identity,
    Subtype,
    /// Subtype with tie-breaks used by subtype reduction.
    StrictSubtype,
    Assignable,
    /// Assignability in either direction for simple types, used by type
    /// assertions.
    Comparable,
}

impl<'a> CheckerState<'a> {
    pub fn is_type_assignable_to(&mut self, source: TypeId, target: TypeId) -> bool {
        self.is_type_related_to(source, target, RelationKind::Assignable)
    }

    pub fn is_type_subtype_of(&mut self, source: TypeId, target: TypeId) -> bool {
        self.is_type_related_to(source, target, RelationKind::Subtype)
    }

    pub(crate) fn is_type_strict_subtype_of(&mut self, source: TypeId, target: TypeId) -> bool {
        self.is_type_related_to(source, target, RelationKind::StrictSubtype)
    }

    pub fn is_type_identical_to(&mut self, source: TypeId, target: TypeId) -> bool {
        self.is_type_related_to(source, target, RelationKind::Identity)
    }

    pub(crate) fn is_type_comparable_to(&mut self, source: TypeId, target: TypeId) -> bool {
        self.is_type_related_to(source, target, RelationKind::Comparable)
    }

    /// Whether `source` is related to `target` under `relation`.
    pub fn is_type_related_to(&mut self, source: TypeId, target: TypeId, relation: RelationKind) -> bool {
        let source = self.normalize_for_relation(source);
        let target = self.normalize_for_relation(target);
        if source == target {
            return true;
        }
        if relation != RelationKind::Identity {
            if self.is_simple_type_related_to(source, target, relation)
                || (relation == RelationKind::Comparable && self.is_simple_type_related_to(target, source, relation))
            {
                return true;
            }
            let structured = TypeFlags::STRUCTURED_OR_INSTANTIABLE;
            if !self.type_flags(source).intersects(structured) && !self.type_flags(target).intersects(structured) {
                return false;
            }
        }
        if let Some(&cached) = self.relation_cache(relation).get(&(source, target)) {
            return cached.is_true();
        }
        let result = stacker::maybe_grow(64 * 1024, 1024 * 1024, || {
            RelationChecker::new(self, relation).is_related_to(source, target)
        });
        trace!(source = source.0, target = target.0, ?relation, ?result, "relation checked");
        result.is_true()
    }

    /// Fresh literals compare as their regular form.
    fn normalize_for_relation(&self, t: TypeId) -> TypeId {
        if self.type_flags(t).intersects(TypeFlags::FRESHABLE) {
            self.get_regular_type_of_literal_type(t)
        } else {
            t
        }
    }

    pub(crate) fn relation_cache(&mut self, relation: RelationKind) -> &mut FxHashMap<(TypeId, TypeId), Ternary> {
        match relation {
            RelationKind::Identity => &mut self.ctx.identity_relation,
            RelationKind::Subtype => &mut self.ctx.subtype_relation,
            RelationKind::StrictSubtype => &mut self.ctx.strict_subtype_relation,
            RelationKind::Assignable => &mut self.ctx.assignable_relation,
            RelationKind::Comparable => &mut self.ctx.comparable_relation,
        }
    }

    /// Relations decidable from flags alone.
    pub(crate) fn is_simple_type_related_to(&self, source: TypeId, target: TypeId, relation: RelationKind) -> bool {
        let s = self.type_flags(source);
        let t = self.type_flags(target);
        if t.contains(TypeFlags::ANY) || s.contains(TypeFlags::NEVER) || source == TypeId::WILDCARD {
            return true;
        }
        if t.contains(TypeFlags::UNKNOWN) && !(relation == RelationKind::StrictSubtype && s.contains(TypeFlags::ANY)) {
            return true;
        }
        if t.contains(TypeFlags::NEVER) {
            return false;
        }
        if s.intersects(TypeFlags::STRING_LIKE) && t.contains(TypeFlags::STRING) {
            return true;
        }
        if s.intersects(TypeFlags::NUMBER_LIKE) && t.contains(TypeFlags::NUMBER) && !t.contains(TypeFlags::UNION) {
            return true;
        }
        if s.intersects(TypeFlags::BIG_INT_LIKE) && t.contains(TypeFlags::BIG_INT) {
            return true;
        }
        if s.contains(TypeFlags::BOOLEAN_LITERAL) && t.contains(TypeFlags::BOOLEAN) && !s.contains(TypeFlags::UNION) {
            return true;
        }
        if s.intersects(TypeFlags::ES_SYMBOL_LIKE) && t.contains(TypeFlags::ES_SYMBOL) {
            return true;
        }
        let strict = self.ctx.strict_null_checks();
        if s.contains(TypeFlags::UNDEFINED)
            && ((!strict && !t.intersects(TypeFlags::UNION_OR_INTERSECTION)) || t.intersects(TypeFlags::VOID_LIKE))
        {
            return true;
        }
        if s.contains(TypeFlags::NULL)
            && ((!strict && !t.intersects(TypeFlags::UNION_OR_INTERSECTION)) || t.contains(TypeFlags::NULL))
        {
            return true;
        }
        if s.contains(TypeFlags::OBJECT)
            && t.contains(TypeFlags::NON_PRIMITIVE)
            && !(relation == RelationKind::StrictSubtype
                && self.is_empty_anonymous_object_type(source)
                && !self.object_flags(source).contains(ObjectFlags::FRESH_LITERAL))
        {
            return true;
        }
        if matches!(relation, RelationKind::Assignable | RelationKind::Comparable) {
            if s.contains(TypeFlags::ANY) {
                return true;
            }
            // Numbers are assignable to numeric enums.
            if s.intersects(TypeFlags::NUMBER | TypeFlags::NUMBER_LITERAL)
                && !s.contains(TypeFlags::ENUM_LITERAL)
                && (t.contains(TypeFlags::ENUM)
                    || (t.contains(TypeFlags::NUMBER_LITERAL) && t.contains(TypeFlags::ENUM_LITERAL)))
            {
                return true;
            }
        }
        false
    }

    /// `source` derives from `target` through class or interface bases.
    /// Used to break ties in strict subtype reduction.
    pub(crate) fn is_type_derived_from(&mut self, source: TypeId, target: TypeId) -> bool {
        let flags = self.type_flags(source);
        if flags.contains(TypeFlags::UNION) {
            let types = self.ty(source).constituents().to_vec();
            return types.into_iter().all(|s| self.is_type_derived_from(s, target));
        }
        if self.type_flags(target).contains(TypeFlags::UNION) {
            let types = self.ty(target).constituents().to_vec();
            return types.into_iter().any(|t| self.is_type_derived_from(source, t));
        }
        if flags.intersects(TypeFlags::INSTANTIABLE) {
            let constraint = self.get_base_constraint_of_type(source).unwrap_or(TypeId::UNKNOWN);
            return constraint != source && self.is_type_derived_from(constraint, target);
        }
        if Some(target) == self.get_global_type("Object") {
            return flags.intersects(TypeFlags::OBJECT | TypeFlags::NON_PRIMITIVE);
        }
        if self.is_array_type(target) && !self.is_readonly_array_type(target) {
            return self.is_array_type(source) && !self.is_readonly_array_type(source);
        }
        let target = self.get_target_type(target);
        self.has_base_type(source, target)
    }
}

/// One top-level relation query.
pub(crate) struct RelationChecker<'s, 'a> {
    pub(crate) state: &'s mut CheckerState<'a>,
    pub(crate) relation: RelationKind,
    guard: RecursionGuard<(TypeId, TypeId)>,
    source_stack: Vec<RecursionIdentity>,
    target_stack: Vec<RecursionIdentity>,
    /// Number of provisional results handed out so far.
    assumptions: u32,
}

impl<'s, 'a> RelationChecker<'s, 'a> {
    pub(crate) fn new(state: &'s mut CheckerState<'a>, relation: RelationKind) -> Self {
        Self {
            state,
            relation,
            guard: RecursionGuard::with_profile(RecursionProfile::Relation),
            source_stack: Vec::new(),
            target_stack: Vec::new(),
            assumptions: 0,
        }
    }

    pub(crate) fn is_related_to(&mut self, source: TypeId, target: TypeId) -> Ternary {
        let source = self.state.normalize_for_relation(source);
        let target = self.state.normalize_for_relation(target);
        if source == target {
            return Ternary::True;
        }
        if self.relation == RelationKind::Identity {
            return self.is_identical_to(source, target);
        }
        if self.state.is_simple_type_related_to(source, target, self.relation)
            || (self.relation == RelationKind::Comparable
                && self.state.is_simple_type_related_to(target, source, self.relation))
        {
            return Ternary::True;
        }
        let structured = TypeFlags::STRUCTURED_OR_INSTANTIABLE;
        let source_flags = self.state.type_flags(source);
        let target_flags = self.state.type_flags(target);
        if !source_flags.intersects(structured) && !target_flags.intersects(structured) {
            return Ternary::False;
        }
        if self.relation == RelationKind::Assignable
            && self.state.object_flags(source).contains(ObjectFlags::FRESH_LITERAL)
            && self.has_excess_properties(source, target)
        {
            return Ternary::False;
        }
        if self.is_performing_common_property_check(source, target) && !self.has_common_properties(source, target) {
            return Ternary::False;
        }
        self.recursive_type_related_to(source, target)
    }

    fn is_identical_to(&mut self, source: TypeId, target: TypeId) -> Ternary {
        let source_flags = self.state.type_flags(source);
        let target_flags = self.state.type_flags(target);
        if source_flags != target_flags {
            return Ternary::False;
        }
        if source_flags.intersects(TypeFlags::UNIT) || !source_flags.intersects(TypeFlags::STRUCTURED_OR_INSTANTIABLE) {
            return Ternary::False;
        }
        if source_flags.intersects(TypeFlags::UNION_OR_INTERSECTION) {
            let sources = self.state.ty(source).constituents().to_vec();
            let targets = self.state.ty(target).constituents().to_vec();
            if sources.len() != targets.len() {
                return Ternary::False;
            }
            let mut result = Ternary::True;
            for s in sources {
                let related = self.type_related_to_some_type(s, &targets);
                if related == Ternary::False {
                    return Ternary::False;
                }
                result = result.and(related);
            }
            return result;
        }
        self.recursive_type_related_to(source, target)
    }

    /// Cached, cycle-guarded structural comparison.
    fn recursive_type_related_to(&mut self, source: TypeId, target: TypeId) -> Ternary {
        let key = (source, target);
        if let Some(&cached) = self.state.relation_cache(self.relation).get(&key) {
            return cached;
        }
        let entered = self.guard.enter(key);
        if entered.is_cycle() || entered.is_exceeded() {
            self.assumptions += 1;
            return Ternary::Maybe;
        }
        let source_identity = self.state.get_recursion_identity(source);
        let target_identity = self.state.get_recursion_identity(target);
        let deeply_nested = self.source_stack.iter().filter(|&&i| i == source_identity).count() >= 3
            && self.target_stack.iter().filter(|&&i| i == target_identity).count() >= 3;
        if deeply_nested {
            self.guard.leave(key);
            self.assumptions += 1;
            return Ternary::Maybe;
        }
        self.source_stack.push(source_identity);
        self.target_stack.push(target_identity);
        let before = self.assumptions;
        let result = self.structured_type_related_to(source, target);
        self.source_stack.pop();
        self.target_stack.pop();
        self.guard.leave(key);

        if result == Ternary::False || self.assumptions == before || self.guard.depth() == 0 {
            let settled = Ternary::from_bool(result.is_true());
            self.state.relation_cache(self.relation).insert(key, settled);
        }
        result
    }
}

#[cfg(test)]
#[path = "../tests/relation_tests.rs"]
mod tests;
