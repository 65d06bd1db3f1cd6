//! Structural comparison: unions and intersections, type variables,
//! references, arrays and tuples, and object members.

use tyck_binder::{SymbolId, symbol_flags};
use tyck_types::{
    ElementFlags, IndexFlags, ObjectFlags, SignatureFlags, SignatureId, SignatureKind, TypeData, TypeFlags, TypeId,
    VarianceFlags,
};

use super::{RelationChecker, RelationKind, Ternary};
use crate::types::is_numeric_literal_name;

impl<'s, 'a> RelationChecker<'s, 'a> {
    pub(super) fn structured_type_related_to(&mut self, source: TypeId, target: TypeId) -> Ternary {
        let source_flags = self.state.type_flags(source);
        let target_flags = self.state.type_flags(target);

        if self.relation == RelationKind::Identity {
            if source_flags.contains(TypeFlags::OBJECT) {
                return self.object_type_related_to(source, target);
            }
            if source_flags.contains(TypeFlags::INDEX) {
                let (s, t) = (self.index_target(source), self.index_target(target));
                return self.is_related_to(s, t);
            }
            if source_flags.contains(TypeFlags::INDEXED_ACCESS) {
                return self.indexed_access_related_to(source, target);
            }
            return Ternary::False;
        }

        if source_flags.contains(TypeFlags::UNION) {
            let sources = self.state.ty(source).constituents().to_vec();
            return if self.relation == RelationKind::Comparable {
                self.some_type_related_to_type(&sources, target)
            } else {
                self.each_type_related_to_type(&sources, target)
            };
        }
        if target_flags.contains(TypeFlags::UNION) {
            let targets = self.state.ty(target).constituents().to_vec();
            let source = self.state.get_regular_type_of_literal_type(source);
            return self.type_related_to_some_type(source, &targets);
        }
        if target_flags.contains(TypeFlags::INTERSECTION) {
            let targets = self.state.ty(target).constituents().to_vec();
            let mut result = Ternary::True;
            for t in targets {
                let related = self.is_related_to(source, t);
                if related == Ternary::False {
                    return Ternary::False;
                }
                result = result.and(related);
            }
            return result;
        }
        if source_flags.contains(TypeFlags::INTERSECTION) {
            let sources = self.state.ty(source).constituents().to_vec();
            let some = self.some_type_related_to_type(&sources, target);
            if some.is_true() || !target_flags.contains(TypeFlags::OBJECT) {
                return some;
            }
            // The combined members of the intersection may still satisfy
            // the target.
            return self.object_type_related_to(source, target);
        }

        if target_flags.contains(TypeFlags::TYPE_PARAMETER) {
            return Ternary::False;
        }
        if target_flags.contains(TypeFlags::INDEX) {
            if source_flags.contains(TypeFlags::INDEX) {
                let (s, t) = (self.index_target(source), self.index_target(target));
                return self.is_related_to(t, s);
            }
            // `keyof C` is a subset of `keyof T` when `T extends C`.
            let operand = self.index_target(target);
            if let Some(constraint) = self.state.get_constraint_of_type(operand) {
                let keys = self.state.get_index_type(constraint, IndexFlags::empty());
                return self.is_related_to(source, keys);
            }
            return Ternary::False;
        }
        if target_flags.contains(TypeFlags::INDEXED_ACCESS) && source_flags.contains(TypeFlags::INDEXED_ACCESS) {
            let result = self.indexed_access_related_to(source, target);
            if result.is_true() {
                return result;
            }
        }
        if target_flags.contains(TypeFlags::TEMPLATE_LITERAL) {
            return self.template_literal_related_to(source, target);
        }

        if source_flags.intersects(TypeFlags::TYPE_VARIABLE) {
            let constraint = self.state.get_constraint_of_type(source).unwrap_or(TypeId::UNKNOWN);
            if constraint == source {
                return Ternary::False;
            }
            return self.is_related_to(constraint, target);
        }
        if source_flags.contains(TypeFlags::INDEX) {
            let constraint = self.state.string_number_symbol_type();
            return self.is_related_to(constraint, target);
        }
        if source_flags.intersects(TypeFlags::TEMPLATE_LITERAL | TypeFlags::STRING_MAPPING) {
            return self.is_related_to(TypeId::STRING, target);
        }

        if target_flags.contains(TypeFlags::OBJECT) {
            if source_flags.contains(TypeFlags::OBJECT) {
                return self.object_type_related_to(source, target);
            }
            if source_flags.intersects(TypeFlags::NULLABLE | TypeFlags::VOID) {
                return Ternary::False;
            }
            if source_flags.intersects(TypeFlags::PRIMITIVE | TypeFlags::NON_PRIMITIVE) {
                let apparent = self.state.get_apparent_type(source);
                if apparent != source && self.state.type_flags(apparent).contains(TypeFlags::OBJECT) {
                    return self.object_type_related_to(apparent, target);
                }
                // Without a declared wrapper interface only the empty
                // object type accepts a primitive.
                return Ternary::from_bool(self.state.is_empty_object_type(target));
            }
        }
        Ternary::False
    }

    fn index_target(&self, t: TypeId) -> TypeId {
        match &self.state.ty(t).data {
            TypeData::Index(index) => index.target,
            _ => t,
        }
    }

    fn indexed_access_related_to(&mut self, source: TypeId, target: TypeId) -> Ternary {
        let parts = |checker: &Self, t: TypeId| match &checker.state.ty(t).data {
            TypeData::IndexedAccess(access) => Some((access.object_type, access.index_type)),
            _ => None,
        };
        let (Some((source_object, source_index)), Some((target_object, target_index))) =
            (parts(self, source), parts(self, target))
        else {
            return Ternary::False;
        };
        let objects = self.is_related_to(source_object, target_object);
        if objects == Ternary::False {
            return Ternary::False;
        }
        objects.and(self.is_related_to(source_index, target_index))
    }

    fn template_literal_related_to(&mut self, source: TypeId, target: TypeId) -> Ternary {
        if let Some(text) = self.state.string_literal_value(source) {
            return Ternary::from_bool(self.state.is_string_matched_by_template_literal(&text, target));
        }
        let (TypeData::TemplateLiteral(s), TypeData::TemplateLiteral(t)) =
            (self.state.ty(source).data.clone(), self.state.ty(target).data.clone())
        else {
            return Ternary::False;
        };
        if s.texts != t.texts {
            return Ternary::False;
        }
        let mut result = Ternary::True;
        for (&s_hole, &t_hole) in s.types.iter().zip(&t.types) {
            let related = self.is_related_to(s_hole, t_hole);
            if related == Ternary::False {
                return Ternary::False;
            }
            result = result.and(related);
        }
        result
    }

    // =========================================================================
    // Unions and intersections
    // =========================================================================

    fn each_type_related_to_type(&mut self, sources: &[TypeId], target: TypeId) -> Ternary {
        let mut result = Ternary::True;
        for &s in sources {
            let related = self.is_related_to(s, target);
            if related == Ternary::False {
                return Ternary::False;
            }
            result = result.and(related);
        }
        result
    }

    fn some_type_related_to_type(&mut self, sources: &[TypeId], target: TypeId) -> Ternary {
        for &s in sources {
            let related = self.is_related_to(s, target);
            if related.is_true() {
                return related;
            }
        }
        Ternary::False
    }

    pub(super) fn type_related_to_some_type(&mut self, source: TypeId, targets: &[TypeId]) -> Ternary {
        if targets.contains(&source) {
            return Ternary::True;
        }
        for &t in targets {
            let related = self.is_related_to(source, t);
            if related.is_true() {
                return related;
            }
        }
        Ternary::False
    }

    // =========================================================================
    // Object types
    // =========================================================================

    fn object_type_related_to(&mut self, source: TypeId, target: TypeId) -> Ternary {
        if self.state.is_array_type(target) && self.state.is_array_or_tuple_type(source) {
            return self.array_related_to(source, target);
        }
        if self.state.is_tuple_type(target) {
            if self.state.is_tuple_type(source) {
                return self.tuple_related_to(source, target);
            }
            if self.state.is_array_type(source) {
                return Ternary::False;
            }
        }
        if let Some(result) = self.type_arguments_related_by_variance(source, target) {
            return result;
        }
        if self.state.is_generic_mapped_type(target) || self.state.is_generic_mapped_type(source) {
            return self.generic_mapped_type_related_to(source, target);
        }
        let mut result = self.properties_related_to(source, target);
        if result == Ternary::False {
            return result;
        }
        for kind in [SignatureKind::Call, SignatureKind::Construct] {
            result = result.and(self.signatures_related_to(source, target, kind));
            if result == Ternary::False {
                return result;
            }
        }
        result.and(self.index_signatures_related_to(source, target))
    }

    fn array_related_to(&mut self, source: TypeId, target: TypeId) -> Ternary {
        if self.state.is_readonly_array_type(source)
            && !self.state.is_readonly_array_type(target)
            && self.relation != RelationKind::Comparable
        {
            return Ternary::False;
        }
        if self.state.is_tuple_type(source)
            && self
                .state
                .tuple_target_info(source)
                .is_some_and(|info| info.readonly)
            && !self.state.is_readonly_array_type(target)
        {
            return Ternary::False;
        }
        let source_element = self.state.array_like_element_type(source).unwrap_or(TypeId::NEVER);
        let target_element = self.state.array_element_type(target).unwrap_or(TypeId::UNKNOWN);
        self.is_related_to(source_element, target_element)
    }

    fn tuple_related_to(&mut self, source: TypeId, target: TypeId) -> Ternary {
        let (Some(source_info), Some(target_info)) =
            (self.state.tuple_target_info(source), self.state.tuple_target_info(target))
        else {
            return Ternary::False;
        };
        if source_info.readonly && !target_info.readonly && self.relation != RelationKind::Comparable {
            return Ternary::False;
        }
        let source_elements = self.state.get_element_types(source);
        let target_elements = self.state.get_element_types(target);
        let target_variable = target_info.combined_flags.intersects(ElementFlags::VARIABLE);
        let source_variable = source_info.combined_flags.intersects(ElementFlags::VARIABLE);
        if !target_variable && (source_variable || source_elements.len() > target_elements.len()) {
            return Ternary::False;
        }
        if source_info.min_length < target_info.min_length {
            return Ternary::False;
        }
        if self.relation == RelationKind::Identity
            && (source_elements.len() != target_elements.len() || source_info.element_flags != target_info.element_flags)
        {
            return Ternary::False;
        }
        let target_prefix = target_info
            .element_flags
            .iter()
            .position(|f| f.intersects(ElementFlags::VARIABLE))
            .unwrap_or(target_elements.len());
        let mut result = Ternary::True;
        for (i, &source_element) in source_elements.iter().enumerate() {
            let source_flags = source_info.element_flags[i];
            let (target_element, target_flags) = if i < target_prefix {
                (target_elements[i], target_info.element_flags[i])
            } else if target_variable {
                let rest = target_elements[target_prefix];
                let flags = target_info.element_flags[target_prefix];
                if flags.contains(ElementFlags::VARIADIC) {
                    (
                        self.state.get_indexed_access_type(
                            rest,
                            TypeId::NUMBER,
                            tyck_types::AccessFlags::empty(),
                            tyck_binder::NodeIndex::NONE,
                            None,
                        ),
                        flags,
                    )
                } else {
                    (rest, flags)
                }
            } else {
                return Ternary::False;
            };
            if source_flags.intersects(ElementFlags::VARIABLE) && !target_flags.intersects(ElementFlags::VARIABLE) {
                return Ternary::False;
            }
            let related = self.is_related_to(source_element, target_element);
            if related == Ternary::False {
                return Ternary::False;
            }
            result = result.and(related);
        }
        result
    }

    /// Compare references to the same generic class or interface through
    /// the measured variance of each type parameter. `None` falls through
    /// to a structural comparison.
    fn type_arguments_related_by_variance(&mut self, source: TypeId, target: TypeId) -> Option<Ternary> {
        let source_ref = self.state.reference_data(source)?;
        let target_ref = self.state.reference_data(target)?;
        if source_ref.target != target_ref.target || self.state.ty(source_ref.target).tuple_info().is_some() {
            return None;
        }
        let generic = source_ref.target;
        let source_arguments = self.state.get_type_arguments(source);
        let target_arguments = self.state.get_type_arguments(target);
        let variances = self.state.get_variances(generic);
        let mut result = Ternary::True;
        let mut allows_fallback = false;
        for (i, (&s, &t)) in source_arguments.iter().zip(&target_arguments).enumerate() {
            let variance_flags = variances.get(i).copied().unwrap_or(VarianceFlags::COVARIANT);
            allows_fallback |= variance_flags.intersects(VarianceFlags::ALLOWS_STRUCTURAL_FALLBACK);
            let variance = variance_flags.variance();
            let related = if self.relation == RelationKind::Identity {
                self.is_related_to(s, t)
            } else if variance_flags.contains(VarianceFlags::INDEPENDENT) {
                Ternary::True
            } else if variance == VarianceFlags::COVARIANT {
                self.is_related_to(s, t)
            } else if variance == VarianceFlags::CONTRAVARIANT {
                self.is_related_to(t, s)
            } else if variance == VarianceFlags::BIVARIANT {
                let forward = self.is_related_to(s, t);
                if forward.is_true() { forward } else { self.is_related_to(t, s) }
            } else {
                let forward = self.is_related_to(s, t);
                if forward.is_true() { forward.and(self.is_related_to(t, s)) } else { Ternary::False }
            };
            if related == Ternary::False {
                return if allows_fallback || variances.len() <= i { None } else { Some(Ternary::False) };
            }
            result = result.and(related);
        }
        Some(result)
    }

    fn generic_mapped_type_related_to(&mut self, source: TypeId, target: TypeId) -> Ternary {
        if !(self.state.is_generic_mapped_type(source) && self.state.is_generic_mapped_type(target)) {
            return Ternary::False;
        }
        if self.state.get_mapped_type_modifiers(source) != self.state.get_mapped_type_modifiers(target) {
            return Ternary::False;
        }
        let source_constraint = self.state.get_constraint_type_from_mapped_type(source);
        let target_constraint = self.state.get_constraint_type_from_mapped_type(target);
        let constraints = if self.relation == RelationKind::Identity {
            self.is_related_to(source_constraint, target_constraint)
        } else {
            self.is_related_to(target_constraint, source_constraint)
        };
        if constraints == Ternary::False {
            return Ternary::False;
        }
        let source_parameter = self.state.get_type_parameter_from_mapped_type(source);
        let target_parameter = self.state.get_type_parameter_from_mapped_type(target);
        let mapper = tyck_types::TypeMapper::from_lists(vec![source_parameter], Some(vec![target_parameter]));
        let source_template = self.state.get_template_type_from_mapped_type(source);
        let source_template = self.state.instantiate_type(source_template, &mapper);
        let target_template = self.state.get_template_type_from_mapped_type(target);
        constraints.and(self.is_related_to(source_template, target_template))
    }

    // =========================================================================
    // Members
    // =========================================================================

    fn properties_related_to(&mut self, source: TypeId, target: TypeId) -> Ternary {
        let target_properties = self.state.get_properties_of_type(target);
        if self.relation == RelationKind::Identity {
            let source_properties = self.state.get_properties_of_type(source);
            if source_properties.len() != target_properties.len() {
                return Ternary::False;
            }
        }
        let mut result = Ternary::True;
        for target_property in target_properties {
            if self.state.symbol_flags_raw(target_property) & symbol_flags::PROTOTYPE != 0 {
                continue;
            }
            let name = self.state.symbol_name(target_property);
            let target_optional = self.state.symbol_flags_raw(target_property) & symbol_flags::OPTIONAL != 0;
            let Some(source_property) = self.state.get_property_of_type(source, &name) else {
                if target_optional && self.relation != RelationKind::Identity {
                    continue;
                }
                return Ternary::False;
            };
            if source_property == target_property {
                continue;
            }
            let related = self.property_related_to(source_property, target_property, target_optional);
            if related == Ternary::False {
                return Ternary::False;
            }
            result = result.and(related);
        }
        result
    }

    fn property_related_to(&mut self, source_property: SymbolId, target_property: SymbolId, target_optional: bool) -> Ternary {
        let source_optional = self.state.symbol_flags_raw(source_property) & symbol_flags::OPTIONAL != 0;
        if self.relation == RelationKind::Identity {
            if source_optional != target_optional
                || self.state.is_readonly_symbol(source_property) != self.state.is_readonly_symbol(target_property)
            {
                return Ternary::False;
            }
        } else if source_optional && !target_optional && self.relation != RelationKind::Comparable {
            return Ternary::False;
        }
        let source_type = self.state.get_type_of_symbol(source_property);
        let target_type = self.state.get_write_type_of_symbol(target_property);
        let target_type = if target_optional && !self.state.ctx.options.exact_optional_property_types {
            self.state.get_type_of_symbol(target_property)
        } else {
            target_type
        };
        self.is_related_to(source_type, target_type)
    }

    fn signatures_related_to(&mut self, source: TypeId, target: TypeId, kind: SignatureKind) -> Ternary {
        let target_signatures = self.state.get_signatures_of_type(target, kind);
        let source_signatures = self.state.get_signatures_of_type(source, kind);
        if self.relation == RelationKind::Identity {
            if source_signatures.len() != target_signatures.len() {
                return Ternary::False;
            }
            for (&s, &t) in source_signatures.iter().zip(&target_signatures) {
                if !self.state.compare_signatures_identical(s, t, false, false) {
                    return Ternary::False;
                }
            }
            return Ternary::True;
        }
        if target_signatures.is_empty() {
            return Ternary::True;
        }
        if source_signatures.is_empty() {
            return Ternary::False;
        }
        if kind == SignatureKind::Construct {
            let source_abstract = source_signatures
                .iter()
                .any(|&s| self.state.ctx.types.signature(s).flags.contains(SignatureFlags::ABSTRACT));
            let target_abstract = target_signatures
                .iter()
                .any(|&s| self.state.ctx.types.signature(s).flags.contains(SignatureFlags::ABSTRACT));
            if source_abstract && !target_abstract {
                return Ternary::False;
            }
        }
        let mut result = Ternary::True;
        for target_signature in target_signatures {
            let mut matched = Ternary::False;
            for &source_signature in &source_signatures {
                let related = self.signature_related_to(source_signature, target_signature, kind);
                if related.is_true() {
                    matched = related;
                    break;
                }
            }
            if matched == Ternary::False {
                return Ternary::False;
            }
            result = result.and(matched);
        }
        result
    }

    /// Parameters compare contravariantly under `strictFunctionTypes`
    /// (bivariantly for methods and otherwise), return types covariantly.
    fn signature_related_to(&mut self, source: SignatureId, target: SignatureId, kind: SignatureKind) -> Ternary {
        if source == target {
            return Ternary::True;
        }
        let source = if self.state.ctx.types.signature(source).type_parameters.is_empty() {
            source
        } else {
            self.state.get_erased_signature(source)
        };
        let target = if self.state.ctx.types.signature(target).type_parameters.is_empty() {
            target
        } else {
            self.state.get_erased_signature(target)
        };
        let target_count = self.state.get_parameter_count(target);
        let source_count = self.state.get_parameter_count(source);
        let source_has_rest = self.state.ctx.types.signature(source).has_rest_parameter();
        let target_has_rest = self.state.ctx.types.signature(target).has_rest_parameter();
        let source_min = self.state.ctx.types.signature(source).min_argument_count;
        if !target_has_rest && source_min > target_count {
            return Ternary::False;
        }
        let strict_variance = self.state.ctx.options.strict_function_types
            && kind == SignatureKind::Call
            && !self.state.is_method_signature(target);
        let count = if source_has_rest || target_has_rest {
            source_count.max(target_count)
        } else {
            source_count.min(target_count)
        };
        let mut result = Ternary::True;
        for position in 0..count {
            let (Some(source_type), Some(target_type)) = (
                self.state.get_type_at_position(source, position),
                self.state.get_type_at_position(target, position),
            ) else {
                break;
            };
            let mut related = self.is_related_to(target_type, source_type);
            if !related.is_true() && !strict_variance {
                related = self.is_related_to(source_type, target_type);
            }
            if related == Ternary::False {
                return Ternary::False;
            }
            result = result.and(related);
        }
        let target_return = self.state.get_return_type_of_signature(target);
        if target_return == TypeId::VOID || target_return.is_any() {
            return result;
        }
        let source_return = self.state.get_return_type_of_signature(source);
        result.and(self.is_related_to(source_return, target_return))
    }

    fn index_signatures_related_to(&mut self, source: TypeId, target: TypeId) -> Ternary {
        let target_infos = self.state.get_index_infos_of_type(target);
        if self.relation == RelationKind::Identity {
            let source_infos = self.state.get_index_infos_of_type(source);
            if source_infos.len() != target_infos.len() {
                return Ternary::False;
            }
        }
        let mut result = Ternary::True;
        for target_info in target_infos {
            let related = if let Some(source_info) = self.state.get_applicable_index_info(source, target_info.key_type)
            {
                if self.relation == RelationKind::Identity && source_info.is_readonly != target_info.is_readonly {
                    Ternary::False
                } else {
                    self.is_related_to(source_info.value_type, target_info.value_type)
                }
            } else if self.relation != RelationKind::Identity && self.state.is_object_type_with_inferable_index(source) {
                self.members_related_to_index_info(source, target_info.key_type, target_info.value_type)
            } else if target_info.value_type.is_any() && target_info.key_type == TypeId::STRING {
                Ternary::True
            } else {
                Ternary::False
            };
            if related == Ternary::False {
                return Ternary::False;
            }
            result = result.and(related);
        }
        result
    }

    fn members_related_to_index_info(&mut self, source: TypeId, key_type: TypeId, value_type: TypeId) -> Ternary {
        let mut result = Ternary::True;
        for property in self.state.get_properties_of_type(source) {
            let name = self.state.symbol_name(property);
            if key_type == TypeId::NUMBER && !is_numeric_literal_name(&name) {
                continue;
            }
            let property_type = self.state.get_type_of_symbol(property);
            let property_type = self.state.remove_missing_or_undefined_type(property_type);
            let related = self.is_related_to(property_type, value_type);
            if related == Ternary::False {
                return Ternary::False;
            }
            result = result.and(related);
        }
        result
    }

    // =========================================================================
    // Freshness and weak types
    // =========================================================================

    /// A fresh object literal may only name properties the target knows.
    pub(super) fn has_excess_properties(&mut self, source: TypeId, target: TypeId) -> bool {
        if !self.state.type_flags(target).intersects(TypeFlags::STRUCTURED_TYPE)
            || self.state.object_flags(target).contains(ObjectFlags::OBJECT_LITERAL_PATTERN_WITH_COMPUTED_PROPERTIES)
        {
            return false;
        }
        for property in self.state.get_properties_of_type(source) {
            let name = self.state.symbol_name(property);
            if !self.is_known_property(target, &name) {
                return true;
            }
        }
        false
    }

    fn is_known_property(&mut self, target: TypeId, name: &str) -> bool {
        let flags = self.state.type_flags(target);
        if flags.intersects(TypeFlags::UNION_OR_INTERSECTION) {
            let types = self.state.ty(target).constituents().to_vec();
            return types.into_iter().any(|t| self.is_known_property(t, name));
        }
        if !flags.contains(TypeFlags::OBJECT) {
            return true;
        }
        if self.state.is_empty_object_type(target) || self.state.is_generic_mapped_type(target) {
            return true;
        }
        if self.state.get_property_of_type(target, name).is_some() {
            return true;
        }
        self.state.get_applicable_index_info_for_name(target, name).is_some()
    }

    /// Assigning to a type whose properties are all optional requires at
    /// least one property in common.
    pub(super) fn is_performing_common_property_check(&mut self, source: TypeId, target: TypeId) -> bool {
        if !matches!(self.relation, RelationKind::Assignable | RelationKind::Subtype | RelationKind::StrictSubtype) {
            return false;
        }
        if !self
            .state
            .type_flags(source)
            .intersects(TypeFlags::PRIMITIVE | TypeFlags::OBJECT | TypeFlags::INTERSECTION)
            || self.state.get_global_type("Object") == Some(source)
        {
            return false;
        }
        if !self.state.type_flags(target).intersects(TypeFlags::OBJECT | TypeFlags::INTERSECTION)
            || !self.is_weak_type(target)
        {
            return false;
        }
        !self.state.get_properties_of_type(source).is_empty()
            || !self.state.get_signatures_of_type(source, SignatureKind::Call).is_empty()
            || !self.state.get_signatures_of_type(source, SignatureKind::Construct).is_empty()
    }

    fn is_weak_type(&mut self, t: TypeId) -> bool {
        let flags = self.state.type_flags(t);
        if flags.contains(TypeFlags::INTERSECTION) {
            let types = self.state.ty(t).constituents().to_vec();
            return types.into_iter().all(|c| self.is_weak_type(c));
        }
        if !flags.contains(TypeFlags::OBJECT) || self.state.is_generic_mapped_type(t) {
            return false;
        }
        let members = self.state.resolve_structured_type_members(t);
        !members.properties.is_empty()
            && members.call_signatures.is_empty()
            && members.construct_signatures.is_empty()
            && members.index_infos.is_empty()
            && members
                .properties
                .iter()
                .all(|&p| self.state.symbol_flags_raw(p) & symbol_flags::OPTIONAL != 0)
    }

    pub(super) fn has_common_properties(&mut self, source: TypeId, target: TypeId) -> bool {
        for property in self.state.get_properties_of_type(source) {
            let name = self.state.symbol_name(property);
            if self.is_known_property(target, &name) {
                return true;
            }
        }
        false
    }
}
