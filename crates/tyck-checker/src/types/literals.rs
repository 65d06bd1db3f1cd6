//! Literal types: base primitives, widening, property-name keys and
//! template literal matching.

use std::rc::Rc;

use tyck_binder::{SymbolId, format_number, symbol_flags};
use tyck_types::{LiteralValue, ObjectFlags, StructuredMembers, TypeData, TypeFlags, TypeId};

use crate::state::CheckerState;
use crate::symbols::links::CheckFlags;

impl<'a> CheckerState<'a> {
    pub(crate) fn string_literal_value(&self, t: TypeId) -> Option<String> {
        match &self.ty(t).as_literal()?.value {
            LiteralValue::String(s) if self.type_flags(t).contains(TypeFlags::STRING_LITERAL) => Some(s.clone()),
            _ => None,
        }
    }

    pub(crate) fn number_literal_value(&self, t: TypeId) -> Option<f64> {
        match self.ty(t).as_literal()?.value {
            LiteralValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub(crate) fn is_literal_type(&self, t: TypeId) -> bool {
        let flags = self.type_flags(t);
        if flags.contains(TypeFlags::BOOLEAN) {
            return true;
        }
        if flags.contains(TypeFlags::UNION) {
            return flags.contains(TypeFlags::ENUM_LITERAL)
                || self.ty(t).constituents().iter().all(|&c| self.is_unit_type(c));
        }
        self.is_unit_type(t)
    }

    pub(crate) fn is_unit_type(&self, t: TypeId) -> bool {
        self.type_flags(t).intersects(TypeFlags::UNIT)
    }

    /// Primitive a literal widens to; other types are returned unchanged.
    pub(crate) fn get_base_type_of_literal_type(&mut self, t: TypeId) -> TypeId {
        let flags = self.type_flags(t);
        if flags.contains(TypeFlags::ENUM_LITERAL) && !flags.contains(TypeFlags::UNION) {
            let member = self.ty(t).symbol;
            let parent = self.symbol(member).parent;
            if parent.is_some() {
                return self.get_declared_type_of_symbol(parent);
            }
        }
        if flags.intersects(TypeFlags::STRING_LITERAL | TypeFlags::TEMPLATE_LITERAL | TypeFlags::STRING_MAPPING) {
            return TypeId::STRING;
        }
        if flags.contains(TypeFlags::NUMBER_LITERAL) {
            return TypeId::NUMBER;
        }
        if flags.contains(TypeFlags::BIG_INT_LITERAL) {
            return TypeId::BIGINT;
        }
        if flags.contains(TypeFlags::BOOLEAN_LITERAL) {
            return TypeId::BOOLEAN;
        }
        if flags.contains(TypeFlags::UNION) {
            return self.map_type(t, |s, c| Some(s.get_base_type_of_literal_type(c)));
        }
        t
    }

    /// Widen fresh literals to their base primitive.
    pub(crate) fn get_widened_literal_type(&mut self, t: TypeId) -> TypeId {
        let flags = self.type_flags(t);
        if flags.contains(TypeFlags::ENUM_LITERAL) && self.ctx.types.is_fresh_literal(t) {
            return self.get_base_type_of_literal_type(t);
        }
        if flags.contains(TypeFlags::STRING_LITERAL) && self.ctx.types.is_fresh_literal(t) {
            return TypeId::STRING;
        }
        if flags.contains(TypeFlags::NUMBER_LITERAL) && self.ctx.types.is_fresh_literal(t) {
            return TypeId::NUMBER;
        }
        if flags.contains(TypeFlags::BIG_INT_LITERAL) && self.ctx.types.is_fresh_literal(t) {
            return TypeId::BIGINT;
        }
        if flags.contains(TypeFlags::BOOLEAN_LITERAL) && self.ctx.types.is_fresh_literal(t) {
            return TypeId::BOOLEAN;
        }
        if flags.contains(TypeFlags::UNION) {
            return self.map_type(t, |s, c| Some(s.get_widened_literal_type(c)));
        }
        t
    }

    /// Widen literals unconditionally, as for an inferred candidate.
    pub(crate) fn get_widened_literal_like_type(&mut self, t: TypeId) -> TypeId {
        if self.is_literal_type(t) && !self.type_flags(t).contains(TypeFlags::ENUM_LITERAL) {
            return self.get_base_type_of_literal_type(t);
        }
        t
    }

    /// Widening for declarations: fresh literals widen, `null` and
    /// `undefined` widen to `any` without strict null checks, and object
    /// literal properties widen recursively.
    pub(crate) fn get_widened_type(&mut self, t: TypeId) -> TypeId {
        let t = self.get_widened_literal_type(t);
        if !self
            .object_flags(t)
            .intersects(ObjectFlags::REQUIRES_WIDENING)
            && !self.type_flags(t).intersects(TypeFlags::NULLABLE)
        {
            return t;
        }
        if !self.ctx.strict_null_checks() && self.type_flags(t).intersects(TypeFlags::NULLABLE) {
            return TypeId::ANY;
        }
        if t == TypeId::UNDEFINED_WIDENING {
            return TypeId::UNDEFINED;
        }
        if t == TypeId::NULL_WIDENING {
            return TypeId::NULL;
        }
        if self.object_flags(t).contains(ObjectFlags::OBJECT_LITERAL) {
            return self.get_widened_object_literal_type(t);
        }
        if self.type_flags(t).contains(TypeFlags::UNION) {
            return self.map_type(t, |s, c| Some(s.get_widened_type(c)));
        }
        if self.is_array_type(t) {
            let args = self.get_type_arguments(t);
            let widened: Vec<TypeId> = args.iter().map(|&a| self.get_widened_type(a)).collect();
            if widened != args {
                let readonly = self.is_readonly_array_type(t);
                return self.create_array_type(widened[0], readonly);
            }
        }
        t
    }

    fn get_widened_object_literal_type(&mut self, t: TypeId) -> TypeId {
        let members = self.resolve_structured_type_members(t);
        let mut widened = StructuredMembers::default();
        let mut changed = false;
        for &property in &members.properties {
            let original = self.get_type_of_symbol(property);
            let widened_type = self.get_widened_type(original);
            let name = self.symbol_name(property);
            let target = if widened_type == original {
                property
            } else {
                changed = true;
                let flags = self.symbol_flags_raw(property);
                let check_flags = self.check_flags(property);
                let clone = self.create_symbol(flags, &name, check_flags);
                let (declarations, value_declaration) = {
                    let source = self.symbol(property);
                    (source.declarations.clone(), source.value_declaration)
                };
                if let Some(symbol) = self.transient_symbol_mut(clone) {
                    symbol.declarations = declarations;
                    symbol.value_declaration = value_declaration;
                }
                self.links(clone).type_ = Some(widened_type);
                clone
            };
            widened.members.insert(name, target);
            widened.properties.push(target);
        }
        if !changed {
            return t;
        }
        widened.index_infos = members.index_infos.clone();
        let symbol = self.ty(t).symbol;
        let flags = self.object_flags(t) & !(ObjectFlags::FRESH_LITERAL | ObjectFlags::REQUIRES_WIDENING);
        self.ctx
            .types
            .create_anonymous_type(symbol, Some(Rc::new(widened)), flags & ObjectFlags::OBJECT_LITERAL)
    }

    pub(crate) fn get_regular_type_of_literal_type(&self, t: TypeId) -> TypeId {
        self.ctx.types.regular_type_of(t)
    }

    pub(crate) fn get_fresh_type_of_literal_type(&mut self, t: TypeId) -> TypeId {
        if self.type_flags(t).intersects(TypeFlags::FRESHABLE) {
            self.ctx.types.fresh_type_of(t)
        } else {
            t
        }
    }

    // =========================================================================
    // Property names
    // =========================================================================

    /// String, number and unique symbol literals can name properties.
    pub(crate) fn is_type_usable_as_property_name(&self, t: TypeId) -> bool {
        self.type_flags(t)
            .intersects(TypeFlags::STRING_OR_NUMBER_LITERAL_OR_UNIQUE)
    }

    /// Property name spelled by a literal type.
    pub(crate) fn get_property_name_from_type(&self, t: TypeId) -> Option<String> {
        let ty = self.ty(t);
        if self.type_flags(t).contains(TypeFlags::UNIQUE_ES_SYMBOL) {
            if let TypeData::UniqueSymbol(unique) = &ty.data {
                return Some(unique.escaped_name.clone());
            }
            return None;
        }
        match &ty.as_literal()?.value {
            LiteralValue::String(s) => Some(s.clone()),
            LiteralValue::Number(n) => Some(format_number(*n)),
            _ => None,
        }
    }

    /// Literal type of a property name as seen by `keyof`.
    pub(crate) fn get_literal_type_from_property(&mut self, property: SymbolId, include: TypeFlags) -> TypeId {
        let name = self.symbol_name(property);
        if self.symbol_flags_raw(property) & symbol_flags::PROPERTY != 0
            && self.check_flags(property).contains(CheckFlags::MAPPED)
            && let Some(key) = self.links_ref(property).and_then(|l| l.name_type.or(l.key_type))
        {
            return if self.type_flags(key).intersects(include) { key } else { TypeId::NEVER };
        }
        if tyck_binder::internal_names::is_reserved_member_name(&name) {
            return TypeId::NEVER;
        }
        let is_numeric = name.parse::<f64>().is_ok_and(|n| format_number(n) == name);
        let t = if is_numeric && include.contains(TypeFlags::NUMBER_LITERAL) && !include.contains(TypeFlags::STRING_LITERAL)
        {
            let value = name.parse::<f64>().unwrap_or_default();
            self.ctx.types.number_literal(value)
        } else {
            self.ctx.types.string_literal(&name)
        };
        if self.type_flags(t).intersects(include) { t } else { TypeId::NEVER }
    }

    // =========================================================================
    // Template literals
    // =========================================================================

    /// Whether the string `value` is one of the strings a template literal
    /// type denotes.
    pub(crate) fn is_string_matched_by_template_literal(&self, value: &str, template: TypeId) -> bool {
        let TypeData::TemplateLiteral(data) = &self.ty(template).data else {
            return false;
        };
        self.match_template_parts(value, &data.texts, &data.types)
    }

    fn match_template_parts(&self, value: &str, texts: &[String], types: &[TypeId]) -> bool {
        let Some(rest) = value.strip_prefix(texts[0].as_str()) else {
            return false;
        };
        if types.is_empty() {
            return rest.is_empty();
        }
        let next_text = &texts[1];
        let hole = types[0];
        // Try every split point for the hole, shortest first.
        let mut boundaries: Vec<usize> = rest.char_indices().map(|(i, _)| i).collect();
        boundaries.push(rest.len());
        for end in boundaries {
            let (segment, tail) = rest.split_at(end);
            if !tail.starts_with(next_text.as_str()) || !self.is_valid_template_hole(segment, hole) {
                continue;
            }
            let mut remaining_texts = texts[1..].to_vec();
            remaining_texts[0] = String::new();
            if self.match_template_parts(&tail[next_text.len()..], &remaining_texts, &types[1..]) {
                return true;
            }
        }
        false
    }

    fn is_valid_template_hole(&self, segment: &str, hole: TypeId) -> bool {
        let flags = self.type_flags(hole);
        if flags.intersects(TypeFlags::ANY | TypeFlags::STRING) {
            return true;
        }
        if flags.contains(TypeFlags::NUMBER) {
            return !segment.trim().is_empty() && segment.parse::<f64>().is_ok();
        }
        if flags.contains(TypeFlags::BIG_INT) {
            return !segment.is_empty() && segment.trim_start_matches('-').chars().all(|c| c.is_ascii_digit());
        }
        if flags.contains(TypeFlags::UNION) {
            return self
                .ty(hole)
                .constituents()
                .iter()
                .any(|&c| self.is_valid_template_hole(segment, c));
        }
        if let Some(literal) = self.ty(hole).as_literal() {
            return match &literal.value {
                LiteralValue::String(s) => s == segment,
                LiteralValue::Number(n) => format_number(*n) == segment,
                LiteralValue::Boolean(b) => segment == if *b { "true" } else { "false" },
                LiteralValue::BigInt(b) => b.to_string().trim_end_matches('n') == segment,
            };
        }
        if flags.contains(TypeFlags::TEMPLATE_LITERAL) {
            return self.is_string_matched_by_template_literal(segment, hole);
        }
        false
    }

    /// Text of a literal used inside a template literal type.
    pub(crate) fn template_text_of_literal(&self, t: TypeId) -> Option<String> {
        let literal = self.ty(t).as_literal()?;
        Some(match &literal.value {
            LiteralValue::String(s) => s.clone(),
            LiteralValue::Number(n) => format_number(*n),
            LiteralValue::Boolean(b) => b.to_string(),
            LiteralValue::BigInt(b) => b.to_string().trim_end_matches('n').to_string(),
        })
    }
}
