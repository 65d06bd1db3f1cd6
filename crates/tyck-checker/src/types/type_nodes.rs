//! Lowering of type nodes to types.

use tracing::trace;
use tyck_binder::{KeywordTypeKind, NodeIndex, NodeKind, SymbolId, TypeOperatorKind, symbol_flags};
use tyck_common::diagnostics::diagnostic_codes;
use tyck_types::{
    AccessFlags, AnonymousType, ElementFlags, IndexFlags, ObjectFlags, ObjectKind, ObjectType, PseudoBigInt,
    TypeAlias, TypeData, TypeFlags, TypeId, TypeMapper, get_type_list_id,
};

use crate::state::CheckerState;

impl<'a> CheckerState<'a> {
    /// Type denoted by a type node. Cached per node.
    pub fn get_type_from_type_node(&mut self, node: NodeIndex) -> TypeId {
        if node.is_none() {
            return TypeId::ERROR;
        }
        if let Some(resolved) = self.node_links_ref(node).and_then(|l| l.resolved_type) {
            return resolved;
        }
        let t = stacker::maybe_grow(64 * 1024, 1024 * 1024, || self.get_type_from_type_node_worker(node));
        trace!(node = node.0, t = t.0, "type node lowered");
        *self.node_links(node).resolved_type.get_or_insert(t)
    }

    fn get_type_from_type_node_worker(&mut self, node: NodeIndex) -> TypeId {
        let arena = self.ctx.arena;
        let Some(kind) = arena.kind(node) else {
            return TypeId::ERROR;
        };
        match kind {
            NodeKind::KeywordType(keyword) => self.get_type_from_keyword(node, *keyword),
            NodeKind::LiteralType(literal) => self.get_type_from_literal_node(literal.literal),
            NodeKind::TypeReference(reference) => {
                self.get_type_from_type_reference(node, reference.type_name)
            }
            NodeKind::ExpressionWithTypeArguments(heritage) => {
                self.get_type_from_type_reference(node, heritage.expression)
            }
            NodeKind::ArrayType(_) | NodeKind::TupleType(_) => self.get_type_from_array_or_tuple_node(node),
            NodeKind::UnionType(union) => {
                let types: Vec<TypeId> = union.types.iter().map(|&t| self.get_type_from_type_node(t)).collect();
                let alias = self.get_alias_for_type_node(node);
                self.get_union_type_ex(&types, tyck_types::UnionReduction::Literal, alias, None)
            }
            NodeKind::IntersectionType(intersection) => {
                let types: Vec<TypeId> = intersection
                    .types
                    .iter()
                    .map(|&t| self.get_type_from_type_node(t))
                    .collect();
                let alias = self.get_alias_for_type_node(node);
                self.get_intersection_type_ex(&types, alias)
            }
            NodeKind::TypeLiteral(_) | NodeKind::FunctionType(_) | NodeKind::ConstructorType(_) => {
                self.get_type_from_type_literal_or_function_node(node)
            }
            NodeKind::MappedType(_) => self.get_type_from_mapped_type_node(node),
            NodeKind::TypeOperator(operator) => match operator.operator {
                TypeOperatorKind::Keyof => {
                    let operand = self.get_type_from_type_node(operator.type_node);
                    self.get_index_type(operand, IndexFlags::empty())
                }
                // Array and tuple operands read the operator themselves.
                TypeOperatorKind::Readonly => self.get_type_from_type_node(operator.type_node),
            },
            NodeKind::IndexedAccessType(access) => {
                let object = self.get_type_from_type_node(access.object_type);
                let index = self.get_type_from_type_node(access.index_type);
                let alias = self.get_alias_for_type_node(node);
                self.get_indexed_access_type(object, index, AccessFlags::empty(), node, alias)
            }
            NodeKind::ParenthesizedType(wrapped) | NodeKind::OptionalType(wrapped) | NodeKind::RestType(wrapped) => {
                self.get_type_from_type_node(wrapped.type_node)
            }
            NodeKind::NamedTupleMember(member) => self.get_type_from_type_node(member.type_node),
            NodeKind::TypeQuery(query) => {
                let t = self.get_type_of_entity_name_expression(query.expr_name);
                let widened = self.get_widened_type(t);
                self.get_regular_type_of_literal_type(widened)
            }
            NodeKind::ThisType => self.get_this_type_of_node(node),
            NodeKind::TemplateLiteralType(template) => {
                let mut texts = vec![template.head.clone()];
                let mut types = Vec::with_capacity(template.spans.len());
                for (type_node, text) in &template.spans {
                    types.push(self.get_type_from_type_node(*type_node));
                    texts.push(text.clone());
                }
                self.get_template_literal_type(&texts, &types)
            }
            _ => TypeId::ERROR,
        }
    }

    fn get_type_from_keyword(&mut self, node: NodeIndex, keyword: KeywordTypeKind) -> TypeId {
        match keyword {
            KeywordTypeKind::Any => TypeId::ANY,
            KeywordTypeKind::Unknown => TypeId::UNKNOWN,
            KeywordTypeKind::String => TypeId::STRING,
            KeywordTypeKind::Number => TypeId::NUMBER,
            KeywordTypeKind::Boolean => TypeId::BOOLEAN,
            KeywordTypeKind::BigInt => TypeId::BIGINT,
            KeywordTypeKind::Symbol => TypeId::SYMBOL,
            KeywordTypeKind::Void => TypeId::VOID,
            KeywordTypeKind::Undefined => TypeId::UNDEFINED,
            KeywordTypeKind::Null => TypeId::NULL,
            KeywordTypeKind::Never => TypeId::NEVER,
            KeywordTypeKind::Object => TypeId::NON_PRIMITIVE,
            KeywordTypeKind::UniqueSymbol => {
                // `unique symbol` is only meaningful on a const or readonly
                // declaration; elsewhere it is plain `symbol`.
                let host = self.ctx.arena.parent(node);
                match self.get_symbol_of_node(host) {
                    Some(symbol) => {
                        let name = self.symbol_name(symbol);
                        self.ctx.types.unique_symbol(symbol, &name)
                    }
                    None => TypeId::SYMBOL,
                }
            }
        }
    }

    /// Regular literal type of a literal node in a type position.
    fn get_type_from_literal_node(&mut self, literal: NodeIndex) -> TypeId {
        match self.ctx.arena.kind(literal) {
            Some(NodeKind::StringLiteral(data)) => {
                let text = data.text.clone();
                let fresh = self.ctx.types.string_literal(&text);
                self.get_regular_type_of_literal_type(fresh)
            }
            Some(NodeKind::NumericLiteral(data)) => {
                let fresh = self.ctx.types.number_literal(data.value);
                self.get_regular_type_of_literal_type(fresh)
            }
            Some(NodeKind::BigIntLiteral(data)) => {
                let value = parse_pseudo_big_int(&data.text);
                let fresh = self.ctx.types.bigint_literal(value);
                self.get_regular_type_of_literal_type(fresh)
            }
            Some(NodeKind::TrueKeyword) => TypeId::REGULAR_TRUE,
            Some(NodeKind::FalseKeyword) => TypeId::REGULAR_FALSE,
            Some(NodeKind::NullKeyword) => TypeId::NULL,
            _ => TypeId::ERROR,
        }
    }

    // =========================================================================
    // Type references
    // =========================================================================

    fn get_type_from_type_reference(&mut self, node: NodeIndex, name: NodeIndex) -> TypeId {
        let Some(symbol) = self.resolve_entity_name(name, symbol_flags::TYPE, false, false) else {
            return TypeId::ERROR;
        };
        if symbol == self.ctx.unknown_symbol {
            return TypeId::ERROR;
        }
        let symbol = self.get_merged_symbol(symbol);
        self.node_links(node).resolved_symbol = Some(symbol);
        self.get_type_reference_type(node, symbol)
    }

    fn get_type_reference_type(&mut self, node: NodeIndex, symbol: SymbolId) -> TypeId {
        let flags = self.symbol_flags_raw(symbol);
        if flags & (symbol_flags::CLASS | symbol_flags::INTERFACE) != 0 {
            return self.get_type_from_class_or_interface_reference(node, symbol);
        }
        if flags & symbol_flags::TYPE_ALIAS != 0 {
            return self.get_type_from_type_alias_reference(node, symbol);
        }
        if flags & (symbol_flags::TYPE_PARAMETER | symbol_flags::ENUM | symbol_flags::ENUM_MEMBER) != 0 {
            if !self.check_no_type_arguments(node, symbol) {
                return TypeId::ERROR;
            }
            return self.get_declared_type_of_symbol(symbol);
        }
        TypeId::ERROR
    }

    fn type_argument_nodes(&self, node: NodeIndex) -> Vec<NodeIndex> {
        match self.ctx.arena.kind(node) {
            Some(NodeKind::TypeReference(reference)) => reference.type_arguments.clone(),
            Some(NodeKind::ExpressionWithTypeArguments(heritage)) => heritage.type_arguments.clone(),
            Some(NodeKind::TypeQuery(query)) => query.type_arguments.clone(),
            _ => Vec::new(),
        }
    }

    /// 2315 when type arguments are written on a non-generic reference.
    fn check_no_type_arguments(&mut self, node: NodeIndex, symbol: SymbolId) -> bool {
        if self.type_argument_nodes(node).is_empty() {
            return true;
        }
        let name = self.symbol_to_string(symbol);
        self.error(node, diagnostic_codes::TYPE_IS_NOT_GENERIC, &[&name]);
        false
    }

    /// 2314 or 2707 when the written type argument count is out of range.
    fn check_type_argument_arity(
        &mut self,
        node: NodeIndex,
        symbol: SymbolId,
        count: usize,
        min: usize,
        max: usize,
    ) -> bool {
        if count >= min && count <= max {
            return true;
        }
        let name = self.symbol_to_string(symbol);
        if min == max {
            let expected = max.to_string();
            self.error(node, diagnostic_codes::GENERIC_TYPE_REQUIRES_TYPE_ARGUMENTS, &[&name, &expected]);
        } else {
            let (low, high) = (min.to_string(), max.to_string());
            self.error(
                node,
                diagnostic_codes::GENERIC_TYPE_REQUIRES_BETWEEN_TYPE_ARGUMENTS,
                &[&name, &low, &high],
            );
        }
        false
    }

    /// Reference to a class or interface. Generic targets get their outer
    /// type parameters followed by the written arguments padded with
    /// defaults.
    pub(crate) fn get_type_from_class_or_interface_reference(&mut self, node: NodeIndex, symbol: SymbolId) -> TypeId {
        let symbol = self.get_merged_symbol(symbol);
        let declared = self.get_declared_type_of_symbol(symbol);
        let Some(iface) = self.ty(declared).as_interface() else {
            return declared;
        };
        let local = iface.local_type_parameters.clone();
        let outer = iface.outer_type_parameters.clone();
        if local.is_empty() {
            return if self.check_no_type_arguments(node, symbol) {
                declared
            } else {
                TypeId::ERROR
            };
        }
        let argument_nodes = self.type_argument_nodes(node);
        let min = self.get_min_type_argument_count(&local);
        if !self.check_type_argument_arity(node, symbol, argument_nodes.len(), min, local.len()) {
            return TypeId::ERROR;
        }
        let written: Vec<TypeId> = argument_nodes
            .iter()
            .map(|&argument| self.get_type_from_type_node(argument))
            .collect();
        let mut arguments = outer;
        arguments.extend(self.fill_missing_type_arguments(&written, &local, min));
        self.ctx.types.create_type_reference(declared, arguments)
    }

    fn get_type_from_type_alias_reference(&mut self, node: NodeIndex, symbol: SymbolId) -> TypeId {
        let declared = self.get_declared_type_of_symbol(symbol);
        if declared.is_error() {
            return TypeId::ERROR;
        }
        let local = self.get_local_type_parameters_of_alias(symbol);
        if local.is_empty() {
            return if self.check_no_type_arguments(node, symbol) {
                declared
            } else {
                TypeId::ERROR
            };
        }
        let argument_nodes = self.type_argument_nodes(node);
        let min = self.get_min_type_argument_count(&local);
        if !self.check_type_argument_arity(node, symbol, argument_nodes.len(), min, local.len()) {
            return TypeId::ERROR;
        }
        let written: Vec<TypeId> = argument_nodes
            .iter()
            .map(|&argument| self.get_type_from_type_node(argument))
            .collect();
        let declaration = self.symbol(symbol).first_declaration();
        let mut arguments = self.get_outer_type_parameters(declaration).to_vec();
        arguments.extend(self.fill_missing_type_arguments(&written, &local, min));
        self.get_type_alias_instantiation(symbol, arguments)
    }

    /// Instantiation of a generic type alias, cached per argument list and
    /// carrying the alias and its arguments.
    pub(crate) fn get_type_alias_instantiation(&mut self, symbol: SymbolId, arguments: Vec<TypeId>) -> TypeId {
        let declared = self.get_declared_type_of_symbol(symbol);
        if declared.is_error() {
            return TypeId::ERROR;
        }
        let key = get_type_list_id(&arguments);
        if let Some(cached) = self
            .links_ref(symbol)
            .and_then(|l| l.instantiations.as_ref())
            .and_then(|m| m.get(&key).copied())
        {
            return cached;
        }
        let parameters = self.get_type_alias_type_parameters(symbol);
        let mapper = TypeMapper::from_lists(parameters, Some(arguments.clone()));
        let alias = TypeAlias {
            symbol,
            type_arguments: arguments,
        };
        let result = self.instantiate_type_with_alias(declared, &mapper, Some(alias));
        self.links(symbol)
            .instantiations
            .get_or_insert_with(Default::default)
            .insert(key, result);
        result
    }

    // =========================================================================
    // Arrays and tuples
    // =========================================================================

    fn get_type_from_array_or_tuple_node(&mut self, node: NodeIndex) -> TypeId {
        let arena = self.ctx.arena;
        let readonly = matches!(
            arena.kind(arena.parent(node)),
            Some(NodeKind::TypeOperator(operator)) if operator.operator == TypeOperatorKind::Readonly
        );
        let (element_flags, labels) = match arena.kind(node) {
            Some(NodeKind::ArrayType(_)) => (vec![ElementFlags::REST], Vec::new()),
            Some(NodeKind::TupleType(tuple)) => {
                let flags: Vec<ElementFlags> = tuple.elements.iter().map(|&e| self.tuple_element_flags(e)).collect();
                let labeled = !tuple.elements.is_empty()
                    && tuple
                        .elements
                        .iter()
                        .all(|&e| matches!(arena.kind(e), Some(NodeKind::NamedTupleMember(_))));
                let labels = if labeled { tuple.elements.clone() } else { Vec::new() };
                (flags, labels)
            }
            _ => return TypeId::ERROR,
        };
        let target = self.get_tuple_target_type(&element_flags, readonly, &labels);
        if self.is_deferred_type_reference_node(node) {
            let alias = self.get_alias_for_type_node(node);
            // Store the deferred reference before its arguments are asked for
            // so that recursive references see it.
            let deferred = self.ctx.types.create_deferred_type_reference(target, node, None, alias);
            self.node_links(node).resolved_type = Some(deferred);
            return deferred;
        }
        match arena.kind(node) {
            Some(NodeKind::ArrayType(array)) => {
                let element = self.get_type_from_type_node(array.element_type);
                self.create_array_type(element, readonly)
            }
            Some(NodeKind::TupleType(tuple)) => {
                let elements = tuple.elements.clone();
                let types: Vec<TypeId> = elements
                    .iter()
                    .map(|&element| self.get_type_from_tuple_element_node(element))
                    .collect();
                if self.ty(target).tuple_info().is_some() {
                    self.create_normalized_tuple_type(target, &types)
                } else {
                    self.ctx.types.create_type_reference(target, types)
                }
            }
            _ => TypeId::ERROR,
        }
    }

    fn tuple_element_flags(&self, element: NodeIndex) -> ElementFlags {
        let arena = self.ctx.arena;
        match arena.kind(element) {
            Some(NodeKind::OptionalType(_)) => ElementFlags::OPTIONAL,
            Some(NodeKind::RestType(rest)) => rest_element_flags(arena, rest.type_node),
            Some(NodeKind::NamedTupleMember(member)) if member.dot_dot_dot => {
                rest_element_flags(arena, member.type_node)
            }
            Some(NodeKind::NamedTupleMember(member)) if member.question_token => ElementFlags::OPTIONAL,
            _ => ElementFlags::REQUIRED,
        }
    }

    /// Type of one element of a tuple node: the element type for rest
    /// elements over arrays, with `undefined` added for optional ones.
    pub(crate) fn get_type_from_tuple_element_node(&mut self, element: NodeIndex) -> TypeId {
        let arena = self.ctx.arena;
        match arena.kind(element) {
            Some(NodeKind::RestType(rest)) => self.get_type_from_rest_type_node(rest.type_node),
            Some(NodeKind::NamedTupleMember(member)) => {
                if member.dot_dot_dot {
                    return self.get_type_from_rest_type_node(member.type_node);
                }
                let t = self.get_type_from_type_node(member.type_node);
                if member.question_token {
                    self.get_optional_type(t, true)
                } else {
                    t
                }
            }
            Some(NodeKind::OptionalType(optional)) => {
                let t = self.get_type_from_type_node(optional.type_node);
                self.get_optional_type(t, true)
            }
            _ => self.get_type_from_type_node(element),
        }
    }

    fn get_type_from_rest_type_node(&mut self, type_node: NodeIndex) -> TypeId {
        let arena = self.ctx.arena;
        match arena.kind(skip_parenthesized_types(arena, type_node)) {
            Some(NodeKind::ArrayType(array)) => self.get_type_from_type_node(array.element_type),
            _ => self.get_type_from_type_node(type_node),
        }
    }

    /// Array and tuple nodes inside a type alias body that may mention a
    /// type alias resolve their element types lazily, which is what lets
    /// `type Json = string | Json[]` terminate.
    fn is_deferred_type_reference_node(&mut self, node: NodeIndex) -> bool {
        if !self.is_resolved_by_type_alias(node) {
            return false;
        }
        let arena = self.ctx.arena;
        match arena.kind(node) {
            Some(NodeKind::ArrayType(array)) => self.may_resolve_type_alias(array.element_type),
            Some(NodeKind::TupleType(tuple)) => {
                let elements = tuple.elements.clone();
                elements.into_iter().any(|e| self.may_resolve_type_alias(e))
            }
            _ => false,
        }
    }

    fn is_resolved_by_type_alias(&self, node: NodeIndex) -> bool {
        let arena = self.ctx.arena;
        let mut current = arena.parent(node);
        loop {
            match arena.kind(current) {
                Some(
                    NodeKind::ParenthesizedType(_)
                    | NodeKind::NamedTupleMember(_)
                    | NodeKind::TypeReference(_)
                    | NodeKind::UnionType(_)
                    | NodeKind::IntersectionType(_)
                    | NodeKind::IndexedAccessType(_)
                    | NodeKind::ArrayType(_)
                    | NodeKind::TupleType(_)
                    | NodeKind::OptionalType(_)
                    | NodeKind::RestType(_),
                ) => current = arena.parent(current),
                Some(NodeKind::TypeOperator(operator)) if operator.operator == TypeOperatorKind::Readonly => {
                    current = arena.parent(current);
                }
                Some(NodeKind::TypeAliasDeclaration(_)) => return true,
                _ => return false,
            }
        }
    }

    fn may_resolve_type_alias(&mut self, node: NodeIndex) -> bool {
        let arena = self.ctx.arena;
        match arena.kind(node) {
            Some(NodeKind::TypeReference(reference)) => {
                let name = reference.type_name;
                self.resolve_entity_name(name, symbol_flags::TYPE, true, false)
                    .is_some_and(|s| self.symbol_flags_raw(s) & symbol_flags::TYPE_ALIAS != 0)
            }
            Some(NodeKind::TypeQuery(_)) => true,
            Some(NodeKind::TypeOperator(operator)) => self.may_resolve_type_alias(operator.type_node),
            Some(NodeKind::ParenthesizedType(w) | NodeKind::OptionalType(w) | NodeKind::RestType(w)) => {
                self.may_resolve_type_alias(w.type_node)
            }
            Some(NodeKind::NamedTupleMember(member)) => self.may_resolve_type_alias(member.type_node),
            Some(NodeKind::ArrayType(array)) => self.may_resolve_type_alias(array.element_type),
            Some(NodeKind::TupleType(tuple)) => {
                let elements = tuple.elements.clone();
                elements.into_iter().any(|e| self.may_resolve_type_alias(e))
            }
            Some(NodeKind::UnionType(composite) | NodeKind::IntersectionType(composite)) => {
                let types = composite.types.clone();
                types.into_iter().any(|t| self.may_resolve_type_alias(t))
            }
            Some(NodeKind::IndexedAccessType(access)) => {
                let (object, index) = (access.object_type, access.index_type);
                self.may_resolve_type_alias(object) || self.may_resolve_type_alias(index)
            }
            _ => false,
        }
    }

    // =========================================================================
    // Other type nodes
    // =========================================================================

    fn get_type_from_type_literal_or_function_node(&mut self, node: NodeIndex) -> TypeId {
        let alias = self.get_alias_for_type_node(node);
        let is_empty_literal = matches!(self.ctx.arena.kind(node), Some(NodeKind::TypeLiteral(l)) if l.members.is_empty());
        if is_empty_literal && alias.is_none() {
            return TypeId::EMPTY_TYPE_LITERAL;
        }
        let symbol = self.get_symbol_of_node(node).unwrap_or(SymbolId::NONE);
        self.ctx.types.alloc_with_alias(
            TypeFlags::OBJECT,
            ObjectFlags::ANONYMOUS,
            symbol,
            alias,
            TypeData::Object(ObjectType {
                kind: ObjectKind::Anonymous(AnonymousType::default()),
                members: None,
            }),
        )
    }

    /// `this` inside a class or interface body.
    fn get_this_type_of_node(&mut self, node: NodeIndex) -> TypeId {
        let arena = self.ctx.arena;
        let mut current = arena.parent(node);
        while current.is_some() {
            if matches!(
                arena.kind(current),
                Some(NodeKind::ClassDeclaration(_) | NodeKind::InterfaceDeclaration(_))
            ) {
                let Some(symbol) = self.get_symbol_of_node(current) else {
                    break;
                };
                let declared = self.get_declared_type_of_symbol(symbol);
                return self.get_this_type_of_target(declared).unwrap_or(TypeId::ERROR);
            }
            current = arena.parent(current);
        }
        TypeId::ERROR
    }

    /// Value type of the entity name in `typeof a.b.c`. Qualified names
    /// that do not name a namespace member fall back to property lookup on
    /// the left side.
    pub(crate) fn get_type_of_entity_name_expression(&mut self, name: NodeIndex) -> TypeId {
        let arena = self.ctx.arena;
        match arena.kind(name) {
            Some(NodeKind::Identifier(_)) => {
                match self.resolve_entity_name(name, symbol_flags::VALUE, false, false) {
                    Some(symbol) => {
                        self.node_links(name).resolved_symbol = Some(symbol);
                        self.get_type_of_symbol(symbol)
                    }
                    None => TypeId::ERROR,
                }
            }
            Some(NodeKind::QualifiedName(qualified)) => {
                let (left, right) = (qualified.left, qualified.right);
                if let Some(symbol) = self.resolve_entity_name(name, symbol_flags::VALUE, true, false) {
                    self.node_links(name).resolved_symbol = Some(symbol);
                    return self.get_type_of_symbol(symbol);
                }
                let left_type = self.get_type_of_entity_name_expression(left);
                if left_type.is_error() || left_type.is_any() {
                    return left_type;
                }
                let text = arena.identifier_text(right).unwrap_or_default().to_string();
                let apparent = self.get_apparent_type(left_type);
                match self.get_property_of_type(apparent, &text) {
                    Some(property) => self.get_type_of_symbol(property),
                    None => {
                        self.report_nonexistent_property(right, &text, left_type);
                        TypeId::ERROR
                    }
                }
            }
            _ => TypeId::ERROR,
        }
    }
}

fn skip_parenthesized_types(arena: &tyck_binder::NodeArena, mut node: NodeIndex) -> NodeIndex {
    while let Some(NodeKind::ParenthesizedType(wrapped)) = arena.kind(node) {
        node = wrapped.type_node;
    }
    node
}

/// `...T[]` is a rest element, `...T` a variadic one.
fn rest_element_flags(arena: &tyck_binder::NodeArena, type_node: NodeIndex) -> ElementFlags {
    if matches!(arena.kind(skip_parenthesized_types(arena, type_node)), Some(NodeKind::ArrayType(_))) {
        ElementFlags::REST
    } else {
        ElementFlags::VARIADIC
    }
}

/// Normalized value of a bigint literal's text: sign split off, trailing
/// `n` dropped, hexadecimal, octal and binary forms converted to base 10,
/// leading zeros removed.
pub(crate) fn parse_pseudo_big_int(text: &str) -> PseudoBigInt {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let digits = digits.strip_suffix('n').unwrap_or(digits).replace('_', "");
    let radix = match digits.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => 10,
    };
    let base10_value = if radix == 10 {
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() }
    } else {
        convert_radix_to_base10(&digits[2..], radix)
    };
    PseudoBigInt {
        negative: negative && base10_value != "0",
        base10_value,
    }
}

/// Arbitrary-length radix conversion on little-endian base-10 digits.
fn convert_radix_to_base10(digits: &str, radix: u32) -> String {
    let mut result: Vec<u32> = vec![0];
    for c in digits.chars() {
        let Some(value) = c.to_digit(radix) else {
            continue;
        };
        let mut carry = value;
        for digit in result.iter_mut() {
            let next = *digit * radix + carry;
            *digit = next % 10;
            carry = next / 10;
        }
        while carry > 0 {
            result.push(carry % 10);
            carry /= 10;
        }
    }
    while result.len() > 1 && result.last() == Some(&0) {
        result.pop();
    }
    result.iter().rev().map(|d| char::from_digit(*d, 10).unwrap_or('0')).collect()
}
