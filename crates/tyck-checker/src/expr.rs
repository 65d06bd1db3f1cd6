//! Expression checking and contextual typing.
//!
//! `check_expression` computes the type of an expression node and caches it
//! in the node links. Literals produce fresh literal types; widening happens
//! where the value is stored (see `get_type_for_declaration`).
//!
//! Contextual types flow from annotations, `as` casts, call arguments and
//! enclosing object or array literals. Call arguments push their contextual
//! type on `CheckerContext::contextual_types`; everything else is derived
//! from the parent node on demand.

use tracing::trace;
use tyck_binder::{FunctionBody, NodeIndex, NodeKind, symbol_flags};
use tyck_common::diagnostics::diagnostic_codes;
use tyck_types::{AccessFlags, ElementFlags, ObjectFlags, SignatureId, SignatureKind, TypeFlags, TypeId, UnionReduction};

use crate::state::CheckerState;
use crate::symbols::links::NodeCheckFlags;
use crate::types::parse_pseudo_big_int;

impl<'a> CheckerState<'a> {
    /// Type of an expression. Cached per node.
    #[tracing::instrument(level = "trace", skip(self), fields(node = node.0))]
    pub fn check_expression(&mut self, node: NodeIndex) -> TypeId {
        if node.is_none() {
            return TypeId::ERROR;
        }
        if let Some(t) = self.node_links_ref(node).and_then(|l| l.resolved_type) {
            return t;
        }
        let saved = self.ctx.current_node;
        self.ctx.current_node = node;
        self.ctx.instantiation_count = 0;
        let t = stacker::maybe_grow(64 * 1024, 1024 * 1024, || self.check_expression_worker(node));
        self.ctx.current_node = saved;
        *self.node_links(node).resolved_type.get_or_insert(t)
    }

    fn check_expression_worker(&mut self, node: NodeIndex) -> TypeId {
        let arena = self.ctx.arena;
        let Some(kind) = arena.kind(node) else {
            return TypeId::ERROR;
        };
        trace!(kind = kind.name(), "check expression");
        match kind {
            NodeKind::Identifier(ident) => {
                let text = ident.escaped_text.clone();
                self.check_identifier(node, &text)
            }
            NodeKind::QualifiedName(_) => {
                match self.resolve_entity_name(node, symbol_flags::VALUE, false, false) {
                    Some(symbol) if symbol != self.ctx.unknown_symbol => {
                        self.node_links(node).resolved_symbol = Some(symbol);
                        self.get_type_of_symbol(symbol)
                    }
                    _ => TypeId::ERROR,
                }
            }
            NodeKind::StringLiteral(literal) => {
                let t = self.ctx.types.string_literal(&literal.text);
                self.get_fresh_type_of_literal_type(t)
            }
            NodeKind::NumericLiteral(literal) => {
                let t = self.ctx.types.number_literal(literal.value);
                self.get_fresh_type_of_literal_type(t)
            }
            NodeKind::BigIntLiteral(literal) => {
                let value = parse_pseudo_big_int(&literal.text);
                let t = self.ctx.types.bigint_literal(value);
                self.get_fresh_type_of_literal_type(t)
            }
            NodeKind::TrueKeyword => TypeId::TRUE,
            NodeKind::FalseKeyword => TypeId::FALSE,
            NodeKind::NullKeyword => {
                if self.ctx.strict_null_checks() {
                    TypeId::NULL
                } else {
                    TypeId::NULL_WIDENING
                }
            }
            NodeKind::PropertyAccessExpression(access) => {
                let (expression, name) = (access.expression, access.name_or_argument);
                self.check_property_access(node, expression, name)
            }
            NodeKind::ElementAccessExpression(access) => {
                let (expression, argument) = (access.expression, access.name_or_argument);
                self.check_element_access(node, expression, argument)
            }
            NodeKind::CallExpression(_) => self.check_call_expression(node, SignatureKind::Call),
            NodeKind::NewExpression(_) => self.check_call_expression(node, SignatureKind::Construct),
            NodeKind::ObjectLiteralExpression(_) => self.check_object_literal(node),
            NodeKind::ArrayLiteralExpression(literal) => {
                let elements = literal.elements.clone();
                self.check_array_literal(node, &elements, false)
            }
            NodeKind::SpreadElement(spread) => self.check_expression(spread.expression),
            NodeKind::ParenthesizedExpression(paren) => self.check_expression(paren.expression),
            NodeKind::AsExpression(cast) => {
                let (expression, type_node) = (cast.expression, cast.type_node);
                self.check_as_expression(node, expression, type_node)
            }
            NodeKind::ArrowFunction(_) | NodeKind::FunctionExpression(_) => self.check_function_expression(node),
            _ => TypeId::ERROR,
        }
    }

    // =========================================================================
    // Names and member access
    // =========================================================================

    fn check_identifier(&mut self, node: NodeIndex, text: &str) -> TypeId {
        if text == "undefined" {
            return if self.ctx.strict_null_checks() {
                TypeId::UNDEFINED
            } else {
                TypeId::UNDEFINED_WIDENING
            };
        }
        let Some(symbol) = self.resolve_name(node, text, symbol_flags::VALUE, true) else {
            return TypeId::ERROR;
        };
        self.node_links(node).resolved_symbol = Some(symbol);
        self.get_type_of_symbol(symbol)
    }

    fn check_property_access(&mut self, node: NodeIndex, expression: NodeIndex, name_node: NodeIndex) -> TypeId {
        let object = self.check_expression(expression);
        let Some(name) = self.ctx.arena.identifier_text(name_node).map(str::to_string) else {
            return TypeId::ERROR;
        };
        if object.is_error() {
            return TypeId::ERROR;
        }
        if self.type_flags(object).intersects(TypeFlags::ANY) {
            return TypeId::ANY;
        }
        let object = if self.ctx.strict_null_checks() {
            self.get_non_nullable_type(object)
        } else {
            object
        };
        let apparent = self.get_apparent_type(object);
        if let Some(property) = self.get_property_of_type(apparent, &name) {
            self.node_links(node).resolved_symbol = Some(property);
            self.node_links(name_node).resolved_symbol = Some(property);
            return self.get_type_of_symbol(property);
        }
        if let Some(info) = self.get_applicable_index_info_for_name(apparent, &name) {
            return if self.ctx.options.no_unchecked_indexed_access {
                self.get_union_type(&[info.value_type, TypeId::MISSING])
            } else {
                info.value_type
            };
        }
        self.report_nonexistent_property(name_node, &name, object);
        TypeId::ERROR
    }

    fn check_element_access(&mut self, node: NodeIndex, expression: NodeIndex, argument: NodeIndex) -> TypeId {
        let object = self.check_expression(expression);
        let index = self.check_expression(argument);
        if object.is_error() || index.is_error() {
            return TypeId::ERROR;
        }
        if self.type_flags(object).intersects(TypeFlags::ANY) {
            return TypeId::ANY;
        }
        let object = if self.ctx.strict_null_checks() {
            self.get_non_nullable_type(object)
        } else {
            object
        };
        let index = self.get_regular_type_of_literal_type(index);
        let object = if self.is_generic_object_type(object) {
            object
        } else {
            self.get_apparent_type(object)
        };
        self.get_indexed_access_type(object, index, AccessFlags::empty(), node, None)
    }

    // =========================================================================
    // Literals
    // =========================================================================

    fn check_object_literal(&mut self, node: NodeIndex) -> TypeId {
        let Some(symbol) = self.get_symbol_of_node(node) else {
            return TypeId::ERROR;
        };
        let t = self.ctx.types.create_anonymous_type(
            symbol,
            None,
            ObjectFlags::OBJECT_LITERAL | ObjectFlags::FRESH_LITERAL | ObjectFlags::CONTAINS_OBJECT_OR_ARRAY_LITERAL,
        );
        // Property initializers are checked now so their diagnostics are
        // reported even when the literal's members are never read.
        for property in self.get_properties_of_type(t) {
            self.get_type_of_symbol(property);
        }
        t
    }

    /// Tuple when the literal is contextually typed by a tuple or is
    /// `as const`, array of the element union otherwise.
    fn check_array_literal(&mut self, node: NodeIndex, elements: &[NodeIndex], is_const: bool) -> TypeId {
        let contextual = self.get_contextual_type(node);
        let in_tuple_context = is_const || contextual.is_some_and(|c| self.is_tuple_like_type(c));
        let mut element_types = Vec::with_capacity(elements.len());
        let mut element_flags = Vec::with_capacity(elements.len());
        for &element in elements {
            if let Some(NodeKind::SpreadElement(spread)) = self.ctx.arena.kind(element) {
                let spread_type = self.check_expression(spread.expression);
                if self.is_tuple_type(spread_type) {
                    let info = self.tuple_target_info(spread_type);
                    for (i, element_type) in self.get_element_types(spread_type).into_iter().enumerate() {
                        let flags = info
                            .as_ref()
                            .and_then(|info| info.element_flags.get(i).copied())
                            .unwrap_or(ElementFlags::REQUIRED);
                        element_types.push(element_type);
                        element_flags.push(flags);
                    }
                } else {
                    let element_type = self
                        .array_like_element_type(spread_type)
                        .unwrap_or(TypeId::ANY);
                    element_types.push(element_type);
                    element_flags.push(ElementFlags::REST);
                }
                continue;
            }
            let mut element_type = self.check_expression(element);
            if is_const {
                element_type = self.get_regular_type_of_literal_type(element_type);
            }
            element_types.push(element_type);
            element_flags.push(ElementFlags::REQUIRED);
        }
        if in_tuple_context {
            return self.create_tuple_type(&element_types, Some(&element_flags), is_const, &[]);
        }
        let element = if element_types.is_empty() {
            if self.ctx.strict_null_checks() {
                TypeId::IMPLICIT_NEVER
            } else {
                TypeId::UNDEFINED_WIDENING
            }
        } else {
            self.get_union_type_ex(&element_types, UnionReduction::Subtype, None, None)
        };
        self.create_array_type(element, false)
    }

    fn is_tuple_like_type(&mut self, t: TypeId) -> bool {
        if self.type_flags(t).contains(TypeFlags::UNION) {
            return self.union_constituents(t).into_iter().any(|c| self.is_tuple_type(c));
        }
        self.is_tuple_type(t)
    }

    // =========================================================================
    // Casts and functions
    // =========================================================================

    fn check_as_expression(&mut self, node: NodeIndex, expression: NodeIndex, type_node: NodeIndex) -> TypeId {
        if self.is_const_type_reference(type_node) {
            return self.check_const_assertion(expression);
        }
        let target = self.get_type_from_type_node(type_node);
        let source = self.check_expression(expression);
        if source.is_error() || target.is_error() {
            return target;
        }
        let source = self.get_regular_type_of_literal_type(source);
        let widened = self.get_widened_type(source);
        if !self.is_type_comparable_to(target, widened) && !self.is_type_comparable_to(widened, target) {
            let (source_text, target_text) = (self.type_to_string(widened), self.type_to_string(target));
            self.error(
                node,
                diagnostic_codes::CONVERSION_MAY_BE_A_MISTAKE,
                &[&source_text, &target_text],
            );
        }
        target
    }

    fn is_const_type_reference(&self, type_node: NodeIndex) -> bool {
        match self.ctx.arena.kind(type_node) {
            Some(NodeKind::TypeReference(reference)) => {
                reference.type_arguments.is_empty()
                    && self.ctx.arena.identifier_text(reference.type_name) == Some("const")
            }
            _ => false,
        }
    }

    /// `expr as const`: literals stay literal, arrays become readonly
    /// tuples.
    fn check_const_assertion(&mut self, expression: NodeIndex) -> TypeId {
        let arena = self.ctx.arena;
        match arena.kind(expression) {
            Some(NodeKind::ArrayLiteralExpression(literal)) => {
                let elements = literal.elements.clone();
                let t = self.check_array_literal(expression, &elements, true);
                self.node_links(expression).resolved_type = Some(t);
                t
            }
            Some(NodeKind::ParenthesizedExpression(paren)) => self.check_const_assertion(paren.expression),
            _ => {
                let t = self.check_expression(expression);
                self.get_regular_type_of_literal_type(t)
            }
        }
    }

    fn check_function_expression(&mut self, node: NodeIndex) -> TypeId {
        let Some(symbol) = self.get_symbol_of_node(node) else {
            return TypeId::ERROR;
        };
        let t = self.get_type_of_symbol(symbol);
        self.check_function_body(node);
        t
    }

    // =========================================================================
    // Contextual types
    // =========================================================================

    /// Whether checking `node` depends on its contextual type: a function
    /// with an unannotated parameter, possibly nested in literals.
    pub(crate) fn is_context_sensitive(&self, node: NodeIndex) -> bool {
        let arena = self.ctx.arena;
        match arena.kind(node) {
            Some(NodeKind::ArrowFunction(function) | NodeKind::FunctionExpression(function)) => {
                function.type_parameters.is_empty()
                    && function
                        .parameters
                        .iter()
                        .any(|&p| arena.get_parameter(p).is_some_and(|p| p.type_annotation.is_none()))
            }
            Some(NodeKind::ObjectLiteralExpression(literal)) => literal
                .properties
                .iter()
                .any(|&p| self.is_context_sensitive(arena.initializer_of(p))),
            Some(NodeKind::ArrayLiteralExpression(literal)) => {
                literal.elements.iter().any(|&e| self.is_context_sensitive(e))
            }
            Some(NodeKind::ParenthesizedExpression(paren)) => self.is_context_sensitive(paren.expression),
            _ => false,
        }
    }

    /// Contextual type of an expression, if any.
    pub(crate) fn get_contextual_type(&mut self, node: NodeIndex) -> Option<TypeId> {
        if let Some(&(_, t)) = self.ctx.contextual_types.iter().rev().find(|(n, _)| *n == node) {
            return Some(t);
        }
        let arena = self.ctx.arena;
        let parent = arena.parent(node);
        match arena.kind(parent)? {
            NodeKind::VariableDeclaration(variable) if variable.initializer == node => {
                let annotation = variable.type_annotation;
                annotation.is_some().then(|| self.get_type_from_type_node(annotation))
            }
            NodeKind::PropertyDeclaration(property) if property.initializer == node => {
                let annotation = property.type_annotation;
                annotation.is_some().then(|| self.get_type_from_type_node(annotation))
            }
            NodeKind::Parameter(parameter) if parameter.initializer == node => {
                let annotation = parameter.type_annotation;
                annotation.is_some().then(|| self.get_type_from_type_node(annotation))
            }
            NodeKind::ParenthesizedExpression(_) => self.get_contextual_type(parent),
            NodeKind::AsExpression(cast) => {
                let type_node = cast.type_node;
                if self.is_const_type_reference(type_node) {
                    None
                } else {
                    Some(self.get_type_from_type_node(type_node))
                }
            }
            NodeKind::PropertyAssignment(assignment) if assignment.initializer == node => {
                let name = arena.property_name_text(assignment.name)?;
                let object_type = self.get_contextual_type(arena.parent(parent))?;
                self.get_type_of_property_of_contextual_type(object_type, &name)
            }
            NodeKind::ArrayLiteralExpression(literal) => {
                let position = literal.elements.iter().position(|&e| e == node)?;
                let array_type = self.get_contextual_type(parent)?;
                self.get_contextual_element_type(array_type, position)
            }
            NodeKind::ArrowFunction(function) | NodeKind::FunctionExpression(function) => match function.body {
                FunctionBody::Expression(body) if body == node => self.get_contextual_return_type(parent),
                _ => None,
            },
            NodeKind::ReturnStatement(_) => {
                let function = self.containing_function(parent)?;
                self.get_contextual_return_type(function)
            }
            _ => None,
        }
    }

    fn get_type_of_property_of_contextual_type(&mut self, t: TypeId, name: &str) -> Option<TypeId> {
        let result = self.map_type(t, |s, constituent| {
            let apparent = s.get_apparent_type(constituent);
            if let Some(property) = s.get_property_of_type(apparent, name) {
                return Some(s.get_type_of_symbol(property));
            }
            s.get_applicable_index_info_for_name(apparent, name)
                .map(|info| info.value_type)
        });
        (!self.type_flags(result).contains(TypeFlags::NEVER)).then_some(result)
    }

    fn get_contextual_element_type(&mut self, t: TypeId, position: usize) -> Option<TypeId> {
        let result = self.map_type(t, |s, constituent| {
            if s.is_tuple_type(constituent) {
                let elements = s.get_element_types(constituent);
                if let Some(&element) = elements.get(position) {
                    return Some(element);
                }
                return s.get_rest_type_of_tuple_type(constituent);
            }
            s.array_like_element_type(constituent)
        });
        (!self.type_flags(result).contains(TypeFlags::NEVER)).then_some(result)
    }

    fn containing_function(&self, mut node: NodeIndex) -> Option<NodeIndex> {
        let arena = self.ctx.arena;
        while node.is_some() {
            if arena.kind(node).is_some_and(|k| k.as_function_like().is_some()) {
                return Some(node);
            }
            node = arena.parent(node);
        }
        None
    }

    fn get_contextual_return_type(&mut self, function: NodeIndex) -> Option<TypeId> {
        let return_type = self.ctx.arena.get_function_like(function)?.return_type;
        if return_type.is_some() {
            return Some(self.get_type_from_type_node(return_type));
        }
        let signature = self.get_contextual_signature(function)?;
        Some(self.get_return_type_of_signature(signature))
    }

    /// The single call signature of a function expression's contextual type.
    pub(crate) fn get_contextual_signature(&mut self, function: NodeIndex) -> Option<SignatureId> {
        if !matches!(
            self.ctx.arena.kind(function),
            Some(NodeKind::ArrowFunction(_) | NodeKind::FunctionExpression(_))
        ) {
            return None;
        }
        let contextual = self.get_contextual_type(function)?;
        let contextual = self.get_non_nullable_type(contextual);
        let apparent = self.get_apparent_type(contextual);
        let signatures = self.get_signatures_of_type(apparent, SignatureKind::Call);
        match signatures.as_slice() {
            [signature] => Some(*signature),
            _ => None,
        }
    }

    /// Type of an unannotated parameter from the contextual signature of its
    /// function expression.
    pub(crate) fn get_contextual_parameter_type(&mut self, parameter: NodeIndex) -> Option<TypeId> {
        let arena = self.ctx.arena;
        let function = arena.parent(parameter);
        let data = match arena.kind(function)? {
            NodeKind::ArrowFunction(data) | NodeKind::FunctionExpression(data) => data,
            _ => return None,
        };
        let position = data.parameters.iter().position(|&p| p == parameter)?;
        let is_rest = arena.get_parameter(parameter).is_some_and(|p| p.dot_dot_dot);
        let signature = self.get_contextual_signature(function)?;
        self.node_links(function).flags |= NodeCheckFlags::CONTEXT_CHECKED;
        if is_rest {
            let count = self.get_parameter_count(signature);
            let mut rest = Vec::new();
            for i in position..count {
                if let Some(t) = self.get_type_at_position(signature, i) {
                    rest.push(t);
                }
            }
            let has_rest = self.ctx.types.signature(signature).has_rest_parameter();
            if has_rest && position >= self.ctx.types.signature(signature).non_rest_parameter_count() {
                return self.get_rest_type_of_signature(signature);
            }
            return Some(self.create_tuple_type(&rest, None, false, &[]));
        }
        let t = self.get_type_at_position(signature, position)?;
        trace!(parameter = parameter.0, t = t.0, "contextual parameter type");
        Some(t)
    }
}
