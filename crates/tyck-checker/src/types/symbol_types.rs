//! Value-side types of symbols: variables, parameters, properties,
//! functions, classes, enums, modules and aliases.

use tracing::{debug, trace};
use tyck_binder::{NodeIndex, NodeKind, SymbolId, node_flags, symbol_flags};
use tyck_common::diagnostics::diagnostic_codes;
use tyck_types::{ObjectFlags, TypeId};

use crate::context::{ResolutionProperty, ResolutionTarget};
use crate::state::CheckerState;
use crate::symbols::links::CheckFlags;

impl<'a> CheckerState<'a> {
    /// Type of a symbol in a value position.
    pub fn get_type_of_symbol(&mut self, symbol: SymbolId) -> TypeId {
        if symbol.is_none() || symbol == self.ctx.unknown_symbol {
            return TypeId::ERROR;
        }
        let symbol = self.get_merged_symbol(symbol);
        if let Some(t) = self.links_ref(symbol).and_then(|l| l.type_) {
            return t;
        }
        let check_flags = self.check_flags(symbol);
        if check_flags.contains(CheckFlags::INSTANTIATED) {
            return self.get_type_of_instantiated_symbol(symbol);
        }
        if check_flags.contains(CheckFlags::MAPPED) {
            return self.get_type_of_mapped_symbol(symbol);
        }
        if check_flags.contains(CheckFlags::REVERSE_MAPPED) {
            return self.get_type_of_reverse_mapped_symbol(symbol);
        }
        let flags = self.symbol_flags_raw(symbol);
        if flags & symbol_flags::PROTOTYPE != 0 {
            return self.get_type_of_prototype_property(symbol);
        }
        if flags & (symbol_flags::VARIABLE | symbol_flags::PROPERTY) != 0 {
            return self.get_type_of_variable_or_parameter_or_property(symbol);
        }
        if flags
            & (symbol_flags::FUNCTION
                | symbol_flags::METHOD
                | symbol_flags::CLASS
                | symbol_flags::ENUM
                | symbol_flags::VALUE_MODULE)
            != 0
        {
            return self.get_type_of_func_class_enum_module(symbol);
        }
        if flags & symbol_flags::ENUM_MEMBER != 0 {
            let t = self.get_declared_type_of_symbol(symbol);
            self.links(symbol).type_ = Some(t);
            return t;
        }
        if flags & symbol_flags::ALIAS != 0 {
            return self.get_type_of_alias(symbol);
        }
        TypeId::ERROR
    }

    /// Type accepted when writing to the symbol.
    pub(crate) fn get_write_type_of_symbol(&mut self, symbol: SymbolId) -> TypeId {
        let t = self.get_type_of_symbol(symbol);
        let flags = self.symbol_flags_raw(symbol);
        if flags & symbol_flags::PROPERTY != 0
            && flags & symbol_flags::OPTIONAL != 0
            && self.ctx.options.exact_optional_property_types
        {
            return self.filter_type(t, |_, c| c != TypeId::MISSING);
        }
        t
    }

    fn get_type_of_instantiated_symbol(&mut self, symbol: SymbolId) -> TypeId {
        let (target, mapper) = match self.links_ref(symbol) {
            Some(links) => (links.target, links.mapper.clone()),
            None => (None, None),
        };
        let (Some(target), Some(mapper)) = (target, mapper) else {
            return TypeId::ERROR;
        };
        if !self.push_type_resolution(ResolutionTarget::Symbol(symbol), ResolutionProperty::Type) {
            self.links(symbol).type_ = Some(TypeId::ERROR);
            return TypeId::ERROR;
        }
        let uninstantiated = self.get_type_of_symbol(target);
        let mut t = self.instantiate_type(uninstantiated, &mapper);
        if !self.pop_type_resolution() {
            t = self.report_circularity_error(symbol);
        }
        *self.links(symbol).type_.get_or_insert(t)
    }

    fn get_type_of_prototype_property(&mut self, symbol: SymbolId) -> TypeId {
        let parent = self.symbol(symbol).parent;
        let class_type = self.get_declared_type_of_symbol(parent);
        let parameters = self.target_type_parameters(class_type);
        let t = if parameters.is_empty() {
            class_type
        } else {
            let arguments = vec![TypeId::ANY; parameters.len()];
            self.ctx.types.create_type_reference(class_type, arguments)
        };
        self.links(symbol).type_ = Some(t);
        t
    }

    fn get_type_of_func_class_enum_module(&mut self, symbol: SymbolId) -> TypeId {
        let flags = self.symbol_flags_raw(symbol);
        let mut t = self
            .ctx
            .types
            .create_anonymous_type(symbol, None, ObjectFlags::empty());
        if flags & symbol_flags::CLASS == 0
            && flags & symbol_flags::OPTIONAL != 0
            && self.ctx.strict_null_checks()
        {
            t = self.get_optional_type(t, true);
        }
        trace!(symbol = symbol.0, t = t.0, "function, class, enum or module type");
        self.links(symbol).type_ = Some(t);
        t
    }

    fn get_type_of_alias(&mut self, symbol: SymbolId) -> TypeId {
        let target = self.resolve_alias(symbol);
        let t = if target == self.ctx.unknown_symbol {
            TypeId::ERROR
        } else if self.get_symbol_flags(target) & symbol_flags::VALUE != 0 {
            self.get_type_of_symbol(target)
        } else {
            TypeId::ERROR
        };
        self.links(symbol).type_ = Some(t);
        t
    }

    // =========================================================================
    // Variables, parameters and properties
    // =========================================================================

    fn get_type_of_variable_or_parameter_or_property(&mut self, symbol: SymbolId) -> TypeId {
        if !self.push_type_resolution(ResolutionTarget::Symbol(symbol), ResolutionProperty::Type) {
            return self.report_circularity_error(symbol);
        }
        let declaration = self.value_declaration_of(symbol);
        let mut t = self.get_type_for_declaration(symbol, declaration);
        if !self.pop_type_resolution() {
            t = self.report_circularity_error(symbol);
        }
        *self.links(symbol).type_.get_or_insert(t)
    }

    fn value_declaration_of(&self, symbol: SymbolId) -> NodeIndex {
        let s = self.symbol(symbol);
        if s.value_declaration.is_some() {
            s.value_declaration
        } else {
            s.first_declaration()
        }
    }

    /// 2502 for annotated declarations, 7022 under `noImplicitAny`
    /// otherwise. Annotated declarations become the error type, the rest
    /// `any`.
    fn report_circularity_error(&mut self, symbol: SymbolId) -> TypeId {
        let declaration = self.value_declaration_of(symbol);
        let name = self.symbol_to_string(symbol);
        let annotation = self.ctx.arena.type_annotation_of(declaration);
        if annotation.is_some() {
            self.error_on_declaration(declaration, diagnostic_codes::REFERENCED_IN_OWN_TYPE_ANNOTATION, &[&name]);
            return TypeId::ERROR;
        }
        let is_parameter_without_initializer = matches!(self.ctx.arena.kind(declaration), Some(NodeKind::Parameter(_)))
            && self.ctx.arena.initializer_of(declaration).is_none();
        if self.ctx.options.no_implicit_any && !is_parameter_without_initializer {
            self.error_on_declaration(
                declaration,
                diagnostic_codes::IMPLICITLY_HAS_TYPE_ANY_CIRCULAR_INITIALIZER,
                &[&name],
            );
        }
        debug!(symbol = %name, "circular variable type");
        TypeId::ANY
    }

    fn get_type_for_declaration(&mut self, symbol: SymbolId, declaration: NodeIndex) -> TypeId {
        let arena = self.ctx.arena;
        let Some(kind) = arena.kind(declaration) else {
            return TypeId::ANY;
        };
        match kind {
            NodeKind::VariableDeclaration(variable) => {
                if variable.type_annotation.is_some() {
                    return self.get_type_from_type_node(variable.type_annotation);
                }
                if variable.initializer.is_some() {
                    let initializer = self.check_expression(variable.initializer);
                    return if arena.has_flag(declaration, node_flags::CONST) && self.is_literal_type(initializer) {
                        self.get_regular_type_of_literal_type(initializer)
                    } else {
                        self.get_widened_type(initializer)
                    };
                }
                if self.ctx.options.no_implicit_any {
                    let name = self.symbol_to_string(symbol);
                    self.error_on_declaration(declaration, diagnostic_codes::VARIABLE_IMPLICITLY_HAS_TYPE, &[&name, "any"]);
                }
                TypeId::ANY
            }
            NodeKind::Parameter(parameter) => {
                let t = self.get_type_of_parameter_declaration(symbol, declaration, parameter.clone());
                if parameter.question_token {
                    self.get_optional_type(t, false)
                } else {
                    t
                }
            }
            NodeKind::PropertyDeclaration(property) | NodeKind::PropertySignature(property) => {
                let t = if property.type_annotation.is_some() {
                    self.get_type_from_type_node(property.type_annotation)
                } else if property.initializer.is_some() {
                    let initializer = self.check_expression(property.initializer);
                    if arena.has_flag(declaration, node_flags::READONLY) && self.is_literal_type(initializer) {
                        self.get_regular_type_of_literal_type(initializer)
                    } else {
                        self.get_widened_type(initializer)
                    }
                } else {
                    TypeId::ANY
                };
                if property.question_token {
                    self.get_optional_type(t, true)
                } else {
                    t
                }
            }
            NodeKind::PropertyAssignment(assignment) => self.check_expression(assignment.initializer),
            NodeKind::ExportAssignment(assignment) => {
                let t = self.check_expression(assignment.expression);
                self.get_widened_type(t)
            }
            _ => TypeId::ANY,
        }
    }

    fn get_type_of_parameter_declaration(
        &mut self,
        symbol: SymbolId,
        declaration: NodeIndex,
        parameter: tyck_binder::ast::ParameterData,
    ) -> TypeId {
        if parameter.type_annotation.is_some() {
            return self.get_type_from_type_node(parameter.type_annotation);
        }
        if let Some(contextual) = self.get_contextual_parameter_type(declaration) {
            return contextual;
        }
        if parameter.initializer.is_some() {
            let t = self.check_expression(parameter.initializer);
            return self.get_widened_type(t);
        }
        let t = if parameter.dot_dot_dot {
            self.create_array_type(TypeId::ANY, false)
        } else {
            TypeId::ANY
        };
        if self.ctx.options.no_implicit_any {
            let name = self.symbol_to_string(symbol);
            let text = if parameter.dot_dot_dot { "any[]" } else { "any" };
            self.error_on_declaration(declaration, diagnostic_codes::PARAMETER_IMPLICITLY_HAS_ANY_TYPE, &[&name, text]);
        }
        t
    }
}
