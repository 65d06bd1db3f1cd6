//! Source file, statement and declaration checking.
//!
//! Checking a declaration forces the lazily computed facts about it
//! (declared types, base types, constraints, alias targets), so every
//! circularity and resolution error surfaces even when nothing references
//! the declaration. Initializers and return expressions are related to
//! their annotations.

use tracing::{debug, trace};
use tyck_binder::{FileId, FunctionBody, NodeIndex, NodeKind, symbol_flags};
use tyck_types::TypeId;

use crate::state::CheckerState;
use crate::symbols::links::NodeCheckFlags;

impl<'a> CheckerState<'a> {
    /// Check every statement of one file. A file is checked at most once.
    #[tracing::instrument(level = "debug", skip(self), fields(file = file.0))]
    pub fn check_source_file(&mut self, file: FileId) {
        let Some(root) = self.ctx.program.file(file).map(|f| f.root) else {
            return;
        };
        if !self.ctx.checked_files.insert(root) {
            return;
        }
        let arena = self.ctx.arena;
        let Some(source) = arena.get_source_file(root) else {
            return;
        };
        let statements = source.statements.clone();
        let before = self.ctx.diagnostics.len();
        for statement in statements {
            self.check_statement(statement);
        }
        debug!(
            file = %source.file_name,
            diagnostics = self.ctx.diagnostics.len() - before,
            "file checked"
        );
    }

    /// Check every file of the program.
    pub fn check_program(&mut self) {
        let files: Vec<FileId> = self.ctx.program.file_ids().collect();
        for file in files {
            self.check_source_file(file);
        }
    }

    fn check_statement(&mut self, node: NodeIndex) {
        let arena = self.ctx.arena;
        let Some(kind) = arena.kind(node) else {
            return;
        };
        // The instantiation budget is per statement.
        self.ctx.instantiation_count = 0;
        trace!(kind = kind.name(), "check statement");
        match kind {
            NodeKind::VariableDeclaration(variable) => {
                let (name, annotation, initializer) = (variable.name, variable.type_annotation, variable.initializer);
                self.check_variable_like(node, name, annotation, initializer);
            }
            NodeKind::FunctionDeclaration(_) => self.check_function_body(node),
            NodeKind::ClassDeclaration(class) => {
                let members = class.members.clone();
                self.check_class_declaration(node, &members);
            }
            NodeKind::InterfaceDeclaration(interface) => {
                let members = interface.members.clone();
                self.check_declared_type(node);
                self.check_type_members(&members);
            }
            NodeKind::TypeAliasDeclaration(_) | NodeKind::EnumDeclaration(_) => self.check_declared_type(node),
            NodeKind::ModuleDeclaration(module) => {
                let body = module.body.clone();
                if let Some(symbol) = self.get_symbol_of_node(node)
                    && self.symbol_flags_raw(symbol) & symbol_flags::VALUE_MODULE != 0
                {
                    self.get_exports_of_module(symbol);
                }
                for statement in body {
                    self.check_statement(statement);
                }
            }
            NodeKind::ImportEqualsDeclaration(_)
            | NodeKind::ImportDeclaration(_)
            | NodeKind::ExportDeclaration(_) => self.check_alias_declarations(node),
            NodeKind::ExportAssignment(assignment) => {
                self.check_expression(assignment.expression);
            }
            NodeKind::ExpressionStatement(statement) => {
                self.check_expression(statement.expression);
            }
            _ => {}
        }
    }

    /// Relate an initializer to the declared type of a variable, parameter
    /// or property.
    fn check_variable_like(&mut self, node: NodeIndex, name: NodeIndex, annotation: NodeIndex, initializer: NodeIndex) {
        let Some(symbol) = self.get_symbol_of_node(node) else {
            return;
        };
        let declared = self.get_type_of_symbol(symbol);
        if annotation.is_none() || initializer.is_none() {
            return;
        }
        let source = self.check_expression(initializer);
        let target = self.get_type_from_type_node(annotation);
        if !self.is_type_assignable_to(source, target) {
            let node = if name.is_some() { name } else { node };
            self.report_type_not_assignable(node, source, target);
        }
        trace!(symbol = symbol.0, declared = declared.0, "variable checked");
    }

    fn check_declared_type(&mut self, node: NodeIndex) {
        let Some(symbol) = self.get_symbol_of_node(node) else {
            return;
        };
        let declared = self.get_declared_type_of_symbol(symbol);
        if self.ty(declared).as_interface().is_some() {
            self.get_base_types(declared);
        }
        self.check_type_parameters(node);
    }

    fn check_type_parameters(&mut self, node: NodeIndex) {
        let parameters = self.ctx.arena.type_parameters_of(node).to_vec();
        for parameter in parameters {
            if let Some(symbol) = self.get_symbol_of_node(parameter) {
                let t = self.get_declared_type_of_type_parameter(symbol);
                self.get_constraint_of_type_parameter(t);
            }
        }
    }

    /// Resolve the types of interface or type literal members so that
    /// unresolved names inside them are reported.
    fn check_type_members(&mut self, members: &[NodeIndex]) {
        let arena = self.ctx.arena;
        for &member in members {
            match arena.kind(member) {
                Some(NodeKind::PropertySignature(_)) => {
                    if let Some(symbol) = self.get_symbol_of_node(member) {
                        self.get_type_of_symbol(symbol);
                    }
                }
                Some(kind) if kind.as_function_like().is_some() => {
                    self.check_type_parameters(member);
                    let signature = self.get_signature_from_declaration(member);
                    self.get_return_type_of_signature(signature);
                }
                Some(NodeKind::IndexSignature(index)) => {
                    let annotation = index.type_annotation;
                    self.get_type_from_type_node(annotation);
                }
                _ => {}
            }
        }
    }

    fn check_class_declaration(&mut self, node: NodeIndex, members: &[NodeIndex]) {
        self.check_declared_type(node);
        if let Some(symbol) = self.get_symbol_of_node(node) {
            let class_type = self.get_declared_type_of_symbol(symbol);
            self.get_base_constructor_type_of_class(class_type);
            self.get_type_of_symbol(symbol);
        }
        let arena = self.ctx.arena;
        for &member in members {
            match arena.kind(member) {
                Some(NodeKind::PropertyDeclaration(property)) => {
                    let (name, annotation, initializer) =
                        (property.name, property.type_annotation, property.initializer);
                    self.check_variable_like(member, name, annotation, initializer);
                }
                Some(NodeKind::MethodDeclaration(_) | NodeKind::Constructor(_)) => self.check_function_body(member),
                Some(NodeKind::IndexSignature(index)) => {
                    let annotation = index.type_annotation;
                    self.get_type_from_type_node(annotation);
                }
                _ => {}
            }
        }
    }

    /// Resolve every alias an import or export declaration introduces.
    fn check_alias_declarations(&mut self, node: NodeIndex) {
        let arena = self.ctx.arena;
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if matches!(
                arena.kind(current),
                Some(
                    NodeKind::ImportEqualsDeclaration(_)
                        | NodeKind::ImportClause(_)
                        | NodeKind::NamespaceImport(_)
                        | NodeKind::ImportSpecifier(_)
                        | NodeKind::ExportSpecifier(_)
                        | NodeKind::NamespaceExport(_)
                )
            ) && let Some(symbol) = self.ctx.program.binder.get_node_symbol(current)
                && self.symbol_flags_raw(symbol) & symbol_flags::ALIAS != 0
            {
                self.resolve_alias(symbol);
            }
            stack.extend(arena.children(current));
        }
    }

    // =========================================================================
    // Functions
    // =========================================================================

    /// Check parameters, type parameters and the body of a function-like
    /// declaration. Return expressions are related to an annotated return
    /// type. Each function is checked once.
    pub(crate) fn check_function_body(&mut self, node: NodeIndex) {
        if self
            .node_links_ref(node)
            .is_some_and(|l| l.flags.contains(NodeCheckFlags::TYPE_CHECKED))
        {
            return;
        }
        self.node_links(node).flags |= NodeCheckFlags::TYPE_CHECKED;
        let Some(function) = self.ctx.arena.get_function_like(node).cloned() else {
            return;
        };
        self.check_type_parameters(node);
        let arena = self.ctx.arena;
        for &parameter in &function.parameters {
            if let Some(data) = arena.get_parameter(parameter) {
                let (name, annotation, initializer) = (data.name, data.type_annotation, data.initializer);
                self.check_variable_like(parameter, name, annotation, initializer);
            }
        }
        let signature = self.get_signature_from_declaration(node);
        self.get_return_type_of_signature(signature);

        let annotated = function.return_type.is_some().then(|| self.get_type_from_type_node(function.return_type));
        match &function.body {
            FunctionBody::None => {}
            FunctionBody::Expression(expression) => {
                let t = self.check_expression(*expression);
                if let Some(target) = annotated {
                    self.check_return_expression(*expression, t, target);
                }
            }
            FunctionBody::Block(statements) => {
                for &statement in statements {
                    match arena.kind(statement) {
                        Some(NodeKind::ReturnStatement(ret)) => {
                            if ret.expression.is_none() {
                                continue;
                            }
                            let t = self.check_expression(ret.expression);
                            if let Some(target) = annotated {
                                self.check_return_expression(ret.expression, t, target);
                            }
                        }
                        _ => self.check_statement(statement),
                    }
                }
            }
        }
    }

    fn check_return_expression(&mut self, expression: NodeIndex, source: TypeId, target: TypeId) {
        if target == TypeId::VOID || self.is_type_assignable_to(source, target) {
            return;
        }
        self.report_type_not_assignable(expression, source, target);
    }
}
