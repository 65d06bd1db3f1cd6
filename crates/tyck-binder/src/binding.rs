//! Declaration binding: walks a source file and enters every declaration
//! into the locals, members or exports table it belongs to.

use tracing::{debug, trace};

use crate::ast::*;
use crate::state::{BinderState, TableRef};
use crate::symbols::{SymbolId, internal_names, symbol_flags};

impl BinderState {
    /// Bind one source file. Returns whether the file is an external module.
    #[tracing::instrument(level = "debug", skip(self, arena))]
    pub fn bind_source_file(&mut self, arena: &NodeArena, root: NodeIndex, file_name: &str) -> bool {
        let Some(source_file) = arena.get_source_file(root) else {
            return false;
        };
        self.file_name = file_name.to_string();
        self.is_external_module = is_external_module(arena, &source_file.statements);
        self.container = root;
        self.implicit_exports = false;
        self.locals.entry(root).or_default();
        self.container_symbol = if self.is_external_module {
            let name = format!("\"{}\"", strip_extension(file_name));
            let sym = self.create_detached_symbol(root, &name, symbol_flags::VALUE_MODULE, SymbolId::NONE);
            if let Some(s) = self.symbols.get_mut(sym) {
                s.exports.get_or_insert_with(Default::default);
            }
            sym
        } else {
            SymbolId::NONE
        };
        debug!(
            file_name,
            external = self.is_external_module,
            statements = source_file.statements.len(),
            "binding source file"
        );
        for &stmt in &source_file.statements {
            self.bind_node(arena, stmt);
        }
        self.is_external_module
    }

    fn bind_node(&mut self, arena: &NodeArena, idx: NodeIndex) {
        let Some(node) = arena.get(idx) else {
            return;
        };
        trace!(kind = node.kind.name(), idx = idx.0, "bind");
        match &node.kind {
            NodeKind::VariableDeclaration(decl) => {
                let (includes, excludes) = if node.has_flag(node_flags::BLOCK_SCOPED) {
                    (
                        symbol_flags::BLOCK_SCOPED_VARIABLE,
                        symbol_flags::BLOCK_SCOPED_VARIABLE_EXCLUDES,
                    )
                } else {
                    (
                        symbol_flags::FUNCTION_SCOPED_VARIABLE,
                        symbol_flags::FUNCTION_SCOPED_VARIABLE_EXCLUDES,
                    )
                };
                if let Some(name) = arena.identifier_text(decl.name) {
                    self.declare_module_member(arena, idx, name, includes, excludes);
                }
                self.bind_node(arena, decl.type_annotation);
                self.bind_node(arena, decl.initializer);
            }
            NodeKind::FunctionDeclaration(func) => {
                let name = arena.identifier_text(func.name).unwrap_or(internal_names::DEFAULT);
                self.declare_module_member(
                    arena,
                    idx,
                    name,
                    symbol_flags::FUNCTION,
                    symbol_flags::FUNCTION_EXCLUDES,
                );
                self.bind_function_like(arena, idx, func);
            }
            NodeKind::ClassDeclaration(class) => self.bind_class(arena, idx, class),
            NodeKind::InterfaceDeclaration(iface) => {
                let Some(name) = arena.identifier_text(iface.name) else {
                    return;
                };
                let sym = self.declare_module_member(
                    arena,
                    idx,
                    name,
                    symbol_flags::INTERFACE,
                    symbol_flags::INTERFACE_EXCLUDES,
                );
                self.bind_type_parameters(arena, TableRef::Members(sym), sym, &iface.type_parameters);
                for &heritage in &iface.extends {
                    self.bind_node(arena, heritage);
                }
                self.bind_type_members(arena, sym, &iface.members);
            }
            NodeKind::TypeAliasDeclaration(alias) => {
                if let Some(name) = arena.identifier_text(alias.name) {
                    self.declare_module_member(
                        arena,
                        idx,
                        name,
                        symbol_flags::TYPE_ALIAS,
                        symbol_flags::TYPE_ALIAS_EXCLUDES,
                    );
                }
                let saved = self.enter_container(idx);
                self.bind_type_parameters(arena, TableRef::Locals(idx), SymbolId::NONE, &alias.type_parameters);
                self.bind_node(arena, alias.type_node);
                self.restore_container(saved);
            }
            NodeKind::EnumDeclaration(decl) => {
                let Some(name) = arena.identifier_text(decl.name) else {
                    return;
                };
                let (includes, excludes) = if node.has_flag(node_flags::CONST) {
                    (symbol_flags::CONST_ENUM, symbol_flags::CONST_ENUM_EXCLUDES)
                } else {
                    (symbol_flags::REGULAR_ENUM, symbol_flags::REGULAR_ENUM_EXCLUDES)
                };
                let sym = self.declare_module_member(arena, idx, name, includes, excludes);
                for &member in &decl.members {
                    if let Some(member_name) = arena.declaration_name_text(member) {
                        self.declare_symbol(
                            arena,
                            TableRef::Exports(sym),
                            sym,
                            member,
                            &member_name,
                            symbol_flags::ENUM_MEMBER,
                            symbol_flags::ENUM_MEMBER_EXCLUDES,
                        );
                    }
                    self.bind_node(arena, arena.initializer_of(member));
                }
            }
            NodeKind::ModuleDeclaration(module) => self.bind_module_declaration(arena, idx, node, module),
            NodeKind::ImportEqualsDeclaration(decl) => {
                if let Some(name) = arena.identifier_text(decl.name) {
                    self.declare_module_member(
                        arena,
                        idx,
                        name,
                        symbol_flags::ALIAS,
                        symbol_flags::ALIAS_EXCLUDES,
                    );
                }
            }
            NodeKind::ImportDeclaration(decl) => self.bind_import_declaration(arena, idx, decl),
            NodeKind::ExportDeclaration(decl) => self.bind_export_declaration(arena, idx, decl),
            NodeKind::ExportAssignment(assign) => {
                if self.container_symbol.is_some() {
                    let name = if assign.is_export_equals {
                        internal_names::EXPORT_EQUALS
                    } else {
                        internal_names::DEFAULT
                    };
                    let flags = if is_entity_name_expression(arena, assign.expression) {
                        symbol_flags::ALIAS
                    } else {
                        symbol_flags::PROPERTY
                    };
                    let container_symbol = self.container_symbol;
                    self.declare_symbol(
                        arena,
                        TableRef::Exports(container_symbol),
                        container_symbol,
                        idx,
                        name,
                        flags,
                        symbol_flags::ALL,
                    );
                }
                self.bind_node(arena, assign.expression);
            }
            NodeKind::ObjectLiteralExpression(lit) => {
                let sym = self.create_detached_symbol(
                    idx,
                    internal_names::OBJECT,
                    symbol_flags::OBJECT_LITERAL,
                    SymbolId::NONE,
                );
                for &prop in &lit.properties {
                    if let Some(name) = arena.declaration_name_text(prop) {
                        self.declare_symbol(
                            arena,
                            TableRef::Members(sym),
                            sym,
                            prop,
                            &name,
                            symbol_flags::PROPERTY,
                            symbol_flags::PROPERTY_EXCLUDES,
                        );
                    }
                    self.bind_node(arena, arena.initializer_of(prop));
                }
            }
            NodeKind::ArrowFunction(func) | NodeKind::FunctionExpression(func) => {
                self.create_detached_symbol(
                    idx,
                    internal_names::FUNCTION,
                    symbol_flags::FUNCTION,
                    SymbolId::NONE,
                );
                self.bind_function_like(arena, idx, func);
            }
            NodeKind::TypeLiteral(lit) => {
                let sym = self.create_detached_symbol(
                    idx,
                    internal_names::TYPE,
                    symbol_flags::TYPE_LITERAL,
                    SymbolId::NONE,
                );
                self.bind_type_members(arena, sym, &lit.members);
            }
            NodeKind::FunctionType(func) | NodeKind::ConstructorType(func) => {
                let sig_name = if matches!(node.kind, NodeKind::FunctionType(_)) {
                    internal_names::CALL
                } else {
                    internal_names::NEW
                };
                let sig = self.create_detached_symbol(idx, sig_name, symbol_flags::SIGNATURE, SymbolId::NONE);
                let type_literal = self.create_detached_symbol(
                    idx,
                    internal_names::TYPE,
                    symbol_flags::TYPE_LITERAL,
                    SymbolId::NONE,
                );
                if let Some(s) = self.symbols.get_mut(sig) {
                    s.parent = type_literal;
                }
                if let Some(members) = self.table_mut(TableRef::Members(type_literal)) {
                    members.insert(sig_name.to_string(), sig);
                }
                self.bind_function_like(arena, idx, func);
            }
            NodeKind::MappedType(mapped) => {
                self.create_detached_symbol(
                    idx,
                    internal_names::TYPE,
                    symbol_flags::TYPE_LITERAL,
                    SymbolId::NONE,
                );
                let saved = self.enter_container(idx);
                self.bind_type_parameters(
                    arena,
                    TableRef::Locals(idx),
                    SymbolId::NONE,
                    std::slice::from_ref(&mapped.type_parameter),
                );
                self.bind_node(arena, mapped.name_type);
                self.bind_node(arena, mapped.type_node);
                self.restore_container(saved);
            }
            _ => {
                for child in arena.children(idx) {
                    self.bind_node(arena, child);
                }
            }
        }
    }

    // =========================================================================
    // Containers
    // =========================================================================

    fn enter_container(&mut self, idx: NodeIndex) -> (NodeIndex, SymbolId, bool) {
        let saved = (self.container, self.container_symbol, self.implicit_exports);
        self.container = idx;
        self.container_symbol = SymbolId::NONE;
        self.implicit_exports = false;
        self.locals.entry(idx).or_default();
        saved
    }

    fn restore_container(&mut self, saved: (NodeIndex, SymbolId, bool)) {
        (self.container, self.container_symbol, self.implicit_exports) = saved;
    }

    /// Declare a member of the current module-like container: exported
    /// declarations go to the container symbol's exports (and are mirrored
    /// into locals), everything else to locals.
    fn declare_module_member(
        &mut self,
        arena: &NodeArena,
        idx: NodeIndex,
        name: &str,
        includes: u32,
        excludes: u32,
    ) -> SymbolId {
        let flags = arena.flags(idx);
        let exported = flags & node_flags::EXPORT != 0 || self.implicit_exports;
        let container_symbol = self.container_symbol;
        if container_symbol.is_some() && exported {
            let is_default = flags & node_flags::DEFAULT != 0;
            let export_name = if is_default { internal_names::DEFAULT } else { name };
            let sym = self.declare_symbol(
                arena,
                TableRef::Exports(container_symbol),
                container_symbol,
                idx,
                export_name,
                includes,
                excludes,
            );
            let container = self.container;
            self.locals
                .entry(container)
                .or_default()
                .entry(name.to_string())
                .or_insert(sym);
            sym
        } else {
            let container = self.container;
            self.declare_symbol(
                arena,
                TableRef::Locals(container),
                SymbolId::NONE,
                idx,
                name,
                includes,
                excludes,
            )
        }
    }

    fn bind_type_parameters(
        &mut self,
        arena: &NodeArena,
        table: TableRef,
        parent: SymbolId,
        type_parameters: &[NodeIndex],
    ) {
        for &tp in type_parameters {
            let Some(data) = arena.get_type_parameter(tp) else {
                continue;
            };
            if let Some(name) = arena.identifier_text(data.name) {
                self.declare_symbol(
                    arena,
                    table,
                    parent,
                    tp,
                    name,
                    symbol_flags::TYPE_PARAMETER,
                    symbol_flags::TYPE_PARAMETER_EXCLUDES,
                );
            }
            self.bind_node(arena, data.constraint);
            self.bind_node(arena, data.default);
        }
    }

    fn bind_function_like(&mut self, arena: &NodeArena, idx: NodeIndex, func: &FunctionData) {
        let saved = self.enter_container(idx);
        self.bind_type_parameters(arena, TableRef::Locals(idx), SymbolId::NONE, &func.type_parameters);
        for &param in &func.parameters {
            let Some(data) = arena.get_parameter(param) else {
                continue;
            };
            if let Some(name) = arena.identifier_text(data.name) {
                let mut includes = symbol_flags::FUNCTION_SCOPED_VARIABLE;
                if data.question_token {
                    includes |= symbol_flags::OPTIONAL;
                }
                self.declare_symbol(
                    arena,
                    TableRef::Locals(idx),
                    SymbolId::NONE,
                    param,
                    name,
                    includes,
                    symbol_flags::PARAMETER_EXCLUDES,
                );
            }
            self.bind_node(arena, data.type_annotation);
            self.bind_node(arena, data.initializer);
        }
        self.bind_node(arena, func.return_type);
        match &func.body {
            FunctionBody::None => {}
            FunctionBody::Block(statements) => {
                for &stmt in statements {
                    self.bind_node(arena, stmt);
                }
            }
            FunctionBody::Expression(expr) => self.bind_node(arena, *expr),
        }
        self.restore_container(saved);
    }

    fn bind_class(&mut self, arena: &NodeArena, idx: NodeIndex, class: &ClassData) {
        let name = arena.identifier_text(class.name).unwrap_or(internal_names::DEFAULT);
        let sym = self.declare_module_member(
            arena,
            idx,
            name,
            symbol_flags::CLASS,
            symbol_flags::CLASS_EXCLUDES,
        );
        let has_prototype = self
            .symbols
            .get(sym)
            .and_then(|s| s.exports.as_ref())
            .is_some_and(|e| e.contains_key("prototype"));
        if !has_prototype {
            let proto = self.symbols.alloc(
                symbol_flags::PROPERTY | symbol_flags::PROTOTYPE,
                "prototype".to_string(),
            );
            if let Some(p) = self.symbols.get_mut(proto) {
                p.parent = sym;
            }
            if let Some(exports) = self.table_mut(TableRef::Exports(sym)) {
                exports.insert("prototype".to_string(), proto);
            }
        }
        self.bind_type_parameters(arena, TableRef::Members(sym), sym, &class.type_parameters);
        self.bind_node(arena, class.extends);
        for &implemented in &class.implements {
            self.bind_node(arena, implemented);
        }
        for &member in &class.members {
            let Some(node) = arena.get(member) else {
                continue;
            };
            let table = if node.has_flag(node_flags::STATIC) {
                TableRef::Exports(sym)
            } else {
                TableRef::Members(sym)
            };
            match &node.kind {
                NodeKind::PropertyDeclaration(prop) => {
                    if let Some(name) = arena.property_name_text(prop.name) {
                        let mut includes = symbol_flags::PROPERTY;
                        if prop.question_token {
                            includes |= symbol_flags::OPTIONAL;
                        }
                        self.declare_symbol(
                            arena,
                            table,
                            sym,
                            member,
                            &name,
                            includes,
                            symbol_flags::PROPERTY_EXCLUDES,
                        );
                    }
                    self.bind_node(arena, prop.type_annotation);
                    self.bind_node(arena, prop.initializer);
                }
                NodeKind::MethodDeclaration(method) => {
                    if let Some(name) = arena.property_name_text(method.name) {
                        let mut includes = symbol_flags::METHOD;
                        if method.question_token {
                            includes |= symbol_flags::OPTIONAL;
                        }
                        self.declare_symbol(
                            arena,
                            table,
                            sym,
                            member,
                            &name,
                            includes,
                            symbol_flags::METHOD_EXCLUDES,
                        );
                    }
                    self.bind_function_like(arena, member, method);
                }
                NodeKind::Constructor(ctor) => {
                    self.declare_symbol(
                        arena,
                        TableRef::Members(sym),
                        sym,
                        member,
                        internal_names::CONSTRUCTOR,
                        symbol_flags::CONSTRUCTOR,
                        symbol_flags::NONE,
                    );
                    self.bind_function_like(arena, member, ctor);
                }
                NodeKind::IndexSignature(_) => {
                    self.declare_symbol(
                        arena,
                        table,
                        sym,
                        member,
                        internal_names::INDEX,
                        symbol_flags::SIGNATURE,
                        symbol_flags::NONE,
                    );
                    self.bind_node_children(arena, member);
                }
                _ => self.bind_node(arena, member),
            }
        }
    }

    /// Members of interfaces and type literals.
    fn bind_type_members(&mut self, arena: &NodeArena, sym: SymbolId, members: &[NodeIndex]) {
        for &member in members {
            let Some(node) = arena.get(member) else {
                continue;
            };
            match &node.kind {
                NodeKind::PropertySignature(prop) => {
                    if let Some(name) = arena.property_name_text(prop.name) {
                        let mut includes = symbol_flags::PROPERTY;
                        if prop.question_token {
                            includes |= symbol_flags::OPTIONAL;
                        }
                        self.declare_symbol(
                            arena,
                            TableRef::Members(sym),
                            sym,
                            member,
                            &name,
                            includes,
                            symbol_flags::PROPERTY_EXCLUDES,
                        );
                    }
                    self.bind_node(arena, prop.type_annotation);
                }
                NodeKind::MethodSignature(method) => {
                    if let Some(name) = arena.property_name_text(method.name) {
                        let mut includes = symbol_flags::METHOD;
                        if method.question_token {
                            includes |= symbol_flags::OPTIONAL;
                        }
                        self.declare_symbol(
                            arena,
                            TableRef::Members(sym),
                            sym,
                            member,
                            &name,
                            includes,
                            symbol_flags::METHOD_EXCLUDES,
                        );
                    }
                    self.bind_function_like(arena, member, method);
                }
                NodeKind::CallSignature(sig) | NodeKind::ConstructSignature(sig) => {
                    let name = if matches!(node.kind, NodeKind::CallSignature(_)) {
                        internal_names::CALL
                    } else {
                        internal_names::NEW
                    };
                    self.declare_symbol(
                        arena,
                        TableRef::Members(sym),
                        sym,
                        member,
                        name,
                        symbol_flags::SIGNATURE,
                        symbol_flags::NONE,
                    );
                    self.bind_function_like(arena, member, sig);
                }
                NodeKind::IndexSignature(_) => {
                    self.declare_symbol(
                        arena,
                        TableRef::Members(sym),
                        sym,
                        member,
                        internal_names::INDEX,
                        symbol_flags::SIGNATURE,
                        symbol_flags::NONE,
                    );
                    self.bind_node_children(arena, member);
                }
                _ => self.bind_node(arena, member),
            }
        }
    }

    fn bind_node_children(&mut self, arena: &NodeArena, idx: NodeIndex) {
        for child in arena.children(idx) {
            self.bind_node(arena, child);
        }
    }

    // =========================================================================
    // Modules
    // =========================================================================

    fn bind_module_declaration(&mut self, arena: &NodeArena, idx: NodeIndex, node: &Node, module: &ModuleData) {
        let is_global = node.has_flag(node_flags::GLOBAL_AUGMENTATION);
        let string_name = match arena.kind(module.name) {
            Some(NodeKind::StringLiteral(lit)) => Some(lit.text.clone()),
            _ => None,
        };
        let sym = if is_global {
            let sym = self.create_detached_symbol(
                idx,
                internal_names::GLOBAL,
                symbol_flags::VALUE_MODULE,
                SymbolId::NONE,
            );
            self.module_augmentations.push(idx);
            sym
        } else if let Some(text) = string_name {
            let name = format!("\"{text}\"");
            if self.is_external_module {
                let sym = self.create_detached_symbol(idx, &name, symbol_flags::VALUE_MODULE, SymbolId::NONE);
                self.module_augmentations.push(idx);
                sym
            } else {
                let container = self.container;
                self.declare_symbol(
                    arena,
                    TableRef::Locals(container),
                    SymbolId::NONE,
                    idx,
                    &name,
                    symbol_flags::VALUE_MODULE,
                    symbol_flags::VALUE_MODULE_EXCLUDES,
                )
            }
        } else {
            let Some(name) = arena.identifier_text(module.name) else {
                return;
            };
            let (includes, excludes) = if is_instantiated_module(arena, &module.body) {
                (symbol_flags::VALUE_MODULE, symbol_flags::VALUE_MODULE_EXCLUDES)
            } else {
                (
                    symbol_flags::NAMESPACE_MODULE,
                    symbol_flags::NAMESPACE_MODULE_EXCLUDES,
                )
            };
            self.declare_module_member(arena, idx, name, includes, excludes)
        };
        if let Some(s) = self.symbols.get_mut(sym) {
            s.exports.get_or_insert_with(Default::default);
        }

        let ambient = node.has_flag(node_flags::AMBIENT) || self.implicit_exports;
        let saved = self.enter_container(idx);
        self.container_symbol = sym;
        self.implicit_exports = ambient && !has_explicit_exports(arena, &module.body);
        for &stmt in &module.body {
            self.bind_node(arena, stmt);
        }
        self.restore_container(saved);
    }

    fn bind_import_declaration(&mut self, arena: &NodeArena, idx: NodeIndex, decl: &ImportDeclData) {
        let type_only = arena.has_flag(idx, node_flags::TYPE_ONLY);
        let Some(NodeKind::ImportClause(clause)) = arena.kind(decl.import_clause) else {
            return;
        };
        let mut aliases: Vec<(NodeIndex, NodeIndex)> = Vec::new();
        if clause.name.is_some() {
            aliases.push((decl.import_clause, clause.name));
        }
        match arena.kind(clause.named_bindings) {
            Some(NodeKind::NamespaceImport(ns)) => aliases.push((clause.named_bindings, ns.name)),
            Some(NodeKind::NamedImports(named)) => {
                for &spec in &named.elements {
                    if let Some(NodeKind::ImportSpecifier(s)) = arena.kind(spec) {
                        aliases.push((spec, s.name));
                    }
                }
            }
            _ => {}
        }
        let container = self.container;
        for (decl_node, name_node) in aliases {
            let Some(name) = arena.identifier_text(name_node) else {
                continue;
            };
            let sym = self.declare_symbol(
                arena,
                TableRef::Locals(container),
                SymbolId::NONE,
                decl_node,
                name,
                symbol_flags::ALIAS,
                symbol_flags::ALIAS_EXCLUDES,
            );
            if type_only && let Some(s) = self.symbols.get_mut(sym) {
                s.is_type_only = true;
            }
        }
    }

    fn bind_export_declaration(&mut self, arena: &NodeArena, idx: NodeIndex, decl: &ExportDeclData) {
        let container_symbol = self.container_symbol;
        if container_symbol.is_none() {
            return;
        }
        let type_only = arena.has_flag(idx, node_flags::TYPE_ONLY);
        match arena.kind(decl.export_clause) {
            None => {
                self.declare_symbol(
                    arena,
                    TableRef::Exports(container_symbol),
                    container_symbol,
                    idx,
                    internal_names::EXPORT_STAR,
                    symbol_flags::EXPORT_STAR,
                    symbol_flags::NONE,
                );
            }
            Some(NodeKind::NamespaceExport(ns)) => {
                if let Some(name) = arena.identifier_text(ns.name) {
                    self.declare_symbol(
                        arena,
                        TableRef::Exports(container_symbol),
                        container_symbol,
                        decl.export_clause,
                        name,
                        symbol_flags::ALIAS,
                        symbol_flags::ALIAS_EXCLUDES,
                    );
                }
            }
            Some(NodeKind::NamedExports(named)) => {
                for &spec in &named.elements {
                    let Some(NodeKind::ExportSpecifier(s)) = arena.kind(spec) else {
                        continue;
                    };
                    let Some(name) = arena.identifier_text(s.name) else {
                        continue;
                    };
                    let sym = self.declare_symbol(
                        arena,
                        TableRef::Exports(container_symbol),
                        container_symbol,
                        spec,
                        name,
                        symbol_flags::ALIAS,
                        symbol_flags::ALIAS_EXCLUDES,
                    );
                    if type_only && let Some(sym) = self.symbols.get_mut(sym) {
                        sym.is_type_only = true;
                    }
                }
            }
            Some(_) => {}
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn is_external_module(arena: &NodeArena, statements: &[NodeIndex]) -> bool {
    statements.iter().any(|&stmt| {
        let Some(node) = arena.get(stmt) else {
            return false;
        };
        if node.has_flag(node_flags::EXPORT) {
            return true;
        }
        match &node.kind {
            NodeKind::ImportDeclaration(_)
            | NodeKind::ExportDeclaration(_)
            | NodeKind::ExportAssignment(_) => true,
            NodeKind::ImportEqualsDeclaration(decl) => matches!(
                arena.kind(decl.module_reference),
                Some(NodeKind::ExternalModuleReference(_))
            ),
            _ => false,
        }
    })
}

fn has_explicit_exports(arena: &NodeArena, statements: &[NodeIndex]) -> bool {
    statements.iter().any(|&stmt| {
        arena.has_flag(stmt, node_flags::EXPORT)
            || matches!(
                arena.kind(stmt),
                Some(NodeKind::ExportDeclaration(_)) | Some(NodeKind::ExportAssignment(_))
            )
    })
}

/// A namespace is instantiated when its body declares any value.
fn is_instantiated_module(arena: &NodeArena, statements: &[NodeIndex]) -> bool {
    statements.iter().any(|&stmt| {
        let Some(node) = arena.get(stmt) else {
            return false;
        };
        match &node.kind {
            NodeKind::InterfaceDeclaration(_)
            | NodeKind::TypeAliasDeclaration(_)
            | NodeKind::ExportDeclaration(_) => false,
            NodeKind::ImportEqualsDeclaration(_) => node.has_flag(node_flags::EXPORT),
            NodeKind::EnumDeclaration(_) => !node.has_flag(node_flags::CONST),
            NodeKind::ModuleDeclaration(module) => is_instantiated_module(arena, &module.body),
            _ => true,
        }
    })
}

fn is_entity_name_expression(arena: &NodeArena, idx: NodeIndex) -> bool {
    match arena.kind(idx) {
        Some(NodeKind::Identifier(_)) | Some(NodeKind::QualifiedName(_)) => true,
        Some(NodeKind::PropertyAccessExpression(access)) => {
            is_entity_name_expression(arena, access.expression)
        }
        _ => false,
    }
}

/// File name without directory-independent source extensions.
pub fn strip_extension(file_name: &str) -> &str {
    for ext in [".d.ts", ".tsx", ".ts", ".js"] {
        if let Some(stripped) = file_name.strip_suffix(ext) {
            return stripped;
        }
    }
    file_name
}
