//! Alias resolution: imports, re-exports and `export =` / `export default`.
//!
//! `resolve_alias` follows one declaration at a time and memoizes the final
//! target on the alias's links. While a target is being computed the links
//! hold the resolving sentinel; meeting it again means the alias chain is
//! circular.

use tracing::trace;
use tyck_binder::{NodeIndex, NodeKind, SymbolId, internal_names, node_flags, symbol_flags};
use tyck_common::diagnostics::diagnostic_codes;

use crate::state::CheckerState;

impl<'a> CheckerState<'a> {
    /// Resolve `symbol` if it is an alias, otherwise return it.
    pub(crate) fn resolve_symbol(&mut self, symbol: SymbolId) -> SymbolId {
        if symbol.is_some() && self.symbol_flags_raw(symbol) & symbol_flags::ALIAS != 0 {
            self.resolve_alias(symbol)
        } else {
            symbol
        }
    }

    /// Final target of an alias symbol, or the unknown symbol.
    pub fn resolve_alias(&mut self, symbol: SymbolId) -> SymbolId {
        let resolving = self.ctx.resolving_symbol;
        let unknown = self.ctx.unknown_symbol;
        match self.links(symbol).alias_target {
            Some(target) if target == resolving => {
                self.links(symbol).alias_target = Some(unknown);
                unknown
            }
            Some(target) => target,
            None => {
                self.links(symbol).alias_target = Some(resolving);
                let node = self.get_declaration_of_alias_symbol(symbol);
                let target = self.get_target_of_alias_declaration(node, false);
                if self.links(symbol).alias_target == Some(resolving) {
                    let target = target.map_or(unknown, |t| self.get_merged_symbol(t));
                    self.links(symbol).alias_target = Some(target);
                    trace!(alias = symbol.0, target = target.0, "alias resolved");
                    target
                } else {
                    let name = self.symbol_to_string(symbol);
                    self.error_on_declaration(
                        node,
                        diagnostic_codes::CIRCULAR_DEFINITION_OF_IMPORT_ALIAS,
                        &[&name],
                    );
                    self.links(symbol).alias_target.unwrap_or(unknown)
                }
            }
        }
    }

    /// The declaration an alias symbol was created from.
    ///
    /// # Panics
    ///
    /// Panics when the symbol has no alias declaration; the binder only sets
    /// `ALIAS` on symbols declared by one.
    fn get_declaration_of_alias_symbol(&self, symbol: SymbolId) -> NodeIndex {
        let declarations = &self.symbol(symbol).declarations;
        let found = declarations.iter().rev().copied().find(|&d| {
            matches!(
                self.ctx.arena.kind(d),
                Some(
                    NodeKind::ImportEqualsDeclaration(_)
                        | NodeKind::ImportClause(_)
                        | NodeKind::NamespaceImport(_)
                        | NodeKind::ImportSpecifier(_)
                        | NodeKind::ExportSpecifier(_)
                        | NodeKind::NamespaceExport(_)
                        | NodeKind::ExportAssignment(_)
                )
            )
        });
        match found {
            Some(node) => node,
            None => panic!(
                "alias symbol '{}' has no alias declaration",
                self.symbol(symbol).escaped_name
            ),
        }
    }

    /// Immediate target of one alias declaration.
    pub(crate) fn get_target_of_alias_declaration(
        &mut self,
        node: NodeIndex,
        dont_resolve_alias: bool,
    ) -> Option<SymbolId> {
        let arena = self.ctx.arena;
        match arena.kind(node)? {
            NodeKind::ImportEqualsDeclaration(data) => {
                let reference = data.module_reference;
                if let Some(NodeKind::ExternalModuleReference(ext)) = arena.kind(reference) {
                    let module = self.resolve_external_module_name(node, ext.expression)?;
                    Some(self.resolve_external_module_symbol(module))
                } else {
                    self.resolve_entity_name(
                        reference,
                        symbol_flags::VALUE | symbol_flags::TYPE | symbol_flags::NAMESPACE,
                        false,
                        dont_resolve_alias,
                    )
                }
            }
            NodeKind::ImportClause(_) => self.get_target_of_import_clause(node, dont_resolve_alias),
            NodeKind::NamespaceImport(_) | NodeKind::NamespaceExport(_) => {
                let (declaration, specifier) = self.enclosing_module_specifier(node)?;
                let module = self.resolve_external_module_name(declaration, specifier)?;
                Some(self.resolve_external_module_symbol(module))
            }
            NodeKind::ImportSpecifier(spec) => {
                let name = if spec.property_name.is_some() { spec.property_name } else { spec.name };
                self.get_external_module_member(node, name, dont_resolve_alias)
            }
            NodeKind::ExportSpecifier(spec) => {
                let name = if spec.property_name.is_some() { spec.property_name } else { spec.name };
                let has_specifier = self
                    .enclosing_module_specifier(node)
                    .is_some_and(|(_, s)| s.is_some());
                if has_specifier {
                    self.get_external_module_member(node, name, dont_resolve_alias)
                } else {
                    self.resolve_entity_name(
                        name,
                        symbol_flags::VALUE | symbol_flags::TYPE | symbol_flags::NAMESPACE,
                        false,
                        dont_resolve_alias,
                    )
                }
            }
            NodeKind::ExportAssignment(data) => self.resolve_entity_name(
                data.expression,
                symbol_flags::VALUE | symbol_flags::TYPE | symbol_flags::NAMESPACE,
                true,
                dont_resolve_alias,
            ),
            _ => None,
        }
    }

    fn get_target_of_import_clause(&mut self, node: NodeIndex, dont_resolve_alias: bool) -> Option<SymbolId> {
        let (declaration, specifier) = self.enclosing_module_specifier(node)?;
        let module = self.resolve_external_module_name(declaration, specifier)?;
        let exports = self.get_exports_of_symbol(module);
        if let Some(&default) = exports.get(internal_names::DEFAULT) {
            let default = self.get_merged_symbol(default);
            return Some(if dont_resolve_alias { default } else { self.resolve_symbol(default) });
        }
        if exports.contains_key(internal_names::EXPORT_EQUALS) {
            return Some(self.resolve_external_module_symbol(module));
        }
        let module_name = self.symbol_to_string(module);
        self.error_on_declaration(node, diagnostic_codes::MODULE_HAS_NO_DEFAULT_EXPORT, &[&module_name]);
        None
    }

    /// Resolve `name` exported by the module of an import or export
    /// specifier.
    fn get_external_module_member(
        &mut self,
        specifier_node: NodeIndex,
        name_node: NodeIndex,
        dont_resolve_alias: bool,
    ) -> Option<SymbolId> {
        let (declaration, specifier) = self.enclosing_module_specifier(specifier_node)?;
        let module = self.resolve_external_module_name(declaration, specifier)?;
        let name = self.ctx.arena.property_name_text(name_node)?;
        let target = self.resolve_external_module_symbol(module);
        if target == self.ctx.unknown_symbol {
            return Some(target);
        }

        let from_module = self.get_export_of_module(target, &name, dont_resolve_alias);
        let has_export_equals = self
            .symbol(module)
            .exports
            .as_ref()
            .is_some_and(|e| e.contains_key(internal_names::EXPORT_EQUALS));
        let from_variable = if from_module.is_none() && has_export_equals {
            let ty = self.get_type_of_symbol(target);
            self.get_property_of_type(ty, &name)
        } else {
            None
        };
        let symbol = from_module.or(from_variable);
        if symbol.is_none() {
            let module_name = self.ctx.arena.entity_name_text(specifier);
            self.error(
                name_node,
                diagnostic_codes::MODULE_HAS_NO_EXPORTED_MEMBER,
                &[&module_name, &name],
            );
        }
        symbol
    }

    /// Enclosing import or export declaration of an alias node and its module
    /// specifier (NONE for a local `export { }`).
    pub(crate) fn enclosing_module_specifier(&self, node: NodeIndex) -> Option<(NodeIndex, NodeIndex)> {
        let arena = self.ctx.arena;
        let mut current = node;
        while current.is_some() {
            match arena.kind(current)? {
                NodeKind::ImportDeclaration(d) => return Some((current, d.module_specifier)),
                NodeKind::ExportDeclaration(d) => return Some((current, d.module_specifier)),
                NodeKind::SourceFile(_) => return None,
                _ => current = arena.parent(current),
            }
        }
        None
    }

    // =========================================================================
    // External modules
    // =========================================================================

    /// Module symbol for the string literal `specifier` used at `location`.
    pub(crate) fn resolve_external_module_name(
        &mut self,
        location: NodeIndex,
        specifier: NodeIndex,
    ) -> Option<SymbolId> {
        let text = match self.ctx.arena.kind(specifier)? {
            NodeKind::StringLiteral(lit) => lit.text.clone(),
            _ => return None,
        };
        self.resolve_external_module_name_worker(location, specifier, &text, true, false)
    }

    pub(crate) fn resolve_external_module_name_worker(
        &mut self,
        location: NodeIndex,
        error_node: NodeIndex,
        specifier: &str,
        report_errors: bool,
        is_for_augmentation: bool,
    ) -> Option<SymbolId> {
        let is_relative = specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/');
        if !is_relative
            && let Some(ambient) = self.get_global_symbol(&format!("\"{specifier}\""), symbol_flags::VALUE_MODULE)
        {
            return Some(ambient);
        }

        let program = self.ctx.program;
        let resolved = program
            .file_of_node(location)
            .and_then(|file| program.resolve_module_name(file, specifier));
        if let Some(file) = resolved {
            if let Some(symbol) = program.file_symbol(file) {
                return Some(self.get_merged_symbol(symbol));
            }
            if report_errors {
                let file_name = program.file(file).map_or("", |f| f.file_name.as_str());
                self.error(error_node, diagnostic_codes::FILE_IS_NOT_A_MODULE, &[file_name]);
            }
            return None;
        }

        if report_errors {
            let code = if is_for_augmentation {
                diagnostic_codes::INVALID_MODULE_NAME_IN_AUGMENTATION
            } else {
                diagnostic_codes::CANNOT_FIND_MODULE
            };
            self.error(error_node, code, &[specifier]);
        }
        None
    }

    /// The `export =` target of a module, or the module itself.
    pub(crate) fn resolve_external_module_symbol(&mut self, module: SymbolId) -> SymbolId {
        let export_equals = self
            .symbol(module)
            .exports
            .as_ref()
            .and_then(|e| e.get(internal_names::EXPORT_EQUALS).copied());
        match export_equals {
            Some(export_equals) => {
                let export_equals = self.get_merged_symbol(export_equals);
                let resolved = self.resolve_symbol(export_equals);
                self.get_merged_symbol(resolved)
            }
            None => module,
        }
    }

    // =========================================================================
    // Flags
    // =========================================================================

    /// Flags of a symbol with alias chains folded in. Unresolvable aliases
    /// report every meaning.
    pub(crate) fn get_symbol_flags(&mut self, symbol: SymbolId) -> u32 {
        let mut flags = self.symbol_flags_raw(symbol);
        let mut current = symbol;
        let mut seen: Vec<SymbolId> = Vec::new();
        while self.symbol_flags_raw(current) & symbol_flags::ALIAS != 0 {
            let target = self.resolve_alias(current);
            if target == self.ctx.unknown_symbol {
                return symbol_flags::ALL;
            }
            if target == current || seen.contains(&target) {
                break;
            }
            let target_flags = self.symbol_flags_raw(target);
            if target_flags & symbol_flags::ALIAS != 0 {
                seen.push(target);
            }
            flags |= target_flags;
            current = target;
        }
        flags
    }

    /// True when the symbol, after aliases, has a value meaning.
    pub(crate) fn symbol_is_value(&mut self, symbol: SymbolId) -> bool {
        if self.is_type_only_alias(symbol) {
            return false;
        }
        self.get_symbol_flags(symbol) & symbol_flags::VALUE != 0
    }

    /// True for `import type` / `export type` aliases, and for names that
    /// only reach their module through `export type *`.
    pub(crate) fn is_type_only_alias(&mut self, symbol: SymbolId) -> bool {
        let sym = self.symbol(symbol);
        if sym.flags & symbol_flags::ALIAS == 0 {
            return false;
        }
        if sym.is_type_only {
            return true;
        }
        let declaration = sym.declarations.last().copied().unwrap_or(NodeIndex::NONE);
        if let Some((decl, _)) = self.enclosing_module_specifier(declaration)
            && self.ctx.arena.has_flag(decl, node_flags::TYPE_ONLY)
        {
            return true;
        }
        let Some(NodeKind::ImportSpecifier(spec)) = self.ctx.arena.kind(declaration) else {
            return false;
        };
        let name_node = if spec.property_name.is_some() { spec.property_name } else { spec.name };
        let Some(name) = self.ctx.arena.property_name_text(name_node) else {
            return false;
        };
        let Some((decl, specifier)) = self.enclosing_module_specifier(declaration) else {
            return false;
        };
        let Some(module) = self.resolve_external_module_name(decl, specifier) else {
            return false;
        };
        self.get_exports_of_module(module);
        self.links_ref(module)
            .and_then(|l| l.type_only_exports.as_ref())
            .is_some_and(|names| names.contains(&name))
    }
}
