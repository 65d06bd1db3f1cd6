//! Lexical name resolution and entity-name resolution.

use tracing::trace;
use tyck_binder::{NodeIndex, NodeKind, SymbolId, internal_names, symbol_flags};
use tyck_common::diagnostics::diagnostic_codes;

use crate::error_reporter::get_spelling_suggestion;
use crate::state::CheckerState;

impl<'a> CheckerState<'a> {
    /// Resolve `name` as seen from `location` with the given meaning.
    ///
    /// Walks the enclosing scopes outwards and finishes with the global
    /// scope. When `report_errors` is set, a miss is reported against
    /// `location` with the most specific diagnostic available.
    pub(crate) fn resolve_name(
        &mut self,
        location: NodeIndex,
        name: &str,
        meaning: u32,
        report_errors: bool,
    ) -> Option<SymbolId> {
        if let Some(symbol) = self.lookup_name(location, name, meaning) {
            return Some(symbol);
        }
        if report_errors {
            self.report_unresolved_name(location, name, meaning);
        }
        None
    }

    /// Scope walk without diagnostics.
    fn lookup_name(&mut self, location: NodeIndex, name: &str, meaning: u32) -> Option<SymbolId> {
        let arena = self.ctx.arena;
        let program = self.ctx.program;
        let mut current = location;
        while current.is_some() {
            let Some(kind) = arena.kind(current) else {
                break;
            };
            match kind {
                NodeKind::SourceFile(_) => {
                    let external = program
                        .file_of_node(current)
                        .and_then(|f| program.file(f))
                        .is_some_and(|f| f.is_external_module);
                    if external && let Some(symbol) = self.lookup_in_locals(current, name, meaning) {
                        return Some(symbol);
                    }
                }
                NodeKind::ModuleDeclaration(_) => {
                    if let Some(symbol) = self.lookup_in_locals(current, name, meaning) {
                        return Some(symbol);
                    }
                    if let Some(module) = self.get_symbol_of_node(current)
                        && let Some(symbol) = self.lookup_module_export(module, name, meaning)
                    {
                        return Some(symbol);
                    }
                }
                NodeKind::EnumDeclaration(_) => {
                    if meaning & symbol_flags::ENUM_MEMBER != 0
                        && let Some(enum_symbol) = self.get_symbol_of_node(current)
                        && let Some(member) = self
                            .symbol(enum_symbol)
                            .exports
                            .as_ref()
                            .and_then(|e| e.get(name).copied())
                    {
                        return Some(self.get_merged_symbol(member));
                    }
                }
                NodeKind::ClassDeclaration(_) | NodeKind::InterfaceDeclaration(_) => {
                    if meaning & symbol_flags::TYPE != 0
                        && let Some(owner) = self.get_symbol_of_node(current)
                        && let Some(member) = self
                            .symbol(owner)
                            .members
                            .as_ref()
                            .and_then(|m| m.get(name).copied())
                        && self.symbol_flags_raw(member) & symbol_flags::TYPE_PARAMETER != 0
                    {
                        return Some(member);
                    }
                }
                _ => {
                    if let Some(symbol) = self.lookup_in_locals(current, name, meaning) {
                        return Some(symbol);
                    }
                }
            }
            current = arena.parent(current);
        }

        let global = *self.ctx.globals.get(name)?;
        let global = self.get_merged_symbol(global);
        self.symbol_matches_meaning(global, meaning).then_some(global)
    }

    fn lookup_in_locals(&mut self, container: NodeIndex, name: &str, meaning: u32) -> Option<SymbolId> {
        let symbol = *self.ctx.program.binder.get_locals(container)?.get(name)?;
        let symbol = self.get_merged_symbol(symbol);
        self.symbol_matches_meaning(symbol, meaning).then_some(symbol)
    }

    /// Exports of a merged namespace contributed by its other declarations.
    /// Re-exports and `default` are not in lexical scope.
    fn lookup_module_export(&mut self, module: SymbolId, name: &str, meaning: u32) -> Option<SymbolId> {
        if name == internal_names::DEFAULT {
            return None;
        }
        let symbol = *self.symbol(module).exports.as_ref()?.get(name)?;
        let symbol = self.get_merged_symbol(symbol);
        let is_reexport = self.symbol(symbol).declarations.iter().any(|&d| {
            matches!(
                self.ctx.arena.kind(d),
                Some(NodeKind::ExportSpecifier(_) | NodeKind::NamespaceExport(_))
            )
        });
        if is_reexport {
            return None;
        }
        self.symbol_matches_meaning(symbol, meaning).then_some(symbol)
    }

    /// Whether `symbol` has any of the meanings, looking through aliases.
    /// Type-only aliases never have a value meaning.
    pub(crate) fn symbol_matches_meaning(&mut self, symbol: SymbolId, meaning: u32) -> bool {
        let flags = self.symbol_flags_raw(symbol);
        if flags & meaning != 0 {
            return true;
        }
        if flags & symbol_flags::ALIAS == 0 {
            return false;
        }
        let mut target_flags = self.get_symbol_flags(symbol);
        if self.is_type_only_alias(symbol) {
            target_flags &= !symbol_flags::VALUE;
        }
        target_flags & meaning != 0
    }

    fn report_unresolved_name(&mut self, location: NodeIndex, name: &str, meaning: u32) {
        trace!(name, meaning, "unresolved name");
        if meaning & symbol_flags::VALUE != 0 {
            if let Some(found) = self.lookup_name(location, name, symbol_flags::NAMESPACE_MODULE)
                && self.get_symbol_flags(found) & symbol_flags::VALUE == 0
            {
                self.error(location, diagnostic_codes::CANNOT_USE_NAMESPACE_AS_VALUE, &[name]);
                return;
            }
            if self
                .lookup_name(location, name, symbol_flags::TYPE & !symbol_flags::VALUE)
                .is_some()
            {
                self.error(location, diagnostic_codes::ONLY_REFERS_TO_A_TYPE, &[name]);
                return;
            }
        }
        if meaning & symbol_flags::TYPE != 0 {
            if let Some(found) = self.lookup_name(location, name, symbol_flags::MODULE)
                && self.get_symbol_flags(found) & symbol_flags::TYPE == 0
            {
                self.error(location, diagnostic_codes::CANNOT_USE_NAMESPACE_AS_TYPE, &[name]);
                return;
            }
            if self
                .lookup_name(location, name, symbol_flags::VALUE & !symbol_flags::TYPE)
                .is_some()
            {
                self.error(location, diagnostic_codes::REFERS_TO_A_VALUE_USED_AS_TYPE, &[name]);
                return;
            }
        }
        if meaning == symbol_flags::NAMESPACE {
            self.error(location, diagnostic_codes::CANNOT_FIND_NAMESPACE, &[name]);
            return;
        }

        let candidates = self.names_in_scope(location, meaning);
        match get_spelling_suggestion(name, candidates.iter().map(String::as_str)) {
            Some(suggestion) => {
                self.error(
                    location,
                    diagnostic_codes::CANNOT_FIND_NAME_DID_YOU_MEAN,
                    &[name, &suggestion],
                );
            }
            None => {
                self.error(location, diagnostic_codes::CANNOT_FIND_NAME, &[name]);
            }
        }
    }

    /// Every name visible from `location` with the given meaning.
    fn names_in_scope(&mut self, location: NodeIndex, meaning: u32) -> Vec<String> {
        let arena = self.ctx.arena;
        let mut tables: Vec<(String, SymbolId)> = Vec::new();
        let mut current = location;
        while current.is_some() {
            if let Some(locals) = self.ctx.program.binder.get_locals(current) {
                tables.extend(locals.iter().map(|(n, &s)| (n.clone(), s)));
            }
            current = arena.parent(current);
        }
        tables.extend(self.ctx.globals.iter().map(|(n, &s)| (n.clone(), s)));

        let mut names = Vec::new();
        for (name, symbol) in tables {
            if name.starts_with('"') || name.starts_with("__") || names.contains(&name) {
                continue;
            }
            let symbol = self.get_merged_symbol(symbol);
            if self.symbol_matches_meaning(symbol, meaning) {
                names.push(name);
            }
        }
        names
    }

    /// Resolve an identifier, qualified name or property-access chain.
    ///
    /// Aliases at the end of the chain are followed unless the symbol
    /// already has the requested meaning or `dont_resolve_alias` is set.
    pub fn resolve_entity_name(
        &mut self,
        name: NodeIndex,
        meaning: u32,
        ignore_errors: bool,
        dont_resolve_alias: bool,
    ) -> Option<SymbolId> {
        let arena = self.ctx.arena;
        let symbol = match arena.kind(name)? {
            NodeKind::Identifier(ident) => {
                let text = ident.escaped_text.clone();
                let symbol = self.resolve_name(name, &text, meaning, !ignore_errors)?;
                self.get_merged_symbol(symbol)
            }
            NodeKind::QualifiedName(q) => {
                let (left, right) = (q.left, q.right);
                self.resolve_qualified_name(left, right, meaning, ignore_errors)?
            }
            NodeKind::PropertyAccessExpression(access) => {
                let (left, right) = (access.expression, access.name_or_argument);
                self.resolve_qualified_name(left, right, meaning, ignore_errors)?
            }
            _ => return None,
        };
        if symbol == self.ctx.unknown_symbol {
            return Some(symbol);
        }
        if self.symbol_flags_raw(symbol) & meaning != 0 || dont_resolve_alias {
            Some(symbol)
        } else {
            Some(self.resolve_alias(symbol))
        }
    }

    fn resolve_qualified_name(
        &mut self,
        left: NodeIndex,
        right: NodeIndex,
        meaning: u32,
        ignore_errors: bool,
    ) -> Option<SymbolId> {
        let namespace = self.resolve_entity_name(left, symbol_flags::NAMESPACE, ignore_errors, false)?;
        if namespace == self.ctx.unknown_symbol {
            return Some(namespace);
        }
        let right_text = self.ctx.arena.identifier_text(right)?.to_string();
        let exports = self.get_exports_of_symbol(namespace);
        let found = exports.get(&right_text).map(|&s| self.get_merged_symbol(s));
        if let Some(symbol) = found
            && self.symbol_matches_meaning(symbol, meaning)
        {
            return Some(symbol);
        }
        if !ignore_errors {
            let namespace_name = self.symbol_to_string(namespace);
            self.error(
                right,
                diagnostic_codes::NAMESPACE_HAS_NO_EXPORTED_MEMBER,
                &[&namespace_name, &right_text],
            );
        }
        None
    }
}
