//! Resolved export tables of modules, including `export * from` chains.

use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;
use tyck_binder::{NodeIndex, NodeKind, SymbolId, SymbolTable, internal_names, node_flags, symbol_flags};
use tyck_common::diagnostics::diagnostic_codes;

use crate::state::CheckerState;

/// Star-exported names seen so far: the specifier that first exported a name
/// and the `export *` declarations that tried to export it again.
type ExportCollisions = FxHashMap<String, (String, Vec<NodeIndex>)>;

impl<'a> CheckerState<'a> {
    /// Export table of a module symbol with star exports expanded and the
    /// `export =` target followed.
    pub fn get_exports_of_module(&mut self, module: SymbolId) -> Rc<SymbolTable> {
        let module = self.get_merged_symbol(module);
        if let Some(exports) = self.links_ref(module).and_then(|l| l.resolved_exports.clone()) {
            return exports;
        }
        let (exports, type_only) = self.get_exports_of_module_worker(module);
        let exports = Rc::new(exports);
        let links = self.links(module);
        links.resolved_exports = Some(exports.clone());
        links.type_only_exports = Some(Rc::new(type_only));
        exports
    }

    fn get_exports_of_module_worker(&mut self, module: SymbolId) -> (SymbolTable, FxHashSet<String>) {
        let target = self.resolve_external_module_symbol(module);
        let mut visited: Vec<SymbolId> = Vec::new();
        let mut type_only = FxHashSet::default();
        let exports = self.visit_module_exports(target, false, &mut visited, &mut type_only);
        trace!(module = module.0, count = exports.len(), "module exports resolved");
        (exports, type_only)
    }

    /// Own exports of `symbol` plus everything reachable through its
    /// `export *` declarations. Modules already on `visited` contribute
    /// nothing, which breaks star-export cycles.
    fn visit_module_exports(
        &mut self,
        symbol: SymbolId,
        is_type_only: bool,
        visited: &mut Vec<SymbolId>,
        type_only_names: &mut FxHashSet<String>,
    ) -> SymbolTable {
        if symbol.is_none()
            || symbol == self.ctx.unknown_symbol
            || self.symbol(symbol).exports.is_none()
            || visited.contains(&symbol)
        {
            return SymbolTable::default();
        }
        visited.push(symbol);

        let mut symbols: SymbolTable = self
            .symbol(symbol)
            .exports
            .clone()
            .unwrap_or_default()
            .into_iter()
            .filter(|(name, _)| name != internal_names::EXPORT_STAR)
            .map(|(name, s)| (name, self.get_merged_symbol(s)))
            .collect();
        if is_type_only {
            type_only_names.extend(symbols.keys().cloned());
        }

        let star_declarations = self
            .symbol(symbol)
            .exports
            .as_ref()
            .and_then(|e| e.get(internal_names::EXPORT_STAR).copied())
            .map(|star| self.symbol_declarations(star))
            .unwrap_or_default();
        if star_declarations.is_empty() {
            return symbols;
        }

        let mut nested_symbols = SymbolTable::default();
        let mut collisions: ExportCollisions = FxHashMap::default();
        for node in star_declarations {
            let Some(NodeKind::ExportDeclaration(decl)) = self.ctx.arena.kind(node) else {
                continue;
            };
            let specifier = decl.module_specifier;
            let Some(module) = self.resolve_external_module_name(node, specifier) else {
                continue;
            };
            let resolved = self.resolve_external_module_symbol(module);
            let star_type_only = is_type_only || self.ctx.arena.has_flag(node, node_flags::TYPE_ONLY);
            let exported = self.visit_module_exports(resolved, star_type_only, visited, type_only_names);
            let specifier_text = self.ctx.arena.entity_name_text(specifier);
            extend_export_symbols(&mut nested_symbols, &exported, Some((&mut collisions, &specifier_text, node)));
        }

        for (name, (specifier_text, nodes)) in &collisions {
            if name == internal_names::EXPORT_EQUALS || symbols.contains_key(name) {
                continue;
            }
            for &node in nodes {
                self.error(
                    node,
                    diagnostic_codes::MODULE_HAS_ALREADY_EXPORTED_MEMBER,
                    &[specifier_text, name],
                );
            }
        }
        extend_export_symbols(&mut symbols, &nested_symbols, None);
        symbols
    }

    /// Exports of a module (resolved) or of any other symbol (as bound).
    pub(crate) fn get_exports_of_symbol(&mut self, symbol: SymbolId) -> Rc<SymbolTable> {
        if self.symbol_flags_raw(symbol) & symbol_flags::MODULE != 0 {
            return self.get_exports_of_module(symbol);
        }
        Rc::new(self.symbol(symbol).exports.clone().unwrap_or_default())
    }

    /// Export `name` of a module symbol.
    pub(crate) fn get_export_of_module(
        &mut self,
        module: SymbolId,
        name: &str,
        dont_resolve_alias: bool,
    ) -> Option<SymbolId> {
        if self.symbol_flags_raw(module) & symbol_flags::MODULE == 0 {
            return None;
        }
        let exports = self.get_exports_of_module(module);
        let symbol = self.get_merged_symbol(*exports.get(name)?);
        Some(if dont_resolve_alias { symbol } else { self.resolve_symbol(symbol) })
    }
}

/// Copy `source` into `target`, skipping `default` and names `target`
/// already has. With a collision table, a name arriving from a second star
/// export that resolves to a different symbol is recorded against the
/// declaration that re-exported it.
fn extend_export_symbols(
    target: &mut SymbolTable,
    source: &SymbolTable,
    mut collisions: Option<(&mut ExportCollisions, &String, NodeIndex)>,
) {
    for (name, &symbol) in source {
        if name == internal_names::DEFAULT {
            continue;
        }
        match target.get(name) {
            None => {
                target.insert(name.clone(), symbol);
                if let Some((table, specifier, _)) = collisions.as_mut() {
                    table
                        .entry(name.clone())
                        .or_insert_with(|| ((*specifier).clone(), Vec::new()));
                }
            }
            Some(&existing) if existing != symbol => {
                if let Some((table, _, node)) = collisions.as_mut()
                    && let Some(entry) = table.get_mut(name)
                {
                    entry.1.push(*node);
                }
            }
            Some(_) => {}
        }
    }
}
