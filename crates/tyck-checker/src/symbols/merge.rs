//! Declaration merging across files and module augmentations.
//!
//! Bound symbols are immutable. Merging clones the target into a transient
//! symbol, records the redirect from every merged-in symbol, and mutates the
//! clone. Everything downstream looks symbols up through
//! `get_merged_symbol`.

use tracing::{debug, trace};
use tyck_binder::{NodeIndex, NodeKind, SymbolId, SymbolTable, node_flags, symbol_flags};
use tyck_common::diagnostics::diagnostic_codes;
use tyck_common::limits::MAX_RELATED_DECLARATIONS;

use crate::state::CheckerState;
use crate::symbols::links::CheckFlags;

/// A symbol table the checker may write to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SymbolTableRef {
    Globals,
    /// Members of a transient symbol.
    Members(SymbolId),
    /// Exports of a transient symbol.
    Exports(SymbolId),
}

impl<'a> CheckerState<'a> {
    /// Build the global scope: script locals, then `declare global` blocks,
    /// then augmentations of external modules.
    pub(crate) fn initialize_type_checker(&mut self) {
        let program = self.ctx.program;
        for file in program.file_ids() {
            let Some(info) = program.file(file) else {
                continue;
            };
            if info.is_external_module {
                continue;
            }
            if let Some(locals) = program.file_locals(file) {
                let locals = locals.clone();
                self.merge_symbol_table(SymbolTableRef::Globals, &locals, false, SymbolId::NONE);
            }
        }

        let augmentations = program.binder.module_augmentations.clone();
        for &augmentation in &augmentations {
            if program.arena.has_flag(augmentation, node_flags::GLOBAL_AUGMENTATION) {
                self.merge_module_augmentation(augmentation);
            }
        }
        for &augmentation in &augmentations {
            if !program.arena.has_flag(augmentation, node_flags::GLOBAL_AUGMENTATION) {
                self.merge_module_augmentation(augmentation);
            }
        }
        debug!(augmentations = augmentations.len(), "global scope merged");
    }

    fn merge_module_augmentation(&mut self, declaration: NodeIndex) {
        let Some(augmentation) = self.ctx.program.binder.get_node_symbol(declaration) else {
            return;
        };
        if self.ctx.arena.has_flag(declaration, node_flags::GLOBAL_AUGMENTATION) {
            let exports = self.symbol(augmentation).exports.clone().unwrap_or_default();
            self.merge_symbol_table(SymbolTableRef::Globals, &exports, false, SymbolId::NONE);
            return;
        }

        let Some(module) = self.ctx.arena.get_module(declaration) else {
            return;
        };
        let name_node = module.name;
        let specifier = match self.ctx.arena.kind(name_node) {
            Some(NodeKind::StringLiteral(lit)) => lit.text.clone(),
            _ => return,
        };
        let file_name = self.ctx.program.file_name_of_node(declaration);
        let report_not_found = !file_name.ends_with(".d.ts");
        let Some(main) = self.resolve_external_module_name_worker(declaration, name_node, &specifier, report_not_found, true)
        else {
            return;
        };
        let main = self.resolve_external_module_symbol(main);
        if self.symbol_flags_raw(main) & symbol_flags::NAMESPACE != 0 {
            trace!(specifier = specifier.as_str(), "merging module augmentation");
            self.merge_symbol(main, augmentation, false);
        } else {
            self.error(
                name_node,
                diagnostic_codes::CANNOT_AUGMENT_MODULE_WITH_VALUE_EXPORTS,
                &[&specifier],
            );
        }
    }

    // =========================================================================
    // Tables
    // =========================================================================

    pub(crate) fn table_get(&self, table: SymbolTableRef, name: &str) -> Option<SymbolId> {
        match table {
            SymbolTableRef::Globals => self.ctx.globals.get(name).copied(),
            SymbolTableRef::Members(s) => self.symbol(s).members.as_ref()?.get(name).copied(),
            SymbolTableRef::Exports(s) => self.symbol(s).exports.as_ref()?.get(name).copied(),
        }
    }

    fn table_insert(&mut self, table: SymbolTableRef, name: &str, symbol: SymbolId) {
        let slot = match table {
            SymbolTableRef::Globals => Some(&mut self.ctx.globals),
            SymbolTableRef::Members(s) => self
                .transient_symbol_mut(s)
                .map(|sym| sym.members.get_or_insert_with(SymbolTable::default)),
            SymbolTableRef::Exports(s) => self
                .transient_symbol_mut(s)
                .map(|sym| sym.exports.get_or_insert_with(SymbolTable::default)),
        };
        if let Some(slot) = slot {
            slot.insert(name.to_string(), symbol);
        }
    }

    /// Merge every entry of `source` into `target`. With a `merged_parent`,
    /// merged entries are re-parented to it.
    pub(crate) fn merge_symbol_table(
        &mut self,
        target: SymbolTableRef,
        source: &SymbolTable,
        unidirectional: bool,
        merged_parent: SymbolId,
    ) {
        for (name, &source_symbol) in source {
            let existing = self.table_get(target, name);
            let merged = match existing {
                Some(target_symbol) => self.merge_symbol(target_symbol, source_symbol, unidirectional),
                None => self.get_merged_symbol(source_symbol),
            };
            if merged_parent.is_some()
                && existing.is_some()
                && let Some(sym) = self.transient_symbol_mut(merged)
            {
                sym.parent = merged_parent;
            }
            self.table_insert(target, name, merged);
        }
    }

    /// Merge `source` into `target` and return the symbol that now owns the
    /// merged view. Conflicting declarations are reported and leave `source`
    /// in place.
    pub(crate) fn merge_symbol(&mut self, target: SymbolId, source: SymbolId, unidirectional: bool) -> SymbolId {
        let source_flags = self.symbol_flags_raw(source);
        let mut target = target;
        let target_flags = self.symbol_flags_raw(target);
        let excluded = symbol_flags::get_excluded_symbol_flags(source_flags);
        let either_assignment = (source_flags | target_flags) & symbol_flags::ASSIGNMENT != 0;

        if target_flags & excluded == 0 || either_assignment {
            if source == target {
                return target;
            }
            if !self.is_transient(target) {
                let resolved = self.resolve_symbol(target);
                if resolved == self.ctx.unknown_symbol {
                    return source;
                }
                let resolved_flags = self.symbol_flags_raw(resolved);
                if resolved_flags & excluded == 0 || (source_flags | resolved_flags) & symbol_flags::ASSIGNMENT != 0 {
                    target = self.clone_symbol(resolved);
                } else {
                    self.report_merge_symbol_error(target, source);
                    return source;
                }
            }

            let source_symbol = self.symbol(source).clone();
            if let Some(sym) = self.transient_symbol_mut(target) {
                sym.flags |= source_flags;
                if sym.value_declaration.is_none() && source_symbol.value_declaration.is_some() {
                    sym.value_declaration = source_symbol.value_declaration;
                }
                sym.declarations.extend(source_symbol.declarations.iter().copied());
            }
            if let Some(members) = &source_symbol.members {
                self.merge_symbol_table(SymbolTableRef::Members(target), members, unidirectional, SymbolId::NONE);
            }
            if let Some(exports) = &source_symbol.exports {
                self.merge_symbol_table(SymbolTableRef::Exports(target), exports, unidirectional, target);
            }
            if !unidirectional {
                self.record_merged_symbol(target, source);
            }
        } else if target_flags & symbol_flags::NAMESPACE_MODULE != 0 {
            let first = self.symbol(source).first_declaration();
            let target_name = self.symbol_to_string(target);
            self.error_on_declaration(
                first,
                diagnostic_codes::CANNOT_AUGMENT_MODULE_WITH_VALUE_EXPORTS,
                &[&target_name],
            );
        } else {
            self.report_merge_symbol_error(target, source);
        }
        target
    }

    /// Transient copy of `symbol` that redirects it.
    fn clone_symbol(&mut self, symbol: SymbolId) -> SymbolId {
        let original = self.symbol(symbol).clone();
        let clone = self.create_symbol(original.flags, &original.escaped_name, CheckFlags::MERGED);
        if let Some(sym) = self.transient_symbol_mut(clone) {
            sym.declarations = original.declarations;
            sym.parent = original.parent;
            sym.value_declaration = original.value_declaration;
            sym.members = Some(original.members.unwrap_or_default());
            sym.exports = Some(original.exports.unwrap_or_default());
            sym.is_type_only = original.is_type_only;
        }
        self.record_merged_symbol(clone, symbol);
        clone
    }

    fn record_merged_symbol(&mut self, target: SymbolId, source: SymbolId) {
        self.ctx.merged_symbols.insert(source, target);
    }

    fn report_merge_symbol_error(&mut self, target: SymbolId, source: SymbolId) {
        let either = self.symbol_flags_raw(target) | self.symbol_flags_raw(source);
        let code = if either & symbol_flags::ENUM != 0 {
            diagnostic_codes::ENUM_DECLARATIONS_CAN_ONLY_MERGE
        } else if either & symbol_flags::BLOCK_SCOPED_VARIABLE != 0 {
            diagnostic_codes::CANNOT_REDECLARE_BLOCK_SCOPED_VARIABLE
        } else {
            diagnostic_codes::DUPLICATE_IDENTIFIER
        };
        let name = self.symbol_to_string(source);
        self.add_duplicate_declaration_errors_for_symbols(source, code, &name, target);
        self.add_duplicate_declaration_errors_for_symbols(target, code, &name, source);
    }

    fn add_duplicate_declaration_errors_for_symbols(
        &mut self,
        target: SymbolId,
        code: u32,
        name: &str,
        source: SymbolId,
    ) {
        let related = self.symbol_declarations(source);
        for declaration in self.symbol_declarations(target) {
            self.add_duplicate_declaration_error(declaration, code, name, &related);
        }
    }

    fn add_duplicate_declaration_error(&mut self, node: NodeIndex, code: u32, name: &str, related: &[NodeIndex]) {
        let error_node = self.ctx.arena.error_node(node);
        let index = self.error(error_node, code, &[name]);
        for &related_node in related {
            let adjusted = self.ctx.arena.error_node(related_node);
            if adjusted == error_node {
                continue;
            }
            if self.related_count(index) >= MAX_RELATED_DECLARATIONS
                || self.has_related_at(index, adjusted, diagnostic_codes::WAS_ALSO_DECLARED_HERE, &[name])
                || self.has_related_at(index, adjusted, diagnostic_codes::AND_HERE, &[])
            {
                continue;
            }
            if self.related_count(index) == 0 {
                self.add_related(index, adjusted, diagnostic_codes::WAS_ALSO_DECLARED_HERE, &[name]);
            } else {
                self.add_related(index, adjusted, diagnostic_codes::AND_HERE, &[]);
            }
        }
    }

    /// Global symbol by name, after merging.
    pub(crate) fn get_global_symbol(&self, name: &str, meaning: u32) -> Option<SymbolId> {
        let symbol = self.get_merged_symbol(*self.ctx.globals.get(name)?);
        (self.symbol_flags_raw(symbol) & meaning != 0).then_some(symbol)
    }
}

#[cfg(test)]
#[path = "../tests/merge_tests.rs"]
mod tests;
