//! Binder state: symbol storage, per-container locals and declaration
//! bookkeeping shared by every file of a program.

use rustc_hash::FxHashMap;
use tracing::debug;
use tyck_common::diagnostics::{Diagnostic, diagnostic_codes, diagnostic_messages, format_message};
use tyck_common::limits::MAX_RELATED_DECLARATIONS;

use crate::symbols::{Symbol, SymbolArena, SymbolId, SymbolTable, symbol_flags};
use crate::{NodeArena, NodeIndex};

/// Which symbol table a declaration is added to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TableRef {
    Locals(NodeIndex),
    Members(SymbolId),
    Exports(SymbolId),
}

/// Output of binding plus the cursor state used while walking a file.
#[derive(Debug, Default)]
pub struct BinderState {
    /// Arena for symbol storage
    pub symbols: SymbolArena,
    /// Declaration node to symbol mapping
    pub node_symbols: FxHashMap<NodeIndex, SymbolId>,
    /// Locals of every container node (source files, functions, aliases, ...)
    pub locals: FxHashMap<NodeIndex, SymbolTable>,
    /// `declare module "x"` and `declare global` blocks inside external modules.
    pub module_augmentations: Vec<NodeIndex>,
    /// Duplicate-declaration errors found within a single symbol table.
    pub diagnostics: Vec<Diagnostic>,

    // Walk state for the file being bound.
    pub(crate) file_name: String,
    pub(crate) container: NodeIndex,
    pub(crate) container_symbol: SymbolId,
    pub(crate) is_external_module: bool,
    /// Inside an ambient module body with no explicit exports.
    pub(crate) implicit_exports: bool,
}

impl BinderState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get_symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    /// Symbol declared by a declaration node.
    #[inline]
    pub fn get_node_symbol(&self, node: NodeIndex) -> Option<SymbolId> {
        self.node_symbols.get(&node).copied()
    }

    /// Locals table of a container node.
    #[inline]
    pub fn get_locals(&self, container: NodeIndex) -> Option<&SymbolTable> {
        self.locals.get(&container)
    }

    // =========================================================================
    // Declaration
    // =========================================================================

    pub(crate) fn table_mut(&mut self, table: TableRef) -> Option<&mut SymbolTable> {
        match table {
            TableRef::Locals(node) => Some(self.locals.entry(node).or_default()),
            TableRef::Members(sym) => Some(
                self.symbols
                    .get_mut(sym)?
                    .members
                    .get_or_insert_with(SymbolTable::default),
            ),
            TableRef::Exports(sym) => Some(
                self.symbols
                    .get_mut(sym)?
                    .exports
                    .get_or_insert_with(SymbolTable::default),
            ),
        }
    }

    fn table_lookup(&self, table: TableRef, name: &str) -> Option<SymbolId> {
        match table {
            TableRef::Locals(node) => self.locals.get(&node)?.get(name).copied(),
            TableRef::Members(sym) => self.symbols.get(sym)?.members.as_ref()?.get(name).copied(),
            TableRef::Exports(sym) => self.symbols.get(sym)?.exports.as_ref()?.get(name).copied(),
        }
    }

    /// Declare `node` under `name` in `table`.
    ///
    /// An existing symbol whose flags intersect `excludes` is a conflict: the
    /// conflict is reported and the declaration gets a detached symbol.
    pub(crate) fn declare_symbol(
        &mut self,
        arena: &NodeArena,
        table: TableRef,
        parent: SymbolId,
        node: NodeIndex,
        name: &str,
        includes: u32,
        excludes: u32,
    ) -> SymbolId {
        let existing = self.table_lookup(table, name);
        let sym_id = match existing {
            Some(id) => {
                let existing_flags = self.symbols.get(id).map_or(0, |s| s.flags);
                if existing_flags & excludes != 0 {
                    debug!(name, existing_flags, includes, "conflicting declaration");
                    self.report_duplicate(arena, id, node, name, existing_flags, includes);
                    let detached = self.symbols.alloc(symbol_flags::NONE, name.to_string());
                    if let Some(sym) = self.symbols.get_mut(detached) {
                        sym.parent = parent;
                    }
                    detached
                } else {
                    id
                }
            }
            None => {
                let id = self.symbols.alloc(symbol_flags::NONE, name.to_string());
                if let Some(sym) = self.symbols.get_mut(id) {
                    sym.parent = parent;
                }
                if let Some(t) = self.table_mut(table) {
                    t.insert(name.to_string(), id);
                }
                id
            }
        };
        self.add_declaration_to_symbol(sym_id, node, includes);
        sym_id
    }

    pub(crate) fn add_declaration_to_symbol(&mut self, sym_id: SymbolId, node: NodeIndex, flags: u32) {
        if let Some(sym) = self.symbols.get_mut(sym_id) {
            sym.flags |= flags;
            if node.is_some() {
                sym.declarations.push(node);
                if flags & symbol_flags::VALUE != 0 && sym.value_declaration.is_none() {
                    sym.value_declaration = node;
                }
            }
            if flags & (symbol_flags::CLASS | symbol_flags::ENUM | symbol_flags::MODULE) != 0
                && sym.exports.is_none()
            {
                sym.exports = Some(SymbolTable::default());
            }
            if flags
                & (symbol_flags::CLASS
                    | symbol_flags::INTERFACE
                    | symbol_flags::TYPE_LITERAL
                    | symbol_flags::OBJECT_LITERAL)
                != 0
                && sym.members.is_none()
            {
                sym.members = Some(SymbolTable::default());
            }
        }
        if node.is_some() {
            self.node_symbols.insert(node, sym_id);
        }
    }

    /// Allocate a symbol that is not entered in any table.
    pub(crate) fn create_detached_symbol(
        &mut self,
        node: NodeIndex,
        name: &str,
        flags: u32,
        parent: SymbolId,
    ) -> SymbolId {
        let id = self.symbols.alloc(symbol_flags::NONE, name.to_string());
        if let Some(sym) = self.symbols.get_mut(id) {
            sym.parent = parent;
        }
        self.add_declaration_to_symbol(id, node, flags);
        id
    }

    fn report_duplicate(
        &mut self,
        arena: &NodeArena,
        existing: SymbolId,
        node: NodeIndex,
        name: &str,
        existing_flags: u32,
        includes: u32,
    ) {
        let (code, template) = if (existing_flags | includes) & symbol_flags::ENUM != 0 {
            (
                diagnostic_codes::ENUM_DECLARATIONS_CAN_ONLY_MERGE,
                diagnostic_messages::ENUM_DECLARATIONS_CAN_ONLY_MERGE,
            )
        } else if (existing_flags | includes) & symbol_flags::BLOCK_SCOPED_VARIABLE != 0 {
            (
                diagnostic_codes::CANNOT_REDECLARE_BLOCK_SCOPED_VARIABLE,
                diagnostic_messages::CANNOT_REDECLARE_BLOCK_SCOPED_VARIABLE,
            )
        } else {
            (
                diagnostic_codes::DUPLICATE_IDENTIFIER,
                diagnostic_messages::DUPLICATE_IDENTIFIER,
            )
        };
        let mut declarations = self
            .symbols
            .get(existing)
            .map(|s| s.declarations.clone())
            .unwrap_or_default();
        declarations.push(node);
        for &decl in &declarations {
            let error_node = arena.error_node(decl);
            if arena.get(error_node).is_none() {
                continue;
            }
            let span = arena.span(error_node);
            let message = format_message(template, &[name]);
            let mut diag = Diagnostic::error(self.file_name.clone(), span.start, span.len(), message, code);
            let mut related = 0;
            for &other in &declarations {
                if other == decl || related >= MAX_RELATED_DECLARATIONS {
                    continue;
                }
                let other_node = arena.error_node(other);
                if arena.get(other_node).is_none() {
                    continue;
                }
                let other_span = arena.span(other_node);
                let text = if related == 0 {
                    format_message(diagnostic_messages::WAS_ALSO_DECLARED_HERE, &[name])
                } else {
                    diagnostic_messages::AND_HERE.to_string()
                };
                diag = diag.with_related(self.file_name.clone(), other_span.start, other_span.len(), text);
                related += 1;
            }
            if !self
                .diagnostics
                .iter()
                .any(|d| d.same_location_and_message(&diag))
            {
                self.diagnostics.push(diag);
            }
        }
    }
}
