//! Checker state: the `CheckerState` facade, symbol and link access, and the
//! type-resolution stack.
//!
//! Every checking operation is a method on [`CheckerState`], spread across
//! the modules of this crate in `impl<'a> CheckerState<'a>` blocks.

use tracing::{debug, trace};
use tyck_binder::{NodeIndex, Program, Symbol, SymbolId, symbol_flags};
use tyck_common::Diagnostic;
use tyck_common::diagnostics::sort_and_deduplicate_diagnostics;
use tyck_types::{ObjectFlags, Type, TypeFlags, TypeId};

use crate::context::{CheckerContext, CheckerOptions, ResolutionProperty, ResolutionTarget};
use crate::symbols::links::{CheckFlags, NodeLinks, SymbolLinks};

/// Returned for ids that name no symbol.
static UNRESOLVED_SYMBOL: Symbol = Symbol {
    id: SymbolId::NONE,
    flags: symbol_flags::NONE,
    escaped_name: String::new(),
    declarations: Vec::new(),
    value_declaration: NodeIndex::NONE,
    parent: SymbolId::NONE,
    members: None,
    exports: None,
    is_type_only: false,
};

/// The type checker for one bound program.
pub struct CheckerState<'a> {
    pub ctx: CheckerContext<'a>,
}

/// Public name of the checker.
pub type Checker<'a> = CheckerState<'a>;

impl<'a> CheckerState<'a> {
    /// Create a checker and merge the program's global scope.
    pub fn new(program: &'a Program, options: CheckerOptions) -> Self {
        let mut state = Self {
            ctx: CheckerContext::new(program, options),
        };
        state.ctx.unknown_symbol =
            state.create_symbol(symbol_flags::PROPERTY, "unknown", CheckFlags::empty());
        state.ctx.resolving_symbol =
            state.create_symbol(symbol_flags::NONE, "__resolving__", CheckFlags::empty());
        state.initialize_type_checker();
        debug!(
            files = program.files.len(),
            globals = state.ctx.globals.len(),
            "checker initialized"
        );
        state
    }

    // =========================================================================
    // Symbols
    // =========================================================================

    /// Symbol by id: bound symbols first, then transient ones.
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        let bound = self.ctx.program.symbol_count();
        let index = id.0 as usize;
        if index < bound {
            self.ctx.program.symbol(id).unwrap_or(&UNRESOLVED_SYMBOL)
        } else {
            self.ctx
                .transient_symbols
                .get(index.wrapping_sub(bound))
                .unwrap_or(&UNRESOLVED_SYMBOL)
        }
    }

    #[inline]
    pub(crate) fn is_transient(&self, id: SymbolId) -> bool {
        id.is_some() && id.0 as usize >= self.ctx.program.symbol_count()
    }

    /// Mutable access to a transient symbol. Bound symbols are immutable.
    pub(crate) fn transient_symbol_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        let bound = self.ctx.program.symbol_count();
        let index = (id.0 as usize).checked_sub(bound)?;
        self.ctx.transient_symbols.get_mut(index)
    }

    pub(crate) fn create_symbol(
        &mut self,
        flags: u32,
        name: &str,
        check_flags: CheckFlags,
    ) -> SymbolId {
        let id = SymbolId((self.ctx.program.symbol_count() + self.ctx.transient_symbols.len()) as u32);
        self.ctx.transient_symbols.push(Symbol::new(
            id,
            flags | symbol_flags::TRANSIENT,
            name.to_string(),
        ));
        if !check_flags.is_empty() {
            self.links(id).check_flags = check_flags;
        }
        id
    }

    /// Follow merge redirects to the symbol that owns the merged view.
    pub fn get_merged_symbol(&self, id: SymbolId) -> SymbolId {
        let mut current = id;
        while let Some(&next) = self.ctx.merged_symbols.get(&current) {
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    /// Merged symbol declared by a node.
    pub fn get_symbol_of_node(&self, node: NodeIndex) -> Option<SymbolId> {
        self.ctx
            .program
            .binder
            .get_node_symbol(node)
            .map(|s| self.get_merged_symbol(s))
    }

    #[inline]
    pub(crate) fn symbol_flags_raw(&self, id: SymbolId) -> u32 {
        self.symbol(id).flags
    }

    pub(crate) fn symbol_name(&self, id: SymbolId) -> String {
        self.symbol(id).escaped_name.clone()
    }

    pub(crate) fn symbol_declarations(&self, id: SymbolId) -> Vec<NodeIndex> {
        self.symbol(id).declarations.clone()
    }

    /// Name for diagnostics: dotted through namespace parents.
    pub fn symbol_to_string(&self, id: SymbolId) -> String {
        let symbol = self.symbol(id);
        let name = symbol.escaped_name.clone();
        let parent = symbol.parent;
        if parent.is_some()
            && self.symbol_flags_raw(parent) & (symbol_flags::NAMESPACE | symbol_flags::CLASS | symbol_flags::INTERFACE)
                != 0
            && !self.symbol(parent).escaped_name.starts_with('"')
            && self.symbol_flags_raw(id) & symbol_flags::TYPE_PARAMETER == 0
        {
            return format!("{}.{name}", self.symbol_to_string(parent));
        }
        name
    }

    // =========================================================================
    // Links
    // =========================================================================

    pub(crate) fn links(&mut self, id: SymbolId) -> &mut SymbolLinks {
        self.ctx.symbol_links.entry(id).or_default()
    }

    pub(crate) fn links_ref(&self, id: SymbolId) -> Option<&SymbolLinks> {
        self.ctx.symbol_links.get(&id)
    }

    pub(crate) fn check_flags(&self, id: SymbolId) -> CheckFlags {
        self.links_ref(id).map_or(CheckFlags::empty(), |l| l.check_flags)
    }

    pub(crate) fn node_links(&mut self, node: NodeIndex) -> &mut NodeLinks {
        self.ctx.node_links.entry(node).or_default()
    }

    pub(crate) fn node_links_ref(&self, node: NodeIndex) -> Option<&NodeLinks> {
        self.ctx.node_links.get(&node)
    }

    // =========================================================================
    // Types
    // =========================================================================

    #[inline]
    pub(crate) fn ty(&self, id: TypeId) -> &Type {
        self.ctx.types.get(id)
    }

    #[inline]
    pub(crate) fn type_flags(&self, id: TypeId) -> TypeFlags {
        self.ctx.types.flags(id)
    }

    #[inline]
    pub(crate) fn object_flags(&self, id: TypeId) -> ObjectFlags {
        self.ctx.types.object_flags(id)
    }

    // =========================================================================
    // Resolution stack
    // =========================================================================

    /// Push `(target, property)` unless it closes a cycle. On a cycle every
    /// entry from the cycle start is marked failed and `false` is returned.
    pub(crate) fn push_type_resolution(
        &mut self,
        target: ResolutionTarget,
        property: ResolutionProperty,
    ) -> bool {
        if let Some(start) = self.find_resolution_cycle_start_index(target, property) {
            trace!(?target, ?property, start, "resolution cycle");
            for result in &mut self.ctx.resolution_results[start..] {
                *result = false;
            }
            return false;
        }
        self.ctx.resolution_targets.push(target);
        self.ctx.resolution_properties.push(property);
        self.ctx.resolution_results.push(true);
        true
    }

    /// Pop the top entry; `false` if a cycle went through it.
    pub(crate) fn pop_type_resolution(&mut self) -> bool {
        self.ctx.resolution_targets.pop();
        self.ctx.resolution_properties.pop();
        self.ctx.resolution_results.pop().unwrap_or(true)
    }

    fn find_resolution_cycle_start_index(
        &self,
        target: ResolutionTarget,
        property: ResolutionProperty,
    ) -> Option<usize> {
        let start = self.ctx.resolution_start;
        for i in (start..self.ctx.resolution_targets.len()).rev() {
            let (t, p) = (self.ctx.resolution_targets[i], self.ctx.resolution_properties[i]);
            if self.resolution_target_has_property(t, p) {
                return None;
            }
            if t == target && p == property {
                return Some(i);
            }
        }
        None
    }

    fn resolution_target_has_property(
        &self,
        target: ResolutionTarget,
        property: ResolutionProperty,
    ) -> bool {
        match (target, property) {
            (ResolutionTarget::Symbol(s), ResolutionProperty::Type) => {
                self.links_ref(s).is_some_and(|l| l.type_.is_some())
            }
            (ResolutionTarget::Symbol(s), ResolutionProperty::DeclaredType) => {
                self.links_ref(s).is_some_and(|l| l.declared_type.is_some())
            }
            (ResolutionTarget::Symbol(s), ResolutionProperty::WriteType) => {
                self.links_ref(s).is_some_and(|l| l.write_type.is_some())
            }
            (ResolutionTarget::Type(t), ResolutionProperty::ResolvedBaseTypes) => self
                .ty(t)
                .as_interface()
                .is_some_and(|i| i.resolved_base_types.is_some()),
            (ResolutionTarget::Type(t), ResolutionProperty::ResolvedBaseConstructorType) => self
                .ty(t)
                .as_interface()
                .is_some_and(|i| i.resolved_base_constructor_type.is_some()),
            (ResolutionTarget::Type(t), ResolutionProperty::ResolvedTypeArguments) => {
                self.reference_data(t).is_some_and(|r| r.resolved_type_arguments.is_some())
            }
            (ResolutionTarget::Type(t), ResolutionProperty::ImmediateBaseConstraint) => {
                self.ctx.resolved_base_constraints.contains_key(&t)
            }
            (ResolutionTarget::Type(t), ResolutionProperty::DefaultType) => self
                .ty(t)
                .as_type_parameter()
                .is_some_and(|p| p.default.is_some()),
            (ResolutionTarget::Signature(s), ResolutionProperty::ResolvedReturnType) => {
                self.ctx.types.signature(s).resolved_return_type.is_some()
            }
            _ => false,
        }
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Binder and checker diagnostics, sorted and deduplicated.
    pub fn get_diagnostics(&self) -> Vec<Diagnostic> {
        let mut all: Vec<Diagnostic> = self.ctx.program.binder_diagnostics().to_vec();
        all.extend(self.ctx.diagnostics.iter().cloned());
        sort_and_deduplicate_diagnostics(&mut all);
        all
    }

    /// Diagnostics produced by this checker only, in emission order.
    pub fn checker_diagnostics(&self) -> &[Diagnostic] {
        &self.ctx.diagnostics
    }
}
