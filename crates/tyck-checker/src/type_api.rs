//! Node-level queries: the symbol and the type at a location.

use tyck_binder::{FileId, NodeIndex, NodeKind, SymbolId, symbol_flags};
use tyck_types::TypeId;

use crate::state::CheckerState;

impl<'a> CheckerState<'a> {
    /// Symbol named or declared at `node`.
    ///
    /// A declaration name gives the declared symbol, an identifier the
    /// symbol it resolves to, and a property name the property it selects.
    pub fn get_symbol_at_location(&mut self, node: NodeIndex) -> Option<SymbolId> {
        let arena = self.ctx.arena;
        let parent = arena.parent(node);
        if parent.is_some() && arena.declaration_name(parent) == node {
            return self.get_symbol_of_node(parent);
        }
        let symbol = match arena.kind(node)? {
            NodeKind::Identifier(ident) => {
                if let Some(symbol) = self.node_links_ref(node).and_then(|l| l.resolved_symbol) {
                    return Some(self.get_merged_symbol(symbol));
                }
                match arena.kind(parent) {
                    Some(NodeKind::PropertyAccessExpression(access)) if access.name_or_argument == node => {
                        self.check_expression(parent);
                        self.node_links_ref(node).and_then(|l| l.resolved_symbol)
                    }
                    Some(NodeKind::QualifiedName(_) | NodeKind::TypeReference(_)) => {
                        self.get_symbol_of_entity_name(node)
                    }
                    _ => {
                        let text = ident.escaped_text.clone();
                        let meaning = symbol_flags::VALUE | symbol_flags::TYPE | symbol_flags::NAMESPACE;
                        self.resolve_name(node, &text, meaning, false)
                    }
                }
            }
            NodeKind::QualifiedName(_) => self.get_symbol_of_entity_name(node),
            NodeKind::PropertyAccessExpression(_) | NodeKind::ElementAccessExpression(_) => {
                self.check_expression(node);
                self.node_links_ref(node).and_then(|l| l.resolved_symbol)
            }
            _ => self.get_symbol_of_node(node),
        };
        symbol.map(|s| self.get_merged_symbol(s))
    }

    /// The rightmost name of a qualified name resolves through its left
    /// side; other names resolve on their own.
    fn get_symbol_of_entity_name(&mut self, node: NodeIndex) -> Option<SymbolId> {
        let arena = self.ctx.arena;
        let parent = arena.parent(node);
        let entity = match arena.kind(parent) {
            Some(NodeKind::QualifiedName(q)) if q.right == node => parent,
            _ => node,
        };
        let meaning = symbol_flags::TYPE | symbol_flags::NAMESPACE | symbol_flags::VALUE;
        self.resolve_entity_name(entity, meaning, true, true)
            .filter(|&s| s != self.ctx.unknown_symbol)
    }

    /// Type of the expression, type node or declaration at `node`.
    ///
    /// For a declaration (or its name) this is the value type of the
    /// declared symbol, or its declared type when it only names a type.
    pub fn get_type_at_location(&mut self, node: NodeIndex) -> TypeId {
        let arena = self.ctx.arena;
        let Some(kind) = arena.kind(node) else {
            return TypeId::ERROR;
        };
        if kind.is_type_node() {
            return self.get_type_from_type_node(node);
        }
        let parent = arena.parent(node);
        let declaration = if parent.is_some() && arena.declaration_name(parent) == node {
            parent
        } else if arena.declaration_name(node).is_some() {
            node
        } else {
            return self.check_expression(node);
        };
        let Some(symbol) = self.get_symbol_of_node(declaration) else {
            return self.check_expression(node);
        };
        if self.symbol_flags_raw(symbol) & symbol_flags::VALUE != 0 {
            self.get_type_of_symbol(symbol)
        } else {
            self.get_declared_type_of_symbol(symbol)
        }
    }

    /// Symbol declared at the top level of `file` under `name`: a local of
    /// a script or an export of a module.
    pub fn get_file_symbol(&mut self, file: FileId, name: &str) -> Option<SymbolId> {
        let program = self.ctx.program;
        if let Some(&symbol) = program.file_locals(file).and_then(|locals| locals.get(name)) {
            return Some(self.get_merged_symbol(symbol));
        }
        let module = program.file_symbol(file)?;
        let exports = self.get_exports_of_module(module);
        exports.get(name).map(|&s| self.get_merged_symbol(s))
    }
}
