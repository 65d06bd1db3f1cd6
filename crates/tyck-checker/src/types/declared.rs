//! Declared types of classes, interfaces, type aliases, enums and type
//! parameters, and the type parameters in scope at a node.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};
use tyck_binder::{NodeIndex, NodeKind, SymbolId, symbol_flags};
use tyck_common::diagnostics::diagnostic_codes;
use tyck_types::{
    InterfaceType, LiteralValue, ObjectFlags, ObjectKind, ObjectType, TypeAlias, TypeData, TypeFlags,
    TypeId, UnionReduction, get_type_list_id,
};

use crate::context::{ResolutionProperty, ResolutionTarget};
use crate::state::CheckerState;

impl<'a> CheckerState<'a> {
    /// Type a symbol denotes in a type position.
    pub fn get_declared_type_of_symbol(&mut self, symbol: SymbolId) -> TypeId {
        let symbol = self.get_merged_symbol(symbol);
        if let Some(declared) = self.links_ref(symbol).and_then(|l| l.declared_type) {
            return declared;
        }
        let flags = self.symbol_flags_raw(symbol);
        if flags & (symbol_flags::CLASS | symbol_flags::INTERFACE) != 0 {
            return self.get_declared_type_of_class_or_interface(symbol);
        }
        if flags & symbol_flags::TYPE_ALIAS != 0 {
            return self.get_declared_type_of_type_alias(symbol);
        }
        if flags & symbol_flags::TYPE_PARAMETER != 0 {
            return self.get_declared_type_of_type_parameter(symbol);
        }
        if flags & symbol_flags::ENUM != 0 {
            return self.get_declared_type_of_enum(symbol);
        }
        if flags & symbol_flags::ENUM_MEMBER != 0 {
            return self.get_declared_type_of_enum_member(symbol);
        }
        if flags & symbol_flags::ALIAS != 0 {
            let target = self.resolve_alias(symbol);
            if target == self.ctx.unknown_symbol {
                return TypeId::ERROR;
            }
            return self.get_declared_type_of_symbol(target);
        }
        TypeId::ERROR
    }

    // =========================================================================
    // Classes and interfaces
    // =========================================================================

    fn get_declared_type_of_class_or_interface(&mut self, symbol: SymbolId) -> TypeId {
        let is_class = self.symbol_flags_raw(symbol) & symbol_flags::CLASS != 0;
        let declaration = self
            .symbol_declarations(symbol)
            .into_iter()
            .find(|&d| {
                matches!(
                    self.ctx.arena.kind(d),
                    Some(NodeKind::ClassDeclaration(_) | NodeKind::InterfaceDeclaration(_))
                )
            })
            .unwrap_or(NodeIndex::NONE);
        let outer = self.get_outer_type_parameters(declaration).to_vec();
        let local = self.get_local_type_parameters_of_class_or_interface(symbol);
        let mut type_parameters = outer.clone();
        type_parameters.extend(local.iter().copied());

        let kind_flag = if is_class {
            ObjectFlags::CLASS
        } else {
            ObjectFlags::INTERFACE
        };
        let target = self.ctx.types.alloc(
            TypeFlags::OBJECT,
            kind_flag | ObjectFlags::REFERENCE,
            symbol,
            TypeData::Object(ObjectType {
                kind: ObjectKind::Interface(Box::new(InterfaceType {
                    type_parameters: type_parameters.clone(),
                    outer_type_parameters: outer,
                    local_type_parameters: local,
                    ..InterfaceType::default()
                })),
                members: None,
            }),
        );
        self.links(symbol).declared_type = Some(target);

        let this_type = self.ctx.types.create_type_parameter(symbol);
        if let Some(parameter) = self.ctx.types.get_mut(this_type).as_type_parameter_mut() {
            parameter.is_this_type = true;
            parameter.constraint = Some(target);
        }
        if let Some(iface) = self.ctx.types.get_mut(target).as_interface_mut() {
            iface.this_type = Some(this_type);
        }
        self.ctx
            .types
            .store_instantiation(target, get_type_list_id(&type_parameters), target);
        trace!(
            symbol = symbol.0,
            target = target.0,
            arity = type_parameters.len(),
            "declared class or interface type"
        );
        target
    }

    /// Type parameters declared on any declaration of a class or interface,
    /// in declaration order, one per name.
    fn get_local_type_parameters_of_class_or_interface(&mut self, symbol: SymbolId) -> Vec<TypeId> {
        let mut names: Vec<String> = Vec::new();
        let mut result = Vec::new();
        for declaration in self.symbol_declarations(symbol) {
            let nodes = self.ctx.arena.type_parameters_of(declaration).to_vec();
            for node in nodes {
                let Some(name) = self.ctx.arena.declaration_name_text(node) else {
                    continue;
                };
                if names.contains(&name) {
                    continue;
                }
                let parameter_symbol = self
                    .symbol(symbol)
                    .members
                    .as_ref()
                    .and_then(|m| m.get(&name).copied())
                    .filter(|&s| self.symbol_flags_raw(s) & symbol_flags::TYPE_PARAMETER != 0)
                    .or_else(|| self.get_symbol_of_node(node));
                if let Some(parameter_symbol) = parameter_symbol {
                    result.push(self.get_declared_type_of_type_parameter(parameter_symbol));
                    names.push(name);
                }
            }
        }
        result
    }

    pub(crate) fn get_this_type_of_target(&self, target: TypeId) -> Option<TypeId> {
        self.ty(target).as_interface().and_then(|i| i.this_type)
    }

    // =========================================================================
    // Type aliases
    // =========================================================================

    fn get_declared_type_of_type_alias(&mut self, symbol: SymbolId) -> TypeId {
        if !self.push_type_resolution(ResolutionTarget::Symbol(symbol), ResolutionProperty::DeclaredType) {
            return TypeId::ERROR;
        }
        let declaration = self
            .symbol_declarations(symbol)
            .into_iter()
            .find(|&d| matches!(self.ctx.arena.kind(d), Some(NodeKind::TypeAliasDeclaration(_))));
        let Some(declaration) = declaration else {
            self.pop_type_resolution();
            return TypeId::ERROR;
        };
        let type_node = self
            .ctx
            .arena
            .get_type_alias(declaration)
            .map_or(NodeIndex::NONE, |alias| alias.type_node);
        let resolved = self.get_type_from_type_node(type_node);

        let declared = if self.pop_type_resolution() {
            let type_parameters = self.get_type_alias_type_parameters(symbol);
            if !type_parameters.is_empty() {
                let mut instantiations = FxHashMap::default();
                instantiations.insert(get_type_list_id(&type_parameters), resolved);
                let links = self.links(symbol);
                links.type_parameters = Some(type_parameters);
                links.instantiations = Some(instantiations);
            }
            resolved
        } else {
            let name = self.symbol_to_string(symbol);
            self.error_on_declaration(
                declaration,
                diagnostic_codes::TYPE_ALIAS_CIRCULARLY_REFERENCES_ITSELF,
                &[&name],
            );
            TypeId::ERROR
        };
        self.links(symbol).declared_type = Some(declared);
        declared
    }

    /// Outer and local type parameters of a type alias.
    pub(crate) fn get_type_alias_type_parameters(&mut self, symbol: SymbolId) -> Vec<TypeId> {
        if let Some(parameters) = self.links_ref(symbol).and_then(|l| l.type_parameters.clone()) {
            return parameters;
        }
        let declaration = self.symbol(symbol).first_declaration();
        if declaration.is_none() {
            return Vec::new();
        }
        let mut result = self.get_outer_type_parameters(declaration).to_vec();
        result.extend(self.get_local_type_parameters_of_declaration(declaration));
        result
    }

    /// Local type parameters of a type alias.
    pub(crate) fn get_local_type_parameters_of_alias(&mut self, symbol: SymbolId) -> Vec<TypeId> {
        let declaration = self.symbol(symbol).first_declaration();
        self.get_local_type_parameters_of_declaration(declaration)
    }

    /// Alias annotation for a type written directly as the body of a type
    /// alias.
    pub(crate) fn get_alias_for_type_node(&mut self, node: NodeIndex) -> Option<TypeAlias> {
        let mut host = self.ctx.arena.parent(node);
        while matches!(self.ctx.arena.kind(host), Some(NodeKind::ParenthesizedType(_))) {
            host = self.ctx.arena.parent(host);
        }
        if !matches!(self.ctx.arena.kind(host), Some(NodeKind::TypeAliasDeclaration(_))) {
            return None;
        }
        let symbol = self.get_symbol_of_node(host)?;
        let type_arguments = self.get_type_alias_type_parameters(symbol);
        Some(TypeAlias {
            symbol,
            type_arguments,
        })
    }

    // =========================================================================
    // Type parameters
    // =========================================================================

    pub(crate) fn get_declared_type_of_type_parameter(&mut self, symbol: SymbolId) -> TypeId {
        if let Some(declared) = self.links_ref(symbol).and_then(|l| l.declared_type) {
            return declared;
        }
        let parameter = self.ctx.types.create_type_parameter(symbol);
        self.links(symbol).declared_type = Some(parameter);
        parameter
    }

    /// Type parameters declared directly by a function-like, type alias or
    /// mapped type node.
    pub(crate) fn get_local_type_parameters_of_declaration(&mut self, declaration: NodeIndex) -> Vec<TypeId> {
        let nodes: Vec<NodeIndex> = match self.ctx.arena.kind(declaration) {
            Some(NodeKind::MappedType(mapped)) => vec![mapped.type_parameter],
            Some(NodeKind::ClassDeclaration(_) | NodeKind::InterfaceDeclaration(_)) => {
                let Some(symbol) = self.get_symbol_of_node(declaration) else {
                    return Vec::new();
                };
                let declared = self.get_declared_type_of_symbol(symbol);
                return self
                    .ty(declared)
                    .as_interface()
                    .map(|i| i.local_type_parameters.clone())
                    .unwrap_or_default();
            }
            _ => self.ctx.arena.type_parameters_of(declaration).to_vec(),
        };
        nodes
            .into_iter()
            .filter_map(|node| {
                let symbol = self.get_symbol_of_node(node)?;
                Some(self.get_declared_type_of_type_parameter(symbol))
            })
            .collect()
    }

    /// Type parameters of every declaration enclosing `node`, outermost
    /// first. Cached per node.
    pub(crate) fn get_outer_type_parameters(&mut self, node: NodeIndex) -> Rc<Vec<TypeId>> {
        if node.is_none() {
            return Rc::new(Vec::new());
        }
        if let Some(cached) = self.node_links_ref(node).and_then(|l| l.outer_type_parameters.clone()) {
            return cached;
        }
        let mut host = self.ctx.arena.parent(node);
        let result = loop {
            let Some(kind) = self.ctx.arena.kind(host) else {
                break Rc::new(Vec::new());
            };
            let declares_type_parameters = kind.as_function_like().is_some()
                || matches!(
                    kind,
                    NodeKind::ClassDeclaration(_)
                        | NodeKind::InterfaceDeclaration(_)
                        | NodeKind::TypeAliasDeclaration(_)
                        | NodeKind::MappedType(_)
                );
            if matches!(kind, NodeKind::SourceFile(_)) {
                break Rc::new(Vec::new());
            }
            if declares_type_parameters {
                let mut parameters = self.get_outer_type_parameters(host).to_vec();
                for local in self.get_local_type_parameters_of_declaration(host) {
                    if !parameters.contains(&local) {
                        parameters.push(local);
                    }
                }
                break Rc::new(parameters);
            }
            host = self.ctx.arena.parent(host);
        };
        self.node_links(node).outer_type_parameters = Some(result.clone());
        result
    }

    // =========================================================================
    // Enums
    // =========================================================================

    fn get_declared_type_of_enum(&mut self, symbol: SymbolId) -> TypeId {
        let mut member_types: Vec<TypeId> = Vec::new();
        let mut members: Vec<SymbolId> = Vec::new();
        let mut has_computed_member = false;

        for declaration in self.symbol_declarations(symbol) {
            let Some(data) = self.ctx.arena.get_enum(declaration) else {
                continue;
            };
            let member_nodes = data.members.clone();
            let mut known_values: FxHashMap<String, LiteralValue> = FxHashMap::default();
            let mut next_value = Some(0.0);
            for member in member_nodes {
                let Some(member_symbol) = self.get_symbol_of_node(member) else {
                    continue;
                };
                let initializer = self.ctx.arena.initializer_of(member);
                let value = match self.ctx.arena.kind(initializer) {
                    None => next_value.map(LiteralValue::Number),
                    Some(NodeKind::NumericLiteral(lit)) => Some(LiteralValue::Number(lit.value)),
                    Some(NodeKind::StringLiteral(lit)) => Some(LiteralValue::String(lit.text.clone())),
                    Some(NodeKind::Identifier(ident)) => known_values.get(&ident.escaped_text).cloned(),
                    Some(_) => None,
                };
                next_value = match &value {
                    Some(LiteralValue::Number(n)) => Some(n + 1.0),
                    _ => None,
                };
                if let (Some(value), Some(name)) = (&value, self.ctx.arena.declaration_name_text(member)) {
                    known_values.insert(name, value.clone());
                }
                match value {
                    Some(value) => {
                        let literal = self.ctx.types.enum_literal(value, symbol, member_symbol);
                        self.links(member_symbol).declared_type = Some(literal);
                        member_types.push(literal);
                    }
                    None => has_computed_member = true,
                }
                members.push(member_symbol);
            }
        }

        let declared = if has_computed_member || member_types.is_empty() {
            let enum_type = self.ctx.types.alloc(
                TypeFlags::ENUM,
                ObjectFlags::empty(),
                symbol,
                TypeData::Intrinsic(tyck_types::IntrinsicType { name: "enum" }),
            );
            for &member in &members {
                self.links(member).declared_type = Some(enum_type);
            }
            enum_type
        } else {
            let alias = TypeAlias {
                symbol,
                type_arguments: Vec::new(),
            };
            let union = self.get_union_type_ex(&member_types, UnionReduction::Literal, Some(alias), None);
            if self.type_flags(union).contains(TypeFlags::UNION) {
                let ty = self.ctx.types.get_mut(union);
                ty.flags |= TypeFlags::ENUM_LITERAL;
                ty.symbol = symbol;
            }
            union
        };
        debug!(
            symbol = symbol.0,
            members = members.len(),
            computed = has_computed_member,
            "declared enum type"
        );
        self.links(symbol).declared_type = Some(declared);
        declared
    }

    fn get_declared_type_of_enum_member(&mut self, symbol: SymbolId) -> TypeId {
        let parent = self.get_merged_symbol(self.symbol(symbol).parent);
        if parent.is_some() {
            self.get_declared_type_of_enum(parent);
        }
        self.links_ref(symbol)
            .and_then(|l| l.declared_type)
            .unwrap_or(TypeId::ERROR)
    }

    /// Whether every member of an enum has a string value.
    pub(crate) fn is_string_enum(&mut self, symbol: SymbolId) -> bool {
        let declared = self.get_declared_type_of_symbol(symbol);
        let constituents = match self.ty(declared).data {
            TypeData::Union(ref u) => u.types.clone(),
            _ => vec![declared],
        };
        constituents
            .iter()
            .all(|&c| self.type_flags(c).contains(TypeFlags::STRING_LITERAL))
    }
}
