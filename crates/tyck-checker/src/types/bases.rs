//! Base types of classes, interfaces and tuples, and the base constructor
//! type of a class.

use std::rc::Rc;

use tracing::debug;
use tyck_binder::{NodeIndex, NodeKind, symbol_flags};
use tyck_common::diagnostics::diagnostic_codes;
use tyck_types::{AccessFlags, ElementFlags, SignatureKind, TypeFlags, TypeId};

use crate::context::{ResolutionProperty, ResolutionTarget};
use crate::state::CheckerState;

impl<'a> CheckerState<'a> {
    /// Direct base types of a class, interface or tuple target. A cycle
    /// through the bases reports 2310 on every declaration involved and
    /// leaves each of them without bases.
    pub(crate) fn get_base_types(&mut self, target: TypeId) -> Rc<Vec<TypeId>> {
        let Some(iface) = self.ty(target).as_interface() else {
            return Rc::new(Vec::new());
        };
        if let Some(bases) = &iface.resolved_base_types {
            return bases.clone();
        }
        let is_tuple = iface.tuple.is_some();
        if !self.push_type_resolution(ResolutionTarget::Type(target), ResolutionProperty::ResolvedBaseTypes) {
            return Rc::new(Vec::new());
        }
        let mut bases = Vec::new();
        if is_tuple {
            bases.push(self.get_tuple_base_type(target));
        } else {
            let symbol = self.ty(target).symbol;
            let flags = if symbol.is_some() { self.symbol_flags_raw(symbol) } else { 0 };
            if flags & symbol_flags::CLASS != 0 {
                bases.extend(self.resolve_base_types_of_class(target));
            }
            if flags & symbol_flags::INTERFACE != 0 {
                bases.extend(self.resolve_base_types_of_interface(target));
            }
        }
        if !self.pop_type_resolution() {
            self.report_circular_base_type(target);
            bases.clear();
        }
        let bases = Rc::new(bases);
        if let Some(iface) = self.ctx.types.get_mut(target).as_interface_mut() {
            iface.resolved_base_types = Some(bases.clone());
        }
        bases
    }

    fn report_circular_base_type(&mut self, target: TypeId) {
        let symbol = self.ty(target).symbol;
        let name = self.type_to_string(target);
        for declaration in self.symbol_declarations(symbol) {
            if matches!(
                self.ctx.arena.kind(declaration),
                Some(NodeKind::ClassDeclaration(_) | NodeKind::InterfaceDeclaration(_))
            ) {
                self.error_on_declaration(
                    declaration,
                    diagnostic_codes::TYPE_RECURSIVELY_REFERENCES_ITSELF_AS_BASE,
                    &[&name],
                );
            }
        }
    }

    /// `Array<E1 | E2 | ...>` (or `ReadonlyArray`) for a tuple target.
    fn get_tuple_base_type(&mut self, target: TypeId) -> TypeId {
        let Some(info) = self.ty(target).tuple_info().cloned() else {
            return TypeId::ERROR;
        };
        let parameters = self.target_type_parameters(target);
        let elements: Vec<TypeId> = parameters
            .iter()
            .zip(&info.element_flags)
            .map(|(&parameter, flags)| {
                if flags.contains(ElementFlags::VARIADIC) {
                    self.get_indexed_access_type(parameter, TypeId::NUMBER, AccessFlags::empty(), NodeIndex::NONE, None)
                } else {
                    parameter
                }
            })
            .collect();
        let element = self.get_union_type(&elements);
        self.create_array_type(element, info.readonly)
    }

    fn resolve_base_types_of_interface(&mut self, target: TypeId) -> Vec<TypeId> {
        let symbol = self.ty(target).symbol;
        let mut bases = Vec::new();
        for declaration in self.symbol_declarations(symbol) {
            let Some(data) = self.ctx.arena.get_interface(declaration) else {
                continue;
            };
            for node in data.extends.clone() {
                let resolved = self.get_type_from_type_node(node);
                let base = self.get_reduced_type(resolved);
                if base.is_error() {
                    continue;
                }
                if !self.is_valid_base_type(base) {
                    self.error(node, diagnostic_codes::INTERFACE_CAN_ONLY_EXTEND_OBJECT_TYPE, &[]);
                    continue;
                }
                if base == target || self.has_base_type(base, target) {
                    let name = self.type_to_string(target);
                    self.error_on_declaration(
                        declaration,
                        diagnostic_codes::TYPE_RECURSIVELY_REFERENCES_ITSELF_AS_BASE,
                        &[&name],
                    );
                    continue;
                }
                if !bases.contains(&base) {
                    bases.push(base);
                }
            }
        }
        bases
    }

    fn resolve_base_types_of_class(&mut self, target: TypeId) -> Vec<TypeId> {
        let constructor = self.get_base_constructor_type_of_class(target);
        let apparent = self.get_apparent_type(constructor);
        let constructor = self.get_reduced_type(apparent);
        if !self
            .type_flags(constructor)
            .intersects(TypeFlags::OBJECT | TypeFlags::INTERSECTION | TypeFlags::ANY)
            || constructor.is_error()
        {
            return Vec::new();
        }
        let base_node = self.get_base_type_node_of_class(target);
        let constructor_symbol = self.ty(constructor).symbol;
        let base = if constructor_symbol.is_some() && self.symbol_flags_raw(constructor_symbol) & symbol_flags::CLASS != 0 {
            self.get_type_from_class_or_interface_reference(base_node, constructor_symbol)
        } else if self.type_flags(constructor).contains(TypeFlags::ANY) {
            constructor
        } else {
            let signatures = self.get_signatures_of_type(constructor, SignatureKind::Construct);
            match signatures.first() {
                Some(&signature) => self.get_return_type_of_signature(signature),
                None => return Vec::new(),
            }
        };
        if base.is_error() {
            return Vec::new();
        }
        let base = self.get_reduced_type(base);
        if !self.is_valid_base_type(base) {
            let text = self.type_to_string(base);
            let expression = self.heritage_expression(base_node);
            self.error(expression, diagnostic_codes::BASE_CONSTRUCTOR_RETURN_TYPE_NOT_OBJECT, &[&text]);
            return Vec::new();
        }
        if base == target || self.has_base_type(base, target) {
            let name = self.type_to_string(target);
            let declaration = self.symbol(self.ty(target).symbol).first_declaration();
            self.error_on_declaration(
                declaration,
                diagnostic_codes::TYPE_RECURSIVELY_REFERENCES_ITSELF_AS_BASE,
                &[&name],
            );
            return Vec::new();
        }
        vec![base]
    }

    /// Static side of the class named in the `extends` clause; `undefined`
    /// when there is none.
    pub(crate) fn get_base_constructor_type_of_class(&mut self, class_type: TypeId) -> TypeId {
        let Some(iface) = self.ty(class_type).as_interface() else {
            return TypeId::UNDEFINED;
        };
        if let Some(resolved) = iface.resolved_base_constructor_type {
            return resolved;
        }
        let base_node = self.get_base_type_node_of_class(class_type);
        if base_node.is_none() {
            self.set_base_constructor_type(class_type, TypeId::UNDEFINED);
            return TypeId::UNDEFINED;
        }
        if !self.push_type_resolution(
            ResolutionTarget::Type(class_type),
            ResolutionProperty::ResolvedBaseConstructorType,
        ) {
            return TypeId::ERROR;
        }
        let expression = self.heritage_expression(base_node);
        let constructor = self.check_expression(expression);
        let mut resolved = constructor;
        if !self.pop_type_resolution() {
            let symbol = self.ty(class_type).symbol;
            let name = self.symbol_to_string(symbol);
            let declaration = self.symbol(symbol).first_declaration();
            self.error_on_declaration(declaration, diagnostic_codes::REFERENCED_IN_OWN_BASE_EXPRESSION, &[&name]);
            resolved = TypeId::ERROR;
        } else if !self.type_flags(constructor).intersects(TypeFlags::ANY | TypeFlags::NULL)
            && !self.is_constructor_type(constructor)
        {
            let text = self.type_to_string(constructor);
            self.error(expression, diagnostic_codes::TYPE_IS_NOT_A_CONSTRUCTOR_FUNCTION_TYPE, &[&text]);
            resolved = TypeId::ERROR;
        }
        debug!(class = class_type.0, base = resolved.0, "base constructor type");
        self.set_base_constructor_type(class_type, resolved);
        resolved
    }

    fn set_base_constructor_type(&mut self, class_type: TypeId, t: TypeId) {
        if let Some(iface) = self.ctx.types.get_mut(class_type).as_interface_mut() {
            iface.resolved_base_constructor_type = Some(t);
        }
    }

    /// `extends` clause of the first class declaration of a class type.
    pub(crate) fn get_base_type_node_of_class(&self, class_type: TypeId) -> NodeIndex {
        let symbol = self.ty(class_type).symbol;
        if symbol.is_none() {
            return NodeIndex::NONE;
        }
        self.symbol(symbol)
            .declarations
            .iter()
            .find_map(|&d| self.ctx.arena.get_class(d).map(|c| c.extends))
            .unwrap_or(NodeIndex::NONE)
    }

    fn heritage_expression(&self, node: NodeIndex) -> NodeIndex {
        match self.ctx.arena.kind(node) {
            Some(NodeKind::ExpressionWithTypeArguments(data)) => data.expression,
            _ => node,
        }
    }

    pub(crate) fn is_constructor_type(&mut self, t: TypeId) -> bool {
        if !self.get_signatures_of_type(t, SignatureKind::Construct).is_empty() {
            return true;
        }
        if self.type_flags(t).contains(TypeFlags::TYPE_VARIABLE)
            && let Some(constraint) = self.get_base_constraint_of_type(t)
        {
            return self.is_constructor_type(constraint);
        }
        false
    }

    fn is_valid_base_type(&mut self, t: TypeId) -> bool {
        let flags = self.type_flags(t);
        if flags.contains(TypeFlags::TYPE_PARAMETER)
            && let Some(constraint) = self.get_base_constraint_of_type(t)
        {
            return self.is_valid_base_type(constraint);
        }
        if flags.intersects(TypeFlags::OBJECT | TypeFlags::NON_PRIMITIVE | TypeFlags::ANY) {
            return !self.is_generic_mapped_type(t);
        }
        if flags.contains(TypeFlags::INTERSECTION) {
            let types = self.ty(t).constituents().to_vec();
            return types.into_iter().all(|c| self.is_valid_base_type(c));
        }
        false
    }

    /// Whether `checked` appears among the transitive bases of `t`.
    pub(crate) fn has_base_type(&mut self, t: TypeId, checked: TypeId) -> bool {
        if self.type_flags(t).contains(TypeFlags::INTERSECTION) {
            let types = self.ty(t).constituents().to_vec();
            return types.into_iter().any(|c| self.has_base_type(c, checked));
        }
        if !self.type_flags(t).contains(TypeFlags::OBJECT) {
            return false;
        }
        let target = self.get_target_type(t);
        if target == checked {
            return true;
        }
        if self.ty(target).as_interface().is_none() {
            return false;
        }
        let bases = self.get_base_types(target);
        bases.iter().any(|&base| self.has_base_type(base, checked))
    }
}
