//! Call and construct signatures: construction from declarations, return
//! types, instantiation, erasure and the signatures of union types.

use std::rc::Rc;

use tracing::trace;
use tyck_binder::{FunctionBody, NodeIndex, NodeKind, SymbolId, internal_names, node_flags, symbol_flags};
use tyck_common::diagnostics::diagnostic_codes;
use tyck_types::{
    SignatureFlags, SignatureId, SignatureKind, TypeFlags, TypeId, TypeMapper, UnionReduction,
    get_type_list_id,
};

use crate::context::{ResolutionProperty, ResolutionTarget};
use crate::state::CheckerState;
use crate::symbols::links::CheckFlags;

impl<'a> CheckerState<'a> {
    // =========================================================================
    // Declarations
    // =========================================================================

    /// Signature declared by a function-like node. Cached on the node.
    pub(crate) fn get_signature_from_declaration(&mut self, declaration: NodeIndex) -> SignatureId {
        if let Some(signature) = self.node_links_ref(declaration).and_then(|l| l.resolved_signature) {
            return signature;
        }
        let arena = self.ctx.arena;
        let id = self.ctx.types.alloc_signature(declaration);
        self.node_links(declaration).resolved_signature = Some(id);
        let Some(kind) = arena.kind(declaration) else {
            self.ctx.types.signature_mut(id).resolved_return_type = Some(TypeId::ERROR);
            return id;
        };
        let Some(function) = kind.as_function_like() else {
            self.ctx.types.signature_mut(id).resolved_return_type = Some(TypeId::ERROR);
            return id;
        };

        let type_parameters = if matches!(kind, NodeKind::Constructor(_)) {
            let class = arena.parent(declaration);
            self.get_local_type_parameters_of_declaration(class)
        } else {
            self.get_local_type_parameters_of_declaration(declaration)
        };

        let mut flags = SignatureFlags::empty();
        let mut parameters = Vec::with_capacity(function.parameters.len());
        let mut min_argument_count = 0;
        for (index, &node) in function.parameters.iter().enumerate() {
            let Some(data) = arena.get_parameter(node) else {
                continue;
            };
            let symbol = match self.get_symbol_of_node(node) {
                Some(symbol) => symbol,
                None => self.create_parameter_symbol(node, &format!("arg{index}")),
            };
            parameters.push(symbol);
            if matches!(arena.kind(data.type_annotation), Some(NodeKind::LiteralType(_))) {
                flags |= SignatureFlags::HAS_LITERAL_TYPES;
            }
            let is_optional = data.question_token || data.initializer.is_some() || data.dot_dot_dot;
            if !is_optional {
                min_argument_count = parameters.len();
            }
        }
        if function
            .parameters
            .last()
            .and_then(|&p| arena.get_parameter(p))
            .is_some_and(|p| p.dot_dot_dot)
        {
            flags |= SignatureFlags::HAS_REST_PARAMETER;
        }
        if arena.has_flag(declaration, node_flags::ABSTRACT)
            || (matches!(kind, NodeKind::Constructor(_) | NodeKind::ConstructorType(_))
                && arena.has_flag(arena.parent(declaration), node_flags::ABSTRACT))
        {
            flags |= SignatureFlags::ABSTRACT;
        }

        let signature = self.ctx.types.signature_mut(id);
        signature.type_parameters = type_parameters;
        signature.parameters = parameters;
        signature.min_argument_count = min_argument_count;
        signature.flags = flags;
        trace!(signature = id.0, declaration = declaration.0, "signature from declaration");
        id
    }

    /// Parameter symbol for a parameter the binder left unnamed.
    fn create_parameter_symbol(&mut self, node: NodeIndex, name: &str) -> SymbolId {
        let symbol = self.create_symbol(symbol_flags::FUNCTION_SCOPED_VARIABLE, name, CheckFlags::empty());
        if let Some(created) = self.transient_symbol_mut(symbol) {
            created.declarations.push(node);
            created.value_declaration = node;
        }
        symbol
    }

    /// Signatures of a function, method, constructor or signature member
    /// symbol. An implementation is dropped when overloads precede it.
    pub(crate) fn get_signatures_of_symbol(&mut self, symbol: SymbolId) -> Vec<SignatureId> {
        let arena = self.ctx.arena;
        let declarations = self.symbol_declarations(symbol);
        let function_like: Vec<NodeIndex> = declarations
            .into_iter()
            .filter(|&d| arena.kind(d).is_some_and(|k| k.as_function_like().is_some()))
            .collect();
        let has_overloads = function_like
            .iter()
            .any(|&d| arena.get_function_like(d).is_some_and(|f| f.body.is_none()));
        function_like
            .into_iter()
            .filter(|&d| !has_overloads || arena.get_function_like(d).is_some_and(|f| f.body.is_none()))
            .map(|d| self.get_signature_from_declaration(d))
            .collect()
    }

    // =========================================================================
    // Return types
    // =========================================================================

    pub fn get_return_type_of_signature(&mut self, signature: SignatureId) -> TypeId {
        if let Some(resolved) = self.ctx.types.signature(signature).resolved_return_type {
            return resolved;
        }
        if !self.push_type_resolution(
            ResolutionTarget::Signature(signature),
            ResolutionProperty::ResolvedReturnType,
        ) {
            return TypeId::ERROR;
        }
        let (target, mapper, declaration) = {
            let s = self.ctx.types.signature(signature);
            (s.target, s.mapper.clone(), s.declaration)
        };
        let mut return_type = match (target, mapper) {
            (Some(target), Some(mapper)) => {
                let uninstantiated = self.get_return_type_of_signature(target);
                self.instantiate_type(uninstantiated, &mapper)
            }
            _ => self.get_return_type_of_declaration(declaration),
        };
        if !self.pop_type_resolution() {
            self.report_circular_return_type(declaration);
            return_type = TypeId::ANY;
        }
        let slot = &mut self.ctx.types.signature_mut(signature).resolved_return_type;
        *slot.get_or_insert(return_type)
    }

    fn get_return_type_of_declaration(&mut self, declaration: NodeIndex) -> TypeId {
        let arena = self.ctx.arena;
        let Some(kind) = arena.kind(declaration) else {
            return TypeId::ANY;
        };
        if matches!(kind, NodeKind::Constructor(_)) {
            return match self.get_symbol_of_node(arena.parent(declaration)) {
                Some(class) => self.get_declared_type_of_symbol(class),
                None => TypeId::ERROR,
            };
        }
        let Some(function) = kind.as_function_like() else {
            return TypeId::ANY;
        };
        if function.return_type.is_some() {
            return self.get_type_from_type_node(function.return_type);
        }
        match &function.body {
            FunctionBody::None => TypeId::ANY,
            FunctionBody::Expression(expression) => {
                let t = self.check_expression(*expression);
                self.get_widened_type(t)
            }
            FunctionBody::Block(statements) => {
                let mut types = Vec::new();
                let mut has_empty_return = false;
                for &statement in statements {
                    if let Some(NodeKind::ReturnStatement(ret)) = arena.kind(statement) {
                        if ret.expression.is_some() {
                            types.push(self.check_expression(ret.expression));
                        } else {
                            has_empty_return = true;
                        }
                    }
                }
                if types.is_empty() {
                    return TypeId::VOID;
                }
                if has_empty_return {
                    types.push(TypeId::UNDEFINED);
                }
                let union = self.get_union_type_ex(&types, UnionReduction::Subtype, None, None);
                self.get_widened_type(union)
            }
        }
    }

    fn report_circular_return_type(&mut self, declaration: NodeIndex) {
        let Some(function) = self.ctx.arena.get_function_like(declaration) else {
            return;
        };
        if function.return_type.is_some() {
            let node = function.return_type;
            self.error(node, diagnostic_codes::RETURN_TYPE_ANNOTATION_CIRCULARLY_REFERENCES_ITSELF, &[]);
        } else if self.ctx.options.no_implicit_any {
            let name = self
                .ctx
                .arena
                .declaration_name_text(declaration)
                .unwrap_or_else(|| "(Anonymous function)".to_string());
            self.error_on_declaration(
                declaration,
                diagnostic_codes::IMPLICITLY_HAS_RETURN_TYPE_ANY_CIRCULAR,
                &[&name],
            );
        }
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Number of parameters, counting the fixed elements of a tuple rest.
    pub(crate) fn get_parameter_count(&mut self, signature: SignatureId) -> usize {
        let s = self.ctx.types.signature(signature);
        let (count, has_rest) = (s.parameters.len(), s.has_rest_parameter());
        if has_rest && let Some(rest) = self.get_rest_type_of_signature(signature) {
            if let Some(info) = self.tuple_target_info(rest) {
                let extra = if info.has_rest_element { 1 } else { 0 };
                return count - 1 + info.fixed_length + extra;
            }
        }
        count
    }

    /// Declared type of the rest parameter.
    pub(crate) fn get_rest_type_of_signature(&mut self, signature: SignatureId) -> Option<TypeId> {
        let s = self.ctx.types.signature(signature);
        if !s.has_rest_parameter() {
            return None;
        }
        let rest = *s.parameters.last()?;
        Some(self.get_type_of_symbol(rest))
    }

    /// Type an argument at `position` is checked against.
    pub(crate) fn get_type_at_position(&mut self, signature: SignatureId, position: usize) -> Option<TypeId> {
        let s = self.ctx.types.signature(signature);
        let fixed = s.non_rest_parameter_count();
        if position < fixed {
            let parameter = s.parameters[position];
            return Some(self.get_type_of_symbol(parameter));
        }
        let rest = self.get_rest_type_of_signature(signature)?;
        let offset = position - fixed;
        if self.is_tuple_type(rest) {
            let elements = self.get_element_types(rest);
            let info = self.tuple_target_info(rest)?;
            if offset < info.fixed_length {
                return elements.get(offset).copied();
            }
            return self.get_rest_type_of_tuple_type(rest);
        }
        if self.type_flags(rest).intersects(TypeFlags::ANY) {
            return Some(rest);
        }
        if let Some(element) = self.array_element_type(rest) {
            return Some(element);
        }
        Some(self.get_indexed_access_type(
            rest,
            TypeId::NUMBER,
            tyck_types::AccessFlags::empty(),
            NodeIndex::NONE,
            None,
        ))
    }

    // =========================================================================
    // Instantiation
    // =========================================================================

    /// Instantiate a signature's parameters and return type with `mapper`.
    /// Unless `erase_type_parameters` is set, the signature's own type
    /// parameters are freshened.
    pub(crate) fn instantiate_signature(
        &mut self,
        signature: SignatureId,
        mapper: &Rc<TypeMapper>,
        erase_type_parameters: bool,
    ) -> SignatureId {
        let source = self.ctx.types.signature(signature).clone();
        let mut mapper = mapper.clone();
        let mut type_parameters = Vec::new();
        if !source.type_parameters.is_empty() && !erase_type_parameters {
            let fresh: Vec<TypeId> = source
                .type_parameters
                .iter()
                .map(|&p| self.clone_type_parameter(p))
                .collect();
            let freshen = TypeMapper::from_lists(source.type_parameters.clone(), Some(fresh.clone()));
            mapper = TypeMapper::combine(Some(freshen), Some(mapper.clone())).unwrap_or(mapper);
            for &parameter in &fresh {
                if let Some(data) = self.ctx.types.get_mut(parameter).as_type_parameter_mut() {
                    data.mapper = Some(mapper.clone());
                }
            }
            type_parameters = fresh;
        }
        let parameters: Vec<SymbolId> = source
            .parameters
            .iter()
            .map(|&p| self.instantiate_symbol(p, &mapper))
            .collect();
        let this_parameter = source.this_parameter.map(|p| self.instantiate_symbol(p, &mapper));
        let result = self.ctx.types.alloc_signature(source.declaration);
        let created = self.ctx.types.signature_mut(result);
        created.flags = source.flags;
        created.type_parameters = type_parameters;
        created.parameters = parameters;
        created.this_parameter = this_parameter;
        created.min_argument_count = source.min_argument_count;
        created.target = Some(signature);
        created.mapper = Some(mapper);
        result
    }

    /// Signature with its type parameters replaced by `type_arguments`.
    /// Cached per argument list.
    pub(crate) fn get_signature_instantiation(
        &mut self,
        signature: SignatureId,
        type_arguments: &[TypeId],
    ) -> SignatureId {
        let key = get_type_list_id(type_arguments);
        if let Some(&cached) = self.ctx.types.signature(signature).instantiations.get(&key) {
            return cached;
        }
        let parameters = self.ctx.types.signature(signature).type_parameters.clone();
        let mapper = TypeMapper::from_lists(parameters, Some(type_arguments.to_vec()));
        let result = self.instantiate_signature(signature, &mapper, true);
        self.ctx
            .types
            .signature_mut(signature)
            .instantiations
            .insert(key, result);
        result
    }

    /// The signature with its type parameters replaced by `any`.
    pub(crate) fn get_erased_signature(&mut self, signature: SignatureId) -> SignatureId {
        let source = self.ctx.types.signature(signature);
        if source.type_parameters.is_empty() {
            return signature;
        }
        if let Some(erased) = source.erased_signature {
            return erased;
        }
        let mapper = Self::create_any_mapper(&source.type_parameters);
        let erased = self.instantiate_signature(signature, &mapper, true);
        self.ctx.types.signature_mut(signature).erased_signature = Some(erased);
        erased
    }

    // =========================================================================
    // Classes
    // =========================================================================

    /// Construct signatures on the static side of a class: the declared
    /// constructors, or ones derived from the base class.
    pub(crate) fn get_construct_signatures_of_class(&mut self, symbol: SymbolId, class_type: TypeId) -> Vec<SignatureId> {
        let constructor = self
            .symbol(symbol)
            .members
            .as_ref()
            .and_then(|m| m.get(internal_names::CONSTRUCTOR).copied());
        if let Some(constructor) = constructor {
            let signatures = self.get_signatures_of_symbol(constructor);
            if !signatures.is_empty() {
                return signatures;
            }
        }
        self.get_default_construct_signatures(symbol, class_type)
    }

    fn get_default_construct_signatures(&mut self, symbol: SymbolId, class_type: TypeId) -> Vec<SignatureId> {
        let declaration = self
            .symbol_declarations(symbol)
            .into_iter()
            .find(|&d| matches!(self.ctx.arena.kind(d), Some(NodeKind::ClassDeclaration(_))))
            .unwrap_or(NodeIndex::NONE);
        let is_abstract = self.ctx.arena.has_flag(declaration, node_flags::ABSTRACT);
        let local_type_parameters = self
            .ty(class_type)
            .as_interface()
            .map(|i| i.local_type_parameters.clone())
            .unwrap_or_default();
        let base_constructor = self.get_base_constructor_type_of_class(class_type);
        let base_signatures = self.get_signatures_of_type(base_constructor, SignatureKind::Construct);
        if base_signatures.is_empty() {
            let signature = self.ctx.types.alloc_signature(declaration);
            let created = self.ctx.types.signature_mut(signature);
            created.type_parameters = local_type_parameters;
            created.resolved_return_type = Some(class_type);
            if is_abstract {
                created.flags |= SignatureFlags::ABSTRACT;
            }
            return vec![signature];
        }
        let base_node = self.get_base_type_node_of_class(class_type);
        let type_argument_nodes = match self.ctx.arena.kind(base_node) {
            Some(NodeKind::ExpressionWithTypeArguments(data)) => data.type_arguments.clone(),
            _ => Vec::new(),
        };
        let type_arguments: Vec<TypeId> = type_argument_nodes
            .iter()
            .map(|&n| self.get_type_from_type_node(n))
            .collect();
        let mut result = Vec::new();
        for base in base_signatures {
            let base_parameters = self.ctx.types.signature(base).type_parameters.clone();
            let min = self.get_min_type_argument_count(&base_parameters);
            if type_arguments.len() < min || type_arguments.len() > base_parameters.len() {
                continue;
            }
            let signature = if base_parameters.is_empty() {
                self.ctx.types.clone_signature(base)
            } else {
                let filled = self.fill_missing_type_arguments(&type_arguments, &base_parameters, min);
                let instantiated = self.get_signature_instantiation(base, &filled);
                self.ctx.types.clone_signature(instantiated)
            };
            let created = self.ctx.types.signature_mut(signature);
            created.type_parameters = local_type_parameters.clone();
            created.resolved_return_type = Some(class_type);
            created.flags.set(SignatureFlags::ABSTRACT, is_abstract);
            result.push(signature);
        }
        result
    }

    // =========================================================================
    // Union signatures
    // =========================================================================

    /// Signatures shared by every constituent of a union. Signatures that
    /// match across constituents are merged with a union return type; when
    /// each constituent has a single signature they are combined with
    /// intersected parameters.
    pub(crate) fn get_union_signatures(&mut self, types: &[TypeId], kind: SignatureKind) -> Vec<SignatureId> {
        let lists: Vec<Vec<SignatureId>> = types
            .iter()
            .map(|&t| self.get_signatures_of_type(t, kind))
            .collect();
        if lists.iter().any(Vec::is_empty) {
            return Vec::new();
        }
        let mut result: Vec<SignatureId> = Vec::new();
        for (index, list) in lists.iter().enumerate() {
            for &signature in list {
                if result
                    .iter()
                    .any(|&r| self.compare_signatures_identical(r, signature, false, true))
                {
                    continue;
                }
                if let Some(matches) = self.find_matching_signatures(&lists, signature, index) {
                    let merged = if matches.len() > 1 {
                        self.create_union_signature(signature, &matches)
                    } else {
                        signature
                    };
                    result.push(merged);
                }
            }
        }
        if result.is_empty() && lists.iter().all(|l| l.len() == 1) {
            let singles: Vec<SignatureId> = lists.iter().map(|l| l[0]).collect();
            let generic = singles
                .iter()
                .any(|&s| !self.ctx.types.signature(s).type_parameters.is_empty());
            if !generic {
                let mut combined = singles[0];
                for &next in &singles[1..] {
                    combined = self.combine_signatures_of_union_members(combined, next);
                }
                result.push(combined);
            }
        }
        result
    }

    fn find_matching_signatures(
        &mut self,
        lists: &[Vec<SignatureId>],
        signature: SignatureId,
        list_index: usize,
    ) -> Option<Vec<SignatureId>> {
        if !self.ctx.types.signature(signature).type_parameters.is_empty() {
            if list_index > 0 {
                return None;
            }
            for list in &lists[1..] {
                if !list
                    .iter()
                    .any(|&s| self.compare_signatures_identical(s, signature, false, false))
                {
                    return None;
                }
            }
            return Some(vec![signature]);
        }
        let mut result: Vec<SignatureId> = Vec::new();
        for (i, list) in lists.iter().enumerate() {
            let found = if i == list_index {
                Some(signature)
            } else {
                list.iter()
                    .copied()
                    .find(|&s| self.compare_signatures_identical(s, signature, false, true))
                    .or_else(|| {
                        list.iter()
                            .copied()
                            .find(|&s| self.compare_signatures_identical(s, signature, true, true))
                    })
            };
            let found = found?;
            if !result.contains(&found) {
                result.push(found);
            }
        }
        Some(result)
    }

    fn create_union_signature(&mut self, signature: SignatureId, members: &[SignatureId]) -> SignatureId {
        let result = self.ctx.types.clone_signature(signature);
        let returns: Vec<TypeId> = members
            .iter()
            .map(|&s| self.get_return_type_of_signature(s))
            .collect();
        let return_type = self.get_union_type(&returns);
        let created = self.ctx.types.signature_mut(result);
        created.target = None;
        created.mapper = None;
        created.resolved_return_type = Some(return_type);
        result
    }

    /// One signature accepting what both accept: parameter types intersect
    /// and return types unite.
    fn combine_signatures_of_union_members(&mut self, left: SignatureId, right: SignatureId) -> SignatureId {
        let left_count = self.get_parameter_count(left);
        let right_count = self.get_parameter_count(right);
        let longest = if left_count >= right_count { left } else { right };
        let count = left_count.max(right_count);
        let mut parameters = Vec::with_capacity(count);
        for i in 0..count {
            let left_type = self.get_type_at_position(left, i).unwrap_or(TypeId::UNKNOWN);
            let right_type = self.get_type_at_position(right, i).unwrap_or(TypeId::UNKNOWN);
            let t = self.get_intersection_type(&[left_type, right_type]);
            let name = self
                .ctx
                .types
                .signature(longest)
                .parameters
                .get(i)
                .map(|&p| self.symbol_name(p))
                .unwrap_or_else(|| format!("arg{i}"));
            let symbol = self.create_symbol(symbol_flags::FUNCTION_SCOPED_VARIABLE, &name, CheckFlags::empty());
            self.links(symbol).type_ = Some(t);
            parameters.push(symbol);
        }
        let left_return = self.get_return_type_of_signature(left);
        let right_return = self.get_return_type_of_signature(right);
        let return_type = self.get_union_type(&[left_return, right_return]);
        let min = self
            .ctx
            .types
            .signature(left)
            .min_argument_count
            .max(self.ctx.types.signature(right).min_argument_count);
        let result = self.ctx.types.alloc_signature(NodeIndex::NONE);
        let created = self.ctx.types.signature_mut(result);
        created.parameters = parameters;
        created.min_argument_count = min;
        created.resolved_return_type = Some(return_type);
        result
    }

    // =========================================================================
    // Comparison
    // =========================================================================

    /// Declared by a method or constructor; such signatures compare their
    /// parameters bivariantly.
    pub(crate) fn is_method_signature(&self, signature: SignatureId) -> bool {
        let declaration = self.ctx.types.signature(signature).declaration;
        matches!(
            self.ctx.arena.kind(declaration),
            Some(NodeKind::MethodDeclaration(_) | NodeKind::MethodSignature(_) | NodeKind::Constructor(_))
        )
    }

    /// Parameter counts line up: equal arity, or with `partial_match` the
    /// source requires no more arguments than the target.
    fn is_matching_signature(&mut self, source: SignatureId, target: SignatureId, partial_match: bool) -> bool {
        let source_count = self.get_parameter_count(source);
        let target_count = self.get_parameter_count(target);
        let (s, t) = (self.ctx.types.signature(source), self.ctx.types.signature(target));
        if source_count == target_count
            && s.min_argument_count == t.min_argument_count
            && s.has_rest_parameter() == t.has_rest_parameter()
        {
            return true;
        }
        partial_match && s.min_argument_count <= t.min_argument_count
    }

    /// Signatures with identical type parameters, parameter types and
    /// (unless ignored) return types.
    pub(crate) fn compare_signatures_identical(
        &mut self,
        source: SignatureId,
        target: SignatureId,
        partial_match: bool,
        ignore_return_types: bool,
    ) -> bool {
        if source == target {
            return true;
        }
        if !self.is_matching_signature(source, target, partial_match) {
            return false;
        }
        let source_parameters = self.ctx.types.signature(source).type_parameters.clone();
        let target_parameters = self.ctx.types.signature(target).type_parameters.clone();
        if source_parameters.len() != target_parameters.len() {
            return false;
        }
        let mapper = (!target_parameters.is_empty())
            .then(|| TypeMapper::from_lists(target_parameters.clone(), Some(source_parameters.clone())));
        for (&s, &t) in source_parameters.iter().zip(&target_parameters) {
            let source_constraint = self.get_constraint_of_type_parameter(s).unwrap_or(TypeId::UNKNOWN);
            let target_constraint = self.get_constraint_of_type_parameter(t).unwrap_or(TypeId::UNKNOWN);
            let target_constraint = self.instantiate_type_opt(target_constraint, mapper.as_ref());
            if !self.is_type_identical_to(source_constraint, target_constraint) {
                return false;
            }
        }
        let count = self.get_parameter_count(target);
        for i in 0..count {
            let (Some(s), Some(t)) = (self.get_type_at_position(source, i), self.get_type_at_position(target, i)) else {
                return false;
            };
            let t = self.instantiate_type_opt(t, mapper.as_ref());
            if !self.is_type_identical_to(s, t) {
                return false;
            }
        }
        if !ignore_return_types {
            let s = self.get_return_type_of_signature(source);
            let t = self.get_return_type_of_signature(target);
            let t = self.instantiate_type_opt(t, mapper.as_ref());
            return self.is_type_identical_to(s, t);
        }
        true
    }
}
