//! Call and `new` expression resolution.
//!
//! Candidates are the call (or construct) signatures of the callee's
//! apparent type, tried in declaration order. A candidate is chosen when it
//! accepts the argument count, the explicit type argument count, and every
//! argument type. Generic candidates are instantiated from explicit type
//! arguments or by inference over the arguments.

use tracing::{debug, trace};
use tyck_binder::{NodeIndex, NodeKind};
use tyck_common::diagnostics::diagnostic_codes;
use tyck_types::{SignatureId, SignatureKind, TypeFlags, TypeId};

use crate::infer::{InferenceFlags, InferencePriority};
use crate::state::CheckerState;

/// First argument that failed a candidate.
#[derive(Clone, Copy, Debug)]
struct ArgumentMismatch {
    argument: NodeIndex,
    source: TypeId,
    target: TypeId,
}

/// Why a candidate was rejected.
#[derive(Clone, Copy, Debug)]
enum CandidateError {
    Arity,
    TypeArity,
    Argument(ArgumentMismatch),
}

impl<'a> CheckerState<'a> {
    /// Type of a call or `new` expression.
    pub(crate) fn check_call_expression(&mut self, node: NodeIndex, kind: SignatureKind) -> TypeId {
        let arena = self.ctx.arena;
        let call = match arena.kind(node) {
            Some(NodeKind::CallExpression(call) | NodeKind::NewExpression(call)) => call.clone(),
            _ => return TypeId::ERROR,
        };
        let callee = self.check_expression(call.expression);
        if callee.is_error() || self.type_flags(callee).intersects(TypeFlags::ANY) {
            for &argument in &call.arguments {
                self.check_expression(argument);
            }
            return if callee.is_error() { TypeId::ERROR } else { TypeId::ANY };
        }
        let callee = self.get_non_nullable_type(callee);
        let apparent = self.get_apparent_type(callee);
        let signatures = self.get_signatures_of_type(apparent, kind);
        if signatures.is_empty() {
            for &argument in &call.arguments {
                self.check_expression(argument);
            }
            let code = match kind {
                SignatureKind::Call => diagnostic_codes::EXPRESSION_NOT_CALLABLE,
                SignatureKind::Construct => diagnostic_codes::EXPRESSION_NOT_CONSTRUCTABLE,
            };
            self.error(call.expression, code, &[]);
            return TypeId::ERROR;
        }
        let type_arguments: Vec<TypeId> = call
            .type_arguments
            .iter()
            .map(|&t| self.get_type_from_type_node(t))
            .collect();
        let signature = self.resolve_call(node, &signatures, &call.type_arguments, &type_arguments, &call.arguments);
        self.node_links(node).resolved_signature = Some(signature);
        let return_type = self.get_return_type_of_signature(signature);
        if kind == SignatureKind::Construct && self.type_flags(return_type).contains(TypeFlags::VOID) {
            return TypeId::ANY;
        }
        return_type
    }

    /// Pick the signature a call resolves to. Reports arity, type argument
    /// and argument errors and still returns a best-effort candidate.
    fn resolve_call(
        &mut self,
        node: NodeIndex,
        signatures: &[SignatureId],
        type_argument_nodes: &[NodeIndex],
        type_arguments: &[TypeId],
        arguments: &[NodeIndex],
    ) -> SignatureId {
        let mut errors: Vec<(SignatureId, CandidateError)> = Vec::new();
        for &candidate in signatures {
            match self.check_candidate(candidate, type_argument_nodes, type_arguments, arguments) {
                Ok(resolved) => {
                    trace!(candidate = candidate.0, resolved = resolved.0, "call resolved");
                    return resolved;
                }
                Err(error) => errors.push((candidate, error)),
            }
        }
        debug!(candidates = signatures.len(), "no applicable signature");

        let argument_failures: Vec<ArgumentMismatch> = errors
            .iter()
            .filter_map(|&(_, e)| match e {
                CandidateError::Argument(mismatch) => Some(mismatch),
                _ => None,
            })
            .collect();
        if argument_failures.len() > 1 || (!argument_failures.is_empty() && signatures.len() > 1) {
            self.error(node, diagnostic_codes::NO_OVERLOAD_MATCHES_THIS_CALL, &[]);
        } else if let Some(mismatch) = argument_failures.first() {
            self.report_argument_not_assignable(mismatch.argument, mismatch.source, mismatch.target);
        } else if errors.iter().all(|(_, e)| matches!(e, CandidateError::TypeArity)) {
            self.report_type_arity_error(node, signatures, type_arguments.len());
        } else {
            self.report_arity_error(node, signatures, arguments);
        }
        signatures[0]
    }

    /// Check one candidate; `Ok` carries the (instantiated) signature.
    fn check_candidate(
        &mut self,
        candidate: SignatureId,
        type_argument_nodes: &[NodeIndex],
        type_arguments: &[TypeId],
        arguments: &[NodeIndex],
    ) -> Result<SignatureId, CandidateError> {
        if !self.has_correct_arity(candidate, arguments) {
            return Err(CandidateError::Arity);
        }
        let type_parameters = self.ctx.types.signature(candidate).type_parameters.clone();
        let instantiated = if type_parameters.is_empty() {
            if !type_arguments.is_empty() {
                return Err(CandidateError::TypeArity);
            }
            candidate
        } else if !type_arguments.is_empty() {
            let min = self.get_min_type_argument_count(&type_parameters);
            if type_arguments.len() < min || type_arguments.len() > type_parameters.len() {
                return Err(CandidateError::TypeArity);
            }
            let filled = self.fill_missing_type_arguments(type_arguments, &type_parameters, min);
            self.check_type_argument_constraints(&type_parameters, &filled, type_argument_nodes);
            self.get_signature_instantiation(candidate, &filled)
        } else {
            self.infer_signature_instantiation(candidate, &type_parameters, arguments)
        };
        self.check_arguments(instantiated, arguments)?;
        Ok(instantiated)
    }

    fn has_correct_arity(&mut self, signature: SignatureId, arguments: &[NodeIndex]) -> bool {
        let arena = self.ctx.arena;
        let has_spread = arguments
            .iter()
            .any(|&a| matches!(arena.kind(a), Some(NodeKind::SpreadElement(_))));
        let (min, has_rest) = {
            let s = self.ctx.types.signature(signature);
            (s.min_argument_count, s.has_rest_parameter())
        };
        let count = self.get_parameter_count(signature);
        if has_spread {
            return has_rest || arguments.len() <= count;
        }
        arguments.len() >= min && (has_rest || arguments.len() <= count)
    }

    fn check_type_argument_constraints(
        &mut self,
        type_parameters: &[TypeId],
        type_arguments: &[TypeId],
        nodes: &[NodeIndex],
    ) {
        let mapper = tyck_types::TypeMapper::from_lists(type_parameters.to_vec(), Some(type_arguments.to_vec()));
        for (i, (&parameter, &argument)) in type_parameters.iter().zip(type_arguments).enumerate() {
            let Some(constraint) = self.get_constraint_of_type_parameter(parameter) else {
                continue;
            };
            let constraint = self.instantiate_type(constraint, &mapper);
            if !self.is_type_assignable_to(argument, constraint) {
                let node = nodes.get(i).copied().unwrap_or(NodeIndex::NONE);
                self.report_constraint_not_satisfied(node, argument, constraint);
            }
        }
    }

    /// Infer type arguments from the call's arguments.
    ///
    /// Arguments that are not context sensitive are inferred from first.
    /// Context-sensitive arguments (functions with unannotated parameters)
    /// are then checked against the parameter type instantiated with the
    /// inferences so far, and inferred from in turn.
    fn infer_signature_instantiation(
        &mut self,
        signature: SignatureId,
        type_parameters: &[TypeId],
        arguments: &[NodeIndex],
    ) -> SignatureId {
        let context = self.create_inference_context(type_parameters, Some(signature), InferenceFlags::empty());
        let mut deferred = Vec::new();
        for (position, &argument) in arguments.iter().enumerate() {
            if self.is_context_sensitive(argument) {
                deferred.push((position, argument));
                continue;
            }
            let Some(parameter_type) = self.get_argument_parameter_type(signature, argument, position) else {
                continue;
            };
            let argument_type = self.check_argument(argument);
            self.infer_types(context, argument_type, parameter_type, InferencePriority::empty());
        }
        for (position, argument) in deferred {
            let Some(parameter_type) = self.get_argument_parameter_type(signature, argument, position) else {
                continue;
            };
            let mapper = self.inference_context(context).mapper.clone();
            let contextual = self.instantiate_type(parameter_type, &mapper);
            self.ctx.contextual_types.push((argument, contextual));
            let argument_type = self.check_expression(argument);
            self.ctx.contextual_types.pop();
            self.infer_types(context, argument_type, parameter_type, InferencePriority::empty());
        }
        let inferred = self.get_inferred_types(context);
        trace!(signature = signature.0, ?inferred, "inferred type arguments");
        self.get_signature_instantiation(signature, &inferred)
    }

    /// Relate every argument to its parameter.
    fn check_arguments(&mut self, signature: SignatureId, arguments: &[NodeIndex]) -> Result<(), CandidateError> {
        for (position, &argument) in arguments.iter().enumerate() {
            let Some(parameter_type) = self.get_argument_parameter_type(signature, argument, position) else {
                continue;
            };
            let argument_type = if self.is_context_sensitive(argument)
                && self.node_links_ref(argument).and_then(|l| l.resolved_type).is_none()
            {
                self.ctx.contextual_types.push((argument, parameter_type));
                let t = self.check_expression(argument);
                self.ctx.contextual_types.pop();
                t
            } else {
                self.check_argument(argument)
            };
            if !self.is_type_assignable_to(argument_type, parameter_type) {
                return Err(CandidateError::Argument(ArgumentMismatch {
                    argument,
                    source: argument_type,
                    target: parameter_type,
                }));
            }
        }
        Ok(())
    }

    /// Argument type; a spread contributes its element type.
    fn check_argument(&mut self, argument: NodeIndex) -> TypeId {
        match self.ctx.arena.kind(argument) {
            Some(NodeKind::SpreadElement(spread)) => {
                let spread_type = self.check_expression(spread.expression);
                if self.is_tuple_type(spread_type) {
                    let elements = self.get_element_types(spread_type);
                    return self.get_union_type(&elements);
                }
                self.array_like_element_type(spread_type).unwrap_or(TypeId::ANY)
            }
            _ => self.check_expression(argument),
        }
    }

    fn get_argument_parameter_type(
        &mut self,
        signature: SignatureId,
        argument: NodeIndex,
        position: usize,
    ) -> Option<TypeId> {
        let t = self.get_type_at_position(signature, position)?;
        if matches!(self.ctx.arena.kind(argument), Some(NodeKind::SpreadElement(_))) && self.is_array_type(t) {
            return self.array_like_element_type(t);
        }
        Some(t)
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    fn report_arity_error(&mut self, node: NodeIndex, signatures: &[SignatureId], arguments: &[NodeIndex]) {
        let mut min = usize::MAX;
        let mut max = 0;
        let mut has_rest = false;
        for &signature in signatures {
            let s = self.ctx.types.signature(signature);
            min = min.min(s.min_argument_count);
            has_rest |= s.has_rest_parameter();
            let count = self.get_parameter_count(signature);
            max = max.max(count);
        }
        let got = arguments.len().to_string();
        if has_rest && arguments.len() < min {
            self.error(node, diagnostic_codes::EXPECTED_AT_LEAST_ARGUMENTS, &[&min.to_string(), &got]);
            return;
        }
        let expected = if min == max {
            min.to_string()
        } else if arguments.len() < min {
            min.to_string()
        } else {
            format!("{min}-{max}")
        };
        self.error(node, diagnostic_codes::EXPECTED_ARGUMENTS, &[&expected, &got]);
    }

    fn report_type_arity_error(&mut self, node: NodeIndex, signatures: &[SignatureId], got: usize) {
        let mut min = usize::MAX;
        let mut max = 0;
        for &signature in signatures {
            let parameters = self.ctx.types.signature(signature).type_parameters.clone();
            min = min.min(self.get_min_type_argument_count(&parameters));
            max = max.max(parameters.len());
        }
        let expected = if min == max { min.to_string() } else { format!("{min}-{max}") };
        self.error(node, diagnostic_codes::EXPECTED_TYPE_ARGUMENTS, &[&expected, &got.to_string()]);
    }
}
