//! Assignability and relation error reporting.

use tyck_binder::NodeIndex;
use tyck_common::diagnostics::diagnostic_codes;
use tyck_types::TypeId;

use crate::state::CheckerState;

impl<'a> CheckerState<'a> {
    /// Report "Type '{0}' is not assignable to type '{1}'." (2322).
    pub(crate) fn report_type_not_assignable(&mut self, node: NodeIndex, source: TypeId, target: TypeId) {
        if source.is_error() || target.is_error() {
            return;
        }
        let (source_str, target_str) = self.type_pair_to_strings(source, target);
        self.error(
            node,
            diagnostic_codes::TYPE_NOT_ASSIGNABLE,
            &[&source_str, &target_str],
        );
    }

    /// Report "Argument of type '{0}' is not assignable to parameter of type
    /// '{1}'." (2345).
    pub(crate) fn report_argument_not_assignable(&mut self, node: NodeIndex, source: TypeId, target: TypeId) {
        if source.is_error() || target.is_error() {
            return;
        }
        let (source_str, target_str) = self.type_pair_to_strings(source, target);
        self.error(
            node,
            diagnostic_codes::ARGUMENT_NOT_ASSIGNABLE,
            &[&source_str, &target_str],
        );
    }

    /// Report a type argument that violates its constraint (2344).
    pub(crate) fn report_constraint_not_satisfied(&mut self, node: NodeIndex, source: TypeId, constraint: TypeId) {
        if source.is_error() || constraint.is_error() {
            return;
        }
        let (source_str, target_str) = self.type_pair_to_strings(source, constraint);
        self.error(
            node,
            diagnostic_codes::TYPE_DOES_NOT_SATISFY_CONSTRAINT,
            &[&source_str, &target_str],
        );
    }

    /// Printed forms of two types. Identical renderings are disambiguated by
    /// printing the fully qualified names.
    fn type_pair_to_strings(&mut self, source: TypeId, target: TypeId) -> (String, String) {
        let source_str = self.type_to_string(source);
        let target_str = self.type_to_string(target);
        if source_str == target_str {
            return (
                self.type_to_string_qualified(source),
                self.type_to_string_qualified(target),
            );
        }
        (source_str, target_str)
    }
}
