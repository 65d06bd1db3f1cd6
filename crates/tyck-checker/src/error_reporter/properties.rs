//! Missing-property and bad-index errors.

use tyck_binder::NodeIndex;
use tyck_common::diagnostics::diagnostic_codes;
use tyck_types::TypeId;

use super::get_spelling_suggestion;
use crate::state::CheckerState;

impl<'a> CheckerState<'a> {
    /// Report 2339, or 2551 when a property with a close name exists.
    pub(crate) fn report_nonexistent_property(&mut self, node: NodeIndex, name: &str, containing: TypeId) {
        if containing.is_error() {
            return;
        }
        let type_str = self.type_to_string(containing);
        let apparent = self.get_apparent_type(containing);
        let names: Vec<String> = self
            .get_properties_of_type(apparent)
            .into_iter()
            .map(|p| self.symbol_name(p))
            .collect();
        match get_spelling_suggestion(name, names.iter().map(String::as_str)) {
            Some(suggestion) => {
                self.error(
                    node,
                    diagnostic_codes::PROPERTY_DOES_NOT_EXIST_DID_YOU_MEAN,
                    &[name, &type_str, &suggestion],
                );
            }
            None => {
                self.error(node, diagnostic_codes::PROPERTY_DOES_NOT_EXIST, &[name, &type_str]);
            }
        }
    }

    /// Report 7053 for an expression index that cannot index `object`.
    pub(crate) fn report_implicit_any_element_access(&mut self, node: NodeIndex, index: TypeId, object: TypeId) {
        if index.is_error() || object.is_error() {
            return;
        }
        let index_str = self.type_to_string(index);
        let object_str = self.type_to_string(object);
        self.error(
            node,
            diagnostic_codes::ELEMENT_IMPLICITLY_HAS_ANY_TYPE,
            &[&index_str, &object_str],
        );
    }
}
