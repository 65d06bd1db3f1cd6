//! Variance measurement for generic class, interface, tuple and type alias
//! targets.

use tracing::{debug, trace};
use tyck_binder::SymbolId;
use tyck_types::{TypeId, VarianceFlags};

use crate::state::CheckerState;

/// Generic declaration whose variances are measured.
#[derive(Clone, Copy, Debug)]
enum VarianceSubject {
    Target(TypeId),
    Alias(SymbolId),
}

impl<'a> CheckerState<'a> {
    /// Variance of each type parameter of `target`, measured by relating
    /// marker instantiations. Cached on the target.
    pub(crate) fn get_variances(&mut self, target: TypeId) -> Vec<VarianceFlags> {
        let Some(iface) = self.ty(target).as_interface() else {
            return Vec::new();
        };
        if let Some(tuple) = &iface.tuple {
            return vec![VarianceFlags::COVARIANT; tuple.element_flags.len()];
        }
        if let Some(variances) = &iface.variances {
            return variances.clone();
        }
        let parameters = iface.type_parameters.clone();
        if self.is_array_type_target(target) {
            return vec![VarianceFlags::COVARIANT; parameters.len()];
        }
        self.compute_variances(VarianceSubject::Target(target), &parameters)
    }

    /// Variance of each type parameter of a generic type alias. Cached in the
    /// alias symbol's links.
    pub(crate) fn get_alias_variances(&mut self, symbol: SymbolId) -> Vec<VarianceFlags> {
        if let Some(variances) = self.links_ref(symbol).and_then(|l| l.variances.clone()) {
            return variances;
        }
        let parameters = self.get_type_alias_type_parameters(symbol);
        if parameters.is_empty() {
            return Vec::new();
        }
        self.compute_variances(VarianceSubject::Alias(symbol), &parameters)
    }

    fn compute_variances(&mut self, subject: VarianceSubject, parameters: &[TypeId]) -> Vec<VarianceFlags> {
        // References encountered while measuring see a covariant
        // placeholder.
        self.set_variances(subject, vec![VarianceFlags::COVARIANT; parameters.len()]);

        // Resolutions already in flight are not part of this measurement's
        // cycles.
        let outermost = !self.ctx.in_variance_computation;
        let saved_start = self.ctx.resolution_start;
        if outermost {
            self.ctx.in_variance_computation = true;
            self.ctx.resolution_start = self.ctx.resolution_targets.len();
        }

        let mut variances = Vec::with_capacity(parameters.len());
        for index in 0..parameters.len() {
            let variance = self.measure_variance(subject, parameters, index);
            trace!(?subject, index, ?variance, "measured variance");
            variances.push(variance);
        }

        if outermost {
            self.ctx.in_variance_computation = false;
            self.ctx.resolution_start = saved_start;
        }
        debug!(?subject, ?variances, "variances computed");
        self.set_variances(subject, variances.clone());
        variances
    }

    fn measure_variance(&mut self, subject: VarianceSubject, parameters: &[TypeId], index: usize) -> VarianceFlags {
        let saved_marks = self.ctx.variance_marks.replace(VarianceFlags::empty());

        let with_super = self.marker_instantiation(subject, parameters, index, TypeId::MARKER_SUPER);
        let with_sub = self.marker_instantiation(subject, parameters, index, TypeId::MARKER_SUB);
        let mut variance = VarianceFlags::empty();
        if self.is_type_assignable_to(with_sub, with_super) {
            variance |= VarianceFlags::COVARIANT;
        }
        if self.is_type_assignable_to(with_super, with_sub) {
            variance |= VarianceFlags::CONTRAVARIANT;
        }
        // An unrelated marker still relating means the parameter is unused.
        if variance == VarianceFlags::BIVARIANT {
            let with_other = self.marker_instantiation(subject, parameters, index, TypeId::MARKER_OTHER);
            if self.is_type_assignable_to(with_other, with_super) {
                variance = VarianceFlags::INDEPENDENT;
            }
        }

        let marks = std::mem::replace(&mut self.ctx.variance_marks, saved_marks).unwrap_or_default();
        if marks.contains(VarianceFlags::UNMEASURABLE) {
            variance |= VarianceFlags::UNMEASURABLE | VarianceFlags::ALLOWS_STRUCTURAL_FALLBACK;
        }
        if marks.contains(VarianceFlags::UNRELIABLE) {
            variance |= VarianceFlags::UNRELIABLE | VarianceFlags::ALLOWS_STRUCTURAL_FALLBACK;
        }
        variance
    }

    fn marker_instantiation(
        &mut self,
        subject: VarianceSubject,
        parameters: &[TypeId],
        index: usize,
        marker: TypeId,
    ) -> TypeId {
        let mut arguments = parameters.to_vec();
        arguments[index] = marker;
        match subject {
            VarianceSubject::Target(target) => self.ctx.types.create_type_reference(target, arguments),
            VarianceSubject::Alias(symbol) => self.get_type_alias_instantiation(symbol, arguments),
        }
    }

    fn set_variances(&mut self, subject: VarianceSubject, variances: Vec<VarianceFlags>) {
        match subject {
            VarianceSubject::Target(target) => {
                if let Some(iface) = self.ctx.types.get_mut(target).as_interface_mut() {
                    iface.variances = Some(variances);
                }
            }
            VarianceSubject::Alias(symbol) => self.links(symbol).variances = Some(variances),
        }
    }

    fn is_array_type_target(&self, target: TypeId) -> bool {
        self.ctx
            .array_targets
            .is_some_and(|(array, readonly)| target == array || target == readonly)
            || self.is_global_array_target(target)
    }
}

#[cfg(test)]
#[path = "../tests/variance_tests.rs"]
mod tests;
