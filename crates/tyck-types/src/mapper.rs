//! Type mappers: substitutions from type parameters to types.
//!
//! Mappers are plain data. Variants that need checker state (inference
//! contexts, deferred slots, named transforms) carry ids that the checker
//! interprets when it applies the mapper.

use std::rc::Rc;

use crate::type_id::TypeId;

/// Index of an inference context owned by the checker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InferenceContextId(pub u32);

/// Named transforms applied to type parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapperFunction {
    /// Type parameters map to the wildcard type.
    Permissive,
    /// Type parameters map to unconstrained clones of themselves.
    Restrictive,
    /// Identity; marks the variance being measured as unmeasurable.
    Unmeasurable,
    /// Identity; marks the variance being measured as unreliable.
    Unreliable,
}

/// Lazily computed target of a deferred mapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeferredTarget {
    /// Inferred type of slot `index` in an inference context.
    InferredType {
        context: InferenceContextId,
        index: usize,
    },
}

#[derive(Clone, Debug)]
pub enum TypeMapper {
    Simple {
        source: TypeId,
        target: TypeId,
    },
    /// `targets == None` maps every source to `any`.
    Array {
        sources: Vec<TypeId>,
        targets: Option<Vec<TypeId>>,
    },
    ArrayToSingle {
        sources: Vec<TypeId>,
        target: TypeId,
    },
    Deferred {
        sources: Vec<TypeId>,
        targets: Vec<DeferredTarget>,
    },
    Function(MapperFunction),
    /// Maps the context's type parameters to their current inferences,
    /// fixing them when `fixing` is set.
    Inference {
        context: InferenceContextId,
        fixing: bool,
    },
    /// Apply `mapper1`, then `mapper2` to the result.
    Merged {
        mapper1: Rc<TypeMapper>,
        mapper2: Rc<TypeMapper>,
    },
    /// Apply `mapper1`; if it changed the type, instantiate the result with
    /// `mapper2`, otherwise apply `mapper2`.
    Composite {
        mapper1: Rc<TypeMapper>,
        mapper2: Rc<TypeMapper>,
    },
}

impl TypeMapper {
    /// Mapper for parallel source and target lists.
    pub fn from_lists(sources: Vec<TypeId>, targets: Option<Vec<TypeId>>) -> Rc<TypeMapper> {
        if sources.len() == 1 {
            let target = match targets.as_deref() {
                Some([target]) => Some(*target),
                None => Some(TypeId::ANY),
                Some(_) => None,
            };
            if let Some(target) = target {
                return Rc::new(TypeMapper::Simple {
                    source: sources[0],
                    target,
                });
            }
        }
        Rc::new(TypeMapper::Array { sources, targets })
    }

    /// `mapper1` followed by `mapper2`, skipping absent halves.
    pub fn combine(
        mapper1: Option<Rc<TypeMapper>>,
        mapper2: Option<Rc<TypeMapper>>,
    ) -> Option<Rc<TypeMapper>> {
        match (mapper1, mapper2) {
            (Some(m1), Some(m2)) => Some(Rc::new(TypeMapper::Composite {
                mapper1: m1,
                mapper2: m2,
            })),
            (m1, None) => m1,
            (None, m2) => m2,
        }
    }

    pub fn merge(
        mapper1: Option<Rc<TypeMapper>>,
        mapper2: Option<Rc<TypeMapper>>,
    ) -> Option<Rc<TypeMapper>> {
        match (mapper1, mapper2) {
            (Some(m1), Some(m2)) => Some(Rc::new(TypeMapper::Merged {
                mapper1: m1,
                mapper2: m2,
            })),
            (m1, None) => m1,
            (None, m2) => m2,
        }
    }

    /// Structural mapping for the variants that need no checker state.
    ///
    /// Returns `None` for variants the checker has to evaluate.
    pub fn map_simple(&self, t: TypeId) -> Option<TypeId> {
        match self {
            TypeMapper::Simple { source, target } => Some(if t == *source { *target } else { t }),
            TypeMapper::Array { sources, targets } => {
                let index = sources.iter().position(|&s| s == t);
                Some(match (index, targets) {
                    (Some(i), Some(targets)) => targets.get(i).copied().unwrap_or(TypeId::ANY),
                    (Some(_), None) => TypeId::ANY,
                    (None, _) => t,
                })
            }
            TypeMapper::ArrayToSingle { sources, target } => {
                Some(if sources.contains(&t) { *target } else { t })
            }
            _ => None,
        }
    }
}
