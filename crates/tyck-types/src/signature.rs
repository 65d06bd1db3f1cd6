//! Call and construct signatures, and index infos.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use tyck_binder::{NodeIndex, SymbolId};

use crate::flags::SignatureFlags;
use crate::mapper::TypeMapper;
use crate::type_id::TypeId;

/// Index of a signature in the interner's signature arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignatureId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignatureKind {
    Call,
    Construct,
}

#[derive(Clone, Debug)]
pub struct Signature {
    pub id: SignatureId,
    pub flags: SignatureFlags,
    /// Declaring node, or NONE for synthetic signatures.
    pub declaration: NodeIndex,
    pub type_parameters: Vec<TypeId>,
    /// Parameter symbols in order; the last one is the rest parameter when
    /// `HAS_REST_PARAMETER` is set.
    pub parameters: Vec<SymbolId>,
    pub this_parameter: Option<SymbolId>,
    pub resolved_return_type: Option<TypeId>,
    pub min_argument_count: usize,
    /// Uninstantiated signature of an instantiation.
    pub target: Option<SignatureId>,
    pub mapper: Option<Rc<TypeMapper>>,
    pub erased_signature: Option<SignatureId>,
    /// Instantiations of a generic signature keyed by type argument list id.
    pub instantiations: FxHashMap<String, SignatureId>,
}

impl Signature {
    pub fn new(id: SignatureId, declaration: NodeIndex) -> Self {
        Self {
            id,
            flags: SignatureFlags::empty(),
            declaration,
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            this_parameter: None,
            resolved_return_type: None,
            min_argument_count: 0,
            target: None,
            mapper: None,
            erased_signature: None,
            instantiations: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn has_rest_parameter(&self) -> bool {
        self.flags.contains(SignatureFlags::HAS_REST_PARAMETER)
    }

    /// Number of parameters excluding a rest parameter.
    pub fn non_rest_parameter_count(&self) -> usize {
        self.parameters.len() - usize::from(self.has_rest_parameter())
    }
}

/// An index signature: `[key: K]: V`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IndexInfo {
    pub key_type: TypeId,
    pub value_type: TypeId,
    pub is_readonly: bool,
    pub declaration: NodeIndex,
}

impl IndexInfo {
    pub fn new(key_type: TypeId, value_type: TypeId, is_readonly: bool) -> Self {
        Self {
            key_type,
            value_type,
            is_readonly,
            declaration: NodeIndex::NONE,
        }
    }
}
