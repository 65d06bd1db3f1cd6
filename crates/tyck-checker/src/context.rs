//! Checker context: options, per-checker tables and caches.
//!
//! `CheckerContext` owns everything one checker accumulates while it runs:
//! the type interner, transient symbols, symbol and node links, relation
//! caches, inference contexts and diagnostics. Nothing here is shared
//! between checkers.

use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use tyck_binder::{NodeArena, NodeIndex, Program, Symbol, SymbolId, SymbolTable};
use tyck_common::Diagnostic;
use tyck_types::{MapperFunction, SignatureId, TypeId, TypeInterner, TypeMapper, VarianceFlags};

use crate::infer::InferenceContext;
use crate::relation::Ternary;
use crate::symbols::links::{NodeLinks, SymbolLinks};

// =============================================================================
// Options
// =============================================================================

/// Compiler options that change checking behavior.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckerOptions {
    /// Enables every strict-family option below.
    pub strict: bool,
    /// `null` and `undefined` are only assignable to themselves, `any`,
    /// `unknown` and `void`.
    pub strict_null_checks: bool,
    /// Report implicit `any` on parameters and variables.
    pub no_implicit_any: bool,
    /// Compare function parameters contravariantly.
    pub strict_function_types: bool,
    /// Optional properties do not implicitly accept `undefined`.
    pub exact_optional_property_types: bool,
    /// Index-signature reads include `undefined`.
    pub no_unchecked_indexed_access: bool,
    pub use_unknown_in_catch_variables: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TsConfigLike {
    compiler_options: CheckerOptions,
}

impl CheckerOptions {
    /// Options with `strict` enabled and propagated.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
        .apply_strict_defaults()
    }

    /// Propagate `strict` into the options it implies.
    #[must_use]
    pub fn apply_strict_defaults(mut self) -> Self {
        if self.strict {
            self.strict_null_checks = true;
            self.no_implicit_any = true;
            self.strict_function_types = true;
            self.use_unknown_in_catch_variables = true;
        }
        self
    }

    /// Parse options from JSON: either a bare options object or a
    /// `{ "compilerOptions": { ... } }` wrapper.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let options = if value.get("compilerOptions").is_some() {
            serde_json::from_value::<TsConfigLike>(value)?.compiler_options
        } else {
            serde_json::from_value::<CheckerOptions>(value)?
        };
        Ok(options.apply_strict_defaults())
    }
}

// =============================================================================
// Resolution stack
// =============================================================================

/// Entity whose property is being computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResolutionTarget {
    Symbol(SymbolId),
    Type(TypeId),
    Signature(SignatureId),
}

/// Lazily computed property tracked on the resolution stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResolutionProperty {
    Type,
    DeclaredType,
    ResolvedBaseTypes,
    ResolvedBaseConstructorType,
    ResolvedTypeArguments,
    ResolvedReturnType,
    ImmediateBaseConstraint,
    WriteType,
    DefaultType,
}

/// Key used to deduplicate diagnostics: file, start, length, code, message.
pub(crate) type DiagnosticKey = (String, u32, u32, u32, String);

// =============================================================================
// CheckerContext
// =============================================================================

/// Shared state of one checker.
pub struct CheckerContext<'a> {
    /// The bound program being checked.
    pub program: &'a Program,
    pub arena: &'a NodeArena,
    pub options: CheckerOptions,

    /// Every type and signature allocated by this checker.
    pub types: TypeInterner,

    /// Symbols created by the checker: merged clones, instantiated and
    /// synthetic properties. Ids continue after the program's symbols.
    pub transient_symbols: Vec<Symbol>,
    /// Redirects from pre-merge symbols to their merged symbol.
    pub merged_symbols: FxHashMap<SymbolId, SymbolId>,
    /// Global scope built from script files and global augmentations.
    pub globals: SymbolTable,
    /// Result of failed symbol resolution.
    pub unknown_symbol: SymbolId,
    /// Placeholder stored while an alias is being resolved.
    pub resolving_symbol: SymbolId,

    pub symbol_links: FxHashMap<SymbolId, SymbolLinks>,
    pub node_links: FxHashMap<NodeIndex, NodeLinks>,

    // --- Resolution stack ---
    pub resolution_targets: Vec<ResolutionTarget>,
    pub resolution_properties: Vec<ResolutionProperty>,
    pub resolution_results: Vec<bool>,
    /// Entries below this index never take part in cycle detection.
    pub resolution_start: usize,

    // --- Instantiation guards ---
    pub instantiation_depth: u32,
    pub instantiation_count: u32,
    /// Node blamed for resource-exhaustion diagnostics (2589, 2590, 2799).
    pub current_node: NodeIndex,

    // --- Caches ---
    pub identity_relation: FxHashMap<(TypeId, TypeId), Ternary>,
    pub subtype_relation: FxHashMap<(TypeId, TypeId), Ternary>,
    pub strict_subtype_relation: FxHashMap<(TypeId, TypeId), Ternary>,
    pub assignable_relation: FxHashMap<(TypeId, TypeId), Ternary>,
    pub comparable_relation: FxHashMap<(TypeId, TypeId), Ternary>,
    /// Global interface types looked up by name; `None` when undeclared.
    pub global_types: FxHashMap<&'static str, Option<TypeId>>,
    /// Synthesized `Array<T>` / `ReadonlyArray<T>` targets when the program
    /// declares none.
    pub array_targets: Option<(TypeId, TypeId)>,
    /// Restrictive clones of type parameters.
    pub restrictive_type_parameters: FxHashMap<TypeId, TypeId>,
    /// Synthetic union and intersection properties keyed by
    /// `(containing type, name)`.
    pub synthetic_properties: FxHashMap<(TypeId, String), Option<SymbolId>>,
    /// Resolved base constraints of instantiable types.
    pub resolved_base_constraints: FxHashMap<TypeId, TypeId>,
    /// Resolved `keyof` of non-generic types.
    pub index_types: FxHashMap<(TypeId, bool), TypeId>,
    /// Reduced forms of unions and intersections.
    pub reduced_types: FxHashMap<TypeId, TypeId>,
    /// Types whose members are being resolved.
    pub resolving_members: FxHashSet<TypeId>,
    /// Subtype-reduced constituent lists keyed by type list id.
    pub subtype_reduction_cache: FxHashMap<String, Vec<TypeId>>,
    /// Type parameters an anonymous, mapped or deferred type may reference,
    /// per declaration.
    pub instantiation_parameters: FxHashMap<NodeIndex, Rc<Vec<TypeId>>>,

    // --- Shared mappers ---
    pub permissive_mapper: Rc<TypeMapper>,
    pub restrictive_mapper: Rc<TypeMapper>,
    pub unmeasurable_mapper: Rc<TypeMapper>,
    pub unreliable_mapper: Rc<TypeMapper>,
    /// Out-of-band variance bits collected while a variance is measured.
    pub variance_marks: Option<VarianceFlags>,
    /// Set while the outermost variance measurement runs.
    pub in_variance_computation: bool,

    // --- Inference ---
    pub inference_contexts: Vec<InferenceContext>,
    /// Contextual types pushed while checking call arguments.
    pub contextual_types: Vec<(NodeIndex, TypeId)>,
    /// Reverse mapped types keyed by `(source, mapped type, constraint)`.
    pub reverse_mapped_types: FxHashMap<(TypeId, TypeId, TypeId), Option<TypeId>>,

    // --- Diagnostics ---
    pub diagnostics: Vec<Diagnostic>,
    pub diagnostic_index: FxHashMap<DiagnosticKey, usize>,
    /// Files already checked by `check_source_file`.
    pub checked_files: FxHashSet<NodeIndex>,
}

impl<'a> CheckerContext<'a> {
    pub fn new(program: &'a Program, options: CheckerOptions) -> Self {
        Self {
            program,
            arena: &program.arena,
            options: options.apply_strict_defaults(),
            types: TypeInterner::new(),
            transient_symbols: Vec::new(),
            merged_symbols: FxHashMap::default(),
            globals: SymbolTable::default(),
            unknown_symbol: SymbolId::NONE,
            resolving_symbol: SymbolId::NONE,
            symbol_links: FxHashMap::default(),
            node_links: FxHashMap::default(),
            resolution_targets: Vec::new(),
            resolution_properties: Vec::new(),
            resolution_results: Vec::new(),
            resolution_start: 0,
            instantiation_depth: 0,
            instantiation_count: 0,
            current_node: NodeIndex::NONE,
            identity_relation: FxHashMap::default(),
            subtype_relation: FxHashMap::default(),
            strict_subtype_relation: FxHashMap::default(),
            assignable_relation: FxHashMap::default(),
            comparable_relation: FxHashMap::default(),
            global_types: FxHashMap::default(),
            array_targets: None,
            restrictive_type_parameters: FxHashMap::default(),
            synthetic_properties: FxHashMap::default(),
            resolved_base_constraints: FxHashMap::default(),
            index_types: FxHashMap::default(),
            reduced_types: FxHashMap::default(),
            resolving_members: FxHashSet::default(),
            subtype_reduction_cache: FxHashMap::default(),
            instantiation_parameters: FxHashMap::default(),
            permissive_mapper: Rc::new(TypeMapper::Function(MapperFunction::Permissive)),
            restrictive_mapper: Rc::new(TypeMapper::Function(MapperFunction::Restrictive)),
            unmeasurable_mapper: Rc::new(TypeMapper::Function(MapperFunction::Unmeasurable)),
            unreliable_mapper: Rc::new(TypeMapper::Function(MapperFunction::Unreliable)),
            variance_marks: None,
            in_variance_computation: false,
            inference_contexts: Vec::new(),
            contextual_types: Vec::new(),
            reverse_mapped_types: FxHashMap::default(),
            diagnostics: Vec::new(),
            diagnostic_index: FxHashMap::default(),
            checked_files: FxHashSet::default(),
        }
    }

    #[inline]
    pub fn strict_null_checks(&self) -> bool {
        self.options.strict_null_checks
    }
}
