//! Centralized limits and thresholds for the type checker.
//!
//! Every hard cap the checker enforces lives here so that the reporting sites
//! and the tests agree on one value.
//!
//! # Categories
//!
//! - **Recursion Depths**: limits that protect the call stack
//! - **Operation Counts**: limits on work done per checked statement
//! - **Capacity Limits**: maximum sizes of synthesized types

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum depth for generic type instantiation.
///
/// When this depth is exceeded the checker emits **TS2589**:
/// *"Type instantiation is excessively deep and possibly infinite."*
///
/// ```typescript
/// type Foo<T> = { value: Foo<Foo<T>> };
/// declare let boom: Foo<string>["value"]["value"] /* ... */;
/// ```
pub const MAX_INSTANTIATION_DEPTH: u32 = 100;

/// Maximum depth for `type_to_string`.
///
/// Deeper nesting is printed as `???`.
pub const MAX_TYPE_TO_STRING_DEPTH: u32 = 10;

/// Number of times the same recursion identity may appear on a source or
/// target stack before inference treats the branch as deeply nested.
pub const MAX_INFERENCE_NESTING: usize = 2;

/// Maximum depth of the structural relation walk.
///
/// Relations deeper than this are assumed to hold (`Maybe`).
pub const MAX_RELATION_DEPTH: u32 = 100;

/// Maximum number of links followed through an alias chain.
pub const MAX_ALIAS_RESOLUTION_DEPTH: u32 = 128;

// =============================================================================
// Operation Count Limits
// =============================================================================

/// Maximum number of instantiations per checked statement or expression.
///
/// The counter is reset by `check_source_element` and `check_expression`.
/// Exceeding it reports **TS2589**.
pub const MAX_INSTANTIATION_COUNT: u32 = 5_000_000;

/// Maximum number of pairwise comparisons performed by union subtype
/// reduction before it gives up with **TS2590**.
pub const MAX_SUBTYPE_REDUCTION_CHECKS: u64 = 1_000_000;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Maximum size of the cross product produced when an intersection is
/// distributed over its union constituents.
///
/// Larger products report **TS2590**:
/// *"Expression produces a union type that is too complex to represent."*
pub const MAX_CROSS_PRODUCT_SIZE: usize = 100_000;

/// Maximum number of elements in a normalized tuple.
///
/// Reaching it reports **TS2799**.
pub const MAX_TUPLE_ELEMENTS: usize = 10_000;

/// Intersections with at least this many constituents are bisected before the
/// cross product is formed.
pub const INTERSECTION_BISECT_THRESHOLD: usize = 32;

/// Maximum number of related-information entries attached to a duplicate
/// declaration diagnostic.
pub const MAX_RELATED_DECLARATIONS: usize = 5;
