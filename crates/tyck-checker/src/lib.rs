//! Semantic core of the tyck type checker.
//!
//! This crate is organized into several submodules:
//! - `context` - `CheckerContext` for options, caches and diagnostics
//! - `state` - `CheckerState`, the entry point every query goes through
//! - `symbols` - symbol merging, alias resolution and name lookup
//! - `types` - declared types, type nodes, members, unions and instantiation
//! - `relation` - identity, subtype, assignability and comparability
//! - `infer` - generic type argument inference
//! - `expr`, `call_checker`, `statements` - expression and declaration checking
//! - `printer` - type to string
//! - `shards` - parallel checking with independent checkers
//!
//! A `CheckerState` borrows one immutable bound [`tyck_binder::Program`].
//! All mutable state (interned types, links, caches) is owned by the checker,
//! so independent checkers over the same program never share anything.

pub mod context;
pub mod error_reporter;
pub mod recursion;
pub mod state;
pub mod tracing_config;

pub mod symbols;
pub mod types;

pub mod infer;
pub mod relation;

pub mod call_checker;
pub mod expr;
pub mod printer;
pub mod statements;
pub mod type_api;

pub mod shards;

pub use context::{CheckerContext, CheckerOptions};
pub use infer::{InferenceContext, InferenceError, InferenceFlags, InferenceInfo, InferencePriority};
pub use recursion::{RecursionGuard, RecursionProfile, RecursionResult};
pub use relation::{RelationKind, Ternary};
pub use shards::{check_program, check_program_sharded, shard_files};
pub use state::{Checker, CheckerState};
pub use tracing_config::{LogFormat, init_tracing};
