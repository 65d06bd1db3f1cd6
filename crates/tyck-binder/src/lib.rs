//! AST arena, symbols and declaration binder for the tyck type checker.
//!
//! The checker consumes a bound [`Program`]: a single [`NodeArena`] holding
//! every source file, the [`SymbolArena`] produced by binding, and per-file
//! locals and exports. Programs are assembled through [`ProgramBuilder`],
//! which exposes a typed node factory in place of a parser.

pub mod ast;
pub use ast::{
    FunctionBody, KeywordTypeKind, MappedModifier, Node, NodeArena, NodeIndex, NodeKind,
    TypeOperatorKind, format_number, node_flags,
};

pub mod symbols;
pub use symbols::{Symbol, SymbolArena, SymbolId, SymbolTable, internal_names, symbol_flags};

mod binding;
pub mod state;
pub use state::BinderState;

pub mod program;
pub use program::{
    DefaultModuleResolver, FileId, ModuleResolver, Program, ProgramBuilder, SourceFileInfo,
};
