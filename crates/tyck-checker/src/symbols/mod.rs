//! Symbol table merging, alias resolution, module exports and name
//! resolution.

mod alias;
mod exports;
pub mod links;
mod merge;
mod resolver;

pub(crate) use merge::SymbolTableRef;
