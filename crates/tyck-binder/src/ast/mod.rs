//! Node arena and typed node payloads.

mod arena;
mod factory;
mod node;

pub use arena::{ChildList, NodeArena, format_number};
pub use node::*;
