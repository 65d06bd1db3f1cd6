//! Error reporting (`error*` for emission, `report_*` for higher-level
//! wrappers). Split into focused submodules.

mod assignability;
mod core;
mod properties;
mod suggestions;

pub(crate) use suggestions::get_spelling_suggestion;
