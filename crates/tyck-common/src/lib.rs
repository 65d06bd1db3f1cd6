//! Common types and utilities for the tyck type checker.
//!
//! This crate provides foundational types used across all tyck crates:
//! - Diagnostics (`Diagnostic`, message table, `format_message`)
//! - Source spans (`Span`)
//! - Checker limits and thresholds

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Centralized limits and thresholds
pub mod limits;

// Diagnostic model and message table
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation, format_message,
};
