//! Trace argument kinds and their catalog.
//!
//! This module handles:
//! - The closed set of argument kinds a trace can carry
//! - Mapping each kind's format spec to the legacy WPP spec
//! - Resolving generator type names to kinds

pub mod catalog;
pub mod kind;

// Re-export main types
pub use catalog::TraceItemCatalog;
pub use kind::{FormatWarning, IntegralWidth, LegacyFormat, TraceItemKind};
