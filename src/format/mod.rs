//! Legacy format synthesis.
//!
//! This module handles:
//! - Tokenizing brace-style format strings
//! - Rewriting them into the positional, typed legacy WPP format

pub mod placeholders;
pub mod translator;

// Re-export main functions
pub use placeholders::{parse_format, Field, Segment};
pub use translator::{quote, translate, Translation};
