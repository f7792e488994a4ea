//! Annotation parsing and trace identifiers.
//!
//! This module handles:
//! - Splitting raw annotation payloads into their strings
//! - Classifying annotations as primary, secondary or unrecognized
//! - Computing the GUID that ties both halves of a trace together

pub mod annotation;
pub mod identifier;
pub mod split;

// Re-export main types
pub use annotation::{
    classify, reduce_path, Annotation, AnnotationRole, PrimaryRecord, RawAnnotation,
    SecondaryRecord,
};
pub use identifier::{pack_hash_words, unpack_hash_words, TraceId};
pub use split::{parse_int, split_args};
