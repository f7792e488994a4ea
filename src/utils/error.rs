//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use crate::items::TraceItemKind;
use crate::parser::{AnnotationRole, TraceId};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the trace item catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraceItemError {
    #[error("Unknown trace item type: {0}")]
    UnknownKind(String),

    #[error("{kind} does not support legacy format spec \"{requested}\"")]
    UnsupportedLegacyFormat {
        kind: TraceItemKind,
        requested: String,
    },
}

/// Errors that can occur while classifying a raw annotation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("Annotation at {address:#x} is not valid UTF-8")]
    NotUtf8 { address: u64 },

    #[error("Primary annotation has {found} fields, expected {expected}")]
    FieldCount { expected: usize, found: usize },

    #[error("Secondary annotation is missing the argument type list: {0}")]
    MissingTypesMarker(String),

    #[error("Secondary annotation has {0} hash components, expected 4")]
    MissingHashComponents(usize),

    #[error("Invalid integer in annotation: {0}")]
    InvalidInteger(String),
}

/// Errors that can occur while translating a format string to the legacy form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Malformed placeholder in format: {0}")]
    MalformedPlaceholder(String),

    #[error("Found unexpected field name in format: {0}")]
    UnexpectedFieldName(String),

    #[error("Found unexpected conversion in format: !{0}")]
    UnexpectedConversion(char),

    #[error("Format has {placeholders} placeholders but {declared} arguments were declared")]
    ArgumentCountMismatch { declared: usize, placeholders: usize },

    #[error(transparent)]
    Item(#[from] TraceItemError),
}

/// Errors that make a single trace record unusable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error(transparent)]
    Item(#[from] TraceItemError),

    #[error("Invalid {field} field: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Errors that invalidate the whole correlation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorrelationError {
    #[error("GUID {identifier} found twice in {role} annotations")]
    DuplicateIdentifier {
        identifier: TraceId,
        role: AnnotationRole,
    },

    #[error("GUID {identifier} has no {missing} annotation")]
    UnmatchedAnnotation {
        identifier: TraceId,
        missing: AnnotationRole,
    },
}

/// Errors reported by a symbol provider
#[derive(Error, Debug)]
pub enum SymbolProviderError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse annotations from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Annotation enumeration failed: {0}")]
    Enumerate(String),
}

/// Errors that abort the extraction of a whole binary
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error(transparent)]
    Provider(#[from] SymbolProviderError),

    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    #[error(transparent)]
    Correlation(#[from] CorrelationError),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
