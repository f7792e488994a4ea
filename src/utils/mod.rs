//! Utility modules for configuration, error handling, and logging.

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used error types for convenience
pub use error::{
    AnnotationError, CorrelationError, ExtractError, FormatError, OutputError, RecordError,
    SymbolProviderError, TraceItemError,
};
pub use logging::TraceContext;
