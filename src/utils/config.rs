//! Configuration and constants for the converter.

/// Tag of the primary annotation (location, function, flag, level, format)
pub const PRIMARY_TAG: &str = "TMF_NG:";

/// Tag of the secondary annotation (hash components and argument types)
pub const SECONDARY_TAG: &str = "TMF_NG_TYPES:";

/// Template whose signature carries the argument list in the secondary annotation
pub const ARG_TYPES_MARKER: &str = "annotateArgTypes<";

/// Number of u32 hash components leading the secondary argument list
pub const HASH_COMPONENT_COUNT: usize = 4;

/// Number of segments following the tag in a primary annotation
pub const PRIMARY_FIELD_COUNT: usize = 7;

// Legacy TMF argument ids 0..9 are reserved for the format's fixed fields
pub const LEGACY_ARG_INDEX_BASE: usize = 10;

/// Every legacy format string starts with the message prefix reference
pub const LEGACY_FORMAT_PREFIX: &str = "%0 ";

/// File extension of generated descriptors
pub const TMF_EXTENSION: &str = "tmf";

// Field prefixes emitted by the trace macros
pub const FUNC_PREFIX: &str = "FUNC=";
pub const FLAG_PREFIX: &str = "FLAG=";
pub const LEVEL_PREFIX: &str = "LEVEL=";
pub const LEVEL_QUALIFIER: &str = "TraceLevel::";

// Width of the "<file> : <line>" column in trace-scoped log lines
pub const TRACE_CONTEXT_WIDTH: usize = 25;
