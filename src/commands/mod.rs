//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod convert;
pub mod inspect;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use convert::{convert_with, execute_convert, validate_args};
pub use inspect::{execute_inspect, inspect_with};
pub use models::{ConvertArgs, ConvertSummary, InspectArgs, OutputTarget};
pub use utils::display_version;
