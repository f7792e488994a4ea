//! Output writers for legacy trace descriptions.
//!
//! This module handles writing TMF files to disk:
//! - One file per trace, named after its GUID
//! - All traces of a binary in a single file

pub mod tmf;

// Re-export main functions
pub use tmf::{generate_tmf_file, generate_tmf_file_for_multiple_traces, write_tmf_trace};
