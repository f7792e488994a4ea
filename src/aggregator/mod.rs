//! Correlation of annotation halves into trace records.
//!
//! This module handles:
//! - Pairing primary and secondary annotations by identifier
//! - Parsing the paired fields into immutable trace records
//! - Building the descriptors handed to the TMF writer

pub mod correlator;
pub mod record;

// Re-export main types
pub use correlator::{Correlation, CorrelatorState, Ingested, TraceCorrelator};
pub use record::{describe_records, LegacyDescriptor, RejectedTrace, TraceRecord};
