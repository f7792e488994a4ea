//! WPP-NG tracepdb
//!
//! Recovers WPP-NG trace metadata from the annotations a compiled binary
//! leaves in its debug information, and renders it as legacy WPP trace
//! message format (TMF) files.
//!
//! This crate provides the core implementation for the
//! `tracepdb-ng` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! tracepdb-ng convert app.annotations.json -o tmf/
//! tracepdb-ng inspect app.annotations.json
//! ```
//!
//! Library users drive [`symbols::extract_traces`] with their own
//! [`symbols::SymbolProvider`] and hand the resulting descriptors to the
//! [`output`] writers.

pub mod aggregator;
pub mod commands;
pub mod format;
pub mod items;
pub mod output;
pub mod parser;
pub mod symbols;
pub mod utils;
