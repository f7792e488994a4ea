//! Symbol providers and the extraction pipeline.
//!
//! This module handles:
//! - The provider seam: opening a binary's debug information and enumerating
//!   its trace annotations
//! - Driving every annotation through the correlator
//! - Releasing the provider session before any error reaches the caller

pub mod dump;
pub mod memory;

use crate::aggregator::{RejectedTrace, TraceCorrelator, TraceRecord};
use crate::items::TraceItemCatalog;
use crate::parser::RawAnnotation;
use crate::utils::error::{ExtractError, SymbolProviderError};
use log::{debug, info};
use std::path::Path;

// Re-export main types
pub use dump::{AnnotationDump, AnnotationDumpProvider, DumpedAnnotation};
pub use memory::MemoryProvider;

/// Source of trace annotations for a binary
pub trait SymbolProvider {
    type Session: AnnotationSession;

    /// Open the debug information of `path`
    ///
    /// # Errors
    /// * `SymbolProviderError::Open` / `Parse` - the file cannot be loaded
    fn open(&self, path: &Path) -> Result<Self::Session, SymbolProviderError>;
}

/// An open enumeration over one binary's annotations
///
/// Finite and not restartable. Resources are released when the session is dropped.
pub trait AnnotationSession {
    /// File name of the debug information, as written into TMF headers
    fn module_name(&self) -> &str;

    /// Next annotation, or `None` once exhausted
    fn next_annotation(&mut self) -> Option<Result<RawAnnotation, SymbolProviderError>>;
}

/// Everything extracted from one binary
#[derive(Debug, Clone)]
pub struct Extraction {
    pub module: String,

    /// Valid records, ordered by identifier
    pub records: Vec<TraceRecord>,

    pub rejected: Vec<RejectedTrace>,

    /// Annotations with an unrecognized tag
    pub skipped: usize,
}

/// Extract every trace record of a binary
///
/// **Public** - main entry point of the library
///
/// # Arguments
/// * `provider` - Symbol provider used to open `path`
/// * `catalog` - Item catalog resolving argument type names
/// * `path` - Binary or debug information file
///
/// # Errors
/// Any provider, annotation or correlation error. The session is always
/// released before the error is returned.
pub fn extract_traces<P: SymbolProvider>(
    provider: &P,
    catalog: &TraceItemCatalog,
    path: &Path,
) -> Result<Extraction, ExtractError> {
    info!("Opening symbols: {}", path.display());

    let mut session = provider.open(path)?;
    let module = session.module_name().to_string();

    let mut correlator = TraceCorrelator::new(catalog);
    let drained = drain_session(&mut session, &mut correlator);
    drop(session);

    let count = drained?;
    debug!("Read {} annotations from {}", count, module);

    let correlation = correlator.finalize()?;
    info!(
        "Extracted {} traces from {}",
        correlation.records.len(),
        module
    );

    Ok(Extraction {
        module,
        records: correlation.records,
        rejected: correlation.rejected,
        skipped: correlation.skipped,
    })
}

/// Feed every annotation of the session to the correlator
///
/// **Private** - stops at the first error so the caller can release the session
fn drain_session<S: AnnotationSession>(
    session: &mut S,
    correlator: &mut TraceCorrelator<'_>,
) -> Result<usize, ExtractError> {
    let mut count = 0;
    while let Some(raw) = session.next_annotation() {
        correlator.ingest(&raw?)?;
        count += 1;
    }
    Ok(count)
}
