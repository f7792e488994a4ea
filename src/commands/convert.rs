//! Convert command implementation.
//!
//! The convert command:
//! 1. Extracts and correlates the trace annotations of a binary
//! 2. Translates every trace into its legacy descriptor
//! 3. Writes the TMF output
//!
//! Traces that fail on their own are logged and counted. The command writes
//! everything else, then fails if anything was rejected.

use super::models::{ConvertArgs, ConvertSummary, OutputTarget};
use super::utils::check_input_file;
use crate::aggregator::describe_records;
use crate::items::TraceItemCatalog;
use crate::output::{generate_tmf_file, generate_tmf_file_for_multiple_traces};
use crate::symbols::{extract_traces, AnnotationDumpProvider, SymbolProvider};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the convert command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Missing input file
/// * Provider, annotation or correlation failures
/// * File write errors
/// * Any rejected trace, after the others have been written
pub fn execute_convert(args: ConvertArgs) -> Result<ConvertSummary> {
    convert_with(&AnnotationDumpProvider::new(), &args)
}

/// Run the conversion against any symbol provider
///
/// **Public** - lets library users and tests supply their own provider
pub fn convert_with<P: SymbolProvider>(provider: &P, args: &ConvertArgs) -> Result<ConvertSummary> {
    let start_time = Instant::now();

    info!("Starting conversion of: {}", args.input.display());

    // Step 1: Extract traces
    info!("Step 1/3: Extracting trace annotations...");
    let catalog = TraceItemCatalog::new();
    let extraction = extract_traces(provider, &catalog, &args.input)
        .with_context(|| format!("Failed to extract traces from {}", args.input.display()))?;

    if extraction.skipped > 0 {
        warn!("Skipped {} unrecognized annotations", extraction.skipped);
    }

    let module = args
        .pdb_name
        .clone()
        .unwrap_or_else(|| extraction.module.clone());

    // Step 2: Translate formats
    info!(
        "Step 2/3: Translating {} trace formats...",
        extraction.records.len()
    );
    let (descriptors, failed) = describe_records(&extraction.records);
    let rejected = extraction.rejected.len() + failed.len();

    debug!(
        "{} descriptors, {} rejected",
        descriptors.len(),
        rejected
    );

    // Step 3: Write outputs
    info!("Step 3/3: Writing TMF output...");
    match &args.output {
        OutputTarget::Directory(directory) => {
            std::fs::create_dir_all(directory).with_context(|| {
                format!("Failed to create output directory {}", directory.display())
            })?;
            for descriptor in &descriptors {
                generate_tmf_file(directory, &module, descriptor).with_context(|| {
                    format!("Failed to write TMF file for {}", descriptor.identifier)
                })?;
            }
        }
        OutputTarget::SingleFile(path) => {
            generate_tmf_file_for_multiple_traces(path, &module, &descriptors)
                .with_context(|| format!("Failed to write TMF file {}", path.display()))?;
        }
    }

    info!("✓ TMF output written to: {}", args.output.path().display());

    if rejected > 0 {
        anyhow::bail!(
            "{} of {} traces could not be converted",
            rejected,
            descriptors.len() + rejected
        );
    }

    info!(
        "Conversion completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(ConvertSummary {
        written: descriptors.len(),
        skipped: extraction.skipped,
    })
}

/// Validate convert arguments
///
/// **Public** - can be called before execute_convert for early validation
pub fn validate_args(args: &ConvertArgs) -> Result<()> {
    check_input_file(&args.input)?;

    if args.output.path().as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    if let OutputTarget::SingleFile(path) = &args.output {
        if path.is_dir() {
            anyhow::bail!("Output file is a directory: {}", path.display());
        }
    }

    if let Some(name) = &args.pdb_name {
        if name.trim().is_empty() {
            anyhow::bail!("PDB name cannot be empty");
        }
    }

    Ok(())
}
