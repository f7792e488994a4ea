//! Inspect command implementation.
//!
//! Lists the traces of a binary without writing any TMF file.

use super::models::InspectArgs;
use super::utils::check_input_file;
use crate::aggregator::{describe_records, LegacyDescriptor, RejectedTrace};
use crate::items::TraceItemCatalog;
use crate::symbols::{extract_traces, AnnotationDumpProvider, SymbolProvider};
use anyhow::{Context, Result};
use log::info;

/// Execute the inspect command
///
/// **Public** - main entry point called from main.rs
pub fn execute_inspect(args: InspectArgs) -> Result<()> {
    check_input_file(&args.input)?;

    for line in inspect_with(&AnnotationDumpProvider::new(), &args)? {
        println!("{}", line);
    }

    Ok(())
}

/// Render the inspect output for any symbol provider
///
/// **Public** - returns the lines instead of printing them
pub fn inspect_with<P: SymbolProvider>(provider: &P, args: &InspectArgs) -> Result<Vec<String>> {
    let catalog = TraceItemCatalog::new();
    let extraction = extract_traces(provider, &catalog, &args.input)
        .with_context(|| format!("Failed to extract traces from {}", args.input.display()))?;

    let (descriptors, mut rejected) = describe_records(&extraction.records);
    rejected.extend(extraction.rejected);
    rejected.sort_by_key(|trace| trace.identifier);

    info!(
        "{}: {} traces, {} rejected",
        extraction.module,
        descriptors.len(),
        rejected.len()
    );

    if args.json {
        let json = serde_json::to_string_pretty(&descriptors)
            .context("Failed to serialize trace descriptors")?;
        return Ok(vec![json]);
    }

    let mut lines: Vec<String> = descriptors.iter().map(describe_line).collect();
    lines.extend(rejected.iter().map(rejected_line));

    Ok(lines)
}

/// **Private** - one line per trace: identifier, location, level, legacy format
fn describe_line(descriptor: &LegacyDescriptor) -> String {
    format!(
        "{} {} : {} [{}] {}",
        descriptor.identifier, descriptor.file, descriptor.line, descriptor.level, descriptor.format
    )
}

fn rejected_line(trace: &RejectedTrace) -> String {
    format!("{} {} REJECTED: {}", trace.identifier, trace.location, trace.error)
}
