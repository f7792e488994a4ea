//! TMF (trace message format) writer.
//!
//! Renders legacy descriptors into the text format consumed by the WPP
//! decoding tools, either one file per trace or all traces in one file.

use crate::aggregator::LegacyDescriptor;
use crate::utils::config::{LEGACY_ARG_INDEX_BASE, TMF_EXTENSION};
use crate::utils::error::OutputError;
use crate::utils::logging::TraceContext;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write a single trace description
///
/// **Public** - building block of both file generators
///
/// # Arguments
/// * `writer` - Destination, typically a buffered file
/// * `module` - Debug information file name for the `// PDB:` header
/// * `descriptor` - Trace to describe
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
pub fn write_tmf_trace<W: Write>(
    writer: &mut W,
    module: &str,
    descriptor: &LegacyDescriptor,
) -> Result<(), OutputError> {
    writeln!(writer, "// PDB:  {}", module)?;
    writeln!(
        writer,
        "{} {} // SRC={} MJ= MN=",
        descriptor.identifier, descriptor.dir, descriptor.file
    )?;
    writeln!(
        writer,
        "#typev {}{} {} {} //  LEVEL=TRACE_LEVEL_{} FLAGS=WPP_FLAG_{} FUNC={}",
        descriptor.file.replace('.', "_"),
        descriptor.line,
        LEGACY_ARG_INDEX_BASE,
        descriptor.format,
        descriptor.level.to_uppercase(),
        descriptor.flag,
        descriptor.func.replace(' ', "-")
    )?;

    writeln!(writer, "{{")?;
    for (index, item_name) in descriptor.item_names.iter().enumerate() {
        writeln!(writer, "_, {} -- {}", item_name, index + LEGACY_ARG_INDEX_BASE)?;
    }
    writeln!(writer, "}}")?;

    Ok(())
}

/// Write one trace into `<output_directory>/<guid>.tmf`
///
/// **Public** - used by the convert command in directory mode
///
/// # Returns
/// Path of the written file
///
/// # Errors
/// * `OutputError::InvalidPath` - directory path is empty, names a file, or cannot be created
/// * `OutputError::WriteFailed` - I/O error during write
pub fn generate_tmf_file(
    output_directory: impl AsRef<Path>,
    module: &str,
    descriptor: &LegacyDescriptor,
) -> Result<PathBuf, OutputError> {
    let output_directory = output_directory.as_ref();
    prepare_directory(output_directory)?;

    let output_path = output_directory
        .join(&descriptor.identifier)
        .with_extension(TMF_EXTENSION);

    let ctx = TraceContext::new(&descriptor.file, descriptor.line);
    info!("{} Generating trace file: \"{}\"", ctx, output_path.display());

    let mut writer = BufWriter::new(File::create(&output_path)?);
    write_tmf_trace(&mut writer, module, descriptor)?;
    writer.flush()?;

    Ok(output_path)
}

/// Write every trace into a single TMF file
///
/// **Public** - used by the convert command in single-file mode
///
/// # Errors
/// * `OutputError::InvalidPath` - path is empty, is a directory, or its parent cannot be created
/// * `OutputError::WriteFailed` - I/O error during write
pub fn generate_tmf_file_for_multiple_traces(
    output_path: impl AsRef<Path>,
    module: &str,
    descriptors: &[LegacyDescriptor],
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing {} traces to: {}", descriptors.len(), output_path.display());

    validate_output_path(output_path)?;
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            prepare_directory(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(output_path)?);
    for descriptor in descriptors {
        debug!(
            "{} Writing trace {}",
            TraceContext::new(&descriptor.file, descriptor.line),
            descriptor.identifier
        );
        write_tmf_trace(&mut writer, module, descriptor)?;
    }
    writer.flush()?;

    info!(
        "TMF file written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Create the output directory if needed
///
/// **Private** - shared by both generators
fn prepare_directory(directory: &Path) -> Result<(), OutputError> {
    if directory.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if directory.exists() {
        if !directory.is_dir() {
            return Err(OutputError::InvalidPath(format!(
                "Not a directory: {}",
                directory.display()
            )));
        }
        return Ok(());
    }

    debug!("Creating output directory: {}", directory.display());
    std::fs::create_dir_all(directory).map_err(|e| {
        OutputError::InvalidPath(format!(
            "Cannot create directory {}: {}",
            directory.display(),
            e
        ))
    })
}

/// Validate that a file path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
