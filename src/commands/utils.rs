use anyhow::Result;
use std::path::Path;

/// Ensure the input file exists
pub fn check_input_file(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if !path.exists() {
        anyhow::bail!("Input file does not exist: {}", path.display());
    }

    if !path.is_file() {
        anyhow::bail!("Input path is not a file: {}", path.display());
    }

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("tracepdb-ng v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Generates legacy WPP trace message format (TMF) files from WPP-NG trace annotations.");
}
