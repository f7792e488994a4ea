//! tracepdb-ng CLI
//!
//! Generates legacy WPP trace message format (TMF) files from the trace
//! annotations WPP-NG leaves in a binary's debug information.

use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use wppng_tracepdb::commands::{
    display_version, execute_convert, execute_inspect, validate_args, ConvertArgs, InspectArgs,
    OutputTarget,
};
use wppng_tracepdb::utils::logging::init_logger;

/// tracepdb-ng - TMF generation for WPP-NG traces
#[derive(Parser, Debug)]
#[command(name = "tracepdb-ng")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate TMF files from an annotation dump
    #[command(group(ArgGroup::new("target").required(true).args(["output_directory", "output_file"])))]
    Convert {
        /// Annotation dump of the binary
        file: PathBuf,

        /// Write one <guid>.tmf file per trace into this directory
        #[arg(short = 'o', long)]
        output_directory: Option<PathBuf>,

        /// Write every trace into this single TMF file
        #[arg(short = 'f', long)]
        output_file: Option<PathBuf>,

        /// Module name for the `// PDB:` headers (defaults to the one in the dump)
        #[arg(long, env = "TRACEPDB_PDB_NAME")]
        pdb_name: Option<String>,
    },

    /// List the traces of an annotation dump
    Inspect {
        /// Annotation dump of the binary
        file: PathBuf,

        /// Print trace descriptors as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    init_logger(cli.verbose);

    // Execute command
    match cli.command {
        Commands::Convert {
            file,
            output_directory,
            output_file,
            pdb_name,
        } => {
            let output = match (output_directory, output_file) {
                (Some(directory), _) => OutputTarget::Directory(directory),
                (None, Some(path)) => OutputTarget::SingleFile(path),
                (None, None) => anyhow::bail!("Either --output-directory or --output-file is required"),
            };

            let args = ConvertArgs {
                input: file,
                output,
                pdb_name,
            };

            // Validate args first
            validate_args(&args)?;

            let summary = execute_convert(args)?;
            info!(
                "Wrote {} traces ({} annotations skipped)",
                summary.written, summary.skipped
            );
        }

        Commands::Inspect { file, json } => {
            execute_inspect(InspectArgs { input: file, json })?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
