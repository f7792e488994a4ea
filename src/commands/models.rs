use std::path::PathBuf;

/// Where the convert command writes its TMF output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// One `<guid>.tmf` file per trace in this directory
    Directory(PathBuf),

    /// Every trace in this single file
    SingleFile(PathBuf),
}

impl OutputTarget {
    pub fn path(&self) -> &PathBuf {
        match self {
            OutputTarget::Directory(path) | OutputTarget::SingleFile(path) => path,
        }
    }
}

/// Arguments for the convert command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ConvertArgs {
    /// Annotation dump of the binary to convert
    pub input: PathBuf,

    pub output: OutputTarget,

    /// Overrides the module name written into `// PDB:` headers
    pub pdb_name: Option<String>,
}

/// Arguments for the inspect command
#[derive(Debug, Clone)]
pub struct InspectArgs {
    pub input: PathBuf,

    /// Print descriptors as JSON instead of one line per trace
    pub json: bool,
}

/// What a successful conversion produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    pub written: usize,
    pub skipped: usize,
}
