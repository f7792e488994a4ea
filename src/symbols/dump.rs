//! Provider reading annotation dumps.
//!
//! A dump is a JSON file listing the annotations found in a binary's debug
//! information:
//!
//! ```json
//! {
//!   "module": "app.pdb",
//!   "annotations": [
//!     { "address": 4096, "strings": ["TMF_NG:", "src\\main.cpp", "42", "..."] },
//!     { "address": 8192, "payload_hex": "544d465f4e473a00" }
//!   ]
//! }
//! ```
//!
//! `strings` are NUL-terminated and concatenated into the raw payload.
//! `payload_hex` carries the payload bytes verbatim and wins when both are present.

use super::{AnnotationSession, SymbolProvider};
use crate::parser::RawAnnotation;
use crate::utils::error::SymbolProviderError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Top-level layout of a dump file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationDump {
    /// Debug information file name; defaults to the dump's own file name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,

    #[serde(default)]
    pub annotations: Vec<DumpedAnnotation>,
}

/// One annotation of a dump file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DumpedAnnotation {
    #[serde(default)]
    pub address: u64,

    #[serde(default)]
    pub strings: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_hex: Option<String>,
}

impl DumpedAnnotation {
    /// Rebuild the raw annotation
    ///
    /// # Errors
    /// * `SymbolProviderError::Enumerate` - `payload_hex` is not valid hex
    pub fn to_raw(&self) -> Result<RawAnnotation, SymbolProviderError> {
        match &self.payload_hex {
            Some(payload) => hex::decode(payload)
                .map(|bytes| RawAnnotation::new(self.address, bytes))
                .map_err(|e| {
                    SymbolProviderError::Enumerate(format!(
                        "annotation at {:#x} has an invalid payload: {}",
                        self.address, e
                    ))
                }),
            None => Ok(RawAnnotation::from_strings(self.address, &self.strings)),
        }
    }
}

/// Reads annotations from a JSON dump file
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationDumpProvider;

impl AnnotationDumpProvider {
    pub fn new() -> Self {
        Self
    }
}

impl SymbolProvider for AnnotationDumpProvider {
    type Session = DumpSession;

    fn open(&self, path: &Path) -> Result<DumpSession, SymbolProviderError> {
        let file = File::open(path).map_err(|source| SymbolProviderError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let dump: AnnotationDump =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                SymbolProviderError::Parse {
                    path: path.to_path_buf(),
                    source,
                }
            })?;

        let module = dump.module.unwrap_or_else(|| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        debug!(
            "Loaded {} annotations for {} from {}",
            dump.annotations.len(),
            module,
            path.display()
        );

        Ok(DumpSession {
            module,
            path: path.to_path_buf(),
            annotations: dump.annotations.into_iter(),
        })
    }
}

/// Session over a loaded dump
#[derive(Debug)]
pub struct DumpSession {
    module: String,
    path: PathBuf,
    annotations: std::vec::IntoIter<DumpedAnnotation>,
}

impl AnnotationSession for DumpSession {
    fn module_name(&self) -> &str {
        &self.module
    }

    fn next_annotation(&mut self) -> Option<Result<RawAnnotation, SymbolProviderError>> {
        self.annotations.next().map(|annotation| annotation.to_raw())
    }
}

impl Drop for DumpSession {
    fn drop(&mut self) {
        debug!("Released annotation session for {}", self.path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn dump_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_strings_become_payload() {
        let file = dump_file(
            r#"{"module": "app.pdb", "annotations": [{"address": 16, "strings": ["A", "B"]}]}"#,
        );
        let mut session = AnnotationDumpProvider::new().open(file.path()).unwrap();

        assert_eq!(session.module_name(), "app.pdb");
        let raw = session.next_annotation().unwrap().unwrap();
        assert_eq!(raw.address, 16);
        assert_eq!(raw.payload, b"A\0B\0".to_vec());
        assert!(session.next_annotation().is_none());
    }

    #[test]
    fn test_module_defaults_to_file_name() {
        let file = dump_file(r#"{"annotations": []}"#);
        let session = AnnotationDumpProvider::new().open(file.path()).unwrap();

        let expected = file.path().file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(session.module_name(), expected);
    }

    #[test]
    fn test_hex_payload() {
        let file = dump_file(r#"{"annotations": [{"address": 1, "payload_hex": "41ff00"}, {"payload_hex": "zz"}]}"#);
        let mut session = AnnotationDumpProvider::new().open(file.path()).unwrap();

        assert_eq!(
            session.next_annotation().unwrap().unwrap().payload,
            vec![0x41, 0xff, 0x00]
        );
        assert!(matches!(
            session.next_annotation(),
            Some(Err(SymbolProviderError::Enumerate(_)))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AnnotationDumpProvider::new()
            .open(&dir.path().join("missing.json"))
            .unwrap_err();
        assert!(matches!(err, SymbolProviderError::Open { .. }));
    }

    #[test]
    fn test_invalid_json() {
        let file = dump_file("not json");
        let err = AnnotationDumpProvider::new().open(file.path()).unwrap_err();
        assert!(matches!(err, SymbolProviderError::Parse { .. }));
    }
}
