//! Merged trace records.
//!
//! A [`TraceRecord`] is the pair of annotations that share one identifier,
//! with every field parsed into its final form. It is turned into a
//! [`LegacyDescriptor`] once its format has been translated.

use crate::format::translate;
use crate::items::{TraceItemCatalog, TraceItemKind};
use crate::parser::{parse_int, PrimaryRecord, SecondaryRecord, TraceId};
use crate::utils::config::{FLAG_PREFIX, FUNC_PREFIX, LEVEL_PREFIX, LEVEL_QUALIFIER};
use crate::utils::error::{FormatError, RecordError};
use crate::utils::logging::TraceContext;
use log::{error, warn};
use serde::Serialize;

/// A fully correlated trace
///
/// **Public** - produced by the correlator, consumed by the TMF writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRecord {
    id: TraceId,
    /// Reduced source path, `<dir><sep><file>`
    path: String,
    dir: String,
    file: String,
    line: u32,
    func: String,
    flag: u32,
    level: String,
    format: String,
    kinds: Vec<TraceItemKind>,
}

impl TraceRecord {
    /// Merge both halves of a trace
    ///
    /// **Public** - called by the correlator for every matched identifier
    ///
    /// # Errors
    /// * `RecordError::InvalidField` - line or flag is not an integer
    /// * `RecordError::Item` - an argument type is not in the catalog
    pub fn from_parts(
        id: TraceId,
        primary: &PrimaryRecord,
        secondary: &SecondaryRecord,
        catalog: &TraceItemCatalog,
    ) -> Result<Self, RecordError> {
        let line = primary
            .line
            .trim()
            .parse::<u32>()
            .map_err(|_| RecordError::InvalidField {
                field: "line",
                value: primary.line.clone(),
            })?;

        let flag_text = strip_field_prefix(&primary.flag, FLAG_PREFIX);
        let flag = parse_int(flag_text).map_err(|_| RecordError::InvalidField {
            field: "flag",
            value: primary.flag.clone(),
        })?;

        let kinds = secondary
            .arg_type_names
            .iter()
            .map(|name| catalog.resolve(name))
            .collect::<Result<Vec<_>, _>>()?;

        let (dir, file) = split_location(&primary.file_path);

        Ok(Self {
            id,
            path: primary.file_path.clone(),
            dir: dir.to_string(),
            file: file.to_string(),
            line,
            func: strip_field_prefix(&primary.func, FUNC_PREFIX).to_string(),
            flag,
            level: normalize_level(&primary.level).to_string(),
            format: primary.format_string.clone(),
            kinds,
        })
    }

    pub fn identifier(&self) -> TraceId {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn func(&self) -> &str {
        &self.func
    }

    pub fn flag(&self) -> u32 {
        self.flag
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn format_string(&self) -> &str {
        &self.format
    }

    pub fn arg_kinds(&self) -> &[TraceItemKind] {
        &self.kinds
    }

    /// Source location used to prefix log messages about this trace
    pub fn context(&self) -> TraceContext {
        TraceContext::new(&self.path, self.line)
    }

    /// Quoted legacy format for this trace
    ///
    /// Warnings raised during translation are logged with the trace context.
    pub fn legacy_format(&self) -> Result<String, FormatError> {
        let translation = translate(&self.format, &self.kinds)?;

        if !translation.warnings.is_empty() {
            let ctx = self.context();
            for warning in &translation.warnings {
                warn!("{} {}", ctx, warning);
            }
        }

        Ok(translation.text)
    }

    /// Legacy item names of the arguments, in order
    pub fn legacy_item_names(&self) -> Vec<&'static str> {
        self.kinds.iter().map(|kind| kind.legacy_item_name()).collect()
    }

    /// Build the writer-facing descriptor
    ///
    /// **Public** - the only way a record reaches the TMF writer
    pub fn to_descriptor(&self) -> Result<LegacyDescriptor, RecordError> {
        Ok(LegacyDescriptor {
            identifier: self.id.to_string(),
            dir: self.dir.clone(),
            file: self.file.clone(),
            line: self.line,
            func: self.func.clone(),
            flag: self.flag,
            level: self.level.clone(),
            format: self.legacy_format()?,
            item_names: self
                .legacy_item_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
    }
}

/// Everything the TMF writer needs to describe one trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegacyDescriptor {
    pub identifier: String,
    pub dir: String,
    pub file: String,
    pub line: u32,
    pub func: String,
    pub flag: u32,
    pub level: String,

    /// Quoted legacy format
    pub format: String,

    pub item_names: Vec<String>,
}

/// A matched trace that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedTrace {
    pub identifier: TraceId,

    /// `<file> : <line>` as found in the primary annotation
    pub location: String,

    pub error: RecordError,
}

impl RejectedTrace {
    pub fn new(identifier: TraceId, location: impl Into<String>, error: RecordError) -> Self {
        Self {
            identifier,
            location: location.into(),
            error,
        }
    }
}

/// Build descriptors for every record, setting aside the ones that fail
///
/// **Public** - shared by the convert and inspect commands
///
/// Failures are logged with the record context and returned as rejections.
pub fn describe_records(records: &[TraceRecord]) -> (Vec<LegacyDescriptor>, Vec<RejectedTrace>) {
    let mut descriptors = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    for record in records {
        match record.to_descriptor() {
            Ok(descriptor) => descriptors.push(descriptor),
            Err(err) => {
                let ctx = record.context();
                error!("{} {}", ctx, err);
                rejected.push(RejectedTrace::new(record.identifier(), ctx.location(), err));
            }
        }
    }

    (descriptors, rejected)
}

/// Split `<dir><sep><file>`; a bare file name has an empty directory
///
/// **Private** - internal helper for from_parts
fn split_location(path: &str) -> (&str, &str) {
    match path.rfind(['\\', '/']) {
        Some(sep) => (&path[..sep], &path[sep + 1..]),
        None => ("", path),
    }
}

fn strip_field_prefix<'a>(value: &'a str, prefix: &str) -> &'a str {
    value.strip_prefix(prefix).unwrap_or(value)
}

/// `LEVEL=TraceLevel::Info` -> `Info`
fn normalize_level(level: &str) -> &str {
    let level = strip_field_prefix(level, LEVEL_PREFIX);
    match level.rfind(LEVEL_QUALIFIER) {
        Some(index) => &level[index + LEVEL_QUALIFIER.len()..],
        None => level,
    }
}
