//! Translation of brace-style trace formats into legacy WPP formats.
//!
//! `"val={} hex={:x}"` with `[UInt32, UInt64]` becomes
//! `"%0 val=%10!u! hex=%11!I64x!"`: `%0` references the legacy message
//! prefix, and arguments are numbered from 10 with their printf spec between
//! `!` marks.

use super::placeholders::parse_format;
use crate::items::{FormatWarning, TraceItemKind};
use crate::utils::config::{LEGACY_ARG_INDEX_BASE, LEGACY_FORMAT_PREFIX};
use crate::utils::error::FormatError;
use log::debug;

/// A translated format and the warnings raised on the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// Quoted legacy format, ready to embed in a TMF file
    pub text: String,
    pub warnings: Vec<FormatWarning>,
}

/// Translate a format string for the given argument kinds
///
/// **Public** - main entry point for format translation
///
/// # Arguments
/// * `format` - Brace-style format from the primary annotation
/// * `kinds` - Resolved argument kinds, in placeholder order
///
/// # Errors
/// * `FormatError::MalformedPlaceholder` - the format does not tokenize
/// * `FormatError::UnexpectedFieldName` / `UnexpectedConversion` - field the generator never emits
/// * `FormatError::ArgumentCountMismatch` - placeholder count differs from `kinds.len()`
/// * `FormatError::Item` - an argument kind has no legacy form for its spec
pub fn translate(format: &str, kinds: &[TraceItemKind]) -> Result<Translation, FormatError> {
    // '%' is the legacy escape character, double it before anything else
    let escaped = format.replace('%', "%%");
    let segments = parse_format(&escaped)?;

    let mut placeholders = 0;
    for field in segments.iter().filter_map(|segment| segment.field.as_ref()) {
        if !field.name.is_empty() {
            return Err(FormatError::UnexpectedFieldName(field.name.clone()));
        }
        if let Some(conversion) = field.conversion {
            return Err(FormatError::UnexpectedConversion(conversion));
        }
        placeholders += 1;
    }

    if placeholders != kinds.len() {
        return Err(FormatError::ArgumentCountMismatch {
            declared: kinds.len(),
            placeholders,
        });
    }

    let mut legacy = String::from(LEGACY_FORMAT_PREFIX);
    let mut warnings = Vec::new();
    let mut fields = kinds.iter().enumerate();

    for segment in &segments {
        legacy.push_str(&segment.literal);

        let Some(field) = &segment.field else {
            continue;
        };
        let Some((index, kind)) = fields.next() else {
            break;
        };

        let mapped = kind.legacy_format(&field.spec)?;
        legacy.push_str(&format!(
            "%{}!{}!",
            index + LEGACY_ARG_INDEX_BASE,
            mapped.spec
        ));
        warnings.extend(mapped.warnings);
    }

    debug!("Translated format {:?} to {:?}", format, legacy);

    Ok(Translation {
        text: quote(&legacy),
        warnings,
    })
}

/// Quote a string the way the legacy descriptor embeds it
///
/// JSON string quoting with ASCII-only output: non-ASCII characters and DEL
/// are written as `\uXXXX` UTF-16 code units.
pub fn quote(text: &str) -> String {
    let quoted = serde_json::Value::String(text.to_string()).to_string();
    if quoted.chars().all(|c| c.is_ascii() && c != '\x7f') {
        return quoted;
    }

    let mut ascii = String::with_capacity(quoted.len());
    let mut units = [0u16; 2];
    for c in quoted.chars() {
        if c.is_ascii() && c != '\x7f' {
            ascii.push(c);
            continue;
        }
        for unit in c.encode_utf16(&mut units) {
            ascii.push_str(&format!("\\u{:04x}", unit));
        }
    }
    ascii
}
