//! Classification of raw PDB annotations.
//!
//! Every instrumented trace leaves two annotations behind:
//! - `TMF_NG:` (primary) with the file, line, function, flag, level, format
//!   and the stringified arguments
//! - `TMF_NG_TYPES:` (secondary) with the signature of `annotateArgTypes<...>`,
//!   whose template arguments are the four hash words followed by the
//!   argument item types
//!
//! The two halves share nothing but the hash, so each is turned into a record
//! carrying its [`TraceId`].

use super::identifier::TraceId;
use super::split::{parse_int, split_args};
use crate::utils::config::{
    ARG_TYPES_MARKER, HASH_COMPONENT_COUNT, PRIMARY_FIELD_COUNT, PRIMARY_TAG, SECONDARY_TAG,
};
use crate::utils::error::AnnotationError;
use log::debug;
use std::fmt;

/// Which half of a trace an annotation describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationRole {
    Primary,
    Secondary,
}

impl fmt::Display for AnnotationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationRole::Primary => f.write_str("primary (TMF_NG)"),
            AnnotationRole::Secondary => f.write_str("secondary (TMF_NG_TYPES)"),
        }
    }
}

/// Annotation bytes as handed over by a symbol provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnnotation {
    /// Address of the annotated call site
    pub address: u64,

    /// NUL-terminated strings, back to back
    pub payload: Vec<u8>,
}

impl RawAnnotation {
    pub fn new(address: u64, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            address,
            payload: payload.into(),
        }
    }

    /// Build the payload from individual strings, terminating each with NUL
    pub fn from_strings<S: AsRef<str>>(address: u64, strings: &[S]) -> Self {
        let mut payload = Vec::new();
        for s in strings {
            payload.extend_from_slice(s.as_ref().as_bytes());
            payload.push(0);
        }
        Self { address, payload }
    }

    /// Split the payload into its strings
    ///
    /// The trailing empty segment left by the final terminator is dropped.
    pub fn segments(&self) -> Result<Vec<&str>, AnnotationError> {
        let text = std::str::from_utf8(&self.payload).map_err(|_| AnnotationError::NotUtf8 {
            address: self.address,
        })?;

        let mut segments: Vec<&str> = text.split('\0').collect();
        if segments.last() == Some(&"") {
            segments.pop();
        }
        Ok(segments)
    }
}

/// Location, format and raw arguments of a trace (the `TMF_NG:` half)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryRecord {
    /// `<directory>\<file>`, the path reduced to its last two components
    pub file_path: String,
    pub line: String,
    /// `FUNC=<signature>`
    pub func: String,
    /// `FLAG=<flag>`
    pub flag: String,
    /// `LEVEL=<level>`
    pub level: String,
    pub format_string: String,
    /// Stringified argument expressions of the trace call
    pub raw_args: String,
}

impl PrimaryRecord {
    /// Fields in annotation order, tag included, as fed to the hash
    pub fn hash_fields(&self) -> [&str; 8] {
        [
            PRIMARY_TAG,
            &self.file_path,
            &self.line,
            &self.func,
            &self.flag,
            &self.level,
            &self.format_string,
            &self.raw_args,
        ]
    }

    pub fn identifier(&self) -> TraceId {
        TraceId::from_primary_fields(&self.hash_fields())
    }

    /// Argument expressions as a list
    pub fn raw_arg_names(&self) -> Vec<String> {
        split_args(&self.raw_args)
    }
}

/// Hash words and argument types of a trace (the `TMF_NG_TYPES:` half)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryRecord {
    pub hash: [u32; 4],
    pub arg_type_names: Vec<String>,
}

impl SecondaryRecord {
    pub fn identifier(&self) -> TraceId {
        let [a, b, c, d] = self.hash;
        TraceId::from_secondary_ints(a, b, c, d)
    }
}

/// Outcome of classifying one annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Primary(PrimaryRecord),
    Secondary(SecondaryRecord),
    /// Annotation with a tag we do not handle; `tag` is its first segment
    Unrecognized { tag: String },
}

/// Classify a raw annotation
///
/// **Public** - main entry point of the annotation parser
///
/// # Errors
/// * `AnnotationError::NotUtf8` - payload is not text
/// * `AnnotationError::FieldCount` - primary annotation with the wrong number of fields
/// * `AnnotationError::MissingTypesMarker` - secondary annotation without the argument list
/// * `AnnotationError::MissingHashComponents` / `InvalidInteger` - bad hash words
pub fn classify(raw: &RawAnnotation) -> Result<Annotation, AnnotationError> {
    let segments = raw.segments()?;

    let Some((tag, fields)) = segments.split_first() else {
        return Ok(Annotation::Unrecognized { tag: String::new() });
    };

    match *tag {
        PRIMARY_TAG => parse_primary(fields).map(Annotation::Primary),
        SECONDARY_TAG => parse_secondary(fields).map(Annotation::Secondary),
        other => Ok(Annotation::Unrecognized {
            tag: other.to_string(),
        }),
    }
}

/// Build a primary record from the segments following the tag
///
/// **Private** - internal helper for classify
fn parse_primary(fields: &[&str]) -> Result<PrimaryRecord, AnnotationError> {
    let [file_path, line, func, flag, level, format_string, raw_args] = fields else {
        return Err(AnnotationError::FieldCount {
            expected: PRIMARY_FIELD_COUNT,
            found: fields.len(),
        });
    };

    let record = PrimaryRecord {
        file_path: reduce_path(file_path),
        line: line.to_string(),
        func: func.to_string(),
        flag: flag.to_string(),
        level: level.to_string(),
        format_string: format_string.to_string(),
        raw_args: raw_args.to_string(),
    };

    debug!("Primary annotation for {} : {}", record.file_path, record.line);

    Ok(record)
}

/// Build a secondary record from the function signature segment
///
/// **Private** - internal helper for classify
fn parse_secondary(fields: &[&str]) -> Result<SecondaryRecord, AnnotationError> {
    let signature = fields.first().copied().unwrap_or_default();

    let list_start = signature
        .find(ARG_TYPES_MARKER)
        .map(|index| index + ARG_TYPES_MARKER.len())
        .ok_or_else(|| AnnotationError::MissingTypesMarker(signature.to_string()))?;
    let list_end = signature
        .rfind('>')
        .filter(|end| *end >= list_start)
        .ok_or_else(|| AnnotationError::MissingTypesMarker(signature.to_string()))?;

    let args = split_args(&signature[list_start..list_end]);
    if args.len() < HASH_COMPONENT_COUNT {
        return Err(AnnotationError::MissingHashComponents(args.len()));
    }

    let (hash_args, type_names) = args.split_at(HASH_COMPONENT_COUNT);
    let mut hash = [0u32; 4];
    for (word, arg) in hash.iter_mut().zip(hash_args) {
        *word = parse_int(arg)?;
    }

    debug!("Secondary annotation with {} argument types", type_names.len());

    Ok(SecondaryRecord {
        hash,
        arg_type_names: type_names.to_vec(),
    })
}

/// Reduce a source path to `<parent directory><sep><file name>`
///
/// The generator hashes the path from its last directory onwards and keeps
/// the path's own separator, so the same is done here. A bare file name is
/// returned unchanged.
pub fn reduce_path(path: &str) -> String {
    let is_sep = |c: char| c == '\\' || c == '/';

    let Some(file_sep) = path.rfind(is_sep) else {
        return path.to_string();
    };
    let file_name = &path[file_sep + 1..];
    let directory = &path[..file_sep];
    let parent = directory
        .rfind(is_sep)
        .map_or(directory, |dir_sep| &directory[dir_sep + 1..]);

    if parent.is_empty() {
        return file_name.to_string();
    }

    // Separators are ASCII, so the byte at file_sep is the whole char
    let separator = &path[file_sep..file_sep + 1];
    format!("{}{}{}", parent, separator, file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn primary_strings(path: &str) -> Vec<String> {
        [
            PRIMARY_TAG,
            path,
            "42",
            "FUNC=int __cdecl main(void)",
            "FLAG=1",
            "LEVEL=TraceLevel::Info",
            "value={}",
            "x",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn test_reduce_path() {
        assert_eq!(reduce_path("C:\\src\\project\\file.cpp"), "project\\file.cpp");
        assert_eq!(reduce_path("/home/user/project/file.cpp"), "project/file.cpp");
        assert_eq!(reduce_path("a/b.cpp"), "a/b.cpp");
        assert_eq!(reduce_path("file.cpp"), "file.cpp");
        assert_eq!(reduce_path("/file.cpp"), "file.cpp");
    }

    #[test]
    fn test_segments_drop_final_terminator() {
        let raw = RawAnnotation::new(0, b"A\0B\0".to_vec());
        assert_eq!(raw.segments().unwrap(), vec!["A", "B"]);

        let with_empty_last = RawAnnotation::from_strings(0, &["A", ""]);
        assert_eq!(with_empty_last.segments().unwrap(), vec!["A", ""]);
    }

    #[test]
    fn test_segments_reject_invalid_utf8() {
        let raw = RawAnnotation::new(0x10, vec![0xff, 0xfe, 0]);
        assert_eq!(
            raw.segments().unwrap_err(),
            AnnotationError::NotUtf8 { address: 0x10 }
        );
    }

    #[test]
    fn test_classify_primary() {
        let raw = RawAnnotation::from_strings(0x1000, &primary_strings("C:\\src\\app\\main.cpp"));
        let Annotation::Primary(record) = classify(&raw).unwrap() else {
            panic!("expected a primary record");
        };

        assert_eq!(record.file_path, "app\\main.cpp");
        assert_eq!(record.line, "42");
        assert_eq!(record.format_string, "value={}");
        assert_eq!(record.raw_arg_names(), vec!["x"]);

        let expected = md5::compute(
            "TMF_NG:app\\main.cpp42FUNC=int __cdecl main(void)FLAG=1LEVEL=TraceLevel::Infovalue={}x",
        );
        assert_eq!(record.identifier(), TraceId::from_digest(expected.0));
    }

    #[test]
    fn test_classify_primary_wrong_field_count() {
        let mut strings = primary_strings("a/b.cpp");
        strings.pop();
        let raw = RawAnnotation::from_strings(0, &strings);
        assert_eq!(
            classify(&raw).unwrap_err(),
            AnnotationError::FieldCount {
                expected: 7,
                found: 6
            }
        );
    }

    #[test]
    fn test_classify_secondary() {
        let signature = "void __cdecl wpp::internal::annotateArgTypes<0x33221100,2003195204,0xbbaa9988,0xffeeddcc,struct wpp::UInt32Item,struct wpp::StringItem>(void)";
        let raw = RawAnnotation::from_strings(0x2000, &[SECONDARY_TAG, signature]);
        let Annotation::Secondary(record) = classify(&raw).unwrap() else {
            panic!("expected a secondary record");
        };

        assert_eq!(record.hash, [0x33221100, 0x77665544, 0xbbaa9988, 0xffeeddcc]);
        assert_eq!(
            record.arg_type_names,
            vec!["struct wpp::UInt32Item", "struct wpp::StringItem"]
        );
        assert_eq!(
            record.identifier().to_string(),
            "33221100-5544-3766-8899-aabbccddeeff"
        );
    }

    #[test]
    fn test_classify_secondary_without_arguments() {
        let raw = RawAnnotation::from_strings(0, &[SECONDARY_TAG, "annotateArgTypes<1,2,3,4>(void)"]);
        let Annotation::Secondary(record) = classify(&raw).unwrap() else {
            panic!("expected a secondary record");
        };
        assert_eq!(record.hash, [1, 2, 3, 4]);
        assert!(record.arg_type_names.is_empty());
    }

    #[test]
    fn test_classify_secondary_errors() {
        let no_marker = RawAnnotation::from_strings(0, &[SECONDARY_TAG, "void f<1,2,3,4>(void)"]);
        assert!(matches!(
            classify(&no_marker),
            Err(AnnotationError::MissingTypesMarker(_))
        ));

        let short = RawAnnotation::from_strings(0, &[SECONDARY_TAG, "annotateArgTypes<1,2>(void)"]);
        assert_eq!(
            classify(&short).unwrap_err(),
            AnnotationError::MissingHashComponents(2)
        );

        let bad_int =
            RawAnnotation::from_strings(0, &[SECONDARY_TAG, "annotateArgTypes<1,2,x,4>(void)"]);
        assert_eq!(
            classify(&bad_int).unwrap_err(),
            AnnotationError::InvalidInteger("x".to_string())
        );
    }

    #[test]
    fn test_classify_unrecognized() {
        let raw = RawAnnotation::from_strings(0, &["TMF_NG_FLAGS:", "bool annotateFlags<1>()"]);
        assert_eq!(
            classify(&raw).unwrap(),
            Annotation::Unrecognized {
                tag: "TMF_NG_FLAGS:".to_string()
            }
        );

        let empty = RawAnnotation::new(0, Vec::new());
        assert_eq!(
            classify(&empty).unwrap(),
            Annotation::Unrecognized { tag: String::new() }
        );
    }
}
