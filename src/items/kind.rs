//! Argument kinds and their legacy WPP formatting rules.
//!
//! Each trace argument is described by a [`TraceItemKind`]. A kind knows how
//! a modern format spec (`x`, `zd`, `s`, ...) maps onto the legacy printf-like
//! spec used inside TMF files, and which legacy item type decodes it.

use crate::utils::error::TraceItemError;
use std::fmt;

/// Semantic type of a single trace argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TraceItemKind {
    Char,
    WChar,
    String,
    WString,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    SizeT,
    PtrDiff,
    Float,
    Double,
    LongDouble,
    Pointer,
    Guid,
    HexBuffer,
    HexDump,
}

/// Storage width of an integral argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegralWidth {
    Bytes(u8),
    /// Architecture dependent (`size_t`, `ptrdiff_t`)
    PointerSized,
}

impl IntegralWidth {
    /// Legacy printf size prefix for this width
    pub fn legacy_prefix(self) -> &'static str {
        match self {
            IntegralWidth::Bytes(8) => "I64",
            IntegralWidth::Bytes(4) => "",
            IntegralWidth::Bytes(2) => "h",
            IntegralWidth::Bytes(_) => "hh",
            IntegralWidth::PointerSized => "I",
        }
    }
}

/// Non-fatal findings while mapping a format spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatWarning {
    /// Legacy tooling cannot print a signed 8-bit value
    SignedByteAsUnsigned,
    /// Binary output has no legacy equivalent; hex is used instead
    BinaryAsHex { requested: String },
}

impl fmt::Display for FormatWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatWarning::SignedByteAsUnsigned => {
                write!(f, "Cannot print int8_t as signed, using the unsigned form!")
            }
            FormatWarning::BinaryAsHex { requested } => write!(
                f,
                "Got unsupported legacy format {}, replacing with hex version",
                requested
            ),
        }
    }
}

/// Result of mapping a format spec to its legacy form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyFormat {
    pub spec: String,
    pub warnings: Vec<FormatWarning>,
}

impl LegacyFormat {
    fn plain(spec: &str) -> Self {
        Self {
            spec: spec.to_string(),
            warnings: Vec::new(),
        }
    }
}

impl TraceItemKind {
    /// Every kind, in registration order
    pub const ALL: [TraceItemKind; 21] = [
        TraceItemKind::Char,
        TraceItemKind::WChar,
        TraceItemKind::String,
        TraceItemKind::WString,
        TraceItemKind::Int8,
        TraceItemKind::Int16,
        TraceItemKind::Int32,
        TraceItemKind::Int64,
        TraceItemKind::UInt8,
        TraceItemKind::UInt16,
        TraceItemKind::UInt32,
        TraceItemKind::UInt64,
        TraceItemKind::SizeT,
        TraceItemKind::PtrDiff,
        TraceItemKind::Float,
        TraceItemKind::Double,
        TraceItemKind::LongDouble,
        TraceItemKind::Pointer,
        TraceItemKind::Guid,
        TraceItemKind::HexBuffer,
        TraceItemKind::HexDump,
    ];

    /// Type name the code generator emits for this kind (without namespace)
    pub fn registered_name(self) -> &'static str {
        match self {
            TraceItemKind::Char => "CharItem",
            TraceItemKind::WChar => "WCharItem",
            TraceItemKind::String => "StringItem",
            TraceItemKind::WString => "WStringItem",
            TraceItemKind::Int8 => "Int8Item",
            TraceItemKind::Int16 => "Int16Item",
            TraceItemKind::Int32 => "Int32Item",
            TraceItemKind::Int64 => "Int64Item",
            TraceItemKind::UInt8 => "UInt8Item",
            TraceItemKind::UInt16 => "UInt16Item",
            TraceItemKind::UInt32 => "UInt32Item",
            TraceItemKind::UInt64 => "UInt64Item",
            TraceItemKind::SizeT => "SizeTItem",
            TraceItemKind::PtrDiff => "PtrDiffItem",
            TraceItemKind::Float => "FloatItem",
            TraceItemKind::Double => "DoubleItem",
            TraceItemKind::LongDouble => "LongDoubleItem",
            TraceItemKind::Pointer => "PointerItem",
            TraceItemKind::Guid => "GuidItem",
            TraceItemKind::HexBuffer => "HexBufferItem",
            TraceItemKind::HexDump => "HexDumpItem",
        }
    }

    /// Name of the legacy WPP item type decoding this kind, e.g. `ItemLong`
    pub fn legacy_item_name(self) -> &'static str {
        match self {
            TraceItemKind::Char | TraceItemKind::Int8 => "ItemChar",
            TraceItemKind::WChar | TraceItemKind::Int16 | TraceItemKind::UInt16 => "ItemShort",
            TraceItemKind::Int32 | TraceItemKind::UInt32 => "ItemLong",
            TraceItemKind::Int64 => "ItemLongLong",
            TraceItemKind::UInt8 => "ItemUChar",
            TraceItemKind::UInt64 => "ItemULongLong",
            TraceItemKind::SizeT | TraceItemKind::PtrDiff | TraceItemKind::Pointer => "ItemPtr",
            TraceItemKind::String => "ItemString",
            TraceItemKind::WString => "ItemWString",
            TraceItemKind::Guid => "ItemGuid",
            TraceItemKind::HexBuffer => "ItemHEXBytes",
            TraceItemKind::HexDump => "ItemHEXDump",
            TraceItemKind::Float => "ItemFloat",
            TraceItemKind::Double => "ItemDouble",
            TraceItemKind::LongDouble => "ItemLongDouble",
        }
    }

    /// Width and signedness, for kinds printed through the integral rules
    pub fn integral_layout(self) -> Option<(IntegralWidth, bool)> {
        let layout = match self {
            TraceItemKind::Char | TraceItemKind::Int8 => (IntegralWidth::Bytes(1), true),
            TraceItemKind::WChar | TraceItemKind::Int16 => (IntegralWidth::Bytes(2), true),
            TraceItemKind::Int32 => (IntegralWidth::Bytes(4), true),
            TraceItemKind::Int64 => (IntegralWidth::Bytes(8), true),
            TraceItemKind::UInt8 => (IntegralWidth::Bytes(1), false),
            TraceItemKind::UInt16 => (IntegralWidth::Bytes(2), false),
            TraceItemKind::UInt32 => (IntegralWidth::Bytes(4), false),
            TraceItemKind::UInt64 => (IntegralWidth::Bytes(8), false),
            TraceItemKind::SizeT => (IntegralWidth::PointerSized, false),
            TraceItemKind::PtrDiff => (IntegralWidth::PointerSized, true),
            _ => return None,
        };
        Some(layout)
    }

    /// Map a modern format spec to the legacy spec for this kind
    ///
    /// **Public** - used by the format translator
    ///
    /// # Errors
    /// * `TraceItemError::UnsupportedLegacyFormat` - the format spec has no legacy equivalent
    pub fn legacy_format(self, format_spec: &str) -> Result<LegacyFormat, TraceItemError> {
        match self {
            TraceItemKind::Int8 => {
                let mut result = self.integral_format(format_spec, format_spec)?;
                if format_spec.is_empty() || format_spec == "d" {
                    result.warnings.insert(0, FormatWarning::SignedByteAsUnsigned);
                }
                Ok(result)
            }
            TraceItemKind::SizeT | TraceItemKind::PtrDiff => {
                let stripped = format_spec.strip_prefix('z').unwrap_or(format_spec);
                self.integral_format(stripped, format_spec)
            }
            TraceItemKind::Char | TraceItemKind::WChar => match format_spec {
                "" | "c" => Ok(LegacyFormat::plain("c")),
                _ => self.integral_format(format_spec, format_spec),
            },
            TraceItemKind::Int16
            | TraceItemKind::Int32
            | TraceItemKind::Int64
            | TraceItemKind::UInt8
            | TraceItemKind::UInt16
            | TraceItemKind::UInt32
            | TraceItemKind::UInt64 => self.integral_format(format_spec, format_spec),
            TraceItemKind::Pointer => match format_spec {
                "" | "p" => Ok(LegacyFormat::plain("p")),
                _ => Err(self.unsupported(format_spec)),
            },
            TraceItemKind::String | TraceItemKind::WString => match format_spec {
                "" | "s" => Ok(LegacyFormat::plain("s")),
                _ => Err(self.unsupported(format_spec)),
            },
            TraceItemKind::Guid => match format_spec {
                "" => Ok(LegacyFormat::plain("GUID")),
                _ => Err(self.unsupported(format_spec)),
            },
            TraceItemKind::HexBuffer | TraceItemKind::HexDump => Ok(LegacyFormat::plain("s")),
            TraceItemKind::Float | TraceItemKind::Double | TraceItemKind::LongDouble => {
                let spec = if format_spec.is_empty() { "f" } else { format_spec };
                match spec.to_ascii_lowercase().as_str() {
                    "a" | "e" | "f" | "g" => Ok(LegacyFormat::plain(spec)),
                    _ => Err(self.unsupported(format_spec)),
                }
            }
        }
    }

    /// Shared rules for every kind printed as an integer
    ///
    /// **Private** - `spec` is the (possibly normalised) spec to map,
    /// `requested` the caller's original spec for error reporting
    fn integral_format(self, spec: &str, requested: &str) -> Result<LegacyFormat, TraceItemError> {
        let Some((width, signed)) = self.integral_layout() else {
            return Err(self.unsupported(requested));
        };

        let sign = if signed { "d" } else { "u" };
        let mut int_spec = if spec.is_empty() {
            sign.to_string()
        } else {
            spec.replace('d', sign)
        };

        let mut warnings = Vec::new();
        if int_spec.to_ascii_lowercase().contains('b') {
            warnings.push(FormatWarning::BinaryAsHex {
                requested: int_spec.clone(),
            });
            int_spec = int_spec.replace('b', "x").replace('B', "X");
        }

        if !matches!(int_spec.as_str(), "d" | "u" | "x" | "X" | "o") {
            return Err(self.unsupported(requested));
        }

        Ok(LegacyFormat {
            spec: format!("{}{}", width.legacy_prefix(), int_spec),
            warnings,
        })
    }

    fn unsupported(self, requested: &str) -> TraceItemError {
        TraceItemError::UnsupportedLegacyFormat {
            kind: self,
            requested: requested.to_string(),
        }
    }
}

impl fmt::Display for TraceItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.registered_name())
    }
}
