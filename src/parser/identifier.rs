//! Trace identifiers.
//!
//! The code generator hashes each trace call site at compile time and turns
//! the MD5 digest into a version 3 style GUID. Both annotation halves must
//! land on the same GUID here, so the byte layout below has to match the
//! generator exactly.

use std::fmt;
use uuid::Uuid;

/// Canonical 128-bit identifier of a trace call site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Hash the primary annotation fields (concatenated, no separator)
    ///
    /// **Public** - used for primary records
    pub fn from_primary_fields<S: AsRef<str>>(fields: &[S]) -> Self {
        let mut context = md5::Context::new();
        for field in fields {
            context.consume(field.as_ref().as_bytes());
        }
        Self::from_digest(context.compute().0)
    }

    /// Rebuild the identifier from the four hash words of a secondary annotation
    ///
    /// **Public** - used for secondary records
    pub fn from_secondary_ints(a: u32, b: u32, c: u32, d: u32) -> Self {
        Self::from_digest(pack_hash_words([a, b, c, d]))
    }

    /// Apply the canonical transform to 16 digest bytes
    ///
    /// The digest is read as `(u32 LE, u16 LE, u16 LE, [u8; 2], [u8; 6])`
    /// and written back big-endian, with the version nibble forced to 3.
    pub fn from_digest(digest: [u8; 16]) -> Self {
        let time_low = u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]]);
        let time_mid = u16::from_le_bytes([digest[4], digest[5]]);
        let time_hi = u16::from_le_bytes([digest[6], digest[7]]);
        let time_hi_and_version = (time_hi & 0x0fff) | 0x3000;

        let mut bytes = [0u8; 16];
        bytes[0..4].copy_from_slice(&time_low.to_be_bytes());
        bytes[4..6].copy_from_slice(&time_mid.to_be_bytes());
        bytes[6..8].copy_from_slice(&time_hi_and_version.to_be_bytes());
        bytes[8..16].copy_from_slice(&digest[8..16]);

        Self(Uuid::from_bytes(bytes))
    }

    /// Canonical byte form
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

/// Pack four hash words little-endian into a digest-shaped buffer
pub fn pack_hash_words(words: [u32; 4]) -> [u8; 16] {
    let mut digest = [0u8; 16];
    for (chunk, word) in digest.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    digest
}

/// Split an MD5 digest into the four words the generator passes as template arguments
pub fn unpack_hash_words(digest: [u8; 16]) -> [u32; 4] {
    let mut words = [0u32; 4];
    for (word, chunk) in words.iter_mut().zip(digest.chunks_exact(4)) {
        *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    words
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
