//! Pairing of primary and secondary annotations.
//!
//! Annotations arrive in no particular order. The correlator files each one
//! under its identifier and, once the provider is exhausted, merges both maps
//! into [`TraceRecord`]s.

use super::record::{RejectedTrace, TraceRecord};
use crate::items::TraceItemCatalog;
use crate::parser::{
    classify, Annotation, AnnotationRole, PrimaryRecord, RawAnnotation, SecondaryRecord, TraceId,
};
use crate::utils::error::{CorrelationError, ExtractError};
use crate::utils::logging::TraceContext;
use log::{debug, error, warn};
use std::collections::BTreeMap;

/// Where a correlator is in its lifecycle
///
/// Finalizing consumes the correlator, so there is no finalized state to observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelatorState {
    Empty,
    Collecting,
}

/// What a single `ingest` call did with its annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ingested {
    Primary(TraceId),
    Secondary(TraceId),
    Skipped { tag: String },
}

/// Result of a successful correlation
#[derive(Debug, Clone, Default)]
pub struct Correlation {
    /// Valid records, ordered by identifier
    pub records: Vec<TraceRecord>,

    /// Matched traces whose fields could not be parsed
    pub rejected: Vec<RejectedTrace>,

    /// Annotations with a tag we do not handle
    pub skipped: usize,
}

/// Collects annotations and merges them by identifier
///
/// **Public** - driven by `symbols::extract_traces`, usable on its own
pub struct TraceCorrelator<'c> {
    catalog: &'c TraceItemCatalog,
    primaries: BTreeMap<TraceId, PrimaryRecord>,
    secondaries: BTreeMap<TraceId, SecondaryRecord>,
    skipped: usize,
}

impl<'c> TraceCorrelator<'c> {
    pub fn new(catalog: &'c TraceItemCatalog) -> Self {
        Self {
            catalog,
            primaries: BTreeMap::new(),
            secondaries: BTreeMap::new(),
            skipped: 0,
        }
    }

    pub fn state(&self) -> CorrelatorState {
        if self.primaries.is_empty() && self.secondaries.is_empty() && self.skipped == 0 {
            CorrelatorState::Empty
        } else {
            CorrelatorState::Collecting
        }
    }

    /// Classify one annotation and file it under its identifier
    ///
    /// **Public** - called once per annotation
    ///
    /// # Errors
    /// * `ExtractError::Annotation` - the annotation is malformed
    /// * `ExtractError::Correlation` - its identifier was already seen in the same role
    pub fn ingest(&mut self, raw: &RawAnnotation) -> Result<Ingested, ExtractError> {
        match classify(raw)? {
            Annotation::Primary(record) => Ok(Ingested::Primary(self.add_primary(record)?)),
            Annotation::Secondary(record) => Ok(Ingested::Secondary(self.add_secondary(record)?)),
            Annotation::Unrecognized { tag } => {
                warn!(
                    "Unrecognized annotation at {:#x}: {}",
                    raw.address,
                    hex::encode(&raw.payload)
                );
                warn!("Skipping...");
                self.skipped += 1;
                Ok(Ingested::Skipped { tag })
            }
        }
    }

    /// File an already classified primary record
    pub fn add_primary(&mut self, record: PrimaryRecord) -> Result<TraceId, CorrelationError> {
        let identifier = record.identifier();
        insert_unique(&mut self.primaries, identifier, record, AnnotationRole::Primary)?;
        debug!("Primary annotation {}", identifier);
        Ok(identifier)
    }

    /// File an already classified secondary record
    pub fn add_secondary(&mut self, record: SecondaryRecord) -> Result<TraceId, CorrelationError> {
        let identifier = record.identifier();
        insert_unique(&mut self.secondaries, identifier, record, AnnotationRole::Secondary)?;
        debug!("Secondary annotation {}", identifier);
        Ok(identifier)
    }

    /// Merge both maps into records
    ///
    /// **Public** - consumes the correlator
    ///
    /// # Errors
    /// * `CorrelationError::UnmatchedAnnotation` - an identifier appears on one side only.
    ///   The smallest one is reported, all of them are logged.
    pub fn finalize(self) -> Result<Correlation, CorrelationError> {
        let mut unmatched: Vec<(TraceId, AnnotationRole)> = self
            .primaries
            .keys()
            .filter(|id| !self.secondaries.contains_key(id))
            .map(|id| (*id, AnnotationRole::Secondary))
            .chain(
                self.secondaries
                    .keys()
                    .filter(|id| !self.primaries.contains_key(id))
                    .map(|id| (*id, AnnotationRole::Primary)),
            )
            .collect();
        unmatched.sort_by_key(|(identifier, _)| *identifier);

        for (identifier, missing) in &unmatched {
            error!("GUID {} has no {} annotation", identifier, missing);
        }
        if let Some((identifier, missing)) = unmatched.first().copied() {
            return Err(CorrelationError::UnmatchedAnnotation {
                identifier,
                missing,
            });
        }

        let mut correlation = Correlation {
            skipped: self.skipped,
            ..Correlation::default()
        };

        for (identifier, primary) in &self.primaries {
            let Some(secondary) = self.secondaries.get(identifier) else {
                continue;
            };

            match TraceRecord::from_parts(*identifier, primary, secondary, self.catalog) {
                Ok(record) => correlation.records.push(record),
                Err(err) => {
                    let ctx = TraceContext::new(&primary.file_path, &primary.line);
                    error!("{} {}", ctx, err);
                    correlation.rejected.push(RejectedTrace::new(
                        *identifier,
                        ctx.location(),
                        err,
                    ));
                }
            }
        }

        debug!(
            "Correlated {} traces ({} rejected, {} skipped)",
            correlation.records.len(),
            correlation.rejected.len(),
            correlation.skipped
        );

        Ok(correlation)
    }
}

/// **Private** - internal helper for add_primary / add_secondary
fn insert_unique<T>(
    map: &mut BTreeMap<TraceId, T>,
    identifier: TraceId,
    record: T,
    role: AnnotationRole,
) -> Result<(), CorrelationError> {
    if map.contains_key(&identifier) {
        return Err(CorrelationError::DuplicateIdentifier { identifier, role });
    }
    map.insert(identifier, record);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::unpack_hash_words;
    use crate::utils::config::{PRIMARY_TAG, SECONDARY_TAG};
    use crate::utils::error::RecordError;

    const FIELDS: [&str; 7] = ["a/b.cpp", "42", "FUNC=foo", "FLAG=3", "TraceLevel::Info", "val={}", "x"];

    fn primary(fields: &[&str]) -> RawAnnotation {
        let mut strings = vec![PRIMARY_TAG];
        strings.extend_from_slice(fields);
        RawAnnotation::from_strings(0x1000, &strings)
    }

    fn secondary_for(fields: &[&str], types: &str) -> RawAnnotation {
        let digest = md5::compute(format!("{}{}", PRIMARY_TAG, fields.concat()));
        let [a, b, c, d] = unpack_hash_words(digest.0);
        let signature = format!(
            "void __cdecl wpp::annotateArgTypes<{},{},{},{}{}>(void)",
            a, b, c, d, types
        );
        RawAnnotation::from_strings(0x2000, &[SECONDARY_TAG, signature.as_str()])
    }

    #[test]
    fn test_state_transitions() {
        let catalog = TraceItemCatalog::new();
        let mut correlator = TraceCorrelator::new(&catalog);
        assert_eq!(correlator.state(), CorrelatorState::Empty);

        correlator.ingest(&primary(&FIELDS)).unwrap();
        assert_eq!(correlator.state(), CorrelatorState::Collecting);
    }

    #[test]
    fn test_pair_is_merged() {
        let catalog = TraceItemCatalog::new();
        let mut correlator = TraceCorrelator::new(&catalog);

        let secondary = correlator
            .ingest(&secondary_for(&FIELDS, ",struct wpp::UInt32Item"))
            .unwrap();
        let primary = correlator.ingest(&primary(&FIELDS)).unwrap();

        let (Ingested::Primary(p), Ingested::Secondary(s)) = (primary, secondary) else {
            panic!("unexpected roles");
        };
        assert_eq!(p, s);

        let correlation = correlator.finalize().unwrap();
        assert_eq!(correlation.records.len(), 1);
        assert!(correlation.rejected.is_empty());
        assert_eq!(
            correlation.records[0].legacy_format().unwrap(),
            "\"%0 val=%10!u!\""
        );
    }

    #[test]
    fn test_duplicate_primary() {
        let catalog = TraceItemCatalog::new();
        let mut correlator = TraceCorrelator::new(&catalog);
        correlator.ingest(&primary(&FIELDS)).unwrap();

        let err = correlator.ingest(&primary(&FIELDS)).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::Correlation(CorrelationError::DuplicateIdentifier {
                role: AnnotationRole::Primary,
                ..
            })
        ));
    }

    #[test]
    fn test_unmatched_secondary() {
        let catalog = TraceItemCatalog::new();
        let mut correlator = TraceCorrelator::new(&catalog);
        let Ingested::Secondary(identifier) = correlator
            .ingest(&secondary_for(&FIELDS, ""))
            .unwrap()
        else {
            panic!("expected a secondary");
        };

        assert_eq!(
            correlator.finalize().unwrap_err(),
            CorrelationError::UnmatchedAnnotation {
                identifier,
                missing: AnnotationRole::Primary
            }
        );
    }

    #[test]
    fn test_unknown_type_is_rejected_not_fatal() {
        let catalog = TraceItemCatalog::new();
        let mut correlator = TraceCorrelator::new(&catalog);
        correlator.ingest(&primary(&FIELDS)).unwrap();
        correlator
            .ingest(&secondary_for(&FIELDS, ",struct wpp::BlobItem"))
            .unwrap();

        let correlation = correlator.finalize().unwrap();
        assert!(correlation.records.is_empty());
        assert_eq!(correlation.rejected.len(), 1);
        assert_eq!(correlation.rejected[0].location, "a/b.cpp : 42");
        assert!(matches!(correlation.rejected[0].error, RecordError::Item(_)));
    }

    #[test]
    fn test_unrecognized_is_skipped() {
        let catalog = TraceItemCatalog::new();
        let mut correlator = TraceCorrelator::new(&catalog);
        let raw = RawAnnotation::from_strings(0x3000, &["OTHER:", "data"]);

        assert_eq!(
            correlator.ingest(&raw).unwrap(),
            Ingested::Skipped {
                tag: "OTHER:".to_string()
            }
        );

        let correlation = correlator.finalize().unwrap();
        assert_eq!(correlation.skipped, 1);
        assert!(correlation.records.is_empty());
    }
}
