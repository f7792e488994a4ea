use proptest::prelude::*;
use wppng_tracepdb::format::translate;
use wppng_tracepdb::items::TraceItemKind;
use wppng_tracepdb::parser::{pack_hash_words, unpack_hash_words, TraceId};
use wppng_tracepdb::utils::error::{FormatError, TraceItemError};

fn any_kind() -> impl Strategy<Value = TraceItemKind> {
    proptest::sample::select(TraceItemKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_identifier_is_deterministic(fields in proptest::collection::vec(".*", 0..8)) {
        prop_assert_eq!(
            TraceId::from_primary_fields(&fields),
            TraceId::from_primary_fields(&fields)
        );
    }

    #[test]
    fn prop_secondary_matches_packed_digest(a: u32, b: u32, c: u32, d: u32) {
        let packed = pack_hash_words([a, b, c, d]);
        prop_assert_eq!(TraceId::from_secondary_ints(a, b, c, d), TraceId::from_digest(packed));
        prop_assert_eq!(unpack_hash_words(packed), [a, b, c, d]);
    }

    #[test]
    fn prop_primary_correlates_with_its_hash_words(fields in proptest::collection::vec("[a-z0-9=:{} ]*", 1..8)) {
        let digest = md5::compute(fields.concat());
        let [a, b, c, d] = unpack_hash_words(digest.0);
        prop_assert_eq!(
            TraceId::from_primary_fields(&fields),
            TraceId::from_secondary_ints(a, b, c, d)
        );
    }

    #[test]
    fn prop_identifier_has_version_three(digest: [u8; 16]) {
        let id = TraceId::from_digest(digest);
        prop_assert_eq!(id.as_bytes()[6] >> 4, 3);
        prop_assert_eq!(&id.as_bytes()[8..], &digest[8..]);
    }

    #[test]
    fn prop_count_invariant(placeholders in 0usize..6, kinds in proptest::collection::vec(any_kind(), 0..6)) {
        let format = "{} ".repeat(placeholders);
        match translate(&format, &kinds) {
            Ok(_) => prop_assert_eq!(placeholders, kinds.len()),
            Err(FormatError::ArgumentCountMismatch { declared, placeholders: found }) => {
                prop_assert_ne!(placeholders, kinds.len());
                prop_assert_eq!(declared, kinds.len());
                prop_assert_eq!(found, placeholders);
            }
            // Only possible when the counts agree
            Err(FormatError::Item(_)) => prop_assert_eq!(placeholders, kinds.len()),
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }

    #[test]
    fn prop_percent_is_never_a_placeholder(text in "[a-z %]*") {
        let translation = translate(&text, &[]).unwrap();
        let expected = format!("%0 {}", text.replace('%', "%%"));
        prop_assert_eq!(translation.text, serde_json::Value::String(expected).to_string());
    }

    #[test]
    fn prop_every_kind_has_a_default_mapping_or_refuses(kind in any_kind()) {
        prop_assert!(!kind.legacy_item_name().is_empty());
        prop_assert!(!kind.registered_name().is_empty());
        match kind.legacy_format("") {
            Ok(mapped) => prop_assert!(!mapped.spec.is_empty()),
            Err(err) => prop_assert!(
                matches!(err, TraceItemError::UnsupportedLegacyFormat { .. }),
                "unexpected error {:?}",
                err
            ),
        }
    }
}
