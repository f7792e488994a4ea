//! Helpers for reading template argument lists out of function signatures.

use crate::utils::error::AnnotationError;

/// Split a template argument list on top-level commas
///
/// **Public** - used by the secondary annotation parser
///
/// A comma separates two arguments only when no `}`, `)`, `>` or `]` after
/// it is left unmatched by an opener of the same kind, so `a, b>` stays one
/// argument while `a<b, c` splits. The list is scanned right to left with one
/// depth counter per bracket kind. Whitespace around each argument is
/// trimmed; an empty or blank list yields no arguments.
pub fn split_args(args: &str) -> Vec<String> {
    if args.trim().is_empty() {
        return Vec::new();
    }

    let mut items = Vec::new();
    let mut unmatched = [0usize; BRACKETS.len()];
    let mut end = args.len();

    for (index, c) in args.char_indices().rev() {
        if c == ',' && unmatched.iter().all(|&depth| depth == 0) {
            items.push(args[index + 1..end].trim().to_string());
            end = index;
        } else if let Some(kind) = BRACKETS.iter().position(|&(_, close)| close == c) {
            unmatched[kind] += 1;
        } else if let Some(kind) = BRACKETS.iter().position(|&(open, _)| open == c) {
            unmatched[kind] = unmatched[kind].saturating_sub(1);
        }
    }
    items.push(args[..end].trim().to_string());
    items.reverse();

    items
}

const BRACKETS: [(char, char); 4] = [('{', '}'), ('(', ')'), ('<', '>'), ('[', ']')];

/// Parse an unsigned 32-bit integer of unknown base
///
/// **Public** - hash components are printed by the compiler in any base
///
/// The base is inferred from a `0x`, `0b` or `0o` prefix (any case),
/// defaulting to decimal.
pub fn parse_int(arg: &str) -> Result<u32, AnnotationError> {
    let lower = arg.trim().to_ascii_lowercase();
    let (digits, radix) = if let Some(hex) = lower.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        (bin, 2)
    } else if let Some(oct) = lower.strip_prefix("0o") {
        (oct, 8)
    } else {
        (lower.as_str(), 10)
    };

    u32::from_str_radix(digits, radix).map_err(|_| AnnotationError::InvalidInteger(arg.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_simple_list() {
        assert_eq!(split_args("1, 2,3 ,  wpp::UInt32Item"), vec!["1", "2", "3", "wpp::UInt32Item"]);
    }

    #[test]
    fn test_split_keeps_nested_commas() {
        assert_eq!(
            split_args("A<int, char>, B(x, y), C{1, 2}, D[3, 4], E"),
            vec!["A<int, char>", "B(x, y)", "C{1, 2}", "D[3, 4]", "E"]
        );
    }

    #[test]
    fn test_split_deeply_nested() {
        assert_eq!(
            split_args("std::tuple<std::pair<int, (a, b)>, [c, d]>, last"),
            vec!["std::tuple<std::pair<int, (a, b)>, [c, d]>", "last"]
        );
    }

    #[test]
    fn test_split_ignores_closer_before_comma() {
        assert_eq!(split_args("a->b, c"), vec!["a->b", "c"]);
    }

    #[test]
    fn test_split_unmatched_closer_joins_arguments() {
        assert_eq!(split_args("a, b>"), vec!["a, b>"]);
        assert_eq!(split_args("x, y), z"), vec!["x, y)", "z"]);
    }

    #[test]
    fn test_split_unclosed_opener_does_not_join() {
        assert_eq!(split_args("a<b, c"), vec!["a<b", "c"]);
    }

    #[test]
    fn test_split_empty() {
        assert!(split_args("").is_empty());
        assert!(split_args("   ").is_empty());
        assert_eq!(split_args("single"), vec!["single"]);
    }

    #[test]
    fn test_parse_int_bases() {
        assert_eq!(parse_int("42").unwrap(), 42);
        assert_eq!(parse_int("0x2A").unwrap(), 42);
        assert_eq!(parse_int("0X2a").unwrap(), 42);
        assert_eq!(parse_int("0b101010").unwrap(), 42);
        assert_eq!(parse_int("0o52").unwrap(), 42);
        assert_eq!(parse_int("4294967295").unwrap(), u32::MAX);
    }

    #[test]
    fn test_parse_int_errors() {
        assert_eq!(
            parse_int("4294967296").unwrap_err(),
            AnnotationError::InvalidInteger("4294967296".to_string())
        );
        assert!(parse_int("0xZZ").is_err());
        assert!(parse_int("-1").is_err());
        assert!(parse_int("").is_err());
    }
}
