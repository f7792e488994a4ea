//! Tokenizer for brace-style format strings (`"value={} hex={:x}"`).
//!
//! Splits a format into literal text and replacement fields. `{{` and `}}`
//! are literal braces; a field may contain nested braces in its spec.

use crate::utils::error::FormatError;

/// A replacement field, split into its three parts
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Field {
    pub name: String,
    pub conversion: Option<char>,
    pub spec: String,
}

/// Literal text followed by an optional field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub literal: String,
    pub field: Option<Field>,
}

/// Tokenize a format string
///
/// **Public** - used by the translator
///
/// # Errors
/// * `FormatError::MalformedPlaceholder` - lone `}`, unterminated `{`, or a
///   conversion without a following `:`
pub fn parse_format(format: &str) -> Result<Vec<Segment>, FormatError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = format.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '}' => {
                return Err(FormatError::MalformedPlaceholder(
                    "single '}' encountered in format string".to_string(),
                ));
            }
            '{' => {
                let body = read_field_body(&mut chars)?;
                segments.push(Segment {
                    literal: std::mem::take(&mut literal),
                    field: Some(split_field(&body)?),
                });
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment {
            literal,
            field: None,
        });
    }

    Ok(segments)
}

/// Collect everything up to the `}` closing the current field
///
/// **Private** - nested `{...}` inside the field are kept verbatim
fn read_field_body(chars: &mut impl Iterator<Item = char>) -> Result<String, FormatError> {
    let mut body = String::new();
    let mut depth = 1usize;

    for c in chars {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(body);
                }
            }
            _ => {}
        }
        body.push(c);
    }

    Err(FormatError::MalformedPlaceholder(
        "expected '}' before end of string".to_string(),
    ))
}

/// Split `name!conversion:spec`
///
/// **Private** - `:` or `!` inside `[...]` belong to the name
fn split_field(body: &str) -> Result<Field, FormatError> {
    let mut in_index = false;
    let mut name_end = body.len();
    for (i, c) in body.char_indices() {
        match c {
            '[' => in_index = true,
            ']' => in_index = false,
            ':' | '!' if !in_index => {
                name_end = i;
                break;
            }
            _ => {}
        }
    }

    let name = body[..name_end].to_string();
    let mut rest = body[name_end..].chars();

    let conversion = match rest.clone().next() {
        Some('!') => {
            rest.next();
            let conversion = rest.next().ok_or_else(|| {
                FormatError::MalformedPlaceholder(
                    "end of string while looking for conversion specifier".to_string(),
                )
            })?;
            Some(conversion)
        }
        _ => None,
    };

    let spec = match rest.next() {
        None => String::new(),
        Some(':') => rest.collect(),
        Some(_) => {
            return Err(FormatError::MalformedPlaceholder(
                "expected ':' after conversion specifier".to_string(),
            ));
        }
    };

    Ok(Field {
        name,
        conversion,
        spec,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(spec: &str) -> Option<Field> {
        Some(Field {
            spec: spec.to_string(),
            ..Field::default()
        })
    }

    #[test]
    fn test_literal_only() {
        assert_eq!(
            parse_format("no fields").unwrap(),
            vec![Segment {
                literal: "no fields".to_string(),
                field: None
            }]
        );
        assert!(parse_format("").unwrap().is_empty());
    }

    #[test]
    fn test_fields_and_specs() {
        assert_eq!(
            parse_format("a={} b={:x} c={:}").unwrap(),
            vec![
                Segment {
                    literal: "a=".to_string(),
                    field: field("")
                },
                Segment {
                    literal: " b=".to_string(),
                    field: field("x")
                },
                Segment {
                    literal: " c=".to_string(),
                    field: field("")
                },
            ]
        );
    }

    #[test]
    fn test_escaped_braces() {
        assert_eq!(
            parse_format("{{literal}} {}").unwrap(),
            vec![Segment {
                literal: "{literal} ".to_string(),
                field: field("")
            }]
        );
    }

    #[test]
    fn test_name_and_conversion() {
        let segments = parse_format("{0!r:>10}{name[a:b]}").unwrap();
        assert_eq!(
            segments[0].field,
            Some(Field {
                name: "0".to_string(),
                conversion: Some('r'),
                spec: ">10".to_string()
            })
        );
        assert_eq!(segments[1].field.as_ref().unwrap().name, "name[a:b]");
    }

    #[test]
    fn test_nested_braces_in_spec() {
        let segments = parse_format("{:{}}").unwrap();
        assert_eq!(segments[0].field, field("{}"));
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            parse_format("oops }"),
            Err(FormatError::MalformedPlaceholder(_))
        ));
        assert!(matches!(
            parse_format("open {"),
            Err(FormatError::MalformedPlaceholder(_))
        ));
        assert!(matches!(
            parse_format("{!r x}"),
            Err(FormatError::MalformedPlaceholder(_))
        ));
        assert!(matches!(
            parse_format("{!}"),
            Err(FormatError::MalformedPlaceholder(_))
        ));
    }
}
