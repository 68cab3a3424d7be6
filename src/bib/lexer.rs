//! Lexical building blocks for the BibTeX grammar

use super::PResult;
use winnow::ascii::{digit1, multispace0};
use winnow::combinator::{alt, opt};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_while;

/// Produce a backtracking error
pub(crate) fn backtrack<O>() -> PResult<O> {
    Err(ErrMode::Backtrack(ContextError::default()))
}

/// Parse an identifier: citation keys, entry types, field and
/// abbreviation names. DBLP-style keys use `:` and `/`.
pub(crate) fn identifier<'a>(input: &mut &'a str) -> PResult<&'a str> {
    take_while(1.., |c: char| {
        c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.' | '+' | '/')
    })
    .parse_next(input)
}

/// Take brace-balanced text, stopping before the `}` that closes the
/// enclosing group. Backslash escapes the following byte.
pub(crate) fn balanced_braces<'a>(input: &mut &'a str) -> PResult<&'a str> {
    let original = *input;
    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut pos = 0usize;

    while pos < bytes.len() {
        let Some(off) = memchr::memchr3(b'{', b'}', b'\\', &bytes[pos..]) else {
            break;
        };
        pos += off;
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' => {
                if depth == 0 {
                    *input = &original[pos..];
                    return Ok(&original[..pos]);
                }
                depth -= 1;
            }
            _ => {
                // backslash: swallow the escaped byte as well
                pos += 1;
            }
        }
        pos += 1;
    }

    backtrack()
}

/// Parse a quoted literal `"..."`. Braces may nest inside and protect
/// embedded quotes.
pub(crate) fn quoted<'a>(input: &mut &'a str) -> PResult<&'a str> {
    let original = *input;
    let bytes = input.as_bytes();

    if bytes.first() != Some(&b'"') {
        return backtrack();
    }

    let mut depth = 0usize;
    let mut pos = 1usize;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'"' if depth == 0 => {
                *input = &original[pos + 1..];
                return Ok(&original[1..pos]);
            }
            b'{' => {
                depth += 1;
                pos += 1;
            }
            b'}' => {
                depth = depth.saturating_sub(1);
                pos += 1;
            }
            _ => pos += 1,
        }
    }

    backtrack()
}

/// Parse a signed integer
pub(crate) fn number(input: &mut &str) -> PResult<i64> {
    let sign = opt(alt(('+', '-'))).parse_next(input)?;
    let digits = digit1.parse_next(input)?;

    let mut value: i64 = digits
        .parse()
        .map_err(|_| ErrMode::Backtrack(ContextError::default()))?;
    if sign == Some('-') {
        value = -value;
    }

    Ok(value)
}

/// Advance past ASCII whitespace without going through winnow
pub(crate) fn skip_ws(input: &mut &str) {
    let bytes = input.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    *input = &input[pos..];
}

/// Make a parser tolerate surrounding whitespace
pub(crate) fn ws<'a, F, O>(mut parser: F) -> impl Parser<&'a str, O, ContextError>
where
    F: Parser<&'a str, O, ContextError>,
{
    move |input: &mut &'a str| {
        let _ = multispace0.parse_next(input)?;
        let output = parser.parse_next(input)?;
        let _ = multispace0.parse_next(input)?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier() {
        let mut input = "DBLP:books/aw/Knuth73a rest";
        assert_eq!(identifier(&mut input).unwrap(), "DBLP:books/aw/Knuth73a");
        assert_eq!(input, " rest");
    }

    #[test]
    fn test_balanced_braces() {
        let mut input = "The {\\TeX}book} tail";
        assert_eq!(balanced_braces(&mut input).unwrap(), "The {\\TeX}book");
        assert_eq!(input, "} tail");
    }

    #[test]
    fn test_balanced_braces_rejects_unclosed() {
        let mut input = "never {closed";
        assert!(balanced_braces(&mut input).is_err());
    }

    #[test]
    fn test_quoted() {
        let mut input = r#""Annalen der Physik" tail"#;
        assert_eq!(quoted(&mut input).unwrap(), "Annalen der Physik");
        assert_eq!(input, " tail");

        let mut input = r#""a {"} inside" tail"#;
        assert_eq!(quoted(&mut input).unwrap(), r#"a {"} inside"#);
    }

    #[test]
    fn test_number() {
        let mut input = "1905,";
        assert_eq!(number(&mut input).unwrap(), 1905);
        assert_eq!(input, ",");

        let mut input = "-3 ";
        assert_eq!(number(&mut input).unwrap(), -3);
    }

    #[test]
    fn test_ws() {
        let mut input = "  =  value";
        assert_eq!(ws('=').parse_next(&mut input).unwrap(), '=');
        assert_eq!(input, "value");
    }
}
