//! BibTeX grammar, built on winnow
//!
//! The grammar follows BibTeX convention: everything outside an `@...`
//! construct is free-text comment. `@string`, `@preamble`, and
//! `@comment` are recognized case-insensitively; any other `@type` opens
//! an entry.

pub(crate) mod entry;
pub(crate) mod lexer;

use crate::error::{Error, Result};
use crate::model::{Entry, Value};
use winnow::combinator::separated_pair;
use winnow::prelude::*;
use winnow::token::take_until;

/// Internal parser result type
pub(crate) type PResult<O> = winnow::PResult<O, winnow::error::ContextError>;

/// One syntactic item from a `.bib` source
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Item<'a> {
    /// A bibliography entry
    Entry(Entry<'a>),
    /// A `@string` abbreviation definition
    Abbrev(&'a str, Value<'a>),
    /// A `@preamble` value
    Preamble(Value<'a>),
}

/// Parse a complete `.bib` source into its item sequence
pub(crate) fn items(input: &str) -> Result<Vec<Item<'_>>> {
    let mut out = Vec::new();
    let mut rest = input;

    loop {
        // free text up to the next '@' is comment
        match memchr::memchr(b'@', rest.as_bytes()) {
            Some(at) => rest = &rest[at..],
            None => break,
        }

        let mut cursor = rest;
        match item(&mut cursor) {
            Ok(Some(item)) => out.push(item),
            Ok(None) => {}
            Err(e) => {
                let consumed = input.len() - rest.len();
                let (line, column) = position(input, consumed);
                return Err(Error::Format {
                    line,
                    column,
                    message: format!("cannot parse entry: {e}"),
                    snippet: Some(snippet(rest, 40)),
                });
            }
        }
        rest = cursor;
    }

    out.shrink_to_fit();
    Ok(out)
}

/// Parse one `@...` construct. Returns `None` for `@comment` blocks,
/// which are recognized and dropped.
fn item<'a>(input: &mut &'a str) -> PResult<Option<Item<'a>>> {
    '@'.parse_next(input)?;
    let kind = lexer::ws(lexer::identifier).parse_next(input)?;

    if kind.eq_ignore_ascii_case("comment") {
        comment_body(input)?;
        return Ok(None);
    }
    if kind.eq_ignore_ascii_case("string") {
        let (name, value) = block(input, abbrev_body)?;
        return Ok(Some(Item::Abbrev(name, value)));
    }
    if kind.eq_ignore_ascii_case("preamble") {
        let value = block(input, |i: &mut &'a str| lexer::ws(entry::value).parse_next(i))?;
        return Ok(Some(Item::Preamble(value)));
    }

    entry::entry_body(input, kind).map(|e| Some(Item::Entry(e)))
}

/// Run `body` inside `{...}` or `(...)` delimiters
fn block<'a, O, F>(input: &mut &'a str, mut body: F) -> PResult<O>
where
    F: FnMut(&mut &'a str) -> PResult<O>,
{
    lexer::skip_ws(input);

    let close = if input.starts_with('{') {
        '}'
    } else if input.starts_with('(') {
        ')'
    } else {
        return lexer::backtrack();
    };
    *input = &input[1..];

    let out = body(input)?;

    lexer::skip_ws(input);
    if !input.starts_with(close) {
        return lexer::backtrack();
    }
    *input = &input[1..];

    Ok(out)
}

/// `name = value` inside a `@string` block
fn abbrev_body<'a>(input: &mut &'a str) -> PResult<(&'a str, Value<'a>)> {
    separated_pair(
        lexer::ws(lexer::identifier),
        '=',
        lexer::ws(entry::value),
    )
    .parse_next(input)
}

/// Consume a `@comment` payload
fn comment_body(input: &mut &str) -> PResult<()> {
    lexer::skip_ws(input);

    if input.starts_with('{') {
        *input = &input[1..];
        lexer::balanced_braces(input)?;
        '}'.parse_next(input)?;
    } else if input.starts_with('(') {
        *input = &input[1..];
        take_until(0.., ")").parse_next(input)?;
        ')'.parse_next(input)?;
    } else {
        // bare @comment runs to end of line
        let eol = input.find('\n').map_or(input.len(), |i| i + 1);
        *input = &input[eol..];
    }

    Ok(())
}

/// Line and column (1-indexed) of a byte offset
fn position(input: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for ch in input[..offset].chars() {
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

/// Leading slice of the unparsed input for error messages
fn snippet(input: &str, max_chars: usize) -> String {
    let cut: String = input.chars().take(max_chars).collect();
    if cut.len() < input.len() {
        format!("{cut}...")
    } else {
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[test]
    fn test_items_in_order() {
        let input = r#"
            Free text is ignored.
            @string{acm = "ACM Computing Surveys"}
            @preamble{"\noop"}
            @comment{nothing to see}
            @article{a1, title = {First}}
            @book{b1, title = {Second}}
        "#;

        let items = items(input).unwrap();
        assert_eq!(items.len(), 4);
        assert!(matches!(items[0], Item::Abbrev("acm", _)));
        assert!(matches!(items[1], Item::Preamble(_)));
        match (&items[2], &items[3]) {
            (Item::Entry(a), Item::Entry(b)) => {
                assert_eq!(a.key(), "a1");
                assert_eq!(b.key(), "b1");
            }
            other => panic!("expected two entries, got {other:?}"),
        }
    }

    #[test]
    fn test_keyword_case_insensitivity() {
        let input = "@STRING{x = {y}} @Article{k, title = {t}}";
        let items = items(input).unwrap();
        assert!(matches!(items[0], Item::Abbrev("x", _)));
        match &items[1] {
            Item::Entry(e) => assert_eq!(e.entry_type(), "Article"),
            other => panic!("expected entry, got {other:?}"),
        }
    }

    #[test]
    fn test_error_position() {
        let input = "\n\n@article{broken,\n  title = {never closed\n";
        let err = items(input).unwrap_err();
        match err {
            Error::Format { line, column, snippet, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, 1);
                assert!(snippet.is_some());
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_stray_at_is_rejected() {
        let input = "@ not a real entry";
        assert!(items(input).is_err());
    }

    #[test]
    fn test_value_abbrev_preserved() {
        let input = "@article{k, journal = acm}";
        let items = items(input).unwrap();
        match &items[0] {
            Item::Entry(e) => {
                assert_eq!(e.fields[0].value, Value::Abbrev(Cow::Borrowed("acm")));
            }
            other => panic!("expected entry, got {other:?}"),
        }
    }
}
