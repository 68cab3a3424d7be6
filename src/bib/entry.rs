//! Entry and field-value parsing

use super::{lexer, PResult};
use crate::model::{Entry, Field, Value};
use std::borrow::Cow;
use winnow::combinator::{alt, separated};
use winnow::prelude::*;

/// Parse the body of `@type{key, field = value, ...}` after the entry
/// type has been consumed. `(` and `)` delimiters are also accepted.
pub(crate) fn entry_body<'a>(input: &mut &'a str, ty: &'a str) -> PResult<Entry<'a>> {
    lexer::skip_ws(input);

    let close = if input.starts_with('{') {
        '}'
    } else if input.starts_with('(') {
        ')'
    } else {
        return lexer::backtrack();
    };
    *input = &input[1..];

    let key = lexer::ws(lexer::identifier).parse_next(input)?;

    let mut entry = Entry::new(ty, key);
    if input.starts_with(',') {
        *input = &input[1..];
        entry.fields = fields(input, close)?;
    }

    lexer::skip_ws(input);
    if !input.starts_with(close) {
        return lexer::backtrack();
    }
    *input = &input[1..];

    Ok(entry)
}

/// Parse the field list up to (not including) the closing delimiter
fn fields<'a>(input: &mut &'a str, close: char) -> PResult<Vec<Field<'a>>> {
    let mut out = Vec::new();

    loop {
        lexer::skip_ws(input);
        if input.starts_with(close) || input.is_empty() {
            break;
        }

        out.push(field(input)?);

        lexer::skip_ws(input);
        if input.starts_with(',') {
            *input = &input[1..];
        } else if !input.starts_with(close) {
            return lexer::backtrack();
        }
    }

    out.shrink_to_fit();
    Ok(out)
}

/// Parse a single `name = value` pair
fn field<'a>(input: &mut &'a str) -> PResult<Field<'a>> {
    let name = lexer::ws(lexer::identifier).parse_next(input)?;
    '='.parse_next(input)?;
    let value = lexer::ws(value).parse_next(input)?;

    Ok(Field {
        name: Cow::Borrowed(name),
        value,
    })
}

/// Parse a field value: one component or a `#` concatenation
pub(crate) fn value<'a>(input: &mut &'a str) -> PResult<Value<'a>> {
    let mut parts: Vec<Value<'a>> =
        separated(1.., single_value, lexer::ws('#')).parse_next(input)?;

    if parts.len() == 1 {
        Ok(parts.pop().expect("separated(1..) yields a part"))
    } else {
        Ok(Value::Concat(parts))
    }
}

fn single_value<'a>(input: &mut &'a str) -> PResult<Value<'a>> {
    alt((braced_value, quoted_value, number_value, abbrev_value)).parse_next(input)
}

fn braced_value<'a>(input: &mut &'a str) -> PResult<Value<'a>> {
    if !input.starts_with('{') {
        return lexer::backtrack();
    }
    *input = &input[1..];

    let content = lexer::balanced_braces(input)?;

    if !input.starts_with('}') {
        return lexer::backtrack();
    }
    *input = &input[1..];

    Ok(Value::Literal(Cow::Borrowed(content)))
}

fn quoted_value<'a>(input: &mut &'a str) -> PResult<Value<'a>> {
    let content = lexer::quoted(input)?;
    Ok(Value::Literal(Cow::Borrowed(content)))
}

fn number_value<'a>(input: &mut &'a str) -> PResult<Value<'a>> {
    let n = lexer::number(input)?;
    Ok(Value::Number(n))
}

fn abbrev_value<'a>(input: &mut &'a str) -> PResult<Value<'a>> {
    // abbreviation names never start with a digit
    if input.chars().next().map_or(true, char::is_numeric) {
        return lexer::backtrack();
    }

    let name = lexer::identifier(input)?;
    Ok(Value::Abbrev(Cow::Borrowed(name)))
}
