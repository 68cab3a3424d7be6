//! Data model for BibTeX entries

use std::borrow::Cow;
use std::fmt;

/// A BibTeX entry (article, book, etc.)
///
/// Entries borrow from the parsed input where possible; use
/// [`Entry::into_owned`] to detach them from the source buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<'a> {
    /// Entry type as it appeared in the source (article, book, ...)
    pub ty: Cow<'a, str>,
    /// Citation key
    pub key: Cow<'a, str>,
    /// Fields in source order
    pub fields: Vec<Field<'a>>,
}

impl<'a> Entry<'a> {
    /// Create a new entry with no fields
    #[must_use]
    pub const fn new(ty: &'a str, key: &'a str) -> Self {
        Self {
            ty: Cow::Borrowed(ty),
            key: Cow::Borrowed(key),
            fields: Vec::new(),
        }
    }

    /// Get the entry type
    #[must_use]
    pub fn entry_type(&self) -> &str {
        &self.ty
    }

    /// Get the citation key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get all fields in source order
    #[must_use]
    pub fn fields(&self) -> &[Field<'a>] {
        &self.fields
    }

    /// Get a field value by name (field names are case-insensitive)
    ///
    /// Returns the rendered value: literals verbatim, integers and
    /// abbreviation references in their source form.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .map(|f| f.value.to_string())
    }

    /// Append a field
    pub fn push_field(&mut self, field: Field<'a>) {
        self.fields.push(field);
    }

    /// Convert to a version owning all its data
    #[must_use]
    pub fn into_owned(self) -> Entry<'static> {
        Entry {
            ty: Cow::Owned(self.ty.into_owned()),
            key: Cow::Owned(self.key.into_owned()),
            fields: self.fields.into_iter().map(Field::into_owned).collect(),
        }
    }
}

/// A named field within an entry
#[derive(Debug, Clone, PartialEq)]
pub struct Field<'a> {
    /// Field name
    pub name: Cow<'a, str>,
    /// Field value
    pub value: Value<'a>,
}

impl<'a> Field<'a> {
    /// Create a new field
    #[must_use]
    pub const fn new(name: &'a str, value: Value<'a>) -> Self {
        Self {
            name: Cow::Borrowed(name),
            value,
        }
    }

    /// Convert to a version owning all its data
    #[must_use]
    pub fn into_owned(self) -> Field<'static> {
        Field {
            name: Cow::Owned(self.name.into_owned()),
            value: self.value.into_owned(),
        }
    }
}

/// A field value
///
/// Abbreviation references are kept unresolved so that writing an entry
/// back out reproduces what the source said.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Brace- or quote-delimited literal text
    Literal(Cow<'a, str>),
    /// Bare integer
    Number(i64),
    /// Reference to a `@string` abbreviation
    Abbrev(Cow<'a, str>),
    /// `#`-concatenation of simpler values
    Concat(Vec<Value<'a>>),
}

impl Value<'_> {
    /// The literal text, if this is a simple literal
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Literal(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to a version owning all its data
    #[must_use]
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Self::Literal(s) => Value::Literal(Cow::Owned(s.into_owned())),
            Self::Number(n) => Value::Number(n),
            Self::Abbrev(s) => Value::Abbrev(Cow::Owned(s.into_owned())),
            Self::Concat(parts) => {
                Value::Concat(parts.into_iter().map(Value::into_owned).collect())
            }
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Abbrev(name) => write!(f, "{name}"),
            Self::Concat(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, " # ")?;
                    }
                    write!(f, "{part}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_is_case_insensitive() {
        let mut entry = Entry::new("article", "doe2020");
        entry.push_field(Field::new("Author", Value::Literal(Cow::Borrowed("J. Doe"))));
        entry.push_field(Field::new("year", Value::Number(2020)));

        assert_eq!(entry.get("author").as_deref(), Some("J. Doe"));
        assert_eq!(entry.get("YEAR").as_deref(), Some("2020"));
        assert_eq!(entry.get("title"), None);
    }

    #[test]
    fn test_value_display() {
        let value = Value::Concat(vec![
            Value::Abbrev(Cow::Borrowed("acm")),
            Value::Literal(Cow::Borrowed(", vol. 1")),
        ]);
        assert_eq!(value.to_string(), "acm # , vol. 1");
    }

    #[test]
    fn test_into_owned_preserves_content() {
        let mut entry = Entry::new("book", "knuth1984");
        entry.push_field(Field::new(
            "title",
            Value::Literal(Cow::Borrowed("The TeXbook")),
        ));

        let owned = entry.clone().into_owned();
        assert_eq!(owned.key(), "knuth1984");
        assert_eq!(owned.fields().len(), 1);
        assert_eq!(owned.get("title"), entry.get("title"));
    }
}
