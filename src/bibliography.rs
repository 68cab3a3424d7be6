//! Ordered bibliography representation

use crate::bib;
use crate::citations::CitationSet;
use crate::error::Result;
use crate::model::{Entry, Value};
use ahash::AHashSet;
use std::borrow::Cow;

/// A parsed BibTeX bibliography
///
/// Entries, abbreviation definitions, and preambles keep the order they
/// had in the source file.
#[derive(Debug, Clone, Default)]
pub struct Bibliography<'a> {
    entries: Vec<Entry<'a>>,
    abbrevs: Vec<(Cow<'a, str>, Value<'a>)>,
    preambles: Vec<Value<'a>>,
}

impl<'a> Bibliography<'a> {
    /// Create an empty bibliography
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a bibliography from BibTeX source text
    pub fn parse(input: &'a str) -> Result<Self> {
        let mut bibliography = Self::new();

        for item in bib::items(input)? {
            match item {
                bib::Item::Entry(entry) => bibliography.entries.push(entry),
                bib::Item::Abbrev(name, value) => {
                    bibliography.abbrevs.push((Cow::Borrowed(name), value));
                }
                bib::Item::Preamble(value) => bibliography.preambles.push(value),
            }
        }

        Ok(bibliography)
    }

    /// All entries, in source order
    #[must_use]
    pub fn entries(&self) -> &[Entry<'a>] {
        &self.entries
    }

    /// All `@string` definitions, in source order
    #[must_use]
    pub fn abbrevs(&self) -> &[(Cow<'a, str>, Value<'a>)] {
        &self.abbrevs
    }

    /// All `@preamble` values, in source order
    #[must_use]
    pub fn preambles(&self) -> &[Value<'a>] {
        &self.preambles
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the bibliography holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Citation keys of all entries, in source order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Entry::key)
    }

    /// Look up an entry by its citation key (exact match)
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Entry<'a>> {
        self.entries.iter().find(|e| e.key() == key)
    }

    /// Restrict the bibliography to the entries whose key is cited.
    ///
    /// Entry order is preserved. `@string` definitions survive only when
    /// a retained value (directly or through other definitions) refers
    /// to them; preambles are always carried through.
    #[must_use]
    pub fn retain_cited(self, cited: &CitationSet) -> Self {
        let entries: Vec<Entry<'a>> = self
            .entries
            .into_iter()
            .filter(|e| cited.contains(e.key()))
            .collect();

        let mut used = AHashSet::new();
        for entry in &entries {
            for field in entry.fields() {
                collect_abbrev_refs(&field.value, &mut used);
            }
        }
        // definitions may refer to other definitions
        loop {
            let before = used.len();
            for (name, value) in &self.abbrevs {
                if used.contains(name.as_ref()) {
                    collect_abbrev_refs(value, &mut used);
                }
            }
            if used.len() == before {
                break;
            }
        }

        let abbrevs = self
            .abbrevs
            .into_iter()
            .filter(|(name, _)| used.contains(name.as_ref()))
            .collect();

        Self {
            entries,
            abbrevs,
            preambles: self.preambles,
        }
    }

    /// Convert to a version owning all its data
    #[must_use]
    pub fn into_owned(self) -> Bibliography<'static> {
        Bibliography {
            entries: self.entries.into_iter().map(Entry::into_owned).collect(),
            abbrevs: self
                .abbrevs
                .into_iter()
                .map(|(name, value)| (Cow::Owned(name.into_owned()), value.into_owned()))
                .collect(),
            preambles: self.preambles.into_iter().map(Value::into_owned).collect(),
        }
    }
}

fn collect_abbrev_refs(value: &Value<'_>, used: &mut AHashSet<String>) {
    match value {
        Value::Abbrev(name) => {
            used.insert(name.as_ref().to_string());
        }
        Value::Concat(parts) => {
            for part in parts {
                collect_abbrev_refs(part, used);
            }
        }
        Value::Literal(_) | Value::Number(_) => {}
    }
}
