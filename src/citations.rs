//! Citation extraction from LaTeX sources
//!
//! The extractor recognizes every command whose name contains `cite`
//! (`\cite`, `\citep`, `\nocite`, `\parencite`, `\autocite*`, ...),
//! skips up to two optional `[...]` arguments, and collects the
//! comma-separated keys of the mandatory group. `%` comments are
//! ignored, and `\nocite{*}` marks the whole bibliography as cited.

use crate::error::{Error, Result};
use ahash::AHashSet;
use std::borrow::Cow;
use std::fs;
use std::path::Path;

/// The set of citation keys referenced by one or more LaTeX documents
#[derive(Debug, Clone, Default)]
pub struct CitationSet {
    keys: AHashSet<String>,
    everything: bool,
}

impl CitationSet {
    /// Create an empty citation set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the keys cited by each of the given LaTeX files
    pub fn from_files<P>(paths: impl IntoIterator<Item = P>) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let mut set = Self::new();
        for path in paths {
            let path = path.as_ref();
            let source = fs::read_to_string(path).map_err(|source| Error::Parse {
                path: path.to_path_buf(),
                source,
            })?;
            set.scan(&source);
        }
        Ok(set)
    }

    /// Scan LaTeX source text and add every cited key to the set
    pub fn scan(&mut self, source: &str) {
        let bytes = source.as_bytes();
        let mut pos = 0;

        while pos < bytes.len() {
            let Some(off) = memchr::memchr2(b'\\', b'%', &bytes[pos..]) else {
                break;
            };
            let at = pos + off;

            if bytes[at] == b'%' {
                // comment runs to end of line
                pos = memchr::memchr(b'\n', &bytes[at..]).map_or(bytes.len(), |nl| at + nl + 1);
                continue;
            }

            // control sequence: letters only
            let mut end = at + 1;
            while end < bytes.len() && bytes[end].is_ascii_alphabetic() {
                end += 1;
            }
            if end == at + 1 {
                // escaped single character (\%, \{, \\, ...)
                pos = end + 1;
                continue;
            }

            let name = &source[at + 1..end];
            let mut cur = end;
            if cur < bytes.len() && bytes[cur] == b'*' {
                cur += 1;
            }
            if !is_cite_command(name) {
                pos = cur;
                continue;
            }

            cur = skip_blank(bytes, cur);
            // natbib allows two optional note arguments
            for _ in 0..2 {
                if cur < bytes.len() && bytes[cur] == b'[' {
                    match memchr::memchr(b']', &bytes[cur..]) {
                        Some(close) => cur = skip_blank(bytes, cur + close + 1),
                        None => break,
                    }
                } else {
                    break;
                }
            }

            if cur >= bytes.len() || bytes[cur] != b'{' {
                pos = cur;
                continue;
            }
            let Some(close) = matching_brace(bytes, cur) else {
                pos = cur + 1;
                continue;
            };

            self.collect_keys(&source[cur + 1..close]);
            pos = close + 1;
        }
    }

    /// Add a single key; returns false when it was already present
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.keys.insert(key.into())
    }

    /// Whether the key counts as cited (exact match, or `\nocite{*}`)
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.everything || self.keys.contains(key)
    }

    /// Whether `\nocite{*}` marked the whole bibliography as cited
    #[must_use]
    pub const fn cites_everything(&self) -> bool {
        self.everything
    }

    /// Number of distinct keys collected (the wildcard is not counted)
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when no key was collected and no wildcard was seen
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && !self.everything
    }

    /// Iterate over the collected keys (unordered)
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    fn collect_keys(&mut self, group: &str) {
        let group = strip_group_comments(group);
        for piece in group.split(',') {
            let key = piece.trim();
            if key == "*" {
                self.everything = true;
            } else if !key.is_empty() {
                self.keys.insert(key.to_string());
            }
        }
    }
}

/// Command names that reference bibliography keys all contain `cite`
fn is_cite_command(name: &str) -> bool {
    name.as_bytes()
        .windows(4)
        .any(|w| w.eq_ignore_ascii_case(b"cite"))
}

fn skip_blank(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Index of the `}` matching the `{` at `open`
fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut pos = open;
    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(pos);
                }
            }
            _ => {}
        }
        pos += 1;
    }
    None
}

/// Drop `%` comments from a key group; a comma-separated list may wrap
/// across commented line breaks
fn strip_group_comments(group: &str) -> Cow<'_, str> {
    if !group.contains('%') {
        return Cow::Borrowed(group);
    }

    let mut cleaned = String::with_capacity(group.len());
    for line in group.lines() {
        let bytes = line.as_bytes();
        let mut cut = line.len();
        let mut from = 0;
        while let Some(off) = memchr::memchr(b'%', &bytes[from..]) {
            let at = from + off;
            if at > 0 && bytes[at - 1] == b'\\' {
                from = at + 1;
                continue;
            }
            cut = at;
            break;
        }
        cleaned.push_str(&line[..cut]);
        cleaned.push('\n');
    }
    Cow::Owned(cleaned)
}
