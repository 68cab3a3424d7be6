//! # prunebib
//!
//! Prune a BibTeX bibliography down to the entries cited in LaTeX
//! documents.
//!
//! The library splits the job into three independent pieces: a
//! [`CitationSet`] extracted from LaTeX source, a [`Bibliography`]
//! parsed from BibTeX source, and a writer that serializes the filtered
//! result. The `prunebib` binary wires them together.
//!
//! ## Example
//!
//! ```
//! use prunebib::{Bibliography, CitationSet};
//!
//! let bibliography = Bibliography::parse(
//!     r#"
//!     @article{doe2020, title = {On Pruning}, year = 2020}
//!     @book{roe1999, title = {Unused}}
//!     "#,
//! )?;
//!
//! let mut cited = CitationSet::new();
//! cited.scan(r"As shown by Doe~\cite{doe2020}, pruning works.");
//!
//! let pruned = bibliography.retain_cited(&cited);
//! assert_eq!(pruned.keys().collect::<Vec<_>>(), ["doe2020"]);
//! # Ok::<(), prunebib::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    missing_debug_implementations
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod citations;
pub mod error;
pub mod model;

mod bib;
mod bibliography;
mod writer;

pub use bibliography::Bibliography;
pub use citations::CitationSet;
pub use error::{Error, Result};
pub use model::{Entry, Field, Value};
pub use writer::{to_file, to_string, to_writer, Writer, WriterConfig};

/// Parse a BibTeX bibliography from a string
pub fn parse(input: &str) -> Result<Bibliography<'_>> {
    Bibliography::parse(input)
}

/// Parse a BibTeX bibliography from a file
pub fn parse_file(path: impl AsRef<std::path::Path>) -> Result<Bibliography<'static>> {
    let content = std::fs::read_to_string(path)?;
    parse(&content).map(Bibliography::into_owned)
}
