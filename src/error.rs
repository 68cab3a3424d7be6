//! Error types for the prunebib crate

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for prunebib operations
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for prunebib
#[derive(Error, Debug)]
pub enum Error {
    /// A LaTeX source file could not be read
    #[error("cannot read LaTeX source '{}': {source}", path.display())]
    Parse {
        /// Path of the offending document
        path: PathBuf,
        /// Underlying I/O failure
        source: io::Error,
    },

    /// Malformed BibTeX input with location information
    #[error("malformed BibTeX at line {line}, column {column}: {message}")]
    Format {
        /// Line number (1-indexed)
        line: usize,
        /// Column number (1-indexed)
        column: usize,
        /// Error message
        message: String,
        /// Optional source snippet
        snippet: Option<String>,
    },

    /// IO error reading the bibliography or writing the destination
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// True for errors caused by the LaTeX side of the input
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// True for errors caused by malformed BibTeX
    #[must_use]
    pub const fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}
