//! BibTeX serialization

use crate::error::Result;
use crate::model::{Entry, Value};
use crate::Bibliography;
use std::io::{self, Write};

/// Configuration for writing BibTeX
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Indentation string (default: two spaces)
    pub indent: String,
    /// Whether to align field values (default: false)
    pub align_values: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            align_values: false,
        }
    }
}

/// BibTeX writer
#[derive(Debug)]
pub struct Writer<W: Write> {
    writer: W,
    config: WriterConfig,
}

impl<W: Write> Writer<W> {
    /// Create a new writer with default configuration
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            config: WriterConfig::default(),
        }
    }

    /// Create a new writer with custom configuration
    pub const fn with_config(writer: W, config: WriterConfig) -> Self {
        Self { writer, config }
    }

    /// Write a complete bibliography: preambles, then abbreviation
    /// definitions, then entries, everything in source order
    pub fn write_bibliography(&mut self, bibliography: &Bibliography) -> io::Result<()> {
        for preamble in bibliography.preambles() {
            self.write_preamble(preamble)?;
            writeln!(self.writer)?;
        }

        for (name, value) in bibliography.abbrevs() {
            self.write_abbrev(name, value)?;
            writeln!(self.writer)?;
        }

        for (i, entry) in bibliography.entries().iter().enumerate() {
            if i > 0 {
                writeln!(self.writer)?;
            }
            self.write_entry(entry)?;
        }

        Ok(())
    }

    /// Write a single entry
    pub fn write_entry(&mut self, entry: &Entry) -> io::Result<()> {
        writeln!(self.writer, "@{}{{{},", entry.entry_type(), entry.key())?;

        let fields = entry.fields();
        let width = if self.config.align_values {
            fields.iter().map(|f| f.name.len()).max().unwrap_or(0)
        } else {
            0
        };

        for (i, field) in fields.iter().enumerate() {
            write!(self.writer, "{}{}", self.config.indent, field.name)?;
            if self.config.align_values {
                let padding = width - field.name.len();
                write!(self.writer, "{}", " ".repeat(padding))?;
            }
            write!(self.writer, " = ")?;
            self.write_value(&field.value)?;

            if i + 1 < fields.len() {
                writeln!(self.writer, ",")?;
            } else {
                writeln!(self.writer)?;
            }
        }

        writeln!(self.writer, "}}")?;
        Ok(())
    }

    fn write_abbrev(&mut self, name: &str, value: &Value) -> io::Result<()> {
        write!(self.writer, "@string{{{name} = ")?;
        self.write_value(value)?;
        writeln!(self.writer, "}}")?;
        Ok(())
    }

    fn write_preamble(&mut self, value: &Value) -> io::Result<()> {
        write!(self.writer, "@preamble{{")?;
        self.write_value(value)?;
        writeln!(self.writer, "}}")?;
        Ok(())
    }

    fn write_value(&mut self, value: &Value) -> io::Result<()> {
        match value {
            Value::Literal(s) => {
                if braces_balanced(s) {
                    write!(self.writer, "{{{s}}}")?;
                } else {
                    write!(self.writer, "\"{s}\"")?;
                }
            }
            Value::Number(n) => write!(self.writer, "{n}")?,
            Value::Abbrev(name) => write!(self.writer, "{name}")?,
            Value::Concat(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(self.writer, " # ")?;
                    }
                    self.write_value(part)?;
                }
            }
        }
        Ok(())
    }
}

/// Literals with balanced braces print braced; quoting is the fallback
/// for content a brace group could not hold
fn braces_balanced(s: &str) -> bool {
    let mut depth = 0i64;
    let bytes = s.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 1,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
        pos += 1;
    }
    depth == 0
}

/// Serialize a bibliography to a string
pub fn to_string(bibliography: &Bibliography) -> Result<String> {
    let mut buf = Vec::new();
    let mut writer = Writer::new(&mut buf);
    writer.write_bibliography(bibliography)?;
    Ok(String::from_utf8(buf).expect("writer emits UTF-8"))
}

/// Serialize a bibliography to an arbitrary destination
pub fn to_writer(bibliography: &Bibliography, destination: impl Write) -> Result<()> {
    let mut writer = Writer::new(destination);
    writer.write_bibliography(bibliography)?;
    Ok(())
}

/// Serialize a bibliography to a file
pub fn to_file(bibliography: &Bibliography, path: impl AsRef<std::path::Path>) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = Writer::new(io::BufWriter::new(file));
    writer.write_bibliography(bibliography)?;
    Ok(())
}
