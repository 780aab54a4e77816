//! # mzTab writer
//!
//! Serializes an [`MzTabFile`] back to mzTab text:
//!
//! 1. comment lines (`COM`), in the order they were read;
//! 2. the metadata, one `MTD` line per key (scalars, then indexed elements,
//!    then column units);
//! 3. every populated section, preceded by a blank line: the header line
//!    with the columns in logical order, then one line per record.
//!
//! Missing cells are written as `null`. Lines end with the platform line
//! terminator. Text written this way parses back to an equal model.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::codec::Value;
use crate::table::{MzTabFile, Record, SectionTable};

/// Line terminator used for every written line.
pub const LINE_ENDING: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Errors that can occur during writing
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A value would break the line structure of the output
    #[error("{context}: value contains a tab or line break: {value:?}")]
    UnrepresentableValue { context: String, value: String },
}

/// Result type for writer operations
pub type Result<T> = std::result::Result<T, WriterError>;

fn checked(context: impl FnOnce() -> String, text: String) -> Result<String> {
    if text.contains(['\t', '\n', '\r']) {
        return Err(WriterError::UnrepresentableValue {
            context: context(),
            value: text,
        });
    }
    Ok(text)
}

/// Streaming mzTab writer
pub struct MzTabWriter<W: Write> {
    inner: W,
    lines_written: usize,
}

impl MzTabWriter<BufWriter<File>> {
    /// Create a writer for a new file
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> MzTabWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            lines_written: 0,
        }
    }

    fn write_line<I, S>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                self.inner.write_all(b"\t")?;
            }
            self.inner.write_all(field.as_ref().as_bytes())?;
        }
        self.inner.write_all(LINE_ENDING.as_bytes())?;
        self.lines_written += 1;
        Ok(())
    }

    /// Write a complete file.
    pub fn write_file(&mut self, file: &MzTabFile) -> Result<()> {
        // Comment text may hold tabs; it is read back as the rest of the line.
        for comment in &file.comments {
            if comment.text.contains(['\n', '\r']) {
                return Err(WriterError::UnrepresentableValue {
                    context: "comment".to_string(),
                    value: comment.text.clone(),
                });
            }
            self.write_line(["COM", comment.text.as_str()])?;
        }

        for (key, value) in file.metadata.entries() {
            let value = checked(|| key.clone(), value)?;
            self.write_line(["MTD", key.as_str(), value.as_str()])?;
        }

        for table in file.tables() {
            self.write_section(table)?;
        }
        self.inner.flush()?;
        Ok(())
    }

    /// Write one section: a blank separator line, the header and its records.
    pub fn write_section(&mut self, table: &SectionTable) -> Result<()> {
        self.inner.write_all(LINE_ENDING.as_bytes())?;
        self.lines_written += 1;

        let section = table.section;
        let header = std::iter::once(section.header_prefix())
            .chain(table.schema.columns().map(|c| c.header.as_str()));
        self.write_line(header)?;

        for record in &table.records {
            let cells = self.cells(table, record)?;
            self.write_line(std::iter::once(section.row_prefix().to_string()).chain(cells))?;
        }
        Ok(())
    }

    fn cells(&self, table: &SectionTable, record: &Record) -> Result<Vec<String>> {
        table
            .schema
            .columns()
            .map(|column| {
                let text = record
                    .get(column.position)
                    .unwrap_or(&Value::Null)
                    .to_string();
                checked(
                    || format!("{} column {}", table.section, column.header),
                    text,
                )
            })
            .collect()
    }

    /// Number of lines written so far
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Flush and return the underlying writer
    pub fn into_inner(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl MzTabFile {
    /// Serialize to `w`.
    pub fn write_to<W: Write>(&self, w: W) -> Result<()> {
        MzTabWriter::new(w).write_file(self)
    }

    /// Serialize to a string.
    pub fn to_mztab_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        // Every piece written is a Rust string.
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Serialize to a file on disk.
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        MzTabWriter::create(path)?.write_file(self)
    }
}
