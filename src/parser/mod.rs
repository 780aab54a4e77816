//! # mzTab parser
//!
//! Reads mzTab text into an [`MzTabFile`] while collecting diagnostics.
//!
//! ## Line prefixes
//!
//! | Prefix | Line |
//! |--------|------|
//! | `MTD` | metadata `key\tvalue` |
//! | `PRH` / `PRT` | protein header / row |
//! | `PEH` / `PEP` | peptide header / row |
//! | `PSH` / `PSM` | PSM header / row |
//! | `SMH` / `SML` | small molecule header / row |
//! | `COM` | comment, kept verbatim |
//!
//! ## Example
//!
//! ```rust,no_run
//! use mztab::parser::{MzTabParser, ParserConfig};
//! use mztab::error::ErrorLevel;
//!
//! let parser = MzTabParser::new(ParserConfig::default().with_level(ErrorLevel::Warn));
//! let result = parser.parse_file("results.mzTab");
//! for error in &result.errors {
//!     eprintln!("{}", error);
//! }
//! if result.is_valid() {
//!     println!("{} proteins", result.file.protein.map(|t| t.len()).unwrap_or(0));
//! }
//! ```
//!
//! Input is split with the `csv` crate (tab delimiter, no quoting, flexible
//! record lengths) and decoded in the configured [`TextEncoding`].

mod config;
mod driver;
mod header;
mod row;

#[cfg(test)]
mod tests;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

pub use config::{ParserConfig, TextEncoding};
pub use driver::SectionDriver;

use crate::error::{ErrorList, ParseAbort};
use crate::table::MzTabFile;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Outcome of a parse: the model, its diagnostics and why the parse stopped
/// early, if it did.
#[derive(Debug)]
pub struct ParseResult {
    pub file: MzTabFile,
    pub errors: ErrorList,
    pub abort: Option<ParseAbort>,
}

impl ParseResult {
    /// The parse ran to the end and raised nothing at `Error` level.
    pub fn is_valid(&self) -> bool {
        self.abort.is_none() && self.errors.is_clean()
    }

    /// Turn an aborted parse into an error, keeping the model otherwise.
    pub fn into_result(self) -> Result<(MzTabFile, ErrorList), ParseAbort> {
        match self.abort {
            Some(abort) => Err(abort),
            None => Ok((self.file, self.errors)),
        }
    }
}

/// mzTab reader
#[derive(Debug, Clone, Default)]
pub struct MzTabParser {
    config: ParserConfig,
}

impl MzTabParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a file from disk. Failing to open it is reported as an I/O abort.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> ParseResult {
        let path = path.as_ref();
        debug!("parsing {}", path.display());
        match File::open(path) {
            Ok(file) => self.parse_reader(BufReader::new(file)),
            Err(e) => SectionDriver::new(self.config.clone()).abort(ParseAbort::Io(e)),
        }
    }

    pub fn parse_str(&self, text: &str) -> ParseResult {
        self.parse_reader(text.as_bytes())
    }

    pub fn parse_reader<R: BufRead>(&self, reader: R) -> ParseResult {
        let encoding = self.config.encoding;
        let mut driver = SectionDriver::new(self.config.clone());
        let mut tsv = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let mut record = csv::ByteRecord::new();
        let mut first = true;
        loop {
            match tsv.read_byte_record(&mut record) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => return driver.abort(ParseAbort::Csv(e)),
            }
            let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

            let mut fields = Vec::with_capacity(record.len());
            for bytes in record.iter() {
                let bytes = match (first, encoding) {
                    (true, TextEncoding::Utf8) => bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes),
                    _ => bytes,
                };
                first = false;
                match encoding.decode(bytes) {
                    Some(field) => fields.push(field),
                    None => {
                        return driver.abort(ParseAbort::Encoding {
                            line,
                            encoding: encoding.name(),
                        })
                    }
                }
            }

            let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
            if let Err(abort) = driver.feed_fields(line, &fields) {
                return driver.abort(abort);
            }
        }
        driver.finish()
    }
}
