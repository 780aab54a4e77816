//! # Diagnostics
//!
//! Every deviation from the mzTab format is reported as an [`MzTabError`]: a
//! catalog [`ErrorType`] (code, category, level, message template), the line
//! it was found on, and the template arguments. Diagnostics accumulate in an
//! [`ErrorList`] that enforces a minimum level and a hard cap.
//!
//! Most problems are recovered locally and parsing continues. Problems in the
//! metadata or header structure make the rest of the file uninterpretable and
//! end the parse with [`ParseAbort::Fatal`].

mod catalog;
mod list;

pub use catalog::{
    ErrorCatalog, ErrorCatalogBuilder, ErrorCategory, ErrorCode, ErrorLevel, ErrorType,
};
pub use list::{ErrorList, ErrorOverflow, MzTabError, DEFAULT_MAX_ERROR_COUNT};

/// Reasons a parse stopped before the end of the input.
#[derive(Debug, thiserror::Error)]
pub enum ParseAbort {
    /// Metadata or header structure could not be interpreted
    #[error("fatal: {0}")]
    Fatal(MzTabError),

    /// The diagnostic cap was exceeded
    #[error(transparent)]
    Overflow(#[from] ErrorOverflow),

    /// I/O error reading the input
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error splitting the input into tab-separated records
    #[error("TSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Input bytes are not valid in the configured encoding
    #[error("line {line} is not valid {encoding}")]
    Encoding { line: usize, encoding: &'static str },
}

/// Result of an operation that may recover from a problem or give up on it.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Succeeded without diagnostics
    Ok(T),
    /// Succeeded with a placeholder or adjusted value, and its diagnostics
    Recovered(T, Vec<MzTabError>),
    /// The structure is unreliable; parsing must stop
    Fatal(MzTabError),
}

impl<T> Outcome<T> {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Outcome::Fatal(_))
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Ok(v) => Outcome::Ok(f(v)),
            Outcome::Recovered(v, e) => Outcome::Recovered(f(v), e),
            Outcome::Fatal(e) => Outcome::Fatal(e),
        }
    }

    /// Split into the value and its diagnostics, or the fatal error.
    pub fn into_parts(self) -> Result<(T, Vec<MzTabError>), MzTabError> {
        match self {
            Outcome::Ok(v) => Ok((v, Vec::new())),
            Outcome::Recovered(v, e) => Ok((v, e)),
            Outcome::Fatal(e) => Err(e),
        }
    }
}
