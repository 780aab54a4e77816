use std::fmt;
use std::io::{self, Write};

use serde::Serialize;

use super::catalog::{ErrorCategory, ErrorCode, ErrorLevel, ErrorType};

/// Default cap on the number of diagnostics kept for one parse.
pub const DEFAULT_MAX_ERROR_COUNT: usize = 300;

/// A single diagnostic raised while reading an mzTab file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MzTabError {
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    /// 1-based line number in the input, 0 when not tied to a line
    pub line: usize,
    pub args: Vec<String>,
}

impl MzTabError {
    pub fn new(error_type: ErrorType, line: usize, args: Vec<String>) -> Self {
        Self {
            error_type,
            line,
            args,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.error_type.code
    }

    pub fn level(&self) -> ErrorLevel {
        self.error_type.level
    }

    pub fn category(&self) -> ErrorCategory {
        self.error_type.category
    }

    /// Message with the template arguments filled in.
    pub fn message(&self) -> String {
        self.error_type.format(&self.args)
    }
}

/// `{level}-{code}: {message}`, followed by ` (line N)` when the diagnostic
/// is tied to an input line.
impl fmt::Display for MzTabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}: {}", self.level(), self.code(), self.message())?;
        if self.line > 0 {
            write!(f, " (line {})", self.line)?;
        }
        Ok(())
    }
}

/// Raised when a diagnostic would exceed the configured maximum.
///
/// Once raised the list is incomplete and the parsed model must not be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("more than {max} diagnostics were raised; validation stopped")]
pub struct ErrorOverflow {
    pub max: usize,
}

/// Ordered, capped list of diagnostics.
///
/// Diagnostics below `level` are dropped on insertion and do not count towards
/// the cap.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorList {
    errors: Vec<MzTabError>,
    max_error_count: usize,
    level: ErrorLevel,
}

impl ErrorList {
    pub fn new(max_error_count: usize, level: ErrorLevel) -> Self {
        Self {
            errors: Vec::new(),
            max_error_count,
            level,
        }
    }

    /// Append a diagnostic.
    ///
    /// Fails with [`ErrorOverflow`] on the first addition past the cap; the
    /// rejected diagnostic is not stored.
    pub fn add(&mut self, error: MzTabError) -> Result<(), ErrorOverflow> {
        if error.level() < self.level {
            return Ok(());
        }
        if self.errors.len() >= self.max_error_count {
            return Err(ErrorOverflow {
                max: self.max_error_count,
            });
        }
        self.errors.push(error);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn max_error_count(&self) -> usize {
        self.max_error_count
    }

    /// Minimum level accepted by [`ErrorList::add`].
    pub fn level(&self) -> ErrorLevel {
        self.level
    }

    pub fn iter(&self) -> impl Iterator<Item = &MzTabError> {
        self.errors.iter()
    }

    /// Diagnostics at or above `min_level`.
    pub fn filter(&self, min_level: ErrorLevel) -> Vec<&MzTabError> {
        self.errors.iter().filter(|e| e.level() >= min_level).collect()
    }

    /// Number of diagnostics with the given code.
    pub fn count(&self, code: ErrorCode) -> usize {
        self.errors.iter().filter(|e| e.code() == code).count()
    }

    /// True when nothing at `Error` level was raised.
    pub fn is_clean(&self) -> bool {
        !self.errors.iter().any(|e| e.level() == ErrorLevel::Error)
    }

    /// Write one `{level}-{code}: {message}` line per diagnostic at or above `min_level`.
    pub fn print<W: Write>(&self, out: &mut W, min_level: ErrorLevel) -> io::Result<()> {
        for error in self.filter(min_level) {
            writeln!(out, "{}", error)?;
        }
        Ok(())
    }
}

impl Default for ErrorList {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ERROR_COUNT, ErrorLevel::Info)
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a MzTabError;
    type IntoIter = std::slice::Iter<'a, MzTabError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
