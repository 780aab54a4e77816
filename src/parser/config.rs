use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::controlled_vocabulary::{CvLookup, StaticVocabulary};
use crate::error::{ErrorCatalog, ErrorLevel, DEFAULT_MAX_ERROR_COUNT};

/// Text encoding of the input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// UTF-8 (default)
    #[default]
    Utf8,
    /// ISO-8859-1, every byte is one character
    Latin1,
}

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Latin1 => "ISO-8859-1",
        }
    }

    /// Parse an encoding name as given on the command line or in a config file.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "utf8" | "utf-8" => Some(TextEncoding::Utf8),
            "latin1" | "latin-1" | "iso-8859-1" | "iso8859-1" => Some(TextEncoding::Latin1),
            _ => None,
        }
    }

    /// Decode one field. `None` when the bytes are not valid in this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for an mzTab parse
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Diagnostics kept before the parse aborts with an overflow
    pub max_error_count: usize,

    /// Minimum level reported. Checks whose level is below it are skipped.
    pub level: ErrorLevel,

    /// Input text encoding
    pub encoding: TextEncoding,

    /// Cross-check parameters against the controlled vocabulary
    pub cv_lookup: bool,

    /// Error types and their levels, shared between parses
    pub catalog: Arc<ErrorCatalog>,

    /// Vocabulary used when `cv_lookup` is set
    pub vocabulary: Arc<dyn CvLookup>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_error_count: DEFAULT_MAX_ERROR_COUNT,
            level: ErrorLevel::Info,
            encoding: TextEncoding::Utf8,
            cv_lookup: false,
            catalog: Arc::new(ErrorCatalog::standard()),
            vocabulary: Arc::new(StaticVocabulary::standard()),
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only report errors, the strictest useful setting
    pub fn errors_only() -> Self {
        Self::default().with_level(ErrorLevel::Error)
    }

    pub fn with_max_error_count(mut self, max: usize) -> Self {
        self.max_error_count = max;
        self
    }

    pub fn with_level(mut self, level: ErrorLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_cv_lookup(mut self, enabled: bool) -> Self {
        self.cv_lookup = enabled;
        self
    }

    pub fn with_catalog(mut self, catalog: Arc<ErrorCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Use another vocabulary for CV lookups; also enables them.
    pub fn with_vocabulary(mut self, vocabulary: Arc<dyn CvLookup>) -> Self {
        self.vocabulary = vocabulary;
        self.cv_lookup = true;
        self
    }

    /// The vocabulary to check parameters against, if lookups are enabled.
    pub fn lookup(&self) -> Option<&dyn CvLookup> {
        self.cv_lookup.then(|| self.vocabulary.as_ref())
    }
}
