//! TOML configuration file support.
//!
//! Parser settings can be kept in a file instead of repeating flags:
//!
//! ```toml
//! # mztab.toml
//! [validation]
//! level = "warn"
//! max_errors = 1000
//! encoding = "utf-8"
//! cv_lookup = true
//! ```
//!
//! Command-line flags override values from the file.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::Path;

use mztab::error::ErrorLevel;
use mztab::parser::{ParserConfig, TextEncoding};

use super::ParseArgs;

/// Root configuration structure for mztab.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Parser and validation settings.
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Settings applied to every parse.
#[derive(Debug, Default, Deserialize)]
pub struct ValidationConfig {
    /// Diagnostics kept before the parse stops.
    pub max_errors: Option<usize>,

    /// Minimum level reported: info, warn or error.
    pub level: Option<String>,

    /// Input encoding: utf-8 or iso-8859-1.
    pub encoding: Option<String>,

    /// Cross-check CV parameters.
    pub cv_lookup: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Apply the file settings on top of `config`.
    pub fn apply(&self, mut config: ParserConfig) -> Result<ParserConfig> {
        let validation = &self.validation;
        if let Some(max) = validation.max_errors {
            config = config.with_max_error_count(max);
        }
        if let Some(level) = &validation.level {
            let level = ErrorLevel::parse(level)
                .ok_or_else(|| anyhow!("Unknown level in config file: {}", level))?;
            config = config.with_level(level);
        }
        if let Some(encoding) = &validation.encoding {
            let encoding = TextEncoding::parse(encoding)
                .ok_or_else(|| anyhow!("Unknown encoding in config file: {}", encoding))?;
            config = config.with_encoding(encoding);
        }
        if let Some(enabled) = validation.cv_lookup {
            config = config.with_cv_lookup(enabled);
        }
        Ok(config)
    }
}

impl ParseArgs {
    /// Resolve the parser configuration: defaults, then the config file,
    /// then flags.
    pub fn parser_config(&self) -> Result<ParserConfig> {
        let mut config = ParserConfig::default();
        if let Some(path) = &self.config {
            config = Config::from_file(path)?.apply(config)?;
        }
        if let Some(level) = self.level {
            config = config.with_level(level.into());
        }
        if let Some(max) = self.max_errors {
            config = config.with_max_error_count(max);
        }
        if let Some(encoding) = self.encoding {
            config = config.with_encoding(encoding.into());
        }
        if self.cv_lookup {
            config = config.with_cv_lookup(true);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [validation]
            level = "Warning"
            max_errors = 50
            encoding = "ISO-8859-1"
            cv_lookup = true
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.validation.max_errors, Some(50));

        let parser = config.apply(ParserConfig::default()).unwrap();
        assert_eq!(parser.level, ErrorLevel::Warn);
        assert_eq!(parser.max_error_count, 50);
        assert_eq!(parser.encoding, TextEncoding::Latin1);
        assert!(parser.cv_lookup);
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [validation]
            level = "error"
        "#;

        let config = Config::from_str(toml).unwrap();
        let parser = config.apply(ParserConfig::default()).unwrap();
        assert_eq!(parser.level, ErrorLevel::Error);
        assert_eq!(parser.encoding, TextEncoding::Utf8);
        assert!(!parser.cv_lookup);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.validation.level, None);
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        let config = Config::from_str("[validation]\nlevel = \"fatal\"\n").unwrap();
        assert!(config.apply(ParserConfig::default()).is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mztab.toml");
        std::fs::write(&path, "[validation]\nlevel = \"error\"\nmax_errors = 5\n").unwrap();

        let args = ParseArgs {
            level: Some(super::super::LevelArg::Info),
            max_errors: None,
            encoding: None,
            cv_lookup: false,
            config: Some(path),
        };
        let parser = args.parser_config().unwrap();
        assert_eq!(parser.level, ErrorLevel::Info);
        assert_eq!(parser.max_error_count, 5);
    }
}
