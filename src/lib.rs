//! # mztab - mzTab 1.0 reader, validator and writer
//!
//! `mztab` reads the tab-separated mzTab format used to report proteomics
//! and metabolomics identification and quantification results, checks it
//! against the format's structural and semantic rules, and writes it back.
//!
//! ## Key Features
//!
//! - **Recovering parser**: Problems are collected as numbered diagnostics
//!   (1xxx format, 2xxx logical, 3xxx controlled vocabulary) and parsing goes
//!   on; only uninterpretable metadata or headers stop it.
//!
//! - **Typed model**: Metadata values, parameters, modifications and spectra
//!   references are decoded into Rust types, not kept as strings.
//!
//! - **Configurable severity**: Every error type has a level that can be
//!   raised or lowered; checks below the reporting level do not run.
//!
//! - **Round trip**: [`MzTabFile`](table::MzTabFile) writes back to text that
//!   parses to an equal model.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mztab::prelude::*;
//!
//! let parser = MzTabParser::new(ParserConfig::default().with_level(ErrorLevel::Warn));
//! let result = parser.parse_file("results.mzTab");
//!
//! let report = ValidationReport::from_parse("results.mzTab", &result, ErrorLevel::Warn);
//! println!("{}", report);
//!
//! if let Ok((file, _errors)) = result.into_result() {
//!     file.write_file("copy.mzTab")?;
//! }
//! # Ok::<(), mztab::writer::WriterError>(())
//! ```
//!
//! ## Architecture
//!
//! | Module | Role |
//! |--------|------|
//! | [`error`] | error catalog, diagnostics and the capped error list |
//! | [`codec`] | mzTab value types and their text form |
//! | [`metadata`] | the `MTD` section: scalar keys and indexed elements |
//! | [`schema`] | section headers: stable, optional and abundance columns |
//! | [`table`] | the in-memory file: metadata, section tables, comments |
//! | [`parser`] | line-by-line reader driving decoding and validation |
//! | [`validator`] | semantic checks and the validation report |
//! | [`writer`] | serialization back to mzTab text |
//! | [`controlled_vocabulary`] | PSI-MS terms for CV cross-checks |

// Allow some patterns common in scientific code
#![allow(clippy::too_many_arguments)]

pub mod codec;
pub mod controlled_vocabulary;
pub mod error;
pub mod metadata;
pub mod parser;
pub mod schema;
pub mod table;
pub mod validator;
pub mod writer;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::codec::{Modification, Param, SpectraRef, Value, ValueType};
    pub use crate::controlled_vocabulary::{CvLookup, CvTerm, StaticVocabulary};
    pub use crate::error::{
        ErrorCatalog, ErrorCode, ErrorLevel, ErrorList, MzTabError, ParseAbort,
    };
    pub use crate::metadata::{ElementKind, ElementRef, Metadata, MzTabMode, MzTabType};
    pub use crate::parser::{MzTabParser, ParseResult, ParserConfig, TextEncoding};
    pub use crate::schema::{ColumnSchema, Section};
    pub use crate::table::{Comment, MzTabFile, Record, SectionTable};
    pub use crate::validator::{validate, ValidationReport};
    pub use crate::writer::{MzTabWriter, WriterError};
}
