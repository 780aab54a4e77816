//! # mzTab validation
//!
//! Semantic checks that run on top of value decoding. The parser drives them
//! at three points:
//!
//! | Stage | Module | Checks |
//! |-------|--------|--------|
//! | Metadata closed | [`metadata`] | references, mandatory items, id numbering, version |
//! | Header line | [`header`] | element-bound columns, score declarations, unused elements |
//! | Data line | [`row`] | duplicates, spectra references, modification positions, CHEMMOD/SUBST, coverage, sequences |
//!
//! Every check is gated on its error type: when the level configured in the
//! [`ErrorCatalog`] is below the reporting level the check does not run.
//! Violations are collected as [`MzTabError`]s; none of them stops a parse.
//!
//! [`validate`] runs the same checks over a model built in memory, so files
//! assembled by adapters can be checked before they are written.

use std::collections::HashSet;

use crate::codec::Param;
use crate::controlled_vocabulary::CvLookup;
use crate::error::{ErrorCatalog, ErrorCode, ErrorLevel, ErrorList, ErrorOverflow, MzTabError};
use crate::parser::ParserConfig;
use crate::table::MzTabFile;

pub mod header;
pub mod metadata;
mod report;
pub mod row;

#[cfg(test)]
mod tests;

pub use report::{CheckStatus, ValidationCheck, ValidationReport};

/// Gate and factory for validation diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct Rules<'a> {
    catalog: &'a ErrorCatalog,
    level: ErrorLevel,
    vocabulary: Option<&'a dyn CvLookup>,
}

impl<'a> Rules<'a> {
    pub fn new(
        catalog: &'a ErrorCatalog,
        level: ErrorLevel,
        vocabulary: Option<&'a dyn CvLookup>,
    ) -> Self {
        Self {
            catalog,
            level,
            vocabulary,
        }
    }

    pub fn from_config(config: &'a ParserConfig) -> Self {
        Self::new(&config.catalog, config.level, config.lookup())
    }

    pub fn catalog(&self) -> &'a ErrorCatalog {
        self.catalog
    }

    /// Whether the check raising `code` should run.
    pub fn enabled(&self, code: ErrorCode) -> bool {
        self.catalog.level(code) >= self.level
    }

    /// The diagnostic, or `None` when its check is disabled.
    pub fn error<I, S>(&self, code: ErrorCode, line: usize, args: I) -> Option<MzTabError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled(code)
            .then(|| self.catalog.error(code, line, args))
    }

    /// Cross-check a parameter against the vocabulary. Only accessions of
    /// ontologies the vocabulary covers are checked.
    pub fn check_param(&self, param: &Param, line: usize, sink: &mut Vec<MzTabError>) {
        let (Some(vocabulary), Some(accession)) = (self.vocabulary, param.accession.as_deref())
        else {
            return;
        };
        if !vocabulary.covers(accession) {
            return;
        }
        match vocabulary.term_name(accession) {
            None => sink.extend(self.error(ErrorCode::CvUnknownTerm, line, [accession])),
            Some(name) if !name.eq_ignore_ascii_case(param.name.trim()) => sink.extend(self.error(
                ErrorCode::CvTermMismatch,
                line,
                [accession, param.name.as_str(), name],
            )),
            Some(_) => {}
        }
    }
}

/// Vocabulary diagnostics already raised for one file.
///
/// An unknown or misnamed term is usually repeated on every row that uses it;
/// it is reported at its first occurrence only.
#[derive(Debug, Default)]
pub struct ReportedTerms(HashSet<(ErrorCode, Vec<String>)>);

impl ReportedTerms {
    /// Whether `error` should be reported. Other codes always pass.
    pub fn first(&mut self, error: &MzTabError) -> bool {
        match error.code() {
            ErrorCode::CvUnknownTerm | ErrorCode::CvTermMismatch => {
                self.0.insert((error.code(), error.args.clone()))
            }
            _ => true,
        }
    }
}

/// Run every semantic check over an in-memory model.
///
/// Row duplicates and references are evaluated in record order, exactly as
/// they would be while parsing the written file.
pub fn validate(file: &MzTabFile, config: &ParserConfig) -> Result<ErrorList, ErrorOverflow> {
    let rules = Rules::from_config(config);
    let mut sink = Vec::new();

    metadata::check_metadata(&file.metadata, &rules, &mut sink);
    for table in file.tables() {
        header::check_header(&file.metadata, &table.schema, 0, &rules, &mut sink);
        let mut rows = row::RowValidator::new(table.section);
        for record in &table.records {
            rows.check(&file.metadata, &table.schema, record, &rules, &mut sink);
        }
        header::check_unused_elements(&file.metadata, &table.schema, 0, &rules, &mut sink);
    }

    let mut errors = ErrorList::new(config.max_error_count, config.level);
    let mut reported = ReportedTerms::default();
    for error in sink.into_iter().filter(|e| reported.first(e)) {
        errors.add(error)?;
    }
    Ok(errors)
}
