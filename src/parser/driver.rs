use std::collections::BTreeMap;

use log::{debug, info, warn};

use super::header::resolve_header;
use super::row::decode_row;
use super::{ParseResult, ParserConfig};
use crate::error::{ErrorCode, ErrorList, ErrorOverflow, MzTabError, Outcome, ParseAbort};
use crate::schema::Section;
use crate::table::{Comment, MzTabFile, SectionTable};
use crate::validator::{self, row::RowValidator, ReportedTerms, Rules};

/// What a line prefix announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Comment,
    Metadata,
    Header(Section),
    Data(Section),
}

impl LineKind {
    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "COM" => return Some(LineKind::Comment),
            "MTD" => return Some(LineKind::Metadata),
            _ => {}
        }
        Section::ALL.into_iter().find_map(|section| {
            if prefix == section.header_prefix() {
                Some(LineKind::Header(section))
            } else if prefix == section.row_prefix() {
                Some(LineKind::Data(section))
            } else {
                None
            }
        })
    }
}

/// The section whose data lines are currently expected.
#[derive(Debug)]
struct ActiveSection {
    section: Section,
    positions: Vec<u32>,
    rows: RowValidator,
}

/// Line-by-line mzTab state machine.
///
/// Metadata lines build the metadata until the first table line closes it.
/// Each header line builds a section schema; data lines are decoded against
/// the current one. Comment lines are kept wherever they appear.
///
/// Feeding stops being useful once a call returns an error: the driver is
/// halted and further lines are ignored. Whatever was accumulated stays
/// available through [`SectionDriver::abort`].
#[derive(Debug)]
pub struct SectionDriver {
    config: ParserConfig,
    file: MzTabFile,
    errors: ErrorList,
    saw_metadata: bool,
    metadata_closed: bool,
    active: Option<ActiveSection>,
    header_lines: BTreeMap<Section, usize>,
    reported_terms: ReportedTerms,
    halted: bool,
}

impl SectionDriver {
    pub fn new(config: ParserConfig) -> Self {
        let errors = ErrorList::new(config.max_error_count, config.level);
        Self {
            config,
            file: MzTabFile::default(),
            errors,
            saw_metadata: false,
            metadata_closed: false,
            active: None,
            header_lines: BTreeMap::new(),
            reported_terms: ReportedTerms::default(),
            halted: false,
        }
    }

    /// Diagnostics collected so far
    pub fn errors(&self) -> &ErrorList {
        &self.errors
    }

    /// Model built so far
    pub fn file(&self) -> &MzTabFile {
        &self.file
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Feed one raw line. Line terminators are ignored.
    pub fn feed_line(&mut self, line: usize, text: &str) -> Result<(), ParseAbort> {
        let text = text.trim_end_matches(['\r', '\n']);
        let fields: Vec<&str> = text.split('\t').collect();
        self.feed_fields(line, &fields)
    }

    /// Feed one line already split on tabs, prefix included.
    pub fn feed_fields(&mut self, line: usize, fields: &[&str]) -> Result<(), ParseAbort> {
        if self.halted {
            debug!("line {} ignored, parsing has stopped", line);
            return Ok(());
        }
        let Some((prefix, rest)) = fields.split_first() else {
            return Ok(());
        };
        if fields.iter().all(|f| f.trim().is_empty()) {
            return Ok(());
        }

        let prefix = prefix.trim();
        match LineKind::from_prefix(prefix) {
            Some(LineKind::Comment) => {
                self.file.comments.push(Comment {
                    line,
                    text: rest.join("\t"),
                });
                Ok(())
            }
            Some(LineKind::Metadata) => self.metadata_line(line, rest),
            Some(LineKind::Header(section)) => self.header_line(section, line, rest),
            Some(LineKind::Data(section)) => self.data_line(section, line, rest),
            None => self.report_code(ErrorCode::LinePrefix, line, [prefix]),
        }
    }

    /// Close the input: run the checks deferred to the end and hand over the
    /// model with its diagnostics.
    pub fn finish(mut self) -> ParseResult {
        if self.halted {
            return self.into_result(None);
        }
        match self.finalize() {
            Ok(()) => {
                info!(
                    "parsed {} sections with {} diagnostics",
                    self.file.tables().count(),
                    self.errors.len()
                );
                self.into_result(None)
            }
            Err(abort) => self.into_result(Some(abort)),
        }
    }

    /// Stop without the end-of-input checks, keeping what was accumulated.
    pub fn abort(self, reason: ParseAbort) -> ParseResult {
        self.into_result(Some(reason))
    }

    fn into_result(self, abort: Option<ParseAbort>) -> ParseResult {
        ParseResult {
            file: self.file,
            errors: self.errors,
            abort,
        }
    }

    fn finalize(&mut self) -> Result<(), ParseAbort> {
        self.close_metadata()?;

        let mut diagnostics = Vec::new();
        let rules = Rules::from_config(&self.config);
        for table in self.file.tables() {
            let line = self.header_lines.get(&table.section).copied().unwrap_or(0);
            validator::header::check_unused_elements(
                &self.file.metadata,
                &table.schema,
                line,
                &rules,
                &mut diagnostics,
            );
        }
        self.report_all(diagnostics)
    }

    fn overflow(&mut self, overflow: ErrorOverflow) -> ParseAbort {
        self.halted = true;
        warn!("{}", overflow);
        ParseAbort::Overflow(overflow)
    }

    fn report(&mut self, error: MzTabError) -> Result<(), ParseAbort> {
        if !self.reported_terms.first(&error) {
            return Ok(());
        }
        self.errors.add(error).map_err(|o| self.overflow(o))
    }

    fn report_all(&mut self, errors: Vec<MzTabError>) -> Result<(), ParseAbort> {
        errors.into_iter().try_for_each(|e| self.report(e))
    }

    fn report_code<I, S>(&mut self, code: ErrorCode, line: usize, args: I) -> Result<(), ParseAbort>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let error = self.config.catalog.error(code, line, args);
        self.report(error)
    }

    fn fatal(&mut self, error: MzTabError) -> Result<(), ParseAbort> {
        self.report(error.clone())?;
        self.halted = true;
        warn!("parsing stopped: {}", error);
        Err(ParseAbort::Fatal(error))
    }

    fn close_metadata(&mut self) -> Result<(), ParseAbort> {
        if self.metadata_closed {
            return Ok(());
        }
        self.metadata_closed = true;
        debug!(
            "metadata closed with {} elements",
            self.file.metadata.elements().count()
        );

        let mut diagnostics = Vec::new();
        let rules = Rules::from_config(&self.config);
        validator::metadata::check_metadata(&self.file.metadata, &rules, &mut diagnostics);
        self.report_all(diagnostics)
    }

    /// A table line before any metadata line is out of order; reported once.
    fn require_metadata(&mut self, prefix: &str, line: usize) -> Result<(), ParseAbort> {
        if !self.saw_metadata && !self.metadata_closed {
            self.report_code(
                ErrorCode::LineOrder,
                line,
                [prefix, "the metadata section must come first"],
            )?;
        }
        self.close_metadata()
    }

    fn metadata_line(&mut self, line: usize, rest: &[&str]) -> Result<(), ParseAbort> {
        if self.metadata_closed {
            return self.report_code(
                ErrorCode::LineOrder,
                line,
                ["MTD", "metadata lines must precede all table sections"],
            );
        }
        self.saw_metadata = true;

        let [key, value] = rest else {
            let error = self.config.catalog.error(
                ErrorCode::MetadataLine,
                line,
                [(rest.len() + 1).to_string()],
            );
            return self.fatal(error);
        };

        let outcome = self
            .file
            .metadata
            .apply(key.trim(), value, line, &self.config.catalog);
        match outcome {
            Outcome::Ok(()) => Ok(()),
            Outcome::Recovered((), errors) => self.report_all(errors),
            Outcome::Fatal(error) => self.fatal(error),
        }
    }

    fn header_line(&mut self, section: Section, line: usize, tokens: &[&str]) -> Result<(), ParseAbort> {
        let prefix = section.header_prefix();
        self.require_metadata(prefix, line)?;

        if self.header_lines.contains_key(&section) {
            return self.report_code(
                ErrorCode::LineOrder,
                line,
                [prefix.to_string(), format!("the {} header was already declared", section)],
            );
        }
        let later = self
            .header_lines
            .keys()
            .next_back()
            .copied()
            .filter(|s| *s > section);
        if let Some(later) = later {
            self.report_code(
                ErrorCode::LineOrder,
                line,
                [
                    prefix.to_string(),
                    format!("the {} section must precede the {} section", section, later),
                ],
            )?;
        }
        self.header_lines.insert(section, line);
        self.active = None;

        let mut diagnostics = Vec::new();
        let resolved = resolve_header(
            section,
            tokens,
            line,
            &self.file.metadata,
            &self.config.catalog,
            &mut diagnostics,
        );
        let header = match resolved {
            Ok(header) => header,
            Err(error) => {
                self.report_all(diagnostics)?;
                return self.fatal(error);
            }
        };

        let rules = Rules::from_config(&self.config);
        validator::header::check_header(
            &self.file.metadata,
            &header.schema,
            line,
            &rules,
            &mut diagnostics,
        );
        self.report_all(diagnostics)?;

        info!(
            "{} header: {} columns ({} optional)",
            section,
            header.schema.len(),
            header.schema.optional_count()
        );
        *self.file.table_mut(section) = Some(SectionTable::new(header.schema));
        self.active = Some(ActiveSection {
            section,
            positions: header.positions,
            rows: RowValidator::new(section),
        });
        Ok(())
    }

    fn data_line(&mut self, section: Section, line: usize, fields: &[&str]) -> Result<(), ParseAbort> {
        let prefix = section.row_prefix();
        self.require_metadata(prefix, line)?;

        if self.active.as_ref().map(|a| a.section) != Some(section) {
            return self.report_code(
                ErrorCode::LineOrder,
                line,
                [prefix.to_string(), format!("no {} header precedes it", section)],
            );
        }

        let width = self
            .file
            .table(section)
            .map(|t| t.schema.len())
            .unwrap_or_default();
        if fields.len() != width {
            return self.report_code(
                ErrorCode::CountMatch,
                line,
                [prefix.to_string(), fields.len().to_string(), width.to_string()],
            );
        }

        let mut diagnostics = Vec::new();
        let record = {
            let (Some(active), Some(table)) = (self.active.as_mut(), self.file.table(section))
            else {
                return Ok(());
            };
            let rules = Rules::from_config(&self.config);
            let record = decode_row(
                &table.schema,
                &active.positions,
                fields,
                line,
                rules.catalog(),
                &mut diagnostics,
            );
            active
                .rows
                .check(&self.file.metadata, &table.schema, &record, &rules, &mut diagnostics);
            record
        };
        self.report_all(diagnostics)?;

        if let Some(table) = self.file.table_mut(section) {
            table.records.push(record);
        }
        Ok(())
    }
}
