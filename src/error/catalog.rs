use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Broad family of an mzTab diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed literal or structural syntax
    Format,
    /// Syntactically valid but internally inconsistent
    Logical,
    /// Inconsistent with an external resource such as a controlled vocabulary
    CrossCheck,
}

/// Severity of a diagnostic. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ErrorLevel {
    /// Informational only
    Info,
    /// Suspicious content that does not invalidate the file
    Warn,
    /// The file violates the format and must not be trusted
    Error,
}

impl ErrorLevel {
    /// Parse a level name, case-insensitively (`info`, `warn`/`warning`, `error`).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "info" => Some(ErrorLevel::Info),
            "warn" | "warning" => Some(ErrorLevel::Warn),
            "error" => Some(ErrorLevel::Error),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorLevel::Info => write!(f, "Info"),
            ErrorLevel::Warn => write!(f, "Warn"),
            ErrorLevel::Error => write!(f, "Error"),
        }
    }
}

/// Every diagnostic the parser and validator can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Format
    LinePrefix,
    CountMatch,
    IndexedElement,
    AbundanceColumn,
    MzTabMode,
    MzTabType,
    Param,
    ParamList,
    Publication,
    Uri,
    Url,
    Email,
    Integer,
    Double,
    Reliability,
    StringList,
    ModificationList,
    GoTermList,
    MzBoolean,
    SpectraRef,
    ColUnit,
    MetadataLine,
    MetadataKey,
    HeaderColumn,
    StableColumnMissing,
    Sequence,
    SearchEngineScore,
    ElementRef,
    // Logical
    LineOrder,
    HeaderLine,
    DuplicationDefine,
    DuplicationId,
    DuplicationAccession,
    AbundanceColumnTogether,
    AbundanceColumnSameId,
    ProteinCoverage,
    IdNumber,
    ModificationPosition,
    ChemMods,
    SubstituteIdentifier,
    MsRunNotDefined,
    AssayNotDefined,
    StudyVariableNotDefined,
    NotDefineInMetadata,
    NotDefineInHeader,
    MzTabVersion,
    // CrossCheck
    CvTermMismatch,
    CvUnknownTerm,
}

impl ErrorCode {
    /// All codes, in catalog order.
    pub const ALL: [ErrorCode; 48] = [
        ErrorCode::LinePrefix,
        ErrorCode::CountMatch,
        ErrorCode::IndexedElement,
        ErrorCode::AbundanceColumn,
        ErrorCode::MzTabMode,
        ErrorCode::MzTabType,
        ErrorCode::Param,
        ErrorCode::ParamList,
        ErrorCode::Publication,
        ErrorCode::Uri,
        ErrorCode::Url,
        ErrorCode::Email,
        ErrorCode::Integer,
        ErrorCode::Double,
        ErrorCode::Reliability,
        ErrorCode::StringList,
        ErrorCode::ModificationList,
        ErrorCode::GoTermList,
        ErrorCode::MzBoolean,
        ErrorCode::SpectraRef,
        ErrorCode::ColUnit,
        ErrorCode::MetadataLine,
        ErrorCode::MetadataKey,
        ErrorCode::HeaderColumn,
        ErrorCode::StableColumnMissing,
        ErrorCode::Sequence,
        ErrorCode::SearchEngineScore,
        ErrorCode::ElementRef,
        ErrorCode::LineOrder,
        ErrorCode::HeaderLine,
        ErrorCode::DuplicationDefine,
        ErrorCode::DuplicationId,
        ErrorCode::DuplicationAccession,
        ErrorCode::AbundanceColumnTogether,
        ErrorCode::AbundanceColumnSameId,
        ErrorCode::ProteinCoverage,
        ErrorCode::IdNumber,
        ErrorCode::ModificationPosition,
        ErrorCode::ChemMods,
        ErrorCode::SubstituteIdentifier,
        ErrorCode::MsRunNotDefined,
        ErrorCode::AssayNotDefined,
        ErrorCode::StudyVariableNotDefined,
        ErrorCode::NotDefineInMetadata,
        ErrorCode::NotDefineInHeader,
        ErrorCode::MzTabVersion,
        ErrorCode::CvTermMismatch,
        ErrorCode::CvUnknownTerm,
    ];

    /// Stable numeric code used in printed diagnostics.
    pub fn number(&self) -> u16 {
        use ErrorCode::*;
        match self {
            LinePrefix => 1000,
            CountMatch => 1001,
            IndexedElement => 1002,
            AbundanceColumn => 1003,
            MzTabMode => 1004,
            MzTabType => 1005,
            Param => 1006,
            ParamList => 1007,
            Publication => 1008,
            Uri => 1009,
            Url => 1010,
            Email => 1011,
            Integer => 1013,
            Double => 1014,
            Reliability => 1015,
            StringList => 1016,
            ModificationList => 1017,
            GoTermList => 1018,
            MzBoolean => 1019,
            SpectraRef => 1020,
            ColUnit => 1021,
            MetadataLine => 1022,
            MetadataKey => 1023,
            HeaderColumn => 1024,
            StableColumnMissing => 1025,
            Sequence => 1026,
            SearchEngineScore => 1027,
            ElementRef => 1028,
            LineOrder => 2000,
            HeaderLine => 2001,
            DuplicationDefine => 2002,
            DuplicationId => 2003,
            DuplicationAccession => 2004,
            AbundanceColumnTogether => 2005,
            AbundanceColumnSameId => 2006,
            ProteinCoverage => 2007,
            IdNumber => 2008,
            ModificationPosition => 2009,
            ChemMods => 2010,
            SubstituteIdentifier => 2011,
            MsRunNotDefined => 2012,
            AssayNotDefined => 2013,
            StudyVariableNotDefined => 2014,
            NotDefineInMetadata => 2015,
            NotDefineInHeader => 2016,
            MzTabVersion => 2017,
            CvTermMismatch => 3000,
            CvUnknownTerm => 3001,
        }
    }

    fn defaults(&self) -> (ErrorCategory, ErrorLevel, &'static str) {
        use ErrorCategory::{CrossCheck, Format, Logical};
        use ErrorCode::*;
        use ErrorLevel::{Error, Info, Warn};
        match self {
            LinePrefix => (
                Format,
                Error,
                "Line prefix \"{0}\" is not one of MTD, PRH, PRT, PEH, PEP, PSH, PSM, SMH, SML or COM.",
            ),
            CountMatch => (
                Format,
                Error,
                "{0} line has {1} fields but its header declares {2} columns.",
            ),
            IndexedElement => (
                Format,
                Error,
                "\"{0}\" is not a valid indexed element; ids are positive integers written as name[id].",
            ),
            AbundanceColumn => (
                Format,
                Error,
                "Abundance column \"{0}\" is not allowed in the {1} section.",
            ),
            MzTabMode => (
                Format,
                Error,
                "mzTab-mode \"{0}\" is neither Summary nor Complete.",
            ),
            MzTabType => (
                Format,
                Error,
                "mzTab-type \"{0}\" is neither Identification nor Quantification.",
            ),
            Param => (
                Format,
                Error,
                "{0}: \"{1}\" is not a parameter of the form [cvLabel, accession, name, value].",
            ),
            ParamList => (
                Format,
                Error,
                "{0}: \"{1}\" is not a '|'-separated list of parameters.",
            ),
            Publication => (
                Format,
                Error,
                "{0}: \"{1}\" is not a '|'-separated list of pubmed:<id> or doi:<id> items.",
            ),
            Uri => (Format, Error, "{0}: \"{1}\" is not a valid URI."),
            Url => (Format, Error, "{0}: \"{1}\" is not a valid URL."),
            Email => (Format, Error, "{0}: \"{1}\" is not a valid e-mail address."),
            Integer => (Format, Error, "{0}: \"{1}\" is not a valid integer."),
            Double => (Format, Error, "{0}: \"{1}\" is not a valid double."),
            Reliability => (
                Format,
                Error,
                "{0}: \"{1}\" is not a reliability score (1, 2 or 3).",
            ),
            StringList => (Format, Error, "{0}: \"{1}\" is not a valid string list."),
            ModificationList => (
                Format,
                Error,
                "{0}: \"{1}\" is not a valid modification list.",
            ),
            GoTermList => (
                Format,
                Error,
                "{0}: \"{1}\" is not a '|'-separated list of GO accessions.",
            ),
            MzBoolean => (Format, Error, "{0}: \"{1}\" is not an mzTab boolean (0 or 1)."),
            SpectraRef => (
                Format,
                Error,
                "{0}: \"{1}\" is not a list of ms_run[n]:reference spectra references.",
            ),
            ColUnit => (
                Format,
                Error,
                "Column unit \"{1}\" declared by {0} must name a non-abundance column of that section as column=[param].",
            ),
            MetadataLine => (
                Format,
                Error,
                "Metadata lines need three tab-separated fields (MTD, key, value); found {0}.",
            ),
            MetadataKey => (Format, Error, "\"{0}\" is not a known metadata key."),
            HeaderColumn => (
                Format,
                Error,
                "Column \"{0}\" is not valid in the {1} header.",
            ),
            StableColumnMissing => (
                Format,
                Error,
                "The {0} header lacks the mandatory column \"{1}\".",
            ),
            Sequence => (
                Format,
                Warn,
                "{0}: \"{1}\" does not follow the expected format.",
            ),
            SearchEngineScore => (
                Format,
                Warn,
                "{0}: \"{1}\" does not follow the expected format.",
            ),
            ElementRef => (
                Format,
                Error,
                "{0}: \"{1}\" is not a reference of the form {2}[n].",
            ),
            LineOrder => (Logical, Error, "{0} line is out of order: {1}."),
            HeaderLine => (
                Logical,
                Error,
                "Column \"{0}\" appears more than once in the {1} header.",
            ),
            DuplicationDefine => (
                Logical,
                Warn,
                "Metadata key \"{0}\" is defined more than once; the later value is kept.",
            ),
            DuplicationId => (
                Logical,
                Error,
                "{0} \"{1}\" occurs more than once in the {2} section.",
            ),
            DuplicationAccession => (
                Logical,
                Error,
                "Accession \"{0}\" occurs more than once in the {1} section.",
            ),
            AbundanceColumnTogether => (
                Logical,
                Error,
                "Abundance columns of {0} must appear together; \"{1}\" is missing.",
            ),
            AbundanceColumnSameId => (
                Logical,
                Error,
                "Abundance columns of {0} are declared more than once in the {1} header.",
            ),
            ProteinCoverage => (
                Logical,
                Error,
                "protein_coverage {0} is outside the range [0, 1].",
            ),
            IdNumber => (
                Logical,
                Warn,
                "{0} ids should run contiguously from 1; {1} is missing.",
            ),
            ModificationPosition => (
                Logical,
                Error,
                "Modification \"{0}\" has position {1} outside 0..{2} for sequence \"{3}\".",
            ),
            ChemMods => (
                Logical,
                Warn,
                "CHEMMOD \"{0}\" should only be used when no controlled term describes the modification.",
            ),
            SubstituteIdentifier => (
                Logical,
                Error,
                "Substitution \"{0}\" must name one or more amino acid residues.",
            ),
            MsRunNotDefined => (
                Logical,
                Error,
                "{0} references ms_run[{1}] which is not declared in the metadata.",
            ),
            AssayNotDefined => (
                Logical,
                Error,
                "{0} references assay[{1}] which is not declared in the metadata.",
            ),
            StudyVariableNotDefined => (
                Logical,
                Error,
                "{0} references study_variable[{1}] which is not declared in the metadata.",
            ),
            NotDefineInMetadata => (
                Logical,
                Error,
                "{0} is not defined in the metadata section ({1}).",
            ),
            NotDefineInHeader => (
                Logical,
                Warn,
                "{0} is declared in the metadata but no {1} column uses it.",
            ),
            MzTabVersion => (
                Logical,
                Warn,
                "mzTab-version \"{0}\" is not 1.0.0.",
            ),
            CvTermMismatch => (
                CrossCheck,
                Warn,
                "Term {0} is named \"{1}\" but the controlled vocabulary calls it \"{2}\".",
            ),
            CvUnknownTerm => (
                CrossCheck,
                Info,
                "Accession {0} is not known to the controlled vocabulary.",
            ),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// A catalog entry: code, category, level and message template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorType {
    pub code: ErrorCode,
    pub category: ErrorCategory,
    pub level: ErrorLevel,
    pub template: &'static str,
}

impl ErrorType {
    /// Substitute `{0}`, `{1}`, ... in the template with `args`.
    ///
    /// The template is scanned once, so braces inside an argument are copied
    /// as they are. Placeholders without an argument are kept.
    pub fn format(&self, args: &[String]) -> String {
        let mut message = String::with_capacity(self.template.len());
        let mut rest = self.template;
        while let Some(open) = rest.find('{') {
            message.push_str(&rest[..open]);
            let tail = &rest[open..];
            let arg = tail
                .find('}')
                .and_then(|close| Some((close, tail[1..close].parse::<usize>().ok()?)))
                .and_then(|(close, index)| Some((close, args.get(index)?)));
            match arg {
                Some((close, arg)) => {
                    message.push_str(arg);
                    rest = &tail[close + 1..];
                }
                None => {
                    message.push('{');
                    rest = &tail[1..];
                }
            }
        }
        message.push_str(rest);
        message
    }
}

/// Immutable table of error types, built once and shared by every parser.
///
/// Levels may be overridden per code through [`ErrorCatalogBuilder`], which is
/// how codes that share a template (`Sequence` and `SearchEngineScore`) or
/// that have no agreed severity (`NotDefineInHeader`) are tuned.
#[derive(Debug, Clone)]
pub struct ErrorCatalog {
    types: HashMap<ErrorCode, ErrorType>,
}

impl ErrorCatalog {
    /// The catalog with every code at its default level.
    pub fn standard() -> Self {
        Self::builder().build()
    }

    /// Start from the defaults and override selected levels.
    pub fn builder() -> ErrorCatalogBuilder {
        ErrorCatalogBuilder {
            overrides: HashMap::new(),
        }
    }

    /// Look up the type of a code.
    pub fn get(&self, code: ErrorCode) -> ErrorType {
        self.types[&code]
    }

    /// Level configured for a code.
    pub fn level(&self, code: ErrorCode) -> ErrorLevel {
        self.get(code).level
    }

    /// Build a diagnostic for `code` raised at `line`.
    pub fn error<I, S>(&self, code: ErrorCode, line: usize, args: I) -> super::MzTabError
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        super::MzTabError::new(
            self.get(code),
            line,
            args.into_iter().map(Into::into).collect(),
        )
    }

    /// Iterate over all types in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ErrorType> {
        ErrorCode::ALL.iter().map(move |code| &self.types[code])
    }
}

impl Default for ErrorCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Builder for an [`ErrorCatalog`] with level overrides.
#[derive(Debug, Clone)]
pub struct ErrorCatalogBuilder {
    overrides: HashMap<ErrorCode, ErrorLevel>,
}

impl ErrorCatalogBuilder {
    /// Override the level of one code.
    pub fn level(mut self, code: ErrorCode, level: ErrorLevel) -> Self {
        self.overrides.insert(code, level);
        self
    }

    pub fn build(self) -> ErrorCatalog {
        let types = ErrorCode::ALL
            .iter()
            .map(|&code| {
                let (category, default_level, template) = code.defaults();
                let level = self.overrides.get(&code).copied().unwrap_or(default_level);
                (
                    code,
                    ErrorType {
                        code,
                        category,
                        level,
                        template,
                    },
                )
            })
            .collect();
        ErrorCatalog { types }
    }
}
