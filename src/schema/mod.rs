//! # Column schemas
//!
//! Each tabular section (protein, peptide, PSM, small molecule) has a fixed
//! set of stable columns followed by optional columns whose headers encode
//! what they hold.
//!
//! ## Optional column headers
//!
//! | Header | Origin |
//! |--------|--------|
//! | `opt_global_{name}`, `opt_assay[1]_{name}` | [`OptionalOrigin::Plain`] |
//! | `opt_global_cv_MS:1002217_decoy_peptide` | [`OptionalOrigin::Cv`] |
//! | `reliability`, `uri`, `go_terms` | [`OptionalOrigin::Fixed`] |
//! | `num_psms_ms_run[1]` (protein only) | [`OptionalOrigin::MsRun`] |
//! | `best_search_engine_score[1]`, `search_engine_score[1]_ms_run[2]` | [`OptionalOrigin::SearchEngineScore`] |
//! | `protein_abundance_assay[1]`, `protein_abundance_stdev_study_variable[1]` | [`OptionalOrigin::Abundance`] |
//!
//! The header line of a section is resolved token by token with
//! [`classify_header`] and the resulting specs are added to a
//! [`ColumnSchema`], which assigns logical positions.

mod column;
mod factory;
mod section;
mod stable;


pub use column::{
    AbundanceRole, Column, ColumnOrigin, FixedColumn, MsRunProperty, OptionalOrigin,
};
pub use factory::{classify_header, ColumnSchema, ColumnSpec};
pub use section::Section;
pub use stable::{stable_column_type, stable_columns};

use crate::metadata::ElementRef;

/// Misuse of the [`ColumnSchema`] API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// No column with this header
    #[error("no column \"{0}\" in the schema")]
    UnknownColumn(String),

    /// Abundance columns cannot carry a column unit
    #[error("abundance column \"{0}\" cannot carry a unit")]
    AbundanceUnit(String),

    /// Column kind not allowed in this section
    #[error("column \"{column}\" is not allowed in the {section} section")]
    NotInSection { column: String, section: Section },

    /// Only assays and study variables have abundance columns
    #[error("{0} cannot own abundance columns")]
    AbundanceElement(ElementRef),

    /// CV optional columns are named after the parameter accession
    #[error("CV optional column needs a parameter with an accession, got {0}")]
    CvParamWithoutAccession(String),
}
