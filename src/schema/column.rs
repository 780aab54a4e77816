use serde::Serialize;

use super::Section;
use crate::codec::{Param, ValueType};
use crate::metadata::ElementRef;

/// Well-known optional columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FixedColumn {
    Reliability,
    Uri,
    GoTerms,
}

impl FixedColumn {
    pub fn header(&self) -> &'static str {
        match self {
            FixedColumn::Reliability => "reliability",
            FixedColumn::Uri => "uri",
            FixedColumn::GoTerms => "go_terms",
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            FixedColumn::Reliability => ValueType::Reliability,
            FixedColumn::Uri => ValueType::Uri,
            FixedColumn::GoTerms => ValueType::GoTermList,
        }
    }

    pub fn from_header(header: &str) -> Option<Self> {
        [FixedColumn::Reliability, FixedColumn::Uri, FixedColumn::GoTerms]
            .into_iter()
            .find(|c| c.header() == header)
    }
}

/// Per-MS-run counts reported in the protein section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MsRunProperty {
    NumPsms,
    NumPeptidesDistinct,
    NumPeptidesUnique,
}

impl MsRunProperty {
    pub fn name(&self) -> &'static str {
        match self {
            MsRunProperty::NumPsms => "num_psms",
            MsRunProperty::NumPeptidesDistinct => "num_peptides_distinct",
            MsRunProperty::NumPeptidesUnique => "num_peptides_unique",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            MsRunProperty::NumPsms,
            MsRunProperty::NumPeptidesDistinct,
            MsRunProperty::NumPeptidesUnique,
        ]
        .into_iter()
        .find(|p| p.name() == name)
    }
}

/// Which value of an abundance group a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AbundanceRole {
    Value,
    Stdev,
    StdError,
}

/// How an optional column came to be.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum OptionalOrigin {
    /// `opt_{owner}_{name}`, owner `None` meaning `global`
    Plain {
        owner: Option<ElementRef>,
        name: String,
    },
    /// `opt_{owner}_cv_{accession}_{name}`
    Cv {
        owner: Option<ElementRef>,
        param: Param,
    },
    Fixed(FixedColumn),
    /// `{property}_ms_run[{n}]`
    MsRun { property: MsRunProperty, ms_run: u32 },
    /// `best_search_engine_score[n]`, `search_engine_score[n]_ms_run[m]` or
    /// `search_engine_score[n]`
    SearchEngineScore {
        score: u32,
        ms_run: Option<u32>,
        best: bool,
    },
    Abundance {
        element: ElementRef,
        role: AbundanceRole,
    },
}

fn owner_name(owner: &Option<ElementRef>) -> String {
    match owner {
        Some(element) => element.to_string(),
        None => "global".to_string(),
    }
}

impl OptionalOrigin {
    /// Column header produced by this origin in `section`.
    pub fn header(&self, section: Section) -> String {
        match self {
            OptionalOrigin::Plain { owner, name } => format!("opt_{}_{}", owner_name(owner), name),
            OptionalOrigin::Cv { owner, param } => format!(
                "opt_{}_cv_{}_{}",
                owner_name(owner),
                param.accession.as_deref().unwrap_or_default(),
                param.name.replace(' ', "_")
            ),
            OptionalOrigin::Fixed(column) => column.header().to_string(),
            OptionalOrigin::MsRun { property, ms_run } => {
                format!("{}_ms_run[{}]", property.name(), ms_run)
            }
            OptionalOrigin::SearchEngineScore {
                score,
                ms_run,
                best,
            } => match (best, ms_run) {
                (true, _) => format!("best_search_engine_score[{}]", score),
                (false, Some(run)) => format!("search_engine_score[{}]_ms_run[{}]", score, run),
                (false, None) => format!("search_engine_score[{}]", score),
            },
            OptionalOrigin::Abundance { element, role } => {
                let prefix = section.abundance_prefix().unwrap_or_default();
                let kind = element.kind.key_name();
                match role {
                    AbundanceRole::Value => {
                        format!("{}_abundance_{}[{}]", prefix, kind, element.id)
                    }
                    AbundanceRole::Stdev => {
                        format!("{}_abundance_stdev_{}[{}]", prefix, kind, element.id)
                    }
                    AbundanceRole::StdError => {
                        format!("{}_abundance_std_error_{}[{}]", prefix, kind, element.id)
                    }
                }
            }
        }
    }

    /// Metadata element the column is bound to, if any.
    pub fn element(&self) -> Option<ElementRef> {
        match self {
            OptionalOrigin::Plain { owner, .. } | OptionalOrigin::Cv { owner, .. } => *owner,
            OptionalOrigin::MsRun { ms_run, .. } => Some(ElementRef::ms_run(*ms_run)),
            OptionalOrigin::SearchEngineScore {
                ms_run: Some(run), ..
            } => Some(ElementRef::ms_run(*run)),
            OptionalOrigin::Abundance { element, .. } => Some(*element),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ColumnOrigin {
    Stable,
    Optional(OptionalOrigin),
}

/// A column of a section table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    /// Logical position, 1-based
    pub position: u32,
    pub header: String,
    pub value_type: ValueType,
    pub origin: ColumnOrigin,
    pub unit: Option<Param>,
}

impl Column {
    pub fn is_stable(&self) -> bool {
        matches!(self.origin, ColumnOrigin::Stable)
    }

    pub fn optional_origin(&self) -> Option<&OptionalOrigin> {
        match &self.origin {
            ColumnOrigin::Optional(origin) => Some(origin),
            ColumnOrigin::Stable => None,
        }
    }

    pub fn is_abundance(&self) -> bool {
        matches!(
            self.optional_origin(),
            Some(OptionalOrigin::Abundance { .. })
        )
    }

    pub fn is_search_engine_score(&self) -> bool {
        matches!(
            self.optional_origin(),
            Some(OptionalOrigin::SearchEngineScore { .. })
        )
    }

    /// Metadata element the column is bound to, if any.
    pub fn element(&self) -> Option<ElementRef> {
        self.optional_origin().and_then(OptionalOrigin::element)
    }
}
