use std::fmt;

use serde::Serialize;

use crate::metadata::ElementKind;

/// One of the four tabular sections, in the order they must appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Protein,
    Peptide,
    Psm,
    SmallMolecule,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Protein,
        Section::Peptide,
        Section::Psm,
        Section::SmallMolecule,
    ];

    /// Name used in `colunit-{name}` keys and messages.
    pub fn name(&self) -> &'static str {
        match self {
            Section::Protein => "protein",
            Section::Peptide => "peptide",
            Section::Psm => "psm",
            Section::SmallMolecule => "small_molecule",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.name() == name)
    }

    pub fn header_prefix(&self) -> &'static str {
        match self {
            Section::Protein => "PRH",
            Section::Peptide => "PEH",
            Section::Psm => "PSH",
            Section::SmallMolecule => "SMH",
        }
    }

    pub fn row_prefix(&self) -> &'static str {
        match self {
            Section::Protein => "PRT",
            Section::Peptide => "PEP",
            Section::Psm => "PSM",
            Section::SmallMolecule => "SML",
        }
    }

    /// Prefix of abundance column headers; the PSM section has none.
    pub fn abundance_prefix(&self) -> Option<&'static str> {
        match self {
            Section::Protein => Some("protein"),
            Section::Peptide => Some("peptide"),
            Section::Psm => None,
            Section::SmallMolecule => Some("smallmolecule"),
        }
    }

    /// Metadata element that declares this section's search engine scores.
    pub fn search_engine_score_kind(&self) -> ElementKind {
        match self {
            Section::Protein => ElementKind::ProteinSearchEngineScore,
            Section::Peptide => ElementKind::PeptideSearchEngineScore,
            Section::Psm => ElementKind::PsmSearchEngineScore,
            Section::SmallMolecule => ElementKind::SmallMoleculeSearchEngineScore,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
