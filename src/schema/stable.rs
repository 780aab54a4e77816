//! Mandatory columns of each section, in their canonical order.

use super::Section;
use crate::codec::ValueType;

const PROTEIN: &[(&str, ValueType)] = &[
    ("accession", ValueType::String),
    ("description", ValueType::String),
    ("taxid", ValueType::Integer),
    ("species", ValueType::String),
    ("database", ValueType::String),
    ("database_version", ValueType::String),
    ("search_engine", ValueType::ParamList),
    ("ambiguity_members", ValueType::StringList(',')),
    ("modifications", ValueType::ModificationList),
    ("protein_coverage", ValueType::Double),
];

const PEPTIDE: &[(&str, ValueType)] = &[
    ("sequence", ValueType::String),
    ("accession", ValueType::String),
    ("unique", ValueType::Boolean),
    ("database", ValueType::String),
    ("database_version", ValueType::String),
    ("search_engine", ValueType::ParamList),
    ("modifications", ValueType::ModificationList),
    ("retention_time", ValueType::DoubleList),
    ("retention_time_window", ValueType::DoubleList),
    ("charge", ValueType::Integer),
    ("mass_to_charge", ValueType::Double),
    ("spectra_ref", ValueType::SpectraRefList),
];

const PSM: &[(&str, ValueType)] = &[
    ("sequence", ValueType::String),
    ("PSM_ID", ValueType::String),
    ("accession", ValueType::String),
    ("unique", ValueType::Boolean),
    ("database", ValueType::String),
    ("database_version", ValueType::String),
    ("search_engine", ValueType::ParamList),
    ("modifications", ValueType::ModificationList),
    ("retention_time", ValueType::DoubleList),
    ("charge", ValueType::Integer),
    ("exp_mass_to_charge", ValueType::Double),
    ("calc_mass_to_charge", ValueType::Double),
    ("spectra_ref", ValueType::SpectraRefList),
    ("pre", ValueType::String),
    ("post", ValueType::String),
    ("start", ValueType::Integer),
    ("end", ValueType::Integer),
];

const SMALL_MOLECULE: &[(&str, ValueType)] = &[
    ("identifier", ValueType::StringList('|')),
    ("chemical_formula", ValueType::String),
    ("smiles", ValueType::StringList('|')),
    ("inchi_key", ValueType::StringList('|')),
    ("description", ValueType::String),
    ("exp_mass_to_charge", ValueType::Double),
    ("calc_mass_to_charge", ValueType::Double),
    ("charge", ValueType::Integer),
    ("retention_time", ValueType::DoubleList),
    ("taxid", ValueType::Integer),
    ("species", ValueType::String),
    ("database", ValueType::String),
    ("database_version", ValueType::String),
    ("spectra_ref", ValueType::SpectraRefList),
    ("search_engine", ValueType::ParamList),
    ("modifications", ValueType::ModificationList),
];

/// Stable columns of `section` with their value types.
pub fn stable_columns(section: Section) -> &'static [(&'static str, ValueType)] {
    match section {
        Section::Protein => PROTEIN,
        Section::Peptide => PEPTIDE,
        Section::Psm => PSM,
        Section::SmallMolecule => SMALL_MOLECULE,
    }
}

pub fn stable_column_type(section: Section, header: &str) -> Option<ValueType> {
    stable_columns(section)
        .iter()
        .find(|(name, _)| *name == header)
        .map(|(_, ty)| *ty)
}
