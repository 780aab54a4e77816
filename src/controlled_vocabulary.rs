//! # Controlled vocabulary lookups
//!
//! mzTab parameters name their terms twice: once by accession and once by
//! name. When CV lookups are enabled the validator checks that the name
//! matches what the vocabulary calls the term.
//!
//! External ontology services plug in through [`CvLookup`]. A small static
//! table of the PSI-MS and unit ontology terms that mzTab files use most
//! often ships with the crate as [`StaticVocabulary::standard`].
//!
//! ## Reference
//! - PSI-MS OBO: https://raw.githubusercontent.com/HUPO-PSI/psi-ms-CV/master/psi-ms.obo
//! - Unit ontology: https://github.com/bio-ontology-research-group/unit-ontology

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::codec::Param;

/// A controlled vocabulary term with its accession and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CvTerm {
    /// CV accession (e.g., "MS:1001207")
    pub accession: String,
    /// Preferred name
    pub name: String,
}

impl CvTerm {
    /// Create a new CV term with accession and name
    pub fn new(accession: &str, name: &str) -> Self {
        Self {
            accession: accession.to_string(),
            name: name.to_string(),
        }
    }

    /// Ontology prefix of the accession, `MS` for `MS:1001207`
    pub fn ontology(&self) -> &str {
        ontology_of(&self.accession)
    }

    /// The term as an mzTab parameter without a value
    pub fn to_param(&self) -> Param {
        Param::cv(self.ontology(), &self.accession, &self.name)
    }
}

impl fmt::Display for CvTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}: {}]", self.accession, self.name)
    }
}

fn ontology_of(accession: &str) -> &str {
    accession
        .split_once(':')
        .map(|(prefix, _)| prefix)
        .unwrap_or(accession)
}

/// Source of controlled vocabulary term names.
pub trait CvLookup: fmt::Debug + Send + Sync {
    /// Preferred name of `accession`, `None` when the term is unknown.
    fn term_name(&self, accession: &str) -> Option<&str>;

    /// Whether the accession belongs to an ontology this source knows.
    ///
    /// Terms of uncovered ontologies are not checked at all.
    fn covers(&self, accession: &str) -> bool;
}

/// In-memory vocabulary keyed by accession.
///
/// Only listed accessions are checked, unless an ontology is marked complete
/// with [`StaticVocabulary::with_complete_ontology`]; then any accession of
/// that ontology missing from the table is an unknown term.
#[derive(Debug, Clone, Default)]
pub struct StaticVocabulary {
    terms: HashMap<String, CvTerm>,
    complete: HashSet<String>,
}

impl StaticVocabulary {
    /// Create an empty vocabulary
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundled PSI-MS and unit ontology terms.
    pub fn standard() -> Self {
        ms_terms::all().into_iter().chain(unit_terms::all()).collect()
    }

    /// Add a term
    pub fn add(&mut self, term: CvTerm) {
        self.terms.insert(term.accession.clone(), term);
    }

    /// Declare that the table lists every term of `ontology`.
    pub fn with_complete_ontology(mut self, ontology: &str) -> Self {
        self.complete.insert(ontology.to_string());
        self
    }

    /// Add a term (builder pattern)
    pub fn with(mut self, term: CvTerm) -> Self {
        self.add(term);
        self
    }

    /// Get a term by accession
    pub fn get(&self, accession: &str) -> Option<&CvTerm> {
        self.terms.get(accession)
    }

    /// Iterate over all terms
    pub fn iter(&self) -> impl Iterator<Item = &CvTerm> {
        self.terms.values()
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl FromIterator<CvTerm> for StaticVocabulary {
    fn from_iter<I: IntoIterator<Item = CvTerm>>(iter: I) -> Self {
        let mut vocabulary = StaticVocabulary::new();
        for term in iter {
            vocabulary.add(term);
        }
        vocabulary
    }
}

impl CvLookup for StaticVocabulary {
    fn term_name(&self, accession: &str) -> Option<&str> {
        self.get(accession).map(|t| t.name.as_str())
    }

    fn covers(&self, accession: &str) -> bool {
        self.terms.contains_key(accession) || self.complete.contains(ontology_of(accession))
    }
}

/// PSI-MS terms common in mzTab metadata and tables
pub mod ms_terms {
    use super::CvTerm;

    // =========================================================================
    // Search engines and scores
    // =========================================================================

    /// MS:1001207 - Mascot
    pub fn mascot() -> CvTerm {
        CvTerm::new("MS:1001207", "Mascot")
    }

    /// MS:1001208 - SEQUEST
    pub fn sequest() -> CvTerm {
        CvTerm::new("MS:1001208", "SEQUEST")
    }

    /// MS:1001476 - X!Tandem
    pub fn xtandem() -> CvTerm {
        CvTerm::new("MS:1001476", "X!Tandem")
    }

    /// MS:1001583 - MaxQuant
    pub fn maxquant() -> CvTerm {
        CvTerm::new("MS:1001583", "MaxQuant")
    }

    /// MS:1001171 - Mascot:score
    pub fn mascot_score() -> CvTerm {
        CvTerm::new("MS:1001171", "Mascot:score")
    }

    /// MS:1001155 - SEQUEST:xcorr
    pub fn sequest_xcorr() -> CvTerm {
        CvTerm::new("MS:1001155", "SEQUEST:xcorr")
    }

    /// MS:1001330 - X!Tandem:expect
    pub fn xtandem_expect() -> CvTerm {
        CvTerm::new("MS:1001330", "X!Tandem:expect")
    }

    // =========================================================================
    // False discovery rates
    // =========================================================================

    /// MS:1002350 - PSM-level global FDR
    pub fn psm_level_global_fdr() -> CvTerm {
        CvTerm::new("MS:1002350", "PSM-level global FDR")
    }

    /// MS:1001364 - peptide sequence-level global FDR
    pub fn peptide_level_global_fdr() -> CvTerm {
        CvTerm::new("MS:1001364", "peptide sequence-level global FDR")
    }

    /// MS:1001214 - protein-level global FDR
    pub fn protein_level_global_fdr() -> CvTerm {
        CvTerm::new("MS:1001214", "protein-level global FDR")
    }

    // =========================================================================
    // Identification annotations
    // =========================================================================

    /// MS:1002217 - decoy peptide
    pub fn decoy_peptide() -> CvTerm {
        CvTerm::new("MS:1002217", "decoy peptide")
    }

    /// MS:1001876 - modification probability
    pub fn modification_probability() -> CvTerm {
        CvTerm::new("MS:1001876", "modification probability")
    }

    /// MS:1001524 - fragment neutral loss
    pub fn fragment_neutral_loss() -> CvTerm {
        CvTerm::new("MS:1001524", "fragment neutral loss")
    }

    /// MS:1002453 - placeholder for `fixed_mod[1]` when none were searched
    pub fn no_fixed_modifications() -> CvTerm {
        CvTerm::new("MS:1002453", "No fixed modifications searched")
    }

    /// MS:1002454 - placeholder for `variable_mod[1]` when none were searched
    pub fn no_variable_modifications() -> CvTerm {
        CvTerm::new("MS:1002454", "No variable modifications searched")
    }

    // =========================================================================
    // Quantification
    // =========================================================================

    /// MS:1001834 - LC-MS label-free quantitation analysis
    pub fn label_free_quantitation() -> CvTerm {
        CvTerm::new("MS:1001834", "LC-MS label-free quantitation analysis")
    }

    /// MS:1002038 - unlabeled sample
    pub fn unlabeled_sample() -> CvTerm {
        CvTerm::new("MS:1002038", "unlabeled sample")
    }

    // =========================================================================
    // Runs and fragmentation
    // =========================================================================

    /// MS:1000584 - mzML format
    pub fn mzml_format() -> CvTerm {
        CvTerm::new("MS:1000584", "mzML format")
    }

    /// MS:1000768 - Thermo nativeID format
    pub fn thermo_native_id_format() -> CvTerm {
        CvTerm::new("MS:1000768", "Thermo nativeID format")
    }

    /// MS:1000774 - multiple peak list nativeID format
    pub fn multiple_peak_list_native_id_format() -> CvTerm {
        CvTerm::new("MS:1000774", "multiple peak list nativeID format")
    }

    /// MS:1000569 - SHA-1
    pub fn sha1() -> CvTerm {
        CvTerm::new("MS:1000569", "SHA-1")
    }

    /// MS:1000133 - collision-induced dissociation
    pub fn cid() -> CvTerm {
        CvTerm::new("MS:1000133", "collision-induced dissociation")
    }

    /// MS:1000422 - beam-type collision-induced dissociation (HCD)
    pub fn hcd() -> CvTerm {
        CvTerm::new("MS:1000422", "beam-type collision-induced dissociation")
    }

    /// MS:1000598 - electron transfer dissociation
    pub fn etd() -> CvTerm {
        CvTerm::new("MS:1000598", "electron transfer dissociation")
    }

    // =========================================================================
    // Instrument terms
    // =========================================================================

    /// MS:1000073 - electrospray ionization
    pub fn electrospray_ionization() -> CvTerm {
        CvTerm::new("MS:1000073", "electrospray ionization")
    }

    /// MS:1000484 - orbitrap
    pub fn orbitrap() -> CvTerm {
        CvTerm::new("MS:1000484", "orbitrap")
    }

    /// MS:1000264 - ion trap
    pub fn ion_trap() -> CvTerm {
        CvTerm::new("MS:1000264", "ion trap")
    }

    /// MS:1000081 - quadrupole
    pub fn quadrupole() -> CvTerm {
        CvTerm::new("MS:1000081", "quadrupole")
    }

    /// MS:1000084 - time-of-flight
    pub fn tof() -> CvTerm {
        CvTerm::new("MS:1000084", "time-of-flight")
    }

    /// MS:1000253 - electron multiplier
    pub fn electron_multiplier() -> CvTerm {
        CvTerm::new("MS:1000253", "electron multiplier")
    }

    pub(super) fn all() -> Vec<CvTerm> {
        vec![
            mascot(),
            sequest(),
            xtandem(),
            maxquant(),
            mascot_score(),
            sequest_xcorr(),
            xtandem_expect(),
            psm_level_global_fdr(),
            peptide_level_global_fdr(),
            protein_level_global_fdr(),
            decoy_peptide(),
            modification_probability(),
            fragment_neutral_loss(),
            no_fixed_modifications(),
            no_variable_modifications(),
            label_free_quantitation(),
            unlabeled_sample(),
            mzml_format(),
            thermo_native_id_format(),
            multiple_peak_list_native_id_format(),
            sha1(),
            cid(),
            hcd(),
            etd(),
            electrospray_ionization(),
            orbitrap(),
            ion_trap(),
            quadrupole(),
            tof(),
            electron_multiplier(),
        ]
    }
}

/// Unit ontology terms used in `colunit-*` declarations
pub mod unit_terms {
    use super::CvTerm;

    /// UO:0000010 - second
    pub fn second() -> CvTerm {
        CvTerm::new("UO:0000010", "second")
    }

    /// UO:0000031 - minute
    pub fn minute() -> CvTerm {
        CvTerm::new("UO:0000031", "minute")
    }

    /// UO:0000221 - dalton
    pub fn dalton() -> CvTerm {
        CvTerm::new("UO:0000221", "dalton")
    }

    /// UO:0000169 - parts per million
    pub fn ppm() -> CvTerm {
        CvTerm::new("UO:0000169", "parts per million")
    }

    /// UO:0000187 - percent
    pub fn percent() -> CvTerm {
        CvTerm::new("UO:0000187", "percent")
    }

    pub(super) fn all() -> Vec<CvTerm> {
        vec![second(), minute(), dalton(), ppm(), percent()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_vocabulary_lookup() {
        let vocabulary = StaticVocabulary::standard();
        assert_eq!(vocabulary.term_name("MS:1001207"), Some("Mascot"));
        assert_eq!(vocabulary.term_name("UO:0000031"), Some("minute"));
        assert!(vocabulary.covers("MS:1001207"));
        assert!(!vocabulary.covers("MS:1001456"));
        assert!(!vocabulary.covers("NEWT:9606"));
    }

    #[test]
    fn test_term_to_param() {
        let param = ms_terms::decoy_peptide().to_param();
        assert_eq!(param.to_string(), "[MS, MS:1002217, decoy peptide, ]");
    }

    #[test]
    fn test_custom_vocabulary() {
        let vocabulary = StaticVocabulary::new().with(CvTerm::new("PRIDE:0000001", "test"));
        assert_eq!(vocabulary.len(), 1);
        assert!(vocabulary.covers("PRIDE:0000001"));
        assert!(!vocabulary.covers("PRIDE:0000002"));

        let vocabulary = vocabulary.with_complete_ontology("PRIDE");
        assert!(vocabulary.covers("PRIDE:0000002"));
        assert_eq!(vocabulary.term_name("PRIDE:0000002"), None);
        assert!(!vocabulary.covers("MS:1001207"));
    }
}
