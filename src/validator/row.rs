//! Checks on decoded data lines.

use std::collections::HashSet;

use super::Rules;
use crate::codec::{format_double, Modification, ModificationKind, PositionConfidence, Value};
use crate::error::{ErrorCode, MzTabError};
use crate::metadata::{ElementRef, Metadata};
use crate::schema::{ColumnSchema, Section};
use crate::table::Record;

const AMINO_ACIDS: &str = "ACDEFGHIKLMNOPQRSTUVWY";

/// Per-section state for row checks: duplicate keys and the undeclared
/// runs already reported.
#[derive(Debug, Clone)]
pub struct RowValidator {
    section: Section,
    accessions: HashSet<String>,
    psms: HashSet<(String, String)>,
    undefined_runs: HashSet<u32>,
}

impl RowValidator {
    pub fn new(section: Section) -> Self {
        Self {
            section,
            accessions: HashSet::new(),
            psms: HashSet::new(),
            undefined_runs: HashSet::new(),
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    /// Check one record and push its violations.
    pub fn check(
        &mut self,
        metadata: &Metadata,
        schema: &ColumnSchema,
        record: &Record,
        rules: &Rules<'_>,
        sink: &mut Vec<MzTabError>,
    ) {
        let line = record.line;
        let value = |header: &str| {
            schema
                .find_by_header(header)
                .and_then(|c| record.get(c.position))
                .filter(|v| !v.is_null())
        };

        self.check_duplicates(&value, line, rules, sink);

        if let Some(refs) = value("spectra_ref").and_then(Value::as_spectra_refs) {
            for spectra_ref in refs {
                let run = ElementRef::ms_run(spectra_ref.ms_run);
                if !metadata.contains(run) && self.undefined_runs.insert(run.id) {
                    sink.extend(rules.error(
                        ErrorCode::MsRunNotDefined,
                        line,
                        ["spectra_ref".to_string(), run.id.to_string()],
                    ));
                }
            }
        }

        let sequence = match self.section {
            Section::Peptide | Section::Psm => value("sequence").and_then(Value::as_str),
            _ => None,
        };
        if let Some(sequence) = sequence {
            if !sequence.chars().all(|c| c.is_ascii_uppercase()) {
                sink.extend(rules.error(ErrorCode::Sequence, line, ["sequence", sequence]));
            }
        }

        if let Some(mods) = value("modifications").and_then(Value::as_modifications) {
            for modification in mods {
                check_modification(modification, sequence, line, rules, sink);
            }
        }

        if self.section == Section::Protein {
            if let Some(coverage) = value("protein_coverage").and_then(Value::as_f64) {
                if !coverage.is_nan() && !(0.0..=1.0).contains(&coverage) {
                    sink.extend(rules.error(
                        ErrorCode::ProteinCoverage,
                        line,
                        [format_double(coverage)],
                    ));
                }
            }
        }

        let scored = schema
            .optional_columns()
            .filter(|c| c.is_search_engine_score())
            .any(|c| record.get(c.position).is_some_and(|v| !v.is_null()));
        if scored && value("search_engine").is_none() {
            sink.extend(rules.error(
                ErrorCode::SearchEngineScore,
                line,
                ["search_engine", "null"],
            ));
        }

        if rules.enabled(ErrorCode::CvTermMismatch) || rules.enabled(ErrorCode::CvUnknownTerm) {
            for (_, value) in record.values() {
                for param in value.params() {
                    rules.check_param(param, line, sink);
                }
            }
        }
    }

    fn check_duplicates<'r>(
        &mut self,
        value: &impl Fn(&str) -> Option<&'r Value>,
        line: usize,
        rules: &Rules<'_>,
        sink: &mut Vec<MzTabError>,
    ) {
        match self.section {
            Section::Protein => {
                let Some(accession) = value("accession").map(Value::to_string) else {
                    return;
                };
                if !self.accessions.insert(accession.clone()) {
                    sink.extend(rules.error(
                        ErrorCode::DuplicationAccession,
                        line,
                        [accession, self.section.to_string()],
                    ));
                }
            }
            Section::Psm => {
                let (Some(id), Some(accession)) = (value("PSM_ID"), value("accession")) else {
                    return;
                };
                let key = (id.to_string(), accession.to_string());
                if !self.psms.insert(key.clone()) {
                    sink.extend(rules.error(
                        ErrorCode::DuplicationId,
                        line,
                        [
                            "PSM_ID and accession".to_string(),
                            format!("{} / {}", key.0, key.1),
                            self.section.to_string(),
                        ],
                    ));
                }
            }
            Section::Peptide | Section::SmallMolecule => {}
        }
    }
}

fn check_modification(
    modification: &Modification,
    sequence: Option<&str>,
    line: usize,
    rules: &Rules<'_>,
    sink: &mut Vec<MzTabError>,
) {
    let text = modification.to_string();

    if let Some(sequence) = sequence {
        // 0 is the N-terminus and len + 1 the C-terminus.
        let max = sequence.chars().count() as u32 + 1;
        for position in &modification.positions {
            if position.position > max {
                sink.extend(rules.error(
                    ErrorCode::ModificationPosition,
                    line,
                    [
                        text.clone(),
                        position.position.to_string(),
                        max.to_string(),
                        sequence.to_string(),
                    ],
                ));
            }
        }
    }

    match &modification.kind {
        ModificationKind::ChemMod(_) => {
            sink.extend(rules.error(ErrorCode::ChemMods, line, [text.as_str()]));
        }
        ModificationKind::Subst(residues) => {
            let valid = !residues.is_empty() && residues.chars().all(|c| AMINO_ACIDS.contains(c));
            if !valid {
                sink.extend(rules.error(ErrorCode::SubstituteIdentifier, line, [text.as_str()]));
            }
        }
        ModificationKind::Accession { .. } => {}
    }

    let confidences = modification
        .positions
        .iter()
        .filter_map(|p| match &p.confidence {
            Some(PositionConfidence::Param(param)) => Some(param),
            _ => None,
        });
    for param in confidences.chain(modification.neutral_loss.as_ref()) {
        rules.check_param(param, line, sink);
    }
}
