//! Checks run once the metadata section is complete.

use super::Rules;
use crate::codec::Value;
use crate::error::{ErrorCode, MzTabError};
use crate::metadata::{
    ElementKind, ElementRef, IndexedElement, Metadata, MzTabMode, MzTabType, ScalarKey,
};

/// The only mzTab version this crate reads.
pub const MZTAB_VERSION: &str = "1.0.0";

const QUANTIFICATION_UNITS: [ScalarKey; 3] = [
    ScalarKey::ProteinQuantificationUnit,
    ScalarKey::PeptideQuantificationUnit,
    ScalarKey::SmallMoleculeQuantificationUnit,
];

/// Run all metadata checks.
pub fn check_metadata(metadata: &Metadata, rules: &Rules<'_>, sink: &mut Vec<MzTabError>) {
    check_references(metadata, rules, sink);
    check_mandatory(metadata, rules, sink);
    check_id_numbers(metadata, rules, sink);
    check_version(metadata, rules, sink);
    check_params(metadata, rules, sink);
}

/// Code reported when `element` is referenced but not declared.
pub(crate) fn undefined_code(kind: ElementKind) -> ErrorCode {
    match kind {
        ElementKind::MsRun => ErrorCode::MsRunNotDefined,
        ElementKind::Assay => ErrorCode::AssayNotDefined,
        ElementKind::StudyVariable => ErrorCode::StudyVariableNotDefined,
        _ => ErrorCode::NotDefineInMetadata,
    }
}

/// Diagnostic for a reference to an undeclared element from `context`.
pub(crate) fn undefined_element(
    target: ElementRef,
    context: &str,
    line: usize,
    rules: &Rules<'_>,
) -> Option<MzTabError> {
    match undefined_code(target.kind) {
        ErrorCode::NotDefineInMetadata => rules.error(
            ErrorCode::NotDefineInMetadata,
            line,
            [target.to_string(), format!("referenced by {}", context)],
        ),
        code => rules.error(code, line, [context.to_string(), target.id.to_string()]),
    }
}

fn references(element: &IndexedElement) -> Vec<(String, ElementRef)> {
    let owner = element.element_ref();
    let mut targets = Vec::new();
    for (key, value) in &element.properties {
        let context = format!("{}-{}", owner, key);
        match value {
            Value::ElementRef(target) => targets.push((context, *target)),
            Value::ElementRefList(list) => {
                targets.extend(list.iter().map(|target| (context.clone(), *target)))
            }
            _ => {}
        }
    }
    targets
}

fn check_references(metadata: &Metadata, rules: &Rules<'_>, sink: &mut Vec<MzTabError>) {
    for kind in [ElementKind::Assay, ElementKind::StudyVariable] {
        for element in metadata.elements_of(kind) {
            for (context, target) in references(element) {
                if !metadata.contains(target) {
                    sink.extend(undefined_element(target, &context, element.line, rules));
                }
            }
        }
    }
}

fn missing(item: impl Into<String>, context: &str, rules: &Rules<'_>) -> Option<MzTabError> {
    rules.error(ErrorCode::NotDefineInMetadata, 0, [item.into(), context.to_string()])
}

fn check_mandatory(metadata: &Metadata, rules: &Rules<'_>, sink: &mut Vec<MzTabError>) {
    if !rules.enabled(ErrorCode::NotDefineInMetadata) {
        return;
    }
    const ALWAYS: &str = "mandatory in every file";

    for key in [
        ScalarKey::Version,
        ScalarKey::Mode,
        ScalarKey::Type,
        ScalarKey::Description,
    ] {
        if metadata.scalar(key).is_none() {
            sink.extend(missing(key.key_name(), ALWAYS, rules));
        }
    }

    let runs: Vec<&IndexedElement> = metadata.elements_of(ElementKind::MsRun).collect();
    if runs.is_empty() {
        sink.extend(missing("ms_run[1]-location", ALWAYS, rules));
    }
    for run in runs.iter().filter(|run| !run.has_property("location")) {
        sink.extend(missing(
            format!("{}-location", run.element_ref()),
            ALWAYS,
            rules,
        ));
    }

    for kind in [ElementKind::FixedMod, ElementKind::VariableMod] {
        if metadata.elements_of(kind).next().is_none() {
            sink.extend(missing(ElementRef::new(kind, 1).to_string(), ALWAYS, rules));
        }
    }

    let mode = metadata.mode();
    let ty = metadata.mz_tab_type();

    if mode == Some(MzTabMode::Complete)
        && metadata.elements_of(ElementKind::Software).next().is_none()
    {
        sink.extend(missing("software[1]", "mandatory in Complete mode", rules));
    }

    if ty != Some(MzTabType::Quantification) {
        return;
    }
    const QUANT: &str = "mandatory in Quantification files";
    if metadata.scalar(ScalarKey::QuantificationMethod).is_none() {
        sink.extend(missing("quantification_method", QUANT, rules));
    }
    if metadata.elements_of(ElementKind::StudyVariable).next().is_none() {
        sink.extend(missing("study_variable[1]", QUANT, rules));
    }
    if QUANTIFICATION_UNITS
        .iter()
        .all(|key| metadata.scalar(*key).is_none())
    {
        sink.extend(missing(
            "protein-, peptide- or small_molecule-quantification_unit",
            QUANT,
            rules,
        ));
    }

    match mode {
        Some(MzTabMode::Complete) => {
            const CONTEXT: &str = "mandatory in Complete Quantification files";
            for assay in metadata.elements_of(ElementKind::Assay) {
                for property in ["quantification_reagent", "ms_run_ref"] {
                    if !assay.has_property(property) {
                        sink.extend(missing(
                            format!("{}-{}", assay.element_ref(), property),
                            CONTEXT,
                            rules,
                        ));
                    }
                }
            }
            for variable in metadata.elements_of(ElementKind::StudyVariable) {
                if !variable.has_property("assay_refs") {
                    sink.extend(missing(
                        format!("{}-assay_refs", variable.element_ref()),
                        CONTEXT,
                        rules,
                    ));
                }
            }
        }
        Some(MzTabMode::Summary) => {
            for variable in metadata.elements_of(ElementKind::StudyVariable) {
                if !variable.has_property("description") {
                    sink.extend(missing(
                        format!("{}-description", variable.element_ref()),
                        "mandatory in Summary Quantification files",
                        rules,
                    ));
                }
            }
        }
        None => {}
    }
}

/// Ids of each kind should be 1..n; the first gap is reported.
fn check_id_numbers(metadata: &Metadata, rules: &Rules<'_>, sink: &mut Vec<MzTabError>) {
    if !rules.enabled(ErrorCode::IdNumber) {
        return;
    }
    for kind in ElementKind::ALL {
        let ids = metadata.ids(kind);
        let gap = ids
            .iter()
            .zip(1u32..)
            .find(|(id, expected)| **id != *expected)
            .map(|(_, expected)| expected);
        if let Some(expected) = gap {
            let line = metadata
                .elements_of(kind)
                .map(|e| e.line)
                .find(|&line| line > 0)
                .unwrap_or(0);
            sink.extend(rules.error(
                ErrorCode::IdNumber,
                line,
                [
                    kind.key_name().to_string(),
                    ElementRef::new(kind, expected).to_string(),
                ],
            ));
        }
    }
}

fn check_version(metadata: &Metadata, rules: &Rules<'_>, sink: &mut Vec<MzTabError>) {
    if let Some(version) = metadata.version() {
        if version != MZTAB_VERSION {
            sink.extend(rules.error(ErrorCode::MzTabVersion, 0, [version]));
        }
    }
}

fn check_params(metadata: &Metadata, rules: &Rules<'_>, sink: &mut Vec<MzTabError>) {
    for key in ScalarKey::ALL {
        if let Some(value) = metadata.scalar(key) {
            for param in value.params() {
                rules.check_param(param, 0, sink);
            }
        }
    }
    for element in metadata.elements() {
        let values = element.value.iter().chain(element.properties.values());
        for value in values {
            for param in value.params() {
                rules.check_param(param, element.line, sink);
            }
        }
    }
}
