//! Agreement between a section header and the metadata.

use std::collections::BTreeSet;

use super::metadata::undefined_element;
use super::Rules;
use crate::error::{ErrorCode, MzTabError};
use crate::metadata::{ElementKind, ElementRef, Metadata, MzTabMode, MzTabType};
use crate::schema::{ColumnSchema, OptionalOrigin, Section};

/// Element-bound columns need a declared element; search engine score
/// columns need a declared `{section}_search_engine_score[n]`. Each missing
/// element is reported once, against the first column that uses it.
pub fn check_header(
    metadata: &Metadata,
    schema: &ColumnSchema,
    line: usize,
    rules: &Rules<'_>,
    sink: &mut Vec<MzTabError>,
) {
    let section = schema.section();
    let mut reported = BTreeSet::new();

    for column in schema.optional_columns() {
        if let Some(element) = column.element() {
            if !metadata.contains(element) && reported.insert(element) {
                sink.extend(undefined_element(
                    element,
                    &format!("column {}", column.header),
                    line,
                    rules,
                ));
            }
        }

        if let Some(OptionalOrigin::SearchEngineScore { score, .. }) = column.optional_origin() {
            let declaration = ElementRef::new(section.search_engine_score_kind(), *score);
            if !metadata.contains(declaration) && reported.insert(declaration) {
                sink.extend(rules.error(
                    ErrorCode::NotDefineInMetadata,
                    line,
                    [
                        declaration.to_string(),
                        format!("needed by column {}", column.header),
                    ],
                ));
            }
        }

        if let Some(OptionalOrigin::Cv { param, .. }) = column.optional_origin() {
            rules.check_param(param, line, sink);
        }
        if let Some(unit) = &column.unit {
            rules.check_param(unit, line, sink);
        }
    }
}

/// Assays and study variables declared in a Quantification file but given
/// no abundance column in a quantified section.
///
/// Study variables are always expected; assays only in Complete mode. PSM
/// sections and sections without any abundance column are not checked.
pub fn check_unused_elements(
    metadata: &Metadata,
    schema: &ColumnSchema,
    line: usize,
    rules: &Rules<'_>,
    sink: &mut Vec<MzTabError>,
) {
    let section = schema.section();
    if section == Section::Psm
        || metadata.mz_tab_type() != Some(MzTabType::Quantification)
        || !rules.enabled(ErrorCode::NotDefineInHeader)
    {
        return;
    }

    let used: BTreeSet<ElementRef> = schema
        .optional_columns()
        .filter(|c| c.is_abundance())
        .filter_map(|c| c.element())
        .collect();
    if used.is_empty() {
        return;
    }

    let mut kinds = vec![ElementKind::StudyVariable];
    if metadata.mode() == Some(MzTabMode::Complete) {
        kinds.insert(0, ElementKind::Assay);
    }
    let context = format!("{} abundance", section);
    for kind in kinds {
        for element in metadata.elements_of(kind) {
            let element = element.element_ref();
            if !used.contains(&element) {
                sink.extend(rules.error(
                    ErrorCode::NotDefineInHeader,
                    line,
                    [element.to_string(), context.clone()],
                ));
            }
        }
    }
}
