//! Header line resolution: tokens to a schema and a position map.

use std::collections::{BTreeMap, HashSet};

use crate::error::{ErrorCatalog, ErrorCode, MzTabError};
use crate::metadata::{ElementKind, ElementRef, Metadata};
use crate::schema::{
    classify_header, stable_columns, AbundanceRole, ColumnOrigin, ColumnSchema, ColumnSpec,
    OptionalOrigin, Section,
};

/// A resolved header line.
#[derive(Debug, Clone)]
pub(crate) struct Header {
    pub schema: ColumnSchema,
    /// Logical position of each physical field, prefix excluded
    pub positions: Vec<u32>,
}

fn abundance_of(spec: &ColumnSpec) -> Option<(ElementRef, AbundanceRole)> {
    match &spec.origin {
        ColumnOrigin::Optional(OptionalOrigin::Abundance { element, role }) => {
            Some((*element, *role))
        }
        _ => None,
    }
}

/// Build the schema of `section` from its header tokens.
///
/// Structural problems are returned as the fatal error. Column unit
/// declarations that cannot be attached are pushed to `diagnostics`.
pub(crate) fn resolve_header(
    section: Section,
    tokens: &[&str],
    line: usize,
    metadata: &Metadata,
    catalog: &ErrorCatalog,
    diagnostics: &mut Vec<MzTabError>,
) -> Result<Header, MzTabError> {
    let mut schema = ColumnSchema::new(section);
    let mut positions = Vec::with_capacity(tokens.len());
    let mut seen: HashSet<String> = HashSet::with_capacity(tokens.len());
    let mut groups: BTreeMap<ElementRef, Vec<AbundanceRole>> = BTreeMap::new();

    for token in tokens {
        let token = token.trim();
        let Some(spec) = classify_header(section, token) else {
            let code = if token.contains("_abundance_") {
                ErrorCode::AbundanceColumn
            } else {
                ErrorCode::HeaderColumn
            };
            return Err(catalog.error(code, line, [token, section.name()]));
        };

        if !seen.insert(spec.header.clone()) {
            return Err(match abundance_of(&spec) {
                Some((element, _)) => catalog.error(
                    ErrorCode::AbundanceColumnSameId,
                    line,
                    [element.to_string(), section.to_string()],
                ),
                None => catalog.error(
                    ErrorCode::HeaderLine,
                    line,
                    [spec.header.as_str(), section.name()],
                ),
            });
        }
        if let Some((element, role)) = abundance_of(&spec) {
            groups.entry(element).or_default().push(role);
        }

        let position = schema
            .add_spec(&spec)
            .map_err(|_| catalog.error(ErrorCode::HeaderColumn, line, [token, section.name()]))?;
        positions.push(position);
    }

    for (header, _) in stable_columns(section) {
        if !seen.contains(*header) {
            return Err(catalog.error(
                ErrorCode::StableColumnMissing,
                line,
                [section.name(), *header],
            ));
        }
    }

    for (element, roles) in &groups {
        if element.kind != ElementKind::StudyVariable {
            continue;
        }
        let missing = [
            AbundanceRole::Value,
            AbundanceRole::Stdev,
            AbundanceRole::StdError,
        ]
        .into_iter()
        .find(|role| !roles.contains(role));
        if let Some(role) = missing {
            let header = OptionalOrigin::Abundance {
                element: *element,
                role,
            }
            .header(section);
            return Err(catalog.error(
                ErrorCode::AbundanceColumnTogether,
                line,
                [element.to_string(), header],
            ));
        }
    }

    for unit in metadata.col_units(section) {
        if schema
            .set_column_unit(&unit.column, unit.param.clone())
            .is_err()
        {
            diagnostics.push(catalog.error(
                ErrorCode::ColUnit,
                line,
                [format!("colunit-{}", section.name()), unit.to_string()],
            ));
        }
    }

    Ok(Header { schema, positions })
}
