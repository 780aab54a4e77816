use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

use super::column::{
    AbundanceRole, Column, ColumnOrigin, FixedColumn, MsRunProperty, OptionalOrigin,
};
use super::stable::stable_columns;
use super::{SchemaError, Section};
use crate::codec::{Param, ValueType};
use crate::metadata::{ElementKind, ElementRef};

/// Ordered column layout of one section.
///
/// Stable columns are seeded at construction and always hold the lowest
/// logical positions. Optional columns follow in insertion order. Lookup by
/// header goes through the ordered map, lookup by position through a
/// secondary index; both are O(1).
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSchema {
    section: Section,
    columns: IndexMap<String, Column>,
    #[serde(skip)]
    by_position: HashMap<u32, usize>,
    stable_count: usize,
}

impl PartialEq for ColumnSchema {
    fn eq(&self, other: &Self) -> bool {
        self.section == other.section
            && self.columns.len() == other.columns.len()
            && self.columns.values().eq(other.columns.values())
    }
}

impl ColumnSchema {
    /// Schema for `section` holding its stable columns.
    pub fn new(section: Section) -> Self {
        let mut schema = Self {
            section,
            columns: IndexMap::new(),
            by_position: HashMap::new(),
            stable_count: 0,
        };
        schema.add_stable_columns();
        schema
    }

    fn add_stable_columns(&mut self) {
        for (header, value_type) in stable_columns(self.section) {
            self.push(header.to_string(), *value_type, ColumnOrigin::Stable);
        }
        self.stable_count = self.columns.len();
    }

    fn push(&mut self, header: String, value_type: ValueType, origin: ColumnOrigin) -> u32 {
        if let Some(existing) = self.columns.get(&header) {
            return existing.position;
        }
        let position = self.columns.len() as u32 + 1;
        self.by_position.insert(position, self.columns.len());
        self.columns.insert(
            header.clone(),
            Column {
                position,
                header,
                value_type,
                origin,
                unit: None,
            },
        );
        position
    }

    fn push_optional(&mut self, origin: OptionalOrigin, value_type: ValueType) -> u32 {
        let header = origin.header(self.section);
        self.push(header, value_type, ColumnOrigin::Optional(origin))
    }

    pub fn section(&self) -> Section {
        self.section
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn stable_count(&self) -> usize {
        self.stable_count
    }

    pub fn optional_count(&self) -> usize {
        self.columns.len() - self.stable_count
    }

    /// Columns in logical order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    pub fn optional_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values().skip(self.stable_count)
    }

    pub fn find_by_header(&self, header: &str) -> Option<&Column> {
        self.columns.get(header)
    }

    pub fn column_at(&self, position: u32) -> Option<&Column> {
        self.by_position
            .get(&position)
            .and_then(|&index| self.columns.get_index(index))
            .map(|(_, column)| column)
    }

    /// Add `opt_{owner}_{name}`, owner `None` meaning `global`.
    pub fn add_optional_column(
        &mut self,
        owner: Option<ElementRef>,
        name: &str,
        value_type: ValueType,
    ) -> u32 {
        self.push_optional(
            OptionalOrigin::Plain {
                owner,
                name: name.to_string(),
            },
            value_type,
        )
    }

    /// Add `opt_{owner}_cv_{accession}_{name}`.
    pub fn add_cv_optional_column(
        &mut self,
        owner: Option<ElementRef>,
        param: &Param,
        value_type: ValueType,
    ) -> Result<u32, SchemaError> {
        if param.accession.is_none() {
            return Err(SchemaError::CvParamWithoutAccession(param.to_string()));
        }
        Ok(self.push_optional(
            OptionalOrigin::Cv {
                owner,
                param: param.clone(),
            },
            value_type,
        ))
    }

    pub fn add_fixed_optional_column(&mut self, column: FixedColumn) -> u32 {
        self.push_optional(OptionalOrigin::Fixed(column), column.value_type())
    }

    /// Add `{property}_ms_run[{ms_run}]`; protein section only.
    pub fn add_ms_run_column(
        &mut self,
        property: MsRunProperty,
        ms_run: u32,
    ) -> Result<u32, SchemaError> {
        let origin = OptionalOrigin::MsRun { property, ms_run };
        if self.section != Section::Protein || ms_run == 0 {
            return Err(SchemaError::NotInSection {
                column: origin.header(self.section),
                section: self.section,
            });
        }
        Ok(self.push_optional(origin, ValueType::Integer))
    }

    /// Add a search engine score column.
    ///
    /// In the PSM section this is `search_engine_score[n]` and `ms_run` must
    /// be `None`. Elsewhere `None` adds `best_search_engine_score[n]` and
    /// `Some(m)` adds `search_engine_score[n]_ms_run[m]`.
    pub fn add_search_engine_score_column(
        &mut self,
        score: u32,
        ms_run: Option<u32>,
    ) -> Result<u32, SchemaError> {
        let best = self.section != Section::Psm && ms_run.is_none();
        let origin = OptionalOrigin::SearchEngineScore {
            score,
            ms_run,
            best,
        };
        if score == 0 || ms_run == Some(0) || (self.section == Section::Psm && ms_run.is_some()) {
            return Err(SchemaError::NotInSection {
                column: origin.header(self.section),
                section: self.section,
            });
        }
        Ok(self.push_optional(origin, ValueType::Double))
    }

    /// Add the abundance columns of an assay (one column) or a study
    /// variable (value, stdev and std_error, inserted together).
    pub fn add_abundance_columns(&mut self, element: ElementRef) -> Result<Vec<u32>, SchemaError> {
        if self.section.abundance_prefix().is_none() {
            return Err(SchemaError::NotInSection {
                column: format!("abundance of {}", element),
                section: self.section,
            });
        }
        let roles: &[AbundanceRole] = match element.kind {
            ElementKind::Assay => &[AbundanceRole::Value],
            ElementKind::StudyVariable => &[
                AbundanceRole::Value,
                AbundanceRole::Stdev,
                AbundanceRole::StdError,
            ],
            _ => return Err(SchemaError::AbundanceElement(element)),
        };
        Ok(roles
            .iter()
            .map(|&role| {
                self.push_optional(OptionalOrigin::Abundance { element, role }, ValueType::Double)
            })
            .collect())
    }

    /// Add the column described by a classified header; stable columns
    /// resolve to their seeded position.
    pub fn add_spec(&mut self, spec: &ColumnSpec) -> Result<u32, SchemaError> {
        match &spec.origin {
            ColumnOrigin::Stable => self
                .find_by_header(&spec.header)
                .map(|c| c.position)
                .ok_or_else(|| SchemaError::UnknownColumn(spec.header.clone())),
            ColumnOrigin::Optional(OptionalOrigin::Abundance { element, .. }) => {
                self.add_abundance_columns(*element)?;
                self.find_by_header(&spec.header)
                    .map(|c| c.position)
                    .ok_or_else(|| SchemaError::UnknownColumn(spec.header.clone()))
            }
            ColumnOrigin::Optional(origin) => Ok(self.push_optional(origin.clone(), spec.value_type)),
        }
    }

    /// Attach a unit to a column. Abundance columns take their unit from
    /// the `*-quantification_unit` metadata and cannot carry one.
    pub fn set_column_unit(&mut self, header: &str, unit: Param) -> Result<(), SchemaError> {
        let column = self
            .columns
            .get_mut(header)
            .ok_or_else(|| SchemaError::UnknownColumn(header.to_string()))?;
        if column.is_abundance() {
            return Err(SchemaError::AbundanceUnit(header.to_string()));
        }
        column.unit = Some(unit);
        Ok(())
    }
}

/// A header token resolved to the column it declares.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub header: String,
    pub value_type: ValueType,
    pub origin: ColumnOrigin,
}

impl ColumnSpec {
    fn optional(section: Section, origin: OptionalOrigin, value_type: ValueType) -> Self {
        Self {
            header: origin.header(section),
            value_type,
            origin: ColumnOrigin::Optional(origin),
        }
    }
}

/// Parse `{name}[{n}]` at the start of `text`, returning `n` and the rest.
fn bracket_id<'a>(text: &'a str, name: &str) -> Option<(u32, &'a str)> {
    let rest = text.strip_prefix(name)?.strip_prefix('[')?;
    let close = rest.find(']')?;
    let id = rest[..close].parse::<u32>().ok().filter(|&id| id > 0)?;
    Some((id, &rest[close + 1..]))
}

fn classify_optional(section: Section, token: &str) -> Option<ColumnSpec> {
    let rest = token.strip_prefix("opt_")?;
    let (owner, rest) = match rest.strip_prefix("global_") {
        Some(rest) => (None, rest),
        None => {
            let close = rest.find(']')?;
            let owner = rest[..=close].parse::<ElementRef>().ok()?;
            (Some(owner), rest[close + 1..].strip_prefix('_')?)
        }
    };
    if rest.is_empty() {
        return None;
    }
    let origin = match rest.strip_prefix("cv_") {
        Some(cv) => {
            let (accession, name) = cv.split_once('_')?;
            let (label, _) = accession.split_once(':')?;
            if name.is_empty() {
                return None;
            }
            OptionalOrigin::Cv {
                owner,
                param: Param::cv(label, accession, &name.replace('_', " ")),
            }
        }
        None => OptionalOrigin::Plain {
            owner,
            name: rest.to_string(),
        },
    };
    Some(ColumnSpec::optional(section, origin, ValueType::String))
}

fn classify_score(section: Section, token: &str) -> Option<ColumnSpec> {
    let origin = if let Some((score, "")) = bracket_id(token, "best_search_engine_score") {
        (section != Section::Psm).then_some(OptionalOrigin::SearchEngineScore {
            score,
            ms_run: None,
            best: true,
        })?
    } else {
        let (score, rest) = bracket_id(token, "search_engine_score")?;
        match (section, rest) {
            (Section::Psm, "") => OptionalOrigin::SearchEngineScore {
                score,
                ms_run: None,
                best: false,
            },
            (Section::Psm, _) => return None,
            (_, rest) => {
                let (ms_run, "") = bracket_id(rest, "_ms_run")? else {
                    return None;
                };
                OptionalOrigin::SearchEngineScore {
                    score,
                    ms_run: Some(ms_run),
                    best: false,
                }
            }
        }
    };
    Some(ColumnSpec::optional(section, origin, ValueType::Double))
}

fn classify_abundance(section: Section, token: &str) -> Option<ColumnSpec> {
    let rest = token
        .strip_prefix(section.abundance_prefix()?)?
        .strip_prefix("_abundance_")?;
    let (kind, role, rest) = if let Some(rest) = rest.strip_prefix("stdev_") {
        (ElementKind::StudyVariable, AbundanceRole::Stdev, rest)
    } else if let Some(rest) = rest.strip_prefix("std_error_") {
        (ElementKind::StudyVariable, AbundanceRole::StdError, rest)
    } else if rest.starts_with("assay[") {
        (ElementKind::Assay, AbundanceRole::Value, rest)
    } else {
        (ElementKind::StudyVariable, AbundanceRole::Value, rest)
    };
    let (id, "") = bracket_id(rest, kind.key_name())? else {
        return None;
    };
    let origin = OptionalOrigin::Abundance {
        element: ElementRef::new(kind, id),
        role,
    };
    Some(ColumnSpec::optional(section, origin, ValueType::Double))
}

/// Resolve a header token of `section` to the column it declares, or `None`
/// when the token is not a valid column of that section.
pub fn classify_header(section: Section, token: &str) -> Option<ColumnSpec> {
    let token = token.trim();
    if let Some((header, value_type)) = stable_columns(section).iter().find(|(h, _)| *h == token) {
        return Some(ColumnSpec {
            header: header.to_string(),
            value_type: *value_type,
            origin: ColumnOrigin::Stable,
        });
    }
    if let Some(fixed) = FixedColumn::from_header(token) {
        return Some(ColumnSpec::optional(
            section,
            OptionalOrigin::Fixed(fixed),
            fixed.value_type(),
        ));
    }
    if token.starts_with("opt_") {
        return classify_optional(section, token);
    }
    if token.contains("search_engine_score") {
        return classify_score(section, token);
    }
    if token.contains("_abundance_") {
        return classify_abundance(section, token);
    }
    if section == Section::Protein {
        let (property, ms_run) = token.split_once("_ms_run[")?;
        let property = MsRunProperty::from_name(property)?;
        let ms_run = ms_run.strip_suffix(']')?.parse::<u32>().ok().filter(|&n| n > 0)?;
        return Some(ColumnSpec::optional(
            section,
            OptionalOrigin::MsRun { property, ms_run },
            ValueType::Integer,
        ));
    }
    None
}
