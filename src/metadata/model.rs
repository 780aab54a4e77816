use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use super::element::{ElementKind, ElementRef, IndexedElement};
use super::key::{KeyError, MetadataKey, ScalarKey};
use crate::codec::{decode, ColUnit, Value, ValueType};
use crate::error::{ErrorCatalog, ErrorCode, Outcome};
use crate::schema::Section;

/// Level of detail a file reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MzTabMode {
    Summary,
    Complete,
}

impl fmt::Display for MzTabMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MzTabMode::Summary => f.write_str("Summary"),
            MzTabMode::Complete => f.write_str("Complete"),
        }
    }
}

impl FromStr for MzTabMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Summary" => Ok(MzTabMode::Summary),
            "Complete" => Ok(MzTabMode::Complete),
            _ => Err(()),
        }
    }
}

/// Whether a file reports identifications only or also quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MzTabType {
    Identification,
    Quantification,
}

impl fmt::Display for MzTabType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MzTabType::Identification => f.write_str("Identification"),
            MzTabType::Quantification => f.write_str("Quantification"),
        }
    }
}

impl FromStr for MzTabType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Identification" => Ok(MzTabType::Identification),
            "Quantification" => Ok(MzTabType::Quantification),
            _ => Err(()),
        }
    }
}

fn serialize_elements<S: Serializer>(
    elements: &BTreeMap<ElementRef, IndexedElement>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(elements.values())
}

/// The metadata section of an mzTab file.
///
/// Built while scanning `MTD` lines (or programmatically) and read-only once
/// the first table line is seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    scalars: IndexMap<ScalarKey, Value>,
    #[serde(serialize_with = "serialize_elements")]
    elements: BTreeMap<ElementRef, IndexedElement>,
    col_units: IndexMap<Section, Vec<ColUnit>>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty() && self.elements.is_empty() && self.col_units.is_empty()
    }

    pub fn scalar(&self, key: ScalarKey) -> Option<&Value> {
        self.scalars.get(&key)
    }

    /// Assign a scalar, returning the previous value.
    pub fn set_scalar(&mut self, key: ScalarKey, value: Value) -> Option<Value> {
        self.scalars.insert(key, value)
    }

    pub fn version(&self) -> Option<&str> {
        self.scalar(ScalarKey::Version).and_then(Value::as_str)
    }

    pub fn mode(&self) -> Option<MzTabMode> {
        match self.scalar(ScalarKey::Mode) {
            Some(Value::Mode(mode)) => Some(*mode),
            _ => None,
        }
    }

    pub fn mz_tab_type(&self) -> Option<MzTabType> {
        match self.scalar(ScalarKey::Type) {
            Some(Value::Type(ty)) => Some(*ty),
            _ => None,
        }
    }

    pub fn element(&self, element: ElementRef) -> Option<&IndexedElement> {
        self.elements.get(&element)
    }

    /// The element, created empty if it was not declared yet.
    pub fn element_mut(&mut self, element: ElementRef) -> &mut IndexedElement {
        self.elements
            .entry(element)
            .or_insert_with(|| IndexedElement::new(element.kind, element.id))
    }

    pub fn contains(&self, element: ElementRef) -> bool {
        self.elements.contains_key(&element)
    }

    /// All elements, grouped by kind and ordered by id.
    pub fn elements(&self) -> impl Iterator<Item = &IndexedElement> {
        self.elements.values()
    }

    pub fn elements_of(&self, kind: ElementKind) -> impl Iterator<Item = &IndexedElement> {
        self.elements
            .range(ElementRef::new(kind, 0)..=ElementRef::new(kind, u32::MAX))
            .map(|(_, element)| element)
    }

    /// Declared ids of one kind, ascending.
    pub fn ids(&self, kind: ElementKind) -> Vec<u32> {
        self.elements_of(kind).map(|e| e.id).collect()
    }

    pub fn col_units(&self, section: Section) -> &[ColUnit] {
        self.col_units
            .get(&section)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Declare a unit for a column of `section`. A later unit for the same
    /// column replaces the earlier one; returns true when that happened.
    pub fn add_col_unit(&mut self, section: Section, unit: ColUnit) -> bool {
        let units = self.col_units.entry(section).or_default();
        match units.iter_mut().find(|u| u.column == unit.column) {
            Some(existing) => {
                *existing = unit;
                true
            }
            None => {
                units.push(unit);
                false
            }
        }
    }

    /// Apply one `MTD` line.
    ///
    /// Unknown keys, zero element ids and unreadable mode or type make the
    /// metadata uninterpretable and are fatal. Any other value that fails to
    /// decode is stored as `null`. Redefinitions keep the later value.
    pub fn apply(
        &mut self,
        key: &str,
        value: &str,
        line: usize,
        catalog: &ErrorCatalog,
    ) -> Outcome<()> {
        let parsed = match key.parse::<MetadataKey>() {
            Ok(parsed) => parsed,
            Err(KeyError::ElementId(_)) => {
                return Outcome::Fatal(catalog.error(ErrorCode::IndexedElement, line, [key]))
            }
            Err(KeyError::Unknown(_)) => {
                return Outcome::Fatal(catalog.error(ErrorCode::MetadataKey, line, [key]))
            }
        };

        let ty = parsed.value_type();
        let (decoded, diagnostic) = match decode(value, &ty) {
            Ok(decoded) => (decoded, None),
            Err(e) if matches!(ty, ValueType::Mode | ValueType::Type) => {
                return Outcome::Fatal(e.to_error(catalog, line, key))
            }
            Err(e) => (Value::Null, Some(e.to_error(catalog, line, key))),
        };

        let redefined = match parsed {
            MetadataKey::Scalar(scalar) => self.set_scalar(scalar, decoded).is_some(),
            MetadataKey::Element { element, property } => {
                let entry = self.element_mut(element);
                if entry.line == 0 {
                    entry.line = line;
                }
                match property {
                    None => entry.set_value(decoded).is_some(),
                    Some(property) => entry.set_property(property, decoded).is_some(),
                }
            }
            MetadataKey::ColUnit(section) => match decoded {
                Value::ColUnit(unit) => self.add_col_unit(section, unit),
                _ => false,
            },
        };

        let mut diagnostics: Vec<_> = diagnostic.into_iter().collect();
        if redefined {
            diagnostics.push(catalog.error(ErrorCode::DuplicationDefine, line, [key]));
        }
        if diagnostics.is_empty() {
            Outcome::Ok(())
        } else {
            Outcome::Recovered((), diagnostics)
        }
    }

    /// Every metadata line as `(key, value)`, scalars first, then elements,
    /// then column units.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        for key in ScalarKey::ALL {
            if let Some(value) = self.scalars.get(&key) {
                entries.push((key.key_name().to_string(), value.to_string()));
            }
        }
        for element in self.elements.values() {
            let element_ref = element.element_ref();
            if let Some(value) = &element.value {
                entries.push((element_ref.to_string(), value.to_string()));
            }
            for (property, value) in &element.properties {
                entries.push((format!("{}-{}", element_ref, property), value.to_string()));
            }
        }
        for (section, units) in &self.col_units {
            for unit in units {
                entries.push((format!("colunit-{}", section.name()), unit.to_string()));
            }
        }
        entries
    }
}
