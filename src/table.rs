//! In-memory model of a parsed mzTab file.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::codec::Value;
use crate::metadata::Metadata;
use crate::schema::{ColumnSchema, Section};

/// One data line, keyed by logical column position.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Record {
    /// Line the record was read from, 0 when built programmatically
    #[serde(skip)]
    pub line: usize,
    values: BTreeMap<u32, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, position: u32) -> Option<&Value> {
        self.values.get(&position)
    }

    pub fn set(&mut self, position: u32, value: Value) {
        self.values.insert(position, value);
    }

    /// Values in logical order.
    pub fn values(&self) -> impl Iterator<Item = (u32, &Value)> {
        self.values.iter().map(|(p, v)| (*p, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// Unset positions compare equal to `null`; the declaration line is ignored.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        let null = Value::Null;
        self.values
            .keys()
            .chain(other.values.keys())
            .all(|p| self.get(*p).unwrap_or(&null) == other.get(*p).unwrap_or(&null))
    }
}

/// A section's schema and its records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionTable {
    pub section: Section,
    pub schema: ColumnSchema,
    pub records: Vec<Record>,
}

impl SectionTable {
    pub fn new(schema: ColumnSchema) -> Self {
        Self {
            section: schema.section(),
            schema,
            records: Vec::new(),
        }
    }

    /// Value of the column named `header` in `record`.
    pub fn value<'a>(&self, record: &'a Record, header: &str) -> Option<&'a Value> {
        self.schema
            .find_by_header(header)
            .and_then(|column| record.get(column.position))
    }

    /// Build a record from `(header, value)` pairs. Unknown headers are ignored;
    /// unset columns stay `null` when written.
    pub fn push_row<'h, I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = (&'h str, Value)>,
    {
        let mut record = Record::new();
        for (header, value) in cells {
            if let Some(column) = self.schema.find_by_header(header) {
                record.set(column.position, value);
            }
        }
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A comment line, kept verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub line: usize,
    pub text: String,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            line: 0,
            text: text.into(),
        }
    }
}

impl PartialEq for Comment {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

/// A parsed or programmatically built mzTab file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MzTabFile {
    pub metadata: Metadata,
    pub protein: Option<SectionTable>,
    pub peptide: Option<SectionTable>,
    pub psm: Option<SectionTable>,
    pub small_molecule: Option<SectionTable>,
    pub comments: Vec<Comment>,
}

impl MzTabFile {
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            ..Self::default()
        }
    }

    pub fn table(&self, section: Section) -> Option<&SectionTable> {
        match section {
            Section::Protein => self.protein.as_ref(),
            Section::Peptide => self.peptide.as_ref(),
            Section::Psm => self.psm.as_ref(),
            Section::SmallMolecule => self.small_molecule.as_ref(),
        }
    }

    pub fn table_mut(&mut self, section: Section) -> &mut Option<SectionTable> {
        match section {
            Section::Protein => &mut self.protein,
            Section::Peptide => &mut self.peptide,
            Section::Psm => &mut self.psm,
            Section::SmallMolecule => &mut self.small_molecule,
        }
    }

    /// Populated sections in file order.
    pub fn tables(&self) -> impl Iterator<Item = &SectionTable> {
        Section::ALL.into_iter().filter_map(move |s| self.table(s))
    }
}
