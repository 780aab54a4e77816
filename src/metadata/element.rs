use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Serialize;

use crate::codec::{Value, ValueType};

/// Kind of an indexed metadata element, `{kind}[{id}]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Publication,
    Contact,
    Uri,
    Instrument,
    Software,
    SampleProcessing,
    ProteinSearchEngineScore,
    PeptideSearchEngineScore,
    PsmSearchEngineScore,
    SmallMoleculeSearchEngineScore,
    FixedMod,
    VariableMod,
    MsRun,
    Sample,
    Assay,
    StudyVariable,
    Cv,
    Custom,
}

impl ElementKind {
    pub const ALL: [ElementKind; 18] = [
        ElementKind::Publication,
        ElementKind::Contact,
        ElementKind::Uri,
        ElementKind::Instrument,
        ElementKind::Software,
        ElementKind::SampleProcessing,
        ElementKind::ProteinSearchEngineScore,
        ElementKind::PeptideSearchEngineScore,
        ElementKind::PsmSearchEngineScore,
        ElementKind::SmallMoleculeSearchEngineScore,
        ElementKind::FixedMod,
        ElementKind::VariableMod,
        ElementKind::MsRun,
        ElementKind::Sample,
        ElementKind::Assay,
        ElementKind::StudyVariable,
        ElementKind::Cv,
        ElementKind::Custom,
    ];

    /// Name used in metadata keys and column headers.
    pub fn key_name(&self) -> &'static str {
        match self {
            ElementKind::MsRun => "ms_run",
            ElementKind::Assay => "assay",
            ElementKind::StudyVariable => "study_variable",
            ElementKind::Sample => "sample",
            ElementKind::Instrument => "instrument",
            ElementKind::Software => "software",
            ElementKind::Contact => "contact",
            ElementKind::Publication => "publication",
            ElementKind::Uri => "uri",
            ElementKind::FixedMod => "fixed_mod",
            ElementKind::VariableMod => "variable_mod",
            ElementKind::SampleProcessing => "sample_processing",
            ElementKind::Cv => "cv",
            ElementKind::Custom => "custom",
            ElementKind::ProteinSearchEngineScore => "protein_search_engine_score",
            ElementKind::PeptideSearchEngineScore => "peptide_search_engine_score",
            ElementKind::PsmSearchEngineScore => "psm_search_engine_score",
            ElementKind::SmallMoleculeSearchEngineScore => "smallmolecule_search_engine_score",
        }
    }

    pub fn from_key_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.key_name() == name)
    }

    /// Type of a value assigned directly to the element, `software[1]\t[MS, ...]`.
    pub fn value_type(&self) -> Option<ValueType> {
        use ElementKind::*;
        match self {
            Software | FixedMod | VariableMod | Custom | ProteinSearchEngineScore
            | PeptideSearchEngineScore | PsmSearchEngineScore | SmallMoleculeSearchEngineScore => {
                Some(ValueType::Param)
            }
            Publication => Some(ValueType::Publication),
            Uri => Some(ValueType::Uri),
            SampleProcessing => Some(ValueType::ParamList),
            MsRun | Assay | StudyVariable | Sample | Instrument | Contact | Cv => None,
        }
    }

    /// Type of a property, or `None` when the element has no such property.
    pub fn property_type(&self, key: &PropertyKey) -> Option<ValueType> {
        use ElementKind::*;
        let indexed = key.index.is_some();
        let ty = match (self, key.name.as_str(), indexed, key.sub.as_deref()) {
            (MsRun, "format" | "id_format" | "hash_method", false, None) => ValueType::Param,
            (MsRun, "location", false, None) => ValueType::Uri,
            (MsRun, "fragmentation_method", false, None) => ValueType::ParamList,
            (MsRun, "hash", false, None) => ValueType::String,
            (Assay, "quantification_reagent", false, None) => ValueType::Param,
            (Assay, "sample_ref", false, None) => ValueType::ElementRef(Sample),
            (Assay, "ms_run_ref", false, None) => ValueType::ElementRef(MsRun),
            (Assay, "quantification_mod", true, None) => ValueType::Param,
            (Assay, "quantification_mod", true, Some("site" | "position")) => ValueType::String,
            (StudyVariable, "assay_refs", false, None) => ValueType::ElementRefList(Assay),
            (StudyVariable, "sample_refs", false, None) => ValueType::ElementRefList(Sample),
            (StudyVariable, "description", false, None) => ValueType::String,
            (Sample, "species" | "tissue" | "cell_type" | "disease" | "custom", true, None) => {
                ValueType::Param
            }
            (Sample, "description", false, None) => ValueType::String,
            (Instrument, "name" | "source" | "detector", false, None) => ValueType::Param,
            (Instrument, "analyzer", true, None) => ValueType::Param,
            (Software, "setting", true, None) => ValueType::String,
            (Contact, "name" | "affiliation", false, None) => ValueType::String,
            (Contact, "email", false, None) => ValueType::Email,
            (FixedMod | VariableMod, "site" | "position", false, None) => ValueType::String,
            (Cv, "label" | "full_name" | "version", false, None) => ValueType::String,
            (Cv, "url", false, None) => ValueType::Url,
            _ => return None,
        };
        Some(ty)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_name())
    }
}

/// Reference to an indexed element, `{kind}[{id}]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ElementRef {
    pub kind: ElementKind,
    pub id: u32,
}

impl ElementRef {
    pub fn new(kind: ElementKind, id: u32) -> Self {
        Self { kind, id }
    }

    pub fn ms_run(id: u32) -> Self {
        Self::new(ElementKind::MsRun, id)
    }

    pub fn assay(id: u32) -> Self {
        Self::new(ElementKind::Assay, id)
    }

    pub fn study_variable(id: u32) -> Self {
        Self::new(ElementKind::StudyVariable, id)
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.kind, self.id)
    }
}

/// Reasons an element reference failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ElementRefParseError {
    /// Not of the form `name[id]`, or `name` is not an element kind
    #[error("\"{0}\" is not an element reference")]
    Syntax(String),
    /// Known kind but the id is not a positive integer
    #[error("\"{0}\" does not carry a positive integer id")]
    Id(String),
}

impl FromStr for ElementRef {
    type Err = ElementRefParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let syntax = || ElementRefParseError::Syntax(s.to_string());
        let open = s.find('[').ok_or_else(syntax)?;
        let inner = s[open + 1..].strip_suffix(']').ok_or_else(syntax)?;
        let kind = ElementKind::from_key_name(&s[..open]).ok_or_else(syntax)?;
        match inner.parse::<u32>() {
            Ok(id) if id > 0 => Ok(ElementRef::new(kind, id)),
            _ => Err(ElementRefParseError::Id(s.to_string())),
        }
    }
}

/// Property of an indexed element: `name`, `name[index]` or `name[index]-sub`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PropertyKey {
    pub name: String,
    pub index: Option<u32>,
    pub sub: Option<String>,
}

impl PropertyKey {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            index: None,
            sub: None,
        }
    }

    pub fn indexed(name: &str, index: u32) -> Self {
        Self {
            name: name.to_string(),
            index: Some(index),
            sub: None,
        }
    }

    pub fn with_sub(mut self, sub: &str) -> Self {
        self.sub = Some(sub.to_string());
        self
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(index) = self.index {
            write!(f, "[{}]", index)?;
        }
        if let Some(sub) = &self.sub {
            write!(f, "-{}", sub)?;
        }
        Ok(())
    }
}

/// A declared metadata element with its directly assigned value and properties.
#[derive(Debug, Clone, Serialize)]
pub struct IndexedElement {
    pub kind: ElementKind,
    pub id: u32,
    pub value: Option<Value>,
    pub properties: IndexMap<PropertyKey, Value>,
    /// Line the element was first declared on, 0 when built programmatically
    #[serde(skip)]
    pub line: usize,
}

// Equality ignores the declaration line.
impl PartialEq for IndexedElement {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.id == other.id
            && self.value == other.value
            && self.properties == other.properties
    }
}

impl IndexedElement {
    pub fn new(kind: ElementKind, id: u32) -> Self {
        Self {
            kind,
            id,
            value: None,
            properties: IndexMap::new(),
            line: 0,
        }
    }

    pub fn element_ref(&self) -> ElementRef {
        ElementRef::new(self.kind, self.id)
    }

    /// Assign the element value, returning the previous one.
    pub fn set_value(&mut self, value: Value) -> Option<Value> {
        self.value.replace(value)
    }

    /// Assign a property, returning the previous value.
    pub fn set_property(&mut self, key: PropertyKey, value: Value) -> Option<Value> {
        self.properties.insert(key, value)
    }

    /// Value of an unindexed property such as `location`.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(&PropertyKey::new(name))
    }

    /// True when the property is present and not `null`.
    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some_and(|v| !v.is_null())
    }

    /// All properties sharing a name, indexed ones included.
    pub fn properties_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (&'a PropertyKey, &'a Value)> + 'a {
        self.properties.iter().filter(move |(k, _)| k.name == name)
    }
}
