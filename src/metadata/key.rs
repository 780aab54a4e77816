use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::element::{ElementKind, ElementRef, PropertyKey};
use crate::codec::ValueType;
use crate::schema::Section;

/// Metadata keys that are not bound to an indexed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScalarKey {
    Version,
    Mode,
    Type,
    Id,
    Title,
    Description,
    QuantificationMethod,
    ProteinQuantificationUnit,
    PeptideQuantificationUnit,
    SmallMoleculeQuantificationUnit,
    FalseDiscoveryRate,
}

impl ScalarKey {
    /// Keys in the order they are written.
    pub const ALL: [ScalarKey; 11] = [
        ScalarKey::Version,
        ScalarKey::Mode,
        ScalarKey::Type,
        ScalarKey::Id,
        ScalarKey::Title,
        ScalarKey::Description,
        ScalarKey::QuantificationMethod,
        ScalarKey::ProteinQuantificationUnit,
        ScalarKey::PeptideQuantificationUnit,
        ScalarKey::SmallMoleculeQuantificationUnit,
        ScalarKey::FalseDiscoveryRate,
    ];

    pub fn key_name(&self) -> &'static str {
        match self {
            ScalarKey::Version => "mzTab-version",
            ScalarKey::Mode => "mzTab-mode",
            ScalarKey::Type => "mzTab-type",
            ScalarKey::Id => "mzTab-ID",
            ScalarKey::Title => "title",
            ScalarKey::Description => "description",
            ScalarKey::QuantificationMethod => "quantification_method",
            ScalarKey::ProteinQuantificationUnit => "protein-quantification_unit",
            ScalarKey::PeptideQuantificationUnit => "peptide-quantification_unit",
            ScalarKey::SmallMoleculeQuantificationUnit => "small_molecule-quantification_unit",
            ScalarKey::FalseDiscoveryRate => "false_discovery_rate",
        }
    }

    pub fn from_key_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.key_name() == name)
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            ScalarKey::Version
            | ScalarKey::Id
            | ScalarKey::Title
            | ScalarKey::Description => ValueType::String,
            ScalarKey::Mode => ValueType::Mode,
            ScalarKey::Type => ValueType::Type,
            ScalarKey::QuantificationMethod
            | ScalarKey::ProteinQuantificationUnit
            | ScalarKey::PeptideQuantificationUnit
            | ScalarKey::SmallMoleculeQuantificationUnit => ValueType::Param,
            ScalarKey::FalseDiscoveryRate => ValueType::ParamList,
        }
    }
}

/// A parsed metadata key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MetadataKey {
    Scalar(ScalarKey),
    /// `{element}[{id}]` or `{element}[{id}]-{property}`
    Element {
        element: ElementRef,
        property: Option<PropertyKey>,
    },
    /// `colunit-{section}`
    ColUnit(Section),
}

impl MetadataKey {
    /// Type of the value assigned to this key.
    pub fn value_type(&self) -> ValueType {
        match self {
            MetadataKey::Scalar(key) => key.value_type(),
            MetadataKey::Element {
                element,
                property: None,
            } => element.kind.value_type().unwrap_or(ValueType::String),
            MetadataKey::Element {
                element,
                property: Some(property),
            } => element
                .kind
                .property_type(property)
                .unwrap_or(ValueType::String),
            MetadataKey::ColUnit(_) => ValueType::ColUnit,
        }
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataKey::Scalar(key) => f.write_str(key.key_name()),
            MetadataKey::Element { element, property } => {
                write!(f, "{}", element)?;
                if let Some(property) = property {
                    write!(f, "-{}", property)?;
                }
                Ok(())
            }
            MetadataKey::ColUnit(section) => write!(f, "colunit-{}", section.name()),
        }
    }
}

/// Reasons a metadata key is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// Not a scalar key, a known element property or a colunit declaration
    #[error("unknown metadata key \"{0}\"")]
    Unknown(String),
    /// Element id missing, zero or not an integer
    #[error("\"{0}\" does not carry a positive integer element id")]
    ElementId(String),
}

fn is_property_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_lowercase() || b == b'_')
}

fn parse_property(text: &str) -> Option<PropertyKey> {
    let Some(open) = text.find('[') else {
        return is_property_name(text).then(|| PropertyKey::new(text));
    };
    let close = open + text[open..].find(']')?;
    let name = &text[..open];
    let index = text[open + 1..close].parse::<u32>().ok().filter(|&i| i > 0)?;
    if !is_property_name(name) {
        return None;
    }
    let key = PropertyKey::indexed(name, index);
    match &text[close + 1..] {
        "" => Some(key),
        rest => {
            let sub = rest.strip_prefix('-')?;
            is_property_name(sub).then(|| key.with_sub(sub))
        }
    }
}

impl FromStr for MetadataKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        let unknown = || KeyError::Unknown(key.to_string());

        if let Some(scalar) = ScalarKey::from_key_name(key) {
            return Ok(MetadataKey::Scalar(scalar));
        }
        if let Some(section) = key.strip_prefix("colunit-") {
            return Section::from_name(section)
                .map(MetadataKey::ColUnit)
                .ok_or_else(unknown);
        }

        let open = key.find('[').ok_or_else(unknown)?;
        let kind = ElementKind::from_key_name(&key[..open]).ok_or_else(unknown)?;
        let close = open
            + key[open..]
                .find(']')
                .ok_or_else(|| KeyError::ElementId(key.to_string()))?;
        let id = match key[open + 1..close].parse::<u32>() {
            Ok(id) if id > 0 => id,
            _ => return Err(KeyError::ElementId(key.to_string())),
        };
        let element = ElementRef::new(kind, id);

        let property = match &key[close + 1..] {
            "" => {
                kind.value_type().ok_or_else(unknown)?;
                None
            }
            rest => {
                let property = rest
                    .strip_prefix('-')
                    .and_then(parse_property)
                    .ok_or_else(unknown)?;
                kind.property_type(&property).ok_or_else(unknown)?;
                Some(property)
            }
        };
        Ok(MetadataKey::Element { element, property })
    }
}
