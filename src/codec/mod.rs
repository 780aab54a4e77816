//! # Value codec
//!
//! Decoding and encoding of every textual value that can appear in an mzTab
//! metadata value or table cell. [`decode`] turns raw text into a typed
//! [`Value`] for a given [`ValueType`]; `Display` on [`Value`] writes it back.
//!
//! `null` (in any case) decodes to [`Value::Null`] for every type. A decode
//! failure is a [`FormatError`] carrying the catalog code to report; callers
//! store `Null` in place of the value and keep going.

mod list;
mod modification;
mod param;
mod primitive;
mod spectra_ref;


use std::fmt;

use serde::Serialize;

use crate::error::{ErrorCatalog, ErrorCode, MzTabError};
use crate::metadata::{ElementKind, ElementRef, MzTabMode, MzTabType};

pub use list::SplitList;
pub(crate) use list::{find_top_level, split_top_level};
pub use modification::{
    ChemMod, Modification, ModificationKind, ModificationParseError, ModificationPosition,
    PositionConfidence,
};
pub use param::{Param, ParamParseError};
pub use primitive::{
    format_double, is_email, is_go_term, is_uri, is_url, parse_double, same_double,
    PublicationItem, PublicationKind, Reliability,
};
pub use spectra_ref::{SpectraRef, SpectraRefParseError};

/// Unit declared for a table column, `{column}=[param]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColUnit {
    pub column: String,
    pub param: Param,
}

impl fmt::Display for ColUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.column, self.param)
    }
}

/// Expected shape of a raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValueType {
    String,
    Integer,
    Double,
    Boolean,
    Reliability,
    Param,
    /// `|`-separated parameters
    ParamList,
    /// Strings joined by the given separator
    StringList(char),
    /// `|`-separated doubles
    DoubleList,
    GoTermList,
    ModificationList,
    SpectraRefList,
    Uri,
    Url,
    Email,
    Publication,
    ElementRef(ElementKind),
    /// `,`-separated references of one kind
    ElementRefList(ElementKind),
    Mode,
    Type,
    ColUnit,
}

impl ValueType {
    /// Catalog code reported when a value fails to decode as this type.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ValueType::String => ErrorCode::StringList,
            ValueType::Integer => ErrorCode::Integer,
            ValueType::Double | ValueType::DoubleList => ErrorCode::Double,
            ValueType::Boolean => ErrorCode::MzBoolean,
            ValueType::Reliability => ErrorCode::Reliability,
            ValueType::Param => ErrorCode::Param,
            ValueType::ParamList => ErrorCode::ParamList,
            ValueType::StringList(_) => ErrorCode::StringList,
            ValueType::GoTermList => ErrorCode::GoTermList,
            ValueType::ModificationList => ErrorCode::ModificationList,
            ValueType::SpectraRefList => ErrorCode::SpectraRef,
            ValueType::Uri => ErrorCode::Uri,
            ValueType::Url => ErrorCode::Url,
            ValueType::Email => ErrorCode::Email,
            ValueType::Publication => ErrorCode::Publication,
            ValueType::ElementRef(_) | ValueType::ElementRefList(_) => ErrorCode::ElementRef,
            ValueType::Mode => ErrorCode::MzTabMode,
            ValueType::Type => ErrorCode::MzTabType,
            ValueType::ColUnit => ErrorCode::ColUnit,
        }
    }
}

/// A decoded metadata value or table cell.
///
/// Equality compares doubles with [`same_double`], so a model holding `NaN`
/// equals the model read back from its own text.
#[derive(Debug, Clone, Serialize)]
pub enum Value {
    Null,
    String(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Reliability(Reliability),
    Param(Param),
    ParamList(SplitList<Param>),
    StringList(SplitList<String>),
    DoubleList(SplitList<f64>),
    GoTermList(SplitList<String>),
    ModificationList(SplitList<Modification>),
    SpectraRefList(SplitList<SpectraRef>),
    Uri(String),
    Url(String),
    Email(String),
    Publication(SplitList<PublicationItem>),
    ElementRef(ElementRef),
    ElementRefList(SplitList<ElementRef>),
    Mode(MzTabMode),
    Type(MzTabType),
    ColUnit(ColUnit),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Uri(s) | Value::Url(s) | Value::Email(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_param(&self) -> Option<&Param> {
        match self {
            Value::Param(p) => Some(p),
            Value::ColUnit(unit) => Some(&unit.param),
            _ => None,
        }
    }

    /// Every parameter carried by the value, for CV cross-checks.
    pub fn params(&self) -> Vec<&Param> {
        match self {
            Value::Param(p) => vec![p],
            Value::ParamList(list) => list.iter().collect(),
            Value::ColUnit(unit) => vec![&unit.param],
            _ => Vec::new(),
        }
    }

    pub fn as_modifications(&self) -> Option<&SplitList<Modification>> {
        match self {
            Value::ModificationList(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_spectra_refs(&self) -> Option<&SplitList<SpectraRef>> {
        match self {
            Value::SpectraRefList(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_element_ref(&self) -> Option<ElementRef> {
        match self {
            Value::ElementRef(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_element_refs(&self) -> Option<&SplitList<ElementRef>> {
        match self {
            Value::ElementRefList(list) => Some(list),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Double(a), Value::Double(b)) => same_double(*a, *b),
            (Value::DoubleList(a), Value::DoubleList(b)) => {
                a.separator() == b.separator()
                    && a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|(x, y)| same_double(*x, *y))
            }
            (Value::String(a), Value::String(b))
            | (Value::Uri(a), Value::Uri(b))
            | (Value::Url(a), Value::Url(b))
            | (Value::Email(a), Value::Email(b)) => a == b,
            (Value::StringList(a), Value::StringList(b))
            | (Value::GoTermList(a), Value::GoTermList(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Reliability(a), Value::Reliability(b)) => a == b,
            (Value::Param(a), Value::Param(b)) => a == b,
            (Value::ParamList(a), Value::ParamList(b)) => a == b,
            (Value::ModificationList(a), Value::ModificationList(b)) => a == b,
            (Value::SpectraRefList(a), Value::SpectraRefList(b)) => a == b,
            (Value::Publication(a), Value::Publication(b)) => a == b,
            (Value::ElementRef(a), Value::ElementRef(b)) => a == b,
            (Value::ElementRefList(a), Value::ElementRefList(b)) => a == b,
            (Value::Mode(a), Value::Mode(b)) => a == b,
            (Value::Type(a), Value::Type(b)) => a == b,
            (Value::ColUnit(a), Value::ColUnit(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::String(s) | Value::Uri(s) | Value::Url(s) | Value::Email(s) => f.write_str(s),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Double(v) => f.write_str(&format_double(*v)),
            Value::Boolean(v) => f.write_str(if *v { "1" } else { "0" }),
            Value::Reliability(r) => write!(f, "{}", r),
            Value::Param(p) => write!(f, "{}", p),
            Value::ParamList(list) => write!(f, "{}", list),
            Value::StringList(list) | Value::GoTermList(list) => write!(f, "{}", list),
            Value::DoubleList(list) => {
                let sep = list.separator().to_string();
                let items: Vec<String> = list.iter().map(|v| format_double(*v)).collect();
                f.write_str(&items.join(&sep))
            }
            Value::ModificationList(list) => write!(f, "{}", list),
            Value::SpectraRefList(list) => write!(f, "{}", list),
            Value::Publication(list) => write!(f, "{}", list),
            Value::ElementRef(r) => write!(f, "{}", r),
            Value::ElementRefList(list) => write!(f, "{}", list),
            Value::Mode(mode) => write!(f, "{}", mode),
            Value::Type(ty) => write!(f, "{}", ty),
            Value::ColUnit(unit) => write!(f, "{}", unit),
        }
    }
}

/// A raw value that does not match its expected type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{raw}\" does not decode as {code:?}")]
pub struct FormatError {
    pub code: ErrorCode,
    pub raw: String,
    /// Extra template argument, the expected element kind for references
    pub expected: Option<String>,
}

impl FormatError {
    fn new(ty: &ValueType, raw: &str) -> Self {
        let expected = match ty {
            ValueType::ElementRef(kind) | ValueType::ElementRefList(kind) => {
                Some(kind.key_name().to_string())
            }
            _ => None,
        };
        Self {
            code: ty.error_code(),
            raw: raw.to_string(),
            expected,
        }
    }

    /// Diagnostic for the value of `field` on `line`.
    pub fn to_error(&self, catalog: &ErrorCatalog, line: usize, field: &str) -> MzTabError {
        let args = match self.code {
            // These templates quote only the offending value.
            ErrorCode::MzTabMode | ErrorCode::MzTabType => vec![self.raw.clone()],
            _ => {
                let mut args = vec![field.to_string(), self.raw.clone()];
                args.extend(self.expected.clone());
                args
            }
        };
        catalog.error(self.code, line, args)
    }
}

fn list_of<T, E>(
    raw: &str,
    separator: char,
    ty: &ValueType,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Result<SplitList<T>, FormatError> {
    if raw.trim().is_empty() {
        return Err(FormatError::new(ty, raw));
    }
    SplitList::parse_with(raw, separator, parse).map_err(|_| FormatError::new(ty, raw))
}

fn element_ref_of(kind: ElementKind, text: &str) -> Result<ElementRef, ()> {
    match text.parse::<ElementRef>() {
        Ok(r) if r.kind == kind => Ok(r),
        _ => Err(()),
    }
}

/// Decode `raw` as a value of type `ty`.
pub fn decode(raw: &str, ty: &ValueType) -> Result<Value, FormatError> {
    let text = raw.trim();
    if text.eq_ignore_ascii_case("null") {
        return Ok(Value::Null);
    }
    let fail = || FormatError::new(ty, raw);

    let value = match ty {
        ValueType::String => Value::String(text.to_string()),
        ValueType::Integer => Value::Integer(text.parse::<i64>().map_err(|_| fail())?),
        ValueType::Double => Value::Double(parse_double(text).ok_or_else(fail)?),
        ValueType::Boolean => match text {
            "1" => Value::Boolean(true),
            "0" => Value::Boolean(false),
            _ => return Err(fail()),
        },
        ValueType::Reliability => Value::Reliability(text.parse().map_err(|_| fail())?),
        ValueType::Param => Value::Param(text.parse().map_err(|_| fail())?),
        ValueType::ParamList => Value::ParamList(list_of(text, '|', ty, str::parse::<Param>)?),
        ValueType::StringList(sep) => Value::StringList(list_of(text, *sep, ty, |s| {
            if s.is_empty() {
                Err(())
            } else {
                Ok(s.to_string())
            }
        })?),
        ValueType::DoubleList => {
            Value::DoubleList(list_of(text, '|', ty, |s| parse_double(s).ok_or(()))?)
        }
        ValueType::GoTermList => Value::GoTermList(list_of(text, '|', ty, |s| {
            if is_go_term(s) {
                Ok(s.to_string())
            } else {
                Err(())
            }
        })?),
        ValueType::ModificationList => Value::ModificationList(list_of(
            text,
            ',',
            ty,
            str::parse::<Modification>,
        )?),
        ValueType::SpectraRefList => {
            Value::SpectraRefList(list_of(text, '|', ty, str::parse::<SpectraRef>)?)
        }
        ValueType::Uri if is_uri(text) => Value::Uri(text.to_string()),
        ValueType::Url if is_url(text) => Value::Url(text.to_string()),
        ValueType::Email if is_email(text) => Value::Email(text.to_string()),
        ValueType::Uri | ValueType::Url | ValueType::Email => return Err(fail()),
        ValueType::Publication => {
            Value::Publication(list_of(text, '|', ty, str::parse::<PublicationItem>)?)
        }
        ValueType::ElementRef(kind) => {
            Value::ElementRef(element_ref_of(*kind, text).map_err(|_| fail())?)
        }
        ValueType::ElementRefList(kind) => {
            Value::ElementRefList(list_of(text, ',', ty, |s| element_ref_of(*kind, s))?)
        }
        ValueType::Mode => Value::Mode(text.parse().map_err(|_| fail())?),
        ValueType::Type => Value::Type(text.parse().map_err(|_| fail())?),
        ValueType::ColUnit => {
            let (column, param) = text.split_once('=').ok_or_else(fail)?;
            let column = column.trim();
            if column.is_empty() {
                return Err(fail());
            }
            Value::ColUnit(ColUnit {
                column: column.to_string(),
                param: param.parse().map_err(|_| fail())?,
            })
        }
    };
    Ok(value)
}
