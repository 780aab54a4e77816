use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::Serialize;

/// A controlled-vocabulary or user parameter, written `[cvLabel, accession, name, value]`.
///
/// Two parameters are equal when accession, name and value agree; the CV label
/// is informational.
#[derive(Debug, Clone, Serialize)]
pub struct Param {
    pub cv_label: Option<String>,
    pub accession: Option<String>,
    pub name: String,
    pub value: Option<String>,
}

impl Param {
    /// A CV parameter such as `[MS, MS:1001207, Mascot, ]`.
    pub fn cv(cv_label: &str, accession: &str, name: &str) -> Self {
        Self {
            cv_label: Some(cv_label.to_string()),
            accession: Some(accession.to_string()),
            name: name.to_string(),
            value: None,
        }
    }

    /// A user parameter such as `[, , tolerance, 0.5]`.
    pub fn user(name: &str, value: Option<&str>) -> Self {
        Self {
            cv_label: None,
            accession: None,
            name: name.to_string(),
            value: value.map(str::to_string),
        }
    }

    pub fn with_value(mut self, value: impl ToString) -> Self {
        self.value = Some(value.to_string());
        self
    }

    /// True when neither CV label nor accession are given.
    pub fn is_user_param(&self) -> bool {
        self.cv_label.is_none() && self.accession.is_none()
    }
}

impl PartialEq for Param {
    fn eq(&self, other: &Self) -> bool {
        self.accession == other.accession && self.name == other.name && self.value == other.value
    }
}

impl Eq for Param {}

impl Hash for Param {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.accession.hash(state);
        self.name.hash(state);
        self.value.hash(state);
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match &self.value {
            Some(v) if v.contains(',') => format!("\"{}\"", v),
            Some(v) => v.clone(),
            None => String::new(),
        };
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.cv_label.as_deref().unwrap_or_default(),
            self.accession.as_deref().unwrap_or_default(),
            self.name,
            value
        )
    }
}

/// Reason a parameter failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamParseError {
    #[error("a parameter must be enclosed in square brackets")]
    Brackets,
    #[error("a parameter needs four comma-separated fields")]
    FieldCount,
    #[error("a parameter needs a name")]
    MissingName,
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

impl FromStr for Param {
    type Err = ParamParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() < 2 || !s.starts_with('[') || !s.ends_with(']') {
            return Err(ParamParseError::Brackets);
        }
        let inner = &s[1..s.len() - 1];

        let first = inner.find(',').ok_or(ParamParseError::FieldCount)?;
        let second = inner[first + 1..]
            .find(',')
            .map(|i| i + first + 1)
            .ok_or(ParamParseError::FieldCount)?;
        let rest = &inner[second + 1..];

        // The value may be quoted when it contains commas itself.
        let split = if rest.trim_end().ends_with('"') {
            rest.match_indices(',')
                .map(|(i, _)| i)
                .find(|&i| {
                    let tail = rest[i + 1..].trim();
                    tail.len() >= 2 && tail.starts_with('"')
                })
                .or_else(|| rest.rfind(','))
        } else {
            rest.rfind(',')
        };
        let split = split.ok_or(ParamParseError::FieldCount)?;

        let name = non_empty(&rest[..split]).ok_or(ParamParseError::MissingName)?;
        let value = rest[split + 1..].trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);

        Ok(Param {
            cv_label: non_empty(&inner[..first]),
            accession: non_empty(&inner[first + 1..second]),
            name,
            value: non_empty(value),
        })
    }
}
