use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Pointer to a spectrum in a declared MS run, written `ms_run[n]:{reference}`.
///
/// Whether `ms_run[n]` is declared is checked during validation; an
/// unresolved reference keeps its value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SpectraRef {
    pub ms_run: u32,
    pub reference: String,
}

impl SpectraRef {
    pub fn new(ms_run: u32, reference: impl Into<String>) -> Self {
        Self {
            ms_run,
            reference: reference.into(),
        }
    }
}

impl fmt::Display for SpectraRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ms_run[{}]:{}", self.ms_run, self.reference)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not of the form ms_run[n]:reference")]
pub struct SpectraRefParseError(pub String);

impl FromStr for SpectraRef {
    type Err = SpectraRefParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SpectraRefParseError(s.to_string());
        let s = s.trim();
        let rest = s.strip_prefix("ms_run[").ok_or_else(invalid)?;
        let (id, reference) = rest.split_once("]:").ok_or_else(invalid)?;
        let ms_run = id.parse::<u32>().map_err(|_| invalid())?;
        if ms_run == 0 || reference.trim().is_empty() {
            return Err(invalid());
        }
        Ok(SpectraRef::new(ms_run, reference.trim()))
    }
}
