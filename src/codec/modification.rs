use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::list::{find_top_level, split_top_level};
use super::param::Param;
use super::primitive::same_double;

/// Confidence attached to a modification position.
#[derive(Debug, Clone, Serialize)]
pub enum PositionConfidence {
    /// Bare numeric score, `5[0.2]`
    Score(f64),
    /// CV parameter, `5[MS, MS:1001876, modification probability, 0.8]`
    Param(Param),
}

impl PartialEq for PositionConfidence {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Score(a), Self::Score(b)) => same_double(*a, *b),
            (Self::Param(a), Self::Param(b)) => a == b,
            _ => false,
        }
    }
}

/// One candidate site of a modification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModificationPosition {
    pub position: u32,
    pub confidence: Option<PositionConfidence>,
}

impl ModificationPosition {
    pub fn new(position: u32) -> Self {
        Self {
            position,
            confidence: None,
        }
    }
}

impl fmt::Display for ModificationPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.confidence {
            None => write!(f, "{}", self.position),
            Some(PositionConfidence::Score(score)) => write!(f, "{}[{}]", self.position, score),
            Some(PositionConfidence::Param(param)) => write!(f, "{}{}", self.position, param),
        }
    }
}

/// Definition of an unannotated chemical modification.
#[derive(Debug, Clone, Serialize)]
pub enum ChemMod {
    /// Signed mass delta, `CHEMMOD:+15.9949`
    Delta(f64),
    /// Free text such as a formula, `CHEMMOD:H(2)O`
    Text(String),
}

impl PartialEq for ChemMod {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Delta(a), Self::Delta(b)) => same_double(*a, *b),
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

/// What a modification is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ModificationKind {
    /// Controlled accession `{db}:{id}`, e.g. `UNIMOD:35`
    Accession { db: String, id: String },
    ChemMod(ChemMod),
    /// Amino-acid substitution, `SUBST:R`
    Subst(String),
}

impl fmt::Display for ModificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModificationKind::Accession { db, id } => write!(f, "{}:{}", db, id),
            ModificationKind::ChemMod(ChemMod::Delta(delta)) => write!(f, "CHEMMOD:{:+}", delta),
            ModificationKind::ChemMod(ChemMod::Text(text)) => write!(f, "CHEMMOD:{}", text),
            ModificationKind::Subst(residues) => write!(f, "SUBST:{}", residues),
        }
    }
}

/// A modification as reported in a `modifications` column.
///
/// Text form: `pos[conf]{|pos[conf]}-ACCESSION{|[neutral loss]}`. The
/// position block is absent for unlocalised modifications.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Modification {
    pub kind: ModificationKind,
    pub positions: Vec<ModificationPosition>,
    pub neutral_loss: Option<Param>,
}

impl Modification {
    pub fn new(kind: ModificationKind) -> Self {
        Self {
            kind,
            positions: Vec::new(),
            neutral_loss: None,
        }
    }

    pub fn with_position(mut self, position: ModificationPosition) -> Self {
        self.positions.push(position);
        self
    }

    pub fn is_chemmod(&self) -> bool {
        matches!(self.kind, ModificationKind::ChemMod(_))
    }

    /// Mass delta of a numeric CHEMMOD.
    pub fn chemmod_delta(&self) -> Option<f64> {
        match self.kind {
            ModificationKind::ChemMod(ChemMod::Delta(delta)) => Some(delta),
            _ => None,
        }
    }
}

impl fmt::Display for Modification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, position) in self.positions.iter().enumerate() {
            if i > 0 {
                write!(f, "|")?;
            }
            write!(f, "{}", position)?;
        }
        if !self.positions.is_empty() {
            write!(f, "-")?;
        }
        write!(f, "{}", self.kind)?;
        if let Some(loss) = &self.neutral_loss {
            write!(f, "|{}", loss)?;
        }
        Ok(())
    }
}

/// Reason a modification failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModificationParseError {
    #[error("invalid position \"{0}\"")]
    Position(String),
    #[error("\"{0}\" is not of the form DB:ID, CHEMMOD:definition or SUBST:residues")]
    Accession(String),
    #[error("invalid neutral loss \"{0}\"")]
    NeutralLoss(String),
}

fn parse_position(text: &str) -> Result<ModificationPosition, ModificationParseError> {
    let invalid = || ModificationParseError::Position(text.to_string());
    let digits_end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let position = text[..digits_end].parse::<u32>().map_err(|_| invalid())?;
    let rest = &text[digits_end..];
    if rest.is_empty() {
        return Ok(ModificationPosition::new(position));
    }
    let inner = rest
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .ok_or_else(invalid)?;
    let confidence = match inner.trim().parse::<f64>() {
        Ok(score) => PositionConfidence::Score(score),
        Err(_) => PositionConfidence::Param(rest.parse::<Param>().map_err(|_| invalid())?),
    };
    Ok(ModificationPosition {
        position,
        confidence: Some(confidence),
    })
}

fn parse_kind(text: &str) -> Result<ModificationKind, ModificationParseError> {
    let invalid = || ModificationParseError::Accession(text.to_string());
    let (db, id) = text.split_once(':').ok_or_else(invalid)?;
    let (db, id) = (db.trim(), id.trim());
    if id.is_empty() {
        return Err(invalid());
    }
    if db.eq_ignore_ascii_case("CHEMMOD") {
        let numeric = id.starts_with(['+', '-']) || id.starts_with(|c: char| c.is_ascii_digit());
        let chemmod = match id.parse::<f64>() {
            Ok(delta) if numeric && delta.is_finite() => ChemMod::Delta(delta),
            _ => ChemMod::Text(id.to_string()),
        };
        return Ok(ModificationKind::ChemMod(chemmod));
    }
    if db.eq_ignore_ascii_case("SUBST") {
        return Ok(ModificationKind::Subst(id.to_string()));
    }
    let valid_db = db.starts_with(|c: char| c.is_ascii_alphabetic())
        && db.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid_db {
        return Err(invalid());
    }
    Ok(ModificationKind::Accession {
        db: db.to_string(),
        id: id.to_string(),
    })
}

impl FromStr for Modification {
    type Err = ModificationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        // The first unbracketed '-' ends the position block, but only if what
        // precedes it is a position; `CHEMMOD:-18.01` has no positions.
        let (positions, rest) = match find_top_level(s, '-') {
            Some(i) if s.starts_with(|c: char| c.is_ascii_digit()) => {
                let positions = split_top_level(&s[..i], '|')
                    .into_iter()
                    .map(|p| parse_position(p.trim()))
                    .collect::<Result<Vec<_>, _>>()?;
                (positions, &s[i + 1..])
            }
            _ => (Vec::new(), s),
        };

        let mut parts = split_top_level(rest, '|').into_iter();
        let kind = parse_kind(parts.next().unwrap_or_default())?;
        let neutral_loss = match parts.next() {
            Some(loss) => Some(
                loss.parse::<Param>()
                    .map_err(|_| ModificationParseError::NeutralLoss(loss.to_string()))?,
            ),
            None => None,
        };
        if let Some(extra) = parts.next() {
            return Err(ModificationParseError::NeutralLoss(extra.to_string()));
        }

        Ok(Modification {
            kind,
            positions,
            neutral_loss,
        })
    }
}
