//! Scalar grammars shared by metadata values and table cells.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

static GO_TERM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^GO:\d+$").expect("valid GO regex"));

/// Identification reliability of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Reliability {
    High = 1,
    Medium = 2,
    Poor = 3,
}

impl fmt::Display for Reliability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

impl FromStr for Reliability {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Reliability::High),
            "2" => Ok(Reliability::Medium),
            "3" => Ok(Reliability::Poor),
            _ => Err(()),
        }
    }
}

/// Kind of a publication identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PublicationKind {
    PubMed,
    Doi,
}

/// One `pubmed:{id}` or `doi:{id}` item of a publication list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PublicationItem {
    pub kind: PublicationKind,
    pub accession: String,
}

impl fmt::Display for PublicationItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PublicationKind::PubMed => write!(f, "pubmed:{}", self.accession),
            PublicationKind::Doi => write!(f, "doi:{}", self.accession),
        }
    }
}

impl FromStr for PublicationItem {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, accession) = s.trim().split_once(':').ok_or(())?;
        let accession = accession.trim();
        let kind = match prefix.trim().to_ascii_lowercase().as_str() {
            "pubmed" if !accession.is_empty() && accession.bytes().all(|b| b.is_ascii_digit()) => {
                PublicationKind::PubMed
            }
            "doi" if !accession.is_empty() => PublicationKind::Doi,
            _ => return Err(()),
        };
        Ok(PublicationItem {
            kind,
            accession: accession.to_string(),
        })
    }
}

/// Parse a locale-independent double, accepting `NaN`, `INF` and `-INF`.
pub fn parse_double(text: &str) -> Option<f64> {
    let text = text.trim();
    match text.to_ascii_uppercase().as_str() {
        "NAN" => return Some(f64::NAN),
        "INF" | "+INF" => return Some(f64::INFINITY),
        "-INF" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    // Rust also accepts "infinity" spellings; mzTab does not.
    if text.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    text.parse::<f64>().ok()
}

/// Equality for decoded doubles: `NaN` equals `NaN`, since both read from
/// the same text.
pub fn same_double(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Format a double the way [`parse_double`] reads it back.
pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "INF".to_string()
    } else if value == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        value.to_string()
    }
}

pub fn is_email(text: &str) -> bool {
    EMAIL.is_match(text.trim())
}

pub fn is_go_term(text: &str) -> bool {
    GO_TERM.is_match(text.trim())
}

/// Any absolute URI, `file:` and `urn:` included.
pub fn is_uri(text: &str) -> bool {
    url::Url::parse(text.trim()).is_ok()
}

/// A locator: an absolute URI that names a host, or a `file:` URI.
pub fn is_url(text: &str) -> bool {
    match url::Url::parse(text.trim()) {
        Ok(url) => url.has_host() || url.scheme() == "file",
        Err(_) => false,
    }
}
