//! # Metadata section
//!
//! The `MTD` block of an mzTab file: a handful of scalar keys plus indexed
//! elements (`ms_run[1]`, `assay[2]`, `study_variable[1]`, ...) that carry
//! typed properties and reference each other.
//!
//! ## Key grammar
//!
//! | Form | Example |
//! |------|---------|
//! | scalar | `mzTab-version`, `description`, `protein-quantification_unit` |
//! | element value | `software[1]`, `fixed_mod[2]` |
//! | element property | `ms_run[1]-location`, `sample[1]-species[2]` |
//! | indexed sub-property | `assay[1]-quantification_mod[1]-site` |
//! | column unit | `colunit-peptide` |
//!
//! Values are decoded through [`crate::codec`] against the type registered for
//! the key; the registry lives on [`ElementKind`] and [`ScalarKey`].

mod element;
mod key;
mod model;


pub use element::{ElementKind, ElementRef, ElementRefParseError, IndexedElement, PropertyKey};
pub use key::{KeyError, MetadataKey, ScalarKey};
pub use model::{Metadata, MzTabMode, MzTabType};
