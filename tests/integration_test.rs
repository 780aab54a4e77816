//! Integration tests for mztab
//!
//! These tests run complete files through parsing, validation and writing.

use std::path::PathBuf;

use mztab::codec::Value;
use mztab::error::{ErrorCatalog, ErrorCode, ErrorLevel};
use mztab::metadata::{ElementRef, MzTabType};
use mztab::parser::{MzTabParser, ParserConfig};
use mztab::schema::Section;
use mztab::validator::{self, ValidationReport};
use std::sync::Arc;
use tempfile::tempdir;

fn data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Test the complete read-write-read cycle
#[test]
fn test_round_trip_identification() {
    let parser = MzTabParser::default();
    let first = parser.parse_file(data("identification.mzTab"));
    assert!(first.abort.is_none());
    assert!(first.errors.is_empty(), "{:?}", first.errors);

    let mztab = first.file;
    assert_eq!(mztab.protein.as_ref().map(|t| t.len()), Some(2));
    assert_eq!(mztab.psm.as_ref().map(|t| t.len()), Some(3));
    assert_eq!(mztab.comments.len(), 1);

    let dir = tempdir().unwrap();
    let path = dir.path().join("copy.mzTab");
    mztab.write_file(&path).unwrap();

    let second = parser.parse_file(&path);
    assert!(second.is_valid(), "{:?}", second.errors);
    assert_eq!(second.file, mztab);

    // Writing is stable once columns are in logical order
    assert_eq!(
        second.file.to_mztab_string().unwrap(),
        mztab.to_mztab_string().unwrap()
    );
}

#[test]
fn test_written_header_uses_logical_order() {
    let result = MzTabParser::default().parse_file(data("identification.mzTab"));
    let text = result.file.to_mztab_string().unwrap();
    let header = text
        .lines()
        .find(|line| line.starts_with("PRH"))
        .unwrap();
    let columns: Vec<&str> = header.split('\t').collect();
    assert_eq!(columns[10], "protein_coverage");
    assert_eq!(columns[11], "best_search_engine_score[1]");
    assert_eq!(columns.last(), Some(&"opt_global_note"));
}

#[test]
fn test_column_units_survive_round_trip() {
    let result = MzTabParser::default().parse_file(data("identification.mzTab"));
    let psm = result.file.psm.as_ref().unwrap();
    let unit = psm
        .schema
        .find_by_header("retention_time")
        .and_then(|c| c.unit.as_ref())
        .unwrap();
    assert_eq!(unit.accession.as_deref(), Some("UO:0000010"));

    let text = result.file.to_mztab_string().unwrap();
    assert!(text.contains("MTD\tcolunit-psm\tretention_time=[UO, UO:0000010, second, ]"));
}

#[test]
fn test_typed_values() {
    let result = MzTabParser::default().parse_file(data("identification.mzTab"));
    let psm = result.file.psm.as_ref().unwrap();
    let first = &psm.records[0];

    let rts = psm.value(first, "retention_time").unwrap();
    assert!(matches!(rts, Value::DoubleList(list) if list.as_slice() == [10.2, 11.5]));

    let refs = psm
        .value(first, "spectra_ref")
        .and_then(Value::as_spectra_refs)
        .unwrap();
    assert_eq!(refs.as_slice()[0].ms_run, 1);
    assert_eq!(refs.as_slice()[0].reference, "scan=5");

    let decoy = psm
        .value(&psm.records[2], "opt_global_cv_MS:1002217_decoy_peptide")
        .and_then(Value::as_str);
    assert_eq!(decoy, Some("1"));
}

#[test]
fn test_cv_lookup_on_clean_file() {
    let config = ParserConfig::default().with_cv_lookup(true);
    let result = MzTabParser::new(config).parse_file(data("identification.mzTab"));
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}

#[test]
fn test_quantification_unused_study_variable() {
    let result = MzTabParser::default().parse_file(data("quantification.mzTab"));
    assert_eq!(
        result.file.metadata.mz_tab_type(),
        Some(MzTabType::Quantification)
    );
    assert!(result.is_valid());

    let unused: Vec<_> = result
        .errors
        .iter()
        .filter(|e| e.code() == ErrorCode::NotDefineInHeader)
        .collect();
    assert_eq!(unused.len(), 1);
    assert_eq!(unused[0].level(), ErrorLevel::Warn);
    assert_eq!(unused[0].args, ["study_variable[2]", "protein abundance"]);
    assert_eq!(result.errors.len(), 1);

    let proteins = result.file.protein.as_ref().unwrap();
    assert_eq!(proteins.schema.optional_count(), 3);
    let column = proteins
        .schema
        .find_by_header("protein_abundance_study_variable[1]")
        .unwrap();
    assert_eq!(column.element(), Some(ElementRef::study_variable(1)));
    assert_eq!(
        proteins.records[1].get(column.position),
        Some(&Value::Double(88.25))
    );
}

#[test]
fn test_unused_study_variable_escalated_to_error() {
    let catalog = ErrorCatalog::builder()
        .level(ErrorCode::NotDefineInHeader, ErrorLevel::Error)
        .build();
    let config = ParserConfig::errors_only().with_catalog(Arc::new(catalog));
    let result = MzTabParser::new(config).parse_file(data("quantification.mzTab"));
    assert!(!result.is_valid());
    assert_eq!(result.errors.count(ErrorCode::NotDefineInHeader), 1);
}

#[test]
fn test_quantification_errors_only() {
    let result =
        MzTabParser::new(ParserConfig::errors_only()).parse_file(data("quantification.mzTab"));
    assert!(result.errors.is_empty());
}

#[test]
fn test_validate_parsed_model_matches_parse() {
    let config = ParserConfig::default();
    let result = MzTabParser::new(config.clone()).parse_file(data("quantification.mzTab"));
    let errors = validator::validate(&result.file, &config).unwrap();
    assert_eq!(errors.len(), result.errors.len());
    assert_eq!(errors.count(ErrorCode::NotDefineInHeader), 1);
}

#[test]
fn test_edited_model_is_revalidated() {
    let config = ParserConfig::default();
    let mut result = MzTabParser::new(config.clone()).parse_file(data("identification.mzTab"));
    assert_eq!(
        validator::validate(&result.file, &config).unwrap().len(),
        0
    );

    let psm = result.file.table_mut(Section::Psm).as_mut().unwrap();
    let copy = psm.records[0].clone();
    psm.records.push(copy);

    let errors = validator::validate(&result.file, &config).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.count(ErrorCode::DuplicationId), 1);
}

#[test]
fn test_report_for_fixture_files() {
    let path = data("quantification.mzTab");
    let result = MzTabParser::default().parse_file(&path);
    let report = ValidationReport::from_parse(path.display().to_string(), &result, ErrorLevel::Info);
    assert!(!report.has_failures());
    assert!(report.has_warnings());
    assert_eq!(report.diagnostics.len(), 1);
}

#[test]
fn test_missing_file_aborts() {
    let result = MzTabParser::default().parse_file(data("does-not-exist.mzTab"));
    assert!(result.abort.is_some());
    assert!(result.into_result().is_err());
}
