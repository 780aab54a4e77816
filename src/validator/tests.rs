use super::*;
use crate::codec::{Param, SplitList, Value};
use crate::controlled_vocabulary::StaticVocabulary;
use crate::metadata::{ElementKind, ElementRef, Metadata, MzTabMode, MzTabType, PropertyKey, ScalarKey};
use crate::parser::MzTabParser;
use crate::schema::{ColumnSchema, Section};
use crate::table::{MzTabFile, SectionTable};

fn metadata(mode: MzTabMode, ty: MzTabType) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.set_scalar(ScalarKey::Version, Value::String("1.0.0".to_string()));
    metadata.set_scalar(ScalarKey::Mode, Value::Mode(mode));
    metadata.set_scalar(ScalarKey::Type, Value::Type(ty));
    metadata.set_scalar(
        ScalarKey::Description,
        Value::String("validator fixture".to_string()),
    );
    add_run(&mut metadata, 1);
    for (kind, accession, name) in [
        (ElementKind::FixedMod, "MS:1002453", "No fixed modifications searched"),
        (ElementKind::VariableMod, "MS:1002454", "No variable modifications searched"),
    ] {
        metadata
            .element_mut(ElementRef::new(kind, 1))
            .set_value(Value::Param(Param::cv("MS", accession, name)));
    }
    metadata
}

fn add_run(metadata: &mut Metadata, id: u32) {
    metadata.element_mut(ElementRef::ms_run(id)).set_property(
        PropertyKey::new("location"),
        Value::Uri(format!("file:///data/run{}.mzML", id)),
    );
}

fn check(metadata: &Metadata, config: &ParserConfig) -> Vec<MzTabError> {
    let rules = Rules::from_config(config);
    let mut sink = Vec::new();
    super::metadata::check_metadata(metadata, &rules, &mut sink);
    sink
}

fn codes(errors: &[MzTabError]) -> Vec<ErrorCode> {
    errors.iter().map(MzTabError::code).collect()
}

#[test]
fn test_rules_gate_on_catalog_level() {
    let catalog = ErrorCatalog::standard();
    let rules = Rules::new(&catalog, ErrorLevel::Error, None);
    assert!(rules.enabled(ErrorCode::NotDefineInMetadata));
    assert!(!rules.enabled(ErrorCode::IdNumber));
    assert!(rules.error(ErrorCode::IdNumber, 3, ["ms_run", "ms_run[2]"]).is_none());

    let catalog = ErrorCatalog::builder()
        .level(ErrorCode::IdNumber, ErrorLevel::Error)
        .build();
    let rules = Rules::new(&catalog, ErrorLevel::Error, None);
    let error = rules
        .error(ErrorCode::IdNumber, 3, ["ms_run", "ms_run[2]"])
        .unwrap();
    assert_eq!(error.level(), ErrorLevel::Error);
    assert_eq!(error.line, 3);
}

#[test]
fn test_check_param_against_vocabulary() {
    let catalog = ErrorCatalog::standard();
    let vocabulary = StaticVocabulary::standard().with_complete_ontology("MS");
    let rules = Rules::new(&catalog, ErrorLevel::Info, Some(&vocabulary));
    let mut sink = Vec::new();

    rules.check_param(&Param::cv("MS", "MS:1001207", "mascot"), 1, &mut sink);
    assert!(sink.is_empty());

    rules.check_param(&Param::cv("MS", "MS:1001207", "Sequest"), 2, &mut sink);
    rules.check_param(&Param::cv("MS", "MS:9999999", "invented"), 3, &mut sink);
    rules.check_param(&Param::cv("UNIMOD", "UNIMOD:35", "Oxidation"), 4, &mut sink);
    rules.check_param(&Param::user("tolerance", Some("0.5")), 5, &mut sink);

    assert_eq!(codes(&sink), [ErrorCode::CvTermMismatch, ErrorCode::CvUnknownTerm]);
    assert_eq!(sink[0].args, ["MS:1001207", "Sequest", "Mascot"]);
    assert_eq!(sink[1].line, 3);
}

#[test]
fn test_partial_vocabulary_skips_unlisted_terms() {
    let catalog = ErrorCatalog::standard();
    let vocabulary = StaticVocabulary::standard();
    let rules = Rules::new(&catalog, ErrorLevel::Info, Some(&vocabulary));
    let mut sink = Vec::new();

    rules.check_param(&Param::cv("MS", "MS:1001456", "X!Tandem"), 1, &mut sink);
    assert!(sink.is_empty());
}

#[test]
fn test_check_param_without_vocabulary_is_silent() {
    let catalog = ErrorCatalog::standard();
    let rules = Rules::new(&catalog, ErrorLevel::Info, None);
    let mut sink = Vec::new();
    rules.check_param(&Param::cv("MS", "MS:9999999", "invented"), 1, &mut sink);
    assert!(sink.is_empty());
}

#[test]
fn test_complete_identification_metadata_is_clean() {
    let metadata = metadata(MzTabMode::Summary, MzTabType::Identification);
    assert!(check(&metadata, &ParserConfig::default()).is_empty());
}

#[test]
fn test_mandatory_items_by_mode_and_type() {
    let metadata = metadata(MzTabMode::Complete, MzTabType::Quantification);
    let errors = check(&metadata, &ParserConfig::default());
    let missing: Vec<&str> = errors
        .iter()
        .filter(|e| e.code() == ErrorCode::NotDefineInMetadata)
        .map(|e| e.args[0].as_str())
        .collect();
    assert_eq!(
        missing,
        [
            "software[1]",
            "quantification_method",
            "study_variable[1]",
            "protein-, peptide- or small_molecule-quantification_unit",
        ]
    );
}

#[test]
fn test_complete_quantification_element_properties() {
    let mut metadata = metadata(MzTabMode::Complete, MzTabType::Quantification);
    metadata
        .element_mut(ElementRef::new(ElementKind::Software, 1))
        .set_value(Value::Param(Param::cv("MS", "MS:1001583", "MaxQuant")));
    metadata.set_scalar(
        ScalarKey::QuantificationMethod,
        Value::Param(Param::cv("MS", "MS:1001834", "LC-MS label-free quantitation analysis")),
    );
    metadata.set_scalar(
        ScalarKey::ProteinQuantificationUnit,
        Value::Param(Param::cv("PRIDE", "PRIDE:0000393", "Relative quantification unit")),
    );
    metadata.element_mut(ElementRef::assay(1)).set_property(
        PropertyKey::new("ms_run_ref"),
        Value::ElementRef(ElementRef::ms_run(1)),
    );
    metadata.element_mut(ElementRef::study_variable(1)).set_property(
        PropertyKey::new("description"),
        Value::String("control".to_string()),
    );

    let errors = check(&metadata, &ParserConfig::default());
    let messages: Vec<String> = errors.iter().map(MzTabError::message).collect();
    assert_eq!(
        messages,
        [
            "assay[1]-quantification_reagent is not defined in the metadata section (mandatory in Complete Quantification files).",
            "study_variable[1]-assay_refs is not defined in the metadata section (mandatory in Complete Quantification files).",
        ]
    );
}

#[test]
fn test_summary_quantification_needs_study_variable_description() {
    let mut metadata = metadata(MzTabMode::Summary, MzTabType::Quantification);
    metadata.set_scalar(
        ScalarKey::QuantificationMethod,
        Value::Param(Param::cv("MS", "MS:1001834", "LC-MS label-free quantitation analysis")),
    );
    metadata.set_scalar(
        ScalarKey::PeptideQuantificationUnit,
        Value::Param(Param::cv("PRIDE", "PRIDE:0000393", "Relative quantification unit")),
    );
    metadata.element_mut(ElementRef::study_variable(1)).set_property(
        PropertyKey::new("assay_refs"),
        Value::ElementRefList(SplitList::with_items(',', vec![ElementRef::assay(1)])),
    );

    let errors = check(&metadata, &ParserConfig::default());
    assert_eq!(
        codes(&errors),
        [ErrorCode::AssayNotDefined, ErrorCode::NotDefineInMetadata]
    );
    assert_eq!(errors[0].args, ["study_variable[1]-assay_refs", "1"]);
    assert_eq!(errors[1].args[0], "study_variable[1]-description");
}

#[test]
fn test_id_gaps_report_the_first_missing_id() {
    let mut metadata = metadata(MzTabMode::Summary, MzTabType::Identification);
    add_run(&mut metadata, 3);
    add_run(&mut metadata, 4);
    metadata.element_mut(ElementRef::ms_run(3)).line = 9;

    let errors = check(&metadata, &ParserConfig::default());
    assert_eq!(codes(&errors), [ErrorCode::IdNumber]);
    assert_eq!(errors[0].line, 9);
    assert_eq!(
        errors[0].message(),
        "ms_run ids should run contiguously from 1; ms_run[2] is missing."
    );

    // IdNumber is a warning and disappears at Error level
    assert!(check(&metadata, &ParserConfig::errors_only()).is_empty());
}

#[test]
fn test_version_mismatch() {
    let mut metadata = metadata(MzTabMode::Summary, MzTabType::Identification);
    metadata.set_scalar(ScalarKey::Version, Value::String("2.0.0-M".to_string()));
    let errors = check(&metadata, &ParserConfig::default());
    assert_eq!(codes(&errors), [ErrorCode::MzTabVersion]);
    assert_eq!(errors[0].args, ["2.0.0-M"]);
}

#[test]
fn test_metadata_params_checked_when_lookup_enabled() {
    let mut metadata = metadata(MzTabMode::Summary, MzTabType::Identification);
    metadata
        .element_mut(ElementRef::new(ElementKind::Software, 1))
        .set_value(Value::Param(Param::cv("MS", "MS:1001207", "Mascot Server")));

    assert!(check(&metadata, &ParserConfig::default()).is_empty());
    let errors = check(&metadata, &ParserConfig::default().with_cv_lookup(true));
    assert_eq!(codes(&errors), [ErrorCode::CvTermMismatch]);
}

fn quantified_protein_schema(study_variables: &[u32]) -> ColumnSchema {
    let mut schema = ColumnSchema::new(Section::Protein);
    for &id in study_variables {
        schema
            .add_abundance_columns(ElementRef::study_variable(id))
            .unwrap();
    }
    schema
}

#[test]
fn test_unused_study_variable_is_reported() {
    let mut metadata = metadata(MzTabMode::Summary, MzTabType::Quantification);
    for id in [1, 2] {
        metadata.element_mut(ElementRef::study_variable(id)).set_property(
            PropertyKey::new("description"),
            Value::String(format!("group {}", id)),
        );
    }
    let config = ParserConfig::default();
    let rules = Rules::from_config(&config);

    let mut sink = Vec::new();
    header::check_unused_elements(&metadata, &quantified_protein_schema(&[1]), 20, &rules, &mut sink);
    assert_eq!(codes(&sink), [ErrorCode::NotDefineInHeader]);
    assert_eq!(sink[0].args, ["study_variable[2]", "protein abundance"]);
    assert_eq!(sink[0].line, 20);

    sink.clear();
    header::check_unused_elements(&metadata, &quantified_protein_schema(&[1, 2]), 20, &rules, &mut sink);
    assert!(sink.is_empty());

    // a section without abundance columns is not checked
    header::check_unused_elements(&metadata, &quantified_protein_schema(&[]), 20, &rules, &mut sink);
    assert!(sink.is_empty());
}

#[test]
fn test_unused_elements_skip_identification_files() {
    let mut metadata = metadata(MzTabMode::Summary, MzTabType::Identification);
    metadata.element_mut(ElementRef::study_variable(2)).set_property(
        PropertyKey::new("description"),
        Value::String("unused".to_string()),
    );
    let config = ParserConfig::default();
    let mut sink = Vec::new();
    header::check_unused_elements(
        &metadata,
        &quantified_protein_schema(&[1]),
        0,
        &Rules::from_config(&config),
        &mut sink,
    );
    assert!(sink.is_empty());
}

#[test]
fn test_header_reports_each_missing_element_once() {
    let metadata = metadata(MzTabMode::Summary, MzTabType::Identification);
    let schema = quantified_protein_schema(&[3]);
    let config = ParserConfig::default();
    let mut sink = Vec::new();
    header::check_header(&metadata, &schema, 15, &Rules::from_config(&config), &mut sink);
    assert_eq!(codes(&sink), [ErrorCode::StudyVariableNotDefined]);
    assert_eq!(sink[0].args[1], "3");
}

#[test]
fn test_validate_built_model() {
    let mut file = MzTabFile::new(metadata(MzTabMode::Summary, MzTabType::Identification));
    let mut proteins = SectionTable::new(ColumnSchema::new(Section::Protein));
    for accession in ["P12345", "P67890", "P12345"] {
        proteins.push_row([
            ("accession", Value::String(accession.to_string())),
            ("protein_coverage", Value::Double(0.4)),
        ]);
    }
    proteins.push_row([
        ("accession", Value::String("Q11111".to_string())),
        ("protein_coverage", Value::Double(1.5)),
    ]);
    file.protein = Some(proteins);

    let errors = validate(&file, &ParserConfig::default()).unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.count(ErrorCode::DuplicationAccession), 1);
    assert_eq!(errors.count(ErrorCode::ProteinCoverage), 1);
    assert!(!errors.is_clean());
}

#[test]
fn test_validate_respects_error_cap() {
    let mut file = MzTabFile::new(Metadata::new());
    file.metadata.set_scalar(ScalarKey::Version, Value::String("0.9".to_string()));
    let config = ParserConfig::default().with_max_error_count(2);
    assert!(validate(&file, &config).is_err());
}

const BROKEN: &str = "MTD\tmzTab-version\t1.0.0
MTD\tmzTab-mode\tSummary
MTD\tmzTab-type\tIdentification
MTD\tdescription\treport fixture
MTD\tms_run[1]-location\tfile:///data/run1.mzML
MTD\tfixed_mod[1]\t[MS, MS:1002453, No fixed modifications searched, ]
MTD\tvariable_mod[1]\t[MS, MS:1002454, No variable modifications searched, ]
MTD\tms_run[3]-location\tfile:///data/run3.mzML

PRH\taccession\tdescription\ttaxid\tspecies\tdatabase\tdatabase_version\tsearch_engine\tambiguity_members\tmodifications\tprotein_coverage
PRT\tP12345\tnull\tnull\tnull\tnull\tnull\tnull\tnull\tnull\t0.5
PRT\tP12345\tnull\tnull\tnull\tnull\tnull\tnull\tnull\tnull\t0.5
";

#[test]
fn test_report_from_parse() {
    let result = MzTabParser::default().parse_str(BROKEN);
    let report = ValidationReport::from_parse("broken.mzTab", &result, ErrorLevel::Info);

    assert!(report.has_failures());
    let status = |name: &str| {
        report
            .checks
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.status.clone())
    };
    assert_eq!(status("Parse completed"), Some(CheckStatus::Ok));
    assert_eq!(status("Format (1xxx)"), Some(CheckStatus::Ok));
    assert_eq!(
        status("Logical consistency (2xxx)"),
        Some(CheckStatus::Failed("1 error, 1 warning".to_string()))
    );
    assert!(report
        .checks
        .iter()
        .any(|c| c.name == "protein section: 10 columns, 2 rows"));
    assert_eq!(report.diagnostics.len(), 2);
    assert_eq!(report.diagnostic_count(ErrorLevel::Error), 1);
    assert_eq!(report.diagnostic_count(ErrorLevel::Warn), 1);

    let text = report.to_string();
    assert!(text.contains("[✗] Logical consistency (2xxx) - 1 error, 1 warning\n"));
    assert!(text.contains("Summary: 1 error, 1 warning, 0 notices listed"));
    assert!(text.ends_with("Validation FAILED\n"));

    let errors_only = ValidationReport::from_parse("broken.mzTab", &result, ErrorLevel::Error);
    assert_eq!(errors_only.diagnostics.len(), 1);

    let text = report.to_string();
    assert!(text.contains("broken.mzTab"));
    assert!(text.contains("P12345"));
}
