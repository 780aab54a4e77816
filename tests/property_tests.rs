//! Property-based tests for the codec, schema and round trip.

use proptest::prelude::*;

use mztab::codec::{Modification, Param, SplitList, Value, ValueType};
use mztab::error::{ErrorCatalog, ErrorCode, ErrorLevel, ErrorList};
use mztab::metadata::{ElementKind, ElementRef, Metadata, MzTabMode, MzTabType, PropertyKey, ScalarKey};
use mztab::parser::MzTabParser;
use mztab::schema::{ColumnSchema, Section};
use mztab::table::{MzTabFile, SectionTable};

fn identification_metadata() -> Metadata {
    let mut metadata = Metadata::new();
    metadata.set_scalar(ScalarKey::Version, Value::String("1.0.0".to_string()));
    metadata.set_scalar(ScalarKey::Mode, Value::Mode(MzTabMode::Summary));
    metadata.set_scalar(ScalarKey::Type, Value::Type(MzTabType::Identification));
    metadata.set_scalar(
        ScalarKey::Description,
        Value::String("generated proteins".to_string()),
    );
    metadata.element_mut(ElementRef::ms_run(1)).set_property(
        PropertyKey::new("location"),
        Value::Uri("file:///data/run1.mzML".to_string()),
    );
    metadata
        .element_mut(ElementRef::new(ElementKind::FixedMod, 1))
        .set_value(Value::Param(Param::cv("UNIMOD", "UNIMOD:4", "Carbamidomethyl")));
    metadata
        .element_mut(ElementRef::new(ElementKind::VariableMod, 1))
        .set_value(Value::Param(Param::cv("UNIMOD", "UNIMOD:35", "Oxidation")));
    metadata
}

fn special_or_finite() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        -1.0e6f64..1.0e6,
    ]
}

proptest! {
    /// A legally built protein table survives writing and re-parsing,
    /// including NaN and infinite doubles, modifications and optional columns
    #[test]
    fn test_protein_round_trip(
        rows in prop::collection::vec(
            (
                "[A-Z][a-z]{4,10}",
                1i64..100_000,
                prop_oneof![Just(f64::NAN), 0.0f64..=1.0],
                special_or_finite(),
                1u32..40,
                1u32..2000,
                "[a-z]{1,8}",
            ),
            1..20,
        )
    ) {
        let mut metadata = identification_metadata();
        metadata
            .element_mut(ElementRef::new(ElementKind::ProteinSearchEngineScore, 1))
            .set_value(Value::Param(Param::cv("MS", "MS:1001171", "Mascot:score")));

        let mut schema = ColumnSchema::new(Section::Protein);
        schema.add_search_engine_score_column(1, None).unwrap();
        schema.add_optional_column(None, "note", ValueType::String);
        let mut proteins = SectionTable::new(schema);
        for (i, (species, taxid, coverage, score, position, unimod, note)) in rows.iter().enumerate() {
            let modification: Modification = format!("{}-UNIMOD:{}", position, unimod).parse().unwrap();
            proteins.push_row([
                ("accession", Value::String(format!("P{:05}", i))),
                ("species", Value::String(species.clone())),
                ("taxid", Value::Integer(*taxid)),
                ("protein_coverage", Value::Double(*coverage)),
                (
                    "search_engine",
                    Value::ParamList(SplitList::with_items(
                        '|',
                        vec![Param::cv("MS", "MS:1001207", "Mascot")],
                    )),
                ),
                ("best_search_engine_score[1]", Value::Double(*score)),
                ("modifications", Value::ModificationList(SplitList::with_items(',', vec![modification]))),
                ("opt_global_note", Value::String(format!("note-{}", note))),
            ]);
        }
        let mut file = MzTabFile::new(metadata);
        file.protein = Some(proteins);

        let text = file.to_mztab_string().unwrap();
        let result = MzTabParser::default().parse_str(&text);
        prop_assert!(result.abort.is_none());
        prop_assert!(result.errors.is_empty(), "{:?}", result.errors);
        prop_assert_eq!(result.file, file);
    }

    /// Position lists and accessions print back as they were read
    #[test]
    fn test_modification_text_round_trip(
        positions in prop::collection::vec(1u32..60, 1..5),
        accession in 1u32..99_999,
    ) {
        let positions: Vec<String> = positions.iter().map(u32::to_string).collect();
        let text = format!("{}-MOD:{:05}", positions.join("|"), accession);
        let modification: Modification = text.parse().unwrap();
        prop_assert_eq!(modification.positions.len(), positions.len());
        prop_assert_eq!(modification.to_string(), text);
    }

    /// Optional columns always follow the stable ones
    #[test]
    fn test_stable_columns_come_first(study_variables in prop::collection::btree_set(1u32..20, 0..6)) {
        let mut schema = ColumnSchema::new(Section::Peptide);
        let stable = schema.len();
        for id in &study_variables {
            schema.add_abundance_columns(ElementRef::study_variable(*id)).unwrap();
        }
        prop_assert_eq!(schema.optional_count(), study_variables.len() * 3);
        for column in schema.optional_columns() {
            prop_assert!(column.position as usize > stable);
        }
    }

    /// The cap is hit on exactly the first addition past it
    #[test]
    fn test_error_list_overflow(max in 1usize..40) {
        let catalog = ErrorCatalog::standard();
        let mut list = ErrorList::new(max, ErrorLevel::Info);
        for line in 0..max {
            let error = catalog.error(ErrorCode::LinePrefix, line + 1, ["XXX"]);
            prop_assert!(list.add(error).is_ok());
        }
        let error = catalog.error(ErrorCode::LinePrefix, max + 1, ["XXX"]);
        prop_assert!(list.add(error).is_err());
        prop_assert_eq!(list.len(), max);
    }
}

#[test]
fn test_identical_cv_column_is_added_once() {
    let mut schema = ColumnSchema::new(Section::Psm);
    let param = Param::cv("MS", "MS:1002217", "decoy peptide");
    let first = schema
        .add_cv_optional_column(None, &param, ValueType::String)
        .unwrap();
    let count = schema.len();
    let second = schema
        .add_cv_optional_column(None, &param, ValueType::String)
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(schema.len(), count);
}

#[test]
fn test_chemmod_has_no_positions() {
    let modification: Modification = "CHEMMOD:+36.098".parse().unwrap();
    assert!(modification.positions.is_empty());
    assert!(modification.is_chemmod());
    assert_eq!(modification.chemmod_delta(), Some(36.098));
}

#[test]
fn test_level_filtering() {
    let catalog = ErrorCatalog::standard();
    let mut errors = ErrorList::new(10, ErrorLevel::Info);
    let mut warnings = ErrorList::new(10, ErrorLevel::Info);
    for line in 1..=3 {
        errors
            .add(catalog.error(ErrorCode::LinePrefix, line, ["XXX"]))
            .unwrap();
        warnings
            .add(catalog.error(ErrorCode::IdNumber, line, ["ms_run", "ms_run[2]"]))
            .unwrap();
    }
    assert_eq!(errors.filter(ErrorLevel::Warn).len(), 3);
    assert!(warnings.filter(ErrorLevel::Error).is_empty());
}
