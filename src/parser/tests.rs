use super::*;
use crate::codec::Value;
use crate::error::{ErrorCode, ErrorLevel};
use crate::metadata::ElementKind;

const METADATA: &str = "\
MTD\tmzTab-version\t1.0.0
MTD\tmzTab-mode\tSummary
MTD\tmzTab-type\tIdentification
MTD\tdescription\tExample identification file
MTD\tms_run[1]-location\tfile:///data/run1.mzML
MTD\tms_run[2]-location\tfile:///data/run2.mzML
MTD\tprotein_search_engine_score[1]\t[MS, MS:1001171, Mascot:score, ]
MTD\tpsm_search_engine_score[1]\t[MS, MS:1001171, Mascot:score, ]
MTD\tfixed_mod[1]\t[UNIMOD, UNIMOD:4, Carbamidomethyl, ]
MTD\tvariable_mod[1]\t[UNIMOD, UNIMOD:35, Oxidation, ]
MTD\tsoftware[1]\t[MS, MS:1001207, Mascot, 2.3]
COM\tidentifications from one search
";

const PRH: &str = "PRH\taccession\tdescription\ttaxid\tspecies\tdatabase\tdatabase_version\tsearch_engine\tbest_search_engine_score[1]\tambiguity_members\tmodifications\tprotein_coverage\tsearch_engine_score[1]_ms_run[1]\tnum_psms_ms_run[1]\topt_global_note";
const PRT: &str = "PRT\tP12345\tAspartate aminotransferase\t10116\tRattus norvegicus\tUniProtKB\t2011_11\t[MS, MS:1001207, Mascot, ]\t50\tnull\tnull\t0.4\t50\t4\thello";

const PSH: &str = "PSH\tsequence\tPSM_ID\taccession\tunique\tdatabase\tdatabase_version\tsearch_engine\tsearch_engine_score[1]\tmodifications\tretention_time\tcharge\texp_mass_to_charge\tcalc_mass_to_charge\tspectra_ref\tpre\tpost\tstart\tend";
const PSM_1: &str = "PSM\tEIEIL\t1\tP12345\t1\tUniProtKB\t2011_11\t[MS, MS:1001207, Mascot, ]\t47.2\t3-UNIMOD:35\t10.2|11.5\t2\t301.2\t301.1\tms_run[1]:scan=5\tK\tR\t12\t16";
const PSM_2: &str = "PSM\tKDEL\t2\tP12345\t0\tUniProtKB\t2011_11\t[MS, MS:1001207, Mascot, ]\t30.1\tnull\tnull\t1\t500.3\t500.2\tms_run[2]:scan=7\tR\t-\t100\t103";

fn document(lines: &[&str]) -> String {
    let mut text = METADATA.to_string();
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text
}

fn valid() -> String {
    document(&[PRH, PRT, PSH, PSM_1, PSM_2])
}

fn parse(text: &str) -> ParseResult {
    MzTabParser::default().parse_str(text)
}

fn parse_with(config: ParserConfig, text: &str) -> ParseResult {
    MzTabParser::new(config).parse_str(text)
}

#[test]
fn test_valid_file_is_clean() {
    let result = parse(&valid());
    assert!(result.abort.is_none());
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert!(result.is_valid());

    let file = &result.file;
    assert_eq!(file.metadata.ids(ElementKind::MsRun), vec![1, 2]);
    assert_eq!(file.comments.len(), 1);
    assert_eq!(file.comments[0].text, "identifications from one search");
    assert_eq!(file.comments[0].line, 12);

    let protein = file.protein.as_ref().unwrap();
    assert_eq!(protein.len(), 1);
    assert_eq!(protein.schema.optional_count(), 4);
    let record = &protein.records[0];
    assert_eq!(protein.value(record, "taxid"), Some(&Value::Integer(10116)));
    assert_eq!(
        protein.value(record, "opt_global_note"),
        Some(&Value::String("hello".to_string()))
    );
    assert_eq!(record.line, 14);

    let psm = file.psm.as_ref().unwrap();
    assert_eq!(psm.len(), 2);
    assert!(file.peptide.is_none());
}

#[test]
fn test_physical_order_does_not_matter() {
    let prh = PRH.replace("\taccession\tdescription", "\tdescription\taccession");
    let prt = PRT.replace(
        "\tP12345\tAspartate aminotransferase",
        "\tAspartate aminotransferase\tP12345",
    );
    let result = parse(&document(&[&prh, &prt]));
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let protein = result.file.protein.as_ref().unwrap();
    assert_eq!(
        protein.value(&protein.records[0], "accession"),
        Some(&Value::String("P12345".to_string()))
    );
}

#[test]
fn test_undeclared_ms_run_reported_once_and_kept() {
    let first = PSM_1.replace("ms_run[1]:scan=5", "ms_run[9]:scan=5");
    let second = PSM_2.replace("ms_run[2]:scan=7", "ms_run[9]:scan=7");
    let result = parse(&document(&[PSH, &first, &second]));

    assert_eq!(result.errors.count(ErrorCode::MsRunNotDefined), 1);
    let psm = result.file.psm.as_ref().unwrap();
    let refs = psm
        .value(&psm.records[1], "spectra_ref")
        .and_then(Value::as_spectra_refs)
        .unwrap();
    assert_eq!(refs.as_slice()[0].ms_run, 9);
}

#[test]
fn test_modification_position_out_of_bounds() {
    let row = PSM_1.replace("3-UNIMOD:35", "8-UNIMOD:35");
    let result = parse(&document(&[PSH, &row]));
    let errors = result.errors.filter(ErrorLevel::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code(), ErrorCode::ModificationPosition);
    assert!(errors[0].message().contains("0..6"), "{}", errors[0]);
}

#[test]
fn test_data_line_without_header() {
    let result = parse(&document(&[PRT, PRH, PRT]));
    assert_eq!(result.errors.count(ErrorCode::LineOrder), 1);
    assert_eq!(result.file.protein.as_ref().unwrap().len(), 1);
}

#[test]
fn test_metadata_after_table_is_skipped() {
    let result = parse(&document(&[PRH, "MTD\ttitle\tlate title", PRT]));
    assert_eq!(result.errors.count(ErrorCode::LineOrder), 1);
    assert!(result
        .file
        .metadata
        .scalar(crate::metadata::ScalarKey::Title)
        .is_none());
    assert_eq!(result.file.protein.as_ref().unwrap().len(), 1);
}

#[test]
fn test_sections_out_of_order_are_still_parsed() {
    let result = parse(&document(&[PSH, PSM_1, PRH, PRT]));
    assert_eq!(result.errors.count(ErrorCode::LineOrder), 1);
    assert_eq!(result.file.protein.as_ref().unwrap().len(), 1);
    assert_eq!(result.file.psm.as_ref().unwrap().len(), 1);
}

#[test]
fn test_repeated_header_is_skipped() {
    let result = parse(&document(&[PRH, PRT, PRH]));
    assert_eq!(result.errors.count(ErrorCode::LineOrder), 1);
    assert_eq!(result.file.protein.as_ref().unwrap().len(), 1);
}

#[test]
fn test_unknown_prefix_and_field_count() {
    let short = PRT.replace("\thello", "");
    let result = parse(&document(&[PRH, "XYZ\tsomething", &short, PRT]));
    assert_eq!(result.errors.count(ErrorCode::LinePrefix), 1);
    assert_eq!(result.errors.count(ErrorCode::CountMatch), 1);
    assert_eq!(
        result.errors.iter().find(|e| e.code() == ErrorCode::CountMatch).unwrap().message(),
        "PRT line has 13 fields but its header declares 14 columns."
    );
    assert_eq!(result.file.protein.as_ref().unwrap().len(), 1);
}

#[test]
fn test_unknown_metadata_key_is_fatal() {
    let text = format!("MTD\tmzTab-colour\tblue\n{}", valid());
    let result = parse(&text);
    assert!(matches!(result.abort, Some(ParseAbort::Fatal(_))));
    assert_eq!(result.errors.count(ErrorCode::MetadataKey), 1);
    assert!(result.file.protein.is_none());
    assert!(!result.is_valid());
}

#[test]
fn test_invalid_header_is_fatal() {
    let prh = format!("{}\tcolour", PRH);
    let result = parse(&document(&[&prh, PRT]));
    match &result.abort {
        Some(ParseAbort::Fatal(error)) => assert_eq!(error.code(), ErrorCode::HeaderColumn),
        other => panic!("unexpected abort {:?}", other),
    }
    assert!(result.file.protein.is_none());
}

#[test]
fn test_overflow_aborts() {
    let config = ParserConfig::default().with_max_error_count(2);
    let result = parse_with(config, "AAA\t1\nBBB\t2\nCCC\t3\n");
    assert!(matches!(result.abort, Some(ParseAbort::Overflow(_))));
    assert_eq!(result.errors.len(), 2);
}

#[test]
fn test_decode_failure_keeps_row() {
    let row = PRT.replace("\t10116\t", "\tten\t");
    let result = parse(&document(&[PRH, &row]));
    assert_eq!(result.errors.count(ErrorCode::Integer), 1);
    let protein = result.file.protein.as_ref().unwrap();
    assert_eq!(protein.value(&protein.records[0], "taxid"), Some(&Value::Null));
}

#[test]
fn test_row_checks() {
    let duplicate = PSM_2.replace("\t2\tP12345", "\t1\tP12345");
    let lowercase = PSM_1.replace("EIEIL", "eieil").replace("\t1\tP12345", "\t3\tP12345");
    let unscored_engine = PSM_1
        .replace("\t1\tP12345", "\t4\tP12345")
        .replace("[MS, MS:1001207, Mascot, ]", "null");
    let chemmod = PSM_1
        .replace("\t1\tP12345", "\t5\tP12345")
        .replace("3-UNIMOD:35", "3-CHEMMOD:+15.995");
    let result = parse(&document(&[
        PRH,
        PRT,
        PRT,
        PSH,
        PSM_1,
        &duplicate,
        &lowercase,
        &unscored_engine,
        &chemmod,
    ]));

    assert_eq!(result.errors.count(ErrorCode::DuplicationAccession), 1);
    assert_eq!(result.errors.count(ErrorCode::DuplicationId), 1);
    assert_eq!(result.errors.count(ErrorCode::Sequence), 1);
    assert_eq!(result.errors.count(ErrorCode::SearchEngineScore), 1);
    assert_eq!(result.errors.count(ErrorCode::ChemMods), 1);
}

#[test]
fn test_reporting_level_skips_checks() {
    let chemmod = PSM_1.replace("3-UNIMOD:35", "3-CHEMMOD:+15.995");
    let text = document(&[PSH, &chemmod]);

    let result = parse(&text);
    assert_eq!(result.errors.count(ErrorCode::ChemMods), 1);

    let result = parse_with(ParserConfig::errors_only(), &text);
    assert!(result.errors.is_empty());
}

#[test]
fn test_protein_coverage_range() {
    let row = PRT.replace("\t0.4\t", "\t1.4\t");
    let result = parse(&document(&[PRH, &row]));
    assert_eq!(result.errors.count(ErrorCode::ProteinCoverage), 1);
}

#[test]
fn test_encodings() {
    let text = valid().replace("Example identification file", "Caf~ study");
    let bytes: Vec<u8> = text.bytes().map(|b| if b == b'~' { 0xE9 } else { b }).collect();

    let result = MzTabParser::default().parse_reader(&bytes[..]);
    assert!(matches!(
        result.abort,
        Some(ParseAbort::Encoding { line: 4, .. })
    ));

    let latin1 = ParserConfig::default().with_encoding(TextEncoding::Latin1);
    let result = MzTabParser::new(latin1).parse_reader(&bytes[..]);
    assert!(result.abort.is_none());
    assert_eq!(
        result.file.metadata.scalar(crate::metadata::ScalarKey::Description),
        Some(&Value::String("Café study".to_string()))
    );
}

#[test]
fn test_byte_order_mark_is_ignored() {
    let text = format!("\u{feff}{}", valid());
    let result = parse(&text);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}

#[test]
fn test_cv_lookup() {
    let row = PRT.replace("[MS, MS:1001207, Mascot, ]", "[MS, MS:1001207, Mascott, ]");
    let text = document(&[PRH, &row]);

    assert!(parse(&text).errors.is_empty());

    let result = parse_with(ParserConfig::default().with_cv_lookup(true), &text);
    assert_eq!(result.errors.count(ErrorCode::CvTermMismatch), 1);
    assert_eq!(result.errors.count(ErrorCode::CvUnknownTerm), 0);
}

#[test]
fn test_cv_lookup_on_many_rows() {
    let rows: Vec<String> = (1..=400)
        .map(|id| {
            PSM_1
                .replacen("\t1\tP12345", &format!("\t{}\tP12345", id), 1)
                .replace("[MS, MS:1001207, Mascot, ]", "[MS, MS:1001456, X!Tandem, ]")
        })
        .collect();
    let mut lines = vec![PSH];
    lines.extend(rows.iter().map(String::as_str));
    let text = document(&lines);

    let result = parse_with(ParserConfig::default().with_cv_lookup(true), &text);
    assert!(result.abort.is_none(), "{:?}", result.abort);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(result.file.psm.as_ref().unwrap().len(), 400);

    let misnamed = text.replace("[MS, MS:1001456, X!Tandem, ]", "[MS, MS:1001207, Mascott, ]");
    let result = parse_with(ParserConfig::default().with_cv_lookup(true), &misnamed);
    assert!(result.abort.is_none(), "{:?}", result.abort);
    assert_eq!(result.errors.count(ErrorCode::CvTermMismatch), 1);
}

#[test]
fn test_streaming_driver_keeps_partial_state() {
    let mut driver = SectionDriver::new(ParserConfig::default());
    for (i, line) in valid().lines().take(14).enumerate() {
        driver.feed_line(i + 1, line).unwrap();
    }
    assert_eq!(driver.file().protein.as_ref().unwrap().len(), 1);

    let abort = driver.feed_line(15, "MTD\tbad-key\tx");
    assert!(abort.is_ok(), "metadata after a table is only out of order");
    assert!(!driver.is_halted());

    let result = driver.abort(ParseAbort::Io(std::io::Error::new(
        std::io::ErrorKind::Interrupted,
        "stopped by caller",
    )));
    assert_eq!(result.file.protein.as_ref().unwrap().len(), 1);
    assert_eq!(result.errors.count(ErrorCode::LineOrder), 1);
}

#[test]
fn test_missing_mandatory_metadata() {
    let text = format!("MTD\tmzTab-version\t1.1.0\n{}\n{}\n", PRH, PRT);
    let result = parse(&text);
    // mode, type, description, ms_run location, fixed and variable mods,
    // then the protein score declaration needed by the header
    assert_eq!(result.errors.count(ErrorCode::NotDefineInMetadata), 7);
    assert_eq!(result.errors.count(ErrorCode::MsRunNotDefined), 1);
    assert_eq!(result.errors.count(ErrorCode::MzTabVersion), 1);
}

#[test]
fn test_parse_file_missing() {
    let result = MzTabParser::default().parse_file("/nonexistent/file.mzTab");
    assert!(matches!(result.abort, Some(ParseAbort::Io(_))));
}
