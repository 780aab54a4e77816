#![no_main]

use libfuzzer_sys::fuzz_target;
use mztab::parser::{MzTabParser, ParserConfig};

fuzz_target!(|data: &[u8]| {
    // Any input must parse to a result, never panic
    let parser = MzTabParser::new(ParserConfig::default().with_cv_lookup(true));
    let result = parser.parse_reader(data);

    // Whatever was recovered must also serialize without panicking
    if result.abort.is_none() {
        let _ = result.file.to_mztab_string();
    }
});
