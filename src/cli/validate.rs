use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use mztab::error::MzTabError;
use mztab::parser::MzTabParser;
use mztab::validator::ValidationReport;

use super::ParseArgs;

/// Report layout for `--json`.
#[derive(Serialize)]
struct JsonReport<'a> {
    file: String,
    valid: bool,
    aborted: Option<String>,
    error_count: usize,
    diagnostics: &'a [MzTabError],
}

/// Validate an mzTab file
pub fn run(file: PathBuf, args: ParseArgs, json: bool) -> Result<()> {
    let config = args.parser_config()?;
    let level = config.level;

    info!("mzTab Validator");
    info!("===============");
    info!("File: {}", file.display());
    info!("Reporting level: {}", level);

    let result = MzTabParser::new(config).parse_file(&file);
    let report = ValidationReport::from_parse(file.display().to_string(), &result, level);

    if json {
        let output = JsonReport {
            file: report.file_path.clone(),
            valid: result.is_valid(),
            aborted: result.abort.as_ref().map(ToString::to_string),
            error_count: result.errors.len(),
            diagnostics: &report.diagnostics,
        };
        let text = serde_json::to_string_pretty(&output).context("Failed to serialize report")?;
        println!("{}", text);
    } else {
        // Use colorized output if available
        #[cfg(feature = "colorized_output")]
        {
            println!("{}", report.format_colored());
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            println!("{}", report);
        }
    }

    // Exit with error code if validation failed
    if report.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}
