use anyhow::Result;
use std::path::PathBuf;

use mztab::error::ErrorLevel;
use mztab::metadata::{ElementKind, ScalarKey};
use mztab::parser::MzTabParser;

use super::ParseArgs;

/// Display a summary of an mzTab file
pub fn run(file: PathBuf, args: ParseArgs) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let result = MzTabParser::new(args.parser_config()?).parse_file(&file);
    if let Some(abort) = &result.abort {
        eprintln!("Parsing stopped early: {}", abort);
    }
    let mztab = &result.file;
    let metadata = &mztab.metadata;

    println!("mzTab File Information");
    println!("======================");
    println!("File: {}", file.display());
    println!();

    let show = |label: &str, value: Option<String>| {
        println!("  {:<12} {}", label, value.unwrap_or_else(|| "<missing>".to_string()));
    };
    println!("Metadata:");
    show("Version:", metadata.version().map(str::to_string));
    show("Mode:", metadata.mode().map(|m| m.to_string()));
    show("Type:", metadata.mz_tab_type().map(|t| t.to_string()));
    for key in [ScalarKey::Id, ScalarKey::Title] {
        if let Some(value) = metadata.scalar(key) {
            println!("  {:<12} {}", format!("{}:", key.key_name()), value);
        }
    }
    println!();

    println!("Elements:");
    for kind in ElementKind::ALL {
        let count = metadata.elements_of(kind).count();
        if count > 0 {
            println!("  {:<34} {}", kind.key_name(), count);
        }
    }
    println!();

    println!("Sections:");
    if mztab.tables().next().is_none() {
        println!("  (none)");
    }
    for table in mztab.tables() {
        println!(
            "  {:<16} {:>6} rows  {:>4} columns ({} optional)",
            table.section.name(),
            table.len(),
            table.schema.len(),
            table.schema.optional_count()
        );
    }
    println!();

    let errors = result.errors.filter(ErrorLevel::Error).len();
    println!("Comments:    {}", mztab.comments.len());
    println!(
        "Diagnostics: {} ({} at Error level)",
        result.errors.len(),
        errors
    );

    Ok(())
}
