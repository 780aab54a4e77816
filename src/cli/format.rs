use anyhow::{bail, Context, Result};
use log::{info, warn};
use std::io::Write;
use std::path::PathBuf;

use mztab::error::ErrorLevel;
use mztab::parser::MzTabParser;

use super::ParseArgs;

/// Parse an mzTab file and write it back in canonical form
pub fn run(file: PathBuf, output: Option<PathBuf>, args: ParseArgs, force: bool) -> Result<()> {
    let result = MzTabParser::new(args.parser_config()?).parse_file(&file);

    for error in result.errors.filter(ErrorLevel::Warn) {
        warn!("{}", error);
    }
    if !result.errors.is_clean() && !force {
        bail!(
            "{} has Error-level diagnostics; use --force to write it anyway",
            file.display()
        );
    }
    let (mztab, _) = result
        .into_result()
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    match output {
        Some(path) => {
            mztab
                .write_file(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            mztab
                .write_to(&mut handle)
                .context("Failed to write to stdout")?;
            handle.flush()?;
        }
    }
    Ok(())
}
