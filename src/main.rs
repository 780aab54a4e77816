//! # mztab
//!
//! Command-line front end for the `mztab` library.
//!
//! ## Usage
//!
//! ```bash
//! # Validate a file, reporting warnings and errors
//! mztab validate results.mzTab --level warn
//!
//! # Machine-readable diagnostics
//! mztab validate results.mzTab --json
//!
//! # Summarize metadata and sections
//! mztab info results.mzTab
//!
//! # Re-serialize in canonical column order
//! mztab format results.mzTab normalized.mzTab
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
