use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use mztab::error::ErrorLevel;
use mztab::parser::TextEncoding;

mod config;
mod format;
mod info;
mod validate;

/// mztab - mzTab 1.0 validator and formatter
#[derive(Parser)]
#[command(name = "mztab")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Minimum diagnostic level to report.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LevelArg {
    Info,
    Warn,
    Error,
}

impl From<LevelArg> for ErrorLevel {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Info => ErrorLevel::Info,
            LevelArg::Warn => ErrorLevel::Warn,
            LevelArg::Error => ErrorLevel::Error,
        }
    }
}

/// Input text encoding.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum EncodingArg {
    Utf8,
    Latin1,
}

impl From<EncodingArg> for TextEncoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Utf8 => TextEncoding::Utf8,
            EncodingArg::Latin1 => TextEncoding::Latin1,
        }
    }
}

/// Parser settings shared by every subcommand that reads a file.
///
/// Flags override values loaded with `--config`.
#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Minimum level reported (info, warn, error)
    #[arg(short = 'l', long, value_enum)]
    level: Option<LevelArg>,

    /// Stop after this many diagnostics
    #[arg(long, value_name = "N")]
    max_errors: Option<usize>,

    /// Input text encoding
    #[arg(short = 'e', long, value_enum)]
    encoding: Option<EncodingArg>,

    /// Cross-check CV parameters against the bundled vocabulary
    #[arg(long)]
    cv_lookup: bool,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an mzTab file and report its diagnostics
    Validate {
        /// Input mzTab file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        parse: ParseArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display a summary of an mzTab file
    Info {
        /// Input mzTab file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        parse: ParseArgs,
    },

    /// Re-serialize an mzTab file in canonical column order
    Format {
        /// Input mzTab file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path (stdout when omitted)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        #[command(flatten)]
        parse: ParseArgs,

        /// Write even when the input has Error-level diagnostics
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Validate { file, parse, json } => validate::run(file, parse, json),
        Commands::Info { file, parse } => info::run(file, parse),
        Commands::Format {
            file,
            output,
            parse,
            force,
        } => format::run(file, output, parse, force),
    }
}
