//! CLI argument definitions for the INCA import.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use inca_db::{DEFAULT_COMPARISON_FILE, DEFAULT_DUMP_FILE};

#[derive(Parser)]
#[command(
    name = "inca-import",
    version,
    about = "Import provider variant reports into the INCA database",
    long_about = "Convert provider report JSON files into INCA records.\n\n\
                  Each sample's panel selection is resolved to a clinical R code through\n\
                  the generated panel mapping, with manual overrides filling its gaps."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Log sample numbers and report names instead of redacting them.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse reports into INCA records, optionally writing a dump or inserting them.
    Import(ImportArgs),

    /// Insert a previously written JSON dump.
    LoadDump(LoadDumpArgs),

    /// Generate the panel mapping table from the panel dump.
    GenerateMapping(GenerateMappingArgs),

    /// Show how every manifest sample's panels resolve.
    Resolve(ResolveArgs),

    /// Compare column values between two INCA databases.
    Compare(CompareArgs),
}

/// Lookup table inputs shared by `import` and `resolve`.
#[derive(Args)]
pub struct PanelArgs {
    /// Manifest CSV with sample numbers and panel selections.
    #[arg(long = "manifest", value_name = "FILE")]
    pub manifest: PathBuf,

    /// Panel database dump (TSV).
    #[arg(long = "panel-dump", value_name = "FILE")]
    pub panel_dump: PathBuf,

    /// Manually curated panel overrides (TSV).
    #[arg(long = "manual-overrides", value_name = "FILE")]
    pub manual_overrides: PathBuf,

    /// Pre-generated mapping (TSV); generated from the panel dump when omitted.
    #[arg(long = "mapping", value_name = "FILE")]
    pub mapping: Option<PathBuf>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Report JSON files or directories containing them.
    #[arg(value_name = "REPORT", required = true)]
    pub reports: Vec<PathBuf>,

    #[command(flatten)]
    pub panels: PanelArgs,

    /// JSON field map describing which report values become which columns.
    #[arg(long = "field-map", value_name = "FILE")]
    pub field_map: PathBuf,

    /// Database credentials (JSON).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the records to a JSON dump.
    #[arg(
        long = "write",
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = DEFAULT_DUMP_FILE
    )]
    pub write: Option<PathBuf>,

    /// Insert the records into the database.
    #[arg(long = "db", requires = "config")]
    pub db: bool,
}

#[derive(Args)]
pub struct LoadDumpArgs {
    /// JSON dump written by `import --write`.
    #[arg(value_name = "DUMP")]
    pub dump: PathBuf,

    /// Database credentials (JSON).
    #[arg(long = "config", value_name = "FILE")]
    pub config: PathBuf,
}

#[derive(Args)]
pub struct GenerateMappingArgs {
    /// Manifest CSV with sample numbers and panel selections.
    #[arg(long = "manifest", value_name = "FILE")]
    pub manifest: PathBuf,

    /// Panel database dump (TSV).
    #[arg(long = "panel-dump", value_name = "FILE")]
    pub panel_dump: PathBuf,

    /// Output mapping TSV.
    #[arg(long = "output", value_name = "FILE")]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub panels: PanelArgs,
}

#[derive(Args)]
pub struct CompareArgs {
    /// Credentials of the development database.
    #[arg(value_name = "CONFIG_DEV")]
    pub config_dev: PathBuf,

    /// Credentials of the production database.
    #[arg(value_name = "CONFIG_PROD")]
    pub config_prod: PathBuf,

    /// Output TSV.
    #[arg(long = "output", value_name = "FILE", default_value = DEFAULT_COMPARISON_FILE)]
    pub output: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
