//! INCA import CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use inca_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    run_compare, run_generate_mapping, run_import_command, run_load_dump, run_resolve,
};
use crate::summary::{print_comparison, print_import_summary, print_resolutions};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match &cli.command {
        Command::Import(args) => match run_import_command(args) {
            Ok(result) => {
                print_import_summary(&result);
                if result.has_errors { 1 } else { 0 }
            }
            Err(error) => report_error(&error),
        },
        Command::LoadDump(args) => match run_load_dump(args) {
            Ok(count) => {
                println!("Inserted rows: {count}");
                0
            }
            Err(error) => report_error(&error),
        },
        Command::GenerateMapping(args) => match run_generate_mapping(args) {
            Ok(mapping) => {
                println!(
                    "Mapping: {} ({} panels)",
                    args.output.display(),
                    mapping.len()
                );
                0
            }
            Err(error) => report_error(&error),
        },
        Command::Resolve(args) => match run_resolve(args) {
            Ok(resolutions) => {
                print_resolutions(&resolutions);
                0
            }
            Err(error) => report_error(&error),
        },
        Command::Compare(args) => match run_compare(args) {
            Ok(comparisons) => {
                print_comparison(&comparisons);
                println!("Comparison: {}", args.output.display());
                0
            }
            Err(error) => report_error(&error),
        },
    };
    std::process::exit(exit_code);
}

fn report_error(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    1
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let mut config = LogConfig::default()
        .with_level_filter(level_filter)
        .with_format(format)
        .with_log_file(cli.log_file.clone())
        .with_log_data(cli.log_data);
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
