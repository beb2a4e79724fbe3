//! CLI argument definitions for the upload dashboard.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use dash_model::SelectionKey;

#[derive(Parser)]
#[command(
    name = "dash",
    version,
    about = "Upload dashboard - tables, insights and charts from a data file",
    long_about = "Parse a CSV, XLSX, JSON or PDF file into a table and show a preview,\n\
                  summary insights and the charts its column types allow.\n\n\
                  CSV files that are not UTF-8 are decoded with a detected encoding."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Render the dashboard for one file and exit.
    Show(ShowArgs),

    /// Interactive session reading commands from stdin.
    Session(SessionArgs),

    /// List supported file formats.
    Formats,
}

#[derive(Parser)]
pub struct ShowArgs {
    /// File to upload (.csv, .xlsx, .json or .pdf).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Choose the column for a chart selector, e.g. `bar.value=Sales`.
    #[arg(long = "select", value_name = "KEY=COLUMN", value_parser = parse_selection)]
    pub select: Vec<(SelectionKey, String)>,

    /// Print the dashboard as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,

    /// TOML settings file.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Parser)]
pub struct SessionArgs {
    /// File to upload before reading commands.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// TOML settings file.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Parses `KEY=COLUMN`; the column may itself contain `=`.
pub fn parse_selection(value: &str) -> Result<(SelectionKey, String), String> {
    let (key, column) = value
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=COLUMN, got '{value}'"))?;
    let key: SelectionKey = key.parse().map_err(|error| format!("{error}"))?;
    if column.is_empty() {
        return Err(format!("no column given for '{key}'"));
    }
    Ok((key, column.to_string()))
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

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use dash_model::{ChartKind, SelectionRole};

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn selections_parse() {
        let (key, column) = parse_selection("bar.value=Unit Price").unwrap();
        assert_eq!(key, SelectionKey::new(ChartKind::Bar, SelectionRole::Value));
        assert_eq!(column, "Unit Price");

        let (_, column) = parse_selection("pie.column=a=b").unwrap();
        assert_eq!(column, "a=b");
    }

    #[test]
    fn bad_selections_are_rejected() {
        assert!(parse_selection("bar.value").is_err());
        assert!(parse_selection("bar.value=").is_err());
        assert!(parse_selection("radar.x=a").is_err());
    }

    #[test]
    fn show_collects_repeated_selects() {
        let cli = Cli::try_parse_from([
            "dash",
            "show",
            "data.csv",
            "--select",
            "scatter.x=a",
            "--select",
            "scatter.y=b",
            "--json",
        ])
        .unwrap();
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.select.len(), 2);
        assert!(args.json);
    }
}
