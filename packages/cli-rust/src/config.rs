//! Command-line arguments and rendering configuration.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use liquid_logic_core::table::{SortOrder, SortState, DEFAULT_PAGE_SIZE};

/// Log line encoding on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Encoding of the command result on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "liquid-logic", version)]
#[command(about = "Run the Liquid Logic form and table engines over data files")]
pub struct Cli {
    /// Log encoding on stderr
    #[arg(long, value_enum, global = true, env = "LIQUID_LOG_FORMAT", default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sort, filter and paginate rows, then print one page
    Table(TableArgs),
    /// Evaluate visibility and validation for a form
    Form(FormArgs),
}

#[derive(Debug, Args)]
pub struct TableArgs {
    /// Column schema file (.json, .msgpack or .mp)
    #[arg(long)]
    pub columns: PathBuf,

    /// Row data file
    #[arg(long)]
    pub rows: PathBuf,

    /// Sort as `key` or `key:asc` / `key:desc`
    #[arg(long, value_parser = parse_sort)]
    pub sort: Option<SortState>,

    /// Filter as `key=text`; repeatable
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// 1-based page to print
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page
    #[arg(long, env = "LIQUID_PAGE_SIZE")]
    pub page_size: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(Debug, Args)]
pub struct FormArgs {
    /// Field schema file (.json, .msgpack or .mp)
    #[arg(long)]
    pub schema: PathBuf,

    /// Form data file; the schema's default values when omitted
    #[arg(long)]
    pub data: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

/// Text table rendering settings.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Rows per page when `--page-size` is not given.
    pub page_size: usize,
    /// Cells wider than this are cut, unless the column sets its own width.
    pub max_column_width: usize,
    /// Text between adjacent columns.
    pub column_gap: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_column_width: 40,
            column_gap: "  ".to_string(),
        }
    }
}

fn parse_sort(arg: &str) -> Result<SortState, String> {
    let (field, order) = match arg.split_once(':') {
        None => (arg, SortOrder::Asc),
        Some((field, "asc")) => (field, SortOrder::Asc),
        Some((field, "desc")) => (field, SortOrder::Desc),
        Some((_, other)) => return Err(format!("unknown sort order `{other}`, use asc or desc")),
    };
    if field.is_empty() {
        return Err("sort field must not be empty".to_string());
    }
    Ok(SortState::by(field, order))
}

fn parse_filter(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, text)) if !key.is_empty() => Ok((key.to_string(), text.to_string())),
        _ => Err(format!("expected `key=text`, got `{arg}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_argument_forms() {
        assert_eq!(parse_sort("name"), Ok(SortState::by("name", SortOrder::Asc)));
        assert_eq!(parse_sort("age:desc"), Ok(SortState::by("age", SortOrder::Desc)));
        assert!(parse_sort("age:up").is_err());
        assert!(parse_sort(":asc").is_err());
    }

    #[test]
    fn filter_argument_forms() {
        assert_eq!(
            parse_filter("name=am"),
            Ok(("name".to_string(), "am".to_string()))
        );
        assert_eq!(
            parse_filter("note=a=b"),
            Ok(("note".to_string(), "a=b".to_string()))
        );
        assert!(parse_filter("name").is_err());
        assert!(parse_filter("=x").is_err());
    }

    #[test]
    fn parses_table_command() {
        let cli = Cli::try_parse_from([
            "liquid-logic",
            "table",
            "--columns",
            "cols.json",
            "--rows",
            "rows.json",
            "--sort",
            "age:desc",
            "--filter",
            "name=a",
            "--filter",
            "dept=eng",
            "--page",
            "2",
            "--output",
            "json",
        ])
        .expect("parse");
        let Command::Table(args) = cli.command else {
            panic!("expected table command");
        };
        assert_eq!(args.sort, Some(SortState::by("age", SortOrder::Desc)));
        assert_eq!(args.filters.len(), 2);
        assert_eq!(args.page, 2);
        assert_eq!(args.output, OutputFormat::Json);
    }

    #[test]
    fn parses_form_command_with_global_log_format() {
        let cli = Cli::try_parse_from([
            "liquid-logic",
            "form",
            "--schema",
            "form.json",
            "--log-format",
            "json",
        ])
        .expect("parse");
        assert_eq!(cli.log_format, LogFormat::Json);
        let Command::Form(args) = cli.command else {
            panic!("expected form command");
        };
        assert!(args.data.is_none());
        assert_eq!(args.output, OutputFormat::Text);
    }

    #[test]
    fn table_config_defaults() {
        let config = TableConfig::default();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.max_column_width, 40);
    }
}
