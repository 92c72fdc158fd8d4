mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use liteschema_core::{Error as CoreError, OutputFormat, Verbosity};
use liteschema_introspect::{ExtractOptions, SchemaExtractor, SqliteCatalog};
use serde::Deserialize;
use thiserror::Error;

use config::{CliConfig, load_config};
use logging::{LogLevel, init_logging};

/// `ENOENT`, reported when the requested table does not exist.
const EXIT_NOT_FOUND: u8 = 2;

const DEFAULT_VERBOSITY: i64 = 3;
const VERBOSE_VERBOSITY: i64 = 5;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Config(#[from] toml::de::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl CliError {
    fn exit_status(&self) -> u8 {
        match self {
            Self::Core(CoreError::NotFound(_)) => EXIT_NOT_FOUND,
            _ => 1,
        }
    }

    fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Format {
    Text,
    Markdown,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Markdown => OutputFormat::Markdown,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "liteschema", version, about = "Print the schema of a SQLite database")]
struct Cli {
    /// Input SQLite file path.
    #[arg(value_name = "FILEPATH")]
    filepath: PathBuf,
    /// Only print the schema of this table.
    #[arg(long, value_name = "TABLE")]
    table: Option<String>,
    /// Output format [default: markdown].
    #[arg(long, value_enum)]
    format: Option<Format>,
    /// Show every field of every column.
    #[arg(short, long)]
    verbose: bool,
    /// Print debug messages.
    #[arg(long, conflicts_with = "quiet")]
    debug: bool,
    /// Suppress execution log messages.
    #[arg(long)]
    quiet: bool,
    /// Number of tables assembled concurrently.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    max_workers: Option<u16>,
    /// List views as tables without columns.
    #[arg(long)]
    include_views: bool,
    /// Print the raw catalog entries as JSON instead of table schemas.
    #[arg(long)]
    catalog: bool,
    /// TOML file with defaults for the options above.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Also append JSON log lines to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// Options after merging flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RunSettings {
    format: OutputFormat,
    verbosity: Verbosity,
    log_level: LogLevel,
    log_file: Option<PathBuf>,
    extract: ExtractOptions,
}

impl RunSettings {
    fn resolve(cli: &Cli, config: CliConfig) -> Self {
        let format = cli
            .format
            .or(config.format)
            .map(OutputFormat::from)
            .unwrap_or_default();
        let verbose = cli.verbose || config.verbose.unwrap_or(false);
        let verbosity = Verbosity::from_level(if verbose {
            VERBOSE_VERBOSITY
        } else {
            DEFAULT_VERBOSITY
        });
        let log_level = if cli.debug {
            LogLevel::Debug
        } else if cli.quiet {
            LogLevel::Quiet
        } else {
            config.log_level.unwrap_or_default()
        };
        let defaults = ExtractOptions::default();

        Self {
            format,
            verbosity,
            log_level,
            log_file: cli.log_file.clone().or(config.log_file),
            extract: ExtractOptions {
                include_system_tables: config
                    .include_system_tables
                    .unwrap_or(defaults.include_system_tables),
                include_views: cli.include_views
                    || config.include_views.unwrap_or(defaults.include_views),
                max_workers: cli
                    .max_workers
                    .map(usize::from)
                    .or(config.max_workers)
                    .unwrap_or(defaults.max_workers),
            },
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            return err.exit_code();
        }
    };
    if let Err(err) = init_logging(settings.log_level, settings.log_file.as_deref()) {
        eprintln!("{err}");
        return err.exit_code();
    }

    match run(&cli, &settings).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(CliError::Core(CoreError::NotFound(message))) => {
            let table = cli.table.as_deref().unwrap_or_default();
            tracing::error!(event = "table_not_found", detail = %message, "'{table}' not found in the database");
            ExitCode::from(EXIT_NOT_FOUND)
        }
        Err(err) => {
            tracing::error!(event = "run_failed", "{err}");
            err.exit_code()
        }
    }
}

fn load_settings(cli: &Cli) -> Result<RunSettings, CliError> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => CliConfig::default(),
    };
    Ok(RunSettings::resolve(cli, config))
}

async fn run(cli: &Cli, settings: &RunSettings) -> Result<String, CliError> {
    tracing::info!(
        event = "run_started",
        path = %cli.filepath.display(),
        format = ?settings.format,
        verbosity = settings.verbosity.level()
    );

    let catalog = SqliteCatalog::open(&cli.filepath).await?;
    let extractor = SchemaExtractor::with_options(catalog, settings.extract.clone());

    let output = if cli.catalog {
        let entries = extractor.fetch_catalog_entries().await?;
        tracing::info!(event = "catalog_fetched", entries = entries.len());
        serde_json::to_string_pretty(&entries)?
    } else if let Some(table_name) = &cli.table {
        let table = extractor.assemble_table(table_name).await?;
        tracing::info!(event = "table_assembled", table = %table.name, columns = table.attributes.len());
        table.dumps(settings.format, settings.verbosity)?
    } else {
        let schema = extractor.assemble_database().await?;
        tracing::info!(event = "database_assembled", tables = schema.tables.len());
        schema.dumps(settings.format, settings.verbosity)?
    };

    tracing::info!(event = "run_finished");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("liteschema").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn defaults_match_plain_invocation() {
        let cli = parse(&["db.sqlite3"]);
        let settings = RunSettings::resolve(&cli, CliConfig::default());
        assert_eq!(settings.format, OutputFormat::Markdown);
        assert_eq!(settings.verbosity, Verbosity::Constraints);
        assert_eq!(settings.log_level, LogLevel::Info);
        assert_eq!(settings.extract, ExtractOptions::default());
    }

    #[test]
    fn verbose_flag_renders_every_field() {
        let cli = parse(&["db.sqlite3", "-v", "--format", "text"]);
        let settings = RunSettings::resolve(&cli, CliConfig::default());
        assert_eq!(settings.format, OutputFormat::Text);
        assert_eq!(settings.verbosity, Verbosity::Full);
    }

    #[test]
    fn flags_override_config() {
        let cli = parse(&["db.sqlite3", "--format", "json", "--max-workers", "8", "--debug"]);
        let config = CliConfig {
            format: Some(Format::Text),
            max_workers: Some(2),
            include_views: Some(true),
            log_level: Some(LogLevel::Quiet),
            ..CliConfig::default()
        };
        let settings = RunSettings::resolve(&cli, config);
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.extract.max_workers, 8);
        assert!(settings.extract.include_views);
        assert_eq!(settings.log_level, LogLevel::Debug);
    }

    #[test]
    fn debug_and_quiet_conflict() {
        let result = Cli::try_parse_from(["liteschema", "db.sqlite3", "--debug", "--quiet"]);
        assert!(result.is_err());
    }

    #[test]
    fn zero_workers_is_rejected() {
        let result = Cli::try_parse_from(["liteschema", "db.sqlite3", "--max-workers", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn not_found_maps_to_enoent() {
        let err = CliError::Core(CoreError::NotFound("t".to_string()));
        assert_eq!(err.exit_status(), 2);
        let err = CliError::InvalidConfig("bad".to_string());
        assert_eq!(err.exit_status(), 1);
    }
}
