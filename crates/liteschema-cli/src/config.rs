use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::CliError;
use crate::logging::LogLevel;
use crate::Format;

/// Defaults read from a TOML file; command-line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub format: Option<Format>,
    pub verbose: Option<bool>,
    pub max_workers: Option<usize>,
    pub include_views: Option<bool>,
    pub include_system_tables: Option<bool>,
    pub log_level: Option<LogLevel>,
    pub log_file: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<CliConfig, CliError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<CliConfig, CliError> {
    let config: CliConfig = toml::from_str(content)?;
    if config.max_workers == Some(0) {
        return Err(CliError::InvalidConfig(
            "max_workers must be at least 1".to_string(),
        ));
    }
    Ok(config)
}
