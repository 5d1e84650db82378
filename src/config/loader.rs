//! Configuration loading from disk and environment.

use std::path::{Path, PathBuf};
use std::fs;
use crate::config::schema::NudgeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: String, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, value } => write!(f, "Invalid value for {}: '{}'", var, value),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<NudgeConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: NudgeConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load the effective configuration: file (if present), then environment overrides.
///
/// A missing file yields defaults; a present but broken file is an error.
pub fn load_effective(path: Option<&Path>) -> Result<NudgeConfig, ConfigError> {
    let mut config = match path {
        Some(p) if p.exists() => {
            let content = fs::read_to_string(p).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        Some(p) => {
            tracing::info!(path = ?p, "Config file not found, using defaults");
            NudgeConfig::default()
        }
        None => NudgeConfig::default(),
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply `NUDGE_*` overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut NudgeConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("NUDGE_QUIET_HOURS_START") {
        config.schedule.quiet_hours_start = parse_env("NUDGE_QUIET_HOURS_START", &v)?;
    }
    if let Some(v) = lookup("NUDGE_QUIET_HOURS_END") {
        config.schedule.quiet_hours_end = parse_env("NUDGE_QUIET_HOURS_END", &v)?;
    }
    if let Some(v) = lookup("NUDGE_CADENCE_DAYS") {
        config.schedule.cadence_days = parse_env("NUDGE_CADENCE_DAYS", &v)?;
    }
    if let Some(v) = lookup("NUDGE_REGION") {
        config.fetch.region = v;
    }
    if let Some(v) = lookup("NUDGE_DATA_DIR") {
        config.storage.data_dir = PathBuf::from(v);
    }
    Ok(())
}

fn parse_env(var: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env {
        var: var.to_string(),
        value: value.to_string(),
    })
}
