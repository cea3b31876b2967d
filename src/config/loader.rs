//! Configuration loading and discovery for `craft.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::CraftConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file name searched for in the working directory and its parents.
pub const CONFIG_FILE: &str = "craft.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse craft.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Override the empty-cell token
    pub empty: Option<String>,
    pub strict: Option<bool>,
    /// Enable error collection
    pub collect_errors: Option<bool>,
}

/// Find craft.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for craft.toml
/// 2. Check XDG_CONFIG_HOME/craftgrid/craft.toml (or ~/.config/craftgrid/craft.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find craft.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("craftgrid").join(CONFIG_FILE);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find craft.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from an already located craft.toml.
///
/// Discovery is left to the caller (see [`find_config`]). With no path the
/// default configuration is returned (3x3 grid, `-` for empty cells, lenient
/// import).
pub fn load_config(path: Option<&Path>) -> Result<CraftConfig, ConfigError> {
    match path {
        Some(p) => load_config_file(p),
        None => Ok(CraftConfig::default()),
    }
}

fn load_config_file(path: &Path) -> Result<CraftConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: CraftConfig = toml::from_str(&contents)?;
    check(&config)?;
    Ok(config)
}

fn check(config: &CraftConfig) -> Result<(), ConfigError> {
    let errors = config.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()))
    }
}

/// Merge CLI overrides into a configuration and re-validate it.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(
    config: &mut CraftConfig,
    overrides: &CliOverrides,
) -> Result<(), ConfigError> {
    if let Some(width) = overrides.width {
        config.grid.width = width;
    }
    if let Some(height) = overrides.height {
        config.grid.height = height;
    }
    if let Some(ref empty) = overrides.empty {
        config.import.empty = empty.clone();
    }
    if let Some(strict) = overrides.strict {
        config.import.strict = strict;
    }
    if let Some(collect_errors) = overrides.collect_errors {
        config.telemetry.collect_errors = collect_errors;
    }

    check(config)
}

/// Resolve a path relative to the directory holding the config file.
///
/// Absolute paths are returned unchanged.
pub fn resolve_path(config_path: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match config_path.parent() {
        Some(root) => root.join(path),
        None => path.to_path_buf(),
    }
}
