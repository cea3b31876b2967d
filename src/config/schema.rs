//! Configuration schema types for `craft.toml`
//!
//! Defines the structure and validation rules for craftgrid configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::grid::Grid;
use crate::import::{ImportOptions, DEFAULT_EMPTY_TOKEN};
use crate::tokenizer::is_valid_token;

/// Largest grid side accepted from configuration.
pub const MAX_GRID_SIDE: u32 = 64;

/// Crafting grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_side")]
    pub width: u32,
    #[serde(default = "default_side")]
    pub height: u32,
}

fn default_side() -> u32 {
    3
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { width: default_side(), height: default_side() }
    }
}

/// Recipe import settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Token marking an empty cell
    #[serde(default = "default_empty")]
    pub empty: String,
    /// Abort on the first malformed record
    #[serde(default)]
    pub strict: bool,
}

fn default_empty() -> String {
    DEFAULT_EMPTY_TOKEN.to_string()
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self { empty: default_empty(), strict: false }
    }
}

/// Local error telemetry settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Append import errors to a local JSONL file
    #[serde(default)]
    pub collect_errors: bool,
    #[serde(default = "default_telemetry_path")]
    pub path: PathBuf,
}

fn default_telemetry_path() -> PathBuf {
    PathBuf::from(".craftgrid/errors.jsonl")
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { collect_errors: false, path: default_telemetry_path() }
    }
}

/// Complete craft.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "grid.width")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "craft.toml: '{}' {}", self.field, self.message)
    }
}

impl CraftConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        for (field, side) in [("grid.width", self.grid.width), ("grid.height", self.grid.height)] {
            if side == 0 || side > MAX_GRID_SIDE {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: format!("must be between 1 and {}", MAX_GRID_SIDE),
                });
            }
        }

        if !is_valid_token(&self.import.empty) {
            errors.push(ConfigValidationError {
                field: "import.empty".to_string(),
                message: "must be a non-empty token without whitespace or commas".to_string(),
            });
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// The configured grid, falling back to the 3x3 table if the dimensions
    /// are invalid.
    pub fn grid(&self) -> Grid {
        Grid::new(self.grid.width, self.grid.height).unwrap_or_default()
    }

    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            grid: self.grid(),
            empty: self.import.empty.clone(),
            strict: self.import.strict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parse() {
        let config: CraftConfig = toml::from_str("").unwrap();
        assert_eq!(config, CraftConfig::default());
        assert_eq!(config.grid(), Grid::CRAFTING_TABLE);
        assert_eq!(config.import.empty, "-");
        assert!(!config.telemetry.collect_errors);
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[grid]
width = 2
height = 4

[import]
empty = "."
strict = true

[telemetry]
collect_errors = true
path = "logs/craft-errors.jsonl"
"#;
        let config: CraftConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.grid(), Grid::new(2, 4).unwrap());
        let options = config.import_options();
        assert_eq!(options.empty, ".");
        assert!(options.strict);
        assert_eq!(config.telemetry.path, PathBuf::from("logs/craft-errors.jsonl"));
    }

    #[test]
    fn test_partial_grid_section() {
        let config: CraftConfig = toml::from_str("[grid]\nwidth = 5\n").unwrap();
        assert_eq!(config.grid.width, 5);
        assert_eq!(config.grid.height, 3);
    }

    #[test]
    fn test_validate_zero_width() {
        let config: CraftConfig = toml::from_str("[grid]\nwidth = 0\n").unwrap();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "grid.width");
        assert!(!config.is_valid());
    }

    #[test]
    fn test_validate_oversized_grid() {
        let config: CraftConfig = toml::from_str("[grid]\nheight = 65\n").unwrap();
        assert_eq!(config.validate()[0].field, "grid.height");
    }

    #[test]
    fn test_validate_empty_token() {
        let config: CraftConfig = toml::from_str("[import]\nempty = \"a b\"\n").unwrap();
        let errors = config.validate();
        assert_eq!(errors[0].field, "import.empty");
        assert!(errors[0].to_string().starts_with("craft.toml: 'import.empty'"));
    }
}
