//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod check;
mod lookup;
mod variants;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glob::glob;

use crate::config::{self, CliOverrides, CraftConfig};
use crate::grid::Grid;
use crate::import::{build_recipe, ImportError, Importer};
use crate::recipe::Recipe;
use crate::registry::RecipeRegistry;
use crate::telemetry::{ErrorCollector, ErrorEntry};

pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;
/// Lookup found no matching recipe
pub(crate) const EXIT_NO_MATCH: u8 = 1;

/// Extensions recognised when scanning a directory for recipe files.
const RECIPE_EXTENSIONS: [&str; 4] = ["recipes", "txt", "jsonl", "json5"];

/// Check if a path has a recipe file extension.
pub fn is_recipe_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| RECIPE_EXTENSIONS.contains(&e))
}

/// Find all recipe files in a directory (recursively), sorted.
pub fn find_recipe_files(dir: &Path) -> Vec<PathBuf> {
    let pattern = format!("{}/**/*", dir.display());
    let mut files: Vec<PathBuf> = match glob(&pattern) {
        Ok(paths) => paths
            .filter_map(Result::ok)
            .filter(|p| p.is_file() && is_recipe_file(p))
            .collect(),
        Err(_) => Vec::new(),
    };

    files.sort();
    files
}

/// Craftgrid - match crafting grid layouts against shape-equivalent recipes
#[derive(Parser)]
#[command(name = "craft")]
#[command(about = "Craftgrid - match crafting grid layouts against shape-equivalent recipes")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(Args, Debug, Default, Clone)]
pub struct GlobalArgs {
    /// Path to craft.toml (default: search upwards from the working directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Grid width (overrides config)
    #[arg(long, global = true)]
    pub width: Option<u32>,

    /// Grid height (overrides config)
    #[arg(long, global = true)]
    pub height: Option<u32>,

    /// Token marking an empty cell (overrides config)
    #[arg(long, global = true)]
    pub empty: Option<String>,

    /// Strict mode: abort on the first malformed record
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import recipe files and report problems
    Check {
        /// Recipe files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up the output for a single layout
    Lookup {
        /// Recipe files or directories
        #[arg(short, long = "recipes", required = true, num_args = 1..)]
        recipes: Vec<PathBuf>,

        /// Grid row, top row first (repeat once per row)
        #[arg(long = "row", required = true, allow_hyphen_values = true)]
        rows: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up every layout in a layouts file
    Query {
        /// Layouts file: blank-line separated records, each a label line and grid rows
        layouts: PathBuf,

        /// Recipe files or directories
        #[arg(short, long = "recipes", required = true, num_args = 1..)]
        recipes: Vec<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the margins and every variant of a layout
    Variants {
        /// Grid row, top row first (repeat once per row)
        #[arg(long = "row", required = true, allow_hyphen_values = true)]
        rows: Vec<String>,
    },
}

/// Resolved configuration plus the error collector for one CLI run.
pub(crate) struct Session {
    pub config: CraftConfig,
    pub collector: ErrorCollector,
}

impl Session {
    /// Load config, apply CLI overrides, and set up telemetry.
    pub fn open(global: &GlobalArgs) -> Result<Self, ExitCode> {
        let config_path = global.config.clone().or_else(config::find_config);
        let mut config = match config::load_config(config_path.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                return Err(ExitCode::from(EXIT_ERROR));
            }
        };

        let overrides = CliOverrides {
            width: global.width,
            height: global.height,
            empty: global.empty.clone(),
            strict: global.strict.then_some(true),
            collect_errors: None,
        };
        if let Err(e) = config::merge_cli_overrides(&mut config, &overrides) {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_INVALID_ARGS));
        }

        let telemetry_path = match config_path {
            Some(ref path) => config::resolve_path(path, &config.telemetry.path),
            None => config.telemetry.path.clone(),
        };
        let collector = ErrorCollector::new(telemetry_path, config.telemetry.collect_errors);

        Ok(Self { config, collector })
    }

    pub fn grid(&self) -> Grid {
        self.config.grid()
    }

    /// Import every recipe file under `paths` into one registry.
    pub fn load_recipes(
        &self,
        command: &str,
        paths: &[PathBuf],
    ) -> Result<LoadedRecipes, ExitCode> {
        let files = expand_paths(paths);
        if files.is_empty() {
            eprintln!("Error: No recipe files found");
            return Err(ExitCode::from(EXIT_INVALID_ARGS));
        }

        let mut importer = Importer::new(self.config.import_options());
        let mut warnings = Vec::new();
        for file in &files {
            let result = importer.read_file(file);
            let display = file.display().to_string();
            warnings.extend(importer.take_warnings().into_iter().map(|w| FileWarning {
                file: display.clone(),
                line: w.line,
                message: w.message,
            }));
            if let Err(e) = result {
                self.report(command, &display, &e);
                return Err(ExitCode::from(EXIT_ERROR));
            }
        }

        let result = importer.finish();
        Ok(LoadedRecipes { registry: result.registry, warnings, skipped: result.skipped, files })
    }

    /// Build a query recipe from command-line rows.
    pub fn recipe_from_rows(&self, command: &str, rows: &[String]) -> Result<Recipe, ExitCode> {
        build_recipe(rows, 1, &self.config.import_options()).map_err(|e| {
            self.report(command, "--row", &e);
            ExitCode::from(EXIT_INVALID_ARGS)
        })
    }

    /// Print an import error and record it in telemetry.
    pub fn report(&self, command: &str, file: &str, error: &ImportError) {
        eprintln!("Error: {}: {}", file, error);
        let entry = ErrorEntry::from_import(command, error).with_file(file);
        if let Err(e) = self.collector.log(&entry) {
            eprintln!(
                "Warning: could not write error log '{}': {}",
                self.collector.path().display(),
                e
            );
        }
    }
}

/// A lenient-mode warning tied to the file it came from.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct FileWarning {
    pub file: String,
    pub line: usize,
    pub message: String,
}

impl FileWarning {
    pub fn print(&self) {
        eprintln!("Warning: {}:{}: {}", self.file, self.line, self.message);
    }
}

pub(crate) struct LoadedRecipes {
    pub registry: RecipeRegistry,
    pub warnings: Vec<FileWarning>,
    pub skipped: usize,
    pub files: Vec<PathBuf>,
}

/// Expand directories into the recipe files they contain.
fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(find_recipe_files(path));
        } else {
            files.push(path.clone());
        }
    }
    files
}

/// Parse arguments and run the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let session = match Session::open(&cli.global) {
        Ok(session) => session,
        Err(code) => return code,
    };

    match cli.command {
        Commands::Check { paths, json } => check::run_check(&session, &paths, json),
        Commands::Lookup { recipes, rows, json } => {
            lookup::run_lookup(&session, &recipes, &rows, json)
        }
        Commands::Query { layouts, recipes, json } => {
            lookup::run_query(&session, &layouts, &recipes, json)
        }
        Commands::Variants { rows } => variants::run_variants(&session, &rows),
    }
}
