//! Recipe import from tabular text and JSON5 streams
//!
//! Both formats describe each recipe as an output (name + quantity) and a grid
//! of `height` rows by `width` tokens, top row first. The empty-cell token
//! (default `-`) is skipped; every other token becomes one
//! [`Recipe::insert`] call, and the finished recipe is registered.
//!
//! Row `r` maps to `y = height - 1 - r` and column `c` to `x = c`, so the first
//! row written is the top of the grid.
//!
//! In lenient mode malformed records are skipped with a [`Warning`]; in strict
//! mode the first one aborts the import. Duplicate recipes abort in both modes.

mod stream;
mod table;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

use crate::grid::{Grid, Position};
use crate::models::{Output, Warning};
use crate::recipe::{Recipe, RecipeError};
use crate::registry::{RecipeRegistry, RegistryError};
use crate::tokenizer::tokenize;

pub use stream::read_records;
pub use table::{read_layouts, split_records, Layout, RawRecord};

/// Default token for an empty cell.
pub const DEFAULT_EMPTY_TOKEN: &str = "-";

/// Error that aborts an import.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImportError {
    /// Record structure was wrong (header, row count, row width, JSON5 syntax)
    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },
    /// A cell could not be placed
    #[error("line {line}: {source}")]
    Recipe {
        line: usize,
        #[source]
        source: RecipeError,
    },
    /// The registry rejected the recipe
    #[error("line {line}: recipe for '{output}': {source}")]
    Registry {
        line: usize,
        output: String,
        #[source]
        source: RegistryError,
    },
    /// Reading the input failed
    #[error("Failed to read recipes: {0}")]
    Io(#[from] std::io::Error),
}

impl ImportError {
    /// Line the offending record starts on, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            ImportError::Malformed { line, .. }
            | ImportError::Recipe { line, .. }
            | ImportError::Registry { line, .. } => Some(*line),
            ImportError::Io(_) => None,
        }
    }

    /// Short machine-readable kind, used for error telemetry.
    pub fn kind(&self) -> &'static str {
        match self {
            ImportError::Malformed { .. } => "malformed_record",
            ImportError::Recipe { source: RecipeError::OutOfBounds { .. }, .. } => "out_of_bounds",
            ImportError::Recipe { .. } => "empty_recipe",
            ImportError::Registry { source: RegistryError::DuplicateRecipe { .. }, .. } => {
                "duplicate_recipe"
            }
            ImportError::Registry { .. } => "registry_error",
            ImportError::Io(_) => "io_error",
        }
    }

    /// True for errors that abort an import even in lenient mode.
    fn is_fatal(&self) -> bool {
        matches!(
            self,
            ImportError::Io(_)
                | ImportError::Registry { source: RegistryError::DuplicateRecipe { .. }, .. }
        )
    }
}

/// Settings controlling how records are turned into recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    pub grid: Grid,
    /// Token marking an empty cell
    pub empty: String,
    /// Abort on the first malformed record instead of skipping it
    pub strict: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self { grid: Grid::default(), empty: DEFAULT_EMPTY_TOKEN.to_string(), strict: false }
    }
}

/// Result of a completed import.
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub registry: RecipeRegistry,
    pub warnings: Vec<Warning>,
    /// Number of records skipped in lenient mode
    pub skipped: usize,
}

/// Build a recipe from grid rows on consecutive lines, top row first.
///
/// `line` is the line number of the first row, used for error reporting.
/// Rows must match the grid exactly: `height` rows of `width` tokens each.
pub fn build_recipe<S: AsRef<str>>(
    rows: &[S],
    line: usize,
    options: &ImportOptions,
) -> Result<Recipe, ImportError> {
    let numbered: Vec<(usize, &str)> =
        rows.iter().enumerate().map(|(r, row)| (line + r, row.as_ref())).collect();
    build_recipe_from_lines(&numbered, line, options)
}

/// Build a recipe from grid rows tagged with the line each was read from.
///
/// Cell errors point at the row's own line; a wrong row count is reported at
/// `line`.
pub fn build_recipe_from_lines<S: AsRef<str>>(
    rows: &[(usize, S)],
    line: usize,
    options: &ImportOptions,
) -> Result<Recipe, ImportError> {
    let grid = options.grid;
    if rows.len() != grid.height() as usize {
        return Err(ImportError::Malformed {
            line,
            message: format!("expected {} grid rows, found {}", grid.height(), rows.len()),
        });
    }

    let mut recipe = Recipe::new(grid);
    for (r, (row_line, row)) in rows.iter().enumerate() {
        let row_line = *row_line;
        let tokens = tokenize(row.as_ref());
        if tokens.len() != grid.width() as usize {
            return Err(ImportError::Malformed {
                line: row_line,
                message: format!("expected {} cells in row, found {}", grid.width(), tokens.len()),
            });
        }

        let y = grid.height() - 1 - r as u32;
        for (x, token) in tokens.into_iter().enumerate() {
            if token == options.empty {
                continue;
            }
            recipe
                .insert(Position::new(x as u32, y), token)
                .map_err(|source| ImportError::Recipe { line: row_line, source })?;
        }
    }
    Ok(recipe)
}

/// Accumulates recipes from any number of sources into one registry.
///
/// Duplicates are detected across every source read by the same importer.
#[derive(Debug)]
pub struct Importer {
    options: ImportOptions,
    registry: RecipeRegistry,
    warnings: Vec<Warning>,
    skipped: usize,
}

impl Importer {
    pub fn new(options: ImportOptions) -> Self {
        let registry = RecipeRegistry::new(options.grid);
        Self { options, registry, warnings: Vec::new(), skipped: 0 }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Read a tabular recipe file.
    pub fn read_table<R: Read>(&mut self, reader: R) -> Result<(), ImportError> {
        for record in split_records(reader)? {
            let outcome = record.output().and_then(|output| {
                let recipe =
                    build_recipe_from_lines(&record.rows, record.grid_line(), &self.options)?;
                self.register(record.line, recipe, output)
            });
            self.settle(outcome)?;
        }
        Ok(())
    }

    /// Read a JSON5 stream of `{ output, quantity, grid }` objects.
    pub fn read_stream<R: Read>(&mut self, reader: R) -> Result<(), ImportError> {
        for parsed in read_records(reader)? {
            let outcome = parsed.and_then(|(line, record)| {
                // Rows of one object all report the line the object starts on
                let rows: Vec<(usize, &str)> =
                    record.grid.iter().map(|row| (line, row.as_str())).collect();
                let recipe = build_recipe_from_lines(&rows, line, &self.options)?;
                self.register(line, recipe, Output::new(record.output, record.quantity))
            });
            self.settle(outcome)?;
        }
        Ok(())
    }

    /// Read a file, choosing the format from its extension (`.jsonl`/`.json5`
    /// are streams, anything else is tabular).
    pub fn read_file(&mut self, path: &Path) -> Result<(), ImportError> {
        let reader = BufReader::new(File::open(path)?);
        if is_stream_file(path) {
            self.read_stream(reader)
        } else {
            self.read_table(reader)
        }
    }

    /// Drain the warnings collected so far.
    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn finish(self) -> ImportResult {
        ImportResult { registry: self.registry, warnings: self.warnings, skipped: self.skipped }
    }

    fn register(&mut self, line: usize, recipe: Recipe, output: Output) -> Result<(), ImportError> {
        let name = output.name.clone();
        self.registry.register(recipe, output).map_err(|source| match source {
            RegistryError::Recipe(source) => ImportError::Recipe { line, source },
            source => ImportError::Registry { line, output: name, source },
        })
    }

    /// Apply the strict/lenient policy to one record's outcome.
    fn settle(&mut self, outcome: Result<(), ImportError>) -> Result<(), ImportError> {
        match outcome {
            Ok(()) => Ok(()),
            Err(err) if err.is_fatal() || self.options.strict => Err(err),
            Err(err) => {
                let line = err.line().unwrap_or(0);
                self.warnings.push(Warning::new(format!("skipped record: {}", err), line));
                self.skipped += 1;
                Ok(())
            }
        }
    }
}

/// Import a single tabular source.
pub fn import_table<R: Read>(
    reader: R,
    options: &ImportOptions,
) -> Result<ImportResult, ImportError> {
    let mut importer = Importer::new(options.clone());
    importer.read_table(reader)?;
    Ok(importer.finish())
}

/// Import a single JSON5 stream.
pub fn import_stream<R: Read>(
    reader: R,
    options: &ImportOptions,
) -> Result<ImportResult, ImportError> {
    let mut importer = Importer::new(options.clone());
    importer.read_stream(reader)?;
    Ok(importer.finish())
}

/// Import a set of files into one registry.
pub fn import_files<P: AsRef<Path>>(
    paths: &[P],
    options: &ImportOptions,
) -> Result<ImportResult, ImportError> {
    let mut importer = Importer::new(options.clone());
    for path in paths {
        importer.read_file(path.as_ref())?;
    }
    Ok(importer.finish())
}

fn is_stream_file(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("jsonl") | Some("json5"))
}
