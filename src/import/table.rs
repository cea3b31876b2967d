//! Tabular recipe format
//!
//! ```text
//! # comment lines are ignored
//! torch 4
//! - - -
//! - coal -
//! - stick -
//!
//! planks, 4
//! - - -
//! - - -
//! log - -
//! ```
//!
//! Records are separated by blank lines. The header holds the output name and
//! quantity; the rows that follow are the grid, top row first.

use std::io::{BufRead, BufReader, Read};

use crate::models::{Output, Warning};
use crate::recipe::Recipe;
use crate::tokenizer::tokenize;

use super::{build_recipe_from_lines, ImportError, ImportOptions};

/// One blank-line separated record before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Line number of the header (1-based)
    pub line: usize,
    pub header: String,
    /// Grid rows with the line each was read from
    pub rows: Vec<(usize, String)>,
}

impl RawRecord {
    /// Parse the header as `<name> <quantity>`.
    pub fn output(&self) -> Result<Output, ImportError> {
        match tokenize(&self.header).as_slice() {
            [name, quantity] => {
                let quantity = quantity.parse::<u32>().map_err(|_| ImportError::Malformed {
                    line: self.line,
                    message: format!("invalid quantity '{}'", quantity),
                })?;
                Ok(Output::new(*name, quantity))
            }
            tokens => Err(ImportError::Malformed {
                line: self.line,
                message: format!(
                    "expected header '<name> <quantity>', found {} field(s)",
                    tokens.len()
                ),
            }),
        }
    }

    /// Line of the first grid row, or of the header when there are no rows.
    pub fn grid_line(&self) -> usize {
        self.rows.first().map_or(self.line, |(line, _)| *line)
    }

    /// Parse the header as a single label.
    pub fn label(&self) -> Result<String, ImportError> {
        match tokenize(&self.header).as_slice() {
            [label] => Ok(label.to_string()),
            tokens => Err(ImportError::Malformed {
                line: self.line,
                message: format!("expected a single label, found {} field(s)", tokens.len()),
            }),
        }
    }
}

/// Split a tabular source into raw records.
pub fn split_records<R: Read>(reader: R) -> std::io::Result<Vec<RawRecord>> {
    let mut records = Vec::new();
    let mut current: Option<RawRecord> = None;

    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.starts_with('#') {
            continue;
        }
        if trimmed.is_empty() {
            records.extend(current.take());
            continue;
        }

        match current.as_mut() {
            Some(record) => record.rows.push((index + 1, trimmed.to_string())),
            None => {
                current =
                    Some(RawRecord { line: index + 1, header: trimmed.to_string(), rows: Vec::new() })
            }
        }
    }
    records.extend(current);

    Ok(records)
}

/// A labelled query layout.
#[derive(Debug, Clone)]
pub struct Layout {
    pub label: String,
    pub line: usize,
    pub recipe: Recipe,
}

/// Read query layouts: records whose header is a single label.
///
/// Unlike recipes, layouts may be entirely empty. Malformed layouts are
/// skipped with a warning unless `options.strict` is set.
pub fn read_layouts<R: Read>(
    reader: R,
    options: &ImportOptions,
) -> Result<(Vec<Layout>, Vec<Warning>), ImportError> {
    let mut layouts = Vec::new();
    let mut warnings = Vec::new();

    for record in split_records(reader)? {
        let parsed = record.label().and_then(|label| {
            let recipe = build_recipe_from_lines(&record.rows, record.grid_line(), options)?;
            Ok(Layout { label, line: record.line, recipe })
        });
        match parsed {
            Ok(layout) => layouts.push(layout),
            Err(err) if options.strict => return Err(err),
            Err(err) => warnings.push(Warning::new(
                format!("skipped layout: {}", err),
                err.line().unwrap_or(record.line),
            )),
        }
    }

    Ok((layouts, warnings))
}
