//! Data models shared across craftgrid (items, outputs, records, warnings)

use serde::{Deserialize, Serialize};
use std::fmt;

/// An item type placed in a grid cell, e.g. `stick` or `coal`.
///
/// Items are opaque: two items are the same material iff their names are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(String);

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Item {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Item {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a recipe produces: an item name and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Output {
    pub name: String,
    pub quantity: u32,
}

impl Output {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self { name: name.into(), quantity }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.name, self.quantity)
    }
}

/// A recipe record as written in a JSON5 recipe stream.
///
/// ```
/// use craftgrid::models::RecipeRecord;
///
/// let record: RecipeRecord =
///     json5::from_str(r#"{ output: "torch", quantity: 4, grid: ["- - -", "- coal -", "- stick -"] }"#)
///         .unwrap();
/// assert_eq!(record.output, "torch");
/// assert_eq!(record.grid.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub output: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Grid rows, top row first
    pub grid: Vec<String>,
}

fn default_quantity() -> u32 {
    1
}

/// A non-fatal problem found while reading recipe data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub message: String,
    pub line: usize,
}

impl Warning {
    pub fn new(message: impl Into<String>, line: usize) -> Self {
        Self { message: message.into(), line }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}
