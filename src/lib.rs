//! Craftgrid - shape-equivalent crafting recipe matching
//!
//! This library provides functionality to:
//! - Build sparse item layouts ([`recipe::Recipe`]) on a fixed-size [`grid::Grid`]
//! - Treat every in-bounds translation of a layout as the same recipe
//! - Register recipes and look up any translated layout in expected O(1) time
//! - Import recipe tables from tabular text or JSON5 streams, leniently or strictly
//!
//! ```
//! use craftgrid::grid::Grid;
//! use craftgrid::models::Output;
//! use craftgrid::recipe::Recipe;
//! use craftgrid::registry::RecipeRegistry;
//!
//! let grid = Grid::new(3, 3).unwrap();
//! let mut registry = RecipeRegistry::new(grid);
//! let torch = Recipe::from_cells(grid, [((1, 0), "stick"), ((1, 1), "coal")]).unwrap();
//! registry.register(torch, Output::new("torch", 4)).unwrap();
//!
//! let query = Recipe::from_cells(grid, [((2, 1), "stick"), ((2, 2), "coal")]).unwrap();
//! assert_eq!(registry.lookup(&query), Some(&Output::new("torch", 4)));
//! ```

pub mod cli;
pub mod config;
pub mod grid;
pub mod import;
pub mod models;
pub mod recipe;
pub mod registry;
pub mod telemetry;
pub mod tokenizer;
