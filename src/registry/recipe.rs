//! Recipe registry keyed by equivalence class.

use std::collections::hash_map::{Entry as MapEntry, HashMap};

use crate::grid::Grid;
use crate::models::Output;
use crate::recipe::{Recipe, VariantSet};

use super::RegistryError;

/// A registered recipe and what it produces.
#[derive(Debug, Clone)]
pub struct RegistryEntry<O> {
    pub recipe: Recipe,
    pub output: O,
}

/// Registry mapping each recipe equivalence class to exactly one output.
///
/// Keys are the recipes' [`VariantSet`]s, so a query matches a registered recipe
/// if it is any in-bounds translation of it, with expected O(1) cost.
/// Two classes on the same grid either share no variant or are identical, so
/// a key collision is exactly an overlap.
#[derive(Debug, Clone)]
pub struct RecipeRegistry<O = Output> {
    grid: Grid,
    entries: HashMap<VariantSet, RegistryEntry<O>>,
}

impl<O> RecipeRegistry<O> {
    /// Create an empty registry for recipes built on `grid`.
    pub fn new(grid: Grid) -> Self {
        Self { grid, entries: HashMap::new() }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Register `recipe` as producing `output`.
    ///
    /// Fails if the recipe is empty, was built on another grid, or is a
    /// translation of a recipe that is already registered. A failed
    /// registration leaves the registry unchanged.
    pub fn register(&mut self, mut recipe: Recipe, output: O) -> Result<(), RegistryError> {
        if recipe.grid() != self.grid {
            return Err(RegistryError::GridMismatch { recipe: recipe.grid(), registry: self.grid });
        }

        let key = recipe.variants()?.clone();
        match self.entries.entry(key) {
            MapEntry::Occupied(existing) => Err(RegistryError::DuplicateRecipe {
                existing: one_line(&existing.get().recipe),
            }),
            MapEntry::Vacant(slot) => {
                slot.insert(RegistryEntry { recipe, output });
                Ok(())
            }
        }
    }

    /// Find the output registered for any translation of `recipe`.
    ///
    /// Empty recipes and recipes from another grid never match.
    pub fn lookup(&self, recipe: &Recipe) -> Option<&O> {
        self.get(recipe).map(|entry| &entry.output)
    }

    /// Find the registered entry matching `recipe`.
    pub fn get(&self, recipe: &Recipe) -> Option<&RegistryEntry<O>> {
        if recipe.grid() != self.grid || recipe.is_empty() {
            return None;
        }
        self.entries.get(&*recipe.variant_set())
    }

    pub fn contains(&self, recipe: &Recipe) -> bool {
        self.get(recipe).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate over registered recipes and their outputs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Recipe, &O)> {
        self.entries.values().map(|entry| (&entry.recipe, &entry.output))
    }
}

impl RecipeRegistry<Output> {
    /// All recipes producing the item `name`.
    pub fn recipes_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Recipe> + 'a {
        self.entries
            .values()
            .filter(move |entry| entry.output.name == name)
            .map(|entry| &entry.recipe)
    }
}

impl<O> Default for RecipeRegistry<O> {
    fn default() -> Self {
        Self::new(Grid::default())
    }
}

/// Render a recipe on one line, rows separated by ` / `.
fn one_line(recipe: &Recipe) -> String {
    recipe.to_string().lines().collect::<Vec<_>>().join(" / ")
}
