//! Shape-equivalent crafting recipes
//!
//! A [`Recipe`] is a sparse placement of items on a [`Grid`]. Every in-bounds
//! translation of that placement is considered the same recipe: the set of all
//! such translations ([`VariantSet`]) is the recipe's identity, and it is what
//! `PartialEq`, `Hash` and the registry key on.
//!
//! The translation bounds ([`Margins`]) are tightened on every insertion so
//! the variant set can be enumerated without re-scanning the placement.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

use crate::grid::{Grid, Position};
use crate::models::Item;

/// Token used for empty cells when rendering a recipe as text.
pub const EMPTY_CELL: &str = "-";

/// Sparse mapping from occupied positions to items.
pub type Placement = BTreeMap<Position, Item>;

/// Error from recipe construction or finalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RecipeError {
    /// Insert position lies outside the grid
    #[error("Position {position} is outside the {grid} grid")]
    OutOfBounds { position: Position, grid: Grid },
    /// Variants were requested for a recipe with no cells
    #[error("Recipe has no items")]
    EmptyRecipe,
}

/// How far a placement can be shifted in each direction and stay in bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Margins {
    pub top: u32,
    pub left: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Margins {
    /// Margins of a placement holding only `position`.
    fn around(grid: Grid, position: Position) -> Self {
        Self {
            top: grid.height() - 1 - position.y,
            left: position.x,
            right: grid.width() - 1 - position.x,
            bottom: position.y,
        }
    }

    /// Narrow the margins so that `position` also stays in bounds.
    fn tighten(&mut self, grid: Grid, position: Position) {
        let cell = Self::around(grid, position);
        self.top = self.top.min(cell.top);
        self.left = self.left.min(cell.left);
        self.right = self.right.min(cell.right);
        self.bottom = self.bottom.min(cell.bottom);
    }

    /// Number of distinct translations these margins allow.
    pub fn shift_count(&self) -> u64 {
        (u64::from(self.left) + u64::from(self.right) + 1)
            * (u64::from(self.bottom) + u64::from(self.top) + 1)
    }

    /// Every allowed `(dx, dy)` shift, bottom-left first.
    pub fn shifts(&self) -> impl Iterator<Item = (i64, i64)> {
        let (left, right) = (i64::from(self.left), i64::from(self.right));
        let (bottom, top) = (i64::from(self.bottom), i64::from(self.top));
        (-bottom..=top).flat_map(move |dy| (-left..=right).map(move |dx| (dx, dy)))
    }
}

impl fmt::Display for Margins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "top {}, left {}, right {}, bottom {}",
            self.top, self.left, self.right, self.bottom
        )
    }
}

/// One concrete in-bounds translation of a recipe's placement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variant(Placement);

impl Variant {
    pub fn get(&self, position: Position) -> Option<&Item> {
        self.0.get(&position)
    }

    pub fn cells(&self) -> impl Iterator<Item = (&Position, &Item)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The equivalence class of a recipe: all of its variants.
///
/// Backed by an ordered set so equality and hashing do not depend on the order
/// variants were generated in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VariantSet(BTreeSet<Variant>);

impl VariantSet {
    fn generate(placement: &Placement, margins: Margins) -> Self {
        let mut variants = BTreeSet::new();
        for (dx, dy) in margins.shifts() {
            let shifted: Option<Placement> = placement
                .iter()
                .map(|(position, item)| Some((position.offset(dx, dy)?, item.clone())))
                .collect();
            // Shifts within the margins never leave the grid
            if let Some(shifted) = shifted {
                variants.insert(Variant(shifted));
            }
        }
        Self(variants)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variant> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a VariantSet {
    type Item = &'a Variant;
    type IntoIter = std::collections::btree_set::Iter<'a, Variant>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Variant cache state. Any insert drops back to `Building`.
#[derive(Debug, Clone)]
enum VariantCache {
    Building,
    Finalized(VariantSet),
}

/// A sparse item layout on a grid, equal to every in-bounds translation of itself.
///
/// # Example
///
/// ```
/// use craftgrid::grid::{Grid, Position};
/// use craftgrid::recipe::Recipe;
///
/// let grid = Grid::new(3, 3).unwrap();
/// let mut torch = Recipe::new(grid);
/// torch.insert(Position::new(1, 0), "stick").unwrap();
/// torch.insert(Position::new(1, 1), "coal").unwrap();
///
/// let mut shifted = Recipe::new(grid);
/// shifted.insert(Position::new(2, 1), "stick").unwrap();
/// shifted.insert(Position::new(2, 2), "coal").unwrap();
///
/// assert_eq!(torch, shifted);
/// assert_eq!(torch.variants().unwrap().len(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct Recipe {
    grid: Grid,
    placement: Placement,
    /// `None` until the first insert, standing in for "unbounded"
    margins: Option<Margins>,
    cache: VariantCache,
}

impl Recipe {
    /// Create an empty recipe on `grid`.
    pub fn new(grid: Grid) -> Self {
        Self { grid, placement: Placement::new(), margins: None, cache: VariantCache::Building }
    }

    /// Build a recipe from `(position, item)` pairs, failing on the first
    /// out-of-bounds cell.
    pub fn from_cells<P, I>(
        grid: Grid,
        cells: impl IntoIterator<Item = (P, I)>,
    ) -> Result<Self, RecipeError>
    where
        P: Into<Position>,
        I: Into<Item>,
    {
        let mut recipe = Self::new(grid);
        for (position, item) in cells {
            recipe.insert(position, item)?;
        }
        Ok(recipe)
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Place `item` at `position`, replacing whatever was there.
    ///
    /// Out-of-bounds positions are rejected and leave the recipe untouched.
    pub fn insert(
        &mut self,
        position: impl Into<Position>,
        item: impl Into<Item>,
    ) -> Result<(), RecipeError> {
        let position = position.into();
        if !self.grid.contains(position) {
            return Err(RecipeError::OutOfBounds { position, grid: self.grid });
        }

        match self.margins.as_mut() {
            Some(margins) => margins.tighten(self.grid, position),
            None => self.margins = Some(Margins::around(self.grid, position)),
        }
        self.placement.insert(position, item.into());
        self.cache = VariantCache::Building;
        Ok(())
    }

    /// Current shift bounds, or `None` if nothing has been inserted.
    pub fn margins(&self) -> Option<Margins> {
        self.margins
    }

    pub fn get(&self, position: Position) -> Option<&Item> {
        self.placement.get(&position)
    }

    pub fn cells(&self) -> impl Iterator<Item = (&Position, &Item)> {
        self.placement.iter()
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.placement.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placement.is_empty()
    }

    /// True if the variant set is cached and current.
    pub fn is_finalized(&self) -> bool {
        matches!(self.cache, VariantCache::Finalized(_))
    }

    /// The recipe's equivalence class, computed on first use and cached until
    /// the next insert.
    pub fn variants(&mut self) -> Result<&VariantSet, RecipeError> {
        let margins = self.margins.ok_or(RecipeError::EmptyRecipe)?;
        match self.cache {
            VariantCache::Finalized(ref set) => Ok(set),
            VariantCache::Building => {
                self.cache =
                    VariantCache::Finalized(VariantSet::generate(&self.placement, margins));
                self.variants()
            }
        }
    }

    /// Compute and cache the variant set, consuming the builder.
    pub fn finalize(mut self) -> Result<Self, RecipeError> {
        self.variants()?;
        Ok(self)
    }

    /// The variant set without touching the cache. Empty recipes yield an
    /// empty set.
    pub(crate) fn variant_set(&self) -> Cow<'_, VariantSet> {
        match (&self.cache, self.margins) {
            (VariantCache::Finalized(set), _) => Cow::Borrowed(set),
            (VariantCache::Building, Some(margins)) => {
                Cow::Owned(VariantSet::generate(&self.placement, margins))
            }
            (VariantCache::Building, None) => Cow::Owned(VariantSet::default()),
        }
    }
}

impl PartialEq for Recipe {
    fn eq(&self, other: &Self) -> bool {
        self.variant_set() == other.variant_set()
    }
}

impl Eq for Recipe {}

impl Hash for Recipe {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.variant_set().hash(state);
    }
}

impl fmt::Display for Recipe {
    /// Rows top to bottom, cells separated by spaces, `-` for empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.grid.height()).rev() {
            let row: Vec<&str> = (0..self.grid.width())
                .map(|x| self.get(Position::new(x, y)).map_or(EMPTY_CELL, Item::as_str))
                .collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}
