//! Registries mapping recipe equivalence classes to outputs.
//!
//! This module provides:
//! - `RecipeRegistry` for registering recipes and looking up any translation of them
//! - `SharedRegistry`, an `Arc<RwLock<..>>` handle with exclusive registration
//!   and shared lookups
//!
//! Registration never resolves conflicts silently: a recipe whose equivalence
//! class is already registered is rejected with `RegistryError::DuplicateRecipe`.

mod recipe;
mod shared;

use thiserror::Error;

use crate::grid::Grid;
use crate::recipe::RecipeError;

pub use recipe::{RecipeRegistry, RegistryEntry};
pub use shared::SharedRegistry;

/// Error when registering a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// The recipe itself was invalid (e.g. empty)
    #[error(transparent)]
    Recipe(#[from] RecipeError),
    /// The recipe was built on a different grid than the registry's
    #[error("Recipe grid {recipe} does not match registry grid {registry}")]
    GridMismatch { recipe: Grid, registry: Grid },
    /// The recipe is a translation of an already registered recipe
    #[error("Recipe duplicates the already registered recipe '{existing}'")]
    DuplicateRecipe { existing: String },
    /// Another thread panicked while holding the registry lock
    #[error("Registry lock poisoned")]
    Poisoned,
}
