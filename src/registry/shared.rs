//! Thread-safe registry handle.

use std::sync::{Arc, RwLock};

use crate::grid::Grid;
use crate::models::Output;
use crate::recipe::Recipe;

use super::{RecipeRegistry, RegistryError};

/// A cloneable handle to a registry shared between threads.
///
/// Registrations take the write lock so duplicate detection always sees every
/// earlier registration; lookups take the read lock and may run concurrently.
#[derive(Debug)]
pub struct SharedRegistry<O = Output> {
    inner: Arc<RwLock<RecipeRegistry<O>>>,
}

impl<O> Clone for SharedRegistry<O> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<O> SharedRegistry<O> {
    pub fn new(grid: Grid) -> Self {
        Self::from_registry(RecipeRegistry::new(grid))
    }

    pub fn from_registry(registry: RecipeRegistry<O>) -> Self {
        Self { inner: Arc::new(RwLock::new(registry)) }
    }

    /// Register under the write lock.
    ///
    /// The recipe's variants are computed before the lock is taken.
    pub fn register(&self, recipe: Recipe, output: O) -> Result<(), RegistryError> {
        let recipe = recipe.finalize()?;
        let mut registry = self.inner.write().map_err(|_| RegistryError::Poisoned)?;
        registry.register(recipe, output)
    }

    /// Look up under the read lock, cloning the matching output out.
    pub fn lookup(&self, recipe: &Recipe) -> Result<Option<O>, RegistryError>
    where
        O: Clone,
    {
        let registry = self.inner.read().map_err(|_| RegistryError::Poisoned)?;
        Ok(registry.lookup(recipe).cloned())
    }

    pub fn len(&self) -> Result<usize, RegistryError> {
        let registry = self.inner.read().map_err(|_| RegistryError::Poisoned)?;
        Ok(registry.len())
    }

    pub fn is_empty(&self) -> Result<bool, RegistryError> {
        Ok(self.len()? == 0)
    }
}
