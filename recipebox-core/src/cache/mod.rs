//! Local durable cache for the recipe collection.
//!
//! The cache holds one named slot containing the whole collection as a
//! JSON array. Reads never fail: a missing or unreadable slot is an empty
//! collection.

mod file;
mod memory;

pub use file::FileCache;
pub use memory::MemoryCache;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::models::Recipe;

/// Name of the slot that holds the serialized collection.
pub const CACHE_SLOT: &str = "recipes-v1.json";

/// Durable storage for the last known recipe collection.
pub trait RecipeCache {
    /// Returns the cached collection, normalized. Absent or corrupt data
    /// yields an empty collection.
    fn load(&self) -> Vec<Recipe>;

    /// Replaces the cached collection.
    fn save(&self, recipes: &[Recipe]) -> Result<(), CacheError>;
}

impl<T: RecipeCache> RecipeCache for Arc<T> {
    fn load(&self) -> Vec<Recipe> {
        (**self).load()
    }

    fn save(&self, recipes: &[Recipe]) -> Result<(), CacheError> {
        (**self).save(recipes)
    }
}

/// Errors that can occur while writing the cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("I/O error for {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] io::Error),

    #[error("failed to serialize recipes: {0}")]
    Serialize(#[from] serde_json::Error),
}
