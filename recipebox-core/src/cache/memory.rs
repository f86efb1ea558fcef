use std::sync::{Mutex, PoisonError};

use super::{CacheError, RecipeCache};
use crate::models::Recipe;

/// In-process cache slot. Holds the serialized collection exactly like the
/// file slot does, so corrupt payloads can be injected.
#[derive(Debug, Default)]
pub struct MemoryCache {
    slot: Mutex<Option<String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache whose slot already holds `raw`.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    /// Returns the raw slot contents.
    pub fn raw(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RecipeCache for MemoryCache {
    fn load(&self) -> Vec<Recipe> {
        self.raw()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .and_then(|value| Recipe::list_from_value(&value))
            .unwrap_or_default()
    }

    fn save(&self, recipes: &[Recipe]) -> Result<(), CacheError> {
        let raw = serde_json::to_string(recipes)?;
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(raw);
        Ok(())
    }
}
