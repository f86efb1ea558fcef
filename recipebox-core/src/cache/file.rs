use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{CacheError, RecipeCache, CACHE_SLOT};
use crate::models::Recipe;

/// Cache slot stored as a JSON file in a data directory.
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    /// Creates a cache using the default slot inside `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self::with_slot(data_dir, CACHE_SLOT)
    }

    /// Creates a cache using a custom slot name inside `data_dir`.
    pub fn with_slot(data_dir: impl AsRef<Path>, slot: &str) -> Self {
        Self {
            path: data_dir.as_ref().join(slot),
        }
    }

    /// Returns the path of the slot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Checks if the slot has ever been written.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn read_slot(&self) -> Option<Vec<Recipe>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "failed to read recipe cache: {}", e);
                return None;
            }
        };

        let value: Value = match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "recipe cache is corrupt: {}", e);
                return None;
            }
        };

        let recipes = Recipe::list_from_value(&value);
        if recipes.is_none() {
            tracing::warn!(path = %self.path.display(), "recipe cache does not hold a list");
        }
        recipes
    }
}

impl RecipeCache for FileCache {
    fn load(&self) -> Vec<Recipe> {
        self.read_slot().unwrap_or_default()
    }

    fn save(&self, recipes: &[Recipe]) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| CacheError::Io(parent.to_path_buf(), e))?;
        }

        let bytes = serde_json::to_vec(recipes)?;

        // Write beside the slot and rename over it so a crash never leaves
        // a half-written collection behind.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(|e| CacheError::Io(tmp.clone(), e))?;
        fs::rename(&tmp, &self.path).map_err(|e| CacheError::Io(self.path.clone(), e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_cache() -> (FileCache, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileCache::new(temp_dir.path());
        (cache, temp_dir)
    }

    #[test]
    fn test_cache_path() {
        let (cache, _temp) = test_cache();
        assert!(cache.path().ends_with(CACHE_SLOT));
        assert!(!cache.exists());
    }

    #[test]
    fn test_load_missing_is_empty() {
        let (cache, _temp) = test_cache();
        assert!(cache.load().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let (cache, _temp) = test_cache();
        let recipes = vec![
            Recipe::new("a", "Tea").with_steps(vec!["boil".into()]),
            Recipe::new("local-abcd1234", "Soup").with_image("data:,"),
        ];

        cache.save(&recipes).unwrap();
        assert!(cache.exists());
        assert_eq!(cache.load(), recipes);
    }

    #[test]
    fn test_save_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("data");
        let cache = FileCache::new(&nested);

        cache.save(&[Recipe::new("a", "Tea")]).unwrap();
        assert!(nested.join(CACHE_SLOT).exists());
    }

    #[test]
    fn test_overwrite_replaces_collection() {
        let (cache, _temp) = test_cache();
        cache.save(&[Recipe::new("a", "Tea"), Recipe::new("b", "Soup")]).unwrap();
        cache.save(&[Recipe::new("c", "Bread")]).unwrap();

        let loaded = cache.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "c");
    }

    #[test]
    fn test_corrupt_slot_is_empty() {
        let (cache, _temp) = test_cache();
        fs::write(cache.path(), "{not json").unwrap();
        assert!(cache.load().is_empty());
    }

    #[test]
    fn test_non_list_slot_is_empty() {
        let (cache, _temp) = test_cache();
        fs::write(cache.path(), r#"{"id": "a", "title": "Tea"}"#).unwrap();
        assert!(cache.load().is_empty());
    }

    #[test]
    fn test_load_normalizes_records() {
        let (cache, _temp) = test_cache();
        fs::write(
            cache.path(),
            r#"[{"id": "a", "title": "Tea", "steps": ["boil", "pour"]}]"#,
        )
        .unwrap();

        let loaded = cache.load();
        assert_eq!(loaded[0].done, vec![false, false]);
        assert_eq!(loaded[0].image, None);
    }
}
