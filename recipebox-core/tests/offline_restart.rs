//! Offline work survives a restart through the file cache.

use recipebox_core::{
    FileCache, IdKind, Recipe, RecipePatch, RecipeStore, RemoteError, RemoteStore, StepEdit,
};
use tempfile::TempDir;

/// A remote store that is never reachable.
struct Unplugged;

impl RemoteStore for Unplugged {
    async fn list(&self) -> Result<Vec<Recipe>, RemoteError> {
        Err(RemoteError::Transport("network is down".into()))
    }

    async fn create(&self, _title: &str) -> Result<Recipe, RemoteError> {
        Err(RemoteError::Transport("network is down".into()))
    }

    async fn patch(&self, _id: &str, _patch: &RecipePatch) -> Result<(), RemoteError> {
        Err(RemoteError::Transport("network is down".into()))
    }

    async fn delete(&self, _id: &str) -> Result<(), RemoteError> {
        Err(RemoteError::Transport("network is down".into()))
    }
}

#[tokio::test]
async fn test_offline_edits_survive_restart() {
    let dir = TempDir::new().unwrap();

    let store = RecipeStore::init(Unplugged, FileCache::new(dir.path())).await;
    assert!(!store.is_connected());

    let tea = store.create("Tea").await;
    let toast = store.create("Toast").await;
    assert!(store.edit_steps(&tea, &StepEdit::Add("boil water".into())));
    assert!(store.edit_steps(&tea, &StepEdit::Add("steep".into())));
    assert!(store.edit_steps(&tea, &StepEdit::Toggle(0)));
    store.delete(&toast);
    store.settle().await;
    let before = store.recipes();
    drop(store);

    let restarted = RecipeStore::init(Unplugged, FileCache::new(dir.path())).await;
    let after = restarted.recipes();
    assert_eq!(after, before);
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].id_kind(), IdKind::Local);
    assert_eq!(after[0].steps, vec!["boil water", "steep"]);
    assert_eq!(after[0].done, vec![true, false]);
}

#[tokio::test]
async fn test_corrupt_cache_starts_empty() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::new(dir.path());
    std::fs::write(cache.path(), "[{\"id\": 1}").unwrap();

    let store = RecipeStore::init(Unplugged, cache).await;
    assert!(!store.is_connected());
    assert!(store.recipes().is_empty());
}
