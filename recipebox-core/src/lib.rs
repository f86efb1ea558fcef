//! RecipeBox Core Library
//!
//! Recipe models and the offline-first synchronization engine shared by
//! the `recipes` CLI and the `recipes-server` remote store.
//!
//! The engine ([`RecipeStore`]) keeps an in-memory collection consistent
//! with a local durable cache ([`RecipeCache`]) and a remote store
//! ([`RemoteStore`]), applying every change optimistically and degrading to
//! the local copy whenever the remote store cannot be reached.

pub mod cache;
pub mod models;
pub mod remote;
pub mod search;
pub mod steps;
pub mod sync;

pub use cache::{CacheError, FileCache, MemoryCache, RecipeCache, CACHE_SLOT};
pub use models::{IdKind, Recipe, RecipePatch};
pub use remote::{HttpRemote, RemoteError, RemoteStore};
pub use search::{filter_recipes, TitleFilter};
pub use steps::StepEdit;
pub use sync::{RecipeStore, Snapshot};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
