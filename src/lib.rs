//! RecipeBox
//!
//! The `recipes` CLI and the `recipes-server` remote store. The sync
//! engine itself lives in `recipebox-core`.

pub mod config;
pub mod server;
