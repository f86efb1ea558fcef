//! Commands that talk to the server directly: `sync` and `status`.

use chrono::{DateTime, Local};
use clap::Args;
use recipebox_core::{Recipe, RecipeCache};

use super::Store;

/// Reload every recipe from the server
#[derive(Debug, Args)]
pub struct SyncCommand {}

impl SyncCommand {
    pub async fn run(&self, store: &Store) -> Result<(), Box<dyn std::error::Error>> {
        // Local-only recipes do not survive a successful reload, so note
        // them before asking the server.
        let local_only: Vec<Recipe> = store
            .cache()
            .load()
            .into_iter()
            .filter(|r| r.is_local())
            .collect();

        println!("Syncing with {}...", store.remote().server_url());
        println!();

        store.refetch().await;
        let recipes = store.recipes();

        if store.is_connected() {
            println!("  ✓ {} recipe(s) loaded from the server", recipes.len());
            if !local_only.is_empty() {
                println!();
                println!("Recipes created while offline were not on the server and were dropped:");
                for recipe in &local_only {
                    println!("  - {} ({})", recipe.title, recipe.id);
                }
            }
            println!();
            println!("Sync complete.");
        } else {
            println!("  ✗ server unreachable");
            println!("  {} recipe(s) available from the local cache", recipes.len());
        }

        Ok(())
    }
}

/// Show server reachability and local cache details
#[derive(Debug, Args)]
pub struct StatusCommand {}

impl StatusCommand {
    pub async fn run(&self, store: &Store) -> Result<(), Box<dyn std::error::Error>> {
        println!("Recipe Sync Status");
        println!("==================");
        println!();

        println!("Server:    {}", store.remote().server_url());
        print!("Server status: ");
        if store.remote().check().await {
            println!("✓ connected");
        } else {
            println!("✗ unreachable");
        }
        println!();

        let cache = store.cache();
        println!("Cache:     {}", cache.path().display());
        if !cache.exists() {
            println!("           (not created yet)");
            return Ok(());
        }

        let modified: DateTime<Local> = std::fs::metadata(cache.path())?.modified()?.into();
        println!("Updated:   {}", modified.format("%Y-%m-%d %H:%M:%S"));

        let cached = cache.load();
        let local = cached.iter().filter(|r| r.is_local()).count();
        println!(
            "Recipes:   {} cached, {} not yet on the server",
            cached.len(),
            local
        );

        Ok(())
    }
}
