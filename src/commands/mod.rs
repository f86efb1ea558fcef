mod config_cmd;
mod image;
mod recipe;
mod step;
mod sync_cmd;

use clap::ValueEnum;
use recipebox_core::{FileCache, HttpRemote, Recipe, RecipeStore};

use recipebox::config::Config;

pub use config_cmd::ConfigCommand;
pub use image::ImageCommand;
pub use recipe::RecipeSubcommand;
pub use step::StepCommand;
pub use sync_cmd::{StatusCommand, SyncCommand};

/// The engine as the CLI wires it: HTTP remote and on-disk cache
pub type Store = RecipeStore<HttpRemote, FileCache>;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Builds an empty, disconnected store from the configuration.
pub fn open_store(config: &Config) -> Result<Store, Box<dyn std::error::Error>> {
    let remote = HttpRemote::with_timeout(config.server_url.value.clone(), config.request_timeout())?;
    let cache = FileCache::new(&config.data_dir.value);
    Ok(RecipeStore::new(remote, cache))
}

/// Looks a recipe up by id, then by case-insensitive exact title.
pub fn find_recipe(store: &Store, identifier: &str) -> Result<Recipe, Box<dyn std::error::Error>> {
    resolve(&store.recipes(), identifier)
}

fn resolve(recipes: &[Recipe], identifier: &str) -> Result<Recipe, Box<dyn std::error::Error>> {
    if let Some(recipe) = recipes.iter().find(|r| r.id == identifier) {
        return Ok(recipe.clone());
    }

    let wanted = identifier.trim().to_lowercase();
    let mut matches = recipes.iter().filter(|r| r.title.to_lowercase() == wanted);
    match (matches.next(), matches.next()) {
        (Some(recipe), None) => Ok(recipe.clone()),
        (Some(_), Some(_)) => {
            Err(format!("Several recipes are titled '{}'; use the id instead", identifier).into())
        }
        (None, _) => Err(format!("Recipe not found: {}", identifier).into()),
    }
}
