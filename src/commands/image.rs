use base64::{engine::general_purpose::STANDARD, Engine};
use clap::{Args, Subcommand};
use recipebox_core::RecipePatch;
use std::path::{Path, PathBuf};

use super::{find_recipe, Store};

#[derive(Args)]
pub struct ImageCommand {
    #[command(subcommand)]
    pub command: ImageSubcommand,
}

#[derive(Subcommand)]
pub enum ImageSubcommand {
    /// Attach a cover image from a file
    Set {
        /// Recipe ID or title
        recipe: String,

        /// Image file
        file: PathBuf,
    },

    /// Remove the cover image
    Clear {
        /// Recipe ID or title
        recipe: String,
    },
}

impl ImageCommand {
    pub async fn run(&self, store: &Store) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ImageSubcommand::Set { recipe, file } => {
                let recipe = find_recipe(store, recipe)?;
                let bytes = std::fs::read(file)
                    .map_err(|e| format!("Failed to read image '{}': {}", file.display(), e))?;

                store.update(&recipe.id, RecipePatch::image(Some(data_uri(file, &bytes))));
                println!("Set cover image of '{}' ({} bytes)", recipe.title, bytes.len());
                Ok(())
            }
            ImageSubcommand::Clear { recipe } => {
                // Listings omit images, so the local copy may not know one is set.
                let recipe = find_recipe(store, recipe)?;
                store.update(&recipe.id, RecipePatch::image(None));
                println!("Removed cover image of '{}'", recipe.title);
                Ok(())
            }
        }
    }
}

/// Encodes image bytes as a data URI.
fn data_uri(path: &Path, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_for_path(path), STANDARD.encode(bytes))
}

fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}
