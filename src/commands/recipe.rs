use clap::Subcommand;
use recipebox_core::{Recipe, RecipePatch};
use std::io::{self, Write};

use super::{find_recipe, OutputFormat, Store};

#[derive(Subcommand)]
pub enum RecipeSubcommand {
    /// List recipes
    List {
        /// Only show recipes whose title matches this pattern (regex, case-insensitive)
        #[arg(long, short)]
        search: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a recipe's details
    Show {
        /// Recipe ID or title
        recipe: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Create a new recipe
    Add {
        /// Title of the recipe
        title: String,
    },

    /// Change a recipe's title
    Rename {
        /// Recipe ID or title
        recipe: String,

        /// New title
        title: String,
    },

    /// Delete a recipe
    Delete {
        /// Recipe ID or title
        recipe: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl RecipeSubcommand {
    pub async fn run(&self, store: &Store) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            RecipeSubcommand::List { search, format } => {
                let recipes = match search {
                    Some(pattern) => store.search(pattern),
                    None => store.recipes(),
                };

                if recipes.is_empty() {
                    println!("No recipes found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&recipes)?);
                    }
                    OutputFormat::Text => print_table(&recipes),
                }
                Ok(())
            }

            RecipeSubcommand::Show { recipe, format } => {
                let recipe = find_recipe(store, recipe)?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&recipe)?);
                    }
                    OutputFormat::Text => print!("{}", recipe),
                }
                Ok(())
            }

            RecipeSubcommand::Add { title } => {
                if title.trim().is_empty() {
                    return Err("Recipe title cannot be empty".into());
                }

                let id = store.create(title).await;
                match store.get(&id) {
                    Some(created) => {
                        println!("Created recipe:");
                        print!("{}", created);
                    }
                    None => println!("Created recipe {}", id),
                }
                Ok(())
            }

            RecipeSubcommand::Rename { recipe, title } => {
                if title.trim().is_empty() {
                    return Err("Recipe title cannot be empty".into());
                }

                let recipe = find_recipe(store, recipe)?;
                store.update(&recipe.id, RecipePatch::title(title.trim()));
                println!("Renamed '{}' to '{}'", recipe.title, title.trim());
                Ok(())
            }

            RecipeSubcommand::Delete { recipe, force } => {
                let recipe = find_recipe(store, recipe)?;

                // Confirm deletion unless --force is used
                if !force {
                    print!("Delete recipe '{}'? [y/N] ", recipe.title);
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                store.delete(&recipe.id);
                println!("Deleted recipe: {}", recipe.title);
                Ok(())
            }
        }
    }
}

fn print_table(recipes: &[Recipe]) {
    println!("{:<36}  {:<30}  STEPS", "ID", "TITLE");
    println!("{}", "-".repeat(80));
    for recipe in recipes {
        println!(
            "{:<36}  {:<30}  {}",
            recipe.id,
            truncate(&recipe.title, 30),
            progress(recipe)
        );
    }

    let local = recipes.iter().filter(|r| r.is_local()).count();
    if local > 0 {
        println!(
            "\nTotal: {} recipe(s), {} not yet on the server",
            recipes.len(),
            local
        );
    } else {
        println!("\nTotal: {} recipe(s)", recipes.len());
    }
}

fn progress(recipe: &Recipe) -> String {
    if recipe.steps.is_empty() {
        "-".to_string()
    } else {
        format!("{}/{}", recipe.completed(), recipe.steps.len())
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let head: String = text.chars().take(width - 3).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
