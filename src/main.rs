use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{
    open_store, ConfigCommand, ImageCommand, RecipeSubcommand, StatusCommand, StepCommand, Store,
    SyncCommand,
};
use recipebox::config::Config;

#[derive(Parser)]
#[command(name = "recipes")]
#[command(version)]
#[command(about = "Keep recipes in sync, online or offline", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Recipe(RecipeSubcommand),

    /// Edit a recipe's steps
    Step(StepCommand),

    /// Set or clear a recipe's cover image
    Image(ImageCommand),

    /// Reload all recipes from the server
    Sync(SyncCommand),

    /// Show server and cache status
    Status(StatusCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load(cli.config)?;

    let Some(command) = cli.command else {
        println!("Use --help to see available commands");
        return Ok(());
    };

    match command {
        Commands::Config(cmd) => cmd.run(&config),
        Commands::Status(cmd) => cmd.run(&open_store(&config)?).await,
        Commands::Sync(cmd) => {
            let store = open_store(&config)?;
            let result = cmd.run(&store).await;
            finish(&store).await;
            result
        }
        Commands::Recipe(cmd) => {
            let store = load_store(&config).await?;
            let result = cmd.run(&store).await;
            finish(&store).await;
            result
        }
        Commands::Step(cmd) => {
            let store = load_store(&config).await?;
            let result = cmd.run(&store).await;
            finish(&store).await;
            result
        }
        Commands::Image(cmd) => {
            let store = load_store(&config).await?;
            let result = cmd.run(&store).await;
            finish(&store).await;
            result
        }
    }
}

/// Opens the store and loads the collection.
async fn load_store(config: &Config) -> Result<Store, Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    store.refetch().await;
    Ok(store)
}

/// Waits for pending remote calls, then reports if the server was missed.
async fn finish(store: &Store) {
    store.settle().await;
    if !store.is_connected() {
        eprintln!(
            "Note: {} is unreachable; working from the local cache. \
             Changes made now stay on this device.",
            store.remote().server_url()
        );
    }
}
