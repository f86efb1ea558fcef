//! RecipeBox Server
//!
//! The remote store for RecipeBox clients. Recipes are kept in a JSON file
//! and served over a small HTTP/JSON API.
//!
//! # Configuration
//!
//! Environment variables:
//! - `RECIPES_PORT`: Port to listen on (default: 4000)
//! - `RECIPES_SERVER_DATA_DIR`: Directory holding `recipes.json`
//!   (default: ~/.local/share/recipebox-server)
//!
//! # Endpoints
//!
//! - `GET /health`: Health check
//! - `GET /recipes`: List recipes
//! - `POST /recipes`: Create a recipe
//! - `PATCH /recipes/{id}`: Update fields of a recipe
//! - `DELETE /recipes/{id}`: Delete a recipe

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use recipebox::server::{api, AppState, RecordStore};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Server configuration
#[derive(Debug, Clone)]
struct Config {
    /// Port to listen on
    port: u16,
    /// Directory holding the records file
    data_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let port = std::env::var("RECIPES_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(4000);

        let data_dir = std::env::var("RECIPES_SERVER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("recipebox-server")
            });

        Self { port, data_dir }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipebox=info,recipes_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if let Err(e) = std::fs::create_dir_all(&config.data_dir) {
        tracing::error!("Failed to create data directory: {}", e);
        std::process::exit(1);
    }

    let store = RecordStore::new(&config.data_dir);
    tracing::info!("Records file: {}", store.path().display());

    let state = Arc::new(AppState::new(store));
    let app = api::router(state).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
