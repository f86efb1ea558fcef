//! HTTP API of the recipe server.
//!
//! Every endpoint except `/health` answers with an
//! [`Envelope`]; failures carry a message in `errors`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use recipebox_core::remote::protocol::{
    CreateRequest, Envelope, HealthResponse, ListEntry, PatchAck,
};
use recipebox_core::{Recipe, RecipePatch};
use tracing::{debug, error, info};

use super::storage::{RecordStore, StorageError};

/// Application state shared across handlers
#[derive(Debug)]
pub struct AppState {
    pub store: RecordStore,
}

impl AppState {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }
}

/// Create the API router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route("/recipes/{id}", axum::routing::patch(update_recipe).delete(delete_recipe))
        .with_state(state)
}

/// Error answered with an error envelope
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        error!("record store failure: {}", e);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(Envelope::<()>::error(self.message))).into_response()
    }
}

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// List every recipe (id, title and steps only)
async fn list_recipes(State(state): State<Arc<AppState>>) -> ApiResult<Vec<ListEntry>> {
    let recipes = state.store.list().await?;
    debug!(count = recipes.len(), "listing recipes");

    let entries = recipes
        .into_iter()
        .map(|r| ListEntry {
            id: r.id,
            title: r.title,
            steps: r.steps,
        })
        .collect();
    Ok(Json(Envelope::data(entries)))
}

/// Create a recipe
async fn create_recipe(
    State(state): State<Arc<AppState>>,
    Json(mut input): Json<CreateRequest>,
) -> ApiResult<Recipe> {
    input.title = input.title.trim().to_string();
    if input.title.is_empty() {
        return Err(ApiError::bad_request("title must not be empty"));
    }

    let recipe = state.store.create(input).await?;
    info!(id = %recipe.id, title = %recipe.title, "created recipe");
    Ok(Json(Envelope::data(recipe)))
}

/// Apply a partial update; unknown ids answer with `data: null`
async fn update_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<RecipePatch>,
) -> ApiResult<PatchAck> {
    match state.store.update(&id, &patch).await? {
        Some(recipe) => {
            debug!(id = %recipe.id, "updated recipe");
            Ok(Json(Envelope::data(PatchAck { id: recipe.id })))
        }
        None => {
            debug!(%id, "update for unknown recipe");
            Ok(Json(Envelope::empty()))
        }
    }
}

/// Delete a recipe; answers whether anything was removed
async fn delete_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<bool> {
    let removed = state.store.delete(&id).await?;
    if removed {
        info!(%id, "deleted recipe");
    }
    Ok(Json(Envelope::data(removed)))
}
