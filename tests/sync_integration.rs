//! End-to-end tests: the sync engine talking to a live recipe server.
//!
//! Each test binds the server router to an ephemeral port on localhost.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use recipebox::server::{api, AppState, RecordStore};
use recipebox_core::{
    FileCache, HttpRemote, Recipe, RecipeCache, RecipePatch, RecipeStore, RemoteError,
    RemoteStore, StepEdit,
};
use serde_json::json;
use tempfile::TempDir;
use tokio::net::TcpListener;

async fn spawn_server(data_dir: &std::path::Path) -> String {
    spawn_router(api::router(Arc::new(AppState::new(RecordStore::new(data_dir))))).await
}

async fn spawn_router(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn remote(url: &str) -> HttpRemote {
    HttpRemote::with_timeout(url, Duration::from_secs(5)).unwrap()
}

fn unreachable_remote() -> HttpRemote {
    HttpRemote::with_timeout("http://127.0.0.1:9", Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn test_changes_reach_the_server() {
    let server_dir = TempDir::new().unwrap();
    let url = spawn_server(server_dir.path()).await;

    let client_dir = TempDir::new().unwrap();
    let store = RecipeStore::init(remote(&url), FileCache::new(client_dir.path())).await;
    assert!(store.is_connected());
    assert!(store.recipes().is_empty());

    let id = store.create("Pancakes").await;
    assert!(!id.is_empty());
    assert!(!store.get(&id).unwrap().is_local());

    assert!(store.edit_steps(&id, &StepEdit::Add("mix".into())));
    store.settle().await;
    assert!(store.edit_steps(&id, &StepEdit::Add("fry".into())));
    store.settle().await;
    store.update(&id, RecipePatch::title("Fluffy Pancakes"));
    store.settle().await;
    assert!(store.is_connected());

    // A second client sees the server's copy.
    let other_dir = TempDir::new().unwrap();
    let other = RecipeStore::init(remote(&url), FileCache::new(other_dir.path())).await;
    let recipes = other.recipes();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].id, id);
    assert_eq!(recipes[0].title, "Fluffy Pancakes");
    assert_eq!(recipes[0].steps, vec!["mix", "fry"]);
    assert_eq!(recipes[0].done, vec![false, false]);

    store.delete(&id);
    store.settle().await;
    other.refetch().await;
    assert!(other.recipes().is_empty());
}

#[tokio::test]
async fn test_offline_client_falls_back_to_cache() {
    let server_dir = TempDir::new().unwrap();
    let url = spawn_server(server_dir.path()).await;
    let client_dir = TempDir::new().unwrap();

    let online = RecipeStore::init(remote(&url), FileCache::new(client_dir.path())).await;
    let id = online.create("Soup").await;
    online.settle().await;

    let offline =
        RecipeStore::init(unreachable_remote(), FileCache::new(client_dir.path())).await;
    assert!(!offline.is_connected());
    let recipes = offline.recipes();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].id, id);

    let local_id = offline.create("Bread").await;
    assert!(offline.get(&local_id).unwrap().is_local());
    offline.settle().await;
    assert_eq!(offline.recipes().len(), 2);

    // Back online, the server's collection wins.
    let back = RecipeStore::init(remote(&url), FileCache::new(client_dir.path())).await;
    assert!(back.is_connected());
    let titles: Vec<_> = back.recipes().into_iter().map(|r| r.title).collect();
    assert_eq!(titles, vec!["Soup"]);
}

#[tokio::test]
async fn test_error_payload_is_a_failure() {
    let server_dir = TempDir::new().unwrap();
    let url = spawn_server(server_dir.path()).await;

    let err = remote(&url).create("   ").await.unwrap_err();
    assert_eq!(err, RemoteError::Server("title must not be empty".into()));
}

#[tokio::test]
async fn test_health_check() {
    let server_dir = TempDir::new().unwrap();
    let url = spawn_server(server_dir.path()).await;

    assert!(remote(&url).check().await);
    assert!(!unreachable_remote().check().await);
}

#[tokio::test]
async fn test_search_over_server_data() {
    let server_dir = TempDir::new().unwrap();
    let url = spawn_server(server_dir.path()).await;
    let client_dir = TempDir::new().unwrap();

    let store = RecipeStore::init(remote(&url), FileCache::new(client_dir.path())).await;
    store.create("Tomato Soup").await;
    store.create("Pea Soup").await;
    store.create("Banana Bread").await;
    store.settle().await;

    let soups: Vec<_> = store.search("soup$").into_iter().map(|r| r.title).collect();
    assert_eq!(soups, vec!["Tomato Soup", "Pea Soup"]);
    assert_eq!(store.search("(").len(), 3);
}

#[tokio::test]
async fn test_error_status_falls_back_to_cache() {
    let app = Router::new().route(
        "/recipes",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance") }),
    );
    let url = spawn_router(app).await;

    let err = remote(&url).list().await.unwrap_err();
    assert_eq!(err, RemoteError::Status(503));

    let client_dir = TempDir::new().unwrap();
    let cache = FileCache::new(client_dir.path());
    cache.save(&[Recipe::new("srv-1", "Tea")]).unwrap();

    let store = RecipeStore::init(remote(&url), cache).await;
    assert!(!store.is_connected());
    let titles: Vec<_> = store.recipes().into_iter().map(|r| r.title).collect();
    assert_eq!(titles, vec!["Tea"]);
}

#[tokio::test]
async fn test_body_that_is_not_json_is_a_decode_error() {
    let app = Router::new().route("/recipes", get(|| async { "not json" }));
    let url = spawn_router(app).await;

    let err = remote(&url).list().await.unwrap_err();
    assert!(matches!(err, RemoteError::Decode(_)));
}

#[tokio::test]
async fn test_list_of_wrong_shape_is_a_decode_error() {
    let app = Router::new().route(
        "/recipes",
        get(|| async { Json(json!({ "data": { "x": 1 } })) }),
    );
    let url = spawn_router(app).await;

    let err = remote(&url).list().await.unwrap_err();
    assert!(matches!(err, RemoteError::Decode(_)));

    let client_dir = TempDir::new().unwrap();
    let store = RecipeStore::init(remote(&url), FileCache::new(client_dir.path())).await;
    assert!(!store.is_connected());
    assert!(store.recipes().is_empty());
}
