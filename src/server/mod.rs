//! Server-side modules for the recipe server.

pub mod api;
pub mod storage;

pub use api::{router, AppState};
pub use storage::{RecordStore, StorageError};
