//! File-backed record store for the recipe server.
//!
//! All recipes live in a single pretty-printed JSON array:
//! ```text
//! <DATA_DIR>/
//!   recipes.json
//! ```
//!
//! Every operation reads the whole file and, if it changes anything,
//! rewrites it. An async mutex serializes operations so concurrent
//! requests never interleave a read with another request's write.

use recipebox_core::remote::protocol::CreateRequest;
use recipebox_core::{Recipe, RecipePatch};
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Name of the file holding the collection.
pub const RECORDS_FILE: &str = "recipes.json";

/// Errors that can occur during record store operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error reading or writing the records file.
    IoError(PathBuf, io::Error),
    /// The records file exists but does not hold a JSON array.
    Corrupt(PathBuf, String),
    /// The collection could not be serialized.
    SerializeError(serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::IoError(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            StorageError::Corrupt(path, e) => {
                write!(f, "Records file {} is corrupt: {}", path.display(), e)
            }
            StorageError::SerializeError(e) => write!(f, "Failed to serialize records: {}", e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::IoError(_, e) => Some(e),
            StorageError::SerializeError(e) => Some(e),
            StorageError::Corrupt(_, _) => None,
        }
    }
}

/// Recipe records persisted in a JSON file.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl RecordStore {
    /// Creates a store keeping its file in `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(RECORDS_FILE),
            lock: Mutex::new(()),
        }
    }

    /// Returns the path of the records file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns every record, in insertion order.
    pub async fn list(&self) -> Result<Vec<Recipe>, StorageError> {
        let _guard = self.lock.lock().await;
        self.read_all().await
    }

    /// Stores a new record under a fresh id and returns it.
    pub async fn create(&self, input: CreateRequest) -> Result<Recipe, StorageError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;

        let recipe = Recipe {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            steps: input.steps,
            done: input.done,
            image: input.image,
        }
        .normalized();

        records.push(recipe.clone());
        self.write_all(&records).await?;
        Ok(recipe)
    }

    /// Applies the fields present in `patch`. Returns `None` if no record
    /// has that id.
    pub async fn update(
        &self,
        id: &str,
        patch: &RecipePatch,
    ) -> Result<Option<Recipe>, StorageError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;

        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        record.apply(patch);
        let updated = record.clone();

        self.write_all(&records).await?;
        Ok(Some(updated))
    }

    /// Removes a record. Returns true if one was removed.
    pub async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;

        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }

        self.write_all(&records).await?;
        Ok(true)
    }

    async fn read_all(&self) -> Result<Vec<Recipe>, StorageError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::IoError(self.path.clone(), e)),
        };

        let value: Value = serde_json::from_str(&contents)
            .map_err(|e| StorageError::Corrupt(self.path.clone(), e.to_string()))?;

        Recipe::list_from_value(&value)
            .ok_or_else(|| StorageError::Corrupt(self.path.clone(), "expected an array".into()))
    }

    async fn write_all(&self, records: &[Recipe]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::IoError(parent.to_path_buf(), e))?;
        }

        let bytes = serde_json::to_vec_pretty(records).map_err(StorageError::SerializeError)?;

        // Write atomically using temp file + rename
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, bytes)
            .await
            .map_err(|e| StorageError::IoError(temp_path.clone(), e))?;
        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| StorageError::IoError(self.path.clone(), e))?;

        Ok(())
    }
}
