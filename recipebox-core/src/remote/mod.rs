//! Client side of the remote recipe store.
//!
//! [`RemoteStore`] is the contract the sync engine depends on. Every
//! failure mode (unreachable server, non-2xx status, undecodable body,
//! error payload inside a 2xx response) is reported the same way, as a
//! [`RemoteError`] for the whole operation.

mod error;
mod http;
pub mod protocol;

pub use error::RemoteError;
pub use http::HttpRemote;

use std::future::Future;
use std::sync::Arc;

use crate::models::{Recipe, RecipePatch};

/// Operations the sync engine sends to the remote store.
pub trait RemoteStore: Send + Sync {
    /// Fetches the whole collection. Records carry `id`, `title` and
    /// `steps` only and come back normalized.
    fn list(&self) -> impl Future<Output = Result<Vec<Recipe>, RemoteError>> + Send;

    /// Creates a recipe with no steps and returns the server's record.
    fn create(&self, title: &str) -> impl Future<Output = Result<Recipe, RemoteError>> + Send;

    /// Sends the fields present in `patch`. The acknowledgement is not
    /// consulted.
    fn patch(
        &self,
        id: &str,
        patch: &RecipePatch,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Deletes a recipe. The acknowledgement is not consulted.
    fn delete(&self, id: &str) -> impl Future<Output = Result<(), RemoteError>> + Send;
}

impl<T: RemoteStore> RemoteStore for Arc<T> {
    fn list(&self) -> impl Future<Output = Result<Vec<Recipe>, RemoteError>> + Send {
        (**self).list()
    }

    fn create(&self, title: &str) -> impl Future<Output = Result<Recipe, RemoteError>> + Send {
        (**self).create(title)
    }

    fn patch(
        &self,
        id: &str,
        patch: &RecipePatch,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send {
        (**self).patch(id, patch)
    }

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), RemoteError>> + Send {
        (**self).delete(id)
    }
}
