//! Offline-first synchronization engine.
//!
//! [`RecipeStore`] owns the in-memory recipe collection and keeps it in
//! step with a [`RecipeCache`](crate::RecipeCache) and a
//! [`RemoteStore`](crate::RemoteStore):
//!
//! 1. Every operation mutates the in-memory collection first, so callers
//!    see their change immediately.
//! 2. Every change to the collection is written to the cache.
//! 3. The remote call runs afterwards. Its outcome only sets the
//!    connectivity flag, except for `create` (which swaps the temporary id
//!    for the server's) and `refetch` (which replaces the collection).
//!
//! Remote failures never reach the caller.

mod store;

pub use store::{RecipeStore, Snapshot};
