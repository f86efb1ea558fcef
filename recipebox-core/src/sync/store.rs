use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::cache::RecipeCache;
use crate::models::{mint_local_id, Recipe, RecipePatch};
use crate::remote::{RemoteError, RemoteStore};
use crate::search::TitleFilter;
use crate::steps::StepEdit;

/// Published view of the engine state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub recipes: Vec<Recipe>,
    /// Whether the most recent remote call succeeded.
    pub connected: bool,
}

#[derive(Debug, Default)]
struct State {
    recipes: Vec<Recipe>,
    connected: bool,
}

struct Shared<R, C> {
    remote: R,
    cache: C,
    state: Mutex<State>,
    published: watch::Sender<Snapshot>,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl<R, C: RecipeCache> Shared<R, C> {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `mutate` against the collection. When it reports a change
    /// (`Some`), the collection is mirrored to the cache and published
    /// before the lock is released.
    fn commit<T>(&self, mutate: impl FnOnce(&mut Vec<Recipe>) -> Option<T>) -> Option<T> {
        let mut state = self.state();
        let result = mutate(&mut state.recipes)?;
        self.mirror(&state);
        self.publish(&state);
        Some(result)
    }

    /// Like [`commit`](Self::commit) for mutations that always change
    /// the collection.
    fn commit_always<T>(&self, mutate: impl FnOnce(&mut Vec<Recipe>) -> T) -> T {
        let mut state = self.state();
        let result = mutate(&mut state.recipes);
        self.mirror(&state);
        self.publish(&state);
        result
    }

    /// Replaces the whole collection and the connectivity flag.
    fn replace_all(&self, recipes: Vec<Recipe>, connected: bool) {
        let mut state = self.state();
        state.recipes = recipes.into_iter().map(Recipe::normalized).collect();
        state.connected = connected;
        self.mirror(&state);
        self.publish(&state);
    }

    fn set_connected(&self, connected: bool) {
        let mut state = self.state();
        if state.connected != connected {
            state.connected = connected;
            self.publish(&state);
        }
    }

    fn record_outcome(&self, operation: &'static str, result: Result<(), RemoteError>) {
        match result {
            Ok(()) => self.set_connected(true),
            Err(e) => {
                tracing::warn!(operation, "remote store failed, local state retained: {}", e);
                self.set_connected(false);
            }
        }
    }

    fn mirror(&self, state: &State) {
        if let Err(e) = self.cache.save(&state.recipes) {
            tracing::warn!("failed to write recipe cache: {}", e);
        }
    }

    fn publish(&self, state: &State) {
        self.published.send_replace(Snapshot {
            recipes: state.recipes.clone(),
            connected: state.connected,
        });
    }

    fn track(&self, handle: JoinHandle<()>) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        in_flight.retain(|h| !h.is_finished());
        in_flight.push(handle);
    }
}

/// The offline-first recipe collection.
///
/// Cloning is cheap and every clone drives the same collection.
pub struct RecipeStore<R, C> {
    shared: Arc<Shared<R, C>>,
}

impl<R, C> Clone for RecipeStore<R, C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<R, C> RecipeStore<R, C>
where
    R: RemoteStore + 'static,
    C: RecipeCache + Send + Sync + 'static,
{
    /// Creates an empty, disconnected store. Call [`refetch`](Self::refetch)
    /// (or use [`init`](Self::init)) to load data.
    pub fn new(remote: R, cache: C) -> Self {
        let (published, _) = watch::channel(Snapshot::default());
        Self {
            shared: Arc::new(Shared {
                remote,
                cache,
                state: Mutex::new(State::default()),
                published,
                in_flight: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Creates a store and loads the collection, from the remote store if
    /// it answers and from the cache otherwise.
    pub async fn init(remote: R, cache: C) -> Self {
        let store = Self::new(remote, cache);
        store.refetch().await;
        store
    }

    /// Returns the remote store this engine talks to.
    pub fn remote(&self) -> &R {
        &self.shared.remote
    }

    /// Returns the cache this engine mirrors to.
    pub fn cache(&self) -> &C {
        &self.shared.cache
    }

    /// Subscribes to state changes. The receiver starts at the current
    /// snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.shared.published.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.shared.state();
        Snapshot {
            recipes: state.recipes.clone(),
            connected: state.connected,
        }
    }

    pub fn recipes(&self) -> Vec<Recipe> {
        self.shared.state().recipes.clone()
    }

    pub fn get(&self, id: &str) -> Option<Recipe> {
        self.shared
            .state()
            .recipes
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub fn is_connected(&self) -> bool {
        self.shared.state().connected
    }

    /// Recipes whose title matches `pattern` (case-insensitive regex). An
    /// invalid or blank pattern returns the whole collection.
    pub fn search(&self, pattern: &str) -> Vec<Recipe> {
        let filter = TitleFilter::new(pattern);
        self.shared
            .state()
            .recipes
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect()
    }

    /// Reloads the whole collection.
    ///
    /// On success the server's collection replaces the in-memory one and
    /// the store is connected. On failure the store is disconnected and the
    /// cached collection (possibly empty) replaces the in-memory one.
    pub async fn refetch(&self) {
        match self.shared.remote.list().await {
            Ok(recipes) => {
                let dropped = self
                    .shared
                    .state()
                    .recipes
                    .iter()
                    .filter(|r| r.is_local())
                    .count();
                if dropped > 0 {
                    tracing::info!(dropped, "discarding local-only recipes replaced by server data");
                }
                tracing::debug!(count = recipes.len(), "loaded recipes from remote store");
                self.shared.replace_all(recipes, true);
            }
            Err(e) => {
                tracing::warn!("remote store unreachable, using local cache: {}", e);
                let cached = self.shared.cache.load();
                self.shared.replace_all(cached, false);
            }
        }
    }

    /// Creates a recipe and returns its id.
    ///
    /// The recipe is added under a temporary id before the remote store is
    /// asked. If the remote store confirms it, the temporary entry is
    /// replaced in place by the server's record and the server id is
    /// returned; otherwise the local record stays and its temporary id is
    /// returned. A blank title creates nothing and returns an empty string.
    pub async fn create(&self, title: &str) -> String {
        let title = title.trim();
        if title.is_empty() {
            return String::new();
        }

        let temp_id = self.shared.commit_always(|recipes| {
            let id = mint_local_id(recipes.iter().map(|r| r.id.as_str()));
            recipes.push(Recipe::new(id.clone(), title));
            id
        });

        match self.shared.remote.create(title).await {
            Ok(created) => {
                let created = created.normalized();
                let server_id = created.id.clone();
                self.shared.set_connected(true);

                let swapped = self.shared.commit(|recipes| {
                    let slot = recipes.iter_mut().find(|r| r.id == temp_id)?;
                    *slot = created;
                    Some(())
                });
                if swapped.is_none() {
                    tracing::debug!(%temp_id, %server_id, "recipe removed before creation was confirmed");
                }
                server_id
            }
            Err(e) => {
                tracing::warn!("create failed, kept local-only recipe {}: {}", temp_id, e);
                self.shared.set_connected(false);
                temp_id
            }
        }
    }

    /// Applies `patch` to the recipe with `id` right away, then sends it to
    /// the remote store in the background. The local change is kept even if
    /// the remote store rejects it.
    ///
    /// A blank title in the patch is ignored; an unknown id leaves the
    /// collection untouched.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn update(&self, id: &str, mut patch: RecipePatch) {
        if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            tracing::debug!(id, "ignoring blank title in update");
            patch.title = None;
        }
        if patch.is_empty() {
            return;
        }

        let applied = self.shared.commit(|recipes| {
            let recipe = recipes.iter_mut().find(|r| r.id == id)?;
            recipe.apply(&patch);
            Some(())
        });
        if applied.is_none() {
            tracing::debug!(id, "update for unknown recipe, nothing changed locally");
        }

        let shared = Arc::clone(&self.shared);
        let id = id.to_string();
        self.shared.track(tokio::spawn(async move {
            let result = shared.remote.patch(&id, &patch).await;
            shared.record_outcome("update", result);
        }));
    }

    /// Removes the recipe with `id` right away, then asks the remote store
    /// to delete it in the background. The removal is never reverted.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn delete(&self, id: &str) {
        let removed = self.shared.commit(|recipes| {
            let index = recipes.iter().position(|r| r.id == id)?;
            Some(recipes.remove(index))
        });
        if removed.is_none() {
            tracing::debug!(id, "delete for unknown recipe");
        }

        let shared = Arc::clone(&self.shared);
        let id = id.to_string();
        self.shared.track(tokio::spawn(async move {
            let result = shared.remote.delete(&id).await;
            shared.record_outcome("delete", result);
        }));
    }

    /// Applies a step edit to the recipe with `id` as a single update.
    /// Returns false when the recipe is unknown or the edit is a no-op.
    pub fn edit_steps(&self, id: &str, edit: &StepEdit) -> bool {
        let patch = match self.get(id).and_then(|recipe| edit.patch_for(&recipe)) {
            Some(patch) => patch,
            None => return false,
        };
        self.update(id, patch);
        true
    }

    /// Waits for every background remote request issued so far.
    pub async fn settle(&self) {
        loop {
            let handles = std::mem::take(
                &mut *self
                    .shared
                    .in_flight
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner),
            );
            if handles.is_empty() {
                return;
            }
            for result in join_all(handles).await {
                if let Err(e) = result {
                    tracing::warn!("remote request task failed: {}", e);
                }
            }
        }
    }
}
