//! # Collection Managers
//!
//! One manager per collection (users, companies, projects). Each owns a
//! local cache of its collection and implements the
//! [`CollectionManager`](freshness::CollectionManager) contract the
//! freshness controller drives: `ensure_loaded` fetches only if this session
//! has not loaded yet, `refresh_from_remote` always re-fetches and replaces
//! the cache.
//!
//! Consumers read collection contents through the managers' `snapshot()`
//! accessors; the controller itself never sees the data.

pub mod companies;
pub mod projects;
pub mod users;

pub use companies::CompaniesManager;
pub use projects::ProjectsManager;
pub use users::UsersManager;

use tokio::sync::Mutex;

struct CacheState<T> {
    items: Vec<T>,
    loaded: bool,
}

/// Shared cache core behind every manager: a snapshot of one collection plus
/// the loaded-this-session flag.
pub(crate) struct CollectionCache<T> {
    state: Mutex<CacheState<T>>,
}

impl<T: Clone> CollectionCache<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(CacheState {
                items: Vec::new(),
                loaded: false,
            }),
        }
    }

    pub(crate) async fn is_loaded(&self) -> bool {
        self.state.lock().await.loaded
    }

    /// Replaces the cached snapshot and marks the collection loaded.
    pub(crate) async fn install(&self, items: Vec<T>) {
        let mut state = self.state.lock().await;
        state.items = items;
        state.loaded = true;
    }

    pub(crate) async fn snapshot(&self) -> Vec<T> {
        self.state.lock().await.items.clone()
    }

    /// Drops the cached data, e.g. when a session ends and the next user
    /// must not see the previous user's documents.
    pub(crate) async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.items.clear();
        state.loaded = false;
    }
}
