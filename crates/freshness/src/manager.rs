//! # CollectionManager Trait
//!
//! The `CollectionManager` trait is the contract between the freshness
//! controller and the code that actually owns collection data. The controller
//! never touches collection contents; it only decides *when* a manager should
//! load or re-fetch, and a manager decides *how*.
//!
//! # Architecture Note
//! Why a trait here? The controller's sequencing rules (load once per
//! sign-in, refresh on visibility regain, discard stale settlements) are
//! identical for every collection. By defining the contract once we can write
//! the controller logic once and reuse it for Users, Companies, and Projects
//! — and swap in mock managers for deterministic tests.

use crate::error::CollectionError;
use async_trait::async_trait;
use std::fmt;

/// The three collections whose freshness the controller owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Companies,
    Projects,
}

impl Collection {
    /// All managed collections, in the deterministic order the controller
    /// iterates them.
    pub const ALL: [Collection; 3] = [
        Collection::Users,
        Collection::Companies,
        Collection::Projects,
    ];

    /// Stable index into per-collection state arrays.
    pub(crate) fn index(self) -> usize {
        match self {
            Collection::Users => 0,
            Collection::Companies => 1,
            Collection::Projects => 2,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Users => write!(f, "users"),
            Collection::Companies => write!(f, "companies"),
            Collection::Projects => write!(f, "projects"),
        }
    }
}

/// Contract implemented by the code that owns one collection's local data.
///
/// Both operations are best understood against the remote document store:
/// [`ensure_loaded`](CollectionManager::ensure_loaded) brings data in if it
/// is not there yet, [`refresh_from_remote`](CollectionManager::refresh_from_remote)
/// re-fetches unconditionally. Neither returns the data itself — consumers
/// read collection contents through the manager's own accessors, outside this
/// contract.
#[async_trait]
pub trait CollectionManager: Send + Sync + 'static {
    /// Which collection this manager owns. Used for log fields and for
    /// indexing per-collection controller state.
    fn collection(&self) -> Collection;

    /// Succeeds once the collection's data is available locally. Must be a
    /// no-op if the data was already loaded this session.
    async fn ensure_loaded(&self) -> Result<(), CollectionError>;

    /// Re-fetches the collection from the remote and replaces local state.
    async fn refresh_from_remote(&self) -> Result<(), CollectionError>;
}

/// Per-collection bookkeeping held by the controller.
///
/// `is_refreshing` enforces the at-most-one-in-flight-per-collection rule:
/// it is checked and set synchronously inside the controller's event loop,
/// never across a suspension point.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CollectionLoadState {
    pub has_loaded_once: bool,
    pub is_refreshing: bool,
}
