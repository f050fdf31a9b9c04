//! Manager for the users directory collection.

use super::CollectionCache;
use crate::model::User;
use crate::store::DocumentStore;
use async_trait::async_trait;
use freshness::{Collection, CollectionError, CollectionManager};
use std::sync::Arc;
use tracing::debug;

pub struct UsersManager {
    store: Arc<DocumentStore>,
    cache: CollectionCache<User>,
}

impl UsersManager {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self {
            store,
            cache: CollectionCache::new(),
        }
    }

    /// Current cached users directory.
    pub async fn snapshot(&self) -> Vec<User> {
        self.cache.snapshot().await
    }

    /// Clears the cache at session teardown.
    pub async fn reset(&self) {
        self.cache.reset().await;
    }
}

#[async_trait]
impl CollectionManager for UsersManager {
    fn collection(&self) -> Collection {
        Collection::Users
    }

    async fn ensure_loaded(&self) -> Result<(), CollectionError> {
        if self.cache.is_loaded().await {
            debug!("users already loaded this session");
            return Ok(());
        }
        let users = self.store.list_users().await?;
        debug!(count = users.len(), "users loaded");
        self.cache.install(users).await;
        Ok(())
    }

    async fn refresh_from_remote(&self) -> Result<(), CollectionError> {
        let users = self.store.list_users().await?;
        debug!(count = users.len(), "users refreshed");
        self.cache.install(users).await;
        Ok(())
    }
}
