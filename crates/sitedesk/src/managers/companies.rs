//! Manager for the companies registry collection.

use super::CollectionCache;
use crate::model::Company;
use crate::store::DocumentStore;
use async_trait::async_trait;
use freshness::{Collection, CollectionError, CollectionManager};
use std::sync::Arc;
use tracing::debug;

pub struct CompaniesManager {
    store: Arc<DocumentStore>,
    cache: CollectionCache<Company>,
}

impl CompaniesManager {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self {
            store,
            cache: CollectionCache::new(),
        }
    }

    /// Current cached companies registry.
    pub async fn snapshot(&self) -> Vec<Company> {
        self.cache.snapshot().await
    }

    /// Clears the cache at session teardown.
    pub async fn reset(&self) {
        self.cache.reset().await;
    }
}

#[async_trait]
impl CollectionManager for CompaniesManager {
    fn collection(&self) -> Collection {
        Collection::Companies
    }

    async fn ensure_loaded(&self) -> Result<(), CollectionError> {
        if self.cache.is_loaded().await {
            debug!("companies already loaded this session");
            return Ok(());
        }
        let companies = self.store.list_companies().await?;
        debug!(count = companies.len(), "companies loaded");
        self.cache.install(companies).await;
        Ok(())
    }

    async fn refresh_from_remote(&self) -> Result<(), CollectionError> {
        let companies = self.store.list_companies().await?;
        debug!(count = companies.len(), "companies refreshed");
        self.cache.install(companies).await;
        Ok(())
    }
}
