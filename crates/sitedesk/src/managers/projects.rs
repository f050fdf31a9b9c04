//! Manager for the project list collection.

use super::CollectionCache;
use crate::model::Project;
use crate::store::DocumentStore;
use async_trait::async_trait;
use freshness::{Collection, CollectionError, CollectionManager};
use std::sync::Arc;
use tracing::debug;

pub struct ProjectsManager {
    store: Arc<DocumentStore>,
    cache: CollectionCache<Project>,
}

impl ProjectsManager {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self {
            store,
            cache: CollectionCache::new(),
        }
    }

    /// Current cached project list.
    pub async fn snapshot(&self) -> Vec<Project> {
        self.cache.snapshot().await
    }

    /// Clears the cache at session teardown.
    pub async fn reset(&self) {
        self.cache.reset().await;
    }
}

#[async_trait]
impl CollectionManager for ProjectsManager {
    fn collection(&self) -> Collection {
        Collection::Projects
    }

    async fn ensure_loaded(&self) -> Result<(), CollectionError> {
        if self.cache.is_loaded().await {
            debug!("projects already loaded this session");
            return Ok(());
        }
        let projects = self.store.list_projects().await?;
        debug!(count = projects.len(), "projects loaded");
        self.cache.install(projects).await;
        Ok(())
    }

    async fn refresh_from_remote(&self) -> Result<(), CollectionError> {
        let projects = self.store.list_projects().await?;
        debug!(count = projects.len(), "projects refreshed");
        self.cache.install(projects).await;
        Ok(())
    }
}
