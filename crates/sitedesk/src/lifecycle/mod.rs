//! # App Shell Lifecycle & Orchestration
//!
//! Individual pieces are simple — the store, three managers, an auth
//! gateway, the freshness controller — but **wiring them together** is where
//! the lifecycle lives. [`AppShell`] is the conductor:
//!
//! 1. **Construction** - build the store, the managers over it, the
//!    controller over the managers, and the auth gateway.
//! 2. **Wiring** - spawn the controller task and bridge the gateway's auth
//!    states into it.
//! 3. **Runtime** - hand out the controller handle (for the session phase)
//!    and the managers (for collection snapshots); forward visibility
//!    regains.
//! 4. **Teardown** - drop the auth bridge (unsubscribes), stop the
//!    controller's event loop, await its task.
//!
//! Everything is threaded explicitly: no module-level singletons, so two
//! shells can coexist in one process (as the tests do).

use crate::auth::AuthGateway;
use crate::managers::{CompaniesManager, ProjectsManager, UsersManager};
use crate::store::DocumentStore;
use freshness::{
    AuthBridge, ControllerError, ControllerHandle, FreshnessController, Identity, SessionPhase,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Event-channel capacity for the controller; triggers are rare and small,
/// so a modest buffer is plenty.
const CONTROLLER_BUFFER: usize = 32;

/// The running application shell: all collaborators constructed, wired, and
/// owned in one place.
pub struct AppShell {
    store: Arc<DocumentStore>,
    users: Arc<UsersManager>,
    companies: Arc<CompaniesManager>,
    projects: Arc<ProjectsManager>,
    auth: AuthGateway,
    handle: ControllerHandle,
    bridge: AuthBridge,
    controller_task: JoinHandle<()>,
}

impl AppShell {
    /// Builds the shell over a seeded store and starts the controller.
    pub fn new() -> Self {
        Self::with_store(Arc::new(DocumentStore::seeded()))
    }

    /// Builds the shell over a caller-provided store (tests inject faults
    /// through it).
    pub fn with_store(store: Arc<DocumentStore>) -> Self {
        let users = Arc::new(UsersManager::new(store.clone()));
        let companies = Arc::new(CompaniesManager::new(store.clone()));
        let projects = Arc::new(ProjectsManager::new(store.clone()));

        let (controller, handle) = FreshnessController::new(
            users.clone(),
            companies.clone(),
            projects.clone(),
            CONTROLLER_BUFFER,
        );
        let controller_task = tokio::spawn(controller.run());

        let auth = AuthGateway::new();
        let bridge = AuthBridge::spawn(&auth, handle.clone());

        info!("app shell started");
        Self {
            store,
            users,
            companies,
            projects,
            auth,
            handle,
            bridge,
            controller_task,
        }
    }

    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    pub fn users(&self) -> &UsersManager {
        &self.users
    }

    pub fn companies(&self) -> &CompaniesManager {
        &self.companies
    }

    pub fn projects(&self) -> &ProjectsManager {
        &self.projects
    }

    pub fn handle(&self) -> &ControllerHandle {
        &self.handle
    }

    /// Current session phase, for rendering the right surface.
    pub fn phase(&self) -> SessionPhase {
        self.handle.phase()
    }

    pub fn sign_in(&self, identity: Identity) {
        self.auth.sign_in(identity);
    }

    /// Signs out and drops the cached collections, so the next session
    /// cannot observe the previous user's documents.
    pub async fn sign_out(&self) {
        self.auth.sign_out();
        self.users.reset().await;
        self.companies.reset().await;
        self.projects.reset().await;
    }

    /// Reports that the hosting page regained foreground visibility.
    pub async fn visibility_regained(&self) -> Result<(), ControllerError> {
        self.handle.visibility_regained().await
    }

    /// Tears the shell down: unsubscribes from auth, stops the controller's
    /// event loop, and waits for its task to finish.
    pub async fn shutdown(self) -> Result<(), ControllerError> {
        drop(self.bridge);
        self.handle.shutdown().await?;
        let _ = self.controller_task.await;
        info!("app shell stopped");
        Ok(())
    }
}

impl Default for AppShell {
    fn default() -> Self {
        Self::new()
    }
}
