//! # Document Store
//!
//! In-memory stand-in for the remote document database the real deployment
//! would talk to. It exposes list/get/update/delete per entity, applies the
//! closed update documents from [`model`](crate::model), and offers fault
//! injection so the demo and the tests can produce both failure classes
//! ([`CollectionError::RemoteUnavailable`] and
//! [`CollectionError::RemoteError`]) on demand.

use crate::model::{
    Company, CompanyId, CompanyUpdate, Project, ProjectId, ProjectStatus, ProjectUpdate, Todo,
    User, UserId, UserRole, UserUpdate,
};
use freshness::CollectionError;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Default)]
struct StoreInner {
    users: HashMap<UserId, User>,
    companies: HashMap<CompanyId, Company>,
    projects: HashMap<ProjectId, Project>,
    offline: bool,
    fail_next: Option<CollectionError>,
}

/// The remote side of the application, reachable only through async calls
/// that can fail like a network service.
#[derive(Default)]
pub struct DocumentStore {
    inner: Mutex<StoreInner>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with a small, plausible dataset.
    pub fn seeded() -> Self {
        let mut inner = StoreInner::default();
        for company in seed_companies() {
            inner.companies.insert(company.id.clone(), company);
        }
        for user in seed_users() {
            inner.users.insert(user.id.clone(), user);
        }
        for project in seed_projects() {
            inner.projects.insert(project.id.clone(), project);
        }
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Simulate losing (or regaining) the connection to the remote service.
    /// While offline every call fails with `RemoteUnavailable`.
    pub async fn set_offline(&self, offline: bool) {
        self.inner.lock().await.offline = offline;
    }

    /// Make exactly the next call fail with the given error.
    pub async fn fail_next_with(&self, error: CollectionError) {
        self.inner.lock().await.fail_next = Some(error);
    }

    // --- Users ---

    pub async fn list_users(&self) -> Result<Vec<User>, CollectionError> {
        let mut inner = self.inner.lock().await;
        check_fault(&mut inner)?;
        Ok(inner.users.values().cloned().collect())
    }

    pub async fn get_user(&self, id: &UserId) -> Result<Option<User>, CollectionError> {
        let mut inner = self.inner.lock().await;
        check_fault(&mut inner)?;
        Ok(inner.users.get(id).cloned())
    }

    pub async fn update_user(
        &self,
        id: &UserId,
        update: UserUpdate,
    ) -> Result<User, CollectionError> {
        let mut inner = self.inner.lock().await;
        check_fault(&mut inner)?;
        let user = inner
            .users
            .get_mut(id)
            .ok_or_else(|| CollectionError::RemoteError(format!("user {id} not found")))?;
        if update.is_empty() {
            debug!(%id, "empty user update, nothing to apply");
            return Ok(user.clone());
        }
        update.apply(user);
        Ok(user.clone())
    }

    pub async fn delete_user(&self, id: &UserId) -> Result<(), CollectionError> {
        let mut inner = self.inner.lock().await;
        check_fault(&mut inner)?;
        inner
            .users
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CollectionError::RemoteError(format!("user {id} not found")))
    }

    // --- Companies ---

    pub async fn list_companies(&self) -> Result<Vec<Company>, CollectionError> {
        let mut inner = self.inner.lock().await;
        check_fault(&mut inner)?;
        Ok(inner.companies.values().cloned().collect())
    }

    pub async fn get_company(&self, id: &CompanyId) -> Result<Option<Company>, CollectionError> {
        let mut inner = self.inner.lock().await;
        check_fault(&mut inner)?;
        Ok(inner.companies.get(id).cloned())
    }

    pub async fn update_company(
        &self,
        id: &CompanyId,
        update: CompanyUpdate,
    ) -> Result<Company, CollectionError> {
        let mut inner = self.inner.lock().await;
        check_fault(&mut inner)?;
        let company = inner
            .companies
            .get_mut(id)
            .ok_or_else(|| CollectionError::RemoteError(format!("company {id} not found")))?;
        if update.is_empty() {
            debug!(%id, "empty company update, nothing to apply");
            return Ok(company.clone());
        }
        update.apply(company);
        Ok(company.clone())
    }

    pub async fn delete_company(&self, id: &CompanyId) -> Result<(), CollectionError> {
        let mut inner = self.inner.lock().await;
        check_fault(&mut inner)?;
        inner
            .companies
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CollectionError::RemoteError(format!("company {id} not found")))
    }

    // --- Projects ---

    pub async fn list_projects(&self) -> Result<Vec<Project>, CollectionError> {
        let mut inner = self.inner.lock().await;
        check_fault(&mut inner)?;
        Ok(inner.projects.values().cloned().collect())
    }

    pub async fn get_project(&self, id: &ProjectId) -> Result<Option<Project>, CollectionError> {
        let mut inner = self.inner.lock().await;
        check_fault(&mut inner)?;
        Ok(inner.projects.get(id).cloned())
    }

    pub async fn update_project(
        &self,
        id: &ProjectId,
        update: ProjectUpdate,
    ) -> Result<Project, CollectionError> {
        let mut inner = self.inner.lock().await;
        check_fault(&mut inner)?;
        let project = inner
            .projects
            .get_mut(id)
            .ok_or_else(|| CollectionError::RemoteError(format!("project {id} not found")))?;
        if update.is_empty() {
            debug!(%id, "empty project update, nothing to apply");
            return Ok(project.clone());
        }
        update.apply(project);
        Ok(project.clone())
    }

    pub async fn delete_project(&self, id: &ProjectId) -> Result<(), CollectionError> {
        let mut inner = self.inner.lock().await;
        check_fault(&mut inner)?;
        inner
            .projects
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CollectionError::RemoteError(format!("project {id} not found")))
    }
}

fn check_fault(inner: &mut StoreInner) -> Result<(), CollectionError> {
    if let Some(error) = inner.fail_next.take() {
        return Err(error);
    }
    if inner.offline {
        return Err(CollectionError::RemoteUnavailable(
            "document store offline".into(),
        ));
    }
    Ok(())
}

fn seed_companies() -> Vec<Company> {
    vec![
        Company {
            id: CompanyId("co-norr".into()),
            name: "Norr Arkitekter".into(),
            trade: "architecture".into(),
            city: "Oslo".into(),
        },
        Company {
            id: CompanyId("co-baustat".into()),
            name: "Baustat Engineering".into(),
            trade: "structural engineering".into(),
            city: "Bergen".into(),
        },
    ]
}

fn seed_users() -> Vec<User> {
    vec![
        User {
            id: UserId("u-ada".into()),
            display_name: "Ada Berg".into(),
            email: "ada@norr.example".into(),
            role: UserRole::Architect,
            company_id: Some(CompanyId("co-norr".into())),
        },
        User {
            id: UserId("u-grace".into()),
            display_name: "Grace Holm".into(),
            email: "grace@baustat.example".into(),
            role: UserRole::Engineer,
            company_id: Some(CompanyId("co-baustat".into())),
        },
        User {
            id: UserId("u-otto".into()),
            display_name: "Otto Lind".into(),
            email: "otto@norr.example".into(),
            role: UserRole::SiteSupervisor,
            company_id: Some(CompanyId("co-norr".into())),
        },
    ]
}

fn seed_projects() -> Vec<Project> {
    vec![
        Project {
            id: ProjectId("p-fjord".into()),
            name: "Fjordgata 12".into(),
            status: ProjectStatus::Construction,
            lead_company: Some(CompanyId("co-norr".into())),
            address: "Fjordgata 12, Trondheim".into(),
            todos: vec![
                Todo {
                    title: "Pour foundation, block B".into(),
                    done: true,
                    assignee: Some(UserId("u-otto".into())),
                },
                Todo {
                    title: "Review facade drawings".into(),
                    done: false,
                    assignee: Some(UserId("u-ada".into())),
                },
            ],
        },
        Project {
            id: ProjectId("p-kai".into()),
            name: "Kaihuset".into(),
            status: ProjectStatus::Design,
            lead_company: Some(CompanyId("co-baustat".into())),
            address: "Kaigata 3, Bergen".into(),
            todos: vec![Todo {
                title: "Load calculations for pier deck".into(),
                done: false,
                assignee: Some(UserId("u-grace".into())),
            }],
        },
    ]
}
