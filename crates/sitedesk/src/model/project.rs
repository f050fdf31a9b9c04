use super::{CompanyId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a project document in the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub String);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a project currently sits in its delivery lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    Design,
    Construction,
    Handover,
    Archived,
}

/// One task on a project's to-do list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub title: String,
    pub done: bool,
    pub assignee: Option<UserId>,
}

/// A construction project tracked by the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub status: ProjectStatus,
    pub lead_company: Option<CompanyId>,
    pub address: String,
    pub todos: Vec<Todo>,
}

impl Project {
    /// Tasks still open on this project.
    pub fn open_todos(&self) -> usize {
        self.todos.iter().filter(|todo| !todo.done).count()
    }
}

/// Closed update document for a project. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub status: Option<ProjectStatus>,
    pub lead_company: Option<CompanyId>,
    pub address: Option<String>,
}

impl ProjectUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.status.is_none()
            && self.lead_company.is_none()
            && self.address.is_none()
    }

    pub(crate) fn apply(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(lead_company) = self.lead_company {
            project.lead_company = Some(lead_company);
        }
        if let Some(address) = self.address {
            project.address = address;
        }
    }
}
