use super::CompanyId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a user document in the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role of a user within the firm's directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Architect,
    Engineer,
    SiteSupervisor,
    Admin,
}

/// One entry in the users directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    pub email: String,
    pub role: UserRole,
    pub company_id: Option<CompanyId>,
}

/// Closed update document for a user.
///
/// Every settable field is listed here; there is no way to smuggle an
/// arbitrary key/value pair into the store. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.email.is_none() && self.role.is_none()
    }

    pub(crate) fn apply(self, user: &mut User) {
        if let Some(display_name) = self.display_name {
            user.display_name = display_name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(role) = self.role {
            user.role = role;
        }
    }
}
