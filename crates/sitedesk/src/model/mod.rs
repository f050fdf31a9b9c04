//! # Domain Models
//!
//! Pure data structures for the three collections the app shell manages:
//! the users directory, the companies registry, and the project list. Each
//! entity pairs with a closed update document (`*Update`) whose fields are
//! the only mutations the store accepts — the typed replacement for
//! free-form update payloads.

pub mod company;
pub mod project;
pub mod user;

pub use company::{Company, CompanyId, CompanyUpdate};
pub use project::{Project, ProjectId, ProjectStatus, ProjectUpdate, Todo};
pub use user::{User, UserId, UserRole, UserUpdate};
