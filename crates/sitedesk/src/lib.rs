//! # Sitedesk
//!
//! Sample project-management shell for architecture/engineering/construction
//! teams, built on the [`freshness`] controller.
//!
//! ## Core Components
//!
//! - **[model]**: Pure data structures for the three collections (users
//!   directory, companies registry, project list) plus their closed update
//!   documents.
//! - **[store]**: In-memory stand-in for the remote document database, with
//!   fault injection for tests and demos.
//! - **[managers]**: One cached [`CollectionManager`](freshness::CollectionManager)
//!   per collection.
//! - **[auth]**: Stand-in auth provider exposing the
//!   [`AuthObserver`](freshness::AuthObserver) seam.
//! - **[lifecycle]**: The [`AppShell`](lifecycle::AppShell) orchestrator
//!   that wires everything together.
//!
//! ## Session Flow
//!
//! Sign in through the shell and the freshness controller loads all three
//! collections before the phase reaches `Ready`; only then do the manager
//! snapshots carry data. Visibility regains re-fetch best-effort; sign-out
//! drops the caches and returns the surface to the sign-in prompt.

pub mod auth;
pub mod lifecycle;
pub mod managers;
pub mod model;
pub mod store;

pub use auth::AuthGateway;
pub use lifecycle::AppShell;
pub use store::DocumentStore;
