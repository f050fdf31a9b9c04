//! # Freshness
//!
//! Session-gated data freshness for applications whose collections live in a
//! remote document store: load each collection once per authenticated
//! session, refresh on visibility regain, never touch data before
//! authentication resolves.
//!
//! ## The Problem
//!
//! A client application with remote-backed collections has three recurring
//! sequencing bugs:
//!
//! 1. Fetching data before the auth state has resolved (or after sign-out).
//! 2. Re-triggering the initial load every time the auth observer re-delivers
//!    the same signed-in identity.
//! 3. Stacking refreshes when the trigger (a tab regaining focus) fires
//!    faster than the remote answers — or worse, letting a fetch issued for
//!    the previous user land in the next user's session.
//!
//! This crate packages the sequencing rules once, behind two seams, so the
//! rules are written and tested in one place.
//!
//! ## Architecture Overview
//!
//! The crate separates concerns into three layers:
//!
//! 1. **Manager Layer** ([`CollectionManager`]) — your data ownership: how a
//!    collection is fetched and cached is entirely yours.
//! 2. **Controller Layer** ([`FreshnessController`]) — the sequencing rules:
//!    a single task that owns the session state machine and decides when
//!    each manager is called.
//! 3. **Interface Layer** ([`ControllerHandle`]) — type-safe triggers in,
//!    [`SessionPhase`] out (via a `watch` channel, for rendering).
//!
//! ## Session Lifecycle
//!
//! The published [`SessionPhase`] moves `Unresolved → Resolving → Ready`
//! when all three collections load, or to `Failed` when any of them does
//! not; sign-out resets it to `Unresolved` and invalidates everything still
//! in flight (see the generation notes on [`controller`]). Visibility
//! regains only matter in `Ready`, and at most one refresh per collection is
//! ever in flight.
//!
//! ## Example
//!
//! ```rust
//! use freshness::mock::MockCollectionManager;
//! use freshness::{Collection, FreshnessController, Identity, SessionPhase};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let users = Arc::new(MockCollectionManager::new(Collection::Users));
//!     let companies = Arc::new(MockCollectionManager::new(Collection::Companies));
//!     let projects = Arc::new(MockCollectionManager::new(Collection::Projects));
//!
//!     let (controller, handle) =
//!         FreshnessController::new(users, companies, projects, 16);
//!     let task = tokio::spawn(controller.run());
//!
//!     handle.auth_observed(Some(Identity::new("ada"))).await.unwrap();
//!
//!     let mut phases = handle.phase_watch();
//!     while !matches!(*phases.borrow_and_update(), SessionPhase::Ready) {
//!         phases.changed().await.unwrap();
//!     }
//!
//!     handle.shutdown().await.unwrap();
//!     task.await.unwrap();
//! }
//! ```
//!
//! ## Testing
//!
//! The [`mock`] module provides a [`MockCollectionManager`](mock::MockCollectionManager)
//! with a manual mode in which every call parks until the test settles it,
//! making settlement-order and in-flight-deduplication scenarios fully
//! deterministic.

pub mod auth;
pub mod controller;
pub mod error;
pub mod handle;
pub mod manager;
pub mod message;
pub mod mock;
pub mod phase;
pub mod tracing;

// Re-export core types for convenience
pub use auth::{AuthBridge, AuthObserver};
pub use controller::FreshnessController;
pub use error::{CollectionError, ControllerError};
pub use handle::ControllerHandle;
pub use manager::{Collection, CollectionManager};
pub use message::ControllerEvent;
pub use phase::{Identity, SessionPhase};
