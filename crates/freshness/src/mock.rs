//! # Mock Collection Manager
//!
//! An in-memory [`CollectionManager`] for unit tests. It lets tests control
//! both *what* each load/refresh call returns and *when* it settles, without
//! any real remote behind it.
//!
//! ## Two modes
//!
//! | Mode | Construction | Settlement |
//! |------|--------------|------------|
//! | **Scripted** | [`MockCollectionManager::new`] | Calls settle immediately with the next queued result (default `Ok`) |
//! | **Manual** | [`MockCollectionManager::manual`] | Each call parks until the test settles its [`PendingCall`] |
//!
//! Scripted mode is enough for happy-path tests; manual mode is what makes
//! settlement-order and in-flight-deduplication tests deterministic.
//!
//! ```rust
//! use freshness::mock::MockCollectionManager;
//! use freshness::{Collection, CollectionError, CollectionManager};
//!
//! #[tokio::main]
//! async fn main() {
//!     let users = MockCollectionManager::new(Collection::Users);
//!     users.push_err(CollectionError::RemoteError("quota exceeded".into()));
//!
//!     assert!(users.ensure_loaded().await.is_err());
//!     assert!(users.ensure_loaded().await.is_ok()); // queue empty: defaults to Ok
//!     assert_eq!(users.ensure_loaded_calls(), 2);
//! }
//! ```

use crate::error::CollectionError;
use crate::manager::{Collection, CollectionManager};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::{mpsc, oneshot};

/// Which manager operation a [`PendingCall`] was made through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    EnsureLoaded,
    RefreshFromRemote,
}

/// An in-flight call parked inside a manual-mode mock, waiting for the test
/// to settle it.
#[derive(Debug)]
pub struct PendingCall {
    operation: Operation,
    respond_to: oneshot::Sender<Result<(), CollectionError>>,
}

impl PendingCall {
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Settles the call with an arbitrary result.
    pub fn settle(self, result: Result<(), CollectionError>) {
        let _ = self.respond_to.send(result);
    }

    pub fn succeed(self) {
        self.settle(Ok(()));
    }

    pub fn fail(self, error: CollectionError) {
        self.settle(Err(error));
    }
}

/// Test double for one collection's manager.
pub struct MockCollectionManager {
    collection: Collection,
    scripted: Mutex<VecDeque<Result<(), CollectionError>>>,
    pending: Option<mpsc::UnboundedSender<PendingCall>>,
    ensure_loaded_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
}

impl MockCollectionManager {
    /// Scripted mode: calls settle immediately with the next queued result,
    /// defaulting to `Ok(())` when the queue is empty.
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            scripted: Mutex::new(VecDeque::new()),
            pending: None,
            ensure_loaded_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
        }
    }

    /// Manual mode: every call is surfaced on the returned receiver as a
    /// [`PendingCall`] and parks until the test settles it. Calls arrive on
    /// the receiver in invocation order.
    pub fn manual(collection: Collection) -> (Self, mpsc::UnboundedReceiver<PendingCall>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mock = Self {
            collection,
            scripted: Mutex::new(VecDeque::new()),
            pending: Some(sender),
            ensure_loaded_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
        };
        (mock, receiver)
    }

    /// Queues a successful result (scripted mode).
    pub fn push_ok(&self) {
        self.scripted.lock().unwrap().push_back(Ok(()));
    }

    /// Queues a failure (scripted mode).
    pub fn push_err(&self, error: CollectionError) {
        self.scripted.lock().unwrap().push_back(Err(error));
    }

    /// How many times `ensure_loaded` has been invoked.
    pub fn ensure_loaded_calls(&self) -> usize {
        self.ensure_loaded_calls.load(Ordering::SeqCst)
    }

    /// How many times `refresh_from_remote` has been invoked.
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    async fn next_result(&self, operation: Operation) -> Result<(), CollectionError> {
        if let Some(pending) = &self.pending {
            let (respond_to, response) = oneshot::channel();
            if pending
                .send(PendingCall {
                    operation,
                    respond_to,
                })
                .is_err()
            {
                // Test dropped the receiver; treat the remote as gone.
                return Err(CollectionError::RemoteUnavailable("mock closed".into()));
            }
            return response
                .await
                .unwrap_or_else(|_| Err(CollectionError::RemoteUnavailable("mock closed".into())));
        }
        self.scripted.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

#[async_trait]
impl CollectionManager for MockCollectionManager {
    fn collection(&self) -> Collection {
        self.collection
    }

    async fn ensure_loaded(&self) -> Result<(), CollectionError> {
        self.ensure_loaded_calls.fetch_add(1, Ordering::SeqCst);
        self.next_result(Operation::EnsureLoaded).await
    }

    async fn refresh_from_remote(&self) -> Result<(), CollectionError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.next_result(Operation::RefreshFromRemote).await
    }
}
