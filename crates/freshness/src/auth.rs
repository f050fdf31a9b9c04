//! # Auth Observation
//!
//! The controller does not talk to an authentication service; it observes
//! one. This module defines the observation seam (`AuthObserver`) and the
//! bridge task that forwards observed states into the controller.
//!
//! # Architecture Note
//! The subscription is modelled as a `tokio::sync::watch` receiver, which
//! matches the contract the controller needs: the current state is delivered
//! immediately on subscribe, then every change. The bridge owns the
//! forwarding task and aborts it on drop, so a torn-down shell can never act
//! on auth events after disposal.

use crate::handle::ControllerHandle;
use crate::phase::Identity;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Source of authentication state changes.
///
/// Implementors are expected to hand out a receiver whose current value is
/// the present authentication state; `None` means no signed-in identity.
pub trait AuthObserver: Send + Sync {
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}

/// Forwards auth states from an [`AuthObserver`] into a controller.
///
/// Dropping the bridge is the unsubscribe: the forwarding task is aborted
/// and no further auth events reach the controller.
pub struct AuthBridge {
    task: JoinHandle<()>,
}

impl AuthBridge {
    /// Subscribes to `observer` and spawns the forwarding task.
    ///
    /// The state current at subscription time is delivered first, so a
    /// controller attached to an already-signed-in observer starts resolving
    /// immediately.
    pub fn spawn(observer: &dyn AuthObserver, handle: ControllerHandle) -> Self {
        let mut states = observer.subscribe();
        let task = tokio::spawn(async move {
            // Force the initial value through the changed() loop below.
            states.mark_changed();
            while states.changed().await.is_ok() {
                let identity = states.borrow_and_update().clone();
                if handle.auth_observed(identity).await.is_err() {
                    debug!("controller gone, stopping auth forwarding");
                    break;
                }
            }
        });
        Self { task }
    }
}

impl Drop for AuthBridge {
    fn drop(&mut self) {
        self.task.abort();
    }
}
