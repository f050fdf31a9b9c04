//! # Controller Handle
//!
//! This module defines the cheap-to-clone interface half of the controller
//! pair. It forwards triggers over the event channel and exposes the
//! published session phase.

use crate::error::ControllerError;
use crate::message::ControllerEvent;
use crate::phase::{Identity, SessionPhase};
use tokio::sync::{mpsc, watch};
use tracing::{debug, instrument};

/// Handle for driving and observing a running
/// [`FreshnessController`](crate::controller::FreshnessController).
///
/// * **Cloneable** — holds only a sender and a watch receiver.
/// * **Async triggers** — each trigger resolves once the event is queued, not
///   once it is processed; observe effects through [`phase_watch`](Self::phase_watch).
#[derive(Clone)]
pub struct ControllerHandle {
    sender: mpsc::Sender<ControllerEvent>,
    phase: watch::Receiver<SessionPhase>,
}

impl ControllerHandle {
    pub(crate) fn new(
        sender: mpsc::Sender<ControllerEvent>,
        phase: watch::Receiver<SessionPhase>,
    ) -> Self {
        Self { sender, phase }
    }

    /// Reports the authentication state observed by the auth collaborator:
    /// the signed-in identity, or `None` on sign-out / unauthenticated
    /// resolution.
    #[instrument(skip(self))]
    pub async fn auth_observed(&self, identity: Option<Identity>) -> Result<(), ControllerError> {
        debug!("queueing auth observation");
        self.sender
            .send(ControllerEvent::AuthObserved(identity))
            .await
            .map_err(|_| ControllerError::ControllerClosed)
    }

    /// Reports that the hosting page regained foreground visibility.
    #[instrument(skip(self))]
    pub async fn visibility_regained(&self) -> Result<(), ControllerError> {
        debug!("queueing visibility regain");
        self.sender
            .send(ControllerEvent::VisibilityRegained)
            .await
            .map_err(|_| ControllerError::ControllerClosed)
    }

    /// Asks the controller's event loop to stop after processing everything
    /// queued before this call.
    pub async fn shutdown(&self) -> Result<(), ControllerError> {
        self.sender
            .send(ControllerEvent::Shutdown)
            .await
            .map_err(|_| ControllerError::ControllerClosed)
    }

    /// Snapshot of the current session phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase.borrow().clone()
    }

    /// A watch receiver over phase transitions, for consumers that render
    /// the session surface (sign-in prompt, loading indicator, error,
    /// content).
    pub fn phase_watch(&self) -> watch::Receiver<SessionPhase> {
        self.phase.clone()
    }
}
