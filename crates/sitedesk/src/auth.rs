//! # Auth Gateway
//!
//! Stand-in for the cloud authentication provider: holds the current
//! authentication state in a watch channel and lets the rest of the app
//! subscribe to it through the [`AuthObserver`] seam. A real deployment
//! would replace this with a client for the actual identity service; the
//! subscription contract stays the same.

use freshness::{AuthObserver, Identity};
use tokio::sync::watch;
use tracing::info;

pub struct AuthGateway {
    state: watch::Sender<Option<Identity>>,
}

impl AuthGateway {
    /// Starts signed out.
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self { state }
    }

    pub fn sign_in(&self, identity: Identity) {
        info!(%identity, "signed in");
        self.state.send_replace(Some(identity));
    }

    pub fn sign_out(&self) {
        info!("signed out");
        self.state.send_replace(None);
    }

    /// The identity currently signed in, if any.
    pub fn current(&self) -> Option<Identity> {
        self.state.borrow().clone()
    }
}

impl Default for AuthGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthObserver for AuthGateway {
    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.state.subscribe()
    }
}
