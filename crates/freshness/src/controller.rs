//! # Freshness Controller
//!
//! This module defines the `FreshnessController`, the component that gates
//! all collection access behind authentication and decides when each
//! collection is loaded or refreshed. It is the "server" half of the pair;
//! the cheap-to-clone [`ControllerHandle`](crate::handle::ControllerHandle)
//! is the interface half.
//!
//! # Concurrency Model
//! The controller runs as a single Tokio task and processes its events
//! strictly sequentially. All mutable state (the session phase, the
//! generation counter, the per-collection load/refresh flags) lives inside
//! the task, so no locks are needed and every check-then-set on the refresh
//! flags happens between suspension points. The manager calls themselves run
//! as spawned tasks that report back through the same event channel, tagged
//! with the generation that issued them.
//!
//! # Session Generations
//! Every sign-in and sign-out bumps a generation counter. A settlement report
//! whose generation does not match the current one belongs to a session that
//! no longer exists and is discarded. Without this, a rapid
//! sign-out/sign-in could let a call issued for the previous user mutate the
//! new session's state.

use crate::error::CollectionError;
use crate::handle::ControllerHandle;
use crate::manager::{Collection, CollectionLoadState, CollectionManager};
use crate::message::ControllerEvent;
use crate::phase::{Identity, SessionPhase};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Owns the freshness lifecycle of the three managed collections.
///
/// # Usage Pattern
///
/// 1. **Create**: [`FreshnessController::new`] returns the controller and a
///    [`ControllerHandle`](crate::handle::ControllerHandle).
/// 2. **Run**: spawn `controller.run()` on the runtime.
/// 3. **Drive**: feed it auth transitions and visibility regains through the
///    handle (usually via an [`AuthBridge`](crate::auth::AuthBridge) and
///    whatever visibility source the host environment provides).
/// 4. **Observe**: render the published [`SessionPhase`] from the handle's
///    watch channel.
pub struct FreshnessController {
    receiver: mpsc::Receiver<ControllerEvent>,
    /// Loopback sender handed to spawned load/refresh tasks for their
    /// settlement reports.
    sender: mpsc::Sender<ControllerEvent>,
    managers: [Arc<dyn CollectionManager>; 3],
    phase: watch::Sender<SessionPhase>,
    /// Bumped on every sign-in and sign-out; tags in-flight calls.
    generation: u64,
    load_states: [CollectionLoadState; 3],
    /// Initial-load calls still unsettled in the current generation.
    pending_loads: usize,
}

impl FreshnessController {
    /// Creates a controller for the given managers and its handle.
    ///
    /// `buffer_size` is the capacity of the event channel; triggers block
    /// (asynchronously) while it is full.
    pub fn new(
        users: Arc<dyn CollectionManager>,
        companies: Arc<dyn CollectionManager>,
        projects: Arc<dyn CollectionManager>,
        buffer_size: usize,
    ) -> (Self, ControllerHandle) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (phase, phase_rx) = watch::channel(SessionPhase::Unresolved);
        let controller = Self {
            receiver,
            sender: sender.clone(),
            managers: [users, companies, projects],
            phase,
            generation: 0,
            load_states: [CollectionLoadState::default(); 3],
            pending_loads: 0,
        };
        let handle = ControllerHandle::new(sender, phase_rx);
        (controller, handle)
    }

    /// Runs the event loop until a `Shutdown` event arrives.
    pub async fn run(mut self) {
        info!("freshness controller started");

        while let Some(event) = self.receiver.recv().await {
            match event {
                ControllerEvent::AuthObserved(identity) => self.on_auth_observed(identity),
                ControllerEvent::VisibilityRegained => self.on_visibility_regained(),
                ControllerEvent::LoadSettled {
                    generation,
                    collection,
                    result,
                } => self.on_load_settled(generation, collection, result),
                ControllerEvent::RefreshSettled {
                    generation,
                    collection,
                    result,
                } => self.on_refresh_settled(generation, collection, result),
                ControllerEvent::Shutdown => break,
            }
        }

        info!("freshness controller stopped");
    }

    fn current_phase(&self) -> SessionPhase {
        self.phase.borrow().clone()
    }

    fn set_phase(&self, next: SessionPhase) {
        let current = self.current_phase();
        if current != next {
            info!(from = %current, to = %next, "session phase transition");
        }
        self.phase.send_replace(next);
    }

    fn on_auth_observed(&mut self, identity: Option<Identity>) {
        match identity {
            None => {
                // Invalidate every outstanding call from this session before
                // resetting; their settlements will arrive with a stale
                // generation and be discarded.
                self.generation = self.generation.wrapping_add(1);
                self.pending_loads = 0;
                self.load_states = [CollectionLoadState::default(); 3];
                self.set_phase(SessionPhase::Unresolved);
            }
            Some(identity) => {
                if !matches!(*self.phase.borrow(), SessionPhase::Unresolved) {
                    // Re-observing a signed-in identity must not re-trigger
                    // loads, and Failed is only left via sign-out or reload.
                    debug!(%identity, phase = %self.current_phase(), "identity re-observed, no new load sequence");
                    return;
                }
                self.generation = self.generation.wrapping_add(1);
                self.pending_loads = Collection::ALL.len();
                info!(%identity, generation = self.generation, "identity observed, starting initial load");
                self.set_phase(SessionPhase::Resolving);
                for collection in Collection::ALL {
                    self.spawn_load(collection);
                }
            }
        }
    }

    fn spawn_load(&self, collection: Collection) {
        let manager = Arc::clone(&self.managers[collection.index()]);
        let sender = self.sender.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = manager.ensure_loaded().await;
            let _ = sender
                .send(ControllerEvent::LoadSettled {
                    generation,
                    collection,
                    result,
                })
                .await;
        });
    }

    fn on_load_settled(
        &mut self,
        generation: u64,
        collection: Collection,
        result: Result<(), CollectionError>,
    ) {
        if generation != self.generation {
            debug!(%collection, generation, "discarding load settlement from stale generation");
            return;
        }
        if !matches!(*self.phase.borrow(), SessionPhase::Resolving) {
            // A sibling load already failed; late successes are discarded so
            // Failed wins regardless of settlement order.
            debug!(%collection, phase = %self.current_phase(), "discarding load settlement outside resolving");
            return;
        }
        match result {
            Ok(()) => {
                self.load_states[collection.index()].has_loaded_once = true;
                self.pending_loads -= 1;
                debug!(%collection, remaining = self.pending_loads, "initial load settled");
                if self.pending_loads == 0 {
                    self.set_phase(SessionPhase::Ready);
                }
            }
            Err(error) => {
                warn!(%collection, %error, "initial load failed");
                self.set_phase(SessionPhase::Failed(error.to_string()));
            }
        }
    }

    fn on_visibility_regained(&mut self) {
        if !matches!(*self.phase.borrow(), SessionPhase::Ready) {
            debug!(phase = %self.current_phase(), "visibility regained before ready, ignoring");
            return;
        }
        for collection in Collection::ALL {
            let state = &mut self.load_states[collection.index()];
            // Ready implies the whole initial load sequence settled.
            debug_assert!(state.has_loaded_once);
            if state.is_refreshing {
                // Lossy by design. The next visibility regain will try again,
                // so dropped triggers are never queued.
                debug!(%collection, "refresh already in flight, dropping trigger");
                continue;
            }
            state.is_refreshing = true;
            self.spawn_refresh(collection);
        }
    }

    fn spawn_refresh(&self, collection: Collection) {
        let manager = Arc::clone(&self.managers[collection.index()]);
        let sender = self.sender.clone();
        let generation = self.generation;
        debug!(%collection, "refreshing from remote");
        tokio::spawn(async move {
            let result = manager.refresh_from_remote().await;
            let _ = sender
                .send(ControllerEvent::RefreshSettled {
                    generation,
                    collection,
                    result,
                })
                .await;
        });
    }

    fn on_refresh_settled(
        &mut self,
        generation: u64,
        collection: Collection,
        result: Result<(), CollectionError>,
    ) {
        if generation != self.generation {
            // The flags were already reset by the sign-out that made this
            // settlement stale.
            debug!(%collection, generation, "discarding refresh settlement from stale generation");
            return;
        }
        self.load_states[collection.index()].is_refreshing = false;
        match result {
            Ok(()) => debug!(%collection, "refresh settled"),
            // A refresh failure never moves the phase off Ready: serving
            // stale data beats a blocking error after first load succeeded.
            Err(error) => warn!(%collection, %error, "refresh failed, serving stale data"),
        }
    }
}
