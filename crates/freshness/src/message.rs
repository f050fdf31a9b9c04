//! # Controller Events
//!
//! This module defines the event type delivered to the controller's inbox.
//! External triggers (auth transitions, visibility regains) and internal
//! settlement reports from spawned load/refresh calls all arrive on the same
//! channel, so the controller processes them strictly sequentially.

use crate::error::CollectionError;
use crate::manager::Collection;
use crate::phase::Identity;

/// Everything the controller reacts to.
///
/// Settlement events carry the session generation that issued the call; the
/// controller compares it against the current generation and discards stale
/// reports, which is what makes a rapid sign-out/sign-in safe while calls
/// from the previous session are still outstanding.
#[derive(Debug)]
pub enum ControllerEvent {
    /// The auth observer reported the current identity (or its absence).
    AuthObserved(Option<Identity>),
    /// The hosting page transitioned back to foreground-visible.
    VisibilityRegained,
    /// One initial-load call settled.
    LoadSettled {
        generation: u64,
        collection: Collection,
        result: Result<(), CollectionError>,
    },
    /// One visibility-triggered refresh call settled.
    RefreshSettled {
        generation: u64,
        collection: Collection,
        result: Result<(), CollectionError>,
    },
    /// Stop the event loop. Needed because the controller holds a sender
    /// clone for settlement reports, so the channel never closes on its own.
    Shutdown,
}
