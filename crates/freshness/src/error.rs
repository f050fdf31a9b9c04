//! # Error Types
//!
//! This module defines the two error families used throughout the crate.
//! By centralizing error definitions, we ensure consistent error handling
//! across the controller, the collection managers, and the mock collaborators.

/// Errors reported by a remote collection operation.
///
/// The controller never branches on the subtype — only on which phase of the
/// session the failure occurred in. During the initial load sequence a failure
/// is blocking; during a visibility-triggered refresh it is logged and the
/// previously loaded (stale) data keeps being served.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CollectionError {
    /// The remote service could not be reached at all (network down, DNS,
    /// service outage).
    #[error("remote unavailable: {0}")]
    RemoteUnavailable(String),
    /// The remote service was reachable but rejected the request
    /// (permissions, malformed data, quota).
    #[error("remote error: {0}")]
    RemoteError(String),
}

/// Errors that can occur when talking to the controller task itself.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// The controller's event loop has stopped and its channel is closed.
    #[error("controller closed")]
    ControllerClosed,
}
