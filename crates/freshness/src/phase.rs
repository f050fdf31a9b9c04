//! # Session Phase & Identity
//!
//! The `SessionPhase` enum is the single piece of state a consumer needs to
//! render the right surface: a sign-in prompt, a loading indicator, a blocking
//! error with a retry affordance, or the actual content. The controller
//! publishes it through a `tokio::sync::watch` channel so any number of
//! consumers can observe transitions without polling.

use std::fmt;

/// Opaque reference to an authenticated user.
///
/// The controller never inspects the identity beyond presence/absence; it is
/// carried so that log lines and consumers can attribute a session to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(String);

impl Identity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the current session is in its initialization lifecycle.
///
/// # State machine
///
/// ```text
/// Unresolved --(identity observed)--> Resolving
/// Resolving  --(all three loads succeed)--> Ready
/// Resolving  --(any load fails)--> Failed
/// Ready | Failed | Resolving --(identity absent)--> Unresolved
/// ```
///
/// The phase only advances forward within one sign-in; a sign-out resets it
/// to `Unresolved` before a new `Resolving` can start. `Failed` is not
/// auto-retried: recovery is either a sign-out/sign-in cycle or a fresh
/// controller (a full reload, from the consumer's point of view).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No authenticated identity. Consumers render a sign-in prompt.
    #[default]
    Unresolved,
    /// Identity observed, initial load sequence in flight. Consumers render
    /// a loading indicator.
    Resolving,
    /// All collections loaded. Consumers render content.
    Ready,
    /// The initial load sequence failed; the reason is carried for display
    /// next to a manual-retry affordance.
    Failed(String),
}

impl SessionPhase {
    pub fn is_ready(&self) -> bool {
        matches!(self, SessionPhase::Ready)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Unresolved => write!(f, "unresolved"),
            SessionPhase::Resolving => write!(f, "resolving"),
            SessionPhase::Ready => write!(f, "ready"),
            SessionPhase::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}
