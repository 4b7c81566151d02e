//! Session lifecycle states observed by the host.

use std::fmt;

/// Lifecycle of the managed session.
///
/// `Starting` is only ever observed mid-operation: every manager call
/// returns with the state settled on `Stopped` or `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session is active.
    Stopped,
    /// A start attempt is in flight; the handshake has not completed.
    Starting,
    /// The handshake succeeded and the session accepts requests.
    Running,
}

impl SessionState {
    /// Returns the lower-case identifier used in log fields.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Running => "running",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
