//! Error types surfaced by the session manager.

use std::fmt;

use thiserror::Error;

use crate::client::SessionClientError;

/// Operation being executed when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOperation {
    /// Server process spawn.
    Spawn,
    /// Server startup handshake.
    Handshake,
    /// `textDocument/formatting` handling.
    Formatting,
}

impl fmt::Display for SessionOperation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Spawn => "spawn",
            Self::Handshake => "handshake",
            Self::Formatting => "formatting",
        };
        formatter.write_str(label)
    }
}

/// Errors returned by [`crate::SessionManager`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// The settings snapshot cannot describe a launchable server.
    #[error("invalid language server settings: {source}")]
    InvalidSettings {
        /// Underlying validation failure.
        #[source]
        source: satysfi_config::SettingsError,
    },

    /// The underlying session client reported a failure.
    #[error("language server session failed during {operation}: {source}")]
    Client {
        /// Operation that failed.
        operation: SessionOperation,
        /// Underlying error.
        #[source]
        source: SessionClientError,
    },
}

impl SessionError {
    /// Wraps a settings validation failure.
    pub(crate) fn invalid_settings(source: satysfi_config::SettingsError) -> Self {
        Self::InvalidSettings { source }
    }

    /// Wraps an underlying client failure.
    pub(crate) fn client(operation: SessionOperation, source: SessionClientError) -> Self {
        Self::Client { operation, source }
    }
}
