//! Abstractions over concrete session client implementations.

use std::error::Error;
use std::fmt;

use lsp_types::{DocumentFormattingParams, TextEdit};
use thiserror::Error;

use crate::adapter::ServerLaunch;

/// Minimal set of capabilities the manager inspects after the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCapabilities {
    pub(crate) document_formatting: bool,
}

impl SessionCapabilities {
    /// Builds a capability set describing the server's advertised support.
    #[must_use]
    pub fn new(document_formatting: bool) -> Self {
        Self {
            document_formatting,
        }
    }

    /// Whether the server reports support for `textDocument/formatting`.
    #[must_use]
    pub fn supports_formatting(self) -> bool {
        self.document_formatting
    }
}

/// Errors reported by session client implementations.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SessionClientError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl SessionClientError {
    /// Builds an error without an underlying source.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Builds an error that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-friendly description without the optional source.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Whether the underlying failure is a dead server process.
    ///
    /// Walks the source chain looking for
    /// [`AdapterError::ProcessExited`](crate::adapter::AdapterError). The
    /// manager uses this to reconcile its cached state when the external
    /// process has exited behind its back.
    #[must_use]
    pub fn is_process_exited(&self) -> bool {
        fn chain_has_process_exited(error: &(dyn Error + 'static)) -> bool {
            if matches!(
                error.downcast_ref::<crate::adapter::AdapterError>(),
                Some(crate::adapter::AdapterError::ProcessExited)
            ) {
                return true;
            }
            error.source().is_some_and(chain_has_process_exited)
        }

        self.source
            .as_ref()
            .is_some_and(|source| chain_has_process_exited(source.as_ref()))
    }

    /// Whether the underlying failure happened while spawning the process.
    ///
    /// Walks the source chain looking for
    /// [`AdapterError::BinaryNotFound`](crate::adapter::AdapterError) or
    /// [`AdapterError::SpawnFailed`](crate::adapter::AdapterError). The
    /// manager uses this to tag the failing operation on a start attempt
    /// that never reached the handshake.
    #[must_use]
    pub fn is_spawn_failure(&self) -> bool {
        fn chain_has_spawn_failure(error: &(dyn Error + 'static)) -> bool {
            if matches!(
                error.downcast_ref::<crate::adapter::AdapterError>(),
                Some(
                    crate::adapter::AdapterError::BinaryNotFound { .. }
                        | crate::adapter::AdapterError::SpawnFailed { .. }
                )
            ) {
                return true;
            }
            error.source().is_some_and(chain_has_spawn_failure)
        }

        self.source
            .as_ref()
            .is_some_and(|source| chain_has_spawn_failure(source.as_ref()))
    }
}

/// Behaviour required from one live connection to an external server process.
///
/// A client owns exactly one process handle plus its request/response
/// channel. Implementations are created per start attempt and discarded on
/// stop; they are never restarted in place.
pub trait SessionClient: Send {
    /// Runs the startup handshake and returns the advertised capabilities.
    fn initialize(&mut self) -> Result<SessionCapabilities, SessionClientError>;

    /// Handles a `textDocument/formatting` request.
    fn format(
        &mut self,
        params: DocumentFormattingParams,
    ) -> Result<Vec<TextEdit>, SessionClientError>;

    /// Shuts the session down, best-effort.
    fn shutdown(&mut self) -> Result<(), SessionClientError>;
}

impl fmt::Debug for dyn SessionClient {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("SessionClient")
    }
}

/// Creates session clients for the manager.
///
/// The seam through which production code spawns real server processes and
/// tests inject recording fakes.
pub trait SessionClientFactory: Send {
    /// Builds a client for the supplied launch description.
    ///
    /// Creation itself must not spawn anything; the process comes to life in
    /// [`SessionClient::initialize`].
    fn create(&self, launch: &ServerLaunch) -> Box<dyn SessionClient>;
}

impl<F> SessionClientFactory for F
where
    F: Fn(&ServerLaunch) -> Box<dyn SessionClient> + Send,
{
    fn create(&self, launch: &ServerLaunch) -> Box<dyn SessionClient> {
        self(launch)
    }
}
