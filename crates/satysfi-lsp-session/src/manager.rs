//! Session manager owning the language server lifecycle.

use lsp_types::{DocumentFormattingParams, TextEdit};
use satysfi_config::LanguageServerSettings;
use tracing::{debug, warn};

use crate::adapter::ServerLaunch;
use crate::client::{SessionCapabilities, SessionClient, SessionClientFactory};
use crate::errors::{SessionError, SessionOperation};
use crate::state::SessionState;
use crate::subscription::Subscription;

/// Language identifier the host registers the formatting provider for.
pub const LANGUAGE_ID: &str = "satysfi";

/// Document scheme the formatting provider is scoped to; in-memory buffers
/// without a backing file are not offered to the server.
pub const DOCUMENT_SCHEME: &str = "file";

/// Log target for manager operations.
const MANAGER_TARGET: &str = "satysfi_lsp_session::manager";

/// Keeps at most one running session consistent with the host settings and
/// proxies formatting requests to it.
///
/// The manager exclusively owns the session client; other components observe
/// it only through [`format`](Self::format) and [`restart`](Self::restart).
/// The cached settings always equal the snapshot under which the current
/// client, if any, was started.
pub struct SessionManager {
    factory: Box<dyn SessionClientFactory>,
    client: Option<Box<dyn SessionClient>>,
    capabilities: Option<SessionCapabilities>,
    settings: LanguageServerSettings,
    state: SessionState,
    subscriptions: Vec<Subscription>,
}

impl SessionManager {
    /// Builds a manager that creates clients through the supplied factory.
    ///
    /// No session is started until [`initialize`](Self::initialize) runs.
    #[must_use]
    pub fn new(factory: Box<dyn SessionClientFactory>) -> Self {
        Self {
            factory,
            client: None,
            capabilities: None,
            settings: LanguageServerSettings::default(),
            state: SessionState::Stopped,
            subscriptions: Vec::new(),
        }
    }

    /// Applies the startup settings snapshot and starts a session if enabled.
    ///
    /// Spawn and handshake failures are logged and leave the manager
    /// `Stopped`; they never crash the host.
    pub fn initialize(&mut self, settings: LanguageServerSettings) {
        self.settings = settings;
        if self.settings.enabled {
            self.start_session_logged();
        }
    }

    /// Reconciles the session with a fresh settings snapshot.
    ///
    /// Two checks run unconditionally and in order: a path change while an
    /// enabled session is running restarts it under the new path, and an
    /// `enabled` flip starts or stops the session. A snapshot that changes
    /// both is honoured by both checks; an unchanged snapshot is a no-op.
    pub fn handle_settings_change(&mut self, new: LanguageServerSettings) {
        if new.path != self.settings.path
            && self.settings.enabled
            && self.client.is_some()
        {
            self.stop_session();
            self.settings.path = new.path.clone();
            self.start_session_logged();
        } else {
            self.settings.path = new.path.clone();
        }

        if new.enabled != self.settings.enabled {
            if new.enabled {
                self.settings.enabled = true;
                self.start_session_logged();
            } else {
                self.settings.enabled = false;
                self.stop_session();
            }
        }
    }

    /// Stops and starts the session unconditionally.
    ///
    /// This is the host's manual recovery command, so it runs even while the
    /// cached settings have the server disabled; the cached `enabled` flag
    /// is left untouched for the next reconciliation.
    ///
    /// # Errors
    ///
    /// Returns the validation, spawn, or handshake failure of the fresh
    /// start attempt.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.stop_session();
        self.start_session()
    }

    /// Forwards a `textDocument/formatting` request to the session.
    ///
    /// Returns an empty edit list when no session is running or the server
    /// does not advertise formatting support; unavailable formatting is not
    /// an error state. Protocol failures are propagated to this caller only.
    /// A dead server process additionally reconciles the manager to
    /// `Stopped`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Client`] when the running session fails the
    /// request.
    pub fn format(
        &mut self,
        params: DocumentFormattingParams,
    ) -> Result<Vec<TextEdit>, SessionError> {
        let Some(client) = self.client.as_mut() else {
            return Ok(Vec::new());
        };

        if let Some(capabilities) = self.capabilities
            && !capabilities.supports_formatting()
        {
            debug!(
                target: MANAGER_TARGET,
                "server does not advertise formatting support, returning no edits"
            );
            return Ok(Vec::new());
        }

        match client.format(params) {
            Ok(edits) => Ok(edits),
            Err(error) => {
                if error.is_process_exited() {
                    warn!(
                        target: MANAGER_TARGET,
                        "server process is gone, reconciling session state"
                    );
                    self.discard_session();
                }
                Err(SessionError::client(SessionOperation::Formatting, error))
            }
        }
    }

    /// Hands the manager a host-event subscription to release on disposal.
    pub fn track_subscription(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    /// Stops the session best-effort and releases all tracked subscriptions.
    ///
    /// Safe to call with no active session, and idempotent.
    pub fn dispose(&mut self) {
        self.stop_session();
        for subscription in self.subscriptions.drain(..) {
            subscription.dispose();
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The settings snapshot the current session, if any, was started with.
    #[must_use]
    pub fn settings(&self) -> &LanguageServerSettings {
        &self.settings
    }

    /// Starts a session, logging instead of propagating failures.
    ///
    /// Used on the host-event paths where an error would otherwise bubble
    /// into the host loop as a crash.
    fn start_session_logged(&mut self) {
        if let Err(error) = self.start_session() {
            warn!(
                target: MANAGER_TARGET,
                path = %self.settings.path,
                error = %error,
                "language server failed to start"
            );
        }
    }

    fn start_session(&mut self) -> Result<(), SessionError> {
        self.settings
            .validate()
            .map_err(SessionError::invalid_settings)?;

        let launch = ServerLaunch::from_path(&self.settings.path);
        let mut client = self.factory.create(&launch);

        self.state = SessionState::Starting;
        match client.initialize() {
            Ok(capabilities) => {
                debug!(
                    target: MANAGER_TARGET,
                    path = %self.settings.path,
                    formatting = capabilities.supports_formatting(),
                    "language server started"
                );
                self.client = Some(client);
                self.capabilities = Some(capabilities);
                self.state = SessionState::Running;
                Ok(())
            }
            Err(error) => {
                let operation = if error.is_spawn_failure() {
                    SessionOperation::Spawn
                } else {
                    SessionOperation::Handshake
                };
                // No automatic retry; recovery is the restart command.
                self.state = SessionState::Stopped;
                Err(SessionError::client(operation, error))
            }
        }
    }

    fn stop_session(&mut self) {
        if let Some(mut client) = self.client.take() {
            if let Err(error) = client.shutdown() {
                warn!(
                    target: MANAGER_TARGET,
                    error = %error,
                    "language server shutdown failed"
                );
            }
            debug!(target: MANAGER_TARGET, "language server stopped");
        }
        self.capabilities = None;
        self.state = SessionState::Stopped;
    }

    /// Drops the client without a shutdown exchange; the process is gone.
    fn discard_session(&mut self) {
        self.client = None;
        self.capabilities = None;
        self.state = SessionState::Stopped;
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("state", &self.state)
            .field("settings", &self.settings)
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}
