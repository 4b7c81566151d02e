//! Recording session client and factory used in tests.

use std::sync::{Arc, Mutex};

use camino::Utf8PathBuf;
use lsp_types::{DocumentFormattingParams, TextEdit};

use crate::adapter::{AdapterError, LaunchMode, ServerLaunch};
use crate::client::{
    SessionCapabilities, SessionClient, SessionClientError, SessionClientFactory,
};

/// One observable interaction with the factory or a client it created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// The factory created a client for the given server path.
    Created(Utf8PathBuf),
    /// A client ran the startup handshake.
    Initialized(Utf8PathBuf),
    /// A client handled a formatting request.
    Formatted(Utf8PathBuf),
    /// A client was shut down.
    Shutdown(Utf8PathBuf),
}

/// Failure a scripted client raises on formatting requests.
#[derive(Debug, Clone)]
pub enum FormatFailure {
    /// Protocol-level failure (malformed or rejected response).
    Protocol(String),
    /// The server process died behind the manager's back.
    ProcessExited,
}

/// Canned behaviour shared by every client the factory creates.
#[derive(Debug, Clone)]
pub struct ScriptedBehaviour {
    /// Server paths whose handshake fails.
    pub fail_handshake_for: Vec<Utf8PathBuf>,
    /// Whether the handshake advertises formatting support.
    pub advertise_formatting: bool,
    /// Edits returned for formatting requests.
    pub format_edits: Vec<TextEdit>,
    /// Failure raised instead of returning edits, when set.
    pub format_failure: Option<FormatFailure>,
}

impl Default for ScriptedBehaviour {
    fn default() -> Self {
        Self {
            fail_handshake_for: Vec::new(),
            advertise_formatting: true,
            format_edits: Vec::new(),
            format_failure: None,
        }
    }
}

/// Factory double that records every interaction.
pub struct RecordingClientFactory {
    shared: Arc<Mutex<FactoryState>>,
}

impl RecordingClientFactory {
    /// Creates a factory serving the supplied script.
    pub fn new(script: ScriptedBehaviour) -> Self {
        Self {
            shared: Arc::new(Mutex::new(FactoryState {
                script,
                events: Vec::new(),
            })),
        }
    }

    /// Returns a handle that can be used to assert recorded events.
    pub fn handle(&self) -> RecordingFactoryHandle {
        RecordingFactoryHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl SessionClientFactory for RecordingClientFactory {
    fn create(&self, launch: &ServerLaunch) -> Box<dyn SessionClient> {
        let command = &launch.command_for(LaunchMode::Run).command;
        let path = Utf8PathBuf::from_path_buf(command.clone())
            .unwrap_or_else(|path| panic!("non-UTF-8 test path: {}", path.display()));

        with_state(&self.shared, |state| {
            state.events.push(ClientEvent::Created(path.clone()));
        });

        Box::new(RecordingSessionClient {
            path,
            shared: Arc::clone(&self.shared),
        })
    }
}

/// Handle that exposes recorded events for assertions.
#[derive(Clone)]
pub struct RecordingFactoryHandle {
    shared: Arc<Mutex<FactoryState>>,
}

impl RecordingFactoryHandle {
    /// Returns the ordered list of observed events.
    pub fn events(&self) -> Vec<ClientEvent> {
        with_state(&self.shared, |state| state.events.clone())
    }

    /// Forgets events recorded so far.
    pub fn clear(&self) {
        with_state(&self.shared, |state| state.events.clear());
    }

    /// Rewrites the script served to clients created from now on.
    ///
    /// Existing clients see the new script too; they read it per call.
    pub fn set_script(&self, script: ScriptedBehaviour) {
        with_state(&self.shared, |state| state.script = script);
    }
}

struct RecordingSessionClient {
    path: Utf8PathBuf,
    shared: Arc<Mutex<FactoryState>>,
}

impl SessionClient for RecordingSessionClient {
    fn initialize(&mut self) -> Result<SessionCapabilities, SessionClientError> {
        with_state(&self.shared, |state| {
            state
                .events
                .push(ClientEvent::Initialized(self.path.clone()));
            if state.script.fail_handshake_for.contains(&self.path) {
                return Err(SessionClientError::new(format!(
                    "handshake refused for {}",
                    self.path
                )));
            }
            Ok(SessionCapabilities::new(state.script.advertise_formatting))
        })
    }

    fn format(
        &mut self,
        _params: DocumentFormattingParams,
    ) -> Result<Vec<TextEdit>, SessionClientError> {
        with_state(&self.shared, |state| {
            state.events.push(ClientEvent::Formatted(self.path.clone()));
            match &state.script.format_failure {
                Some(FormatFailure::Protocol(message)) => {
                    Err(SessionClientError::new(message.clone()))
                }
                Some(FormatFailure::ProcessExited) => Err(SessionClientError::with_source(
                    "formatting request failed",
                    AdapterError::ProcessExited,
                )),
                None => Ok(state.script.format_edits.clone()),
            }
        })
    }

    fn shutdown(&mut self) -> Result<(), SessionClientError> {
        with_state(&self.shared, |state| {
            state.events.push(ClientEvent::Shutdown(self.path.clone()));
            Ok(())
        })
    }
}

struct FactoryState {
    script: ScriptedBehaviour,
    events: Vec<ClientEvent>,
}

fn with_state<R, F>(shared: &Arc<Mutex<FactoryState>>, action: F) -> R
where
    F: FnOnce(&mut FactoryState) -> R,
{
    let mut guard = shared.lock().unwrap_or_else(|poison| poison.into_inner());
    action(&mut guard)
}
