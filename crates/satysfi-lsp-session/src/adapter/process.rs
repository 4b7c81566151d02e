//! Process-backed session client plumbing.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;
use tracing::{debug, warn};

use super::config::{LaunchMode, ServerLaunch};
use super::error::AdapterError;
use super::jsonrpc::{JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse};
use super::lifecycle::{ADAPTER_TARGET, terminate_child};
use super::state::ProcessState;
use super::transport::StdioTransport;

/// Maximum number of interleaved messages consumed while waiting for a
/// matching response.
const MAX_RESPONSE_ITERATIONS: usize = 100;

/// A session client that spawns and talks to an external server process.
///
/// Implements [`SessionClient`](crate::SessionClient) by spawning a child
/// process and exchanging JSON-RPC 2.0 messages over stdin/stdout with LSP
/// header framing. The child comes to life during the handshake, not at
/// construction.
pub struct ProcessSessionClient {
    launch: ServerLaunch,
    mode: LaunchMode,
    state: Mutex<ProcessState>,
}

impl ProcessSessionClient {
    /// Creates a client for the given launch description in run mode.
    #[must_use]
    pub fn new(launch: ServerLaunch) -> Self {
        Self::with_mode(launch, LaunchMode::Run)
    }

    /// Creates a client using the requested transport mode.
    #[must_use]
    pub fn with_mode(launch: ServerLaunch, mode: LaunchMode) -> Self {
        Self {
            launch,
            mode,
            state: Mutex::new(ProcessState::NotStarted),
        }
    }

    /// Spawns the server process and wires up its stdio transport.
    pub(super) fn spawn_process(&self) -> Result<(Child, StdioTransport), AdapterError> {
        let launch_command = self.launch.command_for(self.mode);
        debug!(
            target: ADAPTER_TARGET,
            command = %launch_command.command.display(),
            args = ?launch_command.args,
            "spawning language server process"
        );

        let mut command = Command::new(&launch_command.command);
        command
            .args(&launch_command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        if let Some(dir) = &self.launch.working_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AdapterError::BinaryNotFound {
                    command: launch_command.command.display().to_string(),
                    source: e,
                }
            } else {
                AdapterError::SpawnFailed {
                    message: format!("failed to start {}", launch_command.command.display()),
                    source: e,
                }
            }
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| AdapterError::SpawnFailed {
                message: "failed to capture stdin".to_string(),
                source: std::io::Error::other("no stdin"),
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AdapterError::SpawnFailed {
                message: "failed to capture stdout".to_string(),
                source: std::io::Error::other("no stdout"),
            })?;

        let transport = StdioTransport::new(stdout, stdin);

        debug!(
            target: ADAPTER_TARGET,
            pid = child.id(),
            "language server process spawned"
        );

        Ok((child, transport))
    }

    /// Accesses the running transport with the state lock held.
    pub(super) fn with_running_transport<F, T>(&self, f: F) -> Result<T, AdapterError>
    where
        F: FnOnce(&mut StdioTransport) -> Result<T, AdapterError>,
    {
        // Recover from poisoning so shutdown still works after a panic
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());

        let transport = match &mut *state {
            ProcessState::Running { transport, .. } => transport,
            ProcessState::NotStarted | ProcessState::Stopped => {
                return Err(AdapterError::ProcessExited);
            }
        };

        f(transport)
    }

    /// Receives messages until a response with the given ID arrives.
    ///
    /// The channel interleaves notifications, server-initiated requests, and
    /// responses; everything but the matching response is skipped. The loop
    /// is bounded so a chatty server cannot spin the reader forever.
    pub(super) fn receive_response_for_request(
        transport: &mut StdioTransport,
        request_id: i64,
    ) -> Result<JsonRpcResponse, AdapterError> {
        for _ in 0..MAX_RESPONSE_ITERATIONS {
            let message_bytes = transport.receive()?;

            match JsonRpcMessage::from_bytes(&message_bytes)? {
                JsonRpcMessage::Response(resp) => {
                    if resp.id == Some(request_id) {
                        return Ok(resp);
                    }
                    warn!(
                        target: ADAPTER_TARGET,
                        expected = request_id,
                        received = ?resp.id,
                        "skipping response with non-matching ID"
                    );
                }
                JsonRpcMessage::ServerRequest(req) => {
                    warn!(
                        target: ADAPTER_TARGET,
                        method = %req.method,
                        id = req.id,
                        "ignoring server-initiated request"
                    );
                }
                JsonRpcMessage::Notification(notif) => {
                    debug!(
                        target: ADAPTER_TARGET,
                        method = %notif.method,
                        "skipping server notification"
                    );
                }
            }
        }

        warn!(
            target: ADAPTER_TARGET,
            request_id,
            max_iterations = MAX_RESPONSE_ITERATIONS,
            "giving up on response after reaching maximum iterations"
        );
        Err(AdapterError::MaxResponseIterations { request_id })
    }

    /// Sends a request and receives the raw JSON-RPC response.
    pub(super) fn send_request_raw<P>(
        &self,
        method: &str,
        params: P,
    ) -> Result<JsonRpcResponse, AdapterError>
    where
        P: Serialize,
    {
        self.with_running_transport(|transport| {
            let params_value = serde_json::to_value(params)?;
            let request = JsonRpcRequest::new(method, Some(params_value));
            let request_id = request.id;
            let payload = serde_json::to_vec(&request)?;

            debug!(
                target: ADAPTER_TARGET,
                method = method,
                id = request_id,
                "sending request"
            );

            transport.send(&payload)?;
            let response = Self::receive_response_for_request(transport, request_id)?;

            if let Some(error) = response.error {
                return Err(AdapterError::from_jsonrpc(error));
            }

            Ok(response)
        })
    }

    /// Sends a request and deserializes a mandatory result.
    pub(super) fn send_request<P, R>(&self, method: &str, params: P) -> Result<R, AdapterError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let response = self.send_request_raw(method, params)?;
        let result = response
            .result
            .ok_or_else(|| AdapterError::HandshakeFailed {
                message: "empty result in response".to_string(),
            })?;
        serde_json::from_value(result).map_err(AdapterError::from)
    }

    /// Sends a request that may return null as a valid response.
    pub(super) fn send_request_optional<P, R>(
        &self,
        method: &str,
        params: P,
    ) -> Result<Option<R>, AdapterError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let response = self.send_request_raw(method, params)?;
        match response.result {
            Some(Value::Null) | None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    /// Sends a notification (no response expected).
    pub(super) fn send_notification<P>(&self, method: &str, params: P) -> Result<(), AdapterError>
    where
        P: Serialize,
    {
        self.with_running_transport(|transport| {
            let params_value = serde_json::to_value(params)?;
            let notification = JsonRpcNotification::new(method, Some(params_value));
            let payload = serde_json::to_vec(&notification)?;

            debug!(target: ADAPTER_TARGET, method = method, "sending notification");

            transport.send(&payload)?;
            Ok(())
        })
    }

    /// Marks the process as running with the given child and transport.
    pub(super) fn set_running_state(&self, child: Child, transport: StdioTransport) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());

        *state = ProcessState::Running { child, transport };
    }

    /// Writes a request without waiting for the server's reply.
    ///
    /// Used during teardown, where a wedged server must not be able to
    /// stall the caller on a blocked read.
    fn send_request_no_wait<P>(&self, method: &str, params: P) -> Result<(), AdapterError>
    where
        P: Serialize,
    {
        self.with_running_transport(|transport| {
            let params_value = serde_json::to_value(params)?;
            let request = JsonRpcRequest::new(method, Some(params_value));
            let payload = serde_json::to_vec(&request)?;

            debug!(
                target: ADAPTER_TARGET,
                method = method,
                id = request.id,
                "sending request without awaiting a reply"
            );

            transport.send(&payload)?;
            Ok(())
        })
    }

    /// Performs graceful shutdown of the language server.
    ///
    /// Sends a `shutdown` request followed by an `exit` notification, then
    /// terminates the child with a short grace period. Neither message
    /// waits for a reply, so a hung server cannot stall teardown. Failures
    /// along the way are logged rather than propagated; the process is torn
    /// down regardless.
    pub fn stop(&self) {
        debug!(target: ADAPTER_TARGET, "initiating graceful shutdown");

        if let Err(e) = self.send_request_no_wait("shutdown", ()) {
            debug!(
                target: ADAPTER_TARGET,
                operation = "shutdown",
                error = ?e,
                "shutdown request failed"
            );
        }

        if let Err(e) = self.send_notification("exit", ()) {
            debug!(
                target: ADAPTER_TARGET,
                operation = "exit",
                error = ?e,
                "exit notification failed"
            );
        }

        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());

        if let ProcessState::Running { mut child, .. } =
            std::mem::replace(&mut *state, ProcessState::Stopped)
        {
            terminate_child(&mut child);
        }
    }
}

impl Drop for ProcessSessionClient {
    fn drop(&mut self) {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poison) => poison.into_inner(),
        };

        if let ProcessState::Running { mut child, .. } =
            std::mem::replace(&mut *state, ProcessState::Stopped)
        {
            if let Err(e) = child.kill() {
                warn!(
                    target: ADAPTER_TARGET,
                    error = %e,
                    "failed to kill language server process on drop"
                );
            } else {
                let _ = child.wait();
            }
        }
    }
}

impl std::fmt::Debug for ProcessSessionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state_desc = match self.state.lock() {
            Ok(guard) => match &*guard {
                ProcessState::NotStarted => "not_started",
                ProcessState::Running { child, .. } => {
                    return f
                        .debug_struct("ProcessSessionClient")
                        .field("mode", &self.mode)
                        .field("state", &format!("running (pid: {})", child.id()))
                        .finish();
                }
                ProcessState::Stopped => "stopped",
            },
            Err(_) => "poisoned",
        };

        f.debug_struct("ProcessSessionClient")
            .field("mode", &self.mode)
            .field("state", &state_desc)
            .finish()
    }
}
