//! Internal state of the spawned server process.

use std::process::Child;

use super::transport::StdioTransport;

/// Where the server process is in its life.
pub enum ProcessState {
    /// Process has not been started.
    NotStarted,
    /// Process is running and ready for communication.
    Running {
        /// The child process handle.
        child: Child,
        /// The transport for JSON-RPC communication.
        transport: StdioTransport,
    },
    /// Process has been stopped.
    Stopped,
}
