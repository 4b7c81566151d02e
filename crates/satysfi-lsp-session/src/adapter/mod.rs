//! Process-based session client.
//!
//! Spawns the configured `satysfi-language-server` executable and talks to
//! it via JSON-RPC 2.0 over stdio with LSP header framing. The
//! [`ProcessSessionClient`] struct implements the
//! [`SessionClient`](crate::SessionClient) trait, so the manager drives it
//! through the same seam tests use for fakes.
//!
//! Components:
//!
//! - [`ServerLaunch`]: how to start the server executable, with the `run`
//!   and `debug` transport modes both resolving to the configured path
//! - [`AdapterError`] and [`TransportError`]: failure kinds per layer
//! - [`JsonRpcRequest`], [`JsonRpcResponse`]: JSON-RPC 2.0 message codec
//! - [`StdioTransport`]: LSP header-framed stdio transport
//! - [`ProcessSessionClient`]: the client implementation

mod config;
mod error;
mod jsonrpc;
mod lifecycle;
mod process;
mod state;
mod trait_impl;
mod transport;

pub use config::{LaunchCommand, LaunchMode, ServerLaunch};
pub use error::{AdapterError, TransportError};
pub use jsonrpc::{
    JsonRpcError, JsonRpcIncomingNotification, JsonRpcMessage, JsonRpcNotification,
    JsonRpcRequest, JsonRpcResponse, JsonRpcServerRequest,
};
pub use process::ProcessSessionClient;
pub use state::ProcessState;
pub use transport::StdioTransport;
