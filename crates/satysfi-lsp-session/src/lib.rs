//! SATySFi language server session lifecycle.
//!
//! The crate keeps at most one running language server session consistent
//! with the host settings snapshot and proxies document-formatting requests
//! to it. Server-specific details sit behind the [`SessionClient`] trait so
//! tests and embedders can inject lightweight implementations without
//! spawning a real `satysfi-language-server` process; the [`adapter`] module
//! provides the production implementation speaking JSON-RPC 2.0 over the
//! child's stdio.

pub mod adapter;
mod client;
mod errors;
mod manager;
mod state;
mod subscription;

#[cfg(test)]
mod tests;

pub use client::{
    SessionCapabilities, SessionClient, SessionClientError, SessionClientFactory,
};
pub use errors::{SessionError, SessionOperation};
pub use manager::{DOCUMENT_SCHEME, LANGUAGE_ID, SessionManager};
pub use state::SessionState;
pub use subscription::Subscription;
