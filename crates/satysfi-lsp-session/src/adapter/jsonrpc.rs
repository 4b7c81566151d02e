//! JSON-RPC 2.0 message types for the server channel.

use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Thread-safe request ID generator.
static REQUEST_ID: AtomicI64 = AtomicI64::new(1);

/// Generates a unique, monotonically increasing request ID.
#[must_use]
pub fn next_request_id() -> i64 {
    REQUEST_ID.fetch_add(1, Ordering::SeqCst)
}

/// A JSON-RPC 2.0 request message.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    /// Protocol version, always "2.0".
    pub jsonrpc: &'static str,
    /// Unique request identifier.
    pub id: i64,
    /// The method to invoke.
    pub method: String,
    /// Optional parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Creates a new request with an auto-generated ID.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id: next_request_id(),
            method: method.into(),
            params,
        }
    }

    /// Creates a new request with a specific ID.
    #[must_use]
    pub fn with_id(id: i64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: method.into(),
            params,
        }
    }
}

/// A JSON-RPC 2.0 notification (no response expected).
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcNotification {
    /// Protocol version, always "2.0".
    pub jsonrpc: &'static str,
    /// The method to invoke.
    pub method: String,
    /// Optional parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcNotification {
    /// Creates a new notification.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.into(),
            params,
        }
    }
}

/// A JSON-RPC 2.0 response message.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version.
    pub jsonrpc: String,
    /// Request identifier this response corresponds to.
    pub id: Option<i64>,
    /// The result on success.
    #[serde(default)]
    pub result: Option<Value>,
    /// The error on failure.
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i64,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional data.
    #[serde(default)]
    pub data: Option<Value>,
}

/// A request initiated by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcServerRequest {
    /// Request identifier the server expects an answer for.
    pub id: i64,
    /// The method the server invokes on the client.
    pub method: String,
    /// Optional parameters.
    #[serde(default)]
    pub params: Option<Value>,
}

/// Classification of an incoming message on the channel.
///
/// The channel interleaves responses with server-initiated traffic, so the
/// reader must inspect each payload before matching it to a pending request.
#[derive(Debug, Clone)]
pub enum JsonRpcMessage {
    /// A response to a client request.
    Response(JsonRpcResponse),
    /// A request the server expects the client to answer.
    ServerRequest(JsonRpcServerRequest),
    /// A notification with no expected reply.
    Notification(JsonRpcIncomingNotification),
}

/// An incoming notification as decoded off the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcIncomingNotification {
    /// The notification method.
    pub method: String,
    /// Optional parameters.
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcMessage {
    /// Decodes raw payload bytes into a classified message.
    ///
    /// # Errors
    ///
    /// Returns a codec error when the payload is not valid JSON or has no
    /// recognisable JSON-RPC shape.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(bytes)?;
        let has_method = value.get("method").is_some();
        let has_id = value.get("id").is_some();

        if has_method && has_id {
            return serde_json::from_value(value).map(Self::ServerRequest);
        }
        if has_method {
            return serde_json::from_value(value).map(Self::Notification);
        }
        serde_json::from_value(value).map(Self::Response)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    fn serialises_request_with_params() {
        let request = JsonRpcRequest::new(
            "textDocument/formatting",
            Some(json!({"textDocument": {"uri": "file:///doc.saty"}})),
        );
        let json = serde_json::to_string(&request).expect("serialization failed");

        assert!(json.contains(r#""jsonrpc":"2.0""#));
        assert!(json.contains(r#""method":"textDocument/formatting""#));
        assert!(json.contains(r#""id":"#));
        assert!(json.contains(r#""params""#));
    }

    #[rstest]
    fn serialises_request_without_params() {
        let request = JsonRpcRequest::with_id(42, "shutdown", None);
        let json = serde_json::to_string(&request).expect("serialization failed");

        assert!(json.contains(r#""id":42"#));
        assert!(json.contains(r#""method":"shutdown""#));
        assert!(!json.contains("params"));
    }

    #[rstest]
    fn serialises_notification_without_id() {
        let notification = JsonRpcNotification::new("initialized", Some(json!({})));
        let json = serde_json::to_string(&notification).expect("serialization failed");

        assert!(json.contains(r#""jsonrpc":"2.0""#));
        assert!(json.contains(r#""method":"initialized""#));
        assert!(!json.contains("id"));
    }

    #[rstest]
    fn deserialises_success_response() {
        let json = r#"{"jsonrpc":"2.0","id":1,"result":[]}"#;
        let response: JsonRpcResponse = serde_json::from_str(json).expect("parse failed");

        assert_eq!(response.jsonrpc, "2.0");
        assert_eq!(response.id, Some(1));
        assert!(response.result.is_some());
        assert!(response.error.is_none());
    }

    #[rstest]
    fn deserialises_error_response() {
        let json =
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32600,"message":"Invalid request"}}"#;
        let response: JsonRpcResponse = serde_json::from_str(json).expect("parse failed");

        assert_eq!(response.id, Some(1));
        assert!(response.result.is_none());

        let error = response.error.expect("error missing");
        assert_eq!(error.code, -32600);
        assert_eq!(error.message, "Invalid request");
    }

    #[rstest]
    #[case(r#"{"jsonrpc":"2.0","id":7,"result":null}"#)]
    #[case(r#"{"jsonrpc":"2.0","id":7,"error":{"code":1,"message":"x"}}"#)]
    fn classifies_responses(#[case] payload: &str) {
        let message = JsonRpcMessage::from_bytes(payload.as_bytes()).expect("decode failed");
        assert!(matches!(message, JsonRpcMessage::Response(_)));
    }

    #[rstest]
    fn classifies_server_request() {
        let payload = br#"{"jsonrpc":"2.0","id":3,"method":"window/workDoneProgress/create"}"#;
        let message = JsonRpcMessage::from_bytes(payload).expect("decode failed");

        match message {
            JsonRpcMessage::ServerRequest(request) => {
                assert_eq!(request.id, 3);
                assert_eq!(request.method, "window/workDoneProgress/create");
            }
            other => panic!("expected server request, got {other:?}"),
        }
    }

    #[rstest]
    fn classifies_notification() {
        let payload = br#"{"jsonrpc":"2.0","method":"textDocument/publishDiagnostics","params":{}}"#;
        let message = JsonRpcMessage::from_bytes(payload).expect("decode failed");

        match message {
            JsonRpcMessage::Notification(notification) => {
                assert_eq!(notification.method, "textDocument/publishDiagnostics");
            }
            other => panic!("expected notification, got {other:?}"),
        }
    }

    #[rstest]
    fn request_ids_increase_monotonically() {
        // Other tests allocate ids concurrently, so only relative order is
        // guaranteed here.
        let id1 = next_request_id();
        let id2 = next_request_id();
        let id3 = next_request_id();

        assert!(id1 < id2);
        assert!(id2 < id3);
    }
}
