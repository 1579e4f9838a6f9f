//! JSON-RPC 2.0 and MCP message types for the stdio transport.
//!
//! Only the slice of the protocol this server participates in is modeled:
//! `initialize`, `ping`, `tools/list`, `tools/call`, and the
//! `notifications/initialized` / `notifications/cancelled` notifications.
//! Everything rides in newline-delimited JSON objects, one message per line.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MCP protocol revision this server speaks by default.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Protocol revisions the server is willing to echo back during
/// `initialize`. The wire surface used here (`initialize`, `ping`,
/// `tools/list`, `tools/call`, cancellation) is identical across them.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2024-11-05", "2025-03-26", "2025-06-18"];

/// The JSON-RPC version marker carried by every message.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC error code for a line that was not valid JSON.
pub const PARSE_ERROR: i64 = -32700;
/// JSON-RPC error code for JSON that was not a request object.
pub const INVALID_REQUEST: i64 = -32600;
/// JSON-RPC error code for an unrecognized method.
pub const METHOD_NOT_FOUND: i64 = -32601;
/// JSON-RPC error code for parameters that did not match the method.
pub const INVALID_PARAMS: i64 = -32602;
/// JSON-RPC error code for failures inside the server itself.
pub const INTERNAL_ERROR: i64 = -32603;

/// An incoming JSON-RPC message: request if `id` is present, notification
/// otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// An outgoing JSON-RPC response, carrying exactly one of `result` / `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// The `error` member of a failed JSON-RPC response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

/// Parameters of the client's `initialize` request.
///
/// Client capabilities and info are accepted but not acted on, so they are
/// not modeled here; serde skips unknown fields on deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    #[serde(default)]
    pub protocol_version: String,
}

/// Result of the `initialize` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

/// Capability advertisement in the `initialize` result. Tools are the only
/// capability this server has.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerCapabilities {
    pub tools: ToolsCapability,
}

/// Marker object for the `tools` capability; it has no sub-options here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsCapability {}

/// Server identity reported during `initialize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// One advertised tool in a `tools/list` result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    /// JSON Schema describing the tool's argument object.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Result of the `tools/list` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsListResult {
    pub tools: Vec<ToolDef>,
}

/// Parameters of a `tools/call` request.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsCallParams {
    pub name: String,
    /// Argument object; `Null` when the client sent none.
    #[serde(default)]
    pub arguments: Value,
}

/// Result of a `tools/call` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolCallResult {
    /// Wraps tool output in the single text content block MCP expects.
    pub fn text(text: impl Into<String>, is_error: bool) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error,
        }
    }
}

/// One content block in a `tools/call` result. This server only ever emits
/// text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

/// Parameters of a `notifications/cancelled` notification.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelledParams {
    /// Id of the request being abandoned.
    pub request_id: Value,
    #[serde(default)]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn requests_and_notifications_share_one_shape() {
        let request: JsonRpcRequest = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/list"
        }))
        .unwrap();
        assert_eq!(request.id, Some(json!(1)));
        assert!(request.params.is_none());

        let notification: JsonRpcRequest = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        }))
        .unwrap();
        assert_eq!(notification.id, None);
    }

    #[test]
    fn success_responses_omit_the_error_member() {
        let response = JsonRpcResponse::success(json!("abc"), json!({"ok": true}));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "jsonrpc": "2.0",
                "id": "abc",
                "result": {"ok": true}
            })
        );
    }

    #[test]
    fn failure_responses_omit_the_result_member() {
        let response = JsonRpcResponse::failure(json!(7), METHOD_NOT_FOUND, "no such method");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "jsonrpc": "2.0",
                "id": 7,
                "error": {"code": -32601, "message": "no such method"}
            })
        );
    }

    #[test]
    fn tool_results_serialize_as_text_content_blocks() {
        let result = ToolCallResult::text("Channel: Computerphile", false);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "content": [{"type": "text", "text": "Channel: Computerphile"}],
                "isError": false
            })
        );
    }

    #[test]
    fn call_params_default_missing_arguments_to_null() {
        let params: ToolsCallParams =
            serde_json::from_value(json!({"name": "get_trending_videos"})).unwrap();
        assert_eq!(params.name, "get_trending_videos");
        assert!(params.arguments.is_null());
    }

    #[test]
    fn initialize_params_tolerate_extra_client_fields() {
        let params: InitializeParams = serde_json::from_value(json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {"roots": {}},
            "clientInfo": {"name": "inspector", "version": "0.1.0"}
        }))
        .unwrap();
        assert_eq!(params.protocol_version, "2024-11-05");
    }
}
