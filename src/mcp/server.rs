//! The stdio server loop: reads newline-delimited JSON-RPC requests, routes
//! them, and writes responses.
//!
//! `tools/call` requests run on their own spawned task so a slow YouTube
//! round trip never blocks the read loop, and so `notifications/cancelled`
//! can abort them mid-flight. Everything else is answered inline. All
//! responses funnel through one writer task, which keeps concurrently
//! finishing calls from interleaving bytes on the output stream.

use crate::mcp::protocol::{
    CancelledParams, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, InitializeParams,
    InitializeResult, JsonRpcRequest, JsonRpcResponse, METHOD_NOT_FOUND, PARSE_ERROR,
    PROTOCOL_VERSION, SUPPORTED_PROTOCOL_VERSIONS, ServerCapabilities, ServerInfo, ToolCallResult,
    ToolDef, ToolsCallParams, ToolsListResult,
};
use crate::tools::{SubscribedChannelsArgs, TrendingVideosArgs, UserActivityArgs, YouTubeTools};
use eyre::Context;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

/// Server name reported to clients during `initialize`.
const SERVER_NAME: &str = "YouTube MCP";

/// Tool calls still running, keyed by the stringified request id so numeric
/// and string ids share one namespace.
type InFlight = Arc<Mutex<HashMap<String, JoinHandle<()>>>>;

/// The tool definitions advertised through `tools/list`, in the order clients
/// display them.
pub fn tool_definitions() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "get_trending_videos".to_string(),
            description: "Get the videos currently trending on YouTube".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "region_code": {
                        "type": "string",
                        "description": "ISO 3166-1 alpha-2 country code to chart against",
                        "default": "US"
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum number of videos to return",
                        "default": 30
                    }
                }
            }),
        },
        ToolDef {
            name: "get_subscribed_channels".to_string(),
            description: "Get the channels the authenticated user is subscribed to".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "max_channels": {
                        "type": "integer",
                        "description": "Maximum number of channels to return",
                        "default": 10
                    }
                }
            }),
        },
        ToolDef {
            name: "get_user_activity".to_string(),
            description: "Get the authenticated user's recent YouTube activity".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum number of activity entries to return",
                        "default": 10
                    }
                }
            }),
        },
    ]
}

/// An MCP server bound to a set of YouTube tools.
///
/// The transport is injected, so production code serves stdin/stdout while
/// tests drive the same loop over in-memory pipes.
pub struct McpServer {
    tools: Arc<YouTubeTools>,
}

impl McpServer {
    pub fn new(tools: YouTubeTools) -> Self {
        Self {
            tools: Arc::new(tools),
        }
    }

    /// Serves requests until `reader` reaches end-of-file, then waits for
    /// any tool calls still in flight and drains the writer.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> eyre::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (out_tx, mut out_rx) = mpsc::channel::<JsonRpcResponse>(16);
        let writer_task: JoinHandle<std::io::Result<()>> = tokio::spawn(async move {
            let mut writer = BufWriter::new(writer);
            while let Some(response) = out_rx.recv().await {
                let mut payload = match serde_json::to_string(&response) {
                    Ok(payload) => payload,
                    Err(err) => {
                        tracing::error!(error = %err, "dropping unserializable response");
                        continue;
                    }
                };
                payload.push('\n');
                tracing::trace!(raw = %payload.trim_end(), "server -> client");
                writer.write_all(payload.as_bytes()).await?;
                writer.flush().await?;
            }
            Ok(())
        });

        let in_flight: InFlight = Arc::new(Mutex::new(HashMap::new()));
        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await.context("read request line")? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            tracing::trace!(raw = %line, "client -> server");
            self.handle_line(line, &out_tx, &in_flight).await;
        }

        // Input is closed, but requests that were fully received still get
        // their answers before the writer goes away. Cancelled calls were
        // already removed from the map and aborted. The lock must not be
        // held across the awaits: each task's last step re-locks the map to
        // remove itself.
        let pending: Vec<(String, JoinHandle<()>)> = {
            let mut map = in_flight.lock().await;
            map.drain().collect()
        };
        for (id, handle) in pending {
            tracing::debug!(id = %id, "draining in-flight call at shutdown");
            if let Err(err) = handle.await {
                if !err.is_cancelled() {
                    tracing::error!(id = %id, error = %err, "tool call task panicked");
                }
            }
        }

        drop(out_tx);
        writer_task
            .await
            .context("join writer task")?
            .context("write responses")?;
        tracing::debug!("request stream closed, server exiting");
        Ok(())
    }

    async fn handle_line(
        &self,
        line: &str,
        out_tx: &mpsc::Sender<JsonRpcResponse>,
        in_flight: &InFlight,
    ) {
        let raw: Value = match serde_json::from_str(line) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "received a line that is not JSON");
                send(
                    out_tx,
                    JsonRpcResponse::failure(Value::Null, PARSE_ERROR, "parse error"),
                )
                .await;
                return;
            }
        };

        // Keep the id around so shape errors can still be addressed to it.
        let id = raw.get("id").cloned();
        let request: JsonRpcRequest = match serde_json::from_value(raw) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(error = %err, "received JSON that is not a request");
                send(
                    out_tx,
                    JsonRpcResponse::failure(
                        id.unwrap_or(Value::Null),
                        INVALID_REQUEST,
                        format!("invalid request: {err}"),
                    ),
                )
                .await;
                return;
            }
        };

        match request.method.as_str() {
            "initialize" => {
                let Some(id) = request.id else {
                    tracing::warn!("initialize arrived without an id, ignoring");
                    return;
                };
                let client_protocol = request
                    .params
                    .and_then(|params| serde_json::from_value::<InitializeParams>(params).ok())
                    .unwrap_or_default()
                    .protocol_version;
                tracing::debug!(client_protocol = %client_protocol, "initializing");

                // Echo the client's revision when we know it; otherwise
                // answer with our default and let the client negotiate down.
                let protocol_version = if SUPPORTED_PROTOCOL_VERSIONS
                    .contains(&client_protocol.as_str())
                {
                    client_protocol
                } else {
                    PROTOCOL_VERSION.to_string()
                };
                let result = InitializeResult {
                    protocol_version,
                    capabilities: ServerCapabilities::default(),
                    server_info: ServerInfo {
                        name: SERVER_NAME.to_string(),
                        version: env!("CARGO_PKG_VERSION").to_string(),
                    },
                };
                match serde_json::to_value(&result) {
                    Ok(value) => send(out_tx, JsonRpcResponse::success(id, value)).await,
                    Err(err) => {
                        send(
                            out_tx,
                            JsonRpcResponse::failure(
                                id,
                                INTERNAL_ERROR,
                                format!("serialize initialize result: {err}"),
                            ),
                        )
                        .await
                    }
                }
            }
            "notifications/initialized" => {
                tracing::debug!("client reports initialization complete");
            }
            "ping" => {
                let Some(id) = request.id else {
                    return;
                };
                send(out_tx, JsonRpcResponse::success(id, json!({}))).await;
            }
            "tools/list" => {
                let Some(id) = request.id else {
                    return;
                };
                let tools = tool_definitions();
                tracing::debug!(count = tools.len(), "listing tools");
                match serde_json::to_value(&ToolsListResult { tools }) {
                    Ok(value) => send(out_tx, JsonRpcResponse::success(id, value)).await,
                    Err(err) => {
                        send(
                            out_tx,
                            JsonRpcResponse::failure(
                                id,
                                INTERNAL_ERROR,
                                format!("serialize tool list: {err}"),
                            ),
                        )
                        .await
                    }
                }
            }
            "tools/call" => {
                let Some(id) = request.id else {
                    tracing::warn!("tools/call arrived without an id, ignoring");
                    return;
                };
                self.spawn_tool_call(id, request.params, out_tx, in_flight)
                    .await;
            }
            "notifications/cancelled" => {
                self.cancel(request.params, in_flight).await;
            }
            other => {
                if let Some(id) = request.id {
                    send(
                        out_tx,
                        JsonRpcResponse::failure(
                            id,
                            METHOD_NOT_FOUND,
                            format!("method not found: {other}"),
                        ),
                    )
                    .await;
                } else {
                    tracing::debug!(method = other, "ignoring unknown notification");
                }
            }
        }
    }

    /// Runs one `tools/call` on its own task and tracks it for cancellation.
    async fn spawn_tool_call(
        &self,
        id: Value,
        params: Option<Value>,
        out_tx: &mpsc::Sender<JsonRpcResponse>,
        in_flight: &InFlight,
    ) {
        let tools = Arc::clone(&self.tools);
        let out_tx = out_tx.clone();
        let key = id.to_string();

        // Holding the map lock across the insert means the task's own removal
        // (its last await) cannot run until the handle is registered, even if
        // the call finishes immediately.
        let mut map = in_flight.lock().await;
        let handle = tokio::spawn({
            let in_flight = Arc::clone(in_flight);
            let key = key.clone();
            async move {
                let response = run_tool_call(&tools, id, params).await;
                send(&out_tx, response).await;
                in_flight.lock().await.remove(&key);
            }
        });
        map.insert(key, handle);
    }

    /// Handles `notifications/cancelled` by aborting the matching call.
    ///
    /// Aborting drops the call's future, which tears down its in-progress
    /// HTTP request and connection with it. No response is sent for an
    /// abandoned id.
    async fn cancel(&self, params: Option<Value>, in_flight: &InFlight) {
        let cancelled: CancelledParams = match params.map(serde_json::from_value).transpose() {
            Ok(Some(cancelled)) => cancelled,
            Ok(None) => {
                tracing::warn!("cancellation notification without params");
                return;
            }
            Err(err) => {
                tracing::warn!(error = %err, "malformed cancellation notification");
                return;
            }
        };

        let key = cancelled.request_id.to_string();
        if let Some(handle) = in_flight.lock().await.remove(&key) {
            handle.abort();
            tracing::debug!(
                id = %key,
                reason = cancelled.reason.as_deref().unwrap_or("unspecified"),
                "aborted in-flight tool call"
            );
        } else {
            tracing::debug!(id = %key, "cancellation for unknown or completed request");
        }
    }
}

/// Sends one response toward the writer task.
async fn send(out_tx: &mpsc::Sender<JsonRpcResponse>, response: JsonRpcResponse) {
    if out_tx.send(response).await.is_err() {
        tracing::warn!("writer task is gone, dropping response");
    }
}

/// Decodes `tools/call` params and produces the response for them.
async fn run_tool_call(tools: &YouTubeTools, id: Value, params: Option<Value>) -> JsonRpcResponse {
    let params: ToolsCallParams = match params.map(serde_json::from_value).transpose() {
        Ok(Some(params)) => params,
        Ok(None) => {
            return JsonRpcResponse::failure(id, INVALID_PARAMS, "tools/call requires params");
        }
        Err(err) => {
            return JsonRpcResponse::failure(
                id,
                INVALID_PARAMS,
                format!("invalid tools/call params: {err}"),
            );
        }
    };

    match call_tool(tools, &params.name, params.arguments).await {
        Ok(result) => match serde_json::to_value(&result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(err) => JsonRpcResponse::failure(
                id,
                INTERNAL_ERROR,
                format!("serialize tool result: {err}"),
            ),
        },
        Err(message) => JsonRpcResponse::failure(id, INVALID_PARAMS, message),
    }
}

/// Routes a call to the named tool.
///
/// Unknown tool names come back as an error-flagged result rather than a
/// protocol error, so the text reaches whatever is displaying tool output.
/// `Err` is reserved for arguments that do not decode.
async fn call_tool(
    tools: &YouTubeTools,
    name: &str,
    arguments: Value,
) -> Result<ToolCallResult, String> {
    match name {
        "get_trending_videos" => {
            let args: TrendingVideosArgs = decode_args(arguments)?;
            Ok(into_result(tools.trending_videos(args).await))
        }
        "get_subscribed_channels" => {
            let args: SubscribedChannelsArgs = decode_args(arguments)?;
            Ok(into_result(tools.subscribed_channels(args).await))
        }
        "get_user_activity" => {
            let args: UserActivityArgs = decode_args(arguments)?;
            Ok(into_result(tools.user_activity(args).await))
        }
        other => {
            tracing::warn!(tool = other, "call for unknown tool");
            Ok(ToolCallResult::text(
                format!("Error: unknown tool: {other}"),
                true,
            ))
        }
    }
}

/// Decodes a tool's argument object, treating `null` as "use the defaults".
fn decode_args<T>(arguments: Value) -> Result<T, String>
where
    T: serde::de::DeserializeOwned + Default,
{
    if arguments.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(arguments).map_err(|err| format!("invalid arguments: {err}"))
}

/// Converts a tool outcome into the MCP result shape, flagging failures.
fn into_result(outcome: Result<String, crate::error::Error>) -> ToolCallResult {
    match outcome {
        Ok(text) => ToolCallResult::text(text, false),
        Err(err) => {
            tracing::warn!(error = %err, "tool invocation failed");
            ToolCallResult::text(err.tool_message(), true)
        }
    }
}
