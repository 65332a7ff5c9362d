//! MCP client session: handshake, request/response matching, tool calls.

use crate::mcp::error::{McpError, McpResult};
use crate::mcp::messages::{
    CallToolParams, CallToolResult, Implementation, InitializeParams, InitializeResult,
    JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, ListToolsResult, McpMessage,
};
use crate::mcp::transport::{McpTransport, TransportFactory};
use ck_protocol::server_models::ServerParams;
use ck_protocol::tool_models::ToolDescriptor;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// An initialized session with one tool server.
///
/// Requests are serialized through the transport lock, so a response is
/// always read by the caller that sent the matching request.
pub struct McpClient {
    transport: Mutex<Box<dyn McpTransport>>,
    next_id: AtomicU64,
    request_timeout: Duration,
    server_info: Option<Implementation>,
    closed: AtomicBool,
}

impl McpClient {
    /// Open a transport through `factory` and run the `initialize` handshake.
    pub async fn connect(params: &ServerParams, factory: &dyn TransportFactory) -> McpResult<Self> {
        let transport = factory.open(params).await?;
        let mut client = Self {
            transport: Mutex::new(transport),
            next_id: AtomicU64::new(0),
            request_timeout: Duration::from_secs(params.request_timeout_secs),
            server_info: None,
            closed: AtomicBool::new(false),
        };

        if let Err(e) = client.initialize().await {
            if let Err(close_err) = client.close().await {
                warn!(error = %close_err, "Failed to close session after handshake error");
            }
            return Err(e);
        }
        Ok(client)
    }

    async fn initialize(&mut self) -> McpResult<()> {
        let params = serde_json::to_value(InitializeParams::default())?;
        let result: InitializeResult =
            serde_json::from_value(self.request("initialize", Some(params)).await?)?;

        info!(
            server = result.server_info.as_ref().map(|s| s.name.as_str()).unwrap_or("unknown"),
            protocol_version = %result.protocol_version,
            "MCP session initialized"
        );
        self.server_info = result.server_info;

        self.notify("notifications/initialized", None).await
    }

    /// Server name and version reported during the handshake.
    pub fn server_info(&self) -> Option<&Implementation> {
        self.server_info.as_ref()
    }

    /// Send a request and wait for its response.
    pub async fn request(&self, method: &str, params: Option<Value>) -> McpResult<Value> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(McpError::Closed);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let request = JsonRpcRequest::new(id, method, params);
        let bytes = serde_json::to_vec(&request)?;

        let mut transport = self.transport.lock().await;
        debug!(method, id, "Sending request");
        transport.send(&bytes).await?;

        let response = tokio::time::timeout(
            self.request_timeout,
            await_response(&mut **transport, &request.id),
        )
        .await
        .map_err(|_| McpError::Timeout {
            method: method.to_string(),
            secs: self.request_timeout.as_secs(),
        })??;

        response.into_result(method)
    }

    /// Send a notification; no response is expected.
    pub async fn notify(&self, method: &str, params: Option<Value>) -> McpResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(McpError::Closed);
        }
        let bytes = serde_json::to_vec(&JsonRpcNotification::new(method, params))?;
        self.transport.lock().await.send(&bytes).await
    }

    /// Every tool the server exposes, following pagination cursors.
    pub async fn list_tools(&self) -> McpResult<Vec<ToolDescriptor>> {
        let mut tools = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let params = cursor.as_ref().map(|c| json!({ "cursor": c }));
            let page: ListToolsResult =
                serde_json::from_value(self.request("tools/list", params).await?)?;
            tools.extend(page.tools);

            match page.next_cursor {
                Some(next) if cursor.as_deref() == Some(next.as_str()) => {
                    return Err(McpError::Protocol(format!(
                        "tools/list returned the same cursor twice: {next}"
                    )));
                }
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        debug!(count = tools.len(), "Listed tools");
        Ok(tools)
    }

    /// Invoke a tool by name.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> McpResult<CallToolResult> {
        let params = serde_json::to_value(CallToolParams {
            name: name.to_string(),
            arguments,
        })?;
        Ok(serde_json::from_value(
            self.request("tools/call", Some(params)).await?,
        )?)
    }

    /// Close the session. Later requests fail with [`McpError::Closed`].
    pub async fn close(&self) -> McpResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.transport.lock().await.disconnect().await
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Read until the response to `id` arrives. Notifications and unrelated
/// messages are logged and skipped.
async fn await_response(
    transport: &mut dyn McpTransport,
    id: &Value,
) -> McpResult<JsonRpcResponse> {
    loop {
        let raw = transport.receive().await?;
        match McpMessage::from_bytes(&raw)? {
            McpMessage::Response(response) if &response.id == id => return Ok(response),
            McpMessage::Response(response) => {
                debug!(id = %response.id, "Dropping response to unknown request");
            }
            McpMessage::Notification(notification) => {
                debug!(method = %notification.method, "Server notification");
            }
            McpMessage::Request(request) => {
                debug!(method = %request.method, "Ignoring server request");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::transport::ScriptedConnector;

    fn params() -> ServerParams {
        ServerParams::sse("https://example.test/sse")
    }

    #[tokio::test]
    async fn test_connect_runs_handshake() {
        let connector = ScriptedConnector::with_tool_names(&["search"]);
        let client = McpClient::connect(&params(), &connector).await.unwrap();

        assert_eq!(client.server_info().map(|s| s.name.as_str()), Some("scripted"));
        assert!(!client.is_closed());
    }

    #[tokio::test]
    async fn test_list_tools_follows_cursors() {
        let connector = ScriptedConnector::with_tool_names(&["a", "b", "c", "d", "e"]);
        connector.paginate(2);
        let client = McpClient::connect(&params(), &connector).await.unwrap();

        let names: Vec<String> = client
            .list_tools()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn test_call_tool_skips_notifications() {
        let connector = ScriptedConnector::with_tool_names(&["search"]);
        let client = McpClient::connect(&params(), &connector).await.unwrap();

        let result = client
            .call_tool("search", json!({"query": "transformers"}))
            .await
            .unwrap();
        assert!(!result.is_error);
        assert!(result.joined_text().starts_with("search"));
        assert_eq!(connector.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_protocol_error() {
        let connector = ScriptedConnector::with_tool_names(&["search"]);
        let client = McpClient::connect(&params(), &connector).await.unwrap();

        let err = client.call_tool("missing", json!({})).await.unwrap_err();
        assert!(matches!(err, McpError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_failed_handshake_closes_transport() {
        let connector = ScriptedConnector::with_tool_names(&["search"]);
        connector.fail_handshake(true);

        let err = McpClient::connect(&params(), &connector).await.err().unwrap();

        assert!(matches!(err, McpError::Protocol(_)));
        assert_eq!(connector.connections(), 1);
        assert_eq!(connector.disconnects(), 1);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let connector = ScriptedConnector::default();
        let client = McpClient::connect(&params(), &connector).await.unwrap();

        client.close().await.unwrap();
        client.close().await.unwrap();
        assert_eq!(connector.disconnects(), 1);
        assert!(matches!(client.list_tools().await, Err(McpError::Closed)));
    }
}
