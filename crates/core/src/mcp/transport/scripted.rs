//! In-memory tool server.
//!
//! Answers `initialize`, `tools/list` and `tools/call` without any network,
//! which lets the adapter and crew engine run against a known tool set. The
//! connector's state is shared, so the tool list or failure mode can be
//! changed between `start` calls.

use crate::mcp::error::{McpError, McpResult};
use crate::mcp::messages::{
    JsonRpcNotification, JsonRpcResponse, ListToolsResult, McpMessage, PROTOCOL_VERSION,
};
use crate::mcp::transport::{McpTransport, TransportFactory};
use async_trait::async_trait;
use ck_protocol::server_models::ServerParams;
use ck_protocol::tool_models::ToolDescriptor;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct ScriptedState {
    tools: Vec<ToolDescriptor>,
    page_size: Option<usize>,
    refuse_connections: bool,
    fail_handshake: bool,
    fail_listing: bool,
    connections: usize,
    disconnects: usize,
    calls: Vec<(String, Value)>,
}

/// Factory for [`ScriptedTransport`]s backed by one shared tool server.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConnector {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedConnector {
    /// Server exposing `tools`.
    pub fn with_tools(tools: Vec<ToolDescriptor>) -> Self {
        let connector = Self::default();
        connector.set_tools(tools);
        connector
    }

    /// Server exposing bare tools with these names.
    pub fn with_tool_names(names: &[&str]) -> Self {
        Self::with_tools(names.iter().map(|n| ToolDescriptor::named(*n)).collect())
    }

    /// Server whose endpoint cannot be reached.
    pub fn unreachable() -> Self {
        let connector = Self::default();
        connector.refuse_connections(true);
        connector
    }

    fn state(&self) -> MutexGuard<'_, ScriptedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_tools(&self, tools: Vec<ToolDescriptor>) {
        self.state().tools = tools;
    }

    /// Split `tools/list` results into pages of `size`.
    pub fn paginate(&self, size: usize) {
        self.state().page_size = Some(size.max(1));
    }

    pub fn refuse_connections(&self, refuse: bool) {
        self.state().refuse_connections = refuse;
    }

    /// Make `initialize` answer with a JSON-RPC error.
    pub fn fail_handshake(&self, fail: bool) {
        self.state().fail_handshake = fail;
    }

    /// Make `tools/list` answer with a JSON-RPC error.
    pub fn fail_listing(&self, fail: bool) {
        self.state().fail_listing = fail;
    }

    /// Number of transports opened so far.
    pub fn connections(&self) -> usize {
        self.state().connections
    }

    /// Number of transports closed so far.
    pub fn disconnects(&self) -> usize {
        self.state().disconnects
    }

    /// Every `tools/call` received, in order.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.state().calls.clone()
    }
}

#[async_trait]
impl TransportFactory for ScriptedConnector {
    async fn open(&self, params: &ServerParams) -> McpResult<Box<dyn McpTransport>> {
        let mut state = self.state();
        if state.refuse_connections {
            return Err(McpError::Connection(format!(
                "Failed to open event stream at {}: connection refused",
                params.url
            )));
        }
        state.connections += 1;
        Ok(Box::new(ScriptedTransport {
            state: Arc::clone(&self.state),
            outbox: VecDeque::new(),
            connected: true,
        }))
    }
}

/// One open session with the in-memory server.
#[derive(Debug)]
pub struct ScriptedTransport {
    state: Arc<Mutex<ScriptedState>>,
    outbox: VecDeque<Vec<u8>>,
    connected: bool,
}

impl ScriptedTransport {
    fn answer(&mut self, method: &str, params: Option<Value>, id: Value) -> McpResult<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let response = match method {
            "initialize" if state.fail_handshake => {
                JsonRpcResponse::failure(id, -32603, "server is starting up")
            }
            "initialize" => JsonRpcResponse::success(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {"tools": {}},
                    "serverInfo": {"name": "scripted", "version": "0.0.0"}
                }),
            ),
            "tools/list" if state.fail_listing => {
                JsonRpcResponse::failure(id, -32603, "tool listing unavailable")
            }
            "tools/list" => {
                let start = params
                    .as_ref()
                    .and_then(|p| p.get("cursor"))
                    .and_then(Value::as_str)
                    .and_then(|c| c.parse::<usize>().ok())
                    .unwrap_or(0);
                let end = match state.page_size {
                    Some(size) => (start + size).min(state.tools.len()),
                    None => state.tools.len(),
                };
                let page = ListToolsResult {
                    tools: state.tools.get(start..end).unwrap_or_default().to_vec(),
                    next_cursor: (end < state.tools.len()).then(|| end.to_string()),
                };
                JsonRpcResponse::success(id, serde_json::to_value(page)?)
            }
            "tools/call" => {
                let params = params.unwrap_or(Value::Null);
                let name = params
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

                if state.tools.iter().any(|t| t.name == name) {
                    state.calls.push((name.clone(), arguments.clone()));
                    let progress = JsonRpcNotification::new(
                        "notifications/progress",
                        Some(json!({"progress": 1, "total": 1})),
                    );
                    self.outbox.push_back(serde_json::to_vec(&progress)?);
                    JsonRpcResponse::success(
                        id,
                        json!({
                            "content": [{"type": "text", "text": format!("{name} {arguments}")}],
                            "isError": false
                        }),
                    )
                } else {
                    JsonRpcResponse::failure(id, -32602, format!("Unknown tool: {name}"))
                }
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            other => JsonRpcResponse::failure(id, -32601, format!("Method not found: {other}")),
        };

        self.outbox.push_back(serde_json::to_vec(&response)?);
        Ok(())
    }
}

#[async_trait]
impl McpTransport for ScriptedTransport {
    async fn send(&mut self, message: &[u8]) -> McpResult<()> {
        if !self.connected {
            return Err(McpError::Closed);
        }
        match McpMessage::from_bytes(message)? {
            McpMessage::Request(request) => {
                self.answer(&request.method, request.params, request.id)
            }
            McpMessage::Notification(_) | McpMessage::Response(_) => Ok(()),
        }
    }

    async fn receive(&mut self) -> McpResult<Vec<u8>> {
        if !self.connected {
            return Err(McpError::Closed);
        }
        self.outbox
            .pop_front()
            .ok_or_else(|| McpError::Transport("No pending message".to_string()))
    }

    async fn disconnect(&mut self) -> McpResult<()> {
        if self.connected {
            self.connected = false;
            self.state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .disconnects += 1;
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
