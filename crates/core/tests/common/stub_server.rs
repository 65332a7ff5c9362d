//! In-process HTTP+SSE tool server built on axum.
//!
//! `GET /sse` opens the event stream and announces `/messages` as the
//! endpoint; requests POSTed there are answered on the stream.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event as SseEvent, Sse};
use axum::routing::{get, post};
use axum::Router;
use ck_core::mcp::messages::{JsonRpcResponse, ListToolsResult, McpMessage, PROTOCOL_VERSION};
use ck_protocol::tool_models::ToolDescriptor;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::{Stream, StreamExt};

#[derive(Default)]
struct StubState {
    tools: Vec<ToolDescriptor>,
    /// Emit data-less `id:` and `event:` blocks around real events.
    bare_fields: bool,
    session: Mutex<Option<mpsc::UnboundedSender<SseEvent>>>,
    calls: Mutex<Vec<String>>,
}

pub struct StubServer {
    pub addr: SocketAddr,
    state: Arc<StubState>,
    handle: JoinHandle<()>,
}

#[allow(dead_code)]
impl StubServer {
    pub async fn start(tool_names: &[&str]) -> std::io::Result<Self> {
        Self::serve(tool_names, false).await
    }

    /// Like [`StubServer::start`], but every real event is preceded by
    /// blocks that carry fields and no data.
    pub async fn start_with_bare_fields(tool_names: &[&str]) -> std::io::Result<Self> {
        Self::serve(tool_names, true).await
    }

    async fn serve(tool_names: &[&str], bare_fields: bool) -> std::io::Result<Self> {
        let state = Arc::new(StubState {
            tools: tool_names.iter().map(|n| ToolDescriptor::named(*n)).collect(),
            bare_fields,
            ..StubState::default()
        });

        let app = Router::new()
            .route("/sse", get(open_stream))
            .route("/messages", post(receive_message))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    pub fn sse_url(&self) -> String {
        format!("http://{}/sse", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Names passed to `tools/call`, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state.calls.lock().unwrap().clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn open_stream(
    State(state): State<Arc<StubState>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let (tx, rx) = mpsc::unbounded_channel();
    *state.session.lock().unwrap() = Some(tx);

    let mut opening = bare_events(&state, "endpoint");
    opening.push(
        SseEvent::default()
            .event("endpoint")
            .data("/messages?session_id=stub"),
    );
    let endpoint = tokio_stream::iter(opening.into_iter().map(Ok::<_, Infallible>));
    let messages = UnboundedReceiverStream::new(rx).map(Ok::<_, Infallible>);

    Sse::new(endpoint.chain(messages))
}

async fn receive_message(State(state): State<Arc<StubState>>, body: String) -> StatusCode {
    let request = match McpMessage::from_bytes(body.as_bytes()) {
        Ok(McpMessage::Request(request)) => request,
        Ok(_) => return StatusCode::ACCEPTED,
        Err(_) => return StatusCode::BAD_REQUEST,
    };

    let result = match request.method.as_str() {
        "initialize" => json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {"tools": {}},
            "serverInfo": {"name": "stub", "version": "1.0.0"}
        }),
        "tools/list" => serde_json::to_value(ListToolsResult {
            tools: state.tools.clone(),
            next_cursor: None,
        })
        .unwrap(),
        "tools/call" => {
            let params = request.params.unwrap_or(Value::Null);
            let name = params["name"].as_str().unwrap_or_default().to_string();
            state.calls.lock().unwrap().push(name.clone());
            json!({
                "content": [{"type": "text", "text": format!("{name} ok: {}", params["arguments"])}],
                "isError": false
            })
        }
        _ => return StatusCode::NOT_FOUND,
    };

    let response = JsonRpcResponse::success(request.id, result);
    let mut events = bare_events(&state, "message");
    events.push(
        SseEvent::default()
            .event("message")
            .data(serde_json::to_string(&response).unwrap()),
    );

    let sender = state.session.lock().unwrap().clone();
    match sender {
        Some(tx) if events.into_iter().all(|event| tx.send(event).is_ok()) => {
            StatusCode::ACCEPTED
        }
        _ => StatusCode::GONE,
    }
}

/// Blocks with fields but no data, sent ahead of `kind` events when enabled.
fn bare_events(state: &StubState, kind: &str) -> Vec<SseEvent> {
    if !state.bare_fields {
        return Vec::new();
    }
    vec![
        SseEvent::default().id("99"),
        SseEvent::default().event(kind),
    ]
}
