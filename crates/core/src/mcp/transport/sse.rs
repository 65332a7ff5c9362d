//! HTTP+SSE transport.
//!
//! The client keeps one `GET` open as an event stream. The server's first
//! `endpoint` event names the URL that requests are POSTed to; responses come
//! back as `message` events on the stream.

use crate::mcp::error::{McpError, McpResult};
use crate::mcp::sse::SseDecoder;
use crate::mcp::transport::{McpTransport, TransportFactory};
use async_trait::async_trait;
use ck_protocol::server_models::{ServerParams, TransportKind};
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::Url;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// SSE transport for one tool server.
pub struct SseTransport {
    url: Url,
    client: reqwest::Client,
    handshake_timeout: Duration,
    endpoint: Option<Url>,
    inbound: Option<mpsc::UnboundedReceiver<Vec<u8>>>,
    reader: Option<JoinHandle<()>>,
}

impl SseTransport {
    /// Create an unconnected transport.
    ///
    /// The HTTP client has a connect timeout but no overall timeout, since
    /// the event stream stays open for the whole session.
    pub fn new(params: &ServerParams) -> McpResult<Self> {
        let url = Url::parse(&params.url)
            .map_err(|e| McpError::Connection(format!("invalid URL '{}': {e}", params.url)))?;
        let handshake_timeout = Duration::from_secs(params.request_timeout_secs);
        let client = reqwest::Client::builder()
            .connect_timeout(handshake_timeout)
            .build()?;

        Ok(Self {
            url,
            client,
            handshake_timeout,
            endpoint: None,
            inbound: None,
            reader: None,
        })
    }

    /// Open the event stream and wait for the server to announce its
    /// message endpoint.
    pub async fn connect(&mut self) -> McpResult<()> {
        if self.is_connected() {
            return Err(McpError::Connection("Already connected".to_string()));
        }

        let response = self
            .client
            .get(self.url.clone())
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| {
                McpError::Connection(format!("Failed to open event stream at {}: {e}", self.url))
            })?;

        if !response.status().is_success() {
            return Err(McpError::Connection(format!(
                "Event stream at {} returned {}",
                self.url,
                response.status()
            )));
        }

        let (endpoint_tx, endpoint_rx) = oneshot::channel();
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let reader = tokio::spawn(read_events(
            response,
            self.url.clone(),
            endpoint_tx,
            message_tx,
        ));

        let endpoint = match tokio::time::timeout(self.handshake_timeout, endpoint_rx).await {
            Ok(Ok(endpoint)) => endpoint,
            Ok(Err(_)) => {
                reader.abort();
                return Err(McpError::Connection(
                    "Event stream closed before announcing an endpoint".to_string(),
                ));
            }
            Err(_) => {
                reader.abort();
                return Err(McpError::Timeout {
                    method: "endpoint".to_string(),
                    secs: self.handshake_timeout.as_secs(),
                });
            }
        };

        debug!(%endpoint, "SSE message endpoint announced");
        self.endpoint = Some(endpoint);
        self.inbound = Some(message_rx);
        self.reader = Some(reader);
        Ok(())
    }
}

/// Pump the event stream: the first `endpoint` event goes to
/// `endpoint_tx`, `message` events go to `message_tx`.
async fn read_events(
    response: reqwest::Response,
    base: Url,
    endpoint_tx: oneshot::Sender<Url>,
    message_tx: mpsc::UnboundedSender<Vec<u8>>,
) {
    let mut endpoint_tx = Some(endpoint_tx);
    let mut decoder = SseDecoder::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                warn!(error = %e, "SSE stream error");
                break;
            }
        };

        for event in decoder.feed(&chunk) {
            match event.kind() {
                "endpoint" => match base.join(event.data.trim()) {
                    Ok(url) if url.origin() == base.origin() => {
                        if let Some(tx) = endpoint_tx.take() {
                            let _ = tx.send(url);
                        }
                    }
                    Ok(url) => warn!(%url, "ignoring cross-origin endpoint"),
                    Err(e) => warn!(error = %e, data = %event.data, "invalid endpoint event"),
                },
                "message" => {
                    if message_tx.send(event.data.into_bytes()).is_err() {
                        return;
                    }
                }
                other => debug!(event = other, "ignoring SSE event"),
            }
        }
    }

    debug!("SSE stream ended");
}

#[async_trait]
impl McpTransport for SseTransport {
    async fn send(&mut self, message: &[u8]) -> McpResult<()> {
        let endpoint = self.endpoint.clone().ok_or(McpError::Closed)?;

        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.handshake_timeout)
            .body(message.to_vec())
            .send()
            .await
            .map_err(|e| McpError::Transport(format!("Failed to post message: {e}")))?;

        if !response.status().is_success() {
            return Err(McpError::Transport(format!(
                "Message endpoint returned {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn receive(&mut self) -> McpResult<Vec<u8>> {
        let inbound = self.inbound.as_mut().ok_or(McpError::Closed)?;
        inbound
            .recv()
            .await
            .ok_or_else(|| McpError::Transport("Event stream closed".to_string()))
    }

    async fn disconnect(&mut self) -> McpResult<()> {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        self.inbound = None;
        self.endpoint = None;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.endpoint.is_some()
            && self
                .reader
                .as_ref()
                .is_some_and(|reader| !reader.is_finished())
    }
}

impl Drop for SseTransport {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

/// Opens [`SseTransport`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct SseConnector;

#[async_trait]
impl TransportFactory for SseConnector {
    async fn open(&self, params: &ServerParams) -> McpResult<Box<dyn McpTransport>> {
        match params.transport {
            TransportKind::Sse => {
                let mut transport = SseTransport::new(params)?;
                transport.connect().await?;
                Ok(Box::new(transport))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sse_transport_creation() {
        let transport = SseTransport::new(&ServerParams::sse("http://localhost:8080/sse")).unwrap();
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_invalid_url_is_a_connection_error() {
        let result = SseTransport::new(&ServerParams::sse("not a url"));
        assert!(matches!(result, Err(McpError::Connection(_))));
    }

    #[tokio::test]
    async fn test_send_before_connect_fails() {
        let mut transport =
            SseTransport::new(&ServerParams::sse("http://localhost:8080/sse")).unwrap();
        assert!(matches!(transport.send(b"{}").await, Err(McpError::Closed)));
        assert!(matches!(transport.receive().await, Err(McpError::Closed)));
    }

    #[tokio::test]
    async fn test_disconnect_when_not_connected_is_ok() {
        let mut transport =
            SseTransport::new(&ServerParams::sse("http://localhost:8080/sse")).unwrap();
        assert!(transport.disconnect().await.is_ok());
        assert!(!transport.is_connected());
    }
}
