//! Transports that carry JSON-RPC messages to and from a tool server.

pub mod scripted;
pub mod sse;

use crate::mcp::error::McpResult;
use async_trait::async_trait;
use ck_protocol::server_models::ServerParams;

pub use scripted::{ScriptedConnector, ScriptedTransport};
pub use sse::{SseConnector, SseTransport};

/// A connected, bidirectional message channel to one tool server.
#[async_trait]
pub trait McpTransport: Send + Sync {
    /// Send one serialized JSON-RPC message.
    async fn send(&mut self, message: &[u8]) -> McpResult<()>;

    /// Wait for the next message from the server.
    async fn receive(&mut self) -> McpResult<Vec<u8>>;

    /// Close the channel. Closing twice is not an error.
    async fn disconnect(&mut self) -> McpResult<()>;

    /// Whether the channel is still usable.
    fn is_connected(&self) -> bool;
}

/// Opens connected transports for a set of connection parameters.
///
/// The adapter owns a factory rather than a transport so that every
/// `start` can open a fresh channel.
#[async_trait]
pub trait TransportFactory: Send + Sync {
    async fn open(&self, params: &ServerParams) -> McpResult<Box<dyn McpTransport>>;
}
