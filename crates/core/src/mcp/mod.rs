//! Model Context Protocol client and the tool adapter built on it.

pub mod adapter;
pub mod client;
pub mod error;
pub mod messages;
pub mod sse;
pub mod tools;
pub mod transport;

pub use adapter::{AdapterState, StartOutcome, ToolAdapter};
pub use client::McpClient;
pub use error::{McpError, McpResult};
pub use tools::{ToolHandle, ToolOutput, ToolSet};
pub use transport::{
    McpTransport, ScriptedConnector, ScriptedTransport, SseConnector, SseTransport,
    TransportFactory,
};
