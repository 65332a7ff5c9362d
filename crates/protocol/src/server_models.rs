//! Connection parameters for the remote tool server.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Transport used to reach the tool server.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Server-Sent Events stream with a POST endpoint for requests.
    #[default]
    Sse,
}

/// What to do when the adapter fails to connect before a run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and run the crew with whatever tools are available.
    #[default]
    Degrade,

    /// Stop before building the crew.
    Abort,
}

/// Immutable connection parameters for a tool server.
///
/// # Example
///
/// ```toml
/// [mcp]
/// url = "https://mcp.obrol.id/f/sse"
/// transport = "sse"
/// request-timeout-secs = 30
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct ServerParams {
    /// Endpoint URL of the event stream.
    pub url: String,

    /// Transport kind.
    #[serde(default)]
    pub transport: TransportKind,

    /// How long a single request waits for its response.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl ServerParams {
    /// Parameters for an SSE endpoint with the default timeout.
    pub fn sse(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            transport: TransportKind::Sse,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// The `[mcp]` table: connection parameters plus the failure policy.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct McpConfig {
    #[serde(flatten)]
    pub server: ServerParams,

    #[serde(default)]
    pub on_failure: FailurePolicy,
}
