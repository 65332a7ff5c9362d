//! Error types for tool server operations.

use thiserror::Error;

/// Result type for tool server operations.
pub type McpResult<T> = Result<T, McpError>;

/// Errors that can occur while talking to a tool server.
///
/// The adapter collapses all of these into a single "start failed" outcome;
/// the variants exist so the reason can be logged and inspected.
#[derive(Debug, Error)]
pub enum McpError {
    /// The endpoint could not be reached or refused the stream.
    #[error("connection error: {0}")]
    Connection(String),

    /// The transport failed after the connection was established.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with something that is not valid protocol.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// No response arrived within the request timeout.
    #[error("request '{method}' timed out after {secs}s")]
    Timeout { method: String, secs: u64 },

    /// The session has been closed.
    #[error("session is closed")]
    Closed,

    /// The requested tool is not in the tool set.
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = McpError::Connection("refused".to_string());
        assert_eq!(err.to_string(), "connection error: refused");

        let err = McpError::Timeout {
            method: "tools/list".to_string(),
            secs: 5,
        };
        assert_eq!(err.to_string(), "request 'tools/list' timed out after 5s");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: McpError = json_err.into();
        assert!(matches!(err, McpError::Json(_)));
    }
}
