//! Lifecycle wrapper around one tool server connection.
//!
//! `start` never fails: an unreachable server yields [`StartOutcome::Failed`]
//! together with whatever tool set the adapter already holds, and the caller
//! decides whether to continue without tools. `stop` is best effort and
//! always leaves the adapter unconnected.

use crate::mcp::client::McpClient;
use crate::mcp::error::{McpError, McpResult};
use crate::mcp::tools::ToolSet;
use crate::mcp::transport::{SseConnector, TransportFactory};
use ck_protocol::server_models::ServerParams;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    Unconnected,
    Connected,
}

/// Result of [`ToolAdapter::start`].
#[derive(Debug)]
pub enum StartOutcome {
    /// The server answered and `tools` is its current tool set.
    Connected { tools: ToolSet },
    /// The connection or enumeration failed. `tools` is the set the adapter
    /// held before the attempt (possibly empty).
    Failed { reason: McpError, tools: ToolSet },
}

impl StartOutcome {
    pub fn tools(&self) -> &ToolSet {
        match self {
            StartOutcome::Connected { tools } | StartOutcome::Failed { tools, .. } => tools,
        }
    }

    pub fn into_tools(self) -> ToolSet {
        match self {
            StartOutcome::Connected { tools } | StartOutcome::Failed { tools, .. } => tools,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, StartOutcome::Connected { .. })
    }

    pub fn failure(&self) -> Option<&McpError> {
        match self {
            StartOutcome::Failed { reason, .. } => Some(reason),
            StartOutcome::Connected { .. } => None,
        }
    }
}

/// Owns at most one live session with a tool server.
pub struct ToolAdapter {
    params: ServerParams,
    factory: Arc<dyn TransportFactory>,
    session: Option<Arc<McpClient>>,
    tools: ToolSet,
}

impl ToolAdapter {
    /// Adapter that connects over HTTP+SSE.
    pub fn new(params: ServerParams) -> Self {
        Self::with_connector(params, Arc::new(SseConnector))
    }

    /// Adapter that opens transports through `factory`.
    pub fn with_connector(params: ServerParams, factory: Arc<dyn TransportFactory>) -> Self {
        Self {
            params,
            factory,
            session: None,
            tools: ToolSet::default(),
        }
    }

    pub fn params(&self) -> &ServerParams {
        &self.params
    }

    pub fn state(&self) -> AdapterState {
        if self.session.is_some() {
            AdapterState::Connected
        } else {
            AdapterState::Unconnected
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state() == AdapterState::Connected
    }

    /// The tool set currently held.
    pub fn tools(&self) -> ToolSet {
        self.tools.clone()
    }

    /// Connect (or refresh, when already connected) and enumerate tools.
    ///
    /// A failed refresh keeps the existing session and tool set.
    pub async fn start(&mut self) -> StartOutcome {
        let result = match &self.session {
            Some(session) => {
                debug!(url = %self.params.url, "Adapter already connected; refreshing tools");
                enumerate(session).await
            }
            None => {
                info!(url = %self.params.url, "Connecting to tool server");
                self.connect().await
            }
        };

        match result {
            Ok(tools) => {
                info!(tools = ?tools.names(), "Available tools");
                self.tools = tools.clone();
                StartOutcome::Connected { tools }
            }
            Err(reason) => {
                error!(url = %self.params.url, error = %reason, "Error starting tool adapter");
                StartOutcome::Failed {
                    reason,
                    tools: self.tools.clone(),
                }
            }
        }
    }

    async fn connect(&mut self) -> McpResult<ToolSet> {
        let session = Arc::new(McpClient::connect(&self.params, self.factory.as_ref()).await?);

        match enumerate(&session).await {
            Ok(tools) => {
                self.session = Some(session);
                Ok(tools)
            }
            Err(e) => {
                if let Err(close_err) = session.close().await {
                    warn!(error = %close_err, "Failed to close session after enumeration error");
                }
                Err(e)
            }
        }
    }

    /// Close the session if one is open. Close errors are logged, never
    /// returned, and the tool set is cleared either way.
    pub async fn stop(&mut self) {
        match self.session.take() {
            Some(session) => {
                info!(url = %self.params.url, "Stopping tool adapter");
                if let Err(e) = session.close().await {
                    warn!(error = %e, "Error closing tool server session");
                }
                self.tools = ToolSet::default();
            }
            None => info!("Tool adapter not connected; no stop needed"),
        }
    }
}

async fn enumerate(session: &Arc<McpClient>) -> McpResult<ToolSet> {
    let descriptors = session.list_tools().await?;
    Ok(ToolSet::from_descriptors(descriptors, session))
}
