//! Invocable tool handles bound to a live session.

use crate::mcp::client::McpClient;
use crate::mcp::error::{McpError, McpResult};
use ck_protocol::tool_models::ToolDescriptor;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Text returned by one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

/// A remote tool plus the session it is invoked through.
#[derive(Clone)]
pub struct ToolHandle {
    descriptor: ToolDescriptor,
    session: Arc<McpClient>,
}

impl ToolHandle {
    pub fn new(descriptor: ToolDescriptor, session: Arc<McpClient>) -> Self {
        Self { descriptor, session }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    /// Call the tool. Fails with [`McpError::Closed`] once the owning
    /// adapter has stopped.
    pub async fn invoke(&self, arguments: Value) -> McpResult<ToolOutput> {
        let result = self.session.call_tool(&self.descriptor.name, arguments).await?;
        Ok(ToolOutput {
            text: result.joined_text(),
            is_error: result.is_error,
        })
    }
}

impl fmt::Debug for ToolHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolHandle")
            .field("descriptor", &self.descriptor)
            .field("closed", &self.session.is_closed())
            .finish()
    }
}

/// Tool name to handle mapping. Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: Arc<BTreeMap<String, ToolHandle>>,
}

impl ToolSet {
    /// Bind every descriptor to `session`. A repeated name keeps the last
    /// descriptor.
    pub fn from_descriptors(descriptors: Vec<ToolDescriptor>, session: &Arc<McpClient>) -> Self {
        Self::from_handles(
            descriptors
                .into_iter()
                .map(|descriptor| ToolHandle::new(descriptor, Arc::clone(session))),
        )
    }

    pub fn from_handles(handles: impl IntoIterator<Item = ToolHandle>) -> Self {
        let mut tools = BTreeMap::new();
        for handle in handles {
            if let Some(previous) = tools.insert(handle.name().to_string(), handle) {
                warn!(tool = previous.name(), "Server listed tool more than once");
            }
        }
        Self {
            tools: Arc::new(tools),
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<&ToolHandle> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolHandle> {
        self.tools.values()
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.values().map(|h| h.descriptor.clone()).collect()
    }

    /// Whether both sets share the same underlying mapping.
    pub fn same_as(&self, other: &ToolSet) -> bool {
        Arc::ptr_eq(&self.tools, &other.tools)
    }

    /// Subset restricted to `allowed`. Names the server does not expose are
    /// logged and skipped.
    pub fn filter(&self, allowed: &[String]) -> ToolSet {
        let mut selected = Vec::with_capacity(allowed.len());
        for name in allowed {
            match self.tools.get(name) {
                Some(handle) => selected.push(handle.clone()),
                None => warn!(tool = %name, "Requested tool is not available"),
            }
        }
        Self::from_handles(selected)
    }

    /// Invoke a tool by name.
    pub async fn invoke(&self, name: &str, arguments: Value) -> McpResult<ToolOutput> {
        let handle = self
            .get(name)
            .ok_or_else(|| McpError::ToolNotFound(name.to_string()))?;
        handle.invoke(arguments).await
    }
}

impl fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tools.keys()).finish()
    }
}
