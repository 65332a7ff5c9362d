//! Tool descriptors as advertised by a tool server.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A named remote capability.
///
/// Field names follow the MCP `tools/list` wire format.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Unique tool name on its server.
    pub name: String,

    /// Human-readable description shown to the agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// JSON Schema of the tool arguments.
    #[serde(default = "empty_object_schema")]
    pub input_schema: serde_json::Value,
}

fn empty_object_schema() -> serde_json::Value {
    serde_json::json!({ "type": "object" })
}

impl ToolDescriptor {
    /// Descriptor with only a name and an empty object schema.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_schema: empty_object_schema(),
        }
    }
}
