//! # ck-core
//!
//! Core of crewkit: a sequential agent crew whose tools come from a remote
//! MCP server.
//!
//! - [`mcp`]: MCP client over HTTP+SSE and the [`mcp::ToolAdapter`] that
//!   owns the connection lifecycle
//! - [`crew`]: agent, task and crew descriptors and their builders
//! - [`agents`]: runners that perform an agent's reasoning
//! - [`engine`]: sequential crew execution
//! - [`kickoff`]: start adapter, run crew, stop adapter
//! - [`config`]: `.crewkit/` loading
//! - [`init`]: `.crewkit/` scaffolding
//! - [`state`]: run state transitions

pub mod agents;
pub mod config;
pub mod crew;
pub mod engine;
pub mod init;
pub mod kickoff;
pub mod mcp;
pub mod state;
