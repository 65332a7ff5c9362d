//! # ck-protocol
//!
//! Core protocol definitions and data models for crewkit.
//!
//! This crate defines all shared data structures used for:
//! - Configuration file parsing (TOML config, Markdown agents, YAML tasks)
//! - Remote tool server connection parameters and tool descriptors
//! - Runtime crew run state
//! - Events streamed from the crew engine to the front end
//!
//! ## Modules
//!
//! - [`agent_models`]: Agent configuration structures
//! - [`task_models`]: Task configuration structures
//! - [`crew_models`]: Crew settings and process kind
//! - [`server_models`]: Tool server connection parameters
//! - [`tool_models`]: Tool descriptors advertised by a tool server
//! - [`config_models`]: Global configuration from config.toml
//! - [`run_models`]: Runtime run state and status
//! - [`ipc`]: Events emitted by the crew engine
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde, ts-rs, and uuid
//! - TypeScript generation: All types derive `TS` for client compatibility
//! - Independent compilation: No dependencies on other crewkit crates

pub mod agent_models;
pub mod config_models;
pub mod crew_models;
pub mod ipc;
pub mod run_models;
pub mod server_models;
pub mod task_models;
pub mod tool_models;

// Re-export all public types for convenience
pub use agent_models::*;
pub use config_models::*;
pub use crew_models::*;
pub use ipc::*;
pub use run_models::*;
pub use server_models::*;
pub use task_models::*;
pub use tool_models::*;
