//! Configuration loading and management.
//!
//! This module loads the `.crewkit/` directory: global settings, agent
//! definitions and the ordered task list.

pub mod error;
pub mod loader;
pub mod models;
