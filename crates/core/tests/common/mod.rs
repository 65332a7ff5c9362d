//! Shared helpers for the integration tests.
//!
//! - fixtures: sample `.crewkit/` projects and configs
//! - assertions: checks over emitted events
//! - stub_server: in-process HTTP+SSE tool server

pub mod assertions;
pub mod fixtures;
pub mod stub_server;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
