//! Agent runners.
//!
//! [`AgentRunner`] is the seam between the crew engine and whatever performs
//! an agent's reasoning: an external command in production, a scripted
//! runner in tests.

pub mod base;
pub mod runners;

pub use base::{AgentError, AgentEvent, AgentEventStream, AgentRunner, ExecutionContext};
pub use runners::{CommandRunner, MockRunner};
