//! Runner implementations.

pub mod command_runner;
pub mod mock_runner;

pub use command_runner::CommandRunner;
pub use mock_runner::MockRunner;
