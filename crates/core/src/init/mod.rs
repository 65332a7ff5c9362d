//! Scaffolding for new `.crewkit/` directories.
//!
//! ```no_run
//! use ck_core::init::{generate_crewkit_structure, InitOptions};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = InitOptions {
//!     target_dir: PathBuf::from("."),
//!     force: false,
//!     minimal: false,
//! };
//! generate_crewkit_structure(options).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_crewkit_structure, InitOptions};
pub use templates::{get_template, list_templates};
