use std::path::PathBuf;
use thiserror::Error;

pub type InitResult<T> = Result<T, InitError>;

/// Errors raised while scaffolding a `.crewkit/` directory.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("{} already exists. Use --force to overwrite.", .0.display())]
    DirectoryExists(PathBuf),

    /// Embedded asset missing from the build.
    #[error("No bundled template named {0}")]
    TemplateNotFound(String),

    #[error("Cannot create {}: {source}", .path.display())]
    DirectoryCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot write {}: {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}
