//! Errors raised while reading a `.crewkit/` directory.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config.toml at {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid task list at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Agent file whose front matter is missing or does not describe an agent.
    #[error("Invalid agent definition in {path}: {reason}")]
    MarkdownParse { path: PathBuf, reason: String },

    #[error("Cannot list agent files under {path}: {source}")]
    DirectoryWalk {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// Well-formed file with unusable content, such as two agents sharing a
    /// name or a task id that is not a string.
    #[error("Invalid configuration in {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
