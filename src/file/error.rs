//! Error types for file parsing and loading.

use thiserror::Error;

/// Errors that can occur while loading or parsing a Flagpole file.
#[derive(Debug, Error)]
pub enum FlagpoleError {
    /// The text is not valid YAML, or does not fit the Flagpole schema.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error while reading a file from disk.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
