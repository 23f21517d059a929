//! Config loading failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file exists in the stack but could not be read.
    #[error("cannot read config file {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Resolving the working directory failed.
    #[error("config path error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config is not valid JSON5: {0}")]
    ParseFailed(#[from] json5::Error),
    /// The merged document does not fit `CogmyraConfig`.
    #[error("config does not match the model: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// `path` is `layer:dotted.key`.
    #[error("invalid config field {path}: {message}")]
    InvalidField { path: String, message: String },
    #[error("invalid config: {0}")]
    Invalid(String),
}
