use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PublishError>;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Missing identifier: no `id:` line found in plugin header")]
    MissingIdentifier,

    #[error(
        "Cannot classify {}: no kind override and no pipes/filters/tools directory in path",
        path.display()
    )]
    ClassificationFailure { path: PathBuf },

    #[error("Transport error: {0}")]
    TransportFailure(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to read {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Registry rejected {id} with status {status}")]
    RegistryRejected { id: String, status: u16 },
}

impl PublishError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        PublishError::ConfigError(msg.into())
    }

    pub fn classification_failure(path: impl Into<PathBuf>) -> Self {
        PublishError::ClassificationFailure { path: path.into() }
    }

    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PublishError::ReadError {
            path: path.into(),
            source,
        }
    }
}
