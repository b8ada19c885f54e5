//! Error handling module for registry credential rendering

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CredsError>;

#[derive(Error, Debug)]
pub enum CredsError {
    /// Invalid construction input, e.g. an ECR registry without repositories
    #[error("Validation error: {0}")]
    Validation(String),
    /// Invalid command-line configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Credential config serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
