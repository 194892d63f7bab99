use crate::generator::{ConfigurationError, GeneratorError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    #[error("Run task failed: {0}")]
    TaskFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
