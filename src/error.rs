use thiserror::Error;

#[derive(Debug, Error)]
pub enum TuneGenError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Synthesis error: {0}")]
    SynthesisError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("AWS error: {0}")]
    AwsError(String),
    #[error("AWS service error: {0}")]
    AwsServiceError(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for TuneGenError {
    fn from(e: serde_json::Error) -> Self {
        TuneGenError::SerializationError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TuneGenError>;
