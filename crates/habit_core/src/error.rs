use thiserror::Error;

pub type StorageResult<T> = core::result::Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid storage key `{0}`")]
    InvalidKey(String),
    #[error("invalid storage configuration: {0}")]
    InvalidConfig(String),
}
