use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The database could not be opened or a connection could not be acquired.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<serde_json::Error> for ApplicationError {
    fn from(error: serde_json::Error) -> Self {
        ApplicationError::Serialization(error.to_string())
    }
}
