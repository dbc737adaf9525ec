use thiserror::Error;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Error while encoding or decoding stored scenario data
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A record that was expected to exist is missing
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<serde_json::Error> for ComputeError {
    fn from(error: serde_json::Error) -> Self {
        ComputeError::Serialization(error.to_string())
    }
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
