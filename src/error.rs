use thiserror::Error;

/// Result type alias used across the crate
pub type Result<T> = std::result::Result<T, AppError>;

/// Errors that can occur while talking to the recipe backend or local storage
#[derive(Error, Debug)]
pub enum AppError {
    /// Failed to reach the backend
    #[error("Request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Requested recipe or user does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller supplied something the operation cannot accept
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation needs a logged-in user
    #[error("You need to log in first")]
    NotAuthenticated,

    /// Persisted data could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Every configured recipe source failed
    #[error("All recipe sources failed:\n{0}")]
    AllSourcesFailed(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
