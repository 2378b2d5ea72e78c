//! Error types for subfetch.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for subfetch.
#[derive(Error, Debug)]
pub enum Error {
    // Option errors
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Unknown language code: {0}")]
    UnknownLanguage(String),

    // File system errors
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("File already exists: {0}")]
    FileAlreadyExists(String),

    // Catalog errors
    #[error("Catalog call failed: {0}")]
    Network(String),

    #[error("Catalog response could not be matched: {0}")]
    Correlation(String),

    #[error("Subtitle payload could not be decoded: {0}")]
    Decode(String),

    // Configuration errors
    #[error("Invalid config file: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Whether this error came from the remote catalog rather than the local machine.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Http(_) | Error::Json(_))
    }
}
