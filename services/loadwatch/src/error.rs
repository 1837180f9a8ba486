//! Error types for the loadwatch service

/// Errors that can occur in the loadwatch service
#[derive(Debug, thiserror::Error)]
pub enum LoadwatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("API error: status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Socket error: {0}")]
    Socket(String),

    #[error("Unknown charge mode: {0}")]
    UnknownMode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for loadwatch operations
pub type Result<T> = std::result::Result<T, LoadwatchError>;
