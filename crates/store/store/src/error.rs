use thiserror::Error;

/// Errors from bill store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network failure, DNS resolution, timeout, etc.
    #[error("connection error: {0}")]
    Connection(String),

    /// The store answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("bill not found: {0}")]
    NotFound(String),

    #[error("failed to serialize request: {0}")]
    Serialization(String),

    #[error("failed to deserialize response: {0}")]
    Deserialization(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl StoreError {
    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }

    /// Returns `true` for 404-class failures.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
