use thiserror::Error;

/// Failure to turn a raw bill field into its display form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("invalid date: {0:?}")]
    InvalidDate(String),
}

/// Failure to read the current session from the key-value store.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No value is stored under the session key.
    #[error("no session stored under key {0:?}")]
    Missing(String),

    /// The stored value is not valid session JSON.
    #[error("malformed session: {0}")]
    Malformed(#[from] serde_json::Error),
}
