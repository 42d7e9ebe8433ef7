//! Mapping of HTTP failures onto [`StoreError`].

use billed_store::StoreError;

/// Classify a transport-level reqwest failure.
pub(crate) fn transport(err: &reqwest::Error) -> StoreError {
    if err.is_decode() {
        StoreError::Deserialization(err.to_string())
    } else if err.is_builder() {
        StoreError::Configuration(err.to_string())
    } else {
        StoreError::Connection(err.to_string())
    }
}

/// Turn a non-success response into [`StoreError::Http`], keeping the body
/// text as the message when there is one.
pub(crate) async fn from_response(response: reqwest::Response) -> StoreError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("unknown status").to_owned()
    } else {
        body
    };
    StoreError::Http {
        status: status.as_u16(),
        message,
    }
}
