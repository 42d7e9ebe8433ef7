use thiserror::Error;

use billed_core::SessionError;

use crate::submit::SubmissionState;

/// Errors surfaced by the employee pipelines.
///
/// Upload and update failures are absorbed into
/// [`FileSelection::UploadFailed`](crate::FileSelection::UploadFailed) and
/// [`SubmissionState::Failed`]; only failures the pipelines do not recover
/// from end up here.
#[derive(Debug, Error)]
pub enum EmployeeError {
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("failed to serialize bill: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid submission transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: SubmissionState,
        to: SubmissionState,
    },
}
