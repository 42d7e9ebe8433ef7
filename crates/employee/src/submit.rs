use std::sync::Arc;

use tracing::{error, info, warn};

use billed_core::{BillRecord, Route, Session, SessionStore};
use billed_store::{Store, StoreError};

use crate::error::EmployeeError;
use crate::form::{FormFields, NewBillForm};
use crate::navigation::Navigator;

/// Progress of one submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Completed,
    Failed,
}

impl SubmissionState {
    /// Move to `next`. Only `Idle → Submitting → {Completed, Failed}` is
    /// allowed.
    pub fn transition(self, next: Self) -> Result<Self, EmployeeError> {
        match (self, next) {
            (Self::Idle, Self::Submitting)
            | (Self::Submitting, Self::Completed | Self::Failed) => Ok(next),
            (from, to) => Err(EmployeeError::InvalidTransition { from, to }),
        }
    }
}

/// What happened to a submission attempt.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub state: SubmissionState,
    /// The bill that was sent, or would have been.
    pub bill: BillRecord,
    /// The store's rejection when `state` is [`SubmissionState::Failed`].
    pub error: Option<StoreError>,
}

/// Persists the new-bill form.
pub struct NewBillSubmission {
    store: Option<Arc<dyn Store>>,
    sessions: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl NewBillSubmission {
    pub fn new(
        store: Option<Arc<dyn Store>>,
        sessions: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            store,
            sessions,
            navigator,
        }
    }

    /// Submit the form.
    ///
    /// The bill is sent as an update of the draft created by the latest
    /// upload; the call goes out even when no upload has completed. Success
    /// navigates to the bill list. A store rejection is logged and reported
    /// as [`SubmissionState::Failed`] without navigating. Without a store the
    /// attempt stays [`SubmissionState::Idle`].
    pub async fn on_submit(
        &self,
        fields: &FormFields,
        form: &NewBillForm,
    ) -> Result<SubmissionOutcome, EmployeeError> {
        let session = Session::current(self.sessions.as_ref())?;
        let attachment = form.attachment();
        let bill = fields.to_bill(&session.email, attachment.as_ref());

        let state = SubmissionState::Idle;
        let Some(store) = &self.store else {
            warn!("no store configured, bill not submitted");
            return Ok(SubmissionOutcome {
                state,
                bill,
                error: None,
            });
        };

        let key = attachment.map(|a| a.key);
        if key.is_none() {
            warn!("submitting bill before any receipt upload completed");
        }

        let data = serde_json::to_string(&bill)?;
        let state = state.transition(SubmissionState::Submitting)?;

        match store.bills().update(data, key.as_ref()).await {
            Ok(_) => {
                let state = state.transition(SubmissionState::Completed)?;
                info!(key = key.as_deref().unwrap_or("<none>"), "bill submitted");
                self.navigator.navigate(Route::Bills);
                Ok(SubmissionOutcome {
                    state,
                    bill,
                    error: None,
                })
            }
            Err(e) => {
                let state = state.transition(SubmissionState::Failed)?;
                error!(
                    error = %e,
                    key = key.as_deref().unwrap_or("<none>"),
                    "bill submission failed"
                );
                Ok(SubmissionOutcome {
                    state,
                    bill,
                    error: Some(e),
                })
            }
        }
    }
}
