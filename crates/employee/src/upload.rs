use std::sync::Arc;

use tracing::{debug, error, info};

use billed_core::{AttachmentReference, Session, SessionStore, display_file_name};
use billed_store::{RequestHeaders, Store, UploadPayload};

use crate::error::EmployeeError;
use crate::form::{FileInput, NewBillForm};

/// Message shown when a receipt has a disallowed extension.
pub const INVALID_FILE_MESSAGE: &str = "Seuls les fichiers jpg, jpeg et png sont autorisés.";

/// Which receipt files may be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    allowed_extensions: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(["jpg", "jpeg", "png"])
    }
}

impl UploadPolicy {
    /// Allow the given extensions, compared case-insensitively. A leading dot
    /// is optional.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
        }
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    /// Whether `file_name` ends in one of the allowed extensions.
    pub fn admits(&self, file_name: &str) -> bool {
        let lower = file_name.to_ascii_lowercase();
        self.allowed_extensions.iter().any(|ext| {
            lower
                .strip_suffix(ext.as_str())
                .is_some_and(|stem| stem.ends_with('.'))
        })
    }
}

/// Result of selecting a receipt file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelection {
    /// The input holds no file.
    Empty,
    /// The extension is not allowed; the input was cleared and nothing was
    /// uploaded.
    Rejected,
    /// The receipt was uploaded and attached to the form.
    Uploaded(AttachmentReference),
    /// The upload failed; the form's previous attachment is unchanged.
    UploadFailed,
}

/// Validates receipt files and uploads them as soon as they are selected.
pub struct AttachmentUploader {
    store: Arc<dyn Store>,
    sessions: Arc<dyn SessionStore>,
    policy: UploadPolicy,
}

impl AttachmentUploader {
    pub fn new(store: Arc<dyn Store>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            sessions,
            policy: UploadPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Handle a change of the receipt input.
    ///
    /// The session is read first; a missing or malformed session is the only
    /// error returned. A rejected file clears `input`. A successful upload
    /// is recorded on `form`.
    pub async fn on_file_selected(
        &self,
        input: &mut FileInput,
        form: &NewBillForm,
    ) -> Result<FileSelection, EmployeeError> {
        let session = Session::current(self.sessions.as_ref())?;

        let Some(file) = input.file().cloned() else {
            debug!("file input changed without a file");
            return Ok(FileSelection::Empty);
        };

        if !self.policy.admits(&file.file_name) {
            info!(file_name = %file.file_name, "rejected receipt with disallowed extension");
            input.set_custom_validity(INVALID_FILE_MESSAGE);
            input.report_validity();
            input.clear();
            return Ok(FileSelection::Rejected);
        }
        input.set_custom_validity("");

        let file_name = display_file_name(input.value()).to_owned();
        let payload = UploadPayload::new(file).field("email", session.email);

        match self
            .store
            .bills()
            .create(payload, RequestHeaders::raw_body())
            .await
        {
            Ok(created) => {
                let reference =
                    AttachmentReference::from_upload(&created.file_path, created.key, file_name);
                info!(
                    file_url = %reference.file_url,
                    key = %reference.key,
                    "receipt uploaded"
                );
                form.attach(reference.clone());
                Ok(FileSelection::Uploaded(reference))
            }
            Err(e) => {
                error!(error = %e, file_name = %file_name, "receipt upload failed");
                Ok(FileSelection::UploadFailed)
            }
        }
    }
}
