use serde::{Deserialize, Serialize};

use crate::types::BillId;

/// Remote location of an uploaded receipt, retained until the form that
/// uploaded it is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentReference {
    /// Path usable as a URL, always rooted at `/`.
    pub file_url: String,
    /// File name shown to the employee.
    pub file_name: String,
    /// Identifier of the draft bill created by the upload.
    pub key: BillId,
}

impl AttachmentReference {
    /// Build a reference from an upload response.
    pub fn from_upload(file_path: &str, key: BillId, file_name: impl Into<String>) -> Self {
        Self {
            file_url: format!("/{}", file_path.trim_start_matches('/')),
            file_name: file_name.into(),
            key,
        }
    }
}

/// Last path segment of a file input value.
///
/// Browsers report `C:\fakepath\receipt.png`; both `\` and `/` separate
/// segments.
pub fn display_file_name(input_value: &str) -> &str {
    input_value
        .rsplit(['\\', '/'])
        .next()
        .unwrap_or(input_value)
}
