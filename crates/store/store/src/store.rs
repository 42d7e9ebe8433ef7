use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use billed_core::{BillId, BillRecord};

use crate::error::StoreError;

/// Remote persistence for bills.
///
/// Implementations must be `Send + Sync` and safe for concurrent access.
pub trait Store: Send + Sync {
    /// The `bills` resource.
    fn bills(&self) -> &dyn BillsResource;
}

/// Operations on the `bills` resource.
#[async_trait]
pub trait BillsResource: Send + Sync {
    /// Every bill visible to the current session, in no particular order.
    async fn list(&self) -> Result<Vec<BillRecord>, StoreError>;

    /// Upload a receipt. The store creates a draft bill and returns its key
    /// together with the path of the stored file.
    async fn create(
        &self,
        payload: UploadPayload,
        headers: RequestHeaders,
    ) -> Result<CreatedAttachment, StoreError>;

    /// Replace the bill identified by `selector` with the serialized record
    /// in `data`.
    ///
    /// `selector` is `None` when no upload has completed yet; backends decide
    /// how to answer such a request.
    async fn update(
        &self,
        data: String,
        selector: Option<&BillId>,
    ) -> Result<serde_json::Value, StoreError>;
}

/// Header hints attached to a store request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestHeaders {
    /// Send the body as-is instead of declaring a JSON content type. Set for
    /// multipart uploads, whose encoder supplies its own boundary header.
    pub no_content_type: bool,
}

impl RequestHeaders {
    /// Headers for a body that must not be content-type negotiated.
    pub fn raw_body() -> Self {
        Self {
            no_content_type: true,
        }
    }
}

/// A file part of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    /// MIME type if known (e.g. `"image/png"`).
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            data: data.into(),
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Multipart upload body: one `file` part plus text fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPayload {
    pub file: UploadFile,
    pub fields: Vec<(String, String)>,
}

impl UploadPayload {
    pub fn new(file: UploadFile) -> Self {
        Self {
            file,
            fields: Vec::new(),
        }
    }

    /// Append a text field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// First value of the text field `name`.
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Answer to a receipt upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAttachment {
    /// Path of the stored file, relative to the store root.
    #[serde(alias = "fileUrl")]
    pub file_path: String,
    /// Identifier of the draft bill.
    pub key: BillId,
}
