use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use serde_json::Value;
use uuid::Uuid;

use billed_core::{BillId, BillRecord, BillStatus, display_file_name};
use billed_store::error::StoreError;
use billed_store::store::{
    BillsResource, CreatedAttachment, RequestHeaders, Store, UploadPayload,
};

/// A receipt kept by the in-memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// In-memory [`Store`] backed by [`DashMap`]s.
///
/// Uploads create a pending draft bill under a fresh UUID key; updates merge
/// the submitted fields into the draft. The async trait methods return
/// immediately.
#[derive(Debug, Default)]
pub struct MemoryBillStore {
    bills: DashMap<BillId, BillRecord>,
    files: DashMap<String, StoredFile>,
}

impl MemoryBillStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `bills`.
    ///
    /// Bills without an id are given one.
    pub fn with_bills(bills: impl IntoIterator<Item = BillRecord>) -> Self {
        let store = Self::new();
        for mut bill in bills {
            let id = bill.id.clone().unwrap_or_else(new_key);
            bill.id = Some(id.clone());
            store.bills.insert(id, bill);
        }
        store
    }

    /// The bill stored under `id`.
    pub fn get(&self, id: &BillId) -> Option<BillRecord> {
        self.bills.get(id).map(|bill| bill.clone())
    }

    /// The receipt stored at `file_path`.
    pub fn file(&self, file_path: &str) -> Option<StoredFile> {
        self.files.get(file_path).map(|file| file.clone())
    }

    /// Number of bills, drafts included.
    pub fn len(&self) -> usize {
        self.bills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bills.is_empty()
    }
}

fn new_key() -> BillId {
    BillId::new(Uuid::new_v4().simple().to_string())
}

impl Store for MemoryBillStore {
    fn bills(&self) -> &dyn BillsResource {
        self
    }
}

#[async_trait]
impl BillsResource for MemoryBillStore {
    async fn list(&self) -> Result<Vec<BillRecord>, StoreError> {
        Ok(self.bills.iter().map(|entry| entry.value().clone()).collect())
    }

    async fn create(
        &self,
        payload: UploadPayload,
        _headers: RequestHeaders,
    ) -> Result<CreatedAttachment, StoreError> {
        let key = new_key();
        let file_name = display_file_name(&payload.file.file_name).to_owned();
        let file_path = format!("public/{key}/{file_name}");

        let draft = BillRecord {
            id: Some(key.clone()),
            email: payload.field_value("email").unwrap_or_default().to_owned(),
            file_url: Some(format!("/{file_path}")),
            file_name: Some(file_name.clone()),
            status: BillStatus::Pending.as_str().to_owned(),
            ..BillRecord::default()
        };

        self.files.insert(
            file_path.clone(),
            StoredFile {
                file_name,
                content_type: payload.file.content_type,
                data: payload.file.data,
            },
        );
        self.bills.insert(key.clone(), draft);

        Ok(CreatedAttachment { file_path, key })
    }

    async fn update(
        &self,
        data: String,
        selector: Option<&BillId>,
    ) -> Result<Value, StoreError> {
        let key = selector.ok_or_else(|| StoreError::NotFound("no bill selector".into()))?;

        let submitted: Value = serde_json::from_str(&data)
            .map_err(|e| StoreError::Deserialization(e.to_string()))?;
        let Value::Object(submitted) = submitted else {
            return Err(StoreError::Deserialization(
                "bill update must be a JSON object".into(),
            ));
        };

        let mut entry = self
            .bills
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;

        let mut merged = serde_json::to_value(&*entry)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        if let Value::Object(fields) = &mut merged {
            fields.extend(submitted);
            fields.insert("id".into(), Value::String(key.to_string()));
        }

        let updated: BillRecord = serde_json::from_value(merged.clone())
            .map_err(|e| StoreError::Deserialization(e.to_string()))?;
        *entry = updated;

        Ok(merged)
    }
}
