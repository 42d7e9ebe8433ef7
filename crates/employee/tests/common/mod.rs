#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use billed_core::{BillId, BillRecord, Route};
use billed_employee::{Navigator, ReceiptPreview};
use billed_store::{
    BillsResource, CreatedAttachment, RequestHeaders, Store, StoreError, UploadPayload,
};

// -- Scripted store -------------------------------------------------------

/// Canned answer for one `create` call.
pub enum CreateReply {
    Ok {
        file_path: &'static str,
        key: &'static str,
        delay: Duration,
    },
    Fail(u16),
}

impl CreateReply {
    pub fn ok(file_path: &'static str, key: &'static str) -> Self {
        Self::Ok {
            file_path,
            key,
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(file_path: &'static str, key: &'static str, delay: Duration) -> Self {
        Self::Ok {
            file_path,
            key,
            delay,
        }
    }
}

fn http_error(status: u16) -> StoreError {
    StoreError::Http {
        status,
        message: format!("Erreur {status}"),
    }
}

/// A store that answers from a script and records every call.
#[derive(Default)]
pub struct ScriptedStore {
    bills: Vec<BillRecord>,
    list_failure: Option<u16>,
    update_failure: Option<u16>,
    create_replies: Mutex<VecDeque<CreateReply>>,

    pub list_calls: Mutex<usize>,
    pub creates: Mutex<Vec<(UploadPayload, RequestHeaders)>>,
    pub updates: Mutex<Vec<(String, Option<BillId>)>>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bills(mut self, bills: Vec<BillRecord>) -> Self {
        self.bills = bills;
        self
    }

    pub fn failing_list(mut self, status: u16) -> Self {
        self.list_failure = Some(status);
        self
    }

    pub fn failing_update(mut self, status: u16) -> Self {
        self.update_failure = Some(status);
        self
    }

    pub fn with_create_replies(self, replies: impl IntoIterator<Item = CreateReply>) -> Self {
        self.create_replies.lock().unwrap().extend(replies);
        self
    }

    pub fn create_count(&self) -> usize {
        self.creates.lock().unwrap().len()
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }
}

impl Store for ScriptedStore {
    fn bills(&self) -> &dyn BillsResource {
        self
    }
}

#[async_trait]
impl BillsResource for ScriptedStore {
    async fn list(&self) -> Result<Vec<BillRecord>, StoreError> {
        *self.list_calls.lock().unwrap() += 1;
        match self.list_failure {
            Some(status) => Err(http_error(status)),
            None => Ok(self.bills.clone()),
        }
    }

    async fn create(
        &self,
        payload: UploadPayload,
        headers: RequestHeaders,
    ) -> Result<CreatedAttachment, StoreError> {
        self.creates.lock().unwrap().push((payload, headers));
        let reply = self
            .create_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| CreateReply::ok("public/receipt.png", "1234"));

        match reply {
            CreateReply::Ok {
                file_path,
                key,
                delay,
            } => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(CreatedAttachment {
                    file_path: file_path.to_owned(),
                    key: key.into(),
                })
            }
            CreateReply::Fail(status) => Err(http_error(status)),
        }
    }

    async fn update(
        &self,
        data: String,
        selector: Option<&BillId>,
    ) -> Result<serde_json::Value, StoreError> {
        self.updates
            .lock()
            .unwrap()
            .push((data, selector.cloned()));
        match self.update_failure {
            Some(status) => Err(http_error(status)),
            None => Ok(serde_json::json!({})),
        }
    }
}

// -- Recording collaborators ----------------------------------------------

#[derive(Default)]
pub struct RecordingNavigator {
    pub routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

#[derive(Default)]
pub struct RecordingPreview {
    pub opened: Mutex<Vec<String>>,
}

impl ReceiptPreview for RecordingPreview {
    fn open_preview(&self, file_url: &str) {
        self.opened.lock().unwrap().push(file_url.to_owned());
    }
}

// -- Fixtures -------------------------------------------------------------

pub fn bill(id: &str, date: &str, status: &str) -> BillRecord {
    BillRecord {
        id: Some(id.into()),
        email: "a@a".into(),
        expense_type: "Hôtel et logement".into(),
        name: format!("bill {id}"),
        amount: Some(400),
        date: date.into(),
        vat: "80".into(),
        commentary: Some("séminaire billed".into()),
        file_url: Some(format!("https://test.storage.tld/{id}.jpg")),
        file_name: Some(format!("{id}.jpg")),
        status: status.into(),
        ..BillRecord::default()
    }
}

pub fn fixture_bills() -> Vec<BillRecord> {
    vec![
        bill("47qAXb6fIm2zOKkLzMro", "2004-04-04", "pending"),
        bill("BeKy5Mo4jkmdfPGYpTxZ", "2001-01-01", "refused"),
        bill("UIUZtnPQvnbFnB0ozvJh", "2003-03-03", "accepted"),
        bill("qcCK3SzECmaZAGRrHjaC", "2002-02-02", "refused"),
    ]
}
