use std::sync::{Mutex, PoisonError};

use billed_core::{AttachmentReference, BillRecord, BillStatus, DEFAULT_PCT, parse_int};
use billed_store::UploadFile;

/// The receipt file input of the new-bill form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInput {
    value: String,
    file: Option<UploadFile>,
    validation_message: String,
    reports: u32,
}

impl FileInput {
    /// An input with nothing selected.
    pub fn empty() -> Self {
        Self::default()
    }

    /// An input holding `file`; `value` is what the browser reports as the
    /// input's value (usually `C:\fakepath\<name>`).
    pub fn with_file(value: impl Into<String>, file: UploadFile) -> Self {
        Self {
            value: value.into(),
            file: Some(file),
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn file(&self) -> Option<&UploadFile> {
        self.file.as_ref()
    }

    /// Set the message shown when the input is invalid; empty means valid.
    pub fn set_custom_validity(&mut self, message: impl Into<String>) {
        self.validation_message = message.into();
    }

    pub fn validation_message(&self) -> &str {
        &self.validation_message
    }

    pub fn is_valid(&self) -> bool {
        self.validation_message.is_empty()
    }

    /// Surface the validity message to the user. Returns whether the input is
    /// valid.
    pub fn report_validity(&mut self) -> bool {
        self.reports += 1;
        self.is_valid()
    }

    /// How many times the validity was reported.
    pub fn report_count(&self) -> u32 {
        self.reports
    }

    /// Drop the selection.
    pub fn clear(&mut self) {
        self.value.clear();
        self.file = None;
    }
}

/// Text values of the new-bill form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    /// `expense-type`
    pub expense_type: String,
    /// `expense-name`
    pub expense_name: String,
    /// `amount`
    pub amount: String,
    /// `datepicker`
    pub date: String,
    /// `vat`
    pub vat: String,
    /// `pct`
    pub pct: String,
    /// `commentary`
    pub commentary: String,
}

impl FormFields {
    /// Set a field by its form identifier. Returns `false` for unknown
    /// identifiers.
    pub fn set(&mut self, field_id: &str, value: impl Into<String>) -> bool {
        let slot = match field_id {
            "expense-type" => &mut self.expense_type,
            "expense-name" => &mut self.expense_name,
            "amount" => &mut self.amount,
            "datepicker" => &mut self.date,
            "vat" => &mut self.vat,
            "pct" => &mut self.pct,
            "commentary" => &mut self.commentary,
            _ => return false,
        };
        *slot = value.into();
        true
    }

    /// Build the bill to persist.
    ///
    /// `amount` keeps only its leading integer and is `None` when there is
    /// none. `pct` falls back to [`DEFAULT_PCT`] when it is empty, not a
    /// number, or zero.
    pub fn to_bill(&self, email: &str, attachment: Option<&AttachmentReference>) -> BillRecord {
        BillRecord {
            id: None,
            email: email.to_owned(),
            expense_type: self.expense_type.clone(),
            name: self.expense_name.clone(),
            amount: parse_int(&self.amount),
            date: self.date.clone(),
            vat: self.vat.clone(),
            pct: parse_int(&self.pct)
                .filter(|pct| *pct != 0)
                .unwrap_or(DEFAULT_PCT),
            commentary: Some(self.commentary.clone()),
            file_url: attachment.map(|a| a.file_url.clone()),
            file_name: attachment.map(|a| a.file_name.clone()),
            status: BillStatus::Pending.as_str().to_owned(),
            extra: serde_json::Map::new(),
        }
    }
}

/// State of one new-bill form instance.
///
/// Holds the attachment slot written by the uploader and read at
/// submission. Each completed upload replaces the slot; a failed one leaves
/// it alone.
#[derive(Debug, Default)]
pub struct NewBillForm {
    attachment: Mutex<Option<AttachmentReference>>,
}

impl NewBillForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// The receipt of the most recently completed upload.
    pub fn attachment(&self) -> Option<AttachmentReference> {
        self.attachment
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Record a completed upload.
    pub fn attach(&self, reference: AttachmentReference) {
        *self
            .attachment
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(reference);
    }
}
