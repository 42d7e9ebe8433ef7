use std::cmp::Reverse;
use std::sync::Arc;

use tracing::{debug, warn};

use billed_core::{BillRecord, DisplayBill, Route, format_date, parse_timestamp};
use billed_store::{Store, StoreError};

use crate::navigation::{Navigator, ReceiptPreview};

/// The bill list view's data source.
pub struct BillList {
    store: Option<Arc<dyn Store>>,
    navigator: Arc<dyn Navigator>,
    preview: Option<Arc<dyn ReceiptPreview>>,
}

impl BillList {
    /// `store` may be absent, in which case [`fetch_bills`](Self::fetch_bills)
    /// is a no-op.
    pub fn new(store: Option<Arc<dyn Store>>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            preview: None,
        }
    }

    #[must_use]
    pub fn with_preview(mut self, preview: Arc<dyn ReceiptPreview>) -> Self {
        self.preview = Some(preview);
        self
    }

    /// Fetch every bill, most recent first, in display form.
    ///
    /// Returns `Ok(None)` when no store is configured. A failing `list` call
    /// is returned as is; a bill whose date cannot be formatted keeps its raw
    /// date and does not affect the others.
    pub async fn fetch_bills(&self) -> Result<Option<Vec<DisplayBill>>, StoreError> {
        let Some(store) = &self.store else {
            return Ok(None);
        };

        let mut bills = store.bills().list().await?;
        debug!(count = bills.len(), "fetched bills");

        sort_by_date_desc(&mut bills);
        Ok(Some(bills.into_iter().map(project_bill).collect()))
    }

    /// "New bill" button.
    pub fn on_new_bill_clicked(&self) {
        self.navigator.navigate(Route::NewBill);
    }

    /// Eye icon next to a bill: show its receipt.
    pub fn on_receipt_preview(&self, file_url: &str) {
        match &self.preview {
            Some(preview) => preview.open_preview(file_url),
            None => debug!(file_url, "no receipt preview configured"),
        }
    }
}

/// Order bills by raw date, most recent first.
///
/// Dates compare as instants: time of day and UTC offsets count, and a bare
/// calendar date is midnight UTC. Bills whose date does not parse come after
/// every dated bill, in their original relative order.
pub fn sort_by_date_desc(bills: &mut [BillRecord]) {
    // `None` sorts below every date, so reversing puts undated bills last.
    bills.sort_by_cached_key(|bill| Reverse(parse_timestamp(&bill.date).ok()));
}

/// Project a bill for display. Never fails: an unformattable date is logged
/// and kept raw.
pub fn project_bill(bill: BillRecord) -> DisplayBill {
    match format_date(&bill.date) {
        Ok(label) => DisplayBill::formatted(bill, label),
        Err(e) => {
            warn!(
                error = %e,
                bill_id = bill.id.as_deref().unwrap_or("<none>"),
                bill = ?bill,
                "keeping raw date for bill"
            );
            DisplayBill::with_raw_date(bill)
        }
    }
}
