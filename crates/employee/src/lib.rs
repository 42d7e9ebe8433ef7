//! Employee-facing expense-report pipelines.
//!
//! - [`BillList`] fetches, orders and formats the bills of the list view.
//! - [`AttachmentUploader`] validates a chosen receipt and uploads it as soon
//!   as it is selected, recording the result on the [`NewBillForm`].
//! - [`NewBillSubmission`] maps the form into a bill and persists it under
//!   the key returned by the upload, then navigates back to the list.
//!
//! The uploader and the submission never talk to each other directly; the
//! form's attachment slot is the only state they share.

pub mod bills;
pub mod error;
pub mod form;
pub mod navigation;
pub mod submit;
pub mod upload;

pub use bills::{BillList, project_bill, sort_by_date_desc};
pub use error::EmployeeError;
pub use form::{FileInput, FormFields, NewBillForm};
pub use navigation::{Navigator, ReceiptPreview};
pub use submit::{NewBillSubmission, SubmissionOutcome, SubmissionState};
pub use upload::{AttachmentUploader, FileSelection, INVALID_FILE_MESSAGE, UploadPolicy};
