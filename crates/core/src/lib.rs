pub mod attachment;
pub mod bill;
pub mod error;
pub mod format;
pub mod parse;
pub mod route;
pub mod session;
pub mod types;

pub use attachment::{AttachmentReference, display_file_name};
pub use bill::{BillRecord, BillStatus, DEFAULT_PCT, DisplayBill};
pub use error::{FormatError, SessionError};
pub use format::{format_date, format_status, parse_date, parse_timestamp};
pub use parse::parse_int;
pub use route::Route;
pub use session::{Session, SessionStore, USER_KEY};
pub use types::BillId;
