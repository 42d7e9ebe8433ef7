mod session;
mod store;

pub use session::MemorySessionStore;
pub use store::{MemoryBillStore, StoredFile};
