use dashmap::DashMap;

use billed_core::{Session, SessionError, SessionStore};

/// In-memory [`SessionStore`] backed by a [`DashMap`].
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    items: DashMap<String, String>,
}

impl MemorySessionStore {
    /// Create a new, empty session store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `session`.
    pub fn with_session(session: &Session) -> Result<Self, SessionError> {
        let store = Self::new();
        session.save(&store)?;
        Ok(store)
    }
}

impl SessionStore for MemorySessionStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).map(|value| value.clone())
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items.insert(key.to_owned(), value.to_owned());
    }

    fn remove_item(&self, key: &str) {
        self.items.remove(key);
    }
}
