use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Key under which the signed-in user is stored.
pub const USER_KEY: &str = "user";

/// Synchronous string key-value storage holding the session.
pub trait SessionStore: Send + Sync {
    /// Value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str);

    /// Remove `key`. Missing keys are ignored.
    fn remove_item(&self, key: &str);
}

/// The signed-in employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    /// Account type (`"Employee"` or `"Admin"`), when recorded.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
}

impl Session {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            user_type: None,
        }
    }

    /// Read the session currently held by `store`.
    ///
    /// Nothing is cached: every call reflects the store's value at that
    /// moment.
    pub fn current(store: &dyn SessionStore) -> Result<Self, SessionError> {
        let raw = store
            .get_item(USER_KEY)
            .ok_or_else(|| SessionError::Missing(USER_KEY.to_owned()))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this session into `store`.
    pub fn save(&self, store: &dyn SessionStore) -> Result<(), SessionError> {
        store.set_item(USER_KEY, &serde_json::to_string(self)?);
        Ok(())
    }
}
