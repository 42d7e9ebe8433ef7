use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Store-assigned bill identifier. The upload step returns it as the `key`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillId(String);

impl BillId {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for BillId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BillId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl Deref for BillId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BillId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
