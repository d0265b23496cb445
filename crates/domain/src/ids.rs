use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Authoring key of an NPC (e.g. `"yoonseo"`).
///
/// Unlike generated ids these are chosen by content authors, so the only
/// invariant is that the key is not blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NpcId(String);

impl NpcId {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::invalid_id("NPC id cannot be blank"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for NpcId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NpcId> for String {
    fn from(value: NpcId) -> Self {
        value.0
    }
}

impl AsRef<str> for NpcId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
