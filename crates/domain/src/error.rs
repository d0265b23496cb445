//! Domain error type.
//!
//! Raised when building ids and value objects from untrusted text (save
//! files, HTTP paths, catalog JSON).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was blank or malformed
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// A label did not name any known variant
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// For `FromStr` impls whose input matches no variant.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
