//! HTTP request bodies.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalkRequest {
    pub input: String,
    /// Spend this block's major action when the turn succeeds.
    #[serde(default)]
    pub consume_major_action: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosePlaceRequest {
    #[serde(default)]
    pub as_major_action: bool,
}
