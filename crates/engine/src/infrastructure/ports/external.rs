//! External service port traits (dialogue proxy, save slot storage).

use async_trait::async_trait;
use daytalk_domain::GameState;

use super::error::{SaveError, TransportError};

/// Raw JSON transport to the NPC dialogue proxy.
///
/// Implementations POST `payload` and return the response body verbatim.
/// Timeouts are the implementation's concern and surface as
/// `TransportError::RequestFailed`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NpcTalkPort: Send + Sync {
    async fn post_json(&self, payload: serde_json::Value) -> Result<String, TransportError>;
}

/// Durable storage for one save slot.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SaveStorePort: Send + Sync {
    async fn save_all(&self, state: &GameState) -> Result<(), SaveError>;

    /// Missing data yields default state rather than an error.
    async fn load_all(&self) -> Result<GameState, SaveError>;
}
