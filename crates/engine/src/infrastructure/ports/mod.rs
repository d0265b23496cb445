//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - The dialogue proxy (could swap HTTP -> in-process model)
//! - Save slots (could swap JSON files -> SQLite)

mod error;
mod external;

pub use error::{SaveError, TransportError};
pub use external::{NpcTalkPort, SaveStorePort};

#[cfg(test)]
pub use external::{MockNpcTalkPort, MockSaveStorePort};
