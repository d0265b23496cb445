//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod json_save;
pub mod npc_catalog;
pub mod npc_proxy;
pub mod ports;
pub mod settings;
