//! Aggregates own the mutable game state and enforce its invariants.

pub mod game_state;
pub mod npc_memory;

pub use game_state::GameState;
pub use npc_memory::{NpcMemory, DEFAULT_MAX_TURNS};
