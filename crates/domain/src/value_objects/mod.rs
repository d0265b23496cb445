//! Value objects for dialogue and world state.

mod dialogue;
mod world_state;

pub use dialogue::{DialogueTurn, FlagEntry, Speaker};
pub use world_state::WorldState;
