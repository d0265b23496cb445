//! Static game entities authored outside of play.

mod npc_definition;
mod place;

pub use npc_definition::NpcDefinition;
pub use place::PlaceId;
