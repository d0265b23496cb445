//! Daytalk domain: the day loop, NPC memory and game state.
//!
//! Pure types and invariants only. No I/O, no async, no clocks.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod reply_policy;
pub mod time_loop;
pub mod value_objects;

pub use aggregates::{GameState, NpcMemory, DEFAULT_MAX_TURNS};
pub use entities::{NpcDefinition, PlaceId};
pub use error::DomainError;
pub use events::TimeLoopEvent;
pub use ids::NpcId;
pub use reply_policy::{should_call_remote, REMOTE_TRIGGER_TERMS};
pub use time_loop::{TimeBlock, TimeLoop, TimeLoopRefusal, TimeLoopSnapshot, DEFAULT_END_DAY};
pub use value_objects::{DialogueTurn, FlagEntry, Speaker, WorldState};
