//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.
//! Use cases orchestrate the time loop, game state and ports to fulfill
//! user stories.

pub mod conversation;
pub mod place;
pub mod session;
pub mod time;

pub use conversation::ConversationUseCases;
pub use place::PlaceEvents;
pub use session::GameSession;
pub use time::{TimeScheduler, Transition};
