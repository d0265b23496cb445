//! Domain Events
//!
//! Events returned by aggregate mutations, describing what changed once the
//! new state is already committed. The engine republishes them to
//! subscribers (HUD, logging) after the mutation returns.

use serde::{Deserialize, Serialize};

use crate::time_loop::TimeBlock;

/// Notification emitted by the time loop after a committed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimeLoopEvent {
    DayChanged { day: u32 },
    TimeBlockChanged { block: TimeBlock },
    MajorActionUsedChanged { used: bool },
    EventLockChanged { locked: bool },
    /// The night ended; the player character is sent back home.
    ForcedReturnHome,
}
