//! Global world state shared by every NPC conversation.

use serde::{Deserialize, Serialize};

use crate::time_loop::{TimeBlock, TimeLoop};

/// Current day and time-of-day label.
///
/// `time_slot` is kept as a free label rather than a `TimeBlock` because save
/// files written by older builds may carry labels the loop does not know;
/// those still load and simply fall back to default dialogue text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldState {
    pub day: u32,
    pub time_slot: String,
}

impl Default for WorldState {
    fn default() -> Self {
        Self {
            day: 1,
            time_slot: TimeBlock::Morning.slot_label().to_string(),
        }
    }
}

impl WorldState {
    pub fn new(day: u32, time_slot: impl Into<String>) -> Self {
        Self {
            day: day.max(1),
            time_slot: time_slot.into(),
        }
    }

    /// Copy day and block label from the authoritative time loop.
    pub fn sync_from(&mut self, time_loop: &TimeLoop) {
        self.day = time_loop.day();
        self.time_slot = time_loop.current_block().slot_label().to_string();
    }

    /// The block this label names, if it is a known one.
    pub fn time_block(&self) -> Option<TimeBlock> {
        self.time_slot.parse().ok()
    }
}
