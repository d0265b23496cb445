//! Day loop state machine.
//!
//! A day runs Morning → Day → Evening → Night, then wraps to the next day's
//! Morning. Two guards ride on top of the block:
//!
//! - one major action per block (never at Night), reset on every block entry
//! - an event lock that forbids any block transition while a scene or
//!   dialogue is running
//!
//! Consuming the major action never advances the block; advancing is always
//! an explicit call.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::events::TimeLoopEvent;

/// Last playable day when none is configured.
pub const DEFAULT_END_DAY: u32 = 30;

// =============================================================================
// Time Block
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBlock {
    Morning,
    Day,
    Evening,
    Night,
}

impl TimeBlock {
    pub fn display_name(&self) -> &'static str {
        match self {
            TimeBlock::Morning => "Morning",
            TimeBlock::Day => "Day",
            TimeBlock::Evening => "Evening",
            TimeBlock::Night => "Night",
        }
    }

    /// Label stored in `WorldState::time_slot` and sent to the dialogue proxy.
    pub fn slot_label(&self) -> &'static str {
        match self {
            TimeBlock::Morning => "morning",
            TimeBlock::Day => "afternoon",
            TimeBlock::Evening => "evening",
            TimeBlock::Night => "night",
        }
    }

    /// Returns the next block in the daily cycle.
    pub fn next(&self) -> TimeBlock {
        match self {
            TimeBlock::Morning => TimeBlock::Day,
            TimeBlock::Day => TimeBlock::Evening,
            TimeBlock::Evening => TimeBlock::Night,
            TimeBlock::Night => TimeBlock::Morning,
        }
    }

    /// Returns all blocks in order.
    pub fn all() -> [TimeBlock; 4] {
        [
            TimeBlock::Morning,
            TimeBlock::Day,
            TimeBlock::Evening,
            TimeBlock::Night,
        ]
    }

    /// Major-action chances left in the day when this block starts fresh.
    fn chances_from_here(&self) -> u32 {
        match self {
            TimeBlock::Morning => 3,
            TimeBlock::Day => 2,
            TimeBlock::Evening => 1,
            TimeBlock::Night => 0,
        }
    }
}

impl std::fmt::Display for TimeBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for TimeBlock {
    type Err = DomainError;

    /// Accepts both display names and slot labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(TimeBlock::Morning),
            "day" | "afternoon" => Ok(TimeBlock::Day),
            "evening" => Ok(TimeBlock::Evening),
            "night" => Ok(TimeBlock::Night),
            other => Err(DomainError::parse(format!("Unknown time block: {}", other))),
        }
    }
}

// =============================================================================
// Refusals
// =============================================================================

/// Why the time loop declined a request. These are ordinary gameplay
/// conditions; callers usually just report `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TimeLoopRefusal {
    #[error("time cannot advance while an event is in progress")]
    EventLocked,
    #[error("no major action is available at night")]
    NightHasNoMajorAction,
    #[error("the major action for this time block is already used")]
    MajorActionAlreadyUsed,
}

// =============================================================================
// Time Loop
// =============================================================================

/// Point-in-time view of the loop, suitable for HUDs and API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLoopSnapshot {
    pub day: u32,
    pub end_day: u32,
    pub block: TimeBlock,
    pub major_action_used: bool,
    pub event_locked: bool,
    pub remaining_major_actions: u32,
}

/// The day/time-block state machine.
///
/// # Invariants
///
/// - `1 <= day <= end_day`, and `day` never decreases
/// - `major_action_used` is false right after any block entry
/// - no block transition happens while `event_locked`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLoop {
    day: u32,
    end_day: u32,
    block: TimeBlock,
    major_action_used: bool,
    event_locked: bool,
}

impl Default for TimeLoop {
    fn default() -> Self {
        Self {
            day: 1,
            end_day: DEFAULT_END_DAY,
            block: TimeBlock::Morning,
            major_action_used: false,
            event_locked: false,
        }
    }
}

impl TimeLoop {
    /// Create a loop already initialized for a new game.
    pub fn new_game(start_day: u32, end_day: u32) -> Self {
        let mut time_loop = Self::default();
        time_loop.initialize_new_game(start_day, end_day);
        time_loop
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn day(&self) -> u32 {
        self.day
    }

    #[inline]
    pub fn end_day(&self) -> u32 {
        self.end_day
    }

    #[inline]
    pub fn current_block(&self) -> TimeBlock {
        self.block
    }

    #[inline]
    pub fn has_used_major_action(&self) -> bool {
        self.major_action_used
    }

    #[inline]
    pub fn is_event_locked(&self) -> bool {
        self.event_locked
    }

    /// Major actions still available today, counting the current block.
    pub fn remaining_major_action_chances(&self) -> u32 {
        let remaining = self.block.chances_from_here();
        if self.block != TimeBlock::Night && self.major_action_used {
            remaining.saturating_sub(1)
        } else {
            remaining
        }
    }

    pub fn snapshot(&self) -> TimeLoopSnapshot {
        TimeLoopSnapshot {
            day: self.day,
            end_day: self.end_day,
            block: self.block,
            major_action_used: self.major_action_used,
            event_locked: self.event_locked,
            remaining_major_actions: self.remaining_major_action_chances(),
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Reset to the Morning of `start_day` (clamped into `1..=end_day`) and
    /// clear the event lock. Returns a full snapshot as events.
    pub fn initialize_new_game(&mut self, start_day: u32, end_day: u32) -> Vec<TimeLoopEvent> {
        self.end_day = end_day.max(1);
        self.day = start_day.clamp(1, self.end_day);
        self.block = TimeBlock::Morning;
        self.major_action_used = false;
        self.event_locked = false;

        vec![
            TimeLoopEvent::DayChanged { day: self.day },
            TimeLoopEvent::TimeBlockChanged { block: self.block },
            TimeLoopEvent::MajorActionUsedChanged {
                used: self.major_action_used,
            },
            TimeLoopEvent::EventLockChanged {
                locked: self.event_locked,
            },
        ]
    }

    /// Lock block transitions. `None` if already locked.
    pub fn begin_event(&mut self) -> Option<TimeLoopEvent> {
        self.set_event_lock(true)
    }

    /// Release the event lock. `None` if it was not held.
    pub fn end_event(&mut self) -> Option<TimeLoopEvent> {
        self.set_event_lock(false)
    }

    fn set_event_lock(&mut self, locked: bool) -> Option<TimeLoopEvent> {
        if self.event_locked == locked {
            return None;
        }
        self.event_locked = locked;
        Some(TimeLoopEvent::EventLockChanged { locked })
    }

    pub fn can_consume_major_action(&self) -> bool {
        self.check_major_action().is_ok()
    }

    fn check_major_action(&self) -> Result<(), TimeLoopRefusal> {
        if self.block == TimeBlock::Night {
            return Err(TimeLoopRefusal::NightHasNoMajorAction);
        }
        if self.major_action_used {
            return Err(TimeLoopRefusal::MajorActionAlreadyUsed);
        }
        Ok(())
    }

    /// Spend this block's major action. The block does not advance.
    pub fn consume_major_action(&mut self) -> Result<TimeLoopEvent, TimeLoopRefusal> {
        self.check_major_action()?;
        self.major_action_used = true;
        Ok(TimeLoopEvent::MajorActionUsedChanged { used: true })
    }

    /// Move to the next block. Leaving Night finishes the night first.
    pub fn advance_time_block(&mut self) -> Result<Vec<TimeLoopEvent>, TimeLoopRefusal> {
        if self.event_locked {
            return Err(TimeLoopRefusal::EventLocked);
        }
        match self.block {
            TimeBlock::Night => self.finish_night(),
            block => Ok(self.enter_block(block.next())),
        }
    }

    /// End the night: send the player home, step the day (capped at
    /// `end_day`) and enter Morning.
    pub fn finish_night(&mut self) -> Result<Vec<TimeLoopEvent>, TimeLoopRefusal> {
        if self.event_locked {
            return Err(TimeLoopRefusal::EventLocked);
        }

        let mut events = vec![TimeLoopEvent::ForcedReturnHome];
        if self.day < self.end_day {
            self.day += 1;
            events.push(TimeLoopEvent::DayChanged { day: self.day });
        }
        events.extend(self.enter_block(TimeBlock::Morning));
        Ok(events)
    }

    fn enter_block(&mut self, block: TimeBlock) -> Vec<TimeLoopEvent> {
        self.block = block;
        self.major_action_used = false;
        vec![
            TimeLoopEvent::TimeBlockChanged { block },
            TimeLoopEvent::MajorActionUsedChanged { used: false },
        ]
    }
}
