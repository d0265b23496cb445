//! HTTP response bodies.

use serde::{Deserialize, Serialize};

use daytalk_domain::{TimeLoopEvent, TimeLoopSnapshot};

use crate::npc_talk::{FlagKv, TurnData};

// =============================================================================
// Errors
// =============================================================================

/// Error classification for API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    NotFound,
    /// The dialogue proxy failed or replied with something unusable.
    UpstreamFailed,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

// =============================================================================
// Game state
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcSummaryData {
    pub npc_id: String,
    pub affinity: i32,
    pub turn_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateResponse {
    pub time: TimeLoopSnapshot,
    pub time_slot: String,
    pub npcs: Vec<NpcSummaryData>,
}

/// Result of a guarded time-loop request. `accepted == false` is a normal
/// gameplay outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeActionResponse {
    pub accepted: bool,
    /// Transitions this request committed, in order. Leaving Night starts
    /// with `forced_return_home`.
    #[serde(default)]
    pub events: Vec<TimeLoopEvent>,
    pub time: TimeLoopSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceResponse {
    /// The place entered; absent when closing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    /// The player went home instead of opening a place event.
    pub returned_home: bool,
    /// Only set when closing a place as a major action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_action_consumed: Option<bool>,
    #[serde(default)]
    pub events: Vec<TimeLoopEvent>,
    pub time: TimeLoopSnapshot,
}

// =============================================================================
// NPC memory and dialogue
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcMemoryData {
    pub npc_id: String,
    pub affinity: i32,
    pub flags: Vec<FlagKv>,
    pub recent_turns: Vec<TurnData>,
    pub summary_memo: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalkResponse {
    pub reply: String,
    pub source: ReplySource,
    pub affinity_delta: i32,
    pub affinity: i32,
    pub flag_updates: Vec<FlagKv>,
    pub note: String,
    /// Whether a requested major action was actually spent.
    pub major_action_consumed: bool,
    /// Lock and major-action transitions made around the turn.
    #[serde(default)]
    pub events: Vec<TimeLoopEvent>,
    pub time: TimeLoopSnapshot,
}
