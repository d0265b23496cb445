//! NPC memory aggregate - everything one NPC remembers about the player
//!
//! # Design
//!
//! - **Private fields**: state only changes through the four mutators below
//! - **Bounded history**: `recent_turns` keeps the newest `max_turns` entries
//! - **Unique flag keys**: `upsert_flag` replaces in place, never duplicates

use std::collections::VecDeque;

use crate::ids::NpcId;
use crate::value_objects::{DialogueTurn, FlagEntry, Speaker};

/// History length kept per NPC when the caller does not choose one.
pub const DEFAULT_MAX_TURNS: usize = 10;

/// Durable per-NPC conversational state.
///
/// # Invariants
///
/// - `flags` never holds two entries with the same key
/// - after `add_turn(.., max_turns)` at most `max_turns` turns remain,
///   oldest dropped first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpcMemory {
    npc_id: NpcId,
    affinity: i32,
    flags: Vec<FlagEntry>,
    recent_turns: VecDeque<DialogueTurn>,
    summary_memo: String,
}

impl NpcMemory {
    /// Fresh memory: zero affinity, nothing remembered.
    pub fn new(npc_id: NpcId) -> Self {
        Self {
            npc_id,
            affinity: 0,
            flags: Vec::new(),
            recent_turns: VecDeque::new(),
            summary_memo: String::new(),
        }
    }

    /// Rebuild a record from persisted parts.
    ///
    /// Flags go through `upsert_flag`, so a file with repeated keys keeps the
    /// last value for each key. Only the newest `max_turns` turns are kept.
    pub fn from_parts(
        npc_id: NpcId,
        affinity: i32,
        flags: impl IntoIterator<Item = FlagEntry>,
        recent_turns: impl IntoIterator<Item = DialogueTurn>,
        summary_memo: impl Into<String>,
        max_turns: usize,
    ) -> Self {
        let mut memory = Self::new(npc_id);
        memory.affinity = affinity;
        for flag in flags {
            memory.upsert_flag(flag.key, flag.value);
        }
        memory.recent_turns = recent_turns.into_iter().collect();
        memory.trim_turns(max_turns);
        memory.summary_memo = summary_memo.into();
        memory
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn npc_id(&self) -> &NpcId {
        &self.npc_id
    }

    #[inline]
    pub fn affinity(&self) -> i32 {
        self.affinity
    }

    #[inline]
    pub fn flags(&self) -> &[FlagEntry] {
        &self.flags
    }

    pub fn flag(&self, key: &str) -> Option<&str> {
        self.flags
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }

    pub fn recent_turns(&self) -> impl ExactSizeIterator<Item = &DialogueTurn> {
        self.recent_turns.iter()
    }

    #[inline]
    pub fn summary_memo(&self) -> &str {
        &self.summary_memo
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Append a turn, then drop from the front until `max_turns` remain.
    pub fn add_turn(&mut self, speaker: Speaker, text: impl Into<String>, max_turns: usize) {
        self.recent_turns.push_back(DialogueTurn::new(speaker, text));
        self.trim_turns(max_turns);
    }

    fn trim_turns(&mut self, max_turns: usize) {
        let excess = self.recent_turns.len().saturating_sub(max_turns);
        self.recent_turns.drain(..excess);
    }

    /// Replace the value of an existing key, or append a new entry.
    pub fn upsert_flag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.flags.iter_mut().find(|f| f.key == key) {
            Some(existing) => existing.value = value,
            None => self.flags.push(FlagEntry { key, value }),
        }
    }

    pub fn add_affinity(&mut self, delta: i32) {
        self.affinity = self.affinity.saturating_add(delta);
    }

    /// Overwrite the summary memo wholesale.
    pub fn replace_memo(&mut self, memo: impl Into<String>) {
        self.summary_memo = memo.into();
    }
}
