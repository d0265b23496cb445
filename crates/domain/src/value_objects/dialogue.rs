//! Dialogue value objects: who spoke, what was said, and narrative flags.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Who produced a dialogue turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Player,
    Npc,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::Player => "player",
            Speaker::Npc => "npc",
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Speaker {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "player" => Ok(Speaker::Player),
            "npc" => Ok(Speaker::Npc),
            other => Err(DomainError::parse(format!("Unknown speaker: {}", other))),
        }
    }
}

/// A single line in an NPC's recent conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl DialogueTurn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }

    pub fn player(text: impl Into<String>) -> Self {
        Self::new(Speaker::Player, text)
    }

    pub fn npc(text: impl Into<String>) -> Self {
        Self::new(Speaker::Npc, text)
    }
}

/// A named narrative/quest value held by one NPC.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlagEntry {
    pub key: String,
    pub value: String,
}

impl FlagEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
