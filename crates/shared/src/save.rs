//! Save slot file layout.
//!
//! `world.json` holds a `WorldSaveData`, `npcs.json` an `NpcsSaveData`.
//! Keys are camelCase. Every field defaults so partial files still load.

use serde::{Deserialize, Serialize};

use crate::npc_talk::{FlagKv, TurnData};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSaveData {
    #[serde(default = "default_day")]
    pub day: u32,
    #[serde(default = "default_time_slot")]
    pub time_slot: String,
}

fn default_day() -> u32 {
    1
}

fn default_time_slot() -> String {
    "morning".to_string()
}

impl Default for WorldSaveData {
    fn default() -> Self {
        Self {
            day: default_day(),
            time_slot: default_time_slot(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcsSaveData {
    #[serde(default)]
    pub npcs: Vec<NpcSaveRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcSaveRecord {
    #[serde(default)]
    pub npc_id: String,
    #[serde(default)]
    pub affinity: i32,
    #[serde(default)]
    pub flags: Vec<FlagKv>,
    #[serde(default)]
    pub summary_memo: String,
    #[serde(default)]
    pub recent_turns: Vec<TurnData>,
}
