//! JSON file save slots.
//!
//! Layout under the save root:
//!
//! ```text
//! Save/slot_01/world.json   { "day": 1, "timeSlot": "morning" }
//! Save/slot_01/npcs.json    { "npcs": [ { "npcId": .., .. } ] }
//! ```
//!
//! Loading never fails: a missing file yields defaults, and an unreadable or
//! corrupt file is logged and replaced by defaults.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use daytalk_domain::{
    DialogueTurn, FlagEntry, GameState, NpcId, NpcMemory, WorldState, DEFAULT_MAX_TURNS,
};
use daytalk_shared::{FlagKv, NpcSaveRecord, NpcsSaveData, TurnData, WorldSaveData};

use crate::infrastructure::ports::{SaveError, SaveStorePort};

const WORLD_FILE: &str = "world.json";
const NPCS_FILE: &str = "npcs.json";

/// Save store backed by two pretty-printed JSON files per slot.
#[derive(Debug, Clone)]
pub struct JsonSaveStore {
    slot_dir: PathBuf,
    max_turns: usize,
}

impl JsonSaveStore {
    pub fn new(save_root: impl AsRef<Path>, slot: u32) -> Self {
        Self {
            slot_dir: slot_dir(save_root.as_ref(), slot),
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    /// History length kept per NPC when a slot is loaded.
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn slot_dir(&self) -> &Path {
        &self.slot_dir
    }

    pub fn world_path(&self) -> PathBuf {
        self.slot_dir.join(WORLD_FILE)
    }

    pub fn npcs_path(&self) -> PathBuf {
        self.slot_dir.join(NPCS_FILE)
    }

    async fn write_json<T: Serialize>(
        &self,
        path: &Path,
        data: &T,
        operation: &'static str,
    ) -> Result<(), SaveError> {
        let json = serde_json::to_string_pretty(data).map_err(SaveError::serialization)?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| SaveError::io(operation, e))
    }
}

/// `<root>/Save/slot_NN`
pub fn slot_dir(save_root: &Path, slot: u32) -> PathBuf {
    save_root.join("Save").join(format!("slot_{:02}", slot))
}

#[async_trait]
impl SaveStorePort for JsonSaveStore {
    async fn save_all(&self, state: &GameState) -> Result<(), SaveError> {
        tokio::fs::create_dir_all(&self.slot_dir)
            .await
            .map_err(|e| SaveError::io("create slot dir", e))?;

        self.write_json(&self.world_path(), &world_to_save(state.world()), "write world.json")
            .await?;

        let npcs = NpcsSaveData {
            npcs: state.npcs_sorted().into_iter().map(npc_to_record).collect(),
        };
        self.write_json(&self.npcs_path(), &npcs, "write npcs.json")
            .await?;

        tracing::debug!(
            slot_dir = %self.slot_dir.display(),
            npc_count = npcs.npcs.len(),
            "Game state saved"
        );
        Ok(())
    }

    async fn load_all(&self) -> Result<GameState, SaveError> {
        let mut state = GameState::new();

        let world = read_json::<WorldSaveData>(&self.world_path()).await;
        state.replace_world(world.map(world_from_save));

        let npcs = read_json::<NpcsSaveData>(&self.npcs_path())
            .await
            .unwrap_or_default();
        state.replace_all_npcs(
            npcs.npcs
                .into_iter()
                .filter_map(|record| npc_from_record(record, self.max_turns)),
        );

        tracing::info!(
            slot_dir = %self.slot_dir.display(),
            day = state.world().day,
            npc_count = state.npcs().len(),
            "Game state loaded"
        );
        Ok(state)
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let json = match tokio::fs::read_to_string(path).await {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Save file missing, using defaults");
            return None;
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read save file, using defaults");
            return None;
        }
    };

    match serde_json::from_str(&json) {
        Ok(data) => Some(data),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Corrupt save file, using defaults");
            None
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

fn world_to_save(world: &WorldState) -> WorldSaveData {
    WorldSaveData {
        day: world.day,
        time_slot: world.time_slot.clone(),
    }
}

fn world_from_save(data: WorldSaveData) -> WorldState {
    WorldState::new(data.day, data.time_slot)
}

fn npc_to_record(npc: &NpcMemory) -> NpcSaveRecord {
    NpcSaveRecord {
        npc_id: npc.npc_id().to_string(),
        affinity: npc.affinity(),
        flags: npc
            .flags()
            .iter()
            .map(|f| FlagKv {
                key: f.key.clone(),
                value: f.value.clone(),
            })
            .collect(),
        summary_memo: npc.summary_memo().to_string(),
        recent_turns: npc
            .recent_turns()
            .map(|t| TurnData {
                speaker: t.speaker.to_string(),
                text: t.text.clone(),
            })
            .collect(),
    }
}

/// Records with a blank id are dropped; turns with an unknown speaker are
/// skipped. Only the newest `max_turns` turns survive.
fn npc_from_record(record: NpcSaveRecord, max_turns: usize) -> Option<NpcMemory> {
    let npc_id = match NpcId::new(record.npc_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "Skipping saved NPC record without id");
            return None;
        }
    };

    let turns = record.recent_turns.into_iter().filter_map(|turn| {
        match turn.speaker.parse() {
            Ok(speaker) => Some(DialogueTurn::new(speaker, turn.text)),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping saved turn");
                None
            }
        }
    });

    Some(NpcMemory::from_parts(
        npc_id,
        record.affinity,
        record
            .flags
            .into_iter()
            .map(|f| FlagEntry::new(f.key, f.value)),
        turns.collect::<Vec<_>>(),
        record.summary_memo,
        max_turns,
    ))
}
