//! NPC definitions available for conversation.

use std::collections::HashMap;
use std::path::Path;

use daytalk_domain::{NpcDefinition, NpcId};

use crate::infrastructure::ports::SaveError;

/// Lookup of authored NPC definitions by id.
#[derive(Debug, Clone, Default)]
pub struct NpcCatalog {
    definitions: HashMap<NpcId, NpcDefinition>,
}

impl NpcCatalog {
    pub fn new(definitions: impl IntoIterator<Item = NpcDefinition>) -> Self {
        Self {
            definitions: definitions
                .into_iter()
                .map(|def| (def.npc_id.clone(), def))
                .collect(),
        }
    }

    /// The catalog shipped with the game.
    pub fn builtin() -> Self {
        let definitions = NpcId::new("yoonseo")
            .map(|id| {
                NpcDefinition::new(id, "윤서").with_persona(
                    "차분하고 정중한 비서형 동료. 존댓말을 쓰고, 일정을 정리해 주는 것을 좋아한다.",
                )
            })
            .into_iter();
        Self::new(definitions)
    }

    /// Load a JSON array of definitions, e.g.
    /// `[{"npcId":"yoonseo","displayName":"윤서","persona":"..."}]`.
    pub async fn load(path: &Path) -> Result<Self, SaveError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SaveError::io("read npc catalog", e))?;
        let definitions: Vec<NpcDefinition> =
            serde_json::from_str(&json).map_err(SaveError::serialization)?;
        Ok(Self::new(definitions))
    }

    pub fn get(&self, npc_id: &NpcId) -> Option<&NpcDefinition> {
        self.definitions.get(npc_id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
