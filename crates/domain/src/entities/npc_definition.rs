//! NPC definition - static authoring data for a talkable character.

use serde::{Deserialize, Serialize};

use crate::ids::NpcId;

/// Who an NPC is. Never mutated at runtime; runtime state lives in
/// `NpcMemory`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcDefinition {
    pub npc_id: NpcId,
    pub display_name: String,
    /// Personality, speech style and taboos, passed verbatim to the proxy.
    #[serde(default)]
    pub persona: String,
}

impl NpcDefinition {
    pub fn new(npc_id: NpcId, display_name: impl Into<String>) -> Self {
        Self {
            npc_id,
            display_name: display_name.into(),
            persona: String::new(),
        }
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_without_persona() {
        let def: NpcDefinition =
            serde_json::from_str(r#"{"npcId":"yoonseo","displayName":"윤서"}"#).expect("valid");
        assert_eq!(def.npc_id.as_str(), "yoonseo");
        assert_eq!(def.display_name, "윤서");
        assert_eq!(def.persona, "");
    }

    #[test]
    fn blank_id_is_rejected() {
        let result: Result<NpcDefinition, _> =
            serde_json::from_str(r#"{"npcId":"","displayName":"nobody"}"#);
        assert!(result.is_err());
    }
}
