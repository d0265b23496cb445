//! NPC dialogue proxy protocol.
//!
//! The proxy wraps a language model; the engine only sees this contract.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagKv {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnData {
    pub speaker: String,
    pub text: String,
}

/// Context snapshot sent with every remote turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcTalkRequest {
    pub npc_id: String,
    pub npc_name: String,
    pub persona: String,
    pub day: u32,
    pub time_slot: String,
    pub affinity: i32,
    pub flags: Vec<FlagKv>,
    pub recent_turns: Vec<TurnData>,
    pub summary_memo: String,
    pub player_input: String,
}

/// Reply plus the structured effects to apply to the NPC.
///
/// Only `reply` is required on the wire; a blank reply is rejected by the
/// engine, not by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcTalkResponse {
    pub reply: String,
    #[serde(default)]
    pub affinity_delta: i32,
    #[serde(default)]
    pub flag_updates: Option<Vec<FlagKv>>,
    #[serde(default)]
    pub note: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_tolerates_missing_optional_fields() {
        let resp: NpcTalkResponse = serde_json::from_str(r#"{"reply":"안녕"}"#).expect("parse");
        assert_eq!(resp.reply, "안녕");
        assert_eq!(resp.affinity_delta, 0);
        assert_eq!(resp.flag_updates, None);
        assert_eq!(resp.note, "");
    }

    #[test]
    fn response_without_reply_fails() {
        let result: Result<NpcTalkResponse, _> = serde_json::from_str(r#"{"note":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn request_uses_snake_case_keys() {
        let req = NpcTalkRequest {
            npc_id: "yoonseo".into(),
            npc_name: "윤서".into(),
            persona: String::new(),
            day: 2,
            time_slot: "evening".into(),
            affinity: 4,
            flags: vec![FlagKv {
                key: "k".into(),
                value: "v".into(),
            }],
            recent_turns: vec![],
            summary_memo: String::new(),
            player_input: "왜?".into(),
        };

        let json = serde_json::to_value(&req).expect("serialize");
        assert_eq!(json["npc_id"], "yoonseo");
        assert_eq!(json["time_slot"], "evening");
        assert_eq!(json["flags"][0]["key"], "k");
        assert_eq!(json["player_input"], "왜?");
    }
}
