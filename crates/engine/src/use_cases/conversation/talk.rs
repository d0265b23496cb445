//! Talk to NPC use case.
//!
//! One player line in, one NPC reply out. Small talk is answered from local
//! templates; turns that match the reply policy go to the dialogue proxy.
//! Effects of the reply are applied to the NPC's memory and the whole game is
//! saved.
//!
//! The game lock is taken twice per turn: once to record the player line and
//! build the request, once to apply the reply and save. It is not held while
//! the proxy answers. Callers serialize turns (see `GameSession::lock_turn`).

use std::sync::Arc;

use tokio::sync::Mutex;

use daytalk_domain::{
    should_call_remote, FlagEntry, GameState, NpcDefinition, NpcMemory, Speaker, WorldState,
};
use daytalk_shared::{FlagKv, NpcTalkRequest, NpcTalkResponse, ReplySource, TurnData};

use crate::infrastructure::ports::{NpcTalkPort, SaveStorePort, TransportError};

use super::local_reply::local_reply;

/// Result of one dialogue turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TalkOutcome {
    pub reply: String,
    pub source: ReplySource,
    pub affinity_delta: i32,
    pub flag_updates: Vec<FlagEntry>,
    pub note: String,
    /// Affinity after the delta was applied.
    pub affinity: i32,
}

/// A reply and the effects it carries, before they are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct NpcReply {
    pub text: String,
    pub source: ReplySource,
    pub affinity_delta: i32,
    pub flag_updates: Vec<FlagEntry>,
    pub note: String,
}

/// What the turn will be answered with, decided under the game lock.
enum PendingReply {
    Local(NpcReply),
    Remote(NpcTalkRequest),
}

#[derive(Debug, thiserror::Error)]
pub enum TalkError {
    #[error("Player input is empty")]
    EmptyInput,
    #[error("Could not encode proxy request: {0}")]
    InvalidRequest(String),
    #[error("Dialogue proxy unavailable: {0}")]
    Transport(#[from] TransportError),
    #[error("Invalid response from proxy: {0}")]
    InvalidResponse(String),
}

pub struct TalkToNpc {
    transport: Arc<dyn NpcTalkPort>,
    save_store: Arc<dyn SaveStorePort>,
    max_turns: usize,
}

impl TalkToNpc {
    pub fn new(
        transport: Arc<dyn NpcTalkPort>,
        save_store: Arc<dyn SaveStorePort>,
        max_turns: usize,
    ) -> Self {
        Self {
            transport,
            save_store,
            max_turns,
        }
    }

    /// Run one turn against `npc`.
    ///
    /// The player line is recorded before the reply is produced, so it stays
    /// in history even when the proxy fails. Nothing from a failed reply is
    /// applied.
    pub async fn execute(
        &self,
        game: &Mutex<GameState>,
        npc: &NpcDefinition,
        player_input: &str,
    ) -> Result<TalkOutcome, TalkError> {
        let input = player_input.trim();
        if input.is_empty() {
            return Err(TalkError::EmptyInput);
        }

        let (world, pending) = {
            let mut game = game.lock().await;
            let world = game.world().clone();
            let memory = game.get_or_create_npc(&npc.npc_id);
            memory.add_turn(Speaker::Player, input, self.max_turns);

            let pending = if should_call_remote(input) {
                PendingReply::Remote(build_request(&world, npc, memory, input))
            } else {
                PendingReply::Local(local_reply(&world.time_slot))
            };
            (world, pending)
        };

        let reply = match pending {
            PendingReply::Local(reply) => reply,
            PendingReply::Remote(request) => self.remote_reply(&request).await?,
        };

        let mut game = game.lock().await;
        let memory = game.get_or_create_npc(&npc.npc_id);
        self.apply(memory, &reply);
        let affinity = memory.affinity();

        tracing::info!(
            npc_id = %npc.npc_id,
            day = world.day,
            source = ?reply.source,
            affinity_delta = reply.affinity_delta,
            affinity,
            "NPC turn completed"
        );

        if let Err(e) = self.save_store.save_all(&game).await {
            tracing::warn!(npc_id = %npc.npc_id, error = %e, "Autosave after NPC turn failed");
        }

        Ok(TalkOutcome {
            reply: reply.text,
            source: reply.source,
            affinity_delta: reply.affinity_delta,
            flag_updates: reply.flag_updates,
            note: reply.note,
            affinity,
        })
    }

    async fn remote_reply(&self, request: &NpcTalkRequest) -> Result<NpcReply, TalkError> {
        let payload =
            serde_json::to_value(request).map_err(|e| TalkError::InvalidRequest(e.to_string()))?;

        let body = self.transport.post_json(payload).await.inspect_err(|e| {
            tracing::warn!(npc_id = %request.npc_id, error = %e, "Dialogue proxy request failed");
        })?;

        let response: NpcTalkResponse = serde_json::from_str(&body)
            .map_err(|e| TalkError::InvalidResponse(e.to_string()))?;
        if response.reply.trim().is_empty() {
            return Err(TalkError::InvalidResponse("reply is blank".to_string()));
        }

        Ok(NpcReply {
            text: response.reply,
            source: ReplySource::Remote,
            affinity_delta: response.affinity_delta,
            flag_updates: response
                .flag_updates
                .unwrap_or_default()
                .into_iter()
                .map(|kv| FlagEntry::new(kv.key, kv.value))
                .collect(),
            note: response.note,
        })
    }

    fn apply(&self, memory: &mut NpcMemory, reply: &NpcReply) {
        memory.add_affinity(reply.affinity_delta);
        for flag in &reply.flag_updates {
            memory.upsert_flag(flag.key.as_str(), flag.value.as_str());
        }
        memory.add_turn(Speaker::Npc, reply.text.as_str(), self.max_turns);
        if !reply.note.trim().is_empty() {
            memory.replace_memo(reply.note.as_str());
        }
    }
}

fn build_request(
    world: &WorldState,
    npc: &NpcDefinition,
    memory: &NpcMemory,
    player_input: &str,
) -> NpcTalkRequest {
    NpcTalkRequest {
        npc_id: npc.npc_id.to_string(),
        npc_name: npc.display_name.clone(),
        persona: npc.persona.clone(),
        day: world.day,
        time_slot: world.time_slot.clone(),
        affinity: memory.affinity(),
        flags: memory
            .flags()
            .iter()
            .map(|f| FlagKv {
                key: f.key.clone(),
                value: f.value.clone(),
            })
            .collect(),
        recent_turns: memory
            .recent_turns()
            .map(|t| TurnData {
                speaker: t.speaker.to_string(),
                text: t.text.clone(),
            })
            .collect(),
        summary_memo: memory.summary_memo().to_string(),
        player_input: player_input.to_string(),
    }
}
