//! Daytalk Shared - serialized shapes that cross a process or disk boundary
//!
//! - `npc_talk` - the remote dialogue proxy protocol (snake_case JSON)
//! - `save` - the on-disk save slot layout (`world.json`, `npcs.json`)
//! - `requests` / `responses` - HTTP API bodies
//!
//! # Design Principles
//!
//! 1. **No business logic** - pure data types and serialization
//! 2. **Lenient on input** - optional fields default rather than fail, so
//!    older saves and sloppy proxy replies still parse
//! 3. **Conversions live in the engine** - domain ↔ DTO mapping is an adapter
//!    concern

pub mod npc_talk;
pub mod requests;
pub mod responses;
pub mod save;

pub use npc_talk::{FlagKv, NpcTalkRequest, NpcTalkResponse, TurnData};
pub use requests::{ClosePlaceRequest, TalkRequest};
pub use responses::{
    ApiErrorBody, ErrorCode, GameStateResponse, NpcMemoryData, NpcSummaryData, PlaceResponse,
    ReplySource, TalkResponse, TimeActionResponse,
};
pub use save::{NpcSaveRecord, NpcsSaveData, WorldSaveData};
