//! Conversation use cases.
//!
//! The dialogue flow is:
//! 1. Player speaks to an NPC (ConverseWithNpc)
//! 2. The time loop is event-locked for the turn
//! 3. TalkToNpc answers locally or through the dialogue proxy
//! 4. Reply effects land in NPC memory and the game is saved
//! 5. Optionally the block's major action is spent

use std::sync::Arc;

mod converse;
mod local_reply;
mod talk;

pub use converse::{ConversationError, ConversationResult, ConverseWithNpc};
pub use local_reply::{local_reply_text, LOCAL_REPLY_NOTE};
pub use talk::{TalkError, TalkOutcome, TalkToNpc};

/// Container for conversation use cases.
pub struct ConversationUseCases {
    pub talk: Arc<TalkToNpc>,
    pub converse: Arc<ConverseWithNpc>,
}

impl ConversationUseCases {
    pub fn new(talk: Arc<TalkToNpc>, converse: Arc<ConverseWithNpc>) -> Self {
        Self { talk, converse }
    }
}
