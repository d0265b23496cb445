//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    npc_catalog::NpcCatalog,
    ports::{NpcTalkPort, SaveStorePort},
    settings::EngineSettings,
};
use crate::use_cases;
use crate::use_cases::conversation::{
    ConversationError, ConversationResult, ConverseWithNpc, TalkToNpc,
};
use crate::use_cases::session::DayRange;

/// Main application state.
///
/// Owns the one game session of this process and every use case over it.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
    pub catalog: Arc<NpcCatalog>,
}

/// Container for all use cases.
pub struct UseCases {
    pub time: Arc<use_cases::TimeScheduler>,
    pub session: Arc<use_cases::GameSession>,
    pub place: use_cases::PlaceEvents,
    pub conversation: use_cases::ConversationUseCases,
}

impl App {
    /// Create a new App with all dependencies wired.
    pub fn new(
        settings: &EngineSettings,
        transport: Arc<dyn NpcTalkPort>,
        save_store: Arc<dyn SaveStorePort>,
        catalog: NpcCatalog,
    ) -> Self {
        let catalog = Arc::new(catalog);

        let time = Arc::new(use_cases::TimeScheduler::new(
            settings.start_day,
            settings.end_day,
        ));
        let session = Arc::new(use_cases::GameSession::new(
            Arc::clone(&time),
            Arc::clone(&save_store),
            DayRange {
                start_day: settings.start_day,
                end_day: settings.end_day,
            },
        ));
        let place = use_cases::PlaceEvents::new(Arc::clone(&time));

        let talk = Arc::new(TalkToNpc::new(
            transport,
            save_store,
            settings.max_turns,
        ));
        let converse = Arc::new(ConverseWithNpc::new(
            Arc::clone(&session),
            Arc::clone(&catalog),
            Arc::clone(&talk),
        ));
        let conversation = use_cases::ConversationUseCases::new(talk, converse);

        tracing::debug!(npc_count = catalog.len(), "App composed");

        Self {
            use_cases: UseCases {
                time,
                session,
                place,
                conversation,
            },
            catalog,
        }
    }

    /// One gated dialogue turn with `npc_id`.
    pub async fn talk(
        &self,
        npc_id: &str,
        player_input: &str,
        consume_major_action: bool,
    ) -> Result<ConversationResult, ConversationError> {
        self.use_cases
            .conversation
            .converse
            .execute(npc_id, player_input, consume_major_action)
            .await
    }
}
