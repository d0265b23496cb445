//! Converse with NPC use case.
//!
//! Wraps a single `TalkToNpc` turn with the time loop: the turn runs under
//! the event lock, and a successful turn may spend the block's major action.
//! Turns are serialized by the session's turn guard; the game state stays
//! readable while the proxy answers.

use std::sync::Arc;

use daytalk_domain::{NpcDefinition, NpcId, TimeLoopEvent};

use crate::infrastructure::npc_catalog::NpcCatalog;
use crate::use_cases::session::GameSession;

use super::talk::{TalkError, TalkOutcome, TalkToNpc};

#[derive(Debug)]
pub struct ConversationResult {
    pub outcome: TalkOutcome,
    /// True only when a major action was requested and actually spent.
    pub major_action_consumed: bool,
    /// Lock and major-action transitions made around the turn.
    pub events: Vec<TimeLoopEvent>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConversationError {
    #[error("NPC not found: {0}")]
    NpcNotFound(String),
    #[error(transparent)]
    Talk(#[from] TalkError),
}

pub struct ConverseWithNpc {
    session: Arc<GameSession>,
    catalog: Arc<NpcCatalog>,
    talk: Arc<TalkToNpc>,
}

impl ConverseWithNpc {
    pub fn new(session: Arc<GameSession>, catalog: Arc<NpcCatalog>, talk: Arc<TalkToNpc>) -> Self {
        Self {
            session,
            catalog,
            talk,
        }
    }

    /// Run one turn with `npc_id`.
    ///
    /// If no event lock is held, one is taken for the turn and released
    /// afterwards whatever the outcome. A lock held by a place event is left
    /// alone.
    pub async fn execute(
        &self,
        npc_id: &str,
        player_input: &str,
        consume_major_action: bool,
    ) -> Result<ConversationResult, ConversationError> {
        let npc = self.resolve(npc_id)?;
        if player_input.trim().is_empty() {
            return Err(TalkError::EmptyInput.into());
        }

        let _turn = self.session.lock_turn().await;
        let scheduler = self.session.scheduler();

        let began = scheduler.begin_event();
        let lock_taken = began.accepted;
        let mut events = began.events;
        let result = self
            .talk
            .execute(self.session.game(), npc, player_input)
            .await;

        let mut major_action_consumed = false;
        if result.is_ok() && consume_major_action {
            let spent = scheduler.consume_major_action();
            major_action_consumed = spent.accepted;
            events.extend(spent.events);
        }
        if lock_taken {
            events.extend(scheduler.end_event().events);
        }

        let outcome = result?;
        Ok(ConversationResult {
            outcome,
            major_action_consumed,
            events,
        })
    }

    fn resolve(&self, npc_id: &str) -> Result<&NpcDefinition, ConversationError> {
        NpcId::new(npc_id)
            .ok()
            .and_then(|id| self.catalog.get(&id))
            .ok_or_else(|| ConversationError::NpcNotFound(npc_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::sync::Notify;

    use crate::infrastructure::ports::{
        MockNpcTalkPort, MockSaveStorePort, NpcTalkPort, SaveStorePort, TransportError,
    };
    use crate::use_cases::session::DayRange;
    use crate::use_cases::time::TimeScheduler;

    /// Transport that parks inside `post_json` until released.
    struct HeldTransport {
        entered: Notify,
        release: Notify,
    }

    #[async_trait::async_trait]
    impl NpcTalkPort for HeldTransport {
        async fn post_json(&self, _payload: serde_json::Value) -> Result<String, TransportError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(r#"{"reply":"조금만 기다려 줘요."}"#.to_string())
        }
    }

    struct Harness {
        scheduler: Arc<TimeScheduler>,
        session: Arc<GameSession>,
        converse: ConverseWithNpc,
    }

    fn harness(transport: MockNpcTalkPort) -> Harness {
        harness_with(Arc::new(transport))
    }

    fn harness_with(transport: Arc<dyn NpcTalkPort>) -> Harness {
        let mut store = MockSaveStorePort::new();
        store.expect_save_all().returning(|_| Ok(()));
        let store: Arc<dyn SaveStorePort> = Arc::new(store);

        let scheduler = Arc::new(TimeScheduler::new(1, 30));
        let session = Arc::new(GameSession::new(
            Arc::clone(&scheduler),
            Arc::clone(&store),
            DayRange {
                start_day: 1,
                end_day: 30,
            },
        ));
        let talk = Arc::new(TalkToNpc::new(transport, store, 10));
        let converse = ConverseWithNpc::new(
            Arc::clone(&session),
            Arc::new(NpcCatalog::builtin()),
            talk,
        );
        Harness {
            scheduler,
            session,
            converse,
        }
    }

    fn failing_transport() -> MockNpcTalkPort {
        let mut transport = MockNpcTalkPort::new();
        transport
            .expect_post_json()
            .returning(|_| Err(TransportError::request_failed("connection refused")));
        transport
    }

    #[tokio::test]
    async fn unknown_npc_is_not_found() {
        let h = harness(MockNpcTalkPort::new());

        let result = h.converse.execute("nobody", "안녕", false).await;

        assert!(matches!(result, Err(ConversationError::NpcNotFound(id)) if id == "nobody"));
        assert!(!h.scheduler.is_event_locked());
    }

    #[tokio::test]
    async fn empty_input_is_rejected_before_locking() {
        let h = harness(MockNpcTalkPort::new());
        let mut events = h.scheduler.subscribe();

        let result = h.converse.execute("yoonseo", " ", true).await;

        assert!(matches!(
            result,
            Err(ConversationError::Talk(TalkError::EmptyInput))
        ));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn turn_locks_then_releases_and_spends_major_action() {
        let h = harness(MockNpcTalkPort::new());
        let mut events = h.scheduler.subscribe();

        let result = h
            .converse
            .execute("yoonseo", "좋은 아침", true)
            .await
            .expect("turn succeeds");

        assert!(result.major_action_consumed);
        assert!(!h.scheduler.is_event_locked());
        assert!(!h.scheduler.can_consume_major_action());

        let expected = vec![
            TimeLoopEvent::EventLockChanged { locked: true },
            TimeLoopEvent::MajorActionUsedChanged { used: true },
            TimeLoopEvent::EventLockChanged { locked: false },
        ];
        let mut seen = Vec::new();
        while let Ok(event) = events.try_recv() {
            seen.push(event);
        }
        assert_eq!(seen, expected);
        assert_eq!(result.events, expected);
    }

    #[tokio::test]
    async fn failed_turn_releases_lock_and_keeps_major_action() {
        let h = harness(failing_transport());

        let result = h.converse.execute("yoonseo", "고백할게", true).await;

        assert!(matches!(
            result,
            Err(ConversationError::Talk(TalkError::Transport(_)))
        ));
        assert!(!h.scheduler.is_event_locked());
        assert!(h.scheduler.can_consume_major_action());
        let game = h.session.lock_game().await;
        let npc = game
            .npc(&NpcId::new("yoonseo").expect("valid id"))
            .expect("memory exists");
        assert_eq!(npc.recent_turns().len(), 1);
    }

    #[tokio::test]
    async fn existing_place_lock_is_left_in_place() {
        let h = harness(MockNpcTalkPort::new());
        assert!(h.scheduler.begin_event().accepted);

        h.converse
            .execute("yoonseo", "커피 마실래?", false)
            .await
            .expect("turn succeeds");

        assert!(h.scheduler.is_event_locked());
    }

    #[tokio::test]
    async fn major_action_is_not_spent_unless_requested() {
        let h = harness(MockNpcTalkPort::new());

        let result = h
            .converse
            .execute("yoonseo", "좋은 아침", false)
            .await
            .expect("turn succeeds");

        assert!(!result.major_action_consumed);
        assert!(h.scheduler.can_consume_major_action());
    }

    #[tokio::test]
    async fn game_state_stays_readable_while_the_proxy_answers() {
        let transport = Arc::new(HeldTransport {
            entered: Notify::new(),
            release: Notify::new(),
        });
        let h = Arc::new(harness_with(Arc::clone(&transport) as Arc<dyn NpcTalkPort>));
        let yoonseo = NpcId::new("yoonseo").expect("valid id");

        let turn = tokio::spawn({
            let h = Arc::clone(&h);
            async move { h.converse.execute("yoonseo", "비밀을 말해줘", false).await }
        });
        transport.entered.notified().await;

        {
            let game = tokio::time::timeout(Duration::from_secs(1), h.session.lock_game())
                .await
                .expect("game lock is free during the proxy call");
            let npc = game.npc(&yoonseo).expect("player turn recorded");
            assert_eq!(npc.recent_turns().len(), 1);
        }
        assert!(h.scheduler.is_event_locked());

        transport.release.notify_one();
        let result = turn
            .await
            .expect("turn task")
            .expect("turn succeeds");

        assert_eq!(result.outcome.reply, "조금만 기다려 줘요.");
        assert!(!h.scheduler.is_event_locked());
        let game = h.session.lock_game().await;
        assert_eq!(game.npc(&yoonseo).expect("memory").recent_turns().len(), 2);
    }

    #[tokio::test]
    async fn overlapping_turns_run_one_after_another() {
        let transport = Arc::new(HeldTransport {
            entered: Notify::new(),
            release: Notify::new(),
        });
        let h = Arc::new(harness_with(Arc::clone(&transport) as Arc<dyn NpcTalkPort>));

        let first = tokio::spawn({
            let h = Arc::clone(&h);
            async move { h.converse.execute("yoonseo", "비밀을 말해줘", false).await }
        });
        transport.entered.notified().await;

        let second = tokio::spawn({
            let h = Arc::clone(&h);
            async move { h.converse.execute("yoonseo", "안녕", false).await }
        });
        tokio::task::yield_now().await;
        {
            let game = h.session.lock_game().await;
            let npc = game
                .npc(&NpcId::new("yoonseo").expect("valid id"))
                .expect("memory");
            assert_eq!(npc.recent_turns().len(), 1);
        }

        transport.release.notify_one();
        first.await.expect("first task").expect("first turn");
        second.await.expect("second task").expect("second turn");

        let game = h.session.lock_game().await;
        let texts: Vec<String> = game
            .npc(&NpcId::new("yoonseo").expect("valid id"))
            .expect("memory")
            .recent_turns()
            .map(|t| t.text.clone())
            .collect();
        assert_eq!(texts[0], "비밀을 말해줘");
        assert_eq!(texts[1], "조금만 기다려 줘요.");
        assert_eq!(texts[2], "안녕");
        assert_eq!(texts.len(), 4);
    }
}
