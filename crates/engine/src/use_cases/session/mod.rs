//! Session use cases: the live game state and its save slot.
//!
//! `GameSession` owns the single `GameState` of a running game behind an
//! async mutex. The game lock is only held for in-memory work and saves,
//! never across a proxy round trip. Dialogue turns are serialized by a
//! separate turn guard, so readers see the state while a reply is pending.
//!
//! Time transitions go through here too, so the saved world label follows the
//! scheduler after every accepted transition.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use daytalk_domain::{GameState, TimeLoopSnapshot};

use crate::infrastructure::ports::{SaveError, SaveStorePort};
use crate::use_cases::time::{TimeScheduler, Transition};

/// Days a new game spans, from settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub start_day: u32,
    pub end_day: u32,
}

pub struct GameSession {
    game: Mutex<GameState>,
    turn: Mutex<()>,
    scheduler: Arc<TimeScheduler>,
    save_store: Arc<dyn SaveStorePort>,
    days: DayRange,
}

impl GameSession {
    pub fn new(
        scheduler: Arc<TimeScheduler>,
        save_store: Arc<dyn SaveStorePort>,
        days: DayRange,
    ) -> Self {
        let mut game = GameState::new();
        scheduler.sync_world(game.world_mut());
        Self {
            game: Mutex::new(game),
            turn: Mutex::new(()),
            scheduler,
            save_store,
            days,
        }
    }

    pub fn scheduler(&self) -> &Arc<TimeScheduler> {
        &self.scheduler
    }

    pub fn save_store(&self) -> &Arc<dyn SaveStorePort> {
        &self.save_store
    }

    /// Exclusive access to the game state. Do not hold it across I/O
    /// that can take longer than a save.
    pub async fn lock_game(&self) -> MutexGuard<'_, GameState> {
        self.game.lock().await
    }

    pub fn game(&self) -> &Mutex<GameState> {
        &self.game
    }

    /// One dialogue turn, or a load or reset, at a time. Always taken
    /// before the game lock.
    pub async fn lock_turn(&self) -> MutexGuard<'_, ()> {
        self.turn.lock().await
    }

    /// Replace the live state with the save slot and resume at the saved
    /// day's Morning.
    pub async fn load_game(&self) -> Result<TimeLoopSnapshot, SaveError> {
        let _turn = self.turn.lock().await;
        let loaded = self.save_store.load_all().await?;
        let mut game = self.game.lock().await;
        *game = loaded;

        self.scheduler
            .initialize_new_game(game.world().day, self.days.end_day);
        self.scheduler.sync_world(game.world_mut());

        let snapshot = self.scheduler.snapshot();
        tracing::info!(
            day = snapshot.day,
            npc_count = game.npcs().len(),
            "Game resumed from save"
        );
        Ok(snapshot)
    }

    /// Start over from the configured first day and overwrite the slot.
    pub async fn new_game(&self) -> Result<TimeLoopSnapshot, SaveError> {
        let _turn = self.turn.lock().await;
        let mut game = self.game.lock().await;
        *game = GameState::new();

        self.scheduler
            .initialize_new_game(self.days.start_day, self.days.end_day);
        self.scheduler.sync_world(game.world_mut());

        self.save_store.save_all(&game).await?;
        Ok(self.scheduler.snapshot())
    }

    pub async fn save_game(&self) -> Result<(), SaveError> {
        let game = self.game.lock().await;
        self.save_store.save_all(&game).await
    }

    pub async fn advance_time_block(&self) -> Transition {
        let mut game = self.game.lock().await;
        let transition = self.scheduler.advance_time_block();
        if transition.accepted {
            self.scheduler.sync_world(game.world_mut());
        }
        transition
    }

    pub async fn finish_night(&self) -> Transition {
        let mut game = self.game.lock().await;
        let transition = self.scheduler.finish_night();
        if transition.accepted {
            self.scheduler.sync_world(game.world_mut());
        }
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daytalk_domain::{NpcId, TimeBlock, TimeLoopEvent, WorldState};

    use crate::infrastructure::ports::MockSaveStorePort;

    const DAYS: DayRange = DayRange {
        start_day: 1,
        end_day: 30,
    };

    fn session(store: MockSaveStorePort) -> GameSession {
        GameSession::new(Arc::new(TimeScheduler::new(1, 30)), Arc::new(store), DAYS)
    }

    #[tokio::test]
    async fn load_resumes_at_saved_day_morning() {
        let mut store = MockSaveStorePort::new();
        store.expect_load_all().times(1).returning(|| {
            let mut state = GameState::new();
            state.replace_world(Some(WorldState::new(6, "night")));
            state.get_or_create_npc(&NpcId::new("yoonseo").expect("valid id"));
            Ok(state)
        });
        let session = session(store);

        let snapshot = session.load_game().await.expect("load");

        assert_eq!(snapshot.day, 6);
        assert_eq!(snapshot.block, TimeBlock::Morning);
        let game = session.lock_game().await;
        assert_eq!(*game.world(), WorldState::new(6, "morning"));
        assert_eq!(game.npcs().len(), 1);
    }

    #[tokio::test]
    async fn saved_day_beyond_end_day_is_clamped() {
        let mut store = MockSaveStorePort::new();
        store.expect_load_all().returning(|| {
            let mut state = GameState::new();
            state.replace_world(Some(WorldState::new(99, "morning")));
            Ok(state)
        });
        let session = session(store);

        let snapshot = session.load_game().await.expect("load");

        assert_eq!(snapshot.day, 30);
    }

    #[tokio::test]
    async fn advancing_updates_world_label() {
        let session = session(MockSaveStorePort::new());

        assert!(session.advance_time_block().await.accepted);

        assert_eq!(session.lock_game().await.world().time_slot, "afternoon");
    }

    #[tokio::test]
    async fn refused_advance_leaves_world_alone() {
        let session = session(MockSaveStorePort::new());
        session.scheduler().begin_event();

        assert!(!session.advance_time_block().await.accepted);
        assert!(!session.finish_night().await.accepted);

        assert_eq!(*session.lock_game().await.world(), WorldState::default());
    }

    #[tokio::test]
    async fn finish_night_moves_world_to_next_morning() {
        let session = session(MockSaveStorePort::new());
        for _ in 0..3 {
            session.advance_time_block().await;
        }

        let transition = session.finish_night().await;

        assert!(transition.accepted);
        assert_eq!(transition.events[0], TimeLoopEvent::ForcedReturnHome);
        assert_eq!(*session.lock_game().await.world(), WorldState::new(2, "morning"));
    }

    #[tokio::test]
    async fn new_game_resets_state_and_saves() {
        let mut store = MockSaveStorePort::new();
        store
            .expect_save_all()
            .withf(|state: &GameState| state.npcs().next().is_none() && state.world().day == 1)
            .times(1)
            .returning(|_| Ok(()));
        let session = session(store);
        session
            .lock_game()
            .await
            .get_or_create_npc(&NpcId::new("yoonseo").expect("valid id"));

        let snapshot = session.new_game().await.expect("new game");

        assert_eq!(snapshot.day, 1);
        assert!(session.lock_game().await.npcs().next().is_none());
    }
}
