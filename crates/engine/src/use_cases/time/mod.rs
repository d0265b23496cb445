//! Time use cases.
//!
//! `TimeScheduler` is the single authority on day, time block, the major
//! action and the event lock for a running session. It wraps the domain
//! `TimeLoop` behind a mutex and republishes every committed transition on a
//! broadcast channel, so listeners always observe consistent state.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use daytalk_domain::{TimeLoop, TimeLoopEvent, TimeLoopRefusal, TimeLoopSnapshot, WorldState};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Outcome of a guarded scheduler request.
///
/// `events` holds exactly what was published for this request, in order;
/// it is empty when the request was refused or changed nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    pub accepted: bool,
    pub events: Vec<TimeLoopEvent>,
}

impl Transition {
    pub fn refused() -> Self {
        Self::default()
    }
}

pub struct TimeScheduler {
    state: Mutex<TimeLoop>,
    events: broadcast::Sender<TimeLoopEvent>,
}

impl TimeScheduler {
    /// Create a scheduler already initialized for a new game.
    pub fn new(start_day: u32, end_day: u32) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Mutex::new(TimeLoop::new_game(start_day, end_day)),
            events,
        }
    }

    /// Receive every transition committed after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<TimeLoopEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> TimeLoopSnapshot {
        self.lock().snapshot()
    }

    pub fn is_event_locked(&self) -> bool {
        self.lock().is_event_locked()
    }

    pub fn can_consume_major_action(&self) -> bool {
        self.lock().can_consume_major_action()
    }

    /// Copy day and block into the saved world state.
    pub fn sync_world(&self, world: &mut WorldState) {
        world.sync_from(&self.lock());
    }

    pub fn initialize_new_game(&self, start_day: u32, end_day: u32) -> Transition {
        let events = self.lock().initialize_new_game(start_day, end_day);
        tracing::info!(start_day, end_day, "New game initialized");
        self.publish(events)
    }

    /// Lock block transitions. Accepted only if this call took the lock.
    pub fn begin_event(&self) -> Transition {
        let event = self.lock().begin_event();
        self.publish_one(event)
    }

    /// Release the event lock. Accepted only if this call released it.
    pub fn end_event(&self) -> Transition {
        let event = self.lock().end_event();
        self.publish_one(event)
    }

    pub fn consume_major_action(&self) -> Transition {
        let result = self.lock().consume_major_action();
        self.accept(result.map(|event| vec![event]), "consume major action")
    }

    pub fn advance_time_block(&self) -> Transition {
        let result = self.lock().advance_time_block();
        self.accept(result, "advance time block")
    }

    pub fn finish_night(&self) -> Transition {
        let result = self.lock().finish_night();
        self.accept(result, "finish night")
    }

    fn lock(&self) -> MutexGuard<'_, TimeLoop> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn accept(
        &self,
        result: Result<Vec<TimeLoopEvent>, TimeLoopRefusal>,
        operation: &'static str,
    ) -> Transition {
        match result {
            Ok(events) => self.publish(events),
            Err(refusal) => {
                tracing::debug!(operation, reason = %refusal, "Time loop request refused");
                Transition::refused()
            }
        }
    }

    fn publish_one(&self, event: Option<TimeLoopEvent>) -> Transition {
        match event {
            Some(event) => self.publish(vec![event]),
            None => Transition::refused(),
        }
    }

    fn publish(&self, events: Vec<TimeLoopEvent>) -> Transition {
        for event in &events {
            tracing::debug!(?event, "Time loop event");
            // No subscribers is fine
            let _ = self.events.send(*event);
        }
        Transition {
            accepted: true,
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daytalk_domain::TimeBlock;

    fn drain(rx: &mut broadcast::Receiver<TimeLoopEvent>) -> Vec<TimeLoopEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn publishes_transitions_after_commit() {
        let scheduler = TimeScheduler::new(1, 30);
        let mut rx = scheduler.subscribe();

        assert!(scheduler.advance_time_block().accepted);

        assert_eq!(
            drain(&mut rx),
            vec![
                TimeLoopEvent::TimeBlockChanged {
                    block: TimeBlock::Day
                },
                TimeLoopEvent::MajorActionUsedChanged { used: false },
            ]
        );
        assert_eq!(scheduler.snapshot().block, TimeBlock::Day);
    }

    #[test]
    fn refused_requests_publish_nothing() {
        let scheduler = TimeScheduler::new(1, 30);
        assert!(scheduler.begin_event().accepted);
        let mut rx = scheduler.subscribe();

        assert!(!scheduler.advance_time_block().accepted);
        assert!(!scheduler.finish_night().accepted);
        assert!(!scheduler.begin_event().accepted);

        assert!(drain(&mut rx).is_empty());
        assert_eq!(scheduler.snapshot().block, TimeBlock::Morning);
    }

    #[test]
    fn major_action_is_single_use_until_next_block() {
        let scheduler = TimeScheduler::new(1, 30);
        assert!(scheduler.consume_major_action().accepted);
        assert!(!scheduler.consume_major_action().accepted);
        assert!(scheduler.advance_time_block().accepted);
        assert!(scheduler.consume_major_action().accepted);
    }

    #[test]
    fn initialize_emits_full_snapshot() {
        let scheduler = TimeScheduler::new(1, 30);
        scheduler.begin_event();
        let mut rx = scheduler.subscribe();

        scheduler.initialize_new_game(5, 10);

        let events = drain(&mut rx);
        assert_eq!(events.len(), 4);
        assert!(events.contains(&TimeLoopEvent::DayChanged { day: 5 }));
        assert!(events.contains(&TimeLoopEvent::EventLockChanged { locked: false }));
        assert!(!scheduler.is_event_locked());
    }

    #[test]
    fn leaving_night_returns_the_forced_return_home() {
        let scheduler = TimeScheduler::new(1, 30);
        for _ in 0..3 {
            scheduler.advance_time_block();
        }

        let transition = scheduler.advance_time_block();

        assert!(transition.accepted);
        assert_eq!(
            transition.events,
            vec![
                TimeLoopEvent::ForcedReturnHome,
                TimeLoopEvent::DayChanged { day: 2 },
                TimeLoopEvent::TimeBlockChanged {
                    block: TimeBlock::Morning
                },
                TimeLoopEvent::MajorActionUsedChanged { used: false },
            ]
        );
    }

    #[test]
    fn returned_events_match_what_subscribers_see() {
        let scheduler = TimeScheduler::new(1, 30);
        let mut rx = scheduler.subscribe();

        let began = scheduler.begin_event();
        let again = scheduler.begin_event();

        assert_eq!(began.events, drain(&mut rx));
        assert_eq!(again, Transition::refused());
    }

    #[test]
    fn sync_world_copies_day_and_slot() {
        let scheduler = TimeScheduler::new(2, 30);
        scheduler.advance_time_block();
        scheduler.advance_time_block();

        let mut world = WorldState::default();
        scheduler.sync_world(&mut world);

        assert_eq!(world, WorldState::new(2, "evening"));
    }
}
