//! Place use cases: entering places on the world map and closing their events.

use std::sync::Arc;

use daytalk_domain::{PlaceId, TimeLoopEvent};

use crate::use_cases::time::TimeScheduler;

/// What happened when the player picked a place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceEntry {
    /// Home is a scene change; no event lock is taken.
    pub returned_home: bool,
    /// False when a lock was already held, or at home.
    pub lock_taken: bool,
    pub events: Vec<TimeLoopEvent>,
}

/// Result of closing a place event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceClosed {
    /// `None` unless the close was offered as the major action.
    pub major_action_consumed: Option<bool>,
    pub events: Vec<TimeLoopEvent>,
}

pub struct PlaceEvents {
    scheduler: Arc<TimeScheduler>,
}

impl PlaceEvents {
    pub fn new(scheduler: Arc<TimeScheduler>) -> Self {
        Self { scheduler }
    }

    pub fn enter_place(&self, place: PlaceId) -> PlaceEntry {
        if !place.starts_event() {
            tracing::info!(place = %place, "Returned home");
            return PlaceEntry {
                returned_home: true,
                lock_taken: false,
                events: Vec::new(),
            };
        }

        let began = self.scheduler.begin_event();
        tracing::info!(place = %place, lock_taken = began.accepted, "Place event started");
        PlaceEntry {
            returned_home: false,
            lock_taken: began.accepted,
            events: began.events,
        }
    }

    /// End the running place event.
    ///
    /// With `as_major_action` the major action is attempted first and the
    /// result returned; otherwise `None`. The lock is cleared either way.
    pub fn close_place_event(&self, as_major_action: bool) -> PlaceClosed {
        let mut events = Vec::new();
        let consumed = as_major_action.then(|| {
            let spent = self.scheduler.consume_major_action();
            events.extend(spent.events);
            spent.accepted
        });
        events.extend(self.scheduler.end_event().events);
        tracing::info!(?consumed, "Place event closed");
        PlaceClosed {
            major_action_consumed: consumed,
            events,
        }
    }
}
