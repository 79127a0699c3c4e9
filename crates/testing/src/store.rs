//! In-memory event store.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use clubevents_core::error::StoreError;
use clubevents_core::event::{sort_newest_first, Event, EventChanges, EventFilter, EventUpdate};
use clubevents_core::participation::{Participation, SeatClaim, SeatRelease};
use clubevents_core::store::EventStore;
use clubevents_core::types::{EventId, Timestamp};

/// Store operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Ping,
    InsertEvent,
    FindEvent,
    FindEvents,
    UpdateEvent,
    DeleteEvent,
    FindParticipation,
    ListParticipations,
    DeleteParticipations,
    Join,
    Leave,
}

#[derive(Default)]
struct State {
    events: Vec<Event>,
    participations: Vec<Participation>,
}

impl State {
    fn claim_seat(&mut self, event_id: EventId, user_id: &str) -> SeatClaim {
        let State {
            events,
            participations,
        } = self;

        let Some(event) = events.iter_mut().find(|e| e.id == event_id) else {
            return SeatClaim::EventMissing;
        };
        if event.is_full() {
            return SeatClaim::Full;
        }
        if participations
            .iter()
            .any(|p| p.event_id == event_id && p.user_id == user_id)
        {
            return SeatClaim::AlreadyJoined;
        }

        participations.push(Participation {
            event_id,
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        });
        event.current_participation += 1;
        SeatClaim::Claimed {
            current_participation: event.current_participation,
        }
    }
}

/// [`EventStore`] over two vectors behind one lock.
///
/// `join_event` and `leave_event` run under a single write lock, so they are
/// as atomic as the Postgres transaction they stand in for.
#[derive(Default)]
pub struct InMemoryEventStore {
    state: RwLock<State>,
    failing: Mutex<HashSet<StoreOp>>,
    joins_before_update: Mutex<Vec<(EventId, String)>>,
    calls: AtomicUsize,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later call of `op` return [`StoreError::Unavailable`].
    pub fn fail_on(&self, op: StoreOp) {
        self.failing.lock().unwrap().insert(op);
    }

    /// Have `user_id` join `event_id` inside the next `update_event` call,
    /// after the caller has read the event but before the write lands.
    pub fn join_before_next_update(&self, event_id: EventId, user_id: &str) {
        self.joins_before_update
            .lock()
            .unwrap()
            .push((event_id, user_id.to_string()));
    }

    /// Number of trait calls made so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Put an event in place as-is, bypassing the trait (and the counter).
    pub fn seed_event(&self, event: Event) {
        self.state.write().unwrap().events.push(event);
    }

    /// Put a participation row in place without touching the event counter.
    pub fn seed_participation(&self, event_id: EventId, user_id: &str, created_at: Timestamp) {
        self.state.write().unwrap().participations.push(Participation {
            event_id,
            user_id: user_id.to_string(),
            created_at,
        });
    }

    pub fn event_count(&self) -> usize {
        self.state.read().unwrap().events.len()
    }

    pub fn participation_count(&self) -> usize {
        self.state.read().unwrap().participations.len()
    }

    pub fn snapshot_event(&self, id: EventId) -> Option<Event> {
        self.state
            .read()
            .unwrap()
            .events
            .iter()
            .find(|e| e.id == id)
            .cloned()
    }

    fn enter(&self, op: StoreOp) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(&op) {
            return Err(StoreError::Unavailable(format!("{op:?} is failing")));
        }
        Ok(())
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.enter(StoreOp::Ping)
    }

    async fn insert_event(&self, event: &Event) -> Result<(), StoreError> {
        self.enter(StoreOp::InsertEvent)?;
        let mut state = self.state.write().unwrap();
        if state.events.iter().any(|e| e.id == event.id) {
            return Err(StoreError::Query(format!("duplicate event id {}", event.id)));
        }
        state.events.push(event.clone());
        Ok(())
    }

    async fn find_event(&self, id: EventId) -> Result<Option<Event>, StoreError> {
        self.enter(StoreOp::FindEvent)?;
        Ok(self.snapshot_event(id))
    }

    async fn find_events(&self, filter: &EventFilter) -> Result<Vec<Event>, StoreError> {
        self.enter(StoreOp::FindEvents)?;
        let mut events: Vec<Event> = self
            .state
            .read()
            .unwrap()
            .events
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        sort_newest_first(&mut events);
        Ok(events)
    }

    async fn find_events_by_ids(&self, ids: &[EventId]) -> Result<Vec<Event>, StoreError> {
        self.enter(StoreOp::FindEvents)?;
        Ok(self
            .state
            .read()
            .unwrap()
            .events
            .iter()
            .filter(|e| ids.contains(&e.id))
            .cloned()
            .collect())
    }

    async fn update_event(
        &self,
        id: EventId,
        changes: &EventChanges,
        updated_at: Timestamp,
    ) -> Result<EventUpdate, StoreError> {
        self.enter(StoreOp::UpdateEvent)?;
        let mut state = self.state.write().unwrap();
        for (event_id, user_id) in self.joins_before_update.lock().unwrap().drain(..) {
            state.claim_seat(event_id, &user_id);
        }

        let Some(event) = state.events.iter_mut().find(|e| e.id == id) else {
            return Ok(EventUpdate::Missing);
        };
        if event.current_participation > changes.max_participation {
            return Ok(EventUpdate::BelowParticipation {
                current_participation: event.current_participation,
            });
        }
        event.apply_changes(changes, updated_at);
        Ok(EventUpdate::Updated)
    }

    async fn delete_event(&self, id: EventId) -> Result<bool, StoreError> {
        self.enter(StoreOp::DeleteEvent)?;
        let mut state = self.state.write().unwrap();
        let before = state.events.len();
        state.events.retain(|e| e.id != id);
        Ok(state.events.len() < before)
    }

    async fn find_participation(
        &self,
        event_id: EventId,
        user_id: &str,
    ) -> Result<Option<Participation>, StoreError> {
        self.enter(StoreOp::FindParticipation)?;
        Ok(self
            .state
            .read()
            .unwrap()
            .participations
            .iter()
            .find(|p| p.event_id == event_id && p.user_id == user_id)
            .cloned())
    }

    async fn list_participations_for_event(
        &self,
        event_id: EventId,
    ) -> Result<Vec<Participation>, StoreError> {
        self.enter(StoreOp::ListParticipations)?;
        Ok(self
            .state
            .read()
            .unwrap()
            .participations
            .iter()
            .filter(|p| p.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn list_participations_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Participation>, StoreError> {
        self.enter(StoreOp::ListParticipations)?;
        Ok(self
            .state
            .read()
            .unwrap()
            .participations
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn count_participations(&self, event_id: EventId) -> Result<i64, StoreError> {
        self.enter(StoreOp::ListParticipations)?;
        let count = self
            .state
            .read()
            .unwrap()
            .participations
            .iter()
            .filter(|p| p.event_id == event_id)
            .count();
        Ok(count as i64)
    }

    async fn delete_participations_for_event(
        &self,
        event_id: EventId,
    ) -> Result<u64, StoreError> {
        self.enter(StoreOp::DeleteParticipations)?;
        let mut state = self.state.write().unwrap();
        let before = state.participations.len();
        state.participations.retain(|p| p.event_id != event_id);
        Ok((before - state.participations.len()) as u64)
    }

    async fn join_event(&self, event_id: EventId, user_id: &str) -> Result<SeatClaim, StoreError> {
        self.enter(StoreOp::Join)?;
        Ok(self.state.write().unwrap().claim_seat(event_id, user_id))
    }

    async fn leave_event(
        &self,
        event_id: EventId,
        user_id: &str,
    ) -> Result<SeatRelease, StoreError> {
        self.enter(StoreOp::Leave)?;
        let mut state = self.state.write().unwrap();
        let before = state.participations.len();
        state
            .participations
            .retain(|p| !(p.event_id == event_id && p.user_id == user_id));
        if state.participations.len() == before {
            return Ok(SeatRelease::NotParticipating);
        }

        let current_participation = match state.events.iter_mut().find(|e| e.id == event_id) {
            Some(event) => {
                event.current_participation = (event.current_participation - 1).max(0);
                event.current_participation
            }
            None => 0,
        };
        Ok(SeatRelease::Released {
            current_participation,
        })
    }
}
