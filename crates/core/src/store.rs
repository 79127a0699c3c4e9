//! Persistence capability consumed by the event service.
//!
//! The store is pure data access: it applies no business rules beyond the
//! atomic seat operations, which must re-check capacity and uniqueness in the
//! same round trip as the write.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::event::{Event, EventChanges, EventFilter, EventUpdate};
use crate::participation::{Participation, SeatClaim, SeatRelease};
use crate::types::{EventId, Timestamp};

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Verify the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn insert_event(&self, event: &Event) -> Result<(), StoreError>;

    async fn find_event(&self, id: EventId) -> Result<Option<Event>, StoreError>;

    /// Events matching `filter`, newest-first by `created_at`.
    async fn find_events(&self, filter: &EventFilter) -> Result<Vec<Event>, StoreError>;

    /// Batch fetch. Unknown ids are skipped; order is unspecified.
    async fn find_events_by_ids(&self, ids: &[EventId]) -> Result<Vec<Event>, StoreError>;

    /// Overwrite the mutable fields and `updated_at`.
    ///
    /// The new `max_participation` must be checked against the counter in the
    /// same operation as the write, so a join landing between the caller's
    /// read and this call cannot leave the event overbooked.
    async fn update_event(
        &self,
        id: EventId,
        changes: &EventChanges,
        updated_at: Timestamp,
    ) -> Result<EventUpdate, StoreError>;

    /// Returns `false` when no event has that id.
    async fn delete_event(&self, id: EventId) -> Result<bool, StoreError>;

    async fn find_participation(
        &self,
        event_id: EventId,
        user_id: &str,
    ) -> Result<Option<Participation>, StoreError>;

    async fn list_participations_for_event(
        &self,
        event_id: EventId,
    ) -> Result<Vec<Participation>, StoreError>;

    async fn list_participations_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Participation>, StoreError>;

    async fn count_participations(&self, event_id: EventId) -> Result<i64, StoreError>;

    /// Remove every participation of an event, returning how many went.
    async fn delete_participations_for_event(&self, event_id: EventId)
        -> Result<u64, StoreError>;

    /// Insert the participation and increment the counter by one, atomically.
    ///
    /// Must re-check existence, uniqueness and capacity as part of the same
    /// operation so concurrent joins cannot overbook.
    async fn join_event(&self, event_id: EventId, user_id: &str)
        -> Result<SeatClaim, StoreError>;

    /// Delete the participation and decrement the counter by one, atomically.
    /// The counter never goes below zero.
    async fn leave_event(
        &self,
        event_id: EventId,
        user_id: &str,
    ) -> Result<SeatRelease, StoreError>;
}
