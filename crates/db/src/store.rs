//! [`EventStore`] backed by PostgreSQL.

use async_trait::async_trait;
use clubevents_core::error::StoreError;
use clubevents_core::event::{Event, EventChanges, EventFilter, EventUpdate};
use clubevents_core::participation::{Participation, SeatClaim, SeatRelease};
use clubevents_core::store::EventStore;
use clubevents_core::types::{EventId, Timestamp};

use crate::repositories::{EventRepo, ParticipationRepo};
use crate::DbPool;

/// PostgreSQL implementation of the store capability.
///
/// Cheap to clone; the pool is reference-counted.
#[derive(Clone)]
pub struct PgEventStore {
    pool: DbPool,
}

impl PgEventStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx error onto the store error taxonomy.
pub fn classify(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err.to_string()),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Corrupt(err.to_string())
        }
        other => {
            tracing::error!(error = %other, "Database error");
            StoreError::Query(other.to_string())
        }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn ping(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await.map_err(classify)
    }

    async fn insert_event(&self, event: &Event) -> Result<(), StoreError> {
        EventRepo::insert(&self.pool, event).await.map_err(classify)
    }

    async fn find_event(&self, id: EventId) -> Result<Option<Event>, StoreError> {
        EventRepo::find_by_id(&self.pool, id).await.map_err(classify)
    }

    async fn find_events(&self, filter: &EventFilter) -> Result<Vec<Event>, StoreError> {
        EventRepo::list(&self.pool, filter).await.map_err(classify)
    }

    async fn find_events_by_ids(&self, ids: &[EventId]) -> Result<Vec<Event>, StoreError> {
        EventRepo::find_by_ids(&self.pool, ids)
            .await
            .map_err(classify)
    }

    async fn update_event(
        &self,
        id: EventId,
        changes: &EventChanges,
        updated_at: Timestamp,
    ) -> Result<EventUpdate, StoreError> {
        EventRepo::update(&self.pool, id, changes, updated_at)
            .await
            .map_err(classify)
    }

    async fn delete_event(&self, id: EventId) -> Result<bool, StoreError> {
        EventRepo::delete(&self.pool, id).await.map_err(classify)
    }

    async fn find_participation(
        &self,
        event_id: EventId,
        user_id: &str,
    ) -> Result<Option<Participation>, StoreError> {
        ParticipationRepo::find(&self.pool, event_id, user_id)
            .await
            .map_err(classify)
    }

    async fn list_participations_for_event(
        &self,
        event_id: EventId,
    ) -> Result<Vec<Participation>, StoreError> {
        ParticipationRepo::list_for_event(&self.pool, event_id)
            .await
            .map_err(classify)
    }

    async fn list_participations_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Participation>, StoreError> {
        ParticipationRepo::list_for_user(&self.pool, user_id)
            .await
            .map_err(classify)
    }

    async fn count_participations(&self, event_id: EventId) -> Result<i64, StoreError> {
        ParticipationRepo::count_for_event(&self.pool, event_id)
            .await
            .map_err(classify)
    }

    async fn delete_participations_for_event(
        &self,
        event_id: EventId,
    ) -> Result<u64, StoreError> {
        ParticipationRepo::delete_for_event(&self.pool, event_id)
            .await
            .map_err(classify)
    }

    async fn join_event(&self, event_id: EventId, user_id: &str) -> Result<SeatClaim, StoreError> {
        ParticipationRepo::join(&self.pool, event_id, user_id)
            .await
            .map_err(classify)
    }

    async fn leave_event(
        &self,
        event_id: EventId,
        user_id: &str,
    ) -> Result<SeatRelease, StoreError> {
        ParticipationRepo::leave(&self.pool, event_id, user_id)
            .await
            .map_err(classify)
    }
}
