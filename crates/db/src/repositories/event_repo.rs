//! Repository for the `events` table.

use clubevents_core::event::{escape_like, Event, EventChanges, EventFilter, EventUpdate};
use clubevents_core::types::{EventId, Timestamp};
use sqlx::PgPool;

use crate::models::event::EventRow;

/// Column list for `events` queries.
const COLUMNS: &str = "id, title, description, datetime, location, max_participation, \
     current_participation, club_id, created_by_id, created_by_name, created_at, updated_at";

/// Provides CRUD and list operations for events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a fully-built event (id and timestamps already set).
    pub async fn insert(pool: &PgPool, event: &Event) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO events \
                (id, title, description, datetime, location, max_participation, \
                 current_participation, club_id, created_by_id, created_by_name, \
                 created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.datetime)
        .bind(&event.location)
        .bind(event.max_participation)
        .bind(event.current_participation)
        .bind(&event.club_id)
        .bind(&event.created_by_id)
        .bind(&event.created_by_name)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn find_by_id(pool: &PgPool, id: EventId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        let row = sqlx::query_as::<_, EventRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Event::from))
    }

    /// Fetch every event whose id is in `ids`. Unknown ids are ignored.
    pub async fn find_by_ids(pool: &PgPool, ids: &[EventId]) -> Result<Vec<Event>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = ANY($1)");
        let rows = sqlx::query_as::<_, EventRow>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    /// List events matching `filter`, newest first.
    pub async fn list(pool: &PgPool, filter: &EventFilter) -> Result<Vec<Event>, sqlx::Error> {
        const ORDER: &str = "ORDER BY created_at DESC, id DESC";

        let rows = match filter {
            EventFilter::All => {
                let query = format!("SELECT {COLUMNS} FROM events {ORDER}");
                sqlx::query_as::<_, EventRow>(&query).fetch_all(pool).await?
            }
            EventFilter::CreatedBy(user_id) => {
                let query =
                    format!("SELECT {COLUMNS} FROM events WHERE created_by_id = $1 {ORDER}");
                sqlx::query_as::<_, EventRow>(&query)
                    .bind(user_id)
                    .fetch_all(pool)
                    .await?
            }
            EventFilter::Club(club_id) => {
                let query = format!("SELECT {COLUMNS} FROM events WHERE club_id = $1 {ORDER}");
                sqlx::query_as::<_, EventRow>(&query)
                    .bind(club_id)
                    .fetch_all(pool)
                    .await?
            }
            EventFilter::Search { query: text, club_id } => {
                let pattern = format!("%{}%", escape_like(text));
                let club_clause = if club_id.is_some() {
                    "AND club_id = $2"
                } else {
                    ""
                };
                let query = format!(
                    "SELECT {COLUMNS} FROM events \
                     WHERE (title ILIKE $1 ESCAPE '\\' OR description ILIKE $1 ESCAPE '\\') \
                     {club_clause} {ORDER}"
                );
                let mut q = sqlx::query_as::<_, EventRow>(&query).bind(pattern);
                if let Some(club_id) = club_id {
                    q = q.bind(club_id);
                }
                q.fetch_all(pool).await?
            }
        };

        Ok(rows.into_iter().map(Event::from).collect())
    }

    /// Overwrite the mutable fields of an event.
    ///
    /// The write only lands while `current_participation` fits under the new
    /// cap; otherwise the current counter is reported back.
    pub async fn update(
        pool: &PgPool,
        id: EventId,
        changes: &EventChanges,
        updated_at: Timestamp,
    ) -> Result<EventUpdate, sqlx::Error> {
        // The capacity guard sits in the WHERE clause so a join committed
        // after the caller's read cannot leave the counter above the cap.
        let updated: Option<EventId> = sqlx::query_scalar(
            "UPDATE events \
             SET title = $2, description = $3, datetime = $4, location = $5, \
                 max_participation = $6, updated_at = $7 \
             WHERE id = $1 AND current_participation <= $6 \
             RETURNING id",
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(&changes.datetime)
        .bind(&changes.location)
        .bind(changes.max_participation)
        .bind(updated_at)
        .fetch_optional(pool)
        .await?;

        if updated.is_some() {
            return Ok(EventUpdate::Updated);
        }

        let current: Option<i64> =
            sqlx::query_scalar("SELECT current_participation FROM events WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(match current {
            Some(current_participation) => EventUpdate::BelowParticipation {
                current_participation,
            },
            None => EventUpdate::Missing,
        })
    }

    /// Delete an event row. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: EventId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
