//! Row model for the `events` table.

use clubevents_core::event::Event;
use clubevents_core::types::{EventId, Timestamp};
use sqlx::FromRow;

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub datetime: String,
    pub location: String,
    pub max_participation: i64,
    pub current_participation: i64,
    pub club_id: String,
    pub created_by_id: String,
    pub created_by_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            title: row.title,
            description: row.description,
            datetime: row.datetime,
            location: row.location,
            max_participation: row.max_participation,
            current_participation: row.current_participation,
            club_id: row.club_id,
            created_by_id: row.created_by_id,
            created_by_name: row.created_by_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
