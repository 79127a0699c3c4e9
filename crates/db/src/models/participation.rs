//! Row model for the `event_participations` table.

use clubevents_core::participation::Participation;
use clubevents_core::types::{EventId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ParticipationRow {
    pub event_id: EventId,
    pub user_id: String,
    pub created_at: Timestamp,
}

impl From<ParticipationRow> for Participation {
    fn from(row: ParticipationRow) -> Self {
        Participation {
            event_id: row.event_id,
            user_id: row.user_id,
            created_at: row.created_at,
        }
    }
}
