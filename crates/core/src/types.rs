use chrono::SubsecRound;

use crate::error::CoreError;

/// Event primary keys are time-ordered UUIDs (v7), generated server-side.
pub type EventId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Current time at the precision Postgres keeps (microseconds), so values
/// handed back before a round trip equal the ones read afterwards.
pub fn now() -> Timestamp {
    chrono::Utc::now().trunc_subsecs(6)
}

/// Generate a fresh event id.
pub fn new_event_id() -> EventId {
    uuid::Uuid::now_v7()
}

/// Parse a caller-supplied event id.
///
/// Returns [`CoreError::InvalidId`] when the string is not a well-formed UUID,
/// so callers can reject the request before any store round trip.
pub fn parse_event_id(raw: &str) -> Result<EventId, CoreError> {
    uuid::Uuid::parse_str(raw.trim()).map_err(|_| CoreError::InvalidId {
        entity: "Event",
        raw: raw.to_string(),
    })
}

/// Validate an opaque user identifier issued by the user directory.
///
/// User ids are not parsed; they only need to be non-blank.
pub fn validate_user_id(raw: &str) -> Result<&str, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidId {
            entity: "User",
            raw: raw.to_string(),
        });
    }
    Ok(trimmed)
}
