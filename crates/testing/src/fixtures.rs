//! Builders for event inputs and stored events.

use chrono::{Duration, TimeZone, Utc};
use clubevents_core::event::{Event, EventChanges, NewEvent};
use clubevents_core::types::{new_event_id, Timestamp};

pub const ORGANIZER_ID: &str = "organizer-1";
pub const ORGANIZER_NAME: &str = "Olga Organizer";

/// A valid creation input owned by [`ORGANIZER_ID`].
pub fn new_event(title: &str, max_participation: i64) -> NewEvent {
    NewEvent {
        title: title.to_string(),
        description: format!("About {title}"),
        datetime: "2026-11-01T18:00:00Z".to_string(),
        location: "Club house".to_string(),
        max_participation,
        club_id: String::new(),
        created_by_id: ORGANIZER_ID.to_string(),
        created_by_name: ORGANIZER_NAME.to_string(),
    }
}

/// Like [`new_event`] but owned by `club_id`.
pub fn new_club_event(title: &str, club_id: &str) -> NewEvent {
    NewEvent {
        club_id: club_id.to_string(),
        ..new_event(title, 10)
    }
}

pub fn changes(title: &str, max_participation: i64) -> EventChanges {
    EventChanges {
        title: title.to_string(),
        description: "Updated description".to_string(),
        datetime: "2026-12-01T10:00:00Z".to_string(),
        location: "New venue".to_string(),
        max_participation,
    }
}

/// Fixed base instant for seeded rows.
pub fn base_time() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
}

/// A stored event created `minutes_after` [`base_time`].
pub fn stored_event(title: &str, minutes_after: i64) -> Event {
    let created_at = base_time() + Duration::minutes(minutes_after);
    Event::from_new(new_event_id(), new_event(title, 10), created_at)
}
