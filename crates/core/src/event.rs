//! Event records, their inputs, and the list filters the store understands.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{EventId, Timestamp};

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A scheduled club activity with a participation cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    /// Caller-supplied date/time, stored as given.
    pub datetime: String,
    pub location: String,
    pub max_participation: i64,
    /// Number of participation records for this event, kept in lockstep by
    /// the store's join/leave operations.
    pub current_participation: i64,
    /// Owning club; empty for a public event.
    pub club_id: String,
    pub created_by_id: String,
    pub created_by_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Event {
    /// Build a brand-new event from validated input.
    ///
    /// The counter starts at zero and both timestamps are `now`.
    pub fn from_new(id: EventId, input: NewEvent, now: Timestamp) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            datetime: input.datetime,
            location: input.location,
            max_participation: input.max_participation,
            current_participation: 0,
            club_id: input.club_id,
            created_by_id: input.created_by_id,
            created_by_name: input.created_by_name,
            created_at: now,
            updated_at: now,
        }
    }

    /// `true` when no seat is left.
    pub fn is_full(&self) -> bool {
        self.current_participation >= self.max_participation
    }

    /// Overwrite the mutable fields. Club, creator and counters are untouched.
    pub fn apply_changes(&mut self, changes: &EventChanges, now: Timestamp) {
        self.title.clone_from(&changes.title);
        self.description.clone_from(&changes.description);
        self.datetime.clone_from(&changes.datetime);
        self.location.clone_from(&changes.location);
        self.max_participation = changes.max_participation;
        self.updated_at = now;
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Input for creating an event.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub datetime: String,
    #[serde(default)]
    pub location: String,
    pub max_participation: i64,
    #[serde(default)]
    pub club_id: String,
    pub created_by_id: String,
    #[serde(default)]
    pub created_by_name: String,
}

impl NewEvent {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_title(&self.title)?;
        validate_max_participation(self.max_participation)?;
        if self.created_by_id.trim().is_empty() {
            return Err(CoreError::Validation(
                "created_by_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// The five fields an update may overwrite.
#[derive(Debug, Clone, Deserialize)]
pub struct EventChanges {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub datetime: String,
    #[serde(default)]
    pub location: String,
    pub max_participation: i64,
}

impl EventChanges {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_title(&self.title)?;
        validate_max_participation(self.max_participation)
    }

    /// Reject a capacity below the number of people already signed up.
    pub fn check_against(&self, current: &Event) -> Result<(), CoreError> {
        if self.max_participation < current.current_participation {
            return Err(below_participation(
                self.max_participation,
                current.current_participation,
            ));
        }
        Ok(())
    }
}

/// What a guarded update did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventUpdate {
    Updated,
    /// No event has that id.
    Missing,
    /// The new cap is below the participant count seen at write time; nothing
    /// was written.
    BelowParticipation { current_participation: i64 },
}

impl EventUpdate {
    /// Turn a non-`Updated` outcome into the matching service error.
    pub fn into_result(self, id: EventId, max_participation: i64) -> Result<(), CoreError> {
        match self {
            EventUpdate::Updated => Ok(()),
            EventUpdate::Missing => Err(CoreError::event_not_found(id)),
            EventUpdate::BelowParticipation {
                current_participation,
            } => Err(below_participation(max_participation, current_participation)),
        }
    }
}

fn below_participation(max: i64, current: i64) -> CoreError {
    CoreError::Validation(format!(
        "max_participation ({max}) is below current participation ({current})"
    ))
}

fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("title must not be empty".to_string()));
    }
    Ok(())
}

fn validate_max_participation(max: i64) -> Result<(), CoreError> {
    if max < 0 {
        return Err(CoreError::Validation(format!(
            "max_participation must be >= 0, got {max}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Which events a list query returns. Results are always newest-first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventFilter {
    All,
    CreatedBy(String),
    Club(String),
    /// Case-insensitive substring over title or description, optionally
    /// restricted to one club. An empty query matches everything.
    Search {
        query: String,
        club_id: Option<String>,
    },
}

impl EventFilter {
    /// Build a search filter, treating an empty club id as "no restriction".
    pub fn search(query: impl Into<String>, club_id: Option<&str>) -> Self {
        let club_id = club_id
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        EventFilter::Search {
            query: query.into(),
            club_id,
        }
    }

    /// Evaluate the filter against one event in memory.
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::CreatedBy(user_id) => event.created_by_id == *user_id,
            EventFilter::Club(club_id) => event.club_id == *club_id,
            EventFilter::Search { query, club_id } => {
                if let Some(club_id) = club_id {
                    if event.club_id != *club_id {
                        return false;
                    }
                }
                contains_ignore_case(&event.title, query)
                    || contains_ignore_case(&event.description, query)
            }
        }
    }
}

/// Case-insensitive substring test. The empty needle matches any haystack.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Escape `%`, `_` and `\` so a user query is matched literally by `LIKE`.
///
/// Pair with `ESCAPE '\'` in the SQL.
pub fn escape_like(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Order events newest-first, breaking ties on the (time-ordered) id.
pub fn sort_newest_first(events: &mut [Event]) {
    events.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;
    use crate::types::new_event_id;

    fn new_event(title: &str, description: &str, club_id: &str) -> NewEvent {
        NewEvent {
            title: title.to_string(),
            description: description.to_string(),
            datetime: "2026-11-01T18:00".to_string(),
            location: "Hall A".to_string(),
            max_participation: 10,
            club_id: club_id.to_string(),
            created_by_id: "u-1".to_string(),
            created_by_name: "Ada".to_string(),
        }
    }

    fn event(title: &str, description: &str, club_id: &str) -> Event {
        Event::from_new(new_event_id(), new_event(title, description, club_id), Utc::now())
    }

    #[test]
    fn from_new_starts_with_zero_participation() {
        let e = event("Chess night", "", "");
        assert_eq!(e.current_participation, 0);
        assert_eq!(e.max_participation, 10);
        assert_eq!(e.created_at, e.updated_at);
    }

    #[test]
    fn new_event_validation() {
        assert!(new_event("Run", "", "").validate().is_ok());
        assert_matches!(
            new_event("  ", "", "").validate(),
            Err(CoreError::Validation(_))
        );

        let mut negative = new_event("Run", "", "");
        negative.max_participation = -1;
        assert_matches!(negative.validate(), Err(CoreError::Validation(_)));

        let mut anonymous = new_event("Run", "", "");
        anonymous.created_by_id = String::new();
        assert_matches!(anonymous.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn zero_capacity_event_is_full() {
        let mut e = event("Closed", "", "");
        e.max_participation = 0;
        assert!(e.is_full());
    }

    #[test]
    fn apply_changes_leaves_owner_and_counter_alone() {
        let mut e = event("Old", "old desc", "club-1");
        e.current_participation = 3;
        let later = e.created_at + Duration::seconds(5);

        e.apply_changes(
            &EventChanges {
                title: "New".into(),
                description: "new desc".into(),
                datetime: "tomorrow".into(),
                location: "Park".into(),
                max_participation: 20,
            },
            later,
        );

        assert_eq!(e.title, "New");
        assert_eq!(e.location, "Park");
        assert_eq!(e.max_participation, 20);
        assert_eq!(e.current_participation, 3);
        assert_eq!(e.club_id, "club-1");
        assert_eq!(e.created_by_id, "u-1");
        assert_eq!(e.updated_at, later);
    }

    #[test]
    fn capacity_cannot_drop_below_participants() {
        let mut e = event("Full house", "", "");
        e.current_participation = 5;
        let changes = EventChanges {
            title: "Full house".into(),
            description: String::new(),
            datetime: String::new(),
            location: String::new(),
            max_participation: 4,
        };
        assert_matches!(changes.check_against(&e), Err(CoreError::Validation(_)));
    }

    #[test]
    fn guarded_update_outcomes_map_to_errors() {
        let id = new_event_id();
        assert!(EventUpdate::Updated.into_result(id, 3).is_ok());
        assert_matches!(
            EventUpdate::Missing.into_result(id, 3),
            Err(CoreError::NotFound { .. })
        );
        assert_matches!(
            EventUpdate::BelowParticipation {
                current_participation: 4
            }
            .into_result(id, 3),
            Err(CoreError::Validation(msg)) if msg.contains("(4)")
        );
    }

    #[test]
    fn search_matches_title_or_description_case_insensitively() {
        let e = event("Board Games", "Bring your own DICE", "");
        assert!(EventFilter::search("board", None).matches(&e));
        assert!(EventFilter::search("dice", None).matches(&e));
        assert!(!EventFilter::search("karaoke", None).matches(&e));
    }

    #[test]
    fn empty_search_matches_everything_in_club() {
        let in_club = event("A", "", "club-1");
        let elsewhere = event("B", "", "club-2");
        let filter = EventFilter::search("", Some("club-1"));
        assert!(filter.matches(&in_club));
        assert!(!filter.matches(&elsewhere));
    }

    #[test]
    fn blank_club_id_means_no_restriction() {
        assert_eq!(
            EventFilter::search("x", Some("  ")),
            EventFilter::Search {
                query: "x".into(),
                club_id: None
            }
        );
    }

    #[test]
    fn escape_like_escapes_metacharacters() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn sort_newest_first_orders_by_created_at_desc() {
        let mut older = event("older", "", "");
        older.created_at -= Duration::minutes(10);
        let newer = event("newer", "", "");
        let mut events = vec![older.clone(), newer.clone()];

        sort_newest_first(&mut events);

        assert_eq!(events[0].id, newer.id);
        assert_eq!(events[1].id, older.id);
    }
}
