//! Participation records and the outcomes of joining or leaving an event.

use serde::{Deserialize, Serialize};

use crate::types::{EventId, Timestamp};

/// One user attending one event. Unique per `(event_id, user_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participation {
    pub event_id: EventId,
    pub user_id: String,
    pub created_at: Timestamp,
}

/// Result of the store's atomic "insert participation and bump the counter".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatClaim {
    /// The participation was inserted; carries the new counter value.
    Claimed { current_participation: i64 },
    Full,
    AlreadyJoined,
    EventMissing,
}

/// Result of the store's atomic "delete participation and drop the counter".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatRelease {
    Released { current_participation: i64 },
    NotParticipating,
}

/// Outcome of a join request. Rejections are expected states, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinOutcome {
    Joined,
    EventFull,
    AlreadyJoined,
}

impl JoinOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, JoinOutcome::Joined)
    }
}

/// Outcome of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveOutcome {
    Left,
    NotParticipating,
}

impl LeaveOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, LeaveOutcome::Left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_joined_and_left_are_successes() {
        assert!(JoinOutcome::Joined.is_success());
        assert!(!JoinOutcome::EventFull.is_success());
        assert!(!JoinOutcome::AlreadyJoined.is_success());
        assert!(LeaveOutcome::Left.is_success());
        assert!(!LeaveOutcome::NotParticipating.is_success());
    }

    #[test]
    fn outcomes_serialize_as_snake_case() {
        assert_eq!(
            serde_json::to_value(JoinOutcome::EventFull).unwrap(),
            "event_full"
        );
        assert_eq!(
            serde_json::to_value(LeaveOutcome::NotParticipating).unwrap(),
            "not_participating"
        );
    }
}
