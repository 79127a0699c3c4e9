//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Mutating endpoints add
//! a `notifications` array reporting what happened to each side effect.

use clubevents_core::participation::{JoinOutcome, LeaveOutcome};
use clubevents_service::{Delivery, Mutation};
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": T, "notifications": [...] }` for mutating endpoints.
#[derive(Debug, Serialize)]
pub struct MutationResponse<T: Serialize> {
    pub data: T,
    pub notifications: Vec<Delivery>,
}

impl<T: Serialize> From<Mutation<T>> for MutationResponse<T> {
    fn from(mutation: Mutation<T>) -> Self {
        Self {
            data: mutation.value,
            notifications: mutation.deliveries,
        }
    }
}

/// Join/leave result: a success flag plus the outcome name.
#[derive(Debug, Serialize)]
pub struct ParticipationResult<O: Serialize> {
    pub success: bool,
    pub outcome: O,
}

impl From<JoinOutcome> for ParticipationResult<JoinOutcome> {
    fn from(outcome: JoinOutcome) -> Self {
        Self {
            success: outcome.is_success(),
            outcome,
        }
    }
}

impl From<LeaveOutcome> for ParticipationResult<LeaveOutcome> {
    fn from(outcome: LeaveOutcome) -> Self {
        Self {
            success: outcome.is_success(),
            outcome,
        }
    }
}

/// Body of a successful delete.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: bool,
}
