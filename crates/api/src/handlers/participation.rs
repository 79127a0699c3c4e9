//! Join/leave handlers and the participated-events listing.

use axum::extract::{Path, State};
use axum::Json;
use clubevents_core::event::Event;
use clubevents_core::participation::{JoinOutcome, LeaveOutcome};

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::query::ParticipantBody;
use crate::response::{DataResponse, MutationResponse, ParticipationResult};
use crate::state::AppState;

/// POST /api/v1/events/{id}/join
///
/// A full event or a repeated join answers 200 with `success: false`.
pub async fn join(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ParticipantBody>,
) -> AppResult<Json<MutationResponse<ParticipationResult<JoinOutcome>>>> {
    let mutation = state.service.join_event(&id, &body.user_id).await?;
    Ok(Json(mutation.map(ParticipationResult::<JoinOutcome>::from).into()))
}

/// POST /api/v1/events/{id}/leave
pub async fn leave(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ParticipantBody>,
) -> AppResult<Json<MutationResponse<ParticipationResult<LeaveOutcome>>>> {
    let mutation = state.service.leave_event(&id, &body.user_id).await?;
    Ok(Json(mutation.map(ParticipationResult::<LeaveOutcome>::from).into()))
}

/// GET /api/v1/users/{user_id}/participations
pub async fn list_participated(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    let events = state.service.get_participated_events(&user_id).await?;
    Ok(Json(DataResponse { data: events }))
}
