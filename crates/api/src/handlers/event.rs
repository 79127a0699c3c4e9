//! Handlers for the `/events` resource and the per-user/per-club listings.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use clubevents_core::event::{Event, EventChanges, NewEvent};

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::query::SearchParams;
use crate::response::{DataResponse, Deleted, MutationResponse};
use crate::state::AppState;

/// POST /api/v1/events
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewEvent>,
) -> AppResult<(StatusCode, Json<DataResponse<Event>>)> {
    let event = state.service.create_event(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// GET /api/v1/events
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    let events = state.service.get_all_events().await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/events/search?q=&club_id=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    let events = state
        .service
        .search_events(&params.q, params.club_id.as_deref())
        .await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/events/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Event>>> {
    let event = state.service.get_event(&id).await?;
    Ok(Json(DataResponse { data: event }))
}

/// PUT /api/v1/events/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<EventChanges>,
) -> AppResult<Json<MutationResponse<Event>>> {
    let mutation = state.service.update_event(&id, input).await?;
    Ok(Json(mutation.into()))
}

/// DELETE /api/v1/events/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MutationResponse<Deleted>>> {
    let mutation = state.service.delete_event(&id).await?;
    Ok(Json(mutation.map(|deleted| Deleted { deleted }).into()))
}

/// GET /api/v1/users/{user_id}/events
pub async fn list_by_creator(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    let events = state.service.get_events_by_user(&user_id).await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/clubs/{club_id}/events
pub async fn list_by_club(
    State(state): State<AppState>,
    Path(club_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    let events = state.service.get_events_by_club(&club_id).await?;
    Ok(Json(DataResponse { data: events }))
}
