use axum::routing::get;
use axum::Router;

use crate::handlers::{event, participation};
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET /{user_id}/events          -> list_by_creator
/// GET /{user_id}/participations  -> list_participated
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{user_id}/events", get(event::list_by_creator))
        .route(
            "/{user_id}/participations",
            get(participation::list_participated),
        )
}
