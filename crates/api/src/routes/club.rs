use axum::routing::get;
use axum::Router;

use crate::handlers::event;
use crate::state::AppState;

/// Routes mounted at `/clubs`.
pub fn router() -> Router<AppState> {
    Router::new().route("/{club_id}/events", get(event::list_by_club))
}
