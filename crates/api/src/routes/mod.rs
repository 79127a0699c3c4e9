pub mod club;
pub mod event;
pub mod health;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /events                          list, create
/// /events/search                   search (?q=&club_id=)
/// /events/{id}                     get, update, delete
/// /events/{id}/join                join (POST, body {user_id})
/// /events/{id}/leave               leave (POST, body {user_id})
///
/// /users/{user_id}/events          events created by the user
/// /users/{user_id}/participations  events the user participates in
///
/// /clubs/{club_id}/events          events of a club
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/events", event::router())
        .nest("/users", user::router())
        .nest("/clubs", club::router())
}
