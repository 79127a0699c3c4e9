//! Liveness and dependency report for load balancers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreStatus {
    Up,
    Down,
}

#[derive(Serialize)]
pub struct HealthReport {
    pub service: &'static str,
    pub version: &'static str,
    pub store: StoreStatus,
}

/// GET /health
///
/// Answers 503 while the event store is unreachable, so an orchestrator can
/// take the instance out of rotation.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let (code, store) = if state.service.store_healthy().await {
        (StatusCode::OK, StoreStatus::Up)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, StoreStatus::Down)
    };

    let report = HealthReport {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        store,
    };
    (code, Json(report))
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
