use std::sync::Arc;

use clubevents_service::EventService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The event service with its store, directory and publisher injected.
    pub service: Arc<EventService>,
    pub config: Arc<ServerConfig>,
}
