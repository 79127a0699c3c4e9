use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use clubevents_api::config::ServerConfig;
use clubevents_api::router::build_app_router;
use clubevents_api::state::AppState;
use clubevents_service::{EventService, ServiceConfig};
use clubevents_testing::fixtures::{ORGANIZER_ID, ORGANIZER_NAME};
use clubevents_testing::{InMemoryEventStore, RecordingPublisher, StubDirectory};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// The router plus handles on the doubles behind it.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryEventStore>,
    pub publisher: Arc<RecordingPublisher>,
}

impl TestApp {
    /// A fresh clone of the router for one `oneshot` request.
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router over in-memory doubles.
///
/// Uses the same [`build_app_router`] as `main.rs`, so the middleware stack
/// under test is the production one.
pub fn build_test_app() -> TestApp {
    let store = Arc::new(InMemoryEventStore::new());
    let directory = Arc::new(
        StubDirectory::new()
            .with_user(ORGANIZER_ID, ORGANIZER_NAME)
            .with_user("alice", "Alice Archer")
            .with_user("bob", "Bob Baker"),
    );
    let publisher = Arc::new(RecordingPublisher::new());

    let service = EventService::new(
        store.clone(),
        directory,
        publisher.clone(),
        ServiceConfig::default(),
    );

    let config = test_config();
    let state = AppState {
        service: Arc::new(service),
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        publisher,
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

/// POST a body as-is, for payloads that are not valid JSON.
pub async fn post_raw(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
