//! HTTP-level integration tests for the event endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use clubevents_testing::StoreOp;
use common::{
    body_json, build_test_app, delete, get, post_json, post_raw, put_json, TestApp,
};
use serde_json::json;
use tower::ServiceExt;

async fn create_event(app: &TestApp, title: &str, max: i64) -> String {
    let response = post_json(
        app.app(),
        "/api/v1/events",
        json!({
            "title": title,
            "description": "Bring snacks",
            "datetime": "2026-11-01T18:00:00Z",
            "location": "Club house",
            "max_participation": max,
            "club_id": "club-a",
            "created_by_id": "organizer-1",
            "created_by_name": "Olga Organizer"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

// ---------------------------------------------------------------------------
// Health and middleware
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_store_status() {
    let app = build_test_app();

    let response = get(app.app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let json = body_json(response).await;
    assert_eq!(json["service"], "clubevents-api");
    assert_eq!(json["store"], "up");
    assert!(json["version"].is_string());

    app.store.fail_on(StoreOp::Ping);
    let response = get(app.app(), "/health").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["store"], "down");
}

#[tokio::test]
async fn browsers_can_read_the_request_id() {
    let app = build_test_app();
    let request = Request::builder()
        .uri("/health")
        .header("origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();

    let response = app.app().oneshot(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(
        headers["access-control-allow-origin"],
        "http://localhost:5173"
    );
    assert_eq!(headers["access-control-expose-headers"], "x-request-id");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app();
    let response = get(app.app(), "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_get_event() {
    let app = build_test_app();
    let id = create_event(&app, "Quiz night", 10).await;

    let response = get(app.app(), &format!("/api/v1/events/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Quiz night");
    assert_eq!(json["data"]["current_participation"], 0);
    assert_eq!(json["data"]["max_participation"], 10);
    assert_eq!(json["data"]["club_id"], "club-a");
}

#[tokio::test]
async fn create_with_negative_capacity_is_400() {
    let app = build_test_app();
    let response = post_json(
        app.app(),
        "/api/v1/events",
        json!({"title": "Bad", "max_participation": -3, "created_by_id": "organizer-1"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(app.store.event_count(), 0);
}

#[tokio::test]
async fn unparsable_body_gets_the_json_error_shape() {
    let app = build_test_app();

    let response = post_raw(app.app(), "/api/v1/events", "{\"title\": ").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].is_string());

    let response = post_json(app.app(), "/api/v1/events", json!({"title": "No owner"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert_eq!(app.store.event_count(), 0);
}

#[tokio::test]
async fn malformed_id_is_400_and_unknown_id_is_404() {
    let app = build_test_app();

    let response = get(app.app(), "/api/v1/events/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = get(
        app.app(),
        "/api/v1/events/0192a0b4-0000-7000-8000-000000000000",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn store_failure_is_500_with_sanitized_message() {
    let app = build_test_app();
    app.store.fail_on(StoreOp::FindEvents);

    let response = get(app.app(), "/api/v1/events").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn update_returns_event_and_notification_report() {
    let app = build_test_app();
    let id = create_event(&app, "Quiz night", 10).await;
    post_json(
        app.app(),
        &format!("/api/v1/events/{id}/join"),
        json!({"user_id": "alice"}),
    )
    .await;

    let response = put_json(
        app.app(),
        &format!("/api/v1/events/{id}"),
        json!({
            "title": "Quiz night (moved)",
            "description": "Upstairs",
            "datetime": "2026-11-02T18:00:00Z",
            "location": "Upstairs",
            "max_participation": 12
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Quiz night (moved)");
    assert_eq!(json["data"]["club_id"], "club-a");
    assert_eq!(json["data"]["current_participation"], 1);
    assert_eq!(json["notifications"][0]["status"], "published");
    assert_eq!(
        json["notifications"][0]["message"]["notification_type"],
        "event_update"
    );
    assert_eq!(
        json["notifications"][0]["message"]["receiver"],
        "alice@example.com"
    );
}

#[tokio::test]
async fn delete_then_get_is_404() {
    let app = build_test_app();
    let id = create_event(&app, "Quiz night", 10).await;

    let response = delete(app.app(), &format!("/api/v1/events/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["deleted"], true);

    let response = get(app.app(), &format!("/api/v1/events/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(app.app(), &format!("/api/v1/events/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_and_listings() {
    let app = build_test_app();
    create_event(&app, "Chess evening", 10).await;
    create_event(&app, "Pottery", 10).await;

    let json = body_json(get(app.app(), "/api/v1/events/search?q=CHESS").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["title"], "Chess evening");

    let json = body_json(get(app.app(), "/api/v1/events/search").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let json = body_json(get(app.app(), "/api/v1/events/search?q=&club_id=club-z").await).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    let json = body_json(get(app.app(), "/api/v1/clubs/club-a/events").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let json = body_json(get(app.app(), "/api/v1/users/organizer-1/events").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let json = body_json(get(app.app(), "/api/v1/events").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Participation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn join_full_event_is_unsuccessful_not_an_error() {
    let app = build_test_app();
    let id = create_event(&app, "Tiny", 1).await;
    let join_uri = format!("/api/v1/events/{id}/join");

    let response = post_json(app.app(), &join_uri, json!({"user_id": "alice"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["success"], true);
    assert_eq!(json["data"]["outcome"], "joined");
    assert_eq!(
        json["notifications"][0]["message"]["notification_type"],
        "event_join"
    );

    let response = post_json(app.app(), &join_uri, json!({"user_id": "bob"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["success"], false);
    assert_eq!(json["data"]["outcome"], "event_full");
    assert!(json["notifications"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn leave_and_participations_listing() {
    let app = build_test_app();
    let id = create_event(&app, "Quiz night", 10).await;
    post_json(
        app.app(),
        &format!("/api/v1/events/{id}/join"),
        json!({"user_id": "bob"}),
    )
    .await;

    let json = body_json(get(app.app(), "/api/v1/users/bob/participations").await).await;
    assert_eq!(json["data"][0]["id"], id.as_str());

    let response = post_json(
        app.app(),
        &format!("/api/v1/events/{id}/leave"),
        json!({"user_id": "bob"}),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["outcome"], "left");

    let response = post_json(
        app.app(),
        &format!("/api/v1/events/{id}/leave"),
        json!({"user_id": "bob"}),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["success"], false);
    assert_eq!(json["data"]["outcome"], "not_participating");

    let json = body_json(get(app.app(), "/api/v1/users/bob/participations").await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
    assert_eq!(app.publisher.published().len(), 2);
}

#[tokio::test]
async fn publisher_outage_does_not_fail_join() {
    let app = build_test_app();
    let id = create_event(&app, "Quiz night", 10).await;
    app.publisher.set_failing(true);

    let response = post_json(
        app.app(),
        &format!("/api/v1/events/{id}/join"),
        json!({"user_id": "alice"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["success"], true);
    assert_eq!(json["notifications"][0]["status"], "failed");
    assert!(json["notifications"][0]["reason"].is_string());
}
