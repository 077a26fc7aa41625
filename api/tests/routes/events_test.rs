use axum::http::StatusCode;
use db::test_utils::setup_test_db;
use serde_json::json;
use tower::ServiceExt;

use crate::helpers::{
    bearer, body_json, get_request, json_request, make_app, seed_event, seed_event_type, seed_term,
    seed_user,
};

#[tokio::test]
async fn create_event_rejects_end_before_start() {
    let db = setup_test_db().await;
    let admin = seed_user(&db, "coordinator", true).await;
    let term = seed_term(&db).await;
    let kind = seed_event_type(&db, "Workshop").await;
    let app = make_app(db);

    let req = json_request(
        "POST",
        "/api/events",
        &bearer(admin.id, true),
        json!({
            "name": "Backwards",
            "start_time": "01/02/2026 10:00 AM",
            "end_time": "01/01/2026 10:00 AM",
            "event_type_id": kind.id,
            "term_id": term.id,
        }),
    );
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(
        json["data"]["errors"]["end_time"],
        "Please enter valid start and end times"
    );
}

#[tokio::test]
async fn invalid_event_is_not_persisted() {
    let db = setup_test_db().await;
    let admin = seed_user(&db, "coordinator", true).await;
    let term = seed_term(&db).await;
    let kind = seed_event_type(&db, "Workshop").await;
    let app = make_app(db.clone());

    let req = json_request(
        "POST",
        "/api/events",
        &bearer(admin.id, true),
        json!({
            "name": "Bad times",
            "start_time": "not a time",
            "end_time": "01/01/2026 10:00 AM",
            "event_type_id": kind.id,
            "term_id": term.id,
        }),
    );
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(
        json["data"]["errors"]["start_time"],
        "Please enter a valid start time"
    );

    use sea_orm::EntityTrait;
    let count = db::models::event::Entity::find().all(&db).await.unwrap();
    assert!(count.is_empty());
}

#[tokio::test]
async fn cohort_filter_matches_whole_ids_only() {
    let db = setup_test_db().await;
    let admin = seed_user(&db, "coordinator", true).await;
    let term = seed_term(&db).await;
    let kind = seed_event_type(&db, "Workshop").await;
    let _seventeen = seed_event(&db, admin.id, term.id, kind.id, Some(json!(["17"]))).await;
    let one = seed_event(&db, admin.id, term.id, kind.id, Some(json!(["1"]))).await;
    let app = make_app(db);

    let req = get_request("/api/events?cohort=1", &bearer(admin.id, true));
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let events = json["data"]["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["id"], one.id);
}

#[tokio::test]
async fn events_cannot_be_hard_deleted() {
    let db = setup_test_db().await;
    let admin = seed_user(&db, "coordinator", true).await;
    let term = seed_term(&db).await;
    let kind = seed_event_type(&db, "Workshop").await;
    let event = seed_event(&db, admin.id, term.id, kind.id, None).await;
    let app = make_app(db.clone());

    let req = axum::http::Request::builder()
        .method("DELETE")
        .uri(format!("/api/events/{}", event.id))
        .header("Authorization", bearer(admin.id, true))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    use sea_orm::EntityTrait;
    let still_there = db::models::event::Entity::find_by_id(event.id)
        .one(&db)
        .await
        .unwrap();
    assert!(still_there.is_some());
}

#[tokio::test]
async fn listing_requires_authentication() {
    let db = setup_test_db().await;
    let app = make_app(db);

    let req = axum::http::Request::builder()
        .method("GET")
        .uri("/api/events")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
