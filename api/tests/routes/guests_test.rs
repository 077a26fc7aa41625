use axum::http::StatusCode;
use db::test_utils::setup_test_db;
use tower::ServiceExt;

use crate::helpers::{bearer, body_json, get_request, make_app, seed_high_school, seed_user};

#[tokio::test]
async fn high_school_search_returns_active_schools_sorted() {
    let db = setup_test_db().await;
    let admin = seed_user(&db, "coordinator", true).await;
    seed_high_school(&db, "Westside High", "active").await;
    seed_high_school(&db, "Central High", "active").await;
    seed_high_school(&db, "Closed Academy", "inactive").await;

    let app = make_app(db);
    let response = app
        .oneshot(get_request(
            "/api/guests/search?attendee_type=highschool",
            &bearer(admin.id, true),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "Central High");
    assert_eq!(rows[1]["name"], "Westside High");
    assert_eq!(rows[0]["attendee_type"], "highschool");
}

#[tokio::test]
async fn unknown_attendee_type_is_rejected() {
    let db = setup_test_db().await;
    let admin = seed_user(&db, "coordinator", true).await;
    let app = make_app(db);

    let response = app
        .oneshot(get_request(
            "/api/guests/search?attendee_type=martian",
            &bearer(admin.id, true),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
