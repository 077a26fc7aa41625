use axum::http::StatusCode;
use db::test_utils::setup_test_db;
use serde_json::json;
use tower::ServiceExt;

use crate::helpers::{bearer, body_json, get_request, json_request, make_app, seed_user};

#[tokio::test]
async fn settings_are_admin_only() {
    let db = setup_test_db().await;
    let staff = seed_user(&db, "staff", false).await;
    let app = make_app(db);

    let response = app
        .oneshot(get_request("/api/settings/pd", &bearer(staff.id, false)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn settings_round_trip_through_the_api() {
    let db = setup_test_db().await;
    let admin = seed_user(&db, "admin", true).await;
    let app = make_app(db);
    let admin_bearer = bearer(admin.id, true);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/settings/pd",
            &admin_bearer,
            json!({
                "pd_email_subject": "Your PD credit letter",
                "pd_template": "<p>Dear {{ attendee_first_name }}</p>",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request("/api/settings/pd", &admin_bearer))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["pd_email_subject"], "Your PD credit letter");
    assert_eq!(
        json["data"]["pd_template"],
        "<p>Dear {{ attendee_first_name }}</p>"
    );
    // Unset fields default to empty rather than erroring.
    assert_eq!(json["data"]["event_reminder_subject"], "");
}
