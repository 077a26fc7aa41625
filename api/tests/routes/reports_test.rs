use axum::http::StatusCode;
use db::models::event_attendee::{AttendanceType, AttendeeType, Model as AttendeeModel};
use db::models::report_run::Entity as ReportRunEntity;
use db::models::user;
use db::test_utils::setup_test_db;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use serde_json::json;
use serial_test::serial;
use tower::ServiceExt;
use util::test_helpers::setup_test_storage_root;

use crate::helpers::{
    bearer, body_json, get_request, json_request, make_app, seed_event, seed_event_type,
    seed_teacher, seed_term, seed_user,
};

#[tokio::test]
#[serial]
async fn event_summary_row_count_matches_filtered_events() {
    let _storage = setup_test_storage_root();
    let db = setup_test_db().await;
    let admin = seed_user(&db, "coordinator", true).await;
    let term = seed_term(&db).await;
    let workshop = seed_event_type(&db, "Workshop").await;
    let seminar = seed_event_type(&db, "Seminar").await;
    seed_event(&db, admin.id, term.id, workshop.id, None).await;
    seed_event(&db, admin.id, term.id, workshop.id, Some(json!(["3"]))).await;
    seed_event(&db, admin.id, term.id, seminar.id, None).await;

    let app = make_app(db.clone());
    let admin_bearer = bearer(admin.id, true);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/reports/pd-events",
            &admin_bearer,
            json!({ "event_type_ids": [workshop.id] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let run_id = body["data"]["run_id"].as_i64().unwrap();
    let filename = body["data"]["filename"].as_str().unwrap().to_string();
    assert!(filename.starts_with("pd_events_"));
    assert!(filename.ends_with(".csv"));

    let run = ReportRunEntity::find_by_id(run_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    let content = std::fs::read_to_string(run.output_path(&filename)).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    // Header plus one row per matching event.
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Event Type,Created By,Start Date/Time"));

    // The stored CSV streams back under the recorded filename only.
    let response = app
        .clone()
        .oneshot(get_request(
            &format!("/api/reports/{}/{}", run_id, filename),
            &admin_bearer,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request(
            &format!("/api/reports/{}/other.csv", run_id),
            &admin_bearer,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn attendee_export_with_no_matches_is_header_only() {
    let _storage = setup_test_storage_root();
    let db = setup_test_db().await;
    let admin = seed_user(&db, "coordinator", true).await;
    let term = seed_term(&db).await;
    let seminar = seed_event_type(&db, "Seminar").await;
    seed_event(&db, admin.id, term.id, seminar.id, None).await;

    let app = make_app(db.clone());
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/reports/attendance",
            &bearer(admin.id, true),
            json!({ "event_type_ids": [seminar.id] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let run_id = body["data"]["run_id"].as_i64().unwrap();
    let filename = body["data"]["filename"].as_str().unwrap().to_string();

    let run = ReportRunEntity::find_by_id(run_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    let content = std::fs::read_to_string(run.output_path(&filename)).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("First Name,Last Name,EMPLID"));
}

#[tokio::test]
#[serial]
async fn total_pd_hours_sums_rows_for_the_same_person() {
    let _storage = setup_test_storage_root();
    let db = setup_test_db().await;
    let admin = seed_user(&db, "coordinator", true).await;
    let term = seed_term(&db).await;
    let workshop = seed_event_type(&db, "Workshop").await;
    let first = seed_event(&db, admin.id, term.id, workshop.id, None).await;
    let second = seed_event(&db, admin.id, term.id, workshop.id, None).await;

    let (linked, teacher) = seed_teacher(&db, "instructor2").await;
    let mut active: user::ActiveModel = linked.into();
    active.emplid = Set(Some("E0042".to_string()));
    active.update(&db).await.unwrap();

    for event in [&first, &second] {
        AttendeeModel::add_to_event(
            &db,
            event,
            AttendeeType::Instructor,
            teacher.id,
            AttendanceType::Required,
        )
        .await
        .unwrap()
        .unwrap();
    }

    let app = make_app(db.clone());
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/reports/attendance",
            &bearer(admin.id, true),
            json!({ "event_type_ids": [workshop.id] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let run_id = body["data"]["run_id"].as_i64().unwrap();
    let filename = body["data"]["filename"].as_str().unwrap().to_string();
    let run = ReportRunEntity::find_by_id(run_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    let content = std::fs::read_to_string(run.output_path(&filename)).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);

    // Per-row hours stay per event; the total column accumulates them.
    for line in &lines[1..] {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields[2], "E0042");
        assert_eq!(fields[8], "2");
        assert_eq!(fields[9], "4");
    }
}

#[tokio::test]
#[serial]
async fn report_requires_an_event_type_selection() {
    let _storage = setup_test_storage_root();
    let db = setup_test_db().await;
    let admin = seed_user(&db, "coordinator", true).await;
    let app = make_app(db);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/reports/pd-events",
            &bearer(admin.id, true),
            json!({ "event_type_ids": [] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Please select at least one event type");
}
