use axum::http::StatusCode;
use db::models::event_attendee::{
    AttendanceStatus, AttendanceType, Entity as AttendeeEntity, Model as AttendeeModel,
};
use db::test_utils::setup_test_db;
use sea_orm::EntityTrait;
use serde_json::json;
use tower::ServiceExt;

use crate::helpers::{
    bearer, body_json, json_request, make_app, seed_event, seed_event_type, seed_high_school,
    seed_teacher, seed_term, seed_user,
};

#[tokio::test]
async fn adding_an_instructor_seeds_defaults_and_skips_duplicates() {
    let db = setup_test_db().await;
    let admin = seed_user(&db, "coordinator", true).await;
    let term = seed_term(&db).await;
    let kind = seed_event_type(&db, "Workshop").await;
    let event = seed_event(&db, admin.id, term.id, kind.id, None).await;
    let (_, teacher) = seed_teacher(&db, "instructor1").await;
    let app = make_app(db.clone());

    let uri = format!("/api/events/{}/attendees", event.id);
    let payload = json!({
        "ids": [teacher.id],
        "attendee_type": "instructor",
        "attendance_type": "required",
    });

    let response = app
        .clone()
        .oneshot(json_request("POST", &uri, &bearer(admin.id, true), payload.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["added"], 1);

    let rows = AttendeeEntity::find().all(&db).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].attendance_status, AttendanceStatus::NotRecorded);
    assert_eq!(rows[0].attendance_type, AttendanceType::Required);
    assert_eq!(rows[0].pd_hour, event.pd_hour);

    // Same selection again: skipped, never duplicated.
    let response = app
        .oneshot(json_request("POST", &uri, &bearer(admin.id, true), payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["added"], 0);
    assert_eq!(json["data"]["skipped"], 1);

    let rows = AttendeeEntity::find().all(&db).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn empty_selection_is_rejected() {
    let db = setup_test_db().await;
    let admin = seed_user(&db, "coordinator", true).await;
    let term = seed_term(&db).await;
    let kind = seed_event_type(&db, "Workshop").await;
    let event = seed_event(&db, admin.id, term.id, kind.id, None).await;
    let app = make_app(db);

    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/api/events/{}/attendees", event.id),
            &bearer(admin.id, true),
            json!({
                "ids": [],
                "attendee_type": "instructor",
                "attendance_type": "optional",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Please select a record and try again");
}

#[tokio::test]
async fn marking_not_attended_zeroes_hours_and_head_count() {
    let db = setup_test_db().await;
    let admin = seed_user(&db, "coordinator", true).await;
    let term = seed_term(&db).await;
    let kind = seed_event_type(&db, "Workshop").await;
    let event = seed_event(&db, admin.id, term.id, kind.id, None).await;
    let school = seed_high_school(&db, "Central High", "active").await;

    let row = AttendeeModel::add_to_event(
        &db,
        &event,
        db::models::event_attendee::AttendeeType::Highschool,
        school.id,
        AttendanceType::Optional,
    )
    .await
    .unwrap()
    .unwrap();

    let app = make_app(db.clone());
    let admin_bearer = bearer(admin.id, true);

    // Record a head count and some hours first.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/events/{}/attendees/update", event.id),
            &admin_bearer,
            json!({ "id": row.id, "pd_hour": 3.0, "participants": 25 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/api/events/{}/attendees/mark", event.id),
            &admin_bearer,
            json!({ "ids": [row.id], "attendance_status": "not attended" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated = AttendeeEntity::find_by_id(row.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.attendance_status, AttendanceStatus::NotAttended);
    assert_eq!(updated.pd_hour, 0.0);
    assert_eq!(updated.participants, 0);
}

#[tokio::test]
async fn update_rejects_unknown_fields() {
    let db = setup_test_db().await;
    let admin = seed_user(&db, "coordinator", true).await;
    let term = seed_term(&db).await;
    let kind = seed_event_type(&db, "Workshop").await;
    let event = seed_event(&db, admin.id, term.id, kind.id, None).await;
    let app = make_app(db);

    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/api/events/{}/attendees/update", event.id),
            &bearer(admin.id, true),
            json!({ "id": 1, "attendance_status": "attended" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn letter_batch_skips_high_schools_without_aborting() {
    let db = setup_test_db().await;
    let admin = seed_user(&db, "coordinator", true).await;
    let term = seed_term(&db).await;
    let kind = seed_event_type(&db, "Workshop").await;
    let event = seed_event(&db, admin.id, term.id, kind.id, None).await;
    let school = seed_high_school(&db, "Central High", "active").await;

    let row = AttendeeModel::add_to_event(
        &db,
        &event,
        db::models::event_attendee::AttendeeType::Highschool,
        school.id,
        AttendanceType::Optional,
    )
    .await
    .unwrap()
    .unwrap();
    let row = row
        .set_attendance_status(&db, AttendanceStatus::Attended)
        .await
        .unwrap();

    // A second selected row behind the school: an instructor whose source
    // record is gone resolves to the placeholder and has no mailbox.
    let ghost = AttendeeModel::add_to_event(
        &db,
        &event,
        db::models::event_attendee::AttendeeType::Instructor,
        9999,
        AttendanceType::Required,
    )
    .await
    .unwrap()
    .unwrap();
    let ghost = ghost
        .set_attendance_status(&db, AttendanceStatus::Attended)
        .await
        .unwrap();

    let app = make_app(db.clone());
    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/api/events/{}/attendees/email-letters", event.id),
            &bearer(admin.id, true),
            json!({ "ids": [row.id, ghost.id] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Both rows were processed: the school did not cut the batch short.
    let json = body_json(response).await;
    assert_eq!(json["data"]["sent"], 0);
    assert_eq!(json["data"]["failed"], 0);
    assert_eq!(json["data"]["skipped"], 2);

    // Never stamped: no letter went out.
    let reloaded = AttendeeEntity::find_by_id(row.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(reloaded.pd_letter_sent_at.is_none());
}

#[tokio::test]
async fn letter_batch_rejects_empty_selection() {
    let db = setup_test_db().await;
    let admin = seed_user(&db, "coordinator", true).await;
    let term = seed_term(&db).await;
    let kind = seed_event_type(&db, "Workshop").await;
    let event = seed_event(&db, admin.id, term.id, kind.id, None).await;
    let app = make_app(db);

    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/api/events/{}/attendees/email-letters", event.id),
            &bearer(admin.id, true),
            json!({ "ids": [] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Please select the attendees and try again");
}

#[tokio::test]
async fn guest_email_batch_skips_high_schools() {
    let db = setup_test_db().await;
    let admin = seed_user(&db, "coordinator", true).await;
    let term = seed_term(&db).await;
    let kind = seed_event_type(&db, "Workshop").await;
    let event = seed_event(&db, admin.id, term.id, kind.id, None).await;
    let school = seed_high_school(&db, "Central High", "active").await;

    AttendeeModel::add_to_event(
        &db,
        &event,
        db::models::event_attendee::AttendeeType::Highschool,
        school.id,
        AttendanceType::Optional,
    )
    .await
    .unwrap()
    .unwrap();

    // Instructor with a dangling source record, listed after the school.
    AttendeeModel::add_to_event(
        &db,
        &event,
        db::models::event_attendee::AttendeeType::Instructor,
        9999,
        AttendanceType::Required,
    )
    .await
    .unwrap()
    .unwrap();

    let app = make_app(db);
    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/api/events/{}/email", event.id),
            &bearer(admin.id, true),
            json!({
                "subject": "Reminder",
                "message": "<p>See you there</p>",
                "email_to": "all",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The batch walked past the school and reached the second row.
    let json = body_json(response).await;
    assert_eq!(json["data"]["sent"], 0);
    assert_eq!(json["data"]["failed"], 0);
    assert_eq!(json["data"]["skipped"], 2);
}
