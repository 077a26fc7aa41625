use db::models::event_attendee::{AttendanceType, AttendeeType, Model as AttendeeModel};
use db::test_utils::setup_test_db;

use api::services::letters::{guest_email_vars, pd_letter_vars};

use crate::helpers::{seed_event, seed_event_type, seed_teacher, seed_term, seed_user};

#[tokio::test]
async fn letter_url_appears_in_email_vocabulary_only() {
    let db = setup_test_db().await;
    let admin = seed_user(&db, "coordinator", true).await;
    let term = seed_term(&db).await;
    let kind = seed_event_type(&db, "Workshop").await;
    let event = seed_event(&db, admin.id, term.id, kind.id, None).await;
    let (_, teacher) = seed_teacher(&db, "instructor1").await;

    let attendee = AttendeeModel::add_to_event(
        &db,
        &event,
        AttendeeType::Instructor,
        teacher.id,
        AttendanceType::Required,
    )
    .await
    .unwrap()
    .unwrap();
    let info = attendee.resolve(&db).await;

    let letter_vars = pd_letter_vars(&db, &event, &attendee, &info).await.unwrap();
    assert!(letter_vars.iter().all(|(key, _)| *key != "pd_letter_url"));
    assert!(letter_vars.iter().any(|(key, _)| *key == "earned_pd_hour"));

    let email_vars = guest_email_vars(&db, &event, &attendee, &info)
        .await
        .unwrap();
    assert!(email_vars.iter().any(|(key, _)| *key == "pd_letter_url"));
}
