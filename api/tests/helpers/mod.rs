use axum::{Router, body::Body, http::Request};
use chrono::{Duration, Utc};
use db::models::{event, event_type, high_school, teacher, term, user};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use util::state::AppState;

use api::auth::generate_jwt;
use api::routes::routes;

pub fn make_app(db: DatabaseConnection) -> Router {
    Router::new().nest("/api", routes(AppState::new(db)))
}

pub fn bearer(user_id: i64, admin: bool) -> String {
    let (token, _) = generate_jwt(user_id, admin);
    format!("Bearer {}", token)
}

pub fn get_request(uri: &str, bearer: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("Authorization", bearer)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(
    method: &str,
    uri: &str,
    bearer: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", bearer)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn seed_user(db: &DatabaseConnection, username: &str, admin: bool) -> user::Model {
    let now = Utc::now();
    user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{}@example.com", username)),
        first_name: Set("Sam".to_string()),
        last_name: Set(format!("{}son", username)),
        admin: Set(admin),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert user")
}

pub async fn seed_term(db: &DatabaseConnection) -> term::Model {
    term::ActiveModel {
        code: Set("2263".to_string()),
        name: Set("Fall 2026".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert term")
}

pub async fn seed_event_type(db: &DatabaseConnection, name: &str) -> event_type::Model {
    event_type::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert event type")
}

pub async fn seed_event(
    db: &DatabaseConnection,
    created_by: i64,
    term_id: i64,
    event_type_id: i64,
    cohort: Option<serde_json::Value>,
) -> event::Model {
    let now = Utc::now();
    event::ActiveModel {
        name: Set(Some("PD Workshop".to_string())),
        start_time: Set(now + Duration::days(7)),
        end_time: Set(now + Duration::days(7) + Duration::hours(2)),
        event_type_id: Set(event_type_id),
        term_id: Set(term_id),
        created_by: Set(created_by),
        pd_hour: Set(2.0),
        cohort: Set(cohort),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert event")
}

pub async fn seed_teacher(db: &DatabaseConnection, username: &str) -> (user::Model, teacher::Model) {
    let linked = seed_user(db, username, false).await;
    let teacher = teacher::ActiveModel {
        user_id: Set(linked.id),
        status: Set("active".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert teacher");
    (linked, teacher)
}

pub async fn seed_high_school(
    db: &DatabaseConnection,
    name: &str,
    status: &str,
) -> high_school::Model {
    high_school::ActiveModel {
        name: Set(name.to_string()),
        status: Set(status.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert high school")
}
