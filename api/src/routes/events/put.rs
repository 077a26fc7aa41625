//! Edit-event handler.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use db::models::event::{ActiveModel as EventActiveModel, Entity as EventEntity};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use serde_json::json;
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::events::common::{EventRequest, EventResponse};

/// PUT /api/events/{event_id}
///
/// Replaces the editable fields of an event. Validation mirrors create:
/// any per-field failure returns 400 with an `errors` map and persists
/// nothing.
pub async fn edit_event(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<EventRequest>,
) -> impl IntoResponse {
    let db = app_state.db();

    let existing = match EventEntity::find_by_id(event_id).one(db).await {
        Ok(Some(event)) => event,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::error("Event not found")),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to update event")),
            )
                .into_response();
        }
    };

    let validated = match req.validate() {
        Ok(validated) => validated,
        Err(errors) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error_with_data(
                    json!({ "errors": errors }),
                    "Validation failed",
                )),
            )
                .into_response();
        }
    };

    let mut active: EventActiveModel = existing.into();
    active.name = Set(validated.name);
    active.start_time = Set(validated.start_time);
    active.end_time = Set(validated.end_time);
    active.event_type_id = Set(validated.event_type_id);
    active.term_id = Set(validated.term_id);
    active.description = Set(validated.description);
    active.pd_hour = Set(validated.pd_hour);
    active.delivery_mode = Set(validated.delivery_mode);
    active.cohort = Set(validated.cohort);
    active.updated_at = Set(Utc::now());

    match active.update(db).await {
        Ok(event) => match EventResponse::from_model(db, &event).await {
            Ok(response) => (
                StatusCode::OK,
                Json(ApiResponse::success(response, "Event updated successfully")),
            )
                .into_response(),
            Err(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to update event")),
            )
                .into_response(),
        },
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(format!(
                "Failed to update event: {}",
                err
            ))),
        )
            .into_response(),
    }
}
