//! Event type rename.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use db::models::event_type::{ActiveModel, Entity as EventTypeEntity, Model};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::event_types::post::EventTypeRequest;

/// PUT /api/event-types/{event_type_id}
pub async fn edit_event_type(
    State(app_state): State<AppState>,
    Path(event_type_id): Path<i64>,
    Json(req): Json<EventTypeRequest>,
) -> impl IntoResponse {
    let db = app_state.db();

    let name = req.name.trim();
    if name.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Model>::error("Please enter a name")),
        )
            .into_response();
    }

    let existing = match EventTypeEntity::find_by_id(event_type_id).one(db).await {
        Ok(Some(existing)) => existing,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Model>::error("Event type not found")),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Model>::error("Failed to update event type")),
            )
                .into_response();
        }
    };

    let mut active: ActiveModel = existing.into();
    active.name = Set(name.to_string());

    match active.update(db).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                updated,
                "Event type updated successfully",
            )),
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<Model>::error("Failed to update event type")),
        )
            .into_response(),
    }
}
