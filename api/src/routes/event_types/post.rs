//! Event type creation.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use db::models::event_type::{ActiveModel, Model};
use sea_orm::{ActiveModelTrait, ActiveValue::Set};
use serde::Deserialize;
use util::state::AppState;

use crate::response::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct EventTypeRequest {
    pub name: String,
}

/// POST /api/event-types
pub async fn create_event_type(
    State(app_state): State<AppState>,
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

    let active = ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    };

    match active.insert(db).await {
        Ok(created) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                created,
                "Event type created successfully",
            )),
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<Model>::error("Failed to create event type")),
        )
            .into_response(),
    }
}
