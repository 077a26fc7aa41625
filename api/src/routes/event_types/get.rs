//! Event type lookup handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use db::models::event_type::{Column as EventTypeColumn, Entity as EventTypeEntity, Model};
use sea_orm::{EntityTrait, QueryOrder};
use util::state::AppState;

use crate::response::ApiResponse;

/// GET /api/event-types
///
/// All event types, ordered by name for dropdowns.
pub async fn list_event_types(State(app_state): State<AppState>) -> impl IntoResponse {
    let db = app_state.db();

    match EventTypeEntity::find()
        .order_by_asc(EventTypeColumn::Name)
        .all(db)
        .await
    {
        Ok(types) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                types,
                "Event types retrieved successfully",
            )),
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<Vec<Model>>::error(
                "Failed to retrieve event types",
            )),
        )
            .into_response(),
    }
}

/// GET /api/event-types/{event_type_id}
pub async fn get_event_type(
    State(app_state): State<AppState>,
    Path(event_type_id): Path<i64>,
) -> impl IntoResponse {
    let db = app_state.db();

    match EventTypeEntity::find_by_id(event_type_id).one(db).await {
        Ok(Some(event_type)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                event_type,
                "Event type retrieved successfully",
            )),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Model>::error("Event type not found")),
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<Model>::error("Failed to retrieve event type")),
        )
            .into_response(),
    }
}
