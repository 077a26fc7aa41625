//! Bulk attendee removal.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use db::models::event_attendee::{Column as AttendeeColumn, Entity as AttendeeEntity};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Serialize;
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::BulkIds;

#[derive(Serialize, Default)]
pub struct RemoveAttendeesResponse {
    pub removed: u64,
}

/// DELETE /api/events/{event_id}/attendees
///
/// Removes the selected attendee records from the event.
pub async fn remove_attendees(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<BulkIds>,
) -> impl IntoResponse {
    let db = app_state.db();

    if req.ids.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<RemoveAttendeesResponse>::error(
                "Please select a record and try again",
            )),
        )
            .into_response();
    }

    match AttendeeEntity::delete_many()
        .filter(AttendeeColumn::EventId.eq(event_id))
        .filter(AttendeeColumn::Id.is_in(req.ids.clone()))
        .exec(db)
        .await
    {
        Ok(result) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                RemoveAttendeesResponse {
                    removed: result.rows_affected,
                },
                "Attendees removed successfully",
            )),
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<RemoveAttendeesResponse>::error(
                "Failed to remove attendees",
            )),
        )
            .into_response(),
    }
}
