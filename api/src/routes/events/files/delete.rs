//! Event file deletion.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use db::models::event_file::Entity as FileEntity;
use sea_orm::{EntityTrait, ModelTrait};
use util::state::AppState;

use crate::response::ApiResponse;

/// DELETE /api/events/{event_id}/files/{file_id}
///
/// Removes the stored bytes and the database record.
pub async fn delete_file(
    State(app_state): State<AppState>,
    Path((event_id, file_id)): Path<(i64, i64)>,
) -> impl IntoResponse {
    let db = app_state.db();

    let file = match FileEntity::find_by_id(file_id).one(db).await {
        Ok(Some(file)) if file.event_id == event_id => file,
        Ok(_) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::error("File not found")),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to delete file")),
            )
                .into_response();
        }
    };

    if let Err(err) = file.delete_file_only() {
        tracing::warn!(file = file.id, error = %err, "failed to remove stored file");
    }

    match file.delete(db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse::success((), "File deleted successfully")),
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error("Failed to delete file")),
        )
            .into_response(),
    }
}
