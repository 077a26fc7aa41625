//! Event file listing and download.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json},
};
use db::models::event_file::{Column as FileColumn, Entity as FileEntity, Model as FileModel};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use util::state::AppState;

use crate::response::ApiResponse;

/// GET /api/events/{event_id}/files
pub async fn list_files(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
) -> impl IntoResponse {
    let db = app_state.db();

    match FileEntity::find()
        .filter(FileColumn::EventId.eq(event_id))
        .order_by_asc(FileColumn::CreatedAt)
        .all(db)
        .await
    {
        Ok(files) => (
            StatusCode::OK,
            Json(ApiResponse::success(files, "Files retrieved successfully")),
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<Vec<FileModel>>::error(
                "Failed to retrieve files",
            )),
        )
            .into_response(),
    }
}

/// GET /api/events/{event_id}/files/{file_id}
///
/// Streams the stored bytes back under the original upload name.
pub async fn download_file(
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
                Json(ApiResponse::<()>::error("Failed to retrieve file")),
            )
                .into_response();
        }
    };

    let bytes = match file.load_file() {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(file = file.id, error = %err, "stored file missing");
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::error("File not found on disk")),
            )
                .into_response();
        }
    };

    let mime = mime_guess::from_path(&file.filename)
        .first_or_octet_stream()
        .to_string();

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.filename),
            ),
        ],
        bytes,
    )
        .into_response()
}
