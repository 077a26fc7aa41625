//! Event file upload handler.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use db::models::event::Entity as EventEntity;
use db::models::event_file::Model as FileModel;
use sea_orm::EntityTrait;
use util::state::AppState;

use crate::response::ApiResponse;

/// POST /api/events/{event_id}/files
///
/// Accepts one or more files in a multipart form and stores them under
/// the event's storage directory.
pub async fn upload_files(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let db = app_state.db();

    match EventEntity::find_by_id(event_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Vec<FileModel>>::error("Event not found")),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Vec<FileModel>>::error("Failed to upload files")),
            )
                .into_response();
        }
    }

    let mut saved = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::<Vec<FileModel>>::error(
                        "Invalid file in upload",
                    )),
                )
                    .into_response();
            }
        };

        match FileModel::save_file(db, event_id, &filename, &bytes).await {
            Ok(file) => saved.push(file),
            Err(err) => {
                tracing::error!(event = event_id, error = %err, "file save failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<Vec<FileModel>>::error("Failed to upload files")),
                )
                    .into_response();
            }
        }
    }

    if saved.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Vec<FileModel>>::error(
                "No file provided in upload",
            )),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(saved, "Files uploaded successfully")),
    )
        .into_response()
}
