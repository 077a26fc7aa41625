//! Stored report download.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json},
};
use db::models::report_run::Entity as ReportRunEntity;
use sea_orm::EntityTrait;
use util::state::AppState;

use crate::response::ApiResponse;

/// GET /api/reports/{run_id}/{filename}
///
/// Streams a previously generated CSV back. The filename must match the
/// one recorded on the run, so the path can't reach other files.
pub async fn download_report(
    State(app_state): State<AppState>,
    Path((run_id, filename)): Path<(i64, String)>,
) -> impl IntoResponse {
    let db = app_state.db();

    let run = match ReportRunEntity::find_by_id(run_id).one(db).await {
        Ok(Some(run)) => run,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::error("Report not found")),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to retrieve report")),
            )
                .into_response();
        }
    };

    if run.filename.as_deref() != Some(filename.as_str()) {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error("Report not found")),
        )
            .into_response();
    }

    let bytes = match std::fs::read(run.output_path(&filename)) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(run = run.id, error = %err, "stored report missing");
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::error("Report file not found on disk")),
            )
                .into_response();
        }
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response()
}
