//! PD settings update.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use db::models::setting::PdSettings;
use util::state::AppState;

use crate::response::ApiResponse;

/// PUT /api/settings/pd
///
/// Replaces the whole template bundle.
pub async fn update_pd_settings(
    State(app_state): State<AppState>,
    Json(settings): Json<PdSettings>,
) -> impl IntoResponse {
    let db = app_state.db();

    match settings.save(db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                settings,
                "Settings updated successfully",
            )),
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<PdSettings>::error("Failed to update settings")),
        )
            .into_response(),
    }
}
