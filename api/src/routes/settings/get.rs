//! PD settings retrieval.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use db::models::setting::PdSettings;
use util::state::AppState;

use crate::response::ApiResponse;

/// GET /api/settings/pd
///
/// Current notification templates; defaults when never saved.
pub async fn get_pd_settings(State(app_state): State<AppState>) -> impl IntoResponse {
    let db = app_state.db();

    match PdSettings::from_db(db).await {
        Ok(settings) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                settings,
                "Settings retrieved successfully",
            )),
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<PdSettings>::error(
                "Failed to retrieve settings",
            )),
        )
            .into_response(),
    }
}
