//! `/reports` route group: filtered CSV exports persisted per run.

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

pub mod get;
pub mod post;

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/pd-events", post(post::pd_events_report))
        .route("/attendance", post(post::attendance_report))
        .route("/{run_id}/{filename}", get(get::download_report))
}
