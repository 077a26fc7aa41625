//! `/guests` route group: candidate search for the attendee picker.

use axum::{Router, routing::get};
use util::state::AppState;

pub mod get;

pub fn guest_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(get::search_guests))
        .route("/courses", get(get::list_courses))
}
