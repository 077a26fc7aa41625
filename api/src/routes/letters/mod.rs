//! `/letters` route group. Public endpoints: letter links are mailed out
//! and must open without a session.

use axum::{Router, routing::get};
use util::state::AppState;

pub mod get;

pub fn letter_routes() -> Router<AppState> {
    Router::new()
        .route("/{attendee_id}/pd", get(get::pd_letter))
        .route("/events/{event_id}/signin-sheet", get(get::signin_sheet))
}
