//! `/events/{event_id}/attendees` route group.

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

pub mod delete;
pub mod get;
pub mod post;

pub fn attendee_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get::list_attendees)
                .post(post::add_attendees)
                .delete(delete::remove_attendees),
        )
        .route("/toggle", post(post::toggle_attendance_type))
        .route("/mark", post(post::mark_attendance))
        .route("/update", post(post::update_attendee))
        .route("/email-letters", post(post::email_letters))
}
