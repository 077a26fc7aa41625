//! `/events` route group: event create/list/edit, guest emails, attendees
//! and files. Events are never hard-deleted; past events stay on record.

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

pub mod attendees;
pub mod common;
pub mod files;
pub mod get;
pub mod post;
pub mod put;

pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_events).post(post::create_event))
        .route("/{event_id}", get(get::get_event).put(put::edit_event))
        .route("/{event_id}/email", post(post::email_guests))
        .route(
            "/{event_id}/attendees.csv",
            get(attendees::get::export_attendees_csv),
        )
        .nest("/{event_id}/attendees", attendees::attendee_routes())
        .nest("/{event_id}/files", files::file_routes())
}
