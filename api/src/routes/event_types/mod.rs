//! `/event-types` route group.

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

pub mod get;
pub mod post;
pub mod put;

pub fn event_type_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_event_types).post(post::create_event_type))
        .route(
            "/{event_type_id}",
            get(get::get_event_type).put(put::edit_event_type),
        )
}
