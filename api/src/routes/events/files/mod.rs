//! `/events/{event_id}/files` route group.

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

pub mod delete;
pub mod get;
pub mod post;

pub fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_files).post(post::upload_files))
        .route(
            "/{file_id}",
            get(get::download_file).delete(delete::delete_file),
        )
}
