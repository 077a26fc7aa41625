//! `/settings` route group (admin only).

use axum::{Router, routing::get};
use util::state::AppState;

pub mod get;
pub mod put;

pub fn settings_routes() -> Router<AppState> {
    Router::new().route("/pd", get(get::get_pd_settings).put(put::update_pd_settings))
}
