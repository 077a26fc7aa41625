//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → Health check endpoint (public)
//! - `/letters` → PD letter and sign-in sheet PDFs (public, shareable links)
//! - `/events` → Event CRUD, attendees, files, email (authenticated)
//! - `/event-types` → Event type lookup CRUD (authenticated)
//! - `/guests` → Guest search for attendee selection (authenticated)
//! - `/reports` → CSV report runs and downloads (authenticated)
//! - `/settings` → PD notification templates (admin-only)

use crate::auth::guards::{allow_admin, allow_authenticated};
use axum::{Router, middleware::from_fn};
use util::state::AppState;

pub mod common;
pub mod event_types;
pub mod events;
pub mod guests;
pub mod health;
pub mod letters;
pub mod reports;
pub mod settings;

/// Builds the complete application router for all HTTP endpoints.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health::health_routes())
        .nest("/letters", letters::letter_routes())
        .nest(
            "/events",
            events::event_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/event-types",
            event_types::event_type_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/guests",
            guests::guest_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/reports",
            reports::report_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/settings",
            settings::settings_routes().route_layer(from_fn(allow_admin)),
        )
        .with_state(app_state)
}
