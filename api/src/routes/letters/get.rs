//! PDF letter endpoints.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json},
};
use db::models::event::Entity as EventEntity;
use db::models::event_attendee::Entity as AttendeeEntity;
use db::models::setting::PdSettings;
use sea_orm::EntityTrait;
use util::state::AppState;

use crate::response::ApiResponse;
use crate::services::letters::{page_shell, pd_letter_vars, signin_sheet_vars};
use crate::services::pdf::html_to_pdf;
use crate::services::template;

fn pdf_attachment(filename: &str, bytes: Vec<u8>) -> axum::response::Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// GET /api/letters/{attendee_id}/pd
///
/// Renders the PD credit letter for one attendee as a PDF attachment.
pub async fn pd_letter(
    State(app_state): State<AppState>,
    Path(attendee_id): Path<i64>,
) -> impl IntoResponse {
    let db = app_state.db();

    let attendee = match AttendeeEntity::find_by_id(attendee_id).one(db).await {
        Ok(Some(attendee)) => attendee,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::error("Letter not found")),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to generate letter")),
            )
                .into_response();
        }
    };

    let event = match EventEntity::find_by_id(attendee.event_id).one(db).await {
        Ok(Some(event)) => event,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::error("Letter not found")),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to generate letter")),
            )
                .into_response();
        }
    };

    let settings = match PdSettings::from_db(db).await {
        Ok(settings) => settings,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to generate letter")),
            )
                .into_response();
        }
    };

    let info = attendee.resolve(db).await;
    let vars = match pd_letter_vars(db, &event, &attendee, &info).await {
        Ok(vars) => vars,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to generate letter")),
            )
                .into_response();
        }
    };

    let html = page_shell(&template::render(&settings.pd_template, &vars));
    match html_to_pdf(&html).await {
        Ok(bytes) => pdf_attachment("pd_letter.pdf", bytes),
        Err(err) => {
            tracing::error!(attendee = attendee.id, error = %err, "letter render failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to generate letter")),
            )
                .into_response()
        }
    }
}

/// GET /api/letters/events/{event_id}/signin-sheet
///
/// Renders the printable sign-in sheet for an event as a PDF attachment.
pub async fn signin_sheet(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
) -> impl IntoResponse {
    let db = app_state.db();

    let event = match EventEntity::find_by_id(event_id).one(db).await {
        Ok(Some(event)) => event,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::error("Event not found")),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to generate sign-in sheet")),
            )
                .into_response();
        }
    };

    let settings = match PdSettings::from_db(db).await {
        Ok(settings) => settings,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to generate sign-in sheet")),
            )
                .into_response();
        }
    };

    let vars = match signin_sheet_vars(db, &event).await {
        Ok(vars) => vars,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to generate sign-in sheet")),
            )
                .into_response();
        }
    };

    let html = page_shell(&template::render(&settings.event_signin_template, &vars));
    match html_to_pdf(&html).await {
        Ok(bytes) => pdf_attachment("event_signin_sheet.pdf", bytes),
        Err(err) => {
            tracing::error!(event = event.id, error = %err, "sign-in sheet render failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to generate sign-in sheet")),
            )
                .into_response()
        }
    }
}
