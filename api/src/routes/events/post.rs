//! Create-event and guest-email handlers.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use db::models::{
    event::{ActiveModel as EventActiveModel, Entity as EventEntity},
    event_attendee::AttendanceStatus,
    setting::PdSettings,
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use serde::{Deserialize, Serialize};
use serde_json::json;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::events::common::{EventRequest, EventResponse};
use crate::services::email::EmailService;
use crate::services::letters::guest_email_vars;
use crate::services::template;

/// POST /api/events
///
/// Creates an event. Returns 400 with a per-field `errors` map when the
/// payload fails validation; nothing is persisted in that case.
pub async fn create_event(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<EventRequest>,
) -> impl IntoResponse {
    let db = app_state.db();

    let validated = match req.validate() {
        Ok(validated) => validated,
        Err(errors) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error_with_data(
                    json!({ "errors": errors }),
                    "Validation failed",
                )),
            )
                .into_response();
        }
    };

    let now = Utc::now();
    let active = EventActiveModel {
        name: Set(validated.name),
        start_time: Set(validated.start_time),
        end_time: Set(validated.end_time),
        event_type_id: Set(validated.event_type_id),
        term_id: Set(validated.term_id),
        created_by: Set(claims.sub),
        description: Set(validated.description),
        pd_hour: Set(validated.pd_hour),
        delivery_mode: Set(validated.delivery_mode),
        cohort: Set(validated.cohort),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match active.insert(db).await {
        Ok(event) => match EventResponse::from_model(db, &event).await {
            Ok(response) => (
                StatusCode::OK,
                Json(ApiResponse::success(response, "Event created successfully")),
            )
                .into_response(),
            Err(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to create event")),
            )
                .into_response(),
        },
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(format!(
                "Failed to create event: {}",
                err
            ))),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct GuestEmailRequest {
    pub subject: String,
    pub message: String,
    /// One of "all", "attendees", "not_attendees".
    pub email_to: String,
}

#[derive(Serialize, Default)]
pub struct GuestEmailResponse {
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// POST /api/events/{event_id}/email
///
/// Emails the selected guest population. Subject and message go through
/// placeholder substitution per attendee. High-school attendees have no
/// mailbox and are skipped without aborting the batch. After the batch an
/// audit note is appended recording subject, message and recipients.
pub async fn email_guests(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<GuestEmailRequest>,
) -> impl IntoResponse {
    let db = app_state.db();

    let event = match EventEntity::find_by_id(event_id).one(db).await {
        Ok(Some(event)) => event,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<GuestEmailResponse>::error("Event not found")),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<GuestEmailResponse>::error(
                    "Failed to send email",
                )),
            )
                .into_response();
        }
    };

    let target_status = match req.email_to.as_str() {
        "all" => None,
        "attendees" => Some(AttendanceStatus::Attended),
        "not_attendees" => Some(AttendanceStatus::NotAttended),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<GuestEmailResponse>::error(
                    "Invalid email_to value",
                )),
            )
                .into_response();
        }
    };

    let attendees = match event.attendees(db).await {
        Ok(attendees) => attendees,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<GuestEmailResponse>::error(
                    "Failed to send email",
                )),
            )
                .into_response();
        }
    };

    let mut sent = 0usize;
    let mut failed = 0usize;
    let mut skipped = 0usize;
    let mut all_recipients: Vec<String> = Vec::new();

    for attendee in attendees {
        if let Some(ref status) = target_status {
            if &attendee.attendance_status != status {
                continue;
            }
        }
        // Institutions have a head count, not a mailbox.
        if attendee.attendee_type.is_institution() {
            skipped += 1;
            continue;
        }

        let info = attendee.resolve(db).await;
        let recipients = info.recipients();
        if recipients.is_empty() {
            skipped += 1;
            continue;
        }

        let vars = match guest_email_vars(db, &event, &attendee, &info).await {
            Ok(vars) => vars,
            Err(err) => {
                tracing::warn!(attendee = attendee.id, error = %err, "failed to build email vars");
                failed += 1;
                continue;
            }
        };
        let subject = template::render(&req.subject, &vars);
        let body = template::render(&req.message, &vars);

        match EmailService::send_html_mail(&subject, &body, &body, recipients.clone()).await {
            Ok(()) => {
                sent += 1;
                all_recipients.extend(recipients);
                if attendee.attendance_status == AttendanceStatus::Attended {
                    if let Err(err) = attendee.stamp_letter_sent(db).await {
                        tracing::warn!(error = %err, "failed to stamp pd_letter_sent_at");
                    }
                }
            }
            Err(err) => {
                tracing::warn!(attendee = attendee.id, error = %err, "guest email send failed");
                failed += 1;
            }
        }
    }

    let note = format!(
        "Sent email<br>{}<br>{}<br>To: {}",
        req.subject,
        req.message,
        all_recipients.join(", ")
    );
    if let Err(err) = event.add_note(db, claims.sub, &note).await {
        tracing::warn!(error = %err, "failed to record email audit note");
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            GuestEmailResponse {
                sent,
                failed,
                skipped,
            },
            "Email batch processed",
        )),
    )
        .into_response()
}

/// Renders the PD email body for an attendee, shared by the letter batch
/// endpoint in the attendees module.
pub(crate) async fn render_pd_email(
    db: &sea_orm::DatabaseConnection,
    settings: &PdSettings,
    event: &db::models::event::Model,
    attendee: &db::models::event_attendee::Model,
    info: &db::models::event_attendee::AttendeeInfo,
) -> Result<(String, String), sea_orm::DbErr> {
    let mut vars = crate::services::letters::pd_letter_vars(db, event, attendee, info).await?;
    // The retrieval link belongs to the email only, not the letter itself.
    vars.push(("pd_letter_url", attendee.pd_letter_url()));
    let subject = template::render(&settings.pd_email_subject, &vars);
    let body = template::render(&settings.pd_email_template, &vars);
    Ok((subject, body))
}
