//! Attendee mutations: add, toggle, mark, update, and the PD-letter batch.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use db::models::event::Entity as EventEntity;
use db::models::event_attendee::{
    AttendanceStatus, AttendanceType, AttendeeType, Column as AttendeeColumn,
    Entity as AttendeeEntity, Model as AttendeeModel,
};
use db::models::setting::PdSettings;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use serde::{Deserialize, Serialize};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::BulkIds;
use crate::routes::events::post::render_pd_email;
use crate::services::email::EmailService;

const EMPTY_SELECTION: &str = "Please select a record and try again";

async fn find_event_attendee(
    db: &DatabaseConnection,
    event_id: i64,
    attendee_id: i64,
) -> Result<Option<AttendeeModel>, sea_orm::DbErr> {
    AttendeeEntity::find()
        .filter(AttendeeColumn::EventId.eq(event_id))
        .filter(AttendeeColumn::Id.eq(attendee_id))
        .one(db)
        .await
}

#[derive(Debug, Deserialize)]
pub struct AddAttendeesRequest {
    pub ids: Vec<i64>,
    pub attendee_type: AttendeeType,
    pub attendance_type: AttendanceType,
}

#[derive(Serialize, Default)]
pub struct AddAttendeesResponse {
    pub added: usize,
    pub skipped: usize,
}

/// POST /api/events/{event_id}/attendees
///
/// Registers guests on the event. New records start with status N/A and
/// PD hours seeded from the event; guests already on the event are
/// skipped, not errors.
pub async fn add_attendees(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<AddAttendeesRequest>,
) -> impl IntoResponse {
    let db = app_state.db();

    if req.ids.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<AddAttendeesResponse>::error(EMPTY_SELECTION)),
        )
            .into_response();
    }

    let event = match EventEntity::find_by_id(event_id).one(db).await {
        Ok(Some(event)) => event,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<AddAttendeesResponse>::error("Event not found")),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<AddAttendeesResponse>::error(
                    "Failed to add attendees",
                )),
            )
                .into_response();
        }
    };

    let mut added = 0usize;
    let mut skipped = 0usize;
    for source_id in &req.ids {
        match AttendeeModel::add_to_event(
            db,
            &event,
            req.attendee_type.clone(),
            *source_id,
            req.attendance_type.clone(),
        )
        .await
        {
            Ok(Some(_)) => added += 1,
            Ok(None) => skipped += 1,
            Err(_) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<AddAttendeesResponse>::error(
                        "Failed to add attendees",
                    )),
                )
                    .into_response();
            }
        }
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            AddAttendeesResponse { added, skipped },
            "Attendees added successfully",
        )),
    )
        .into_response()
}

/// POST /api/events/{event_id}/attendees/toggle
///
/// Flips attendance_type between required and optional for each selected
/// attendee.
pub async fn toggle_attendance_type(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<BulkIds>,
) -> impl IntoResponse {
    let db = app_state.db();

    if req.ids.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(EMPTY_SELECTION)),
        )
            .into_response();
    }

    for id in &req.ids {
        let attendee = match find_event_attendee(db, event_id, *id).await {
            Ok(Some(attendee)) => attendee,
            Ok(None) => continue,
            Err(_) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<()>::error("Failed to update attendees")),
                )
                    .into_response();
            }
        };
        if attendee.toggle_attendance_type(db).await.is_err() {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to update attendees")),
            )
                .into_response();
        }
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success((), "Attendance type updated")),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct MarkAttendanceRequest {
    pub ids: Vec<i64>,
    pub attendance_status: AttendanceStatus,
}

/// POST /api/events/{event_id}/attendees/mark
///
/// Records attendance for the selected attendees. Marking not attended
/// zeroes earned hours and the head count.
pub async fn mark_attendance(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<MarkAttendanceRequest>,
) -> impl IntoResponse {
    let db = app_state.db();

    if req.ids.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(EMPTY_SELECTION)),
        )
            .into_response();
    }

    for id in &req.ids {
        let attendee = match find_event_attendee(db, event_id, *id).await {
            Ok(Some(attendee)) => attendee,
            Ok(None) => continue,
            Err(_) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<()>::error("Failed to mark attendance")),
                )
                    .into_response();
            }
        };
        if attendee
            .set_attendance_status(db, req.attendance_status.clone())
            .await
            .is_err()
        {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to mark attendance")),
            )
                .into_response();
        }
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success((), "Attendance recorded")),
    )
        .into_response()
}

/// Only these fields of an attendee are editable; anything else in the
/// payload is rejected outright.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateAttendeeRequest {
    pub id: i64,
    pub pd_hour: Option<f64>,
    pub participants: Option<i32>,
    pub note: Option<String>,
}

/// POST /api/events/{event_id}/attendees/update
pub async fn update_attendee(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<UpdateAttendeeRequest>,
) -> impl IntoResponse {
    let db = app_state.db();

    let attendee = match find_event_attendee(db, event_id, req.id).await {
        Ok(Some(attendee)) => attendee,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::error("Attendee not found")),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to update attendee")),
            )
                .into_response();
        }
    };

    let mut active: db::models::event_attendee::ActiveModel = attendee.into();
    if let Some(pd_hour) = req.pd_hour {
        active.pd_hour = Set(pd_hour);
    }
    if let Some(participants) = req.participants {
        active.participants = Set(participants);
    }
    if let Some(note) = req.note {
        active.note = Set(Some(note));
    }
    active.updated_at = Set(Utc::now());

    match active.update(db).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(ApiResponse::success(updated, "Attendee updated successfully")),
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error("Failed to update attendee")),
        )
            .into_response(),
    }
}

#[derive(Serialize, Default)]
pub struct EmailLettersResponse {
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// POST /api/events/{event_id}/attendees/email-letters
///
/// Emails PD credit letters to the selected attendees. Only guests marked
/// attended receive one; high-school rows are skipped without aborting
/// the rest of the batch. Each successful send stamps pd_letter_sent_at.
pub async fn email_letters(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<BulkIds>,
) -> impl IntoResponse {
    let db = app_state.db();

    if req.ids.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<EmailLettersResponse>::error(
                "Please select the attendees and try again",
            )),
        )
            .into_response();
    }

    let event = match EventEntity::find_by_id(event_id).one(db).await {
        Ok(Some(event)) => event,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<EmailLettersResponse>::error("Event not found")),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<EmailLettersResponse>::error(
                    "Failed to send letters",
                )),
            )
                .into_response();
        }
    };

    let settings = match PdSettings::from_db(db).await {
        Ok(settings) => settings,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<EmailLettersResponse>::error(
                    "Failed to send letters",
                )),
            )
                .into_response();
        }
    };

    let mut sent = 0usize;
    let mut failed = 0usize;
    let mut skipped = 0usize;

    for id in &req.ids {
        let attendee = match find_event_attendee(db, event_id, *id).await {
            Ok(Some(attendee)) => attendee,
            Ok(None) => {
                skipped += 1;
                continue;
            }
            Err(err) => {
                tracing::warn!(attendee = id, error = %err, "letter lookup failed");
                failed += 1;
                continue;
            }
        };

        if attendee.attendance_status != AttendanceStatus::Attended {
            skipped += 1;
            continue;
        }
        // No person and no mailbox behind an institution row.
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

        let (subject, body) = match render_pd_email(db, &settings, &event, &attendee, &info).await {
            Ok(rendered) => rendered,
            Err(err) => {
                tracing::warn!(attendee = attendee.id, error = %err, "letter render failed");
                failed += 1;
                continue;
            }
        };

        match EmailService::send_html_mail(&subject, &body, &body, recipients).await {
            Ok(()) => {
                sent += 1;
                if let Err(err) = attendee.stamp_letter_sent(db).await {
                    tracing::warn!(error = %err, "failed to stamp pd_letter_sent_at");
                }
            }
            Err(err) => {
                tracing::warn!(attendee = attendee.id, error = %err, "letter send failed");
                failed += 1;
            }
        }
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            EmailLettersResponse {
                sent,
                failed,
                skipped,
            },
            "Letter batch processed",
        )),
    )
        .into_response()
}
