//! Attendee list and inline CSV export.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use db::models::event::Entity as EventEntity;
use db::models::event_attendee::Model as AttendeeModel;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};
use serde::Serialize;
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::title_case;

#[derive(Serialize)]
pub struct AttendeeRow {
    pub id: i64,
    pub attendee_type: String,
    pub attendee_id: i64,
    pub name: String,
    pub email: String,
    pub attendance_status: String,
    pub attendance_type: String,
    pub pd_hour: f64,
    pub participants: i32,
    pub note: Option<String>,
    pub pd_letter_sent_at: Option<DateTime<Utc>>,
    pub pd_letter_url: String,
}

async fn resolve_rows(
    db: &DatabaseConnection,
    event: &db::models::event::Model,
) -> Result<Vec<(AttendeeModel, db::models::event_attendee::AttendeeInfo)>, DbErr> {
    let mut rows = Vec::new();
    for attendee in event.attendees(db).await? {
        let info = attendee.resolve(db).await;
        rows.push((attendee, info));
    }
    // Alphabetical by resolved display name.
    rows.sort_by(|a, b| a.1.display_name().cmp(&b.1.display_name()));
    Ok(rows)
}

/// GET /api/events/{event_id}/attendees
///
/// Resolved attendee list, alphabetized by display name.
pub async fn list_attendees(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
) -> impl IntoResponse {
    let db = app_state.db();

    let event = match EventEntity::find_by_id(event_id).one(db).await {
        Ok(Some(event)) => event,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Vec<AttendeeRow>>::error("Event not found")),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Vec<AttendeeRow>>::error(
                    "Failed to retrieve attendees",
                )),
            )
                .into_response();
        }
    };

    let rows = match resolve_rows(db, &event).await {
        Ok(rows) => rows,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Vec<AttendeeRow>>::error(
                    "Failed to retrieve attendees",
                )),
            )
                .into_response();
        }
    };

    let serialized: Vec<AttendeeRow> = rows
        .into_iter()
        .map(|(attendee, info)| AttendeeRow {
            id: attendee.id,
            attendee_type: title_case(&attendee.attendee_type.to_string()),
            attendee_id: attendee.attendee_id,
            name: info.display_name(),
            email: info.email.clone(),
            attendance_status: attendee.attendance_status.to_string(),
            attendance_type: attendee.attendance_type.to_string(),
            pd_hour: attendee.pd_hour,
            participants: attendee.participants,
            note: attendee.note.clone(),
            pd_letter_sent_at: attendee.pd_letter_sent_at,
            pd_letter_url: attendee.pd_letter_url(),
        })
        .collect();

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            serialized,
            "Attendees retrieved successfully",
        )),
    )
        .into_response()
}

fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// GET /api/events/{event_id}/attendees.csv
///
/// Inline CSV download of the attendee list for use at the event itself.
pub async fn export_attendees_csv(
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
                Json(ApiResponse::<()>::error("Failed to export attendees")),
            )
                .into_response();
        }
    };

    let rows = match resolve_rows(db, &event).await {
        Ok(rows) => rows,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to export attendees")),
            )
                .into_response();
        }
    };

    let mut csv = String::from(
        "Attendance Status,Attendance Type,PD Hour/Attendees,Note,Type,Name/Lastname,Firstname,Email,Email 2,Email 3\n",
    );
    for (attendee, info) in rows {
        let hours_or_count = if attendee.attendee_type.is_institution() {
            attendee.participants.to_string()
        } else {
            attendee.pd_hour.to_string()
        };
        let line = [
            attendee.attendance_status.to_string(),
            title_case(&attendee.attendance_type.to_string()),
            hours_or_count,
            attendee.note.clone().unwrap_or_default(),
            title_case(&attendee.attendee_type.to_string()),
            if info.last_name.is_empty() {
                info.first_name.clone()
            } else {
                info.last_name.clone()
            },
            if info.last_name.is_empty() {
                String::new()
            } else {
                info.first_name.clone()
            },
            info.email.clone(),
            info.alt_email.clone(),
            info.secondary_email.clone(),
        ]
        .iter()
        .map(|field| escape_csv_field(field))
        .collect::<Vec<_>>()
        .join(",");
        csv.push_str(&line);
        csv.push('\n');
    }

    let filename = format!("event_{}_attendees.csv", event.id);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::escape_csv_field;

    #[test]
    fn fields_with_commas_and_quotes_are_quoted() {
        assert_eq!(escape_csv_field("plain"), "plain");
        assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
