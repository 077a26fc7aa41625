//! Guest search handlers.
//!
//! Each attendee type has its own source query; the picker only ever asks
//! for one type at a time. List-valued query params arrive comma-joined
//! (`?cohort=1,2`).

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{TimeZone, Utc};
use db::models::{
    cohort_participant, course, event_attendee::AttendeeType, faculty_coordinator, high_school,
    teacher, teacher_course_certificate,
};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::parse_form_date;

fn parse_id_list(raw: Option<&str>) -> Vec<i64> {
    raw.map(|s| {
        s.split(',')
            .filter_map(|part| part.trim().parse().ok())
            .collect()
    })
    .unwrap_or_default()
}

fn parse_str_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
pub struct GuestSearchQuery {
    pub attendee_type: String,
    pub cohort: Option<String>,
    pub course: Option<String>,
    pub course_status: Option<String>,
    pub since: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GuestRow {
    pub attendee_type: AttendeeType,
    /// Id of the source record an attendee row would reference.
    pub attendee_id: i64,
    pub name: String,
    pub email: String,
}

async fn search_instructors(
    db: &DatabaseConnection,
    query: &GuestSearchQuery,
) -> Result<Vec<GuestRow>, DbErr> {
    let mut certs = teacher_course_certificate::Entity::find();

    let course_ids = parse_id_list(query.course.as_deref());
    if !course_ids.is_empty() {
        certs = certs.filter(teacher_course_certificate::Column::CourseId.is_in(course_ids));
    }
    let statuses = parse_str_list(query.course_status.as_deref());
    if !statuses.is_empty() {
        certs = certs.filter(teacher_course_certificate::Column::Status.is_in(statuses));
    }
    if let Some(raw) = query.since.as_deref() {
        if let Some(date) = parse_form_date(raw) {
            let bound = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default());
            certs = certs.filter(teacher_course_certificate::Column::Since.gte(bound));
        }
    }

    let mut teacher_ids: Vec<i64> = certs.all(db).await?.iter().map(|c| c.teacher_id).collect();
    teacher_ids.sort_unstable();
    teacher_ids.dedup();

    let mut rows = Vec::new();
    for teacher in teacher::Entity::find()
        .filter(teacher::Column::Id.is_in(teacher_ids))
        .all(db)
        .await?
    {
        if let Some(linked) = teacher.user(db).await? {
            rows.push(GuestRow {
                attendee_type: AttendeeType::Instructor,
                attendee_id: teacher.id,
                name: linked.name_last_first(),
                email: linked.email,
            });
        }
    }
    Ok(rows)
}

async fn search_faculty(
    db: &DatabaseConnection,
    query: &GuestSearchQuery,
) -> Result<Vec<GuestRow>, DbErr> {
    let mut coordinators = faculty_coordinator::Entity::find()
        .filter(faculty_coordinator::Column::Status.eq("active"));

    let cohort_ids = parse_id_list(query.cohort.as_deref());
    if !cohort_ids.is_empty() {
        coordinators =
            coordinators.filter(faculty_coordinator::Column::CohortId.is_in(cohort_ids));
    }

    let mut rows = Vec::new();
    for coordinator in coordinators.all(db).await? {
        if let Some(linked) = coordinator.user(db).await? {
            rows.push(GuestRow {
                attendee_type: AttendeeType::Faculty,
                attendee_id: coordinator.id,
                name: linked.name_last_first(),
                email: linked.email,
            });
        }
    }
    Ok(rows)
}

async fn search_cohort_participants(
    db: &DatabaseConnection,
    query: &GuestSearchQuery,
) -> Result<Vec<GuestRow>, DbErr> {
    let mut participants = cohort_participant::Entity::find()
        .filter(cohort_participant::Column::Status.eq("active"));

    let cohort_ids = parse_id_list(query.cohort.as_deref());
    if !cohort_ids.is_empty() {
        participants =
            participants.filter(cohort_participant::Column::CohortId.is_in(cohort_ids));
    }

    let mut rows = Vec::new();
    for participant in participants.all(db).await? {
        if let Some(linked) = participant.user(db).await? {
            rows.push(GuestRow {
                attendee_type: AttendeeType::CohortParticipant,
                attendee_id: participant.id,
                name: linked.name_last_first(),
                email: linked.email,
            });
        }
    }
    Ok(rows)
}

async fn search_high_schools(db: &DatabaseConnection) -> Result<Vec<GuestRow>, DbErr> {
    Ok(high_school::Entity::find()
        .filter(high_school::Column::Status.eq("active"))
        .order_by_asc(high_school::Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(|school| GuestRow {
            attendee_type: AttendeeType::Highschool,
            attendee_id: school.id,
            name: school.name,
            email: String::new(),
        })
        .collect())
}

/// GET /api/guests/search
///
/// Candidates for the attendee picker, name-sorted.
pub async fn search_guests(
    State(app_state): State<AppState>,
    Query(query): Query<GuestSearchQuery>,
) -> impl IntoResponse {
    let db = app_state.db();

    let attendee_type: AttendeeType = match query.attendee_type.parse() {
        Ok(t) => t,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<Vec<GuestRow>>::error(
                    "Please select a valid attendee type",
                )),
            )
                .into_response();
        }
    };

    let result = match attendee_type {
        AttendeeType::Instructor => search_instructors(db, &query).await,
        AttendeeType::Faculty => search_faculty(db, &query).await,
        AttendeeType::CohortParticipant => search_cohort_participants(db, &query).await,
        AttendeeType::Highschool => search_high_schools(db).await,
    };

    match result {
        Ok(mut rows) => {
            rows.sort_by(|a, b| a.name.cmp(&b.name));
            (
                StatusCode::OK,
                Json(ApiResponse::success(rows, "Guests retrieved successfully")),
            )
                .into_response()
        }
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<Vec<GuestRow>>::error(
                "Failed to search guests",
            )),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct CourseQuery {
    pub cohort: Option<String>,
}

/// GET /api/guests/courses?cohort=1,2
///
/// Active courses for the given cohorts, for the instructor search form.
pub async fn list_courses(
    State(app_state): State<AppState>,
    Query(query): Query<CourseQuery>,
) -> impl IntoResponse {
    let db = app_state.db();

    let mut courses = course::Entity::find().filter(course::Column::Status.eq("active"));
    let cohort_ids = parse_id_list(query.cohort.as_deref());
    if !cohort_ids.is_empty() {
        courses = courses.filter(course::Column::CohortId.is_in(cohort_ids));
    }

    match courses
        .order_by_asc(course::Column::CatalogNumber)
        .all(db)
        .await
    {
        Ok(list) => (
            StatusCode::OK,
            Json(ApiResponse::success(list, "Courses retrieved successfully")),
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<Vec<course::Model>>::error(
                "Failed to retrieve courses",
            )),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_id_list, parse_str_list};

    #[test]
    fn id_lists_parse_comma_joined_values() {
        assert_eq!(parse_id_list(Some("1,2, 3")), vec![1, 2, 3]);
        assert_eq!(parse_id_list(Some("x,4")), vec![4]);
        assert!(parse_id_list(None).is_empty());
    }

    #[test]
    fn status_lists_drop_empty_entries() {
        assert_eq!(
            parse_str_list(Some("active, pending,")),
            vec!["active".to_string(), "pending".to_string()]
        );
    }
}
