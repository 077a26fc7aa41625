//! Report generation handlers.
//!
//! Both reports share the same lifecycle: record a run, build the filtered
//! rows, write the CSV with the `csv` crate under the run's storage
//! directory, then hand back the run id, filename and download URL.

use std::collections::{HashMap, HashSet};
use std::fs;

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{TimeZone, Utc};
use db::models::{
    event::{Column as EventColumn, Entity as EventEntity, Model as EventModel},
    event_attendee::Model as AttendeeModel,
    event_type,
    report_run::Model as ReportRun,
    teacher, teacher_course_certificate, term, user,
};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use util::{config, state::AppState};

use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::parse_form_date;

#[derive(Serialize, Default)]
pub struct ReportRunResponse {
    pub run_id: i64,
    pub filename: String,
    pub url: String,
}

fn timestamped_filename(report: &str) -> String {
    format!("{}_{}.csv", report, Utc::now().format("%Y%m%d%H%M%S"))
}

/// Writes the rows as CSV and records the filename on the run.
async fn persist_csv(
    db: &DatabaseConnection,
    run: ReportRun,
    header: &[&str],
    rows: Vec<Vec<String>>,
) -> Result<ReportRunResponse, DbErr> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(header)
        .map_err(|e| DbErr::Custom(format!("Failed to write CSV: {}", e)))?;
    for row in rows {
        writer
            .write_record(&row)
            .map_err(|e| DbErr::Custom(format!("Failed to write CSV: {}", e)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| DbErr::Custom(format!("Failed to write CSV: {}", e)))?;

    let filename = timestamped_filename(&run.report);
    fs::create_dir_all(run.output_dir())
        .map_err(|e| DbErr::Custom(format!("Failed to create report directory: {}", e)))?;
    fs::write(run.output_path(&filename), bytes)
        .map_err(|e| DbErr::Custom(format!("Failed to store report: {}", e)))?;

    let run = run.set_filename(db, &filename).await?;
    Ok(ReportRunResponse {
        url: format!(
            "{}/api/reports/{}/{}",
            config::public_base_url(),
            run.id,
            filename
        ),
        run_id: run.id,
        filename,
    })
}

/// Shared event filter: required event types, optional cohort containment
/// (OR across ids), optional start-date window.
fn event_filter(
    event_type_ids: &[i64],
    cohort_ids: &[i64],
    started_on: Option<&str>,
    started_until: Option<&str>,
) -> Result<Condition, String> {
    let mut condition = Condition::all().add(EventColumn::EventTypeId.is_in(event_type_ids.to_vec()));

    if !cohort_ids.is_empty() {
        let mut any = Condition::any();
        for id in cohort_ids {
            // Ids are stored as quoted strings inside the JSON array, so
            // matching the quoted form never confuses "1" with "17".
            any = any.add(EventColumn::Cohort.like(format!("%\"{}\"%", id)));
        }
        condition = condition.add(any);
    }

    if let Some(raw) = started_on {
        let date = parse_form_date(raw).ok_or("Please enter a valid start date")?;
        let bound = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default());
        condition = condition.add(EventColumn::StartTime.gte(bound));
    }
    if let Some(raw) = started_until {
        let date = parse_form_date(raw).ok_or("Please enter a valid end date")?;
        let bound = Utc.from_utc_datetime(&date.and_hms_opt(23, 59, 59).unwrap_or_default());
        condition = condition.add(EventColumn::StartTime.lte(bound));
    }

    Ok(condition)
}

async fn lookup_name(db: &DatabaseConnection, user_id: i64) -> Result<String, DbErr> {
    Ok(user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .map(|u| u.name_last_first())
        .unwrap_or_else(|| "-".to_string()))
}

async fn lookup_event_type(db: &DatabaseConnection, id: i64) -> Result<String, DbErr> {
    Ok(event_type::Entity::find_by_id(id)
        .one(db)
        .await?
        .map(|t| t.name)
        .unwrap_or_default())
}

async fn lookup_term(db: &DatabaseConnection, id: i64) -> Result<String, DbErr> {
    Ok(term::Entity::find_by_id(id)
        .one(db)
        .await?
        .map(|t| t.name)
        .unwrap_or_default())
}

#[derive(Debug, Deserialize)]
pub struct PdEventsReportRequest {
    pub event_type_ids: Vec<i64>,
    #[serde(default)]
    pub cohort_ids: Vec<i64>,
    pub started_on: Option<String>,
    pub started_until: Option<String>,
}

const PD_EVENTS_HEADER: &[&str] = &[
    "Event Type",
    "Created By",
    "Start Date/Time",
    "End Date/Time",
    "Cohort(s)",
    "Term",
    "PD Hours",
    "Delivery Mode",
    "Description",
    "Guests",
    "# Attended",
    "# Not Attended",
];

async fn pd_events_rows(
    db: &DatabaseConnection,
    events: Vec<EventModel>,
) -> Result<Vec<Vec<String>>, DbErr> {
    let mut rows = Vec::with_capacity(events.len());
    for event in events {
        rows.push(vec![
            lookup_event_type(db, event.event_type_id).await?,
            lookup_name(db, event.created_by).await?,
            event.start_time_display(),
            event.end_time_display(),
            event.cohort_names(db).await?,
            lookup_term(db, event.term_id).await?,
            event.pd_hour.to_string(),
            event
                .delivery_mode
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_default(),
            event.description.clone().unwrap_or_default(),
            event.num_guests(db).await?.to_string(),
            event.num_attended(db).await?.to_string(),
            event.num_not_attended(db).await?.to_string(),
        ]);
    }
    Ok(rows)
}

/// POST /api/reports/pd-events
///
/// One CSV row per matching event, with guest and attendance counts.
pub async fn pd_events_report(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<PdEventsReportRequest>,
) -> impl IntoResponse {
    let db = app_state.db();

    if req.event_type_ids.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<ReportRunResponse>::error(
                "Please select at least one event type",
            )),
        )
            .into_response();
    }

    let condition = match event_filter(
        &req.event_type_ids,
        &req.cohort_ids,
        req.started_on.as_deref(),
        req.started_until.as_deref(),
    ) {
        Ok(condition) => condition,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<ReportRunResponse>::error(message)),
            )
                .into_response();
        }
    };

    let result = async {
        let events = EventEntity::find()
            .filter(condition)
            .order_by_asc(EventColumn::StartTime)
            .all(db)
            .await?;

        let run = ReportRun::create(
            db,
            "pd_events",
            claims.sub,
            json!({
                "event_type_ids": req.event_type_ids,
                "cohort_ids": req.cohort_ids,
                "started_on": req.started_on,
                "started_until": req.started_until,
            }),
        )
        .await?;

        let rows = pd_events_rows(db, events).await?;
        persist_csv(db, run, PD_EVENTS_HEADER, rows).await
    }
    .await;

    match result {
        Ok(response) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                response,
                "Report generated successfully",
            )),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "event summary report failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ReportRunResponse>::error(
                    "Failed to generate report",
                )),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AttendanceReportRequest {
    pub event_type_ids: Vec<i64>,
    #[serde(default)]
    pub term_ids: Vec<i64>,
    pub cohort_id: Option<i64>,
    #[serde(default)]
    pub course_cert_statuses: Vec<String>,
    pub started_on: Option<String>,
    pub started_until: Option<String>,
}

const ATTENDANCE_HEADER: &[&str] = &[
    "First Name",
    "Last Name",
    "EMPLID",
    "Email",
    "High School(s)",
    "Attendance Type",
    "Attendee Type",
    "Attendance Status",
    "PD Hours",
    "Total PD Hours",
    "PD Note",
    "Event Type",
    "Event Start Date/Time",
    "Event End Date/Time",
    "Event Cohorts",
];

/// Emplids of teachers holding a course certificate in one of the given
/// statuses. Used to restrict the attendee export to certified staff.
async fn certified_emplids(
    db: &DatabaseConnection,
    statuses: &[String],
) -> Result<HashSet<String>, DbErr> {
    let certificates = teacher_course_certificate::Entity::find()
        .filter(teacher_course_certificate::Column::Status.is_in(statuses.to_vec()))
        .all(db)
        .await?;

    let teacher_ids: Vec<i64> = certificates.iter().map(|c| c.teacher_id).collect();
    if teacher_ids.is_empty() {
        return Ok(HashSet::new());
    }

    let teachers = teacher::Entity::find()
        .filter(teacher::Column::Id.is_in(teacher_ids))
        .all(db)
        .await?;

    let mut emplids = HashSet::new();
    for teacher in teachers {
        if let Some(linked) = teacher.user(db).await? {
            if let Some(emplid) = linked.emplid.filter(|e| !e.is_empty()) {
                emplids.insert(emplid);
            }
        }
    }
    Ok(emplids)
}

struct AttendanceRow {
    attendee: AttendeeModel,
    info: db::models::event_attendee::AttendeeInfo,
    event_type: String,
    event_start: String,
    event_end: String,
    event_cohorts: String,
}

impl AttendanceRow {
    /// Person rows total by emplid; rows without one total by source record.
    fn person_key(&self) -> String {
        if self.info.emplid.is_empty() {
            format!("{}:{}", self.attendee.attendee_type, self.attendee.attendee_id)
        } else {
            self.info.emplid.clone()
        }
    }
}

/// POST /api/reports/attendance
///
/// One CSV row per attendee record on the matching events. Total PD Hours
/// sums every included row for the same person.
pub async fn attendance_report(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<AttendanceReportRequest>,
) -> impl IntoResponse {
    let db = app_state.db();

    if req.event_type_ids.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<ReportRunResponse>::error(
                "Please select at least one event type",
            )),
        )
            .into_response();
    }

    let cohort_ids: Vec<i64> = req.cohort_id.into_iter().collect();
    let mut condition = match event_filter(
        &req.event_type_ids,
        &cohort_ids,
        req.started_on.as_deref(),
        req.started_until.as_deref(),
    ) {
        Ok(condition) => condition,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<ReportRunResponse>::error(message)),
            )
                .into_response();
        }
    };
    if !req.term_ids.is_empty() {
        condition = condition.add(EventColumn::TermId.is_in(req.term_ids.clone()));
    }

    let result = async {
        let events = EventEntity::find()
            .filter(condition)
            .order_by_asc(EventColumn::StartTime)
            .all(db)
            .await?;

        let emplid_filter = if req.course_cert_statuses.is_empty() {
            None
        } else {
            Some(certified_emplids(db, &req.course_cert_statuses).await?)
        };

        let mut included = Vec::new();
        for event in &events {
            let event_type = lookup_event_type(db, event.event_type_id).await?;
            let event_cohorts = event.cohort_names(db).await?;
            for attendee in event.attendees(db).await? {
                let info = attendee.resolve(db).await;
                if let Some(emplids) = &emplid_filter {
                    if !emplids.contains(&info.emplid) {
                        continue;
                    }
                }
                included.push(AttendanceRow {
                    attendee,
                    info,
                    event_type: event_type.clone(),
                    event_start: event.start_time_display(),
                    event_end: event.end_time_display(),
                    event_cohorts: event_cohorts.clone(),
                });
            }
        }

        let mut totals: HashMap<String, f64> = HashMap::new();
        for row in &included {
            *totals.entry(row.person_key()).or_insert(0.0) += row.attendee.pd_hour;
        }

        let run = ReportRun::create(
            db,
            "attendance",
            claims.sub,
            json!({
                "event_type_ids": req.event_type_ids,
                "term_ids": req.term_ids,
                "cohort_id": req.cohort_id,
                "course_cert_statuses": req.course_cert_statuses,
                "started_on": req.started_on,
                "started_until": req.started_until,
            }),
        )
        .await?;

        let rows = included
            .iter()
            .map(|row| {
                let total = totals.get(&row.person_key()).copied().unwrap_or(0.0);
                vec![
                    row.info.first_name.clone(),
                    row.info.last_name.clone(),
                    row.info.emplid.clone(),
                    row.info.email.clone(),
                    row.info.high_schools.clone(),
                    row.attendee.attendance_type.to_string(),
                    row.attendee.attendee_type.to_string(),
                    row.attendee.attendance_status.to_string(),
                    row.attendee.pd_hour.to_string(),
                    total.to_string(),
                    row.attendee.note.clone().unwrap_or_default(),
                    row.event_type.clone(),
                    row.event_start.clone(),
                    row.event_end.clone(),
                    row.event_cohorts.clone(),
                ]
            })
            .collect();

        persist_csv(db, run, ATTENDANCE_HEADER, rows).await
    }
    .await;

    match result {
        Ok(response) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                response,
                "Report generated successfully",
            )),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "attendee export failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ReportRunResponse>::error(
                    "Failed to generate report",
                )),
            )
                .into_response()
        }
    }
}
