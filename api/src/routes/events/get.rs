//! List and detail handlers for events.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use db::models::{
    event::{Column as EventColumn, Entity as EventEntity},
    event_file::{Column as FileColumn, Entity as FileEntity, Model as FileModel},
    term::{Column as TermColumn, Entity as TermEntity},
};
use chrono::{TimeZone, Utc};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::parse_form_date;
use crate::routes::events::common::EventResponse;

#[derive(Debug, Deserialize)]
pub struct FilterReq {
    pub page: Option<i32>,
    pub per_page: Option<i32>,
    pub term: Option<String>,
    pub event_type: Option<i64>,
    pub cohort: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub sort: Option<String>,
}

#[derive(Serialize, Default)]
pub struct FilterResponse {
    pub events: Vec<EventResponse>,
    pub page: i32,
    pub per_page: i32,
    pub total: i32,
}

/// GET /api/events
///
/// Paginated event list. Filters: `term` (term code), `event_type` (id),
/// `cohort` (id, JSON containment on the stored id list), `start_time` /
/// `end_time` (`%m/%d/%Y` bounds). Sort fields: `start_time`,
/// `created_at`, `name`, `-` prefix for descending.
pub async fn list_events(
    State(app_state): State<AppState>,
    Query(params): Query<FilterReq>,
) -> impl IntoResponse {
    let db = app_state.db();

    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(20).clamp(1, 100);

    if let Some(sort_field) = &params.sort {
        let valid_fields = ["start_time", "created_at", "name"];
        for field in sort_field.split(',') {
            let field = field.trim().trim_start_matches('-');
            if !valid_fields.contains(&field) {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::<FilterResponse>::error(
                        "Invalid field used for sorting",
                    )),
                )
                    .into_response();
            }
        }
    }

    let mut condition = Condition::all();

    if let Some(ref code) = params.term {
        let term = match TermEntity::find()
            .filter(TermColumn::Code.eq(code.clone()))
            .one(db)
            .await
        {
            Ok(term) => term,
            Err(_) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<FilterResponse>::error(
                        "Failed to retrieve events",
                    )),
                )
                    .into_response();
            }
        };
        match term {
            Some(term) => condition = condition.add(EventColumn::TermId.eq(term.id)),
            // Unknown term code matches nothing.
            None => condition = condition.add(EventColumn::Id.eq(-1)),
        }
    }

    if let Some(event_type_id) = params.event_type {
        condition = condition.add(EventColumn::EventTypeId.eq(event_type_id));
    }

    if let Some(cohort_id) = params.cohort {
        // The cohort column holds a JSON array of quoted id strings, so a
        // LIKE on the quoted id is exact: "1" never matches "17".
        condition = condition.add(EventColumn::Cohort.like(format!("%\"{}\"%", cohort_id)));
    }

    if let Some(ref start) = params.start_time {
        match parse_form_date(start) {
            Some(date) => {
                let bound = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default());
                condition = condition.add(EventColumn::StartTime.gte(bound));
            }
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::<FilterResponse>::error(
                        "Invalid start_time filter",
                    )),
                )
                    .into_response();
            }
        }
    }

    if let Some(ref end) = params.end_time {
        match parse_form_date(end) {
            Some(date) => {
                let bound =
                    Utc.from_utc_datetime(&date.and_hms_opt(23, 59, 59).unwrap_or_default());
                condition = condition.add(EventColumn::EndTime.lte(bound));
            }
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::<FilterResponse>::error(
                        "Invalid end_time filter",
                    )),
                )
                    .into_response();
            }
        }
    }

    let mut query = EventEntity::find().filter(condition);

    let mut applied_sort = false;
    if let Some(sort_param) = &params.sort {
        for sort in sort_param.split(',') {
            let sort = sort.trim();
            let (field, asc) = if let Some(stripped) = sort.strip_prefix('-') {
                (stripped, false)
            } else {
                (sort, true)
            };

            query = match field {
                "start_time" => {
                    applied_sort = true;
                    if asc {
                        query.order_by_asc(EventColumn::StartTime)
                    } else {
                        query.order_by_desc(EventColumn::StartTime)
                    }
                }
                "created_at" => {
                    applied_sort = true;
                    if asc {
                        query.order_by_asc(EventColumn::CreatedAt)
                    } else {
                        query.order_by_desc(EventColumn::CreatedAt)
                    }
                }
                "name" => {
                    applied_sort = true;
                    if asc {
                        query.order_by_asc(EventColumn::Name)
                    } else {
                        query.order_by_desc(EventColumn::Name)
                    }
                }
                _ => query,
            };
        }
    }

    // Default: upcoming first.
    if !applied_sort {
        query = query.order_by_desc(EventColumn::StartTime);
    }

    let paginator = query.paginate(db, per_page as u64);
    let total = match paginator.num_items().await {
        Ok(n) => n as i32,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<FilterResponse>::error(
                    "Failed to retrieve events",
                )),
            )
                .into_response();
        }
    };

    let events = match paginator.fetch_page((page - 1) as u64).await {
        Ok(events) => events,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<FilterResponse>::error(
                    "Failed to retrieve events",
                )),
            )
                .into_response();
        }
    };

    let mut serialized = Vec::with_capacity(events.len());
    for event in &events {
        match EventResponse::from_model(db, event).await {
            Ok(response) => serialized.push(response),
            Err(_) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<FilterResponse>::error(
                        "Failed to retrieve events",
                    )),
                )
                    .into_response();
            }
        }
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            FilterResponse {
                events: serialized,
                page,
                per_page,
                total,
            },
            "Events retrieved successfully",
        )),
    )
        .into_response()
}

#[derive(Serialize)]
pub struct EventDetailResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub num_guests: u64,
    pub num_attended: u64,
    pub num_not_attended: u64,
    pub files: Vec<FileModel>,
}

/// GET /api/events/{event_id}
///
/// Event detail including attendance counts and uploaded files.
pub async fn get_event(
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
                Json(ApiResponse::<()>::error("Failed to retrieve event")),
            )
                .into_response();
        }
    };

    let detail = async {
        let response = EventResponse::from_model(db, &event).await?;
        let num_guests = event.num_guests(db).await?;
        let num_attended = event.num_attended(db).await?;
        let num_not_attended = event.num_not_attended(db).await?;
        let files = FileEntity::find()
            .filter(FileColumn::EventId.eq(event.id))
            .order_by_asc(FileColumn::Id)
            .all(db)
            .await?;
        Ok::<_, sea_orm::DbErr>(EventDetailResponse {
            event: response,
            num_guests,
            num_attended,
            num_not_attended,
            files,
        })
    }
    .await;

    match detail {
        Ok(detail) => (
            StatusCode::OK,
            Json(ApiResponse::success(detail, "Event retrieved successfully")),
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error("Failed to retrieve event")),
        )
            .into_response(),
    }
}
