//! Shared request/response types for the event endpoints.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use db::models::{event, event_type, term};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, JsonValue};
use serde::{Deserialize, Serialize};

use crate::routes::common::{LIST_DATETIME_FORMAT, parse_form_datetime};

/// Create/edit payload. Times arrive in the form format
/// `%m/%d/%Y %I:%M %p`; cohorts as an id list.
#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub name: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub event_type_id: i64,
    pub term_id: i64,
    pub description: Option<String>,
    pub pd_hour: Option<f64>,
    pub delivery_mode: Option<String>,
    pub cohorts: Option<Vec<i64>>,
}

/// The parsed form of [`EventRequest`] once validation has passed.
#[derive(Debug)]
pub struct ValidatedEvent {
    pub name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub event_type_id: i64,
    pub term_id: i64,
    pub description: Option<String>,
    pub pd_hour: f64,
    pub delivery_mode: Option<event::DeliveryMode>,
    pub cohort: Option<JsonValue>,
}

impl EventRequest {
    /// Validates the payload, returning per-field error messages on
    /// failure. Nothing is persisted when any field fails.
    pub fn validate(&self) -> Result<ValidatedEvent, HashMap<String, String>> {
        let mut errors: HashMap<String, String> = HashMap::new();

        let start_time = parse_form_datetime(&self.start_time);
        if start_time.is_none() {
            errors.insert(
                "start_time".to_string(),
                "Please enter a valid start time".to_string(),
            );
        }

        let end_time = parse_form_datetime(&self.end_time);
        if end_time.is_none() {
            errors.insert(
                "end_time".to_string(),
                "Please enter a valid end time".to_string(),
            );
        }

        if let (Some(start), Some(end)) = (start_time, end_time) {
            if end < start {
                errors.insert(
                    "end_time".to_string(),
                    "Please enter valid start and end times".to_string(),
                );
            }
        }

        let delivery_mode = match self.delivery_mode.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => {
                match event::DeliveryMode::from_str(value) {
                    Ok(mode) => Some(mode),
                    Err(_) => {
                        errors.insert(
                            "delivery_mode".to_string(),
                            "Please select a valid delivery mode".to_string(),
                        );
                        None
                    }
                }
            }
            _ => None,
        };

        if !errors.is_empty() {
            return Err(errors);
        }
        let (Some(start_time), Some(end_time)) = (start_time, end_time) else {
            return Err(errors);
        };

        // Cohort ids are stored as a JSON array of id strings.
        let cohort = self.cohorts.as_ref().map(|ids| {
            JsonValue::Array(
                ids.iter()
                    .map(|id| JsonValue::String(id.to_string()))
                    .collect(),
            )
        });

        Ok(ValidatedEvent {
            name: self.name.clone(),
            start_time,
            end_time,
            event_type_id: self.event_type_id,
            term_id: self.term_id,
            description: self.description.clone(),
            pd_hour: self.pd_hour.unwrap_or(0.0),
            delivery_mode,
            cohort,
        })
    }
}

#[derive(Serialize)]
pub struct EventTypeBrief {
    pub id: i64,
    pub name: String,
}

#[derive(Serialize)]
pub struct TermBrief {
    pub id: i64,
    pub code: String,
    pub name: String,
}

/// Serialized event for list and detail responses.
#[derive(Serialize)]
pub struct EventResponse {
    pub id: i64,
    pub name: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub event_type: Option<EventTypeBrief>,
    pub term: Option<TermBrief>,
    pub description: Option<String>,
    pub pd_hour: f64,
    pub delivery_mode: Option<String>,
    pub cohorts: Vec<String>,
    pub cohort_names: String,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventResponse {
    pub async fn from_model(
        db: &DatabaseConnection,
        event: &event::Model,
    ) -> Result<Self, DbErr> {
        let event_type = event_type::Entity::find_by_id(event.event_type_id)
            .one(db)
            .await?
            .map(|t| EventTypeBrief {
                id: t.id,
                name: t.name,
            });
        let term = term::Entity::find_by_id(event.term_id)
            .one(db)
            .await?
            .map(|t| TermBrief {
                id: t.id,
                code: t.code,
                name: t.name,
            });

        Ok(EventResponse {
            id: event.id,
            name: event.name.clone(),
            start_time: event.start_time.format(LIST_DATETIME_FORMAT).to_string(),
            end_time: event.end_time.format(LIST_DATETIME_FORMAT).to_string(),
            event_type,
            term,
            description: event.description.clone(),
            pd_hour: event.pd_hour,
            delivery_mode: event.delivery_mode.as_ref().map(|m| m.to_string()),
            cohorts: event.cohort_ids(),
            cohort_names: event.cohort_names(db).await?,
            created_by: event.created_by,
            created_at: event.created_at,
            updated_at: event.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::EventRequest;

    fn base_request() -> EventRequest {
        EventRequest {
            name: Some("Workshop".to_string()),
            start_time: "10/10/2020 01:30 PM".to_string(),
            end_time: "10/10/2020 03:00 PM".to_string(),
            event_type_id: 1,
            term_id: 1,
            description: None,
            pd_hour: Some(1.5),
            delivery_mode: Some("In Person".to_string()),
            cohorts: Some(vec![3, 17]),
        }
    }

    #[test]
    fn valid_request_passes_and_stringifies_cohorts() {
        let validated = base_request().validate().unwrap();
        assert_eq!(validated.pd_hour, 1.5);
        let cohort = validated.cohort.unwrap();
        assert_eq!(cohort.to_string(), r#"["3","17"]"#);
    }

    #[test]
    fn end_before_start_fails_with_end_time_error() {
        let mut req = base_request();
        req.start_time = "10/10/2020 01:30 PM".to_string();
        req.end_time = "10/10/2020 01:00 PM".to_string();
        let errors = req.validate().unwrap_err();
        assert_eq!(
            errors.get("end_time").map(String::as_str),
            Some("Please enter valid start and end times")
        );
    }

    #[test]
    fn unparseable_times_fail_per_field() {
        let mut req = base_request();
        req.start_time = "2020-10-10T13:30:00Z".to_string();
        req.end_time = "whenever".to_string();
        let errors = req.validate().unwrap_err();
        assert!(errors.contains_key("start_time"));
        assert!(errors.contains_key("end_time"));
    }

    #[test]
    fn unknown_delivery_mode_is_rejected() {
        let mut req = base_request();
        req.delivery_mode = Some("Telepathy".to_string());
        let errors = req.validate().unwrap_err();
        assert!(errors.contains_key("delivery_mode"));
    }
}
