//! Helpers shared across route modules.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

/// Display format for event date-times in list responses.
pub const LIST_DATETIME_FORMAT: &str = "%m/%d/%Y %H:%M";

/// Input format for event date-times on create/edit forms.
pub const FORM_DATETIME_FORMAT: &str = "%m/%d/%Y %I:%M %p";

/// Input format for report date filters.
pub const FORM_DATE_FORMAT: &str = "%m/%d/%Y";

/// Bulk-selection request body used by the attendee mutation endpoints.
#[derive(Debug, Deserialize)]
pub struct BulkIds {
    pub ids: Vec<i64>,
}

/// Parses a form date-time like "10/10/2020 01:30 PM" into a UTC instant.
pub fn parse_form_datetime(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), FORM_DATETIME_FORMAT)
        .ok()
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}

/// Parses a form date like "10/10/2020".
pub fn parse_form_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), FORM_DATE_FORMAT).ok()
}

/// "cohort_participant" -> "Cohort Participant".
pub fn title_case(value: &str) -> String {
    value
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_twelve_hour_form_datetimes() {
        let dt = parse_form_datetime("10/10/2020 01:30 PM").unwrap();
        assert_eq!(dt.to_rfc3339(), "2020-10-10T13:30:00+00:00");
        assert!(parse_form_datetime("2020-10-10 13:30").is_none());
    }

    #[test]
    fn title_cases_snake_case_values() {
        assert_eq!(title_case("cohort_participant"), "Cohort Participant");
        assert_eq!(title_case("highschool"), "Highschool");
        assert_eq!(title_case("not attended"), "Not attended");
    }
}
