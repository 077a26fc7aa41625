use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{PaginatorTrait, QueryOrder};
use strum::{Display, EnumIter, EnumString};

use super::event_attendee::{self, AttendanceStatus};

/// Display format for event date-times in emails, letters and exports.
pub const DATETIME_DISPLAY_FORMAT: &str = "%m/%d/%Y %I:%M %p";

/// A professional-development event.
///
/// `cohort` holds the JSON array of cohort-id strings the event is scoped
/// to; containment filtering matches the quoted id so `"1"` never matches
/// an event scoped to cohort `"17"`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub event_type_id: i64,
    pub term_id: i64,
    pub created_by: i64,
    pub description: Option<String>,
    /// PD credit hours attendees earn for this event.
    pub pd_hour: f64,
    pub delivery_mode: Option<DeliveryMode>,
    #[sea_orm(column_type = "Json", nullable)]
    pub cohort: Option<Json>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, PartialEq, EnumIter, EnumString, Display, DeriveActiveEnum,
    serde::Serialize, serde::Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "delivery_mode")]
pub enum DeliveryMode {
    #[strum(serialize = "In Person")]
    #[sea_orm(string_value = "In Person")]
    #[serde(rename = "In Person")]
    InPerson,
    #[strum(serialize = "Online")]
    #[sea_orm(string_value = "Online")]
    Online,
    #[strum(serialize = "Hybrid")]
    #[sea_orm(string_value = "Hybrid")]
    Hybrid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::event_type::Entity",
        from = "Column::EventTypeId",
        to = "super::event_type::Column::Id"
    )]
    EventType,
    #[sea_orm(
        belongs_to = "super::term::Entity",
        from = "Column::TermId",
        to = "super::term::Column::Id"
    )]
    Term,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    Creator,
    #[sea_orm(has_many = "super::event_attendee::Entity")]
    Attendees,
    #[sea_orm(has_many = "super::event_file::Entity")]
    Files,
    #[sea_orm(has_many = "super::event_note::Entity")]
    Notes,
}

impl Related<super::event_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventType.def()
    }
}

impl Related<super::term::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Term.def()
    }
}

impl Related<super::event_attendee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Cohort ids this event is scoped to, as stored (id strings).
    pub fn cohort_ids(&self) -> Vec<String> {
        match &self.cohort {
            Some(Json::Array(items)) => items
                .iter()
                .filter_map(|v| match v {
                    Json::String(s) => Some(s.clone()),
                    Json::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Comma-joined cohort names, name-sorted; "-" when the event has none.
    pub async fn cohort_names(&self, db: &DatabaseConnection) -> Result<String, DbErr> {
        let ids: Vec<i64> = self
            .cohort_ids()
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        if ids.is_empty() {
            return Ok("-".to_string());
        }

        let cohorts = super::cohort::Entity::find()
            .filter(super::cohort::Column::Id.is_in(ids))
            .order_by_asc(super::cohort::Column::Name)
            .all(db)
            .await?;

        if cohorts.is_empty() {
            return Ok("-".to_string());
        }
        Ok(cohorts
            .into_iter()
            .map(|c| c.name)
            .collect::<Vec<_>>()
            .join(","))
    }

    pub fn start_time_display(&self) -> String {
        self.start_time.format(DATETIME_DISPLAY_FORMAT).to_string()
    }

    pub fn end_time_display(&self) -> String {
        self.end_time.format(DATETIME_DISPLAY_FORMAT).to_string()
    }

    pub async fn attendees(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Vec<event_attendee::Model>, DbErr> {
        event_attendee::Entity::find()
            .filter(event_attendee::Column::EventId.eq(self.id))
            .all(db)
            .await
    }

    pub async fn num_guests(&self, db: &DatabaseConnection) -> Result<u64, DbErr> {
        event_attendee::Entity::find()
            .filter(event_attendee::Column::EventId.eq(self.id))
            .count(db)
            .await
    }

    pub async fn num_attended(&self, db: &DatabaseConnection) -> Result<u64, DbErr> {
        event_attendee::Entity::find()
            .filter(event_attendee::Column::EventId.eq(self.id))
            .filter(event_attendee::Column::AttendanceStatus.eq(AttendanceStatus::Attended))
            .count(db)
            .await
    }

    pub async fn num_not_attended(&self, db: &DatabaseConnection) -> Result<u64, DbErr> {
        event_attendee::Entity::find()
            .filter(event_attendee::Column::EventId.eq(self.id))
            .filter(event_attendee::Column::AttendanceStatus.eq(AttendanceStatus::NotAttended))
            .count(db)
            .await
    }

    /// Resolved guest names, alphabetized: "Last, First" when a last name
    /// exists, otherwise the first name (institutions).
    pub async fn guest_names(&self, db: &DatabaseConnection) -> Result<Vec<String>, DbErr> {
        let mut names = Vec::new();
        for attendee in self.attendees(db).await? {
            let info = attendee.resolve(db).await;
            names.push(info.display_name());
        }
        names.sort();
        Ok(names)
    }

    /// Append an audit note to the event.
    pub async fn add_note(
        &self,
        db: &DatabaseConnection,
        created_by: i64,
        note: &str,
    ) -> Result<super::event_note::Model, DbErr> {
        super::event_note::ActiveModel {
            event_id: Set(self.id),
            created_by: Set(created_by),
            note: Set(note.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }
}
