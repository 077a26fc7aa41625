use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Account record for anyone the PD module references: event creators,
/// instructors, faculty coordinators, and cohort participants all hang
/// off a user row for their names and contact addresses.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    pub email: String,
    pub alt_email: Option<String>,
    pub secondary_email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    /// Institutional employee id, used by the attendee-level report.
    pub emplid: Option<String>,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::teacher::Entity")]
    Teachers,
    #[sea_orm(has_many = "super::faculty_coordinator::Entity")]
    FacultyCoordinators,
    #[sea_orm(has_many = "super::cohort_participant::Entity")]
    CohortParticipants,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// "Last, First" display form used in guest lists and search results.
    pub fn name_last_first(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}
