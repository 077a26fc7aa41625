use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use strum::{Display, EnumIter, EnumString};
use util::config;

/// Guest registered for an event. `attendee_type` + `attendee_id` point at
/// the source record (teacher, coordinator, cohort participant or high
/// school); at most one row exists per (event, type, source id).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "event_attendees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub event_id: i64,
    pub attendee_type: AttendeeType,
    pub attendee_id: i64,
    pub attendance_status: AttendanceStatus,
    pub attendance_type: AttendanceType,
    /// PD hours credited to this guest; zeroed when marked not attended.
    pub pd_hour: f64,
    /// Head count for institutional guests; always 0 for person guests.
    pub participants: i32,
    pub note: Option<String>,
    pub pd_letter_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, EnumIter, EnumString, Display, DeriveActiveEnum,
    serde::Serialize, serde::Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendee_type")]
#[serde(rename_all = "snake_case")]
pub enum AttendeeType {
    #[strum(serialize = "instructor")]
    #[sea_orm(string_value = "instructor")]
    Instructor,
    #[strum(serialize = "faculty")]
    #[sea_orm(string_value = "faculty")]
    Faculty,
    #[strum(serialize = "cohort_participant")]
    #[sea_orm(string_value = "cohort_participant")]
    CohortParticipant,
    #[strum(serialize = "highschool")]
    #[sea_orm(string_value = "highschool")]
    Highschool,
}

impl AttendeeType {
    /// Institutional guests have a head count instead of a mailbox.
    pub fn is_institution(&self) -> bool {
        matches!(self, AttendeeType::Highschool)
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, EnumIter, EnumString, Display, DeriveActiveEnum,
    serde::Serialize, serde::Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status")]
pub enum AttendanceStatus {
    #[strum(serialize = "N/A")]
    #[sea_orm(string_value = "N/A")]
    #[serde(rename = "N/A")]
    NotRecorded,
    #[strum(serialize = "attended")]
    #[sea_orm(string_value = "attended")]
    #[serde(rename = "attended")]
    Attended,
    #[strum(serialize = "not attended")]
    #[sea_orm(string_value = "not attended")]
    #[serde(rename = "not attended")]
    NotAttended,
}

#[derive(
    Debug, Clone, PartialEq, Eq, EnumIter, EnumString, Display, DeriveActiveEnum,
    serde::Serialize, serde::Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_type")]
#[serde(rename_all = "snake_case")]
pub enum AttendanceType {
    #[strum(serialize = "required")]
    #[sea_orm(string_value = "required")]
    Required,
    #[strum(serialize = "optional")]
    #[sea_orm(string_value = "optional")]
    Optional,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id"
    )]
    Event,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Contact details resolved from an attendee's source record. Every field
/// is best-effort: a missing source record yields the placeholder so list
/// and export endpoints never fail on a dangling reference.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct AttendeeInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub alt_email: String,
    pub secondary_email: String,
    pub emplid: String,
    pub high_schools: String,
}

impl AttendeeInfo {
    pub fn placeholder() -> Self {
        AttendeeInfo {
            first_name: "-".to_string(),
            last_name: "-".to_string(),
            ..Default::default()
        }
    }

    /// "Last, First" for people; bare first name for institutions.
    pub fn display_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{}, {}", self.last_name, self.first_name)
        }
    }

    /// Every non-empty address on record, primary first.
    pub fn recipients(&self) -> Vec<String> {
        [&self.email, &self.alt_email, &self.secondary_email]
            .into_iter()
            .filter(|e| !e.is_empty())
            .cloned()
            .collect()
    }
}

impl Model {
    /// Looks up the source record and returns its contact details. Dangling
    /// references resolve to the placeholder rather than an error.
    pub async fn resolve(&self, db: &DatabaseConnection) -> AttendeeInfo {
        match self.resolve_source(db).await {
            Ok(Some(info)) => info,
            Ok(None) => {
                tracing::warn!(
                    attendee = self.id,
                    source = self.attendee_id,
                    kind = %self.attendee_type,
                    "attendee source record missing, using placeholder"
                );
                AttendeeInfo::placeholder()
            }
            Err(e) => {
                tracing::warn!(
                    attendee = self.id,
                    error = %e,
                    "attendee resolution failed, using placeholder"
                );
                AttendeeInfo::placeholder()
            }
        }
    }

    async fn resolve_source(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Option<AttendeeInfo>, DbErr> {
        match self.attendee_type {
            AttendeeType::Instructor => {
                let Some(teacher) = super::teacher::Entity::find_by_id(self.attendee_id)
                    .one(db)
                    .await?
                else {
                    return Ok(None);
                };
                let Some(user) = teacher.user(db).await? else {
                    return Ok(None);
                };
                let high_schools = teacher.active_high_school_names(db).await?;
                Ok(Some(AttendeeInfo {
                    first_name: user.first_name,
                    last_name: user.last_name,
                    email: user.email,
                    alt_email: user.alt_email.unwrap_or_default(),
                    secondary_email: user.secondary_email.unwrap_or_default(),
                    emplid: user.emplid.unwrap_or_default(),
                    high_schools,
                }))
            }
            AttendeeType::Faculty => {
                let Some(coordinator) =
                    super::faculty_coordinator::Entity::find_by_id(self.attendee_id)
                        .one(db)
                        .await?
                else {
                    return Ok(None);
                };
                let Some(user) = coordinator.user(db).await? else {
                    return Ok(None);
                };
                Ok(Some(AttendeeInfo {
                    first_name: user.first_name,
                    last_name: user.last_name,
                    email: user.email,
                    emplid: user.emplid.unwrap_or_default(),
                    ..Default::default()
                }))
            }
            AttendeeType::CohortParticipant => {
                let Some(participant) =
                    super::cohort_participant::Entity::find_by_id(self.attendee_id)
                        .one(db)
                        .await?
                else {
                    return Ok(None);
                };
                let Some(user) = participant.user(db).await? else {
                    return Ok(None);
                };
                Ok(Some(AttendeeInfo {
                    first_name: user.first_name,
                    last_name: user.last_name,
                    email: user.email,
                    alt_email: user.secondary_email.unwrap_or_default(),
                    emplid: user.emplid.unwrap_or_default(),
                    ..Default::default()
                }))
            }
            AttendeeType::Highschool => {
                let Some(school) = super::high_school::Entity::find_by_id(self.attendee_id)
                    .one(db)
                    .await?
                else {
                    return Ok(None);
                };
                Ok(Some(AttendeeInfo {
                    first_name: school.name,
                    ..Default::default()
                }))
            }
        }
    }

    /// Public link to this guest's PD credit letter.
    pub fn pd_letter_url(&self) -> String {
        format!("{}/api/letters/{}/pd", config::public_base_url(), self.id)
    }

    /// Registers a guest on an event, seeding PD hours from the event. A
    /// guest already on the event is left untouched and `Ok(None)` returned.
    pub async fn add_to_event(
        db: &DatabaseConnection,
        event: &super::event::Model,
        attendee_type: AttendeeType,
        attendee_id: i64,
        attendance_type: AttendanceType,
    ) -> Result<Option<Model>, DbErr> {
        let existing = Entity::find()
            .filter(Column::EventId.eq(event.id))
            .filter(Column::AttendeeType.eq(attendee_type.clone()))
            .filter(Column::AttendeeId.eq(attendee_id))
            .one(db)
            .await?;
        if existing.is_some() {
            return Ok(None);
        }

        let pd_hour = if attendee_type.is_institution() {
            0.0
        } else {
            event.pd_hour
        };
        let now = Utc::now();
        let model = ActiveModel {
            event_id: Set(event.id),
            attendee_type: Set(attendee_type),
            attendee_id: Set(attendee_id),
            attendance_status: Set(AttendanceStatus::NotRecorded),
            attendance_type: Set(attendance_type),
            pd_hour: Set(pd_hour),
            participants: Set(0),
            note: Set(None),
            pd_letter_sent_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        Ok(Some(model))
    }

    /// Records attendance. Marking a guest not attended zeroes earned hours
    /// and the head count.
    pub async fn set_attendance_status(
        self,
        db: &DatabaseConnection,
        status: AttendanceStatus,
    ) -> Result<Model, DbErr> {
        let mut active: ActiveModel = self.into();
        if status == AttendanceStatus::NotAttended {
            active.pd_hour = Set(0.0);
            active.participants = Set(0);
        }
        active.attendance_status = Set(status);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    /// Flips between required and optional attendance.
    pub async fn toggle_attendance_type(self, db: &DatabaseConnection) -> Result<Model, DbErr> {
        let next = match self.attendance_type {
            AttendanceType::Required => AttendanceType::Optional,
            AttendanceType::Optional => AttendanceType::Required,
        };
        let mut active: ActiveModel = self.into();
        active.attendance_type = Set(next);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    /// Stamps the time a PD letter was emailed to this guest.
    pub async fn stamp_letter_sent(self, db: &DatabaseConnection) -> Result<Model, DbErr> {
        let mut active: ActiveModel = self.into();
        active.pd_letter_sent_at = Set(Some(Utc::now()));
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_has_dash_names_and_no_recipients() {
        let info = AttendeeInfo::placeholder();
        assert_eq!(info.display_name(), "-, -");
        assert!(info.recipients().is_empty());
    }

    #[test]
    fn recipients_skip_empty_addresses() {
        let info = AttendeeInfo {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            alt_email: String::new(),
            secondary_email: "ada2@example.com".into(),
            ..Default::default()
        };
        assert_eq!(
            info.recipients(),
            vec!["ada@example.com".to_string(), "ada2@example.com".to_string()]
        );
        assert_eq!(info.display_name(), "Lovelace, Ada");
    }

    #[test]
    fn institution_display_name_is_bare() {
        let info = AttendeeInfo {
            first_name: "Central High".into(),
            ..Default::default()
        };
        assert_eq!(info.display_name(), "Central High");
    }

    #[test]
    fn attendee_type_strings_round_trip() {
        use std::str::FromStr;
        assert_eq!(AttendeeType::CohortParticipant.to_string(), "cohort_participant");
        assert_eq!(
            AttendeeType::from_str("highschool").unwrap(),
            AttendeeType::Highschool
        );
        assert_eq!(AttendanceStatus::NotRecorded.to_string(), "N/A");
        assert_eq!(AttendanceStatus::NotAttended.to_string(), "not attended");
    }
}
