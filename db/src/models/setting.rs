use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Key under which the PD notification settings document is stored.
pub const PD_EVENT_KEY: &str = "pd_event";

/// Keyed JSON settings document.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub key: String,
    #[sea_orm(column_type = "Json")]
    pub value: Json,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Subjects and HTML templates used by PD notifications and letters.
/// Templates use `{{ placeholder }}` substitution; unknown placeholders
/// pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdSettings {
    #[serde(default)]
    pub event_reminder_subject: String,
    #[serde(default)]
    pub event_reminder_template: String,
    #[serde(default)]
    pub event_signin_template: String,
    #[serde(default)]
    pub pd_template: String,
    #[serde(default)]
    pub pd_email_subject: String,
    #[serde(default)]
    pub pd_email_template: String,
}

impl PdSettings {
    /// Loads the stored document, defaulting each missing field to empty.
    pub async fn from_db(db: &DatabaseConnection) -> Result<Self, DbErr> {
        let row = Entity::find()
            .filter(Column::Key.eq(PD_EVENT_KEY))
            .one(db)
            .await?;
        match row {
            Some(row) => serde_json::from_value(row.value)
                .map_err(|e| DbErr::Custom(format!("Malformed pd_event settings: {}", e))),
            None => Ok(PdSettings::default()),
        }
    }

    /// Upserts the document under [`PD_EVENT_KEY`].
    pub async fn save(&self, db: &DatabaseConnection) -> Result<Model, DbErr> {
        let value = serde_json::to_value(self)
            .map_err(|e| DbErr::Custom(format!("Failed to serialize pd_event settings: {}", e)))?;
        let existing = Entity::find()
            .filter(Column::Key.eq(PD_EVENT_KEY))
            .one(db)
            .await?;
        match existing {
            Some(row) => {
                let mut active: ActiveModel = row.into();
                active.value = Set(value);
                active.updated_at = Set(Utc::now());
                active.update(db).await
            }
            None => {
                ActiveModel {
                    key: Set(PD_EVENT_KEY.to_string()),
                    value: Set(value),
                    updated_at: Set(Utc::now()),
                    ..Default::default()
                }
                .insert(db)
                .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn missing_document_defaults_to_empty() {
        let db = setup_test_db().await;
        let settings = PdSettings::from_db(&db).await.unwrap();
        assert_eq!(settings, PdSettings::default());
    }

    #[tokio::test]
    async fn save_then_load_round_trips_and_upserts() {
        let db = setup_test_db().await;
        let mut settings = PdSettings {
            pd_email_subject: "Your PD letter".to_string(),
            pd_template: "<p>Dear {{ first_name }}</p>".to_string(),
            ..Default::default()
        };
        settings.save(&db).await.unwrap();

        settings.pd_email_subject = "Updated subject".to_string();
        settings.save(&db).await.unwrap();

        let loaded = PdSettings::from_db(&db).await.unwrap();
        assert_eq!(loaded.pd_email_subject, "Updated subject");
        assert_eq!(loaded.pd_template, "<p>Dear {{ first_name }}</p>");

        let rows = Entity::find().all(&db).await.unwrap();
        assert_eq!(rows.len(), 1);
    }
}
