use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use std::fs;
use std::path::PathBuf;
use util::paths;

/// An uploaded attachment for an event (agendas, slides, sign-in scans).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "event_files")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Foreign key reference to an event.
    pub event_id: i64,

    /// Original file name as uploaded.
    pub filename: String,

    /// Relative path to the stored file from the storage root.
    pub path: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
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

impl Model {
    /// Persists the bytes under the event's storage directory, keyed by the
    /// inserted row id so uploads with the same name never collide.
    pub async fn save_file(
        db: &DatabaseConnection,
        event_id: i64,
        filename: &str,
        bytes: &[u8],
    ) -> Result<Self, DbErr> {
        let now = Utc::now();

        let partial = ActiveModel {
            event_id: Set(event_id),
            filename: Set(filename.to_string()),
            path: Set("".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted: Model = partial.insert(db).await?;

        let ext = PathBuf::from(filename)
            .extension()
            .map(|e| e.to_string_lossy().to_string());

        let stored_filename = match ext {
            Some(ext) => format!("{}.{}", inserted.id, ext),
            None => inserted.id.to_string(),
        };

        let dir_path = paths::event_files_dir(event_id);
        fs::create_dir_all(&dir_path)
            .map_err(|e| DbErr::Custom(format!("Failed to create directory: {}", e)))?;

        let file_path = dir_path.join(&stored_filename);
        let relative_path = file_path
            .strip_prefix(paths::storage_root())
            .map_err(|e| DbErr::Custom(format!("Failed to relativize path: {}", e)))?
            .to_string_lossy()
            .to_string();

        fs::write(&file_path, bytes)
            .map_err(|e| DbErr::Custom(format!("Failed to write file: {}", e)))?;

        let mut model: ActiveModel = inserted.into();
        model.path = Set(relative_path);
        model.updated_at = Set(Utc::now());

        model.update(db).await
    }

    pub fn full_path(&self) -> PathBuf {
        paths::storage_root().join(&self.path)
    }

    /// Load file content from disk.
    pub fn load_file(&self) -> Result<Vec<u8>, std::io::Error> {
        fs::read(self.full_path())
    }

    /// Delete the file from disk (but not the DB record).
    pub fn delete_file_only(&self) -> Result<(), std::io::Error> {
        fs::remove_file(self.full_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{event, event_type, term, user};
    use crate::test_utils::setup_test_db;
    use chrono::Utc;
    use sea_orm::Set;
    use serial_test::serial;
    use util::test_helpers::setup_test_storage_root;

    async fn seed_event(db: &DatabaseConnection) -> event::Model {
        let now = Utc::now();
        let creator = user::ActiveModel {
            username: Set("coord".to_string()),
            email: Set("coord@example.com".to_string()),
            first_name: Set("Pat".to_string()),
            last_name: Set("Coordinator".to_string()),
            admin: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("insert user");
        let term = term::ActiveModel {
            code: Set("2263".to_string()),
            name: Set("Fall 2026".to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("insert term");
        let kind = event_type::ActiveModel {
            name: Set("Workshop".to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("insert event type");
        event::ActiveModel {
            name: Set(Some("Summer Workshop".to_string())),
            start_time: Set(now),
            end_time: Set(now),
            event_type_id: Set(kind.id),
            term_id: Set(term.id),
            created_by: Set(creator.id),
            pd_hour: Set(2.0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("insert event")
    }

    #[tokio::test]
    #[serial]
    async fn test_save_load_and_delete_file() {
        let _storage = setup_test_storage_root();
        let db = setup_test_db().await;
        let event = seed_event(&db).await;

        let content = b"agenda contents".to_vec();
        let saved = Model::save_file(&db, event.id, "agenda.pdf", &content)
            .await
            .expect("save file");

        assert_eq!(saved.event_id, event.id);
        assert_eq!(saved.filename, "agenda.pdf");
        assert!(saved.path.ends_with(&format!("{}.pdf", saved.id)));
        assert!(saved.full_path().exists());

        let bytes = saved.load_file().unwrap();
        assert_eq!(bytes, content);

        saved.delete_file_only().unwrap();
        assert!(!saved.full_path().exists());
    }
}
