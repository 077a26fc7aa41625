use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use util::paths;

/// One requested report export. The generated CSV lives on disk under
/// `reports/{year}/{run id}/` so old runs stay downloadable.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "report_runs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Report kind, e.g. "pd_events" or "attendance".
    pub report: String,
    pub requested_by: i64,
    /// Serialized filter parameters the run was produced with.
    #[sea_orm(column_type = "Json")]
    pub params: Json,
    pub filename: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RequestedBy",
        to = "super::user::Column::Id"
    )]
    Requester,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        report: &str,
        requested_by: i64,
        params: Json,
    ) -> Result<Self, DbErr> {
        ActiveModel {
            report: Set(report.to_string()),
            requested_by: Set(requested_by),
            params: Set(params),
            filename: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub fn year(&self) -> i32 {
        use chrono::Datelike;
        self.created_at.year()
    }

    /// Directory the run's output files live in.
    pub fn output_dir(&self) -> std::path::PathBuf {
        paths::report_dir(self.year(), self.id)
    }

    pub fn output_path(&self, filename: &str) -> std::path::PathBuf {
        paths::report_path(self.year(), self.id, filename)
    }

    /// Records the generated file name once the CSV has been written.
    pub async fn set_filename(self, db: &DatabaseConnection, filename: &str) -> Result<Model, DbErr> {
        let mut active: ActiveModel = self.into();
        active.filename = Set(Some(filename.to_string()));
        active.update(db).await
    }
}
