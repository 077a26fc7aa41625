use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

/// High-school instructor. The person behind `AttendeeType::Instructor`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::teacher_high_school::Entity")]
    HighSchoolLinks,
    #[sea_orm(has_many = "super::teacher_course_certificate::Entity")]
    Certificates,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Fetch the linked user row, if it still exists.
    pub async fn user(&self, db: &DatabaseConnection) -> Result<Option<super::user::Model>, DbErr> {
        super::user::Entity::find_by_id(self.user_id).one(db).await
    }

    /// Comma-joined names of the high schools this teacher is actively
    /// placed at, name-sorted. Empty string when there are none.
    pub async fn active_high_school_names(&self, db: &DatabaseConnection) -> Result<String, DbErr> {
        let links = super::teacher_high_school::Entity::find()
            .filter(super::teacher_high_school::Column::TeacherId.eq(self.id))
            .filter(super::teacher_high_school::Column::Status.eq("active"))
            .all(db)
            .await?;

        let ids: Vec<i64> = links.iter().map(|l| l.high_school_id).collect();
        if ids.is_empty() {
            return Ok(String::new());
        }

        let schools = super::high_school::Entity::find()
            .filter(super::high_school::Column::Id.is_in(ids))
            .order_by_asc(super::high_school::Column::Name)
            .all(db)
            .await?;

        Ok(schools
            .into_iter()
            .map(|s| s.name)
            .collect::<Vec<_>>()
            .join(", "))
    }
}
