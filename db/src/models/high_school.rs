use sea_orm::entity::prelude::*;

/// Partner high school. Can attend an event as an institution; it has no
/// person or email behind it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "high_schools")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::teacher_high_school::Entity")]
    TeacherLinks,
}

impl ActiveModelBehavior for ActiveModel {}
