use sea_orm::entity::prelude::*;

/// Placement link between a teacher and a high school.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "teacher_high_schools")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_id: i64,
    pub high_school_id: i64,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::TeacherId",
        to = "super::teacher::Column::Id"
    )]
    Teacher,
    #[sea_orm(
        belongs_to = "super::high_school::Entity",
        from = "Column::HighSchoolId",
        to = "super::high_school::Column::Id"
    )]
    HighSchool,
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::high_school::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HighSchool.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
