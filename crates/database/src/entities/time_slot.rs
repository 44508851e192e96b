use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A weekly meeting time of a course, kept in entry order by `position`
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course_time_slots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub course_id: Uuid,
    pub position: i32,
    pub week_number: Option<i32>,
    pub day_of_week: i16, // 1 = Monday .. 7 = Sunday
    pub period: String, // "D1".."D9" or "DN"
    pub start_time: String, // HH:MM
    pub end_time: String, // HH:MM
    pub location: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
