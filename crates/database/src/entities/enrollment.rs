use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A student's registration for a course in a term.
/// `(student_id, course_id, academic_year)` is unique.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: String, // subject identifier from the identity provider
    pub course_id: Uuid,
    pub academic_year: String,
    pub status: String, // models::enrollment::EnrollmentStatus
    pub payment_status: String, // models::enrollment::PaymentStatus
    pub enrolled_at: DateTimeUtc,
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
