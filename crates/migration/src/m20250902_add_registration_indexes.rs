use crate::m20250901_create_registration_tables::{
    AcademicYearSettings, CourseTimeSlots, Courses, Enrollments,
};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // A course code appears once per term
        manager
            .create_index(
                Index::create()
                    .name("idx_courses_academic_year_course_code")
                    .table(Courses::Table)
                    .col(Courses::AcademicYear)
                    .col(Courses::CourseCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // A student holds a course at most once per term; concurrent
        // registrations that both pass the conflict check fail here
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_student_course_year")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::CourseId)
                    .col(Enrollments::AcademicYear)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Active-enrollment lookups filter by student and term
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_student_year")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::AcademicYear)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_course_time_slots_course_id")
                    .table(CourseTimeSlots::Table)
                    .col(CourseTimeSlots::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_academic_year_settings_set_at")
                    .table(AcademicYearSettings::Table)
                    .col(AcademicYearSettings::SetAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table) in [
            ("idx_academic_year_settings_set_at", AcademicYearSettings::Table.into_iden()),
            ("idx_course_time_slots_course_id", CourseTimeSlots::Table.into_iden()),
            ("idx_enrollments_student_year", Enrollments::Table.into_iden()),
            ("idx_enrollments_student_course_year", Enrollments::Table.into_iden()),
            ("idx_courses_academic_year_course_code", Courses::Table.into_iden()),
        ] {
            manager
                .drop_index(Index::drop().name(name).table(table).to_owned())
                .await?;
        }

        Ok(())
    }
}
