use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create courses table
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Courses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Courses::AcademicYear).string().not_null())
                    .col(ColumnDef::new(Courses::CourseCode).string().not_null())
                    .col(ColumnDef::new(Courses::CourseName).string().not_null())
                    .col(ColumnDef::new(Courses::Credits).float().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Courses::FeePerCredit)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Courses::InstructorName).string())
                    .col(ColumnDef::new(Courses::MaxStudents).integer())
                    .col(
                        ColumnDef::new(Courses::IsOpenForRegistration)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Courses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Courses::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Create course_time_slots table
        manager
            .create_table(
                Table::create()
                    .table(CourseTimeSlots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseTimeSlots::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourseTimeSlots::CourseId).uuid().not_null())
                    .col(ColumnDef::new(CourseTimeSlots::Position).integer().not_null())
                    .col(ColumnDef::new(CourseTimeSlots::WeekNumber).integer())
                    .col(
                        ColumnDef::new(CourseTimeSlots::DayOfWeek)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CourseTimeSlots::Period).string().not_null())
                    .col(ColumnDef::new(CourseTimeSlots::StartTime).string().not_null())
                    .col(ColumnDef::new(CourseTimeSlots::EndTime).string().not_null())
                    .col(ColumnDef::new(CourseTimeSlots::Location).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-course_time_slots-course_id")
                            .from(CourseTimeSlots::Table, CourseTimeSlots::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create enrollments table
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enrollments::StudentId).string().not_null())
                    .col(ColumnDef::new(Enrollments::CourseId).uuid().not_null())
                    .col(ColumnDef::new(Enrollments::AcademicYear).string().not_null())
                    .col(ColumnDef::new(Enrollments::Status).string().not_null())
                    .col(ColumnDef::new(Enrollments::PaymentStatus).string().not_null())
                    .col(
                        ColumnDef::new(Enrollments::EnrolledAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-course_id")
                            .from(Enrollments::Table, Enrollments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create academic_year_settings table
        manager
            .create_table(
                Table::create()
                    .table(AcademicYearSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AcademicYearSettings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AcademicYearSettings::AcademicYear)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AcademicYearSettings::RegistrationStart).timestamp_with_time_zone())
                    .col(ColumnDef::new(AcademicYearSettings::RegistrationEnd).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(AcademicYearSettings::SetAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AcademicYearSettings::SetBy).string())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(AcademicYearSettings::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CourseTimeSlots::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
pub(crate) enum Courses {
    Table,
    Id,
    AcademicYear,
    CourseCode,
    CourseName,
    Credits,
    FeePerCredit,
    InstructorName,
    MaxStudents,
    IsOpenForRegistration,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum CourseTimeSlots {
    Table,
    Id,
    CourseId,
    Position,
    WeekNumber,
    DayOfWeek,
    Period,
    StartTime,
    EndTime,
    Location,
}

#[derive(Iden)]
pub(crate) enum Enrollments {
    Table,
    Id,
    StudentId,
    CourseId,
    AcademicYear,
    Status,
    PaymentStatus,
    EnrolledAt,
}

#[derive(Iden)]
pub(crate) enum AcademicYearSettings {
    Table,
    Id,
    AcademicYear,
    RegistrationStart,
    RegistrationEnd,
    SetAt,
    SetBy,
}
