use crate::{entities::enrollment, services::course::CourseService};
use chrono::{DateTime, Utc};
use models::{
    Course,
    enrollment::{EnrollmentStatus, PaymentStatus},
};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use std::{collections::HashMap, str::FromStr};
use uuid::Uuid;

/// An enrollment about to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewEnrollment {
    pub student_id: String,
    pub course_id: Uuid,
    pub academic_year: String,
    pub status: EnrollmentStatus,
    pub payment_status: PaymentStatus,
}

/// An enrollment together with the course it refers to
#[derive(Debug, Clone)]
pub struct EnrollmentRecord {
    pub id: Uuid,
    pub student_id: String,
    pub course: Course,
    pub status: EnrollmentStatus,
    pub payment_status: PaymentStatus,
    pub enrolled_at: DateTime<Utc>,
}

pub struct EnrollmentService;

impl EnrollmentService {
    /// Courses the student actively holds in `term`, with their time slots
    pub async fn active_courses_for_student(
        db: &DatabaseConnection,
        student_id: &str,
        term: &str,
    ) -> Result<Vec<Course>, DbErr> {
        let active_statuses: Vec<String> = EnrollmentStatus::active()
            .iter()
            .map(|status| status.to_string())
            .collect();

        let course_ids: Vec<Uuid> = enrollment::Entity::find()
            .select_only()
            .column(enrollment::Column::CourseId)
            .filter(enrollment::Column::StudentId.eq(student_id))
            .filter(enrollment::Column::AcademicYear.eq(term))
            .filter(enrollment::Column::Status.is_in(active_statuses))
            .into_tuple()
            .all(db)
            .await?;

        let courses = CourseService::get_courses_by_ids(db, course_ids).await?;
        Ok(courses.into_iter().map(|(_, course)| course).collect())
    }

    /// Insert an enrollment. A second row for the same student, course and
    /// term is rejected by the unique index with a constraint violation.
    pub async fn insert_enrollment(
        db: &DatabaseConnection,
        new_enrollment: NewEnrollment,
    ) -> Result<Uuid, DbErr> {
        let id = Uuid::new_v4();

        enrollment::Entity::insert(enrollment::ActiveModel {
            id: Set(id),
            student_id: Set(new_enrollment.student_id),
            course_id: Set(new_enrollment.course_id),
            academic_year: Set(new_enrollment.academic_year),
            status: Set(new_enrollment.status.to_string()),
            payment_status: Set(new_enrollment.payment_status.to_string()),
            enrolled_at: Set(Utc::now()),
        })
        .exec(db)
        .await?;

        Ok(id)
    }

    /// All enrollments of `term` with their courses, ordered by student then time
    pub async fn enrollment_records(
        db: &DatabaseConnection,
        term: &str,
    ) -> Result<Vec<EnrollmentRecord>, DbErr> {
        let models = enrollment::Entity::find()
            .filter(enrollment::Column::AcademicYear.eq(term))
            .order_by_asc(enrollment::Column::StudentId)
            .order_by_asc(enrollment::Column::EnrolledAt)
            .all(db)
            .await?;

        let mut course_ids: Vec<Uuid> = models.iter().map(|model| model.course_id).collect();
        course_ids.sort_unstable();
        course_ids.dedup();

        let courses: HashMap<Uuid, Course> = CourseService::get_courses_by_ids(db, course_ids)
            .await?
            .into_iter()
            .collect();

        models
            .into_iter()
            .filter_map(|model| {
                let course = courses.get(&model.course_id)?.clone();
                Some(record_from_model(model, course))
            })
            .collect()
    }
}

fn record_from_model(model: enrollment::Model, course: Course) -> Result<EnrollmentRecord, DbErr> {
    let status = EnrollmentStatus::from_str(&model.status)
        .map_err(|_| DbErr::Type(format!("Unknown enrollment status '{}'", model.status)))?;
    let payment_status = PaymentStatus::from_str(&model.payment_status).map_err(|_| {
        DbErr::Type(format!("Unknown payment status '{}'", model.payment_status))
    })?;

    Ok(EnrollmentRecord {
        id: model.id,
        student_id: model.student_id,
        course,
        status,
        payment_status,
        enrolled_at: model.enrolled_at,
    })
}
