//! Enrollment workflow shared by self-service and on-site registration.
//!
//! The workflow loads the candidate course and the student's active courses,
//! runs the conflict checker, and inserts the enrollment. The unique index on
//! `(student_id, course_id, academic_year)` closes the window between the check
//! and the insert: a violation is reported like any other conflict.

use crate::{
    db::is_unique_violation,
    services::{
        academic_year::AcademicYearService,
        course::CourseService,
        enrollment::{EnrollmentService, NewEnrollment},
    },
};
use chrono::{DateTime, FixedOffset, Utc};
use log::{info, warn};
use models::{
    ConflictReason, Course,
    academic_year::AcademicYearSetting,
    enrollment::{EnrollmentStatus, PaymentStatus},
    find_conflict,
};
use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;
use std::future::Future;
use thiserror::Error;
use uuid::Uuid;

/// Errors from inserting an enrollment
#[derive(Debug, Error)]
pub enum InsertError {
    /// The student already has this course in this term
    #[error("duplicate enrollment")]
    Duplicate,
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Storage the enrollment workflow reads from and writes to
pub trait EnrollmentStore {
    /// The term the system currently operates on
    fn current_setting(&self) -> impl Future<Output = Result<Option<AcademicYearSetting>, DbErr>> + Send;

    fn find_course(&self, course_id: Uuid) -> impl Future<Output = Result<Option<Course>, DbErr>> + Send;

    /// Courses with an active enrollment for the student in `term`
    fn active_courses(
        &self,
        student_id: &str,
        term: &str,
    ) -> impl Future<Output = Result<Vec<Course>, DbErr>> + Send;

    /// Atomically insert the enrollment, reporting [`InsertError::Duplicate`]
    /// when the (student, course, term) uniqueness rule rejects it
    fn insert_enrollment(
        &self,
        enrollment: NewEnrollment,
    ) -> impl Future<Output = Result<Uuid, InsertError>> + Send;
}

impl EnrollmentStore for DatabaseConnection {
    async fn current_setting(&self) -> Result<Option<AcademicYearSetting>, DbErr> {
        AcademicYearService::current(self).await
    }

    async fn find_course(&self, course_id: Uuid) -> Result<Option<Course>, DbErr> {
        CourseService::get_course_by_id(self, course_id).await
    }

    async fn active_courses(&self, student_id: &str, term: &str) -> Result<Vec<Course>, DbErr> {
        EnrollmentService::active_courses_for_student(self, student_id, term).await
    }

    async fn insert_enrollment(&self, enrollment: NewEnrollment) -> Result<Uuid, InsertError> {
        EnrollmentService::insert_enrollment(self, enrollment)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    InsertError::Duplicate
                } else {
                    InsertError::Database(err)
                }
            })
    }
}

/// Who is registering the student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentMode {
    /// The student registers themselves; the registration window applies
    SelfService,
    /// Staff register a student on-site; the registration window is bypassed
    Manual,
}

#[derive(Debug, Clone)]
pub struct EnrollmentRequest {
    pub student_id: String,
    pub course_id: Uuid,
    pub mode: EnrollmentMode,
}

/// A successful registration
#[derive(Debug, Clone)]
pub struct Enrolled {
    pub enrollment_id: Uuid,
    pub term: String,
    pub course: Course,
}

/// Why a registration was refused. The messages are meant for end users.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("The current academic term has not been configured. Please contact the course office.")]
    NoCurrentTerm,

    #[error("{0}")]
    RegistrationClosed(String),

    #[error("Course {0} was not found")]
    CourseNotFound(Uuid),

    #[error("Course {course} is not open for registration in term {term}")]
    CourseUnavailable { course: String, term: String },

    #[error("{0}")]
    Conflict(ConflictReason),

    #[error("You already have a conflicting or duplicate registration for {course}")]
    AlreadyRegistered { course: String },

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RegistrationError {
    /// Conflicts found by the checker and duplicates caught at insert time
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::AlreadyRegistered { .. })
    }
}

impl From<InsertError> for RegistrationError {
    fn from(err: InsertError) -> Self {
        match err {
            // Callers map duplicates with the course name; this is the fallback
            InsertError::Duplicate => Self::AlreadyRegistered {
                course: "this course".to_string(),
            },
            InsertError::Database(err) => Self::Database(err),
        }
    }
}

/// Runs enrollment attempts against an [`EnrollmentStore`]
#[derive(Debug, Clone, Copy)]
pub struct Registrar {
    /// Offset used to show registration window times to users
    display_offset: FixedOffset,
}

impl Registrar {
    pub fn new(display_offset: FixedOffset) -> Self {
        Self { display_offset }
    }

    /// Registers a student for a course in the current term.
    ///
    /// # Arguments
    /// * `store` - Where courses, enrollments and the current term live
    /// * `request` - Student, course and whether this is self-service
    /// * `now` - Time used to evaluate the registration window
    ///
    /// # Returns
    /// The new enrollment, or the reason it was refused
    pub async fn enroll<S: EnrollmentStore>(
        &self,
        store: &S,
        request: EnrollmentRequest,
        now: DateTime<Utc>,
    ) -> Result<Enrolled, RegistrationError> {
        let setting = store
            .current_setting()
            .await?
            .ok_or(RegistrationError::NoCurrentTerm)?;
        let term = setting.academic_year.clone();

        if request.mode == EnrollmentMode::SelfService && !setting.status(now).is_open() {
            let message = setting.window.message(now, self.display_offset);
            warn!(
                "Rejected self-service enrollment of {} outside the registration window",
                request.student_id
            );
            return Err(RegistrationError::RegistrationClosed(message));
        }

        let (candidate, enrolled) = futures::try_join!(
            store.find_course(request.course_id),
            store.active_courses(&request.student_id, &term),
        )?;

        let course = candidate.ok_or(RegistrationError::CourseNotFound(request.course_id))?;
        if !course.is_open_for_registration {
            return Err(RegistrationError::CourseUnavailable {
                course: course.to_string(),
                term,
            });
        }

        // Wrong-term candidates are reported by the checker with both terms named
        if let Some(reason) = find_conflict(&course, &enrolled, &term) {
            warn!(
                "Rejected enrollment of {} in {}: {reason}",
                request.student_id, course.course_code
            );
            return Err(RegistrationError::Conflict(reason));
        }

        let new_enrollment = NewEnrollment {
            student_id: request.student_id.clone(),
            course_id: request.course_id,
            academic_year: term.clone(),
            status: EnrollmentStatus::Success,
            payment_status: PaymentStatus::AwaitingPayment,
        };

        let enrollment_id = match store.insert_enrollment(new_enrollment).await {
            Ok(id) => id,
            Err(InsertError::Duplicate) => {
                warn!(
                    "Duplicate enrollment of {} in {} caught at insert",
                    request.student_id, course.course_code
                );
                return Err(RegistrationError::AlreadyRegistered {
                    course: course.to_string(),
                });
            }
            Err(err) => return Err(err.into()),
        };

        info!(
            "Enrolled {} in {} for {term} ({:?})",
            request.student_id, course.course_code, request.mode
        );

        Ok(Enrolled {
            enrollment_id,
            term,
            course,
        })
    }
}
