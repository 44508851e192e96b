use crate::dtos::course::CourseResponse;
use database::registration::Enrolled;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Self-service registration; the student is taken from the access token
#[derive(Debug, Deserialize, ToSchema)]
pub struct EnrollmentBody {
    pub course_id: Uuid,
}

/// On-site registration of a student by staff
#[derive(Debug, Deserialize, ToSchema)]
pub struct ManualEnrollmentBody {
    pub student_id: String,
    pub course_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentResponse {
    pub enrollment_id: Uuid,
    pub student_id: String,
    pub academic_year: String,
    pub course: CourseResponse,
}

impl EnrollmentResponse {
    pub fn new(student_id: String, course_id: Uuid, enrolled: Enrolled) -> Self {
        Self {
            enrollment_id: enrolled.enrollment_id,
            student_id,
            academic_year: enrolled.term,
            course: CourseResponse::new(course_id, enrolled.course),
        }
    }
}
