use crate::{
    dtos::enrollment::{EnrollmentBody, EnrollmentResponse, ManualEnrollmentBody},
    error::ApiError,
    routes::auth::{AccessClaims, require_staff, subject},
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use database::{
    registration::{EnrollmentMode, EnrollmentRequest, RegistrationError},
    services::{academic_year::AcademicYearService, enrollment::EnrollmentService},
};
use importer::enrollments_to_csv;
use log::info;

/// Register the signed-in student for a course
#[utoipa::path(
    post,
    path = "/enrollments",
    request_body = EnrollmentBody,
    responses(
        (status = 201, description = "Registered", body = EnrollmentResponse),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Registration is closed or the course is not open"),
        (status = 404, description = "Course not found"),
        (status = 409, description = "The course conflicts with the student's schedule"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Enrollments"
)]
pub async fn enroll(
    State(state): State<AppState>,
    claims: Extension<AccessClaims>,
    Json(body): Json<EnrollmentBody>,
) -> Result<(StatusCode, Json<EnrollmentResponse>), ApiError> {
    let student_id = subject(&claims)?;
    let request = EnrollmentRequest {
        student_id: student_id.clone(),
        course_id: body.course_id,
        mode: EnrollmentMode::SelfService,
    };

    let enrolled = state.registrar.enroll(&state.db, request, Utc::now()).await?;
    Ok((
        StatusCode::CREATED,
        Json(EnrollmentResponse::new(student_id, body.course_id, enrolled)),
    ))
}

/// Register a student on-site; the registration window does not apply
#[utoipa::path(
    post,
    path = "/enrollments/manual",
    request_body = ManualEnrollmentBody,
    responses(
        (status = 201, description = "Registered", body = EnrollmentResponse),
        (status = 400, description = "Blank student ID"),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Caller is not staff, no current term, or the course is not open"),
        (status = 404, description = "Course not found"),
        (status = 409, description = "The course conflicts with the student's schedule"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Enrollments"
)]
pub async fn enroll_manual(
    State(state): State<AppState>,
    claims: Extension<AccessClaims>,
    Json(body): Json<ManualEnrollmentBody>,
) -> Result<(StatusCode, Json<EnrollmentResponse>), ApiError> {
    let staff = require_staff(&claims, &state.staff_roles)?;
    let student_id = body.student_id.trim().to_string();
    if student_id.is_empty() {
        return Err(ApiError::BadRequest("student_id must not be blank".to_string()));
    }

    let request = EnrollmentRequest {
        student_id: student_id.clone(),
        course_id: body.course_id,
        mode: EnrollmentMode::Manual,
    };

    let enrolled = state.registrar.enroll(&state.db, request, Utc::now()).await?;
    info!(
        "{staff} registered {student_id} on-site for {}",
        enrolled.course.course_code
    );

    Ok((
        StatusCode::CREATED,
        Json(EnrollmentResponse::new(student_id, body.course_id, enrolled)),
    ))
}

/// Download all enrollments of the current term as CSV
#[utoipa::path(
    get,
    path = "/enrollments/export",
    responses(
        (status = 200, description = "Enrollment CSV", content_type = "text/csv", body = String),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Caller is not staff or no current term has been configured"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Enrollments"
)]
pub async fn export_enrollments(
    State(state): State<AppState>,
    claims: Extension<AccessClaims>,
) -> Result<impl IntoResponse, ApiError> {
    let staff = require_staff(&claims, &state.staff_roles)?;
    let setting = AcademicYearService::current(&state.db)
        .await?
        .ok_or(RegistrationError::NoCurrentTerm)?;

    let records = EnrollmentService::enrollment_records(&state.db, &setting.academic_year).await?;
    let csv = enrollments_to_csv(&records, state.utc_offset)?;
    info!(
        "{staff} exported {} enrollments for {}",
        records.len(),
        setting.academic_year
    );

    let disposition = format!(
        "attachment; filename=\"enrollments-{}.csv\"",
        setting.academic_year
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
