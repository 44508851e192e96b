use crate::{
    dtos::course::{CourseQueryParams, CourseResponse},
    error::ApiError,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use database::{
    registration::RegistrationError,
    services::{academic_year::AcademicYearService, course::CourseService},
};
use uuid::Uuid;

/// List the courses open for registration in the current term
#[utoipa::path(
    get,
    path = "/courses",
    params(CourseQueryParams),
    responses(
        (status = 200, description = "Open courses of the current term", body = Vec<CourseResponse>),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "No current term has been configured"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Courses"
)]
pub async fn get_courses(
    State(state): State<AppState>,
    Query(params): Query<CourseQueryParams>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let setting = AcademicYearService::current(&state.db)
        .await?
        .ok_or(RegistrationError::NoCurrentTerm)?;

    let courses =
        CourseService::get_open_courses(&state.db, &setting.academic_year, params.search.as_deref())
            .await?;

    Ok(Json(
        courses
            .into_iter()
            .map(|(id, course)| CourseResponse::new(id, course))
            .collect(),
    ))
}

/// Get a specific course by ID
#[utoipa::path(
    get,
    path = "/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course found", body = CourseResponse),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Courses"
)]
pub async fn get_course_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseResponse>, ApiError> {
    match CourseService::get_course_by_id(&state.db, id).await? {
        Some(course) => Ok(Json(CourseResponse::new(id, course))),
        None => Err(ApiError::NotFound(format!("Course {id} was not found"))),
    }
}
