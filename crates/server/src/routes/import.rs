use crate::{
    dtos::import::{ImportQueryParams, ImportReportResponse},
    error::ApiError,
    routes::auth::{AccessClaims, require_staff},
    state::AppState,
};
use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Query, State},
};
use database::services::academic_year::AcademicYearService;
use importer::{parse_courses, save_courses};
use log::info;

/// Import courses from a CSV body, one row per time slot
#[utoipa::path(
    post,
    path = "/courses/import",
    params(ImportQueryParams),
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Import finished; rejected rows are listed in the report", body = ImportReportResponse),
        (status = 400, description = "The CSV header is unreadable or lacks required columns"),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Caller is not a course manager or administrator"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Courses"
)]
pub async fn import_courses(
    State(state): State<AppState>,
    claims: Extension<AccessClaims>,
    Query(params): Query<ImportQueryParams>,
    body: Bytes,
) -> Result<Json<ImportReportResponse>, ApiError> {
    let staff = require_staff(&claims, &state.staff_roles)?;
    let default_term = match params.default_term.filter(|term| !term.trim().is_empty()) {
        Some(term) => term,
        None => AcademicYearService::current(&state.db)
            .await?
            .map(|setting| setting.academic_year)
            .unwrap_or_default(),
    };

    let batch = parse_courses(&body, &default_term)?;
    let report = save_courses(&state.db, batch).await;
    info!("{staff} imported courses for default term '{default_term}'");
    Ok(Json(report.into()))
}
