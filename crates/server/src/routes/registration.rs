use crate::{
    dtos::registration::{RegistrationResponse, SetRegistrationBody},
    error::ApiError,
    routes::auth::{AccessClaims, require_staff},
    state::AppState,
};
use axum::{Extension, Json, extract::State};
use chrono::Utc;
use database::{registration::RegistrationError, services::academic_year::AcademicYearService};
use log::info;
use models::academic_year::{AcademicYearSetting, RegistrationWindow};

fn describe(setting: AcademicYearSetting, state: &AppState) -> RegistrationResponse {
    let now = Utc::now();
    let status = setting.status(now);
    let message = setting.window.message(now, state.utc_offset);
    RegistrationResponse::new(setting, status, message)
}

/// Get the current term and whether self-service registration is open
#[utoipa::path(
    get,
    path = "/registration",
    responses(
        (status = 200, description = "Current registration state", body = RegistrationResponse),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Registration"
)]
pub async fn get_registration(
    State(state): State<AppState>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    let response = match AcademicYearService::current(&state.db).await? {
        Some(setting) => describe(setting, &state),
        None => RegistrationResponse::unavailable(RegistrationError::NoCurrentTerm.to_string()),
    };

    Ok(Json(response))
}

/// Set the current term and its registration window
#[utoipa::path(
    put,
    path = "/registration",
    request_body = SetRegistrationBody,
    responses(
        (status = 200, description = "Current term updated", body = RegistrationResponse),
        (status = 400, description = "Blank term or window ending before it starts"),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Caller is not a course manager or administrator"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Registration"
)]
pub async fn set_registration(
    State(state): State<AppState>,
    claims: Extension<AccessClaims>,
    Json(body): Json<SetRegistrationBody>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    let staff = require_staff(&claims, &state.staff_roles)?;
    let academic_year = body.academic_year.trim();
    if academic_year.is_empty() {
        return Err(ApiError::BadRequest("academic_year must not be blank".to_string()));
    }

    if let (Some(start), Some(end)) = (body.registration_start, body.registration_end)
        && start > end
    {
        return Err(ApiError::BadRequest(
            "registration_start must not be after registration_end".to_string(),
        ));
    }

    let window = RegistrationWindow::new(body.registration_start, body.registration_end);
    let setting =
        AcademicYearService::set_current(&state.db, academic_year.to_string(), window, Some(staff))
            .await?;

    info!(
        "Current term set to {} by {}",
        setting.academic_year,
        setting.set_by.as_deref().unwrap_or("unknown")
    );
    Ok(Json(describe(setting, &state)))
}
