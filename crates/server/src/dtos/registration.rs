use chrono::{DateTime, Utc};
use models::academic_year::{AcademicYearSetting, RegistrationStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationResponse {
    /// Current term, absent when none has been configured
    pub academic_year: Option<String>,
    /// `open`, `not_yet_open`, `closed` or `unavailable`
    pub status: String,
    pub message: String,
    pub registration_start: Option<DateTime<Utc>>,
    pub registration_end: Option<DateTime<Utc>>,
}

impl RegistrationResponse {
    pub fn unavailable(message: String) -> Self {
        Self {
            academic_year: None,
            status: "unavailable".to_string(),
            message,
            registration_start: None,
            registration_end: None,
        }
    }

    pub fn new(setting: AcademicYearSetting, status: RegistrationStatus, message: String) -> Self {
        let status = match status {
            RegistrationStatus::Open => "open",
            RegistrationStatus::NotYetOpen => "not_yet_open",
            RegistrationStatus::Closed => "closed",
        };

        Self {
            academic_year: Some(setting.academic_year),
            status: status.to_string(),
            message,
            registration_start: setting.window.start,
            registration_end: setting.window.end,
        }
    }
}

/// Makes `academic_year` the current term
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetRegistrationBody {
    pub academic_year: String,
    pub registration_start: Option<DateTime<Utc>>,
    pub registration_end: Option<DateTime<Utc>>,
}
