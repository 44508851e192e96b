use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::registration::RegistrationError;
use importer::{ExportError, ImportError};
use log::error;
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine readable error kind, e.g. `conflict`
    pub code: String,
    /// Message that can be shown to the user as is
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("The access token does not identify a user")]
    MissingSubject,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Registration(err) => match err {
                RegistrationError::NoCurrentTerm => (StatusCode::FORBIDDEN, "no_current_term"),
                RegistrationError::RegistrationClosed(_) => {
                    (StatusCode::FORBIDDEN, "registration_closed")
                }
                RegistrationError::CourseNotFound(_) => (StatusCode::NOT_FOUND, "course_not_found"),
                RegistrationError::CourseUnavailable { .. } => {
                    (StatusCode::FORBIDDEN, "course_unavailable")
                }
                RegistrationError::Conflict(_) | RegistrationError::AlreadyRegistered { .. } => {
                    (StatusCode::CONFLICT, "conflict")
                }
                RegistrationError::Database(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
                }
            },
            Self::Import(_) => (StatusCode::BAD_REQUEST, "invalid_csv"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            Self::MissingSubject => (StatusCode::UNAUTHORIZED, "unauthorized"),
            Self::Export(_) | Self::Database(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Internal details stay in the log
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {self}");
            "Something went wrong on our side. Please try again later.".to_string()
        } else {
            self.to_string()
        };

        (
            status,
            Json(ErrorResponse {
                code: code.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::body::to_bytes;
    use models::{ConflictReason, conflict::SlotRef};
    use uuid::Uuid;

    async fn body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_conflict_is_409_with_reason() {
        let slot = SlotRef {
            day_of_week: models::DayOfWeek::Monday,
            period: models::Period::D2,
            week_number: None,
        };
        let reason = ConflictReason::TimeOverlap {
            course_code: "HIS301".to_string(),
            course_name: "World History".to_string(),
            slot,
            enrolled_code: "ENG201".to_string(),
            enrolled_name: "English Writing".to_string(),
            enrolled_slot: slot,
        };
        let expected = reason.to_string();

        let response = ApiError::from(RegistrationError::Conflict(reason)).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body(response).await;
        assert_eq!(body["code"], "conflict");
        assert_eq!(body["message"], expected);
    }

    #[tokio::test]
    async fn test_duplicate_uses_conflict_vocabulary() {
        let err = RegistrationError::AlreadyRegistered {
            course: "English Writing (ENG201)".to_string(),
        };
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body(response).await["code"], "conflict");
    }

    #[tokio::test]
    async fn test_database_errors_are_hidden() {
        let response = ApiError::from(DbErr::Custom("password authentication failed".to_string()))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let message = body(response).await["message"].to_string();
        assert!(!message.contains("password"));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::from(RegistrationError::NoCurrentTerm), StatusCode::FORBIDDEN),
            (
                ApiError::from(RegistrationError::RegistrationClosed("closed".to_string())),
                StatusCode::FORBIDDEN,
            ),
            (
                ApiError::from(RegistrationError::CourseNotFound(Uuid::new_v4())),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(ImportError::MissingColumns(vec!["period".to_string()])),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::MissingSubject, StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("staff only".to_string()), StatusCode::FORBIDDEN),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
