use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::identity::{LoginError, RegistrationError};
use crate::repository::user::ProfileError;

pub mod auth;
pub mod users;

#[derive(Serialize, Debug)]
#[must_use]
pub struct TokenResponse {
    pub token: String,
}

/// Transport-level rendering of core failures. The core reports kinds; this
/// is the only place that picks status codes and bodies.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Username taken, please pick another")]
    UsernameTaken,

    #[error("Invalid username/password")]
    InvalidCredentials,

    #[error("No such user")]
    NotFound,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    const fn status_code(&self) -> StatusCode {
        match self {
            Self::UsernameTaken => StatusCode::CONFLICT,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<RegistrationError> for ApiError {
    fn from(error: RegistrationError) -> Self {
        match error {
            RegistrationError::UsernameTaken => Self::UsernameTaken,
            RegistrationError::Hash(_)
            | RegistrationError::Token(_)
            | RegistrationError::Database(_) => Self::Internal,
        }
    }
}

impl From<LoginError> for ApiError {
    fn from(error: LoginError) -> Self {
        match error {
            LoginError::InvalidCredentials => Self::InvalidCredentials,
            LoginError::Token(_) | LoginError::Database(_) => Self::Internal,
        }
    }
}

impl From<ProfileError> for ApiError {
    fn from(error: ProfileError) -> Self {
        match error {
            ProfileError::NotFound => Self::NotFound,
            ProfileError::Database(_) => Self::Internal,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(_: sqlx::Error) -> Self {
        Self::Internal
    }
}
