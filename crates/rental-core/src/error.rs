//! Error surfaces.
//!
//! [`AppError`] covers process startup and serving faults. [`ApiError`] is
//! the single outcome-to-transport adapter: every domain operation returns a
//! typed error, each module converts its error into an `ApiError` category,
//! and this file owns the one place where categories become status codes and
//! JSON bodies. Handlers never build error responses by hand.

use crate::config::ConfigError;
use crate::policy::AccessDenied;
use crate::storage::StorageError;
use crate::telemetry::TelemetryError;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

use crate::repository::RepositoryError;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Seed(crate::accounts::service::AccountServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Seed(err) => write!(f, "admin seed error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Seed(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<crate::accounts::service::AccountServiceError> for AppError {
    fn from(value: crate::accounts::service::AccountServiceError) -> Self {
        Self::Seed(value)
    }
}

/// Request-path outcome, ready for transport translation.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or missing input; the caller can fix and resubmit.
    Validation(String),
    /// Login failure.
    Unauthorized(String),
    /// Non-fatal uniqueness collision, surfaced as a warning.
    Duplicate(String),
    /// Policy denial.
    Denied(AccessDenied),
    /// Missing row or missing backing file.
    NotFound(String),
    /// Request body exceeded the configured upload cap.
    PayloadTooLarge,
    /// File-store failure; the enclosing operation wrote nothing.
    Storage(StorageError),
    /// Gateway unavailable or an otherwise unhandled fault.
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Duplicate(_) => StatusCode::CONFLICT,
            ApiError::Denied(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Validation(message)
            | ApiError::Unauthorized(message)
            | ApiError::Duplicate(message) => message.clone(),
            ApiError::Denied(denied) => denied.to_string(),
            ApiError::NotFound(message) => message.clone(),
            ApiError::PayloadTooLarge => "File too large. Maximum size is 16MB.".to_string(),
            ApiError::Storage(err) => err.to_string(),
            ApiError::Internal(message) => message.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(%status, error = %message, "request failed");
        }

        // Duplicates are warnings in the original flow, not hard failures;
        // the payload key preserves that distinction for clients.
        let body = if matches!(self, ApiError::Duplicate(_)) {
            json!({ "warning": message })
        } else {
            json!({ "error": message })
        };

        (status, Json(body)).into_response()
    }
}

impl From<AccessDenied> for ApiError {
    fn from(value: AccessDenied) -> Self {
        Self::Denied(value)
    }
}

impl From<StorageError> for ApiError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Missing(path) => Self::NotFound(format!("file missing: {path}")),
            other => Self::Storage(other),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Conflict => Self::Duplicate("record already exists".to_string()),
            RepositoryError::NotFound => Self::NotFound("record not found".to_string()),
            RepositoryError::Unavailable(detail) => {
                Self::Internal(format!("repository unavailable: {detail}"))
            }
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(value: MultipartError) -> Self {
        let message = value.to_string();
        if message.contains("length limit") {
            Self::PayloadTooLarge
        } else {
            Self::Validation(format!("malformed upload: {message}"))
        }
    }
}
