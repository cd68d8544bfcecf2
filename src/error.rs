//! Typed errors and HTTP mapping.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message sent in place of internal error details outside development mode.
pub const REDACTED_MESSAGE: &str = "Something went wrong";

/// Underlying message of a redacted 500, attached as a response extension.
#[derive(Clone, Debug)]
pub struct InternalErrorDetail(pub String);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("unknown store backend: {0} (expected postgres or memory)")]
    UnknownBackend(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Reference(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_)
            | AppError::Conflict(_)
            | AppError::Reference(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Config(_) | AppError::Db(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation_error",
            AppError::Conflict(_) => "conflict",
            AppError::Reference(_) => "invalid_reference",
            AppError::BadRequest(_) => "bad_request",
            AppError::PayloadTooLarge(_) => "payload_too_large",
            AppError::Config(_) | AppError::Db(_) | AppError::Internal(_) => "internal_error",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Build the JSON error envelope used by every failure response.
pub fn error_response(status: StatusCode, code: &str, message: String) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: code.to_string(),
            message,
        },
    };
    (status, Json(body)).into_response()
}

/// Redacted 500 carrying `detail` as an [`InternalErrorDetail`] extension, so the router can
/// put it back into the body in development mode.
pub fn internal_error_response(detail: String) -> Response {
    let mut resp = error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        REDACTED_MESSAGE.to_string(),
    );
    resp.extensions_mut().insert(InternalErrorDetail(detail));
    resp
}

/// Rebuild a redacted 500 with its underlying message. Other responses pass through.
pub fn expose_internal_detail(mut resp: Response) -> Response {
    match resp.extensions_mut().remove::<InternalErrorDetail>() {
        Some(InternalErrorDetail(detail)) => error_response(resp.status(), "internal_error", detail),
        None => resp,
    }
}

/// Body extraction failures: syntax, content type, size.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(message)
        } else {
            AppError::BadRequest(message)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            return internal_error_response(self.to_string());
        }
        error_response(status, self.code(), self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400_and_404() {
        assert_eq!(AppError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Reference("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_responses_are_redacted_until_exposed() {
        let resp = AppError::Internal("pool exhausted".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = resp.extensions().get::<InternalErrorDetail>().map(|d| d.0.clone());
        assert_eq!(detail.as_deref(), Some("internal: pool exhausted"));

        let exposed = expose_internal_detail(resp);
        assert_eq!(exposed.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(exposed.extensions().get::<InternalErrorDetail>().is_none());

        let not_found = AppError::NotFound("Student not found".into()).into_response();
        assert!(not_found.extensions().get::<InternalErrorDetail>().is_none());
    }

    #[test]
    fn store_failures_are_internal() {
        let err = AppError::Db(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "internal_error");
    }
}
