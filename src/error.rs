//! HTTP error surface.
//!
//! ERROR HANDLING
//! ==============
//! Services return typed `thiserror` enums; routes convert them into
//! `ApiError`, which always renders `{"detail": "..."}`. Database failures
//! are logged here and collapsed into a generic 500 so SQL details never
//! reach the client. Every 401 carries `WWW-Authenticate: Bearer`. Extractor
//! rejections go through the `Api*` aliases so they share the same body.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::http::header::WWW_AUTHENTICATE;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::WithRejection;

use crate::services::ContentError;
use crate::services::admin::AdminError;
use crate::services::verification::VerificationError;

const INTERNAL_DETAIL: &str = "Interner Serverfehler";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self { status, detail: detail.into() }
    }

    #[must_use]
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    #[must_use]
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, detail)
    }

    #[must_use]
    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, detail)
    }

    #[must_use]
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_DETAIL)
    }

    fn internal_with(detail: String) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }

    fn database(err: &sqlx::Error) -> Self {
        tracing::error!(error = %err, "database error");
        Self::internal()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.detail }));
        if self.status == StatusCode::UNAUTHORIZED {
            (self.status, [(WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (self.status, body).into_response()
        }
    }
}

/// `Json` body whose rejection renders as `{"detail"}`.
pub type ApiJson<T> = WithRejection<Json<T>, ApiError>;
pub type ApiQuery<T> = WithRejection<Query<T>, ApiError>;
pub type ApiPath<T> = WithRejection<Path<T>, ApiError>;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::database(&err)
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::NotFound(detail) => Self::not_found(detail),
            ContentError::Forbidden(detail) => Self::forbidden(detail),
            ContentError::Invalid(detail) => Self::bad_request(detail),
            ContentError::Database(e) => Self::database(&e),
        }
    }
}

impl From<AdminError> for ApiError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::InvalidCredentials => Self::unauthorized(err.to_string()),
            AdminError::Deactivated | AdminError::Forbidden(_) => Self::forbidden(err.to_string()),
            AdminError::NotFound => Self::not_found(err.to_string()),
            AdminError::Invalid(detail) => Self::bad_request(detail),
            AdminError::Hash(e) => {
                tracing::error!(error = %e, "password hashing failed");
                Self::internal()
            }
            AdminError::Database(e) => Self::database(&e),
        }
    }
}

impl From<VerificationError> for ApiError {
    fn from(err: VerificationError) -> Self {
        match err {
            VerificationError::DomainNotAllowed { .. } => Self::forbidden(err.to_string()),
            VerificationError::LvaNotFound => Self::not_found(err.to_string()),
            VerificationError::RateLimited(_) => Self::new(StatusCode::TOO_MANY_REQUESTS, err.to_string()),
            VerificationError::MailFailed(ref e) => {
                tracing::error!(error = %e, "verification mail delivery failed");
                Self::internal_with(err.to_string())
            }
            VerificationError::Database(e) => Self::database(&e),
            VerificationError::InvalidEmail
            | VerificationError::RatingOutOfRange
            | VerificationError::CodeExhausted
            | VerificationError::CodeExpired
            | VerificationError::InvalidCode
            | VerificationError::InvalidOrUsedCode => Self::bad_request(err.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
