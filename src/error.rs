//! Error taxonomy and its HTTP mapping.
//!
//! Service and repository code returns `Error` everywhere; the `IntoResponse`
//! impl is the single place where taxonomy entries become status codes and
//! JSON bodies.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Duplicate username or ISBN.
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials or missing/invalid bearer token.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not the admin.
    #[error("{0}")]
    Forbidden(String),

    /// The id (or protected resource) does not resolve.
    #[error("{0}")]
    NotFound(String),

    /// Validation failure on otherwise well-formed input.
    #[error("{0}")]
    BadRequest(String),

    /// Malformed or missing required fields.
    #[error("{0}")]
    UnprocessableEntity(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            // The original service surface reports duplicates as 400, so the
            // Conflict taxonomy entry keeps that mapping.
            Self::Conflict(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal faults get logged with their cause and surfaced as a
        // generic server error, distinct from the taxonomy entries.
        let detail = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "database error while handling request");
                "Internal server error".to_string()
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "internal error while handling request");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let mut response = (status, Json(json!({ "detail": detail }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
