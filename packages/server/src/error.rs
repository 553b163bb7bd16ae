use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use spotify::SpotifyError;

use crate::catalog::{AdmissionError, CatalogError};

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NOT_FOUND`,
    /// `RESOURCE_EXHAUSTED`, `TOKEN_INVALID`, `UPSTREAM_ERROR`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "first_name must not be empty")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    /// The round's user cap is reached.
    ResourceExhausted(String),
    /// The external catalog rejected the caller's access token.
    TokenInvalid,
    /// The external catalog failed or rejected the request.
    Upstream(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::ResourceExhausted(msg) => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorBody {
                    code: "RESOURCE_EXHAUSTED",
                    message: msg,
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_INVALID",
                    message: "Invalid or expired access token".into(),
                },
            ),
            AppError::Upstream(detail) => {
                tracing::warn!("Upstream error: {}", detail);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody {
                        code: "UPSTREAM_ERROR",
                        message: detail,
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ArtistNotFound(id) => AppError::NotFound(format!("Artist '{id}' not found")),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<AdmissionError> for AppError {
    fn from(err: AdmissionError) -> Self {
        match err {
            AdmissionError::Exhausted { .. } => AppError::ResourceExhausted(
                "Maximum number of users reached for this round, please wait for the next round"
                    .into(),
            ),
            AdmissionError::Count(e) => AppError::from(e),
        }
    }
}

impl From<SpotifyError> for AppError {
    fn from(err: SpotifyError) -> Self {
        match err.status() {
            Some(401) => AppError::TokenInvalid,
            _ => AppError::Upstream(err.to_string()),
        }
    }
}
