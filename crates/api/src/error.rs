use std::borrow::Cow;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fila_client::BackendError;
use fila_core::error::CoreError;
use serde_json::json;

use crate::notifications::{NoticeKind, PendingNotice};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`BackendError`] for failed
/// backend calls. Implements [`IntoResponse`] to produce consistent JSON
/// error responses and raise an error notice for the provider.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `fila_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A backend call failed. `fallback` is the message shown when the
    /// failure carries no displayable message of its own.
    #[error("{fallback}: {source}")]
    Backend {
        source: BackendError,
        fallback: Cow<'static, str>,
    },

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// `map_err` adapter tagging a backend failure with the call site's
    /// generic message.
    pub fn backend(fallback: impl Into<Cow<'static, str>>) -> impl FnOnce(BackendError) -> AppError {
        let fallback = fallback.into();
        move |source| AppError::Backend { source, fallback }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", core.detail()),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "Ocorreu um erro interno.".to_string(),
                    )
                }
            },

            // --- Backend errors ---
            AppError::Backend { source, fallback } => match source {
                BackendError::Rejected(msg) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "REJECTED", msg.clone())
                }
                other => {
                    tracing::error!(error = %other, "Backend call failed");
                    (
                        StatusCode::BAD_GATEWAY,
                        "BACKEND_UNAVAILABLE",
                        fallback.to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Ocorreu um erro interno.".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        let mut response = (status, axum::Json(body)).into_response();
        response.extensions_mut().insert(PendingNotice {
            kind: NoticeKind::Error,
            message,
        });
        response
    }
}
