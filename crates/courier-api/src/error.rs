//! HTTP error mapping.
//!
//! [`ApiError`] wraps the domain error so this crate can implement
//! axum's [`IntoResponse`] for it. Handlers and extractors return
//! [`ApiResult<T>`]; `?` converts from `AppError` at the boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use courier_core::error::{AppError, ErrorKind};

/// Response-side wrapper around [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Result alias for handler and extractor signatures.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// The JSON error payload returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    /// Always `false` for errors.
    pub success: bool,
    /// The error detail.
    pub error: ApiErrorBody,
}

/// Machine-readable code plus human-readable message.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    /// Stable error code, e.g. `UNKNOWN_RECEIVER`.
    pub code: String,
    /// Human-readable description.
    pub message: String,
}

/// Maps an error kind to the HTTP status it is served with.
fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::MissingCredential => StatusCode::UNAUTHORIZED,
        ErrorKind::InvalidCredential => StatusCode::FORBIDDEN,
        ErrorKind::SelfConversation => StatusCode::BAD_REQUEST,
        ErrorKind::UnknownReceiver => StatusCode::NOT_FOUND,
        ErrorKind::EmptyContent => StatusCode::BAD_REQUEST,
        ErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::PushFailed => StatusCode::BAD_GATEWAY,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Serialization => StatusCode::BAD_REQUEST,
        ErrorKind::Configuration | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError(err) = self;
        let status = status_for(err.kind);

        if status.is_server_error() {
            error!(kind = %err.kind, message = %err.message, "Request failed");
        }

        let body = ApiErrorResponse {
            success: false,
            error: ApiErrorBody {
                code: err.kind.to_string(),
                message: err.message,
            },
        };

        (status, Json(body)).into_response()
    }
}
