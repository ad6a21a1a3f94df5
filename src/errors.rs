//! Error handling for generated CRUD routes.
//!
//! Every failure inside a handler is converted at the handler boundary into a
//! uniform `{"error": true, "message": "..."}` JSON envelope with an
//! operation-specific status code. Underlying store or hook errors contribute
//! only their message; anything else stays server-side and is logged through
//! the `tracing` crate when the caller has a subscriber installed.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

/// Boxed error as returned by accessors, hooks, and body validators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures a generated handler can produce.
#[derive(Debug)]
pub enum CrudError {
    /// 400 - the `:id` path segment was missing or blank.
    MissingId,
    /// 400 - the configured body-validation predicate rejected the payload.
    ValidationFailed,
    /// 404 - no document matched the requested id.
    NotFound,
    /// Store, hook, or validator failure. The status is chosen by the
    /// enclosing handler (400 on write paths, 500 on read/delete paths).
    Store {
        status: StatusCode,
        message: String,
    },
}

impl CrudError {
    /// Wrap an underlying failure, keeping its message when it has one and
    /// falling back to the handler's generic message otherwise.
    #[must_use]
    pub fn store(status: StatusCode, source: &BoxError, fallback: &str) -> Self {
        let message = source.to_string();
        let message = if message.is_empty() {
            fallback.to_string()
        } else {
            message
        };
        Self::Store { status, message }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingId | Self::ValidationFailed => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Store { status, .. } => *status,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::MissingId => "ID is required".to_string(),
            Self::ValidationFailed => "Validation failed".to_string(),
            Self::NotFound => "Document not found".to_string(),
            Self::Store { message, .. } => message.clone(),
        }
    }
}

/// The envelope sent to clients. Never carries stack traces or store
/// internals beyond the resolved message.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
}

impl IntoResponse for CrudError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();
        if status.is_server_error() {
            tracing::error!(status = %status, message = %message, "request failed");
        } else {
            tracing::debug!(status = %status, message = %message, "request rejected");
        }
        (
            status,
            Json(ErrorBody {
                error: true,
                message,
            }),
        )
            .into_response()
    }
}

impl fmt::Display for CrudError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CrudError {}
