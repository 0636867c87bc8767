//! Error types for the Observer API server.
//!
//! [`ObserverError`] unifies all failure modes into a single enum that
//! can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use algoviz_core::ControlError;
use algoviz_stats::StatsError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur in the Observer API layer.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// An invalid query parameter or path segment was provided.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The controller refused the request.
    #[error(transparent)]
    Control(#[from] ControlError),

    /// The stats backend is disabled in configuration.
    #[error("stats backend is disabled")]
    StatsDisabled,

    /// The stats backend failed.
    #[error("stats backend error: {0}")]
    Stats(#[from] StatsError),
}

impl ObserverError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::Control(e) => match e {
                ControlError::AlreadyRunning { .. } => StatusCode::CONFLICT,
                ControlError::UnsupportedAlgorithm { .. }
                | ControlError::InvalidInput(_)
                | ControlError::SpeedOutOfRange { .. }
                | ControlError::ProtectedCell { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ControlError::CellOutOfBounds { .. } => StatusCode::NOT_FOUND,
                ControlError::TaskFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::StatsDisabled => StatusCode::SERVICE_UNAVAILABLE,
            Self::Stats(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
