//! Errors returned by observer handlers.
//!
//! Every variant renders as a JSON body `{"error": ..., "status": ...}`
//! with the matching HTTP status code.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Failure of an observer request.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// Nothing has been published for the requested resource yet.
    #[error("not found: {0}")]
    NotFound(String),

    /// An operator request carried an out-of-range argument.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// The observer was built without the state a handler needs.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ObserverError {
    /// HTTP status reported for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidCommand(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (Self::NotFound(error) | Self::InvalidCommand(error) | Self::Internal(error)) = self;
        let body = ErrorBody {
            error,
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(
            ObserverError::NotFound(String::new()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ObserverError::InvalidCommand(String::new()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ObserverError::Internal(String::new()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
