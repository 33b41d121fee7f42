//! Error types for the flipbook server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::storage::StoreError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
///
/// Every failure is surfaced to the caller as `{"detail": <message>}` with a
/// human-readable message; there are no automatic retries. The user-facing
/// messages keep the original French wording of the API.
#[derive(Error, Debug)]
pub enum AppError {
    /// The submitted file is not a PDF by extension or declared type.
    #[error("{0}")]
    InvalidInput(String),

    /// The payload passed validation but could not be rasterized.
    #[error("Erreur conversion PDF: {0}")]
    Conversion(String),

    /// A page artifact could not be written to the backend.
    #[error("Erreur sauvegarde images: {0}")]
    Storage(String),

    /// No pages exist for the requested document.
    #[error("Document introuvable")]
    NotFound,

    /// The storage backend could not be reached at all. Kept distinct from
    /// `NotFound` so callers can tell an outage from a missing document.
    #[error("Stockage indisponible: {0}")]
    BackendUnavailable(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(message) => AppError::BackendUnavailable(message),
            write @ StoreError::Write { .. } => AppError::Storage(write.to_string()),
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conversion(_) | AppError::Storage(_) | AppError::BackendUnavailable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(ErrorBody {
            detail: self.to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_errors_map_to_storage() {
        let err = AppError::from(StoreError::Write {
            key: "abc/pages/1.png".to_string(),
            message: "disk full".to_string(),
        });
        assert!(matches!(err, AppError::Storage(_)));
        assert!(err.to_string().starts_with("Erreur sauvegarde images"));
    }

    #[test]
    fn unavailable_errors_stay_distinct_from_not_found() {
        let err = AppError::from(StoreError::Unavailable("connection refused".to_string()));
        assert!(matches!(err, AppError::BackendUnavailable(_)));
    }

    #[test]
    fn not_found_message_matches_api() {
        assert_eq!(AppError::NotFound.to_string(), "Document introuvable");
    }
}
