//! Store errors and their HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use journal_types::ErrorResponse;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{label} not found")]
    NotFound { label: &'static str, id: String },

    #[error("{label} with id {id:?} already exists")]
    DuplicateId { label: &'static str, id: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage unavailable at {}: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::StorageUnavailable {
            path: path.into(),
            source,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Converts a [`StoreError`] into the JSON error body the UI expects.
///
/// Storage failures answer with a generic message; the cause is logged here
/// and never sent to the client.
#[derive(Debug)]
pub struct ApiError(pub StoreError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            StoreError::NotFound { id, .. } => {
                log::debug!("{} (id {:?})", self.0, id);
                (StatusCode::NOT_FOUND, self.0.to_string())
            }
            StoreError::DuplicateId { .. } => (StatusCode::CONFLICT, self.0.to_string()),
            StoreError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            StoreError::StorageUnavailable { .. } => {
                log::error!("{}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError(err)
    }
}
