//! Response mapping for blob errors.
//!
//! # Design Decisions
//! - The status code is the only error signal; bodies stay empty so no
//!   filesystem detail leaks to clients
//! - Unclassified failures degrade to 400, not 500

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::storage::BlobError;

impl BlobError {
    /// HTTP status reported for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            BlobError::Conflict => StatusCode::CONFLICT,
            BlobError::NotFound => StatusCode::NOT_FOUND,
            BlobError::PermissionDenied => StatusCode::FORBIDDEN,
            BlobError::InvalidPath(_)
            | BlobError::UnsupportedMethod(_)
            | BlobError::RootMutation
            | BlobError::Io(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for BlobError {
    fn into_response(self) -> Response {
        self.status_code().into_response()
    }
}
