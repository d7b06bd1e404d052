//! Storage error taxonomy.

use std::io;

use axum::http::Method;
use thiserror::Error;

use crate::storage::path::PathError;

/// Which mutating operation produced a filesystem error.
///
/// The same `io::ErrorKind` can mean different things per operation: some
/// platforms report a non-empty directory on `rmdir` as "already exists",
/// and creating parents reports it when a path component is a regular file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobOp {
    CreateParents,
    Create,
    Remove,
}

/// Errors produced while handling a blob request.
#[derive(Debug, Error)]
pub enum BlobError {
    /// The request path could not be mapped under the root.
    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),

    /// The verb has no blob semantics.
    #[error("unsupported method: {0}")]
    UnsupportedMethod(Method),

    /// PUT or DELETE addressed the blob root itself.
    #[error("the blob root cannot be modified")]
    RootMutation,

    /// The target already exists (exclusive create lost).
    #[error("blob already exists")]
    Conflict,

    /// The target, or a path component, does not exist.
    #[error("blob not found")]
    NotFound,

    /// The filesystem refused access.
    #[error("permission denied")]
    PermissionDenied,

    /// Any other filesystem or body-transfer failure.
    #[error("storage failure: {0}")]
    Io(#[source] io::Error),
}

impl BlobError {
    /// Classify a filesystem error raised by `op`.
    pub fn from_io(op: BlobOp, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::AlreadyExists if op == BlobOp::Create => BlobError::Conflict,
            io::ErrorKind::NotFound => BlobError::NotFound,
            io::ErrorKind::PermissionDenied => BlobError::PermissionDenied,
            _ => BlobError::Io(err),
        }
    }
}
