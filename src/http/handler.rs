//! The blob handler.
//!
//! # Responsibilities
//! - Resolve the request path under the blob root (before any I/O)
//! - Dispatch on method: GET/HEAD read, PUT create, DELETE remove
//! - Translate storage outcomes into exactly one status code
//!
//! # Design Decisions
//! - No retries: each filesystem call happens once per request
//! - Reads are delegated to a [`StaticReader`] so conditional requests and
//!   validators come from a proven implementation
//! - The handler holds no mutable state; the root is shared read-only

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};

use crate::http::request::RequestIdExt;
use crate::observability::metrics;
use crate::storage::{self, blob, redirect, BlobError, ResolvedPath, StaticReader};

/// Shared, immutable state for the blob handler.
#[derive(Debug, Clone)]
pub struct BlobState<R> {
    root: Arc<PathBuf>,
    reader: R,
}

impl<R: StaticReader> BlobState<R> {
    pub fn new(root: impl Into<PathBuf>, reader: R) -> Self {
        Self {
            root: Arc::new(root.into()),
            reader,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Routes every path and method to [`blob_handler`].
pub fn blob_routes<R: StaticReader>(state: BlobState<R>) -> Router {
    Router::new()
        .route("/", any(blob_handler::<R>))
        .route("/{*path}", any(blob_handler::<R>))
        .with_state(state)
}

/// Handle one blob request.
pub async fn blob_handler<R: StaticReader>(
    State(state): State<BlobState<R>>,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();

    let response = dispatch(&state, request).await;

    metrics::record_request(&method, response.status().as_u16(), start);
    response
}

async fn dispatch<R: StaticReader>(state: &BlobState<R>, request: Request<Body>) -> Response {
    let request_id = request.request_id().to_owned();

    let resolved = match storage::resolve(state.root(), request.uri().path()) {
        Ok(resolved) => resolved,
        Err(err) => {
            tracing::warn!(
                request_id = %request_id,
                path = %request.uri().path(),
                error = %err,
                "Rejected request path"
            );
            return BlobError::from(err).into_response();
        }
    };

    let method = request.method().clone();
    tracing::info!(
        request_id = %request_id,
        method = %method,
        location = %resolved.location().display(),
        "Handling blob request"
    );

    let outcome = match method {
        Method::GET | Method::HEAD => return read(state, &resolved, request).await,
        Method::PUT => put(&resolved, request.into_body()).await,
        Method::DELETE => delete(&resolved).await,
        other => Err(BlobError::UnsupportedMethod(other)),
    };

    match outcome {
        Ok(status) => status.into_response(),
        Err(err) => {
            tracing::warn!(
                request_id = %request_id,
                location = %resolved.location().display(),
                error = %err,
                "Blob request failed"
            );
            err.into_response()
        }
    }
}

async fn read<R: StaticReader>(
    state: &BlobState<R>,
    resolved: &ResolvedPath,
    request: Request<Body>,
) -> Response {
    // The root's sidecar would sit outside the root.
    if !resolved.is_root() {
        if let Some(target) = redirect::lookup(resolved.location()).await {
            return (StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, target)]).into_response();
        }
    }

    state.reader.serve(request).await
}

async fn put(resolved: &ResolvedPath, body: Body) -> Result<StatusCode, BlobError> {
    if resolved.is_root() {
        return Err(BlobError::RootMutation);
    }

    let written = blob::create(resolved.location(), body.into_data_stream()).await?;
    tracing::debug!(location = %resolved.location().display(), bytes = written, "Blob created");
    Ok(StatusCode::CREATED)
}

async fn delete(resolved: &ResolvedPath) -> Result<StatusCode, BlobError> {
    if resolved.is_root() {
        return Err(BlobError::RootMutation);
    }

    blob::remove(resolved.location()).await?;
    Ok(StatusCode::NO_CONTENT)
}
