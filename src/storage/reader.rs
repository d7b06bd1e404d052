//! Read-side capability for GET and HEAD.
//!
//! The blob handler does not implement conditional requests, `Last-Modified`
//! or length headers itself; it hands reads to a [`StaticReader`].

use std::convert::Infallible;
use std::future::Future;
use std::path::Path;

use axum::{
    body::Body,
    http::Request,
    response::Response,
};
use tower::ServiceExt;
use tower_http::services::ServeDir;

/// Serves readable files rooted at a directory for a request path.
pub trait StaticReader: Clone + Send + Sync + 'static {
    fn serve(&self, request: Request<Body>) -> impl Future<Output = Response> + Send;
}

/// [`StaticReader`] backed by `tower-http`'s `ServeDir`.
///
/// Directories are never listed or indexed; they read as 404.
#[derive(Debug, Clone)]
pub struct DirReader {
    inner: ServeDir,
}

impl DirReader {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            inner: ServeDir::new(root).append_index_html_on_directories(false),
        }
    }
}

impl StaticReader for DirReader {
    fn serve(&self, request: Request<Body>) -> impl Future<Output = Response> + Send {
        let service = self.inner.clone();
        async move {
            let result: Result<_, Infallible> = service.oneshot(request).await;
            match result {
                Ok(response) => response.map(Body::new),
                Err(never) => match never {},
            }
        }
    }
}
