//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the Axum router: blob handler behind the credential gate
//! - Wire up middleware (request ID, tracing, optional timeout and body limit)
//! - Serve over plain TCP or TLS
//! - Drain in-flight requests on shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request, middleware, Router};
use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::BlobstoreConfig;
use crate::http::handler::{blob_routes, BlobState};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::lifecycle::ShutdownToken;
use crate::security::auth::{credential_gate, Credentials};
use crate::storage::{DirReader, StaticReader};

/// How long TLS connections get to finish after shutdown is requested.
const TLS_DRAIN_GRACE: Duration = Duration::from_secs(30);

/// Errors that stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// HTTP server for the blob store.
pub struct BlobServer {
    router: Router,
    config: Arc<BlobstoreConfig>,
}

impl BlobServer {
    /// Create a server that reads blobs from disk with `ServeDir`.
    pub fn new(config: BlobstoreConfig) -> Self {
        let reader = DirReader::new(&config.blobs_path);
        Self::with_reader(config, reader)
    }

    /// Create a server with a custom read-side implementation.
    pub fn with_reader<R: StaticReader>(config: BlobstoreConfig, reader: R) -> Self {
        let router = Self::build_router(&config, reader);
        Self {
            router,
            config: Arc::new(config),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router<R: StaticReader>(config: &BlobstoreConfig, reader: R) -> Router {
        let credentials = Arc::new(Credentials::new(config.users.clone(), config.public_read));
        let state = BlobState::new(config.blobs_path.clone(), reader);

        let mut router = blob_routes(state)
            .layer(middleware::from_fn_with_state(credentials, credential_gate));

        if let Some(limit) = config.limits.max_body_bytes {
            router = router.layer(RequestBodyLimitLayer::new(limit));
        }
        if let Some(secs) = config.timeouts.request_secs {
            router = router.layer(TimeoutLayer::new(Duration::from_secs(secs)));
        }

        router
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    request_id = %request.request_id(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }))
            .layer(set_request_id_layer())
    }

    /// The assembled router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve plain HTTP on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownToken,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            root = %self.config.blobs_path.display(),
            public_read = self.config.public_read,
            "HTTP server starting"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve HTTPS on `addr` until `shutdown` fires.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        shutdown: ShutdownToken,
    ) -> Result<(), ServerError> {
        tracing::info!(
            address = %addr,
            root = %self.config.blobs_path.display(),
            public_read = self.config.public_read,
            "HTTPS server starting"
        );

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            shutdown.wait().await;
            drain.graceful_shutdown(Some(TLS_DRAIN_GRACE));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Bind the plain-HTTP listener for `address`.
pub async fn bind(address: &str) -> Result<TcpListener, ServerError> {
    TcpListener::bind(address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.to_string(),
            source,
        })
}
