//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → security::auth (credential gate)
//!     → handler.rs (path resolution, method dispatch)
//!     → response.rs (BlobError → status code)
//!     → Send to client
//! ```

pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use handler::{blob_handler, blob_routes, BlobState};
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{BlobServer, ServerError};
