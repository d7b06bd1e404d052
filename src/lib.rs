//! DAV-style blob store.
//!
//! Exposes a directory tree over HTTP: GET/HEAD read blobs, PUT creates them
//! (never overwrites), DELETE removes them. An optional Basic-auth gate sits
//! in front of the handler.
//!
//! ```text
//!     Client ──▶ net/tls ──▶ http::server ──▶ security::auth
//!                                                          │
//!                                                          ▼
//!     filesystem ◀── storage ◀──────────────────────── http::handler
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod net;
pub mod storage;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::BlobstoreConfig;
pub use http::BlobServer;
pub use lifecycle::Shutdown;
