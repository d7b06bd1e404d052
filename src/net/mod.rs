//! Network layer subsystem.
//!
//! Plain TCP is bound directly by the HTTP server; this module only covers
//! what TLS needs on top of it.

pub mod tls;
