//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Request
//!     → auth.rs (Basic credentials vs configured users, public read toggle)
//!     → allow: blob handler
//!     → deny: 401 / 403, handler never runs
//! ```

pub mod auth;

pub use auth::{credential_gate, AuthDecision, Credentials};
