//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML or JSON)
//!     → loader.rs (read & deserialize)
//!     → CLI overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → BlobstoreConfig (validated, immutable)
//!     → shared via Arc with the server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BlobstoreConfig, LimitsConfig, ListenerConfig, ObservabilityConfig, TimeoutConfig, TlsConfig,
};
pub use validation::{validate_config, ValidationError};
