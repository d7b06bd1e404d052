//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BlobstoreConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::BlobstoreConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("blobs_path is required")]
    MissingBlobsPath,

    #[error("{field} '{value}' is not a valid host:port address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("listener.tls.{0} must not be empty")]
    EmptyTlsPath(&'static str),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("limits.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("user name '{0}' must be non-empty and must not contain ':'")]
    InvalidUserName(String),
}

pub fn validate_config(config: &BlobstoreConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.blobs_path.as_os_str().is_empty() {
        errors.push(ValidationError::MissingBlobsPath);
    }

    check_address("listener.bind_address", &config.listener.bind_address, &mut errors);
    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.as_os_str().is_empty() {
            errors.push(ValidationError::EmptyTlsPath("cert_path"));
        }
        if tls.key_path.as_os_str().is_empty() {
            errors.push(ValidationError::EmptyTlsPath("key_path"));
        }
    }

    if config.timeouts.request_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.limits.max_body_bytes == Some(0) {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    let mut bad_users: Vec<_> = config
        .users
        .keys()
        .filter(|name| name.is_empty() || name.contains(':'))
        .cloned()
        .collect();
    bad_users.sort();
    errors.extend(bad_users.into_iter().map(ValidationError::InvalidUserName));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
