//! TLS certificate loading.

use std::path::{Path, PathBuf};

use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;

use crate::config::TlsConfig;

#[derive(Debug, Error)]
pub enum TlsError {
    #[error("certificate file not found: {}", .0.display())]
    MissingCertificate(PathBuf),

    #[error("private key file not found: {}", .0.display())]
    MissingKey(PathBuf),

    #[error("failed to load TLS material: {0}")]
    Load(#[from] std::io::Error),
}

/// Build a rustls server config from the PEM files named in `config`.
pub async fn load_tls_config(config: &TlsConfig) -> Result<RustlsConfig, TlsError> {
    ensure_file(&config.cert_path, TlsError::MissingCertificate)?;
    ensure_file(&config.key_path, TlsError::MissingKey)?;

    let rustls = RustlsConfig::from_pem_file(&config.cert_path, &config.key_path).await?;
    tracing::info!(cert = %config.cert_path.display(), "TLS certificate loaded");
    Ok(rustls)
}

fn ensure_file(path: &Path, missing: fn(PathBuf) -> TlsError) -> Result<(), TlsError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(missing(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_files_are_reported_by_role() {
        let dir = TempDir::new().unwrap();
        let cert = dir.path().join("cert.pem");
        let key = dir.path().join("key.pem");

        let config = TlsConfig {
            cert_path: cert.clone(),
            key_path: key.clone(),
        };
        let result = load_tls_config(&config).await;
        assert!(matches!(result, Err(TlsError::MissingCertificate(p)) if p == cert));

        std::fs::write(&cert, "").unwrap();
        let result = load_tls_config(&config).await;
        assert!(matches!(result, Err(TlsError::MissingKey(p)) if p == key));
    }

    #[tokio::test]
    async fn test_garbage_pem_fails_to_load() {
        let dir = TempDir::new().unwrap();
        let config = TlsConfig {
            cert_path: dir.path().join("cert.pem"),
            key_path: dir.path().join("key.pem"),
        };
        std::fs::write(&config.cert_path, "not a certificate").unwrap();
        std::fs::write(&config.key_path, "not a key").unwrap();

        assert!(matches!(load_tls_config(&config).await, Err(TlsError::Load(_))));
    }
}
