//! Redirect sidecars.
//!
//! A file named `<blob>.redirect` next to a blob location turns reads of that
//! location into a `307 Temporary Redirect` to the URL it contains.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use axum::http::HeaderValue;
use tokio::fs;

pub const REDIRECT_SUFFIX: &str = ".redirect";

/// Path of the sidecar belonging to `location`.
pub fn sidecar_path(location: &Path) -> PathBuf {
    let mut sidecar = OsString::from(location.as_os_str());
    sidecar.push(REDIRECT_SUFFIX);
    PathBuf::from(sidecar)
}

/// Read the redirect target for `location`, if a usable sidecar exists.
pub async fn lookup(location: &Path) -> Option<HeaderValue> {
    let content = fs::read(sidecar_path(location)).await.ok()?;
    let target = content.trim_ascii();
    if target.is_empty() {
        return None;
    }

    match HeaderValue::from_bytes(target) {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(
                location = %location.display(),
                "Ignoring redirect sidecar with invalid target"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sidecar_path_appends_suffix() {
        assert_eq!(
            sidecar_path(Path::new("/blobs/a/file.txt")),
            PathBuf::from("/blobs/a/file.txt.redirect")
        );
    }

    #[tokio::test]
    async fn test_lookup_trims_target() {
        let dir = TempDir::new().unwrap();
        let blob = dir.path().join("blob");
        std::fs::write(sidecar_path(&blob), b"https://cdn.example.com/blob\n").unwrap();

        let target = lookup(&blob).await.unwrap();
        assert_eq!(target, "https://cdn.example.com/blob");
    }

    #[tokio::test]
    async fn test_lookup_ignores_missing_and_empty_sidecars() {
        let dir = TempDir::new().unwrap();
        let blob = dir.path().join("blob");
        assert!(lookup(&blob).await.is_none());

        std::fs::write(sidecar_path(&blob), b"  \n").unwrap();
        assert!(lookup(&blob).await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_ignores_invalid_header_value() {
        let dir = TempDir::new().unwrap();
        let blob = dir.path().join("blob");
        std::fs::write(sidecar_path(&blob), b"https://example.com/\x01bad").unwrap();

        assert!(lookup(&blob).await.is_none());
    }
}
