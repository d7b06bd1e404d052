//! Request path resolution.
//!
//! # Responsibilities
//! - Percent-decode the URL path
//! - Root it and clean it lexically (no filesystem access)
//! - Reject anything that could climb out of the blob root
//! - Join the cleaned path onto the root
//!
//! # Design Decisions
//! - The `..` check runs on the *cleaned* text and is a plain substring test,
//!   so names such as `foo..bar.txt` are refused as well
//! - Parent segments are also refused before cleaning; a cleaned `/a/../b`
//!   would otherwise silently become `/b`

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Reasons a request path cannot be mapped under the blob root.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path is not valid UTF-8 once decoded")]
    Encoding,

    #[error("path contains a parent directory reference")]
    Traversal,

    #[error("path contains a NUL byte")]
    Nul,
}

/// A request path that has been cleaned and joined onto the blob root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    normalized: String,
    location: PathBuf,
}

impl ResolvedPath {
    /// The cleaned, rooted URL path (always starts with `/`).
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// The filesystem location under the blob root.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Whether the request addresses the blob root itself.
    pub fn is_root(&self) -> bool {
        self.normalized == "/"
    }
}

/// Resolve a raw (still percent-encoded) URL path against `root`.
pub fn resolve(root: &Path, raw: &str) -> Result<ResolvedPath, PathError> {
    let decoded = urlencoding::decode(raw).map_err(|_| PathError::Encoding)?;

    let mut rooted = String::with_capacity(decoded.len() + 1);
    if !decoded.starts_with('/') {
        rooted.push('/');
    }
    rooted.push_str(&decoded);

    if rooted.split('/').any(|segment| segment == "..") {
        return Err(PathError::Traversal);
    }

    let normalized = clean(&rooted);
    if normalized.contains('\0') {
        return Err(PathError::Nul);
    }
    if normalized.contains("..") {
        return Err(PathError::Traversal);
    }

    let location = match normalized.strip_prefix('/') {
        Some("") | None => root.to_path_buf(),
        Some(relative) => root.join(relative),
    };

    Ok(ResolvedPath {
        normalized,
        location,
    })
}

/// Lexically clean a rooted path: drop empty and `.` segments and fold `..`
/// into its parent. A `..` at the root is discarded.
pub fn clean(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut cleaned = String::with_capacity(path.len());
    for segment in &segments {
        cleaned.push('/');
        cleaned.push_str(segment);
    }
    if cleaned.is_empty() {
        cleaned.push('/');
    }
    cleaned
}
