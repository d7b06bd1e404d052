//! Filesystem side of the blob store.
//!
//! # Data Flow
//! ```text
//! URL path
//!     → path.rs (decode, clean, reject, join onto root)
//!     → GET/HEAD: redirect.rs (sidecar) → reader.rs (static file serving)
//!     → PUT/DELETE: blob.rs (exclusive create / remove)
//!     → error.rs (io::Error → BlobError)
//! ```
//!
//! # Design Decisions
//! - Stateless: every request works directly against the filesystem
//! - Exclusive create is the only concurrency primitive; no locks
//! - Nothing under the root is cached

pub mod blob;
pub mod error;
pub mod path;
pub mod reader;
pub mod redirect;

pub use error::{BlobError, BlobOp};
pub use path::{resolve, PathError, ResolvedPath};
pub use reader::{DirReader, StaticReader};
