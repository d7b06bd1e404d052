//! Mutating blob operations (PUT and DELETE).
//!
//! Every filesystem call here is attempted once; failures are classified
//! into [`BlobError`] and never retried.

use std::error::Error as StdError;
use std::io;
use std::path::Path;
use std::pin::pin;

use bytes::Bytes;
use futures_util::{Stream, TryStreamExt};
use tokio::fs::{self, DirBuilder, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::storage::error::{BlobError, BlobOp};

/// Mode for directories created on the way to a new blob.
pub const DIRECTORY_MODE: u32 = 0o755;

/// Create a new blob at `location` holding exactly the bytes of `body`.
///
/// Missing parent directories are created first. The file itself is opened
/// with exclusive create, so an existing blob is never overwritten. If the
/// body fails mid-stream the partially written file is left in place.
///
/// Returns the number of bytes written.
pub async fn create<S, E>(location: &Path, body: S) -> Result<u64, BlobError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: StdError + Send + Sync + 'static,
{
    if let Some(parent) = location.parent() {
        create_parents(parent)
            .await
            .map_err(|err| BlobError::from_io(BlobOp::CreateParents, err))?;
    }

    let fail = |err| BlobError::from_io(BlobOp::Create, err);

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(location)
        .await
        .map_err(fail)?;

    let mut body = pin!(body.map_err(io::Error::other));
    let mut written = 0u64;
    while let Some(chunk) = body.try_next().await.map_err(fail)? {
        file.write_all(&chunk).await.map_err(fail)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(fail)?;

    Ok(written)
}

/// Remove the blob at `location`. Files and empty directories are removed;
/// a directory with content is left alone and reported as a generic failure.
pub async fn remove(location: &Path) -> Result<(), BlobError> {
    let fail = |err| BlobError::from_io(BlobOp::Remove, err);

    let metadata = fs::symlink_metadata(location).await.map_err(fail)?;
    if metadata.is_dir() {
        fs::remove_dir(location).await.map_err(fail)
    } else {
        fs::remove_file(location).await.map_err(fail)
    }
}

async fn create_parents(dir: &Path) -> io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(DIRECTORY_MODE);
    builder.create(dir).await
}
