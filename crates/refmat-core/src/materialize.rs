//! Cache directory handle and byte materialization.
//!
//! Materializing a reference streams its bytes into the cache directory
//! under the provider's display name, yielding a real, readable path for
//! resources that have none outside their provider's process.

use crate::provider::{ProviderClient, ProviderError, ProviderStream};
use crate::reference::{sanitize_display_name, ContentReference};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Upper bound for the copy buffer. The provider's available-bytes hint caps
/// it further so small resources don't allocate the full megabyte.
const MAX_COPY_BUFFER: usize = 1024 * 1024;

/// Entry name used when the display name sanitizes down to nothing.
const FALLBACK_ENTRY_NAME: &str = "resource.bin";

/// Failure to materialize a reference into the cache.
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("row query failed for `{reference}`")]
    Query {
        reference: String,
        #[source]
        source: ProviderError,
    },
    #[error("provider reports no display name for `{reference}`")]
    MissingDisplayName { reference: String },
    #[error("failed to create cache directory {path}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to open `{reference}` for reading")]
    Open {
        reference: String,
        #[source]
        source: ProviderError,
    },
    #[error("failed to create cache entry {path}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("copy into {path} failed")]
    Copy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Handle to the private directory receiving materialized copies.
///
/// Passed explicitly wherever materialization can happen; nothing in the
/// engine holds a hidden global directory. Entries are never evicted; the
/// directory grows until the surrounding environment clears it.
#[derive(Debug, Clone)]
pub struct CacheDir {
    root: PathBuf,
}

impl CacheDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        CacheDir { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates the directory if absent. Idempotent; fails only when creation
    /// is actually denied.
    pub fn ensure(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.root)
    }

    /// Path of the cache entry for a display name. The name is sanitized so
    /// a hostile provider name cannot escape the cache directory.
    pub fn entry_path(&self, display_name: &str) -> PathBuf {
        let name = sanitize_display_name(display_name);
        if name.is_empty() {
            self.root.join(FALLBACK_ENTRY_NAME)
        } else {
            self.root.join(name)
        }
    }
}

/// Streams the referenced bytes into the cache under the provider-reported
/// display name and returns the destination path.
///
/// The destination is created (or truncated) before the copy and is returned
/// only after the copy completes in full. A partial file may remain on disk
/// after a failed copy; it is not cleaned up.
pub fn materialize<P: ProviderClient>(
    provider: &P,
    cache: &CacheDir,
    reference: &ContentReference,
) -> Result<PathBuf, MaterializeError> {
    let attrs = provider
        .attributes(reference)
        .map_err(|source| MaterializeError::Query {
            reference: reference.to_string(),
            source,
        })?;
    let display_name = attrs
        .display_name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| MaterializeError::MissingDisplayName {
            reference: reference.to_string(),
        })?;

    cache.ensure().map_err(|source| MaterializeError::CacheDir {
        path: cache.path().to_path_buf(),
        source,
    })?;
    let dest = cache.entry_path(&display_name);

    let stream = provider
        .open(reference)
        .map_err(|source| MaterializeError::Open {
            reference: reference.to_string(),
            source,
        })?;
    let mut out = File::create(&dest).map_err(|source| MaterializeError::Create {
        path: dest.clone(),
        source,
    })?;

    let written = copy_stream(stream, &mut out).map_err(|source| MaterializeError::Copy {
        path: dest.clone(),
        source,
    })?;
    tracing::debug!(
        reference = %reference,
        path = %dest.display(),
        bytes = written,
        "materialized cache copy"
    );
    Ok(dest)
}

/// Copies the stream with a buffer of `min(available, 1 MiB)` bytes.
fn copy_stream(mut stream: ProviderStream, out: &mut File) -> io::Result<u64> {
    let buffer_len = stream
        .available
        .map(|hint| hint.min(MAX_COPY_BUFFER as u64) as usize)
        .unwrap_or(MAX_COPY_BUFFER)
        .max(1);
    let mut buffer = vec![0u8; buffer_len];
    let mut written: u64 = 0;
    loop {
        let read = stream.reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        out.write_all(&buffer[..read])?;
        written += read as u64;
    }
    out.flush()?;
    Ok(written)
}
