//! Path resolution: the cheapest strategy that yields a local path wins.
//!
//! Providers expose wildly inconsistent guarantees. Some references encode a
//! path directly, some carry a row ID whose table exposes a path column, and
//! some have no path at all outside the provider's process and must be
//! materialized. The chain below tries cheapest/most-reliable first, and a
//! failed strategy degrades to the next one instead of failing outward.

use crate::classify::{classify_authority, is_document_reference, MediaKind, ProviderKind};
use crate::materialize::{materialize, CacheDir};
use crate::provider::{ProviderClient, RowSelection};
use crate::reference::ContentReference;
use std::path::{Path, PathBuf};

/// Resolution strategy for a reference, decided once before any I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Strategy {
    /// `<volume>:<relative>` document ID; path derives from the primary
    /// external-storage root.
    ExternalStorageDocument { relative: String },
    /// No stable direct path; materialize into the cache.
    DownloadsDocument,
    /// `<mediaType>:<rowId>` document ID; the media table's path column has
    /// the answer.
    MediaDocument { kind: MediaKind, row_id: String },
    /// The trailing segment is itself the usable (remote) identifier.
    GooglePhotosSegment,
    /// Unstructured "content" reference: materialize, else path column.
    GeneralContent,
    /// The path component is already a local path.
    FilePath,
    Unsupported,
}

fn strategy_for(reference: &ContentReference) -> Strategy {
    if is_document_reference(reference) {
        match classify_authority(reference) {
            ProviderKind::ExternalStorage => {
                match reference
                    .document_id()
                    .and_then(|id| id.split_once(':').map(|(_, rel)| rel.to_string()))
                {
                    Some(relative) => Strategy::ExternalStorageDocument { relative },
                    None => Strategy::Unsupported,
                }
            }
            ProviderKind::Downloads => Strategy::DownloadsDocument,
            ProviderKind::Media(Some(kind)) => {
                match reference
                    .document_id()
                    .and_then(|id| id.split_once(':').map(|(_, row)| row.to_string()))
                {
                    Some(row_id) => Strategy::MediaDocument { kind, row_id },
                    None => Strategy::GeneralContent,
                }
            }
            // Media ID without a recognized type prefix: defer to the
            // general-content fallback rather than rejecting.
            ProviderKind::Media(None) => Strategy::GeneralContent,
            // Document references from other authorities have no known
            // derivation.
            ProviderKind::GooglePhotos | ProviderKind::Unrecognized => Strategy::Unsupported,
        }
    } else if reference.scheme() == "content" {
        match classify_authority(reference) {
            ProviderKind::GooglePhotos => Strategy::GooglePhotosSegment,
            _ => Strategy::GeneralContent,
        }
    } else if reference.scheme() == "file" {
        Strategy::FilePath
    } else {
        Strategy::Unsupported
    }
}

/// Resolves a reference to a local filesystem path.
///
/// Never fails outward: unsupported or unresolvable references yield `None`.
/// Failed strategies log at debug and degrade to the next one. The
/// GooglePhotos result is the reference's trailing segment verbatim, a
/// usable remote identifier rather than a local file path.
pub fn resolve_path<P: ProviderClient>(
    provider: &P,
    cache: &CacheDir,
    external_root: &Path,
    reference: &ContentReference,
) -> Option<PathBuf> {
    match strategy_for(reference) {
        // Only the primary volume is supported; the volume tag is parsed
        // but the relative path always joins the configured primary root.
        Strategy::ExternalStorageDocument { relative } => Some(external_root.join(relative)),
        Strategy::DownloadsDocument => materialize_or_none(provider, cache, reference),
        Strategy::MediaDocument { kind, row_id } => media_collection(kind).and_then(|table| {
            data_column_or_none(provider, &table, Some(&RowSelection::by_id(row_id)))
        }),
        Strategy::GooglePhotosSegment => reference.last_segment().map(PathBuf::from),
        Strategy::GeneralContent => materialize_or_none(provider, cache, reference)
            .or_else(|| data_column_or_none(provider, reference, None)),
        Strategy::FilePath => Some(PathBuf::from(reference.path())),
        Strategy::Unsupported => None,
    }
}

fn materialize_or_none<P: ProviderClient>(
    provider: &P,
    cache: &CacheDir,
    reference: &ContentReference,
) -> Option<PathBuf> {
    match materialize(provider, cache, reference) {
        Ok(path) => Some(path),
        Err(err) => {
            tracing::debug!(
                reference = %reference,
                error = %err,
                "materialization unavailable, trying next strategy"
            );
            None
        }
    }
}

fn data_column_or_none<P: ProviderClient>(
    provider: &P,
    reference: &ContentReference,
    selection: Option<&RowSelection>,
) -> Option<PathBuf> {
    match provider.data_column(reference, selection) {
        Ok(Some(path)) => Some(PathBuf::from(path)),
        Ok(None) => None,
        Err(err) => {
            tracing::debug!(reference = %reference, error = %err, "path column query failed");
            None
        }
    }
}

/// Well-known table reference for a media kind's external collection.
fn media_collection(kind: MediaKind) -> Option<ContentReference> {
    let raw = match kind {
        MediaKind::Image => "content://media/external/images/media",
        MediaKind::Video => "content://media/external/video/media",
        MediaKind::Audio => "content://media/external/audio/media",
    };
    ContentReference::parse(raw).ok()
}
