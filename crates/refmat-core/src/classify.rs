//! Authority classification for content references.
//!
//! Pure inspection only: these functions look at a reference's scheme,
//! authority and identifier token and decide which resolution strategy
//! family applies. No I/O, no failure case.

use crate::reference::ContentReference;

/// Authority of the external-storage document provider.
pub const EXTERNAL_STORAGE_AUTHORITY: &str = "com.android.externalstorage.documents";
/// Authority of the downloads document provider.
pub const DOWNLOADS_AUTHORITY: &str = "com.android.providers.downloads.documents";
/// Authority of the media document provider.
pub const MEDIA_AUTHORITY: &str = "com.android.providers.media.documents";
/// Authority of the Google Photos provider.
pub const GOOGLE_PHOTOS_AUTHORITY: &str = "com.google.android.apps.photos.content";

/// Media table family addressed by a media document ID's type prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }

    /// Maps a document ID type prefix to a media kind, if recognized.
    pub fn from_type_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "image" => Some(MediaKind::Image),
            "video" => Some(MediaKind::Video),
            "audio" => Some(MediaKind::Audio),
            _ => None,
        }
    }
}

/// Issuing authority of a content reference.
///
/// The media variant carries the media kind parsed from the document ID's
/// type prefix; `Media(None)` is a media-authority reference whose ID has no
/// recognizable prefix, which the resolver sends down the general-content
/// fallback chain rather than rejecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    ExternalStorage,
    Downloads,
    Media(Option<MediaKind>),
    GooglePhotos,
    Unrecognized,
}

/// True iff the reference follows the structured document-provider
/// convention: "content" scheme, an authority, and a colon-delimited
/// identifier token.
///
/// A token without the colon-delimited type prefix is deliberately *not* a
/// document reference; such references are dispatched to the resolver's
/// data-column fallback instead of being rejected.
pub fn is_document_reference(reference: &ContentReference) -> bool {
    reference.scheme() == "content"
        && reference.authority().is_some()
        && reference
            .document_id()
            .map(|id| id.contains(':'))
            .unwrap_or(false)
}

/// Maps a reference's authority to the closed provider set.
///
/// Total: unknown authorities (or none at all) map to `Unrecognized`.
pub fn classify_authority(reference: &ContentReference) -> ProviderKind {
    match reference.authority() {
        Some(EXTERNAL_STORAGE_AUTHORITY) => ProviderKind::ExternalStorage,
        Some(DOWNLOADS_AUTHORITY) => ProviderKind::Downloads,
        Some(MEDIA_AUTHORITY) => {
            let kind = reference
                .document_id()
                .and_then(|id| id.split(':').next().and_then(MediaKind::from_type_prefix));
            ProviderKind::Media(kind)
        }
        Some(GOOGLE_PHOTOS_AUTHORITY) => ProviderKind::GooglePhotos,
        _ => ProviderKind::Unrecognized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> ContentReference {
        ContentReference::parse(s).unwrap()
    }

    #[test]
    fn classify_known_authorities() {
        assert_eq!(
            classify_authority(&parse(
                "content://com.android.externalstorage.documents/document/primary:Download"
            )),
            ProviderKind::ExternalStorage
        );
        assert_eq!(
            classify_authority(&parse(
                "content://com.android.providers.downloads.documents/document/msf%3A12"
            )),
            ProviderKind::Downloads
        );
        assert_eq!(
            classify_authority(&parse(
                "content://com.google.android.apps.photos.content/0/remote"
            )),
            ProviderKind::GooglePhotos
        );
    }

    #[test]
    fn classify_media_kinds() {
        assert_eq!(
            classify_authority(&parse(
                "content://com.android.providers.media.documents/document/image%3A42"
            )),
            ProviderKind::Media(Some(MediaKind::Image))
        );
        assert_eq!(
            classify_authority(&parse(
                "content://com.android.providers.media.documents/document/audio%3A7"
            )),
            ProviderKind::Media(Some(MediaKind::Audio))
        );
        // Unknown type prefix stays classified as media but with no kind;
        // the resolver falls back rather than rejecting.
        assert_eq!(
            classify_authority(&parse(
                "content://com.android.providers.media.documents/document/document%3A9"
            )),
            ProviderKind::Media(None)
        );
    }

    #[test]
    fn classify_unknown_authority() {
        assert_eq!(
            classify_authority(&parse("content://com.example.cloud/document/abc%3A1")),
            ProviderKind::Unrecognized
        );
        assert_eq!(
            classify_authority(&parse("file:///tmp/x.png")),
            ProviderKind::Unrecognized
        );
    }

    #[test]
    fn document_reference_requires_colon_token() {
        assert!(is_document_reference(&parse(
            "content://com.android.externalstorage.documents/document/primary%3ADownload"
        )));
        // Colonless token: not a structured document reference.
        assert!(!is_document_reference(&parse(
            "content://com.android.providers.downloads.documents/document/1234"
        )));
        // No document segment at all.
        assert!(!is_document_reference(&parse(
            "content://media/external/images/media/33"
        )));
        assert!(!is_document_reference(&parse("file:///tmp/x.png")));
    }
}
