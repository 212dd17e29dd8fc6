//! Metadata assembly: the descriptor returned for one resolved reference.

use crate::materialize::{materialize, CacheDir, MaterializeError};
use crate::provider::ProviderClient;
use crate::reference::ContentReference;
use crate::resolve::resolve_path;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Terminal record for one resolved reference. Constructed once, never
/// mutated; serialized field names are a stable contract.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceDescriptor {
    /// File URL of the materialized local copy.
    pub uri: String,
    #[serde(rename = "fileCopyUri")]
    pub file_copy_uri: String,
    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// MIME type; empty when neither the provider nor the document row
    /// knows one.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Provider-reported size, else the materialized copy's length, else 0.
    #[serde(rename = "size")]
    pub size_bytes: u64,
    /// Direct-resolution result for the same reference, when one exists.
    #[serde(rename = "fileUrl", skip_serializing_if = "Option::is_none")]
    pub resolved_path: Option<PathBuf>,
    /// The reference this descriptor was produced from.
    #[serde(skip)]
    pub original: ContentReference,
}

/// Resolves and describes one reference.
///
/// Every reference is materialized into the cache first, even when a direct
/// path exists: the caller always gets uniform local-file semantics at the
/// cost of the copy. A materialization failure fails the whole describe;
/// the metadata queries after it degrade instead (absent name, empty MIME,
/// size 0).
pub fn describe<P: ProviderClient>(
    provider: &P,
    cache: &CacheDir,
    external_root: &Path,
    reference: &ContentReference,
) -> Result<ResourceDescriptor, MaterializeError> {
    let local_copy = materialize(provider, cache, reference)?;
    let copied_len = std::fs::metadata(&local_copy).map(|m| m.len()).unwrap_or(0);
    let uri = file_url(&local_copy);

    let mime_type = provider
        .content_type(reference)
        .ok()
        .flatten()
        .or_else(|| {
            provider
                .attributes(reference)
                .ok()
                .and_then(|attrs| attrs.mime_type)
        })
        .unwrap_or_default();

    let attrs = provider.attributes(reference).unwrap_or_default();
    let size_bytes = attrs.size_bytes.unwrap_or(copied_len);

    let resolved_path = resolve_path(provider, cache, external_root, reference);

    Ok(ResourceDescriptor {
        file_copy_uri: uri.clone(),
        uri,
        display_name: attrs.display_name,
        mime_type,
        size_bytes,
        resolved_path,
        original: reference.clone(),
    })
}

/// `file://` URL for a local path.
fn file_url(path: &Path) -> String {
    match url::Url::from_file_path(path) {
        Ok(parsed) => parsed.to_string(),
        Err(()) => format!("file://{}", path.display()),
    }
}
