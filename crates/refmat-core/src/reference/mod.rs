//! Content-reference modeling.
//!
//! Parses provider-issued reference strings (`content://…`, `file://…`) into
//! an immutable value with decoded accessors for the scheme, authority, path,
//! last segment, and structured document ID.

mod decode;
mod sanitize;

pub use decode::percent_decode;
pub use sanitize::sanitize_display_name;

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Path segment that introduces a structured document ID.
const DOCUMENT_SEGMENT: &str = "document";

/// Failure to parse a reference string.
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("unparseable content reference `{raw}`")]
    Parse {
        raw: String,
        #[source]
        source: url::ParseError,
    },
}

/// An opaque, provider-issued resource identifier.
///
/// Immutable once parsed. Equality and hashing are by the full string form;
/// two references that render identically are the same resource.
#[derive(Debug, Clone)]
pub struct ContentReference {
    raw: String,
    scheme: String,
    authority: Option<String>,
    path: String,
    segments: Vec<String>,
}

impl ContentReference {
    /// Parses a reference string.
    ///
    /// Path segments are percent-decoded; the raw form is kept verbatim for
    /// equality and display.
    pub fn parse(raw: &str) -> Result<Self, ReferenceError> {
        let parsed = url::Url::parse(raw).map_err(|source| ReferenceError::Parse {
            raw: raw.to_string(),
            source,
        })?;
        let scheme = parsed.scheme().to_string();
        let authority = match parsed.host_str() {
            Some(host) if !host.is_empty() => Some(host.to_string()),
            _ => None,
        };
        let segments: Vec<String> = parsed
            .path_segments()
            .map(|parts| {
                parts
                    .filter(|p| !p.is_empty())
                    .map(percent_decode)
                    .collect()
            })
            .unwrap_or_default();
        let path = percent_decode(parsed.path());
        Ok(ContentReference {
            raw: raw.to_string(),
            scheme,
            authority,
            path,
            segments,
        })
    }

    /// The full reference string as given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Lowercased scheme ("content", "file", …).
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The provider-identifying authority, if the reference carries one.
    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    /// Decoded path component.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Decoded last non-empty path segment.
    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Decoded document ID for structured document references.
    ///
    /// The ID is everything after the last `document` path segment, covering
    /// both the `/document/<id>` and `/tree/<tree-id>/document/<id>` shapes.
    /// Returns `None` when the path has no such segment or nothing follows it.
    pub fn document_id(&self) -> Option<String> {
        let at = self
            .segments
            .iter()
            .rposition(|s| s == DOCUMENT_SEGMENT)?;
        let rest = &self.segments[at + 1..];
        if rest.is_empty() {
            return None;
        }
        Some(rest.join("/"))
    }
}

impl fmt::Display for ContentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for ContentReference {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for ContentReference {}

impl std::hash::Hash for ContentReference {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl FromStr for ContentReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
