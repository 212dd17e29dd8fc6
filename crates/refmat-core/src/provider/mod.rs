//! Provider seam: the queryable storage provider behind content references.
//!
//! The engine only depends on the [`ProviderClient`] trait and does not know
//! which host environment actually serves the rows and byte streams.

pub mod manifest;

pub use manifest::ManifestProvider;

use crate::reference::ContentReference;
use std::io::Read;
use thiserror::Error;

/// Column exposing a direct filesystem path on row-based providers.
pub const DATA_COLUMN: &str = "_data";
/// Row ID column used in equality selections.
pub const ID_COLUMN: &str = "_id";

/// Failures surfaced by a provider backend.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no row for reference `{reference}`")]
    RowNotFound { reference: String },
    #[error("authority `{authority}` is not served by this provider")]
    UnsupportedAuthority { authority: String },
    #[error("no byte stream behind reference `{reference}`")]
    NoStream { reference: String },
    #[error("provider I/O failure for `{reference}`")]
    Io {
        reference: String,
        #[source]
        source: std::io::Error,
    },
}

/// Queryable attributes of the single row a reference addresses.
#[derive(Debug, Clone, Default)]
pub struct RowAttributes {
    pub display_name: Option<String>,
    pub size_bytes: Option<u64>,
    /// Structured document MIME column, when the provider exposes one.
    pub mime_type: Option<String>,
}

/// `<column> = <value>` equality selection against a row table.
#[derive(Debug, Clone)]
pub struct RowSelection {
    pub column: &'static str,
    pub value: String,
}

impl RowSelection {
    /// Selects the row whose `_id` equals `value`.
    pub fn by_id(value: impl Into<String>) -> Self {
        RowSelection {
            column: ID_COLUMN,
            value: value.into(),
        }
    }
}

/// An open read stream on a reference's bytes, plus the provider's
/// available-bytes hint (drives copy buffer sizing).
pub struct ProviderStream {
    pub reader: Box<dyn Read>,
    pub available: Option<u64>,
}

/// A storage provider that can be queried about, and opened for, the
/// resources it issued references to.
///
/// Each reference is assumed to address exactly one row; queries act on the
/// first (only) row.
pub trait ProviderClient {
    /// Display name, size and document MIME column of the referenced row.
    fn attributes(&self, reference: &ContentReference) -> Result<RowAttributes, ProviderError>;

    /// Value of the `_data` column for the referenced row, or for the row
    /// matched by `selection` when the reference addresses a whole table.
    fn data_column(
        &self,
        reference: &ContentReference,
        selection: Option<&RowSelection>,
    ) -> Result<Option<String>, ProviderError>;

    /// MIME type as reported by the provider's type-resolution call.
    fn content_type(&self, reference: &ContentReference)
        -> Result<Option<String>, ProviderError>;

    /// Opens the referenced bytes for reading.
    fn open(&self, reference: &ContentReference) -> Result<ProviderStream, ProviderError>;
}
