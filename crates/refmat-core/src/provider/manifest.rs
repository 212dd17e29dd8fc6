//! TOML-backed provider rows for driving the engine outside a real host.
//!
//! A manifest file declares the rows a provider would serve, so the resolver
//! and materializer can be exercised from the CLI and from tests:
//!
//! ```toml
//! [[row]]
//! reference = "content://com.android.providers.downloads.documents/document/msf%3A12"
//! display_name = "report.pdf"
//! mime = "application/pdf"
//! source = "payloads/report.pdf"
//!
//! [[row]]
//! reference = "content://media/external/images/media"
//! id = "42"
//! data = "/storage/emulated/0/DCIM/cat.jpg"
//! ```
//!
//! `source` is the backing file for the byte stream, relative to the
//! manifest's directory. `data` is the value of the `_data` column. `id`
//! makes the row matchable by an `_id` selection against a table reference.

use super::{ProviderClient, ProviderError, ProviderStream, RowAttributes, RowSelection};
use crate::reference::ContentReference;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One declared provider row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestRow {
    /// Full reference string this row answers for.
    pub reference: String,
    /// Row ID for `_id` selections against a table reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Authoritative size; defaults to the backing file's length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    /// Backing file for the byte stream, relative to the manifest directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// `_data` column value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ManifestFile {
    #[serde(default, rename = "row")]
    rows: Vec<ManifestRow>,
}

/// A [`ProviderClient`] serving rows declared in a TOML manifest.
#[derive(Debug, Default)]
pub struct ManifestProvider {
    rows: Vec<ManifestRow>,
    base_dir: PathBuf,
}

impl ManifestProvider {
    /// A provider serving no rows at all. Direct-derivation strategies
    /// (file paths, external-storage documents) still work without one.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads a manifest file; relative `source` paths resolve against the
    /// manifest's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read provider manifest {}", path.display()))?;
        let parsed: ManifestFile = toml::from_str(&data)
            .with_context(|| format!("malformed provider manifest {}", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
        Ok(ManifestProvider {
            rows: parsed.rows,
            base_dir,
        })
    }

    /// Builds a provider from in-memory rows; relative `source` paths
    /// resolve against `base_dir`.
    pub fn from_rows(rows: Vec<ManifestRow>, base_dir: impl Into<PathBuf>) -> Self {
        ManifestProvider {
            rows,
            base_dir: base_dir.into(),
        }
    }

    fn find(
        &self,
        reference: &ContentReference,
        selection: Option<&RowSelection>,
    ) -> Option<&ManifestRow> {
        self.rows.iter().find(|row| {
            row.reference == reference.as_str()
                && match selection {
                    Some(sel) => {
                        sel.column == super::ID_COLUMN
                            && row.id.as_deref() == Some(sel.value.as_str())
                    }
                    None => true,
                }
        })
    }

    fn source_path(&self, row: &ManifestRow) -> Option<PathBuf> {
        row.source.as_ref().map(|src| {
            if src.is_absolute() {
                src.clone()
            } else {
                self.base_dir.join(src)
            }
        })
    }

    fn guessed_mime(&self, row: &ManifestRow) -> Option<String> {
        let candidate = self
            .source_path(row)
            .or_else(|| row.display_name.as_ref().map(PathBuf::from))?;
        mime_guess::from_path(candidate)
            .first_raw()
            .map(str::to_string)
    }
}

impl ProviderClient for ManifestProvider {
    fn attributes(&self, reference: &ContentReference) -> Result<RowAttributes, ProviderError> {
        let row = self
            .find(reference, None)
            .ok_or_else(|| ProviderError::RowNotFound {
                reference: reference.to_string(),
            })?;
        let size_bytes = row.size.or_else(|| {
            self.source_path(row)
                .and_then(|p| fs::metadata(p).ok())
                .map(|m| m.len())
        });
        Ok(RowAttributes {
            display_name: row.display_name.clone(),
            size_bytes,
            mime_type: row.mime.clone(),
        })
    }

    fn data_column(
        &self,
        reference: &ContentReference,
        selection: Option<&RowSelection>,
    ) -> Result<Option<String>, ProviderError> {
        match self.find(reference, selection) {
            Some(row) => Ok(row.data.clone()),
            None => Err(ProviderError::RowNotFound {
                reference: reference.to_string(),
            }),
        }
    }

    fn content_type(
        &self,
        reference: &ContentReference,
    ) -> Result<Option<String>, ProviderError> {
        let row = self
            .find(reference, None)
            .ok_or_else(|| ProviderError::RowNotFound {
                reference: reference.to_string(),
            })?;
        Ok(row.mime.clone().or_else(|| self.guessed_mime(row)))
    }

    fn open(&self, reference: &ContentReference) -> Result<ProviderStream, ProviderError> {
        let row = self
            .find(reference, None)
            .ok_or_else(|| ProviderError::RowNotFound {
                reference: reference.to_string(),
            })?;
        let source = self
            .source_path(row)
            .ok_or_else(|| ProviderError::NoStream {
                reference: reference.to_string(),
            })?;
        let file = fs::File::open(&source).map_err(|source_err| ProviderError::Io {
            reference: reference.to_string(),
            source: source_err,
        })?;
        let available = file.metadata().ok().map(|m| m.len());
        Ok(ProviderStream {
            reader: Box::new(file),
            available,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    const DOWNLOAD_REF: &str =
        "content://com.android.providers.downloads.documents/document/msf%3A12";

    fn fixture(dir: &Path) -> ManifestProvider {
        fs::write(dir.join("report.pdf"), b"pdf bytes").unwrap();
        ManifestProvider::from_rows(
            vec![
                ManifestRow {
                    reference: DOWNLOAD_REF.to_string(),
                    display_name: Some("report.pdf".to_string()),
                    source: Some(PathBuf::from("report.pdf")),
                    ..Default::default()
                },
                ManifestRow {
                    reference: "content://media/external/images/media".to_string(),
                    id: Some("42".to_string()),
                    data: Some("/storage/emulated/0/DCIM/cat.jpg".to_string()),
                    ..Default::default()
                },
            ],
            dir,
        )
    }

    #[test]
    fn load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("rows.toml");
        fs::write(
            &manifest,
            r#"
                [[row]]
                reference = "content://x/document/a%3Ab"
                display_name = "a.txt"
                size = 3
                mime = "text/plain"
            "#,
        )
        .unwrap();
        let provider = ManifestProvider::load(&manifest).unwrap();
        let reference = ContentReference::parse("content://x/document/a%3Ab").unwrap();
        let attrs = provider.attributes(&reference).unwrap();
        assert_eq!(attrs.display_name.as_deref(), Some("a.txt"));
        assert_eq!(attrs.size_bytes, Some(3));
        assert_eq!(attrs.mime_type.as_deref(), Some("text/plain"));
    }

    #[test]
    fn size_defaults_to_backing_file_length() {
        let dir = tempfile::tempdir().unwrap();
        let provider = fixture(dir.path());
        let reference = ContentReference::parse(DOWNLOAD_REF).unwrap();
        let attrs = provider.attributes(&reference).unwrap();
        assert_eq!(attrs.size_bytes, Some(9));
    }

    #[test]
    fn data_column_requires_matching_id() {
        let dir = tempfile::tempdir().unwrap();
        let provider = fixture(dir.path());
        let table = ContentReference::parse("content://media/external/images/media").unwrap();
        let hit = provider
            .data_column(&table, Some(&RowSelection::by_id("42")))
            .unwrap();
        assert_eq!(hit.as_deref(), Some("/storage/emulated/0/DCIM/cat.jpg"));
        assert!(provider
            .data_column(&table, Some(&RowSelection::by_id("7")))
            .is_err());
    }

    #[test]
    fn content_type_guessed_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let provider = fixture(dir.path());
        let reference = ContentReference::parse(DOWNLOAD_REF).unwrap();
        assert_eq!(
            provider.content_type(&reference).unwrap().as_deref(),
            Some("application/pdf")
        );
    }

    #[test]
    fn open_streams_backing_file() {
        let dir = tempfile::tempdir().unwrap();
        let provider = fixture(dir.path());
        let reference = ContentReference::parse(DOWNLOAD_REF).unwrap();
        let mut stream = provider.open(&reference).unwrap();
        assert_eq!(stream.available, Some(9));
        let mut buf = Vec::new();
        stream.reader.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"pdf bytes");
    }

    #[test]
    fn unknown_reference_is_row_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let provider = fixture(dir.path());
        let reference = ContentReference::parse("content://other/document/x%3A1").unwrap();
        assert!(matches!(
            provider.attributes(&reference),
            Err(ProviderError::RowNotFound { .. })
        ));
    }
}
