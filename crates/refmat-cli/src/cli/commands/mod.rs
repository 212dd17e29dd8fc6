//! Command implementations for the refmat CLI.

mod completions;
mod describe;
mod pick;
mod resolve;

pub use completions::run_completions;
pub use describe::run_describe;
pub use pick::run_pick;
pub use resolve::run_resolve;

use anyhow::Result;
use refmat_core::provider::ManifestProvider;
use std::path::Path;

/// Provider backing the run: the given manifest, or one serving no rows
/// (direct-derivation strategies still work without any).
pub(crate) fn load_provider(manifest: Option<&Path>) -> Result<ManifestProvider> {
    match manifest {
        Some(path) => ManifestProvider::load(path),
        None => Ok(ManifestProvider::empty()),
    }
}
