use anyhow::Result;
use refmat_core::config::{self, RefmatConfig};
use refmat_core::materialize::CacheDir;
use refmat_core::reference::ContentReference;
use refmat_core::resolve::resolve_path;
use std::path::Path;

pub fn run_resolve(cfg: &RefmatConfig, reference: &str, manifest: Option<&Path>) -> Result<()> {
    let reference = ContentReference::parse(reference)?;
    let provider = super::load_provider(manifest)?;
    let cache = CacheDir::new(config::cache_dir(cfg)?);

    match resolve_path(&provider, &cache, &cfg.external_storage_root, &reference) {
        Some(path) => println!("{}", path.display()),
        None => println!("no path available"),
    }
    Ok(())
}
