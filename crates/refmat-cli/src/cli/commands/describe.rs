use anyhow::{Context, Result};
use refmat_core::config::{self, RefmatConfig};
use refmat_core::describe::{describe, ResourceDescriptor};
use refmat_core::materialize::CacheDir;
use refmat_core::reference::ContentReference;
use std::path::Path;

pub fn run_describe(
    cfg: &RefmatConfig,
    references: &[String],
    manifest: Option<&Path>,
    json: bool,
) -> Result<()> {
    let provider = super::load_provider(manifest)?;
    let cache = CacheDir::new(config::cache_dir(cfg)?);

    let mut descriptors = Vec::with_capacity(references.len());
    for raw in references {
        let reference = ContentReference::parse(raw)?;
        let descriptor = describe(&provider, &cache, &cfg.external_storage_root, &reference)
            .with_context(|| format!("failed to describe {raw}"))?;
        descriptors.push(descriptor);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&descriptors)?);
    } else {
        for descriptor in &descriptors {
            print_descriptor(descriptor);
        }
    }
    Ok(())
}

fn print_descriptor(descriptor: &ResourceDescriptor) {
    println!("{}", descriptor.original);
    println!("  name: {}", descriptor.display_name.as_deref().unwrap_or("-"));
    println!(
        "  type: {}",
        if descriptor.mime_type.is_empty() {
            "-"
        } else {
            descriptor.mime_type.as_str()
        }
    );
    println!("  size: {}", descriptor.size_bytes);
    println!("  copy: {}", descriptor.uri);
    match &descriptor.resolved_path {
        Some(path) => println!("  path: {}", path.display()),
        None => println!("  path: -"),
    }
}
