use anyhow::Result;
use refmat_core::config::{self, RefmatConfig};
use refmat_core::materialize::CacheDir;
use refmat_core::reference::ContentReference;
use refmat_core::selection::{
    PickOutcome, PickSession, Selection, SelectionError, SelectionRequest, SelectionSurface,
};
use std::path::Path;

/// Selection surface backed by the command-line arguments: the listed
/// references are what the user "picked", `--cancel` is the dismiss signal.
struct ArgsSurface {
    references: Vec<ContentReference>,
    cancel: bool,
}

impl SelectionSurface for ArgsSurface {
    fn select(&self, _request: &SelectionRequest) -> Result<Selection, SelectionError> {
        if self.cancel {
            Ok(Selection::Canceled)
        } else {
            Ok(Selection::Picked(self.references.clone()))
        }
    }
}

pub fn run_pick(
    cfg: &RefmatConfig,
    references: &[String],
    manifest: Option<&Path>,
    types: Vec<String>,
    multiple: bool,
    cancel: bool,
) -> Result<()> {
    let references = references
        .iter()
        .map(|raw| ContentReference::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let provider = super::load_provider(manifest)?;
    let cache = CacheDir::new(config::cache_dir(cfg)?);

    let session = PickSession::new(
        provider,
        ArgsSurface { references, cancel },
        cache,
        cfg.external_storage_root.clone(),
    );
    let request = SelectionRequest {
        mime_filters: types,
        multiple,
    };

    match session.pick(&request)? {
        PickOutcome::Documents(descriptors) => {
            println!("{}", serde_json::to_string_pretty(&descriptors)?);
        }
        PickOutcome::Canceled => println!("selection canceled"),
    }
    Ok(())
}
