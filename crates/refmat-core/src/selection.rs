//! Selection-surface boundary and the pick session.
//!
//! The surface that lets a user pick resources is an external collaborator;
//! only its boundary is specified here. The session turns one selection
//! round into descriptors, processing references sequentially and holding at
//! most one request in flight by construction.

use crate::describe::{describe, ResourceDescriptor};
use crate::materialize::{CacheDir, MaterializeError};
use crate::provider::ProviderClient;
use crate::reference::ContentReference;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// What the caller asks the surface for.
#[derive(Debug, Clone, Default)]
pub struct SelectionRequest {
    /// MIME-type filters; empty means any type.
    pub mime_filters: Vec<String>,
    /// Allow picking more than one resource.
    pub multiple: bool,
}

/// What the surface reports back.
#[derive(Debug, Clone)]
pub enum Selection {
    /// Zero or more picked references, in pick order.
    Picked(Vec<ContentReference>),
    /// The user dismissed the surface.
    Canceled,
}

/// Failures on the surface's side of the boundary.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("no active host surface to initiate selection")]
    NoActiveContext,
    #[error("selection surface unavailable: {reason}")]
    Unavailable { reason: String },
}

/// The UI trigger that lets a user select one or more resources.
pub trait SelectionSurface {
    fn select(&self, request: &SelectionRequest) -> Result<Selection, SelectionError>;
}

/// Failures of a whole pick round. Cancellation is not an error; it is a
/// [`PickOutcome`].
#[derive(Debug, Error)]
pub enum PickError {
    #[error("no active host surface to initiate selection")]
    NoActiveContext,
    #[error("selection surface unavailable: {reason}")]
    SurfaceUnavailable { reason: String },
    #[error("selection surface returned no usable references")]
    InvalidResult,
    #[error("a pick request is already in flight")]
    RequestInFlight,
    #[error("materialization failed")]
    Materialize(#[from] MaterializeError),
}

/// Outcome of a successful pick round.
#[derive(Debug)]
pub enum PickOutcome {
    /// Descriptors for the picked references, in pick order. Non-empty.
    Documents(Vec<ResourceDescriptor>),
    /// The user dismissed the surface.
    Canceled,
}

/// One selection surface plus the resolution machinery behind it.
///
/// At most one request is outstanding at a time: a second `pick` while one
/// is pending is rejected with [`PickError::RequestInFlight`] instead of
/// clobbering pending state.
pub struct PickSession<P, S> {
    provider: P,
    surface: S,
    cache: CacheDir,
    external_root: PathBuf,
    in_flight: AtomicBool,
}

impl<P: ProviderClient, S: SelectionSurface> PickSession<P, S> {
    pub fn new(
        provider: P,
        surface: S,
        cache: CacheDir,
        external_root: impl Into<PathBuf>,
    ) -> Self {
        PickSession {
            provider,
            surface,
            cache,
            external_root: external_root.into(),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Runs one selection round: trigger the surface, then resolve and
    /// describe every picked reference in order.
    ///
    /// A reference whose materialization fails is logged and skipped; the
    /// rest of the batch still resolves. Only when every reference of a
    /// non-empty batch fails is the first failure surfaced.
    pub fn pick(&self, request: &SelectionRequest) -> Result<PickOutcome, PickError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(PickError::RequestInFlight);
        }
        let _guard = InFlightGuard {
            flag: &self.in_flight,
        };
        self.run(request)
    }

    fn run(&self, request: &SelectionRequest) -> Result<PickOutcome, PickError> {
        let selection = self.surface.select(request).map_err(|err| match err {
            SelectionError::NoActiveContext => PickError::NoActiveContext,
            SelectionError::Unavailable { reason } => PickError::SurfaceUnavailable { reason },
        })?;

        let references = match selection {
            Selection::Canceled => return Ok(PickOutcome::Canceled),
            Selection::Picked(references) => references,
        };
        if references.is_empty() {
            return Err(PickError::InvalidResult);
        }

        let mut descriptors = Vec::with_capacity(references.len());
        let mut first_failure: Option<MaterializeError> = None;
        for reference in &references {
            match describe(&self.provider, &self.cache, &self.external_root, reference) {
                Ok(descriptor) => descriptors.push(descriptor),
                Err(err) => {
                    tracing::warn!(
                        reference = %reference,
                        error = %err,
                        "skipping reference: materialization failed"
                    );
                    if first_failure.is_none() {
                        first_failure = Some(err);
                    }
                }
            }
        }

        match (descriptors.is_empty(), first_failure) {
            (true, Some(failure)) => Err(PickError::Materialize(failure)),
            (true, None) => Err(PickError::InvalidResult),
            (false, _) => Ok(PickOutcome::Documents(descriptors)),
        }
    }
}

struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::manifest::{ManifestProvider, ManifestRow};
    use std::path::Path;
    use std::sync::mpsc;
    use std::sync::Arc;

    struct FixedSurface(Selection);

    impl SelectionSurface for FixedSurface {
        fn select(&self, _: &SelectionRequest) -> Result<Selection, SelectionError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSurface;

    impl SelectionSurface for FailingSurface {
        fn select(&self, _: &SelectionRequest) -> Result<Selection, SelectionError> {
            Err(SelectionError::Unavailable {
                reason: "no picker installed".to_string(),
            })
        }
    }

    fn reference(n: u32) -> ContentReference {
        ContentReference::parse(&format!(
            "content://com.android.providers.downloads.documents/document/msf%3A{n}"
        ))
        .unwrap()
    }

    fn provider_for(dir: &Path, names: &[(u32, &str)]) -> ManifestProvider {
        let rows = names
            .iter()
            .map(|(n, name)| {
                let payload = dir.join(format!("payload-{n}"));
                std::fs::write(&payload, name.as_bytes()).unwrap();
                ManifestRow {
                    reference: reference(*n).to_string(),
                    display_name: Some(name.to_string()),
                    source: Some(payload),
                    ..Default::default()
                }
            })
            .collect();
        ManifestProvider::from_rows(rows, dir)
    }

    fn session_with(
        provider: ManifestProvider,
        surface: impl SelectionSurface,
        dir: &Path,
    ) -> PickSession<ManifestProvider, impl SelectionSurface> {
        PickSession::new(
            provider,
            surface,
            CacheDir::new(dir.join("cached")),
            "/storage/emulated/0",
        )
    }

    #[test]
    fn batch_preserves_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider_for(dir.path(), &[(1, "a.txt"), (2, "b.txt"), (3, "c.txt")]);
        let surface = FixedSurface(Selection::Picked(vec![
            reference(1),
            reference(2),
            reference(3),
        ]));
        let session = session_with(provider, surface, dir.path());

        match session.pick(&SelectionRequest::default()).unwrap() {
            PickOutcome::Documents(descriptors) => {
                let names: Vec<_> = descriptors
                    .iter()
                    .map(|d| d.display_name.clone().unwrap())
                    .collect();
                assert_eq!(names, ["a.txt", "b.txt", "c.txt"]);
            }
            PickOutcome::Canceled => panic!("expected documents"),
        }
    }

    #[test]
    fn cancel_is_an_outcome_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with(ManifestProvider::empty(), FixedSurface(Selection::Canceled), dir.path());
        assert!(matches!(
            session.pick(&SelectionRequest::default()).unwrap(),
            PickOutcome::Canceled
        ));
    }

    #[test]
    fn empty_selection_is_invalid_result() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with(
            ManifestProvider::empty(),
            FixedSurface(Selection::Picked(Vec::new())),
            dir.path(),
        );
        assert!(matches!(
            session.pick(&SelectionRequest::default()),
            Err(PickError::InvalidResult)
        ));
    }

    #[test]
    fn one_bad_reference_does_not_abort_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        // Row 2 is never declared, so its materialization fails.
        let provider = provider_for(dir.path(), &[(1, "a.txt"), (3, "c.txt")]);
        let surface = FixedSurface(Selection::Picked(vec![
            reference(1),
            reference(2),
            reference(3),
        ]));
        let session = session_with(provider, surface, dir.path());

        match session.pick(&SelectionRequest::default()).unwrap() {
            PickOutcome::Documents(descriptors) => {
                let names: Vec<_> = descriptors
                    .iter()
                    .map(|d| d.display_name.clone().unwrap())
                    .collect();
                assert_eq!(names, ["a.txt", "c.txt"]);
            }
            PickOutcome::Canceled => panic!("expected documents"),
        }
    }

    #[test]
    fn all_references_failing_surfaces_the_first_cause() {
        let dir = tempfile::tempdir().unwrap();
        let surface = FixedSurface(Selection::Picked(vec![reference(1), reference(2)]));
        let session = session_with(ManifestProvider::empty(), surface, dir.path());
        assert!(matches!(
            session.pick(&SelectionRequest::default()),
            Err(PickError::Materialize(_))
        ));
    }

    #[test]
    fn surface_errors_map_to_pick_errors() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with(ManifestProvider::empty(), FailingSurface, dir.path());
        assert!(matches!(
            session.pick(&SelectionRequest::default()),
            Err(PickError::SurfaceUnavailable { .. })
        ));
    }

    /// Surface that parks inside `select` until released, so a second pick
    /// can be issued while the first is genuinely pending.
    struct ParkedSurface {
        entered: std::sync::Mutex<mpsc::Sender<()>>,
        release: std::sync::Mutex<mpsc::Receiver<()>>,
    }

    impl SelectionSurface for ParkedSurface {
        fn select(&self, _: &SelectionRequest) -> Result<Selection, SelectionError> {
            self.entered.lock().unwrap().send(()).unwrap();
            self.release.lock().unwrap().recv().unwrap();
            Ok(Selection::Canceled)
        }
    }

    #[test]
    fn second_pick_while_pending_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let surface = ParkedSurface {
            entered: std::sync::Mutex::new(entered_tx),
            release: std::sync::Mutex::new(release_rx),
        };
        let session = Arc::new(session_with(ManifestProvider::empty(), surface, dir.path()));

        let first = {
            let session = Arc::clone(&session);
            std::thread::spawn(move || session.pick(&SelectionRequest::default()))
        };
        entered_rx.recv().unwrap();

        assert!(matches!(
            session.pick(&SelectionRequest::default()),
            Err(PickError::RequestInFlight)
        ));

        release_tx.send(()).unwrap();
        assert!(matches!(
            first.join().unwrap().unwrap(),
            PickOutcome::Canceled
        ));
    }
}
