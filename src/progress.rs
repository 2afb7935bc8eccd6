//! Progress-callback trait for per-folder restructuring events.
//!
//! Inject an [`Arc<dyn RestructureProgressCallback>`] via
//! [`crate::config::RestructureConfigBuilder::progress_callback`] to receive
//! events as the orchestrator walks the target directory.
//!
//! The callback is the only integration point between the core and whatever
//! displays status (terminal bar, log pane, job record). The core has no
//! opinion on how events are rendered.
//!
//! # Example
//!
//! ```rust
//! use edgequake_md_restructure::{on_document, RestructureConfig};
//!
//! let config = RestructureConfig::builder()
//!     .progress_callback(on_document(|path| eprintln!("processed: {}", path.display())))
//!     .build()
//!     .unwrap();
//! ```

use crate::error::FolderError;
use crate::output::SkipReason;
use std::path::Path;
use std::sync::Arc;

/// Called by the orchestrator as it processes each conversion folder.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Folders are processed one at a time, so calls never
/// overlap, but the trait is `Send + Sync` because a run may be moved onto a
/// background thread (see [`crate::restructure::restructure_folders_async`]).
pub trait RestructureProgressCallback: Send + Sync {
    /// Called once after the target directory has been listed.
    ///
    /// # Arguments
    /// * `total_folders`: number of subdirectories that will be examined
    fn on_run_start(&self, total_folders: usize) {
        let _ = total_folders;
    }

    /// Called once per successfully processed document.
    ///
    /// # Arguments
    /// * `document`: final path of the renamed, rewritten document
    /// * `images_renamed`: number of image files renamed beside it
    fn on_document_complete(&self, document: &Path, images_renamed: usize) {
        let _ = (document, images_renamed);
    }

    /// Called when a folder is left alone (not a conversion folder, no
    /// primary document, no images).
    fn on_folder_skipped(&self, folder: &Path, reason: &SkipReason) {
        let _ = (folder, reason);
    }

    /// Called when a folder fails. The run continues with the next folder.
    fn on_folder_error(&self, folder: &Path, error: &FolderError) {
        let _ = (folder, error);
    }

    /// Called once after every folder has been attempted.
    ///
    /// # Arguments
    /// * `processed`: documents that were fully processed
    /// * `failed`: folders that hit a [`FolderError`]
    fn on_run_complete(&self, processed: usize, failed: usize) {
        let _ = (processed, failed);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl RestructureProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RestructureConfig`].
pub type ProgressCallback = Arc<dyn RestructureProgressCallback>;

/// Adapter that forwards only `on_document_complete` to a closure.
pub struct DocumentCallback<F>(F);

impl<F> RestructureProgressCallback for DocumentCallback<F>
where
    F: Fn(&Path) + Send + Sync,
{
    fn on_document_complete(&self, document: &Path, _images_renamed: usize) {
        (self.0)(document)
    }
}

/// Wrap a closure that receives each processed document's final path.
pub fn on_document<F>(f: F) -> ProgressCallback
where
    F: Fn(&Path) + Send + Sync + 'static,
{
    Arc::new(DocumentCallback(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct TrackingCallback {
        completes: AtomicUsize,
        skips: AtomicUsize,
        errors: AtomicUsize,
        started_total: AtomicUsize,
    }

    impl RestructureProgressCallback for TrackingCallback {
        fn on_run_start(&self, total_folders: usize) {
            self.started_total.store(total_folders, Ordering::SeqCst);
        }

        fn on_document_complete(&self, _document: &Path, _images_renamed: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_folder_skipped(&self, _folder: &Path, _reason: &SkipReason) {
            self.skips.fetch_add(1, Ordering::SeqCst);
        }

        fn on_folder_error(&self, _folder: &Path, _error: &FolderError) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_run_start(3);
        cb.on_document_complete(Path::new("a/A.md"), 2);
        cb.on_folder_skipped(Path::new("notes"), &SkipReason::NotAConversionFolder);
        cb.on_run_complete(1, 0);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            completes: AtomicUsize::new(0),
            skips: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            started_total: AtomicUsize::new(0),
        };

        tracker.on_run_start(3);
        tracker.on_document_complete(Path::new("a/A.md"), 1);
        tracker.on_folder_skipped(Path::new("notes"), &SkipReason::NotAConversionFolder);
        tracker.on_folder_error(
            Path::new("b.pdf-x"),
            &FolderError::ListImages {
                dir: PathBuf::from("b.pdf-x/images"),
                detail: "denied".into(),
            },
        );

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.skips.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn closure_adapter_sees_document_paths() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let cb = on_document(move |p| sink.lock().unwrap().push(p.to_path_buf()));

        cb.on_run_start(2);
        cb.on_document_complete(Path::new("x/X.md"), 4);
        cb.on_folder_skipped(Path::new("y"), &SkipReason::MissingPrimaryDocument);

        assert_eq!(*seen.lock().unwrap(), vec![PathBuf::from("x/X.md")]);
    }
}
