//! Folder-level orchestration over a converter output directory.
//!
//! Each immediate subdirectory of the target is one unit of work:
//!
//! ```text
//! <name>.pdf…/full.md   ──rename──▶  <name>.pdf…/<name>.md
//! <name>.pdf…/images/*  ──assets──▶  <name>_01.jpg, <name>_02.png, …
//! ```
//!
//! Folders are processed one after another. A failure inside one folder is
//! recorded in the [`RunReport`] and the walk moves on; only a failure to
//! list the target itself aborts the run.
//!
//! Renames are destructive and not transactional. A second run over the same
//! directory finds no `full.md` and skips every folder it already handled.

use crate::config::RestructureConfig;
use crate::error::{FolderError, RestructureError};
use crate::output::{FolderOutcome, FolderResult, RunReport, SkipReason};
use crate::pipeline::{assets, discover};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Restructure every conversion folder directly inside `target`.
///
/// # Returns
/// `Ok(RunReport)` whenever the target could be listed, even if some folders
/// failed (check `report.stats.failed` or call
/// [`RunReport::into_result`]). Folders appear in directory iteration order,
/// which depends on the filesystem.
///
/// # Errors
/// Returns `Err(RestructureError)` only when `target` is missing, is not a
/// directory, or cannot be listed.
///
/// # Example
/// ```rust,no_run
/// use edgequake_md_restructure::{restructure_folders, RestructureConfig};
///
/// let config = RestructureConfig::default();
/// let report = restructure_folders("/data/converted", &config)?;
/// for doc in report.processed_documents() {
///     println!("{}", doc.display());
/// }
/// # Ok::<(), edgequake_md_restructure::RestructureError>(())
/// ```
pub fn restructure_folders(
    target: impl AsRef<Path>,
    config: &RestructureConfig,
) -> Result<RunReport, RestructureError> {
    let started = Instant::now();
    let target = target.as_ref();
    info!("Starting restructure: {}", target.display());

    let folders = list_subdirectories(target)?;
    debug!("Found {} subdirectories", folders.len());

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(folders.len());
    }

    let mut report = RunReport::default();
    report.stats.total_folders = folders.len();

    for folder in folders {
        let outcome = match process_folder(&folder, config) {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!("Processing folder {} failed: {}", folder.display(), error);
                FolderOutcome::Failed { error }
            }
        };

        if let Some(ref cb) = config.progress_callback {
            match &outcome {
                FolderOutcome::Processed {
                    document,
                    images_renamed,
                } => cb.on_document_complete(document, *images_renamed),
                FolderOutcome::Skipped { reason } => cb.on_folder_skipped(&folder, reason),
                FolderOutcome::Failed { error } => cb.on_folder_error(&folder, error),
            }
        }

        report.push(FolderResult { folder, outcome });
    }

    report.stats.duration_ms = started.elapsed().as_millis() as u64;
    info!(
        "Restructure complete: {} processed, {} skipped, {} failed, {}ms",
        report.stats.processed, report.stats.skipped, report.stats.failed, report.stats.duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(report.stats.processed, report.stats.failed);
    }

    Ok(report)
}

/// Run [`restructure_folders`] on tokio's blocking pool.
///
/// The core is synchronous file I/O; this keeps it off the async executor
/// for callers that drive it from an async UI or service.
pub async fn restructure_folders_async(
    target: impl AsRef<Path>,
    config: &RestructureConfig,
) -> Result<RunReport, RestructureError> {
    let target = target.as_ref().to_path_buf();
    let config = config.clone();
    tokio::task::spawn_blocking(move || restructure_folders(&target, &config))
        .await
        .map_err(|e| RestructureError::Internal(format!("restructure task failed: {e}")))?
}

/// Immediate subdirectories of `target`. Plain files are ignored.
fn list_subdirectories(target: &Path) -> Result<Vec<PathBuf>, RestructureError> {
    if !target.exists() {
        return Err(RestructureError::TargetNotFound {
            path: target.to_path_buf(),
        });
    }
    if !target.is_dir() {
        return Err(RestructureError::NotADirectory {
            path: target.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(target).map_err(|e| RestructureError::ReadDirFailed {
        path: target.to_path_buf(),
        source: e,
    })?;

    let mut folders = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_dir() {
                    folders.push(path);
                }
            }
            Err(e) => warn!("Skipping unreadable entry in {}: {}", target.display(), e),
        }
    }
    Ok(folders)
}

/// Rename the primary document and hand it to the asset stage.
fn process_folder(
    folder: &Path,
    config: &RestructureConfig,
) -> Result<FolderOutcome, FolderError> {
    let skipped = |reason: SkipReason| -> Result<FolderOutcome, FolderError> {
        debug!("Skipping {}: {}", folder.display(), reason);
        Ok(FolderOutcome::Skipped { reason })
    };

    let Some(base_name) = folder
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(discover::conversion_base_name)
    else {
        return skipped(SkipReason::NotAConversionFolder);
    };

    let source = folder.join(&config.primary_document_name);
    if !source.is_file() {
        return skipped(SkipReason::MissingPrimaryDocument);
    }

    let document = folder.join(format!("{base_name}.md"));
    std::fs::rename(&source, &document).map_err(|e| FolderError::RenameDocument {
        from: source.clone(),
        to: document.clone(),
        detail: e.to_string(),
    })?;
    debug!("Renamed {} -> {}", source.display(), document.display());

    let image_dir = folder.join(&config.image_dir_name);
    if !image_dir.is_dir() {
        return skipped(SkipReason::MissingImageDirectory { document });
    }

    let report = assets::rename_assets(&document, &image_dir, config)?;
    if report.is_empty() {
        return skipped(SkipReason::NoImages { document });
    }

    info!(
        "Processed {} ({} images)",
        document.display(),
        report.images_renamed
    );
    Ok(FolderOutcome::Processed {
        document,
        images_renamed: report.images_renamed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_folder(root: &Path, name: &str, doc: Option<&str>, images: &[&str]) -> PathBuf {
        let folder = root.join(name);
        fs::create_dir_all(&folder).unwrap();
        if let Some(text) = doc {
            fs::write(folder.join("full.md"), text).unwrap();
        }
        if !images.is_empty() {
            fs::create_dir(folder.join("images")).unwrap();
            for img in images {
                fs::write(folder.join("images").join(img), b"x").unwrap();
            }
        }
        folder
    }

    #[test]
    fn missing_target_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = restructure_folders(dir.path().join("absent"), &RestructureConfig::default())
            .unwrap_err();
        assert!(matches!(err, RestructureError::TargetNotFound { .. }));
    }

    #[test]
    fn file_target_is_fatal() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("f.txt");
        fs::write(&file, "x").unwrap();
        let err = restructure_folders(&file, &RestructureConfig::default()).unwrap_err();
        assert!(matches!(err, RestructureError::NotADirectory { .. }));
    }

    #[test]
    fn processes_single_folder() {
        let dir = TempDir::new().unwrap();
        let folder = make_folder(
            dir.path(),
            "Manual.pdf-1a2b",
            Some("#1.1 Scope\n![](images/ff.jpg)\n\n"),
            &["ff.jpg"],
        );

        let report = restructure_folders(dir.path(), &RestructureConfig::default()).unwrap();

        let doc = folder.join("Manual.md");
        assert_eq!(report.processed_documents(), vec![doc.clone()]);
        assert!(!folder.join("full.md").exists());
        assert!(folder.join("images/Manual_01.jpg").exists());
        assert_eq!(
            fs::read_to_string(&doc).unwrap(),
            "##1.1 Scope\n![Scope](https://127.0.0.1/images/Manual_01.jpg)\n"
        );
    }

    #[test]
    fn document_without_images_is_renamed_but_not_reported() {
        let dir = TempDir::new().unwrap();
        let folder = make_folder(dir.path(), "Memo.pdf", Some("text"), &[]);

        let report = restructure_folders(dir.path(), &RestructureConfig::default()).unwrap();

        assert!(report.processed_documents().is_empty());
        assert!(folder.join("Memo.md").exists());
        assert_eq!(fs::read_to_string(folder.join("Memo.md")).unwrap(), "text");
        assert!(matches!(
            report.folders[0].outcome,
            FolderOutcome::Skipped {
                reason: SkipReason::MissingImageDirectory { .. }
            }
        ));
    }

    #[test]
    fn folder_without_primary_document_skipped() {
        let dir = TempDir::new().unwrap();
        make_folder(dir.path(), "Empty.pdf", None, &["a.jpg"]);

        let report = restructure_folders(dir.path(), &RestructureConfig::default()).unwrap();
        assert_eq!(report.stats.skipped, 1);
        assert!(dir.path().join("Empty.pdf/images/a.jpg").exists());
    }

    #[test]
    fn second_run_skips_handled_folders() {
        let dir = TempDir::new().unwrap();
        make_folder(dir.path(), "Doc.pdf", Some("x"), &["a.jpg"]);

        let config = RestructureConfig::default();
        assert_eq!(restructure_folders(dir.path(), &config).unwrap().stats.processed, 1);

        let again = restructure_folders(dir.path(), &config).unwrap();
        assert_eq!(again.stats.processed, 0);
        assert_eq!(again.stats.skipped, 1);
    }
}
