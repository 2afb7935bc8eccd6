//! Result types produced by a restructuring run.

use crate::error::{FolderError, RestructureError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Why a folder was left alone. None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// Folder name has no `.pdf` marker.
    NotAConversionFolder,
    /// No primary document (`full.md`) inside the folder.
    MissingPrimaryDocument,
    /// Document was renamed but there is no image directory beside it.
    MissingImageDirectory { document: PathBuf },
    /// Document was renamed but the image directory holds no recognised images.
    NoImages { document: PathBuf },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NotAConversionFolder => write!(f, "not a conversion folder"),
            SkipReason::MissingPrimaryDocument => write!(f, "no primary document"),
            SkipReason::MissingImageDirectory { document } => {
                write!(f, "no image directory beside {}", document.display())
            }
            SkipReason::NoImages { document } => {
                write!(f, "no images to rename for {}", document.display())
            }
        }
    }
}

/// What happened to one folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FolderOutcome {
    Processed {
        document: PathBuf,
        images_renamed: usize,
    },
    Skipped {
        reason: SkipReason,
    },
    Failed {
        error: FolderError,
    },
}

/// Outcome for one subdirectory of the target directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderResult {
    /// The folder as it was found on disk.
    pub folder: PathBuf,
    pub outcome: FolderOutcome,
}

impl FolderResult {
    /// Final document path if the folder was processed.
    pub fn document(&self) -> Option<&Path> {
        match &self.outcome {
            FolderOutcome::Processed { document, .. } => Some(document),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FolderError> {
        match &self.outcome {
            FolderOutcome::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Aggregate counters for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Subdirectories examined (plain files in the target are not counted).
    pub total_folders: usize,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub images_renamed: usize,
    pub duration_ms: u64,
}

/// Everything a run produced, in directory iteration order.
///
/// Iteration order comes from the filesystem and is not guaranteed to be
/// lexicographic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub folders: Vec<FolderResult>,
    pub stats: RunStats,
}

impl RunReport {
    /// Paths of every successfully processed document.
    pub fn processed_documents(&self) -> Vec<PathBuf> {
        self.folders
            .iter()
            .filter_map(|r| r.document().map(Path::to_path_buf))
            .collect()
    }

    /// Folders that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &FolderError)> {
        self.folders
            .iter()
            .filter_map(|r| r.error().map(|e| (r.folder.as_path(), e)))
    }

    /// Treat any folder failure as an error for the whole run.
    pub fn into_result(self) -> Result<Self, RestructureError> {
        if self.stats.failed > 0 {
            return Err(RestructureError::PartialFailure {
                processed: self.stats.processed,
                failed: self.stats.failed,
                total: self.stats.total_folders,
            });
        }
        Ok(self)
    }

    pub(crate) fn push(&mut self, result: FolderResult) {
        match &result.outcome {
            FolderOutcome::Processed { images_renamed, .. } => {
                self.stats.processed += 1;
                self.stats.images_renamed += images_renamed;
            }
            FolderOutcome::Skipped { .. } => self.stats.skipped += 1,
            FolderOutcome::Failed { .. } => self.stats.failed += 1,
        }
        self.folders.push(result);
    }
}
