//! Error types for the edgequake-md-restructure library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`RestructureError`] is **fatal**: the run cannot proceed at all
//!   (target directory missing, bad configuration, unreadable settings file).
//!   Returned as `Err(RestructureError)` from the top-level entry points.
//!
//! * [`FolderError`] is **non-fatal**: one conversion folder failed (a rename
//!   hit a permission error, the document could not be written back) but the
//!   other folders are fine. Stored inside [`crate::output::FolderOutcome`]
//!   so callers can inspect partial success instead of losing the whole run
//!   to one bad folder.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-md-restructure library.
///
/// Folder-level failures use [`FolderError`] and are stored in
/// [`crate::output::FolderResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum RestructureError {
    // ── Target errors ─────────────────────────────────────────────────────
    /// Target directory does not exist.
    #[error("Target directory not found: '{path}'")]
    TargetNotFound { path: PathBuf },

    /// Target path exists but is a file.
    #[error("Target '{path}' is not a directory")]
    NotADirectory { path: PathBuf },

    /// Listing the target directory failed.
    #[error("Failed to list '{path}': {source}")]
    ReadDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Settings file exists but could not be read.
    #[error("Failed to read settings file '{path}': {source}")]
    SettingsReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid JSON (or has the wrong shape).
    #[error("Settings file '{path}' is malformed: {source}")]
    SettingsParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Settings file could not be written.
    #[error("Failed to write settings file '{path}': {detail}")]
    SettingsWriteFailed { path: PathBuf, detail: String },

    // ── Run outcome ───────────────────────────────────────────────────────
    /// Some folders were processed but at least one failed.
    ///
    /// Returned by [`crate::output::RunReport::into_result`] when the caller
    /// wants to treat any folder failure as an error.
    #[error("{failed}/{total} folders failed during restructuring")]
    PartialFailure {
        processed: usize,
        failed: usize,
        total: usize,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single conversion folder.
///
/// Stored alongside [`crate::output::FolderResult`] when a folder fails.
/// The run continues with the next folder.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum FolderError {
    /// Renaming the primary document (`full.md` → `<base>.md`) failed.
    #[error("Failed to rename '{from}' to '{to}': {detail}")]
    RenameDocument {
        from: PathBuf,
        to: PathBuf,
        detail: String,
    },

    /// The image directory could not be listed.
    #[error("Failed to list images in '{dir}': {detail}")]
    ListImages { dir: PathBuf, detail: String },

    /// Renaming one image file failed. Earlier images stay renamed.
    #[error("Failed to rename image '{from}' to '{to}': {detail}")]
    RenameImage {
        from: PathBuf,
        to: PathBuf,
        detail: String,
    },

    /// The document could not be read (missing, or not UTF-8).
    #[error("Failed to read document '{path}': {detail}")]
    ReadDocument { path: PathBuf, detail: String },

    /// The rewritten document could not be written back.
    #[error("Failed to write document '{path}': {detail}")]
    WriteDocument { path: PathBuf, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_failure_display() {
        let e = RestructureError::PartialFailure {
            processed: 2,
            failed: 1,
            total: 3,
        };
        let msg = e.to_string();
        assert!(msg.contains("1/3"), "got: {msg}");
    }

    #[test]
    fn target_not_found_mentions_path() {
        let e = RestructureError::TargetNotFound {
            path: PathBuf::from("/no/such/dir"),
        };
        assert!(e.to_string().contains("/no/such/dir"));
    }

    #[test]
    fn rename_image_display() {
        let e = FolderError::RenameImage {
            from: PathBuf::from("images/abc.jpg"),
            to: PathBuf::from("images/Report_01.jpg"),
            detail: "permission denied".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("abc.jpg"));
        assert!(msg.contains("Report_01.jpg"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn folder_error_serialises() {
        let e = FolderError::WriteDocument {
            path: PathBuf::from("a/Report.md"),
            detail: "disk full".into(),
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("WriteDocument"));
        let back: FolderError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
