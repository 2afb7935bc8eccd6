//! Image asset renaming and link rewriting for one document.
//!
//! The converter names extracted images by content hash, which is useless to
//! anyone browsing the asset store. This stage gives every image in a
//! document's image directory a stable `<document>_<NN>.<ext>` name, runs the
//! line classifier over the document, rewrites the old names to the new ones
//! and finally turns the relative `(images/` links into absolute URLs.
//!
//! ## Ordering
//!
//! Images are numbered in sorted file-name order, not in the order they are
//! referenced. Each rename is followed immediately by its text substitution.
//! New names always carry the document name as a prefix while converter
//! names are bare hashes, so a substitution can never hit a name produced by
//! an earlier one.
//!
//! Substitution is a plain global string replace. An old file name that also
//! appears in prose is replaced there too.

use crate::config::RestructureConfig;
use crate::error::FolderError;
use crate::pipeline::{classify, discover};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, warn};

/// What [`rename_assets`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssetReport {
    /// Number of image files renamed. Zero means nothing was found and the
    /// document was left untouched.
    pub images_renamed: usize,
}

impl AssetReport {
    pub fn is_empty(&self) -> bool {
        self.images_renamed == 0
    }
}

/// New file name for the `index`-th image (1-based) of `base_name`.
///
/// Two digits are used up to 99; larger indices simply grow wider, which
/// breaks the fixed-width sort order past 99 images.
pub fn sequenced_name(base_name: &str, index: usize, old_name: &str) -> String {
    let ext = Path::new(old_name)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    format!("{base_name}_{index:02}{ext}")
}

/// Rename the images of `document`, restructure it, and rewrite its links.
///
/// Returns `Ok` with a zero count (document untouched) when `image_dir`
/// holds no recognised images. Any I/O failure aborts this document only;
/// renames already done stay done.
pub fn rename_assets(
    document: &Path,
    image_dir: &Path,
    config: &RestructureConfig,
) -> Result<AssetReport, FolderError> {
    let result = rename_assets_inner(document, image_dir, config);
    if let Err(ref e) = result {
        warn!("{}", e);
    }
    result
}

fn rename_assets_inner(
    document: &Path,
    image_dir: &Path,
    config: &RestructureConfig,
) -> Result<AssetReport, FolderError> {
    let images = discover::list_images(image_dir).map_err(|e| FolderError::ListImages {
        dir: image_dir.to_path_buf(),
        detail: e.to_string(),
    })?;

    if images.is_empty() {
        debug!("No images in {}", image_dir.display());
        return Ok(AssetReport::default());
    }

    let raw = std::fs::read_to_string(document).map_err(|e| FolderError::ReadDocument {
        path: document.to_path_buf(),
        detail: e.to_string(),
    })?;
    let mut content = classify::restructure_markdown(&raw);

    let base_name = document
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    for (i, old_name) in images.iter().enumerate() {
        let new_name = sequenced_name(&base_name, i + 1, old_name);
        let from = image_dir.join(old_name);
        let to = image_dir.join(&new_name);

        std::fs::rename(&from, &to).map_err(|e| FolderError::RenameImage {
            from: from.clone(),
            to: to.clone(),
            detail: e.to_string(),
        })?;
        debug!("Renamed {} -> {}", old_name, new_name);

        content = content.replace(old_name.as_str(), &new_name);
    }

    let relative = format!("({}/", config.image_dir_name);
    content = content.replace(&relative, &format!("({}", config.image_url_prefix));

    write_document(document, &content).map_err(|e| FolderError::WriteDocument {
        path: document.to_path_buf(),
        detail: e.to_string(),
    })?;

    Ok(AssetReport {
        images_renamed: images.len(),
    })
}

/// Replace `path` with `content` via a sibling temp file.
///
/// Keeps the original file's permissions; a failed write leaves the old
/// content in place.
fn write_document(path: &Path, content: &str) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    if let Ok(meta) = std::fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────────
