//! Discovery helpers: recognise conversion folders and enumerate their images.

use once_cell::sync::Lazy;
use regex::Regex;
use std::io;
use std::path::Path;
use tracing::warn;

/// Extensions treated as images, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Everything before the first `.pdf` (any case) in a folder name.
static RE_PDF_STEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(.*?)\.pdf").unwrap());

/// Document base name encoded in a converter folder name.
///
/// `"Annual Report.pdf-3b1f"` → `Some("Annual Report")`. Names without a
/// `.pdf` marker, or with nothing before it, are not conversion folders.
///
/// ```rust
/// use edgequake_md_restructure::pipeline::discover::conversion_base_name;
///
/// assert_eq!(conversion_base_name("Q3 Review.PDF_out"), Some("Q3 Review"));
/// assert_eq!(conversion_base_name("notes"), None);
/// ```
pub fn conversion_base_name(folder_name: &str) -> Option<&str> {
    RE_PDF_STEM
        .captures(folder_name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
}

/// Whether a file name ends in one of [`IMAGE_EXTENSIONS`].
pub fn is_image_file_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
}

/// Names of the image files directly inside `dir`, sorted as strings.
///
/// Subdirectories are ignored. Names that are not valid UTF-8 cannot be
/// rewritten inside a document and are skipped with a warning.
pub fn list_images(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) if is_image_file_name(&name) => names.push(name),
            Ok(_) => {}
            Err(raw) => warn!("Skipping non UTF-8 file name in {}: {:?}", dir.display(), raw),
        }
    }
    names.sort();
    Ok(names)
}
