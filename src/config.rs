//! Configuration types for restructuring converter output.
//!
//! Two layers:
//!
//! * [`RestructureConfig`]: the in-memory value handed to the pipeline. It
//!   is passed explicitly into every stage that needs it; nothing reads
//!   process-global state.
//! * [`Settings`]: the JSON settings file shared with the upload and
//!   transfer tools. Only the keys this crate understands are typed; every
//!   other section is carried through untouched so saving never drops
//!   another tool's settings.

use crate::error::RestructureError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};

/// URL prefix substituted for `(images/` when no other value is configured.
pub const DEFAULT_IMAGE_URL_PREFIX: &str = "https://127.0.0.1/images/";

/// File name the upstream converter gives its Markdown output.
pub const DEFAULT_PRIMARY_DOCUMENT: &str = "full.md";

/// Directory the upstream converter extracts images into.
pub const DEFAULT_IMAGE_DIR: &str = "images";

/// Configuration for a restructuring run.
///
/// Built via [`RestructureConfig::builder()`] or using
/// [`RestructureConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_md_restructure::RestructureConfig;
///
/// let config = RestructureConfig::builder()
///     .image_url_prefix("https://cdn.example.org/docs/")
///     .build()
///     .unwrap();
/// assert_eq!(config.primary_document_name, "full.md");
/// ```
#[derive(Clone)]
pub struct RestructureConfig {
    /// Replaces every `(images/` in rewritten documents. Default:
    /// [`DEFAULT_IMAGE_URL_PREFIX`].
    ///
    /// Used verbatim: include the trailing slash if the image server needs one.
    pub image_url_prefix: String,

    /// Name of the converter's Markdown file inside each folder. Default: `full.md`.
    pub primary_document_name: String,

    /// Name of the image subdirectory inside each folder. Default: `images`.
    pub image_dir_name: String,

    /// Receives per-folder events. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RestructureConfig {
    fn default() -> Self {
        Self {
            image_url_prefix: DEFAULT_IMAGE_URL_PREFIX.to_string(),
            primary_document_name: DEFAULT_PRIMARY_DOCUMENT.to_string(),
            image_dir_name: DEFAULT_IMAGE_DIR.to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RestructureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestructureConfig")
            .field("image_url_prefix", &self.image_url_prefix)
            .field("primary_document_name", &self.primary_document_name)
            .field("image_dir_name", &self.image_dir_name)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn RestructureProgressCallback>"),
            )
            .finish()
    }
}

impl RestructureConfig {
    /// Create a new builder for `RestructureConfig`.
    pub fn builder() -> RestructureConfigBuilder {
        RestructureConfigBuilder {
            config: Self::default(),
        }
    }

    /// Builder pre-populated from a settings file.
    pub fn from_settings(settings: &Settings) -> RestructureConfigBuilder {
        Self::builder().image_url_prefix(settings.markdown.image_url_prefix.clone())
    }
}

/// Builder for [`RestructureConfig`].
pub struct RestructureConfigBuilder {
    config: RestructureConfig,
}

impl fmt::Debug for RestructureConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestructureConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl RestructureConfigBuilder {
    pub fn image_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.image_url_prefix = prefix.into();
        self
    }

    pub fn primary_document_name(mut self, name: impl Into<String>) -> Self {
        self.config.primary_document_name = name.into();
        self
    }

    pub fn image_dir_name(mut self, name: impl Into<String>) -> Self {
        self.config.image_dir_name = name.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RestructureConfig, RestructureError> {
        let c = &self.config;
        validate_entry_name("primary document name", &c.primary_document_name)?;
        validate_entry_name("image directory name", &c.image_dir_name)?;
        Ok(self.config)
    }
}

/// Folder entry names must be a single path component.
fn validate_entry_name(what: &str, name: &str) -> Result<(), RestructureError> {
    if name.is_empty() {
        return Err(RestructureError::InvalidConfig(format!(
            "{what} must not be empty"
        )));
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(RestructureError::InvalidConfig(format!(
            "{what} must be a plain file name, got '{name}'"
        )));
    }
    Ok(())
}

// ── Settings file ────────────────────────────────────────────────────────

/// On-disk settings shared with the sibling upload/transfer tools.
///
/// ```json
/// {
///     "TARGET_DIRECTORY": "/data/converted",
///     "MARKDOWN": { "IMAGE_URL_PREFIX": "https://files.example.org/images/" },
///     "SFTP": { "...": "kept as-is" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding the converter's output folders.
    #[serde(
        rename = "TARGET_DIRECTORY",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub target_directory: Option<PathBuf>,

    #[serde(rename = "MARKDOWN", default)]
    pub markdown: MarkdownSettings,

    /// Sections owned by other tools.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// The `MARKDOWN` section of [`Settings`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkdownSettings {
    #[serde(rename = "IMAGE_URL_PREFIX", default = "default_image_url_prefix")]
    pub image_url_prefix: String,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Default for MarkdownSettings {
    fn default() -> Self {
        Self {
            image_url_prefix: default_image_url_prefix(),
            other: Map::new(),
        }
    }
}

fn default_image_url_prefix() -> String {
    DEFAULT_IMAGE_URL_PREFIX.to_string()
}

impl Settings {
    /// Read and parse a settings file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RestructureError> {
        let path = path.as_ref();
        let raw =
            std::fs::read_to_string(path).map_err(|e| RestructureError::SettingsReadFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        serde_json::from_str(&raw).map_err(|e| RestructureError::SettingsParseFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Like [`Settings::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, RestructureError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Write the settings as pretty-printed JSON, replacing the file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RestructureError> {
        let path = path.as_ref();
        let write_failed = |detail: String| RestructureError::SettingsWriteFailed {
            path: path.to_path_buf(),
            detail,
        };
        let mut json = serde_json::to_string_pretty(self).map_err(|e| write_failed(e.to_string()))?;
        json.push('\n');
        std::fs::write(path, json).map_err(|e| write_failed(e.to_string()))
    }
}
