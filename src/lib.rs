//! # edgequake-md-restructure
//!
//! Repair the Markdown produced by a PDF-to-Markdown converter (MinerU-style
//! output: one folder per PDF holding `full.md` and an `images/` directory).
//!
//! ## Why this crate?
//!
//! The converter gets the text right but loses structure along the way:
//! every heading comes out at level 1 with its real depth hidden in a
//! `2.3.1` prefix, figures appear as bare `![](images/<hash>.jpg)` lines
//! with the caption dangling on the next line, and every file is named
//! `full.md` or after a content hash. Uploading that to a knowledge base
//! gives flat chunking and unreadable asset names. This crate fixes all
//! three in one batch pass over a directory of converter folders.
//!
//! ## Pipeline Overview
//!
//! ```text
//! target/
//!  │
//!  ├─ 1. Discover  subfolders named `<name>.pdf…`
//!  ├─ 2. Rename    full.md → <name>.md
//!  ├─ 3. Classify  promote numbered headings, attach image captions
//!  ├─ 4. Assets    images/* → <name>_01.jpg …, rewrite references
//!  └─ 5. Links     (images/ → (<url prefix>
//! ```
//!
//! A failure in one folder is recorded and the run moves on.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_md_restructure::{restructure_folders, RestructureConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RestructureConfig::builder()
//!         .image_url_prefix("https://files.example.org/images/")
//!         .build()?;
//!     let report = restructure_folders("/data/converted", &config)?;
//!     eprintln!(
//!         "{} processed, {} failed",
//!         report.stats.processed, report.stats.failed
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `md-restructure` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod restructure;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{MarkdownSettings, RestructureConfig, RestructureConfigBuilder, Settings};
pub use error::{FolderError, RestructureError};
pub use output::{FolderOutcome, FolderResult, RunReport, RunStats, SkipReason};
pub use pipeline::assets::{rename_assets, AssetReport};
pub use pipeline::classify::restructure_markdown;
pub use progress::{on_document, NoopProgressCallback, ProgressCallback, RestructureProgressCallback};
pub use restructure::{restructure_folders, restructure_folders_async};
