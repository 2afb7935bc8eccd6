//! CLI binary for edgequake-md-restructure.
//!
//! A thin shim over the library crate that maps CLI flags and the settings
//! file to `RestructureConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_md_restructure::{
    restructure_folders_async, FolderError, ProgressCallback, RestructureConfig,
    RestructureProgressCallback, RunReport, Settings, SkipReason,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a bar over the folders of the target plus one
/// log line per processed document or failed folder.
struct CliProgressCallback {
    bar: ProgressBar,
    verbose: bool,
}

impl CliProgressCallback {
    fn new(verbose: bool) -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Scanning");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar, verbose })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} folders  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Restructuring");
    }
}

impl RestructureProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_folders: usize) {
        self.activate_bar(total_folders);
    }

    fn on_document_complete(&self, document: &Path, images_renamed: usize) {
        self.bar.println(format!(
            "  {} {}  {}",
            green("✓"),
            document.display(),
            dim(&format!("{images_renamed} images")),
        ));
        self.bar.inc(1);
    }

    fn on_folder_skipped(&self, folder: &Path, reason: &SkipReason) {
        if self.verbose {
            self.bar.println(format!(
                "  {} {}  {}",
                dim("·"),
                dim(&folder.display().to_string()),
                dim(&reason.to_string()),
            ));
        }
        self.bar.inc(1);
    }

    fn on_folder_error(&self, folder: &Path, error: &FolderError) {
        self.bar.println(format!(
            "  {} {}  {}",
            red("✗"),
            folder.display(),
            red(&error.to_string()),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, _processed: usize, _failed: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Restructure every converter folder under a directory
  md-restructure ~/MinerU --url-prefix https://files.example.org/images/

  # Read target and prefix from a settings file, then save changes back
  md-restructure --config difyConfig.txt --url-prefix https://cdn/img/ --save-config

  # Machine-readable report, non-zero exit on any folder failure
  md-restructure ~/MinerU --json --strict > report.json

EXPECTED LAYOUT:
  <target>/<name>.pdf…/full.md
  <target>/<name>.pdf…/images/*.{png,jpg,jpeg,gif,bmp,webp}

  becomes

  <target>/<name>.pdf…/<name>.md
  <target>/<name>.pdf…/images/<name>_01.jpg, <name>_02.png, …

  Renames are destructive: a second run skips folders that no longer
  contain full.md.

ENVIRONMENT VARIABLES:
  MD_RESTRUCTURE_TARGET      Target directory
  MD_RESTRUCTURE_URL_PREFIX  Replacement for "(images/" in rewritten links
  MD_RESTRUCTURE_CONFIG      Settings file path
  RUST_LOG                   Override log filter (e.g. edgequake_md_restructure=debug)
"#;

/// Repair PDF-to-Markdown converter output in place.
#[derive(Parser, Debug)]
#[command(
    name = "md-restructure",
    version,
    about = "Repair PDF-to-Markdown converter output: heading depth, image captions, asset names",
    long_about = "Walk a directory of converter output folders, rename each full.md after its PDF, \
promote numbered headings to their real depth, caption bare images, rename images to \
<name>_NN.<ext> and rewrite image links to an absolute URL prefix.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing `<name>.pdf…` converter folders.
    #[arg(env = "MD_RESTRUCTURE_TARGET")]
    target: Option<PathBuf>,

    /// URL prefix that replaces `(images/` in rewritten links.
    #[arg(long, env = "MD_RESTRUCTURE_URL_PREFIX")]
    url_prefix: Option<String>,

    /// JSON settings file (TARGET_DIRECTORY, MARKDOWN.IMAGE_URL_PREFIX).
    #[arg(long, env = "MD_RESTRUCTURE_CONFIG")]
    config: Option<PathBuf>,

    /// Write the effective target and prefix back to the settings file.
    #[arg(long, requires = "config")]
    save_config: bool,

    /// Output the run report as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Exit with an error if any folder failed.
    #[arg(long)]
    strict: bool,

    /// Disable progress bar.
    #[arg(long, env = "MD_RESTRUCTURE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Settings ─────────────────────────────────────────────────────────
    let mut settings = match cli.config {
        Some(ref path) => Settings::load_or_default(path).context("Failed to load settings")?,
        None => Settings::default(),
    };

    if let Some(ref prefix) = cli.url_prefix {
        settings.markdown.image_url_prefix = prefix.clone();
    }
    if let Some(ref target) = cli.target {
        settings.target_directory = Some(target.clone());
    }

    let target = settings.target_directory.clone().context(
        "No target directory: pass TARGET, set MD_RESTRUCTURE_TARGET, or add TARGET_DIRECTORY to the settings file",
    )?;

    if cli.save_config {
        if let Some(ref path) = cli.config {
            settings.save(path).context("Failed to save settings")?;
        }
    }

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = RestructureConfig::from_settings(&settings);
    if show_progress {
        let cb: ProgressCallback = CliProgressCallback::new(cli.verbose);
        builder = builder.progress_callback(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run ──────────────────────────────────────────────────────────────
    let report = restructure_folders_async(&target, &config)
        .await
        .with_context(|| format!("Restructuring '{}' failed", target.display()))?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    } else if !cli.quiet {
        print_summary(&report, show_progress);
    }

    if cli.strict {
        report.into_result().context("Some folders failed")?;
    }

    Ok(())
}

/// Aggregate counts on stderr; failures are listed unless the bar already did.
fn print_summary(report: &RunReport, progress_shown: bool) {
    let s = &report.stats;

    if !progress_shown {
        for doc in report.processed_documents() {
            eprintln!("Processed: {}", doc.display());
        }
        for (folder, error) in report.failures() {
            eprintln!("Failed: {}: {}", folder.display(), error);
        }
    }

    let mark = if s.failed == 0 {
        green("✔")
    } else if s.processed == 0 {
        red("✘")
    } else {
        cyan("⚠")
    };
    eprintln!(
        "{} {} documents processed  {}  {}",
        mark,
        bold(&s.processed.to_string()),
        dim(&format!(
            "{} images renamed, {} skipped, {} failed",
            s.images_renamed, s.skipped, s.failed
        )),
        dim(&format!("{}ms", s.duration_ms)),
    );
}
