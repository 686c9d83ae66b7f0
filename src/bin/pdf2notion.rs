//! CLI binary for pdf2notion.
//!
//! A thin shim over the library crate that maps CLI flags (or environment
//! variables, optionally from a `.env` file) to `UploadConfig`, shows a
//! progress bar, and prints the result.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2notion::config::{DEFAULT_IMAGE_HOST_URL, DEFAULT_NOTE_TEXT, DEFAULT_WORKSPACE_API_URL};
use pdf2notion::{
    upload, Pdf2NotionError, ScratchPolicy, UploadConfig, UploadProgressCallback,
};
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
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

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Drives the terminal progress bar and remembers how far the run got, so
/// an interrupted run can report it.
struct CliProgressCallback {
    bar: ProgressBar,
    total: AtomicUsize,
    completed: AtomicUsize,
}

impl CliProgressCallback {
    fn new(visible: bool) -> Arc<Self> {
        let bar = if visible {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_strings(TICKS),
            );
            bar.set_prefix("Rendering");
            bar.set_message("Rasterising PDF…");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        } else {
            ProgressBar::hidden()
        };

        Arc::new(Self {
            bar,
            total: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        })
    }

    fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

impl UploadProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_pages: usize) {
        self.total.store(total_pages, Ordering::SeqCst);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Uploading");
        self.bar.reset_eta();
    }

    fn on_container_created(&self, page_id: &str, title: &str) {
        self.bar.println(format!(
            "{} {} {}",
            cyan("◆"),
            bold(&format!("Created Notion page \"{title}\"")),
            dim(page_id)
        ));
    }

    fn on_page_start(&self, page_num: usize, _total_pages: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total_pages: usize, image_url: &str) {
        self.completed.fetch_add(1, Ordering::SeqCst);
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total_pages,
            dim(image_url)
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            red("✗"),
            page_num,
            total_pages,
            red(error)
        ));
        self.bar.abandon();
    }

    fn on_run_complete(&self, _total_pages: usize) {
        self.bar.finish_and_clear();
    }
}

/// Rasterise a PDF, host each page image, and lay the pages out on a new Notion page.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2notion",
    version,
    about = "Upload the pages of a PDF to a new Notion page as images",
    long_about = "Renders every page of a PDF to PNG, uploads each image to freeimage.host, and \
appends it to a freshly created Notion page followed by an editable note paragraph. \
Re-running creates a new page; nothing is resumed or de-duplicated.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto
)]
struct Cli {
    /// Local PDF file path.
    #[arg(env = "PDF2NOTION_DOCUMENT")]
    document: PathBuf,

    /// Notion integration token.
    #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
    notion_token: String,

    /// ID of the Notion page that will contain the new page.
    #[arg(long, env = "NOTION_PARENT_PAGE_ID")]
    parent_page: String,

    /// freeimage.host API key.
    #[arg(long, env = "FREEIMAGE_API_KEY", hide_env_values = true)]
    freeimage_key: String,

    /// Title of the new page. Defaults to the PDF file name.
    #[arg(long, env = "PDF2NOTION_TITLE")]
    title: Option<String>,

    /// Staging directory for rendered pages (removed when the run ends).
    #[arg(long, env = "PDF2NOTION_SCRATCH_DIR", default_value = "temp_images")]
    scratch_dir: PathBuf,

    /// Rendering DPI (72–400).
    #[arg(long, env = "PDF2NOTION_DPI", default_value_t = 200,
          value_parser = clap::value_parser!(u32).range(72..=400))]
    dpi: u32,

    /// Text of the note paragraph placed under each page image.
    #[arg(long, env = "PDF2NOTION_NOTE", default_value = DEFAULT_NOTE_TEXT)]
    note: String,

    /// Leave the scratch directory behind if the run fails.
    #[arg(long, env = "PDF2NOTION_KEEP_SCRATCH_ON_FAILURE")]
    keep_scratch_on_failure: bool,

    /// Image host upload endpoint.
    #[arg(long, env = "PDF2NOTION_IMAGE_HOST_URL", default_value = DEFAULT_IMAGE_HOST_URL)]
    image_host_url: String,

    /// Notion API base URL.
    #[arg(long, env = "PDF2NOTION_NOTION_API_URL", default_value = DEFAULT_WORKSPACE_API_URL)]
    notion_api_url: String,

    /// Per-request HTTP timeout in seconds.
    #[arg(long, env = "PDF2NOTION_TIMEOUT", default_value_t = 60)]
    timeout: u64,

    /// Path to libpdfium.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Print the run report as JSON on stdout.
    #[arg(long, env = "PDF2NOTION_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2NOTION_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2NOTION_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2NOTION_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials usually live in a .env next to the slides; absence is fine.
    dotenvy::dotenv().ok();
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

    // ── Build config ─────────────────────────────────────────────────────
    let progress = CliProgressCallback::new(show_progress);
    let config = build_config(&cli, Arc::clone(&progress))?;

    // ── Run, racing Ctrl-C ───────────────────────────────────────────────
    // Dropping the upload future drops its scratch guard, which cleans up the
    // staging directory unless --keep-scratch-on-failure was given.
    let outcome = tokio::select! {
        result = upload(&config) => result,
        () = interrupted(tokio::signal::ctrl_c()) => {
            progress.bar.abandon();
            Err(Pdf2NotionError::Interrupted {
                completed: progress.completed(),
                total: progress.total(),
            })
        }
    };
    let report = outcome.context("Upload failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
    }

    if !cli.quiet {
        eprintln!(
            "{}  {}/{} pages  {}ms  →  {} {}",
            if report.warnings.is_empty() {
                green("✔")
            } else {
                cyan("⚠")
            },
            report.stats.published_pages,
            report.stats.total_pages,
            report.stats.total_duration_ms,
            bold(&report.title),
            dim(&report.page_id),
        );
        for w in &report.warnings {
            eprintln!("   {} {}", cyan("⚠"), w);
        }
    }

    Ok(())
}

/// Resolve once `signal` fires. If the handler could not be installed, never
/// resolve, so the run goes on without Ctrl-C support.
async fn interrupted(signal: impl Future<Output = io::Result<()>>) {
    if let Err(e) = signal.await {
        tracing::warn!("Ctrl-C handler unavailable, running uninterruptible: {e}");
        std::future::pending::<()>().await;
    }
}

/// Map CLI args to `UploadConfig`.
fn build_config(cli: &Cli, progress: Arc<CliProgressCallback>) -> Result<UploadConfig> {
    let policy = if cli.keep_scratch_on_failure {
        ScratchPolicy::KeepOnFailure
    } else {
        ScratchPolicy::RemoveAlways
    };

    let mut builder = UploadConfig::builder()
        .document_path(&cli.document)
        .workspace_token(&cli.notion_token)
        .parent_container_id(&cli.parent_page)
        .image_host_credential(&cli.freeimage_key)
        .scratch_folder(&cli.scratch_dir)
        .dpi(cli.dpi)
        .note_text(&cli.note)
        .scratch_policy(policy)
        .image_host_url(&cli.image_host_url)
        .workspace_api_url(&cli.notion_api_url)
        .http_timeout_secs(cli.timeout)
        .progress_callback(progress);

    if let Some(ref title) = cli.title {
        builder = builder.title(title);
    }
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_library(lib);
    }

    builder.build().context("Invalid configuration")
}
