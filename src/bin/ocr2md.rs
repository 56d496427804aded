//! CLI binary for ocr2md.
//!
//! A thin shim over the library crate that maps CLI flags to `BatchConfig`,
//! renders per-file progress, and prints the run summary.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use ocr2md::{run_batch, BatchConfig, BatchProgressCallback, ProgressCallback, RunSummary};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
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

/// Terminal progress callback: a live bar plus one log line per file.
/// The batch is sequential, so a single current-file timer suffices.
struct CliProgressCallback {
    bar: ProgressBar,
    current_start: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    /// Create a callback whose bar length is set by `on_scan_complete`.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_scan_complete

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Scanning");
        bar.set_message("Listing directory…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            current_start: Mutex::new(None),
        })
    }

    fn elapsed_secs(&self) -> f64 {
        self.current_start
            .lock()
            .unwrap()
            .take()
            .map(|t| t.elapsed().as_millis() as f64 / 1000.0)
            .unwrap_or(0.0)
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_scan_complete(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Found {total} candidate file(s)"))
        ));
    }

    fn on_file_skipped(&self, file: &str) {
        self.bar.println(format!(
            "  {} {:<32} {}",
            dim("○"),
            file,
            dim("already converted")
        ));
        self.bar.inc(1);
    }

    fn on_file_start(&self, file: &str, _index: usize, _total: usize) {
        *self.current_start.lock().unwrap() = Some(Instant::now());
        self.bar.set_message(file.to_string());
    }

    fn on_file_complete(&self, file: &str, bytes_written: usize) {
        let secs = self.elapsed_secs();
        self.bar.println(format!(
            "  {} {:<32} {}  {}",
            green("✓"),
            file,
            dim(&format!("{bytes_written:>6} bytes")),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_file_error(&self, file: &str, error: String) {
        let secs = self.elapsed_secs();

        // Truncate very long error messages to keep output tidy.
        let msg = if error.chars().count() > 80 {
            let cut: String = error.chars().take(79).collect();
            format!("{cut}\u{2026}")
        } else {
            error
        };

        self.bar.println(format!(
            "  {} {:<32} {}  {}",
            red("✗"),
            file,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, processed: usize, skipped: usize, errored: usize) {
        self.bar.finish_and_clear();

        if errored == 0 {
            eprintln!(
                "{} {} converted, {} skipped",
                green("✔"),
                bold(&processed.to_string()),
                skipped
            );
        } else {
            eprintln!(
                "{} {} converted, {} skipped, {} failed",
                if processed == 0 { red("✘") } else { cyan("⚠") },
                bold(&processed.to_string()),
                skipped,
                red(&errored.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert every PDF/image in the current directory
  ocr2md

  # Convert a specific directory, embedding images extracted from PDFs
  ocr2md ./scans --embed-images

  # Only PDFs, longer per-request timeout
  ocr2md --extensions pdf --api-timeout 300 ./archive

  # Machine-readable summary
  ocr2md --json ./scans > summary.json

IDEMPOTENCY:
  Each source file produces <basename>.md next to it. If that file already
  exists the source is skipped without contacting the API — delete the .md
  to force reconversion. A failed file writes nothing, so the next run
  retries it.

ENVIRONMENT VARIABLES:
  MISTRAL_API_KEY       API credential (also read from a local .env file)
  OCR2MD_MODEL          Override the OCR model ID
  OCR2MD_EMBED_IMAGES   Same as --embed-images
  OCR2MD_EXTENSIONS     Same as --extensions
  OCR2MD_API_TIMEOUT    Same as --api-timeout

SETUP:
  1. Set API key:     export MISTRAL_API_KEY=...   (or put it in .env)
  2. Convert:         ocr2md ./scans

EXIT STATUS:
  0 if every candidate was converted or skipped, 1 if any file failed.
"#;

/// Batch-convert PDF and image files to Markdown using the Mistral OCR API.
#[derive(Parser, Debug)]
#[command(
    name = "ocr2md",
    version,
    about = "Batch-convert PDF and image files to Markdown via the Mistral OCR API",
    long_about = "Walk a directory, OCR every PDF and image that has no Markdown output yet, \
and write <basename>.md next to each source. Already-converted files are skipped, and one \
file's failure never stops the rest of the batch.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory to convert (defaults to the current directory).
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Embed images extracted from PDF pages as base64 data in the output.
    #[arg(long, env = "OCR2MD_EMBED_IMAGES")]
    embed_images: bool,

    /// Comma-separated list of source extensions to convert.
    #[arg(long, env = "OCR2MD_EXTENSIONS", default_value = "pdf,png,jpg,jpeg,webp")]
    extensions: String,

    /// OCR model identifier.
    #[arg(long, env = "OCR2MD_MODEL", default_value = "mistral-ocr-latest")]
    model: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = "OCR2MD_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// Print the run summary as JSON instead of a table.
    #[arg(long, env = "OCR2MD_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "OCR2MD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "OCR2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "OCR2MD_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present, before anything reads the environment.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
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
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new_dynamic() as Arc<dyn BatchProgressCallback>)
    } else {
        None
    };

    let mut builder = BatchConfig::builder()
        .root(&cli.dir)
        .embed_images(cli.embed_images)
        .extensions(cli.extensions.split(','))
        .model(&cli.model)
        .api_timeout_secs(cli.api_timeout);

    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Run the batch ────────────────────────────────────────────────────
    let summary = run_batch(&config).await.context("Batch failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
    } else if !cli.quiet {
        print_summary(&summary);
    }

    if summary.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}

/// Print the tabulated summary — the report a human reads after walking
/// away from a long batch.
fn print_summary(summary: &RunSummary) {
    eprintln!();
    eprintln!("{}", bold("── Summary ─────────────────────────────"));
    eprintln!(
        "  processed  {:>4}   {}",
        summary.processed_count(),
        dim(&summary.processed.join(", "))
    );
    eprintln!(
        "  skipped    {:>4}   {}",
        summary.skipped_count(),
        dim(&summary.skipped.join(", "))
    );
    eprintln!("  errored    {:>4}", summary.error_count());
    for failure in &summary.errored {
        eprintln!("    {} {} — {}", red("✗"), failure.file, failure.detail);
    }
    eprintln!("{}", bold("────────────────────────────────────────"));
}
