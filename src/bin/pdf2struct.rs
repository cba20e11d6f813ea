//! CLI binary for pdf2struct.
//!
//! A thin shim over the library crate that maps CLI flags to an
//! [`ExtractionConfig`], runs the extraction, and writes sidecar files.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use pdf2struct::{
    process_file, BookStructureAnalyzer, BookType, ExtractionConfig, ExtractionProgressCallback,
    ExtractionReport, ProgressCallback,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
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

// ── CLI definition ───────────────────────────────────────────────────────────

/// Forced book type for `--book-type`.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum BookTypeArg {
    Academic,
    Novel,
    Textbook,
    Manual,
}

impl From<BookTypeArg> for BookType {
    fn from(v: BookTypeArg) -> Self {
        match v {
            BookTypeArg::Academic => BookType::Academic,
            BookTypeArg::Novel => BookType::Novel,
            BookTypeArg::Textbook => BookType::Textbook,
            BookTypeArg::Manual => BookType::Manual,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "pdf2struct",
    version,
    about = "Extract structured data (text, table of contents, tables) from a PDF book"
)]
struct Cli {
    /// Path to the input PDF.
    input: PathBuf,

    /// Directory for sidecar output files.
    #[arg(short, long, default_value = "./output")]
    output: PathBuf,

    /// Stem for sidecar filenames (defaults to the input file name).
    #[arg(long)]
    stem: Option<String>,

    /// Password for encrypted PDFs.
    #[arg(long, env = "PDF2STRUCT_PASSWORD")]
    password: Option<String>,

    /// Force a book type instead of auto-detecting it.
    ///
    /// Selects the pre-tuned threshold profile for that type and enables
    /// per-page progress output.
    #[arg(long, value_enum)]
    book_type: Option<BookTypeArg>,

    /// Override the index scan window (disables type auto-tuning).
    #[arg(long)]
    max_index_pages: Option<usize>,

    /// Override the initial pages skipped in first-page detection
    /// (disables type auto-tuning).
    #[arg(long)]
    skip_pages: Option<usize>,

    /// Print the JSON report to stdout instead of writing sidecar files.
    #[arg(long)]
    json: bool,

    /// Skip the index sidecar.
    #[arg(long)]
    no_index: bool,

    /// Skip the table sidecars.
    #[arg(long)]
    no_tables: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    quiet: bool,
}

// ── Per-page progress via indicatif ──────────────────────────────────────────

/// Terminal progress callback: one bar across the full-text pass.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:40.green/238}] {pos:>4}/{len} pages",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.set_prefix("Extracting");
        Arc::new(Self { bar })
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, total_pages: usize) {
        self.bar.set_length(total_pages as u64);
    }

    fn on_page_complete(&self, _page: usize, _total: usize, _chars: usize) {
        self.bar.inc(1);
    }

    fn on_page_error(&self, page: usize, _total: usize, error: &str) {
        self.bar
            .println(format!("  page {page}: {}", dim(error)));
        self.bar.inc(1);
    }

    fn on_extraction_complete(&self, _total: usize, text_pages: usize) {
        self.bar
            .finish_with_message(format!("{text_pages} pages with text"));
    }
}

// ── Main ─────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Tuning flags and a forced type both mean an explicit config; plain
    // runs let the library sample pages and auto-detect the book type.
    let has_overrides =
        cli.book_type.is_some() || cli.max_index_pages.is_some() || cli.skip_pages.is_some();
    let config = if has_overrides {
        let base = match cli.book_type {
            Some(t) => BookStructureAnalyzer::config_for(t.into()),
            None => ExtractionConfig::default(),
        };
        let mut builder = ExtractionConfig::builder()
            .max_index_pages(cli.max_index_pages.unwrap_or(base.max_index_pages))
            .min_index_entries(base.min_index_entries)
            .min_content_length(base.min_content_length)
            .skip_initial_pages(cli.skip_pages.unwrap_or(base.skip_initial_pages))
            .min_table_cell_fill(base.min_table_cell_fill);
        if !cli.quiet {
            let cb: ProgressCallback = CliProgressCallback::new();
            builder = builder.progress_callback(cb);
        }
        Some(builder.build()?)
    } else {
        None
    };

    // Auto-detect runs have no callback hook, so show a steady spinner.
    let spinner = (!cli.quiet && config.is_none()).then(|| {
        let s = ProgressBar::new_spinner();
        s.set_message(format!("Processing {}…", cli.input.display()));
        s.enable_steady_tick(Duration::from_millis(80));
        s
    });

    let report = process_file(&cli.input, cli.password.as_deref(), config)
        .with_context(|| format!("extraction failed for {}", cli.input.display()))?;

    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    if cli.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    let stem = cli.stem.clone().unwrap_or_else(|| {
        cli.input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string())
    });

    let mut trimmed = report.clone();
    if cli.no_index {
        trimmed.index = None;
    }
    if cli.no_tables {
        trimmed.tables.clear();
    }
    let paths = pdf2struct::write_report(&trimmed, &cli.output, &stem)
        .with_context(|| format!("writing sidecars under {}", cli.output.display()))?;

    print_summary(&report);
    println!("\n{}", bold("Output files"));
    println!("  {} {}", green("✓"), paths.json.display());
    println!("  {} {}", green("✓"), paths.full_text.display());
    if let Some(p) = &paths.index {
        println!("  {} {}", green("✓"), p.display());
    }
    if let Some(p) = &paths.tables_dir {
        println!("  {} {}", green("✓"), p.display());
    }
    Ok(())
}

fn print_summary(report: &ExtractionReport) {
    let s = &report.summary;
    println!("\n{} {}", cyan("◆"), bold("Extraction summary"));
    println!("  pages           {}", s.total_pages);
    println!("  book type       {}", s.book_type.as_str());
    println!(
        "  first content   {}",
        s.first_content_page
            .map(|p| format!("page {p}"))
            .unwrap_or_else(|| "—".to_string())
    );
    println!(
        "  text            {} pages, {} chars",
        s.total_text_pages, s.total_characters
    );
    println!(
        "  index           {}",
        if s.index_found {
            format!("{} entries", s.index_entries_count)
        } else {
            dim("not found")
        }
    );
    println!("  tables          {}", s.tables_count);
}
