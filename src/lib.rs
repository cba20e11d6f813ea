//! # pdf2struct
//!
//! Extract structured data from PDF books — full text, a table of
//! contents/index, and tables — as the first stage of a narration pipeline.
//!
//! ## Why this crate?
//!
//! PDF text layers carry no structure: a table of contents is just more
//! text, a table is just whitespace, and nothing marks where the front
//! matter ends. Instead of demanding layout metadata that books never have,
//! this crate infers a book's *type* from sparse text samples and uses that
//! inference to tune a set of pattern-matching heuristics — cascading
//! index locators, a line-by-line entry parser, and a strict table
//! validator. Every heuristic is best-effort: failures narrow the output,
//! they never abort the run.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Open      validate magic bytes, load via pdfium
//!  ├─ 2. Sample    up to 5 representative pages, 1000 chars each
//!  ├─ 3. Classify  keyword-family scores → BookType → ExtractionConfig
//!  ├─ 4. Text      per-page full-text extraction (failure-tolerant)
//!  ├─ 5. Index     keyword / enumerator / statistical locator + entry parser
//!  ├─ 6. Tables    text-grid candidates → validation → normalised records
//!  └─ 7. Report    ExtractionReport + JSON / txt / csv sidecars
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2struct::process_file;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = process_file("book.pdf", None, None)?;
//!     println!("{} pages, type {:?}", report.total_pages, report.book_type);
//!     if let Some(index) = &report.index {
//!         for entry in &index.entries {
//!             println!("{:?} {} -> {:?}", entry.entry_number, entry.title, entry.page_reference);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Callers that already hold page text (or a real table-detection layer)
//! skip pdfium entirely by implementing [`PageSource`] — see
//! [`MemorySource`] — and driving [`DocumentProcessor`] directly.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2struct` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2struct = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod pdfium;
pub mod pipeline;
pub mod processor;
pub mod progress;
pub mod report;
pub mod sidecar;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use document::{grid_from_rows, MemorySource, PageSource, PageText, RawTableGrid};
pub use error::{PageError, Pdf2StructError};
pub use pdfium::{process_bytes, process_file, PdfiumSource};
pub use pipeline::classify::{BookStructureAnalyzer, BookType};
pub use pipeline::index::AdaptiveIndexExtractor;
pub use pipeline::tables::AdaptiveTableExtractor;
pub use processor::DocumentProcessor;
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use report::{
    ExtractionReport, ExtractionSummary, IndexEntry, IndexResult, PageRecord, StructuredTable,
    TextExtraction,
};
pub use sidecar::{write_report, SidecarPaths};
