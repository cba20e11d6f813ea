//! Error types for the pdf2struct library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Pdf2StructError`] — **Fatal**: the extraction cannot proceed at all
//!   (missing input file, wrong password, corrupt document, unwritable output
//!   directory). Returned as `Err(Pdf2StructError)` from the top-level
//!   `process_*` functions and the sidecar writer.
//!
//! * [`PageError`] — **Non-fatal**: a single page failed (text layer glitch,
//!   table-layer failure) but all other pages are fine. The orchestrator logs
//!   it, substitutes an empty record, and keeps going rather than losing the
//!   whole document to one bad page.
//!
//! Everything a heuristic can decide on its own — no index found, too few
//! entries, a rejected table candidate — is NOT an error: those outcomes are
//! communicated through `Option`/empty collections so callers can tell an
//! absent structure apart from a broken run.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2struct library.
///
/// Page-level failures use [`PageError`] and are absorbed by the
/// orchestrator rather than propagated here.
#[derive(Debug, Error)]
pub enum Pdf2StructError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// A requested page range starts past the end of the document.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write a sidecar output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed (bad threshold or malformed custom pattern).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy, or install\n\
pdfium as a system library.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single page.
///
/// Produced by [`crate::document::PageSource`] implementations. The overall
/// extraction continues; the failed page contributes an empty record.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// The text layer could not be read for a page.
    #[error("Page {page}: text extraction failed: {detail}")]
    TextFailed { page: usize, detail: String },

    /// The table layer could not be read for a page.
    #[error("Page {page}: table extraction failed: {detail}")]
    TablesFailed { page: usize, detail: String },
}

impl PageError {
    /// The 1-based page number this error refers to.
    pub fn page(&self) -> usize {
        match self {
            PageError::TextFailed { page, .. } => *page,
            PageError::TablesFailed { page, .. } => *page,
        }
    }
}
