//! The page-indexed document abstraction the extraction engine consumes.
//!
//! The engine never parses PDF binary format itself; it works against
//! [`PageSource`], a minimal read-only contract over an already-open
//! document. [`crate::pdfium::PdfiumSource`] adapts a real PDF; tests and
//! embedding services use [`MemorySource`] to feed page text and table grids
//! directly. Keeping the boundary this narrow is what makes every heuristic
//! in the pipeline testable without a PDF file on disk.

use crate::error::PageError;
use serde::{Deserialize, Serialize};

/// One page-level table candidate from the underlying table layer.
///
/// A 2-D grid of optional cell strings, exactly as table-detection layers
/// emit it: ragged row widths and `None` holes are expected and handled by
/// [`crate::pipeline::tables::AdaptiveTableExtractor`].
pub type RawTableGrid = Vec<Vec<Option<String>>>;

/// Raw text of one page, tagged with its 1-based page number.
///
/// Ephemeral: produced per page by the document reader, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// 1-based page number.
    pub page_number: usize,
    /// Raw extracted text (may be empty).
    pub text: String,
}

impl PageText {
    pub fn new(page_number: usize, text: impl Into<String>) -> Self {
        Self {
            page_number,
            text: text.into(),
        }
    }
}

/// Read-only access to an open, page-indexed document.
///
/// Page indices are 0-based; reported page numbers are 1-based. A failing
/// page returns a [`PageError`] which the orchestrator downgrades to an
/// empty record — implementations should not panic on bad pages.
pub trait PageSource {
    /// Total number of pages in the document.
    fn total_pages(&self) -> usize;

    /// Raw text of page `index` (0-based). Empty string for blank pages.
    fn page_text(&self, index: usize) -> Result<String, PageError>;

    /// Raw table candidates detected on page `index` (0-based).
    fn page_tables(&self, index: usize) -> Result<Vec<RawTableGrid>, PageError>;
}

/// An in-memory [`PageSource`] over prepared page text and table grids.
///
/// The workhorse for unit and integration tests, and the natural adapter for
/// callers whose pages already live in memory (a job queue handing over
/// pre-extracted text, for instance).
///
/// # Example
/// ```rust
/// use pdf2struct::{MemorySource, PageSource};
///
/// let source = MemorySource::from_texts(["Cover", "Table of Contents\n1. Intro ... 3"]);
/// assert_eq!(source.total_pages(), 2);
/// assert!(source.page_text(1).unwrap().contains("Contents"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<String>,
    tables: Vec<Vec<RawTableGrid>>,
}

impl MemorySource {
    /// Build a source from page texts only; every page has no tables.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pages: Vec<String> = texts.into_iter().map(Into::into).collect();
        let tables = vec![Vec::new(); pages.len()];
        Self { pages, tables }
    }

    /// Attach table grids to a page (0-based index). Out-of-range indices
    /// are ignored.
    pub fn with_tables(mut self, index: usize, grids: Vec<RawTableGrid>) -> Self {
        if let Some(slot) = self.tables.get_mut(index) {
            *slot = grids;
        }
        self
    }
}

impl PageSource for MemorySource {
    fn total_pages(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String, PageError> {
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| PageError::TextFailed {
                page: index + 1,
                detail: "page index out of range".into(),
            })
    }

    fn page_tables(&self, index: usize) -> Result<Vec<RawTableGrid>, PageError> {
        self.tables
            .get(index)
            .cloned()
            .ok_or_else(|| PageError::TablesFailed {
                page: index + 1,
                detail: "page index out of range".into(),
            })
    }
}

/// Convenience: build a grid from string rows for tests and examples.
///
/// Empty cells become `None`, everything else `Some`.
pub fn grid_from_rows<const N: usize>(rows: &[[&str; N]]) -> RawTableGrid {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    if cell.is_empty() {
                        None
                    } else {
                        Some((*cell).to_string())
                    }
                })
                .collect()
        })
        .collect()
}
