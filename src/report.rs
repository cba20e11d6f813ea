//! Output value types for one document-extraction run.
//!
//! Everything here is a plain serialisable value object: built once by the
//! orchestrator, immutable afterwards, and stable in its JSON field names so
//! downstream services can rely on the shape. Heuristic "absence" is encoded
//! in the types — a missing index is `None`, a rejected table simply never
//! appears — so callers never have to distinguish error sentinels from data.

use crate::pipeline::classify::BookType;
use serde::{Deserialize, Serialize};

/// One parsed table-of-contents / index entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Enumerator label as printed, normalised (`"1"`, `"IV"`, `"chapter 3"`).
    pub entry_number: Option<String>,
    /// Entry title; unique case-insensitively within one extraction run.
    pub title: String,
    /// Page the entry points at, when the line carried a dotted reference.
    pub page_reference: Option<u32>,
}

/// A located and parsed table-of-contents / index.
///
/// Only produced when the committed entry count reaches the configured
/// minimum; otherwise extraction reports "no index" via `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexResult {
    /// 1-based page number of the anchor page (where the index starts).
    pub page_number: usize,
    /// All contributing page numbers, in order.
    pub pages: Vec<usize>,
    /// Parsed entries, first-seen order, title-deduplicated.
    pub entries: Vec<IndexEntry>,
    /// Concatenated raw text of the contributing pages.
    pub raw_text: String,
}

/// One validated, normalised table.
///
/// Invariant: every row in `data` has exactly `header.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredTable {
    /// 1-based page number the table was found on.
    pub page_number: usize,
    /// 1-based index among the accepted tables of that page.
    pub table_index: usize,
    /// Header row (the first non-empty row of the raw grid).
    pub header: Vec<String>,
    /// Data rows, each padded/truncated to the header width.
    pub data: Vec<Vec<String>>,
    pub row_count: usize,
    pub column_count: usize,
}

/// Text of a single page as recorded in the report.
///
/// Pages whose text layer failed (or is genuinely blank) appear with an
/// empty `text` and `char_count` 0 rather than being dropped, so page
/// numbering stays dense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub page_number: usize,
    pub text: String,
    pub char_count: usize,
}

/// Full-text extraction result across the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextExtraction {
    /// One record per page, in page order.
    pub pages: Vec<PageRecord>,
    /// All page texts joined with blank lines.
    pub full_text: String,
}

/// Counter block summarising a run at a glance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub total_pages: usize,
    pub book_type: BookType,
    pub first_content_page: Option<usize>,
    /// Pages that yielded non-empty text.
    pub total_text_pages: usize,
    pub index_found: bool,
    pub index_entries_count: usize,
    pub tables_count: usize,
    pub total_characters: usize,
}

/// Aggregate result of one document run.
///
/// Built once by [`crate::processor::DocumentProcessor::extract_structured`];
/// immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub total_pages: usize,
    pub book_type: BookType,
    /// First content page (1-based); `None` only for an empty document.
    pub first_content_page: Option<usize>,
    pub text_extraction: TextExtraction,
    /// `None` when no index was found or too few entries were parsed.
    pub index: Option<IndexResult>,
    /// Accepted tables in page order.
    pub tables: Vec<StructuredTable>,
    pub summary: ExtractionSummary,
}

impl ExtractionReport {
    /// Serialise the report to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
