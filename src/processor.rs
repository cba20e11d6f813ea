//! Document-structure orchestrator.
//!
//! [`DocumentProcessor`] owns one extraction run over an open
//! [`PageSource`]: it samples pages, drives classification, and sequences
//! full-text extraction, first-page detection, index extraction, and table
//! extraction into one [`ExtractionReport`].
//!
//! ## Lifecycle
//!
//! The conceptual state machine Unopened → Configuring → Ready → Closed maps
//! directly onto the type: [`DocumentProcessor::open`] performs the
//! configuring step (sampling + classification) and returns a Ready value;
//! dropping the processor — and the source behind it — closes the document
//! on every exit path. There is no half-open state to misuse.
//!
//! ## Degradation policy
//!
//! Every per-page failure is downgraded to an empty record and a `warn!`;
//! classification failure silently falls back to defaults. Only a missing
//! input document is fatal, and that is rejected before a processor exists.

use crate::config::ExtractionConfig;
use crate::document::{PageSource, PageText};
use crate::pipeline::classify::{BookStructureAnalyzer, BookType};
use crate::pipeline::firstpage::identify_first_content_page;
use crate::pipeline::index::AdaptiveIndexExtractor;
use crate::pipeline::tables::AdaptiveTableExtractor;
use crate::report::{
    ExtractionReport, ExtractionSummary, IndexResult, PageRecord, StructuredTable, TextExtraction,
};
use tracing::{debug, info, warn};

/// Number of characters of each sampled page fed to the classifier.
const SAMPLE_CHARS: usize = 1000;

/// Sequences the extraction pipeline over one open document.
pub struct DocumentProcessor<'a, S: PageSource> {
    source: &'a S,
    total_pages: usize,
    config: ExtractionConfig,
    book_type: BookType,
}

impl<'a, S: PageSource> DocumentProcessor<'a, S> {
    /// Open a processor over `source`.
    ///
    /// With no explicit config, samples up to 5 representative pages and
    /// adopts the configuration for the detected book type. Sampling
    /// failures are never fatal: the processor falls back to library
    /// defaults and [`BookType::Unknown`].
    pub fn open(source: &'a S, config: Option<ExtractionConfig>) -> Self {
        let total_pages = source.total_pages();
        let (config, book_type) = match config {
            Some(explicit) => (explicit, BookType::Unknown),
            None => {
                let samples = sample_pages(source, total_pages);
                if samples.is_empty() {
                    warn!("no usable samples, falling back to default configuration");
                    (ExtractionConfig::default(), BookType::Unknown)
                } else {
                    let book_type = BookStructureAnalyzer::classify(&samples, total_pages);
                    info!(book_type = book_type.as_str(), total_pages, "book type detected");
                    (BookStructureAnalyzer::config_for(book_type), book_type)
                }
            }
        };
        Self {
            source,
            total_pages,
            config,
            book_type,
        }
    }

    /// Total pages in the open document.
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// The detected (or Unknown, when a config was supplied) book type.
    pub fn book_type(&self) -> BookType {
        self.book_type
    }

    /// The active extraction configuration.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract the full text of the document, page by page.
    ///
    /// A page whose text layer fails is logged and recorded as an empty
    /// entry with `char_count` 0 — one bad page never aborts the document.
    pub fn extract_all_text(&self) -> TextExtraction {
        let cb = self.config.progress_callback.as_ref();
        if let Some(cb) = cb {
            cb.on_extraction_start(self.total_pages);
        }

        let mut pages = Vec::with_capacity(self.total_pages);
        for index in 0..self.total_pages {
            let page_number = index + 1;
            let text = match self.source.page_text(index) {
                Ok(t) => {
                    let t = t.trim().to_string();
                    if let Some(cb) = cb {
                        cb.on_page_complete(page_number, self.total_pages, t.chars().count());
                    }
                    t
                }
                Err(e) => {
                    warn!(page = page_number, error = %e, "text extraction failed, recording empty page");
                    if let Some(cb) = cb {
                        cb.on_page_error(page_number, self.total_pages, &e.to_string());
                    }
                    String::new()
                }
            };
            pages.push(PageRecord {
                page_number,
                char_count: text.chars().count(),
                text,
            });
        }

        let text_pages = pages.iter().filter(|p| !p.text.is_empty()).count();
        if let Some(cb) = cb {
            cb.on_extraction_complete(self.total_pages, text_pages);
        }
        // Blank pages keep their record but contribute nothing to the
        // joined text.
        let full_text = pages
            .iter()
            .filter(|p| !p.text.is_empty())
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        TextExtraction { pages, full_text }
    }

    /// Identify the first content page after the front matter.
    pub fn identify_first_content_page(&self) -> Option<usize> {
        identify_first_content_page(self.source, &self.config)
    }

    /// Extract the table of contents / index from the leading pages.
    ///
    /// `max_pages` overrides the configured scan window. Returns `None`
    /// when no index is found or too few entries are parsed.
    pub fn extract_index(&self, max_pages: Option<usize>) -> Option<IndexResult> {
        let window = max_pages
            .unwrap_or(self.config.max_index_pages)
            .min(self.total_pages);

        let mut pages = Vec::with_capacity(window);
        for index in 0..window {
            match self.source.page_text(index) {
                Ok(text) => pages.push(PageText::new(index + 1, text)),
                Err(e) => {
                    warn!(page = index + 1, error = %e, "skipping page in index scan");
                }
            }
        }
        AdaptiveIndexExtractor::new(&self.config).extract(&pages, Some(window))
    }

    /// Extract tables across a 1-based inclusive page range (whole document
    /// when `None`), accumulating accepted tables in page order.
    pub fn extract_tables(&self, range: Option<(usize, usize)>) -> Vec<StructuredTable> {
        let (start, end) = range.unwrap_or((1, self.total_pages));
        let start = start.max(1);
        let end = end.min(self.total_pages);

        let extractor = AdaptiveTableExtractor::new(&self.config);
        let mut all = Vec::new();
        for page_number in start..=end {
            match self.source.page_tables(page_number - 1) {
                Ok(grids) => all.extend(extractor.extract(&grids, page_number)),
                Err(e) => {
                    warn!(page = page_number, error = %e, "skipping page in table scan");
                }
            }
        }
        debug!(tables = all.len(), start, end, "table extraction finished");
        all
    }

    /// Run the whole pipeline and assemble the final report.
    pub fn extract_structured(&self) -> ExtractionReport {
        info!(total_pages = self.total_pages, "starting structured extraction");

        let text_extraction = self.extract_all_text();
        let first_content_page = self.identify_first_content_page();
        let index = self.extract_index(None);
        let tables = self.extract_tables(None);

        let summary = ExtractionSummary {
            total_pages: self.total_pages,
            book_type: self.book_type,
            first_content_page,
            total_text_pages: text_extraction
                .pages
                .iter()
                .filter(|p| !p.text.is_empty())
                .count(),
            index_found: index.is_some(),
            index_entries_count: index.as_ref().map_or(0, |i| i.entries.len()),
            tables_count: tables.len(),
            total_characters: text_extraction.pages.iter().map(|p| p.char_count).sum(),
        };
        info!(
            text_pages = summary.total_text_pages,
            index_found = summary.index_found,
            tables = summary.tables_count,
            "structured extraction complete"
        );

        ExtractionReport {
            total_pages: self.total_pages,
            book_type: self.book_type,
            first_content_page,
            text_extraction,
            index,
            tables,
            summary,
        }
    }
}

/// Sample up to 5 representative pages for classification: the first page,
/// an early page, a mid-early page, the midpoint, and a near-final page,
/// each clipped to range and truncated to the first [`SAMPLE_CHARS`] chars.
fn sample_pages<S: PageSource>(source: &S, total_pages: usize) -> Vec<String> {
    if total_pages == 0 {
        return Vec::new();
    }
    let indices = [
        0,
        5.min(total_pages - 1),
        10.min(total_pages - 1),
        total_pages / 2,
        total_pages.saturating_sub(5),
    ];

    let mut samples = Vec::new();
    for &index in &indices {
        if index >= total_pages {
            continue;
        }
        match source.page_text(index) {
            Ok(text) if !text.is_empty() => {
                samples.push(text.chars().take(SAMPLE_CHARS).collect());
            }
            Ok(_) => {}
            Err(e) => debug!(page = index + 1, error = %e, "sample page unreadable"),
        }
    }
    samples
}
