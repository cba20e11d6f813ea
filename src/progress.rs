//! Progress-callback trait for per-page extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as the orchestrator walks the document's text layer.
//!
//! Callbacks are the least-invasive integration point: callers can forward
//! events to a job-status record, a channel, or a terminal progress bar
//! without the library knowing how the host application communicates. All
//! methods have default no-op implementations so callers only override what
//! they care about.

use std::sync::Arc;

/// Called by the orchestrator as it extracts text from each page.
///
/// Implementations must be `Send + Sync` so one config can be shared freely;
/// within a single extraction run the calls arrive strictly in page order.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once before any page text is read.
    fn on_extraction_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called when a page's text was read (possibly empty).
    ///
    /// # Arguments
    /// * `page_num`   — 1-indexed page number
    /// * `total`      — total pages in the document
    /// * `char_count` — character count of the extracted text
    fn on_page_complete(&self, page_num: usize, total: usize, char_count: usize) {
        let _ = (page_num, total, char_count);
    }

    /// Called when a page's text layer failed; the page is recorded empty.
    fn on_page_error(&self, page_num: usize, total: usize, error: &str) {
        let _ = (page_num, total, error);
    }

    /// Called once after the last page, with the count of non-empty pages.
    fn on_extraction_complete(&self, total_pages: usize, text_pages: usize) {
        let _ = (total_pages, text_pages);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in
/// [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;
