//! Configuration types for structure extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`] or selected automatically from a
//! detected [`crate::BookType`]. Keeping every knob in one struct makes it
//! trivial to share configs, log them, and diff two runs to understand why
//! their outputs differ.
//!
//! # Design choice: compiled patterns in the config
//! Pattern lists are stored as precompiled [`regex::Regex`] values, not
//! strings. The extractors match thousands of lines per document; compiling
//! once at config construction keeps the hot loops allocation-free. The
//! built-in defaults live in `Lazy` statics and are cloned into each config
//! (a `Regex` clone is a cheap handle, not a recompile).

use crate::error::Pdf2StructError;
use crate::progress::ProgressCallback;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

// ── Built-in pattern sets ────────────────────────────────────────────────

/// Keywords that mark a table-of-contents / index page.
static DEFAULT_INDEX_KEYWORDS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\btable\s+of\s+contents\b",
        r"(?i)\bcontents\b",
        r"(?i)\bindex\b",
        r"(?i)\btoc\b",
        r"(?i)\boverview\b",
        r"(?i)\bchapters?\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Entry-line patterns, tried in order; first match wins.
///
/// Named groups carry the parse: `num` (enumerator label), `title`, and
/// `page` (trailing dotted page reference). A pattern without a `title`
/// group falls back to the whole line as title.
static DEFAULT_ENTRY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // "1. Introduction ... 5" / "IV) Methods" / "chapter 3 The Storm ... 41"
        r"(?i)^\s*(?P<num>[IVX]+[.)]?|\d+[.)]?|chapter\s+\d+|part\s+\d+)\s+(?P<title>.+?)(?:\s*\.{2,}\s*(?P<page>\d+))?\s*$",
        // "2) Results" with no page reference
        r"(?i)^\s*(?P<num>[IVX]+[.)]?|\d+[.)]?)\s+(?P<title>.+?)\s*$",
        // Bare capitalised heading, optionally dotted to a page
        r"^\s*(?P<title>[A-Z][^.]{3,50})(?:\s*\.{2,}\s*(?P<page>\d+))?\s*$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Phrases that mark the first content page of a book.
static DEFAULT_CONTENT_INDICATORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\bintroduction\b",
        r"(?i)\bchapter\s+[1i]",
        r"(?i)\bpreface\b",
        r"(?i)\bforeword\b",
        r"(?i)\bprologue\b",
        r"(?i)\bpart\s+[1i]",
        r"(?i)\bchapter\s+one\b",
        r"(?i)\bchapter\s+first\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

// ── Config ───────────────────────────────────────────────────────────────

/// Configuration for one document-extraction run.
///
/// Built via [`ExtractionConfig::builder()`], [`ExtractionConfig::default()`],
/// or [`crate::BookStructureAnalyzer::config_for`]. One instance per
/// document; read-only after construction.
///
/// # Example
/// ```rust
/// use pdf2struct::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .max_index_pages(25)
///     .min_index_entries(5)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_index_pages, 25);
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Patterns that mark a page (and the in-page header line) as a
    /// table-of-contents / index. Ordered; any match counts.
    pub index_keywords: Vec<Regex>,

    /// Entry-line patterns with `num`/`title`/`page` named groups, tried in
    /// order per line; the first match wins.
    pub entry_patterns: Vec<Regex>,

    /// How many leading pages to scan for an index. Default: 15.
    ///
    /// Indexes live in the front matter; scanning the whole book would let
    /// the statistical locator latch onto list-heavy body pages. Novels get
    /// a much smaller window, textbooks a larger one.
    pub max_index_pages: usize,

    /// Minimum committed entries for an index result to count. Default: 3.
    ///
    /// Below this the whole extraction reports "no index" rather than a
    /// partial list — two stray matched lines are noise, not a TOC.
    pub min_index_entries: usize,

    /// Patterns that mark the first content page (introduction, chapter one,
    /// preface, ...).
    pub content_indicators: Vec<Regex>,

    /// Minimum text length for a page to qualify as content. Default: 200.
    pub min_content_length: usize,

    /// Pages to skip before first-content-page scanning begins. Default: 0.
    ///
    /// Novels set this to 3: cover, title page, and copyright page routinely
    /// contain enough text to fool the length check.
    pub skip_initial_pages: usize,

    /// Minimum data rows (beneath the header) for a table candidate. Default: 2.
    pub min_table_rows: usize,

    /// Minimum column count for a table candidate. Default: 2.
    pub min_table_cols: usize,

    /// Minimum filled-cell ratio for a table candidate. Default: 0.3.
    ///
    /// Sparse grids are usually mis-detected whitespace alignment in prose.
    /// Academic configs raise this because legitimate tables there are dense.
    pub min_table_cell_fill: f32,

    /// Cells longer than this signal a mis-detected prose block. Default: 500.
    pub max_cell_length: usize,

    /// Optional per-page progress callback, fired during full-text
    /// extraction. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            index_keywords: DEFAULT_INDEX_KEYWORDS.clone(),
            entry_patterns: DEFAULT_ENTRY_PATTERNS.clone(),
            max_index_pages: 15,
            min_index_entries: 3,
            content_indicators: DEFAULT_CONTENT_INDICATORS.clone(),
            min_content_length: 200,
            skip_initial_pages: 0,
            min_table_rows: 2,
            min_table_cols: 2,
            min_table_cell_fill: 0.3,
            max_cell_length: 500,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("index_keywords", &self.index_keywords.len())
            .field("entry_patterns", &self.entry_patterns.len())
            .field("max_index_pages", &self.max_index_pages)
            .field("min_index_entries", &self.min_index_entries)
            .field("content_indicators", &self.content_indicators.len())
            .field("min_content_length", &self.min_content_length)
            .field("skip_initial_pages", &self.skip_initial_pages)
            .field("min_table_rows", &self.min_table_rows)
            .field("min_table_cols", &self.min_table_cols)
            .field("min_table_cell_fill", &self.min_table_cell_fill)
            .field("max_cell_length", &self.max_cell_length)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
            index_keywords: None,
            entry_patterns: None,
            content_indicators: None,
        }
    }
}

/// Builder for [`ExtractionConfig`].
///
/// Custom pattern lists are accepted as strings and compiled in [`build`],
/// so a malformed pattern surfaces as
/// [`Pdf2StructError::InvalidConfig`] instead of a panic deep inside an
/// extraction loop.
///
/// [`build`]: ExtractionConfigBuilder::build
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
    index_keywords: Option<Vec<String>>,
    entry_patterns: Option<Vec<String>>,
    content_indicators: Option<Vec<String>>,
}

impl ExtractionConfigBuilder {
    /// Replace the built-in index-keyword patterns.
    pub fn index_keywords<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index_keywords = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the built-in entry-line patterns.
    ///
    /// Patterns should carry `num`/`title`/`page` named capture groups; a
    /// pattern without a `title` group binds the whole line as the title.
    pub fn entry_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entry_patterns = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the built-in content-indicator patterns.
    pub fn content_indicators<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content_indicators = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    pub fn max_index_pages(mut self, n: usize) -> Self {
        self.config.max_index_pages = n.max(1);
        self
    }

    pub fn min_index_entries(mut self, n: usize) -> Self {
        self.config.min_index_entries = n.max(1);
        self
    }

    pub fn min_content_length(mut self, n: usize) -> Self {
        self.config.min_content_length = n;
        self
    }

    pub fn skip_initial_pages(mut self, n: usize) -> Self {
        self.config.skip_initial_pages = n;
        self
    }

    pub fn min_table_rows(mut self, n: usize) -> Self {
        self.config.min_table_rows = n.max(1);
        self
    }

    pub fn min_table_cols(mut self, n: usize) -> Self {
        self.config.min_table_cols = n.max(1);
        self
    }

    pub fn min_table_cell_fill(mut self, ratio: f32) -> Self {
        self.config.min_table_cell_fill = ratio;
        self
    }

    pub fn max_cell_length(mut self, n: usize) -> Self {
        self.config.max_cell_length = n.max(1);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, compiling custom patterns and validating
    /// thresholds.
    pub fn build(mut self) -> Result<ExtractionConfig, Pdf2StructError> {
        if let Some(raw) = self.index_keywords.take() {
            self.config.index_keywords = compile_patterns("index_keywords", &raw)?;
        }
        if let Some(raw) = self.entry_patterns.take() {
            self.config.entry_patterns = compile_patterns("entry_patterns", &raw)?;
        }
        if let Some(raw) = self.content_indicators.take() {
            self.config.content_indicators = compile_patterns("content_indicators", &raw)?;
        }

        let c = &self.config;
        if !(0.0..=1.0).contains(&c.min_table_cell_fill) {
            return Err(Pdf2StructError::InvalidConfig(format!(
                "min_table_cell_fill must be 0.0–1.0, got {}",
                c.min_table_cell_fill
            )));
        }
        if c.index_keywords.is_empty() || c.entry_patterns.is_empty() {
            return Err(Pdf2StructError::InvalidConfig(
                "pattern lists must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

fn compile_patterns(field: &str, raw: &[String]) -> Result<Vec<Regex>, Pdf2StructError> {
    raw.iter()
        .map(|p| {
            Regex::new(p).map_err(|e| {
                Pdf2StructError::InvalidConfig(format!("{field}: bad pattern {p:?}: {e}"))
            })
        })
        .collect()
}
