//! First-content-page detection.
//!
//! Books open with a variable amount of front matter — cover, title page,
//! copyright, dedication — that downstream narration must skip. The scan is
//! two-pass: first look for a page that is both substantial and carries an
//! explicit opening indicator (introduction, chapter one, preface, ...),
//! with a substantial-content fallback for books whose first real page has
//! no such words; then settle for the first substantial page anywhere; and
//! finally default to the page right after the configured skip boundary.

use crate::config::ExtractionConfig;
use crate::document::PageSource;
use tracing::{debug, warn};

/// Identify the first content page (1-based) of a document.
///
/// Returns `None` only for an empty document; otherwise some page is always
/// chosen. Pages whose text layer fails are skipped without raising.
pub fn identify_first_content_page<S: PageSource>(
    source: &S,
    config: &ExtractionConfig,
) -> Option<usize> {
    let total = source.total_pages();
    if total == 0 {
        return None;
    }
    let skip = config.skip_initial_pages;
    let min_len = config.min_content_length;

    // Pass 1: indicator match, or substantial content well past the skip.
    for index in skip..total {
        let page_number = index + 1;
        let text = match source.page_text(index) {
            Ok(t) => t,
            Err(e) => {
                warn!(page = page_number, error = %e, "skipping unreadable page");
                continue;
            }
        };
        let lowered = text.trim().to_lowercase();
        let text_len = lowered.chars().count();
        if text_len < min_len {
            continue;
        }

        if config
            .content_indicators
            .iter()
            .any(|re| re.is_match(&lowered))
        {
            debug!(page = page_number, "first content page (indicator match)");
            return Some(page_number);
        }

        // More than 2 pages past the skip boundary with well over the
        // minimum: likely content even without an opening word.
        if page_number > skip + 2 && text_len as f32 > min_len as f32 * 1.5 {
            debug!(page = page_number, "first content page (substantial content)");
            return Some(page_number);
        }
    }

    // Pass 2: first substantial page anywhere past the skip.
    for index in skip..total {
        if let Ok(text) = source.page_text(index) {
            if text.trim().chars().count() > min_len {
                debug!(page = index + 1, "first content page (fallback)");
                return Some(index + 1);
            }
        }
    }

    // Default: page immediately after the skip boundary.
    Some((skip + 1).min(total))
}
