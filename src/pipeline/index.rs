//! Adaptive table-of-contents / index extraction.
//!
//! ## Why cascading strategies?
//!
//! A TOC announces itself in wildly different ways: an explicit "Table of
//! Contents" heading, a bare column of enumerated lines, or nothing but a
//! statistical silhouette of short lines. No single detector covers all
//! three, so the locator runs an ordered cascade — keyword, enumerator,
//! statistical — where each tier is tried only if the previous found
//! nothing. The tiers share one signature and are dispatched from a plain
//! function slice; there is no strategy trait hierarchy to maintain.
//!
//! Entry parsing is a small line-by-line state machine with one open entry
//! at a time. The tricky part is not matching entries but *refusing* prose:
//! body text wraps into short lines that look exactly like index entries,
//! so the parser carries an early-stop test, a front-matter skip list, and a
//! final defensive filter. The numeric thresholds here are heuristic tuning
//! values, kept together so they can be recalibrated against a corpus.

use crate::config::ExtractionConfig;
use crate::document::PageText;
use crate::report::{IndexEntry, IndexResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

/// Roman-numeral or digit enumerator, e.g. `IV.`, `12)`.
static ENUMERATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[IVX]+[.)]|\d+[.)]").unwrap());

/// Enumerator at line start (anchored variant used by the heading fallback).
static ENUMERATOR_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[IVX]+[.)]|\d+[.)]").unwrap());

/// A line opening with a common English function word — the signature of
/// flowing prose rather than an index entry.
static PROSE_OPENER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(this|the|we|it|in|on|at)\s").unwrap());

/// Prose opener followed by lowercase text; the stronger content signal
/// used by the early-stop test and the heading fallback.
static CONTENT_STARTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(this|the|we|it|in|on|at|as|to|for|of|a|an)\s+[a-z]").unwrap());

/// Final-filter variant: function word followed by a long lowercase run.
/// Applied to lower-cased titles in a second defensive pass.
static CONTENT_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(this|the|we|it|in|on|at|as|to|for|of|a|an)\s+[a-z]{10,}").unwrap()
});

/// Front-matter noise that shows up inside TOC pages but is never an entry.
const FRONT_MATTER_NOISE: [&str; 4] = ["copyright", "title page", "dedication", "epigraph"];

/// Closing-section vocabulary accepted as unnumbered headings.
const CLOSING_SECTIONS: [&str; 9] = [
    "epilogue",
    "notes",
    "suggestions",
    "about",
    "appendix",
    "bibliography",
    "references",
    "prologue",
    "preface",
];

/// Locates and parses a table-of-contents/index from page text.
pub struct AdaptiveIndexExtractor<'a> {
    config: &'a ExtractionConfig,
}

impl<'a> AdaptiveIndexExtractor<'a> {
    pub fn new(config: &'a ExtractionConfig) -> Self {
        Self { config }
    }

    /// Extract an index from the leading pages of a document.
    ///
    /// Scans the first `min(max_pages, pages.len())` pages (defaulting
    /// `max_pages` to the configured window). Returns `None` when no tier
    /// locates index pages or when fewer than `min_index_entries` entries
    /// are parsed — never a partial list.
    pub fn extract(&self, pages: &[PageText], max_pages: Option<usize>) -> Option<IndexResult> {
        let limit = max_pages
            .unwrap_or(self.config.max_index_pages)
            .min(pages.len());
        let window = &pages[..limit];

        let strategies: [(&str, fn(&Self, &[PageText]) -> Vec<usize>); 3] = [
            ("keyword", Self::locate_by_keywords),
            ("enumerator", Self::locate_by_enumerators),
            ("statistical", Self::locate_by_statistics),
        ];

        let mut located: Vec<usize> = Vec::new();
        for (name, strategy) in strategies {
            located = strategy(self, window);
            if !located.is_empty() {
                debug!(strategy = name, pages = located.len(), "index pages located");
                break;
            }
        }
        if located.is_empty() {
            debug!("no index pages found by any strategy");
            return None;
        }

        let raw_text = located
            .iter()
            .map(|&i| window[i].text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let entries = self.parse_entries(&raw_text);

        if entries.len() < self.config.min_index_entries {
            debug!(
                found = entries.len(),
                minimum = self.config.min_index_entries,
                "too few index entries, reporting no index"
            );
            return None;
        }

        Some(IndexResult {
            page_number: window[located[0]].page_number,
            pages: located.iter().map(|&i| window[i].page_number).collect(),
            entries,
            raw_text,
        })
    }

    // ── Tier 1: keyword locator ──────────────────────────────────────────

    /// First page matching an index keyword, plus up to two continuation
    /// pages absorbed greedily.
    fn locate_by_keywords(&self, pages: &[PageText]) -> Vec<usize> {
        for (i, page) in pages.iter().enumerate() {
            if self
                .config
                .index_keywords
                .iter()
                .any(|re| re.is_match(&page.text))
            {
                let mut hit = vec![i];
                for (j, next) in pages.iter().enumerate().skip(i + 1).take(2) {
                    if looks_like_continuation(&next.text) {
                        hit.push(j);
                    } else {
                        break;
                    }
                }
                return hit;
            }
        }
        Vec::new()
    }

    // ── Tier 2: enumerator locator ───────────────────────────────────────

    /// First page with at least 3 enumerated lines, plus at most one
    /// continuation page.
    fn locate_by_enumerators(&self, pages: &[PageText]) -> Vec<usize> {
        for (i, page) in pages.iter().enumerate() {
            let enumerated = page
                .text
                .lines()
                .filter(|l| ENUMERATOR.is_match(l))
                .count();
            if enumerated >= 3 {
                let mut hit = vec![i];
                if let Some(next) = pages.get(i + 1) {
                    if looks_like_continuation(&next.text) {
                        hit.push(i + 1);
                    }
                }
                return hit;
            }
        }
        Vec::new()
    }

    // ── Tier 3: statistical locator ──────────────────────────────────────

    /// A page whose line population is dominated by short lines.
    ///
    /// Index pages have many short entry titles, few long lines, and a low
    /// mean line length — a silhouette that separates them from prose even
    /// without any keyword. Only the first 10 pages are considered; deeper
    /// in the book this profile matches list-heavy body pages too often.
    fn locate_by_statistics(&self, pages: &[PageText]) -> Vec<usize> {
        for (i, page) in pages.iter().take(10).enumerate() {
            let lines = non_empty_lines(&page.text);
            if lines.len() < 5 {
                continue;
            }
            let n = lines.len() as f32;
            let avg = lines.iter().map(|l| char_len(l)).sum::<usize>() as f32 / n;
            let short = lines
                .iter()
                .filter(|l| {
                    let len = char_len(l);
                    len > 10 && len < 80
                })
                .count() as f32;
            let long = lines.iter().filter(|l| char_len(l) > 150).count() as f32;

            if short > n * 0.5 && long < n * 0.2 && avg < 60.0 {
                return vec![i];
            }
        }
        Vec::new()
    }

    // ── Entry parsing ────────────────────────────────────────────────────

    /// Parse committed entries out of the concatenated located-page text.
    ///
    /// Collection starts only after a keyword header line. One entry is
    /// open at a time; unmatched short lines extend it (wrapped titles),
    /// blank lines commit it, and body-content lines stop the scan once the
    /// minimum entry count is met.
    fn parse_entries(&self, text: &str) -> Vec<IndexEntry> {
        let min_entries = self.config.min_index_entries;
        let mut entries: Vec<IndexEntry> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut open: Option<IndexEntry> = None;
        let mut collecting = false;

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() {
                commit(&mut entries, &mut seen, open.take());
                continue;
            }

            if !collecting {
                // The keyword line itself is a header, not an entry.
                if self
                    .config
                    .index_keywords
                    .iter()
                    .any(|re| re.is_match(line))
                {
                    collecting = true;
                }
                continue;
            }

            if is_content_line(line, entries.len(), min_entries) {
                if entries.len() >= min_entries {
                    break;
                }
                continue;
            }

            let lower = line.to_lowercase();
            if open.is_none() && FRONT_MATTER_NOISE.iter().any(|w| lower.contains(w)) {
                continue;
            }

            if let Some(matched) = self.match_entry(line) {
                commit(&mut entries, &mut seen, open.replace(matched));
                continue;
            }

            // Unmatched: wrapped continuation of the open entry, or close
            // it and give the line one unnumbered-heading chance.
            if let Some(current) = open.as_mut() {
                let line_len = char_len(line);
                if line_len < 150
                    && char_len(&current.title) + line_len < 300
                    && lower != current.title.to_lowercase()
                {
                    current.title.push(' ');
                    current.title.push_str(line);
                    continue;
                }
                commit(&mut entries, &mut seen, open.take());
            }
            if let Some(heading) = unnumbered_heading(line) {
                commit(&mut entries, &mut seen, Some(heading));
            }
        }
        commit(&mut entries, &mut seen, open.take());

        // Second defensive pass: drop entries whose title still reads like
        // a swallowed content line.
        entries.retain(|e| !CONTENT_PHRASE.is_match(&e.title.to_lowercase()));
        entries
    }

    /// Try each configured entry pattern in order; first valid match wins.
    fn match_entry(&self, line: &str) -> Option<IndexEntry> {
        for re in &self.config.entry_patterns {
            let Some(caps) = re.captures(line) else {
                continue;
            };
            let title_raw = caps.name("title").map_or(line, |m| m.as_str());
            let title = collapse_doubled_title(title_raw.trim());
            let len = char_len(&title);
            if len <= 2 || len >= 300 {
                continue;
            }
            return Some(IndexEntry {
                entry_number: caps.name("num").map(|m| normalize_label(m.as_str())),
                title,
                page_reference: caps
                    .name("page")
                    .and_then(|m| m.as_str().parse::<u32>().ok()),
            });
        }
        None
    }
}

// ── Line heuristics ──────────────────────────────────────────────────────

/// Whether `text` extends a multi-page index rather than starting content.
///
/// Requires at least 3 non-empty lines, an entry-like shape (2+ enumerated
/// lines or >60% short lines), and almost no prose openers — the latter
/// guards against absorbing a page that merely begins with short lines.
fn looks_like_continuation(text: &str) -> bool {
    let lines = non_empty_lines(text);
    if lines.len() < 3 {
        return false;
    }
    let numbered = lines.iter().filter(|l| ENUMERATOR.is_match(l)).count();
    let short = lines
        .iter()
        .filter(|l| {
            let len = char_len(l);
            len > 5 && len < 100
        })
        .count();
    let prose = lines.iter().filter(|l| PROSE_OPENER.is_match(l)).count();

    (numbered >= 2 || short as f32 > lines.len() as f32 * 0.6) && prose < 2
}

/// Whether a line is body content rather than an index entry.
fn is_content_line(line: &str, committed: usize, min_entries: usize) -> bool {
    if char_len(line) > 250 {
        return true;
    }
    CONTENT_STARTER.is_match(line) && committed >= min_entries
}

/// Fallback test for unnumbered headings like "Epilogue" or "Notes".
fn unnumbered_heading(line: &str) -> Option<IndexEntry> {
    let len = char_len(line);
    if len <= 2 || len >= 80 {
        return None;
    }
    if !line.chars().next().is_some_and(|c| c.is_uppercase()) {
        return None;
    }
    let all_caps =
        line.chars().any(|c| c.is_alphabetic()) && !line.chars().any(|c| c.is_lowercase());
    if all_caps || ENUMERATOR_PREFIX.is_match(line) {
        return None;
    }

    let lower = line.to_lowercase();
    let known = CLOSING_SECTIONS.iter().any(|k| lower.starts_with(k));
    let short_heading = line.split_whitespace().count() <= 4 && !CONTENT_STARTER.is_match(line);
    if known || short_heading {
        Some(IndexEntry {
            entry_number: None,
            title: line.to_string(),
            page_reference: None,
        })
    } else {
        None
    }
}

/// Commit an entry: validate title length, deduplicate case-insensitively.
fn commit(entries: &mut Vec<IndexEntry>, seen: &mut HashSet<String>, entry: Option<IndexEntry>) {
    let Some(entry) = entry else { return };
    let key = entry.title.trim().to_lowercase();
    let len = key.chars().count();
    if len <= 2 || len >= 300 {
        return;
    }
    if seen.insert(key) {
        entries.push(entry);
    }
}

/// Trim trailing `.`/`)` from an enumerator label (`"1."` → `"1"`).
fn normalize_label(label: &str) -> String {
    label.trim().trim_end_matches(['.', ')']).to_string()
}

/// Collapse a title that is an exact word-for-word repeat of its first half,
/// a common rendering artifact ("The Storm The Storm" → "The Storm").
fn collapse_doubled_title(title: &str) -> String {
    let words: Vec<&str> = title.split_whitespace().collect();
    let half = words.len() / 2;
    if words.len() > 1 && words.len() % 2 == 0 && words[..half] == words[half..] {
        words[..half].join(" ")
    } else {
        words.join(" ")
    }
}

fn non_empty_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(texts: &[&str]) -> Vec<PageText> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| PageText::new(i + 1, *t))
            .collect()
    }

    #[test]
    fn parses_dotted_toc_page() {
        let config = ExtractionConfig::default();
        let extractor = AdaptiveIndexExtractor::new(&config);
        let input = pages(&[
            "Table of Contents\n1. Introduction ... 5\n2. Methods ... 20\n3. Results ... 45\n",
        ]);

        let result = extractor.extract(&input, None).expect("index expected");
        assert_eq!(result.page_number, 1);
        assert_eq!(result.pages, vec![1]);
        assert_eq!(result.entries.len(), 3);
        assert_eq!(
            result.entries[0],
            IndexEntry {
                entry_number: Some("1".into()),
                title: "Introduction".into(),
                page_reference: Some(5),
            }
        );
        assert_eq!(result.entries[1].title, "Methods");
        assert_eq!(result.entries[1].page_reference, Some(20));
        assert_eq!(result.entries[2].title, "Results");
        assert_eq!(result.entries[2].page_reference, Some(45));
    }

    #[test]
    fn entries_are_deduplicated_case_insensitively() {
        let config = ExtractionConfig::default();
        let extractor = AdaptiveIndexExtractor::new(&config);
        let input = pages(&[
            "Contents\n1. Introduction ... 5\n2. INTRODUCTION ... 5\n3. Methods ... 20\n4. Results ... 45\n",
        ]);

        let result = extractor.extract(&input, None).expect("index expected");
        let mut lowered: Vec<String> = result
            .entries
            .iter()
            .map(|e| e.title.trim().to_lowercase())
            .collect();
        let total = lowered.len();
        lowered.sort();
        lowered.dedup();
        assert_eq!(lowered.len(), total, "duplicate titles survived");
        assert_eq!(total, 3);
    }

    #[test]
    fn too_few_entries_yield_none_not_partial() {
        let config = ExtractionConfig::default(); // min_index_entries = 3
        let extractor = AdaptiveIndexExtractor::new(&config);
        let input = pages(&["Contents\n1. Introduction ... 5\n2. Methods ... 20\n"]);
        assert!(extractor.extract(&input, None).is_none());
    }

    #[test]
    fn no_keyword_page_yields_none() {
        let config = ExtractionConfig::default();
        let extractor = AdaptiveIndexExtractor::new(&config);
        let input = pages(&["Just a page of ordinary prose without any marker."]);
        assert!(extractor.extract(&input, None).is_none());
    }

    #[test]
    fn keyword_locator_absorbs_continuation_pages() {
        let config = ExtractionConfig::default();
        let extractor = AdaptiveIndexExtractor::new(&config);
        let input = pages(&[
            "Table of Contents\n1. The Harbour ... 3\n2. The Storm ... 19\n3. Landfall ... 40\n",
            "4. The Crossing ... 77\n5. Aftermath ... 102\n6. Reckoning ... 131\n",
            "It was a dark morning and the rain had not stopped since the harbour \
             lights went out. The crew waited below deck for the order.",
        ]);

        let result = extractor.extract(&input, None).expect("index expected");
        assert_eq!(result.pages, vec![1, 2], "prose page must not be absorbed");
        assert!(result.entries.iter().any(|e| e.title == "The Crossing"));
        assert_eq!(result.entries.len(), 6);
    }

    #[test]
    fn wrapped_titles_are_joined() {
        let config = ExtractionConfig::builder()
            .min_index_entries(2)
            .build()
            .unwrap();
        let extractor = AdaptiveIndexExtractor::new(&config);
        let input = pages(&[
            "Contents\n1. A Very Long Chapter Name That\ncontinues onto the next line\n2. Closing ... 55\n",
        ]);

        let result = extractor.extract(&input, None).expect("index expected");
        // The lowercase wrapped tail matches no entry pattern and merges
        // into the open entry's title.
        assert_eq!(
            result.entries[0].title,
            "A Very Long Chapter Name That continues onto the next line"
        );
        assert_eq!(result.entries[1].title, "Closing");
    }

    #[test]
    fn doubled_titles_collapse_to_first_half() {
        assert_eq!(collapse_doubled_title("The Storm The Storm"), "The Storm");
        assert_eq!(collapse_doubled_title("The Storm"), "The Storm");
        assert_eq!(collapse_doubled_title("One Two One"), "One Two One");
    }

    #[test]
    fn content_prose_stops_the_scan_after_minimum() {
        let config = ExtractionConfig::default();
        let extractor = AdaptiveIndexExtractor::new(&config);
        // The committed count lags one behind the open entry, so the prose
        // line is only judged once entries 1–3 are committed (entry 4 open).
        let input = pages(&[
            "Contents\n1. Introduction ... 5\n2. Methods ... 20\n3. Results ... 45\n\
             4. Discussion ... 71\n\
             The experimental campaign described here was carried out over two years\n\
             5. Phantom ... 99\n",
        ]);

        let result = extractor.extract(&input, None).expect("index expected");
        assert_eq!(result.entries.len(), 4, "scan should stop at body prose");
        assert!(result.entries.iter().all(|e| e.title != "Phantom"));
    }

    #[test]
    fn front_matter_noise_is_skipped() {
        let config = ExtractionConfig::default();
        let extractor = AdaptiveIndexExtractor::new(&config);
        let input = pages(&[
            "Contents\nCopyright 2019 by the publisher\n1. Introduction ... 5\n\
             2. Methods ... 20\n3. Results ... 45\n",
        ]);

        let result = extractor.extract(&input, None).expect("index expected");
        assert_eq!(result.entries.len(), 3);
        assert!(result.entries.iter().all(|e| !e.title.contains("Copyright")));
    }

    #[test]
    fn unnumbered_heading_accepts_closing_sections() {
        let heading =
            unnumbered_heading("Notes on sources and methods for the revised second edition");
        assert_eq!(
            heading.map(|e| e.title),
            Some("Notes on sources and methods for the revised second edition".to_string())
        );

        assert!(unnumbered_heading("EPILOGUE").is_none(), "all-caps rejected");
        assert!(
            unnumbered_heading("The harbour was empty when we arrived there that night").is_none(),
            "sentence-like line rejected"
        );
    }

    #[test]
    fn statistical_locator_fires_on_short_line_pages() {
        let config = ExtractionConfig::default();
        let extractor = AdaptiveIndexExtractor::new(&config);
        let toc_like = "First Steps Ashore 3\nThe Quiet Harbour Town 11\nSigns Of The Storm 24\n\
                        A Long Night Below Deck 39\nMorning After Landfall 57\nWhat The Tide Left 72\n";
        let input = pages(&[toc_like]);

        assert_eq!(extractor.locate_by_statistics(&input), vec![0]);

        let prose = "It was a dark morning and the rain had not stopped since the harbour \
                     lights went out, which everyone aboard took as a warning sign of worse weather.";
        assert!(extractor.locate_by_statistics(&pages(&[prose])).is_empty());
    }

    #[test]
    fn enumerator_locator_finds_keywordless_lists() {
        let config = ExtractionConfig::default();
        let extractor = AdaptiveIndexExtractor::new(&config);
        let input = pages(&[
            "nothing tabular here",
            "1. First ... 5\n2. Second ... 9\n3. Third ... 14\n",
        ]);
        assert_eq!(extractor.locate_by_enumerators(&input), vec![1]);
    }

    #[test]
    fn final_filter_drops_swallowed_content_lines() {
        // An entry whose title begins with a function word followed by a
        // long lowercase run reads like prose and is filtered in the final
        // pass, even though it parsed as an entry.
        let config = ExtractionConfig::builder()
            .min_index_entries(1)
            .build()
            .unwrap();
        let extractor = AdaptiveIndexExtractor::new(&config);
        let input = pages(&[
            "Contents\n1. Landfall ... 7\n2. The Extraordinary Voyage ... 22\n3. Coda ... 41\n",
        ]);

        let result = extractor.extract(&input, None).expect("index expected");
        assert!(result.entries.iter().any(|e| e.title == "Landfall"));
        assert!(result.entries.iter().any(|e| e.title == "Coda"));
        assert!(
            result.entries.iter().all(|e| e.title != "The Extraordinary Voyage"),
            "prose-shaped title should be filtered"
        );
    }

    #[test]
    fn max_pages_limits_the_scan_window() {
        let config = ExtractionConfig::default();
        let extractor = AdaptiveIndexExtractor::new(&config);
        let input = pages(&[
            "cover page",
            "Table of Contents\n1. Introduction ... 5\n2. Methods ... 20\n3. Results ... 45\n",
        ]);

        assert!(extractor.extract(&input, Some(1)).is_none());
        assert!(extractor.extract(&input, Some(2)).is_some());
    }
}
