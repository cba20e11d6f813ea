//! Candidate table grids from a page's text layer.
//!
//! The pdfium text layer exposes characters, not table geometry. What it
//! does preserve is column alignment: cells on one printed row come out as
//! one text line with runs of 2+ spaces (or tabs) between them. A block of
//! 3+ consecutive such lines is a plausible table, so this module splits
//! those blocks into [`RawTableGrid`]s and hands them to the validation
//! stage — which is strict precisely because this detector is permissive.
//!
//! Sources with a real table-detection layer skip this module entirely and
//! feed their own grids through [`crate::document::PageSource::page_tables`].

use crate::document::RawTableGrid;
use once_cell::sync::Lazy;
use regex::Regex;

/// Cell separator: a tab, or a run of two-plus spaces.
static CELL_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\t|\s{2,}").unwrap());

/// Minimum consecutive aligned lines for a block to count as a candidate.
const MIN_BLOCK_LINES: usize = 3;

/// Detect candidate grids in one page's text.
///
/// Blocks are separated by blank lines or non-aligned lines; each block of
/// [`MIN_BLOCK_LINES`]+ aligned lines yields one grid. Rows keep their
/// natural (possibly ragged) widths; downstream validation normalises them.
pub fn detect_grids(text: &str) -> Vec<RawTableGrid> {
    let mut grids = Vec::new();
    let mut block: Vec<Vec<Option<String>>> = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        match split_cells(line) {
            Some(cells) => block.push(cells),
            None => flush_block(&mut block, &mut grids),
        }
    }
    flush_block(&mut block, &mut grids);
    grids
}

/// Split a line into cells, or `None` if it does not look like a table row.
///
/// A row needs at least 2 non-empty cells and a little width; anything
/// narrower is prose or a stray word.
fn split_cells(line: &str) -> Option<Vec<Option<String>>> {
    if line.chars().count() < 5 {
        return None;
    }
    let cells: Vec<Option<String>> = CELL_SPLIT
        .split(line)
        .filter(|s| !s.is_empty())
        .map(|s| Some(s.trim().to_string()))
        .collect();
    if cells.len() >= 2 {
        Some(cells)
    } else {
        None
    }
}

fn flush_block(block: &mut Vec<Vec<Option<String>>>, grids: &mut Vec<RawTableGrid>) {
    if block.len() >= MIN_BLOCK_LINES {
        grids.push(std::mem::take(block));
    } else {
        block.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_block_becomes_a_grid() {
        let text = "Some introductory prose.\n\
                    Name      Value   Unit\n\
                    mass      12.5    kg\n\
                    length    3.2     m\n\
                    \n\
                    More prose afterwards.";
        let grids = detect_grids(text);
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0].len(), 3);
        assert_eq!(grids[0][0][0], Some("Name".to_string()));
        assert_eq!(grids[0][2][2], Some("m".to_string()));
    }

    #[test]
    fn two_aligned_lines_are_not_enough() {
        let text = "Name      Value\nmass      12.5\n";
        assert!(detect_grids(text).is_empty());
    }

    #[test]
    fn tabs_separate_cells_too() {
        let text = "a\tb\tc\n1\t2\t3\n4\t5\t6\n";
        let grids = detect_grids(text);
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0][1], vec![Some("1".into()), Some("2".into()), Some("3".into())]);
    }

    #[test]
    fn blocks_are_split_on_prose_lines() {
        let text = "aaa  bbb\nccc  ddd\neee  fff\n\
                    then one plain sentence in the middle of it all breaks the block\n\
                    ggg  hhh\niii  jjj\nkkk  lll\n";
        let grids = detect_grids(text);
        assert_eq!(grids.len(), 2);
    }

    #[test]
    fn plain_prose_yields_no_grids() {
        let text = "It was a dark morning.\nThe rain had not stopped.\n";
        assert!(detect_grids(text).is_empty());
    }

    #[test]
    fn ragged_rows_keep_their_widths() {
        let text = "h1  h2  h3\naa  bb\nc  d  e  f\n";
        let grids = detect_grids(text);
        assert_eq!(grids[0][0].len(), 3);
        assert_eq!(grids[0][1].len(), 2);
        assert_eq!(grids[0][2].len(), 4);
    }
}
