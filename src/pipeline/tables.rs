//! Table validation and normalisation.
//!
//! The engine scans every page indiscriminately, so most raw grids arriving
//! here are false positives: whitespace-aligned prose, decorative layouts,
//! fragments of a single wrapped paragraph. This stage is therefore mostly a
//! *rejection* filter — a rejected grid is expected behaviour and is dropped
//! silently (debug-logged, never an error). Only grids that survive all
//! checks become [`StructuredTable`]s, with every data row normalised to the
//! header's width so downstream consumers can index columns blindly.

use crate::config::ExtractionConfig;
use crate::document::RawTableGrid;
use crate::report::StructuredTable;
use tracing::debug;

/// Validates raw table grids and normalises them into structured records.
pub struct AdaptiveTableExtractor<'a> {
    config: &'a ExtractionConfig,
}

impl<'a> AdaptiveTableExtractor<'a> {
    pub fn new(config: &'a ExtractionConfig) -> Self {
        Self { config }
    }

    /// Validate and structure all raw grids detected on one page.
    ///
    /// Accepted tables are numbered sequentially per page starting at 1.
    /// Rejected grids are silently dropped. Idempotent: the same input
    /// always produces the same output.
    pub fn extract(&self, grids: &[RawTableGrid], page_number: usize) -> Vec<StructuredTable> {
        let mut accepted = Vec::new();
        for grid in grids {
            match self.structure(grid, page_number, accepted.len() + 1) {
                Some(table) => accepted.push(table),
                None => debug!(page = page_number, "table candidate rejected"),
            }
        }
        accepted
    }

    /// Apply the validation cascade and normalise one grid.
    fn structure(
        &self,
        grid: &RawTableGrid,
        page_number: usize,
        table_index: usize,
    ) -> Option<StructuredTable> {
        // Clean cells and drop fully-empty rows.
        let rows: Vec<Vec<String>> = grid
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.as_deref().unwrap_or("").trim().to_string())
                    .collect::<Vec<String>>()
            })
            .filter(|row| row.iter().any(|cell| !cell.is_empty()))
            .collect();

        let (header, data) = rows.split_first()?;
        // min_table_rows counts data rows beneath the header: one header
        // plus one data row is not yet a table.
        if data.len() < self.config.min_table_rows {
            return None;
        }
        let max_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        if max_cols < self.config.min_table_cols {
            return None;
        }

        // Fill ratio across all remaining rows, header included.
        let total_cells: usize = rows.iter().map(Vec::len).sum();
        let filled_cells = rows
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| !cell.is_empty())
            .count();
        if total_cells == 0 {
            return None;
        }
        if (filled_cells as f32 / total_cells as f32) < self.config.min_table_cell_fill {
            return None;
        }

        // A grid where most rows carry an overlong cell is a mis-detected
        // prose block, not a table.
        let overlong_rows = rows
            .iter()
            .filter(|row| {
                row.iter()
                    .any(|cell| cell.chars().count() > self.config.max_cell_length)
            })
            .count();
        if overlong_rows * 2 > rows.len() {
            return None;
        }

        // Normalise every data row to the header's width.
        let width = header.len();
        let data: Vec<Vec<String>> = data
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.resize(width, String::new());
                row
            })
            .collect();

        Some(StructuredTable {
            page_number,
            table_index,
            row_count: data.len(),
            column_count: width,
            header: header.clone(),
            data,
        })
    }
}
