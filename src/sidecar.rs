//! Sidecar file outputs for one extraction run.
//!
//! Downstream narration stages consume files, not in-memory structs: the
//! JSON report for the service layer, a plain-text dump for TTS chunking, a
//! human-readable index rendering, and one CSV per accepted table. All
//! writes go through a temp-file + rename so a crashed run never leaves a
//! half-written sidecar behind for the next pipeline stage to trip over.

use crate::error::Pdf2StructError;
use crate::report::ExtractionReport;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where each sidecar landed. `index` and `tables_dir` are `None` when the
/// corresponding structure was absent from the report.
#[derive(Debug, Clone)]
pub struct SidecarPaths {
    pub json: PathBuf,
    pub full_text: PathBuf,
    pub index: Option<PathBuf>,
    pub tables_dir: Option<PathBuf>,
}

/// Write the full sidecar set for `report` under `output_dir`.
///
/// Produces `<stem>_extraction.json`, `<stem>_full_text.txt`, and — when
/// present in the report — `<stem>_index.txt` plus
/// `tables/page_{p}_table_{i}.csv` per table.
pub fn write_report(
    report: &ExtractionReport,
    output_dir: &Path,
    stem: &str,
) -> Result<SidecarPaths, Pdf2StructError> {
    fs::create_dir_all(output_dir).map_err(|e| Pdf2StructError::OutputWriteFailed {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let json_path = output_dir.join(format!("{stem}_extraction.json"));
    let json = report
        .to_json()
        .map_err(|e| Pdf2StructError::Internal(format!("report serialisation: {e}")))?;
    atomic_write(&json_path, json.as_bytes())?;

    let text_path = output_dir.join(format!("{stem}_full_text.txt"));
    atomic_write(&text_path, report.text_extraction.full_text.as_bytes())?;

    let index_path = match &report.index {
        Some(index) => {
            let path = output_dir.join(format!("{stem}_index.txt"));
            atomic_write(&path, render_index(index).as_bytes())?;
            Some(path)
        }
        None => None,
    };

    let tables_dir = if report.tables.is_empty() {
        None
    } else {
        let dir = output_dir.join("tables");
        fs::create_dir_all(&dir).map_err(|e| Pdf2StructError::OutputWriteFailed {
            path: dir.clone(),
            source: e,
        })?;
        for table in &report.tables {
            let path = dir.join(format!(
                "page_{}_table_{}.csv",
                table.page_number, table.table_index
            ));
            atomic_write(&path, &render_table_csv(table)?)?;
        }
        Some(dir)
    };

    info!(
        dir = %output_dir.display(),
        tables = report.tables.len(),
        index = index_path.is_some(),
        "sidecar files written"
    );
    Ok(SidecarPaths {
        json: json_path,
        full_text: text_path,
        index: index_path,
        tables_dir,
    })
}

/// Render the index as one line per entry:
/// `"{entry_number} {title} ... {page_reference}"`.
fn render_index(index: &crate::report::IndexResult) -> String {
    let mut out = format!("Index (Page {}):\n\n", index.page_number);
    for entry in &index.entries {
        let number = entry.entry_number.as_deref().unwrap_or("");
        let page = entry
            .page_reference
            .map(|p| p.to_string())
            .unwrap_or_default();
        out.push_str(&format!("{} {} ... {}\n", number, entry.title, page));
    }
    out
}

/// Render one table as CSV bytes: header row, then data rows.
fn render_table_csv(table: &crate::report::StructuredTable) -> Result<Vec<u8>, Pdf2StructError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&table.header)
        .map_err(|e| Pdf2StructError::Internal(format!("csv: {e}")))?;
    for row in &table.data {
        writer
            .write_record(row)
            .map_err(|e| Pdf2StructError::Internal(format!("csv: {e}")))?;
    }
    writer
        .into_inner()
        .map_err(|e| Pdf2StructError::Internal(format!("csv: {e}")))
}

/// Atomic write: write to `<name>.tmp` in the same directory, then rename.
fn atomic_write(path: &Path, bytes: &[u8]) -> Result<(), Pdf2StructError> {
    let tmp_path = match path.file_name() {
        Some(name) => {
            let mut tmp = name.to_os_string();
            tmp.push(".tmp");
            path.with_file_name(tmp)
        }
        None => path.with_extension("tmp"),
    };

    fs::write(&tmp_path, bytes).map_err(|e| Pdf2StructError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::rename(&tmp_path, path).map_err(|e| Pdf2StructError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
