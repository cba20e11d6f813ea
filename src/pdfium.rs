//! pdfium-backed document access and one-call entry points.
//!
//! This module is the crate's only coupling to a real PDF library. pdfium
//! gives us a reliable text layer per page; it has no table detector, so
//! [`PdfiumSource`] derives table candidates from the text layer via
//! [`crate::pipeline::textgrid`]. Callers that own a richer table-detection
//! layer implement [`PageSource`] themselves and bypass this module.
//!
//! We validate the `%PDF` magic bytes before handing the path to pdfium so
//! callers get a meaningful error rather than an opaque load failure, and
//! the document handle stays scoped to the `process_*` call — it is released
//! on every exit path, including early returns.

use crate::config::ExtractionConfig;
use crate::document::{PageSource, RawTableGrid};
use crate::error::{PageError, Pdf2StructError};
use crate::pipeline::textgrid;
use crate::processor::DocumentProcessor;
use crate::report::ExtractionReport;
use pdfium_render::prelude::*;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// [`PageSource`] over an open pdfium document.
pub struct PdfiumSource<'a, 'b> {
    document: &'a PdfDocument<'b>,
}

impl<'a, 'b> PdfiumSource<'a, 'b> {
    pub fn new(document: &'a PdfDocument<'b>) -> Self {
        Self { document }
    }
}

impl PageSource for PdfiumSource<'_, '_> {
    fn total_pages(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_text(&self, index: usize) -> Result<String, PageError> {
        let pages = self.document.pages();
        let page = pages.get(index as u16).map_err(|e| PageError::TextFailed {
            page: index + 1,
            detail: format!("{e:?}"),
        })?;
        let text = page.text().map_err(|e| PageError::TextFailed {
            page: index + 1,
            detail: format!("{e:?}"),
        })?;
        Ok(text.all())
    }

    fn page_tables(&self, index: usize) -> Result<Vec<RawTableGrid>, PageError> {
        let text = self.page_text(index).map_err(|e| PageError::TablesFailed {
            page: index + 1,
            detail: e.to_string(),
        })?;
        Ok(textgrid::detect_grids(&text))
    }
}

/// Run the full structured extraction over a PDF file.
///
/// This is the primary entry point for file-based callers.
///
/// # Errors
/// Fatal only: file missing/unreadable, not a PDF, wrong or missing
/// password, corrupt document. Per-page problems degrade to empty records
/// inside the report.
pub fn process_file(
    path: impl AsRef<Path>,
    password: Option<&str>,
    config: Option<ExtractionConfig>,
) -> Result<ExtractionReport, Pdf2StructError> {
    let path = path.as_ref();
    validate_pdf_path(path)?;
    info!("opening PDF: {}", path.display());

    let pdfium = Pdfium::default();
    let document = pdfium
        .load_pdf_from_file(path, password)
        .map_err(|e| map_load_error(e, path, password))?;

    let source = PdfiumSource::new(&document);
    let processor = DocumentProcessor::open(&source, config);
    Ok(processor.extract_structured())
}

/// Run the full structured extraction over in-memory PDF bytes.
///
/// The bytes are written to a managed temp file that is cleaned up
/// automatically on return or panic. Recommended when the PDF comes from a
/// database or an upload rather than a file on disk.
pub fn process_bytes(
    bytes: &[u8],
    config: Option<ExtractionConfig>,
) -> Result<ExtractionReport, Pdf2StructError> {
    let mut tmp = tempfile::NamedTempFile::new()
        .map_err(|e| Pdf2StructError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| Pdf2StructError::Internal(format!("tempfile write: {e}")))?;
    // `tmp` is dropped (and the file deleted) when this returns.
    process_file(tmp.path(), None, config)
}

/// Validate existence, readability, and `%PDF` magic bytes.
fn validate_pdf_path(path: &Path) -> Result<(), Pdf2StructError> {
    if !path.exists() {
        return Err(Pdf2StructError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    match std::fs::File::open(path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(Pdf2StructError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2StructError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(Pdf2StructError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }
    debug!("validated PDF input: {}", path.display());
    Ok(())
}

/// Map a pdfium load failure onto the fatal error taxonomy.
fn map_load_error(e: PdfiumError, path: &Path, password: Option<&str>) -> Pdf2StructError {
    let err_str = format!("{e:?}");
    if err_str.contains("Password") || err_str.contains("password") {
        if password.is_some() {
            Pdf2StructError::WrongPassword {
                path: path.to_path_buf(),
            }
        } else {
            Pdf2StructError::PasswordRequired {
                path: path.to_path_buf(),
            }
        }
    } else {
        Pdf2StructError::CorruptPdf {
            path: path.to_path_buf(),
            detail: err_str,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Input validation runs before any pdfium binding, so these tests do
    // not need a pdfium library present.

    #[test]
    fn missing_file_is_fatal() {
        let err = process_file("/nonexistent/book.pdf", None, None).unwrap_err();
        assert!(matches!(err, Pdf2StructError::FileNotFound { .. }));
    }

    #[test]
    fn non_pdf_magic_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"PK\x03\x04 definitely a zip").unwrap();

        let err = process_file(&path, None, None).unwrap_err();
        assert!(matches!(err, Pdf2StructError::NotAPdf { .. }));
    }

    #[test]
    fn short_files_pass_magic_check_but_fail_later() {
        // A 2-byte file cannot fill the magic buffer; validation lets it
        // through so pdfium reports the corruption. We only assert the
        // validator's own behaviour here.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.pdf");
        std::fs::write(&path, b"%P").unwrap();
        assert!(validate_pdf_path(&path).is_ok());
    }
}
