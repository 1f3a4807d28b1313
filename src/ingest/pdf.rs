use std::path::Path;

use tracing::warn;

use crate::error::IngestError;

use super::DocumentReader;

/// Text layer of a PDF, via `pdf-extract`. Scanned pages yield no text.
pub struct PdfReader;

impl DocumentReader for PdfReader {
    fn read(&self, path: &Path) -> Result<String, IngestError> {
        let bytes = std::fs::read(path).map_err(|e| IngestError::from_io(path, e))?;
        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| IngestError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        if text.trim().is_empty() {
            warn!(path = %path.display(), "no text found in PDF");
        }
        Ok(text)
    }
}

// ── Tests ──
