pub mod pdf;
pub mod text;

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use crate::error::IngestError;

pub use pdf::PdfReader;
pub use text::TextReader;

/// Turns a document on disk into its full text.
pub trait DocumentReader {
    fn read(&self, path: &Path) -> Result<String, IngestError>;
}

/// Readers keyed by lowercase file extension (without the dot).
pub struct ReaderRegistry {
    readers: HashMap<String, Box<dyn DocumentReader>>,
}

impl ReaderRegistry {
    pub fn empty() -> Self {
        ReaderRegistry {
            readers: HashMap::new(),
        }
    }

    pub fn register(&mut self, extension: &str, reader: Box<dyn DocumentReader>) {
        self.readers
            .insert(extension.trim_start_matches('.').to_ascii_lowercase(), reader);
    }

    /// Pick a reader by extension, then read. Extension is checked before the file exists.
    pub fn read(&self, path: &Path) -> Result<String, IngestError> {
        let ext = extension_of(path);
        let reader = self
            .readers
            .get(&ext)
            .ok_or_else(|| IngestError::Unsupported {
                extension: format!(".{}", ext),
            })?;
        info!(path = %path.display(), "reading document");
        reader.read(path)
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        let mut registry = ReaderRegistry::empty();
        registry.register("txt", Box::new(TextReader));
        registry.register("pdf", Box::new(PdfReader));
        registry
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

// ── Tests ──
