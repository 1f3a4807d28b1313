use std::path::Path;

use crate::error::IngestError;

use super::DocumentReader;

/// Plain UTF-8 text files.
pub struct TextReader;

impl DocumentReader for TextReader {
    fn read(&self, path: &Path) -> Result<String, IngestError> {
        let bytes = std::fs::read(path).map_err(|e| IngestError::from_io(path, e))?;
        String::from_utf8(bytes).map_err(|e| IngestError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_fixture() {
        let text = TextReader
            .read(Path::new("tests/fixtures/rulebook.txt"))
            .unwrap();
        assert!(text.contains("Document Analysis Agent"));
    }

    #[test]
    fn invalid_utf8_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0xc3]).unwrap();
        let err = TextReader.read(&path).unwrap_err();
        assert!(matches!(err, IngestError::Parse { .. }));
    }
}
