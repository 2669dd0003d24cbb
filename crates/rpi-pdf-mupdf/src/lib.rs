use std::path::Path;

use mupdf::{Document, TextPageFlags};

use rpi_core::{BackendError, PdfBackend};

/// MIME hint handed to MuPDF when opening an in-memory document.
const PDF_MIME_HINT: &str = "application/pdf";

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency so
/// that the rest of the workspace does not transitively depend on it.
///
/// Text is read block by block and line by line, one `\n` per line, so the
/// `Label: value` lines of a gazette entry survive as separate lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

fn document_text(document: &Document) -> Result<String, BackendError> {
    let mut pages_text = Vec::new();

    for page_result in document
        .pages()
        .map_err(|e| BackendError::ExtractionError(e.to_string()))?
    {
        let page = page_result.map_err(|e| BackendError::ExtractionError(e.to_string()))?;
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

        let mut page_text = String::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                let line_text: String = line
                    .chars()
                    .map(|c| c.char().unwrap_or('\u{FFFD}'))
                    .collect();
                page_text.push_str(&line_text);
                page_text.push('\n');
            }
        }
        pages_text.push(page_text);
    }

    Ok(pages_text.join("\n"))
}

impl PdfBackend for MupdfBackend {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        // read first so an unreadable file is reported as such, not as a
        // parse failure
        let bytes = std::fs::read(path)?;
        self.extract_text_from_bytes(&bytes)
    }

    fn extract_text_from_bytes(&self, bytes: &[u8]) -> Result<String, BackendError> {
        let document = Document::from_bytes(bytes, PDF_MIME_HINT)
            .map_err(|e| BackendError::OpenError(e.to_string()))?;
        document_text(&document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MupdfBackend::new()
            .extract_text(&dir.path().join("nao-existe.pdf"))
            .unwrap_err();
        assert!(matches!(err, BackendError::Io(_)));
    }

    #[test]
    fn garbage_bytes_fail_to_open() {
        let err = MupdfBackend::new()
            .extract_text_from_bytes(b"isto nao e um pdf")
            .unwrap_err();
        assert!(matches!(
            err,
            BackendError::OpenError(_) | BackendError::ExtractionError(_)
        ));
    }
}
