use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("não foi possível abrir o PDF: {0}")]
    OpenError(String),
    #[error("falha na extração de texto: {0}")]
    ExtractionError(String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF text extraction backends.
///
/// Implementors provide the low-level text extraction step; splitting the
/// gazette text into records lives in `rpi_parsing::RecordExtractor`.
pub trait PdfBackend: Send + Sync {
    /// Extract the full text content of a PDF file on disk.
    fn extract_text(&self, path: &Path) -> Result<String, BackendError>;

    /// Extract the full text content of a PDF held in memory.
    fn extract_text_from_bytes(&self, bytes: &[u8]) -> Result<String, BackendError>;
}
