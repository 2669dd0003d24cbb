use std::path::Path;

use thiserror::Error;

pub mod blocks;
pub mod extractor;
pub mod fields;

pub use extractor::{ExtractionResult, RecordExtractor, SkipStats};
// Re-export domain types from core (canonical definitions live there)
pub use rpi_core::{BackendError, PdfBackend, Record};

/// Failures of the extraction engine. The messages are shown to the user
/// as-is.
#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("Erro ao ler arquivo: {0}")]
    Read(std::io::Error),
    #[error("Erro ao extrair texto do PDF: {0}")]
    Extract(BackendError),
}

impl From<BackendError> for ParsingError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Io(e) => ParsingError::Read(e),
            other => ParsingError::Extract(other),
        }
    }
}

/// Extract granted records from a PDF file using the given backend for text
/// extraction.
///
/// Pipeline:
/// 1. Extract text from the PDF via `backend`
/// 2. Split it into blocks at each nine-digit process number
/// 3. Keep "Deferimento do pedido" blocks without an attorney
/// 4. Read processo, titular, NCL and especificação from each block
pub fn extract_records(
    pdf_path: &Path,
    backend: &dyn PdfBackend,
) -> Result<ExtractionResult, ParsingError> {
    RecordExtractor::new().extract_from_path(pdf_path, backend)
}

/// Same as [`extract_records`] for a PDF already in memory.
pub fn extract_records_from_bytes(
    bytes: &[u8],
    backend: &dyn PdfBackend,
) -> Result<ExtractionResult, ParsingError> {
    RecordExtractor::new().extract_from_bytes(bytes, backend)
}
