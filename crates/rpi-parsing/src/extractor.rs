use std::path::Path;

use rpi_core::{PdfBackend, Record};

use crate::ParsingError;
use crate::blocks;
use crate::fields;

/// Counts of blocks dropped by each filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipStats {
    /// Blocks found before any filtering.
    pub total_blocks: usize,
    /// Not a "Deferimento do pedido" dispatch.
    pub not_granted: usize,
    /// Represented by an attorney.
    pub with_attorney: usize,
    /// No process number could be read.
    pub no_processo: usize,
}

/// Result of extracting records from a gazette.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    pub records: Vec<Record>,
    pub skip_stats: SkipStats,
}

/// Turns gazette text into granted, attorney-free trademark records.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordExtractor;

impl RecordExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Records in the order their blocks appear in the text.
    pub fn extract_from_text(&self, text: &str) -> ExtractionResult {
        let mut stats = SkipStats::default();
        let mut records = Vec::new();

        for block in blocks::split_blocks(text) {
            stats.total_blocks += 1;

            if !blocks::is_granted(block) {
                stats.not_granted += 1;
                continue;
            }
            if blocks::has_attorney(block) {
                stats.with_attorney += 1;
                continue;
            }

            let Some(processo) = fields::processo(block).filter(|p| !p.is_empty()) else {
                stats.no_processo += 1;
                continue;
            };

            records.push(Record {
                processo: Some(processo),
                titular: fields::titular(block),
                ncl: fields::ncl(block),
                especificacao: fields::especificacao(block),
            });
        }

        ExtractionResult {
            records,
            skip_stats: stats,
        }
    }

    pub fn extract_from_path(
        &self,
        pdf_path: &Path,
        backend: &dyn PdfBackend,
    ) -> Result<ExtractionResult, ParsingError> {
        let text = backend.extract_text(pdf_path)?;
        Ok(self.extract_from_text(&text))
    }

    pub fn extract_from_bytes(
        &self,
        bytes: &[u8],
        backend: &dyn PdfBackend,
    ) -> Result<ExtractionResult, ParsingError> {
        let text = backend.extract_text_from_bytes(bytes)?;
        Ok(self.extract_from_text(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAZETTE: &str = "\
REVISTA DA PROPRIEDADE INDUSTRIAL Nº 2790
912345678 Deferimento do pedido
Titular: ACME INDÚSTRIA LTDA [BR/SP]
NCL(12): 25
Especificação: Roupas; calçados.
923456789 Deferimento do pedido
Titular: FULANO DE TAL [BR/RJ]
Procurador: ESCRITÓRIO DE MARCAS LTDA
NCL(12): 41
Especificação: Educação.
934567890 Arquivamento do pedido
Titular: OUTRA EMPRESA
945678901 DEFERIMENTO DO PEDIDO
Titular: BELTRANO ME
NCL(12): 35
Especificação: Comércio varejista.
";

    #[test]
    fn test_extract_filters_and_orders() {
        let result = RecordExtractor::new().extract_from_text(GAZETTE);
        let processos: Vec<_> = result
            .records
            .iter()
            .map(|r| r.processo.as_deref().unwrap())
            .collect();
        assert_eq!(processos, vec!["912345678", "945678901"]);

        assert_eq!(
            result.skip_stats,
            SkipStats {
                total_blocks: 4,
                not_granted: 1,
                with_attorney: 1,
                no_processo: 0,
            }
        );
    }

    #[test]
    fn test_extract_fields() {
        let result = RecordExtractor::new().extract_from_text(GAZETTE);
        let last = &result.records[1];
        assert_eq!(last.titular.as_deref(), Some("BELTRANO ME"));
        assert_eq!(last.ncl.as_deref(), Some("35"));
        assert_eq!(last.especificacao.as_deref(), Some("Comércio varejista."));
    }

    #[test]
    fn test_record_without_labels_keeps_processo() {
        let result = RecordExtractor::new().extract_from_text("956789012 Deferimento do pedido");
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].titular, None);
    }

    #[test]
    fn test_empty_text() {
        let result = RecordExtractor::new().extract_from_text("");
        assert!(result.records.is_empty());
        assert_eq!(result.skip_stats.total_blocks, 0);
    }
}
