//! Clipboard text and CSV projections over the whole result set.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Record;
use crate::error::AppError;

/// File name of the CSV export.
pub const CSV_FILE_NAME: &str = "registros_rpi.csv";
/// First line of every CSV export.
pub const CSV_HEADER: &str = "Processo,Titular,NCL,Especificação";
/// Line written after each record in a copy-all.
pub const RECORD_SEPARATOR: &str = "---";

/// How CSV fields are quoted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvQuoting {
    /// Wrap in quotes and double any embedded quote (RFC 4180).
    #[default]
    Standard,
    /// Wrap in quotes and leave embedded quotes alone. Byte-compatible with
    /// files produced by the original desktop app; corrupts fields holding `"`.
    Verbatim,
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Four labeled lines for one record, no separator.
pub fn record_text(record: &Record) -> String {
    format!(
        "Processo: {}\nTitular: {}\nNCL: {}\nEspecificação: {}",
        field(&record.processo),
        field(&record.titular),
        field(&record.ncl),
        field(&record.especificacao),
    )
}

/// Copy-all text: every record followed by a separator line.
///
/// `None` when there is nothing to copy.
pub fn all_records_text(records: &[Record]) -> Option<String> {
    if records.is_empty() {
        return None;
    }
    let blocks: Vec<String> = records
        .iter()
        .map(|r| format!("{}\n{}", record_text(r), RECORD_SEPARATOR))
        .collect();
    Some(blocks.join("\n"))
}

fn csv_field(value: &str, quoting: CsvQuoting) -> String {
    match quoting {
        CsvQuoting::Standard => format!("\"{}\"", value.replace('"', "\"\"")),
        CsvQuoting::Verbatim => format!("\"{}\"", value),
    }
}

/// CSV document for the records. `None` when there is nothing to export.
pub fn to_csv(records: &[Record], quoting: CsvQuoting) -> Option<String> {
    if records.is_empty() {
        return None;
    }
    let rows: Vec<String> = records
        .iter()
        .map(|r| {
            [&r.processo, &r.titular, &r.ncl, &r.especificacao]
                .iter()
                .map(|v| csv_field(field(v), quoting))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();
    Some(format!("{}\n{}", CSV_HEADER, rows.join("\n")))
}

/// Write `content` to `<dir>/registros_rpi.csv`, returning the full path.
pub fn write_csv(dir: &Path, content: &str) -> Result<PathBuf, AppError> {
    let path = dir.join(CSV_FILE_NAME);
    let mut file = std::fs::File::create(&path)
        .map_err(|e| AppError::Export(format!("falha ao criar {}: {}", path.display(), e)))?;
    file.write_all(content.as_bytes())
        .map_err(|e| AppError::Export(format!("falha ao gravar: {}", e)))?;
    tracing::info!(path = %path.display(), bytes = content.len(), "csv exported");
    Ok(path)
}
