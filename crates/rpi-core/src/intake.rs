//! File intake: one flow for dialog picks, drops and the file input.
//!
//! [`run_intake`] reports progress as [`IntakeEvent`]s over a channel instead
//! of touching UI state, so it can run on its own task while the event loop
//! keeps handling input. It always ends with [`IntakeEvent::Finished`], even
//! when the future is dropped mid-flight.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use crate::Record;
use crate::bridge::{BackendClient, ExtractSource};
use crate::error::AppError;

/// The only MIME type accepted from drops and the file input.
pub const PDF_MIME: &str = "application/pdf";

/// Banner shown while the dialog is open.
pub const PICKING_MESSAGE: &str = "Abrindo seletor de arquivos...";
/// Banner shown while the backend extracts.
pub const PROCESSING_MESSAGE: &str = "Processando PDF... aguarde.";

/// Whether `path` names a PDF, by the same rule intake applies.
pub fn is_pdf_path(path: &Path) -> bool {
    mime_for_path(path) == PDF_MIME
}

/// Guess a MIME type from a file extension. Unknown extensions yield `""`.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => PDF_MIME,
        Some("csv") => "text/csv",
        Some("txt") => "text/plain",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("zip") => "application/zip",
        _ => "",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FileData {
    Loaded(Vec<u8>),
    OnDisk(PathBuf),
}

/// A file handed over by a drop or the file input.
///
/// Contents are read lazily so a rejected file is never loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFile {
    pub name: String,
    pub mime: String,
    data: FileData,
}

impl DroppedFile {
    pub fn from_bytes(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            data: FileData::Loaded(bytes),
        }
    }

    /// Describe a file on disk; the MIME type comes from its extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            mime: mime_for_path(&path).to_string(),
            data: FileData::OnDisk(path),
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.mime == PDF_MIME
    }

    async fn read(self) -> Result<Vec<u8>, AppError> {
        match self.data {
            FileData::Loaded(bytes) => Ok(bytes),
            FileData::OnDisk(path) => tokio::fs::read(&path)
                .await
                .map_err(|e| AppError::Extraction(format!("Erro ao ler arquivo: {e}"))),
        }
    }
}

/// What started an intake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeTrigger {
    /// "Select file": ask the backend dialog for a path.
    Click,
    /// A file dropped on the window.
    Drop(DroppedFile),
    /// A file chosen through the file input.
    InputChange(DroppedFile),
}

impl IntakeTrigger {
    pub fn label(&self) -> &'static str {
        match self {
            IntakeTrigger::Click => "click",
            IntakeTrigger::Drop(_) => "drop",
            IntakeTrigger::InputChange(_) => "input",
        }
    }
}

/// Progress of one intake, in the order it can happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeEvent {
    /// The dialog is open.
    Picking,
    /// A file was accepted and sent for extraction.
    Processing,
    Completed(Vec<Record>),
    /// The dialog was dismissed without a choice.
    Cancelled,
    Failed(AppError),
    /// Always the last event of an intake.
    Finished,
}

struct FinishGuard<'a> {
    tx: &'a mpsc::UnboundedSender<IntakeEvent>,
}

impl Drop for FinishGuard<'_> {
    fn drop(&mut self) {
        // receiver gone means the UI is shutting down
        let _ = self.tx.send(IntakeEvent::Finished);
    }
}

/// Drive one intake to completion.
pub async fn run_intake(
    client: &BackendClient,
    trigger: IntakeTrigger,
    tx: &mpsc::UnboundedSender<IntakeEvent>,
) {
    let _guard = FinishGuard { tx };
    let label = trigger.label();

    let outcome = match trigger {
        IntakeTrigger::Click => intake_from_dialog(client, tx).await,
        IntakeTrigger::Drop(file) | IntakeTrigger::InputChange(file) => {
            intake_from_file(client, file, tx).await
        }
    };

    let event = match outcome {
        Ok(Some(records)) => {
            tracing::info!(trigger = label, records = records.len(), "intake completed");
            IntakeEvent::Completed(records)
        }
        Ok(None) => {
            tracing::debug!(trigger = label, "intake cancelled");
            IntakeEvent::Cancelled
        }
        Err(err) => {
            tracing::warn!(trigger = label, error = %err, "intake failed");
            IntakeEvent::Failed(err)
        }
    };
    let _ = tx.send(event);
}

async fn intake_from_dialog(
    client: &BackendClient,
    tx: &mpsc::UnboundedSender<IntakeEvent>,
) -> Result<Option<Vec<Record>>, AppError> {
    let _ = tx.send(IntakeEvent::Picking);
    let Some(path) = client.pick_file().await? else {
        return Ok(None);
    };
    let _ = tx.send(IntakeEvent::Processing);
    client.extract(ExtractSource::Path(path)).await.map(Some)
}

async fn intake_from_file(
    client: &BackendClient,
    file: DroppedFile,
    tx: &mpsc::UnboundedSender<IntakeEvent>,
) -> Result<Option<Vec<Record>>, AppError> {
    if !file.is_pdf() {
        return Err(AppError::UnsupportedFileType { mime: file.mime });
    }
    let _ = tx.send(IntakeEvent::Processing);
    let bytes = file.read().await?;
    client.extract(ExtractSource::Bytes(bytes)).await.map(Some)
}
