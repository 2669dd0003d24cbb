//! The in-process bridge and the command listener that drives intakes.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use rpi_core::bridge::{
    BytesPayload, EXTRACT_FROM_BYTES, EXTRACT_FROM_PATH, PICK_FILE, PathPayload,
};
use rpi_core::intake::run_intake;
use rpi_core::{Bridge, BridgeFuture, InvokeBody, PdfBackend, ReadinessGate, Record};
use rpi_parsing::{ExtractionResult, ParsingError};

use crate::tui_event::{AppEvent, BackendCommand};

/// Bridge answering the three commands in-process.
///
/// `pick-file` is delegated to the UI's file picker through `ui_tx`;
/// extraction runs the parsing pipeline on a blocking thread.
pub struct LocalBridge {
    pdf: Arc<dyn PdfBackend>,
    ui_tx: mpsc::UnboundedSender<AppEvent>,
}

impl LocalBridge {
    pub fn new(pdf: Arc<dyn PdfBackend>, ui_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { pdf, ui_tx }
    }

    async fn pick_file(&self) -> Result<Value, String> {
        let (tx, rx) = oneshot::channel();
        self.ui_tx
            .send(AppEvent::DialogRequested(tx))
            .map_err(|_| "interface encerrada".to_string())?;
        // a dropped sender means the dialog went away without a choice
        let picked = rx.await.unwrap_or(None);
        Ok(match picked {
            Some(path) => Value::String(path.display().to_string()),
            None => Value::Null,
        })
    }

    async fn extract_from_path(&self, body: InvokeBody) -> Result<Value, String> {
        let InvokeBody::Json(value) = body else {
            return Err(format!("{EXTRACT_FROM_PATH}: esperado {{path}}"));
        };
        let payload: PathPayload =
            serde_json::from_value(value).map_err(|e| format!("{EXTRACT_FROM_PATH}: {e}"))?;
        let pdf = self.pdf.clone();
        let path = PathBuf::from(payload.path);
        run_blocking(move || rpi_parsing::extract_records(&path, pdf.as_ref())).await
    }

    async fn extract_from_bytes(&self, body: InvokeBody) -> Result<Value, String> {
        let bytes = match body {
            InvokeBody::Raw(bytes) => bytes,
            InvokeBody::Json(value) => {
                serde_json::from_value::<BytesPayload>(value)
                    .map_err(|e| format!("{EXTRACT_FROM_BYTES}: {e}"))?
                    .bytes
            }
        };
        let pdf = self.pdf.clone();
        run_blocking(move || rpi_parsing::extract_records_from_bytes(&bytes, pdf.as_ref())).await
    }
}

async fn run_blocking<F>(job: F) -> Result<Value, String>
where
    F: FnOnce() -> Result<ExtractionResult, ParsingError> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| format!("tarefa de extração abortada: {e}"))?
        .map_err(|e| e.to_string())?;

    let stats = &result.skip_stats;
    tracing::info!(
        records = result.records.len(),
        blocks = stats.total_blocks,
        not_granted = stats.not_granted,
        with_attorney = stats.with_attorney,
        "extraction finished"
    );
    records_to_value(&result.records)
}

fn records_to_value(records: &[Record]) -> Result<Value, String> {
    serde_json::to_value(records).map_err(|e| e.to_string())
}

impl Bridge for LocalBridge {
    fn invoke<'a>(&'a self, command: &'a str, body: InvokeBody) -> BridgeFuture<'a> {
        Box::pin(async move {
            match command {
                PICK_FILE => self.pick_file().await,
                EXTRACT_FROM_PATH => self.extract_from_path(body).await,
                EXTRACT_FROM_BYTES => self.extract_from_bytes(body).await,
                other => Err(format!("comando desconhecido: {other}")),
            }
        })
    }
}

/// Receive backend commands until the channel closes, running each intake on
/// its own task so the listener stays responsive.
pub async fn run_listener(
    gate: Arc<ReadinessGate>,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            BackendCommand::Intake(trigger) => {
                let client = match gate.await_backend().await {
                    Ok(client) => client,
                    Err(err) => {
                        let _ = event_tx.send(AppEvent::BackendUnavailable(err));
                        continue;
                    }
                };
                let event_tx = event_tx.clone();
                tokio::spawn(async move {
                    let (tx, mut rx) = mpsc::unbounded_channel();
                    let run = async move {
                        run_intake(&client, trigger, &tx).await;
                    };
                    let forward = async {
                        while let Some(event) = rx.recv().await {
                            let _ = event_tx.send(AppEvent::Intake(event));
                        }
                    };
                    tokio::join!(run, forward);
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use rpi_core::{BackendClient, BackendError, BridgeSlot, GatePolicy, IntakeEvent, IntakeTrigger};
    use rpi_core::intake::{DroppedFile, PDF_MIME};

    /// Canned gazette text regardless of input.
    struct CannedPdf(&'static str);

    impl PdfBackend for CannedPdf {
        fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
            std::fs::metadata(path)?;
            Ok(self.0.to_string())
        }

        fn extract_text_from_bytes(&self, bytes: &[u8]) -> Result<String, BackendError> {
            if bytes.starts_with(b"%PDF") {
                Ok(self.0.to_string())
            } else {
                Err(BackendError::OpenError("corrupt PDF".into()))
            }
        }
    }

    const TEXT: &str = "912345678 Deferimento do pedido\nTitular: ACME LTDA\nNCL(12): 25\n";

    fn bridge() -> (LocalBridge, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (LocalBridge::new(Arc::new(CannedPdf(TEXT)), tx), rx)
    }

    #[tokio::test]
    async fn pick_file_asks_the_ui() {
        let (bridge, mut ui_rx) = bridge();
        let ui = tokio::spawn(async move {
            match ui_rx.recv().await {
                Some(AppEvent::DialogRequested(reply)) => {
                    let _ = reply.send(Some(PathBuf::from("/tmp/rpi.pdf")));
                }
                other => panic!("unexpected event: {other:?}"),
            }
        });
        let value = bridge.invoke(PICK_FILE, InvokeBody::empty()).await.unwrap();
        assert_eq!(value, Value::String("/tmp/rpi.pdf".into()));
        ui.await.unwrap();
    }

    #[tokio::test]
    async fn dismissed_dialog_is_null() {
        let (bridge, mut ui_rx) = bridge();
        let ui = tokio::spawn(async move {
            if let Some(AppEvent::DialogRequested(reply)) = ui_rx.recv().await {
                drop(reply);
            }
        });
        let value = bridge.invoke(PICK_FILE, InvokeBody::empty()).await.unwrap();
        assert_eq!(value, Value::Null);
        ui.await.unwrap();
    }

    #[tokio::test]
    async fn bytes_command_returns_records() {
        let (bridge, _ui_rx) = bridge();
        let value = bridge
            .invoke(EXTRACT_FROM_BYTES, InvokeBody::Raw(b"%PDF-1.4".to_vec()))
            .await
            .unwrap();
        let records = rpi_core::bridge::parse_records(value).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].titular.as_deref(), Some("ACME LTDA"));
        assert_eq!(records[0].especificacao, None);
    }

    #[tokio::test]
    async fn bytes_command_accepts_json_payload() {
        let (bridge, _ui_rx) = bridge();
        let body = serde_json::to_value(BytesPayload {
            bytes: b"%PDF".to_vec(),
        })
        .unwrap();
        let value = bridge
            .invoke(EXTRACT_FROM_BYTES, InvokeBody::Json(body))
            .await
            .unwrap();
        assert!(value.is_array());
    }

    #[tokio::test]
    async fn extraction_error_message_is_user_facing() {
        let (bridge, _ui_rx) = bridge();
        let err = bridge
            .invoke(EXTRACT_FROM_BYTES, InvokeBody::Raw(b"garbage".to_vec()))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            "Erro ao extrair texto do PDF: não foi possível abrir o PDF: corrupt PDF"
        );
    }

    #[tokio::test]
    async fn missing_path_reports_read_error() {
        let (bridge, _ui_rx) = bridge();
        let dir = tempfile::tempdir().unwrap();
        let body = serde_json::json!({"path": dir.path().join("x.pdf")});
        let err = bridge
            .invoke(EXTRACT_FROM_PATH, InvokeBody::Json(body))
            .await
            .unwrap_err();
        assert!(err.starts_with("Erro ao ler arquivo:"));
    }

    #[tokio::test]
    async fn unknown_command_is_rejected() {
        let (bridge, _ui_rx) = bridge();
        let err = bridge
            .invoke("processar_pdf", InvokeBody::empty())
            .await
            .unwrap_err();
        assert!(err.contains("processar_pdf"));
    }

    #[tokio::test]
    async fn listener_forwards_intake_events() {
        let (ui_tx, mut ui_rx) = mpsc::unbounded_channel();
        let slot = BridgeSlot::new();
        slot.publish(BackendClient::new(Arc::new(LocalBridge::new(
            Arc::new(CannedPdf(TEXT)),
            ui_tx.clone(),
        ))));
        let gate = Arc::new(ReadinessGate::new(slot, GatePolicy::default()));
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_listener(gate, cmd_rx, ui_tx));

        let file = DroppedFile::from_bytes("rpi.pdf", PDF_MIME, b"%PDF-1.7".to_vec());
        cmd_tx.send(BackendCommand::Intake(IntakeTrigger::Drop(file))).unwrap();

        let mut events = Vec::new();
        while let Some(AppEvent::Intake(event)) = ui_rx.recv().await {
            let done = event == IntakeEvent::Finished;
            events.push(event);
            if done {
                break;
            }
        }
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[1], IntakeEvent::Completed(r) if r.len() == 1));
    }
}
