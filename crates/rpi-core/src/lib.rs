use serde::{Deserialize, Serialize};

pub mod backend;
pub mod bridge;
pub mod config_file;
pub mod error;
pub mod export;
pub mod feedback;
pub mod gate;
pub mod intake;
pub mod render;
pub mod session;
pub mod store;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend};
pub use bridge::{BackendClient, Bridge, BridgeFuture, ExtractSource, InvokeBody};
pub use config_file::Settings;
pub use error::AppError;
pub use export::CsvQuoting;
pub use feedback::{FeedbackKind, FeedbackSignal};
pub use gate::{BridgeSlot, GatePolicy, ReadinessGate};
pub use intake::{DroppedFile, IntakeEvent, IntakeTrigger};
pub use session::Session;
pub use store::{PAGE_SIZE, ResultStore};

/// Placeholder shown for absent or empty fields in the results list.
pub const NOT_AVAILABLE: &str = "N/A";

/// One trademark entry extracted from the gazette.
///
/// Fields are kept exactly as the extraction engine returned them. A missing
/// field stays `None` here; the "N/A" substitution happens at render time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub processo: Option<String>,
    pub titular: Option<String>,
    pub ncl: Option<String>,
    pub especificacao: Option<String>,
}

impl Record {
    pub fn new(
        processo: impl Into<String>,
        titular: impl Into<String>,
        ncl: impl Into<String>,
        especificacao: impl Into<String>,
    ) -> Self {
        Self {
            processo: Some(processo.into()),
            titular: Some(titular.into()),
            ncl: Some(ncl.into()),
            especificacao: Some(especificacao.into()),
        }
    }
}
