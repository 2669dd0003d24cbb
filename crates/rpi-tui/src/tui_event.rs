use std::path::PathBuf;

use tokio::sync::oneshot;

use rpi_core::{AppError, IntakeEvent, IntakeTrigger};

/// Commands sent from the TUI to the backend listener.
#[derive(Debug)]
pub enum BackendCommand {
    /// Run one intake. The app only sends this when no other intake is in
    /// flight.
    Intake(IntakeTrigger),
}

/// Events flowing from background tasks to the TUI.
#[derive(Debug)]
pub enum AppEvent {
    /// The readiness gate resolved the bridge.
    BackendReady,
    /// The readiness gate gave up.
    BackendUnavailable(AppError),
    /// Progress of the running intake.
    Intake(IntakeEvent),
    /// The bridge wants the file dialog shown. Answer with the chosen path, or
    /// `None` on cancel.
    DialogRequested(oneshot::Sender<Option<PathBuf>>),
}
