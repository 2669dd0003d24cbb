//! All mutable UI state, owned by the event loop.
//!
//! Every user-visible change goes through one of the transition methods here,
//! so the result store and the feedback banner can be reasoned about without
//! looking at the host.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::AppError;
use crate::export::{self, CsvQuoting};
use crate::feedback::FeedbackSignal;
use crate::intake::{IntakeEvent, PICKING_MESSAGE, PROCESSING_MESSAGE};
use crate::render::{self, PageView};
use crate::store::ResultStore;

pub const NOTHING_TO_COPY: &str = "Nenhum resultado para copiar";
pub const NOTHING_TO_EXPORT: &str = "Nenhum resultado para exportar";
pub const COPIED: &str = "Copiado para a área de transferência!";
pub const EXPORTED: &str = "Arquivo CSV exportado com sucesso!";
pub const BUSY: &str = "Aguarde: um PDF já está sendo processado.";

#[derive(Debug, Default)]
pub struct Session {
    store: ResultStore,
    feedback: FeedbackSignal,
    intake_in_flight: bool,
}

impl Session {
    pub fn new(feedback: FeedbackSignal) -> Self {
        Self {
            store: ResultStore::new(),
            feedback,
            intake_in_flight: false,
        }
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn feedback(&self) -> &FeedbackSignal {
        &self.feedback
    }

    pub fn is_busy(&self) -> bool {
        self.intake_in_flight
    }

    pub fn view(&self) -> PageView {
        render::project(&self.store)
    }

    /// Claim the intake slot. Returns false when an intake is already
    /// running; the running intake's processing banner stays up, otherwise a
    /// short notice is shown.
    pub fn try_begin_intake(&mut self, now: Instant) -> bool {
        if self.intake_in_flight {
            tracing::warn!("intake rejected: another one is in flight");
            if !self.feedback.is_processing() {
                self.feedback.show_success(BUSY, now);
            }
            return false;
        }
        self.intake_in_flight = true;
        true
    }

    pub fn apply_intake_event(&mut self, event: IntakeEvent, now: Instant) {
        match event {
            IntakeEvent::Picking => self.feedback.show_processing(PICKING_MESSAGE),
            IntakeEvent::Processing => self.feedback.show_processing(PROCESSING_MESSAGE),
            IntakeEvent::Completed(records) => {
                self.store.set_results(records);
                self.feedback.hide();
            }
            IntakeEvent::Cancelled => {}
            IntakeEvent::Failed(err) => self.feedback.show_error(err.feedback_message(), now),
            IntakeEvent::Finished => {
                self.feedback.clear_processing();
                self.intake_in_flight = false;
            }
        }
    }

    /// Clipboard text for one record of the current page.
    pub fn copy_record_text(&mut self, local_index: usize, now: Instant) -> Option<String> {
        match self.store.page_record(local_index) {
            Some(record) => Some(export::record_text(record)),
            None => {
                self.feedback.show_error(NOTHING_TO_COPY, now);
                None
            }
        }
    }

    /// Clipboard text for the whole result set.
    pub fn copy_all_text(&mut self, now: Instant) -> Option<String> {
        let text = export::all_records_text(self.store.records());
        if text.is_none() {
            self.feedback.show_error(NOTHING_TO_COPY, now);
        }
        text
    }

    /// Report how a clipboard write went.
    pub fn clipboard_result(&mut self, result: Result<(), AppError>, now: Instant) {
        match result {
            Ok(()) => self.feedback.show_success(COPIED, now),
            Err(err) => {
                tracing::warn!(error = %err, "clipboard write failed");
                self.feedback.show_error(err.feedback_message(), now);
            }
        }
    }

    /// Write the whole result set as CSV into `dir`.
    pub fn export_csv(&mut self, dir: &Path, quoting: CsvQuoting, now: Instant) -> Option<PathBuf> {
        let Some(content) = export::to_csv(self.store.records(), quoting) else {
            self.feedback.show_error(NOTHING_TO_EXPORT, now);
            return None;
        };
        match export::write_csv(dir, &content) {
            Ok(path) => {
                let ttl = self.feedback.error_ttl();
                self.feedback.show_info_for(EXPORTED, ttl, now);
                Some(path)
            }
            Err(err) => {
                self.feedback.show_error(err.feedback_message(), now);
                None
            }
        }
    }

    pub fn go_to_page(&mut self, n: usize) -> bool {
        self.store.go_to_page(n)
    }

    pub fn next_page(&mut self) -> bool {
        self.store.next_page()
    }

    pub fn prev_page(&mut self) -> bool {
        self.store.prev_page()
    }

    /// Expire the banner. Returns true if the screen needs a redraw.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.feedback.tick(now)
    }
}
