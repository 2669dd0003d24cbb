mod update;
mod update_file_picker;
mod util;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, oneshot};

use rpi_core::intake::is_pdf_path;
use rpi_core::{AppError, CsvQuoting, FeedbackSignal, IntakeEvent, IntakeTrigger, Session};

use crate::clipboard::Clipboard;
use crate::theme::Theme;
use crate::tui_event::{AppEvent, BackendCommand};

/// Which screen is currently displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Waiting for the readiness gate.
    Startup,
    /// The gate gave up; only quitting works from here.
    Unavailable(String),
    Results,
    /// The file dialog, open on behalf of a `pick-file` command.
    FilePicker,
}

/// State for the file picker screen.
#[derive(Debug, Clone)]
pub struct FilePickerState {
    /// Current directory being browsed.
    pub current_dir: PathBuf,
    /// Entries in the current directory (dirs first, then files).
    pub entries: Vec<FileEntry>,
    /// Cursor position in the entries list.
    pub cursor: usize,
}

/// A single entry in the file picker.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub is_pdf: bool,
}

impl FilePickerState {
    pub fn new(current_dir: PathBuf) -> Self {
        let mut state = Self {
            current_dir,
            entries: Vec::new(),
            cursor: 0,
        };
        state.refresh_entries();
        state
    }

    /// Refresh the entries list from the current directory.
    pub fn refresh_entries(&mut self) {
        let mut entries = Vec::new();

        // Parent directory entry
        if let Some(parent) = self.current_dir.parent() {
            entries.push(FileEntry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                is_dir: true,
                is_pdf: false,
            });
        }

        if let Ok(read_dir) = std::fs::read_dir(&self.current_dir) {
            let mut dirs = Vec::new();
            let mut files = Vec::new();

            for entry in read_dir.flatten() {
                let path = entry.path();
                let name = entry.file_name().to_string_lossy().to_string();

                // Skip hidden files/dirs
                if name.starts_with('.') {
                    continue;
                }

                if path.is_dir() {
                    dirs.push(FileEntry {
                        name,
                        path,
                        is_dir: true,
                        is_pdf: false,
                    });
                } else {
                    let is_pdf = is_pdf_path(&path);
                    files.push(FileEntry {
                        name,
                        path,
                        is_dir: false,
                        is_pdf,
                    });
                }
            }

            dirs.sort_by_key(|e| e.name.to_lowercase());
            files.sort_by_key(|e| e.name.to_lowercase());

            entries.extend(dirs);
            entries.extend(files);
        }

        self.entries = entries;
        self.cursor = 0;
    }

    /// Enter the directory at cursor, or return false if not a directory.
    pub fn enter_directory(&mut self) -> bool {
        if let Some(entry) = self.entries.get(self.cursor)
            && entry.is_dir
        {
            self.current_dir = entry.path.clone();
            self.refresh_entries();
            return true;
        }
        false
    }

    /// Go up one directory. Returns false at the filesystem root.
    pub fn go_parent(&mut self) -> bool {
        match self.current_dir.parent() {
            Some(parent) => {
                self.current_dir = parent.to_path_buf();
                self.refresh_entries();
                true
            }
            None => false,
        }
    }

    /// The PDF under the cursor, if any.
    pub fn pdf_at_cursor(&self) -> Option<PathBuf> {
        self.entries
            .get(self.cursor)
            .filter(|e| e.is_pdf)
            .map(|e| e.path.clone())
    }
}

/// Main application state.
pub struct App {
    pub screen: Screen,
    pub session: Session,
    pub theme: Theme,
    pub tick: usize,
    /// Highlighted record, as an index into the current page.
    pub cursor: usize,
    pub show_help: bool,
    pub confirm_quit: bool,
    pub should_quit: bool,
    /// Height of the visible list area (set on resize).
    pub visible_rows: usize,
    pub file_picker: FilePickerState,
    /// Reply slot of an open `pick-file` dialog.
    pub(super) pending_dialog: Option<oneshot::Sender<Option<PathBuf>>>,
    /// Channel to send commands to the backend listener.
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
    /// Intake requested before the backend was ready (file passed on the
    /// command line).
    pub pending_trigger: Option<IntakeTrigger>,
    pub export_dir: PathBuf,
    pub csv_quoting: CsvQuoting,
    /// Where the last CSV export went.
    pub last_export: Option<PathBuf>,
    pub(super) clipboard: Box<dyn Clipboard>,
    /// When the startup screen was first shown.
    pub startup_start: Instant,
    /// How long the readiness gate may take.
    pub gate_budget: Duration,
}

impl App {
    pub fn new(
        theme: Theme,
        feedback: FeedbackSignal,
        clipboard: Box<dyn Clipboard>,
        export_dir: PathBuf,
        csv_quoting: CsvQuoting,
    ) -> Self {
        let start_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            screen: Screen::Startup,
            session: Session::new(feedback),
            theme,
            tick: 0,
            cursor: 0,
            show_help: false,
            confirm_quit: false,
            should_quit: false,
            visible_rows: 20,
            file_picker: FilePickerState::new(start_dir),
            pending_dialog: None,
            backend_cmd_tx: None,
            pending_trigger: None,
            export_dir,
            csv_quoting,
            last_export: None,
            clipboard,
            startup_start: Instant::now(),
            gate_budget: Duration::from_secs(5),
        }
    }

    /// Apply an event from a background task.
    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::BackendReady => {
                if self.screen == Screen::Startup {
                    self.screen = Screen::Results;
                }
                if let Some(trigger) = self.pending_trigger.take() {
                    self.start_intake(trigger);
                }
            }
            AppEvent::BackendUnavailable(err) => {
                self.pending_trigger = None;
                self.screen = Screen::Unavailable(err.to_string());
            }
            AppEvent::Intake(IntakeEvent::Failed(err)) if err.is_fatal() => {
                self.screen = Screen::Unavailable(err.to_string());
                self.session.apply_intake_event(IntakeEvent::Finished, Instant::now());
            }
            AppEvent::Intake(event) => {
                if matches!(event, IntakeEvent::Completed(_)) {
                    self.cursor = 0;
                }
                self.session.apply_intake_event(event, Instant::now());
            }
            AppEvent::DialogRequested(reply) => {
                // replacing an older request answers it with "cancelled"
                self.pending_dialog = Some(reply);
                self.file_picker.refresh_entries();
                self.screen = Screen::FilePicker;
            }
        }
    }

    /// Ask the backend listener to run an intake, unless one is running.
    pub fn start_intake(&mut self, trigger: IntakeTrigger) {
        let now = Instant::now();
        if !self.session.try_begin_intake(now) {
            return;
        }
        let sent = self
            .backend_cmd_tx
            .as_ref()
            .is_some_and(|tx| tx.send(BackendCommand::Intake(trigger)).is_ok());
        if !sent {
            tracing::warn!("backend listener is gone; intake dropped");
            self.session.apply_intake_event(
                IntakeEvent::Failed(AppError::Extraction("backend encerrado".into())),
                now,
            );
            self.session.apply_intake_event(IntakeEvent::Finished, now);
        }
    }

    /// Answer the open dialog and return to the results.
    pub(super) fn resolve_dialog(&mut self, picked: Option<PathBuf>) {
        if let Some(reply) = self.pending_dialog.take() {
            let _ = reply.send(picked);
        }
        self.screen = Screen::Results;
    }

    pub fn view(&mut self, f: &mut ratatui::Frame) {
        let area = f.area();

        match self.screen.clone() {
            Screen::Startup => {
                let elapsed = self.startup_start.elapsed();
                crate::view::startup::render_waiting(
                    f,
                    &self.theme,
                    self.tick,
                    elapsed,
                    self.gate_budget,
                );
            }
            Screen::Unavailable(message) => {
                crate::view::startup::render_unavailable(f, &self.theme, &message);
            }
            Screen::FilePicker => {
                crate::view::file_picker::render_in(f, self, area);
            }
            Screen::Results => {
                crate::view::results::render_in(f, self, area);
            }
        }

        crate::view::feedback::render(f, &self.theme, self.session.feedback(), self.tick);

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }
        if self.confirm_quit {
            crate::view::quit_confirm::render(f, &self.theme);
        }
    }
}

#[cfg(test)]
mod tests;
