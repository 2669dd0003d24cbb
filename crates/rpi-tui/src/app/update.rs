use std::time::Instant;

use rpi_core::{DroppedFile, IntakeTrigger};

use super::util::parse_dropped_path;
use super::{App, Screen};
use crate::action::Action;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        // These apply whatever is on screen
        match action {
            Action::ForceQuit => {
                self.should_quit = true;
                return true;
            }
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                self.session.tick(Instant::now());
                return false;
            }
            Action::Resize(_w, h) => {
                self.visible_rows = (h as usize).saturating_sub(8);
                return false;
            }
            _ => {}
        }

        // Quit confirmation modal: q confirms, Esc cancels
        if self.confirm_quit {
            match action {
                Action::Quit => {
                    self.should_quit = true;
                    return true;
                }
                Action::NavigateBack => {
                    self.confirm_quit = false;
                }
                _ => {}
            }
            return false;
        }

        if self.show_help {
            match action {
                Action::ToggleHelp | Action::NavigateBack => self.show_help = false,
                Action::Quit => self.confirm_quit = true,
                _ => {}
            }
            return false;
        }

        match self.screen {
            Screen::Startup | Screen::Unavailable(_) => self.handle_startup_action(action),
            Screen::FilePicker => self.handle_file_picker_action(action),
            Screen::Results => self.handle_results_action(action),
        }
        self.should_quit
    }

    fn handle_startup_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.confirm_quit = true;
            }
            Action::ToggleHelp => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    fn handle_results_action(&mut self, action: Action) {
        let now = Instant::now();
        match action {
            Action::Quit => {
                self.confirm_quit = true;
            }
            Action::ToggleHelp => {
                self.show_help = true;
            }
            Action::MoveDown => {
                let max = self.session.store().current_page_items().len().saturating_sub(1);
                if self.cursor < max {
                    self.cursor += 1;
                }
            }
            Action::MoveUp => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            Action::NextPage => {
                if self.session.next_page() {
                    self.cursor = 0;
                }
            }
            Action::PrevPage => {
                if self.session.prev_page() {
                    self.cursor = 0;
                }
            }
            Action::FirstPage => {
                if self.session.go_to_page(1) {
                    self.cursor = 0;
                }
            }
            Action::LastPage => {
                let last = self.session.store().total_pages();
                if self.session.go_to_page(last) {
                    self.cursor = 0;
                }
            }
            Action::SelectFile => {
                self.start_intake(IntakeTrigger::Click);
            }
            Action::Paste(text) => {
                if let Some(path) = parse_dropped_path(&text) {
                    self.start_intake(IntakeTrigger::Drop(DroppedFile::from_path(path)));
                } else {
                    tracing::debug!("paste is not a file path; ignored");
                }
            }
            Action::CopyRecord | Action::DrillIn => {
                if let Some(text) = self.session.copy_record_text(self.cursor, now) {
                    let result = self.clipboard.copy(&text);
                    self.session.clipboard_result(result, now);
                }
            }
            Action::CopyAll => {
                if let Some(text) = self.session.copy_all_text(now) {
                    let result = self.clipboard.copy(&text);
                    self.session.clipboard_result(result, now);
                }
            }
            Action::Export => {
                if let Some(path) = self
                    .session
                    .export_csv(&self.export_dir, self.csv_quoting, now)
                {
                    self.last_export = Some(path);
                }
            }
            _ => {}
        }
    }
}
