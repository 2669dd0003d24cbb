use super::App;
use crate::action::Action;

impl App {
    /// Handle input while the file dialog is open.
    pub(super) fn handle_file_picker_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.confirm_quit = true;
            }
            Action::ToggleHelp => {
                self.show_help = true;
            }
            Action::NavigateBack => {
                self.resolve_dialog(None);
            }
            Action::MoveDown => {
                let max = self.file_picker.entries.len().saturating_sub(1);
                if self.file_picker.cursor < max {
                    self.file_picker.cursor += 1;
                }
            }
            Action::MoveUp => {
                self.file_picker.cursor = self.file_picker.cursor.saturating_sub(1);
            }
            Action::FirstPage => {
                self.file_picker.cursor = 0;
            }
            Action::LastPage => {
                self.file_picker.cursor = self.file_picker.entries.len().saturating_sub(1);
            }
            Action::PrevPage => {
                self.file_picker.go_parent();
            }
            Action::DrillIn | Action::NextPage => {
                if self.file_picker.enter_directory() {
                    return;
                }
                if let Some(path) = self.file_picker.pdf_at_cursor() {
                    self.resolve_dialog(Some(path));
                }
            }
            _ => {}
        }
    }
}
