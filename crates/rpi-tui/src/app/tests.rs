use std::sync::{Arc, Mutex};

use rpi_core::session::{BUSY, COPIED, NOTHING_TO_COPY, NOTHING_TO_EXPORT};
use rpi_core::{Record, intake::PROCESSING_MESSAGE};

use super::*;
use crate::action::Action;

/// Clipboard that records what was copied, or fails every write.
#[derive(Clone, Default)]
struct RecordingClipboard {
    copied: Arc<Mutex<Vec<String>>>,
    broken: bool,
}

impl Clipboard for RecordingClipboard {
    fn copy(&mut self, text: &str) -> Result<(), AppError> {
        if self.broken {
            return Err(AppError::Clipboard("terminal gone".into()));
        }
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Create a minimal App for testing, with a command channel attached.
fn test_app() -> (App, mpsc::UnboundedReceiver<BackendCommand>, RecordingClipboard) {
    let clipboard = RecordingClipboard::default();
    let mut app = App::new(
        Theme::hacker(),
        FeedbackSignal::default(),
        Box::new(clipboard.clone()),
        std::env::temp_dir(),
        CsvQuoting::Standard,
    );
    let (tx, rx) = mpsc::unbounded_channel();
    app.backend_cmd_tx = Some(tx);
    (app, rx, clipboard)
}

fn ready_app() -> (App, mpsc::UnboundedReceiver<BackendCommand>, RecordingClipboard) {
    let (mut app, rx, clipboard) = test_app();
    app.handle_app_event(AppEvent::BackendReady);
    (app, rx, clipboard)
}

fn records(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| Record::new(format!("{:09}", 900_000_000 + i), "ACME LTDA", "25", "Roupas"))
        .collect()
}

fn banner(app: &App) -> Option<String> {
    app.session.feedback().current().map(|b| b.message.clone())
}

fn finish_intake(app: &mut App, result: Vec<Record>) {
    app.handle_app_event(AppEvent::Intake(IntakeEvent::Processing));
    app.handle_app_event(AppEvent::Intake(IntakeEvent::Completed(result)));
    app.handle_app_event(AppEvent::Intake(IntakeEvent::Finished));
}

// ── Startup gate ───────────────────────────────────────────────

#[test]
fn startup_ignores_file_selection() {
    let (mut app, mut rx, _) = test_app();
    assert_eq!(app.screen, Screen::Startup);
    app.update(Action::SelectFile);
    assert!(rx.try_recv().is_err());
    assert!(!app.session.is_busy());
}

#[test]
fn backend_ready_runs_queued_trigger() {
    let (mut app, mut rx, _) = test_app();
    app.pending_trigger = Some(IntakeTrigger::InputChange(rpi_core::DroppedFile::from_bytes(
        "rpi.pdf",
        rpi_core::intake::PDF_MIME,
        b"%PDF".to_vec(),
    )));

    app.handle_app_event(AppEvent::BackendReady);

    assert_eq!(app.screen, Screen::Results);
    assert!(matches!(
        rx.try_recv(),
        Ok(BackendCommand::Intake(IntakeTrigger::InputChange(_)))
    ));
    assert!(app.session.is_busy());
}

#[test]
fn unavailable_backend_is_terminal() {
    let (mut app, _rx, _) = test_app();
    app.handle_app_event(AppEvent::BackendUnavailable(AppError::BackendUnavailable {
        attempts: 50,
        waited: std::time::Duration::from_secs(5),
    }));
    assert!(matches!(app.screen, Screen::Unavailable(_)));

    app.update(Action::SelectFile);
    assert!(matches!(app.screen, Screen::Unavailable(_)));
    app.update(Action::Quit);
    assert!(app.confirm_quit);
}

#[test]
fn fatal_intake_failure_shows_unavailable() {
    let (mut app, _rx, _) = ready_app();
    app.update(Action::SelectFile);
    app.handle_app_event(AppEvent::Intake(IntakeEvent::Failed(
        AppError::BackendUnavailable {
            attempts: 50,
            waited: std::time::Duration::from_secs(5),
        },
    )));
    assert!(matches!(app.screen, Screen::Unavailable(_)));
    assert!(!app.session.is_busy());
}

// ── Intake ─────────────────────────────────────────────────────

#[test]
fn select_file_sends_click() {
    let (mut app, mut rx, _) = ready_app();
    app.update(Action::SelectFile);
    assert!(matches!(
        rx.try_recv(),
        Ok(BackendCommand::Intake(IntakeTrigger::Click))
    ));
}

#[test]
fn second_intake_is_rejected_while_busy() {
    let (mut app, mut rx, _) = ready_app();
    app.update(Action::SelectFile);
    app.update(Action::SelectFile);

    assert!(rx.try_recv().is_ok());
    assert!(rx.try_recv().is_err());
    assert_eq!(banner(&app).as_deref(), Some(BUSY));
}

#[test]
fn completed_intake_replaces_results_and_resets_cursor() {
    let (mut app, _rx, _) = ready_app();
    app.update(Action::SelectFile);
    app.handle_app_event(AppEvent::Intake(IntakeEvent::Processing));
    assert_eq!(banner(&app).as_deref(), Some(PROCESSING_MESSAGE));

    app.cursor = 4;
    app.handle_app_event(AppEvent::Intake(IntakeEvent::Completed(records(12))));
    app.handle_app_event(AppEvent::Intake(IntakeEvent::Finished));

    assert_eq!(app.cursor, 0);
    assert_eq!(app.session.store().len(), 12);
    assert!(!app.session.is_busy());
    assert_eq!(banner(&app), None);
}

#[test]
fn failed_intake_keeps_previous_results() {
    let (mut app, _rx, _) = ready_app();
    finish_intake(&mut app, records(3));

    app.update(Action::SelectFile);
    app.handle_app_event(AppEvent::Intake(IntakeEvent::Failed(AppError::Extraction(
        "corrupt PDF".into(),
    ))));
    app.handle_app_event(AppEvent::Intake(IntakeEvent::Finished));

    assert_eq!(app.session.store().len(), 3);
    assert_eq!(banner(&app).as_deref(), Some("Erro: corrupt PDF"));
}

#[test]
fn dropped_listener_releases_the_intake() {
    let (mut app, rx, _) = ready_app();
    drop(rx);
    app.update(Action::SelectFile);
    assert!(!app.session.is_busy());
    assert!(app.session.feedback().current().is_some_and(|b| b.is_error()));
}

#[test]
fn pasted_pdf_path_is_a_drop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rpi.pdf");
    std::fs::write(&path, b"%PDF").unwrap();

    let (mut app, mut rx, _) = ready_app();
    app.update(Action::Paste(path.display().to_string()));

    match rx.try_recv() {
        Ok(BackendCommand::Intake(IntakeTrigger::Drop(file))) => assert!(file.is_pdf()),
        other => panic!("expected a drop, got {other:?}"),
    }
}

#[test]
fn pasted_text_is_ignored() {
    let (mut app, mut rx, _) = ready_app();
    app.update(Action::Paste("just some text".into()));
    assert!(rx.try_recv().is_err());
    assert!(!app.session.is_busy());
}

// ── Pagination ─────────────────────────────────────────────────

#[test]
fn paging_moves_and_resets_cursor() {
    let (mut app, _rx, _) = ready_app();
    finish_intake(&mut app, records(25));

    app.update(Action::MoveDown);
    app.update(Action::MoveDown);
    assert_eq!(app.cursor, 2);

    app.update(Action::NextPage);
    assert_eq!(app.session.store().current_page(), 2);
    assert_eq!(app.cursor, 0);

    app.update(Action::LastPage);
    assert_eq!(app.session.store().current_page(), 3);
    // last page holds 5 records
    for _ in 0..10 {
        app.update(Action::MoveDown);
    }
    assert_eq!(app.cursor, 4);

    app.update(Action::NextPage);
    assert_eq!(app.session.store().current_page(), 3);
    assert_eq!(app.cursor, 4);

    app.update(Action::FirstPage);
    assert_eq!(app.session.store().current_page(), 1);
}

// ── Clipboard and export ───────────────────────────────────────

#[test]
fn copy_record_uses_cursor_on_current_page() {
    let (mut app, _rx, clipboard) = ready_app();
    finish_intake(&mut app, records(12));
    app.update(Action::NextPage);
    app.update(Action::MoveDown);

    app.update(Action::CopyRecord);

    let copied = clipboard.copied.lock().unwrap().clone();
    assert_eq!(copied.len(), 1);
    assert!(copied[0].starts_with("Processo: 900000011\n"));
    assert_eq!(banner(&app).as_deref(), Some(COPIED));
}

#[test]
fn copy_all_joins_with_separators() {
    let (mut app, _rx, clipboard) = ready_app();
    finish_intake(&mut app, records(2));

    app.update(Action::CopyAll);

    let copied = clipboard.copied.lock().unwrap().clone();
    assert_eq!(copied[0].matches("---").count(), 2);
}

#[test]
fn copy_without_results_reports_error() {
    let (mut app, _rx, clipboard) = ready_app();
    app.update(Action::CopyAll);
    assert!(clipboard.copied.lock().unwrap().is_empty());
    assert_eq!(banner(&app).as_deref(), Some(NOTHING_TO_COPY));
}

#[test]
fn clipboard_failure_shows_error() {
    let clipboard = RecordingClipboard {
        broken: true,
        ..Default::default()
    };
    let (mut app, _rx, _) = ready_app();
    app.clipboard = Box::new(clipboard);
    finish_intake(&mut app, records(1));

    app.update(Action::CopyRecord);

    assert_eq!(
        banner(&app).as_deref(),
        Some("Erro ao copiar para a área de transferência: terminal gone")
    );
}

#[test]
fn export_writes_into_configured_dir() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, _rx, _) = ready_app();
    app.export_dir = dir.path().to_path_buf();
    finish_intake(&mut app, records(2));

    app.update(Action::Export);

    let path = app.last_export.clone().expect("exported");
    assert_eq!(path, dir.path().join("registros_rpi.csv"));
    let content = std::fs::read_to_string(path).unwrap();
    assert!(content.starts_with("Processo,Titular,NCL,Especificação\n"));
}

#[test]
fn export_without_results_reports_error() {
    let (mut app, _rx, _) = ready_app();
    app.update(Action::Export);
    assert_eq!(app.last_export, None);
    assert_eq!(banner(&app).as_deref(), Some(NOTHING_TO_EXPORT));
}

// ── File dialog ────────────────────────────────────────────────

#[test]
fn dialog_request_opens_picker_and_esc_cancels() {
    let (mut app, _rx, _) = ready_app();
    let (tx, mut reply) = oneshot::channel();
    app.handle_app_event(AppEvent::DialogRequested(tx));
    assert_eq!(app.screen, Screen::FilePicker);

    app.update(Action::NavigateBack);

    assert_eq!(app.screen, Screen::Results);
    assert_eq!(reply.try_recv().unwrap(), None);
}

#[test]
fn dialog_enter_on_pdf_answers_path() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
    std::fs::write(dir.path().join("rpi.pdf"), b"%PDF").unwrap();

    let (mut app, _rx, _) = ready_app();
    app.file_picker = FilePickerState::new(dir.path().to_path_buf());
    let (tx, mut reply) = oneshot::channel();
    app.handle_app_event(AppEvent::DialogRequested(tx));

    // "..", "sub", "notes.txt", "rpi.pdf"
    app.update(Action::LastPage);
    assert_eq!(app.file_picker.entries[app.file_picker.cursor].name, "rpi.pdf");
    app.update(Action::DrillIn);

    assert_eq!(app.screen, Screen::Results);
    assert_eq!(reply.try_recv().unwrap(), Some(dir.path().join("rpi.pdf")));
}

#[test]
fn dialog_enter_on_non_pdf_stays_open() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

    let (mut app, _rx, _) = ready_app();
    app.file_picker = FilePickerState::new(dir.path().to_path_buf());
    let (tx, _reply) = oneshot::channel();
    app.handle_app_event(AppEvent::DialogRequested(tx));

    app.update(Action::LastPage);
    app.update(Action::DrillIn);

    assert_eq!(app.screen, Screen::FilePicker);
    assert!(app.pending_dialog.is_some());
}

#[test]
fn file_picker_lists_dirs_before_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.pdf"), b"%PDF").unwrap();
    std::fs::create_dir(dir.path().join("z")).unwrap();
    std::fs::write(dir.path().join(".hidden.pdf"), b"%PDF").unwrap();

    let picker = FilePickerState::new(dir.path().to_path_buf());
    let names: Vec<&str> = picker.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["..", "z", "a.pdf"]);
    assert!(picker.entries[2].is_pdf);
}

// ── Modals ─────────────────────────────────────────────────────

#[test]
fn quit_needs_confirmation() {
    let (mut app, _rx, _) = ready_app();
    assert!(!app.update(Action::Quit));
    assert!(app.confirm_quit);
    app.update(Action::NavigateBack);
    assert!(!app.confirm_quit);

    app.update(Action::Quit);
    assert!(app.update(Action::Quit));
}

#[test]
fn force_quit_skips_confirmation() {
    let (mut app, _rx, _) = ready_app();
    assert!(app.update(Action::ForceQuit));
}

#[test]
fn help_swallows_actions() {
    let (mut app, mut rx, _) = ready_app();
    app.update(Action::ToggleHelp);
    app.update(Action::SelectFile);
    assert!(rx.try_recv().is_err());
    app.update(Action::NavigateBack);
    assert!(!app.show_help);
}
