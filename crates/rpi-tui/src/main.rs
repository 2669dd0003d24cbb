use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rpi_core::config_file::{self, Settings};
use rpi_core::{
    BackendClient, BridgeSlot, CsvQuoting, DroppedFile, IntakeTrigger, ReadinessGate,
};
use rpi_pdf_mupdf::MupdfBackend;

mod action;
mod app;
mod backend;
mod clipboard;
mod input;
mod theme;
mod tui_event;
mod view;

use app::App;
use tui_event::AppEvent;

/// RPI Deferidos: list granted trademarks without an attorney from an RPI gazette PDF.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// RPI PDF to process as soon as the backend is ready
    pdf: Option<PathBuf>,

    /// Color theme: hacker (default) or modern
    #[arg(long)]
    theme: Option<String>,

    /// Directory that receives registros_rpi.csv
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Write CSV fields without doubling embedded quotes
    #[arg(long)]
    csv_verbatim: bool,

    /// Log file (default: <cache dir>/rpi-deferidos/rpi-deferidos.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn default_log_file() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rpi-deferidos")
        .join("rpi-deferidos.log")
}

/// Send tracing output to a file, since the terminal belongs to the UI.
///
/// Precedence: RUST_LOG env var > default "info". The returned guard must
/// outlive the program for buffered lines to be flushed.
fn init_logging(path: &Path) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name()?;
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Warning: could not create log directory {}: {e}", dir.display());
        return None;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    Some(guard)
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.pdf
        && !path.is_file()
    {
        anyhow::bail!("PDF file not found: {}", path.display());
    }

    let log_file = args.log_file.clone().unwrap_or_else(default_log_file);
    let _log_guard = init_logging(&log_file);

    // Resolve config: CLI flags > config files > defaults
    let mut settings = Settings::from_file(&config_file::load_config());
    if let Some(theme) = args.theme {
        settings.theme = theme;
    }
    if let Some(dir) = args.export_dir {
        settings.export_dir = dir;
    }
    if args.csv_verbatim {
        settings.csv_quoting = CsvQuoting::Verbatim;
    }
    tracing::info!(
        export_dir = %settings.export_dir.display(),
        csv_quoting = ?settings.csv_quoting,
        theme = %settings.theme,
        "starting"
    );

    let mut app = App::new(
        theme::Theme::by_name(&settings.theme),
        settings.feedback_signal(),
        Box::new(clipboard::Osc52Clipboard::stdout()),
        settings.export_dir.clone(),
        settings.csv_quoting,
    );
    app.gate_budget = settings.gate.budget();
    app.pending_trigger = args
        .pdf
        .map(|path| IntakeTrigger::InputChange(DroppedFile::from_path(path)));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<tui_event::BackendCommand>();
    let cancel = CancellationToken::new();

    app.backend_cmd_tx = Some(cmd_tx);

    // Bring the bridge up in the background; the gate polls for it
    let slot = BridgeSlot::new();
    let slot_for_host = slot.clone();
    let event_tx_for_bridge = event_tx.clone();
    let bytes_encoding = settings.bytes_encoding;
    tokio::spawn(async move {
        let bridge = backend::LocalBridge::new(Arc::new(MupdfBackend::new()), event_tx_for_bridge);
        slot_for_host
            .publish(BackendClient::new(Arc::new(bridge)).with_bytes_encoding(bytes_encoding));
    });

    let gate = Arc::new(ReadinessGate::new(slot, settings.gate));

    let gate_for_startup = gate.clone();
    let event_tx_for_gate = event_tx.clone();
    tokio::spawn(async move {
        let event = match gate_for_startup.await_backend().await {
            Ok(_) => AppEvent::BackendReady,
            Err(err) => AppEvent::BackendUnavailable(err),
        };
        let _ = event_tx_for_gate.send(event);
    });

    // Spawn backend command listener
    tokio::spawn(backend::run_listener(gate, cmd_rx, event_tx));

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    // Main event loop
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(app_event) = maybe_event {
                    app.handle_app_event(app_event);
                    // Drain any additional queued events
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_app_event(evt);
                    }
                }
            }
            _ = async {
                if event::poll(tick_rate).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    app.update(input::map_event(&evt));
                }
            } => {}
            _ = cancel.cancelled() => {
                app.should_quit = true;
            }
        }

        app.update(action::Action::Tick);

        if app.should_quit {
            cancel.cancel();
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    tracing::info!("exiting");

    Ok(())
}
