use std::io::Write;

use base64::Engine;

use rpi_core::AppError;

/// Somewhere copied text can go.
pub trait Clipboard: Send {
    fn copy(&mut self, text: &str) -> Result<(), AppError>;
}

/// OSC 52 escape sequence that asks the terminal to set the clipboard.
pub fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}

/// Copy text to the system clipboard via OSC 52 escape sequence.
/// Works in Ghostty, iTerm2, kitty, WezTerm, and most modern terminals.
pub struct Osc52Clipboard<W: Write + Send> {
    out: W,
}

impl Osc52Clipboard<std::io::Stdout> {
    /// Write directly to stdout, bypassing the terminal backend buffer.
    pub fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write + Send> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write + Send> Clipboard for Osc52Clipboard<W> {
    fn copy(&mut self, text: &str) -> Result<(), AppError> {
        self.out
            .write_all(osc52_sequence(text).as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|e| AppError::Clipboard(e.to_string()))?;
        tracing::debug!(bytes = text.len(), "copied to clipboard");
        Ok(())
    }
}
