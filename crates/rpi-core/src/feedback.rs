//! The single transient status banner.
//!
//! Time is passed in explicitly (`now`) so expiry can be driven by the UI tick
//! and checked deterministically in tests.

use std::time::{Duration, Instant};

/// Default lifetime of an error banner.
pub const ERROR_DISMISS: Duration = Duration::from_secs(3);
/// Default lifetime of a success confirmation.
pub const SUCCESS_DISMISS: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub kind: FeedbackKind,
    /// `None` keeps the banner until it is replaced or hidden.
    pub expires_at: Option<Instant>,
    /// Set for the "processing" banner of an intake, which the intake clears
    /// on exit.
    pub processing: bool,
}

impl Banner {
    pub fn is_error(&self) -> bool {
        self.kind == FeedbackKind::Error
    }
}

#[derive(Debug, Clone)]
pub struct FeedbackSignal {
    current: Option<Banner>,
    error_ttl: Duration,
    success_ttl: Duration,
}

impl Default for FeedbackSignal {
    fn default() -> Self {
        Self::new(ERROR_DISMISS, SUCCESS_DISMISS)
    }
}

impl FeedbackSignal {
    pub fn new(error_ttl: Duration, success_ttl: Duration) -> Self {
        Self {
            current: None,
            error_ttl,
            success_ttl,
        }
    }

    pub fn current(&self) -> Option<&Banner> {
        self.current.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }

    /// Replace whatever is shown. The banner stays until replaced or hidden.
    pub fn show(&mut self, message: impl Into<String>, is_error: bool) {
        self.set(message.into(), is_error, None, false);
    }

    /// Replace whatever is shown and hide it after `ttl`. A deadline past
    /// what `Instant` can represent leaves the banner up until replaced.
    pub fn show_for(
        &mut self,
        message: impl Into<String>,
        is_error: bool,
        ttl: Duration,
        now: Instant,
    ) {
        self.set(message.into(), is_error, now.checked_add(ttl), false);
    }

    pub fn show_error(&mut self, message: impl Into<String>, now: Instant) {
        self.show_for(message, true, self.error_ttl, now);
    }

    pub fn show_success(&mut self, message: impl Into<String>, now: Instant) {
        self.show_for(message, false, self.success_ttl, now);
    }

    /// Informational banner with a caller-chosen lifetime (CSV export uses
    /// the error lifetime for its confirmation).
    pub fn show_info_for(&mut self, message: impl Into<String>, ttl: Duration, now: Instant) {
        self.show_for(message, false, ttl, now);
    }

    pub fn error_ttl(&self) -> Duration {
        self.error_ttl
    }

    /// Sticky "processing" banner owned by an intake flow.
    pub fn show_processing(&mut self, message: impl Into<String>) {
        self.set(message.into(), false, None, true);
    }

    pub fn is_processing(&self) -> bool {
        self.current.as_ref().is_some_and(|b| b.processing)
    }

    /// Safe to call when nothing is shown.
    pub fn hide(&mut self) {
        self.current = None;
    }

    /// Hide the banner only if it is still the processing one, so an error
    /// raised by the same flow survives its cleanup.
    pub fn clear_processing(&mut self) {
        if self.is_processing() {
            self.current = None;
        }
    }

    /// Drop an expired banner. Returns true if something was hidden.
    pub fn tick(&mut self, now: Instant) -> bool {
        let expired = self
            .current
            .as_ref()
            .and_then(|b| b.expires_at)
            .is_some_and(|deadline| now >= deadline);
        if expired {
            self.current = None;
        }
        expired
    }

    fn set(
        &mut self,
        message: String,
        is_error: bool,
        expires_at: Option<Instant>,
        processing: bool,
    ) {
        let kind = if is_error {
            FeedbackKind::Error
        } else {
            FeedbackKind::Info
        };
        self.current = Some(Banner {
            message,
            kind,
            expires_at,
            processing,
        });
    }
}
