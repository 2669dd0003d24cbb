use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bridge::BytesEncoding;
use crate::export::CsvQuoting;
use crate::feedback::{ERROR_DISMISS, FeedbackSignal, SUCCESS_DISMISS};
use crate::gate::GatePolicy;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub bridge: Option<BridgeConfig>,
    pub export: Option<ExportConfig>,
    pub display: Option<DisplayConfig>,
    pub feedback: Option<FeedbackConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub poll_interval_ms: Option<u64>,
    pub max_attempts: Option<u32>,
    pub bytes_encoding: Option<BytesEncoding>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    pub directory: Option<String>,
    pub csv_quoting: Option<CsvQuoting>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackConfig {
    pub error_ms: Option<u64>,
    pub success_ms: Option<u64>,
}

/// Platform config directory path: `<config_dir>/rpi-deferidos/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rpi-deferidos").join("config.toml"))
}

/// Load config by cascading CWD `.rpi-deferidos.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".rpi-deferidos.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Missing or unparsable files count as absent; a broken file is logged.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        bridge: Some(BridgeConfig {
            poll_interval_ms: overlay
                .bridge
                .as_ref()
                .and_then(|b| b.poll_interval_ms)
                .or_else(|| base.bridge.as_ref().and_then(|b| b.poll_interval_ms)),
            max_attempts: overlay
                .bridge
                .as_ref()
                .and_then(|b| b.max_attempts)
                .or_else(|| base.bridge.as_ref().and_then(|b| b.max_attempts)),
            bytes_encoding: overlay
                .bridge
                .as_ref()
                .and_then(|b| b.bytes_encoding)
                .or_else(|| base.bridge.as_ref().and_then(|b| b.bytes_encoding)),
        }),
        export: Some(ExportConfig {
            directory: overlay
                .export
                .as_ref()
                .and_then(|e| e.directory.clone())
                .or_else(|| base.export.as_ref().and_then(|e| e.directory.clone())),
            csv_quoting: overlay
                .export
                .as_ref()
                .and_then(|e| e.csv_quoting)
                .or_else(|| base.export.as_ref().and_then(|e| e.csv_quoting)),
        }),
        display: Some(DisplayConfig {
            theme: overlay
                .display
                .as_ref()
                .and_then(|d| d.theme.clone())
                .or_else(|| base.display.as_ref().and_then(|d| d.theme.clone())),
        }),
        feedback: Some(FeedbackConfig {
            error_ms: overlay
                .feedback
                .as_ref()
                .and_then(|f| f.error_ms)
                .or_else(|| base.feedback.as_ref().and_then(|f| f.error_ms)),
            success_ms: overlay
                .feedback
                .as_ref()
                .and_then(|f| f.success_ms)
                .or_else(|| base.feedback.as_ref().and_then(|f| f.success_ms)),
        }),
    }
}

/// Accepted range for `[bridge] poll_interval_ms`.
pub const POLL_INTERVAL_MS: RangeInclusive<u64> = 1..=60_000;
/// Accepted range for `[bridge] max_attempts`.
pub const MAX_ATTEMPTS: RangeInclusive<u32> = 1..=10_000;
/// Accepted range for the `[feedback]` lifetimes.
pub const FEEDBACK_MS: RangeInclusive<u64> = 0..=600_000;

/// `value` if it lies in `range`; otherwise logs and returns `None` so the
/// default stays in place.
fn in_range<T>(key: &str, value: T, range: &RangeInclusive<T>) -> Option<T>
where
    T: PartialOrd + Copy + std::fmt::Display,
{
    if range.contains(&value) {
        Some(value)
    } else {
        tracing::warn!(
            key,
            %value,
            min = %range.start(),
            max = %range.end(),
            "config value out of range; using default"
        );
        None
    }
}

/// Fully resolved settings: file values over built-in defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub gate: GatePolicy,
    pub bytes_encoding: BytesEncoding,
    pub export_dir: PathBuf,
    pub csv_quoting: CsvQuoting,
    pub theme: String,
    pub error_ttl: Duration,
    pub success_ttl: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gate: GatePolicy::default(),
            bytes_encoding: BytesEncoding::default(),
            export_dir: default_export_dir(),
            csv_quoting: CsvQuoting::default(),
            theme: "hacker".to_string(),
            error_ttl: ERROR_DISMISS,
            success_ttl: SUCCESS_DISMISS,
        }
    }
}

/// Downloads folder when the platform has one, otherwise the CWD.
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

impl Settings {
    /// Apply only the values that are set in `file`.
    pub fn from_file(file: &ConfigFile) -> Self {
        let mut s = Settings::default();
        if let Some(bridge) = &file.bridge {
            if let Some(ms) = bridge
                .poll_interval_ms
                .and_then(|ms| in_range("bridge.poll_interval_ms", ms, &POLL_INTERVAL_MS))
            {
                s.gate.interval = Duration::from_millis(ms);
            }
            if let Some(n) = bridge
                .max_attempts
                .and_then(|n| in_range("bridge.max_attempts", n, &MAX_ATTEMPTS))
            {
                s.gate.max_attempts = n;
            }
            if let Some(encoding) = bridge.bytes_encoding {
                s.bytes_encoding = encoding;
            }
        }
        if let Some(export) = &file.export {
            if let Some(dir) = export.directory.as_deref().filter(|d| !d.is_empty()) {
                s.export_dir = PathBuf::from(dir);
            }
            if let Some(q) = export.csv_quoting {
                s.csv_quoting = q;
            }
        }
        if let Some(theme) = file
            .display
            .as_ref()
            .and_then(|d| d.theme.as_deref())
            .filter(|t| !t.is_empty())
        {
            s.theme = theme.to_string();
        }
        if let Some(fb) = &file.feedback {
            if let Some(ms) = fb
                .error_ms
                .and_then(|ms| in_range("feedback.error_ms", ms, &FEEDBACK_MS))
            {
                s.error_ttl = Duration::from_millis(ms);
            }
            if let Some(ms) = fb
                .success_ms
                .and_then(|ms| in_range("feedback.success_ms", ms, &FEEDBACK_MS))
            {
                s.success_ttl = Duration::from_millis(ms);
            }
        }
        s
    }

    pub fn feedback_signal(&self) -> FeedbackSignal {
        FeedbackSignal::new(self.error_ttl, self.success_ttl)
    }
}
