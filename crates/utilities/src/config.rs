use std::{collections::HashMap, fmt, path::PathBuf, str::FromStr};

use thiserror::Error;

pub const CONFIG_PATH_VAR: &str = "GFX_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "gfx.env";

const BACKEND_VAR: &str = "GFX_BACKEND";
const LOG_VAR: &str = "GFX_LOG";
const TICK_VAR: &str = "GFX_TICK_HZ";
const CHROME_TRACE_VAR: &str = "GFX_CHROME_TRACE";
const MAX_WINDOWS_VAR: &str = "GFX_MAX_WINDOWS";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unknown backend `{0}`, expected `native` or `headless`")]
    UnknownBackend(String),
    #[error("invalid value `{value}` for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("failed to read config file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which driver implementation the application should instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Native,
    Headless,
}

impl FromStr for BackendKind {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" | "tao" => Ok(BackendKind::Native),
            "headless" | "null" => Ok(BackendKind::Headless),
            other => Err(SettingsError::UnknownBackend(other.to_owned())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Native => f.write_str("native"),
            BackendKind::Headless => f.write_str("headless"),
        }
    }
}

/// Runtime settings shared by the application loop, logging and driver
/// selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend: BackendKind,
    /// `EnvFilter` directive string.
    pub log_filter: String,
    pub tick_rate_hz: u32,
    /// Write a Chrome trace to this path when set.
    pub chrome_trace: Option<PathBuf>,
    pub max_windows: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: BackendKind::Headless,
            log_filter: "info".to_owned(),
            tick_rate_hz: 60,
            chrome_trace: None,
            max_windows: None,
        }
    }
}

impl Settings {
    /// Loads settings from the env file named by `GFX_CONFIG` (or `gfx.env`
    /// when present), then applies process environment overrides.
    pub fn load() -> Result<Self, SettingsError> {
        let explicit = std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);
        let path = explicit
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut values = if explicit.is_some() || path.exists() {
            env_file_reader::read_file(&path)
                .map_err(|source| SettingsError::Read { path, source })?
        } else {
            HashMap::new()
        };
        for key in [
            BACKEND_VAR,
            LOG_VAR,
            TICK_VAR,
            CHROME_TRACE_VAR,
            MAX_WINDOWS_VAR,
        ] {
            if let Ok(value) = std::env::var(key) {
                values.insert(key.to_owned(), value);
            }
        }
        Self::from_values(&values)
    }

    /// Builds settings from `GFX_*` key/value pairs; missing keys keep their
    /// defaults.
    pub fn from_values(values: &HashMap<String, String>) -> Result<Self, SettingsError> {
        let mut settings = Self::default();
        if let Some(backend) = values.get(BACKEND_VAR) {
            settings.backend = backend.parse()?;
        }
        if let Some(filter) = values.get(LOG_VAR) {
            if !filter.trim().is_empty() {
                settings.log_filter = filter.trim().to_owned();
            }
        }
        if let Some(tick) = values.get(TICK_VAR) {
            settings.tick_rate_hz = match tick.trim().parse::<u32>() {
                Ok(hz) if hz > 0 => hz,
                _ => return Err(invalid(TICK_VAR, tick)),
            };
        }
        if let Some(path) = values.get(CHROME_TRACE_VAR) {
            if !path.trim().is_empty() {
                settings.chrome_trace = Some(PathBuf::from(path.trim()));
            }
        }
        if let Some(max) = values.get(MAX_WINDOWS_VAR) {
            settings.max_windows = Some(
                max.trim()
                    .parse::<usize>()
                    .map_err(|_| invalid(MAX_WINDOWS_VAR, max))?,
            );
        }
        Ok(settings)
    }

    pub fn tick_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs(1) / self.tick_rate_hz.max(1)
    }
}

fn invalid(key: &'static str, value: &str) -> SettingsError {
    SettingsError::InvalidValue {
        key,
        value: value.to_owned(),
    }
}
