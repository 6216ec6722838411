use anyhow::Context;
use tracing_chrome::{ChromeLayerBuilder, FlushGuard};
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::Settings;

/// Keeps the optional Chrome trace writer alive; the trace is flushed when
/// this is dropped.
#[must_use = "dropping the guard stops trace output"]
pub struct LoggingGuard {
    _chrome: Option<FlushGuard>,
}

pub fn build_filter(directives: &str) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(directives).with_context(|| format!("invalid log filter `{directives}`"))
}

/// Installs the global subscriber: env filter, fmt output, span traces for
/// errors and, when configured, a Chrome trace file.
pub fn init(settings: &Settings) -> anyhow::Result<LoggingGuard> {
    let filter = build_filter(&settings.log_filter)?;
    let (chrome, guard) = match &settings.chrome_trace {
        Some(path) => {
            let (layer, guard) = ChromeLayerBuilder::new().file(path).build();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(ErrorLayer::default())
        .with(chrome)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    tracing::debug!(backend = %settings.backend, filter = %settings.log_filter, "logging initialised");
    Ok(LoggingGuard { _chrome: guard })
}
