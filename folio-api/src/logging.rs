//! Tracing subscriber setup
//!
//! The subscriber goes in before the config file is read, so the filter starts
//! at `RUST_LOG` or `info` and is switched to `logging.level` afterwards.

use anyhow::{Context, Result};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Level used until the config file has been read
pub const STARTUP_LEVEL: &str = "info";

pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Install the global subscriber and return the handle for its filter
pub fn init_tracing() -> FilterHandle {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| STARTUP_LEVEL.into());
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    handle
}

/// Replace the active filter with `level` (any `EnvFilter` directive)
pub fn set_level(handle: &FilterHandle, level: &str) -> Result<()> {
    let filter =
        EnvFilter::try_new(level).with_context(|| format!("Invalid log level '{}'", level))?;
    handle
        .reload(filter)
        .context("Failed to apply log level")
}

/// Apply the configured level; `RUST_LOG` wins when set
pub fn apply_config_level(handle: &FilterHandle, level: &str) -> Result<()> {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return Ok(());
    }
    set_level(handle, level)
}
