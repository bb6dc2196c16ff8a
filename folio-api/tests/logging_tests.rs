//! Startup logging: config loading is logged once the subscriber is installed,
//! and the configured level then takes over.

mod helpers;

use std::io::Write;

use tempfile::NamedTempFile;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, EnvFilter};

use folio_api::logging::{set_level, STARTUP_LEVEL};
use folio_common::config::TomlConfig;
use helpers::log_capture::LogCapture;

#[test]
fn test_config_loading_is_logged_then_level_applied() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "port = 5999\n\n[logging]\nlevel = \"warn\"").unwrap();

    let capture = LogCapture::new();
    let (filter, handle) = reload::Layer::new(EnvFilter::new(STARTUP_LEVEL));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(capture.clone());

    tracing::subscriber::with_default(subscriber, || {
        let config = TomlConfig::load_or_default(Some(file.path())).unwrap();
        assert_eq!(config.port, 5999);
        capture.assert_contains("Loading configuration from");

        set_level(&handle, &config.logging.level).unwrap();
        info!("after level switch");
        warn!("still visible");
    });

    capture.assert_no_match("after level switch");
    capture.assert_contains("still visible");
}

#[test]
fn test_invalid_level_rejected() {
    let (_filter, handle) = reload::Layer::<EnvFilter, tracing_subscriber::Registry>::new(
        EnvFilter::new(STARTUP_LEVEL),
    );

    assert!(set_level(&handle, "folio_api=loud").is_err());
}
