//! folio-api - Personal collection service
//!
//! Serves per-user reading programs and favorites over HTTP, next to public
//! reads of the article catalog.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use folio_api::logging::{apply_config_level, init_tracing};
use folio_api::{build_router, AppState};
use folio_common::api::auth::{issue_token, load_shared_secret};
use folio_common::config::{prepare_root_folder, resolve_root_folder, TomlConfig, ROOT_FOLDER_ENV};
use folio_common::db::init_database;
use folio_common::time::now_millis;

/// Command-line arguments for folio-api
#[derive(Parser, Debug)]
#[command(name = "folio-api")]
#[command(about = "Personal collection service for the folio publishing backend")]
#[command(version)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,

    /// Root folder holding folio.db
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print a bearer token for the given user and exit
    #[arg(long, value_name = "USER_ID")]
    issue_token: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_filter = init_tracing();

    let args = Args::parse();

    let mut config =
        TomlConfig::load_or_default(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    apply_config_level(&log_filter, &config.logging.level)?;

    info!("Starting folio-api v{}", env!("CARGO_PKG_VERSION"));

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), ROOT_FOLDER_ENV, &config);
    let db_path = prepare_root_folder(&root_folder).context("Failed to prepare root folder")?;
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path)
        .await
        .context("Failed to open database")?;

    let shared_secret = load_shared_secret(&pool)
        .await
        .context("Failed to load token signing secret")?;

    if let Some(user_id) = args.issue_token {
        println!("{}", issue_token(user_id, now_millis(), shared_secret));
        return Ok(());
    }

    let state = AppState::from_pool(pool, shared_secret, config.token_ttl_secs);
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("folio-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
