use thiserror::Error;
use tokio::{
    net::TcpListener,
    signal::ctrl_c,
};
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, trace_span};
use tracing_subscriber::{prelude::*, EnvFilter, Registry};

pub mod api;
pub mod config;
pub mod data_loader;
pub mod database;
pub mod error;
pub mod state;

use config::{Config, ConfigError};
use database::connection::establish_pooled_connection;
use state::AppState;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unable to create the connection pool: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Logs to stdout, filtered by `RUST_LOG` (`info` when unset).
pub fn init_tracing() {
    let stdout_log = tracing_subscriber::fmt::layer().with_target(true);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = Registry::default().with(filter).with(stdout_log);

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Unable to set global subscriber: {e}");
    }
}

pub async fn start_server() -> Result<(), StartupError> {
    let config = {
        let span = trace_span!("loading configuration");
        let _guard = span.enter();
        Config::load()?
    };

    info!("Establishing pooled connection...");
    let pool = establish_pooled_connection(&config.database_url, config.pool_size)?;

    let address = format!("0.0.0.0:{}", config.port);
    let app = api::router(AppState::new(config, pool));

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => error!("Failed to listen for Ctrl+C: {e}"),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
