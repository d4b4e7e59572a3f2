mod app;
mod config;
mod handlers;
mod logging;
mod state;
mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};

use todos_core::storage::TodoRepository;

use crate::{
    app::{create_app, DOCS_PATH},
    config::Config,
    logging::init_tracing,
    state::AppState,
    storage::SqliteTodoRepository,
};

/// Todos - A local todo API service with progress tracking
#[derive(Parser, Debug)]
#[command(name = "todos")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "8080", env = "PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();

    // Flushes buffered file logs when main returns
    let _log_guard = init_tracing(&config)?;

    // Refuse to serve without a migrated store
    let options = config.sqlite_options();
    let repo = match SqliteTodoRepository::open(&options).await {
        Ok(repo) => Arc::new(repo),
        Err(e) => {
            tracing::error!(
                error = %e,
                path = %options.path.display(),
                "failed to initialize database"
            );
            return Err(e).context("failed to initialize database");
        }
    };

    let state = AppState::new(repo.clone());
    let app = create_app(state, &config);

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{}:{}", cli.host, cli.port);
            TcpListener::bind(&addr).await?
        }
    };

    let addr = listener.local_addr()?;
    tracing::info!("listening on {}", addr);
    tracing::info!("API docs at http://{}{}", addr, DOCS_PATH);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // Close the store even when the server failed
    if let Err(e) = repo.close().await {
        tracing::error!(error = %e, "failed to close database");
    }

    served?;
    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
