mod app;
mod broker;
mod cache;
mod config;
mod consumer;
mod context;
mod endpoints;
mod handlers;
mod log;
mod service;
mod state;
mod storage;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{app::create_app, config::Config, consumer::QueueConsumer, state::AppState};

/// Which surfaces this process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// HTTP API and queue workers
    All,
    /// HTTP API only
    Api,
    /// Queue workers only
    Broker,
}

/// Salon appointments - book, cancel and browse salon slots
#[derive(Parser, Debug)]
#[command(name = "appointments")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3000", env = "PORT")]
    port: u16,

    /// Surfaces to run
    #[arg(long, short, value_enum, default_value_t = Mode::All, env = "MODE")]
    mode: Mode,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "appointments=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(mode = ?cli.mode, cache_ttl_seconds = config.cache_ttl_seconds, "Starting appointments service");

    let state = AppState::new(&config).await?;

    let workers = match cli.mode {
        Mode::All | Mode::Broker => {
            let broker = broker::connect(&config).await?;
            QueueConsumer::new(broker, state.clone()).spawn()
        }
        Mode::Api => Vec::new(),
    };

    match cli.mode {
        Mode::All | Mode::Api => serve(&cli, state.clone()).await?,
        Mode::Broker => shutdown_signal(state.clone()).await,
    }

    // Stop queue workers even if the server exited on its own
    state.signal_shutdown();
    for worker in workers {
        if let Err(e) = worker.await {
            tracing::error!(error = %e, "Queue worker panicked");
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn serve(cli: &Cli, state: AppState) -> Result<()> {
    let app = create_app(state.clone());

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

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    Ok(())
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM) and notify queue workers.
async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install signal handler");
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

    state.signal_shutdown();
}
