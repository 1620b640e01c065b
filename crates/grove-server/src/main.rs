//! Grove Server Binary
//!
//! API server for paginated record queries over the Grove document store.
//!
//! @version 0.1.0
//! @author Grove Development Team

use clap::Parser;
use grove_server::config::split_list;
use grove_server::{create_router, state, AppState, ServerConfig};
use std::net::SocketAddr;
use tokio::signal;

#[derive(Parser)]
#[command(name = "grove-server")]
#[command(about = "Grove Record Query API Server")]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// JSON seed file loaded into the store at startup
    #[arg(short, long)]
    seed: Option<String>,

    /// Comma-separated API keys required on /api/v1 routes
    #[arg(long)]
    api_keys: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    if let Err(e) = run(Args::parse()).await {
        tracing::error!("Grove Server failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match args.config {
        Some(ref path) => {
            tracing::info!("Loading configuration from {}", path);
            ServerConfig::from_file(path)?
        }
        None => ServerConfig::default(),
    }
    .apply_env();

    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.seed.is_some() {
        config.seed_file = args.seed;
    }
    if let Some(keys) = args.api_keys {
        config.api_keys = split_list(&keys);
    }

    let store = state::store();
    match config.seed_file {
        Some(ref seed) => {
            state::load_seed(&store, seed)?;
        }
        None => tracing::warn!("No seed file specified, serving an empty store"),
    }

    let addr: SocketAddr = config.socket_addr();
    tracing::info!(
        "Records collection '{}', default scope {}",
        config.records.collection,
        config.records.default_scope
    );
    if !config.api_keys.is_empty() {
        tracing::info!("API key check enabled ({} keys)", config.api_keys.len());
    }

    let state = AppState::new(config)?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Grove Server listening on http://{}", addr);
    tracing::info!("Records API ready at http://{}/api/v1/records", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Grove Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
