//! Concierge API server binary.
//!
//! Reads configuration from the environment (and `.env`), serves the HTTP
//! API and shuts down gracefully on Ctrl-C or SIGTERM.

use std::time::Duration;

use clap::Parser;
use concierge_api::config::ApiConfig;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How often expired cache entries are swept.
const CACHE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "concierge_server", about = "Concierge API server", version)]
struct Args {
    /// Address to listen on; overrides `BIND_ADDR`.
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (0 = ephemeral); keeps the host from the bind address.
    #[arg(long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "info,concierge_api=debug,concierge_core=debug",
                )
            }),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env();
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(port) = args.port {
        config.bind_addr = with_port(&config.bind_addr, port);
    }

    info!(
        version = concierge_core::version(),
        production = config.production,
        crm = config.crm.database_id.is_some() && config.crm.api_key.is_some(),
        mail = config.mail.api_key.is_some(),
        "starting concierge_server"
    );
    if config.site.contact_email.is_empty() {
        warn!("CONTACT_EMAIL is not set; inquiry notifications will be skipped");
    }

    let state = concierge_api::AppState::from_config(config.clone())?;
    let app = concierge_api::router(state.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "REST API listening");

    let ct = CancellationToken::new();

    // Drop expired proxy reads so idle sessions do not pin memory.
    let sweeper = tokio::spawn({
        let ct = ct.clone();
        let cache = state.cache.clone();
        async move {
            let mut tick = tokio::time::interval(CACHE_SWEEP_INTERVAL);
            loop {
                tokio::select! {
                    _ = ct.cancelled() => break,
                    _ = tick.tick() => {
                        let mut cache = cache.write().await;
                        cache.purge_expired();
                        debug!(entries = cache.len(), "cache swept");
                    }
                }
            }
        }
    });

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(ct.clone()))
        .await;

    ct.cancel();
    let _ = sweeper.await;
    info!("server stopped");

    result?;
    Ok(())
}

/// `host:port` with the port replaced.
fn with_port(bind_addr: &str, port: u16) -> String {
    let host = bind_addr
        .rsplit_once(':')
        .map_or(bind_addr, |(host, _)| host);
    format!("{host}:{port}")
}

/// Resolves on Ctrl-C or SIGTERM and cancels `ct`.
async fn shutdown_signal(ct: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
        _ = ct.cancelled() => {},
    }
    info!("shutdown signal received");
    ct.cancel();
}
