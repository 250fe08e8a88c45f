//! SPA edge gateway.
//!
//! ```text
//!     Client ──▶ listener ──▶ router ──┬─ /api/... ──▶ proxy ──▶ backend
//!                                      │               (prefix stripped, Host rewritten,
//!                                      │                500 "Proxy Error" on failure)
//!                                      │
//!                                      └─ anything else ──▶ asset root file
//!                                                         └─ miss ──▶ fallback document
//! ```

use clap::Parser;

use spa_gateway::cli::Cli;
use spa_gateway::lifecycle::{self, Shutdown};
use spa_gateway::observability::init_logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    init_logging(&config.logging);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.origin,
        api_prefix = %config.upstream.api_prefix,
        assets = %config.assets.root.display(),
        fallback = %config.assets.fallback_path().display(),
        "spa-gateway starting"
    );

    let (server, listener) = match lifecycle::start(config).await {
        Ok(started) => started,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return Err(e.into());
        }
    };

    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let stop = shutdown.subscribe();
    let signals = shutdown.trigger_on_signal();

    server.run(listener, stop).await?;
    signals.abort();

    tracing::info!("Shutdown complete");
    Ok(())
}
