//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration (asset root and fallback must exist)
//! - Compile router, forwarder and static site
//! - Bind the listener last, so traffic only arrives when ready
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal

use tokio::net::TcpListener;

use crate::config::{validate_config, ConfigError, GatewayConfig};
use crate::error::GatewayError;
use crate::http::HttpServer;

/// Validate, build and bind. Nothing is listening if this returns an error.
pub async fn start(config: GatewayConfig) -> Result<(HttpServer, TcpListener), GatewayError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    let server = HttpServer::new(config)?;

    let address = server.config().listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| GatewayError::Bind { address, source })?;

    Ok((server, listener))
}
