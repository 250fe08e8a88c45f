//! Startup error type.
//!
//! Per-request failures never surface here: the proxy translates upstream
//! errors to a 500 and the static stage falls back. Everything in this enum
//! stops the process before it serves traffic.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::ConfigError;
use crate::proxy::ProxyError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("asset root unusable: {0}")]
    Assets(#[source] std::io::Error),

    #[error("upstream unusable: {0}")]
    Upstream(#[from] ProxyError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error on {address}: {source}")]
    Serve {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}
