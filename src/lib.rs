//! SPA edge gateway library.
//!
//! Serves a pre-built single-page application bundle and forwards requests
//! under an API prefix to a backend process.

pub mod assets;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod routing;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
